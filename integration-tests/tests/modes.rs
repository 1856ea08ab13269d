use approx::assert_relative_eq;
use pendel_core::{Mode, SECOND_SEGMENT_ANGLE, State};
use pendel_session::Session;

#[test]
fn mode_round_trip_keeps_first_angle() {
    let mut session = Session::new();
    for _ in 0..45 {
        session.advance_frame(1.0 / 60.0);
    }
    let (theta1, omega1) = session.state().first();

    session.set_mode(Mode::Single);
    session.set_mode(Mode::Double);

    assert_eq!(session.mode(), Mode::Double);
    assert_eq!(session.state().first(), (theta1, omega1));
    assert_eq!(session.state().second(), Some((SECOND_SEGMENT_ANGLE, 0.0)));
    assert_eq!(session.sim_time(), 0.0);
    assert_eq!(session.energy_reference(), None);
}

#[test]
fn reset_after_switch_has_mode_length_and_empty_trail() {
    let mut session = Session::new();

    for mode in [Mode::Single, Mode::Double] {
        session.set_mode(mode);
        for _ in 0..10 {
            session.step(0.016);
        }
        assert_eq!(session.trail().len(), 10);

        session.reset();

        assert_eq!(session.state().len(), mode.state_len());
        assert_eq!(*session.state(), State::initial(mode));
        assert!(session.trail().is_empty());
    }
}

#[test]
fn single_mode_positions_coincide() {
    let mut session = Session::new();
    session.set_mode(Mode::Single);
    session.params.l1 = 2.0;

    let p = session.positions().unwrap();

    assert_eq!(p.first, p.second);
    assert_relative_eq!(p.first.x, 2.0 * session.state().first().0.sin());
    assert_relative_eq!(p.first.y, 2.0 * session.state().first().0.cos());
}

#[test]
fn prediction_matches_a_fresh_run() {
    let mut session = Session::new();
    session.autoswitch = false;
    let predicted = session.predict_positions(1.0).unwrap();

    for _ in 0..200 {
        session.step(0.005);
    }

    let actual = session.positions().unwrap();
    assert_relative_eq!(actual.second.x, predicted.second.x, epsilon = 1e-3);
    assert_relative_eq!(actual.second.y, predicted.second.y, epsilon = 1e-3);
}

#[test]
fn stop_time_freezes_the_session() {
    let mut session = Session::new();
    session.stop_at = Some(0.5);

    let mut total = 0.0;
    for _ in 0..100 {
        total += session.advance_frame(1.0 / 30.0);
    }

    assert!(session.is_finished());
    assert_relative_eq!(total, 0.5, epsilon = 1e-9);
    assert_relative_eq!(session.sim_time(), 0.5);

    let frozen = *session.state();
    assert_eq!(session.advance_frame(1.0 / 30.0), 0.0);
    assert_eq!(*session.state(), frozen);
}
