/// Receives events and decides whether the emitter should change course.
///
/// The session reports each energy check to an observer and applies the
/// returned action, which keeps control policies (integrator switching,
/// step bound adaptation) out of the integration loop itself.
///
/// `observe` returns `Option<A>`, where `Some(action)` requests an action and
/// `None` leaves things unchanged. Closures implement `Observer`, and `()` is
/// a no-op observer that always returns `None`.
pub trait Observer<E, A> {
    /// Observes an event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
