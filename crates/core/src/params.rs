/// Physical parameters shared by the single and double pendulum models.
///
/// Masses are in kilograms, lengths in meters, gravity in m/s². `damping` is
/// a linear viscous coefficient applied to each angular velocity.
///
/// Values are not validated. Lengths and masses are expected to be strictly
/// positive; the derivative models clamp degenerate denominators instead of
/// rejecting them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-derive", serde(default))]
pub struct Params {
    pub m1: f64,
    pub m2: f64,
    pub l1: f64,
    pub l2: f64,
    pub g: f64,
    pub damping: f64,
}

impl Params {
    /// Returns `true` when no damping is applied.
    ///
    /// Energy is only expected to be conserved in this case.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_undamped(&self) -> bool {
        self.damping == 0.0
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            m1: 1.0,
            m2: 1.0,
            l1: 1.0,
            l2: 1.0,
            g: 9.81,
            damping: 0.0,
        }
    }
}
