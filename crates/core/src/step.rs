/// A trait for states that can be advanced along their derivative.
///
/// Integrators never touch the components of a state directly. Every stage
/// of a scheme is expressed as `state.step(derivative, delta)`, meaning
/// `state + derivative * delta`, so the same integrator code serves any
/// state shape that implements this trait.
pub trait StepIntegrable<Delta> {
    /// The derivative of the type with respect to `Delta`.
    type Derivative;

    /// Returns the value after stepping with a derivative and step size.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// Type alias for the derivative of a `StepIntegrable` type.
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;
