use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types usable as the scalar field of a dynamical system.
/// Must support float arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A continuous-time dynamical system dy/dt = f(t, y).
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// x: current state
    /// out: buffer receiving dx/dt
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A trait for integrators that advance a system by one step.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size h.
    /// t: current time (updated after the step)
    /// state: current state (updated after the step)
    /// h: step size
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], h: T);
}
