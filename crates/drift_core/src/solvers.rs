use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Explicit (forward) Euler solver.
///
/// First-order: the next state is extrapolated from the current-step
/// derivative alone, y_{k+1} = y_k + h * f(t_k, y_k). On the harmonic
/// oscillator every step multiplies the state norm by sqrt(1 + h^2 w^2),
/// so trajectories spiral outward for any h > 0. That growth is the whole
/// point of this crate; see the `stability` module for the eigenvalue view.
pub struct ExplicitEuler<T: Scalar> {
    dydt: Vec<T>,
}

impl<T: Scalar> ExplicitEuler<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            dydt: vec![T::from_f64(0.0).unwrap(); dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for ExplicitEuler<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], h: T) {
        let t0 = *t;

        // dydt = f(t, y)
        system.apply(t0, state, &mut self.dydt);

        // y_next = y + h * dydt
        for i in 0..state.len() {
            state[i] = state[i] + h * self.dydt[i];
        }

        *t = t0 + h;
    }
}
