use crate::traits::{DynamicalSystem, Scalar};

/// Undamped linear harmonic oscillator x'' + w^2 x = 0, written as the
/// first-order system
///
///   x' = y
///   y' = -w^2 x
///
/// State layout: `[position, velocity]`.
pub struct HarmonicOscillator<T: Scalar> {
    pub omega: T,
}

impl<T: Scalar> DynamicalSystem<T> for HarmonicOscillator<T> {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        out[0] = x[1];
        out[1] = -self.omega * self.omega * x[0];
    }
}

impl<T: Scalar> HarmonicOscillator<T> {
    /// Closed-form solution at time `t` for the initial state at `t0`.
    ///
    /// For w != 0:
    ///   x(t) = x0 cos(w dt) + (y0 / w) sin(w dt)
    ///   y(t) = -x0 w sin(w dt) + y0 cos(w dt)
    ///
    /// For w = 0 the system degenerates to linear drift:
    ///   x(t) = x0 + dt y0, y(t) = y0.
    pub fn exact_state(&self, t0: T, initial: &[T; 2], t: T) -> [T; 2] {
        let dt = t - t0;
        let x0 = initial[0];
        let y0 = initial[1];

        if self.omega == T::zero() {
            return [x0 + dt * y0, y0];
        }

        let c = (self.omega * dt).cos();
        let s = (self.omega * dt).sin();
        [
            x0 * c + y0 / self.omega * s,
            -x0 * self.omega * s + y0 * c,
        ]
    }

    /// Total energy (1/2) (y^2 + w^2 x^2), conserved by the true flow.
    pub fn energy(&self, state: &[T; 2]) -> T {
        let half = T::from_f64(0.5).unwrap();
        half * (state[1] * state[1] + self.omega * self.omega * state[0] * state[0])
    }
}
