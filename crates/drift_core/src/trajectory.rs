use crate::solvers::ExplicitEuler;
use crate::traits::{DynamicalSystem, Steppable};
use anyhow::{bail, Result};
use serde::Serialize;

/// A fixed-step integration record: one time value and one state vector per
/// sample. States are stored flattened in row-major order; sample `k`
/// occupies `states[k * dimension .. (k + 1) * dimension]`.
///
/// The first sample is always the supplied initial condition, bit for bit.
/// Nothing is mutated after generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub dimension: usize,
    pub times: Vec<f64>,
    pub states: Vec<f64>,
}

impl Trajectory {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// State vector of sample `k`.
    pub fn state(&self, k: usize) -> &[f64] {
        &self.states[k * self.dimension..(k + 1) * self.dimension]
    }

    /// One component of the state across all samples, e.g. `component(0)`
    /// is the position column for the harmonic oscillator.
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.states
            .iter()
            .skip(index)
            .step_by(self.dimension)
            .copied()
            .collect()
    }

    /// Euclidean norm of sample `k`.
    pub fn norm(&self, k: usize) -> f64 {
        self.state(k).iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

/// Generates a trajectory of `samples` states with the explicit Euler
/// method: the initial state, then `samples - 1` steps of size `h`.
///
/// `h = 0` is accepted and yields a constant trajectory. Negative `h`
/// integrates backward. Deterministic: identical inputs produce
/// bit-identical output.
pub fn propagate<S: DynamicalSystem<f64>>(
    system: &S,
    t0: f64,
    initial_state: &[f64],
    h: f64,
    samples: usize,
) -> Result<Trajectory> {
    let mut stepper = ExplicitEuler::new(initial_state.len());
    propagate_with(system, &mut stepper, t0, initial_state, h, samples)
}

/// As `propagate`, but with a caller-supplied stepper.
pub fn propagate_with<S: DynamicalSystem<f64>>(
    system: &S,
    stepper: &mut impl Steppable<f64>,
    t0: f64,
    initial_state: &[f64],
    h: f64,
    samples: usize,
) -> Result<Trajectory> {
    if samples == 0 {
        bail!("Trajectory requires at least one sample.");
    }
    if initial_state.is_empty() {
        bail!("Initial state must have positive dimension.");
    }
    if initial_state.len() != system.dimension() {
        bail!(
            "Initial state dimension mismatch. Expected {}, got {}.",
            system.dimension(),
            initial_state.len()
        );
    }
    if !t0.is_finite() {
        bail!("Initial time t0 must be finite.");
    }
    if !h.is_finite() {
        bail!("Step size h must be finite.");
    }
    for (i, &value) in initial_state.iter().enumerate() {
        if !value.is_finite() {
            bail!("initial_state[{}] is not finite.", i);
        }
    }

    let dim = initial_state.len();
    let mut times = Vec::with_capacity(samples);
    let mut states = Vec::with_capacity(samples * dim);

    let mut t = t0;
    let mut state = initial_state.to_vec();
    times.push(t);
    states.extend_from_slice(&state);

    // Non-finite values arising mid-integration are recorded, not trapped:
    // a diverging Euler run reaching infinity is data, not an error.
    for _ in 1..samples {
        stepper.step(system, &mut t, &mut state, h);
        times.push(t);
        states.extend_from_slice(&state);
    }

    Ok(Trajectory {
        dimension: dim,
        times,
        states,
    })
}

#[cfg(test)]
mod tests {
    use super::propagate;
    use crate::oscillator::HarmonicOscillator;

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn rejects_invalid_inputs() {
        let system = HarmonicOscillator { omega: 1.0 };
        assert_err_contains(propagate(&system, 0.0, &[1.0, 0.0], 0.1, 0), "at least one");
        assert_err_contains(propagate(&system, 0.0, &[], 0.1, 10), "positive dimension");
        assert_err_contains(propagate(&system, 0.0, &[1.0], 0.1, 10), "dimension mismatch");
        assert_err_contains(
            propagate(&system, 0.0, &[1.0, 0.0], f64::NAN, 10),
            "h must be finite",
        );
        assert_err_contains(
            propagate(&system, f64::INFINITY, &[1.0, 0.0], 0.1, 10),
            "t0 must be finite",
        );
        assert_err_contains(
            propagate(&system, 0.0, &[1.0, f64::NAN], 0.1, 10),
            "initial_state[1]",
        );
    }

    #[test]
    fn first_sample_is_the_initial_condition() {
        let system = HarmonicOscillator { omega: 1.0 };
        let initial = [0.123456789, -0.987654321];
        let trajectory = propagate(&system, 2.5, &initial, 0.01, 100).unwrap();
        assert_eq!(trajectory.len(), 100);
        assert_eq!(trajectory.state(0), &initial);
        assert_eq!(trajectory.times[0], 2.5);
    }

    #[test]
    fn single_sample_trajectory_is_the_initial_state() {
        let system = HarmonicOscillator { omega: 42.0 };
        let trajectory = propagate(&system, 0.0, &[1.0, -1.0], 123.0, 1).unwrap();
        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory.state(0), &[1.0, -1.0]);
    }

    #[test]
    fn zero_step_size_yields_constant_trajectory() {
        let system = HarmonicOscillator { omega: 2.0 };
        let initial = [0.5, -0.25];
        let trajectory = propagate(&system, 1.0, &initial, 0.0, 20).unwrap();
        for k in 0..trajectory.len() {
            assert_eq!(trajectory.state(k), &initial);
            assert_eq!(trajectory.times[k], 1.0);
        }
    }

    #[test]
    fn norm_grows_strictly_for_positive_step() {
        // For w = 1 the Euler update multiplies the squared norm by exactly
        // 1 + h^2 each step, so growth is strict at every index.
        let system = HarmonicOscillator { omega: 1.0 };
        let trajectory = propagate(&system, 0.0, &[1.0, 0.0], 0.1, 200).unwrap();
        for k in 1..trajectory.len() {
            assert!(
                trajectory.norm(k) > trajectory.norm(k - 1),
                "norm not strictly increasing at k = {k}"
            );
        }
    }

    #[test]
    fn energy_drifts_upward_while_exact_energy_is_flat() {
        let system = HarmonicOscillator { omega: 2.0 };
        let initial = [1.0, 0.0];
        let trajectory = propagate(&system, 0.0, &initial, 0.05, 100).unwrap();

        let e0 = system.energy(&initial);
        let mut previous = e0;
        for k in 1..trajectory.len() {
            let s = trajectory.state(k);
            let e = system.energy(&[s[0], s[1]]);
            assert!(e > previous, "Euler energy not increasing at k = {k}");
            previous = e;

            let exact = system.exact_state(0.0, &initial, trajectory.times[k]);
            assert!((system.energy(&exact) - e0).abs() < 1e-12);
        }
    }

    #[test]
    fn reruns_are_bit_identical() {
        let system = HarmonicOscillator { omega: 1.7 };
        let a = propagate(&system, 0.3, &[0.9, -0.4], 0.01, 500).unwrap();
        let b = propagate(&system, 0.3, &[0.9, -0.4], 0.01, 500).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_frequency_matches_linear_closed_form_exactly() {
        // h, x0, y0 chosen so every intermediate is exact in binary; the
        // iterated sum and the closed form then agree bit for bit.
        let system = HarmonicOscillator { omega: 0.0 };
        let (x0, y0, h) = (1.0, 2.0, 0.25);
        let trajectory = propagate(&system, 0.0, &[x0, y0], h, 40).unwrap();
        for k in 0..trajectory.len() {
            let s = trajectory.state(k);
            assert_eq!(s[0], x0 + k as f64 * h * y0);
            assert_eq!(s[1], y0);
        }
    }

    #[test]
    fn backward_step_size_integrates_backward() {
        let system = HarmonicOscillator { omega: 1.0 };
        let trajectory = propagate(&system, 0.0, &[1.0, 0.0], -0.1, 5).unwrap();
        assert!(trajectory.times[4] < 0.0);
    }

    #[test]
    fn component_extracts_columns() {
        let system = HarmonicOscillator { omega: 1.0 };
        let trajectory = propagate(&system, 0.0, &[1.0, 0.0], 0.1, 10).unwrap();
        let positions = trajectory.component(0);
        let velocities = trajectory.component(1);
        assert_eq!(positions.len(), 10);
        assert_eq!(velocities.len(), 10);
        for k in 0..10 {
            assert_eq!(positions[k], trajectory.state(k)[0]);
            assert_eq!(velocities[k], trajectory.state(k)[1]);
        }
    }
}
