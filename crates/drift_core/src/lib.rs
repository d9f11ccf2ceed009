//! The `drift_core` crate demonstrates, in executable form, why the explicit
//! Euler method fails on oscillatory systems and how floating-point hardware
//! rounds. It is organized around three pieces:
//!
//! - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem`
//!   (vector fields), `Steppable` (one-step integrators).
//! - **Integration**: the `ExplicitEuler` stepper and a fixed-step
//!   trajectory generator for the harmonic oscillator.
//! - **Analysis**: eigenvalues and spectral radius of the discrete Euler
//!   update, and a bit-level model of IEEE-754 addition with
//!   guard/round/sticky rounding.

pub mod oscillator;
pub mod rounding;
pub mod solvers;
pub mod stability;
pub mod traits;
pub mod trajectory;
