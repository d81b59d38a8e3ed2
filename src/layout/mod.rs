//! Force-directed spring layout.
//!
//! Nodes repel each other like charges and edges pull like springs. Every
//! iteration sums both forces per node and then moves each node by a damped,
//! clamped step. The driver runs a fixed number of iterations.

pub mod config;
pub mod driver;
pub mod forces;
pub mod integrator;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod perturbation;
pub mod result;

pub use config::{Execution, LayoutConfig};
pub use driver::{LayoutRun, LayoutState, SpringLayout};
pub use forces::ForceParams;
pub use perturbation::{EntropyPerturbation, PerturbationSource, SeededPerturbation};
pub use result::LayoutResult;
