//! Layout run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the pairwise phases are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Execution {
    /// Single thread, pairs evaluated in a fixed order.
    #[default]
    Sequential,
    /// Repulsion and integration on the rayon pool (`parallel` feature).
    Parallel,
}

/// Parameters for a spring layout run. Read-only once the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Number of iterations to run (default: 1000). There is no early exit.
    pub iterations: u32,
    /// Force constant k (default: 5.0). Also the spring's rest length.
    pub force_strength: f32,
    /// Multiplier from accumulated force to displacement (default: 0.01).
    pub damping: f32,
    /// Per-axis displacement limit for one iteration (default: 2.0).
    pub max_velocity: f32,
    /// Repulsion cutoff and spring truncation distance (default: 50.0).
    pub max_distance: f32,
    /// Scheduling of the pairwise phases (default: sequential).
    pub execution: Execution,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            force_strength: 5.0,
            damping: 0.01,
            max_velocity: 2.0,
            max_distance: 50.0,
            execution: Execution::Sequential,
        }
    }
}

impl LayoutConfig {
    /// Reject configurations that cannot drive a layout.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidIterations);
        }
        positive("force_strength", self.force_strength)?;
        positive("damping", self.damping)?;
        positive("max_velocity", self.max_velocity)?;
        positive("max_distance", self.max_distance)?;

        if self.execution == Execution::Parallel && !cfg!(feature = "parallel") {
            return Err(Error::ParallelUnavailable);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}
