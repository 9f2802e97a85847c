//! Orchestrator-wide tunables, loaded through [`crate::ConfigStore`].

use serde::{Deserialize, Serialize};

/// Regular lattice sampled by the force grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceGridConfig {
    /// World-space origin of cell `(0, 0, 0)`.
    pub origin: [f32; 3],
    /// Uniform cell edge length.
    pub spacing: f32,
    /// Lattice extent in cells along each axis.
    pub dims: [u32; 3],
}

impl Default for ForceGridConfig {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0, 0.0],
            spacing: 1.0,
            dims: [16, 16, 16],
        }
    }
}

/// Thresholds for Phase G sleep bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepThresholds {
    /// Linear speed below which a body is considered at rest.
    pub linear_epsilon: f32,
    /// Angular speed below which a body is considered at rest.
    pub angular_epsilon: f32,
    /// Consecutive at-rest ticks required before a body sleeps.
    pub consecutive_ticks: u32,
}

impl Default for SleepThresholds {
    fn default() -> Self {
        Self {
            linear_epsilon: 0.01,
            angular_epsilon: 0.01,
            consecutive_ticks: 30,
        }
    }
}

/// Top-level orchestrator configuration, deserialized from the blob the
/// `ConfigStore` port loads under the `"orchestrator"` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Target wall-clock period of one tick, in seconds.
    pub tick_period_secs: f64,
    /// Maximum fixed sub-steps a worker may take to cover one tick's `dt`.
    pub max_substeps: u32,
    /// Per-island worker reply timeout, in seconds.
    pub worker_timeout_secs: f64,
    /// Multiplier applied to `tick_period_secs` to derive the global dispatch deadline.
    pub deadline_multiplier: f64,
    /// Number of workers in the pool.
    pub pool_size: usize,
    /// Bounded capacity of the command queue.
    pub command_queue_capacity: usize,
    /// Maximum CAS retries for a single command before it is reported as a conflict.
    pub command_retry_limit: u32,
    /// Islands larger than this are still dispatched whole, never split.
    pub max_island_size: usize,
    /// Epsilon for quaternion renormalization on merge.
    pub quaternion_renorm_eps: f32,
    /// Ambient force-field lattice.
    pub force_grid: ForceGridConfig,
    /// Sleep-state thresholds.
    pub sleep: SleepThresholds,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            tick_period_secs: 0.05,
            max_substeps: 10,
            worker_timeout_secs: 1.0,
            deadline_multiplier: 3.0,
            pool_size: 4,
            command_queue_capacity: 1024,
            command_retry_limit: 3,
            max_island_size: usize::MAX,
            quaternion_renorm_eps: 1e-3,
            force_grid: ForceGridConfig::default(),
            sleep: SleepThresholds::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Global dispatch deadline for one tick, in seconds.
    #[must_use]
    pub fn deadline_secs(&self) -> f64 {
        self.tick_period_secs * self.deadline_multiplier
    }
}
