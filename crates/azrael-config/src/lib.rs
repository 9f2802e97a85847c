//! Config storage port, filesystem adapter, and orchestrator settings.

mod fs_store;
mod orchestrator;
mod store;

pub use fs_store::FsConfigStore;
pub use orchestrator::{ForceGridConfig, OrchestratorConfig, SleepThresholds};
pub use store::{ConfigError, ConfigService, ConfigStore};
