mod defaults;
mod io;
mod schema;
mod validate;

pub use io::load_config;
pub use schema::{
    AlertSettings, Config, HealthThresholdConfig, MonitorSettings, NotificationLogConfig,
    SimulatedCluster, Simulation, SourceConfig, StateStoreConfig,
};
pub use validate::ConfigError;
