use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub alert: AlertSettings,
    #[serde(default = "default_health_thresholds")]
    pub health_thresholds: Vec<HealthThresholdConfig>,
    #[serde(default)]
    pub monitor: MonitorSettings,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub state_store: StateStoreConfig,
    #[serde(default)]
    pub notification_log: NotificationLogConfig,
    #[serde(default)]
    pub simulation: Simulation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertSettings {
    #[serde(default = "default_product_name")]
    pub product_name: String,
    #[serde(default = "default_link_route")]
    pub link_route: String,
    #[serde(default = "default_link_text")]
    pub link_text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthThresholdConfig {
    pub min_score: i64,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSettings {
    #[serde(default = "default_monitor_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateStoreConfig {
    #[serde(default = "default_state_store_enabled")]
    pub enabled: bool,
    #[serde(default = "default_state_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationLogConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_notification_log_path")]
    pub path: String,
    #[serde(default = "default_notification_log_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_notification_log_max_files")]
    pub max_files: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Simulation {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_simulation_clusters")]
    pub clusters: Vec<SimulatedCluster>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulatedCluster {
    pub cluster_uuid: String,
    pub cluster_name: String,
}
