use super::schema::{
    AlertSettings, Config, HealthThresholdConfig, MonitorSettings, NotificationLogConfig,
    SimulatedCluster, Simulation, SourceConfig, StateStoreConfig,
};

pub(super) fn default_product_name() -> String {
    "Elasticsearch".to_string()
}

pub(super) fn default_link_route() -> String {
    "elasticsearch/indices".to_string()
}

pub(super) fn default_link_text() -> String {
    "View now".to_string()
}

pub(super) fn default_health_thresholds() -> Vec<HealthThresholdConfig> {
    vec![
        HealthThresholdConfig {
            min_score: 2100,
            label: "red".to_string(),
        },
        HealthThresholdConfig {
            min_score: 1000,
            label: "yellow".to_string(),
        },
    ]
}

pub(super) fn default_monitor_interval_secs() -> u64 {
    60
}

pub(super) fn default_lookback_secs() -> u64 {
    120
}

pub(super) fn default_snapshot_path() -> String {
    "data/legacy_alerts.json".to_string()
}

pub(super) fn default_state_store_enabled() -> bool {
    true
}

pub(super) fn default_state_store_path() -> String {
    "data/alert_state".to_string()
}

pub(super) fn default_notification_log_path() -> String {
    "logs/notifications.jsonl".to_string()
}

pub(super) fn default_notification_log_max_file_size_bytes() -> u64 {
    10 * 1024 * 1024
}

pub(super) fn default_notification_log_max_files() -> u16 {
    7
}

pub(super) fn default_simulation_clusters() -> Vec<SimulatedCluster> {
    vec![SimulatedCluster {
        cluster_uuid: "sim-cluster-1".to_string(),
        cluster_name: "simulated".to_string(),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alert: AlertSettings::default(),
            health_thresholds: default_health_thresholds(),
            monitor: MonitorSettings::default(),
            source: SourceConfig::default(),
            state_store: StateStoreConfig::default(),
            notification_log: NotificationLogConfig::default(),
            simulation: Simulation::default(),
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            link_route: default_link_route(),
            link_text: default_link_text(),
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_monitor_interval_secs(),
            lookback_secs: default_lookback_secs(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl Default for StateStoreConfig {
    fn default() -> Self {
        Self {
            enabled: default_state_store_enabled(),
            path: default_state_store_path(),
        }
    }
}

impl Default for NotificationLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_notification_log_path(),
            max_file_size_bytes: default_notification_log_max_file_size_bytes(),
            max_files: default_notification_log_max_files(),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            enabled: false,
            clusters: default_simulation_clusters(),
        }
    }
}
