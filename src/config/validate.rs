use std::collections::HashSet;

use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("alert.product_name", &self.alert.product_name)?;
        require_non_empty("alert.link_route", &self.alert.link_route)?;
        require_non_empty("alert.link_text", &self.alert.link_text)?;

        if self.health_thresholds.is_empty() {
            return Err(ConfigError::Validation(
                "health_thresholds must contain at least one entry".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for threshold in &self.health_thresholds {
            require_non_empty("health_thresholds.label", &threshold.label)?;
            if !seen.insert(threshold.min_score) {
                return Err(ConfigError::Validation(format!(
                    "health_thresholds.min_score {} is declared more than once",
                    threshold.min_score
                )));
            }
        }

        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "monitor.interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.monitor.lookback_secs == 0 {
            return Err(ConfigError::Validation(
                "monitor.lookback_secs must be greater than 0".to_string(),
            ));
        }

        if !self.simulation.enabled && self.source.snapshot_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source.snapshot_path must not be empty when simulation is disabled".to_string(),
            ));
        }

        if self.state_store.enabled && self.state_store.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "state_store.path must not be empty when state_store.enabled is true".to_string(),
            ));
        }

        if self.notification_log.enabled && self.notification_log.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "notification_log.path must not be empty when notification_log.enabled is true"
                    .to_string(),
            ));
        }
        if self.notification_log.max_file_size_bytes == 0 {
            return Err(ConfigError::Validation(
                "notification_log.max_file_size_bytes must be greater than 0".to_string(),
            ));
        }
        if self.notification_log.max_files == 0 {
            return Err(ConfigError::Validation(
                "notification_log.max_files must be greater than 0".to_string(),
            ));
        }

        if self.simulation.enabled {
            if self.simulation.clusters.is_empty() {
                return Err(ConfigError::Validation(
                    "simulation.clusters must not be empty when simulation.enabled is true"
                        .to_string(),
                ));
            }
            for cluster in &self.simulation.clusters {
                require_non_empty("simulation.clusters.cluster_uuid", &cluster.cluster_uuid)?;
            }
        }

        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}
