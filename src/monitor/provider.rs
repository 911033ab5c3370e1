use std::{collections::HashMap, path::PathBuf, time::Duration};

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::alert::{ClusterIdentity, RawLegacySignal, RawSignalMetadata};
use crate::config::{Config, SimulatedCluster};

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct MonitorError {
    message: String,
}

impl MonitorError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait SignalSource {
    async fn fetch_signals(
        &mut self,
        cluster_uuids: &[String],
        lookback: Duration,
    ) -> Result<Vec<RawLegacySignal>, MonitorError>;
}

pub trait ClusterIdentitySource {
    async fn fetch_clusters(&mut self) -> Result<Vec<ClusterIdentity>, MonitorError>;
}

pub enum ActiveSignalSource {
    Snapshot(SnapshotSignalSource),
    Simulated(SimulatedClusterSource),
}

impl ActiveSignalSource {
    pub fn from_config(config: &Config) -> Self {
        if config.simulation.enabled {
            Self::Simulated(SimulatedClusterSource::new(&config.simulation.clusters))
        } else {
            Self::Snapshot(SnapshotSignalSource::new(&config.source.snapshot_path))
        }
    }
}

impl SignalSource for ActiveSignalSource {
    async fn fetch_signals(
        &mut self,
        cluster_uuids: &[String],
        lookback: Duration,
    ) -> Result<Vec<RawLegacySignal>, MonitorError> {
        match self {
            ActiveSignalSource::Snapshot(source) => {
                source.fetch_signals(cluster_uuids, lookback).await
            }
            ActiveSignalSource::Simulated(source) => {
                source.fetch_signals(cluster_uuids, lookback).await
            }
        }
    }
}

impl ClusterIdentitySource for ActiveSignalSource {
    async fn fetch_clusters(&mut self) -> Result<Vec<ClusterIdentity>, MonitorError> {
        match self {
            ActiveSignalSource::Snapshot(source) => source.fetch_clusters().await,
            ActiveSignalSource::Simulated(source) => source.fetch_clusters().await,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LegacyAlertSnapshot {
    #[serde(default)]
    clusters: Vec<ClusterIdentity>,
    #[serde(default)]
    alerts: Vec<RawLegacySignal>,
}

/// Reads an exported copy of the legacy alerts index and its cluster list.
pub struct SnapshotSignalSource {
    path: PathBuf,
}

impl SnapshotSignalSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_snapshot(&self) -> Result<LegacyAlertSnapshot, MonitorError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|error| {
            MonitorError::new(format!(
                "failed to read legacy alert snapshot {}: {}",
                self.path.display(),
                error
            ))
        })?;

        serde_json::from_str(&raw).map_err(|error| {
            MonitorError::new(format!(
                "invalid legacy alert snapshot {}: {}",
                self.path.display(),
                error
            ))
        })
    }
}

impl SignalSource for SnapshotSignalSource {
    async fn fetch_signals(
        &mut self,
        cluster_uuids: &[String],
        lookback: Duration,
    ) -> Result<Vec<RawLegacySignal>, MonitorError> {
        let snapshot = self.read_snapshot().await?;
        let lookback_ms = i64::try_from(lookback.as_millis()).unwrap_or(i64::MAX);
        let cutoff_ms = Utc::now().timestamp_millis().saturating_sub(lookback_ms);

        let in_window = snapshot
            .alerts
            .into_iter()
            .filter(|alert| alert.timestamp.is_none_or(|timestamp| timestamp >= cutoff_ms))
            .filter(|alert| {
                // documents without a uuid are passed through so the caller can report them
                alert
                    .metadata
                    .as_ref()
                    .and_then(|metadata| metadata.cluster_uuid.as_ref())
                    .is_none_or(|uuid| cluster_uuids.contains(uuid))
            });

        Ok(latest_per_cluster(in_window))
    }
}

/// Keeps the newest document per cluster uuid by `timestamp`, in first-seen order.
/// A document without a timestamp loses to any timestamped one; ties keep the earlier document.
fn latest_per_cluster(
    alerts: impl IntoIterator<Item = RawLegacySignal>,
) -> Vec<RawLegacySignal> {
    let mut latest: Vec<RawLegacySignal> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for alert in alerts {
        let Some(cluster_uuid) = alert
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.cluster_uuid.clone())
        else {
            latest.push(alert);
            continue;
        };

        match positions.get(&cluster_uuid) {
            Some(&index) => {
                let current = latest[index].timestamp.unwrap_or(i64::MIN);
                if alert.timestamp.unwrap_or(i64::MIN) > current {
                    latest[index] = alert;
                }
            }
            None => {
                positions.insert(cluster_uuid, latest.len());
                latest.push(alert);
            }
        }
    }

    latest
}

impl ClusterIdentitySource for SnapshotSignalSource {
    async fn fetch_clusters(&mut self) -> Result<Vec<ClusterIdentity>, MonitorError> {
        Ok(self.read_snapshot().await?.clusters)
    }
}

const SIMULATION_CYCLE_TICKS: u64 = 8;
const SIMULATED_YELLOW_SEVERITY: i64 = 2000;
const SIMULATED_RED_SEVERITY: i64 = 2100;

/// Walks every configured cluster through healthy, yellow, red and resolved phases.
pub struct SimulatedClusterSource {
    clusters: Vec<SimulatedCluster>,
    tick: u64,
}

impl SimulatedClusterSource {
    pub fn new(clusters: &[SimulatedCluster]) -> Self {
        Self {
            clusters: clusters.to_vec(),
            tick: 0,
        }
    }

    fn signal_for(
        &self,
        index: usize,
        cluster: &SimulatedCluster,
        now_ms: i64,
    ) -> Option<RawLegacySignal> {
        let phase = (self.tick + index as u64 * 3) % SIMULATION_CYCLE_TICKS;
        let (status, severity, message) = match phase {
            0..=2 => return None,
            3 | 4 => (
                "yellow",
                SIMULATED_YELLOW_SEVERITY,
                "Allocate missing replica shards.",
            ),
            _ => (
                "red",
                SIMULATED_RED_SEVERITY,
                "Allocate missing primary and replica shards.",
            ),
        };

        Some(RawLegacySignal {
            prefix: Some(format!("Elasticsearch cluster status is {}.", status)),
            message: Some(message.to_string()),
            metadata: Some(RawSignalMetadata {
                severity: Some(severity),
                cluster_uuid: Some(cluster.cluster_uuid.clone()),
            }),
            resolved_timestamp: (phase == SIMULATION_CYCLE_TICKS - 1).then_some(now_ms),
            timestamp: Some(now_ms),
            ccs: None,
        })
    }
}

impl SignalSource for SimulatedClusterSource {
    async fn fetch_signals(
        &mut self,
        cluster_uuids: &[String],
        _lookback: Duration,
    ) -> Result<Vec<RawLegacySignal>, MonitorError> {
        self.tick = self.tick.saturating_add(1);
        let now_ms = Utc::now().timestamp_millis();

        Ok(self
            .clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| cluster_uuids.contains(&cluster.cluster_uuid))
            .filter_map(|(index, cluster)| self.signal_for(index, cluster, now_ms))
            .collect())
    }
}

impl ClusterIdentitySource for SimulatedClusterSource {
    async fn fetch_clusters(&mut self) -> Result<Vec<ClusterIdentity>, MonitorError> {
        Ok(self
            .clusters
            .iter()
            .map(|cluster| ClusterIdentity {
                cluster_uuid: cluster.cluster_uuid.clone(),
                cluster_name: cluster.cluster_name.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) struct MockClusterSource {
    clusters: Vec<ClusterIdentity>,
    ticks: Vec<Vec<RawLegacySignal>>,
    pub(crate) requested: Vec<Vec<String>>,
}

#[cfg(test)]
impl MockClusterSource {
    pub(crate) fn new(clusters: Vec<ClusterIdentity>, ticks: Vec<Vec<RawLegacySignal>>) -> Self {
        Self {
            clusters,
            ticks,
            requested: Vec::new(),
        }
    }
}

#[cfg(test)]
impl SignalSource for MockClusterSource {
    async fn fetch_signals(
        &mut self,
        cluster_uuids: &[String],
        _lookback: Duration,
    ) -> Result<Vec<RawLegacySignal>, MonitorError> {
        self.requested.push(cluster_uuids.to_vec());
        if self.ticks.is_empty() {
            return Err(MonitorError::new("mock signals exhausted"));
        }

        Ok(self.ticks.remove(0))
    }
}

#[cfg(test)]
impl ClusterIdentitySource for MockClusterSource {
    async fn fetch_clusters(&mut self) -> Result<Vec<ClusterIdentity>, MonitorError> {
        Ok(self.clusters.clone())
    }
}
