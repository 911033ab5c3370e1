use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use thiserror::Error;

use crate::alert::ClusterAlertState;
use crate::config::Config;

const STATES_TREE: &str = "alert_states";

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("state store error: {0}")]
    Sled(#[from] sled::Error),
    #[error("failed to encode alert state: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("in-memory state store lock poisoned")]
    Poisoned,
}

/// Durable per-cluster alert state, one record per cluster per alert type.
pub trait StateStore {
    fn load_states(
        &self,
        alert_type: &str,
    ) -> Result<BTreeMap<String, ClusterAlertState>, StateStoreError>;

    fn persist_states(
        &self,
        alert_type: &str,
        states: &BTreeMap<String, ClusterAlertState>,
    ) -> Result<(), StateStoreError>;
}

pub enum ActiveStateStore {
    Sled(SledStateStore),
    Memory(InMemoryStateStore),
}

impl ActiveStateStore {
    pub fn open_from_config(config: &Config) -> Result<Self, StateStoreError> {
        if !config.state_store.enabled {
            return Ok(Self::Memory(InMemoryStateStore::default()));
        }

        Ok(Self::Sled(SledStateStore::open(&config.state_store.path)?))
    }
}

impl StateStore for ActiveStateStore {
    fn load_states(
        &self,
        alert_type: &str,
    ) -> Result<BTreeMap<String, ClusterAlertState>, StateStoreError> {
        match self {
            ActiveStateStore::Sled(store) => store.load_states(alert_type),
            ActiveStateStore::Memory(store) => store.load_states(alert_type),
        }
    }

    fn persist_states(
        &self,
        alert_type: &str,
        states: &BTreeMap<String, ClusterAlertState>,
    ) -> Result<(), StateStoreError> {
        match self {
            ActiveStateStore::Sled(store) => store.persist_states(alert_type, states),
            ActiveStateStore::Memory(store) => store.persist_states(alert_type, states),
        }
    }
}

#[derive(Clone)]
pub struct SledStateStore {
    states: sled::Tree,
}

impl SledStateStore {
    pub fn open(path: &str) -> Result<Self, sled::Error> {
        let db = sled::open(path)?;
        Ok(Self {
            states: db.open_tree(STATES_TREE)?,
        })
    }
}

fn record_key(alert_type: &str, cluster_uuid: &str) -> String {
    format!("{}/{}", alert_type, cluster_uuid)
}

impl StateStore for SledStateStore {
    fn load_states(
        &self,
        alert_type: &str,
    ) -> Result<BTreeMap<String, ClusterAlertState>, StateStoreError> {
        let prefix = record_key(alert_type, "");
        let mut states = BTreeMap::new();

        for item in self.states.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            let cluster_uuid = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
            match serde_json::from_slice::<ClusterAlertState>(&value) {
                Ok(state) => {
                    states.insert(cluster_uuid, state);
                }
                Err(error) => {
                    log::warn!(
                        "state_store_record_skipped alert_type={} cluster_uuid={} error={}",
                        alert_type,
                        cluster_uuid,
                        error
                    );
                }
            }
        }

        Ok(states)
    }

    fn persist_states(
        &self,
        alert_type: &str,
        states: &BTreeMap<String, ClusterAlertState>,
    ) -> Result<(), StateStoreError> {
        // all records of a tick land together or not at all
        let mut batch = sled::Batch::default();
        for (cluster_uuid, state) in states {
            let value = serde_json::to_vec(state)?;
            batch.insert(record_key(alert_type, cluster_uuid).as_bytes(), value);
        }
        self.states.apply_batch(batch)?;
        self.states.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    states: Mutex<HashMap<String, BTreeMap<String, ClusterAlertState>>>,
}

impl StateStore for InMemoryStateStore {
    fn load_states(
        &self,
        alert_type: &str,
    ) -> Result<BTreeMap<String, ClusterAlertState>, StateStoreError> {
        let states = self.states.lock().map_err(|_| StateStoreError::Poisoned)?;
        Ok(states.get(alert_type).cloned().unwrap_or_default())
    }

    fn persist_states(
        &self,
        alert_type: &str,
        states: &BTreeMap<String, ClusterAlertState>,
    ) -> Result<(), StateStoreError> {
        let mut stored = self.states.lock().map_err(|_| StateStoreError::Poisoned)?;
        stored
            .entry(alert_type.to_string())
            .or_default()
            .extend(states.iter().map(|(uuid, state)| (uuid.clone(), state.clone())));
        Ok(())
    }
}
