use std::sync::Arc;

use thiserror::Error;

use crate::alert::{AlertEvaluator, HealthTableError};
use crate::config::Config;
use crate::state_store::{ActiveStateStore, StateStoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid health thresholds: {0}")]
    HealthTable(#[from] HealthTableError),
    #[error("failed to open alert state store: {0}")]
    StateStore(#[from] StateStoreError),
}

#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub evaluator: Arc<AlertEvaluator>,
    pub state_store: Arc<ActiveStateStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let evaluator = AlertEvaluator::from_config(&config)?;
        let state_store = ActiveStateStore::open_from_config(&config)?;

        Ok(Self {
            config,
            evaluator: Arc::new(evaluator),
            state_store: Arc::new(state_store),
        })
    }
}
