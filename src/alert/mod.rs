mod definition;
mod evaluator;
mod health;
mod message;
mod model;

pub use definition::{ALERT_CLUSTER_HEALTH, ActionVariable, AlertDefinition, DEFAULT_ACTION_GROUP};
pub use evaluator::{AlertEvaluator, Evaluation};
pub use health::{HealthTable, HealthTableError, HealthThreshold};
pub use model::{
    AlertMessage, ClusterAlertState, ClusterIdentity, Diagnostic, LINK_END_TOKEN,
    LINK_START_TOKEN, LegacySignal, LinkToken, NextStep, NotificationPayload, NotificationState,
    RawLegacySignal, RawSignalMetadata, RejectReason, SignalError, TokenType,
};
