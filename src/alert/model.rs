use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LINK_START_TOKEN: &str = "#start_link";
pub const LINK_END_TOKEN: &str = "#end_link";

/// One legacy alert fact for one cluster at the current tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacySignal {
    pub cluster_uuid: String,
    pub severity_score: i64,
    pub prefix_text: String,
    pub recommendation_text: String,
    pub resolved_at_ms: Option<i64>,
    pub ccs: Option<String>,
}

/// Wire shape of a document in the legacy alerts index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLegacySignal {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub metadata: Option<RawSignalMetadata>,
    #[serde(default)]
    pub resolved_timestamp: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub ccs: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSignalMetadata {
    #[serde(default)]
    pub severity: Option<i64>,
    #[serde(default)]
    pub cluster_uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("legacy signal is missing required field {field}")]
pub struct SignalError {
    pub field: &'static str,
}

impl TryFrom<RawLegacySignal> for LegacySignal {
    type Error = SignalError;

    fn try_from(raw: RawLegacySignal) -> Result<Self, Self::Error> {
        let metadata = raw.metadata.unwrap_or_default();
        let cluster_uuid = metadata
            .cluster_uuid
            .filter(|uuid| !uuid.trim().is_empty())
            .ok_or(SignalError {
                field: "metadata.cluster_uuid",
            })?;
        let severity_score = metadata.severity.ok_or(SignalError {
            field: "metadata.severity",
        })?;
        let recommendation_text = raw.message.ok_or(SignalError { field: "message" })?;

        Ok(Self {
            cluster_uuid,
            severity_score,
            prefix_text: raw.prefix.unwrap_or_default(),
            recommendation_text,
            resolved_at_ms: raw.resolved_timestamp,
            ccs: raw.ccs,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIdentity {
    pub cluster_uuid: String,
    pub cluster_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkToken {
    pub start_token: String,
    pub end_token: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<LinkToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<NextStep>,
}

/// Persisted per-cluster record. One exists for every cluster that has fired or resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAlertState {
    pub cluster: ClusterIdentity,
    #[serde(default)]
    pub ccs: Option<String>,
    pub is_firing: bool,
    pub message: AlertMessage,
    pub severity: String,
    #[serde(default)]
    pub resolved_at_ms: Option<i64>,
    #[serde(default)]
    pub triggered_at_ms: Option<i64>,
    pub last_checked_at_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationState {
    Firing,
    Resolved,
}

impl NotificationState {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationState::Firing => "firing",
            NotificationState::Resolved => "resolved",
        }
    }
}

/// Action parameters scheduled for the alert's action group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub action_group: String,
    pub cluster_uuid: String,
    pub cluster_name: String,
    pub cluster_health: String,
    pub state: NotificationState,
    pub internal_short_message: String,
    pub internal_full_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_plain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("severity {severity_score} does not match any health threshold")]
    SeverityBelowThresholds { severity_score: i64 },
    #[error("recommendation text is empty")]
    EmptyRecommendation,
}

/// Non-fatal findings for a single cluster, surfaced to the caller for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    MissingIdentity { cluster_uuid: String },
    RejectedSignal { cluster_uuid: String, reason: RejectReason },
    DuplicateSignal { cluster_uuid: String },
}
