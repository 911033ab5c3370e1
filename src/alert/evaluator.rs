use std::collections::{BTreeMap, BTreeSet, HashMap, btree_map::Entry};

use crate::config::Config;

use super::definition::AlertDefinition;
use super::health::{HealthTable, HealthTableError};
use super::message::{firing_message, firing_payload, resolved_message, resolved_payload};
use super::model::{
    ClusterAlertState, ClusterIdentity, Diagnostic, LegacySignal, NotificationPayload,
    RejectReason,
};

/// Result of one tick. States and notifications are ordered by cluster uuid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub new_states: BTreeMap<String, ClusterAlertState>,
    pub notifications: Vec<NotificationPayload>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Computes per-cluster firing/resolved transitions for the cluster health alert.
///
/// Holds no mutable state: every call is a function of its arguments, so the
/// caller owns the read-evaluate-write cycle on the previous states.
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    definition: AlertDefinition,
    health: HealthTable,
}

impl AlertEvaluator {
    pub fn new(definition: AlertDefinition, health: HealthTable) -> Self {
        Self { definition, health }
    }

    pub fn from_config(config: &Config) -> Result<Self, HealthTableError> {
        Ok(Self::new(
            AlertDefinition::from_settings(&config.alert),
            HealthTable::from_config(&config.health_thresholds)?,
        ))
    }

    pub fn definition(&self) -> &AlertDefinition {
        &self.definition
    }

    pub fn health_table(&self) -> &HealthTable {
        &self.health
    }

    pub fn evaluate(
        &self,
        signals: &[LegacySignal],
        identities: &HashMap<String, ClusterIdentity>,
        previous_states: &BTreeMap<String, ClusterAlertState>,
        now_ms: i64,
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();

        let mut current: BTreeMap<&str, &LegacySignal> = BTreeMap::new();
        for signal in signals {
            match current.entry(signal.cluster_uuid.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(signal);
                }
                Entry::Occupied(_) => evaluation.diagnostics.push(Diagnostic::DuplicateSignal {
                    cluster_uuid: signal.cluster_uuid.clone(),
                }),
            }
        }

        let clusters = current
            .keys()
            .copied()
            .chain(previous_states.keys().map(String::as_str))
            .collect::<BTreeSet<_>>();

        for cluster_uuid in clusters {
            let previous = previous_states.get(cluster_uuid);
            let state = match current.get(cluster_uuid) {
                Some(signal) => {
                    self.apply_signal(signal, identities, previous, now_ms, &mut evaluation)
                }
                None => previous.map(|previous| carry_forward(previous, identities, now_ms)),
            };

            if let Some(state) = state {
                evaluation.new_states.insert(cluster_uuid.to_string(), state);
            }
        }

        evaluation
    }

    fn apply_signal(
        &self,
        signal: &LegacySignal,
        identities: &HashMap<String, ClusterIdentity>,
        previous: Option<&ClusterAlertState>,
        now_ms: i64,
        evaluation: &mut Evaluation,
    ) -> Option<ClusterAlertState> {
        let cluster = resolve_identity(signal, identities, previous, evaluation);

        match signal.resolved_at_ms {
            None => self.fire(signal, cluster, previous, now_ms, evaluation),
            Some(resolved_at_ms) => Some(self.resolve(
                signal,
                cluster,
                previous,
                resolved_at_ms,
                now_ms,
                evaluation,
            )),
        }
    }

    fn fire(
        &self,
        signal: &LegacySignal,
        cluster: ClusterIdentity,
        previous: Option<&ClusterAlertState>,
        now_ms: i64,
        evaluation: &mut Evaluation,
    ) -> Option<ClusterAlertState> {
        let recommendation = signal.recommendation_text.as_str();
        let health = match self.health.label_for(signal.severity_score) {
            Some(_) if recommendation.trim().is_empty() => Err(RejectReason::EmptyRecommendation),
            Some(health) => Ok(health),
            None => Err(RejectReason::SeverityBelowThresholds {
                severity_score: signal.severity_score,
            }),
        };
        let health = match health {
            Ok(health) => health,
            Err(reason) => {
                evaluation.diagnostics.push(Diagnostic::RejectedSignal {
                    cluster_uuid: signal.cluster_uuid.clone(),
                    reason,
                });
                return previous.cloned();
            }
        };

        let triggered_at_ms = match previous {
            Some(previous) if previous.is_firing => previous.triggered_at_ms.or(Some(now_ms)),
            _ => Some(now_ms),
        };

        evaluation.notifications.push(firing_payload(
            &self.definition,
            &cluster.cluster_uuid,
            &cluster.cluster_name,
            health,
            recommendation,
        ));

        Some(ClusterAlertState {
            cluster,
            ccs: signal.ccs.clone(),
            is_firing: true,
            message: firing_message(&self.definition, health, recommendation),
            severity: self.definition.severity_label().to_string(),
            resolved_at_ms: None,
            triggered_at_ms,
            last_checked_at_ms: now_ms,
        })
    }

    fn resolve(
        &self,
        signal: &LegacySignal,
        cluster: ClusterIdentity,
        previous: Option<&ClusterAlertState>,
        resolved_at_ms: i64,
        now_ms: i64,
        evaluation: &mut Evaluation,
    ) -> ClusterAlertState {
        let was_firing = previous.is_some_and(|previous| previous.is_firing);
        if was_firing {
            let health = self
                .health
                .label_for(signal.severity_score)
                .unwrap_or(self.definition.resolved_health());
            evaluation.notifications.push(resolved_payload(
                &self.definition,
                &cluster.cluster_uuid,
                &cluster.cluster_name,
                health,
            ));
        }

        ClusterAlertState {
            cluster,
            ccs: signal.ccs.clone(),
            is_firing: false,
            message: resolved_message(&self.definition),
            severity: self.definition.severity_label().to_string(),
            resolved_at_ms: Some(resolved_at_ms),
            triggered_at_ms: previous.and_then(|previous| previous.triggered_at_ms),
            last_checked_at_ms: now_ms,
        }
    }
}

fn resolve_identity(
    signal: &LegacySignal,
    identities: &HashMap<String, ClusterIdentity>,
    previous: Option<&ClusterAlertState>,
    evaluation: &mut Evaluation,
) -> ClusterIdentity {
    if let Some(identity) = identities.get(&signal.cluster_uuid) {
        return identity.clone();
    }

    evaluation.diagnostics.push(Diagnostic::MissingIdentity {
        cluster_uuid: signal.cluster_uuid.clone(),
    });

    previous
        .map(|previous| previous.cluster.clone())
        .unwrap_or_else(|| ClusterIdentity {
            cluster_uuid: signal.cluster_uuid.clone(),
            cluster_name: signal.cluster_uuid.clone(),
        })
}

fn carry_forward(
    previous: &ClusterAlertState,
    identities: &HashMap<String, ClusterIdentity>,
    now_ms: i64,
) -> ClusterAlertState {
    let mut state = previous.clone();
    if let Some(identity) = identities.get(&previous.cluster.cluster_uuid) {
        state.cluster = identity.clone();
    }
    state.last_checked_at_ms = now_ms;
    state
}

#[cfg(test)]
mod tests;
