use std::{collections::HashMap, time::Duration};

use thiserror::Error;

use crate::alert::{AlertEvaluator, ClusterIdentity, Diagnostic, LegacySignal};
use crate::config::MonitorSettings;
use crate::state_store::{StateStore, StateStoreError};

use super::super::{
    provider::{ClusterIdentitySource, MonitorError, SignalSource},
    sink::NotificationSink,
};

#[derive(Debug, Error)]
pub enum TickError {
    #[error("cluster source unavailable: {0}")]
    Source(#[from] MonitorError),
    #[error("failed to load previous alert states: {0}")]
    StateLoad(#[source] StateStoreError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub clusters_checked: usize,
    pub signals_received: usize,
    pub signals_dropped: usize,
    pub states_written: usize,
    pub firing: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    pub state_persisted: bool,
}

/// Runs one evaluation cycle: fetch clusters and signals, evaluate against the
/// stored states, persist the result and hand notifications to the sink.
pub async fn run_tick_at<S, St, N>(
    evaluator: &AlertEvaluator,
    settings: &MonitorSettings,
    source: &mut S,
    state_store: &St,
    sink: &mut N,
    now_ms: i64,
) -> Result<TickReport, TickError>
where
    S: SignalSource + ClusterIdentitySource,
    St: StateStore,
    N: NotificationSink,
{
    let alert_type = evaluator.definition().alert_type();

    let clusters = source.fetch_clusters().await?;
    let cluster_uuids = clusters
        .iter()
        .map(|cluster| cluster.cluster_uuid.clone())
        .collect::<Vec<_>>();
    let raw_signals = source
        .fetch_signals(&cluster_uuids, Duration::from_secs(settings.lookback_secs))
        .await?;

    let mut report = TickReport {
        clusters_checked: clusters.len(),
        signals_received: raw_signals.len(),
        ..TickReport::default()
    };

    let signals = raw_signals
        .into_iter()
        .filter_map(|raw| match LegacySignal::try_from(raw) {
            Ok(signal) => Some(signal),
            Err(error) => {
                log::warn!("legacy_signal_dropped alert_type={} reason={}", alert_type, error);
                None
            }
        })
        .collect::<Vec<_>>();
    report.signals_dropped = report.signals_received - signals.len();

    let identities = clusters
        .into_iter()
        .map(|cluster| (cluster.cluster_uuid.clone(), cluster))
        .collect::<HashMap<String, ClusterIdentity>>();

    let previous_states = state_store
        .load_states(alert_type)
        .map_err(TickError::StateLoad)?;

    let evaluation = evaluator.evaluate(&signals, &identities, &previous_states, now_ms);
    log_diagnostics(alert_type, &evaluation.diagnostics);

    report.states_written = evaluation.new_states.len();
    report.firing = evaluation
        .new_states
        .values()
        .filter(|state| state.is_firing)
        .count();

    tracing::info!(
        target: "monitor",
        module = "monitor",
        alert_type,
        now_ms,
        clusters = report.clusters_checked,
        signals = signals.len(),
        signals_dropped = report.signals_dropped,
        states = report.states_written,
        firing = report.firing,
        notifications = evaluation.notifications.len(),
        diagnostics = evaluation.diagnostics.len(),
        "alert_tick_evaluated"
    );

    match state_store.persist_states(alert_type, &evaluation.new_states) {
        Ok(()) => report.state_persisted = true,
        Err(error) => {
            log::error!(
                "CRITICAL: failed to persist alert states alert_type={} error={}",
                alert_type,
                error
            );
        }
    }

    for notification in &evaluation.notifications {
        match sink.deliver(notification).await {
            Ok(()) => report.notifications_sent += 1,
            Err(error) => {
                report.notifications_failed += 1;
                log::error!(
                    "notification_delivery_failed alert_type={} cluster_uuid={} state={} error={}",
                    alert_type,
                    notification.cluster_uuid,
                    notification.state.as_str(),
                    error
                );
            }
        }
    }

    Ok(report)
}

fn log_diagnostics(alert_type: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match diagnostic {
            Diagnostic::MissingIdentity { cluster_uuid } => log::warn!(
                "cluster_identity_missing alert_type={} cluster_uuid={}",
                alert_type,
                cluster_uuid
            ),
            Diagnostic::RejectedSignal {
                cluster_uuid,
                reason,
            } => log::warn!(
                "legacy_signal_rejected alert_type={} cluster_uuid={} reason={}",
                alert_type,
                cluster_uuid,
                reason
            ),
            Diagnostic::DuplicateSignal { cluster_uuid } => log::warn!(
                "legacy_signal_duplicate alert_type={} cluster_uuid={}",
                alert_type,
                cluster_uuid
            ),
        }
    }
}
