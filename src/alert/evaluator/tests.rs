use std::collections::{BTreeMap, HashMap};

use crate::alert::{
    AlertDefinition, AlertEvaluator, ClusterAlertState, ClusterIdentity, Diagnostic, HealthTable,
    HealthThreshold, LegacySignal, NotificationState, RejectReason, TokenType,
};

const CLUSTER_UUID: &str = "abc123";
const CLUSTER_NAME: &str = "testCluster";

fn evaluator() -> AlertEvaluator {
    let table = HealthTable::new(vec![
        HealthThreshold {
            min_score: 2100,
            label: "red".to_string(),
        },
        HealthThreshold {
            min_score: 1000,
            label: "yellow".to_string(),
        },
    ])
    .expect("table should build");
    AlertEvaluator::new(AlertDefinition::default(), table)
}

fn identities() -> HashMap<String, ClusterIdentity> {
    HashMap::from([(
        CLUSTER_UUID.to_string(),
        ClusterIdentity {
            cluster_uuid: CLUSTER_UUID.to_string(),
            cluster_name: CLUSTER_NAME.to_string(),
        },
    )])
}

fn yellow_signal() -> LegacySignal {
    LegacySignal {
        cluster_uuid: CLUSTER_UUID.to_string(),
        severity_score: 2000,
        prefix_text: "Elasticsearch cluster status is yellow.".to_string(),
        recommendation_text: "Allocate missing replica shards.".to_string(),
        resolved_at_ms: None,
        ccs: None,
    }
}

fn resolved_signal(resolved_at_ms: i64) -> LegacySignal {
    LegacySignal {
        resolved_at_ms: Some(resolved_at_ms),
        ..yellow_signal()
    }
}

fn fire_once(evaluator: &AlertEvaluator, now_ms: i64) -> BTreeMap<String, ClusterAlertState> {
    evaluator
        .evaluate(&[yellow_signal()], &identities(), &BTreeMap::new(), now_ms)
        .new_states
}

#[test]
fn no_signals_and_no_state_is_a_no_op() {
    let evaluation = evaluator().evaluate(&[], &identities(), &BTreeMap::new(), 1);

    assert!(evaluation.new_states.is_empty());
    assert!(evaluation.notifications.is_empty());
    assert!(evaluation.diagnostics.is_empty());
}

#[test]
fn fires_with_rendered_message_and_payload() {
    let evaluation = evaluator().evaluate(&[yellow_signal()], &identities(), &BTreeMap::new(), 1);

    let state = evaluation
        .new_states
        .get(CLUSTER_UUID)
        .expect("state should be written");
    assert!(state.is_firing);
    assert_eq!(state.cluster.cluster_name, CLUSTER_NAME);
    assert_eq!(state.severity, "danger");
    assert_eq!(state.triggered_at_ms, Some(1));
    assert_eq!(state.last_checked_at_ms, 1);
    assert_eq!(state.resolved_at_ms, None);
    assert_eq!(state.message.text, "Elasticsearch cluster health is yellow.");
    assert_eq!(
        state.message.next_steps[0].text,
        "Allocate missing replica shards. #start_linkView now#end_link"
    );
    let token = &state.message.next_steps[0].tokens[0];
    assert_eq!(token.start_token, "#start_link");
    assert_eq!(token.end_token, "#end_link");
    assert_eq!(token.token_type, TokenType::Link);
    assert_eq!(token.url, "elasticsearch/indices");

    assert_eq!(evaluation.notifications.len(), 1);
    let payload = &evaluation.notifications[0];
    assert_eq!(payload.state, NotificationState::Firing);
    assert_eq!(payload.action_group, "default");
    assert_eq!(payload.cluster_name, CLUSTER_NAME);
    assert_eq!(payload.cluster_health, "yellow");
    assert_eq!(
        payload.action.as_deref(),
        Some("[Allocate missing replica shards.](elasticsearch/indices)")
    );
    assert_eq!(
        payload.action_plain.as_deref(),
        Some("Allocate missing replica shards.")
    );
    assert_eq!(
        payload.internal_short_message,
        "Cluster health alert is firing for testCluster. Current health is yellow. Allocate missing replica shards."
    );
    assert_eq!(
        payload.internal_full_message,
        "Cluster health alert is firing for testCluster. Current health is yellow. [Allocate missing replica shards.](elasticsearch/indices)"
    );
}

#[test]
fn steady_firing_keeps_trigger_time_and_renotifies() {
    let evaluator = evaluator();
    let previous = fire_once(&evaluator, 1);

    let evaluation = evaluator.evaluate(&[yellow_signal()], &identities(), &previous, 60_001);

    let state = &evaluation.new_states[CLUSTER_UUID];
    assert!(state.is_firing);
    assert_eq!(state.triggered_at_ms, Some(1));
    assert_eq!(state.last_checked_at_ms, 60_001);
    assert_eq!(evaluation.notifications.len(), 1);
    assert_eq!(evaluation.notifications[0].state, NotificationState::Firing);
}

#[test]
fn resolves_previously_firing_cluster_once() {
    let evaluator = evaluator();
    let previous = fire_once(&evaluator, 1);

    let evaluation = evaluator.evaluate(&[resolved_signal(1)], &identities(), &previous, 1);

    let state = &evaluation.new_states[CLUSTER_UUID];
    assert!(!state.is_firing);
    assert_eq!(state.resolved_at_ms, Some(1));
    assert_eq!(state.triggered_at_ms, Some(1));
    assert_eq!(state.message.text, "Elasticsearch cluster health is green.");
    assert!(state.message.next_steps.is_empty());

    assert_eq!(evaluation.notifications.len(), 1);
    let payload = &evaluation.notifications[0];
    assert_eq!(payload.state, NotificationState::Resolved);
    assert_eq!(payload.cluster_health, "yellow");
    assert_eq!(
        payload.internal_short_message,
        "Cluster health alert is resolved for testCluster."
    );
    assert_eq!(payload.internal_full_message, payload.internal_short_message);
    assert_eq!(payload.action, None);

    let repeated = evaluator.evaluate(
        &[resolved_signal(1)],
        &identities(),
        &evaluation.new_states,
        2,
    );
    assert!(repeated.notifications.is_empty());
    assert_eq!(repeated.new_states[CLUSTER_UUID].last_checked_at_ms, 2);
    assert!(!repeated.new_states[CLUSTER_UUID].is_firing);
}

#[test]
fn resolved_signal_for_unseen_cluster_records_state_without_notifying() {
    let evaluation =
        evaluator().evaluate(&[resolved_signal(5)], &identities(), &BTreeMap::new(), 10);

    let state = &evaluation.new_states[CLUSTER_UUID];
    assert!(!state.is_firing);
    assert_eq!(state.resolved_at_ms, Some(5));
    assert_eq!(state.triggered_at_ms, None);
    assert!(evaluation.notifications.is_empty());
}

#[test]
fn refiring_after_resolution_restarts_trigger_time() {
    let evaluator = evaluator();
    let fired = fire_once(&evaluator, 1);
    let resolved = evaluator
        .evaluate(&[resolved_signal(2)], &identities(), &fired, 2)
        .new_states;

    let evaluation = evaluator.evaluate(&[yellow_signal()], &identities(), &resolved, 3);

    let state = &evaluation.new_states[CLUSTER_UUID];
    assert!(state.is_firing);
    assert_eq!(state.triggered_at_ms, Some(3));
    assert_eq!(state.resolved_at_ms, None);
}

#[test]
fn missing_signal_carries_state_forward_silently() {
    let evaluator = evaluator();
    let previous = fire_once(&evaluator, 1);

    let evaluation = evaluator.evaluate(&[], &identities(), &previous, 500);

    let state = &evaluation.new_states[CLUSTER_UUID];
    assert!(state.is_firing);
    assert_eq!(state.triggered_at_ms, Some(1));
    assert_eq!(state.last_checked_at_ms, 500);
    assert_eq!(state.message, previous[CLUSTER_UUID].message);
    assert!(evaluation.notifications.is_empty());
}

#[test]
fn unknown_identity_falls_back_to_uuid() {
    let evaluation = evaluator().evaluate(&[yellow_signal()], &HashMap::new(), &BTreeMap::new(), 1);

    let state = &evaluation.new_states[CLUSTER_UUID];
    assert_eq!(state.cluster.cluster_name, CLUSTER_UUID);
    assert_eq!(
        evaluation.notifications[0].internal_short_message,
        "Cluster health alert is firing for abc123. Current health is yellow. Allocate missing replica shards."
    );
    assert_eq!(
        evaluation.diagnostics,
        vec![Diagnostic::MissingIdentity {
            cluster_uuid: CLUSTER_UUID.to_string()
        }]
    );
}

#[test]
fn unknown_identity_prefers_stored_cluster_name() {
    let evaluator = evaluator();
    let previous = fire_once(&evaluator, 1);

    let evaluation = evaluator.evaluate(&[resolved_signal(2)], &HashMap::new(), &previous, 2);

    assert_eq!(evaluation.new_states[CLUSTER_UUID].cluster.cluster_name, CLUSTER_NAME);
    assert_eq!(
        evaluation.notifications[0].internal_short_message,
        "Cluster health alert is resolved for testCluster."
    );
}

#[test]
fn rejected_signal_leaves_state_untouched_and_isolated() {
    let evaluator = evaluator();
    let previous = fire_once(&evaluator, 1);

    let low_severity = LegacySignal {
        severity_score: 10,
        ..yellow_signal()
    };
    let other = LegacySignal {
        cluster_uuid: "def456".to_string(),
        severity_score: 2200,
        ..yellow_signal()
    };

    let evaluation = evaluator.evaluate(&[low_severity, other], &identities(), &previous, 99);

    assert_eq!(evaluation.new_states[CLUSTER_UUID], previous[CLUSTER_UUID]);
    assert!(evaluation.new_states["def456"].is_firing);
    assert_eq!(evaluation.notifications.len(), 1);
    assert_eq!(evaluation.notifications[0].cluster_uuid, "def456");
    assert_eq!(evaluation.notifications[0].cluster_health, "red");
    assert!(evaluation.diagnostics.contains(&Diagnostic::RejectedSignal {
        cluster_uuid: CLUSTER_UUID.to_string(),
        reason: RejectReason::SeverityBelowThresholds { severity_score: 10 },
    }));
}

#[test]
fn empty_recommendation_is_rejected_without_creating_state() {
    let signal = LegacySignal {
        recommendation_text: "  ".to_string(),
        ..yellow_signal()
    };

    let evaluation = evaluator().evaluate(&[signal], &identities(), &BTreeMap::new(), 1);

    assert!(evaluation.new_states.is_empty());
    assert!(evaluation.notifications.is_empty());
    assert_eq!(
        evaluation.diagnostics,
        vec![Diagnostic::RejectedSignal {
            cluster_uuid: CLUSTER_UUID.to_string(),
            reason: RejectReason::EmptyRecommendation,
        }]
    );
}

#[test]
fn first_duplicate_signal_wins() {
    let evaluation = evaluator().evaluate(
        &[yellow_signal(), resolved_signal(1)],
        &identities(),
        &BTreeMap::new(),
        1,
    );

    assert!(evaluation.new_states[CLUSTER_UUID].is_firing);
    assert_eq!(evaluation.notifications.len(), 1);
    assert_eq!(
        evaluation.diagnostics,
        vec![Diagnostic::DuplicateSignal {
            cluster_uuid: CLUSTER_UUID.to_string()
        }]
    );
}

#[test]
fn identical_inputs_produce_identical_evaluations() {
    let evaluator = evaluator();
    let previous = fire_once(&evaluator, 1);
    let signals = [
        resolved_signal(7),
        LegacySignal {
            cluster_uuid: "zzz".to_string(),
            ..yellow_signal()
        },
    ];

    let first = evaluator.evaluate(&signals, &identities(), &previous, 7);
    let second = evaluator.evaluate(&signals, &identities(), &previous, 7);

    assert_eq!(first, second);
    assert_eq!(first.notifications.len(), 2);
    assert_eq!(first.notifications[0].cluster_uuid, CLUSTER_UUID);
    assert_eq!(first.notifications[1].cluster_uuid, "zzz");
}

#[test]
fn ccs_name_is_recorded_on_state() {
    let signal = LegacySignal {
        ccs: Some("remote_a".to_string()),
        ..yellow_signal()
    };

    let evaluation = evaluator().evaluate(&[signal], &identities(), &BTreeMap::new(), 1);

    assert_eq!(
        evaluation.new_states[CLUSTER_UUID].ccs.as_deref(),
        Some("remote_a")
    );
}

#[test]
fn state_serializes_with_persisted_field_names() {
    let states = fire_once(&evaluator(), 1);
    let json = serde_json::to_value(&states[CLUSTER_UUID]).expect("state should serialize");

    assert_eq!(json["cluster"]["clusterUuid"], CLUSTER_UUID);
    assert_eq!(json["cluster"]["clusterName"], CLUSTER_NAME);
    assert_eq!(json["isFiring"], true);
    assert_eq!(json["triggeredAtMs"], 1);
    assert_eq!(json["message"]["text"], "Elasticsearch cluster health is yellow.");

    let decoded: ClusterAlertState =
        serde_json::from_value(json).expect("state should deserialize");
    assert_eq!(decoded, states[CLUSTER_UUID]);
}
