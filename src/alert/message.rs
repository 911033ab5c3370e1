use super::definition::AlertDefinition;
use super::model::{
    AlertMessage, LINK_END_TOKEN, LINK_START_TOKEN, LinkToken, NextStep, NotificationPayload,
    NotificationState, TokenType,
};

pub(super) fn firing_message(
    definition: &AlertDefinition,
    health: &str,
    recommendation: &str,
) -> AlertMessage {
    AlertMessage {
        text: health_sentence(definition, health),
        next_steps: vec![NextStep {
            text: format!(
                "{} {}{}{}",
                recommendation, LINK_START_TOKEN, definition.link_text, LINK_END_TOKEN
            ),
            tokens: vec![LinkToken {
                start_token: LINK_START_TOKEN.to_string(),
                end_token: LINK_END_TOKEN.to_string(),
                token_type: TokenType::Link,
                url: definition.link_route.clone(),
            }],
        }],
    }
}

pub(super) fn resolved_message(definition: &AlertDefinition) -> AlertMessage {
    AlertMessage {
        text: health_sentence(definition, definition.resolved_health()),
        next_steps: Vec::new(),
    }
}

pub(super) fn firing_payload(
    definition: &AlertDefinition,
    cluster_uuid: &str,
    cluster_name: &str,
    health: &str,
    recommendation: &str,
) -> NotificationPayload {
    let action = markdown_link(recommendation, &definition.link_route);
    let lead = format!(
        "{} alert is firing for {}. Current health is {}.",
        definition.label(),
        cluster_name,
        health
    );

    NotificationPayload {
        action_group: definition.action_group().to_string(),
        cluster_uuid: cluster_uuid.to_string(),
        cluster_name: cluster_name.to_string(),
        cluster_health: health.to_string(),
        state: NotificationState::Firing,
        internal_short_message: format!("{} {}", lead, recommendation),
        internal_full_message: format!("{} {}", lead, action),
        action: Some(action),
        action_plain: Some(recommendation.to_string()),
    }
}

pub(super) fn resolved_payload(
    definition: &AlertDefinition,
    cluster_uuid: &str,
    cluster_name: &str,
    health: &str,
) -> NotificationPayload {
    let message = format!(
        "{} alert is resolved for {}.",
        definition.label(),
        cluster_name
    );

    NotificationPayload {
        action_group: definition.action_group().to_string(),
        cluster_uuid: cluster_uuid.to_string(),
        cluster_name: cluster_name.to_string(),
        cluster_health: health.to_string(),
        state: NotificationState::Resolved,
        internal_short_message: message.clone(),
        internal_full_message: message,
        action: None,
        action_plain: None,
    }
}

fn health_sentence(definition: &AlertDefinition, health: &str) -> String {
    format!("{} cluster health is {}.", definition.product_name, health)
}

fn markdown_link(text: &str, url: &str) -> String {
    format!("[{}]({})", text, url)
}
