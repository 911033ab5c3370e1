use crate::config::AlertSettings;

pub const ALERT_CLUSTER_HEALTH: &str = "monitoring_alert_cluster_health";
pub const DEFAULT_ACTION_GROUP: &str = "default";

const LABEL: &str = "Cluster health";
const SEVERITY_LABEL: &str = "danger";
const DEFAULT_THROTTLE: &str = "1d";
const RESOLVED_HEALTH: &str = "green";

const ACTION_VARIABLES: [(&str, &str); 7] = [
    ("clusterHealth", "The health of the cluster."),
    (
        "internalShortMessage",
        "The short internal message generated by Elastic.",
    ),
    (
        "internalFullMessage",
        "The full internal message generated by Elastic.",
    ),
    ("state", "The current state of the alert."),
    ("clusterName", "The cluster to which the nodes belong."),
    ("action", "The recommended action for this alert."),
    (
        "actionPlain",
        "The recommended action for this alert, without any markdown.",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionVariable {
    pub name: &'static str,
    pub description: &'static str,
}

/// Static metadata of the cluster health alert kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDefinition {
    pub product_name: String,
    pub link_route: String,
    pub link_text: String,
}

impl AlertDefinition {
    pub fn from_settings(settings: &AlertSettings) -> Self {
        Self {
            product_name: settings.product_name.clone(),
            link_route: settings.link_route.clone(),
            link_text: settings.link_text.clone(),
        }
    }

    pub fn alert_type(&self) -> &'static str {
        ALERT_CLUSTER_HEALTH
    }

    pub fn label(&self) -> &'static str {
        LABEL
    }

    pub fn severity_label(&self) -> &'static str {
        SEVERITY_LABEL
    }

    pub fn default_throttle(&self) -> &'static str {
        DEFAULT_THROTTLE
    }

    pub fn action_group(&self) -> &'static str {
        DEFAULT_ACTION_GROUP
    }

    pub fn resolved_health(&self) -> &'static str {
        RESOLVED_HEALTH
    }

    pub fn action_variables(&self) -> Vec<ActionVariable> {
        ACTION_VARIABLES
            .iter()
            .map(|&(name, description)| ActionVariable { name, description })
            .collect()
    }
}

impl Default for AlertDefinition {
    fn default() -> Self {
        Self::from_settings(&AlertSettings::default())
    }
}
