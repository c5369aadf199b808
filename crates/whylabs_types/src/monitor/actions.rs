use crate::error::TypeError;
use crate::util::{check_length, check_reference_id};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An action registered at the organization level, referenced by id
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GlobalAction {
    pub target: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EmailRecipient {
    pub id: String,
    pub destination: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SlackWebhook {
    pub id: String,
    pub destination: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PagerDuty {
    pub id: String,
    pub destination: String,
}

/// Where a monitor sends its messages.
///
/// Only [`MonitorAction::Global`] is accepted by the platform. The other
/// variants are registered as notification actions before saving and then
/// replaced by a global reference with the same id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum MonitorAction {
    #[serde(rename = "global")]
    Global(GlobalAction),
    #[serde(rename = "email")]
    Email(EmailRecipient),
    #[serde(rename = "slack")]
    Slack(SlackWebhook),
    #[serde(rename = "pagerDuty")]
    PagerDuty(PagerDuty),
}

impl MonitorAction {
    pub fn global(target: &str) -> Self {
        MonitorAction::Global(GlobalAction {
            target: target.to_string(),
        })
    }

    pub fn email(id: &str, destination: &str) -> Self {
        MonitorAction::Email(EmailRecipient {
            id: id.to_string(),
            destination: destination.to_string(),
        })
    }

    pub fn slack(id: &str, destination: &str) -> Self {
        MonitorAction::Slack(SlackWebhook {
            id: id.to_string(),
            destination: destination.to_string(),
        })
    }

    pub fn pager_duty(id: &str, destination: &str) -> Self {
        MonitorAction::PagerDuty(PagerDuty {
            id: id.to_string(),
            destination: destination.to_string(),
        })
    }

    /// The id of the globally registered action this resolves to
    pub fn id(&self) -> &str {
        match self {
            MonitorAction::Global(action) => &action.target,
            MonitorAction::Email(action) => &action.id,
            MonitorAction::Slack(action) => &action.id,
            MonitorAction::PagerDuty(action) => &action.id,
        }
    }

    /// Notification type and destination for actions that must be registered first
    pub fn registration(&self) -> Option<(NotificationActionType, &str)> {
        match self {
            MonitorAction::Global(_) => None,
            MonitorAction::Email(action) => {
                Some((NotificationActionType::Email, action.destination.as_str()))
            }
            MonitorAction::Slack(action) => {
                Some((NotificationActionType::Slack, action.destination.as_str()))
            }
            MonitorAction::PagerDuty(action) => {
                Some((NotificationActionType::PagerDuty, action.destination.as_str()))
            }
        }
    }

    pub fn to_global(&self) -> Self {
        MonitorAction::global(self.id())
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        check_reference_id("monitor.actions.id", self.id())?;
        if let Some((_, destination)) = self.registration() {
            check_length("monitor.actions.destination", destination, 1, 1000)?;
        }
        Ok(())
    }
}

/// Notification action types understood by the notification settings API
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationActionType {
    Email,
    Slack,
    PagerDuty,
}

impl NotificationActionType {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationActionType::Email => "EMAIL",
            NotificationActionType::Slack => "SLACK",
            NotificationActionType::PagerDuty => "PAGER_DUTY",
        }
    }

    /// Key under which the destination is sent when registering the action
    pub fn payload_key(&self) -> &str {
        match self {
            NotificationActionType::Email => "email",
            NotificationActionType::Slack => "slackWebhook",
            NotificationActionType::PagerDuty => "pagerDutyKey",
        }
    }
}

impl Display for NotificationActionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification action as listed by the notification settings API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NotificationAction {
    pub id: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}
