//! Mock tool execution layer.
//!
//! A closed set of actions behind one executor. The decision engine never
//! calls this itself: plans are proposals, and the caller runs approved
//! steps through here as a separate act. All implementations are simulated.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Closed set of executable actions. New actions are added here, not looked
/// up by reflection, so the automation surface stays auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolAction {
    RestartSystem,
    ResetPassword,
    CheckBackupStatus,
    CollectLogs,
}

impl ToolAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RestartSystem => "restart_system",
            Self::ResetPassword => "reset_password",
            Self::CheckBackupStatus => "check_backup_status",
            Self::CollectLogs => "collect_logs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "restart_system" => Some(Self::RestartSystem),
            "reset_password" => Some(Self::ResetPassword),
            "check_backup_status" => Some(Self::CheckBackupStatus),
            "collect_logs" => Some(Self::CollectLogs),
            _ => None,
        }
    }

    pub fn all() -> &'static [ToolAction] {
        &[
            Self::RestartSystem,
            Self::ResetPassword,
            Self::CheckBackupStatus,
            Self::CollectLogs,
        ]
    }
}

/// Result of executing one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: String,
    pub success: bool,
    pub details: String,
    pub metadata: Value,
}

#[derive(Debug, Default)]
pub struct ToolExecutor;

impl ToolExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute a named action against a context object. Unknown names are a
    /// failed outcome, not an error.
    pub fn execute(&self, action_name: &str, context: &Value) -> ActionOutcome {
        let action = match ToolAction::from_name(action_name) {
            Some(a) => a,
            None => {
                return ActionOutcome {
                    action: action_name.to_string(),
                    success: false,
                    details: format!("Unknown action '{}'", action_name),
                    metadata: json!({}),
                }
            }
        };

        let timestamp = Utc::now().to_rfc3339();
        match action {
            ToolAction::RestartSystem => {
                let target = str_field(context, "target", "unknown-host");
                ActionOutcome {
                    action: action.as_str().to_string(),
                    success: true,
                    details: format!("Simulated restart of system '{}'. No real system was harmed.", target),
                    metadata: json!({"timestamp": timestamp}),
                }
            }
            ToolAction::ResetPassword => {
                let username = str_field(context, "username", "unknown-user");
                ActionOutcome {
                    action: action.as_str().to_string(),
                    success: true,
                    details: format!(
                        "Simulated password reset for '{}' with a temporary password.",
                        username
                    ),
                    metadata: json!({
                        "timestamp": timestamp,
                        "temporary_password": "Temp#1234",
                    }),
                }
            }
            ToolAction::CheckBackupStatus => {
                let job = str_field(context, "backup_job", "default-backup-job");
                ActionOutcome {
                    action: action.as_str().to_string(),
                    success: true,
                    details: format!(
                        "Simulated check of backup job '{}'. Last run reported SUCCESS.",
                        job
                    ),
                    metadata: json!({"timestamp": timestamp, "last_status": "SUCCESS"}),
                }
            }
            ToolAction::CollectLogs => {
                let target = str_field(context, "target", "unknown-host");
                ActionOutcome {
                    action: action.as_str().to_string(),
                    success: true,
                    details: format!("Simulated log collection from '{}'.", target),
                    metadata: json!({"timestamp": timestamp, "archive": "logs.tar.gz"}),
                }
            }
        }
    }

    pub fn list_actions(&self) -> Vec<&'static str> {
        ToolAction::all().iter().map(|a| a.as_str()).collect()
    }
}

fn str_field<'a>(context: &'a Value, key: &str, default: &'a str) -> &'a str {
    context.get(key).and_then(Value::as_str).unwrap_or(default)
}
