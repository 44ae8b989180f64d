//! Client-facing presentation of the finished plan.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::runtime::{Agent, AgentContext, AgentId, AgentResult, Capability, Message, Payload};

use super::{roles, tasks};

const CAPABILITIES: &[Capability] = &[Capability::HumanInteraction, Capability::Integration];

/// Terminal stage of the pipeline: condenses the master plan into an
/// approval summary for human review and reports it back to the entry
/// agent. A production deployment would push this to a client dashboard or
/// notification channel.
pub struct HumanCollaborationAgent {
    id: AgentId,
}

impl HumanCollaborationAgent {
    pub fn new() -> Self {
        Self {
            id: roles::HUMAN_COLLABORATION.into(),
        }
    }

    fn present_plan(&self, data: Value, ctx: &AgentContext) {
        let project_id = data
            .get("project_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let master_plan = data.get("master_plan").cloned().unwrap_or_else(|| json!({}));
        let timeline_weeks = master_plan
            .get("timeline_weeks")
            .and_then(Value::as_u64)
            .unwrap_or_default();

        info!(agent = %self.id, project_id = %project_id, "Presenting master plan for approval");

        ctx.send_result(
            roles::CLIENT_ENGAGEMENT,
            json!({
                "message": format!("Project '{project_id}' planning complete and ready for client approval."),
                "final_budget_estimate": master_plan.get("budget").cloned().unwrap_or(Value::Null),
                "timeline_overview": format!("{timeline_weeks} weeks"),
                "key_milestones": master_plan.get("key_milestones").cloned().unwrap_or_else(|| json!([])),
                "next_action_for_human": "Review and approve master plan via the client dashboard or your designated communication channel.",
            }),
            Some("master_plan_presented_for_approval".into()),
        );
    }
}

impl Default for HumanCollaborationAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for HumanCollaborationAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }

    async fn on_message(&mut self, message: Message, ctx: &AgentContext) -> AgentResult<()> {
        let Message {
            sender, payload, ..
        } = message;
        match payload {
            Payload::Request { task, data, .. } => {
                match task.as_str() {
                    tasks::CLIENT_PRESENTATION => self.present_plan(data, ctx),
                    other => warn!(agent = %self.id, task = other, "Ignoring unknown task"),
                }
                Ok(())
            }
            Payload::Result { task_id, .. } => {
                info!(agent = %self.id, sender = %sender, task_id = ?task_id, "Result received");
                Ok(())
            }
        }
    }
}
