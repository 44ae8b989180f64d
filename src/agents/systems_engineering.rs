//! Preliminary structural and MEP design.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::runtime::{Agent, AgentContext, AgentId, AgentResult, Capability, Message, Payload};

use super::{roles, tasks};

const CAPABILITIES: &[Capability] = &[Capability::Design, Capability::Analysis];

/// Produces the preliminary structural and MEP (mechanical, electrical,
/// plumbing) design package. The engineering itself is canned; a production
/// deployment would run load calculations and systems modeling here.
pub struct SystemsEngineeringAgent {
    id: AgentId,
}

impl SystemsEngineeringAgent {
    pub fn new() -> Self {
        Self {
            id: roles::SYSTEMS_ENGINEERING.into(),
        }
    }

    fn design_systems(&self, data: Value, original_sender: Option<AgentId>, ctx: &AgentContext) {
        let project_id = data
            .get("project_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let architectural_concept = data
            .get("architectural_concept")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let site_report = data.get("site_report").cloned().unwrap_or_else(|| json!({}));

        info!(agent = %self.id, project_id = %project_id, "Drafting structural and MEP designs");

        let system_design = json!({
            "project_id": project_id,
            "structural_design_status": "preliminary_complete",
            "mep_design_status": "preliminary_complete",
            "structural_notes": "Reinforced concrete, seismic considerations applied based on site analysis.",
            "mep_notes": "Energy-efficient HVAC, smart lighting system proposed, considering energy regulations.",
            "design_conflicts_detected": false,
        });

        ctx.send_result(
            roles::CLIENT_ENGAGEMENT,
            json!({
                "message": format!("Structural and MEP preliminary designs complete for {project_id}."),
                "details": system_design.clone(),
            }),
            Some("systems_engineering_complete".into()),
        );

        ctx.send_task(
            roles::EXPERIENTIAL_DESIGN,
            tasks::EXPERIENTIAL_DESIGN,
            json!({
                "project_id": project_id,
                "system_design": system_design,
                "architectural_concept": architectural_concept,
                "site_report": site_report,
            }),
            original_sender,
        );
    }
}

impl Default for SystemsEngineeringAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for SystemsEngineeringAgent {
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
            Payload::Request {
                task,
                data,
                original_sender,
            } => {
                match task.as_str() {
                    tasks::SYSTEMS_DESIGN => self.design_systems(data, original_sender, ctx),
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
