//! Project planning and orchestration.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::runtime::{Agent, AgentContext, AgentId, AgentResult, Capability, Message, Payload};

use super::{roles, tasks};

const CAPABILITIES: &[Capability] = &[
    Capability::ExecutionManagement,
    Capability::Planning,
    Capability::Integration,
];

/// Orchestrates the planning leg of the workflow in two turns: first it
/// requests a cost estimate for the consolidated design bundle, then (once
/// the estimate comes back as a new task) it drafts the master plan and
/// hands it over for client presentation.
pub struct ProjectManagementAgent {
    id: AgentId,
}

impl ProjectManagementAgent {
    pub fn new() -> Self {
        Self {
            id: roles::PROJECT_MANAGEMENT.into(),
        }
    }

    fn start_planning(&self, data: Value, original_sender: Option<AgentId>, ctx: &AgentContext) {
        let project_id = data
            .get("project_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let final_design_bundle = data
            .get("final_design_bundle")
            .cloned()
            .unwrap_or_else(|| json!({}));

        info!(agent = %self.id, project_id = %project_id, "Kicking off planning, requesting cost estimate");

        ctx.send_task(
            roles::COST_SUPPLY_CHAIN,
            tasks::COST_ESTIMATION,
            json!({
                "project_id": project_id,
                "final_design_bundle": final_design_bundle,
            }),
            original_sender,
        );
    }

    fn integrate_costs(&self, data: Value, original_sender: Option<AgentId>, ctx: &AgentContext) {
        let project_id = data
            .get("project_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let cost_estimate = data.get("cost_estimate").cloned().unwrap_or_else(|| json!({}));
        let budget = cost_estimate
            .get("estimated_total_cost_usd")
            .cloned()
            .unwrap_or(Value::Null);

        info!(agent = %self.id, project_id = %project_id, "Incorporating cost data into master plan");

        let master_plan = json!({
            "project_id": project_id,
            "status": "master_plan_drafted",
            "budget": budget,
            "timeline_weeks": 52,
            "key_milestones": [
                "Foundation Poured",
                "Structural Frame Complete",
                "MEP Installation Begin",
                "Exterior Cladding Done",
                "Interior Finishes Complete",
                "Final Inspection",
                "Client Handover",
            ],
            "resource_allocation_notes": "Initial draft based on cost estimate and design complexity. Detailed resource planning to follow client approval.",
            "risks_identified": [
                "Budget overrun (high material cost volatility)",
                "Supply chain delays (global logistics issues)",
                "Weather impacts (seasonal delays)",
                "Permitting delays",
            ],
            "next_step": "Present master project plan to client for approval and initiate procurement of long-lead items.",
        });

        ctx.send_result(
            roles::CLIENT_ENGAGEMENT,
            json!({
                "message": format!(
                    "Master project plan drafted for {project_id}. Budget: ${}",
                    master_plan["budget"]
                ),
                "plan_summary": master_plan.clone(),
            }),
            Some("master_plan_drafted".into()),
        );

        ctx.send_task(
            roles::HUMAN_COLLABORATION,
            tasks::CLIENT_PRESENTATION,
            json!({
                "project_id": project_id,
                "master_plan": master_plan,
            }),
            original_sender,
        );
    }
}

impl Default for ProjectManagementAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ProjectManagementAgent {
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
                    tasks::MASTER_PLANNING => self.start_planning(data, original_sender, ctx),
                    tasks::PLAN_INTEGRATION => self.integrate_costs(data, original_sender, ctx),
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
