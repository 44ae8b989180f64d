//! Cost estimation and procurement planning.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::runtime::{Agent, AgentContext, AgentId, AgentResult, Capability, Message, Payload};

use super::{roles, tasks};

const CAPABILITIES: &[Capability] = &[
    Capability::Analysis,
    Capability::ExecutionManagement,
    Capability::Finance,
];

const BASE_COST_USD: u64 = 650_000;
const COST_SPREAD_USD: u64 = 50_000;

/// Derives a cost estimate and procurement plan from the design bundle and
/// feeds both back to project management for plan integration.
pub struct CostSupplyChainAgent {
    id: AgentId,
}

impl CostSupplyChainAgent {
    pub fn new() -> Self {
        Self {
            id: roles::COST_SUPPLY_CHAIN.into(),
        }
    }

    fn estimate_costs(&self, data: Value, original_sender: Option<AgentId>, ctx: &AgentContext) {
        let project_id = data
            .get("project_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        info!(agent = %self.id, project_id = %project_id, "Estimating project costs");

        let total = BASE_COST_USD + cost_variation(&project_id);
        let cost_estimate = json!({
            "project_id": project_id,
            "estimated_total_cost_usd": total,
            "cost_breakdown": {
                "materials": 300_000,
                "labor": 250_000,
                "equipment_rental": 50_000,
                "contingency": 50_000,
                "permits_fees": 15_000,
            },
            "procurement_strategy": "Prioritize local suppliers for sustainability, establish framework agreements for bulk materials, pre-order long-lead items.",
            "cost_optimization_notes": "Explore alternative modular construction methods for interior elements. Review structural material options for cost efficiency.",
            "status": "cost_estimation_complete",
        });

        ctx.send_result(
            roles::CLIENT_ENGAGEMENT,
            json!({
                "message": format!("Cost estimate and procurement plan drafted for {project_id}."),
                "estimated_cost": total,
            }),
            Some("cost_estimation_complete".into()),
        );

        ctx.send_task(
            roles::PROJECT_MANAGEMENT,
            tasks::PLAN_INTEGRATION,
            json!({
                "project_id": project_id,
                "cost_estimate": cost_estimate,
            }),
            original_sender,
        );
    }
}

impl Default for CostSupplyChainAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for CostSupplyChainAgent {
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
                    tasks::COST_ESTIMATION => self.estimate_costs(data, original_sender, ctx),
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

/// Stand-in for a quantity take-off: the same project id always prices the
/// same, different ids spread over a 50k band.
fn cost_variation(project_id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    project_id.hash(&mut hasher);
    hasher.finish() % COST_SPREAD_USD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_is_deterministic_and_bounded() {
        let first = cost_variation("proj-1234abcd");
        let again = cost_variation("proj-1234abcd");
        let other = cost_variation("proj-5678efgh");

        assert_eq!(first, again);
        assert!(first < COST_SPREAD_USD);
        assert!(other < COST_SPREAD_USD);
    }
}
