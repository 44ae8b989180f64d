//! Passive support roles.
//!
//! These roles are part of the registered roster so the rest of the system
//! can address them, but none of them has automated behavior yet: requests
//! are acknowledged in the log and dropped, results are logged.

use async_trait::async_trait;
use tracing::info;

use crate::runtime::{Agent, AgentContext, AgentId, AgentResult, Capability, Message, Payload};

use super::roles;

/// One reusable agent type covering every passive role.
pub struct SupportAgent {
    id: AgentId,
    capabilities: Vec<Capability>,
}

impl SupportAgent {
    pub fn new(id: impl Into<AgentId>, capabilities: Vec<Capability>) -> Self {
        Self {
            id: id.into(),
            capabilities,
        }
    }
}

#[async_trait]
impl Agent for SupportAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    async fn on_message(&mut self, message: Message, _ctx: &AgentContext) -> AgentResult<()> {
        let Message {
            sender, payload, ..
        } = message;
        match payload {
            Payload::Request { task, .. } => {
                info!(
                    agent = %self.id,
                    sender = %sender,
                    task = %task,
                    "Task received, no automated behavior attached yet"
                );
            }
            Payload::Result { task_id, .. } => {
                info!(agent = %self.id, sender = %sender, task_id = ?task_id, "Result received");
            }
        }
        Ok(())
    }
}

/// The ten support roles registered at boot, with the capabilities they
/// advertise.
pub fn roster() -> Vec<SupportAgent> {
    use Capability::*;

    vec![
        SupportAgent::new(
            roles::RISK_SAFETY,
            vec![Analysis, ExecutionManagement, RegulatoryCompliance],
        ),
        SupportAgent::new(
            roles::QUALITY_ASSURANCE,
            vec![Analysis, ExecutionManagement, Visualization],
        ),
        SupportAgent::new(roles::DATA_INTEGRATION, vec![Integration, Analysis]),
        SupportAgent::new(roles::LEARNING_ADAPTATION, vec![Learning, Analysis, Planning]),
        SupportAgent::new(roles::SUSTAINABILITY, vec![Design, Analysis, Sustainability]),
        SupportAgent::new(roles::FINANCIAL_INVESTMENT, vec![Analysis, Finance]),
        SupportAgent::new(
            roles::LEGAL_CONTRACT,
            vec![Analysis, Legal, RegulatoryCompliance],
        ),
        SupportAgent::new(
            roles::WORKFORCE_HR,
            vec![ExecutionManagement, Planning, HumanResources],
        ),
        SupportAgent::new(
            roles::FACILITY_MANAGEMENT,
            vec![ExecutionManagement, Analysis, PostConstruction],
        ),
        SupportAgent::new(
            roles::PUBLIC_RELATIONS,
            vec![HumanInteraction, PublicRelations, NaturalLanguageProcessing],
        ),
    ]
}
