//! Entry agent for new client inquiries.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::llm::{GenerativeModel, LlmError};
use crate::runtime::{
    Agent, AgentContext, AgentError, AgentId, AgentResult, Capability, Message, Payload,
    ResponseWriter,
};

use super::{roles, tasks};

const CAPABILITIES: &[Capability] = &[
    Capability::HumanInteraction,
    Capability::Planning,
    Capability::RequirementGathering,
    Capability::NaturalLanguageProcessing,
];

/// First agent in the workflow. Parses a raw inquiry with the text model,
/// acknowledges the blocked API caller through the response bridge, then
/// delegates site analysis. It is also where downstream stages report their
/// progress; those results are aggregated into the log.
pub struct ClientEngagementAgent {
    id: AgentId,
    model: Arc<dyn GenerativeModel>,
    responses: ResponseWriter,
}

impl ClientEngagementAgent {
    pub fn new(model: Arc<dyn GenerativeModel>, responses: ResponseWriter) -> Self {
        Self {
            id: roles::CLIENT_ENGAGEMENT.into(),
            model,
            responses,
        }
    }

    /// Handles one intake. Exactly one bridge `put` happens on every path
    /// out of this function, so the caller waiting on the API side always
    /// gets either an acknowledgment or a declared error.
    async fn process_inquiry(
        &self,
        inquiry: Value,
        inquiry_sender: AgentId,
        ctx: &AgentContext,
    ) -> AgentResult<()> {
        let client_name = inquiry
            .get("client_name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(agent = %self.id, client = client_name, "Processing new client inquiry");

        let parsed = match self.parse_requirements(&inquiry).await {
            Ok(parsed) => parsed,
            Err(err) => {
                error!(agent = %self.id, error = %err, "Inquiry processing failed");
                self.responses.put(json!({
                    "status": "error",
                    "agent": self.id.as_str(),
                    "details": format!("Failed to process client inquiry: {err}"),
                }));
                return Err(AgentError::ModelError(err.to_string()));
            }
        };

        self.responses.put(json!({
            "status": "processing_initiated",
            "agent": self.id.as_str(),
            "details": "Client inquiry processed. Initial data extracted. Workflow initiated.",
            "parsed_data": parsed.requirements,
            "clarifications": parsed.clarifications,
            "workflow_suggested": parsed.next_steps,
        }));

        let project_id = mint_project_id();
        info!(agent = %self.id, project_id = %project_id, "Delegating site analysis");
        ctx.send_task(
            roles::SITE_INTELLIGENCE,
            tasks::SITE_ANALYSIS,
            json!({
                "project_id": project_id,
                "location": parsed.requirements.get("location").cloned().unwrap_or(Value::Null),
                "project_type": parsed.requirements.get("project_type").cloned().unwrap_or(Value::Null),
                "initial_requirements": parsed.requirements,
            }),
            Some(inquiry_sender),
        );

        Ok(())
    }

    async fn parse_requirements(&self, inquiry: &Value) -> Result<ParsedInquiry, LlmError> {
        let prompt = format!(
            "Analyze the following construction project inquiry and extract structured \
             requirements. Be precise about 'project_type', 'client_name', 'budget_range', \
             'location', and 'desired_features'. Note any ambiguities that require \
             clarification and suggest immediate next steps for the project lifecycle. \
             Respond with a JSON object with keys 'parsed_requirements', \
             'clarification_needed', 'suggested_next_steps'.\n\nClient inquiry: {inquiry}"
        );
        let raw = self.model.generate_text(&prompt).await?;

        let reply = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(_) => {
                warn!(agent = %self.id, "Model reply was not valid JSON, keeping raw inquiry");
                json!({
                    "parsed_requirements": inquiry,
                    "clarification_needed": "Inquiry could not be parsed automatically, manual review needed.",
                    "suggested_next_steps": "Manual review of client inquiry.",
                })
            }
        };

        Ok(ParsedInquiry {
            requirements: reply
                .get("parsed_requirements")
                .cloned()
                .unwrap_or_else(|| inquiry.clone()),
            clarifications: reply
                .get("clarification_needed")
                .cloned()
                .unwrap_or_else(|| json!("None")),
            next_steps: reply
                .get("suggested_next_steps")
                .cloned()
                .unwrap_or_else(|| json!("Proceed to site analysis.")),
        })
    }
}

#[async_trait]
impl Agent for ClientEngagementAgent {
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
            Payload::Request { task, data, .. } => match task.as_str() {
                tasks::INTAKE => self.process_inquiry(data, sender, ctx).await,
                other => {
                    warn!(agent = %self.id, task = other, "Ignoring unknown task");
                    Ok(())
                }
            },
            Payload::Result { result, task_id } => {
                info!(
                    agent = %self.id,
                    sender = %sender,
                    task_id = ?task_id,
                    result = %result,
                    "Aggregated workflow result"
                );
                Ok(())
            }
        }
    }
}

struct ParsedInquiry {
    requirements: Value,
    clarifications: Value,
    next_steps: Value,
}

fn mint_project_id() -> String {
    let discriminator = Uuid::new_v4().simple().to_string();
    format!("proj-{}", &discriminator[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_ids_are_short_and_unique() {
        let a = mint_project_id();
        let b = mint_project_id();

        assert!(a.starts_with("proj-"));
        assert_eq!(a.len(), "proj-".len() + 8);
        assert_ne!(a, b);
    }
}
