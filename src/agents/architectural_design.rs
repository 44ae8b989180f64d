//! Concept generation: design brief interpretation plus a first render.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::llm::GenerativeModel;
use crate::runtime::{
    Agent, AgentContext, AgentError, AgentId, AgentResult, Capability, Message, Payload,
};

use super::{roles, tasks};

const CAPABILITIES: &[Capability] = &[
    Capability::Design,
    Capability::Visualization,
    Capability::NaturalLanguageProcessing,
];

const FLOOR_PLAN_URL: &str = "https://placehold.co/600x400/FF0000/FFFFFF?text=Conceptual_Floor_Plan";
const EXTERIOR_RENDER_URL: &str =
    "https://placehold.co/600x400/0000FF/FFFFFF?text=Conceptual_Exterior_Render";

/// Interprets the design brief against the site report with the text model
/// and produces a conceptual render with the image model, then hands the
/// concept to systems engineering.
pub struct ArchitecturalDesignAgent {
    id: AgentId,
    model: Arc<dyn GenerativeModel>,
}

impl ArchitecturalDesignAgent {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            id: roles::ARCHITECTURAL_DESIGN.into(),
            model,
        }
    }

    async fn generate_concept(
        &self,
        data: Value,
        original_sender: Option<AgentId>,
        ctx: &AgentContext,
    ) -> AgentResult<()> {
        let project_id = data
            .get("project_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let site_report = data
            .get("site_feasibility_report")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let initial_requirements = data
            .get("initial_requirements")
            .cloned()
            .unwrap_or_else(|| json!({}));

        info!(agent = %self.id, project_id = %project_id, "Generating architectural concepts");

        let outcome = self
            .draft_concept(&project_id, &site_report, &initial_requirements)
            .await;
        let concept = match outcome {
            Ok(concept) => concept,
            Err(err) => {
                error!(agent = %self.id, project_id = %project_id, error = %err, "Concept generation failed");
                ctx.send_result(
                    roles::CLIENT_ENGAGEMENT,
                    json!({
                        "status": "error",
                        "agent": self.id.as_str(),
                        "details": format!("Failed architectural design for {project_id}: {err}"),
                    }),
                    Some("architectural_design_failed".into()),
                );
                return Err(AgentError::ModelError(err.to_string()));
            }
        };

        ctx.send_result(
            roles::CLIENT_ENGAGEMENT,
            json!({
                "message": format!("Architectural concepts generated for {project_id}."),
                "design_summary": concept["design_style_summary"].clone(),
            }),
            Some("architectural_concepts_generated".into()),
        );

        ctx.send_task(
            roles::SYSTEMS_ENGINEERING,
            tasks::SYSTEMS_DESIGN,
            json!({
                "project_id": project_id,
                "architectural_concept": concept,
                "site_report": site_report,
            }),
            original_sender,
        );

        Ok(())
    }

    async fn draft_concept(
        &self,
        project_id: &str,
        site_report: &Value,
        initial_requirements: &Value,
    ) -> Result<Value, crate::llm::LlmError> {
        let project_type = plain(initial_requirements.get("project_type"));
        let desired_features = plain(initial_requirements.get("desired_features"));
        let max_height = plain(site_report.pointer("/zoning_data/allowed_height_m"));

        let design_prompt = format!(
            "Based on the following site feasibility report and initial client requirements, \
             propose an architectural concept. Consider the project type '{project_type}' and \
             desired features '{desired_features}', adhering to zoning rules like max height \
             {max_height}m. Summarize the proposed style, key design elements, and how the \
             concept addresses site constraints.\nSite report: {site_report}\nInitial \
             requirements: {initial_requirements}\nRespond with a JSON object with keys \
             'design_summary', 'key_elements', 'considerations'."
        );
        let raw = self.model.generate_text(&design_prompt).await?;
        let brief = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(_) => {
                warn!(agent = %self.id, "Design reply was not valid JSON, using fallback brief");
                json!({
                    "design_summary": "Design summary could not be parsed. Manual design review needed.",
                    "key_elements": ["Unspecified"],
                    "considerations": ["Manual design review required."],
                })
            }
        };

        let location = plain(site_report.get("location"));
        let style = plain(brief.get("design_summary"));
        let image_prompt = format!(
            "Architectural sketch of a {project_type} house in {location} with \
             {desired_features} and a {style} style. Exterior view, clear daylight."
        );
        let render = self.model.generate_image(&image_prompt).await?;

        Ok(json!({
            "project_id": project_id,
            "design_style_summary": brief.get("design_summary").cloned().unwrap_or(Value::Null),
            "key_design_elements": brief.get("key_elements").cloned().unwrap_or_else(|| json!([])),
            "site_considerations_addressed": brief.get("considerations").cloned().unwrap_or_else(|| json!([])),
            "conceptual_render_base64": render_preview(&render),
            "floor_plan_url": FLOOR_PLAN_URL,
            "exterior_render_url": EXTERIOR_RENDER_URL,
        }))
    }
}

#[async_trait]
impl Agent for ArchitecturalDesignAgent {
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
            } => match task.as_str() {
                tasks::CONCEPT_DESIGN => self.generate_concept(data, original_sender, ctx).await,
                other => {
                    warn!(agent = %self.id, task = other, "Ignoring unknown task");
                    Ok(())
                }
            },
            Payload::Result { task_id, .. } => {
                info!(agent = %self.id, sender = %sender, task_id = ?task_id, "Result received");
                Ok(())
            }
        }
    }
}

/// Renders are kilobytes of base64; forwarded payloads carry a truncated
/// preview instead of the full image.
pub(crate) fn render_preview(render: &str) -> String {
    if render.is_empty() {
        return "N/A".to_string();
    }
    let head: String = render.chars().take(100).collect();
    format!("{head}...")
}

/// Prompt interpolation: bare text for strings, compact JSON for the rest.
pub(crate) fn plain(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "unspecified".to_string(),
    }
}
