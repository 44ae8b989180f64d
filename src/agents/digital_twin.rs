//! Consolidated 3D digital twin with photorealistic renders.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::llm::GenerativeModel;
use crate::runtime::{
    Agent, AgentContext, AgentError, AgentId, AgentResult, Capability, Message, Payload,
};

use super::architectural_design::{plain, render_preview};
use super::{roles, tasks};

const CAPABILITIES: &[Capability] = &[Capability::Visualization, Capability::Integration];

const TWIN_MODEL_URL: &str = "https://example.com/digital_twin_model.gltf";

/// Integrates every upstream design package into one digital twin record,
/// rendering exterior and interior views with the image model, then kicks
/// off project planning with the consolidated bundle.
pub struct DigitalTwinAgent {
    id: AgentId,
    model: Arc<dyn GenerativeModel>,
}

impl DigitalTwinAgent {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            id: roles::DIGITAL_TWIN.into(),
            model,
        }
    }

    async fn build_twin(
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
        let architectural_concept = data
            .get("architectural_concept")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let system_design = data.get("system_design").cloned().unwrap_or_else(|| json!({}));
        let experiential_design = data
            .get("experiential_design")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let site_report = data.get("site_report").cloned().unwrap_or_else(|| json!({}));

        info!(agent = %self.id, project_id = %project_id, "Creating digital twin");

        let style = plain(architectural_concept.get("design_style_summary"));
        let exterior_prompt = format!(
            "Photorealistic 3D exterior render of a {style} house at {location} with a \
             {landscape} landscape. Incorporate elements like {elements}. High detail, \
             natural lighting, daytime.",
            location = plain(site_report.get("location")),
            landscape = plain(experiential_design.get("landscape_features")),
            elements = plain(architectural_concept.get("key_design_elements")),
        );
        let interior_prompt = format!(
            "Photorealistic 3D interior render of a {style} house, with {decor} decor and \
             materials like {palette}. Warm lighting, cozy atmosphere, focus on living area.",
            decor = plain(experiential_design.get("interior_style")),
            palette = plain(experiential_design.get("material_palette_notes")),
        );

        let renders = self.render_views(&exterior_prompt, &interior_prompt).await;
        let (exterior_render, interior_render) = match renders {
            Ok(pair) => pair,
            Err(err) => {
                error!(agent = %self.id, project_id = %project_id, error = %err, "Twin rendering failed");
                ctx.send_result(
                    roles::CLIENT_ENGAGEMENT,
                    json!({
                        "status": "error",
                        "agent": self.id.as_str(),
                        "details": format!("Failed digital twin creation for {project_id}: {err}"),
                    }),
                    Some("digital_twin_failed".into()),
                );
                return Err(AgentError::ModelError(err.to_string()));
            }
        };

        let twin = json!({
            "project_id": project_id,
            "digital_twin_url": TWIN_MODEL_URL,
            "exterior_render_base64": render_preview(&exterior_render),
            "interior_render_base64": render_preview(&interior_render),
            "status": "initial_twin_created",
            "details": "High-fidelity digital twin model and initial renders generated.",
            "generated_render_prompts": {
                "exterior": exterior_prompt,
                "interior": interior_prompt,
            },
        });

        ctx.send_result(
            roles::CLIENT_ENGAGEMENT,
            json!({
                "message": format!("Initial 3D Digital Twin created for {project_id}."),
                "details": twin.clone(),
            }),
            Some("digital_twin_complete".into()),
        );

        ctx.send_task(
            roles::PROJECT_MANAGEMENT,
            tasks::MASTER_PLANNING,
            json!({
                "project_id": project_id,
                "final_design_bundle": {
                    "architectural": architectural_concept,
                    "systems": system_design,
                    "experiential": experiential_design,
                    "digital_twin": twin,
                },
                "site_report": site_report,
            }),
            original_sender,
        );

        Ok(())
    }

    async fn render_views(
        &self,
        exterior_prompt: &str,
        interior_prompt: &str,
    ) -> Result<(String, String), crate::llm::LlmError> {
        let exterior = self.model.generate_image(exterior_prompt).await?;
        let interior = self.model.generate_image(interior_prompt).await?;
        Ok((exterior, interior))
    }
}

#[async_trait]
impl Agent for DigitalTwinAgent {
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
                tasks::DIGITAL_TWIN => self.build_twin(data, original_sender, ctx).await,
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
