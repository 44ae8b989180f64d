//! Interior and landscape design.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::runtime::{Agent, AgentContext, AgentId, AgentResult, Capability, Message, Payload};

use super::{roles, tasks};

const CAPABILITIES: &[Capability] = &[Capability::Design, Capability::Visualization];

const MOOD_BOARD_URL: &str = "https://placehold.co/600x400/996633/FFFFFF?text=Interior_Mood_Board";

/// Drafts the interior and landscape design package and forwards the
/// accumulated design data to the digital twin stage.
pub struct ExperientialDesignAgent {
    id: AgentId,
}

impl ExperientialDesignAgent {
    pub fn new() -> Self {
        Self {
            id: roles::EXPERIENTIAL_DESIGN.into(),
        }
    }

    fn design_spaces(&self, data: Value, original_sender: Option<AgentId>, ctx: &AgentContext) {
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
        let site_report = data.get("site_report").cloned().unwrap_or_else(|| json!({}));

        info!(agent = %self.id, project_id = %project_id, "Drafting interior and landscape designs");

        let experiential_design = json!({
            "project_id": project_id,
            "interior_style": "Minimalist, Biophilic",
            "landscape_features": "Zen garden, patio with fire pit, native plant landscaping",
            "material_palette_notes": "Natural wood, light stone, muted colors; emphasis on sustainable and locally sourced materials.",
            "mood_board_url": MOOD_BOARD_URL,
        });

        ctx.send_result(
            roles::CLIENT_ENGAGEMENT,
            json!({
                "message": format!("Interior and landscape designs drafted for {project_id}."),
                "details": experiential_design.clone(),
            }),
            Some("experiential_design_complete".into()),
        );

        ctx.send_task(
            roles::DIGITAL_TWIN,
            tasks::DIGITAL_TWIN,
            json!({
                "project_id": project_id,
                "architectural_concept": architectural_concept,
                "system_design": system_design,
                "experiential_design": experiential_design,
                "site_report": site_report,
            }),
            original_sender,
        );
    }
}

impl Default for ExperientialDesignAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ExperientialDesignAgent {
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
                    tasks::EXPERIENTIAL_DESIGN => self.design_spaces(data, original_sender, ctx),
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
