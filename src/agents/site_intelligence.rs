//! Site feasibility and regulatory compliance analysis.

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
    Capability::Analysis,
    Capability::Planning,
    Capability::GeospatialAnalysis,
    Capability::RegulatoryCompliance,
    Capability::NaturalLanguageProcessing,
];

/// Resolves a zoning profile for the project location, asks the text model
/// for a regulatory summary, and assembles the site feasibility report that
/// every later stage builds on.
pub struct SiteIntelligenceAgent {
    id: AgentId,
    model: Arc<dyn GenerativeModel>,
}

impl SiteIntelligenceAgent {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            id: roles::SITE_INTELLIGENCE.into(),
            model,
        }
    }

    async fn analyze_site(
        &self,
        data: Value,
        original_sender: Option<AgentId>,
        ctx: &AgentContext,
    ) -> AgentResult<()> {
        let project_id = field_str(&data, "project_id");
        let location = field_str(&data, "location");
        let project_type = field_str(&data, "project_type");
        let initial_requirements = data
            .get("initial_requirements")
            .cloned()
            .unwrap_or_else(|| json!({}));

        info!(
            agent = %self.id,
            project_id = %project_id,
            location = %location,
            project_type = %project_type,
            "Starting site analysis"
        );

        let profile = zoning_profile(&location);
        let zoning_rules = profile.get(&project_type).cloned().unwrap_or_else(|| json!({}));

        let regulatory = match self
            .interpret_regulations(&location, &project_type, &initial_requirements, &profile)
            .await
        {
            Ok(parsed) => parsed,
            Err(err) => {
                error!(agent = %self.id, project_id = %project_id, error = %err, "Site analysis failed");
                ctx.send_result(
                    roles::CLIENT_ENGAGEMENT,
                    json!({
                        "status": "error",
                        "agent": self.id.as_str(),
                        "details": format!("Failed site analysis for {project_id}: {err}"),
                    }),
                    Some("site_analysis_failed".into()),
                );
                return Err(AgentError::ModelError(err.to_string()));
            }
        };

        let report = json!({
            "project_id": project_id,
            "location": location,
            "project_type": project_type,
            "status": "initial_analysis_complete",
            "zoning_data": {
                "allowed_height_m": zoning_rules.get("allowed_height_m").cloned().unwrap_or_else(|| json!("N/A")),
                "setbacks_m": zoning_rules.get("setbacks_m").cloned().unwrap_or_else(|| json!({})),
                "max_coverage_percent": profile.get("max_coverage_percent").cloned().unwrap_or_else(|| json!("N/A")),
            },
            "environmental_risk": profile.get("environmental_risk").cloned().unwrap_or_else(|| json!("Unknown")),
            "common_building_codes": profile.get("common_building_codes").cloned().unwrap_or_else(|| json!("Standard building codes apply.")),
            "regulatory_summary_ai": regulatory.get("summary").cloned().unwrap_or_else(|| json!("N/A")),
            "compliance_challenges_ai": regulatory.get("compliance_challenges").cloned().unwrap_or_else(|| json!([])),
            "site_recommendations_ai": regulatory.get("recommendations").cloned().unwrap_or_else(|| json!([])),
        });
        info!(agent = %self.id, project_id = %project_id, "Site feasibility report ready");

        ctx.send_result(
            roles::CLIENT_ENGAGEMENT,
            json!({
                "message": format!("Site analysis complete for {project_id}."),
                "report_summary": report["regulatory_summary_ai"].clone(),
            }),
            Some("site_analysis_complete".into()),
        );

        ctx.send_task(
            roles::ARCHITECTURAL_DESIGN,
            tasks::CONCEPT_DESIGN,
            json!({
                "project_id": project_id,
                "site_feasibility_report": report,
                "initial_requirements": initial_requirements,
            }),
            original_sender,
        );

        Ok(())
    }

    async fn interpret_regulations(
        &self,
        location: &str,
        project_type: &str,
        initial_requirements: &Value,
        profile: &Value,
    ) -> Result<Value, crate::llm::LlmError> {
        let prompt = format!(
            "Given the following site information and common building codes for a '{location}' \
             project of type '{project_type}', summarize the key regulatory constraints and \
             primary environmental risks. Focus on maximum height, setbacks, and notable code \
             sections, and identify compliance challenges given the initial requirements: \
             {initial_requirements}. Site info: {profile}. Respond with a JSON object with keys \
             'summary', 'compliance_challenges', 'recommendations'."
        );
        let raw = self.model.generate_text(&prompt).await?;

        Ok(match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(_) => {
                warn!(agent = %self.id, "Regulatory reply was not valid JSON, using fallback summary");
                json!({
                    "summary": "Regulatory summary could not be parsed. Manual review required.",
                    "compliance_challenges": ["Automated interpretation unavailable."],
                    "recommendations": ["Consult local regulations directly for detailed compliance."],
                })
            }
        })
    }
}

#[async_trait]
impl Agent for SiteIntelligenceAgent {
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
                tasks::SITE_ANALYSIS => self.analyze_site(data, original_sender, ctx).await,
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

/// Zoning lookups are canned per known location; anything else falls back to
/// the suburban London profile. A production deployment would call
/// geospatial and local-government services here.
fn zoning_profile(location: &str) -> Value {
    match location {
        "Downtown, New York" => json!({
            "residential": {"allowed_height_m": 150, "setbacks_m": {"front": 0, "sides": 0, "rear": 0}},
            "commercial": {"allowed_height_m": 300, "setbacks_m": {"front": 0, "sides": 0, "rear": 0}},
            "max_coverage_percent": 100,
            "environmental_risk": "Medium (urban heat island effect, historical underground infrastructure)",
            "common_building_codes": "NYC Building Code, ADA Compliance.",
        }),
        "Rural, California" => json!({
            "residential": {"allowed_height_m": 10, "setbacks_m": {"front": 10, "sides": 5, "rear": 10}},
            "commercial": {"allowed_height_m": 15, "setbacks_m": {"front": 8, "sides": 4, "rear": 8}},
            "max_coverage_percent": 25,
            "environmental_risk": "High (wildfire risk, seismic activity, water scarcity, protected species habitats)",
            "common_building_codes": "California Building Standards Code (Title 24), Wildland-Urban Interface (WUI) codes.",
        }),
        _ => json!({
            "residential": {"allowed_height_m": 12, "setbacks_m": {"front": 5, "sides": 3, "rear": 7}},
            "commercial": {"allowed_height_m": 20, "setbacks_m": {"front": 3, "sides": 1, "rear": 5}},
            "max_coverage_percent": 40,
            "environmental_risk": "Low (potential for minor soil contamination near old industrial sites)",
            "common_building_codes": "UK Building Regulations Part B (Fire Safety), Part M (Access to and use of buildings), Part L (Conservation of fuel and power).",
        }),
    }
}

fn field_str(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
