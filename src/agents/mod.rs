// Construction workflow agents
//
// Nineteen agents are registered at boot: nine active pipeline stages that
// carry an inquiry from intake to an approval-ready master plan, and ten
// passive support roles that acknowledge traffic until their behaviors land.

pub mod architectural_design;
pub mod client_engagement;
pub mod cost_supply_chain;
pub mod digital_twin;
pub mod experiential_design;
pub mod human_collaboration;
pub mod project_management;
pub mod site_intelligence;
pub mod support;
pub mod systems_engineering;

// Re-export main types
pub use architectural_design::ArchitecturalDesignAgent;
pub use client_engagement::ClientEngagementAgent;
pub use cost_supply_chain::CostSupplyChainAgent;
pub use digital_twin::DigitalTwinAgent;
pub use experiential_design::ExperientialDesignAgent;
pub use human_collaboration::HumanCollaborationAgent;
pub use project_management::ProjectManagementAgent;
pub use site_intelligence::SiteIntelligenceAgent;
pub use support::SupportAgent;
pub use systems_engineering::SystemsEngineeringAgent;

use std::sync::Arc;

use crate::llm::GenerativeModel;
use crate::runtime::{AgentRegistry, RegistryError, ResponseWriter};

/// Agent ids. These are the routing keys; every message names one of them
/// as its receiver.
pub mod roles {
    pub const CLIENT_ENGAGEMENT: &str = "client_engagement";
    pub const SITE_INTELLIGENCE: &str = "site_intelligence";
    pub const ARCHITECTURAL_DESIGN: &str = "architectural_design";
    pub const SYSTEMS_ENGINEERING: &str = "systems_engineering";
    pub const EXPERIENTIAL_DESIGN: &str = "experiential_design";
    pub const DIGITAL_TWIN: &str = "digital_twin";
    pub const PROJECT_MANAGEMENT: &str = "project_management";
    pub const COST_SUPPLY_CHAIN: &str = "cost_supply_chain";
    pub const HUMAN_COLLABORATION: &str = "human_collaboration";

    pub const RISK_SAFETY: &str = "risk_safety";
    pub const QUALITY_ASSURANCE: &str = "quality_assurance";
    pub const DATA_INTEGRATION: &str = "data_integration";
    pub const LEARNING_ADAPTATION: &str = "learning_adaptation";
    pub const SUSTAINABILITY: &str = "sustainability";
    pub const FINANCIAL_INVESTMENT: &str = "financial_investment";
    pub const LEGAL_CONTRACT: &str = "legal_contract";
    pub const WORKFORCE_HR: &str = "workforce_hr";
    pub const FACILITY_MANAGEMENT: &str = "facility_management";
    pub const PUBLIC_RELATIONS: &str = "public_relations";
}

/// The fixed set of task names the pipeline recognizes. Task names travel as
/// plain strings so new ones can be introduced without touching the
/// substrate; an agent that receives a name outside this set logs it and
/// moves on.
pub mod tasks {
    pub const INTAKE: &str = "intake";
    pub const SITE_ANALYSIS: &str = "site_analysis";
    pub const CONCEPT_DESIGN: &str = "concept_design";
    pub const SYSTEMS_DESIGN: &str = "systems_design";
    pub const EXPERIENTIAL_DESIGN: &str = "experiential_design";
    pub const DIGITAL_TWIN: &str = "digital_twin";
    pub const MASTER_PLANNING: &str = "master_planning";
    pub const COST_ESTIMATION: &str = "cost_estimation";
    pub const PLAN_INTEGRATION: &str = "plan_integration";
    pub const CLIENT_PRESENTATION: &str = "client_presentation";
}

/// Builds the full agent roster. `responses` is the bridge half the entry
/// agent uses to acknowledge blocked API callers.
pub fn build_registry(
    model: Arc<dyn GenerativeModel>,
    responses: ResponseWriter,
) -> Result<AgentRegistry, RegistryError> {
    let mut registry = AgentRegistry::new();

    registry.register(ClientEngagementAgent::new(Arc::clone(&model), responses))?;
    registry.register(SiteIntelligenceAgent::new(Arc::clone(&model)))?;
    registry.register(ArchitecturalDesignAgent::new(Arc::clone(&model)))?;
    registry.register(SystemsEngineeringAgent::new())?;
    registry.register(ExperientialDesignAgent::new())?;
    registry.register(DigitalTwinAgent::new(model))?;
    registry.register(ProjectManagementAgent::new())?;
    registry.register(CostSupplyChainAgent::new())?;
    registry.register(HumanCollaborationAgent::new())?;

    for agent in support::roster() {
        registry.register(agent)?;
    }

    Ok(registry)
}
