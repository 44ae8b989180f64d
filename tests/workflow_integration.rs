//! End-to-end tests for the construction workflow and its HTTP surface
//!
//! These tests drive the real pipeline agents with a stubbed generative
//! model and verify:
//! - Intake acknowledgement and delegation by the client engagement agent
//! - Error acknowledgement when the model backend is down
//! - The full pipeline from inquiry to client presentation
//! - HTTP routes, status mapping, and response shapes

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use groundwork_api::agents::{
    roles, tasks, ArchitecturalDesignAgent, ClientEngagementAgent, CostSupplyChainAgent,
    DigitalTwinAgent, ExperientialDesignAgent, ProjectManagementAgent, SiteIntelligenceAgent,
    SystemsEngineeringAgent,
};
use groundwork_api::api::handlers::{generate, inquiry};
use groundwork_api::api::{AppState, CLIENT_INQUIRY_SENDER};
use groundwork_api::llm::{GenerativeModel, LlmError};
use groundwork_api::runtime::{
    bridge, Agent, AgentContext, AgentId, AgentRegistry, AgentResult, BridgeReply, Capability,
    Message, Payload,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::util::ServiceExt; // for oneshot

/// Canned model reply carrying every key any pipeline stage looks for.
const STUB_REPLY: &str = r#"{
    "parsed_requirements": {
        "project_type": "residential",
        "client_name": "Jane Smith",
        "budget_range": "$500k-$750k",
        "location": "Rural, California",
        "desired_features": ["3 bedrooms", "solar panels"]
    },
    "clarification_needed": "None",
    "suggested_next_steps": "Proceed to site analysis.",
    "summary": "Low-rise residential zoning with WUI constraints.",
    "compliance_challenges": ["Wildfire-resistant materials required"],
    "recommendations": ["Engage a Title 24 consultant early"],
    "design_summary": "Single-storey ranch with deep eaves.",
    "key_elements": ["Deep eaves", "Defensible space"],
    "considerations": ["Setbacks honored on all sides"]
}"#;

const STUB_RENDER: &str = "c3R1Yi1yZW5kZXI=";

/// Generative model stub with canned replies.
struct StubModel;

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate_text(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(STUB_REPLY.to_string())
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(STUB_RENDER.to_string())
    }
}

/// Generative model stub that always fails.
struct DownModel;

#[async_trait]
impl GenerativeModel for DownModel {
    async fn generate_text(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Backend {
            status: 503,
            detail: "model overloaded".to_string(),
        })
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Backend {
            status: 503,
            detail: "model overloaded".to_string(),
        })
    }
}

/// Test agent that forwards everything it receives to the test body.
struct Probe {
    id: AgentId,
    tap: mpsc::UnboundedSender<Message>,
}

impl Probe {
    fn new(id: &str) -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tap, rx) = mpsc::unbounded_channel();
        (Self { id: id.into(), tap }, rx)
    }
}

#[async_trait]
impl Agent for Probe {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn capabilities(&self) -> &[Capability] {
        &[]
    }

    async fn on_message(&mut self, message: Message, _ctx: &AgentContext) -> AgentResult<()> {
        let _ = self.tap.send(message);
        Ok(())
    }
}

/// Receives the next tapped message or panics after two seconds.
async fn recv_soon(rx: &mut mpsc::UnboundedReceiver<Message>) -> Message {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("tap channel closed")
}

/// A complete inquiry as the frontend would submit it.
fn inquiry_body() -> Value {
    json!({
        "project_type": "residential",
        "client_name": "Jane Smith",
        "budget_range": "$500k-$750k",
        "location": "Rural, California",
        "desired_features": ["3 bedrooms", "solar panels"]
    })
}

/// Setup test application with routes
fn setup_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(inquiry::welcome))
        .route("/client_inquiry", post(inquiry::client_inquiry))
        .route("/generate_text", post(generate::generate_text))
        .route("/generate_image", post(generate::generate_image))
        .with_state(state)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_intake_acknowledges_and_delegates_site_analysis() {
    let (writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let mut registry = AgentRegistry::new();
    registry
        .register(ClientEngagementAgent::new(Arc::new(StubModel), writer))
        .unwrap();
    let (probe, mut site_rx) = Probe::new(roles::SITE_INTELLIGENCE);
    registry.register(probe).unwrap();
    registry.start_all();

    registry
        .resolver()
        .deliver(Message::request(
            CLIENT_INQUIRY_SENDER,
            roles::CLIENT_ENGAGEMENT,
            tasks::INTAKE,
            inquiry_body(),
        ))
        .unwrap();

    // The blocked caller gets exactly one acknowledgement
    let ack = match reader.get(Duration::from_secs(2)).await {
        BridgeReply::Delivered(ack) => ack,
        BridgeReply::TimedOut => panic!("no acknowledgement arrived"),
    };
    assert_eq!(ack["status"], "processing_initiated");
    assert_eq!(ack["agent"], "client_engagement");
    assert_eq!(ack["parsed_data"]["location"], "Rural, California");
    assert_eq!(ack["clarifications"], "None");
    assert_eq!(
        reader.get(Duration::from_millis(100)).await,
        BridgeReply::TimedOut
    );

    // Exactly one delegation to site analysis, attributed to the endpoint
    let delegated = recv_soon(&mut site_rx).await;
    assert_eq!(delegated.sender.as_str(), roles::CLIENT_ENGAGEMENT);
    assert_eq!(delegated.task(), Some(tasks::SITE_ANALYSIS));
    match delegated.payload {
        Payload::Request {
            data,
            original_sender,
            ..
        } => {
            assert!(data["project_id"].as_str().unwrap().starts_with("proj-"));
            assert_eq!(data["location"], "Rural, California");
            assert_eq!(data["project_type"], "residential");
            assert_eq!(data["initial_requirements"]["client_name"], "Jane Smith");
            assert_eq!(
                original_sender.as_ref().map(AgentId::as_str),
                Some(CLIENT_INQUIRY_SENDER)
            );
        }
        _ => panic!("expected a request payload"),
    }
    assert!(site_rx.try_recv().is_err());

    registry.stop_all().await;
}

#[tokio::test]
async fn test_intake_failure_reports_an_error_acknowledgement() {
    let (writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let mut registry = AgentRegistry::new();
    registry
        .register(ClientEngagementAgent::new(Arc::new(DownModel), writer))
        .unwrap();
    let (probe, mut site_rx) = Probe::new(roles::SITE_INTELLIGENCE);
    registry.register(probe).unwrap();
    registry.start_all();

    registry
        .resolver()
        .deliver(Message::request(
            CLIENT_INQUIRY_SENDER,
            roles::CLIENT_ENGAGEMENT,
            tasks::INTAKE,
            inquiry_body(),
        ))
        .unwrap();

    let ack = match reader.get(Duration::from_secs(2)).await {
        BridgeReply::Delivered(ack) => ack,
        BridgeReply::TimedOut => panic!("no acknowledgement arrived"),
    };
    assert_eq!(ack["status"], "error");
    assert_eq!(ack["agent"], "client_engagement");
    assert!(ack["details"]
        .as_str()
        .unwrap()
        .contains("Failed to process client inquiry"));

    // Nothing is delegated when intake fails
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(site_rx.try_recv().is_err());

    registry.stop_all().await;
}

#[tokio::test]
async fn test_pipeline_runs_from_inquiry_to_client_presentation() {
    let model: Arc<dyn GenerativeModel> = Arc::new(StubModel);
    let (writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);

    let mut registry = AgentRegistry::new();
    registry
        .register(ClientEngagementAgent::new(Arc::clone(&model), writer))
        .unwrap();
    registry
        .register(SiteIntelligenceAgent::new(Arc::clone(&model)))
        .unwrap();
    registry
        .register(ArchitecturalDesignAgent::new(Arc::clone(&model)))
        .unwrap();
    registry.register(SystemsEngineeringAgent::new()).unwrap();
    registry.register(ExperientialDesignAgent::new()).unwrap();
    registry
        .register(DigitalTwinAgent::new(Arc::clone(&model)))
        .unwrap();
    registry.register(ProjectManagementAgent::new()).unwrap();
    registry.register(CostSupplyChainAgent::new()).unwrap();
    let (probe, mut presentation_rx) = Probe::new(roles::HUMAN_COLLABORATION);
    registry.register(probe).unwrap();
    registry.start_all();

    registry
        .resolver()
        .deliver(Message::request(
            CLIENT_INQUIRY_SENDER,
            roles::CLIENT_ENGAGEMENT,
            tasks::INTAKE,
            inquiry_body(),
        ))
        .unwrap();

    let ack = match reader.get(Duration::from_secs(5)).await {
        BridgeReply::Delivered(ack) => ack,
        BridgeReply::TimedOut => panic!("no acknowledgement arrived"),
    };
    assert_eq!(ack["status"], "processing_initiated");

    // Every stage ran; the presentation request carries the drafted plan
    let presented = tokio::time::timeout(Duration::from_secs(5), presentation_rx.recv())
        .await
        .expect("pipeline never reached client presentation")
        .unwrap();
    assert_eq!(presented.sender.as_str(), roles::PROJECT_MANAGEMENT);
    assert_eq!(presented.task(), Some(tasks::CLIENT_PRESENTATION));
    match presented.payload {
        Payload::Request {
            data,
            original_sender,
            ..
        } => {
            assert!(data["project_id"].as_str().unwrap().starts_with("proj-"));
            let plan = &data["master_plan"];
            assert_eq!(plan["status"], "master_plan_drafted");
            assert_eq!(plan["timeline_weeks"], 52);
            assert!(plan["budget"].is_u64());
            assert_eq!(plan["project_id"], data["project_id"]);
            assert_eq!(
                original_sender.as_ref().map(AgentId::as_str),
                Some(CLIENT_INQUIRY_SENDER)
            );
        }
        _ => panic!("expected a request payload"),
    }

    registry.stop_all().await;
}

#[tokio::test]
async fn test_welcome_route() {
    let registry = AgentRegistry::new();
    let (_writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(StubModel),
        inquiry_timeout: Duration::from_millis(200),
    });

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(
        json["message"],
        "Welcome to the Construction AI Multi-Agent System API!"
    );
}

#[tokio::test]
async fn test_client_inquiry_unavailable_without_agents() {
    let registry = AgentRegistry::new();
    let (_writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(StubModel),
        inquiry_timeout: Duration::from_millis(200),
    });

    let response = app
        .oneshot(post_json("/client_inquiry", &inquiry_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not running"));
}

#[tokio::test]
async fn test_client_inquiry_returns_agent_acknowledgement() {
    let (writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let mut registry = AgentRegistry::new();
    registry
        .register(ClientEngagementAgent::new(Arc::new(StubModel), writer))
        .unwrap();
    let (probe, mut site_rx) = Probe::new(roles::SITE_INTELLIGENCE);
    registry.register(probe).unwrap();
    registry.start_all();

    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(StubModel),
        inquiry_timeout: Duration::from_secs(2),
    });

    let response = app
        .oneshot(post_json("/client_inquiry", &inquiry_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "processing_initiated");
    assert_eq!(json["agent"], "client_engagement");
    assert_eq!(
        json["details"],
        "Client inquiry processed. Initial data extracted. Workflow initiated."
    );
    assert_eq!(json["parsed_data"]["client_name"], "Jane Smith");

    // The workflow keeps moving after the response is returned
    let delegated = recv_soon(&mut site_rx).await;
    assert_eq!(delegated.task(), Some(tasks::SITE_ANALYSIS));

    registry.stop_all().await;
}

#[tokio::test]
async fn test_client_inquiry_times_out_when_agent_stays_silent() {
    // An agent that accepts intake but never acknowledges
    let (probe, _intake_rx) = Probe::new(roles::CLIENT_ENGAGEMENT);
    let mut registry = AgentRegistry::new();
    registry.register(probe).unwrap();
    registry.start_all();

    let (_writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(StubModel),
        inquiry_timeout: Duration::from_millis(100),
    });

    let response = app
        .oneshot(post_json("/client_inquiry", &inquiry_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("timed out"));

    registry.stop_all().await;
}

#[tokio::test]
async fn test_client_inquiry_maps_agent_error_to_500() {
    let (writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let mut registry = AgentRegistry::new();
    registry
        .register(ClientEngagementAgent::new(Arc::new(DownModel), writer))
        .unwrap();
    registry.start_all();

    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(DownModel),
        inquiry_timeout: Duration::from_secs(2),
    });

    let response = app
        .oneshot(post_json("/client_inquiry", &inquiry_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Agent error during inquiry processing"));

    registry.stop_all().await;
}

#[tokio::test]
async fn test_generate_text_rejects_empty_prompt() {
    let registry = AgentRegistry::new();
    let (_writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(StubModel),
        inquiry_timeout: Duration::from_millis(200),
    });

    let response = app.oneshot(post_json("/generate_text", &json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Prompt is required"));
}

#[tokio::test]
async fn test_generate_text_returns_model_output() {
    let registry = AgentRegistry::new();
    let (_writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(StubModel),
        inquiry_timeout: Duration::from_millis(200),
    });

    let response = app
        .oneshot(post_json(
            "/generate_text",
            &json!({"prompt": "Describe a passive house."}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["generated_text"], STUB_REPLY);
}

#[tokio::test]
async fn test_generate_text_maps_model_failure_to_bad_gateway() {
    let registry = AgentRegistry::new();
    let (_writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(DownModel),
        inquiry_timeout: Duration::from_millis(200),
    });

    let response = app
        .oneshot(post_json("/generate_text", &json!({"prompt": "anything"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Text generation failed"));
}

#[tokio::test]
async fn test_generate_image_returns_base64() {
    let registry = AgentRegistry::new();
    let (_writer, reader) = bridge::channel(bridge::DEFAULT_CAPACITY);
    let app = setup_app(AppState {
        resolver: registry.resolver(),
        responses: Arc::new(reader),
        model: Arc::new(StubModel),
        inquiry_timeout: Duration::from_millis(200),
    });

    let response = app
        .oneshot(post_json(
            "/generate_image",
            &json!({"prompt": "A timber frame cabin"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["generated_image_base64"], STUB_RENDER);
}
