//! Message types for inter-agent communication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::agent::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Request,
    Result,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Result => write!(f, "result"),
        }
    }
}

/// Body of a [`Message`]. A request carries a task name and its input data;
/// a result carries the outcome of a previously requested task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Request {
        task: String,
        data: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_sender: Option<AgentId>,
    },
    Result {
        result: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<String>,
    },
}

impl Payload {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Request { .. } => MessageKind::Request,
            Self::Result { .. } => MessageKind::Result,
        }
    }
}

/// Immutable envelope exchanged between agents. Built once by the sender and
/// never mutated in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: AgentId,
    pub receiver: AgentId,
    pub payload: Payload,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: impl Into<AgentId>, receiver: impl Into<AgentId>, payload: Payload) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            receiver: receiver.into(),
            payload,
            sent_at: Utc::now(),
        }
    }

    /// Builds a REQUEST asking `receiver` to perform `task` on `data`.
    pub fn request(
        sender: impl Into<AgentId>,
        receiver: impl Into<AgentId>,
        task: impl Into<String>,
        data: Value,
    ) -> Self {
        Self::new(
            sender,
            receiver,
            Payload::Request {
                task: task.into(),
                data,
                original_sender: None,
            },
        )
    }

    /// Builds a RESULT reporting a task outcome back to `receiver`.
    pub fn result(
        sender: impl Into<AgentId>,
        receiver: impl Into<AgentId>,
        result: Value,
        task_id: Option<String>,
    ) -> Self {
        Self::new(sender, receiver, Payload::Result { result, task_id })
    }

    /// Tags the request with the id of the party that opened the workflow,
    /// so downstream stages can route replies without having seen the
    /// original message.
    pub fn with_original_sender(mut self, id: impl Into<AgentId>) -> Self {
        if let Payload::Request {
            ref mut original_sender,
            ..
        } = self.payload
        {
            *original_sender = Some(id.into());
        }
        self
    }

    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// Task name, when the payload is a request.
    pub fn task(&self) -> Option<&str> {
        match &self.payload {
            Payload::Request { task, .. } => Some(task),
            Payload::Result { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_creation() {
        let msg = Message::request("agent-a", "agent-b", "survey_site", json!({"lot": 12}));

        assert_eq!(msg.sender.as_str(), "agent-a");
        assert_eq!(msg.receiver.as_str(), "agent-b");
        assert_eq!(msg.kind(), MessageKind::Request);
        assert_eq!(msg.task(), Some("survey_site"));
    }

    #[test]
    fn test_result_has_no_task() {
        let msg = Message::result("agent-b", "agent-a", json!({"ok": true}), Some("t-1".into()));

        assert_eq!(msg.kind(), MessageKind::Result);
        assert_eq!(msg.task(), None);
    }

    #[test]
    fn test_original_sender_tagging() {
        let msg = Message::request("router", "worker", "ingest", json!({}))
            .with_original_sender("http_endpoint");

        match msg.payload {
            Payload::Request {
                original_sender, ..
            } => assert_eq!(original_sender.as_ref().map(AgentId::as_str), Some("http_endpoint")),
            _ => panic!("expected a request payload"),
        }
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = Payload::Request {
            task: "ingest".into(),
            data: json!({"n": 1}),
            original_sender: None,
        };
        let encoded = serde_json::to_value(&payload).unwrap();

        assert_eq!(encoded["type"], "request");
        assert_eq!(encoded["task"], "ingest");
        assert!(encoded.get("original_sender").is_none());
    }
}
