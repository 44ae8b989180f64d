//! Agent registry, id resolution, and the per-agent dispatch loops.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::agent::{Agent, AgentContext, AgentId};
use super::errors::RegistryError;
use super::message::Message;

type RouteTable = Arc<RwLock<HashMap<AgentId, mpsc::UnboundedSender<Message>>>>;

/// Cheap cloneable handle that resolves agent ids to inboxes. This is the
/// only way messages enter the system, for agents and outside callers alike.
#[derive(Clone)]
pub struct Resolver {
    routes: RouteTable,
}

impl Resolver {
    /// Queues `message` on the receiver's inbox.
    ///
    /// An unknown receiver is a warning and `Err`; callers that treat
    /// delivery as fire-and-forget ignore it. A receiver whose loop has
    /// already exited is logged and the message is dropped without error.
    pub fn deliver(&self, message: Message) -> Result<(), RegistryError> {
        let inbox = self.routes.read().get(&message.receiver).cloned();
        match inbox {
            Some(inbox) => {
                if let Err(returned) = inbox.send(message) {
                    let message = returned.0;
                    warn!(
                        receiver = %message.receiver,
                        sender = %message.sender,
                        kind = %message.kind(),
                        "Receiver already stopped, dropping message"
                    );
                }
                Ok(())
            }
            None => {
                warn!(
                    receiver = %message.receiver,
                    sender = %message.sender,
                    kind = %message.kind(),
                    "No agent registered under receiver id, dropping message"
                );
                Err(RegistryError::UnknownReceiver(message.receiver))
            }
        }
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.routes.read().contains_key(id)
    }

    pub fn agent_ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<_> = self.routes.read().keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }
}

struct Registered {
    agent: Box<dyn Agent>,
    inbox: mpsc::UnboundedReceiver<Message>,
}

/// Owns the full set of agents and their host tasks.
///
/// Usage is three-phase: `register` every agent, `start_all` once, and
/// `stop_all` on shutdown. Messages sent between those phases queue on the
/// inboxes and are handled as soon as the loops come up.
pub struct AgentRegistry {
    routes: RouteTable,
    pending: Vec<Registered>,
    handles: Vec<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            routes: Arc::new(RwLock::new(HashMap::new())),
            pending: Vec::new(),
            handles: Vec::new(),
            shutdown,
        }
    }

    /// Adds an agent under its own id and allocates its inbox. The inbox is
    /// unbounded; senders never block or fail on a live agent.
    pub fn register(&mut self, agent: impl Agent) -> Result<(), RegistryError> {
        let id = agent.id().clone();
        let mut routes = self.routes.write();
        if routes.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        routes.insert(id, tx);
        drop(routes);
        self.pending.push(Registered {
            agent: Box::new(agent),
            inbox: rx,
        });
        Ok(())
    }

    /// Spawns one host task per registered agent. Idempotent for agents that
    /// are already running; only newly registered ones are started.
    pub fn start_all(&mut self) {
        for entry in self.pending.drain(..) {
            let ctx = AgentContext::new(
                entry.agent.id().clone(),
                Resolver {
                    routes: Arc::clone(&self.routes),
                },
            );
            let shutdown = self.shutdown.subscribe();
            self.handles
                .push(tokio::spawn(dispatch_loop(entry.agent, entry.inbox, ctx, shutdown)));
        }
    }

    /// Signals every loop to stop and waits for all of them to finish. Each
    /// loop completes its in-flight handler first; messages still queued
    /// behind the stop signal are discarded.
    pub async fn stop_all(&mut self) {
        self.shutdown.send_replace(true);
        for handle in self.handles.drain(..) {
            if let Err(err) = handle.await {
                error!(error = %err, "Agent task aborted before stopping cleanly");
            }
        }
    }

    pub fn resolver(&self) -> Resolver {
        Resolver {
            routes: Arc::clone(&self.routes),
        }
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Host loop for one agent: lifecycle hooks around a receive loop that feeds
/// the handler one message at a time.
async fn dispatch_loop(
    mut agent: Box<dyn Agent>,
    mut inbox: mpsc::UnboundedReceiver<Message>,
    ctx: AgentContext,
    mut shutdown: watch::Receiver<bool>,
) {
    agent.on_start().await;
    info!(agent = %ctx.agent_id(), "Agent started");

    loop {
        // Biased toward shutdown: once the stop signal is pending, it beats
        // any messages still queued on the inbox.
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            next = inbox.recv() => {
                let Some(message) = next else { break };
                let sender = message.sender.clone();
                let kind = message.kind();
                if let Err(err) = agent.on_message(message, &ctx).await {
                    error!(
                        agent = %ctx.agent_id(),
                        sender = %sender,
                        %kind,
                        error = %err,
                        "Message handler failed"
                    );
                }
            }
        }
    }

    agent.on_stop().await;
    info!(agent = %ctx.agent_id(), "Agent stopped");
}
