//! Operation manager.
//!
//! The manager owns the undo and redo stacks. Every request (`execute`,
//! `undo`, `redo`, `snapshot`, `clear`) is queued on an unbounded channel and
//! handled by one worker task, one request at a time, in the order the calls
//! were made. A request is queued during the call itself, before the
//! returned future is first polled, so call order is queue order.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use blockscape_core::{AppEvent, EventBus, OperationError, OperationEvent, OperationId, OperationKind};
use tokio::sync::{mpsc, oneshot};

use crate::operation::Operation;

/// Operation manager configuration
#[derive(Debug, Clone)]
pub struct OperationManagerConfig {
    /// Maximum undo history length. Older entries are disposed once the
    /// limit is exceeded. Zero keeps everything.
    pub max_depth: usize,
}

impl Default for OperationManagerConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// Identity of a request that ran an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationInfo {
    pub id: OperationId,
    pub name: String,
}

/// Point-in-time view of the history stacks, most recent entry last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub undo: Vec<String>,
    pub redo: Vec<String>,
}

impl HistorySnapshot {
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Name of the entry the next undo would revert.
    pub fn next_undo(&self) -> Option<&str> {
        self.undo.last().map(String::as_str)
    }

    /// Name of the entry the next redo would reapply.
    pub fn next_redo(&self) -> Option<&str> {
        self.redo.last().map(String::as_str)
    }
}

type Reply<T> = oneshot::Sender<Result<T, OperationError>>;

enum Request {
    Execute {
        id: OperationId,
        operation: Box<dyn Operation>,
        reply: Reply<OperationInfo>,
    },
    Undo {
        id: OperationId,
        reply: Reply<Option<OperationInfo>>,
    },
    Redo {
        id: OperationId,
        reply: Reply<Option<OperationInfo>>,
    },
    Snapshot {
        reply: oneshot::Sender<HistorySnapshot>,
    },
    Clear {
        reply: oneshot::Sender<()>,
    },
}

/// Serializes operation execution and maintains undo/redo history.
///
/// Dropping the manager closes the queue; the worker finishes the requests
/// already queued, disposes everything left in history and exits.
pub struct OperationManager {
    sender: mpsc::UnboundedSender<Request>,
    bus: Arc<EventBus>,
    next_id: AtomicU64,
}

impl OperationManager {
    /// Starts the worker task. Must be called from within a Tokio runtime.
    pub fn spawn(config: OperationManagerConfig, bus: Arc<EventBus>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = Worker {
            config,
            bus: bus.clone(),
            undo: Vec::new(),
            redo: Vec::new(),
        };
        tokio::spawn(worker.run(receiver));
        Self {
            sender,
            bus,
            next_id: AtomicU64::new(1),
        }
    }

    /// Queues `operation` for its first application.
    ///
    /// `OperationEvent::Added` is published before this returns. The future
    /// resolves once the operation has run: on success it is on the undo
    /// stack and the redo stack has been discarded; on failure neither stack
    /// changed and the operation has been disposed.
    pub fn execute(
        &self,
        operation: impl Operation + 'static,
    ) -> impl Future<Output = Result<OperationInfo, OperationError>> + Send + 'static {
        let id = self.next_id();
        let name = operation.name().to_string();
        tracing::debug!("Queueing {} ({})", name, id);
        self.bus
            .publish(AppEvent::Operation(OperationEvent::Added { id, name }))
            .ok();

        let (reply, rx) = oneshot::channel();
        let sent = self.sender.send(Request::Execute {
            id,
            operation: Box::new(operation),
            reply,
        });
        Self::await_reply(sent.is_ok(), rx)
    }

    /// Reverts the most recent entry. Resolves to `None` when there is
    /// nothing to undo.
    pub fn undo(
        &self,
    ) -> impl Future<Output = Result<Option<OperationInfo>, OperationError>> + Send + 'static {
        let (reply, rx) = oneshot::channel();
        let sent = self.sender.send(Request::Undo {
            id: self.next_id(),
            reply,
        });
        Self::await_reply(sent.is_ok(), rx)
    }

    /// Reapplies the most recently undone entry. Resolves to `None` when
    /// there is nothing to redo.
    pub fn redo(
        &self,
    ) -> impl Future<Output = Result<Option<OperationInfo>, OperationError>> + Send + 'static {
        let (reply, rx) = oneshot::channel();
        let sent = self.sender.send(Request::Redo {
            id: self.next_id(),
            reply,
        });
        Self::await_reply(sent.is_ok(), rx)
    }

    /// History as seen after every request queued before this one.
    pub fn snapshot(
        &self,
    ) -> impl Future<Output = Result<HistorySnapshot, OperationError>> + Send + 'static {
        let (reply, rx) = oneshot::channel();
        let sent = self.sender.send(Request::Snapshot { reply }).is_ok();
        async move {
            if !sent {
                return Err(OperationError::ManagerClosed);
            }
            rx.await.map_err(|_| OperationError::ManagerClosed)
        }
    }

    /// Disposes and drops both stacks.
    pub fn clear(&self) -> impl Future<Output = Result<(), OperationError>> + Send + 'static {
        let (reply, rx) = oneshot::channel();
        let sent = self.sender.send(Request::Clear { reply }).is_ok();
        async move {
            if !sent {
                return Err(OperationError::ManagerClosed);
            }
            rx.await.map_err(|_| OperationError::ManagerClosed)
        }
    }

    /// True once the worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn next_id(&self) -> OperationId {
        OperationId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn await_reply<T>(
        sent: bool,
        rx: oneshot::Receiver<Result<T, OperationError>>,
    ) -> Result<T, OperationError> {
        if !sent {
            return Err(OperationError::ManagerClosed);
        }
        rx.await.map_err(|_| OperationError::ManagerClosed)?
    }
}

impl std::fmt::Debug for OperationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationManager")
            .field("closed", &self.is_closed())
            .finish()
    }
}

struct Worker {
    config: OperationManagerConfig,
    bus: Arc<EventBus>,
    undo: Vec<Box<dyn Operation>>,
    redo: Vec<Box<dyn Operation>>,
}

impl Worker {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = receiver.recv().await {
            match request {
                Request::Execute {
                    id,
                    operation,
                    reply,
                } => {
                    let result = self.execute(id, operation).await;
                    reply.send(result).ok();
                }
                Request::Undo { id, reply } => {
                    let result = self.undo(id).await;
                    reply.send(result).ok();
                }
                Request::Redo { id, reply } => {
                    let result = self.redo(id).await;
                    reply.send(result).ok();
                }
                Request::Snapshot { reply } => {
                    reply.send(self.snapshot()).ok();
                }
                Request::Clear { reply } => {
                    self.clear();
                    reply.send(()).ok();
                }
            }
        }
        self.clear();
        tracing::debug!("Operation manager worker stopped");
    }

    async fn execute(
        &mut self,
        id: OperationId,
        mut operation: Box<dyn Operation>,
    ) -> Result<OperationInfo, OperationError> {
        let name = operation.name().to_string();
        let result = operation.apply().await;
        match result {
            Ok(()) => {
                for discarded in std::mem::take(&mut self.redo) {
                    self.dispose(discarded);
                }
                self.undo.push(operation);
                self.trim();
                self.completed(id, &name, OperationKind::Do, None);
                Ok(OperationInfo { id, name })
            }
            Err(e) => {
                tracing::warn!("{} ({}) failed: {}", name, id, e);
                self.completed(id, &name, OperationKind::Do, Some(&e));
                self.dispose(operation);
                Err(e)
            }
        }
    }

    async fn undo(&mut self, id: OperationId) -> Result<Option<OperationInfo>, OperationError> {
        let Some(mut operation) = self.undo.pop() else {
            tracing::debug!("Nothing to undo");
            return Ok(None);
        };
        let name = operation.name().to_string();
        match operation.undo().await {
            Ok(()) => {
                self.redo.push(operation);
                self.completed(id, &name, OperationKind::Undo, None);
                Ok(Some(OperationInfo { id, name }))
            }
            Err(e) => {
                tracing::warn!("Undo of {} ({}) failed: {}", name, id, e);
                self.completed(id, &name, OperationKind::Undo, Some(&e));
                self.dispose(operation);
                Err(e)
            }
        }
    }

    async fn redo(&mut self, id: OperationId) -> Result<Option<OperationInfo>, OperationError> {
        let Some(mut operation) = self.redo.pop() else {
            tracing::debug!("Nothing to redo");
            return Ok(None);
        };
        let name = operation.name().to_string();
        match operation.apply().await {
            Ok(()) => {
                self.undo.push(operation);
                self.trim();
                self.completed(id, &name, OperationKind::Redo, None);
                Ok(Some(OperationInfo { id, name }))
            }
            Err(e) => {
                tracing::warn!("Redo of {} ({}) failed: {}", name, id, e);
                self.completed(id, &name, OperationKind::Redo, Some(&e));
                self.dispose(operation);
                Err(e)
            }
        }
    }

    fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            undo: self.undo.iter().map(|op| op.name().to_string()).collect(),
            redo: self.redo.iter().map(|op| op.name().to_string()).collect(),
        }
    }

    fn clear(&mut self) {
        let undo = std::mem::take(&mut self.undo);
        let redo = std::mem::take(&mut self.redo);
        for operation in undo.into_iter().chain(redo) {
            self.dispose(operation);
        }
    }

    fn trim(&mut self) {
        if self.config.max_depth == 0 {
            return;
        }
        while self.undo.len() > self.config.max_depth {
            let oldest = self.undo.remove(0);
            self.dispose(oldest);
        }
    }

    fn dispose(&self, mut operation: Box<dyn Operation>) {
        operation.dispose();
        self.bus
            .publish(AppEvent::Operation(OperationEvent::Disposed {
                name: operation.name().to_string(),
            }))
            .ok();
    }

    fn completed(
        &self,
        id: OperationId,
        name: &str,
        kind: OperationKind,
        error: Option<&OperationError>,
    ) {
        self.bus
            .publish(AppEvent::Operation(OperationEvent::Completed {
                id,
                name: name.to_string(),
                kind,
                error: error.map(|e| e.to_string()),
                undo_depth: self.undo.len(),
                redo_depth: self.redo.len(),
            }))
            .ok();
    }
}
