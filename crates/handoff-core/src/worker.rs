//! Worker factory - バックグラウンド実行コンテキストの生成
//!
//! 関数本体のソースを文字列化して実行する代わりに、静的に定義した
//! `WorkerBody` を tokio task として起動する。controller とは mpsc だけで
//! やり取りし、メモリは共有しない。

use std::future::Future;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{HandoffError, Payload, WorkerMessage};

/// The code that runs inside a worker.
#[async_trait]
pub trait WorkerBody: Send + 'static {
    async fn run(self: Box<Self>, scope: WorkerScope);
}

/// The worker's side of the channel pair.
pub struct WorkerScope {
    inbox: mpsc::UnboundedReceiver<Payload>,
    outbox: mpsc::UnboundedSender<WorkerMessage>,
}

impl WorkerScope {
    /// Next payload from the controller, `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Payload> {
        self.inbox.recv().await
    }

    pub fn post_message(&self, message: WorkerMessage) -> Result<(), HandoffError> {
        self.outbox
            .send(message)
            .map_err(|_| HandoffError::ControllerClosed)
    }
}

/// Cloneable controller → worker sender.
#[derive(Clone)]
pub struct WorkerSender {
    inbox: mpsc::UnboundedSender<Payload>,
}

impl WorkerSender {
    /// Post a payload. The payload is moved into the channel either way; whether the
    /// controller still has its own block is decided by `Payload::prepare`.
    pub fn post_message(&self, payload: Payload) -> Result<(), HandoffError> {
        self.inbox
            .send(payload)
            .map_err(|_| HandoffError::WorkerClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }
}

/// Replies coming back from a worker.
pub type WorkerReplies = mpsc::UnboundedReceiver<WorkerMessage>;

/// Live handle to a spawned worker.
pub struct WorkerHandle {
    sender: WorkerSender,
    replies: WorkerReplies,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn post_message(&self, payload: Payload) -> Result<(), HandoffError> {
        self.sender.post_message(payload)
    }

    pub async fn recv(&mut self) -> Option<WorkerMessage> {
        self.replies.recv().await
    }

    pub fn into_split(self) -> (WorkerSender, WorkerReplies, JoinHandle<()>) {
        (self.sender, self.replies, self.join)
    }
}

/// Spawn `body` as a background task and return a handle ready to exchange messages.
///
/// Must be called from inside a tokio runtime.
pub fn spawn_worker<B: WorkerBody>(body: B) -> WorkerHandle {
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();

    let scope = WorkerScope {
        inbox: inbox_rx,
        outbox: outbox_tx,
    };
    let join = tokio::spawn(async move {
        Box::new(body).run(scope).await;
        tracing::debug!("worker body returned");
    });

    WorkerHandle {
        sender: WorkerSender { inbox: inbox_tx },
        replies: outbox_rx,
        join,
    }
}

/// Adapter that turns an async closure into a `WorkerBody`.
pub struct FnWorker<F>(F);

/// Build a worker body from a closure.
///
/// ```ignore
/// let handle = spawn_worker(worker_fn(|scope| async move {
///     let _ = scope.post_message(WorkerMessage::Ready);
/// }));
/// ```
pub fn worker_fn<F, Fut>(f: F) -> FnWorker<F>
where
    F: FnOnce(WorkerScope) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    FnWorker(f)
}

#[async_trait]
impl<F, Fut> WorkerBody for FnWorker<F>
where
    F: FnOnce(WorkerScope) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run(self: Box<Self>, scope: WorkerScope) {
        (self.0)(scope).await
    }
}

/// Default worker: announces itself once, then acknowledges every payload.
///
/// Holds no state and does nothing with the block beyond receiving it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AckWorker;

#[async_trait]
impl WorkerBody for AckWorker {
    async fn run(self: Box<Self>, mut scope: WorkerScope) {
        if scope.post_message(WorkerMessage::Ready).is_err() {
            return;
        }
        while let Some(payload) = scope.recv().await {
            tracing::debug!(bytes = payload.len(), mode = %payload.mode(), "worker received payload");
            drop(payload);
            if scope.post_message(WorkerMessage::DataReceived).is_err() {
                break;
            }
        }
    }
}
