//! RunController - allocate → dispatch → await-acknowledgment のサイクル
//!
//! # フロー
//! 1. start(): trigger を無効化し、意図をログに出す（ここで転送モードを確定）
//! 2. render delay の後に buffer を確保し、準備完了をログに出す
//! 3. 一度 yield してから worker へ送信（Copy なら clone、Transfer なら move）
//! 4. worker の返信をログに出し、trigger を有効化
//!
//! 同時に走る run は 1 本だけ。キューではなく trigger（状態の CAS）で制御する。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::app::config::RunConfig;
use crate::app::trigger::Trigger;
use crate::console::Console;
use crate::domain::{
    Buffer, HandoffError, LogSource, Payload, RunId, RunReport, RunState, TransferMode,
};
use crate::ports::{Clock, SystemClock};
use crate::worker::{AckWorker, WorkerBody, WorkerReplies, WorkerSender, spawn_worker};

/// Bookkeeping for the run between dispatch and reply.
struct InFlight {
    run_id: RunId,
    mode: TransferMode,
    bytes: usize,
    sender_retained: bool,
    dispatched_at: Instant,
}

struct Inner {
    config: RunConfig,
    transfer: AtomicBool,
    state: watch::Sender<RunState>,
    console: Console,
    clock: Arc<dyn Clock>,
    worker: WorkerSender,
    in_flight: Mutex<Option<InFlight>>,
    reports: Mutex<Vec<RunReport>>,
}

/// Drives runs against a single worker.
///
/// Dropping the controller stops its listener and its worker.
pub struct RunController {
    inner: Arc<Inner>,
    listener: JoinHandle<()>,
    worker: JoinHandle<()>,
}

impl RunController {
    /// Controller with the default `AckWorker`, the system clock and a fresh console.
    pub fn new(config: RunConfig) -> Result<Self, HandoffError> {
        Self::with_parts(config, AckWorker, Arc::new(SystemClock), Console::new())
    }

    /// Wire a controller from explicit parts.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn with_parts<B: WorkerBody>(
        config: RunConfig,
        body: B,
        clock: Arc<dyn Clock>,
        console: Console,
    ) -> Result<Self, HandoffError> {
        config.validate()?;

        let (sender, replies, worker) = spawn_worker(body).into_split();
        let (state, _) = watch::channel(RunState::Idle);

        let inner = Arc::new(Inner {
            transfer: AtomicBool::new(config.transfer),
            config,
            state,
            console,
            clock,
            worker: sender,
            in_flight: Mutex::new(None),
            reports: Mutex::new(Vec::new()),
        });

        let listener = tokio::spawn(listen(Arc::clone(&inner), replies));

        Ok(Self {
            inner,
            listener,
            worker,
        })
    }

    /// Begin one run (Idle → Allocating).
    ///
    /// The trigger is disabled before this returns. The rest of the cycle runs in
    /// the background; watch `trigger()` for completion.
    pub fn start(&self) -> Result<RunId, HandoffError> {
        let mut current = RunState::Idle;
        let acquired = self.inner.state.send_if_modified(|state| {
            if state.is_idle() {
                *state = RunState::Allocating;
                true
            } else {
                current = *state;
                false
            }
        });
        if !acquired {
            return Err(HandoffError::RunInFlight(current));
        }

        let run_id = RunId::new();
        // 転送モードはここで確定。以後の toggle はこの run に影響しない
        let mode = self.transfer_mode();

        self.inner.log_thread(format!(
            "Creating data buffer: {} Mb ...",
            self.inner.config.buffer_size_mb
        ));

        let span = tracing::info_span!("run", %run_id, %mode);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.run_cycle(run_id, mode).await }.instrument(span));

        Ok(run_id)
    }

    /// Flip the transfer flag and return the new mode.
    pub fn toggle_transfer(&self) -> TransferMode {
        let previous = self.inner.transfer.fetch_xor(true, Ordering::SeqCst);
        TransferMode::from_flag(!previous)
    }

    pub fn set_transfer(&self, transfer: bool) {
        self.inner.transfer.store(transfer, Ordering::SeqCst);
    }

    /// Mode the next run will use.
    pub fn transfer_mode(&self) -> TransferMode {
        TransferMode::from_flag(self.inner.transfer.load(Ordering::SeqCst))
    }

    pub fn state(&self) -> RunState {
        *self.inner.state.borrow()
    }

    pub fn trigger(&self) -> Trigger {
        Trigger::new(self.inner.state.subscribe())
    }

    pub fn console(&self) -> &Console {
        &self.inner.console
    }

    /// Reports of every completed run, oldest first.
    pub fn reports(&self) -> Vec<RunReport> {
        self.inner.lock_reports().clone()
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        self.listener.abort();
        self.worker.abort();
    }
}

impl Inner {
    async fn run_cycle(self: Arc<Self>, run_id: RunId, mode: TransferMode) {
        tokio::time::sleep(self.config.render_delay()).await;

        if let Err(err) = self.allocate_and_dispatch(run_id, mode).await {
            tracing::warn!(error = %err, "run aborted");
            self.log_thread(format!("Run failed: {err}"));
            self.lock_in_flight().take();
            self.state.send_replace(RunState::Idle);
        }
    }

    /// Allocating → Dispatching → AwaitingReply.
    async fn allocate_and_dispatch(&self, run_id: RunId, mode: TransferMode) -> Result<(), HandoffError> {
        let bytes = self.config.buffer_bytes()?;
        // 確保とゼロ埋めは CPU を占有するので blocking pool で行う
        let buffer = tokio::task::spawn_blocking(move || Buffer::allocate(bytes)).await??;

        let mut ready = String::from("Buffer ready, sending to worker");
        if mode.is_transfer() {
            ready.push_str(" using transferable object");
        }
        self.log_thread(ready);
        self.state.send_replace(RunState::Dispatching);

        // 送信前に一度スケジューラへ返す
        tokio::task::yield_now().await;

        let dispatched_at = Instant::now();
        // Copy モードの clone も同様に async スレッドから外す
        let (payload, kept) =
            tokio::task::spawn_blocking(move || Payload::prepare(buffer, mode)).await?;
        // 返信が先に届いてもいいように、送信前に記録しておく
        *self.lock_in_flight() = Some(InFlight {
            run_id,
            mode,
            bytes,
            sender_retained: kept.is_some(),
            dispatched_at,
        });
        self.state.send_replace(RunState::AwaitingReply);

        self.worker.post_message(payload)?;
        drop(kept);
        Ok(())
    }

    /// AwaitingReply → Idle.
    fn complete_run(&self) {
        let Some(flight) = self.lock_in_flight().take() else {
            tracing::debug!("worker reply with no run in flight");
            return;
        };

        let report = RunReport {
            run_id: flight.run_id,
            mode: flight.mode,
            bytes: flight.bytes,
            sender_retained: flight.sender_retained,
            round_trip: flight.dispatched_at.elapsed(),
        };
        tracing::info!(
            run_id = %report.run_id,
            mode = %report.mode,
            bytes = report.bytes,
            round_trip_ms = report.round_trip.as_secs_f64() * 1000.0,
            "run completed"
        );

        self.lock_reports().push(report);
        self.state.send_replace(RunState::Idle);
    }

    fn log_thread(&self, message: String) {
        self.console
            .append(LogSource::Thread, message, self.clock.now_string());
    }

    fn log_worker(&self, message: String) {
        self.console
            .append(LogSource::Worker, message, self.clock.now_string());
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_reports(&self) -> MutexGuard<'_, Vec<RunReport>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Log every worker message; anything but the readiness notice completes the run.
async fn listen(inner: Arc<Inner>, mut replies: WorkerReplies) {
    while let Some(message) = replies.recv().await {
        inner.log_worker(message.to_string());
        if message.is_ready() {
            continue;
        }
        inner.complete_run();
    }
    tracing::warn!("worker reply channel closed");
}
