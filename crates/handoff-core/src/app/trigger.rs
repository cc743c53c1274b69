//! Trigger - "Start" ボタン相当
//!
//! 独立したフラグは持たず、RunState が Idle かどうかをそのまま映す。

use tokio::sync::watch;

use crate::domain::{HandoffError, RunState};

/// Read-only view of whether a new run may start.
#[derive(Clone)]
pub struct Trigger {
    state: watch::Receiver<RunState>,
}

impl Trigger {
    pub(crate) fn new(state: watch::Receiver<RunState>) -> Self {
        Self { state }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().is_idle()
    }

    /// Wait until the controller is back in `Idle`.
    pub async fn wait_enabled(&mut self) -> Result<(), HandoffError> {
        self.wait_for_state(RunState::Idle).await
    }

    /// Wait until the controller reaches `target`.
    pub async fn wait_for_state(&mut self, target: RunState) -> Result<(), HandoffError> {
        self.state
            .wait_for(|state| *state == target)
            .await
            .map(|_| ())
            .map_err(|_| HandoffError::ControllerClosed)
    }
}
