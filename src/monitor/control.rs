//! Run/stop control for the monitor loop

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle state of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonitorState {
    Idle,
    Running,
}

/// Cloneable handle that starts and stops a monitor from any task.
///
/// Stopping is cooperative: the loop sees the new state at its next height
/// check, after finishing the blocks it is already processing.
#[derive(Debug, Clone)]
pub struct MonitorControl {
    state: Arc<watch::Sender<MonitorState>>,
}

impl MonitorControl {
    pub fn new() -> Self {
        let (state, _) = watch::channel(MonitorState::Idle);
        Self {
            state: Arc::new(state),
        }
    }

    /// Move Idle to Running. Returns false if already running.
    pub fn start(&self) -> bool {
        self.transition(MonitorState::Idle, MonitorState::Running)
    }

    /// Move Running to Idle. Returns false if already idle.
    pub fn stop(&self) -> bool {
        self.transition(MonitorState::Running, MonitorState::Idle)
    }

    /// Stop the monitor, waiting first for it to start if it has not yet.
    ///
    /// A stop requested before `run` would otherwise be lost, since `run`
    /// starts the monitor itself.
    pub async fn stop_when_running(&self) {
        let mut state = self.subscribe();
        if state
            .wait_for(|state| *state == MonitorState::Running)
            .await
            .is_ok()
        {
            self.stop();
        }
    }

    pub fn state(&self) -> MonitorState {
        *self.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state() == MonitorState::Running
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.state.subscribe()
    }

    fn transition(&self, from: MonitorState, to: MonitorState) -> bool {
        self.state.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                false
            }
        })
    }
}

impl Default for MonitorControl {
    fn default() -> Self {
        Self::new()
    }
}
