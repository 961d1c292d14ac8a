//! Background execution of an organize run.
//!
//! A worker owns one thread that runs [`mover::run`] and forwards its events
//! over a channel. The caller keeps the [`CancelToken`] side and can request
//! a stop at any time; the run notices it before the next file.

use crate::cancel::CancelToken;
use crate::error::OrganizeError;
use crate::events::OrganizeEvent;
use crate::mover::{self, OrganizeRequest, Outcome};
use anyhow::{bail, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Completed(usize),
    Cancelled(usize),
    Failed(String),
}

impl WorkerState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerState::Completed(_) | WorkerState::Cancelled(_) | WorkerState::Failed(_)
        )
    }
}

pub struct OrganizeWorker {
    request: OrganizeRequest,
    cancel: CancelToken,
    state: Arc<Mutex<WorkerState>>,
    handle: Option<JoinHandle<()>>,
}

impl OrganizeWorker {
    pub fn new(request: OrganizeRequest) -> Self {
        Self {
            request,
            cancel: CancelToken::new(),
            state: Arc::new(Mutex::new(WorkerState::Idle)),
            handle: None,
        }
    }

    /// Token that cancels this worker; clone it into signal handlers.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Spawn the background thread. Events arrive on the returned receiver,
    /// which disconnects after the terminal event.
    pub fn start(&mut self) -> Result<Receiver<OrganizeEvent>> {
        if self.state() != WorkerState::Idle {
            bail!("organize worker already started");
        }
        set_state(&self.state, WorkerState::Running);

        let (tx, rx) = mpsc::channel();
        let request = self.request.clone();
        let cancel = self.cancel.clone();
        let state = Arc::clone(&self.state);

        let spawned = thread::Builder::new()
            .name("organize-worker".to_string())
            .spawn(move || {
                debug!(path = %request.target.display(), "worker running");
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    mover::run(&request, &cancel, &mut |event| {
                        let _ = tx.send(event);
                    })
                }));

                let final_state = match result {
                    Ok(Ok(Outcome::Cancelled { moved })) => WorkerState::Cancelled(moved),
                    Ok(Ok(outcome)) => WorkerState::Completed(outcome.moved()),
                    Ok(Err(e)) => WorkerState::Failed(e.to_string()),
                    Err(payload) => {
                        let err = panic_error(payload.as_ref());
                        error!(error = %err, "worker panicked");
                        let message = err.to_string();
                        let _ = tx.send(OrganizeEvent::Error(message.clone()));
                        WorkerState::Failed(message)
                    }
                };
                debug!(state = ?final_state, "worker finished");
                set_state(&state, final_state);
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(rx)
            }
            Err(e) => {
                set_state(&self.state, WorkerState::Idle);
                Err(e.into())
            }
        }
    }

    /// Request a cooperative stop. A no-op once the run has finished.
    pub fn cancel(&self) {
        if !self.state().is_terminal() {
            self.cancel.cancel();
        }
    }

    pub fn state(&self) -> WorkerState {
        match self.state.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Block until the background thread exits and return its final state.
    pub fn wait(&mut self) -> WorkerState {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                set_state(
                    &self.state,
                    WorkerState::Failed("organize worker panicked".to_string()),
                );
            }
        }
        self.state()
    }
}

impl Drop for OrganizeWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel();
            self.wait();
        }
    }
}

fn set_state(state: &Mutex<WorkerState>, next: WorkerState) {
    match state.lock() {
        Ok(mut guard) => *guard = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}

fn panic_error(payload: &(dyn std::any::Any + Send)) -> OrganizeError {
    let reason = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    OrganizeError::Unexpected(reason)
}

/// Serializes organize runs and keeps the running total for the session.
#[derive(Default)]
pub struct Session {
    current: Option<OrganizeWorker>,
    files_organized: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, cancelling and waiting for any previous one first.
    pub fn start(&mut self, request: OrganizeRequest) -> Result<Receiver<OrganizeEvent>> {
        self.start_worker(OrganizeWorker::new(request))
    }

    /// Like [`Session::start`] for a worker built by the caller, so its
    /// cancel token can be wired up before any file moves.
    pub fn start_worker(&mut self, mut worker: OrganizeWorker) -> Result<Receiver<OrganizeEvent>> {
        if let Some(mut previous) = self.current.take() {
            previous.cancel();
            let state = previous.wait();
            self.record(&state);
        }

        let rx = worker.start()?;
        self.current = Some(worker);
        Ok(rx)
    }

    pub fn cancel(&self) {
        if let Some(worker) = &self.current {
            worker.cancel();
        }
    }

    /// Wait for the current run and fold its count into the session total.
    pub fn finish(&mut self) -> Option<WorkerState> {
        let mut worker = self.current.take()?;
        let state = worker.wait();
        self.record(&state);
        Some(state)
    }

    pub fn files_organized(&self) -> usize {
        self.files_organized
    }

    fn record(&mut self, state: &WorkerState) {
        if let WorkerState::Completed(n) | WorkerState::Cancelled(n) = state {
            self.files_organized += n;
        }
    }
}
