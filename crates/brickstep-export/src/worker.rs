//! A dedicated background thread for model processing.
//!
//! Each request gets exactly one response. Invocations on the worker run one
//! at a time; independent workers share nothing and can run side by side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use brickstep_core::WorkerError;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};

use crate::protocol::{handle_request, panic_message, WorkerRequest, WorkerResponse};

struct Job {
    request: WorkerRequest,
    reply: Sender<WorkerResponse>,
}

/// Handle to a worker thread.
pub struct StepWorker {
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
    terminated: Arc<AtomicBool>,
}

impl StepWorker {
    /// Start a worker thread.
    pub fn spawn() -> Result<Self, WorkerError> {
        let (sender, receiver) = unbounded::<Job>();
        let terminated = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&terminated);

        let handle = thread::Builder::new()
            .name("brickstep-worker".to_string())
            .spawn(move || run(receiver, flag))
            .map_err(|e| WorkerError::SpawnFailed {
                reason: e.to_string(),
            })?;

        tracing::debug!("spawned step worker");

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            terminated,
        })
    }

    /// Queue a request. The response is collected from the returned handle.
    pub fn submit(&self, request: WorkerRequest) -> Result<PendingResult, WorkerError> {
        let sender = self.sender.as_ref().ok_or(WorkerError::Disconnected)?;
        let (reply, receiver) = bounded(1);
        sender
            .send(Job { request, reply })
            .map_err(|_| WorkerError::Disconnected)?;
        Ok(PendingResult { receiver })
    }

    /// Submit and block until the response arrives.
    pub fn process(&self, request: WorkerRequest) -> Result<WorkerResponse, WorkerError> {
        self.submit(request)?.wait()
    }

    /// Finish queued work, then stop the thread.
    ///
    /// A panic on the worker thread is reported as `Panicked`.
    pub fn shutdown(mut self) -> Result<(), WorkerError> {
        self.sender.take();
        match self.handle.take() {
            Some(handle) => join_worker(handle),
            None => Ok(()),
        }
    }

    /// Discard the worker without waiting for queued work.
    ///
    /// Requests that have not started are dropped and their pending results
    /// report `Disconnected`. A request already running finishes in the
    /// background and its result is thrown away.
    pub fn terminate(mut self) {
        self.terminated.store(true, Ordering::SeqCst);
        self.sender.take();
        self.handle.take();
        tracing::debug!("terminated step worker");
    }
}

impl Drop for StepWorker {
    fn drop(&mut self) {
        // Closing the channel ends the loop once queued work is done.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = join_worker(handle) {
                tracing::warn!(error = %e, "step worker stopped abnormally");
            }
        }
    }
}

fn join_worker(handle: JoinHandle<()>) -> Result<(), WorkerError> {
    handle.join().map_err(|panic| WorkerError::Panicked {
        reason: panic_message(panic.as_ref()),
    })
}

fn run(receiver: Receiver<Job>, terminated: Arc<AtomicBool>) {
    for job in receiver {
        if terminated.load(Ordering::SeqCst) {
            break;
        }
        let response = handle_request(job.request);
        tracing::trace!(success = response.is_success(), "step worker finished request");
        // The caller may have dropped its PendingResult.
        let _ = job.reply.send(response);
    }
}

/// The eventual response to a submitted request.
pub struct PendingResult {
    receiver: Receiver<WorkerResponse>,
}

impl PendingResult {
    /// Block until the response arrives.
    pub fn wait(self) -> Result<WorkerResponse, WorkerError> {
        self.receiver.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Block for at most `timeout`. `Ok(None)` means still running.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<WorkerResponse>, WorkerError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }
}
