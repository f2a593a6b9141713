// src/application/save_queue.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::repositories::document_repository::DocumentRepository;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, instrument};

enum Command {
    Save(Value),
    Flush(Sender<()>),
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicUsize,
    written: AtomicUsize,
    failed: AtomicUsize,
    coalesced: AtomicUsize,
}

/// Point-in-time copy of the queue counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveStats {
    pub submitted: usize,
    pub written: usize,
    pub failed: usize,
    pub coalesced: usize,
}

/// Serializes document saves through one background worker.
///
/// Snapshots are written in submission order. Snapshots that pile up while a
/// write is in flight are coalesced: only the newest one is written. Failures
/// are logged and counted, never returned to the submitter.
pub struct SaveQueue {
    sender: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl fmt::Debug for SaveQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveQueue")
            .field("stats", &self.stats())
            .finish()
    }
}

impl SaveQueue {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> ApplicationResult<Self> {
        let (sender, receiver) = mpsc::channel();
        let counters = Arc::new(Counters::default());
        let worker_counters = counters.clone();

        let worker = thread::Builder::new()
            .name("save-queue".to_string())
            .spawn(move || run_worker(receiver, repository, worker_counters))
            .map_err(|e| ApplicationError::Other(format!("Failed to start save worker: {}", e)))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            counters,
        })
    }

    /// Queues a snapshot of the whole document; returns immediately
    pub fn submit(&self, snapshot: Value) {
        self.counters.submitted.fetch_add(1, Ordering::SeqCst);
        if let Some(sender) = &self.sender {
            if sender.send(Command::Save(snapshot)).is_err() {
                error!("Save worker is gone, snapshot dropped");
                self.counters.failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Blocks until every snapshot submitted so far has been attempted
    #[instrument(skip(self), level = "debug")]
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if let Some(sender) = &self.sender {
            if sender.send(Command::Flush(ack_tx)).is_ok() {
                let _ = ack_rx.recv();
            }
        }
    }

    pub fn stats(&self) -> SaveStats {
        SaveStats {
            submitted: self.counters.submitted.load(Ordering::SeqCst),
            written: self.counters.written.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
            coalesced: self.counters.coalesced.load(Ordering::SeqCst),
        }
    }
}

impl Drop for SaveQueue {
    fn drop(&mut self) {
        // closing the channel lets the worker finish the backlog and exit
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(
    receiver: Receiver<Command>,
    repository: Arc<dyn DocumentRepository>,
    counters: Arc<Counters>,
) {
    let mut waiters: Vec<Sender<()>> = Vec::new();

    while let Ok(first) = receiver.recv() {
        let mut latest: Option<Value> = None;
        for command in std::iter::once(first).chain(receiver.try_iter()) {
            match command {
                Command::Save(snapshot) => {
                    if latest.replace(snapshot).is_some() {
                        counters.coalesced.fetch_add(1, Ordering::SeqCst);
                    }
                }
                Command::Flush(ack) => waiters.push(ack),
            }
        }

        if let Some(snapshot) = latest {
            match repository.store(&snapshot) {
                Ok(()) => {
                    counters.written.fetch_add(1, Ordering::SeqCst);
                    debug!("Data saved to backend");
                }
                Err(e) => {
                    counters.failed.fetch_add(1, Ordering::SeqCst);
                    error!("Failed to save data to backend: {}", e);
                }
            }
        }

        for ack in waiters.drain(..) {
            let _ = ack.send(());
        }
    }
    debug!("Save worker stopped");
}
