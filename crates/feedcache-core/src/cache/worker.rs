//! Serial executor that owns the SQLite connection
//!
//! One OS thread, one FIFO queue. A job runs to completion, including the
//! caller's completion callback, before the next job is taken off the queue.
//! Dropping the worker closes the queue and waits for jobs already queued.

use crate::cache::sqlite;
use crate::config::FeedStoreConfig;
use crate::error::FeedStoreError;
use rusqlite::Connection;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc as std_mpsc;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A unit of work. Receives the connection, or `WorkerUnavailable` when the
/// worker is gone and the job can never run.
pub type Job = Box<dyn FnOnce(Result<&mut Connection, FeedStoreError>) + Send + 'static>;

const THREAD_NAME: &str = "feedcache-worker";

pub struct SerialWorker {
    sender: Option<mpsc::UnboundedSender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl SerialWorker {
    /// Spawn the worker thread and open the database on it.
    ///
    /// Returns once the database is open, so open failures reach the caller.
    pub fn spawn(config: FeedStoreConfig) -> Result<Self, FeedStoreError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), FeedStoreError>>();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let mut conn = match sqlite::open(&config) {
                    Ok(conn) => {
                        let _ = ready_tx.send(Ok(()));
                        conn
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                while let Some(job) = receiver.blocking_recv() {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(Ok(&mut conn))));
                    if outcome.is_err() {
                        warn!("Feed cache job panicked, worker continues");
                    }
                }

                sqlite::close(conn, &config);
                debug!("Feed cache worker stopped");
            })
            .map_err(|e| {
                warn!(error = %e, "Failed to spawn feed cache worker");
                FeedStoreError::WorkerUnavailable
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                sender: Some(sender),
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(FeedStoreError::WorkerUnavailable)
            }
        }
    }

    /// Queue `job` behind everything submitted before it
    pub fn submit(&self, job: Job) {
        let Some(sender) = &self.sender else {
            job(Err(FeedStoreError::WorkerUnavailable));
            return;
        };

        if let Err(mpsc::error::SendError(job)) = sender.send(job) {
            warn!("Feed cache worker is gone, failing operation");
            job(Err(FeedStoreError::WorkerUnavailable));
        }
    }
}

impl Drop for SerialWorker {
    fn drop(&mut self) {
        // closing the channel lets the thread drain the queue and exit
        self.sender.take();

        if let Some(handle) = self.handle.take() {
            // a completion may hold the last reference to the store
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                warn!("Feed cache worker panicked during shutdown");
            }
        }
    }
}
