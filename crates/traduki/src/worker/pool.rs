//! Thread pool running the translation pipeline. Batch items go in with an
//! index, results come back in completion order; callers reassemble by
//! index.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info};

use crate::db::job_repo::JobRow;
use crate::error::WorkerError;
use crate::job::{IntakeUnit, JobMeta};
use crate::pipeline::{Pipeline, PipelineError};

/// One queued unit of work. `index` is the caller's position marker for
/// reassembling batch results.
pub struct WorkItem {
    pub index: usize,
    pub unit: IntakeUnit,
    pub meta: JobMeta,
}

pub struct WorkOutcome {
    pub index: usize,
    pub result: Result<JobRow, PipelineError>,
}

pub struct WorkerPool {
    item_sender: Sender<WorkItem>,
    result_receiver: Receiver<WorkOutcome>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Starts `worker_count` threads sharing one pipeline.
    ///
    /// # Panics
    /// Panics if `worker_count` is 0.
    pub fn new(pipeline: Arc<Pipeline>, worker_count: usize) -> Self {
        assert!(worker_count > 0, "worker_count must be > 0");
        let (item_sender, item_receiver) = bounded::<WorkItem>(worker_count * 2);
        let (result_sender, result_receiver) = bounded::<WorkOutcome>(worker_count * 2);
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let item_rx = item_receiver.clone();
            let result_tx = result_sender.clone();
            let shutdown_flag = Arc::clone(&shutdown);
            let worker_pipeline = Arc::clone(&pipeline);

            let handle = thread::spawn(move || {
                run_worker(worker_id, item_rx, result_tx, shutdown_flag, worker_pipeline);
            });

            workers.push(handle);
        }

        info!("Started {} workers", worker_count);

        Self {
            item_sender,
            result_receiver,
            workers,
            shutdown,
        }
    }

    pub fn submit(&self, item: WorkItem) -> Result<(), WorkerError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(WorkerError::ChannelClosed);
        }

        self.item_sender
            .send(item)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    pub fn try_recv_result(&self) -> Option<WorkOutcome> {
        self.result_receiver.try_recv().ok()
    }

    pub fn recv_result(&self) -> Option<WorkOutcome> {
        self.result_receiver.recv().ok()
    }

    pub fn shutdown(&self) {
        info!("Shutting down worker pool...");
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn wait(self) {
        // Drop sender to signal workers to exit
        drop(self.item_sender);

        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Worker {} panicked: {:?}", i, e);
            } else {
                debug!("Worker {} finished", i);
            }
        }

        info!("All workers have stopped");
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

fn run_worker(
    worker_id: usize,
    item_receiver: Receiver<WorkItem>,
    result_sender: Sender<WorkOutcome>,
    shutdown: Arc<AtomicBool>,
    pipeline: Arc<Pipeline>,
) {
    debug!("Worker {} started", worker_id);

    loop {
        if shutdown.load(Ordering::Relaxed) {
            debug!("Worker {} received shutdown signal", worker_id);
            break;
        }

        match item_receiver.recv_timeout(std::time::Duration::from_millis(100)) {
            Ok(item) => {
                debug!("Worker {} processing item {}", worker_id, item.index);
                let outcome = WorkOutcome {
                    index: item.index,
                    result: pipeline.run(item.unit, item.meta),
                };

                if result_sender.send(outcome).is_err() {
                    error!("Worker {} failed to send result", worker_id);
                    break;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                continue;
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                debug!("Worker {} item channel disconnected", worker_id);
                break;
            }
        }
    }

    debug!("Worker {} stopped", worker_id);
}
