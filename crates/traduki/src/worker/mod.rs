pub mod pool;

pub use pool::{WorkItem, WorkOutcome, WorkerPool};
