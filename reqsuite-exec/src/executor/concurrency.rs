use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds how many requests are in flight at once. `None` means unbounded,
/// a valid but extreme configuration.
#[derive(Clone)]
pub struct WorkerLimit {
    semaphore: Option<Arc<Semaphore>>,
}

impl WorkerLimit {
    pub fn new(max_concurrency: Option<usize>) -> Self {
        Self {
            semaphore: max_concurrency.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    pub async fn acquire(&self) -> WorkerPermit {
        let permit = match &self.semaphore {
            Some(sem) => {
                // Semaphore acquire only fails if the semaphore is closed,
                // which never happens here; we own it for the whole run.
                Some(sem.clone().acquire_owned().await.unwrap_or_else(|_| {
                    panic!("worker semaphore closed unexpectedly. This is a bug - please report it.");
                }))
            }
            None => None,
        };
        WorkerPermit { _permit: permit }
    }
}

pub struct WorkerPermit {
    _permit: Option<OwnedSemaphorePermit>,
}
