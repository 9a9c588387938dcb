use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Runs futures on the tokio runtime with at most `capacity` of them in flight.
///
/// `run` waits only for a permit, never for the task itself. The permit moves into
/// the spawned task and is dropped when the task finishes, fails or panics. Callers
/// join the returned handles to know when everything is done.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    capacity: usize,
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity: capacity.get(),
            permits: Arc::new(Semaphore::new(capacity.get())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by a running task.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Stops accepting work. Tasks already running keep their permits; later `run`
    /// calls fail with `DispatcherClosed`.
    pub fn close(&self) {
        self.permits.close();
    }

    pub async fn run<F>(&self, task: F) -> Result<JoinHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Error::DispatcherClosed)?;

        Ok(tokio::spawn(async move {
            let _permit = permit;
            task.await
        }))
    }
}
