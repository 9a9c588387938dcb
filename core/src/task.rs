use log::{error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::error::Error;
use crate::transport::HttpTransport;

/// Counters shared by every task of a run.
#[derive(Debug, Default)]
pub struct RunStats {
    successes: AtomicU64,
    failures: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Read-only state handed to every task of a run.
#[derive(Debug)]
pub struct TaskContext {
    pub rpc_url: String,
    pub token: String,
    pub envelope: RequestEnvelope,
    pub request_timeout: Option<Duration>,
    pub stats: RunStats,
}

#[derive(Debug)]
pub enum Outcome {
    Success,
    Failed(Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Sends one create-call request and records the result in the shared stats.
/// Every failure ends here; nothing escapes to sibling tasks or the driver.
pub async fn execute<T: HttpTransport>(
    transport: Arc<T>,
    ctx: Arc<TaskContext>,
    index: usize,
) -> Outcome {
    info!("start task: {index}");

    let body = match transport
        .post_with_bearer(&ctx.rpc_url, &ctx.token, &ctx.envelope, ctx.request_timeout)
        .await
    {
        Ok(body) => body,
        Err(e) => {
            error!("task {index}: error sending request: {e}");
            ctx.stats.record_failure();
            return Outcome::Failed(e);
        }
    };

    let outcome = ResponseEnvelope::parse(&body).and_then(|resp| resp.into_result());
    match outcome {
        Ok(_) => {
            ctx.stats.record_success();
            info!("task {index}: resp body: {body}");
            Outcome::Success
        }
        Err(e @ Error::RemoteRejected { .. }) => {
            warn!("task {index}: {e}");
            ctx.stats.record_failure();
            Outcome::Failed(e)
        }
        Err(e) => {
            warn!("task {index}: {e}, body: {body}");
            ctx.stats.record_failure();
            Outcome::Failed(e)
        }
    }
}
