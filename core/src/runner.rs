use log::{error, info};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::LoadConfig;
use crate::dispatcher::Dispatcher;
use crate::envelope::RequestEnvelope;
use crate::error::Result;
use crate::task::{RunStats, TaskContext, execute};
use crate::token::resolve_token;
use crate::transport::HttpTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub total: usize,
    pub successes: u64,
    pub failures: u64,
    pub elapsed: Duration,
}

impl Report {
    /// True when every submitted request succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures == 0 && self.successes == self.total as u64
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "elapsed: {:.6}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "failures: {}", self.failures)?;
        write!(f, "successes: {}/{}", self.successes, self.total)
    }
}

/// Resolves the token, fires `config.total` create-call requests through a
/// dispatcher bounded by `config.concurrency` and waits for all of them.
///
/// Only token acquisition can fail the run. Per-request failures are counted in
/// the report.
pub async fn run_load<T: HttpTransport>(config: &LoadConfig, transport: Arc<T>) -> Result<Report> {
    let start = Instant::now();

    let token = resolve_token(transport.as_ref(), &config.token_source).await?;

    let ctx = Arc::new(TaskContext {
        rpc_url: config.rpc_url.clone(),
        token,
        envelope: RequestEnvelope::create_call(
            config.meeting_group_id.clone(),
            config.duration_seconds,
        ),
        request_timeout: config.request_timeout,
        stats: RunStats::new(),
    });

    let dispatcher = Dispatcher::new(config.concurrency);
    info!(
        "dispatching {} requests to {} with concurrency {}",
        config.total,
        config.rpc_url,
        dispatcher.capacity()
    );

    let mut v = Vec::with_capacity(config.total);
    for i in 0..config.total {
        let t = dispatcher
            .run(execute(transport.clone(), ctx.clone(), i))
            .await?;
        v.push(t);
    }

    let mut lost = 0;
    for t in v {
        if let Err(e) = t.await {
            error!("task did not complete: {e}");
            lost += 1;
        }
    }

    Ok(Report {
        total: config.total,
        successes: ctx.stats.successes(),
        failures: ctx.stats.failures() + lost,
        elapsed: start.elapsed(),
    })
}
