//! Load generator for the `call.create` JSON-RPC method.
//!
//! A run fetches one bearer token over HTTP Basic Auth (or uses a static one), then
//! pushes a fixed number of identical create-call requests through a [`Dispatcher`]
//! that bounds how many are in flight.
//!
//! Progress goes through the `log` facade, which the `meetload` binary routes to
//! stderr. Only the final [`Report`] is printed to stdout.

pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod runner;
pub mod task;
pub mod token;
pub mod transport;

pub use config::{AuthSettings, LoadConfig, LoadConfigBuilder, TokenSource};
pub use dispatcher::Dispatcher;
pub use envelope::{CallParams, ErrorCode, RemoteError, RequestEnvelope, ResponseEnvelope};
pub use error::{Error, Result};
pub use runner::{Report, run_load};
pub use task::{Outcome, RunStats, TaskContext, execute};
pub use token::{fetch_token, resolve_token};
pub use transport::{HttpTransport, ReqwestTransport};
