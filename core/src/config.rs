use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_DURATION_SECS: u64 = 900;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Token obtained beforehand; the auth endpoint is never contacted.
    Static(String),
    Fetch(AuthSettings),
}

#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub rpc_url: String,
    pub token_source: TokenSource,
    pub total: usize,
    pub concurrency: NonZeroUsize,
    pub duration_seconds: u64,
    pub meeting_group_id: String,
    pub request_timeout: Option<Duration>,
    pub verify_tls: bool,
}

#[derive(Debug)]
pub struct LoadConfigBuilder {
    rpc_url: Option<String>,
    auth_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    static_token: Option<String>,
    auth_timeout: Duration,
    total: usize,
    concurrency: usize,
    duration_seconds: u64,
    meeting_group_id: String,
    request_timeout: Option<Duration>,
    verify_tls: bool,
}

impl Default for LoadConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadConfigBuilder {
    pub fn new() -> Self {
        Self {
            rpc_url: None,
            auth_url: None,
            username: None,
            password: None,
            static_token: None,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            total: 1,
            concurrency: 1,
            duration_seconds: DEFAULT_DURATION_SECS,
            meeting_group_id: String::new(),
            request_timeout: None,
            verify_tls: false,
        }
    }

    pub fn with_rpc_url<T: Into<String>>(mut self, url: T) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    pub fn with_auth<U, N, P>(mut self, url: U, username: N, password: P) -> Self
    where
        U: Into<String>,
        N: Into<String>,
        P: Into<String>,
    {
        self.auth_url = Some(url.into());
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_auth_url<T: Into<String>>(mut self, url: T) -> Self {
        self.auth_url = Some(url.into());
        self
    }

    pub fn with_username<T: Into<String>>(mut self, username: T) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password<T: Into<String>>(mut self, password: T) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_static_token<T: Into<String>>(mut self, token: T) -> Self {
        self.static_token = Some(token.into());
        self
    }

    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    pub fn with_total(mut self, n: usize) -> Self {
        self.total = n;
        self
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    pub fn with_duration_seconds(mut self, secs: u64) -> Self {
        self.duration_seconds = secs;
        self
    }

    pub fn with_meeting_group_id<T: Into<String>>(mut self, gid: T) -> Self {
        self.meeting_group_id = gid.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn build(self) -> Result<LoadConfig> {
        let rpc_url = self
            .rpc_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::InvalidConfig("rpc url is required".into()))?;

        let concurrency = NonZeroUsize::new(self.concurrency)
            .ok_or_else(|| Error::InvalidConfig("concurrency must be at least 1".into()))?;

        let token_source = match self.static_token.filter(|t| !t.is_empty()) {
            Some(token) => TokenSource::Static(token),
            None => match (self.auth_url, self.username, self.password) {
                (Some(url), Some(username), Some(password)) if !url.is_empty() => {
                    TokenSource::Fetch(AuthSettings {
                        url,
                        username,
                        password,
                        timeout: self.auth_timeout,
                    })
                }
                _ => {
                    return Err(Error::InvalidConfig(
                        "either a static token or auth url, username and password are required"
                            .into(),
                    ));
                }
            },
        };

        Ok(LoadConfig {
            rpc_url,
            token_source,
            total: self.total,
            concurrency,
            duration_seconds: self.duration_seconds,
            meeting_group_id: self.meeting_group_id,
            request_timeout: self.request_timeout,
            verify_tls: self.verify_tls,
        })
    }
}
