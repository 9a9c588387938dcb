use std::future::Future;
use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::envelope::RequestEnvelope;
use crate::error::Result;

/// The two HTTP exchanges a run performs. Both return the raw response body;
/// status codes are not inspected, the envelope in the body decides.
pub trait HttpTransport: Send + Sync + 'static {
    fn get_with_basic_auth(
        &self,
        url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<String>> + Send;

    fn post_with_bearer(
        &self,
        url: &str,
        token: &str,
        body: &RequestEnvelope,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Certificate verification is off unless `verify_tls` is set. Only point an
    /// unverified client at test systems.
    pub fn new(verify_tls: bool) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get_with_basic_auth(
        &self,
        url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .basic_auth(username, Some(password))
            .timeout(timeout)
            .send()
            .await?;
        debug!("auth response status {}", resp.status());
        Ok(resp.text().await?)
    }

    async fn post_with_bearer(
        &self,
        url: &str,
        token: &str,
        body: &RequestEnvelope,
        timeout: Option<Duration>,
    ) -> Result<String> {
        let mut req = self.client.post(url).bearer_auth(token).json(body);
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        let resp = req.send().await?;
        debug!("rpc response status {}", resp.status());
        Ok(resp.text().await?)
    }
}
