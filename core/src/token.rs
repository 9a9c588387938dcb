use log::{debug, info};

use crate::config::{AuthSettings, TokenSource};
use crate::envelope::ResponseEnvelope;
use crate::error::Result;
use crate::transport::HttpTransport;

/// Performs a single Basic Auth GET against the auth endpoint and returns the bearer
/// token from the reply. Transport, decode and remote errors are all returned to the
/// caller; there is no retry.
pub async fn fetch_token<T: HttpTransport>(transport: &T, auth: &AuthSettings) -> Result<String> {
    info!("requesting token from {} as {}", auth.url, auth.username);
    let body = transport
        .get_with_basic_auth(&auth.url, &auth.username, &auth.password, auth.timeout)
        .await?;
    debug!("auth response body: {body}");
    ResponseEnvelope::parse(&body)?.into_result()
}

pub async fn resolve_token<T: HttpTransport>(
    transport: &T,
    source: &TokenSource,
) -> Result<String> {
    match source {
        TokenSource::Static(token) => {
            info!("using static token");
            Ok(token.clone())
        }
        TokenSource::Fetch(auth) => fetch_token(transport, auth).await,
    }
}
