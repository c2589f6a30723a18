use thiserror::Error;

/// Failures the session client can surface.
///
/// HTTP error statuses are deliberately absent: a 4xx/5xx exchange still
/// yields an `Ok(Response)`, because the tests own all interpretation of
/// status codes.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout, or a malformed response —
    /// anything that prevented a complete HTTP exchange.
    #[error("{method} {url}: transport failure: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build http transport: {0}")]
    BuildTransport(#[source] reqwest::Error),

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid content type {0:?} for file upload")]
    InvalidContentType(String),

    #[error("gave up following redirects after {limit} hops fetching {url}")]
    RedirectLimit { url: String, limit: usize },
}

impl ClientError {
    pub(crate) fn transport(method: &'static str, url: &str, source: reqwest::Error) -> Self {
        ClientError::Transport {
            method,
            url: url.to_string(),
            source,
        }
    }

    /// True when the failure happened below HTTP, i.e. no status code exists.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. } | ClientError::BuildTransport(_)
        )
    }
}
