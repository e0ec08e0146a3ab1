//! Retrieval of remote RDF documents.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::debug;

use super::RdfFormat;
use crate::error::RdfError;

/// HTTP settings for [`SemanticData::read_from_url_with`](super::SemanticData::read_from_url_with).
///
/// There is no timeout: callers that need one wrap the future, e.g. with
/// `tokio::time::timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Redirects followed before giving up. Zero disables redirects.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("qworum-script/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

fn client(config: &FetchConfig) -> Result<reqwest::Client, reqwest::Error> {
    let redirect = if config.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(config.max_redirects)
    };
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .redirect(redirect)
        .build()
}

/// Accept header listing every readable syntax, TriG first.
fn accept() -> String {
    let mut formats = RdfFormat::ALL.to_vec();
    formats.sort_by_key(|f| *f != RdfFormat::TriG);
    formats
        .iter()
        .map(|f| f.media_type())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A retrieved document.
pub(crate) struct Fetched {
    pub(crate) body: String,
    /// URL after redirects.
    pub(crate) url: String,
    /// Syntax announced by `Content-Type`, when recognized.
    pub(crate) format: Option<RdfFormat>,
}

pub(crate) async fn fetch(url: &str, config: &FetchConfig) -> Result<Fetched, RdfError> {
    let fetch_error = |source| RdfError::Fetch {
        url: url.to_owned(),
        source,
    };
    let response = client(config)
        .map_err(fetch_error)?
        .get(url)
        .header(ACCEPT, accept())
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_error)?;
    let final_url = response.url().to_string();
    let format = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(RdfFormat::from_media_type);
    debug!(
        url,
        final_url = %final_url,
        status = %response.status(),
        ?format,
        "fetched semantic data"
    );
    let body = response.text().await.map_err(fetch_error)?;
    Ok(Fetched {
        body,
        url: final_url,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_prefers_trig() {
        let header = accept();
        assert!(header.starts_with(RdfFormat::TriG.media_type()), "{header}");
        assert_eq!(header.split(", ").count(), 4);
    }

    #[test]
    fn default_config() {
        let config = FetchConfig::default();
        assert!(config.user_agent.starts_with("qworum-script/"));
        assert_eq!(config.max_redirects, 10);
    }
}
