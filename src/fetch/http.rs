use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use super::{DocumentSource, IdTemplate};
use crate::constants::{DEFAULT_DOCUMENT_URL_TEMPLATE, DEFAULT_HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::index::{RelationIndex, parse_index_xml};
use crate::types::DocId;
use crate::{Result, RfcbookError};

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Downloads document PDFs from a URL template.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: IdTemplate,
}

impl HttpSource {
    /// Source for the RFC Editor's PDF renditions.
    pub fn new() -> Result<Self> {
        Self::with_template(
            DEFAULT_DOCUMENT_URL_TEMPLATE,
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        )
    }

    pub fn with_template(url_template: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: IdTemplate::new(url_template)?,
        })
    }

    #[must_use]
    pub fn url_for(&self, id: &DocId) -> Option<String> {
        self.url.render(id)
    }
}

impl DocumentSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch(&self, id: &DocId) -> Result<Option<Vec<u8>>> {
        let Some(url) = self.url_for(id) else {
            return Ok(None);
        };
        tracing::debug!(target = "rfcbook::fetch", %id, %url, "downloading document");

        let response = self.client.get(&url).send()?;
        if !document_found(&url, response.status())? {
            return Ok(None);
        }
        Ok(Some(response.bytes()?.to_vec()))
    }
}

/// Whether a document response carries content: `false` for 404, an error
/// for any other non-success status.
fn document_found(url: &str, status: StatusCode) -> Result<bool> {
    if status == StatusCode::NOT_FOUND {
        return Ok(false);
    }
    if !status.is_success() {
        return Err(RfcbookError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(true)
}

/// Download and parse an `rfc-index.xml`.
pub fn fetch_index(url: &str, timeout: Duration) -> Result<RelationIndex> {
    tracing::info!(target = "rfcbook::index", url, "fetching document index");
    let response = build_client(timeout)?.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(RfcbookError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text()?;
    let index = parse_index_xml(&body)?;
    tracing::info!(
        target = "rfcbook::index",
        records = index.len(),
        "parsed document index"
    );
    Ok(index)
}
