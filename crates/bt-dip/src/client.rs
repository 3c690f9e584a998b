//! HTTP client for the DIP API
//!
//! Each public method is a single stateless round trip (or two, for the XML
//! transcript). Nothing is retried or cached.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Request, Response, StatusCode};
use tracing::{debug, warn};

use crate::config::DipConfig;
use crate::document::ProtocolDocument;
use crate::error::{Error, Result};
use crate::query::ListingQuery;
use crate::record::{PlenaryProtocol, ProtocolListing};

/// Longest response body excerpt carried in [`Error::Status`]
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the DIP REST API
#[derive(Debug, Clone)]
pub struct DipClient {
    config: DipConfig,
    http: Client,
}

impl DipClient {
    /// Create a client with its own connection pool
    pub fn new(config: DipConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("bt-dip/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InvalidConfig {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &DipConfig {
        &self.config
    }

    /// Build the listing request without sending it
    pub fn listing_request(&self, query: &ListingQuery) -> Result<Request> {
        let api_key = self.config.require_api_key()?;
        let url = format!("{}/{}", self.config.base_url, query.resource());
        Ok(self
            .http
            .get(url)
            .query(&query.params())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("ApiKey {api_key}"))
            .build()?)
    }

    /// Fetch the most recent Bundestag plenary protocol record
    pub async fn latest_protocol(&self) -> Result<PlenaryProtocol> {
        let request = self.listing_request(&ListingQuery::latest_plenary_protocol())?;
        debug!(url = %request.url().path(), "Requesting latest plenary protocol");

        let body = self.send(request).await?.text().await?;
        let record = ProtocolListing::from_json(&body)?.into_first()?;

        debug!(nummer = %record.nummer, datum = %record.datum, "Received plenary protocol");
        Ok(record)
    }

    /// Download the XML transcript referenced by a record
    pub async fn protocol_xml(&self, record: &PlenaryProtocol) -> Result<String> {
        let url = record.xml_url().ok_or_else(|| Error::NoXmlDocument {
            nummer: record.nummer.clone(),
        })?;
        let api_key = self.config.require_api_key()?;
        debug!(%url, "Requesting protocol transcript");

        let request = self
            .http
            .get(url)
            .header(ACCEPT, "application/xml")
            .header(AUTHORIZATION, format!("ApiKey {api_key}"))
            .build()?;
        Ok(self.send(request).await?.text().await?)
    }

    /// Latest record together with its parsed transcript
    pub async fn latest_protocol_document(&self) -> Result<(PlenaryProtocol, ProtocolDocument)> {
        let record = self.latest_protocol().await?;
        let xml = self.protocol_xml(&record).await?;
        let document = ProtocolDocument::parse(&xml)?;
        Ok((record, document))
    }

    async fn send(&self, request: Request) -> Result<Response> {
        let path = request.url().path().to_string();
        let response = self.http.execute(request).await.map_err(|e| {
            warn!(%path, error = %e, "DIP request failed");
            Error::Network(e)
        })?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!(status = status.as_u16(), "DIP API returned an error status");
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}
