//! MCP Resource Handlers
//!
//! Read-only views of the latest protocol transcript. Each read downloads
//! the listing and the transcript again; nothing is cached between reads.

use bt_dip::DipClient;

use crate::resources::{ResourceContent, section_for_uri};
use crate::{Error, Result};

/// Read a resource by URI
///
/// # Arguments
///
/// * `client` - DIP API client
/// * `uri` - The resource URI (e.g., "bundestag://protocol/latest/agenda")
///
/// # Errors
///
/// Returns `Error::UnknownResource` if the URI is not recognized, or the
/// underlying DIP error if the transcript cannot be fetched or parsed.
pub async fn read_resource(client: &DipClient, uri: &str) -> Result<ResourceContent> {
    let section = section_for_uri(uri).ok_or_else(|| Error::UnknownResource(uri.to_string()))?;

    let (record, document) = client.latest_protocol_document().await?;
    tracing::debug!(nummer = %record.nummer, %section, "Rendering protocol section");

    let value = document.section_json(section)?;
    Ok(ResourceContent {
        uri: uri.to_string(),
        mime_type: "application/json".to_string(),
        text: serde_json::to_string_pretty(&value)?,
    })
}
