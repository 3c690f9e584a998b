//! MCP Resource definitions
//!
//! Resources give read-only, structured access to the latest plenary
//! protocol transcript. Every resource is `application/json`.
//!
//! | URI | Content |
//! |-----|---------|
//! | `bundestag://protocol/latest/metadata` | Session metadata |
//! | `bundestag://protocol/latest/toc` | Table of contents |
//! | `bundestag://protocol/latest/agenda` | Agenda items |
//! | `bundestag://protocol/latest/speakers` | Speakers |
//! | `bundestag://protocol/latest/speeches` | All speeches |
//! | `bundestag://protocol/latest/attachments` | Annexes |
//! | `bundestag://protocol/latest/full` | All of the above |

use bt_dip::Section;
use serde::{Deserialize, Serialize};

/// URI prefix shared by all resources
pub const LATEST_PROTOCOL_URI_PREFIX: &str = "bundestag://protocol/latest/";

/// Resource definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Content returned by a resource read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContent {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

/// URI of the resource for one transcript section
pub fn section_uri(section: Section) -> String {
    format!("{LATEST_PROTOCOL_URI_PREFIX}{}", section.slug())
}

/// Section addressed by a resource URI
pub fn section_for_uri(uri: &str) -> Option<Section> {
    uri.strip_prefix(LATEST_PROTOCOL_URI_PREFIX)?.parse().ok()
}

/// Get all available resource definitions
pub fn get_resource_definitions() -> Vec<ResourceDefinition> {
    Section::ALL
        .into_iter()
        .map(|section| ResourceDefinition {
            uri: section_uri(section),
            name: format!("Latest plenary protocol: {section}"),
            description: section.description().to_string(),
            mime_type: "application/json".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_resource_per_section() {
        assert_eq!(get_resource_definitions().len(), Section::ALL.len());
    }

    #[test]
    fn uris_resolve_back_to_sections() {
        for resource in get_resource_definitions() {
            let section = section_for_uri(&resource.uri).unwrap();
            assert_eq!(section_uri(section), resource.uri);
        }
    }

    #[test]
    fn foreign_uris_do_not_resolve() {
        assert_eq!(section_for_uri("repo://config"), None);
        assert_eq!(section_for_uri("bundestag://protocol/latest/minutes"), None);
    }
}
