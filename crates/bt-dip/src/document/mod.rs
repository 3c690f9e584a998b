//! Parsed plenary protocol transcripts
//!
//! The DIP listing links each protocol to an XML transcript
//! (`dbtplenarprotokoll`). [`ProtocolDocument`] parses it once and exposes
//! the sections the MCP resources are built from.
//!
//! | Section | Source elements |
//! |---------|-----------------|
//! | [`SessionMetadata`] | attributes of the root element |
//! | [`TableOfContents`] | `inhaltsverzeichnis` |
//! | [`AgendaItem`] | `tagesordnungspunkt` |
//! | [`Speaker`] | `redner` (deduplicated by id) |
//! | [`Speech`] | `rede` |
//! | [`Attachment`] | `ivz-block` titled `Anlage ...` |

mod sections;
mod tree;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Value, json};

pub use sections::{
    AgendaItem, Attachment, SessionMetadata, Speaker, Speech, TableOfContents, TocBlock, TocEntry,
};
pub use tree::Element;

use crate::error::{Error, Result};

/// Views of a transcript that can be rendered on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Metadata,
    TableOfContents,
    Agenda,
    Speakers,
    Speeches,
    Attachments,
    Full,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Metadata,
        Section::TableOfContents,
        Section::Agenda,
        Section::Speakers,
        Section::Speeches,
        Section::Attachments,
        Section::Full,
    ];

    /// Short identifier used in resource URIs
    pub fn slug(&self) -> &'static str {
        match self {
            Section::Metadata => "metadata",
            Section::TableOfContents => "toc",
            Section::Agenda => "agenda",
            Section::Speakers => "speakers",
            Section::Speeches => "speeches",
            Section::Attachments => "attachments",
            Section::Full => "full",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Section::Metadata => "Session metadata of the latest plenary protocol",
            Section::TableOfContents => "Table of contents of the latest plenary protocol",
            Section::Agenda => "Agenda items of the latest plenary session",
            Section::Speakers => "Speakers of the latest plenary session",
            Section::Speeches => "All speeches of the latest plenary session",
            Section::Attachments => "Annexes of the latest plenary protocol",
            Section::Full => "Complete structured view of the latest plenary protocol",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.slug() == s)
            .ok_or_else(|| Error::UnexpectedShape {
                message: format!("unknown protocol section '{s}'"),
            })
    }
}

/// A parsed transcript
#[derive(Debug, Clone)]
pub struct ProtocolDocument {
    root: Element,
}

impl ProtocolDocument {
    pub fn parse(xml: &str) -> Result<Self> {
        let root = Element::parse(xml)?;
        Ok(Self { root })
    }

    pub fn metadata(&self) -> SessionMetadata {
        sections::extract_metadata(&self.root)
    }

    pub fn table_of_contents(&self) -> TableOfContents {
        sections::extract_toc(&self.root)
    }

    pub fn agenda(&self) -> Vec<AgendaItem> {
        sections::extract_agenda(&self.root)
    }

    pub fn speakers(&self) -> Vec<Speaker> {
        sections::extract_speakers(&self.root)
    }

    pub fn speeches(&self) -> Vec<Speech> {
        sections::extract_speeches(&self.root)
    }

    pub fn speech(&self, id: &str) -> Option<Speech> {
        sections::extract_speech(&self.root, id)
    }

    pub fn attachments(&self) -> Vec<Attachment> {
        sections::extract_attachments(&self.root)
    }

    /// Render one section as JSON.
    ///
    /// Every section except [`Section::Metadata`] is wrapped together with
    /// the metadata, so a client reading a single resource still knows which
    /// session it belongs to.
    pub fn section_json(&self, section: Section) -> Result<Value> {
        let metadata = to_value(self.metadata())?;
        let (key, payload) = match section {
            Section::Metadata => return Ok(metadata),
            Section::TableOfContents => ("table_of_contents", to_value(self.table_of_contents())?),
            Section::Agenda => ("agenda", to_value(self.agenda())?),
            Section::Speakers => ("speakers", to_value(self.speakers())?),
            Section::Speeches => ("speeches", to_value(self.speeches())?),
            Section::Attachments => ("attachments", to_value(self.attachments())?),
            Section::Full => {
                return Ok(json!({
                    "metadata": metadata,
                    "table_of_contents": to_value(self.table_of_contents())?,
                    "agenda": to_value(self.agenda())?,
                    "speakers": to_value(self.speakers())?,
                    "speeches": to_value(self.speeches())?,
                    "attachments": to_value(self.attachments())?,
                }));
            }
        };
        let mut object = serde_json::Map::new();
        object.insert("metadata".to_string(), metadata);
        object.insert(key.to_string(), payload);
        Ok(Value::Object(object))
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
