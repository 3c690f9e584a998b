//! Client for the Bundestag DIP API
//!
//! DIP (Dokumentations- und Informationssystem für Parlamentsmaterialien)
//! publishes parliamentary records over REST. This crate covers the one
//! slice the MCP server needs: the most recent plenary protocol and its XML
//! transcript.
//!
//! ```text
//! DipClient::latest_protocol()
//!     GET {base}/plenarprotokoll?f.zuordnung=BT&format=json&sort=-datum&limit=1
//!     -> PlenaryProtocol (nummer, datum, titel, fundstelle)
//!
//! DipClient::latest_protocol_document()
//!     ... then GET fundstelle.xml_url
//!     -> ProtocolDocument (metadata, toc, agenda, speakers, speeches, annexes)
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod query;
pub mod record;

pub use client::DipClient;
pub use config::DipConfig;
pub use document::{ProtocolDocument, Section};
pub use error::{Error, ErrorKind, Result};
pub use query::ListingQuery;
pub use record::{Fundstelle, PlenaryProtocol, ProtocolListing};
