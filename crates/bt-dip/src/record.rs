//! Plenary protocol records as returned by the DIP listing endpoint

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level listing response
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolListing {
    /// Total number of matches, when the API reports it
    #[serde(rename = "numFound", default)]
    pub num_found: Option<u64>,
    pub documents: Vec<PlenaryProtocol>,
}

impl ProtocolListing {
    /// Parse a listing from a response body.
    ///
    /// A body without a `documents` array is a parse failure, not an empty
    /// result.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if !value.get("documents").is_some_and(|d| d.is_array()) {
            return Err(Error::UnexpectedShape {
                message: "missing 'documents' array".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// First record, or [`Error::NoProtocolFound`]
    pub fn into_first(self) -> Result<PlenaryProtocol> {
        self.documents.into_iter().next().ok_or(Error::NoProtocolFound)
    }
}

/// Summary of one plenary session transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlenaryProtocol {
    /// Session number, e.g. `20/123`
    #[serde(alias = "dokumentnummer")]
    pub nummer: String,
    /// Session date as delivered by the API
    pub datum: String,
    pub titel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wahlperiode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub herausgeber: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundstelle: Option<Fundstelle>,
}

/// Reference block pointing at the published documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fundstelle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_url: Option<String>,
}

impl PlenaryProtocol {
    /// Document link for display: the PDF if present, else the XML
    pub fn link(&self) -> Option<&str> {
        let fundstelle = self.fundstelle.as_ref()?;
        fundstelle
            .pdf_url
            .as_deref()
            .or(fundstelle.xml_url.as_deref())
    }

    /// URL of the XML transcript
    pub fn xml_url(&self) -> Option<&str> {
        self.fundstelle.as_ref()?.xml_url.as_deref()
    }
}

impl fmt::Display for PlenaryProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Latest plenary protocol")?;
        writeln!(f, "Session: {}", self.nummer)?;
        writeln!(f, "Date: {}", self.datum)?;
        writeln!(f, "Title: {}", self.titel)?;
        write!(f, "Link: {}", self.link().unwrap_or("not available"))
    }
}
