//! Canned DIP payloads.
//!
//! Listings are built with `serde_json` so individual tests can vary one
//! field without copying a whole document.

use serde_json::{Value, json};

/// Transcript of a fictional 123rd session of the 20th Bundestag.
///
/// Contains one untitled and two titled TOC blocks (one of them an annex),
/// two agenda items, three speeches by two distinct speakers and two
/// interjections.
pub const SAMPLE_PROTOCOL_XML: &str =
    include_str!("../../../test-fixtures/protocols/plenarprotokoll-20-123.xml");

/// Path the sample transcript is served under by [`MockDip`](crate::MockDip)
pub const SAMPLE_XML_PATH: &str = "/btp/20/20123.xml";

/// A listing record in the minimal shape: number, date and title only
pub fn minimal_record(nummer: &str, datum: &str, titel: &str) -> Value {
    json!({
        "nummer": nummer,
        "datum": datum,
        "titel": titel,
    })
}

/// A listing record in the shape the live API returns
pub fn dip_record(nummer: &str, datum: &str, pdf_url: &str, xml_url: Option<&str>) -> Value {
    let mut fundstelle = json!({
        "pdf_url": pdf_url,
        "dokumentnummer": nummer,
        "datum": datum,
        "dokumentart": "Plenarprotokoll",
        "herausgeber": "BT",
        "id": "5678",
    });
    if let Some(xml_url) = xml_url {
        fundstelle["xml_url"] = json!(xml_url);
    }
    json!({
        "id": "5678",
        "dokumentart": "Plenarprotokoll",
        "typ": "Dokument",
        "dokumentnummer": nummer,
        "wahlperiode": 20,
        "herausgeber": "BT",
        "datum": datum,
        "titel": format!("Protokoll der Sitzung {nummer}"),
        "fundstelle": fundstelle,
        "pdf_hash": "0c5d1f7c1b9a1c7e",
        "aktualisiert": "2024-05-13T09:12:44+02:00",
    })
}

/// Wrap records into a listing response body
pub fn listing(records: &[Value]) -> String {
    json!({
        "numFound": records.len(),
        "documents": records,
        "cursor": "AoE/AAAA",
    })
    .to_string()
}

/// The record from the canonical example:
/// `{"documents":[{"nummer":"20/123","datum":"2024-05-10","titel":"Plenarprotokoll 20/123"}]}`
pub fn example_listing() -> String {
    listing(&[minimal_record("20/123", "2024-05-10", "Plenarprotokoll 20/123")])
}

/// An empty listing
pub fn empty_listing() -> String {
    listing(&[])
}
