//! Typed sections extracted from a protocol transcript
//!
//! Each `extract_*` function reads one concern out of the transcript tree.
//! Missing elements degrade to empty values rather than errors; the
//! transcripts are not uniform across electoral periods.

use serde::Serialize;

use super::tree::Element;

/// Session attributes from the transcript root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionMetadata {
    pub electoral_period: Option<String>,
    pub session_number: Option<String>,
    pub session_date: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub publisher: Option<String>,
    pub issn: Option<String>,
    pub next_session_date: Option<String>,
    pub start_page: Option<String>,
}

/// One table-of-contents line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub content: String,
    /// Page reference, e.g. `12345 A` or `12345 A – 12350 C`
    pub page: String,
}

/// Titled group of table-of-contents lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TocBlock {
    pub title: String,
    pub entries: Vec<TocEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableOfContents {
    pub title: String,
    pub entries: Vec<TocEntry>,
    pub blocks: Vec<TocBlock>,
}

/// Agenda item (`tagesordnungspunkt`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaItem {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Speaker {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub faction: String,
    pub role: String,
}

impl Speaker {
    fn from_redner(redner: &Element) -> Option<Self> {
        let name = redner.child("name")?;
        Some(Self {
            id: redner.attr("id").map(str::to_string),
            first_name: name.text_at("vorname"),
            last_name: name.text_at("nachname"),
            title: name.text_at("titel"),
            faction: name.text_at("fraktion"),
            role: name.text_at("rolle/rolle_lang"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Speech {
    pub id: Option<String>,
    /// Absent when the speech carries no `p[klasse=redner]/redner` header
    pub speaker: Option<Speaker>,
    pub content: String,
    /// Interjections and remarks (`kommentar`)
    pub comments: Vec<String>,
}

/// Annex block (`Anlage ...`) from the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub title: String,
    pub entries: Vec<String>,
}

pub fn extract_metadata(root: &Element) -> SessionMetadata {
    let attr = |name: &str| root.attr(name).map(str::to_string);
    SessionMetadata {
        electoral_period: attr("wahlperiode"),
        session_number: attr("sitzung-nr"),
        session_date: attr("sitzung-datum"),
        location: attr("sitzung-ort"),
        start_time: attr("sitzung-start-uhrzeit"),
        end_time: attr("sitzung-ende-uhrzeit"),
        publisher: attr("herausgeber"),
        issn: attr("issn"),
        next_session_date: attr("sitzung-naechste-datum"),
        start_page: attr("start-seitennr"),
    }
}

fn page_reference(entry: &Element) -> String {
    let Some(anchor) = entry.find("a") else {
        return String::new();
    };
    // Both parts are trimmed and joined without a separator: "15401" + "A"
    anchor.text_at("seite") + &anchor.text_at("seitenbereich")
}

fn toc_entries(parent: &Element) -> Vec<TocEntry> {
    parent
        .children_named("ivz-eintrag")
        .filter_map(|entry| {
            let content = entry.child("ivz-eintrag-inhalt")?.non_empty_text()?;
            Some(TocEntry {
                content: content.to_string(),
                page: page_reference(entry),
            })
        })
        .collect()
}

pub fn extract_toc(root: &Element) -> TableOfContents {
    let Some(toc) = root.find("inhaltsverzeichnis") else {
        return TableOfContents::default();
    };

    let blocks = toc
        .children_named("ivz-block")
        .map(|block| TocBlock {
            title: block.text_at("ivz-block-titel"),
            entries: toc_entries(block),
        })
        .collect();

    TableOfContents {
        title: toc.text_at("ivz-titel"),
        entries: toc_entries(toc),
        blocks,
    }
}

pub fn extract_agenda(root: &Element) -> Vec<AgendaItem> {
    root.find_all("tagesordnungspunkt")
        .into_iter()
        .map(|top| {
            let paragraphs = top.find_all("p");
            let title_index = paragraphs
                .iter()
                .position(|p| p.attr("klasse") == Some("T_fett"));

            let title = title_index
                .map(|i| paragraphs[i].text().to_string())
                .unwrap_or_default();

            let description = paragraphs
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != title_index)
                .filter_map(|(_, p)| p.non_empty_text())
                .collect::<Vec<_>>()
                .join("\n");

            AgendaItem {
                id: top.attr("top-id").map(str::to_string),
                title,
                description,
            }
        })
        .collect()
}

/// Every speaker mentioned in the transcript, first occurrence per id
pub fn extract_speakers(root: &Element) -> Vec<Speaker> {
    let mut speakers: Vec<Speaker> = Vec::new();
    for redner in root.find_all("redner") {
        let id = redner.attr("id");
        if speakers.iter().any(|s| s.id.as_deref() == id) {
            continue;
        }
        if let Some(speaker) = Speaker::from_redner(redner) {
            speakers.push(speaker);
        }
    }
    speakers
}

fn speech_from_rede(rede: &Element) -> Speech {
    let speaker = rede
        .children_named("p")
        .filter(|p| p.attr("klasse") == Some("redner"))
        .find_map(|p| p.child("redner"))
        .and_then(Speaker::from_redner);

    let content = rede
        .find_all("p")
        .into_iter()
        .filter(|p| p.attr("klasse") != Some("redner"))
        .filter_map(Element::non_empty_text)
        .collect::<Vec<_>>()
        .join("\n");

    let comments = rede
        .find_all("kommentar")
        .into_iter()
        .filter_map(Element::non_empty_text)
        .map(str::to_string)
        .collect();

    Speech {
        id: rede.attr("id").map(str::to_string),
        speaker,
        content,
        comments,
    }
}

pub fn extract_speeches(root: &Element) -> Vec<Speech> {
    root.find_all("rede")
        .into_iter()
        .map(speech_from_rede)
        .collect()
}

/// The speech with the given id, if any
pub fn extract_speech(root: &Element, id: &str) -> Option<Speech> {
    root.find_all("rede")
        .into_iter()
        .find(|rede| rede.attr("id") == Some(id))
        .map(speech_from_rede)
}

pub fn extract_attachments(root: &Element) -> Vec<Attachment> {
    root.find_all("ivz-block")
        .into_iter()
        .filter_map(|block| {
            let title = block.child("ivz-block-titel")?.non_empty_text()?;
            if !title.starts_with("Anlage") {
                return None;
            }
            let entries = block
                .children_named("ivz-eintrag")
                .filter_map(|e| e.child("ivz-eintrag-inhalt")?.non_empty_text())
                .map(str::to_string)
                .collect();
            Some(Attachment {
                title: title.to_string(),
                entries,
            })
        })
        .collect()
}
