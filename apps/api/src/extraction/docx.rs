use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

const DOCUMENT_XML: &str = "word/document.xml";

/// Pulls the visible text out of `word/document.xml`: one line per paragraph,
/// `<w:tab/>` as a tab and `<w:br/>` as a line break.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(format!("not a DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractionError::Docx(format!("missing {DOCUMENT_XML}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(format!("unreadable {DOCUMENT_XML}: {e}")))?;

    paragraphs_to_text(&xml)
}

fn paragraphs_to_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::with_capacity(xml.len() / 4);
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t.unescape().map_err(|e| {
                    ExtractionError::Docx(format!("bad text at byte {}: {e}", reader.buffer_position()))
                })?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Docx(format!(
                    "malformed {DOCUMENT_XML} at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(out)
}
