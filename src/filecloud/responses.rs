use quick_xml::events::Event;
use quick_xml::{DeError, Reader};
use serde::Deserialize;

/// One `<entry>` of a `/core/search` listing.
#[derive(Debug, Default)]
struct Entry {
    path: Option<String>,
    name: Option<String>,
}

/// Generic `<commands><command>…</command></commands>` envelope returned by
/// `/core/fileexists` and the mutating calls.
#[derive(Debug, Deserialize)]
pub struct CommandsResponse {
    #[serde(rename = "command", default)]
    pub commands: Vec<CommandResult>,
    /// Some server versions put `<result>` directly under the root.
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommandResult {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CommandsResponse {
    /// The first `result` value in document order.
    pub fn first_result(&self) -> Option<&str> {
        self.commands
            .iter()
            .find_map(|c| c.result.as_deref())
            .or(self.result.as_deref())
            .map(str::trim)
    }
}

/// Outcome of an existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    Absent,
    Present,
    /// Any `result` other than `0`/`1`, or none at all.
    Unknown(Option<String>),
}

impl Existence {
    pub fn from_result(result: Option<&str>) -> Self {
        match result {
            Some("0") => Existence::Absent,
            Some("1") => Existence::Present,
            other => Existence::Unknown(other.map(str::to_string)),
        }
    }
}

impl std::fmt::Display for Existence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Existence::Absent => f.write_str("absent"),
            Existence::Present => f.write_str("present"),
            Existence::Unknown(Some(raw)) => write!(f, "unexpected result '{}'", raw),
            Existence::Unknown(None) => f.write_str("no result element"),
        }
    }
}

/// Extract the non-empty entry paths from a search response body, in order.
///
/// `<entry>` elements are collected wherever they sit in the document, so
/// wrapper elements and siblings such as `<meta>` between entries are fine.
pub fn parse_search(xml: &str) -> Result<Vec<String>, DeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<Entry> = None;
    let mut entries = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                seen_root = true;
                let tag = e.local_name().as_ref().to_vec();
                if tag == b"entry" {
                    current = Some(Entry::default());
                }
                open.push(tag);
            }
            Event::Empty(e) => {
                seen_root = true;
                if e.local_name().as_ref() == b"entry" {
                    entries.push(Entry::default());
                }
            }
            Event::End(_) => {
                if open.pop().as_deref() == Some(b"entry".as_slice()) {
                    entries.extend(current.take());
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                record_field(&open, current.as_mut(), &text);
            }
            Event::CData(data) => {
                record_field(&open, current.as_mut(), &String::from_utf8_lossy(&data));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(tag) = open.last() {
        return Err(DeError::Custom(format!(
            "unclosed <{}> element",
            String::from_utf8_lossy(tag)
        )));
    }
    if !seen_root {
        return Err(DeError::Custom("document has no root element".to_string()));
    }

    let mut paths = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.path.map(|p| p.trim().to_string()) {
            Some(path) if !path.is_empty() => paths.push(path),
            _ => tracing::warn!(
                name = entry.name.as_deref().unwrap_or("<unnamed>"),
                "Search entry has no path, skipping"
            ),
        }
    }
    Ok(paths)
}

/// Append `text` to the `path` or `name` of the entry being read, when the
/// innermost open element is a direct child of `<entry>`.
fn record_field(open: &[Vec<u8>], entry: Option<&mut Entry>, text: &str) {
    let (Some(entry), [.., parent, field]) = (entry, open) else {
        return;
    };
    if parent.as_slice() != b"entry" {
        return;
    }
    let slot = match field.as_slice() {
        b"path" => &mut entry.path,
        b"name" => &mut entry.name,
        _ => return,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}

/// Interpret a `/core/fileexists` response body.
pub fn parse_existence(xml: &str) -> Result<Existence, DeError> {
    let response: CommandsResponse = quick_xml::de::from_str(xml)?;
    if let Some(message) = response
        .commands
        .iter()
        .find_map(|c| c.message.as_deref())
        .filter(|m| !m.trim().is_empty())
    {
        tracing::debug!(server_message = message, "fileexists message");
    }
    Ok(Existence::from_result(response.first_result()))
}
