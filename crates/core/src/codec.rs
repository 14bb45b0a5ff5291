//! Snapshot storage format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <files>
//!     <file name="docs/readme.txt" last_modif="1700000000123456789"/>
//!     <file name="img/logo.png" last_modif="1700000123000000000"/>
//! </files>
//! ```
//!
//! One root element, one empty child per file carrying exactly two
//! attributes. Timestamps are decimal nanoseconds since the Unix epoch.
//! Documents holding whole-second values still parse, but every entry in
//! them compares as modified until the next update. Entries are written
//! sorted by path; readers must not depend on the order.

use crate::error::{Error, ReadFailure, Result};
use crate::record::{FileRecord, Snapshot};
use crate::store::atomic_write;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

pub const ROOT_ELEMENT: &str = "files";
pub const FILE_ELEMENT: &str = "file";
pub const NAME_ATTR: &str = "name";
pub const MODIFIED_ATTR: &str = "last_modif";

/// Serialize records into a storage document
pub fn encode(records: &[FileRecord]) -> io::Result<Vec<u8>> {
    let mut sorted: Vec<&FileRecord> = records.iter().collect();
    sorted.sort_unstable_by(|a, b| a.path.cmp(&b.path));

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(io::Error::other)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
        .map_err(io::Error::other)?;

    for record in sorted {
        let modified = record.modified.to_string();
        let mut element = BytesStart::new(FILE_ELEMENT);
        element.push_attribute((NAME_ATTR, record.path.as_str()));
        element.push_attribute((MODIFIED_ATTR, modified.as_str()));
        writer
            .write_event(Event::Empty(element))
            .map_err(io::Error::other)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(io::Error::other)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse a storage document into a snapshot
///
/// Fails on anything but the exact expected shape; a partially parsed
/// document is never returned.
pub fn decode(bytes: &[u8]) -> std::result::Result<Snapshot, ReadFailure> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ReadFailure::Xml(format!("document is not valid UTF-8: {}", e)))?;
    let mut reader = Reader::from_str(text);

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut state = State::BeforeRoot;

    loop {
        let event = reader.read_event().map_err(|e| {
            ReadFailure::Xml(format!("{} (at byte {})", e, reader.buffer_position()))
        })?;

        match (state, event) {
            (_, Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => {}
            (_, Event::Text(text)) if text.iter().all(u8::is_ascii_whitespace) => {}
            (_, Event::Eof) => break,

            (State::BeforeRoot, Event::Start(e)) if e.name().as_ref() == ROOT_ELEMENT.as_bytes() => {
                state = State::InRoot;
            }
            (State::BeforeRoot, Event::Empty(e)) if e.name().as_ref() == ROOT_ELEMENT.as_bytes() => {
                state = State::AfterRoot;
            }

            (State::InRoot, Event::Empty(e)) if e.name().as_ref() == FILE_ELEMENT.as_bytes() => {
                push_entry(&e, &mut records, &mut seen)?;
            }
            (State::InRoot, Event::Start(e)) if e.name().as_ref() == FILE_ELEMENT.as_bytes() => {
                push_entry(&e, &mut records, &mut seen)?;
                state = State::InFile;
            }
            (State::InFile, Event::End(_)) => {
                state = State::InRoot;
            }
            (State::InRoot, Event::End(_)) => {
                state = State::AfterRoot;
            }

            (state, event) => {
                return Err(ReadFailure::Shape(format!(
                    "unexpected {} {}",
                    describe(&event),
                    state.location()
                )));
            }
        }
    }

    match state {
        State::AfterRoot => Ok(Snapshot::from_records(records)),
        State::BeforeRoot => Err(ReadFailure::Shape(format!(
            "missing <{}> root element",
            ROOT_ELEMENT
        ))),
        State::InRoot | State::InFile => Err(ReadFailure::Shape(format!(
            "unclosed <{}> root element",
            ROOT_ELEMENT
        ))),
    }
}

/// Write a snapshot to the storage file, replacing any previous one
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let bytes = encode(&snapshot.sorted_records()).map_err(|source| Error::StorageWrite {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, &bytes).map_err(|source| Error::StorageWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote snapshot of {} files to {}", snapshot.len(), path.display());
    Ok(())
}

/// Read the storage file into a snapshot
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let read_error = |reason| Error::SnapshotRead {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = fs::read(path).map_err(|e| read_error(ReadFailure::from(e)))?;
    let snapshot = decode(&bytes).map_err(read_error)?;

    info!("Loaded snapshot of {} files from {}", snapshot.len(), path.display());
    Ok(snapshot)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeRoot,
    InRoot,
    InFile,
    AfterRoot,
}

impl State {
    fn location(self) -> &'static str {
        match self {
            State::BeforeRoot => "before the root element",
            State::InRoot => "inside the root element",
            State::InFile => "inside a file entry",
            State::AfterRoot => "after the root element",
        }
    }
}

fn describe(event: &Event<'_>) -> String {
    match event {
        Event::Start(e) | Event::Empty(e) => {
            format!("element <{}>", String::from_utf8_lossy(e.name().as_ref()))
        }
        Event::End(e) => format!("end tag </{}>", String::from_utf8_lossy(e.name().as_ref())),
        Event::Text(_) => "text content".to_string(),
        Event::CData(_) => "CDATA section".to_string(),
        _ => "markup".to_string(),
    }
}

fn push_entry(
    element: &BytesStart<'_>,
    records: &mut Vec<FileRecord>,
    seen: &mut HashSet<String>,
) -> std::result::Result<(), ReadFailure> {
    let mut name = None;
    let mut modified = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| ReadFailure::Xml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| ReadFailure::Xml(e.to_string()))?;

        let slot = match attr.key.as_ref() {
            key if key == NAME_ATTR.as_bytes() => &mut name,
            key if key == MODIFIED_ATTR.as_bytes() => &mut modified,
            key => {
                return Err(ReadFailure::Shape(format!(
                    "unexpected attribute '{}' on <{}>",
                    String::from_utf8_lossy(key),
                    FILE_ELEMENT
                )));
            }
        };
        *slot = Some(value.into_owned());
    }

    let name = name.ok_or_else(|| missing_attr(NAME_ATTR))?;
    let modified = modified.ok_or_else(|| missing_attr(MODIFIED_ATTR))?;

    // Reference snapshots store names with a leading separator
    let path = name.trim_start_matches(std::path::is_separator);
    if path.is_empty() {
        return Err(ReadFailure::Shape(format!("empty {} attribute", NAME_ATTR)));
    }
    let modified: i64 = modified.trim().parse().map_err(|_| {
        ReadFailure::Shape(format!(
            "{} of '{}' is not an integer: '{}'",
            MODIFIED_ATTR, path, modified
        ))
    })?;

    if !seen.insert(path.to_string()) {
        return Err(ReadFailure::Shape(format!("duplicate entry '{}'", path)));
    }
    records.push(FileRecord::new(path, modified));
    Ok(())
}

fn missing_attr(attr: &str) -> ReadFailure {
    ReadFailure::Shape(format!("<{}> without {} attribute", FILE_ELEMENT, attr))
}
