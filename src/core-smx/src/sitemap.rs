//! Sitemap document parsing.
//!
//! Supports both documents of the sitemap protocol:
//! ```xml
//! <sitemapindex>
//!   <sitemap><loc>https://example.com/sitemap-posts.xml</loc></sitemap>
//! </sitemapindex>
//!
//! <urlset>
//!   <url><loc>https://example.com/page</loc></url>
//! </urlset>
//! ```
//!
//! Elements are matched by local name, so `<sm:url>` and `<url>` are the same thing.
//! Parsing is strict: anything that is not well-formed XML is reported as invalid rather
//! than partially salvaged.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

const SITEMAP_ENTRY: &[u8] = b"sitemap";
const URL_ENTRY: &[u8] = b"url";
const LOCATION: &[u8] = b"loc";

/// What a fetched sitemap body turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// References to child sitemaps, in document order. Locations are trimmed and non-empty.
    Index(Vec<String>),
    /// Page URLs, in document order. Locations are trimmed and non-empty.
    Leaf(Vec<String>),
    /// Not well-formed XML; carries the parser's reason.
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Sitemap,
    Url,
}

#[derive(Debug)]
struct Entry {
    kind: EntryKind,
    /// Text of the first `<loc>` anywhere beneath this entry, once seen.
    location: Option<String>,
}

/// One open element on the parse stack.
#[derive(Debug)]
enum Frame {
    Entry(usize),
    Location,
    Other,
}

#[derive(Debug, Default)]
struct Scanner {
    entries: Vec<Entry>,
    stack: Vec<Frame>,
    seen_root: bool,
    /// Text collected for the outermost open `<loc>`.
    location_text: Option<String>,
}

impl Scanner {
    fn open(&mut self, name: &[u8]) -> Result<(), String> {
        if self.stack.is_empty() {
            if self.seen_root {
                return Err("document has more than one root element".to_string());
            }
            self.seen_root = true;
        }

        let frame = match entry_kind(name) {
            Some(kind) => {
                self.entries.push(Entry { kind, location: None });
                Frame::Entry(self.entries.len() - 1)
            }
            None if name == LOCATION => {
                if self.location_text.is_none() {
                    self.location_text = Some(String::new());
                }
                Frame::Location
            }
            None => Frame::Other,
        };
        self.stack.push(frame);
        Ok(())
    }

    fn close(&mut self) -> Result<(), String> {
        match self.stack.pop() {
            Some(Frame::Location) => {
                let still_in_location = self.stack.iter().any(|f| matches!(f, Frame::Location));
                if !still_in_location && let Some(text) = self.location_text.take() {
                    self.assign_location(text);
                }
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err("closing tag without a matching opening tag".to_string()),
        }
    }

    /// A `<loc>` belongs to every open entry that has not claimed a location yet.
    fn assign_location(&mut self, text: String) {
        for frame in &self.stack {
            if let Frame::Entry(index) = frame {
                let entry = &mut self.entries[*index];
                if entry.location.is_none() {
                    entry.location = Some(text.clone());
                }
            }
        }
    }

    fn text(&mut self, text: &str) -> Result<(), String> {
        if self.stack.is_empty() {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err("text found outside of the root element".to_string());
        }
        if let Some(buffer) = self.location_text.as_mut() {
            buffer.push_str(text);
        }
        Ok(())
    }

    fn finish(self) -> SitemapDocument {
        if !self.seen_root {
            return SitemapDocument::Invalid("document has no root element".to_string());
        }
        if !self.stack.is_empty() {
            return SitemapDocument::Invalid("unexpected end of document: unclosed element".to_string());
        }

        let is_index = self.entries.iter().any(|e| e.kind == EntryKind::Sitemap);
        let wanted = if is_index { EntryKind::Sitemap } else { EntryKind::Url };
        let locations = self
            .entries
            .into_iter()
            .filter(|e| e.kind == wanted)
            .filter_map(|e| e.location)
            .map(|loc| loc.trim().to_string())
            .filter(|loc| !loc.is_empty())
            .collect();

        if is_index {
            SitemapDocument::Index(locations)
        } else {
            SitemapDocument::Leaf(locations)
        }
    }
}

fn entry_kind(name: &[u8]) -> Option<EntryKind> {
    if name == SITEMAP_ENTRY {
        Some(EntryKind::Sitemap)
    } else if name == URL_ENTRY {
        Some(EntryKind::Url)
    } else {
        None
    }
}

/// The reader only validates attributes as they are iterated.
fn check_attributes(start: &BytesStart) -> Result<(), String> {
    for attribute in start.attributes() {
        if let Err(e) = attribute {
            return Err(format!("malformed attribute: {}", e));
        }
    }
    Ok(())
}

/// Parses a sitemap body and classifies it.
///
/// A document containing at least one `<sitemap>` element is an index; any other well-formed
/// document is a leaf, even one without a single `<url>`.
pub fn parse_sitemap(xml: &str) -> SitemapDocument {
    let mut reader = Reader::from_str(xml);
    let mut scanner = Scanner::default();

    loop {
        let step = match reader.read_event() {
            Ok(Event::Start(ref e)) => check_attributes(e).and_then(|_| scanner.open(e.local_name().as_ref())),
            Ok(Event::Empty(ref e)) => check_attributes(e)
                .and_then(|_| scanner.open(e.local_name().as_ref()))
                .and_then(|_| scanner.close()),
            Ok(Event::End(_)) => scanner.close(),
            Ok(Event::Text(ref t)) => match t.unescape() {
                Ok(text) => scanner.text(&text),
                Err(e) => Err(format!("invalid text content: {}", e)),
            },
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                scanner.text(&text)
            }
            Ok(Event::Eof) => break,
            Ok(_) => Ok(()),
            Err(e) => Err(format!("XML parsing error: {}", e)),
        };

        if let Err(reason) = step {
            return SitemapDocument::Invalid(reason);
        }
    }

    scanner.finish()
}
