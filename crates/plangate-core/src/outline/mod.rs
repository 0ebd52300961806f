//! Heading outline of a markdown document and section extraction.
//!
//! The outline is a flat, ordered list of ATX headings. Each heading owns
//! the span from its own line up to the next heading of the same or higher
//! level, so nested sub-headings stay inside their parent section. Lines
//! inside fenced code blocks never count as headings.

mod heading;

pub use heading::{Heading, HeadingQuery};

use heading::parse_atx;

/// UTF-8 byte order mark, tolerated at the start of a document.
const BOM: char = '\u{feff}';

/// Parsed heading outline of a document.
#[derive(Debug, Clone)]
pub struct Outline<'a> {
    text: &'a str,
    headings: Vec<Heading<'a>>,
}

impl<'a> Outline<'a> {
    pub fn parse(text: &'a str) -> Self {
        // (level, title, line, start)
        let mut found: Vec<(u8, &'a str, usize, usize)> = Vec::new();
        let mut fence: Option<Fence> = None;
        let mut offset = 0;

        for (idx, raw) in text.split_inclusive('\n').enumerate() {
            let mut line = raw.trim_end_matches(['\n', '\r']);
            if idx == 0 {
                line = line.strip_prefix(BOM).unwrap_or(line);
            }
            match fence {
                Some(open) => {
                    if open.closes(line) {
                        fence = None;
                    }
                }
                None => {
                    if let Some(open) = Fence::open(line) {
                        fence = Some(open);
                    } else if let Some((level, title)) = parse_atx(line) {
                        found.push((level, title, idx + 1, offset));
                    }
                }
            }
            offset += raw.len();
        }

        let headings = found
            .iter()
            .enumerate()
            .map(|(i, &(level, title, line, start))| {
                let end = found[i + 1..]
                    .iter()
                    .find(|next| next.0 <= level)
                    .map_or(text.len(), |next| next.3);
                Heading {
                    level,
                    title,
                    line,
                    start,
                    end,
                }
            })
            .collect();

        Self { text, headings }
    }

    pub fn headings(&self) -> &[Heading<'a>] {
        &self.headings
    }

    /// First heading matching `query`.
    ///
    /// Later matches are ignored; a warning is logged when there are any,
    /// since the document then has two sections claiming the same name.
    pub fn find(&self, query: &HeadingQuery<'_>) -> Option<&Heading<'a>> {
        let mut matches = self.headings.iter().filter(|h| query.matches(h));
        let first = matches.next()?;
        let duplicates = matches.count();
        if duplicates > 0 {
            tracing::warn!(
                query = query.title(),
                line = first.line,
                duplicates,
                "heading matched more than once; using the first occurrence"
            );
        }
        Some(first)
    }

    pub fn contains(&self, heading: &str) -> bool {
        self.find(&HeadingQuery::parse(heading)).is_some()
    }

    /// The section opened by the first heading matching `heading`.
    pub fn section(&self, heading: &str) -> Option<Section<'a>> {
        let query = HeadingQuery::parse(heading);
        self.find(&query).map(|h| Section {
            heading: *h,
            text: &self.text[h.start..h.end],
        })
    }
}

/// A contiguous span of a document, from a heading line up to the next
/// heading of the same or higher level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    heading: Heading<'a>,
    text: &'a str,
}

impl<'a> Section<'a> {
    pub fn heading(&self) -> &Heading<'a> {
        &self.heading
    }

    /// Section text, including the heading line itself.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Lines of the section paired with their 1-based document line numbers.
    ///
    /// Lines inside fenced code blocks, and the fence lines themselves, are
    /// left out.
    pub fn numbered_lines(self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        let first = self.heading.line;
        let mut fence: Option<Fence> = None;
        self.text
            .lines()
            .enumerate()
            .filter_map(move |(i, line)| match fence {
                Some(open) => {
                    if open.closes(line) {
                        fence = None;
                    }
                    None
                }
                None => match Fence::open(line) {
                    Some(open) => {
                        fence = Some(open);
                        None
                    }
                    None => Some((first + i, line)),
                },
            })
    }
}

/// Extract the section opened by `heading` from `text`.
///
/// Returns an empty string when no heading matches; callers treat that as
/// "section missing".
pub fn extract<'a>(text: &'a str, heading: &str) -> &'a str {
    Outline::parse(text)
        .section(heading)
        .map_or("", |section| section.text())
}

/// An open fenced code block (```` ``` ```` or `~~~`).
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let rest = line.trim_start_matches(' ');
        if line.len() - rest.len() > 3 {
            return None;
        }
        let marker = rest.chars().next().filter(|c| matches!(*c, '`' | '~'))?;
        let len = rest.len() - rest.trim_start_matches(marker).len();
        if len < 3 {
            return None;
        }
        // An info string containing a backtick means this is inline code.
        if marker == '`' && rest[len..].contains('`') {
            return None;
        }
        Some(Self { marker, len })
    }

    fn closes(self, line: &str) -> bool {
        let rest = line.trim_start_matches(' ');
        if line.len() - rest.len() > 3 {
            return false;
        }
        let len = rest.len() - rest.trim_start_matches(self.marker).len();
        len >= self.len && rest[len..].trim().is_empty()
    }
}
