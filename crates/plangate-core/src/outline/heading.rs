//! ATX heading lines and heading queries.

/// A heading line found in a document, with the byte span of the section it
/// opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'a> {
    /// Number of leading `#` markers (1..=6).
    pub level: u8,
    /// Heading text with markers and surrounding whitespace removed.
    pub title: &'a str,
    /// 1-based line number of the heading.
    pub line: usize,
    /// Byte offset of the start of the heading line.
    pub start: usize,
    /// Byte offset where the section ends (exclusive).
    pub end: usize,
}

/// Parse a single line (without its terminator) as an ATX heading.
///
/// Returns `(level, title)`. Up to three spaces of indentation are allowed
/// and the marker run must be followed by whitespace or end of line, so
/// `#hashtag` and `####### seven` are not headings.
pub(crate) fn parse_atx(line: &str) -> Option<(u8, &str)> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return None;
    }
    let hashes = rest.len() - rest.trim_start_matches('#').len();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let after = &rest[hashes..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }
    // hashes <= 6, the cast cannot truncate.
    Some((hashes as u8, after.trim()))
}

/// A heading to look up in an [`Outline`](super::Outline).
///
/// Queries are written the way headings are written in the document
/// (`## 4. 详细实施步骤`). A heading matches when it has the same level and
/// its title starts with the query title, so a trailing annotation such as
/// `(Implementation Details)` does not prevent a match. A query without `#`
/// markers matches headings at any level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingQuery<'q> {
    level: Option<u8>,
    title: &'q str,
}

impl<'q> HeadingQuery<'q> {
    pub fn parse(query: &'q str) -> Self {
        let query = query.trim();
        match parse_atx(query) {
            Some((level, title)) => Self {
                level: Some(level),
                title,
            },
            None => Self { level: None, title: query },
        }
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }

    pub fn title(&self) -> &'q str {
        self.title
    }

    pub fn matches(&self, heading: &Heading<'_>) -> bool {
        self.level.is_none_or(|level| level == heading.level)
            && heading.title.starts_with(self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, title: &str) -> Heading<'_> {
        Heading {
            level,
            title,
            line: 1,
            start: 0,
            end: 0,
        }
    }

    #[test]
    fn parses_levels_and_titles() {
        assert_eq!(parse_atx("# Title"), Some((1, "Title")));
        assert_eq!(parse_atx("## 2. 涉及文件清单 (Scope)"), Some((2, "2. 涉及文件清单 (Scope)")));
        assert_eq!(parse_atx("###### six"), Some((6, "six")));
        assert_eq!(parse_atx("   ## indented"), Some((2, "indented")));
        assert_eq!(parse_atx("##"), Some((2, "")));
    }

    #[test]
    fn rejects_non_headings() {
        assert_eq!(parse_atx("#hashtag"), None);
        assert_eq!(parse_atx("####### seven"), None);
        assert_eq!(parse_atx("    ## code indent"), None);
        assert_eq!(parse_atx("plain text"), None);
        assert_eq!(parse_atx(""), None);
    }

    #[test]
    fn query_with_markers_requires_same_level() {
        let query = HeadingQuery::parse("## 4. 详细实施步骤");
        assert_eq!(query.level(), Some(2));
        assert_eq!(query.title(), "4. 详细实施步骤");
        assert!(query.matches(&heading(2, "4. 详细实施步骤 (Implementation Details)")));
        assert!(!query.matches(&heading(3, "4. 详细实施步骤")));
        assert!(!query.matches(&heading(2, "3. 核心数据结构与接口")));
    }

    #[test]
    fn query_without_markers_matches_any_level() {
        let query = HeadingQuery::parse("Risk");
        assert_eq!(query.level(), None);
        assert!(query.matches(&heading(1, "Risk")));
        assert!(query.matches(&heading(4, "Risk & Rollback")));
    }

    #[test]
    fn same_number_different_titles_do_not_collide() {
        let verify = HeadingQuery::parse("## 5. 验证策略");
        let risk = heading(2, "5. 风险评估与回滚 (Risk & Rollback)");
        assert!(!verify.matches(&risk));
    }
}
