use regex::Regex;
use std::ops::Range;

/// One compiled alternation over every configured comment prefix.
///
/// Each alternative matches optional spaces, `#`, optional spaces, the prefix and
/// the rest of the line. Prefixes are not escaped, so `|`, `.` and friends keep
/// their regex meaning.
#[derive(Debug, Clone)]
pub struct CommentMatcher {
    regex: Regex,
}

/// Result of applying the matcher to one line body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentMatch {
    None,
    Single(Range<usize>),
    Ambiguous(usize),
}

impl CommentMatcher {
    /// Build a matcher, or `None` when there is nothing to strip
    pub fn new(prefixes: &[String]) -> Result<Option<Self>, regex::Error> {
        if prefixes.is_empty() {
            return Ok(None);
        }

        let pattern = prefixes
            .iter()
            .map(|prefix| format!("[ ]*#[ ]*{prefix}.*"))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Some(Self {
            regex: Regex::new(&pattern)?,
        }))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Find the comment span in a line body (terminator already stripped)
    pub fn find(&self, body: &str) -> CommentMatch {
        let mut matches = self.regex.find_iter(body);
        let Some(first) = matches.next() else {
            return CommentMatch::None;
        };

        match matches.count() {
            0 => CommentMatch::Single(first.range()),
            extra => CommentMatch::Ambiguous(extra + 1),
        }
    }
}
