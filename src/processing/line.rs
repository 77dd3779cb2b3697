use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

use crate::models::options::RemovalConfig;
use crate::processing::pattern::{CommentMatch, CommentMatcher};

const TRIPLE_DOUBLE: &str = "\"\"\"";
const TRIPLE_SINGLE: &str = "'''";

/// Why a line could not be processed
#[derive(Error, Debug)]
pub enum LineError {
    /// The comment pattern matched more than once on the line
    #[error("comment pattern matched {matches} times on line {line}")]
    Ambiguous { line: usize, matches: usize },

    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl LineError {
    /// Attach the paths of the file pair being filtered
    pub fn into_file_error(self, source: &Path, destination: &Path) -> crate::Error {
        match self {
            Self::Ambiguous { line, matches } => crate::Error::PatternAmbiguity {
                path: source.to_path_buf(),
                line,
                matches,
            },
            Self::Read(err) => crate::Error::io(source, err),
            Self::Write(err) => crate::Error::io(destination, err),
        }
    }
}

/// Counters collected while filtering one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub lines_read: usize,
    pub lines_written: usize,
    pub comments_removed: usize,
    pub docstring_lines_removed: usize,
}

/// Line-by-line filter for a single file.
///
/// Holds the docstring flag for the file being processed, so a fresh processor
/// is needed per file.
#[derive(Debug)]
pub struct LineProcessor<'a> {
    config: &'a RemovalConfig,
    matcher: Option<&'a CommentMatcher>,
    inside_docstring: bool,
    line_number: usize,
    stats: LineStats,
}

impl<'a> LineProcessor<'a> {
    pub fn new(config: &'a RemovalConfig, matcher: Option<&'a CommentMatcher>) -> Self {
        Self {
            config,
            matcher,
            inside_docstring: false,
            line_number: 0,
            stats: LineStats::default(),
        }
    }

    pub fn inside_docstring(&self) -> bool {
        self.inside_docstring
    }

    pub fn stats(&self) -> LineStats {
        self.stats
    }

    /// Filter one line, terminator included. `None` means the line is dropped.
    pub fn process_line<'l>(&mut self, line: &'l str) -> Result<Option<Cow<'l, str>>, LineError> {
        self.line_number += 1;
        self.stats.lines_read += 1;

        if self.config.strip_docstrings
            && (line.contains(TRIPLE_DOUBLE) || line.contains(TRIPLE_SINGLE))
        {
            // A line that both opens and closes a docstring (`"""doc"""`) still
            // toggles only once, which flips the state for everything after it.
            // Kept as-is for compatibility with existing level files.
            self.inside_docstring = !self.inside_docstring;
            self.stats.docstring_lines_removed += 1;
            return Ok(None);
        }

        if self.inside_docstring {
            self.stats.docstring_lines_removed += 1;
            return Ok(None);
        }

        let Some(matcher) = self.matcher else {
            self.stats.lines_written += 1;
            return Ok(Some(Cow::Borrowed(line)));
        };

        let (body, terminator) = split_terminator(line);
        // A comment only counts when it runs up to a line terminator, so an
        // unterminated last line is written unchanged.
        if terminator.is_empty() {
            self.stats.lines_written += 1;
            return Ok(Some(Cow::Borrowed(line)));
        }

        let output = match matcher.find(body) {
            CommentMatch::None => Cow::Borrowed(line),
            CommentMatch::Single(span) => {
                self.stats.comments_removed += 1;
                let mut stripped = String::with_capacity(line.len() - span.len());
                stripped.push_str(&body[..span.start]);
                stripped.push_str(&body[span.end..]);
                stripped.push_str(terminator);
                Cow::Owned(stripped)
            }
            CommentMatch::Ambiguous(matches) => {
                return Err(LineError::Ambiguous {
                    line: self.line_number,
                    matches,
                });
            }
        };

        self.stats.lines_written += 1;
        Ok(Some(output))
    }

    /// Stream `reader` through the filter into `writer`, one line at a time
    pub fn process<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        writer: &mut W,
    ) -> Result<LineStats, LineError> {
        let mut buffer = String::new();
        loop {
            buffer.clear();
            let read = reader.read_line(&mut buffer).map_err(LineError::Read)?;
            if read == 0 {
                break;
            }

            if let Some(output) = self.process_line(&buffer)? {
                writer
                    .write_all(output.as_bytes())
                    .map_err(LineError::Write)?;
            }
        }

        Ok(self.stats)
    }
}

/// Split a line into its body and trailing `\n` / `\r\n`
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip(content: &str, prefixes: &[&str], strip_docstrings: bool) -> String {
        let config = RemovalConfig::new(prefixes.iter().copied(), strip_docstrings);
        let matcher = CommentMatcher::new(&config.comment_prefixes).unwrap();
        let mut processor = LineProcessor::new(&config, matcher.as_ref());
        let mut out = Vec::new();
        processor.process(content.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_identity_without_markers() {
        let src = "import os\n\ndef f(x):\n    return x + 1\n";
        assert_eq!(strip(src, &["TODO:"], true), src);
    }

    #[test]
    fn test_empty_config_is_byte_identity() {
        let src = "# TODO: a\r\n\"\"\"\ndoc\n\"\"\"\nx = 1  # keep\nlast";
        assert_eq!(strip(src, &[], false), src);
    }

    #[test]
    fn test_no_prefixes_only_docstrings_change() {
        let src = "x = 1  # TODO: a\n'''\ninner\n'''\ny = 2\n";
        assert_eq!(strip(src, &[], true), "x = 1  # TODO: a\ny = 2\n");
    }

    #[test]
    fn test_trailing_comment_removed_newline_kept() {
        let src = "x = 1  # TODO: fix later\ny = 2\n";
        assert_eq!(strip(src, &["TODO:"], false), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_full_line_comment_leaves_empty_line() {
        let src = "    # FIXME: broken\nz = 3\n";
        assert_eq!(strip(src, &["FIXME:"], false), "\nz = 3\n");
    }

    #[test]
    fn test_crlf_terminator_survives() {
        let src = "a = 1 # TODO: x\r\nb = 2\r\n";
        assert_eq!(strip(src, &["TODO:"], false), "a = 1\r\nb = 2\r\n");
    }

    #[test]
    fn test_last_line_without_newline_is_kept() {
        assert_eq!(strip("a = 1 # TODO: x", &["TODO:"], false), "a = 1 # TODO: x");
        assert_eq!(
            strip("y = 2 # TODO: a\nx = 1  # TODO: later", &["TODO:"], false),
            "y = 2\nx = 1  # TODO: later"
        );
    }

    #[test]
    fn test_unmatched_prefix_untouched() {
        let src = "a = 1  # NOTE: keep me\n";
        assert_eq!(strip(src, &["TODO:"], false), src);
    }

    #[test]
    fn test_bare_docstring_pair() {
        let src = "before = 1\n\"\"\"\nhello\nworld\n\"\"\"\nafter = 2\n";
        assert_eq!(strip(src, &[], true), "before = 1\nafter = 2\n");
    }

    #[test]
    fn test_docstring_scenario_yields_empty_output() {
        assert_eq!(strip("\"\"\"\nhello\n\"\"\"\n", &[], true), "");
    }

    #[test]
    fn test_single_line_docstring_toggles_once() {
        let src = "def f():\n    \"\"\"One liner.\"\"\"\n    return 1\n";
        let config = RemovalConfig::new(Vec::<String>::new(), true);
        let mut processor = LineProcessor::new(&config, None);
        let mut out = Vec::new();
        processor.process(src.as_bytes(), &mut out).unwrap();

        // Everything after the one-liner is treated as docstring body
        assert_eq!(String::from_utf8(out).unwrap(), "def f():\n");
        assert!(processor.inside_docstring());
    }

    #[test]
    fn test_mixed_delimiters_share_one_flag() {
        let src = "\"\"\"\nbody\n'''\nvisible = True\n";
        assert_eq!(strip(src, &[], true), "visible = True\n");
    }

    #[test]
    fn test_docstrings_kept_when_disabled() {
        let src = "\"\"\"\n# TODO: inside\n\"\"\"\n";
        assert_eq!(strip(src, &["TODO:"], false), "\"\"\"\n\n\"\"\"\n");
    }

    #[test]
    fn test_comments_inside_docstring_dropped_without_matching() {
        let src = "'''\n# TODO|FIXME # TODO\n'''\nok = 1\n";
        assert_eq!(strip(src, &["TODO|FIXME"], true), "ok = 1\n");
    }

    #[test]
    fn test_ambiguous_line_reports_line_number() {
        let config = RemovalConfig::new(["TODO|FIXME"], false);
        let matcher = CommentMatcher::new(&config.comment_prefixes).unwrap();
        let mut processor = LineProcessor::new(&config, matcher.as_ref());
        let mut out = Vec::new();

        let err = processor
            .process("ok = 1\na # TODO b # TODO c\nnever = 3\n".as_bytes(), &mut out)
            .unwrap_err();

        assert!(matches!(err, LineError::Ambiguous { line: 2, matches: 2 }));
        assert_eq!(String::from_utf8(out).unwrap(), "ok = 1\n");
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let config = RemovalConfig::default();
        let mut processor = LineProcessor::new(&config, None);
        let mut out = Vec::new();
        let err = processor
            .process(&b"ok\n\xff\xfe\n"[..], &mut out)
            .unwrap_err();
        assert!(matches!(err, LineError::Read(_)));
        assert_eq!(out, b"ok\n");
    }

    #[test]
    fn test_stats() {
        let config = RemovalConfig::new(["TODO:"], true);
        let matcher = CommentMatcher::new(&config.comment_prefixes).unwrap();
        let mut processor = LineProcessor::new(&config, matcher.as_ref());
        let mut out = Vec::new();
        let stats = processor
            .process("\"\"\"\ndoc\n\"\"\"\nx = 1 # TODO: a\ny = 2\n".as_bytes(), &mut out)
            .unwrap();

        assert_eq!(
            stats,
            LineStats {
                lines_read: 5,
                lines_written: 2,
                comments_removed: 1,
                docstring_lines_removed: 3,
            }
        );
    }
}
