use chrono::{DateTime, Local};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Timestamp suffix for output folders, e.g. `240131_153045`
pub const TIMESTAMP_FORMAT: &str = "%y%m%d_%H%M%S";

/// Drop one leading and one trailing `"`, as left behind by "copy as path"
pub fn trim_path_quotes(input: &str) -> &str {
    let input = input.strip_prefix('"').unwrap_or(input);
    input.strip_suffix('"').unwrap_or(input)
}

/// Remove trailing separators so the root can be substituted as a path prefix
pub fn normalize_root(input: &str) -> &str {
    let trimmed = input.trim_end_matches(['/', MAIN_SEPARATOR]);
    if trimmed.is_empty() { input } else { trimmed }
}

/// `<parent of source_root>/<label>_<timestamp>`
pub fn destination_root(
    source_root: &Path,
    label: &str,
    started_at: &DateTime<Local>,
) -> PathBuf {
    let name = format!("{}_{}", label, started_at.format(TIMESTAMP_FORMAT));
    match source_root.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Replace the first occurrence of `from` in `path` with `to`
pub fn substitute_root(path: &Path, from: &Path, to: &Path) -> PathBuf {
    let path = path.to_string_lossy();
    let from = from.to_string_lossy();
    let to = to.to_string_lossy();
    PathBuf::from(path.replacen(from.as_ref(), to.as_ref(), 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_trim_path_quotes() {
        assert_eq!(trim_path_quotes("\"/home/me/src\""), "/home/me/src");
        assert_eq!(trim_path_quotes("\"/home/me/src"), "/home/me/src");
        assert_eq!(trim_path_quotes("/home/me/src\""), "/home/me/src");
        assert_eq!(trim_path_quotes("\"\"a\"\""), "\"a\"");
        assert_eq!(trim_path_quotes("\""), "");
        assert_eq!(trim_path_quotes(""), "");
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("proj/src/"), "proj/src");
        assert_eq!(normalize_root("proj/src"), "proj/src");
        assert_eq!(normalize_root("/"), "/");
    }

    #[test]
    fn test_destination_root_is_sibling() {
        let at = Local.with_ymd_and_hms(2024, 1, 31, 15, 30, 45).unwrap();
        assert_eq!(
            destination_root(Path::new("/work/project"), "dst", &at),
            PathBuf::from("/work/dst_240131_153045")
        );
    }

    #[test]
    fn test_substitute_root() {
        let out = substitute_root(
            Path::new("/work/project/pkg/mod.py"),
            Path::new("/work/project"),
            Path::new("/work/dst_240131_153045"),
        );
        assert_eq!(out, PathBuf::from("/work/dst_240131_153045/pkg/mod.py"));
    }

    #[test]
    fn test_substitute_root_only_first_occurrence() {
        let out = substitute_root(Path::new("src/a/src/b.py"), Path::new("src"), Path::new("out"));
        assert_eq!(out, PathBuf::from("out/a/src/b.py"));
    }
}
