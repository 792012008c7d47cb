use crate::error::{HotfilesError, Result};
use regex::Regex;

/// Decides whether a file path takes part in aggregation.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    prefix: Option<String>,
    exclude: Option<Regex>,
    extensions: Vec<String>,
}

impl PathFilter {
    pub fn new(prefix: Option<String>, exclude: Option<Regex>, extensions: Vec<String>) -> Self {
        Self {
            prefix: prefix.and_then(|p| normalize_prefix(&p)),
            exclude,
            extensions,
        }
    }

    /// A filter that admits every path.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn admits(&self, path: &str) -> bool {
        if let Some(prefix) = &self.prefix {
            let inside = path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
            if !inside {
                return false;
            }
        }
        if let Some(re) = &self.exclude {
            if re.is_match(path) {
                return false;
            }
        }
        if !self.extensions.is_empty() && !self.extensions.iter().any(|ext| path.ends_with(ext.as_str())) {
            return false;
        }
        true
    }
}

/// Parses `"h, hpp,.c"` into `[".h", ".hpp", ".c"]`.
pub fn parse_extensions(list: &str) -> Result<Vec<String>> {
    list.split(',')
        .map(|raw| {
            let ext = raw.trim().trim_start_matches('.');
            if ext.is_empty() {
                return Err(HotfilesError::InvalidExtension(format!(
                    "empty entry in '{list}'"
                )));
            }
            Ok(format!(".{ext}"))
        })
        .collect()
}

/// `./src/` and `src` both restrict to `src`; `.` and `./` mean no restriction.
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let mut p = raw.trim();
    while let Some(rest) = p.strip_prefix("./") {
        p = rest;
    }
    let p = p.trim_end_matches('/');
    if p.is_empty() || p == "." {
        None
    } else {
        Some(p.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_exact_suffix() {
        let filter = PathFilter::new(None, None, parse_extensions("py").unwrap());
        assert!(filter.admits("foo.py"));
        assert!(filter.admits("pkg/bar.py"));
        assert!(!filter.admits("foo.pyc"));
        assert!(!filter.admits("py"));
    }

    #[test]
    fn exclude_regex_matches_anywhere() {
        let filter = PathFilter::new(None, Some(Regex::new("vendor/").unwrap()), Vec::new());
        assert!(!filter.admits("third_party/vendor/lib.c"));
        assert!(filter.admits("src/lib.c"));
    }

    #[test]
    fn prefix_restricts_paths() {
        let filter = PathFilter::new(Some("./src".to_string()), None, Vec::new());
        assert!(filter.admits("src/main.rs"));
        assert!(filter.admits("src"));
        assert!(!filter.admits("srcgen/main.rs"));
        assert!(!filter.admits("tests/cli.rs"));
        assert!(PathFilter::new(Some(".".to_string()), None, Vec::new()).admits("anything"));
    }

    #[test]
    fn rejects_empty_extension_entries() {
        assert_eq!(parse_extensions(" h, .hpp ,c").unwrap(), vec![".h", ".hpp", ".c"]);
        assert!(parse_extensions("h,,c").is_err());
    }
}
