//! Line classifier for `git log --pretty=format:%H --numstat` output.

const SHA1_HEX_LEN: usize = 40;
const SHA256_HEX_LEN: usize = 64;

/// One classified input line. Borrowed from the line, never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    Blank,
    Commit(&'a str),
    Hunk {
        additions: u64,
        deletions: u64,
        path: &'a str,
    },
    /// Binary-file markers (`-\t-\tpath`) and anything else that is not a hunk.
    Skip,
}

pub fn is_commit_marker(token: &str) -> bool {
    (token.len() == SHA1_HEX_LEN || token.len() == SHA256_HEX_LEN)
        && token.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn parse_line(line: &str) -> Record<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Record::Blank;
    }
    if is_commit_marker(trimmed) {
        return Record::Commit(trimmed);
    }

    let (added, deleted, path) = match split_fields(line) {
        Some(fields) => fields,
        None => return Record::Skip,
    };

    match (added.parse::<u64>(), deleted.parse::<u64>()) {
        (Ok(additions), Ok(deletions)) => Record::Hunk {
            additions,
            deletions,
            path,
        },
        _ => Record::Skip,
    }
}

// git separates numstat fields with tabs so paths may contain spaces. Hand-written
// logs sometimes use plain whitespace; accept that only when there are exactly three fields.
fn split_fields(line: &str) -> Option<(&str, &str, &str)> {
    let mut tabbed = line.splitn(3, '\t');
    if let (Some(a), Some(d), Some(p)) = (tabbed.next(), tabbed.next(), tabbed.next()) {
        let p = p.trim();
        if p.is_empty() {
            return None;
        }
        return Some((a.trim(), d.trim(), p));
    }

    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(a), Some(d), Some(p), None) => Some((a, d, p)),
        _ => None,
    }
}
