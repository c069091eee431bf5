//! Newest-first ordering for loosely formatted version strings.
//!
//! Version strings are split into a release part and a pre-release part,
//! each tokenized into numeric and alphanumeric runs. Keys are compared
//! component-wise (numeric runs numerically, numbers before words), a release
//! outranks any of its pre-releases, and the raw string breaks remaining ties.
//! Because the comparison is a lexicographic order over fully derived keys it
//! is a total order, even for tags that are nothing like semver.

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Number(u128),
    Word(&'a str),
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct VersionKey<'a> {
    release: Vec<Segment<'a>>,
    is_release: bool,
    pre_release: Vec<Segment<'a>>,
    raw: &'a str,
}

impl<'a> VersionKey<'a> {
    fn new(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
            .unwrap_or(trimmed);
        // Build metadata never participates in precedence.
        let without_build = trimmed.split_once('+').map_or(trimmed, |(v, _)| v);
        let (release, pre_release) = match without_build.split_once('-') {
            Some((release, pre)) => (release, Some(pre)),
            None => (without_build, None),
        };

        Self {
            release: segments(release),
            is_release: pre_release.is_none(),
            pre_release: pre_release.map(segments).unwrap_or_default(),
            raw,
        }
    }
}

fn segments(part: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = None;
    let mut numeric = false;

    for (idx, ch) in part.char_indices() {
        if !ch.is_alphanumeric() {
            if let Some(s) = start.take() {
                out.push(segment(&part[s..idx], numeric));
            }
            continue;
        }
        let is_digit = ch.is_ascii_digit();
        match start {
            Some(s) if is_digit != numeric => {
                out.push(segment(&part[s..idx], numeric));
                start = Some(idx);
                numeric = is_digit;
            }
            Some(_) => {}
            None => {
                start = Some(idx);
                numeric = is_digit;
            }
        }
    }
    if let Some(s) = start {
        out.push(segment(&part[s..], numeric));
    }
    out
}

fn segment(run: &str, numeric: bool) -> Segment<'_> {
    if numeric {
        // Runs too long for u128 fall back to their text.
        run.parse().map(Segment::Number).unwrap_or(Segment::Word(run))
    } else {
        Segment::Word(run)
    }
}

/// Compare two version strings in ascending precedence.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    VersionKey::new(a).cmp(&VersionKey::new(b))
}

/// Comparator producing newest-first order.
pub fn newest_first(a: &str, b: &str) -> Ordering {
    compare_versions(b, a)
}

/// Sort versions newest first. Duplicates are kept.
pub fn sort_newest_first(versions: &mut [String]) {
    versions.sort_by(|a, b| newest_first(a, b));
}
