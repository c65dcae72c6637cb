//! Tag classification, Other-tag filtering and span segmentation
//!
//! Filtering always happens before grouping, so removed tags are fully
//! transparent to span boundaries and to switch detection.

use crate::config::EngineConfig;
use crate::models::{Span, TagClass};
use std::borrow::Cow;

/// Classify one tag against the configured sets
pub fn classify(tag: &str, config: &EngineConfig) -> TagClass {
    let tag = config.normalize(tag);
    if config.excluded().contains(&*tag) {
        return TagClass::Other;
    }
    match config.languages() {
        None => TagClass::Language,
        Some(langs) if langs.contains(&*tag) => TagClass::Language,
        Some(_) => TagClass::Unrecognized,
    }
}

/// Language tags of `tags`, in order, with every non-language tag dropped.
///
/// Tags come back in their normalized form.
pub fn filter_other<'a, S: AsRef<str>>(tags: &'a [S], config: &EngineConfig) -> Vec<Cow<'a, str>> {
    tags.iter()
        .map(AsRef::as_ref)
        .filter(|tag| classify(tag, config) == TagClass::Language)
        .map(|tag| config.normalize(tag))
        .collect()
}

/// Count tags per class: `(language, other, unrecognized)`
pub fn class_counts<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> (usize, usize, usize) {
    tags.iter()
        .fold((0, 0, 0), |(lang, other, unknown), tag| match classify(tag.as_ref(), config) {
            TagClass::Language => (lang + 1, other, unknown),
            TagClass::Other => (lang, other + 1, unknown),
            TagClass::Unrecognized => (lang, other, unknown + 1),
        })
}

/// Group a raw tag sequence into maximal equal-tag runs
pub fn to_spans<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> Vec<Span> {
    spans_of(&filter_other(tags, config))
}

/// Group an already-filtered sequence into spans
pub fn spans_of<S: AsRef<str>>(filtered: &[S]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    for tag in filtered.iter().map(AsRef::as_ref) {
        match spans.last_mut() {
            Some(last) if last.tag == tag => last.length += 1,
            _ => spans.push(Span::new(tag, 1)),
        }
    }
    spans
}

/// Per-position switch indicator for a filtered sequence.
///
/// Entry `i` is 1 when `filtered[i] != filtered[i + 1]`; the result has
/// `m - 1` entries (none for `m <= 1`).
pub fn switch_flags<S: AsRef<str>>(filtered: &[S]) -> Vec<u8> {
    filtered
        .windows(2)
        .map(|pair| u8::from(pair[0].as_ref() != pair[1].as_ref()))
        .collect()
}

/// Number of adjacent pairs whose tags differ
pub fn switch_count<S: AsRef<str>>(filtered: &[S]) -> usize {
    filtered
        .windows(2)
        .filter(|pair| pair[0].as_ref() != pair[1].as_ref())
        .count()
}
