//! Fuzzy search over loaded content
//!
//! Each record exposes a fixed set of text fields. A query matches a field
//! when the query appears in it with at most `threshold * query length`
//! edits (approximate substring match, position ignored). Records are ranked
//! by combining the scores of all matching fields; short fields such as a
//! title weigh more than long ones such as the body.

use std::borrow::Cow;
use std::sync::Arc;

use crate::content::{BlogPost, Project};

/// Default tolerance; lower is stricter
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Longer queries are matched chunk by chunk
const MAX_PATTERN_LEN: usize = 32;

/// Something the index can search
pub trait Searchable {
    /// Text fields to match against, in priority-free order
    fn search_fields(&self) -> Vec<Cow<'_, str>>;
}

impl Searchable for BlogPost {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.description.as_str()),
            Cow::Borrowed(self.category.as_str()),
            Cow::Borrowed(self.content.as_str()),
        ]
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.description.as_str()),
            Cow::Owned(self.tags.join(" ")),
            Cow::Borrowed(self.content.as_str()),
        ]
    }
}

/// Search tuning
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// One search result
#[derive(Debug)]
pub struct SearchHit<'a, T> {
    pub item: &'a T,
    /// Position in the indexed collection
    pub index: usize,
    /// Lower is better; `None` for the unranked empty-query listing
    pub score: Option<f64>,
}

struct IndexedField {
    text: String,
    norm: f64,
}

/// A search index over a shared collection.
///
/// Rebuild it whenever the collection changes; [`SearchIndex::records`]
/// tells which collection an index was built from.
pub struct SearchIndex<T> {
    records: Arc<Vec<T>>,
    fields: Vec<Vec<IndexedField>>,
    options: SearchOptions,
}

impl<T: Searchable> SearchIndex<T> {
    pub fn new(records: Arc<Vec<T>>, options: SearchOptions) -> Self {
        let fields = records
            .iter()
            .map(|record| {
                record
                    .search_fields()
                    .iter()
                    .filter(|field| !field.trim().is_empty())
                    .map(|field| IndexedField {
                        text: field.to_lowercase(),
                        norm: field_norm(field),
                    })
                    .collect()
            })
            .collect();

        Self {
            records,
            fields,
            options,
        }
    }

    /// The indexed collection
    pub fn records(&self) -> &Arc<Vec<T>> {
        &self.records
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Run a query.
    ///
    /// A blank query lists every record in collection order. Otherwise only
    /// matching records are returned, best first; equal scores keep
    /// collection order.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_, T>> {
        let records = self.records.as_slice();
        let query = query.trim();
        if query.is_empty() {
            return records
                .iter()
                .enumerate()
                .map(|(index, item)| SearchHit {
                    item,
                    index,
                    score: None,
                })
                .collect();
        }

        let chunks = pattern_chunks(&query.to_lowercase());

        let mut hits: Vec<_> = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(index, fields)| {
                let score = self.record_score(fields, &chunks)?;
                Some(SearchHit {
                    item: &records[index],
                    index,
                    score: Some(score),
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            let a = a.score.unwrap_or(1.0);
            let b = b.score.unwrap_or(1.0);
            a.total_cmp(&b)
        });

        tracing::debug!("Query {:?} matched {} of {}", query, hits.len(), self.len());

        hits
    }

    /// Product of `score ^ norm` over matching fields, `None` if none match
    fn record_score(&self, fields: &[IndexedField], chunks: &[String]) -> Option<f64> {
        let mut total: Option<f64> = None;

        for field in fields {
            if let Some(score) = field_score(&field.text, chunks, self.options.threshold) {
                let score = if score == 0.0 { f64::EPSILON } else { score };
                *total.get_or_insert(1.0) *= score.powf(field.norm);
            }
        }

        total
    }
}

/// Fuzzy-search blog posts with the default tolerance
pub fn search<'a>(posts: &'a [BlogPost], query: &str) -> Vec<&'a BlogPost> {
    SearchIndex::new(Arc::new(posts.to_vec()), SearchOptions::default())
        .search(query)
        .into_iter()
        .map(|hit| &posts[hit.index])
        .collect()
}

/// Mean chunk score for a field, `None` when no chunk matches
fn field_score(text: &str, chunks: &[String], threshold: f64) -> Option<f64> {
    let mut matched = false;
    let mut total = 0.0;

    for chunk in chunks {
        let len = chunk.chars().count();
        let max_errors = (threshold * len as f64).floor() as usize;
        match best_distance(chunk, len, text, max_errors) {
            Some(distance) => {
                matched = true;
                total += distance as f64 / len as f64;
            }
            None => total += 1.0,
        }
    }

    matched.then(|| total / chunks.len() as f64)
}

/// Smallest edit distance between `pattern` and any substring of `text`,
/// if within `max_errors`.
///
/// An optimal substring can always be taken to start on a character that
/// matches one of the first `max_errors + 1` pattern characters, so only
/// those offsets are tried.
fn best_distance(
    pattern: &str,
    pattern_len: usize,
    text: &str,
    max_errors: usize,
) -> Option<usize> {
    if text.contains(pattern) {
        return Some(0);
    }
    if max_errors == 0 {
        return None;
    }

    let leading: Vec<char> = pattern.chars().take(max_errors + 1).collect();
    let shortest = pattern_len.saturating_sub(max_errors).max(1);
    let longest = pattern_len + max_errors;
    let mut best: Option<usize> = None;

    for (start, _) in text.char_indices().filter(|(_, c)| leading.contains(c)) {
        let window = &text[start..];
        let bounds: Vec<usize> = window
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(window.len()))
            .take(longest + 1)
            .collect();

        for end in bounds.iter().skip(shortest) {
            let distance = strsim::levenshtein(pattern, &window[..*end]);
            if distance <= max_errors && best.map_or(true, |b| distance < b) {
                best = Some(distance);
                if distance == 1 {
                    return best;
                }
            }
        }
    }

    best
}

fn pattern_chunks(query: &str) -> Vec<String> {
    let chars: Vec<char> = query.chars().collect();
    chars
        .chunks(MAX_PATTERN_LEN)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Shorter fields count more: 1 / sqrt(token count), to three decimals
fn field_norm(text: &str) -> f64 {
    let tokens = text.split_whitespace().count().max(1) as f64;
    (1.0 / tokens.sqrt() * 1000.0).round() / 1000.0
}
