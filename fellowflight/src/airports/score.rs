//! Approximate matching of a query against airport fields
//!
//! Two signals are combined. Edit similarity tolerates typos: it is derived from the smallest
//! edit distance between the query and any substring of the field. Subsequence similarity comes
//! from nucleo and catches abbreviations such as `snfran`; it is down-weighted since it also
//! accepts scattered characters.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Weight of subsequence similarity relative to edit similarity
const SUBSEQUENCE_WEIGHT: f64 = 0.8;

/// Bonus for a field equal to the query
const EXACT_BONUS: f64 = 1.0;

/// Bonus for a field starting with the query
const PREFIX_BONUS: f64 = 0.5;

/// Match of the query in a single field
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct FieldMatch {
    /// Similarity in `[0, 1]`
    pub similarity: f64,
    pub exact: bool,
    pub prefix: bool,
}

impl FieldMatch {
    /// Ranking score; exact matches outrank prefix matches, which outrank everything else
    pub fn rank(&self) -> f64 {
        let mut rank = self.similarity;
        if self.exact {
            rank += EXACT_BONUS;
        }
        if self.prefix {
            rank += PREFIX_BONUS;
        }
        rank
    }
}

/// Scores fields against a single query
pub(super) struct Scorer {
    query: String,
    query_chars: Vec<char>,
    pattern: Pattern,
    matcher: Matcher,
    /// Subsequence score of the query against itself, used for normalization
    self_score: Option<u32>,
    buf: Vec<char>,
}

impl Scorer {
    /// Prepares scoring for `query`; `None` for blank queries
    pub fn new(query: &str) -> Option<Self> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let pattern = Pattern::new(
            &query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();
        let self_score = pattern.score(Utf32Str::new(&query, &mut buf), &mut matcher);

        Some(Self {
            query_chars: query.chars().collect(),
            query,
            pattern,
            matcher,
            self_score,
            buf,
        })
    }

    /// Scores a field already lowercased
    pub fn score(&mut self, field: &str) -> Option<FieldMatch> {
        if field.is_empty() {
            return None;
        }

        let field_chars: Vec<char> = field.chars().collect();
        let distance = substring_distance(&self.query_chars, &field_chars);
        let edit = 1.0 - distance as f64 / self.query_chars.len() as f64;

        let subsequence = match (
            self.pattern
                .score(Utf32Str::new(field, &mut self.buf), &mut self.matcher),
            self.self_score,
        ) {
            (Some(score), Some(best)) if best > 0 => {
                (score as f64 / best as f64).min(1.0) * SUBSEQUENCE_WEIGHT
            }
            _ => 0.0,
        };

        Some(FieldMatch {
            similarity: edit.max(subsequence).clamp(0.0, 1.0),
            exact: field == self.query,
            prefix: field.starts_with(&self.query),
        })
    }
}

/// Smallest edit distance between `needle` and any substring of `haystack`
fn substring_distance(needle: &[char], haystack: &[char]) -> usize {
    // Row `j` holds the distance of the needle prefix to the best substring ending at `j`;
    // a zeroed first row lets the match start anywhere.
    let mut prev = vec![0; haystack.len() + 1];
    let mut cur = vec![0; haystack.len() + 1];

    for (i, &n) in needle.iter().enumerate() {
        cur[0] = i + 1;
        for (j, &h) in haystack.iter().enumerate() {
            let substitution = prev[j] + usize::from(n != h);
            cur[j + 1] = substitution.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev.into_iter().min().unwrap_or(needle.len())
}
