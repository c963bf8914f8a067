use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use anyhow::{anyhow, Result};
use lru::LruCache;
use nucleo_matcher::{Config, Matcher, Utf32Str};
use tracing::debug;

use super::normalize::{normalize, normalize_indexed};

/// Weight of each character a candidate is longer than the query. Tuned by hand;
/// small enough that long paths still rank on their matches.
pub const LENGTH_PENALTY: f64 = 0.001;

/// Number of `(query, text)` pairs whose matching blocks are memoized.
pub const CACHE_CAPACITY: usize = 1000;

/// A run shared by the normalized query and text, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock {
    pub query_index: usize,
    pub text_index: usize,
    pub len: usize,
}

/// A matched run located in the caller's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchBlock {
    /// Char offset into the text as given, before folding.
    pub text_offset: usize,
    pub matched: String,
    /// Starts the text or follows a space.
    pub at_word_start: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockMatch {
    pub blocks: Vec<MatchBlock>,
    /// Folded chars covered by `blocks`.
    pub matched_chars: usize,
    /// Folded lengths of the query and text.
    pub query_len: usize,
    pub text_len: usize,
}

/// Finds the common runs between a normalized query and text.
///
/// Implementations must return non-overlapping blocks that increase in both
/// query and text offsets, ordered left to right, with no zero-length sentinel.
pub trait MatchingBlocksStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn matching_blocks(&self, query: &[char], text: &[char]) -> Vec<RawBlock>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatcherBackend {
    #[default]
    Reference,
    Nucleo,
}

impl MatcherBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reference" | "native" => Ok(Self::Reference),
            "nucleo" => Ok(Self::Nucleo),
            _ => Err(anyhow!(
                "invalid matcher backend '{value}' (expected reference or nucleo)"
            )),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Nucleo => "nucleo",
        }
    }
}

/// Longest-common-substring decomposition: take the longest shared run, then
/// recurse on the unmatched parts to its left and right.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceMatcherBlocks;

impl SequenceMatcherBlocks {
    fn longest_match(
        query: &[char],
        positions: &HashMap<char, Vec<usize>>,
        (alo, ahi, blo, bhi): (usize, usize, usize, usize),
    ) -> RawBlock {
        let mut best = RawBlock {
            query_index: alo,
            text_index: blo,
            len: 0,
        };
        // run length of the match ending at text offset j, for the previous query char
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();

        for (i, ch) in query.iter().enumerate().take(ahi).skip(alo) {
            let mut next = HashMap::new();
            if let Some(offsets) = positions.get(ch) {
                for &j in offsets {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let len = j
                        .checked_sub(1)
                        .and_then(|prev| run_lengths.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, len);
                    if len > best.len {
                        best = RawBlock {
                            query_index: i + 1 - len,
                            text_index: j + 1 - len,
                            len,
                        };
                    }
                }
            }
            run_lengths = next;
        }

        best
    }
}

impl MatchingBlocksStrategy for SequenceMatcherBlocks {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn matching_blocks(&self, query: &[char], text: &[char]) -> Vec<RawBlock> {
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in text.iter().enumerate() {
            positions.entry(*ch).or_default().push(j);
        }

        let mut pending = vec![(0, query.len(), 0, text.len())];
        let mut found = Vec::new();

        while let Some(bounds) = pending.pop() {
            let (alo, ahi, blo, bhi) = bounds;
            let block = Self::longest_match(query, &positions, bounds);
            if block.len == 0 {
                continue;
            }

            let (i, j, k) = (block.query_index, block.text_index, block.len);
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
            found.push(block);
        }

        found.sort_by_key(|block| (block.query_index, block.text_index));
        collapse_adjacent(found)
    }
}

/// Fast path backed by nucleo's fuzzy aligner. Only produces blocks when every
/// query character occurs in order in the text.
pub struct NucleoBlocks {
    matcher: Mutex<Matcher>,
}

impl NucleoBlocks {
    pub fn new() -> Self {
        Self {
            matcher: Mutex::new(Matcher::new(Config::DEFAULT)),
        }
    }
}

impl Default for NucleoBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingBlocksStrategy for NucleoBlocks {
    fn name(&self) -> &'static str {
        "nucleo"
    }

    fn matching_blocks(&self, query: &[char], text: &[char]) -> Vec<RawBlock> {
        if query.is_empty() || text.is_empty() {
            return Vec::new();
        }
        let Ok(mut matcher) = self.matcher.lock() else {
            return Vec::new();
        };

        let mut indices = Vec::new();
        let matched = matcher.fuzzy_indices(
            Utf32Str::Unicode(text),
            Utf32Str::Unicode(query),
            &mut indices,
        );
        if matched.is_none() {
            return Vec::new();
        }
        indices.sort_unstable();
        indices.dedup();
        if indices.len() != query.len() {
            return Vec::new();
        }

        let mut blocks: Vec<RawBlock> = Vec::new();
        for (query_index, text_index) in indices.into_iter().enumerate() {
            let text_index = text_index as usize;
            if let Some(last) = blocks.last_mut() {
                if last.text_index + last.len == text_index {
                    last.len += 1;
                    continue;
                }
            }
            blocks.push(RawBlock {
                query_index,
                text_index,
                len: 1,
            });
        }
        blocks
    }
}

fn collapse_adjacent(blocks: Vec<RawBlock>) -> Vec<RawBlock> {
    let mut collapsed: Vec<RawBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(last) = collapsed.last_mut() {
            if last.query_index + last.len == block.query_index
                && last.text_index + last.len == block.text_index
            {
                last.len += block.len;
                continue;
            }
        }
        collapsed.push(block);
    }
    collapsed
}

/// Scores queries against candidate text with a fixed blocks strategy and a
/// bounded memo of recent `(query, text)` pairs.
pub struct FuzzyScorer {
    strategy: Box<dyn MatchingBlocksStrategy>,
    cache: Mutex<LruCache<(String, String), BlockMatch>>,
}

impl FuzzyScorer {
    pub fn new(strategy: Box<dyn MatchingBlocksStrategy>) -> Self {
        Self::new_with_capacity(strategy, CACHE_CAPACITY)
    }

    pub fn new_with_capacity(strategy: Box<dyn MatchingBlocksStrategy>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            strategy,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn with_backend(backend: MatcherBackend) -> Self {
        let strategy: Box<dyn MatchingBlocksStrategy> = match backend {
            MatcherBackend::Reference => {
                debug!("using reference fuzzy matcher; set backend = \"nucleo\" for the faster aligner");
                Box::new(SequenceMatcherBlocks)
            }
            MatcherBackend::Nucleo => Box::new(NucleoBlocks::new()),
        };
        Self::new(strategy)
    }

    pub fn backend_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Matching blocks of `query` in `text`, with offsets into `text` and the
    /// total number of matched characters.
    pub fn matching_blocks(&self, query: &str, text: &str) -> BlockMatch {
        let key = (query.to_string(), text.to_string());
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }
        }

        let normalized_query: Vec<char> = normalize(query).chars().collect();
        let (normalized_text, source_index): (Vec<char>, Vec<usize>) =
            normalize_indexed(text).into_iter().unzip();
        let original: Vec<char> = text.chars().collect();

        let mut result = BlockMatch {
            query_len: normalized_query.len(),
            text_len: normalized_text.len(),
            ..BlockMatch::default()
        };
        for block in self
            .strategy
            .matching_blocks(&normalized_query, &normalized_text)
        {
            if block.len == 0 {
                continue;
            }
            // Offsets are in folded chars; map both ends back onto `text`.
            let start = source_index[block.text_index];
            let end = source_index[block.text_index + block.len - 1] + 1;
            result.blocks.push(MatchBlock {
                text_offset: start,
                matched: original[start..end].iter().collect(),
                at_word_start: block.text_index == 0
                    || normalized_text[block.text_index - 1] == ' ',
            });
            result.matched_chars += block.len;
        }

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, result.clone());
        }
        result
    }

    /// Similarity of `text` to `query` in `[0, 100]`. Whole-word matches beat
    /// mid-word ones and shorter candidates are slightly preferred.
    pub fn score(&self, query: &str, text: &str) -> f64 {
        if query.is_empty() || text.is_empty() {
            return 0.0;
        }

        let found = self.matching_blocks(query, text);
        if found.query_len == 0 || found.text_len == 0 {
            return 0.0;
        }
        let query_len = found.query_len as f64;
        let max_len = query_len.max(found.text_len as f64);

        let mut base_similarity = found.matched_chars as f64 / query_len;
        for block in &found.blocks {
            if !block.at_word_start {
                base_similarity -= 0.5 / query_len;
            }
        }

        let score = 100.0 * base_similarity * query_len
            / (query_len + (max_len - query_len) * LENGTH_PENALTY);
        debug_assert!(
            (0.0..=100.0 + 1e-9).contains(&score),
            "score {score} out of range for {query:?} / {text:?}"
        );
        debug!(query, text, score, "scored candidate text");
        score
    }

    pub fn cached_pairs(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

static DEFAULT_SCORER: OnceLock<FuzzyScorer> = OnceLock::new();

/// Process-wide scorer using the reference strategy.
pub fn default_scorer() -> &'static FuzzyScorer {
    DEFAULT_SCORER.get_or_init(|| FuzzyScorer::new(Box::new(SequenceMatcherBlocks)))
}

pub fn matching_blocks(query: &str, text: &str) -> BlockMatch {
    default_scorer().matching_blocks(query, text)
}

pub fn score(query: &str, text: &str) -> f64 {
    default_scorer().score(query, text)
}
