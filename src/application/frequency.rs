//! # Frequency Aggregation
//!
//! Builds the weighted term map behind the word cloud. Adjectives dominate the
//! score so the picture leans towards descriptive words; verbs and adjectives
//! are folded onto their dictionary form, nouns and adverbs are kept as written.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::traits::Tokenizer;
use crate::domain::types::{FrequencyMap, PartOfSpeech, Query, Token};

pub const ADJECTIVE_WEIGHT: u64 = 100;
pub const VERB_WEIGHT: u64 = 1;
pub const NOUN_WEIGHT: u64 = 1;
pub const ADVERB_WEIGHT: u64 = 1;

/// Keeps bodies from fusing into one token at the join.
const BODY_SEPARATOR: &str = "\n";

/// Function words and URL debris that would otherwise crowd every cloud.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "てる", "いる", "なる", "れる", "する", "ある", "こと", "これ", "さん", "して", "くれる",
    "やる", "くださる", "そう", "せる", "した", "思う", "それ", "ここ", "ちゃん", "くん", "", "て",
    "に", "を", "は", "の", "が", "と", "た", "し", "で", "ない", "も", "な", "い", "か", "ので",
    "よう", "RT", "@", "http", "https", ".", ":", "/", "//", "://",
];

#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Built-in list plus `extra`, plus the surfaces of the query itself so
    /// the searched words never dominate their own cloud.
    pub fn for_query(query: &Query, tokenizer: &dyn Tokenizer, extra: &[String]) -> Self {
        let mut set = Self::new(DEFAULT_STOP_WORDS.iter().copied());
        set.extend(extra.iter().cloned());
        set.extend(tokenizer.tokenize(query.as_str()).map(|token| token.surface));
        set
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, words: I) {
        self.words.extend(words);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

pub struct FrequencyAggregator {
    tokenizer: Arc<dyn Tokenizer>,
}

impl FrequencyAggregator {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    pub fn aggregate(&self, bodies: &[String], stop_words: &StopWordSet) -> FrequencyMap {
        tracing::info!("Doing morphological analysis on {} messages...", bodies.len());

        let text = bodies.join(BODY_SEPARATOR);
        let mut frequencies = FrequencyMap::new();
        for token in self.tokenizer.tokenize(&text) {
            if stop_words.contains(&token.surface) {
                continue;
            }
            add(&mut frequencies, token);
        }

        tracing::info!("-> Done. {} distinct terms.", frequencies.len());
        frequencies
    }
}

fn add(frequencies: &mut FrequencyMap, token: Token) {
    let (key, weight) = match token.part_of_speech {
        PartOfSpeech::Adjective => (token.base_form, ADJECTIVE_WEIGHT),
        PartOfSpeech::Verb => (token.base_form, VERB_WEIGHT),
        PartOfSpeech::Noun => (token.surface, NOUN_WEIGHT),
        PartOfSpeech::Adverb => (token.surface, ADVERB_WEIGHT),
        PartOfSpeech::Other => return,
    };
    *frequencies.entry(key).or_insert(0) += weight;
}
