//! # Morphological Analyzer
//!
//! A small, deterministic analyzer for Japanese social-media text.
//! Script runs are tagged directly (katakana and latin words are nouns), kanji
//! stems absorb their okurigana to produce inflected adjectives and verbs with
//! reconstructed dictionary forms, and hiragana is split against a word list.
//! Adjectives after kanji are only read from listed stems; an unlisted kanji
//! run followed by kana stays a noun unless the kana is an unambiguous verb form.

mod lexicon;
mod script;

use std::collections::VecDeque;
use std::iter::Peekable;

use crate::domain::traits::Tokenizer;
use crate::domain::types::{PartOfSpeech, Token, TokenStream};
use lexicon::{adjective_inflections, godan_inflections, kanji_inflections, match_prefix};
use script::{Run, Runs, Script};

#[derive(Debug, Clone, Copy, Default)]
pub struct MorphTokenizer;

impl MorphTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for MorphTokenizer {
    fn tokenize<'a>(&'a self, text: &'a str) -> TokenStream<'a> {
        Box::new(Tokens {
            runs: Runs::new(text).peekable(),
            pending: VecDeque::new(),
        })
    }
}

struct Tokens<'a> {
    runs: Peekable<Runs<'a>>,
    pending: VecDeque<Token>,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }

            let run = self.runs.next()?;
            match run.script {
                Script::Kanji => return Some(self.kanji(run.text)),
                Script::Hiragana => self.pending.extend(segment_hiragana(run.text)),
                Script::Katakana | Script::Alphanumeric => {
                    return Some(Token::plain(run.text, PartOfSpeech::Noun));
                }
                Script::Symbol => return Some(Token::plain(run.text, PartOfSpeech::Other)),
                Script::Space => {}
            }
        }
    }
}

impl Tokens<'_> {
    /// A kanji run either absorbs the inflection written after it or stands as a noun.
    fn kanji(&mut self, stem: &str) -> Token {
        let next: Option<Run<'_>> = self.runs.peek().copied();
        let Some(tail) = next.filter(|run| run.script == Script::Hiragana) else {
            return Token::plain(stem, PartOfSpeech::Noun);
        };

        let Some(reading) = reading_after_kanji(stem, tail.text) else {
            return Token::plain(stem, PartOfSpeech::Noun);
        };

        self.runs.next();
        let (okurigana, rest) = tail.text.split_at(reading.len);
        self.pending.extend(segment_hiragana(rest));
        Token::new(format!("{stem}{okurigana}"), reading.part_of_speech, reading.base)
    }
}

/// How much of the following kana an inflected word takes, and its dictionary form.
#[derive(Debug)]
struct Reading {
    len: usize,
    part_of_speech: PartOfSpeech,
    base: String,
}

fn reading_after_kanji(stem: &str, tail: &str) -> Option<Reading> {
    known_reading(stem, tail).or_else(|| generic_reading(stem, tail))
}

/// Longest reading through a listed adjective or verb stem. Adjectives win ties.
fn known_reading(stem: &str, tail: &str) -> Option<Reading> {
    let mut best: Option<Reading> = None;
    let mut consider = |candidate: Reading| {
        if best.as_ref().is_none_or(|b| candidate.len > b.len) {
            best = Some(candidate);
        }
    };

    for adjective in lexicon::KANJI_ADJECTIVE_STEMS {
        let Some(after) = adjective.strip_prefix(stem).and_then(|kana| tail.strip_prefix(kana)) else {
            continue;
        };
        if let Some(rule) = match_prefix(adjective_inflections(), after) {
            consider(Reading {
                len: tail.len() - after.len() + rule.ending.len(),
                part_of_speech: PartOfSpeech::Adjective,
                base: format!("{adjective}{}", rule.base),
            });
        }
    }

    for (verb, row) in lexicon::KANJI_GODAN_VERBS {
        let Some(after) = verb.strip_prefix(stem).and_then(|kana| tail.strip_prefix(kana)) else {
            continue;
        };
        let forms = godan_inflections(row);
        if let Some(rule) = match_prefix(&forms, after) {
            consider(Reading {
                len: tail.len() - after.len() + rule.ending.len(),
                part_of_speech: PartOfSpeech::Verb,
                base: format!("{verb}{}", rule.base),
            });
        }
    }

    best
}

fn generic_reading(stem: &str, tail: &str) -> Option<Reading> {
    // 勉強して, 確認します: compound nouns followed by する stay nouns.
    let compound = stem.chars().count() >= 2;
    if compound && lexicon::SURU_PREFIXES.iter().any(|p| tail.starts_with(p)) {
        return None;
    }
    match_prefix(kanji_inflections(), tail).map(|rule| Reading {
        len: rule.ending.len(),
        part_of_speech: rule.part_of_speech,
        base: format!("{stem}{}", rule.base),
    })
}

/// Greedy longest match against the hiragana word list and adjective stems.
/// Unknown kana become single-character `Other` tokens.
fn segment_hiragana(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some(first) = rest.chars().next() {
        let mut best: Option<(usize, Token)> = None;

        for stem in lexicon::HIRAGANA_ADJECTIVE_STEMS {
            let Some(after) = rest.strip_prefix(stem) else {
                continue;
            };
            if let Some(rule) = match_prefix(adjective_inflections(), after) {
                let len = stem.len() + rule.ending.len();
                if best.as_ref().is_none_or(|(l, _)| len > *l) {
                    let token = Token::new(&rest[..len], rule.part_of_speech, format!("{stem}{}", rule.base));
                    best = Some((len, token));
                }
            }
        }

        for (surface, part_of_speech, base) in lexicon::HIRAGANA_WORDS {
            if rest.starts_with(surface) && best.as_ref().is_none_or(|(l, _)| surface.len() > *l) {
                best = Some((surface.len(), Token::new(*surface, *part_of_speech, *base)));
            }
        }

        let (len, token) = best.unwrap_or_else(|| {
            let len = first.len_utf8();
            (len, Token::plain(&rest[..len], PartOfSpeech::Other))
        });
        tokens.push(token);
        rest = &rest[len..];
    }

    tokens
}
