//! Script classification and run segmentation.
//!
//! Text is walked grapheme by grapheme so combining marks and multi-byte
//! characters stay whole; consecutive graphemes of the same script form a run.
//! Whitespace ends a run and is dropped.

use std::iter::Peekable;
use unicode_segmentation::{GraphemeIndices, UnicodeSegmentation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Kanji,
    Hiragana,
    Katakana,
    Alphanumeric,
    Symbol,
    Space,
}

pub fn classify(c: char) -> Script {
    match c {
        '\u{3041}'..='\u{309F}' => Script::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            Script::Katakana
        }
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}' | '々' | '〆' => {
            Script::Kanji
        }
        c if c.is_whitespace() => Script::Space,
        c if c.is_alphanumeric() => Script::Alphanumeric,
        '_' => Script::Alphanumeric,
        _ => Script::Symbol,
    }
}

fn classify_grapheme(grapheme: &str) -> Script {
    grapheme.chars().next().map_or(Script::Space, classify)
}

/// A maximal slice of text written in one script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    pub script: Script,
    pub text: &'a str,
}

pub struct Runs<'a> {
    text: &'a str,
    graphemes: Peekable<GraphemeIndices<'a>>,
}

impl<'a> Runs<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            graphemes: text.grapheme_indices(true).peekable(),
        }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, script, mut end) = loop {
            let (idx, grapheme) = self.graphemes.next()?;
            let script = classify_grapheme(grapheme);
            if script != Script::Space {
                break (idx, script, idx + grapheme.len());
            }
        };

        while let Some(&(idx, grapheme)) = self.graphemes.peek() {
            if classify_grapheme(grapheme) != script {
                break;
            }
            end = idx + grapheme.len();
            self.graphemes.next();
        }

        Some(Run {
            script,
            text: &self.text[start..end],
        })
    }
}
