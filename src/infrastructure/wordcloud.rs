//! # Word Cloud Renderer
//!
//! Rasterizes a frequency map into a PNG. Words are placed largest first
//! along an Archimedean spiral from the canvas centre; a word that does not
//! fit is retried at smaller sizes down to the minimum and dropped after
//! that. Layout and colours depend only on the input, so the same map
//! always yields the same picture.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

use crate::domain::error::RenderError;
use crate::domain::traits::Renderer;
use crate::domain::types::{FrequencyMap, StyleOptions};

const PADDING: f32 = 2.0;
const SHRINK_STEP: f32 = 2.0;
const SPIRAL_STEP: f32 = 0.1;
const SPIRAL_GROWTH: f32 = 2.0;

const PALETTE: [[u8; 3]; 8] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [23, 190, 207],
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    fn inside(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x + self.width <= width && self.y + self.height <= height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub word: String,
    pub font_size: f32,
    pub bounds: Rect,
    pub colour: [u8; 3],
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WordCloudRenderer;

impl WordCloudRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for WordCloudRenderer {
    fn render(&self, frequencies: &FrequencyMap, style: &StyleOptions, output: &Path) -> Result<PathBuf, RenderError> {
        if frequencies.is_empty() {
            return Err(RenderError::EmptyFrequencies);
        }
        validate(style)?;
        let background = parse_colour(&style.background)?;
        let font = load_font(&style.font_path)?;

        let words = ranked(frequencies, style.max_words);
        let placements = layout(&words, style, |word, size| measure(&font, word, size));
        if placements.is_empty() {
            return Err(RenderError::NothingPlaced(words.len()));
        }
        tracing::debug!("Placed {} of {} words", placements.len(), words.len());

        let mut canvas = RgbaImage::from_pixel(style.width, style.height, Rgba([background[0], background[1], background[2], 255]));
        for placement in &placements {
            draw_word(&mut canvas, &font, placement);
        }
        canvas.save_with_format(output, ImageFormat::Png)?;
        Ok(output.to_path_buf())
    }
}

fn validate(style: &StyleOptions) -> Result<(), RenderError> {
    if style.width == 0 || style.height == 0 {
        return Err(RenderError::Style(format!("canvas {}x{} is empty", style.width, style.height)));
    }
    if style.min_font_size == 0 {
        return Err(RenderError::Style("min_font_size must be positive".to_string()));
    }
    if style.max_words == 0 {
        return Err(RenderError::Style("max_words must be positive".to_string()));
    }
    Ok(())
}

fn load_font(path: &Path) -> Result<FontVec, RenderError> {
    let font_error = |reason: String| RenderError::Font {
        path: path.display().to_string(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
    FontVec::try_from_vec(bytes).map_err(|e| font_error(e.to_string()))
}

/// `#rgb`, `#rrggbb` or one of a few common names.
pub fn parse_colour(value: &str) -> Result<[u8; 3], RenderError> {
    let value = value.trim().to_ascii_lowercase();
    let named = match value.as_str() {
        "white" => Some([255, 255, 255]),
        "black" => Some([0, 0, 0]),
        "gray" | "grey" => Some([128, 128, 128]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 128, 0]),
        "blue" => Some([0, 0, 255]),
        "yellow" => Some([255, 255, 0]),
        "navy" => Some([0, 0, 128]),
        _ => None,
    };
    if let Some(rgb) = named {
        return Ok(rgb);
    }

    let invalid = || RenderError::Style(format!("unknown colour '{value}'"));
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;
    match digits.as_slice() {
        [r, g, b] => Ok([r * 17, g * 17, b * 17]),
        [r1, r2, g1, g2, b1, b2] => Ok([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2]),
        _ => Err(invalid()),
    }
}

/// Highest score first, ties broken alphabetically, capped at `limit`.
pub fn ranked(frequencies: &FrequencyMap, limit: usize) -> Vec<(String, u64)> {
    let mut words: Vec<(String, u64)> = frequencies
        .iter()
        .filter(|(word, _)| !word.trim().is_empty())
        .map(|(word, score)| (word.clone(), *score))
        .collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(limit);
    words
}

/// Linear in the score relative to the top score.
pub fn font_size(score: u64, top: u64, min: f32, max: f32) -> f32 {
    if top == 0 {
        return min;
    }
    let ratio = score as f32 / top as f32;
    (min + (max - min) * ratio).clamp(min, max)
}

fn max_font_size(style: &StyleOptions) -> f32 {
    let max = style.max_font_size.unwrap_or(style.height / 3);
    max.max(style.min_font_size) as f32
}

/// Places `words` (already ranked) on the canvas. `measure` returns the
/// `(width, height)` of a word at a font size.
pub fn layout<M>(words: &[(String, u64)], style: &StyleOptions, measure: M) -> Vec<Placement>
where
    M: Fn(&str, f32) -> (f32, f32),
{
    let Some(top) = words.first().map(|(_, score)| *score) else {
        return Vec::new();
    };
    let min = style.min_font_size as f32;
    let max = max_font_size(style);
    let (width, height) = (style.width as f32, style.height as f32);

    let mut placed: Vec<Placement> = Vec::new();
    for (rank, (word, score)) in words.iter().enumerate() {
        let mut size = font_size(*score, top, min, max);
        loop {
            let (w, h) = measure(word, size);
            if let Some(bounds) = find_spot(w + PADDING, h + PADDING, width, height, &placed) {
                placed.push(Placement {
                    word: word.clone(),
                    font_size: size,
                    bounds,
                    colour: PALETTE[rank % PALETTE.len()],
                });
                break;
            }
            if size <= min {
                break;
            }
            size = (size - SHRINK_STEP).max(min);
        }
    }
    placed
}

fn find_spot(w: f32, h: f32, width: f32, height: f32, placed: &[Placement]) -> Option<Rect> {
    if w > width || h > height {
        return None;
    }
    let (cx, cy) = (width / 2.0, height / 2.0);
    let aspect = height / width;
    let limit = (width * width + height * height).sqrt() / 2.0;

    let mut t: f32 = 0.0;
    loop {
        let r = SPIRAL_GROWTH * t;
        if r > limit {
            return None;
        }
        let candidate = Rect {
            x: (cx + r * t.cos() - w / 2.0).round(),
            y: (cy + r * aspect * t.sin() - h / 2.0).round(),
            width: w,
            height: h,
        };
        if candidate.inside(width, height) && placed.iter().all(|p| !p.bounds.intersects(&candidate)) {
            return Some(candidate);
        }
        t += SPIRAL_STEP;
    }
}

fn measure<F: Font>(font: &F, word: &str, size: f32) -> (f32, f32) {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0;
    let mut previous = None;
    for c in word.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    (width.ceil(), (scaled.ascent() - scaled.descent()).ceil())
}

fn draw_word<F: Font>(canvas: &mut RgbaImage, font: &F, placement: &Placement) {
    let scaled = font.as_scaled(PxScale::from(placement.font_size));
    let origin_x = placement.bounds.x + PADDING / 2.0;
    let baseline = placement.bounds.y + PADDING / 2.0 + scaled.ascent();
    let [r, g, b] = placement.colour;

    let mut caret = origin_x;
    let mut previous = None;
    for c in placement.word.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(placement.font_size, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + gx as i64;
            let py = bounds.min.y as i64 + gy as i64;
            if px < 0 || py < 0 || px >= canvas.width() as i64 || py >= canvas.height() as i64 {
                return;
            }
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            let alpha = coverage.clamp(0.0, 1.0);
            for (channel, ink) in pixel.0.iter_mut().zip([r, g, b]) {
                *channel = (*channel as f32 * (1.0 - alpha) + ink as f32 * alpha).round() as u8;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> StyleOptions {
        StyleOptions {
            background: "white".to_string(),
            width: 400,
            height: 200,
            min_font_size: 10,
            max_font_size: Some(60),
            max_words: 50,
            font_path: PathBuf::from("/nonexistent/font.ttf"),
        }
    }

    /// Monospace stand-in for real glyph metrics.
    fn fake_measure(word: &str, size: f32) -> (f32, f32) {
        (word.chars().count() as f32 * size * 0.6, size)
    }

    fn words(entries: &[(&str, u64)]) -> Vec<(String, u64)> {
        entries.iter().map(|(w, s)| (w.to_string(), *s)).collect()
    }

    #[test]
    fn test_empty_map_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = WordCloudRenderer::new().render(&FrequencyMap::new(), &style(), &dir.path().join("x.png"));
        assert!(matches!(result, Err(RenderError::EmptyFrequencies)));
    }

    #[test]
    fn test_missing_font_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut map = FrequencyMap::new();
        map.insert("ramen".to_string(), 3);
        let result = WordCloudRenderer::new().render(&map, &style(), &dir.path().join("x.png"));
        assert!(matches!(result, Err(RenderError::Font { .. })));
    }

    #[test]
    fn test_bad_style_is_reported_before_font_load() {
        let mut map = FrequencyMap::new();
        map.insert("ramen".to_string(), 3);
        let mut bad = style();
        bad.background = "not-a-colour".to_string();
        let result = WordCloudRenderer::new().render(&map, &bad, Path::new("/tmp/unused.png"));
        assert!(matches!(result, Err(RenderError::Style(_))));
    }

    #[test]
    fn test_parse_colour() {
        assert_eq!(parse_colour("white").unwrap(), [255, 255, 255]);
        assert_eq!(parse_colour(" Black ").unwrap(), [0, 0, 0]);
        assert_eq!(parse_colour("#ff8000").unwrap(), [255, 128, 0]);
        assert_eq!(parse_colour("#0f0").unwrap(), [0, 255, 0]);
        assert!(parse_colour("#12345").is_err());
        assert!(parse_colour("#gggggg").is_err());
        assert!(parse_colour("teal-ish").is_err());
    }

    #[test]
    fn test_ranked_orders_and_truncates() {
        let mut map = FrequencyMap::new();
        map.insert("b".to_string(), 5);
        map.insert("a".to_string(), 5);
        map.insert("c".to_string(), 100);
        map.insert("d".to_string(), 1);
        map.insert(" ".to_string(), 50);

        let ranked = ranked(&map, 3);
        assert_eq!(ranked, words(&[("c", 100), ("a", 5), ("b", 5)]));
    }

    #[test]
    fn test_font_size_scales_with_score() {
        assert_eq!(font_size(100, 100, 10.0, 60.0), 60.0);
        assert_eq!(font_size(0, 100, 10.0, 60.0), 10.0);
        assert_eq!(font_size(50, 100, 10.0, 60.0), 35.0);
        assert_eq!(font_size(5, 0, 10.0, 60.0), 10.0);
    }

    #[test]
    fn test_layout_places_without_overlap() {
        let words = words(&[("おいしい", 300), ("ramen", 20), ("食べる", 10), ("soup", 5), ("noodle", 1)]);
        let placements = layout(&words, &style(), fake_measure);

        assert_eq!(placements.len(), words.len());
        assert_eq!(placements[0].word, "おいしい");
        assert_eq!(placements[0].font_size, 60.0);
        for (i, a) in placements.iter().enumerate() {
            assert!(a.bounds.inside(400.0, 200.0), "{} out of canvas", a.word);
            for b in &placements[i + 1..] {
                assert!(!a.bounds.intersects(&b.bounds), "{} overlaps {}", a.word, b.word);
            }
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let words = words(&[("a", 9), ("bb", 7), ("ccc", 3)]);
        assert_eq!(layout(&words, &style(), fake_measure), layout(&words, &style(), fake_measure));
    }

    #[test]
    fn test_word_too_wide_is_dropped() {
        let words = words(&[("x".repeat(200).as_str(), 10), ("ok", 1)]);
        let placements = layout(&words, &style(), fake_measure);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].word, "ok");
    }
}
