//! Text layout for billboards.
//!
//! Wrapping is a greedy character-count fitter, not typography. Sizes are
//! derived from the speed at spawn time: slow fields get large, legible
//! billboards and fast fields get small ones.

use procgen::Variant;
use renderer::{SurfaceDesc, TextBlock, TEAL};

/// Elastic billboards wrap at this many characters per line.
pub const WRAP_CHARS: usize = 50;

const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// Elastic metrics, before speed scaling.
const ELASTIC_FONT_PX: f32 = 42.0;
const ELASTIC_LINE_PX: f32 = 60.0;
const ELASTIC_PADDING_PX: f32 = 40.0;
const ELASTIC_CHAR_PX: f32 = 20.0;
const ELASTIC_MIN_CANVAS_W: u32 = 1024;
const ELASTIC_WIDTH: f32 = 24.0;

// Classic metrics.
const CLASSIC_CANVAS_W: u32 = 2048;
const CLASSIC_CANVAS_H: u32 = 768;
const CLASSIC_MARGIN_PX: f32 = 100.0;
const CLASSIC_FONT_PX: f32 = 120.0;
/// Rough bold-sans advance per glyph as a share of the font size.
const CLASSIC_GLYPH_RATIO: f32 = 0.6;
const CLASSIC_WIDTH: f32 = 20.0;
const CLASSIC_HEIGHT: f32 = 7.5;

/// Split `text` into lines of at most `max_chars` characters, breaking on spaces.
///
/// A single word longer than the limit gets a line of its own.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Inverse-speed scale for elastic billboards, 2.0 when crawling down to 0.6 when racing.
pub fn speed_scale(speed: f32) -> f32 {
    (1.0 / speed.max(1.0e-3).sqrt()).clamp(0.6, 2.0)
}

/// Build the surface description for a prompt at the given speed.
pub fn layout_text(text: &str, speed: f32, variant: Variant) -> SurfaceDesc {
    match variant {
        Variant::Elastic => elastic(text, speed),
        Variant::Classic => classic(text, speed),
    }
}

fn elastic(text: &str, speed: f32) -> SurfaceDesc {
    let scale = speed_scale(speed);
    let lines = wrap_words(text, WRAP_CHARS);
    let line_count = lines.len().max(1) as u32;
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let font_px = (ELASTIC_FONT_PX * scale).floor() as u32;
    let line_height_px = (ELASTIC_LINE_PX * scale).floor() as u32;
    let padding_px = (ELASTIC_PADDING_PX * scale).floor() as u32;
    let canvas_width = ((longest as f32 * ELASTIC_CHAR_PX * scale).floor() as u32).max(ELASTIC_MIN_CANVAS_W);
    let canvas_height = line_count * line_height_px + padding_px * 2;

    let width = ELASTIC_WIDTH * scale;
    let height = canvas_height as f32 / canvas_width as f32 * width;

    SurfaceDesc {
        width,
        height,
        canvas_width,
        canvas_height,
        background: BLACK,
        text: TextBlock {
            lines,
            font_px,
            line_height_px,
            padding_px,
            color: TEAL,
        },
    }
}

fn classic(text: &str, speed: f32) -> SurfaceDesc {
    let font = (CLASSIC_FONT_PX / speed.max(0.5)).floor();
    let usable = CLASSIC_CANVAS_W as f32 - CLASSIC_MARGIN_PX;
    let chars_per_line = ((usable / (font * CLASSIC_GLYPH_RATIO)).floor() as usize).max(1);
    let lines = wrap_words(text, chars_per_line);

    let line_height = font * 1.2;
    let block = lines.len() as f32 * line_height;
    let padding_px = ((CLASSIC_CANVAS_H as f32 - block) / 2.0).max(0.0).floor() as u32;

    let size = 1.0 / speed.max(0.3);
    SurfaceDesc {
        width: CLASSIC_WIDTH * size,
        height: CLASSIC_HEIGHT * size,
        canvas_width: CLASSIC_CANVAS_W,
        canvas_height: CLASSIC_CANVAS_H,
        background: BLACK,
        text: TextBlock {
            lines,
            font_px: font as u32,
            line_height_px: line_height.floor() as u32,
            padding_px,
            color: WHITE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_greedily_at_limit() {
        let lines = wrap_words("aaaa bbbb cccc dd", 9);
        assert_eq!(lines, ["aaaa bbbb", "cccc dd"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn long_word_gets_own_line() {
        let lines = wrap_words("hi supercalifragilistic yo", 5);
        assert_eq!(lines, ["hi", "supercalifragilistic", "yo"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_words("", 50).is_empty());
        assert!(wrap_words("   ", 50).is_empty());
    }

    #[test]
    fn speed_scale_bounds() {
        assert_eq!(speed_scale(1.0), 1.0);
        assert_eq!(speed_scale(0.1), 2.0);
        assert_eq!(speed_scale(5.0), 0.6);
        assert_eq!(speed_scale(0.0), 2.0);
        assert!((speed_scale(2.0) - 1.0 / 2.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn elastic_metrics_at_unit_speed() {
        let text = "a gladiator ambushing in an enchanted forest, final fantasy style, foggy atmosphere";
        let desc = layout_text(text, 1.0, Variant::Elastic);
        assert_eq!(desc.text.lines.len(), 2);
        assert_eq!(desc.text.font_px, 42);
        assert_eq!(desc.text.line_height_px, 60);
        assert_eq!(desc.text.padding_px, 40);
        assert_eq!(desc.canvas_width, 1024);
        assert_eq!(desc.canvas_height, 2 * 60 + 80);
        assert_eq!(desc.width, 24.0);
        assert!((desc.height - 200.0 / 1024.0 * 24.0).abs() < 1e-5);
    }

    #[test]
    fn elastic_is_larger_when_slow() {
        let text = "a wolf in the void";
        let slow = layout_text(text, 0.2, Variant::Elastic);
        let fast = layout_text(text, 4.0, Variant::Elastic);
        assert!(slow.width > fast.width);
        assert!(slow.text.font_px > fast.text.font_px);
    }

    #[test]
    fn elastic_canvas_grows_with_long_lines() {
        let word = "x".repeat(80);
        let desc = layout_text(&word, 1.0, Variant::Elastic);
        assert_eq!(desc.canvas_width, 1600);
    }

    #[test]
    fn classic_metrics() {
        let desc = layout_text("a golem hovering over a crystal cave", 1.0, Variant::Classic);
        assert_eq!((desc.canvas_width, desc.canvas_height), (2048, 768));
        assert_eq!(desc.text.font_px, 120);
        assert_eq!((desc.width, desc.height), (20.0, 7.5));
        assert_eq!(desc.text.lines.len(), 2);

        let slow = layout_text("x", 0.1, Variant::Classic);
        assert_eq!(slow.text.font_px, 240);
        assert!((slow.width - 20.0 / 0.3).abs() < 1e-4);
    }
}
