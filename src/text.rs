//! Greedy word wrap and the glyph-level drawing primitives used by the
//! compositor.

use image::{ImageBuffer, Rgba};
use rusttype::{point, Scale};

use crate::font::{FontHandle, BUILTIN_PX};

pub type Canvas = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// One wrapped line, positioned at `y` (top of the line box).
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wrapped {
    pub lines: Vec<Line>,
    /// y of the last emitted line, so callers can stack content below.
    pub end_y: i32,
}

/// Wrap `text` to `max_width` pixels starting at `start_y`, advancing
/// `font.size() + line_spacing` per line break. Greedy: a word moves to the
/// next line as soon as the candidate line stops fitting. A single word
/// wider than `max_width` is emitted unbroken (accepted overflow).
pub fn wrap_to_width(
    text: &str,
    font: &FontHandle,
    start_y: i32,
    max_width: f32,
    line_spacing: f32,
) -> Wrapped {
    let mut lines = Vec::new();
    let mut y = start_y as f32;
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if font.measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(Line { text: std::mem::take(&mut line), y: y.round() as i32 });
            y += font.size() + line_spacing;
            line = word.to_string();
        }
    }
    if !line.is_empty() {
        lines.push(Line { text: line, y: y.round() as i32 });
    }

    Wrapped { lines, end_y: y.round() as i32 }
}

fn blend_pixel(img: &mut Canvas, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= img.width() || y >= img.height() {
        return;
    }
    let a = (coverage * 255.0) as u8;
    if a == 0 {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    let sa = a as f32 / 255.0;
    let inv = 1.0 - sa;
    dst.0[0] = (color.0[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
    dst.0[1] = (color.0[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
    dst.0[2] = (color.0[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
    dst.0[3] = 255;
}

/// Draw a single line of text with its top-left corner at (x, y).
pub fn draw_text(img: &mut Canvas, font: &FontHandle, x: i32, y: i32, color: Rgba<u8>, text: &str) {
    match font {
        FontHandle::Truetype { font, size } => {
            let scale = Scale::uniform(*size);
            let v_metrics = font.v_metrics(scale);
            let mut caret_x = x as f32;
            let baseline_y = y as f32 + v_metrics.ascent;

            for ch in text.chars() {
                let glyph = font.glyph(ch).scaled(scale).positioned(point(caret_x, baseline_y));
                if let Some(bb) = glyph.pixel_bounding_box() {
                    glyph.draw(|gx, gy, v| {
                        blend_pixel(img, gx as i32 + bb.min.x, gy as i32 + bb.min.y, color, v);
                    });
                }
                caret_x += glyph.unpositioned().h_metrics().advance_width;
            }
        }
        FontHandle::Builtin => {
            let cell = BUILTIN_PX as i32;
            for (i, ch) in text.chars().enumerate() {
                let cx = x + i as i32 * cell;
                let idx = ch as usize;
                if idx >= 128 {
                    continue; // unknown glyph, advance only
                }
                let glyph = font8x8::legacy::BASIC_LEGACY[idx];
                for (row, bits) in glyph.iter().enumerate() {
                    for col in 0..8 {
                        if bits >> col & 1 != 0 {
                            blend_pixel(img, cx + col, y + row as i32, color, 1.0);
                        }
                    }
                }
            }
        }
    }
}

/// Straight stroke between two endpoints, `width` pixels thick.
pub fn draw_line_segment(img: &mut Canvas, from: [i32; 2], to: [i32; 2], width: u32, color: Rgba<u8>) {
    let dx = (to[0] - from[0]) as f32;
    let dy = (to[1] - from[1]) as f32;
    let steps = dx.abs().max(dy.abs()).max(1.0) as i32;
    let half = width as i32 / 2;

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let px = (from[0] as f32 + dx * t).round() as i32;
        let py = (from[1] as f32 + dy * t).round() as i32;
        for oy in 0..width as i32 {
            for ox in 0..width as i32 {
                blend_pixel(img, px + ox - half, py + oy - half, color, 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn blank(w: u32, h: u32) -> Canvas {
        ImageBuffer::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn wraps_at_measured_width() {
        let font = FontHandle::Builtin;
        let max = font.measure("one two"); // 56px
        let wrapped = wrap_to_width("one two three", &font, 0, max, 6.0);
        let texts: Vec<&str> = wrapped.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one two", "three"]);
        assert_eq!(wrapped.lines[0].y, 0);
        assert_eq!(wrapped.lines[1].y, 14); // 8px font + 6px spacing
        assert_eq!(wrapped.end_y, 14);
    }

    #[test]
    fn no_line_exceeds_max_width_except_overlong_words() {
        let font = FontHandle::Builtin;
        let max = 80.0;
        let wrapped = wrap_to_width(
            "a few short words and one extraordinarily oversized token here",
            &font,
            0,
            max,
            4.0,
        );
        for line in &wrapped.lines {
            let fits = font.measure(&line.text) <= max;
            let single_overlong = !line.text.contains(' ') && font.measure(&line.text) > max;
            assert!(fits || single_overlong, "bad line: {:?}", line.text);
        }
    }

    #[test]
    fn overlong_word_is_kept_unbroken() {
        let font = FontHandle::Builtin;
        let wrapped = wrap_to_width("extraordinarily big", &font, 0, 40.0, 2.0);
        assert!(wrapped
            .lines
            .iter()
            .any(|l| l.text == "extraordinarily"));
    }

    #[test]
    fn empty_text_yields_no_lines() {
        let font = FontHandle::Builtin;
        let wrapped = wrap_to_width("   ", &font, 30, 100.0, 6.0);
        assert!(wrapped.lines.is_empty());
        assert_eq!(wrapped.end_y, 30);
    }

    #[test]
    fn builtin_glyphs_hit_the_canvas() {
        let mut img = blank(32, 16);
        draw_text(&mut img, &FontHandle::Builtin, 0, 0, RED, "A");
        let touched = img.pixels().filter(|p| p.0 == [255, 0, 0, 255]).count();
        assert!(touched > 0);
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut img = blank(8, 8);
        draw_text(&mut img, &FontHandle::Builtin, -20, -20, RED, "XYZ");
        draw_text(&mut img, &FontHandle::Builtin, 100, 100, RED, "XYZ");
    }

    #[test]
    fn line_segment_covers_endpoints() {
        let mut img = blank(20, 20);
        draw_line_segment(&mut img, [2, 10], [17, 10], 2, RED);
        assert_eq!(img.get_pixel(2, 10).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(17, 10).0, [255, 0, 0, 255]);
        // untouched far corner
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
