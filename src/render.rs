//! Card compositing. A render is planned as an ordered list of draw ops
//! derived from the record and the layout spec, then the ops are
//! rasterized onto a fresh copy of the template canvas. Planning is pure,
//! so each region's output can be checked without touching pixels.

use std::path::Path;

use image::Rgba;
use tracing::debug;

use crate::error::CardError;
use crate::font::FontHandle;
use crate::record::FragranceRecord;
use crate::spec::{hex_color, CardSpec, FontSet, SectionRegion};
use crate::text::{self, Canvas};

const DIVIDER_WIDTH: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Headline,
    Subhead,
    Body,
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Primary,
    Accent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: i32,
        y: i32,
        font: FontRole,
        color: ColorRole,
        text: String,
    },
    Wrapped {
        x: i32,
        y: i32,
        font: FontRole,
        color: ColorRole,
        text: String,
        max_width: f32,
        line_spacing: f32,
    },
    Line {
        from: [i32; 2],
        to: [i32; 2],
        width: u32,
        color: ColorRole,
    },
}

/// The four font roles resolved to usable handles. Resolution never fails,
/// so building the book is infallible.
pub struct FontBook {
    pub headline: FontHandle,
    pub subhead: FontHandle,
    pub body: FontHandle,
    pub small: FontHandle,
}

impl FontBook {
    pub fn resolve(fonts: &FontSet) -> FontBook {
        let load = |spec: &crate::spec::FontSpec| {
            FontHandle::resolve(Some(spec.path.as_str()), spec.size)
        };
        FontBook {
            headline: load(&fonts.headline),
            subhead: load(&fonts.subhead),
            body: load(&fonts.body),
            small: load(&fonts.small),
        }
    }

    fn get(&self, role: FontRole) -> &FontHandle {
        match role {
            FontRole::Headline => &self.headline,
            FontRole::Subhead => &self.subhead,
            FontRole::Body => &self.body,
            FontRole::Small => &self.small,
        }
    }
}

struct Palette {
    primary: Rgba<u8>,
    accent: Rgba<u8>,
}

impl Palette {
    fn get(&self, role: ColorRole) -> Rgba<u8> {
        match role {
            ColorRole::Primary => self.primary,
            ColorRole::Accent => self.accent,
        }
    }
}

/// Python-style title case: uppercase every alphabetic character that
/// follows a non-alphabetic one, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn push_section(ops: &mut Vec<DrawOp>, region: &SectionRegion, header: &str, items: &[String]) {
    ops.push(DrawOp::Text {
        x: region.header_xy[0],
        y: region.header_xy[1],
        font: FontRole::Subhead,
        color: ColorRole::Accent,
        text: header.to_uppercase(),
    });
    for (i, item) in items.iter().enumerate() {
        ops.push(DrawOp::Text {
            x: region.list_xy[0],
            y: region.list_xy[1] + i as i32 * region.items_spacing,
            font: FontRole::Body,
            color: ColorRole::Primary,
            text: title_case(item),
        });
    }
}

/// Build the full draw sequence for one card. Needs the resolved fonts for
/// the title measurement; everything else comes straight from the spec.
pub fn plan_card(record: &FragranceRecord, spec: &CardSpec, fonts: &FontBook) -> Vec<DrawOp> {
    let layout = &spec.layout;
    let mut ops = Vec::new();

    // Title: first accent_words words in the accent color, remainder in
    // primary on the same baseline, one space of separation.
    let title = record.name.to_uppercase();
    let words: Vec<&str> = title.split_whitespace().collect();
    let n = layout.title.accent_words.min(words.len());
    let accent = words[..n].join(" ");
    let rest = words[n..].join(" ");
    let [tx, ty] = layout.title.xy;
    ops.push(DrawOp::Text {
        x: tx,
        y: ty,
        font: FontRole::Headline,
        color: ColorRole::Accent,
        text: accent.clone(),
    });
    if !rest.is_empty() {
        let offset = fonts.headline.measure(&format!("{accent} ")).round() as i32;
        ops.push(DrawOp::Text {
            x: tx + offset,
            y: ty,
            font: FontRole::Headline,
            color: ColorRole::Primary,
            text: rest,
        });
    }

    // Longevity / projection header + value pairs.
    for (header, value_xy, value) in [
        (&layout.longevity_header, layout.longevity_value.xy, &record.longevity),
        (&layout.projection_header, layout.projection_value.xy, &record.projection),
    ] {
        ops.push(DrawOp::Text {
            x: header.xy[0],
            y: header.xy[1],
            font: FontRole::Subhead,
            color: ColorRole::Accent,
            text: header.text.clone(),
        });
        ops.push(DrawOp::Text {
            x: value_xy[0],
            y: value_xy[1],
            font: FontRole::Headline,
            color: ColorRole::Primary,
            text: value.clone(),
        });
    }

    ops.push(DrawOp::Line {
        from: layout.divider.xy,
        to: layout.divider.to,
        width: DIVIDER_WIDTH,
        color: ColorRole::Primary,
    });

    ops.push(DrawOp::Wrapped {
        x: layout.description.xy[0],
        y: layout.description.xy[1],
        font: FontRole::Body,
        color: ColorRole::Primary,
        text: record.description.clone(),
        max_width: layout.description.max_width,
        line_spacing: layout.description.line_spacing,
    });

    for (region, value) in [(&layout.year, &record.year), (&layout.rating, &record.rating)] {
        ops.push(DrawOp::Text {
            x: region.xy[0],
            y: region.xy[1],
            font: FontRole::Small,
            color: ColorRole::Primary,
            text: format!("{}{}", region.label, value),
        });
    }

    // List sections, fixed order.
    let rc = &layout.right_col;
    let sections: [(&SectionRegion, &str, &[String]); 4] = [
        (&rc.when, "WHEN", &record.when),
        (&rc.where_, "WHERE", &record.where_),
        (&rc.profile, "PROFILE", &record.profile),
        (&rc.notes, "NOTES", &record.notes),
    ];
    for (region, header, items) in sections {
        push_section(&mut ops, region, header, items);
    }

    ops
}

fn rasterize(canvas: &mut Canvas, ops: &[DrawOp], fonts: &FontBook, palette: &Palette) {
    for op in ops {
        match op {
            DrawOp::Text { x, y, font, color, text } => {
                text::draw_text(canvas, fonts.get(*font), *x, *y, palette.get(*color), text);
            }
            DrawOp::Wrapped { x, y, font, color, text, max_width, line_spacing } => {
                let handle = fonts.get(*font);
                let wrapped = text::wrap_to_width(text, handle, *y, *max_width, *line_spacing);
                for line in &wrapped.lines {
                    text::draw_text(canvas, handle, *x, line.y, palette.get(*color), &line.text);
                }
            }
            DrawOp::Line { from, to, width, color } => {
                text::draw_line_segment(canvas, *from, *to, *width, palette.get(*color));
            }
        }
    }
}

/// Render one card: open a fresh copy of the template, plan the draw
/// sequence, rasterize. The spec is shared read-only; only the canvas is
/// per-call state.
pub fn render_card(record: &FragranceRecord, spec: &CardSpec) -> Result<Canvas, CardError> {
    let template = spec.template_path();
    let mut canvas = image::open(&template)
        .map_err(|e| CardError::Asset(format!("failed to open template {}: {e}", template.display())))?
        .to_rgba8();

    let fonts = FontBook::resolve(&spec.fonts);
    let palette = Palette {
        primary: hex_color(&spec.colors.primary)?,
        accent: hex_color(&spec.colors.accent)?,
    };

    let ops = plan_card(record, spec, &fonts);
    debug!("rendering {:?}: {} draw ops", record.name, ops.len());
    rasterize(&mut canvas, &ops, &fonts, &palette);
    Ok(canvas)
}

/// Write a rendered card, creating the output directory if needed. The
/// image format follows the path extension.
pub fn save_card(img: &Canvas, out_path: &Path) -> Result<(), CardError> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    img.save(out_path).map_err(|e| match e {
        image::ImageError::IoError(io) => CardError::Io(io),
        other => CardError::Io(std::io::Error::other(other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;

    fn spec() -> CardSpec {
        let json = r##"{
            "canvas": { "template_path": "template.png" },
            "colors": { "primary": "#101010", "accent": "#7a4fd0" },
            "fonts": {
                "headline": { "path": "", "size": 32 },
                "subhead":  { "path": "", "size": 16 },
                "body":     { "path": "", "size": 14 },
                "small":    { "path": "", "size": 12 }
            },
            "layout": {
                "title": { "xy": [40, 36], "accent_words": 1 },
                "longevity_header": { "xy": [40, 140], "text": "LONGEVITY" },
                "longevity_value": { "xy": [40, 170] },
                "projection_header": { "xy": [240, 140], "text": "PROJECTION" },
                "projection_value": { "xy": [240, 170] },
                "divider": { "xy": [40, 250], "to": [700, 250] },
                "description": { "xy": [40, 280], "max_width": 380 },
                "year": { "xy": [40, 640], "label": "YEAR: " },
                "rating": { "xy": [240, 640], "label": "RATING: " },
                "right_col": {
                    "when":    { "header_xy": [480, 280], "list_xy": [480, 310], "items_spacing": 26 },
                    "where":   { "header_xy": [480, 400], "list_xy": [480, 430], "items_spacing": 26 },
                    "profile": { "header_xy": [480, 520], "list_xy": [480, 550], "items_spacing": 26 },
                    "notes":   { "header_xy": [600, 280], "list_xy": [600, 310], "items_spacing": 26 }
                }
            }
        }"##;
        serde_json::from_str(json).unwrap()
    }

    fn record() -> FragranceRecord {
        RawRecord {
            name: "Noir Extreme".to_string(),
            notes: "oud wood;amber".to_string(),
            year: "2023".to_string(),
            ..RawRecord::default()
        }
        .normalize()
        .unwrap()
    }

    fn texts_of(ops: &[DrawOp]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn title_splits_into_accent_and_rest() {
        let spec = spec();
        let fonts = FontBook::resolve(&spec.fonts);
        let ops = plan_card(&record(), &spec, &fonts);

        let (accent, rest) = match &ops[..2] {
            [DrawOp::Text { text: a, color: ColorRole::Accent, font: FontRole::Headline, x: ax, .. },
             DrawOp::Text { text: r, color: ColorRole::Primary, font: FontRole::Headline, x: rx, .. }] => {
                assert!(rx > ax);
                (a.clone(), r.clone())
            }
            other => panic!("unexpected title ops: {other:?}"),
        };
        assert_eq!(accent, "NOIR");
        assert_eq!(rest, "EXTREME");
    }

    #[test]
    fn single_word_title_has_no_rest_op() {
        let spec = spec();
        let fonts = FontBook::resolve(&spec.fonts);
        let rec = RawRecord { name: "Herod".to_string(), ..RawRecord::default() }
            .normalize()
            .unwrap();
        let ops = plan_card(&rec, &spec, &fonts);
        assert!(matches!(&ops[0], DrawOp::Text { text, .. } if text == "HEROD"));
        // second op is already the longevity header, not a title remainder
        assert!(matches!(&ops[1], DrawOp::Text { text, .. } if text == "LONGEVITY"));
    }

    #[test]
    fn sections_fan_out_in_fixed_order_with_title_cased_items() {
        let spec = spec();
        let fonts = FontBook::resolve(&spec.fonts);
        let ops = plan_card(&record(), &spec, &fonts);
        let texts = texts_of(&ops);

        let when = texts.iter().position(|t| t == "WHEN").unwrap();
        let where_ = texts.iter().position(|t| t == "WHERE").unwrap();
        let profile = texts.iter().position(|t| t == "PROFILE").unwrap();
        let notes = texts.iter().position(|t| t == "NOTES").unwrap();
        assert!(when < where_ && where_ < profile && profile < notes);

        // defaults for the empty cells, title-cased custom notes
        assert!(texts.contains(&"Fall".to_string()));
        assert!(texts.contains(&"Casual".to_string()));
        assert!(texts.contains(&"Woody".to_string()));
        assert!(texts.contains(&"Oud Wood".to_string()));
        assert!(texts.contains(&"Amber".to_string()));
    }

    #[test]
    fn section_items_step_by_items_spacing() {
        let spec = spec();
        let fonts = FontBook::resolve(&spec.fonts);
        let ops = plan_card(&record(), &spec, &fonts);

        let ys: Vec<i32> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, y, .. } if text == "Oud Wood" || text == "Amber" => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![310, 336]);
    }

    #[test]
    fn labels_prefix_record_values() {
        let spec = spec();
        let fonts = FontBook::resolve(&spec.fonts);
        let texts = texts_of(&plan_card(&record(), &spec, &fonts));
        assert!(texts.contains(&"YEAR: 2023".to_string()));
        assert!(texts.contains(&"RATING: ".to_string()));
    }

    #[test]
    fn description_op_carries_wrap_parameters() {
        let spec = spec();
        let fonts = FontBook::resolve(&spec.fonts);
        let ops = plan_card(&record(), &spec, &fonts);
        let wrapped = ops.iter().find_map(|op| match op {
            DrawOp::Wrapped { max_width, line_spacing, .. } => Some((*max_width, *line_spacing)),
            _ => None,
        });
        assert_eq!(wrapped, Some((380.0, 6.0)));
    }

    #[test]
    fn divider_uses_spec_endpoints() {
        let spec = spec();
        let fonts = FontBook::resolve(&spec.fonts);
        let ops = plan_card(&record(), &spec, &fonts);
        assert!(ops.contains(&DrawOp::Line {
            from: [40, 250],
            to: [700, 250],
            width: 2,
            color: ColorRole::Primary,
        }));
    }

    #[test]
    fn title_case_matches_per_word_capitalization() {
        assert_eq!(title_case("atlas cedar"), "Atlas Cedar");
        assert_eq!(title_case("OUD"), "Oud");
        assert_eq!(title_case("night outs"), "Night Outs");
    }
}
