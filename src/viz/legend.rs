//! Legend panel for rendered maps: a title and one swatch per colour band.

use crate::scale::Legend;
use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

// Layout constants (must match legend_panel_width)
const FONT_PX: u32 = 14;
const TITLE_FONT_PX: u32 = 16;
const LINE_H: i32 = FONT_PX as i32 + 6;
const PAD: i32 = 10;
const SWATCH_W: i32 = 18;
const SWATCH_H: i32 = 14;
const SWATCH_TO_TEXT_GAP: i32 = 8;

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Width the right-hand panel needs for `legend`, in pixels.
pub fn legend_panel_width(legend: &Legend) -> u32 {
    let label_w = legend
        .entries
        .iter()
        .map(|e| estimate_text_width_px(&e.label, FONT_PX))
        .max()
        .unwrap_or(0) as i32;
    let title_w = estimate_text_width_px(&legend.title, TITLE_FONT_PX) as i32;
    let row_w = SWATCH_W + SWATCH_TO_TEXT_GAP + label_w;
    (PAD * 2 + row_w.max(title_w)).max(120) as u32
}

/// Draw the legend into `area`. With `text == false` only the swatches are drawn.
pub fn draw_legend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    legend: &Legend,
    text: bool,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let title_style = TextStyle::from((FontFamily::SansSerif, TITLE_FONT_PX))
        .pos(Pos::new(HPos::Left, VPos::Top));
    let label_style =
        TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    let mut y = PAD;
    if text && !legend.title.trim().is_empty() {
        area.draw(&Text::new(legend.title.as_str(), (PAD, y), title_style))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y += TITLE_FONT_PX as i32 + 8;
    }

    let outline = RGBColor(0x99, 0x99, 0x99);
    for entry in &legend.entries {
        let top = y + (LINE_H - SWATCH_H) / 2;
        let corners = [(PAD, top), (PAD + SWATCH_W, top + SWATCH_H)];
        let c = entry.color;
        area.draw(&Rectangle::new(corners, RGBColor(c.r, c.g, c.b).filled()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Rectangle::new(corners, outline.stroke_width(1)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        if text {
            area.draw(&Text::new(
                entry.label.as_str(),
                (PAD + SWATCH_W + SWATCH_TO_TEXT_GAP, y + LINE_H / 2),
                label_style.clone(),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
        y += LINE_H;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_fits_longest_label() {
        let legend = Legend::new("Immunisation coverage by LGA");
        let w = legend_panel_width(&legend) as i32;
        assert!(w >= estimate_text_width_px(&legend.title, TITLE_FONT_PX) as i32 + 2 * PAD);
        assert!(legend_panel_width(&Legend::new("")) >= 120);
    }
}
