//! PNG rendering at a fixed resolution.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::font::{self, ADVANCE, GLYPH_HEIGHT};
use crate::{ChartData, ChartError};

/// Image width in pixels.
pub const WIDTH: u32 = 1920;
/// Image height in pixels.
pub const HEIGHT: u32 = 1440;

const BACKGROUND: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
const BAR: Rgb<u8> = Rgb([0x6D, 0xC2, 0x96]);
const TEXT: Rgb<u8> = Rgb([0x38, 0x38, 0x38]);
const AXIS: Rgb<u8> = Rgb([0x38, 0x38, 0x38]);
const GRID: Rgb<u8> = Rgb([0xE0, 0xE0, 0xE0]);

const MARGIN_LEFT: u32 = 200;
const MARGIN_RIGHT: u32 = 80;
const MARGIN_TOP: u32 = 200;
const MARGIN_BOTTOM: u32 = 180;

const TITLE_SCALE: u32 = 6;
const LABEL_SCALE: u32 = 4;
const TICK_SCALE: u32 = 3;
const TICKS: u32 = 5;

/// Plot area: left, top, right, bottom.
const PLOT: (u32, u32, u32, u32) = (
    MARGIN_LEFT,
    MARGIN_TOP,
    WIDTH - MARGIN_RIGHT,
    HEIGHT - MARGIN_BOTTOM,
);

/// Upper bound of the value axis: the largest value rounded up to a
/// multiple of ten, at least ten.
#[must_use]
pub fn axis_max(max_value: f64) -> f64 {
    ((max_value / 10.0).ceil() * 10.0).max(10.0)
}

/// Horizontal extent (left, right) of bar `index` out of `count`.
#[must_use]
pub const fn bar_span(index: u32, count: u32) -> (u32, u32) {
    let (left, _, right, _) = PLOT;
    let slot = (right - left) / count;
    let pad = slot / 5;
    let start = left + index * slot + pad;
    (start, start + slot - 2 * pad)
}

/// Top edge of a bar of `value` on an axis ending at `max`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn bar_top(value: f64, max: f64) -> u32 {
    let (_, top, _, bottom) = PLOT;
    let height = f64::from(bottom - top);
    let filled = (value.clamp(0.0, max) / max * height).round() as u32;
    bottom - filled
}

/// Renders the chart into an image.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn render(data: &ChartData) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let (left, top, right, bottom) = PLOT;
    let max = axis_max(data.max_value());

    for tick in 0..=TICKS {
        let value = max * f64::from(tick) / f64::from(TICKS);
        let y = bar_top(value, max);
        fill_rect(&mut img, left, y, right, y + 2, if tick == 0 { AXIS } else { GRID });

        let label = format!("{value:.0}");
        let x = left.saturating_sub(font::text_width(&label, TICK_SCALE) + 20);
        let label_y = y.saturating_sub(GLYPH_HEIGHT * TICK_SCALE / 2);
        draw_text(&mut img, &label, x, label_y, TICK_SCALE, TEXT);
    }
    fill_rect(&mut img, left, top, left + 3, bottom + 2, AXIS);

    let count = data.bars.len() as u32;
    for (i, (category, value)) in data.bars.iter().enumerate() {
        let (x0, x1) = bar_span(i as u32, count);
        let y = bar_top(*value, max);
        fill_rect(&mut img, x0, y, x1, bottom, BAR);

        let center = x0 + (x1 - x0) / 2;
        draw_centered(&mut img, category.chart_label(), center, bottom + 40, LABEL_SCALE);
        draw_centered(
            &mut img,
            &format!("{value:.1}%"),
            center,
            y.saturating_sub(GLYPH_HEIGHT * TICK_SCALE + 20),
            TICK_SCALE,
        );
    }

    draw_centered(&mut img, &data.title(), WIDTH / 2, MARGIN_TOP / 3, TITLE_SCALE);

    img
}

/// Renders the chart and writes it as PNG to `path`.
///
/// # Errors
///
/// Returns [`ChartError::Image`] if encoding or writing fails.
pub fn save_png(data: &ChartData, path: &Path) -> Result<(), ChartError> {
    render(data).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..y1.min(HEIGHT) {
        for x in x0..x1.min(WIDTH) {
            img.put_pixel(x, y, color);
        }
    }
}

fn draw_centered(img: &mut RgbImage, text: &str, center_x: u32, y: u32, scale: u32) {
    let x = center_x.saturating_sub(font::text_width(text, scale) / 2);
    draw_text(img, text, x, y, scale, TEXT);
}

fn draw_text(img: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let mut cursor = x;
    for c in text.chars() {
        for row in 0..GLYPH_HEIGHT {
            for col in 0..font::GLYPH_WIDTH {
                if font::pixel(c, col, row) {
                    let px = cursor + col * scale;
                    let py = y + row * scale;
                    fill_rect(img, px, py, px + scale, py + scale, color);
                }
            }
        }
        cursor += ADVANCE * scale;
    }
}
