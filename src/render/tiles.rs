//! Person card painting.
//!
//! One card per scene object, billboarded at its projected screen position
//! and scaled by perspective. The net-worth band drives the card tint and
//! the fill bar along the bottom edge.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Rounding, Stroke, Vec2};

use crate::data::Person;

/// Card footprint in world units (scaled by perspective at draw time).
pub const TILE_WORLD_WIDTH: f32 = 150.0;
pub const TILE_WORLD_HEIGHT: f32 = 190.0;

/// Worth bar saturates at this value.
const WORTH_FILL_MAX: f64 = 300_000.0;

/// Net-worth color band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorthBand {
    Green,
    Orange,
    Red,
}

pub fn worth_band(net_worth: f64) -> WorthBand {
    if net_worth >= 200_000.0 {
        WorthBand::Green
    } else if net_worth >= 100_000.0 {
        WorthBand::Orange
    } else {
        WorthBand::Red
    }
}

impl WorthBand {
    /// Translucent card background tint.
    pub fn tile_fill(self) -> Color32 {
        match self {
            WorthBand::Green => Color32::from_rgba_unmultiplied(35, 200, 120, 71),
            WorthBand::Orange => Color32::from_rgba_unmultiplied(255, 150, 60, 71),
            WorthBand::Red => Color32::from_rgba_unmultiplied(230, 45, 70, 71),
        }
    }

    /// Near-opaque fill for the worth bar.
    pub fn bar_fill(self) -> Color32 {
        match self {
            WorthBand::Green => Color32::from_rgba_unmultiplied(35, 200, 120, 230),
            WorthBand::Orange => Color32::from_rgba_unmultiplied(255, 150, 60, 235),
            WorthBand::Red => Color32::from_rgba_unmultiplied(230, 45, 70, 230),
        }
    }
}

/// Worth-bar fill as a fraction of the bar width: 15% floor plus up to 85%
/// proportional to net worth, saturating at 300k.
pub fn worth_fill_fraction(net_worth: f64) -> f32 {
    let v = (net_worth / WORTH_FILL_MAX).clamp(0.0, 1.0);
    (0.15 + v * 0.85) as f32
}

/// The three-letter country badge, e.g. "UK" -> "UK", "Japan" -> "JAP".
pub fn country_badge(country: &str) -> String {
    let trimmed = country.trim();
    if trimmed.is_empty() {
        return "N/A".to_string();
    }
    trimmed.chars().take(3).collect::<String>().to_uppercase()
}

pub fn age_badge(age: &str) -> String {
    let trimmed = age.trim();
    if trimmed.is_empty() {
        "Age N/A".to_string()
    } else {
        format!("Age {}", trimmed)
    }
}

/// Paint one card into `rect`.
///
/// `brightness` in [0, 1] dims cards angled away from the camera; `photo` is
/// the pre-uploaded texture for the person's photo URL, if loaded yet.
pub fn draw_tile(
    painter: &egui::Painter,
    rect: Rect,
    person: &Person,
    photo: Option<&egui::TextureHandle>,
    brightness: f32,
) {
    let band = worth_band(person.net_worth);
    let rounding = Rounding::same(rect.width() * 0.04);

    painter.rect_filled(rect, rounding, band.tile_fill().gamma_multiply(brightness));
    painter.rect_stroke(
        rect,
        rounding,
        Stroke::new(1.0, Color32::from_white_alpha(40).gamma_multiply(brightness)),
    );

    let small = FontId::proportional((rect.height() * 0.055).max(7.0));
    let name_font = FontId::proportional((rect.height() * 0.08).max(9.0));
    let text = Color32::WHITE.gamma_multiply(brightness);
    let dim_text = Color32::from_gray(200).gamma_multiply(brightness);
    let pad = rect.width() * 0.06;

    // Header badges: country left, age right.
    painter.text(
        rect.left_top() + Vec2::splat(pad),
        Align2::LEFT_TOP,
        country_badge(&person.country),
        small.clone(),
        text,
    );
    painter.text(
        Pos2::new(rect.right() - pad, rect.top() + pad),
        Align2::RIGHT_TOP,
        age_badge(&person.age),
        small.clone(),
        text,
    );

    // Photo block under the header.
    let photo_rect = Rect::from_min_max(
        Pos2::new(rect.left() + pad, rect.top() + rect.height() * 0.14),
        Pos2::new(rect.right() - pad, rect.top() + rect.height() * 0.58),
    );
    match photo {
        Some(texture) => {
            painter.image(
                texture.id(),
                photo_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE.gamma_multiply(brightness),
            );
        }
        None => {
            painter.rect_filled(
                photo_rect,
                rounding,
                Color32::from_black_alpha(60).gamma_multiply(brightness),
            );
        }
    }

    // Name and meta.
    let name = if person.name.is_empty() { "Unknown" } else { &person.name };
    painter.text(
        Pos2::new(rect.center().x, rect.top() + rect.height() * 0.64),
        Align2::CENTER_TOP,
        name,
        name_font,
        text,
    );
    let interest = if person.interest.is_empty() { "—" } else { &person.interest };
    painter.text(
        Pos2::new(rect.center().x, rect.top() + rect.height() * 0.74),
        Align2::CENTER_TOP,
        interest,
        small.clone(),
        dim_text,
    );
    let worth = if person.net_worth_raw.is_empty() { "—" } else { &person.net_worth_raw };
    painter.text(
        Pos2::new(rect.center().x, rect.top() + rect.height() * 0.82),
        Align2::CENTER_TOP,
        worth,
        small,
        dim_text,
    );

    // Worth bar along the bottom edge.
    let bar_height = rect.height() * 0.045;
    let bar = Rect::from_min_max(
        Pos2::new(rect.left() + pad, rect.bottom() - pad - bar_height),
        Pos2::new(rect.right() - pad, rect.bottom() - pad),
    );
    painter.rect_filled(
        bar,
        Rounding::same(bar_height / 2.0),
        Color32::from_black_alpha(80).gamma_multiply(brightness),
    );
    let fill = Rect::from_min_size(
        bar.min,
        Vec2::new(bar.width() * worth_fill_fraction(person.net_worth), bar.height()),
    );
    painter.rect_filled(
        fill,
        Rounding::same(bar_height / 2.0),
        band.bar_fill().gamma_multiply(brightness),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_thresholds() {
        assert_eq!(worth_band(250_000.0), WorthBand::Green);
        assert_eq!(worth_band(200_000.0), WorthBand::Green);
        assert_eq!(worth_band(150_000.0), WorthBand::Orange);
        assert_eq!(worth_band(100_000.0), WorthBand::Orange);
        assert_eq!(worth_band(99_999.0), WorthBand::Red);
        assert_eq!(worth_band(0.0), WorthBand::Red);
    }

    #[test]
    fn fill_has_a_floor_and_a_ceiling() {
        assert!((worth_fill_fraction(0.0) - 0.15).abs() < 1e-6);
        assert!((worth_fill_fraction(300_000.0) - 1.0).abs() < 1e-6);
        assert!((worth_fill_fraction(1e9) - 1.0).abs() < 1e-6);
        let mid = worth_fill_fraction(150_000.0);
        assert!(mid > 0.15 && mid < 1.0);
    }

    #[test]
    fn badges_degrade_gracefully() {
        assert_eq!(country_badge("Japan"), "JAP");
        assert_eq!(country_badge("uk"), "UK");
        assert_eq!(country_badge("  "), "N/A");
        assert_eq!(age_badge("36"), "Age 36");
        assert_eq!(age_badge(""), "Age N/A");
    }
}
