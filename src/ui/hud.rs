//! HUD drawing helpers
//!
//! Immediate-mode: nothing is retained, demos call these from `draw` every
//! frame. The color picking is split out so it can be tested without a
//! window.

use macroquad::prelude::*;

use super::theme::*;

/// Health segment color for a fill fraction.
/// Above 75% green, above 50% yellow, above 25% orange, otherwise red.
pub fn health_color(fraction: f32) -> Color {
    if fraction > 0.75 {
        HEALTH_HIGH
    } else if fraction > 0.5 {
        HEALTH_MID
    } else if fraction > 0.25 {
        HEALTH_LOW
    } else {
        HEALTH_CRITICAL
    }
}

/// One box per hit point; filled boxes take the color of the current fill
pub fn draw_health_bar(x: f32, y: f32, width: f32, height: f32, current: i32, max: i32) {
    let max = max.max(1);
    let gap = 2.0;
    let segment_w = ((width - gap * (max - 1) as f32) / max as f32).max(1.0);
    let color = health_color(current as f32 / max as f32);

    draw_rectangle(x - 2.0, y - 2.0, width + 4.0, height + 4.0, PANEL_BG);
    for i in 0..max {
        let sx = x + i as f32 * (segment_w + gap);
        let fill = if i < current { color } else { HEALTH_EMPTY };
        draw_rectangle(sx, y, segment_w, height, fill);
    }
}

/// Horizontal bar that fills as a cooldown recovers.
/// `fraction_remaining` is 1.0 right after use and 0.0 when ready.
pub fn draw_cooldown_bar(x: f32, y: f32, width: f32, height: f32, fraction_remaining: f32) {
    let ready = fraction_remaining <= 0.0;
    let filled = 1.0 - fraction_remaining.clamp(0.0, 1.0);
    draw_rectangle(x, y, width, height, HEALTH_EMPTY);
    let color = if ready { READY_COLOR } else { COOLDOWN_COLOR };
    draw_rectangle(x, y, width * filled, height, color);
    draw_rectangle_lines(x, y, width, height, 1.0, TEXT_DIM);
}

/// Dark overlay covering the top `fraction_remaining` of a button; it
/// shrinks linearly towards zero as the cooldown runs out
pub fn draw_cooldown_overlay(rect: Rect, fraction_remaining: f32) {
    let f = fraction_remaining.clamp(0.0, 1.0);
    if f <= 0.0 {
        return;
    }
    draw_rectangle(rect.x, rect.y, rect.w, rect.h * f, Color::new(0.0, 0.0, 0.0, 0.65));
}

/// Stack of text lines on a translucent panel (top-left HUD block)
pub fn draw_lines(x: f32, y: f32, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let line_h = FONT_SIZE_CONTENT + 4.0;
    let width = lines
        .iter()
        .map(|l| measure_text(l, None, FONT_SIZE_CONTENT as u16, 1.0).width)
        .fold(0.0, f32::max);
    draw_rectangle(x - 6.0, y - 4.0, width + 12.0, line_h * lines.len() as f32 + 8.0, PANEL_BG);
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, x, y + FONT_SIZE_CONTENT + i as f32 * line_h - 4.0, FONT_SIZE_CONTENT, TEXT_COLOR);
    }
}

/// Controls hint along the bottom edge
pub fn draw_hint(screen: Vec2, text: &str) {
    let dims = measure_text(text, None, FONT_SIZE_SMALL as u16, 1.0);
    let x = ((screen.x - dims.width) * 0.5).round();
    draw_text(text, x, screen.y - 12.0, FONT_SIZE_SMALL, TEXT_DIM);
}

/// Big centred message (GAME OVER, WAVE 3, ...) with an optional subtitle
pub fn draw_banner(screen: Vec2, text: &str, subtitle: Option<&str>, color: Color) {
    let dims = measure_text(text, None, FONT_SIZE_TITLE as u16, 1.0);
    let cy = screen.y * 0.5;
    draw_rectangle(0.0, cy - 40.0, screen.x, 80.0, PANEL_BG);
    draw_text(text, ((screen.x - dims.width) * 0.5).round(), cy, FONT_SIZE_TITLE, color);
    if let Some(sub) = subtitle {
        let sd = measure_text(sub, None, FONT_SIZE_CONTENT as u16, 1.0);
        draw_text(sub, ((screen.x - sd.width) * 0.5).round(), cy + 26.0, FONT_SIZE_CONTENT, TEXT_DIM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_color_thresholds() {
        assert_eq!(health_color(1.0), HEALTH_HIGH);
        assert_eq!(health_color(0.76), HEALTH_HIGH);
        assert_eq!(health_color(0.75), HEALTH_MID);
        assert_eq!(health_color(0.51), HEALTH_MID);
        assert_eq!(health_color(0.5), HEALTH_LOW);
        assert_eq!(health_color(0.26), HEALTH_LOW);
        assert_eq!(health_color(0.25), HEALTH_CRITICAL);
        assert_eq!(health_color(0.0), HEALTH_CRITICAL);
    }
}
