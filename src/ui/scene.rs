//! Painting a `SceneFrame` with egui

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, TextureHandle, Vec2};

use crate::overlay::{OverlayFrame, OverlayVisual, Pivot, ReticuleFrame, SceneFrame};

const RETICULE_RADIUS: f32 = 22.0;
const RETICULE_FOUND: Color32 = Color32::from_rgb(200, 168, 75);
const RETICULE_SEARCHING: Color32 = Color32::from_rgba_premultiplied(180, 180, 180, 180);

/// One percent of the shorter viewport side, in points
fn vmin(viewport: Rect) -> f32 {
    viewport.width().min(viewport.height()) / 100.0
}

/// Screen rectangle of the creature.
///
/// Images are fitted inside the frame's vh/vw bounds keeping their aspect;
/// icons are square. `image_size` is the texture size when one is bound.
pub fn overlay_rect(frame: &OverlayFrame, viewport: Rect, image_size: Option<Vec2>) -> Rect {
    let size = match (&frame.visual, image_size) {
        (OverlayVisual::Image { .. }, Some(image)) if image.x > 0.0 && image.y > 0.0 => {
            let max_w = viewport.width() * frame.max_width_vw / 100.0;
            let max_h = viewport.height() * frame.max_height_vh / 100.0;
            let fit = (max_w / image.x).min(max_h / image.y);
            image * fit
        }
        _ => Vec2::splat(frame.icon_vmin * vmin(viewport)),
    };

    let anchor = anchor_pos(frame, viewport);
    match frame.pivot {
        Pivot::BottomCenter => Rect::from_min_size(anchor - Vec2::new(size.x / 2.0, size.y), size),
        Pivot::Center => Rect::from_center_size(anchor, size),
    }
}

fn anchor_pos(frame: &OverlayFrame, viewport: Rect) -> Pos2 {
    let px = frame.anchor.to_pixels(viewport.width(), viewport.height());
    viewport.min + Vec2::new(px.x, px.y) + Vec2::new(frame.offset_px.x, frame.offset_px.y)
}

fn glow_color(frame: &OverlayFrame) -> Color32 {
    let [r, g, b, a] = frame.glow;
    Color32::from_rgba_unmultiplied(r, g, b, a).gamma_multiply(frame.opacity)
}

/// Paint the creature, reticule and capture flash for one frame
pub fn paint_scene(
    painter: &Painter,
    viewport: Rect,
    scene: &SceneFrame,
    texture: Option<&TextureHandle>,
) {
    if let Some(overlay) = &scene.overlay {
        paint_overlay(painter, viewport, overlay, texture);
    }
    if let Some(reticule) = &scene.reticule {
        paint_reticule(painter, viewport, reticule);
    }
    if scene.flash_alpha > 0.0 {
        painter.rect_filled(viewport, 0.0, Color32::WHITE.gamma_multiply(scene.flash_alpha));
    }
}

fn paint_overlay(
    painter: &Painter,
    viewport: Rect,
    frame: &OverlayFrame,
    texture: Option<&TextureHandle>,
) {
    let image_size = texture.map(|t| t.size_vec2());
    let rect = overlay_rect(frame, viewport, image_size);
    let unit = vmin(viewport);

    if let Some(shadow) = frame.shadow {
        let center = Pos2::new(rect.center().x, rect.max.y);
        let radius = Vec2::new(shadow.width_vmin, shadow.height_vmin) * unit / 2.0;
        painter.add(Shape::ellipse_filled(
            center,
            radius,
            Color32::from_black_alpha(90).gamma_multiply(frame.opacity),
        ));
    }

    match (&frame.visual, texture) {
        (OverlayVisual::Image { .. }, Some(texture)) => {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                Color32::WHITE.gamma_multiply(frame.opacity),
            );
        }
        (OverlayVisual::Icon { glyph, .. }, _) => {
            painter.circle_filled(rect.center(), rect.width() * 0.6, glow_color(frame));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                glyph.symbol(),
                FontId::proportional(rect.height() * 0.8),
                Color32::WHITE.gamma_multiply(frame.opacity),
            );
        }
        // Image not decoded yet
        (OverlayVisual::Image { .. }, None) => {
            painter.circle_filled(rect.center(), rect.width() * 0.3, glow_color(frame));
        }
    }
}

fn paint_reticule(painter: &Painter, viewport: Rect, reticule: &ReticuleFrame) {
    let px = reticule
        .position
        .to_pixels(viewport.width(), viewport.height());
    let center = viewport.min + Vec2::new(px.x, px.y);
    let color = if reticule.highlighted {
        RETICULE_FOUND
    } else {
        RETICULE_SEARCHING
    };
    painter.circle_stroke(center, RETICULE_RADIUS, Stroke::new(2.0, color));
    painter.circle_filled(center, 3.0, color);
}
