//! Preview controls
//!
//! Sliders reset to their default on right-click, the same in every tier.

use egui::{Button, PointerButton, Response, RichText, Slider, Ui};

use crate::overlay::{HudFrame, SliderConfig, SliderKind, TriggerButton};
use crate::session::DenialReason;

/// Something the user asked for through the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HudAction {
    Stop,
    Capture,
    Place,
    Reposition,
    SetSlider(SliderKind, f32),
}

/// Slider bound to a `SliderConfig`, reset to its default on right-click.
///
/// Returns the response and the new value when it changed.
pub fn resettable_slider(ui: &mut Ui, config: &SliderConfig) -> (Response, Option<f32>) {
    let mut value = config.value;
    let format = config.format;
    let mut response = ui.add(
        Slider::new(&mut value, config.min..=config.max)
            .step_by(config.step as f64)
            .custom_formatter(move |v, _| format(v as f32)),
    );

    if response.clicked_by(PointerButton::Secondary) {
        value = config.default;
        response.mark_changed();
    }
    let changed = response.changed().then_some(value);
    (response, changed)
}

/// The button that starts a preview; returns whether it was clicked
pub fn trigger(ui: &mut Ui, button: TriggerButton) -> bool {
    ui.add_enabled(button.enabled, Button::new(button.label))
        .clicked()
}

/// Message shown after the camera was refused
pub fn denial_notice(ui: &mut Ui, reason: &DenialReason) {
    ui.label(
        RichText::new(reason.message())
            .small()
            .color(egui::Color32::from_rgb(180, 40, 40)),
    );
}

/// Badge, hint, sliders and action buttons
pub fn hud(ui: &mut Ui, hud: &HudFrame) -> Vec<HudAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.label(RichText::new(hud.badge).small());
        ui.strong(&hud.creature_name);
        if ui.button("✕").clicked() {
            actions.push(HudAction::Stop);
        }
    });

    if let Some(label) = hud.sigil_label {
        ui.label(RichText::new(label).italics());
    }
    if let Some(hint) = hud.hint {
        ui.label(hint);
    }

    for slider in &hud.sliders {
        ui.horizontal(|ui| {
            ui.label(slider.label);
            if let (_, Some(value)) = resettable_slider(ui, slider) {
                actions.push(HudAction::SetSlider(slider.kind, value));
            }
        });
    }

    ui.horizontal(|ui| {
        if hud.can_place && ui.button("Place here").clicked() {
            actions.push(HudAction::Place);
        }
        if hud.can_reposition && ui.button("Reposition").clicked() {
            actions.push(HudAction::Reposition);
        }
        if hud.can_capture && ui.button("Capture").clicked() {
            actions.push(HudAction::Capture);
        }
    });

    actions
}
