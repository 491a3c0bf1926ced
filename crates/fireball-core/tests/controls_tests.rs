// Host-side tests for the parameter set and the keyboard panel.

use fireball_core::controls::{self, param_spec};
use fireball_core::*;

#[test]
fn defaults_match_the_published_values() {
    let c = Controls::default();
    assert_eq!(c.tessellations, 7);
    assert_eq!(c.color, [1.0, 0.7, 0.5]);
    assert_eq!(c.fbm_amplitude, 0.5);
    assert_eq!(c.fbm_frequency, 10.0);
    assert_eq!(c.displacement, 0.6);
    assert_eq!(c.fbm_amplitude_multiplier, 0.5);
    assert_eq!(c.fbm_frequency_multiplier, 2.0);
    assert_eq!(c.layer, 0.1);
    assert_eq!(c.sine_intensity, 1.0);
    assert_eq!(c.time_scale, 1.0);
    assert!(!c.show_floor);
}

#[test]
fn set_clamps_into_declared_range() {
    let mut c = Controls::default();
    c.set(controls::FBM_FREQUENCY, ParamValue::Scalar(99.0)).unwrap();
    assert_eq!(c.fbm_frequency, 20.0);
    c.set(controls::LAYER, ParamValue::Scalar(-1.0)).unwrap();
    assert_eq!(c.layer, 0.0);
    c.set(controls::TESSELLATIONS, ParamValue::Scalar(42.0)).unwrap();
    assert_eq!(c.tessellations, MAX_TESSELLATION);
    c.set(controls::TESSELLATIONS, ParamValue::Scalar(3.6)).unwrap();
    assert_eq!(c.tessellations, 4);
    c.set(controls::COLOR, ParamValue::Triple([2.0, 0.5, -1.0])).unwrap();
    assert_eq!(c.color, [1.0, 0.5, 0.0]);
    c.set(controls::TIME_SCALE, ParamValue::Scalar(f32::NAN)).unwrap();
    assert_eq!(c.time_scale, 0.0);
}

#[test]
fn set_rejects_unknown_names_and_wrong_kinds() {
    let mut c = Controls::default();
    assert_eq!(
        c.set("gravity", ParamValue::Scalar(1.0)),
        Err(ControlsError::UnknownParameter("gravity".into()))
    );
    assert!(matches!(
        c.set(controls::COLOR, ParamValue::Scalar(1.0)),
        Err(ControlsError::KindMismatch { .. })
    ));
    assert!(c.get("gravity").is_none());
    assert_eq!(c, Controls::default());
}

#[test]
fn nudge_moves_by_declared_step() {
    let mut c = Controls::default();
    let step = param_spec(controls::FBM_FREQUENCY).unwrap().step;
    let v = c.nudge(controls::FBM_FREQUENCY, 1.0).unwrap();
    assert_eq!(v, ParamValue::Scalar(10.0 + step));
    c.nudge(controls::TESSELLATIONS, -3.0).unwrap();
    assert_eq!(c.tessellations, 4);
}

#[test]
fn key_map() {
    assert_eq!(command_for_key("Tab", false), Some(PanelCommand::SelectNext));
    assert_eq!(command_for_key("Tab", true), Some(PanelCommand::SelectPrevious));
    assert_eq!(
        command_for_key("ArrowUp", true),
        Some(PanelCommand::Increase { coarse: true })
    );
    assert_eq!(
        command_for_key("ArrowDown", false),
        Some(PanelCommand::Decrease { coarse: false })
    );
    assert_eq!(command_for_key("L", false), Some(PanelCommand::LoadScene));
    assert_eq!(command_for_key("f", false), Some(PanelCommand::ToggleFloor));
    assert_eq!(command_for_key("r", false), Some(PanelCommand::Reset));
    assert_eq!(command_for_key("x", false), None);
}

#[test]
fn panel_selection_wraps() {
    let mut panel = ParameterPanel::new();
    let mut c = Controls::default();
    assert_eq!(panel.selected().name, PARAMS[0].name);
    panel.apply(&mut c, PanelCommand::SelectPrevious).unwrap();
    assert_eq!(panel.selected().name, PARAMS[PARAMS.len() - 1].name);
    panel.apply(&mut c, PanelCommand::SelectNext).unwrap();
    assert_eq!(panel.selected().name, PARAMS[0].name);
}

#[test]
fn panel_nudges_selected_parameter() {
    let mut panel = ParameterPanel::new();
    let mut c = Controls::default();
    // first entry is the tessellation level
    let effect = panel
        .apply(&mut c, PanelCommand::Decrease { coarse: false })
        .unwrap();
    assert_eq!(
        effect,
        PanelEffect::Changed {
            name: controls::TESSELLATIONS,
            value: ParamValue::Scalar(6.0),
        }
    );
    panel
        .apply(&mut c, PanelCommand::Increase { coarse: true })
        .unwrap();
    assert_eq!(c.tessellations, MAX_TESSELLATION);
}

#[test]
fn panel_reset_and_floor_toggle() {
    let mut panel = ParameterPanel::new();
    let mut c = Controls::default();
    c.layer = 0.9;
    assert_eq!(
        panel.apply(&mut c, PanelCommand::ToggleFloor).unwrap(),
        PanelEffect::FloorToggled(true)
    );
    assert_eq!(panel.apply(&mut c, PanelCommand::Reset).unwrap(), PanelEffect::Reset);
    assert_eq!(c, Controls::default());
}

#[test]
fn overlay_names_selection_and_timing() {
    let panel = ParameterPanel::new();
    let text = panel.overlay_text(&Controls::default(), &FrameTimer::new());
    assert!(text.starts_with("tessellations = 7.00"));
    assert!(text.ends_with("0.0 fps (0.00 ms)"));
}
