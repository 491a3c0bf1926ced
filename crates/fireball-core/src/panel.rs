//! Keyboard-driven parameter panel shared by the native and web frontends.

use crate::constants::PANEL_COARSE_STEP_MULTIPLIER;
use crate::controls::{Controls, ControlsError, ParamSpec, ParamValue, PARAMS};
use crate::timer::FrameTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelCommand {
    SelectNext,
    SelectPrevious,
    Increase { coarse: bool },
    Decrease { coarse: bool },
    LoadScene,
    ToggleFloor,
    Reset,
}

/// Map a key name (DOM `KeyboardEvent.key` spelling) to a panel command.
#[inline]
pub fn command_for_key(key: &str, shift: bool) -> Option<PanelCommand> {
    match key {
        "Tab" if shift => Some(PanelCommand::SelectPrevious),
        "Tab" => Some(PanelCommand::SelectNext),
        "ArrowUp" => Some(PanelCommand::Increase { coarse: shift }),
        "ArrowDown" => Some(PanelCommand::Decrease { coarse: shift }),
        "l" | "L" => Some(PanelCommand::LoadScene),
        "f" | "F" => Some(PanelCommand::ToggleFloor),
        "r" | "R" => Some(PanelCommand::Reset),
        _ => None,
    }
}

/// What the frame driver has to do after a command was applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelEffect {
    Selected(&'static str),
    Changed {
        name: &'static str,
        value: ParamValue,
    },
    ReloadScene,
    FloorToggled(bool),
    Reset,
}

#[derive(Debug, Default)]
pub struct ParameterPanel {
    selected: usize,
}

impl ParameterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &'static ParamSpec {
        &PARAMS[self.selected % PARAMS.len()]
    }

    pub fn apply(
        &mut self,
        controls: &mut Controls,
        command: PanelCommand,
    ) -> Result<PanelEffect, ControlsError> {
        let effect = match command {
            PanelCommand::SelectNext => {
                self.selected = (self.selected + 1) % PARAMS.len();
                PanelEffect::Selected(self.selected().name)
            }
            PanelCommand::SelectPrevious => {
                self.selected = (self.selected + PARAMS.len() - 1) % PARAMS.len();
                PanelEffect::Selected(self.selected().name)
            }
            PanelCommand::Increase { coarse } | PanelCommand::Decrease { coarse } => {
                let mut steps = if coarse { PANEL_COARSE_STEP_MULTIPLIER } else { 1.0 };
                if matches!(command, PanelCommand::Decrease { .. }) {
                    steps = -steps;
                }
                let name = self.selected().name;
                let value = controls.nudge(name, steps)?;
                PanelEffect::Changed { name, value }
            }
            PanelCommand::LoadScene => PanelEffect::ReloadScene,
            PanelCommand::ToggleFloor => {
                controls.show_floor = !controls.show_floor;
                PanelEffect::FloorToggled(controls.show_floor)
            }
            PanelCommand::Reset => {
                *controls = Controls::default();
                PanelEffect::Reset
            }
        };
        log::debug!("[panel] {:?} -> {:?}", command, effect);
        Ok(effect)
    }

    /// One-line readout of the selected parameter and frame timing.
    pub fn overlay_text(&self, controls: &Controls, timer: &FrameTimer) -> String {
        let spec = self.selected();
        let value = match controls.get(spec.name) {
            Some(ParamValue::Scalar(v)) => format!("{v:.2}"),
            Some(ParamValue::Triple([r, g, b])) => format!("({r:.2}, {g:.2}, {b:.2})"),
            None => "?".to_owned(),
        };
        format!(
            "{} = {} [{}..{}] | {}",
            spec.name,
            value,
            spec.min,
            spec.max,
            timer.summary()
        )
    }
}
