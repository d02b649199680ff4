use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Degrees the model turns per arrow-key press (and per key repeat).
pub const ROTATE_STEP_DEG: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigAction {
    /// Advance the selected camera, wrapping modulo four.
    NextCamera,
    /// Turn the model about +Y by this many degrees.
    Rotate(f32),
    /// Switch between the cross layout and the single-camera preview.
    ToggleView,
    /// Leave the hologram and return to the model list.
    Back,
}

/// Maps keyboard input on the hologram screen to rig actions.
///
/// Camera switches fire on key release and rotation fires on every press
/// and repeat, so holding an arrow spins the model.
#[derive(Debug, Default)]
pub struct RigController;

impl RigController {
    pub fn new() -> Self {
        Self
    }

    /// Translates a window event; returns `None` for anything unhandled.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<RigAction> {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => Self::action_for(*code, *state, *repeat),
            _ => None,
        }
    }

    pub fn action_for(code: KeyCode, state: ElementState, repeat: bool) -> Option<RigAction> {
        match (code, state) {
            (KeyCode::Space | KeyCode::KeyA | KeyCode::Enter, ElementState::Released) => {
                Some(RigAction::NextCamera)
            }
            (KeyCode::ArrowLeft, ElementState::Pressed) => Some(RigAction::Rotate(ROTATE_STEP_DEG)),
            (KeyCode::ArrowRight, ElementState::Pressed) => {
                Some(RigAction::Rotate(-ROTATE_STEP_DEG))
            }
            (KeyCode::KeyP, ElementState::Released) => Some(RigAction::ToggleView),
            (KeyCode::Escape | KeyCode::Backspace, ElementState::Pressed) if !repeat => {
                Some(RigAction::Back)
            }
            _ => None,
        }
    }
}

/// Escape quits from the model list, but only on a fresh press. An
/// auto-repeat of the Escape that just left the hologram does not count.
pub fn quit_requested(key: PhysicalKey, state: ElementState, repeat: bool) -> bool {
    key == PhysicalKey::Code(KeyCode::Escape) && state == ElementState::Pressed && !repeat
}

#[cfg(test)]
mod tests {
    use super::*;
    use ElementState::{Pressed, Released};

    #[test]
    fn camera_switch_fires_on_release_only() {
        for key in [KeyCode::Space, KeyCode::KeyA, KeyCode::Enter] {
            assert_eq!(RigController::action_for(key, Pressed, false), None);
            assert_eq!(
                RigController::action_for(key, Released, false),
                Some(RigAction::NextCamera)
            );
        }
    }

    #[test]
    fn arrows_rotate_including_repeats() {
        assert_eq!(
            RigController::action_for(KeyCode::ArrowLeft, Pressed, true),
            Some(RigAction::Rotate(3.0))
        );
        assert_eq!(
            RigController::action_for(KeyCode::ArrowRight, Pressed, false),
            Some(RigAction::Rotate(-3.0))
        );
        assert_eq!(RigController::action_for(KeyCode::ArrowLeft, Released, false), None);
    }

    #[test]
    fn back_ignores_key_repeat() {
        assert_eq!(
            RigController::action_for(KeyCode::Escape, Pressed, false),
            Some(RigAction::Back)
        );
        assert_eq!(RigController::action_for(KeyCode::Backspace, Pressed, true), None);
    }

    #[test]
    fn toggle_and_unmapped_keys() {
        assert_eq!(
            RigController::action_for(KeyCode::KeyP, Released, false),
            Some(RigAction::ToggleView)
        );
        assert_eq!(RigController::action_for(KeyCode::KeyQ, Released, false), None);
    }

    #[test]
    fn held_escape_does_not_quit() {
        let esc = PhysicalKey::Code(KeyCode::Escape);
        assert!(quit_requested(esc, Pressed, false));
        assert!(!quit_requested(esc, Pressed, true));
        assert!(!quit_requested(esc, Released, false));
        assert!(!quit_requested(PhysicalKey::Code(KeyCode::KeyQ), Pressed, false));
    }
}
