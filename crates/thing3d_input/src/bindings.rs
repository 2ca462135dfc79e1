//! Key bindings from raw winit input to [`Action`]s
//!
//! Default bindings:
//! - W/A/S/D: Move (held)
//! - Space: Jump (held)
//! - Escape: Pause (toggle)
//! - Left/Right mouse: Shoot/Aim (toggle)
//! - R: Reload (toggle)

use crate::action::Action;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// How a binding reacts to presses, repeats and releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Active while the input is down, including key repeats
    Held,
    /// Active only on the initial press; repeats and releases clear it
    Toggle,
}

/// A physical input that can be bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// One input bound to one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub source: InputSource,
    pub action: Action,
    pub trigger: Trigger,
}

/// Maps raw input events to active actions
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<Binding>,
    active: Action,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use InputSource::{Key, Mouse};
        use Trigger::{Held, Toggle};

        Self::new(vec![
            Binding { source: Key(KeyCode::KeyW), action: Action::MOVE_FORWARD, trigger: Held },
            Binding { source: Key(KeyCode::KeyA), action: Action::MOVE_LEFT, trigger: Held },
            Binding { source: Key(KeyCode::KeyD), action: Action::MOVE_RIGHT, trigger: Held },
            Binding { source: Key(KeyCode::KeyS), action: Action::MOVE_BACK, trigger: Held },
            Binding { source: Key(KeyCode::Space), action: Action::JUMP, trigger: Held },
            Binding { source: Key(KeyCode::Escape), action: Action::PAUSE, trigger: Toggle },
            Binding { source: Mouse(MouseButton::Left), action: Action::SHOOT, trigger: Toggle },
            Binding { source: Mouse(MouseButton::Right), action: Action::AIM, trigger: Toggle },
            Binding { source: Key(KeyCode::KeyR), action: Action::RELOAD, trigger: Toggle },
        ])
    }
}

impl KeyBindings {
    /// Create bindings from an explicit list
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            active: Action::empty(),
        }
    }

    /// Bind `source` to `action`, replacing whatever `source` was bound to
    pub fn bind(&mut self, source: InputSource, action: Action, trigger: Trigger) {
        self.bindings.retain(|b| b.source != source);
        self.bindings.push(Binding { source, action, trigger });
    }

    /// Current bindings
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Process keyboard input
    ///
    /// `repeat` is the OS key-repeat flag. Returns true if the key is bound.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState, repeat: bool) -> bool {
        self.apply(InputSource::Key(key), state, repeat)
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        self.apply(InputSource::Mouse(button), state, false)
    }

    fn apply(&mut self, source: InputSource, state: ElementState, repeat: bool) -> bool {
        let Some(binding) = self.bindings.iter().find(|b| b.source == source) else {
            return false;
        };

        let pressed = state == ElementState::Pressed;
        let on = match binding.trigger {
            Trigger::Held => pressed,
            Trigger::Toggle => pressed && !repeat,
        };
        self.active.set(binding.action, on);
        true
    }

    /// Whether every action in `action` is active
    pub fn is_active(&self, action: Action) -> bool {
        self.active.contains(action)
    }

    /// All currently active actions
    pub fn active(&self) -> Action {
        self.active
    }

    /// Read and clear an action
    ///
    /// Returns true if it was active. Use this for toggle actions that should
    /// fire once per press.
    pub fn consume(&mut self, action: Action) -> bool {
        let was_active = self.active.contains(action);
        self.active.remove(action);
        was_active
    }

    /// Release everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.active = Action::empty();
    }
}
