//! Keyboard and touch input, reduced to intents and commands.

use std::collections::HashSet;

use crate::model::Intents;

/// On-screen touch controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
    Sprint,
    Interact,
}

impl TouchButton {
    pub const ALL: [TouchButton; 5] = [
        TouchButton::Left,
        TouchButton::Right,
        TouchButton::Jump,
        TouchButton::Sprint,
        TouchButton::Interact,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            TouchButton::Left => "btnLeft",
            TouchButton::Right => "btnRight",
            TouchButton::Jump => "btnJump",
            TouchButton::Sprint => "btnSprint",
            TouchButton::Interact => "btnInteract",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TouchButton::Left => "◀",
            TouchButton::Right => "▶",
            TouchButton::Jump => "▲",
            TouchButton::Sprint => "RUN",
            TouchButton::Interact => "E",
        }
    }
}

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    TouchStart(TouchButton),
    TouchEnd(TouchButton),
    Click,
    FocusLost,
    VisibilityChanged { visible: bool },
}

/// Discrete actions produced by an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// First input of the session dismisses the title card
    Start,
    Interact,
    /// Touch interact: also closes the scratch card or video
    TouchInteract,
    Escape,
}

/// Held keys and touch buttons
pub struct InputState {
    pub pressed_keys: HashSet<String>,
    pub touch_held: HashSet<TouchButton>,
    pub sprint_toggled: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            touch_held: HashSet::new(),
            sprint_toggled: false,
        }
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
        self.touch_held.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Key mapping configuration. Keys are compared lower-cased.
#[derive(Clone)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub sprint: Vec<String>,
    pub interact: Vec<String>,
    pub escape: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        Self {
            left: keys(&["a", "arrowleft"]),
            right: keys(&["d", "arrowright"]),
            jump: keys(&[" ", "w", "arrowup"]),
            sprint: keys(&["shift"]),
            interact: keys(&["e"]),
            escape: "escape".to_string(),
        }
    }
}

/// Turns raw events into held intents and discrete commands
#[derive(Clone)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    fn any_held(&self, input: &InputState, keys: &[String]) -> bool {
        keys.iter().any(|k| input.is_key_pressed(k))
    }

    pub fn is_navigation_key(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        [&self.bindings.left, &self.bindings.right, &self.bindings.jump]
            .iter()
            .any(|keys| keys.contains(&key))
    }

    /// Record an event. `accepting` is false while the game ignores
    /// gameplay input (scene transition in progress).
    pub fn process_event(
        &self,
        input: &mut InputState,
        event: &InputEvent,
        started: bool,
        accepting: bool,
    ) -> Option<Command> {
        match event {
            InputEvent::KeyDown(_) | InputEvent::TouchStart(_) | InputEvent::Click if !started => {
                Some(Command::Start)
            }
            InputEvent::KeyDown(key) => {
                if !accepting {
                    return None;
                }
                let key = key.to_lowercase();
                let already_held = input.pressed_keys.contains(&key);
                let command = if key == self.bindings.escape {
                    Some(Command::Escape)
                } else if self.bindings.interact.contains(&key) && !already_held {
                    Some(Command::Interact)
                } else {
                    None
                };
                input.pressed_keys.insert(key);
                command
            }
            InputEvent::KeyUp(key) => {
                input.pressed_keys.remove(&key.to_lowercase());
                None
            }
            InputEvent::TouchStart(button) => {
                if !accepting {
                    return None;
                }
                match button {
                    TouchButton::Sprint => {
                        input.sprint_toggled = !input.sprint_toggled;
                        None
                    }
                    TouchButton::Interact => {
                        let fresh = input.touch_held.insert(*button);
                        fresh.then_some(Command::TouchInteract)
                    }
                    _ => {
                        input.touch_held.insert(*button);
                        None
                    }
                }
            }
            InputEvent::TouchEnd(button) => {
                input.touch_held.remove(button);
                None
            }
            InputEvent::Click => None,
            InputEvent::FocusLost | InputEvent::VisibilityChanged { .. } => {
                input.clear_keys();
                None
            }
        }
    }

    /// Held intents for this frame
    pub fn intents(&self, input: &InputState) -> Intents {
        Intents {
            left: self.any_held(input, &self.bindings.left) || input.touch_held.contains(&TouchButton::Left),
            right: self.any_held(input, &self.bindings.right) || input.touch_held.contains(&TouchButton::Right),
            sprint: self.any_held(input, &self.bindings.sprint) || input.sprint_toggled,
            jump: self.any_held(input, &self.bindings.jump) || input.touch_held.contains(&TouchButton::Jump),
        }
    }
}

pub mod wasm {
    use super::*;
    use web_sys::KeyboardEvent;

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let key = e.key();
        if is_down {
            InputEvent::KeyDown(key)
        } else {
            InputEvent::KeyUp(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(k: &str) -> InputEvent {
        InputEvent::KeyDown(k.to_string())
    }

    #[test]
    fn first_input_only_starts() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        assert_eq!(proc.process_event(&mut input, &down("d"), false, true), Some(Command::Start));
        assert!(input.pressed_keys.is_empty());
    }

    #[test]
    fn held_interact_fires_once() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        assert_eq!(proc.process_event(&mut input, &down("e"), true, true), Some(Command::Interact));
        // key repeat
        assert_eq!(proc.process_event(&mut input, &down("E"), true, true), None);
        proc.process_event(&mut input, &InputEvent::KeyUp("e".into()), true, true);
        assert_eq!(proc.process_event(&mut input, &down("e"), true, true), Some(Command::Interact));
    }

    #[test]
    fn arrows_and_letters_map_to_intents() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        proc.process_event(&mut input, &down("ArrowLeft"), true, true);
        proc.process_event(&mut input, &down("Shift"), true, true);
        proc.process_event(&mut input, &down(" "), true, true);
        let intents = proc.intents(&input);
        assert!(intents.left && intents.sprint && intents.jump && !intents.right);
    }

    #[test]
    fn touch_sprint_toggles() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        proc.process_event(&mut input, &InputEvent::TouchStart(TouchButton::Sprint), true, true);
        proc.process_event(&mut input, &InputEvent::TouchEnd(TouchButton::Sprint), true, true);
        assert!(proc.intents(&input).sprint);
        proc.process_event(&mut input, &InputEvent::TouchStart(TouchButton::Sprint), true, true);
        assert!(!proc.intents(&input).sprint);
    }

    #[test]
    fn input_blocked_while_not_accepting() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        assert_eq!(proc.process_event(&mut input, &down("e"), true, false), None);
        assert_eq!(proc.process_event(&mut input, &down("d"), true, false), None);
        assert!(!proc.intents(&input).right);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        proc.process_event(&mut input, &down("d"), true, true);
        proc.process_event(&mut input, &InputEvent::TouchStart(TouchButton::Left), true, true);
        proc.process_event(&mut input, &InputEvent::FocusLost, true, true);
        assert_eq!(proc.intents(&input), Intents::default());
    }
}
