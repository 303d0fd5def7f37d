use gtk4::gdk;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::config::{config_dir, load_or_create};

/// Actions dialogs react to from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Stopwatch
    TogglePause,
    Finish,

    // Entry dialogs
    Confirm,
    Cancel,
}

/// Keybindings configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindingsConfig {
    pub bindings: HashMap<String, KeyBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    pub action: Action,
}

impl KeyBinding {
    fn plain(key: &str, action: Action) -> Self {
        Self {
            key: key.to_string(),
            shift: false,
            ctrl: false,
            alt: false,
            action,
        }
    }
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert("toggle_pause".to_string(), KeyBinding::plain("space", Action::TogglePause));
        bindings.insert("finish".to_string(), KeyBinding::plain("Escape", Action::Finish));
        bindings.insert("confirm".to_string(), KeyBinding::plain("Return", Action::Confirm));
        bindings.insert("cancel".to_string(), KeyBinding::plain("Escape", Action::Cancel));

        Self { bindings }
    }
}

/// Runtime keybindings manager
#[derive(Debug)]
pub struct Keybindings {
    /// (key, shift, ctrl, alt) -> actions bound to that chord
    single_key: HashMap<(String, bool, bool, bool), Vec<Action>>,
}

impl Keybindings {
    pub fn load() -> Self {
        let config: KeybindingsConfig = load_or_create(&config_dir().join("keybindings.json"));
        Self::from_config(&config)
    }

    pub fn load_from(path: &Path) -> Self {
        let config: KeybindingsConfig = load_or_create(path);
        Self::from_config(&config)
    }

    pub fn from_config(config: &KeybindingsConfig) -> Self {
        let mut single_key: HashMap<_, Vec<Action>> = HashMap::new();

        for binding in config.bindings.values() {
            single_key
                .entry((binding.key.clone(), binding.shift, binding.ctrl, binding.alt))
                .or_default()
                .push(binding.action);
        }

        Self { single_key }
    }

    /// Whether a key press triggers `action`. One chord can serve several
    /// actions (Escape both cancels and finishes) so dialogs ask for the one
    /// they handle.
    pub fn matches(&self, action: Action, key: &gdk::Key, modifier: gdk::ModifierType) -> bool {
        let shift = modifier.contains(gdk::ModifierType::SHIFT_MASK);
        let ctrl = modifier.contains(gdk::ModifierType::CONTROL_MASK);
        let alt = modifier.contains(gdk::ModifierType::ALT_MASK);
        self.matches_name(action, &key_to_string(key), shift, ctrl, alt)
    }

    fn matches_name(&self, action: Action, key: &str, shift: bool, ctrl: bool, alt: bool) -> bool {
        self.single_key
            .get(&(key.to_string(), shift, ctrl, alt))
            .is_some_and(|actions| actions.contains(&action))
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::from_config(&KeybindingsConfig::default())
    }
}

/// Convert a GDK key to a string name
fn key_to_string(key: &gdk::Key) -> String {
    match *key {
        k if k == gdk::Key::Return || k == gdk::Key::KP_Enter => "Return".to_string(),
        k if k == gdk::Key::Escape => "Escape".to_string(),
        k if k == gdk::Key::space => "space".to_string(),
        _ => key.name().map(|s| s.to_string()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = Keybindings::default();
        assert!(keys.matches_name(Action::TogglePause, "space", false, false, false));
        assert!(keys.matches_name(Action::Confirm, "Return", false, false, false));
        assert!(!keys.matches_name(Action::Confirm, "Return", true, false, false));
    }

    #[test]
    fn test_one_key_for_two_actions() {
        let keys = Keybindings::default();
        assert!(keys.matches_name(Action::Finish, "Escape", false, false, false));
        assert!(keys.matches_name(Action::Cancel, "Escape", false, false, false));
        assert!(!keys.matches_name(Action::TogglePause, "Escape", false, false, false));
    }

    #[test]
    fn test_custom_bindings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keybindings.json");
        std::fs::write(
            &path,
            r#"{"bindings": {"toggle_pause": {"key": "p", "ctrl": true, "action": "toggle_pause"}}}"#,
        )
        .unwrap();

        let keys = Keybindings::load_from(&path);
        assert!(keys.matches_name(Action::TogglePause, "p", false, true, false));
        assert!(!keys.matches_name(Action::TogglePause, "space", false, false, false));
    }
}
