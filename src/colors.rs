use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{config_dir, load_or_create};

/// Color configuration for the dialogs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    // Backgrounds
    pub main_bg: String,
    pub button_bg: String,
    pub button_hover_bg: String,

    // Text colors
    pub text_primary: String,
    pub text_secondary: String,

    // Stopwatch colors
    pub elapsed_time: String,
    pub elapsed_paused: String,
    pub balance_time: String,
    pub finish_button: String,

    // Choice list colors
    pub choice_row_bg: String,
    pub choice_row_selected: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            main_bg: "#1e1e1e".to_string(),
            button_bg: "#2d2d2d".to_string(),
            button_hover_bg: "#3e4451".to_string(),

            text_primary: "#abb2bf".to_string(),
            text_secondary: "#5c6370".to_string(),

            elapsed_time: "#98c379".to_string(),
            elapsed_paused: "#e5c07b".to_string(),
            balance_time: "#61afef".to_string(),
            finish_button: "#e06c75".to_string(),

            choice_row_bg: "#2d2d2d".to_string(),
            choice_row_selected: "#3e4451".to_string(),
        }
    }
}

impl ColorConfig {
    pub fn load() -> Self {
        load_or_create(&config_dir().join("colors.json"))
    }

    pub fn load_from(path: &Path) -> Self {
        load_or_create(path)
    }

    /// Generate CSS from the color configuration
    pub fn generate_css(&self) -> String {
        format!(
            r#"
            .main-container {{
                background-color: {main_bg};
                padding: 8px;
            }}

            .message {{
                color: {text_primary};
                font-size: 14px;
                margin-bottom: 8px;
            }}

            .caption {{
                color: {text_secondary};
                font-family: monospace;
                font-size: 13px;
            }}

            .elapsed-time {{
                color: {elapsed_time};
                font-family: monospace;
                font-weight: bold;
                font-size: 16px;
            }}

            .elapsed-time.paused {{
                color: {elapsed_paused};
            }}

            .balance-time {{
                color: {balance_time};
                font-family: monospace;
                font-size: 16px;
            }}

            .dialog-button {{
                background-color: {button_bg};
                color: {text_primary};
                border-radius: 4px;
                padding: 4px 12px;
            }}

            .dialog-button:hover {{
                background-color: {button_hover_bg};
            }}

            .finish-button {{
                color: {finish_button};
                font-weight: bold;
            }}

            .spin-label {{
                color: {text_secondary};
                font-family: monospace;
            }}

            .choice-list {{
                background-color: transparent;
            }}

            .choice-row {{
                background-color: {choice_row_bg};
                color: {text_primary};
                border-radius: 4px;
                margin-bottom: 2px;
                padding: 4px;
            }}

            .choice-row:selected {{
                background-color: {choice_row_selected};
            }}
        "#,
            main_bg = self.main_bg,
            button_bg = self.button_bg,
            button_hover_bg = self.button_hover_bg,
            text_primary = self.text_primary,
            text_secondary = self.text_secondary,
            elapsed_time = self.elapsed_time,
            elapsed_paused = self.elapsed_paused,
            balance_time = self.balance_time,
            finish_button = self.finish_button,
            choice_row_bg = self.choice_row_bg,
            choice_row_selected = self.choice_row_selected,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_uses_configured_colors() {
        let colors = ColorConfig {
            elapsed_time: "#123456".to_string(),
            ..ColorConfig::default()
        };
        let css = colors.generate_css();
        assert!(css.contains(".elapsed-time {"));
        assert!(css.contains("color: #123456;"));
        assert!(css.contains(&format!("background-color: {};", colors.main_bg)));
    }

    #[test]
    fn test_partial_color_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        std::fs::write(&path, r##"{"finish_button": "#ff0000"}"##).unwrap();

        let colors = ColorConfig::load_from(&path);
        assert_eq!(colors.finish_button, "#ff0000");
        assert_eq!(colors.main_bg, ColorConfig::default().main_bg);
    }
}
