pub mod activity;
pub mod colors;
pub mod config;
pub mod duration_parser;
pub mod error;
pub mod format;
pub mod keybindings;
pub mod logging;
pub mod stopwatch;
pub mod ui;

pub use activity::{Activity, ActivityRecord};
pub use config::DialogConfig;
pub use error::{Error, Result};
pub use stopwatch::Stopwatch;
