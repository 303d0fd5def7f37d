use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to initialise GTK: {0}")]
    GtkInit(#[from] gtk4::glib::BoolError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("not a duration: {0:?}")]
    InvalidDuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
