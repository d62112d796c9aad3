//! Error type for prodflow.
//!
//! Graph construction and colouring never fail; errors only arise at the
//! boundaries where registries, totals and targets are loaded or a scene is
//! handed to a render surface.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Unknown item: {name}")]
    UnknownItem { name: String },

    #[error("Unknown recipe: {name}")]
    UnknownRecipe { name: String },

    /// An `item:amount` entry in a recipe list could not be parsed.
    #[error("Invalid entry in {context}: {entry:?}")]
    InvalidEntry { context: String, entry: String },

    #[error("Invalid build target: {target:?}")]
    InvalidTarget { target: String },

    #[error("Render failed: {message}")]
    Render { message: String },
}
