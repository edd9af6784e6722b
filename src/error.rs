use std::path::PathBuf;
use thiserror::Error;

/// Failures outside the pricing/validation core: catalog files, prompts,
/// template rendering and the clipboard/link hand-off.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {}: {source}", .path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid catalog: {0}")]
    Catalog(String),

    #[error("unknown plan: {0}")]
    UnknownPlan(String),

    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("failed to open {url}: {source}")]
    OpenLink {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Prompt(#[from] inquire::InquireError),
}

impl OrderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OrderError::Io {
            path: path.into(),
            source,
        }
    }

    /// Esc / Ctrl-C in an interactive prompt.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            OrderError::Prompt(
                inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted
            )
        )
    }
}
