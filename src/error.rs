use std::path::PathBuf;

pub type SamplerResult<T> = Result<T, SamplerError>;

#[derive(thiserror::Error, Debug)]
pub enum SamplerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("cannot open markup file '{path}' for append: {source}")]
    MarkupAppend {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot create markup file '{path}': {source}")]
    MarkupCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SamplerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
