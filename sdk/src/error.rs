use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RepoError {
    #[error("label not found: {0}")]
    LabelNotFound(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse {name}: {reason}")]
    Parse { name: String, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RepoError {
    #[must_use]
    pub fn label_not_found(label: impl Into<String>) -> Self {
        Self::LabelNotFound(label.into())
    }

    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }

    #[must_use]
    pub fn parse(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            name: name.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    #[must_use]
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LabelNotFound(_) | Self::FileNotFound(_))
    }

    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::LabelNotFound(_) | Self::FileNotFound(_) => 404,
            Self::InvalidArgument(_) => 400,
            Self::Parse { .. } | Self::Internal(_) => 500,
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
