use thiserror::Error;

/// Result type for linkage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by evaluation, authoring and layering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The mechanism cannot be assembled at this drive angle (lock-up).
    /// Expected during animation and dragging; callers recover locally.
    #[error("infeasible configuration: {reason}")]
    InfeasibleConfiguration { reason: &'static str },

    #[error("unknown point reference: {0}")]
    UnknownPointReference(String),

    #[error("malformed linkage: {reason}")]
    MalformedLinkage { reason: String },

    #[error("no layering solution found")]
    NoLayeringSolution,
}

impl Error {
    pub(crate) fn infeasible(reason: &'static str) -> Self {
        Self::InfeasibleConfiguration { reason }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedLinkage {
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownPointReference(name.into())
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::InfeasibleConfiguration { .. })
    }
}
