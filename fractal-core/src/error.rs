use thiserror::Error;

/// Errors reported by the growth engine.
///
/// Both variants are terminal: generation is deterministic for a given
/// seed, so nothing here is worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    /// A growth parameter was rejected before it could affect a tree.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The tree reached its hard cap on created segments and stopped growing.
    #[error("segment cap of {cap} reached, growth halted")]
    SegmentCapExceeded { cap: usize },
}

impl GrowthError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
