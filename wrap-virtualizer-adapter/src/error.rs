use alloc::string::String;

/// Why a single index was skipped during a realize pass.
///
/// These never abort a pass: the index simply stays unrendered until a later pass succeeds.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RealizeError {
    #[error("index {index} is outside the collection (count {count})")]
    OutOfRange { index: usize, count: usize },

    #[error("item source returned no item at index {index}")]
    MissingItem { index: usize },

    #[error("element factory failed at index {index}: {message}")]
    Factory { index: usize, message: String },
}

impl RealizeError {
    pub fn index(&self) -> usize {
        match self {
            Self::OutOfRange { index, .. }
            | Self::MissingItem { index }
            | Self::Factory { index, .. } => *index,
        }
    }
}
