use thiserror::Error;

/// Errors raised while decoding wire data or parsing textual configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Datagram shorter than label plus boundary vector
    #[error("datagram truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Rule notation that is not `B<digits>/S<digits>`
    #[error("invalid rule notation '{0}'")]
    RuleNotation(String),

    /// Text pattern that cannot be loaded into a grid
    #[error("invalid grid pattern: {0}")]
    Pattern(String),

    /// Neighbor count outside the Moore neighborhood
    #[error("neighbor count {0} outside 0..=8")]
    NeighborCount(u8),
}
