use thiserror::Error;

/// Errors reported by [`HashMap`](crate::HashMap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested operation is not implemented by this map and never
    /// produces a partial result.
    #[error("{operation} is not supported by this map")]
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
    },
}
