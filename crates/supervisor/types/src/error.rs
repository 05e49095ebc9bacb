use derive_more::Display;

/// The kind of a failure, shared by storage and the safety checker.
///
/// Callers decide how to recover from an error based on its kind only. The error message is for
/// observability and carries no meaning.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The data is definitively contradictory, e.g. a hash, order or timestamp violation or a
    /// dependency cycle.
    #[display("conflict")]
    Conflict,
    /// The required data is not available yet. Retry later.
    #[display("future")]
    Future,
    /// The operation needs more source (L1) data than the current scope permits.
    #[display("out of scope")]
    OutOfScope,
    /// An invalidated block is waiting to be replaced before the chain can progress.
    #[display("awaiting replacement block")]
    AwaitReplacementBlock,
    /// Reads performed for the operation were invalidated by a concurrent rewind.
    #[display("invalidated read")]
    InvalidatedRead,
    /// Any other failure.
    #[display("other")]
    Other,
}
