use serde::{Deserialize, Serialize};

/// Failures surfaced by graph construction and the decomposition engine.
///
/// `InvalidVertex` is the only error regular callers can trigger; `Internal`
/// means a defensive check in the engine tripped, which is a bug in this
/// crate, not in the input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error, Serialize,
    Deserialize,
)]
pub enum Error {
    #[error("vertex {vertex} out of range for graph of order {order}")]
    InvalidVertex { vertex: usize, order: usize },
    #[error("internal invariant violated: {0}")]
    Internal(&'static str),
}
