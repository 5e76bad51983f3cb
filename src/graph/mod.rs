//! Graph view over the flat representation.
//!
//! [`FlatGraph`] is built from a [`FlatProcess`](crate::model::FlatProcess)
//! by [`build_flat_graph`] and serves the reconstruction walk in
//! [`unflatten`](crate::unflatten) with ordered successor queries.

pub mod builder;
pub mod types;

pub use builder::*;
pub use types::*;
