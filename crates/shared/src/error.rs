//! Error types for loading map assets.
//!
//! Only asset loading can fail. Projection, selection, framing and content
//! lookup recover locally and never return these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a TopoJSON Topology, found type {0:?}")]
    NotATopology(String),

    #[error("Topology has no object named {0:?}")]
    MissingObject(String),

    #[error("Arc index {index} out of range ({arcs} arcs)")]
    ArcOutOfRange { index: i64, arcs: usize },

    #[error("Geometry #{index} has no {property:?} property")]
    MissingProperty { index: usize, property: String },

    #[error("Duplicate region id {0:?}")]
    DuplicateRegion(String),
}

/// Result type alias for asset loading.
pub type Result<T> = std::result::Result<T, Error>;
