/// Error types for scene loading, configuration and buffer construction
use thiserror::Error;

/// Failures of the line/character cursor over scene text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// Reached the end of the document while searching for a marker
    #[error("unexpected end of input while searching for marker `{marker}`")]
    UnexpectedEof { marker: String },

    /// Token could not be read as the expected number type
    #[error("invalid number `{token}` on line {line}")]
    InvalidNumber { token: String, line: usize },
}

/// Failures while turning scene text into an [`Object`](crate::mesh::Object).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A face references a vertex outside the mesh's vertex list
    #[error("mesh `{mesh}`: face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndex {
        mesh: String,
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    /// A vertex normal is assigned to a vertex that does not exist
    #[error("mesh `{mesh}`: vertex normal for vertex {index}, but the mesh has {vertex_count} vertices")]
    NormalIndex {
        mesh: String,
        index: usize,
        vertex_count: usize,
    },

    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Broken mesh invariant reported by [`Mesh::validate`](crate::mesh::Mesh::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshDefect {
    /// A polygon references a vertex that does not exist
    #[error("face {face} references missing vertex {index}")]
    FaceIndex { face: usize, index: usize },

    /// Normals and positions are not index-aligned
    #[error("{normals} normals for {vertices} vertices")]
    NormalCount { normals: usize, vertices: usize },

    /// Every polygon needs exactly one outline entry
    #[error("{outlines} outlines for {polygons} polygons")]
    OutlineCount { outlines: usize, polygons: usize },
}

/// Raw pixel data does not match the declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pixel data has {actual} bytes, expected {expected}")]
pub struct BufferError {
    pub expected: usize,
    pub actual: usize,
}
