//! Type definitions for the half-edge mesh data structure.

use glam::Vec3;

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

impl VertexId {
    /// Position of this vertex in the mesh's vertex arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type-safe half-edge identifier
///
/// Half-edges are always allocated in pairs occupying slots `2k` and `2k + 1`,
/// so the twin of any half-edge is found by flipping the lowest bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub u32);

impl HalfEdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The oppositely directed half of the same undirected edge.
    #[inline]
    pub fn twin(self) -> HalfEdgeId {
        HalfEdgeId(self.0 ^ 1)
    }

    /// The even member of the pair, used as the canonical id of the undirected edge.
    #[inline]
    pub fn edge(self) -> HalfEdgeId {
        HalfEdgeId(self.0 & !1)
    }
}

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

impl FaceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A vertex in the half-edge mesh
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Vec3,
    /// One outgoing half-edge from this vertex (the boundary one, if the vertex is on a boundary)
    pub outgoing_half_edge: Option<HalfEdgeId>,
}

/// A half-edge in the mesh
///
/// Boundary half-edges have no face and are chained into boundary loops
/// through `next`/`prev`, so every half-edge has a valid cycle.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pub id: HalfEdgeId,
    /// The vertex this half-edge originates from
    pub origin: VertexId,
    /// The next half-edge around the face (counter-clockwise)
    pub next: HalfEdgeId,
    /// The previous half-edge around the face (counter-clockwise)
    pub prev: HalfEdgeId,
    /// The face this half-edge borders (None for boundary half-edges)
    pub face: Option<FaceId>,
}

/// A triangular face in the mesh
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    /// One half-edge on the boundary of this face
    pub half_edge: HalfEdgeId,
}

/// Result of splitting an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    /// The new vertex created at the midpoint
    pub new_vertex: VertexId,
    /// Half-edge running from the new vertex to the original destination
    pub new_half_edge: HalfEdgeId,
    /// Faces created by re-triangulating the sides that had a face
    pub new_faces: Vec<FaceId>,
}

/// Errors that can occur during half-edge mesh operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HalfEdgeError {
    #[error("Vertex {0} has a non-finite position")]
    NonFinitePosition(u32),
    #[error("Face {face} has {sides} sides; only triangles are supported")]
    NonTriangularFace { face: usize, sides: usize },
    #[error("Face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexIndexOutOfRange {
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },
    #[error("Face {face} uses vertex {vertex} more than once")]
    DegenerateFace { face: usize, vertex: u32 },
    #[error("Directed edge {from} -> {to} is shared by more than one face")]
    NonManifoldEdge { from: u32, to: u32 },
    #[error("Vertex {0} has more than one outgoing boundary half-edge")]
    NonManifoldVertex(u32),
    #[error("Half-edge {0} does not exist")]
    HalfEdgeOutOfRange(u32),
    #[error("Half-edges {from} and {to} do not bound the same face")]
    NotSameFace { from: u32, to: u32 },
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),
}
