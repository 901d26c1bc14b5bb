//! Half-edge mesh data structure for growth simulation
//!
//! Provides topology information (vertex one-rings, the triangles on either
//! side of an edge, boundary loops) that is not available in a simple
//! indexed triangle list, plus in-place edge splitting.
//!
//! Half-edges are allocated in twin pairs: the half-edges at `2k` and `2k + 1`
//! always describe the same undirected edge in opposite directions. Elements are
//! never removed, so ids handed out by the mesh stay valid for its lifetime.

mod construction;
mod indexed;
mod modification;
mod topology;
mod types;
mod validation;

pub use indexed::{IndexedMesh, TriangleBuffers};
pub use types::{
    Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, SplitResult, Vertex, VertexId,
};

/// Half-edge mesh data structure
///
/// Sole owner of vertex, half-edge and face storage. All mutation goes through
/// [`HalfEdgeMesh::set_vertex_position`], [`HalfEdgeMesh::split_edge`] and
/// [`HalfEdgeMesh::split_face`].
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) half_edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
}
