//! Topology query methods for HalfEdgeMesh.
//!
//! The `Option`-returning accessors tolerate unknown ids. The raw adjacency
//! queries (`origin`, `next`, `prev`, ...) take ids that were produced by the
//! mesh itself and panic when handed anything else.

use glam::Vec3;

use super::types::{Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
use super::HalfEdgeMesh;

impl HalfEdgeMesh {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    /// Get half-edge by ID
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.index())
    }

    /// Get face by ID
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index())
    }

    /// Get all vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get all half-edges
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// Get all faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges (always even)
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.half_edges.len() / 2
    }

    /// The canonical (even) half-edge of every undirected edge, in allocation order.
    pub fn edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.half_edges.len())
            .step_by(2)
            .map(|i| HalfEdgeId(i as u32))
    }

    // ========================================================================
    // Raw adjacency (panics on ids the mesh never produced)
    // ========================================================================

    /// Position of a vertex.
    ///
    /// # Panics
    /// If `v` is out of range.
    #[inline]
    pub fn position(&self, v: VertexId) -> Vec3 {
        self.vertices[v.index()].position
    }

    /// Start vertex of a half-edge.
    ///
    /// # Panics
    /// If `h` is out of range.
    #[inline]
    pub fn origin(&self, h: HalfEdgeId) -> VertexId {
        self.half_edges[h.index()].origin
    }

    /// End vertex of a half-edge (the start of its twin).
    #[inline]
    pub fn dest(&self, h: HalfEdgeId) -> VertexId {
        self.half_edges[h.twin().index()].origin
    }

    /// Opposite half-edge of the same undirected edge.
    ///
    /// # Panics
    /// If `h` is out of range.
    #[inline]
    pub fn twin(&self, h: HalfEdgeId) -> HalfEdgeId {
        assert!(h.index() < self.half_edges.len(), "half-edge {} out of range", h.0);
        h.twin()
    }

    #[inline]
    pub fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h.index()].next
    }

    #[inline]
    pub fn prev(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h.index()].prev
    }

    /// Face on the left of `h`, or `None` for a boundary half-edge.
    #[inline]
    pub fn half_edge_face(&self, h: HalfEdgeId) -> Option<FaceId> {
        self.half_edges[h.index()].face
    }

    /// One half-edge bounding `f`.
    #[inline]
    pub fn face_half_edge(&self, f: FaceId) -> HalfEdgeId {
        self.faces[f.index()].half_edge
    }

    /// Both endpoints of the edge `h` belongs to, as `(origin, dest)`.
    #[inline]
    pub fn edge_endpoints(&self, h: HalfEdgeId) -> (VertexId, VertexId) {
        (self.origin(h), self.dest(h))
    }

    pub fn edge_length(&self, h: HalfEdgeId) -> f32 {
        let (a, b) = self.edge_endpoints(h);
        self.position(a).distance(self.position(b))
    }

    /// Third corner of the triangle on the left of `h`, if there is one.
    pub fn opposite_vertex(&self, h: HalfEdgeId) -> Option<VertexId> {
        self.half_edge_face(h)?;
        Some(self.origin(self.prev(h)))
    }

    // ========================================================================
    // Topology Queries
    // ========================================================================

    /// Every outgoing half-edge of a vertex, walking `twin(prev(h))`.
    ///
    /// Boundary half-edges are part of the walk because boundary loops are
    /// linked, so the walk closes for every manifold vertex.
    pub fn vertex_outgoing(&self, vertex_id: VertexId) -> Vec<HalfEdgeId> {
        let mut outgoing = Vec::new();
        let Some(start) = self.vertex(vertex_id).and_then(|v| v.outgoing_half_edge) else {
            return outgoing;
        };

        let mut current = start;
        loop {
            outgoing.push(current);
            current = self.prev(current).twin();
            if current == start || outgoing.len() > self.half_edges.len() {
                break;
            }
        }

        outgoing
    }

    /// Get all faces adjacent to a vertex
    pub fn vertex_faces(&self, vertex_id: VertexId) -> Vec<FaceId> {
        self.vertex_outgoing(vertex_id)
            .into_iter()
            .filter_map(|h| self.half_edge_face(h))
            .collect()
    }

    /// Get all vertices adjacent to a vertex (connected by an edge)
    pub fn vertex_neighbors(&self, vertex_id: VertexId) -> Vec<VertexId> {
        self.vertex_outgoing(vertex_id)
            .into_iter()
            .map(|h| self.dest(h))
            .collect()
    }

    /// Get the vertices of a face in order
    pub fn face_vertices(&self, face_id: FaceId) -> Vec<VertexId> {
        self.face_half_edges(face_id)
            .into_iter()
            .map(|h| self.origin(h))
            .collect()
    }

    /// Get the half-edges forming the boundary of a face
    pub fn face_half_edges(&self, face_id: FaceId) -> Vec<HalfEdgeId> {
        let mut edges = Vec::new();
        let Some(face) = self.face(face_id) else {
            return edges;
        };

        let start_he = face.half_edge;
        let mut current = start_he;

        loop {
            edges.push(current);
            current = self.next(current);
            if current == start_he || edges.len() > self.half_edges.len() {
                break;
            }
        }

        edges
    }

    /// Get the two faces adjacent to an edge (via half-edge)
    /// Returns (face of this half-edge, face of twin half-edge)
    pub fn edge_faces(&self, h: HalfEdgeId) -> (Option<FaceId>, Option<FaceId>) {
        (self.half_edge_face(h), self.half_edge_face(h.twin()))
    }

    /// Find a half-edge by its origin and destination vertices
    pub fn find_half_edge(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.vertex_outgoing(from)
            .into_iter()
            .find(|&h| self.dest(h) == to)
    }

    /// Check if an edge lies on the boundary (either side has no face)
    pub fn is_boundary_edge(&self, h: HalfEdgeId) -> bool {
        let (a, b) = self.edge_faces(h);
        a.is_none() || b.is_none()
    }

    /// Check if a vertex is on the boundary
    pub fn is_boundary_vertex(&self, vertex_id: VertexId) -> bool {
        self.vertex_outgoing(vertex_id)
            .into_iter()
            .any(|h| self.half_edge_face(h).is_none())
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Unnormalized face normal; its length is twice the triangle area.
    pub fn face_normal(&self, face_id: FaceId) -> Vec3 {
        let verts = self.face_vertices(face_id);
        if verts.len() < 3 {
            return Vec3::ZERO;
        }
        let p0 = self.position(verts[0]);
        let p1 = self.position(verts[1]);
        let p2 = self.position(verts[2]);
        (p1 - p0).cross(p2 - p0)
    }

    /// Area-weighted vertex normal, zero for isolated or fully degenerate vertices.
    pub fn vertex_normal(&self, vertex_id: VertexId) -> Vec3 {
        self.vertex_faces(vertex_id)
            .into_iter()
            .map(|f| self.face_normal(f))
            .sum::<Vec3>()
            .normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::super::IndexedMesh;
    use super::*;

    /// Hexagonal fan: center vertex 0 surrounded by vertices 1..=6.
    fn hexagon_fan() -> HalfEdgeMesh {
        let mut positions = vec![Vec3::ZERO];
        for i in 0..6 {
            let angle = i as f32 * std::f32::consts::TAU / 6.0;
            positions.push(Vec3::new(angle.cos(), angle.sin(), 0.0));
        }
        let triangles: Vec<[u32; 3]> = (0..6u32).map(|i| [0, 1 + i, 1 + (i + 1) % 6]).collect();
        HalfEdgeMesh::from_indexed(&IndexedMesh::from_triangles(positions, &triangles)).unwrap()
    }

    #[test]
    fn test_interior_vertex_ring() {
        let mesh = hexagon_fan();

        let mut neighbors = mesh.vertex_neighbors(VertexId(0));
        neighbors.sort();
        assert_eq!(neighbors, (1..=6).map(VertexId).collect::<Vec<_>>());
        assert_eq!(mesh.vertex_faces(VertexId(0)).len(), 6);
        assert!(!mesh.is_boundary_vertex(VertexId(0)));
    }

    #[test]
    fn test_boundary_vertex_ring() {
        let mesh = hexagon_fan();

        let mut neighbors = mesh.vertex_neighbors(VertexId(1));
        neighbors.sort();
        assert_eq!(neighbors, vec![VertexId(0), VertexId(2), VertexId(6)]);
        assert_eq!(mesh.vertex_faces(VertexId(1)).len(), 2);
        assert!(mesh.is_boundary_vertex(VertexId(1)));
    }

    #[test]
    fn test_opposite_vertex_across_spoke() {
        let mesh = hexagon_fan();
        let spoke = mesh.find_half_edge(VertexId(0), VertexId(1)).unwrap();

        let mut corners = [
            mesh.opposite_vertex(spoke).unwrap(),
            mesh.opposite_vertex(spoke.twin()).unwrap(),
        ];
        corners.sort();
        assert_eq!(corners, [VertexId(2), VertexId(6)]);
        assert!(!mesh.is_boundary_edge(spoke));
    }

    #[test]
    fn test_rim_edge_is_boundary() {
        let mesh = hexagon_fan();
        let rim = mesh.find_half_edge(VertexId(1), VertexId(2)).unwrap();

        assert!(mesh.is_boundary_edge(rim));
        assert!(mesh.opposite_vertex(rim.twin()).is_none());
        assert!((mesh.edge_length(rim) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_vertex_normal_of_flat_fan() {
        let mesh = hexagon_fan();
        let n = mesh.vertex_normal(VertexId(0));
        assert!((n - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_edges_iterates_even_ids() {
        let mesh = hexagon_fan();
        let edges: Vec<_> = mesh.edges().collect();

        assert_eq!(edges.len(), 12);
        assert!(edges.iter().all(|h| h.0 % 2 == 0));
    }

    #[test]
    #[should_panic]
    fn test_origin_out_of_range_panics() {
        let mesh = hexagon_fan();
        mesh.origin(HalfEdgeId(10_000));
    }
}
