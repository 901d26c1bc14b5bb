//! Modification methods for HalfEdgeMesh.
//!
//! Topology edits gather and validate everything they need before the first
//! write, so a failed edit leaves the mesh untouched.

use glam::Vec3;
use tracing::trace;

use super::types::{Face, FaceId, HalfEdgeError, HalfEdgeId, SplitResult, Vertex, VertexId};
use super::HalfEdgeMesh;

impl HalfEdgeMesh {
    /// Set the position of a vertex
    ///
    /// # Panics
    /// If `vertex_id` is out of range.
    pub fn set_vertex_position(&mut self, vertex_id: VertexId, position: Vec3) {
        self.vertices[vertex_id.index()].position = position;
    }

    fn push_vertex(&mut self, position: Vec3) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            id,
            position,
            outgoing_half_edge: None,
        });
        id
    }

    fn check_half_edge(&self, h: HalfEdgeId) -> Result<(), HalfEdgeError> {
        if h.index() < self.half_edges.len() {
            Ok(())
        } else {
            Err(HalfEdgeError::HalfEdgeOutOfRange(h.0))
        }
    }

    fn check_triangle(&self, face: FaceId) -> Result<(), HalfEdgeError> {
        let sides = self.face_half_edges(face).len();
        if sides == 3 {
            Ok(())
        } else {
            Err(HalfEdgeError::NonTriangularFace {
                face: face.index(),
                sides,
            })
        }
    }

    /// Split an edge, creating a new vertex at the midpoint and subdividing adjacent faces.
    ///
    /// For edge AB with triangle ABC on the left of `edge_id` and ABD on the
    /// right, the split produces midpoint M and triangles AMC, MBC, MAD, BMD.
    /// One side may be open; the open side stays in its boundary loop.
    ///
    /// ```text
    ///     Before:              After:
    ///        C                    C
    ///       / \                  /|\
    ///      /   \                / | \
    ///     A-----B      ->      A--M--B
    ///      \   /                \ | /
    ///       \ /                  \|/
    ///        D                    D
    /// ```
    ///
    /// `edge_id` keeps running A -> M, its twin becomes M -> A, and the new
    /// pair covers M -> B / B -> M. Vertex count grows by exactly one and face
    /// count by the number of sides that had a face.
    pub fn split_edge(&mut self, edge_id: HalfEdgeId) -> Result<SplitResult, HalfEdgeError> {
        // ===== PHASE 1: GATHER & VALIDATE (read-only) =====
        self.check_half_edge(edge_id)?;
        let twin_id = edge_id.twin();

        let left_face = self.half_edge_face(edge_id);
        let right_face = self.half_edge_face(twin_id);
        if left_face.is_none() && right_face.is_none() {
            return Err(HalfEdgeError::InvalidTopology(format!(
                "edge {} has no adjacent face",
                edge_id.edge().0
            )));
        }
        if let Some(f) = left_face {
            self.check_triangle(f)?;
        }
        if let Some(f) = right_face {
            self.check_triangle(f)?;
        }

        let v_a = self.origin(edge_id);
        let v_b = self.origin(twin_id);
        let next_id = self.next(edge_id);
        let twin_prev_id = self.prev(twin_id);

        trace!(
            "split_edge: START edge={:?} a={:?} b={:?} faces=({:?}, {:?})",
            edge_id, v_a, v_b, left_face, right_face
        );

        // ===== PHASE 2: NEW VERTEX & PAIR =====
        let mid_pos = (self.position(v_a) + self.position(v_b)) * 0.5;
        let v_m = self.push_vertex(mid_pos);

        // he_mb: M -> B (left side), he_bm: B -> M (right side)
        let he_mb = self.push_pair(v_m, v_b);
        let he_bm = he_mb.twin();

        // ===== PHASE 3: REWIRE THE SPLIT EDGE =====
        // Left cycle: ... -> A->M -> M->B -> next ...
        {
            let he = &mut self.half_edges[he_mb.index()];
            he.face = left_face;
            he.prev = edge_id;
            he.next = next_id;
        }
        self.half_edges[edge_id.index()].next = he_mb;
        self.half_edges[next_id.index()].prev = he_mb;

        // Right cycle: ... -> twin_prev -> B->M -> M->A -> ...
        {
            let he = &mut self.half_edges[he_bm.index()];
            he.face = right_face;
            he.prev = twin_prev_id;
            he.next = twin_id;
        }
        self.half_edges[twin_prev_id.index()].next = he_bm;
        self.half_edges[twin_id.index()].prev = he_bm;
        self.half_edges[twin_id.index()].origin = v_m;

        // ===== PHASE 4: VERTEX OUTGOING EDGES =====
        // The twin used to leave B; B now leaves through B->M instead.
        if self.vertices[v_b.index()].outgoing_half_edge == Some(twin_id) {
            self.vertices[v_b.index()].outgoing_half_edge = Some(he_bm);
        }
        // Prefer a boundary half-edge for M so one-ring walks start on the open side.
        self.vertices[v_m.index()].outgoing_half_edge = Some(if right_face.is_none() {
            twin_id
        } else {
            he_mb
        });

        // ===== PHASE 5: RE-TRIANGULATE EACH FACED SIDE =====
        // Left quad A-M-B-C: connect M to C (origin of A's predecessor).
        let mut new_faces = Vec::with_capacity(2);
        if left_face.is_some() {
            let to_c = self.prev(edge_id);
            new_faces.push(self.split_face(he_mb, to_c)?);
        }
        // Right quad B-M-A-D: connect M to D (origin of the half-edge after M->A->D).
        if right_face.is_some() {
            let to_d = self.next(self.next(twin_id));
            new_faces.push(self.split_face(twin_id, to_d)?);
        }

        trace!(
            "split_edge: END vertex={:?} new_half_edge={:?} new_faces={:?}",
            v_m, he_mb, new_faces
        );

        Ok(SplitResult {
            new_vertex: v_m,
            new_half_edge: he_mb,
            new_faces,
        })
    }

    /// Split a face by inserting a diagonal between the origins of `from` and `to`.
    ///
    /// Both half-edges must bound the same face and must not be neighbors in
    /// its cycle (the diagonal would duplicate an existing side). The cycle
    /// starting at `from` moves to the returned new face; the cycle starting at
    /// `to` keeps the original face.
    pub fn split_face(&mut self, from: HalfEdgeId, to: HalfEdgeId) -> Result<FaceId, HalfEdgeError> {
        // ===== PHASE 1: GATHER & VALIDATE =====
        self.check_half_edge(from)?;
        self.check_half_edge(to)?;

        let face_id = match (self.half_edge_face(from), self.half_edge_face(to)) {
            (Some(a), Some(b)) if a == b => a,
            _ => {
                return Err(HalfEdgeError::NotSameFace {
                    from: from.0,
                    to: to.0,
                });
            }
        };
        if from == to || self.next(from) == to || self.next(to) == from {
            return Err(HalfEdgeError::InvalidTopology(format!(
                "half-edges {} and {} are adjacent in face {}",
                from.0, to.0, face_id.0
            )));
        }

        let v_from = self.origin(from);
        let v_to = self.origin(to);
        let prev_from = self.prev(from);
        let prev_to = self.prev(to);

        // ===== PHASE 2: CREATE DIAGONAL =====
        // closing: v_to -> v_from closes the `from` cycle,
        // opening: v_from -> v_to closes the `to` cycle.
        let closing = self.push_pair(v_to, v_from);
        let opening = closing.twin();

        let new_face_id = FaceId(self.faces.len() as u32);
        self.faces.push(Face {
            id: new_face_id,
            half_edge: from,
        });

        // ===== PHASE 3: REWIRE =====
        self.half_edges[prev_to.index()].next = closing;
        self.half_edges[closing.index()].prev = prev_to;
        self.half_edges[closing.index()].next = from;
        self.half_edges[from.index()].prev = closing;

        self.half_edges[prev_from.index()].next = opening;
        self.half_edges[opening.index()].prev = prev_from;
        self.half_edges[opening.index()].next = to;
        self.half_edges[to.index()].prev = opening;

        // ===== PHASE 4: FACE ASSIGNMENT =====
        let mut current = from;
        loop {
            self.half_edges[current.index()].face = Some(new_face_id);
            current = self.next(current);
            if current == from {
                break;
            }
        }
        self.half_edges[opening.index()].face = Some(face_id);
        self.faces[face_id.index()].half_edge = to;

        trace!(
            "split_face: face={:?} diagonal {:?}<->{:?} new_face={:?}",
            face_id, v_from, v_to, new_face_id
        );

        Ok(new_face_id)
    }
}
