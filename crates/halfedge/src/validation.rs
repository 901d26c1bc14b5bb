//! Validation methods for HalfEdgeMesh.
//!
//! Checks the structural invariants every edit must preserve:
//! - Half-edges come in twin pairs whose endpoints mirror each other
//! - `next`/`prev` are inverse permutations and never leave a face
//! - Every face is a triangle whose half-edges all point back at it
//! - Every vertex's outgoing half-edge actually leaves that vertex

use super::types::{FaceId, HalfEdgeError, HalfEdgeId};
use super::HalfEdgeMesh;

fn invalid(msg: String) -> HalfEdgeError {
    HalfEdgeError::InvalidTopology(msg)
}

impl HalfEdgeMesh {
    /// Validate the mesh topology.
    pub fn validate(&self) -> Result<(), HalfEdgeError> {
        let he_count = self.half_edges.len();
        if he_count % 2 != 0 {
            return Err(invalid(format!("odd half-edge count {}", he_count)));
        }

        for (i, he) in self.half_edges.iter().enumerate() {
            let id = HalfEdgeId(i as u32);
            if he.id != id {
                return Err(invalid(format!("half-edge slot {} stores id {:?}", i, he.id)));
            }
            if he.next.index() >= he_count || he.prev.index() >= he_count {
                return Err(invalid(format!("half-edge {} links out of range", i)));
            }
            if he.origin.index() >= self.vertices.len() {
                return Err(invalid(format!(
                    "half-edge {} starts at missing vertex {}",
                    i, he.origin.0
                )));
            }

            // twin(twin(h)) == h holds by construction; the endpoints must agree too.
            if self.origin(self.next(id)) != self.dest(id) {
                return Err(invalid(format!(
                    "half-edge {}: next starts at {:?}, twin starts at {:?}",
                    i,
                    self.origin(self.next(id)),
                    self.dest(id)
                )));
            }
            if self.dest(id) == he.origin {
                return Err(invalid(format!("half-edge {} is a loop", i)));
            }

            if self.next(self.prev(id)) != id {
                return Err(invalid(format!(
                    "half-edge {}: prev.next = {:?}",
                    i,
                    self.next(self.prev(id))
                )));
            }
            if self.prev(self.next(id)) != id {
                return Err(invalid(format!(
                    "half-edge {}: next.prev = {:?}",
                    i,
                    self.prev(self.next(id))
                )));
            }
            if self.half_edge_face(he.next) != he.face {
                return Err(invalid(format!(
                    "half-edge {} and its next disagree on face",
                    i
                )));
            }
            if let Some(face) = he.face {
                if face.index() >= self.faces.len() {
                    return Err(invalid(format!("half-edge {} on missing face {}", i, face.0)));
                }
            }
        }

        for (i, face) in self.faces.iter().enumerate() {
            let face_id = FaceId(i as u32);
            if face.id != face_id {
                return Err(invalid(format!("face slot {} stores id {:?}", i, face.id)));
            }

            let start = face.half_edge;
            if start.index() >= he_count {
                return Err(invalid(format!("face {} starts at missing half-edge", i)));
            }

            let mut current = start;
            for _ in 0..3 {
                if self.half_edge_face(current) != Some(face_id) {
                    return Err(invalid(format!(
                        "face {}: half-edge {} belongs to {:?}",
                        i,
                        current.0,
                        self.half_edge_face(current)
                    )));
                }
                current = self.next(current);
            }
            if current != start {
                return Err(HalfEdgeError::NonTriangularFace {
                    face: i,
                    sides: self.face_half_edges(face_id).len(),
                });
            }
        }

        for v in &self.vertices {
            if let Some(he) = v.outgoing_half_edge {
                if he.index() >= he_count || self.origin(he) != v.id {
                    return Err(invalid(format!(
                        "vertex {}: outgoing half-edge {} does not leave it",
                        v.id.0, he.0
                    )));
                }
            }
        }

        Ok(())
    }
}
