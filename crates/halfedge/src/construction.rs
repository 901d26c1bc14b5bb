//! Construction methods for HalfEdgeMesh.

use glam::Vec3;
use std::collections::HashMap;

use super::indexed::{IndexedMesh, TriangleBuffers};
use super::types::{Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, Vertex, VertexId};
use super::HalfEdgeMesh;

impl HalfEdgeMesh {
    /// Build a half-edge mesh from an indexed mesh
    ///
    /// Every face must be a triangle over distinct, in-range vertices, and the
    /// result must be manifold: each directed edge belongs to at most one face
    /// and each vertex has at most one outgoing boundary half-edge. Vertices not
    /// referenced by any face are kept as isolated vertices.
    pub fn from_indexed(source: &IndexedMesh) -> Result<Self, HalfEdgeError> {
        let vertex_count = source.positions.len();

        // === Input validation (nothing is built until the input is known good) ===
        if let Some(bad) = source.positions.iter().position(|p| !p.is_finite()) {
            return Err(HalfEdgeError::NonFinitePosition(bad as u32));
        }

        for (face_idx, face) in source.faces.iter().enumerate() {
            if face.len() != 3 {
                return Err(HalfEdgeError::NonTriangularFace {
                    face: face_idx,
                    sides: face.len(),
                });
            }
            for &v in face {
                if v as usize >= vertex_count {
                    return Err(HalfEdgeError::VertexIndexOutOfRange {
                        face: face_idx,
                        vertex: v,
                        vertex_count,
                    });
                }
            }
            if face[0] == face[1] || face[0] == face[2] {
                return Err(HalfEdgeError::DegenerateFace {
                    face: face_idx,
                    vertex: face[0],
                });
            }
            if face[1] == face[2] {
                return Err(HalfEdgeError::DegenerateFace {
                    face: face_idx,
                    vertex: face[1],
                });
            }
        }

        let mut mesh = Self {
            vertices: source
                .positions
                .iter()
                .enumerate()
                .map(|(i, &position)| Vertex {
                    id: VertexId(i as u32),
                    position,
                    outgoing_half_edge: None,
                })
                .collect(),
            half_edges: Vec::with_capacity(source.faces.len() * 4),
            faces: Vec::with_capacity(source.faces.len()),
        };

        // Map from (origin, destination) to half-edge. Both directions are
        // registered when a pair is allocated, so the second face using an
        // edge picks up the twin allocated by the first.
        let mut edge_map: HashMap<(VertexId, VertexId), HalfEdgeId> = HashMap::new();

        for (face_idx, tri) in source.faces.iter().enumerate() {
            let face_id = FaceId(face_idx as u32);
            let mut loop_ids = [HalfEdgeId(0); 3];

            for corner in 0..3 {
                let from = VertexId(tri[corner]);
                let to = VertexId(tri[(corner + 1) % 3]);

                let he_id = match edge_map.get(&(from, to)) {
                    Some(&existing) => {
                        if mesh.half_edges[existing.index()].face.is_some() {
                            return Err(HalfEdgeError::NonManifoldEdge {
                                from: from.0,
                                to: to.0,
                            });
                        }
                        existing
                    }
                    None => {
                        let id = mesh.push_pair(from, to);
                        edge_map.insert((from, to), id);
                        edge_map.insert((to, from), id.twin());
                        id
                    }
                };

                mesh.half_edges[he_id.index()].face = Some(face_id);
                loop_ids[corner] = he_id;
            }

            for corner in 0..3 {
                let he = &mut mesh.half_edges[loop_ids[corner].index()];
                he.next = loop_ids[(corner + 1) % 3];
                he.prev = loop_ids[(corner + 2) % 3];
            }

            mesh.faces.push(Face {
                id: face_id,
                half_edge: loop_ids[0],
            });
        }

        mesh.link_boundary_loops()?;
        mesh.assign_outgoing_half_edges();

        let boundary = mesh
            .half_edges
            .iter()
            .filter(|he| he.face.is_none())
            .count();
        tracing::debug!(
            "from_indexed: {} vertices, {} faces, {} edges ({} boundary)",
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.edge_count(),
            boundary
        );

        Ok(mesh)
    }

    /// Chain every face-less half-edge to the face-less half-edge leaving its
    /// destination, forming closed boundary loops.
    fn link_boundary_loops(&mut self) -> Result<(), HalfEdgeError> {
        let mut boundary_out: HashMap<VertexId, HalfEdgeId> = HashMap::new();
        for he in self.half_edges.iter().filter(|he| he.face.is_none()) {
            if boundary_out.insert(he.origin, he.id).is_some() {
                return Err(HalfEdgeError::NonManifoldVertex(he.origin.0));
            }
        }

        for i in 0..self.half_edges.len() {
            if self.half_edges[i].face.is_some() {
                continue;
            }
            let he_id = HalfEdgeId(i as u32);
            let dest = self.half_edges[he_id.twin().index()].origin;
            let next = *boundary_out.get(&dest).ok_or_else(|| {
                HalfEdgeError::InvalidTopology(format!(
                    "boundary half-edge {} ends at vertex {} which has no outgoing boundary",
                    i, dest.0
                ))
            })?;
            self.half_edges[i].next = next;
            self.half_edges[next.index()].prev = he_id;
        }

        Ok(())
    }

    /// Boundary vertices get their boundary half-edge so one-ring walks start
    /// at the open side; interior vertices take the first half-edge seen.
    fn assign_outgoing_half_edges(&mut self) {
        for he in &self.half_edges {
            let v = &mut self.vertices[he.origin.index()];
            match v.outgoing_half_edge {
                None => v.outgoing_half_edge = Some(he.id),
                Some(_) if he.face.is_none() => v.outgoing_half_edge = Some(he.id),
                Some(_) => {}
            }
        }
    }

    /// Append a fresh twin pair `from -> to` / `to -> from` with no faces.
    ///
    /// Both half-edges start as one-element cycles; the caller links them.
    pub(crate) fn push_pair(&mut self, from: VertexId, to: VertexId) -> HalfEdgeId {
        let id = HalfEdgeId(self.half_edges.len() as u32);
        let twin = id.twin();
        self.half_edges.push(HalfEdge {
            id,
            origin: from,
            next: id,
            prev: id,
            face: None,
        });
        self.half_edges.push(HalfEdge {
            id: twin,
            origin: to,
            next: twin,
            prev: twin,
            face: None,
        });
        id
    }

    /// Convert back to an indexed mesh (shared vertices, one triple per face)
    pub fn to_indexed(&self) -> IndexedMesh {
        IndexedMesh {
            positions: self.vertices.iter().map(|v| v.position).collect(),
            faces: self
                .faces
                .iter()
                .map(|f| self.face_vertices(f.id).iter().map(|v| v.0).collect())
                .collect(),
        }
    }

    /// Flatten into GPU-ready position and index buffers.
    pub fn triangle_buffers(&self) -> TriangleBuffers {
        TriangleBuffers {
            positions: self
                .vertices
                .iter()
                .map(|v| v.position.to_array())
                .collect(),
            indices: self
                .faces
                .iter()
                .flat_map(|f| self.face_vertices(f.id))
                .map(|v| v.0)
                .collect(),
        }
    }

    /// Snapshot of every vertex position, indexed by vertex id.
    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|v| v.position).collect()
    }
}
