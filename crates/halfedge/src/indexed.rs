//! Generic indexed mesh representation used to exchange meshes with a host.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Vertex positions plus per-face vertex indices.
///
/// This is the format starting meshes arrive in and simulation results leave
/// in. Faces are stored as index lists so that malformed input (quads, n-gons)
/// can be represented and rejected with a precise error instead of being
/// silently dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedMesh {
    pub positions: Vec<Vec3>,
    pub faces: Vec<Vec<u32>>,
}

impl IndexedMesh {
    pub fn new(positions: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        Self { positions, faces }
    }

    /// Build from a triangle list.
    pub fn from_triangles(positions: Vec<Vec3>, triangles: &[[u32; 3]]) -> Self {
        Self {
            positions,
            faces: triangles.iter().map(|t| t.to_vec()).collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Flat, GPU-ready buffers for a triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleBuffers {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl TriangleBuffers {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw bytes of the position buffer, suitable for a vertex buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the index buffer (u32 triangle list).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
