//! Per-vertex weighted move accumulation.
//!
//! Every constraint adds `weight * move` and `weight` for each vertex it
//! touches. Integration moves each vertex by the weighted average of
//! everything it received, so constraints blend instead of fighting over the
//! last write.

use glam::Vec3;
use halfedge::{HalfEdgeMesh, VertexId};

/// Running sums for one step. Created zeroed at the start of the step and
/// dropped after integration.
#[derive(Debug, Clone, Default)]
pub struct MoveAccumulator {
    weighted_moves: Vec<Vec3>,
    weights: Vec<f32>,
}

impl MoveAccumulator {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            weighted_moves: vec![Vec3::ZERO; vertex_count],
            weights: vec![0.0; vertex_count],
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Add one weighted contribution for `vertex`.
    #[inline]
    pub fn add(&mut self, vertex: VertexId, movement: Vec3, weight: f32) {
        self.weighted_moves[vertex.index()] += movement * weight;
        self.weights[vertex.index()] += weight;
    }

    pub fn weighted_move(&self, vertex: VertexId) -> Vec3 {
        self.weighted_moves[vertex.index()]
    }

    pub fn weight(&self, vertex: VertexId) -> f32 {
        self.weights[vertex.index()]
    }

    /// Weighted average move, or `None` when the vertex received no weight
    /// or the average is not finite.
    pub fn average_move(&self, vertex: VertexId) -> Option<Vec3> {
        let weight = self.weights[vertex.index()];
        if weight <= 0.0 {
            return None;
        }
        let movement = self.weighted_moves[vertex.index()] / weight;
        movement.is_finite().then_some(movement)
    }

    /// Apply the averaged moves to the mesh. Returns the number of vertices moved.
    pub fn integrate(&self, mesh: &mut HalfEdgeMesh) -> usize {
        debug_assert_eq!(self.len(), mesh.vertex_count());

        let mut moved = 0;
        for i in 0..self.len() {
            let v = VertexId(i as u32);
            if let Some(movement) = self.average_move(v) {
                mesh.set_vertex_position(v, mesh.position(v) + movement);
                moved += 1;
            }
        }
        moved
    }
}
