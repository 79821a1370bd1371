//! The lattice data model: particles, neighbor links, chunks, bodies.
//!
//! A body owns an arena of particles plus a parallel adjacency table of
//! optional neighbor indices. Neighbor links are symmetric (`a.x_pos == b`
//! implies `b.x_neg == a`) except transiently inside a fracture pass,
//! which severs both directions before any traversal runs. A chunk is a
//! maximal connected subgraph of the body's particles under the 4-neighbor
//! relation; every particle belongs to exactly one chunk.

use lattice_contact::CollisionSubframe;
use lattice_types::{BodyConfig, Matrix2, Point2, Vector2};
use smallvec::SmallVec;

use crate::matching::SmoothingRegion;

/// The atomic simulation unit.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Particle mass. Always positive.
    pub mass: f64,
    /// Current position.
    pub x: Point2<f64>,
    /// Current velocity.
    pub v: Vector2<f64>,
    /// Material (rest) position. Never changes after construction.
    pub x0: Point2<f64>,
    /// Externally accumulated force. Cleared at the start of every tick.
    pub f_ext: Vector2<f64>,
    /// Shape-matched target position.
    pub goal: Point2<f64>,
    /// Average of all parent regions' rotations. Consumed by the fracture
    /// angle test.
    pub rotation: Matrix2<f64>,
    /// Pinned in place; excluded from force integration.
    pub locked: bool,
    /// Index of the owning chunk in the body's chunk list.
    pub chunk: usize,
    /// Number of smoothing regions this particle belongs to.
    pub region_count: usize,
    /// Collision subframes recorded this tick, in order. Debug/playback
    /// only; cleared every tick.
    pub subframes: Vec<CollisionSubframe>,
}

impl Particle {
    pub(crate) fn new(x0: Point2<f64>, mass: f64) -> Self {
        Self {
            mass,
            x: x0,
            v: Vector2::zeros(),
            x0,
            f_ext: Vector2::zeros(),
            goal: x0,
            rotation: Matrix2::identity(),
            locked: false,
            chunk: 0,
            region_count: 0,
            subframes: Vec::new(),
        }
    }

    /// Per-region mass `m~`: the particle's mass split evenly across the
    /// regions it belongs to, so overlapping regions don't over-count it.
    #[must_use]
    pub fn per_region_mass(&self) -> f64 {
        self.mass / self.region_count.max(1) as f64
    }
}

/// Optional neighbor indices of one particle. Absence means lattice
/// boundary (or a severed link).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Neighbor in +x.
    pub x_pos: Option<usize>,
    /// Neighbor in -x.
    pub x_neg: Option<usize>,
    /// Neighbor in +y.
    pub y_pos: Option<usize>,
    /// Neighbor in -y.
    pub y_neg: Option<usize>,
}

impl Neighbors {
    /// All present neighbor indices.
    #[must_use]
    pub fn linked(&self) -> SmallVec<[usize; 4]> {
        [self.x_pos, self.x_neg, self.y_pos, self.y_neg]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// A maximal connected subgraph of a body's particles, with cached
/// invariants over its rest configuration.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Indices of member particles.
    pub particles: Vec<usize>,
    /// Total mass of the member particles.
    pub total_mass: f64,
    /// Mass-weighted rest center of the member particles.
    pub rest_center: Point2<f64>,
}

impl Chunk {
    pub(crate) fn new(particles: Vec<usize>) -> Self {
        Self {
            particles,
            total_mass: 0.0,
            rest_center: Point2::origin(),
        }
    }

    /// Recompute the cached invariants from the current member set.
    pub(crate) fn recompute_invariants(&mut self, arena: &[Particle]) {
        let mut mass = 0.0;
        let mut center = Vector2::zeros();
        for &i in &self.particles {
            mass += arena[i].mass;
            center += arena[i].x0.coords * arena[i].mass;
        }
        self.total_mass = mass;
        self.rest_center = if mass > 0.0 {
            Point2::from(center / mass)
        } else {
            Point2::origin()
        };
    }
}

/// A deformable lattice body: particle arena, adjacency, chunks, regions.
#[derive(Debug, Clone)]
pub struct Body {
    pub(crate) config: BodyConfig,
    pub(crate) particles: Vec<Particle>,
    pub(crate) neighbors: Vec<Neighbors>,
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) regions: Vec<SmoothingRegion>,
}

impl Body {
    /// The body's configuration.
    #[must_use]
    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    /// Mutable configuration access, for controllers adjusting fracture
    /// tolerances between ticks.
    pub fn config_mut(&mut self) -> &mut BodyConfig {
        &mut self.config
    }

    /// Whether this body is a frozen (immovable) collider.
    #[must_use]
    pub fn frozen(&self) -> bool {
        self.config.frozen
    }

    /// Number of particles.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// All particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to all particles.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// One particle by index.
    #[must_use]
    pub fn particle(&self, index: usize) -> &Particle {
        &self.particles[index]
    }

    /// The adjacency table, parallel to the particle arena.
    #[must_use]
    pub fn neighbors(&self) -> &[Neighbors] {
        &self.neighbors
    }

    /// All chunks. The chunk lists partition the particle set.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The smoothing regions. Membership is fixed at construction and is
    /// not re-partitioned after fracture.
    #[must_use]
    pub fn regions(&self) -> &[SmoothingRegion] {
        &self.regions
    }

    /// Pin a particle in place, excluding it from force integration.
    pub fn lock_particle(&mut self, index: usize) {
        self.particles[index].locked = true;
    }

    /// Unpin a particle.
    pub fn unlock_particle(&mut self, index: usize) {
        self.particles[index].locked = false;
    }

    /// Accumulate an external force on one particle.
    pub fn apply_force(&mut self, index: usize, force: Vector2<f64>) {
        self.particles[index].f_ext += force;
    }

    /// Iterate the body's lattice edges as `(start, end)` particle index
    /// pairs. Each edge appears once, through its positive link.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(i, n)| {
            n.x_pos
                .map(|j| (i, j))
                .into_iter()
                .chain(n.y_pos.map(|j| (i, j)))
        })
    }

    /// Whether every neighbor link has its mirror link. Holds outside of
    /// an in-progress fracture severance.
    #[must_use]
    pub fn neighbors_symmetric(&self) -> bool {
        self.neighbors.iter().enumerate().all(|(i, n)| {
            n.x_pos.is_none_or(|j| self.neighbors[j].x_neg == Some(i))
                && n.x_neg.is_none_or(|j| self.neighbors[j].x_pos == Some(i))
                && n.y_pos.is_none_or(|j| self.neighbors[j].y_neg == Some(i))
                && n.y_neg.is_none_or(|j| self.neighbors[j].y_pos == Some(i))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Blueprint;
    use approx::assert_relative_eq;

    fn two_by_two() -> Body {
        let blueprint = Blueprint::rectangle(2, 2);
        Body::from_blueprint(&blueprint, Point2::origin(), BodyConfig::default()).unwrap()
    }

    #[test]
    fn test_edges_enumerate_each_link_once() {
        let body = two_by_two();
        let edges: Vec<_> = body.edges().collect();
        // 2x2 lattice: 2 horizontal + 2 vertical edges.
        assert_eq!(edges.len(), 4);
    }

    #[test]
    fn test_neighbor_symmetry_on_build() {
        let body = two_by_two();
        assert!(body.neighbors_symmetric());
    }

    #[test]
    fn test_per_region_mass_splits_evenly() {
        let mut particle = Particle::new(Point2::origin(), 2.0);
        particle.region_count = 4;
        assert_relative_eq!(particle.per_region_mass(), 0.5);

        // Guard: a particle outside every region keeps its full mass.
        particle.region_count = 0;
        assert_relative_eq!(particle.per_region_mass(), 2.0);
    }

    #[test]
    fn test_chunk_invariants() {
        let body = two_by_two();
        let chunk = &body.chunks()[0];
        assert_eq!(chunk.particles.len(), 4);
        assert_relative_eq!(chunk.total_mass, 4.0);
        // Spacing 10: rest positions span (0,0)..(10,10).
        assert_relative_eq!(chunk.rest_center, Point2::new(5.0, 5.0));
    }

    #[test]
    fn test_lock_unlock() {
        let mut body = two_by_two();
        body.lock_particle(1);
        assert!(body.particle(1).locked);
        body.unlock_particle(1);
        assert!(!body.particle(1).locked);
    }
}
