//! Fracture and connectivity maintenance.
//!
//! For every particle, each positive link (`x_pos`, `y_pos`) is checked
//! once per pass against the body's tolerances:
//!
//! - **Length**: `| goal-distance / rest-distance - 1 |` exceeds the
//!   length tolerance.
//! - **Angle**: only evaluated when the length test did not trip; the
//!   angle between the two particles' averaged-rotation first columns
//!   exceeds the angle tolerance.
//!
//! A tripped test severs the link symmetrically; connectivity of the
//! owning chunk is then re-evaluated by a breadth-first traversal over
//! the post-severance adjacency table (sever first, traverse after -
//! never mutate mid-traversal). If the far particle became unreachable
//! the chunk is partitioned into exactly two: the reachable set keeps
//! the original chunk, the unreachable set moves into a new chunk
//! appended to the body. Severances are processed one at a time; each
//! severance only shrinks connectivity, so per-link re-evaluation is
//! sound.

use lattice_types::{SimEvent, Vector2};
use std::collections::VecDeque;

use crate::body::{Body, Chunk, Neighbors};

/// Counters from one fracture pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FractureStats {
    /// Links severed.
    pub severed: usize,
    /// Chunk splits performed.
    pub splits: usize,
}

enum BreakCause {
    Length { rest: f64, actual: f64 },
    Angle { angle: f64 },
}

/// First column of the averaged rotation, normalized. `None` when the
/// accumulated rotations cancel out.
fn rotation_axis(body: &Body, index: usize) -> Option<Vector2<f64>> {
    let r = &body.particles[index].rotation;
    Vector2::new(r[(0, 0)], r[(1, 0)]).try_normalize(1e-12)
}

fn check_link(body: &Body, i: usize, j: usize) -> Option<BreakCause> {
    let config = body.config();
    let a = &body.particles[i];
    let b = &body.particles[j];

    let actual = (b.goal - a.goal).norm();
    let rest = (b.x0 - a.x0).norm();
    if config.fracture_length_tolerance > 0.0 {
        let strain = (actual / rest - 1.0).abs();
        if strain > config.fracture_length_tolerance {
            return Some(BreakCause::Length { rest, actual });
        }
    }

    if config.fracture_angle_tolerance > 0.0 {
        if let (Some(axis_a), Some(axis_b)) = (rotation_axis(body, i), rotation_axis(body, j)) {
            let angle = axis_a.dot(&axis_b).clamp(-1.0, 1.0).acos();
            if angle > config.fracture_angle_tolerance {
                return Some(BreakCause::Angle { angle });
            }
        }
    }

    None
}

/// BFS over the adjacency table from `start`. Returns the visited set as
/// a membership mask plus the visit order.
fn reachable(neighbors: &[Neighbors], start: usize) -> (Vec<bool>, Vec<usize>) {
    let mut visited = vec![false; neighbors.len()];
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);
    while let Some(p) = queue.pop_front() {
        order.push(p);
        for n in neighbors[p].linked() {
            if !visited[n] {
                visited[n] = true;
                queue.push_back(n);
            }
        }
    }
    (visited, order)
}

/// Sever the positive link from `i` to `j` (`y_pos` when `vertical`,
/// `x_pos` otherwise) and re-evaluate connectivity. Returns `true` when
/// the owning chunk split.
fn sever_and_split(
    body: &mut Body,
    i: usize,
    j: usize,
    vertical: bool,
    events: &mut impl FnMut(SimEvent),
) -> bool {
    // Sever symmetrically first; the traversal below runs on the
    // post-severance table.
    if vertical {
        body.neighbors[i].y_pos = None;
        body.neighbors[j].y_neg = None;
    } else {
        body.neighbors[i].x_pos = None;
        body.neighbors[j].x_neg = None;
    }

    let (visited, order) = reachable(&body.neighbors, i);
    if visited[j] {
        return false;
    }

    // Disconnected: the reachable set keeps the original chunk, the far
    // side moves into a new chunk.
    let chunk_id = body.particles[i].chunk;
    let new_chunk_id = body.chunks.len();

    let (_, far_order) = reachable(&body.neighbors, j);
    for &p in &far_order {
        body.particles[p].chunk = new_chunk_id;
    }

    let mut new_chunk = Chunk::new(far_order);
    new_chunk.recompute_invariants(&body.particles);

    let kept = order;
    events(SimEvent::ChunkSplit {
        kept: kept.len(),
        split: new_chunk.particles.len(),
    });

    body.chunks[chunk_id].particles = kept;
    body.chunks[chunk_id].recompute_invariants(&body.particles);
    body.chunks.push(new_chunk);
    true
}

/// Run one fracture pass over the whole body.
///
/// Deterministic and infallible: tolerances of zero disable the
/// corresponding test (both zero disables the pass entirely).
pub fn fracture_pass(body: &mut Body, events: &mut impl FnMut(SimEvent)) -> FractureStats {
    let mut stats = FractureStats::default();
    if !body.config().fracture_enabled() {
        return stats;
    }

    for i in 0..body.particles.len() {
        // Re-read links on every check: an earlier severance may have
        // removed them.
        for vertical in [false, true] {
            let link = if vertical {
                body.neighbors[i].y_pos
            } else {
                body.neighbors[i].x_pos
            };
            let Some(j) = link else { continue };

            let Some(cause) = check_link(body, i, j) else {
                continue;
            };
            match cause {
                BreakCause::Length { rest, actual } => {
                    tracing::debug!(rest, actual, "length fracture");
                    events(SimEvent::LengthFracture { rest, actual });
                }
                BreakCause::Angle { angle } => {
                    tracing::debug!(angle, "angle fracture");
                    events(SimEvent::AngleFracture { angle });
                }
            }
            stats.severed += 1;
            if sever_and_split(body, i, j, vertical, events) {
                stats.splits += 1;
            }
        }
    }
    stats
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{match_shapes, Blueprint};
    use lattice_types::{BodyConfig, Matrix2, Point2};

    fn collect(events: &mut Vec<SimEvent>) -> impl FnMut(SimEvent) + '_ {
        |e| events.push(e)
    }

    fn pair_body(config: BodyConfig) -> Body {
        // Two particles linked along x, rest distance = spacing = 10.
        let blueprint = Blueprint::rectangle(1, 2);
        Body::from_blueprint(&blueprint, Point2::origin(), config).unwrap()
    }

    fn rotation(angle: f64) -> Matrix2<f64> {
        Matrix2::new(angle.cos(), -angle.sin(), angle.sin(), angle.cos())
    }

    #[test]
    fn test_length_fracture_severs_and_splits() {
        let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
        let mut body = pair_body(config);

        // Goal-space distance 10 * (1 + tol + 0.01), aligned rotations.
        body.particles_mut()[1].goal = Point2::new(12.6, 0.0);

        let mut events = Vec::new();
        let stats = fracture_pass(&mut body, &mut collect(&mut events));

        assert_eq!(stats.severed, 1);
        assert_eq!(stats.splits, 1);
        assert_eq!(body.chunk_count(), 2);
        assert_eq!(body.chunks()[0].particles, vec![0]);
        assert_eq!(body.chunks()[1].particles, vec![1]);
        assert_eq!(body.particle(1).chunk, 1);
        assert!(matches!(events[0], SimEvent::LengthFracture { .. }));
        assert!(matches!(events[1], SimEvent::ChunkSplit { kept: 1, split: 1 }));
    }

    #[test]
    fn test_within_tolerance_stays_intact() {
        let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
        let mut body = pair_body(config);

        body.particles_mut()[1].goal = Point2::new(12.0, 0.0); // strain 0.2

        let stats = fracture_pass(&mut body, &mut |_| {});
        assert_eq!(stats.severed, 0);
        assert_eq!(body.chunk_count(), 1);
        assert!(body.neighbors()[0].x_pos.is_some());
    }

    #[test]
    fn test_compression_also_fractures() {
        let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
        let mut body = pair_body(config);

        body.particles_mut()[1].goal = Point2::new(5.0, 0.0); // strain 0.5

        let stats = fracture_pass(&mut body, &mut |_| {});
        assert_eq!(stats.severed, 1);
    }

    #[test]
    fn test_angle_fracture() {
        let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
        let mut body = pair_body(config);

        // Lengths fine; rotations diverge by ~1 radian.
        body.particles_mut()[1].rotation = rotation(1.0);

        let mut events = Vec::new();
        let stats = fracture_pass(&mut body, &mut collect(&mut events));
        assert_eq!(stats.severed, 1);
        assert!(matches!(events[0], SimEvent::AngleFracture { .. }));
    }

    #[test]
    fn test_zero_tolerances_disable_fracture() {
        let mut body = pair_body(BodyConfig::unbreakable());

        body.particles_mut()[1].goal = Point2::new(100.0, 0.0);
        body.particles_mut()[1].rotation = rotation(2.0);

        let stats = fracture_pass(&mut body, &mut |_| {});
        assert_eq!(stats.severed, 0);
        assert_eq!(body.chunk_count(), 1);
    }

    #[test]
    fn test_split_partitions_exactly() {
        // 1x4 strip; break the middle link.
        let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
        let blueprint = Blueprint::rectangle(1, 4);
        let mut body = Body::from_blueprint(&blueprint, Point2::origin(), config).unwrap();
        match_shapes(&mut body);

        // Stretch only the 1-2 gap in goal space.
        for (i, p) in body.particles_mut().iter_mut().enumerate() {
            if i >= 2 {
                p.goal += lattice_types::Vector2::new(8.0, 0.0);
            }
            p.rotation = Matrix2::identity();
        }

        let stats = fracture_pass(&mut body, &mut |_| {});
        assert_eq!(stats.severed, 1);
        assert_eq!(stats.splits, 1);
        assert_eq!(body.chunk_count(), 2);

        // Union of the two chunks is the original set, no duplicates.
        let mut all: Vec<usize> = body
            .chunks()
            .iter()
            .flat_map(|c| c.particles.iter().copied())
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3]);

        // Each resulting chunk is internally connected.
        for chunk in body.chunks() {
            let (visited, _) = reachable(body.neighbors(), chunk.particles[0]);
            assert!(chunk.particles.iter().all(|&p| visited[p]));
        }

        // Membership back-references updated.
        for (id, chunk) in body.chunks().iter().enumerate() {
            assert!(chunk.particles.iter().all(|&p| body.particle(p).chunk == id));
        }
    }

    #[test]
    fn test_severance_without_disconnection_keeps_one_chunk() {
        // 2x2 square: severing one edge leaves a connected U.
        let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
        let blueprint = Blueprint::rectangle(2, 2);
        let mut body = Body::from_blueprint(&blueprint, Point2::origin(), config).unwrap();
        match_shapes(&mut body);

        // Stretch one horizontal link in goal space only.
        body.particles_mut()[1].goal = Point2::new(15.0, 0.0);
        for p in body.particles_mut() {
            p.rotation = Matrix2::identity();
        }

        let stats = fracture_pass(&mut body, &mut |_| {});
        assert!(stats.severed >= 1);
        assert_eq!(stats.splits, 0);
        assert_eq!(body.chunk_count(), 1);
        assert_eq!(body.chunks()[0].particles.len(), 4);
    }

    #[test]
    fn test_fracture_pass_is_idempotent_after_split() {
        let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
        let mut body = pair_body(config);
        body.particles_mut()[1].goal = Point2::new(12.6, 0.0);

        let first = fracture_pass(&mut body, &mut |_| {});
        assert_eq!(first.splits, 1);

        // Same deformed state, already split: nothing further happens.
        let second = fracture_pass(&mut body, &mut |_| {});
        assert_eq!(second, FractureStats::default());
        assert_eq!(body.chunk_count(), 2);
    }
}
