//! Body construction from boolean-grid blueprints.
//!
//! A blueprint is a rows × columns grid of occupied cells. Construction
//! places one particle per occupied cell at `origin + cell * spacing`,
//! links axis-adjacent occupied cells symmetrically, puts every particle
//! into one initial chunk, and builds the smoothing regions. Contract
//! violations (empty grid, no occupied cells, non-positive mass or
//! spacing) fail fast here rather than surfacing in per-tick logic.

use lattice_types::{BodyConfig, LatticeError, Point2, Result, Vector2};

use crate::body::{Body, Chunk, Neighbors, Particle};
use crate::matching::SmoothingRegion;

/// A 2D boolean grid of occupied lattice cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Blueprint {
    /// Create an empty (all-unoccupied) grid.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// A fully occupied rectangle.
    #[must_use]
    pub fn rectangle(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![true; rows * cols],
        }
    }

    /// Build from nested rows (`grid[row][col]`). Rows must be equal
    /// length.
    pub fn from_rows(grid: &[Vec<bool>]) -> Result<Self> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if grid.iter().any(|row| row.len() != cols) {
            return Err(LatticeError::InvalidConfig {
                reason: "blueprint rows must all have the same length".into(),
            });
        }
        Ok(Self {
            rows,
            cols,
            cells: grid.iter().flatten().copied().collect(),
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Mark a cell occupied or not.
    pub fn set(&mut self, row: usize, col: usize, occupied: bool) {
        self.cells[row * self.cols + col] = occupied;
    }

    /// Whether a cell is occupied. Out-of-range coordinates are
    /// unoccupied.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

impl Body {
    /// Build a body from a blueprint.
    ///
    /// # Errors
    ///
    /// Fails on an empty grid, a grid with no occupied cells, or an
    /// invalid [`BodyConfig`].
    pub fn from_blueprint(
        blueprint: &Blueprint,
        origin: Point2<f64>,
        config: BodyConfig,
    ) -> Result<Self> {
        config.validate()?;
        if blueprint.rows == 0 || blueprint.cols == 0 {
            return Err(LatticeError::EmptyBlueprint);
        }
        if blueprint.occupied_count() == 0 {
            return Err(LatticeError::NoOccupiedCells);
        }

        // Grid cell -> particle index.
        let mut cell_index = vec![None; blueprint.rows * blueprint.cols];
        let mut particles = Vec::with_capacity(blueprint.occupied_count());
        for row in 0..blueprint.rows {
            for col in 0..blueprint.cols {
                if blueprint.is_occupied(row, col) {
                    cell_index[row * blueprint.cols + col] = Some(particles.len());
                    let rest = origin
                        + Vector2::new(col as f64 * config.spacing, row as f64 * config.spacing);
                    particles.push(Particle::new(rest, config.particle_mass));
                }
            }
        }

        let at = |row: usize, col: usize| -> Option<usize> {
            if blueprint.is_occupied(row, col) {
                cell_index[row * blueprint.cols + col]
            } else {
                None
            }
        };

        // Symmetric links between adjacent occupied cells.
        let mut neighbors = vec![Neighbors::default(); particles.len()];
        for row in 0..blueprint.rows {
            for col in 0..blueprint.cols {
                let Some(i) = at(row, col) else { continue };
                if let Some(j) = at(row, col + 1) {
                    neighbors[i].x_pos = Some(j);
                    neighbors[j].x_neg = Some(i);
                }
                if let Some(j) = at(row + 1, col) {
                    neighbors[i].y_pos = Some(j);
                    neighbors[j].y_neg = Some(i);
                }
            }
        }

        // Smoothing regions: a Chebyshev window around each center cell,
        // one center per stride step.
        let mut regions = Vec::new();
        let w = config.region_half_width;
        for row in (0..blueprint.rows).step_by(config.region_stride) {
            for col in (0..blueprint.cols).step_by(config.region_stride) {
                if at(row, col).is_none() {
                    continue;
                }
                let mut members = Vec::new();
                for r in row.saturating_sub(w)..=(row + w).min(blueprint.rows - 1) {
                    for c in col.saturating_sub(w)..=(col + w).min(blueprint.cols - 1) {
                        if let Some(m) = at(r, c) {
                            members.push(m);
                        }
                    }
                }
                for &m in &members {
                    particles[m].region_count += 1;
                }
                regions.push(SmoothingRegion::new(members));
            }
        }
        // Region rest invariants depend on every particle's final region
        // count, so they are computed after all memberships are known.
        for region in &mut regions {
            region.recompute_rest(&particles);
        }

        let mut chunk = Chunk::new((0..particles.len()).collect());
        chunk.recompute_invariants(&particles);

        Ok(Self {
            config,
            particles,
            neighbors,
            chunks: vec![chunk],
            regions,
        })
    }
}
