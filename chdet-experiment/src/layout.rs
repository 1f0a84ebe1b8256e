use chdet_core::{DesignError, Location};
use rand::Rng;

/// Retry budget per lattice cell before a layout is declared infeasible.
const ATTEMPTS_PER_CELL: usize = 64;

/// Places stimulus positions on a jittered lattice with rejection sampling.
///
/// Lattice spacing is twice the minimum distance and each accepted point is
/// perturbed by at most half the minimum distance per axis, so points from
/// distinct cells always stay at least `min_distance` apart. Occupied cells
/// leave the pool, which keeps the distance check implicit and the spread
/// roughly even across the display.
#[derive(Debug, Clone)]
pub struct LayoutGenerator {
    min_distance: f64,
    max_per_quad: Option<usize>,
}

impl LayoutGenerator {
    pub fn new(min_distance: f64, max_per_quad: Option<usize>) -> Self {
        Self {
            min_distance,
            max_per_quad,
        }
    }

    /// Draws exactly `set_size` locations, or fails once the retry budget
    /// or the cell pool runs out.
    pub fn generate<R: Rng>(
        &self,
        set_size: usize,
        rng: &mut R,
    ) -> Result<Vec<Location>, DesignError> {
        let cell = self.min_distance * 2.0;
        let jitter = rng.random_range(0.0..cell);
        let mut pool = self.build_lattice(cell, jitter);

        let budget = pool.len().max(1) * ATTEMPTS_PER_CELL;
        let mut attempts = 0;
        let mut quad_count = [0usize; 4];
        let mut accepted: Vec<Location> = Vec::with_capacity(set_size);

        while accepted.len() < set_size {
            if pool.is_empty() || attempts >= budget {
                return Err(DesignError::LayoutInfeasible {
                    set_size,
                    attempts,
                    min_distance: self.min_distance,
                    max_per_quad: self.max_per_quad,
                });
            }
            attempts += 1;

            let slot = rng.random_range(0..pool.len());
            let half = self.min_distance / 2.0;
            let candidate = Location::new(
                pool[slot].x + rng.random_range(-half..half),
                pool[slot].y + rng.random_range(-half..half),
            );

            // A rejected perturbation leaves its cell in the pool for
            // another attempt.
            if !candidate.in_unit_square() {
                continue;
            }
            if let Some(cap) = self.max_per_quad {
                if quad_count[candidate.quadrant()] >= cap {
                    continue;
                }
            }

            quad_count[candidate.quadrant()] += 1;
            pool.swap_remove(slot);
            accepted.push(candidate);
        }

        Ok(accepted)
    }

    /// Lattice cells sharing one jitter offset, with a `cell`-radius
    /// clearance kept around the fixation point.
    fn build_lattice(&self, cell: f64, jitter: f64) -> Vec<Location> {
        let center = Location::new(0.5, 0.5);
        let lines = (1.0 / cell).floor() as usize;

        let mut lattice = Vec::with_capacity(lines * lines);
        for x in 0..lines {
            for y in 0..lines {
                let loc = Location::new(cell * x as f64 + jitter, cell * y as f64 + jitter);
                if loc.distance(&center) < cell || loc.x >= 1.0 || loc.y >= 1.0 {
                    continue;
                }
                lattice.push(loc);
            }
        }
        lattice
    }
}
