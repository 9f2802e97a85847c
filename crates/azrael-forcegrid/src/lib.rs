#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    rust_2018_idioms,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![doc = r"The ambient force grid sampled by Phase C.

A regular lattice over a bounded world region; each cell stores a force
vector. Sampling a point outside the region is zero rather than an error —
the grid covers a region of interest, not the whole world, and bodies
drifting outside it simply feel no ambient force."]

use azrael_config::ForceGridConfig;
use azrael_math::Vec3;

/// A regular lattice of force vectors, indexed by integer cell coordinates.
pub struct ForceGrid {
    origin: Vec3,
    spacing: f32,
    dims: [u32; 3],
    cells: Vec<Vec3>,
}

impl ForceGrid {
    /// Creates a grid of all-zero cells covering `dims[0] * dims[1] * dims[2]`
    /// cells of edge length `spacing`, with cell `(0, 0, 0)` at `origin`.
    ///
    /// # Panics
    /// Panics if `spacing` is not finite and positive.
    #[must_use]
    pub fn new(origin: Vec3, spacing: f32, dims: [u32; 3]) -> Self {
        assert!(spacing.is_finite() && spacing > 0.0, "spacing must be finite and positive");
        let count = (dims[0] as usize) * (dims[1] as usize) * (dims[2] as usize);
        Self {
            origin,
            spacing,
            dims,
            cells: vec![Vec3::new(0.0, 0.0, 0.0); count],
        }
    }

    fn cell_index(&self, p: Vec3) -> Option<usize> {
        let rel = p.sub(&self.origin);
        let [rx, ry, rz] = rel.to_array();
        let inv_spacing = 1.0 / self.spacing;
        let cx = (rx * inv_spacing).floor();
        let cy = (ry * inv_spacing).floor();
        let cz = (rz * inv_spacing).floor();
        if cx < 0.0 || cy < 0.0 || cz < 0.0 {
            return None;
        }
        let (cx, cy, cz) = (cx as u32, cy as u32, cz as u32);
        if cx >= self.dims[0] || cy >= self.dims[1] || cz >= self.dims[2] {
            return None;
        }
        let idx = (cz as usize * self.dims[1] as usize + cy as usize) * self.dims[0] as usize
            + cx as usize;
        Some(idx)
    }

    /// Samples the force at `p`. Out-of-region points sample as zero, in O(1).
    #[must_use]
    pub fn sample(&self, p: Vec3) -> Vec3 {
        self.cell_index(p)
            .map_or_else(|| Vec3::new(0.0, 0.0, 0.0), |idx| self.cells[idx])
    }

    /// Sets the force vector of the cell at integer coordinates `cell`.
    /// Out-of-range coordinates are a no-op.
    pub fn set(&mut self, cell: [u32; 3], value: Vec3) {
        if cell[0] >= self.dims[0] || cell[1] >= self.dims[1] || cell[2] >= self.dims[2] {
            return;
        }
        let idx = (cell[2] as usize * self.dims[1] as usize + cell[1] as usize)
            * self.dims[0] as usize
            + cell[0] as usize;
        self.cells[idx] = value;
    }

    /// Builds an all-zero grid from an [`ForceGridConfig`] loaded via `azrael-config`.
    #[must_use]
    pub fn from_config(config: &ForceGridConfig) -> Self {
        Self::new(Vec3::from(config.origin), config.spacing, config.dims)
    }

    /// Sets every cell whose center falls within `[min, max]` (world space)
    /// to `value`.
    pub fn set_region(&mut self, min: Vec3, max: Vec3, value: Vec3) {
        for z in 0..self.dims[2] {
            for y in 0..self.dims[1] {
                for x in 0..self.dims[0] {
                    let center = self.origin.add(&Vec3::new(
                        (x as f32 + 0.5) * self.spacing,
                        (y as f32 + 0.5) * self.spacing,
                        (z as f32 + 0.5) * self.spacing,
                    ));
                    let [cx, cy, cz] = center.to_array();
                    let [minx, miny, minz] = min.to_array();
                    let [maxx, maxy, maxz] = max.to_array();
                    if cx >= minx && cx <= maxx && cy >= miny && cy <= maxy && cz >= minz && cz <= maxz {
                        self.set([x, y, z], value);
                    }
                }
            }
        }
    }
}
