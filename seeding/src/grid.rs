use crate::config::DerivedConfig;
use crate::{CovarianceTool, SeedingConfig, SpacePoint};
use itertools::iproduct;
use std::f64::consts::PI;
use uom::si::area::square_millimeter;
use uom::si::length::millimeter;

/// Number of cells along each axis of a [`SpacePointGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    /// Number of azimuthal cells. The azimuth axis is periodic.
    pub phi_bins: usize,
    /// Number of longitudinal cells.
    pub z_bins: usize,
}

/// Identifier of one cell of a [`SpacePointGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Azimuthal cell index, in `0..phi_bins`.
    pub phi: usize,
    /// Longitudinal cell index, in `0..z_bins`.
    pub z: usize,
}

/// A [`SpacePoint`] adapted for seeding.
///
/// Coordinates are translated into the frame anchored at the configured beam
/// position, with radius, azimuth, and the covariance contributions
/// precomputed. Internal spacepoints are created during grid construction and
/// never mutated afterwards.
#[derive(Debug)]
pub struct InternalSpacePoint<'a, P> {
    sp: &'a P,
    // Beam-frame values in MILLIMETER (covariances in mm^2), following the
    // same unit discipline as the derived configuration.
    x: f64,
    y: f64,
    z: f64,
    r: f64,
    phi: f64,
    cov_r: f64,
    cov_z: f64,
}

// Not derived; `P` itself does not need to be `Clone` to copy a reference
// to it around.
impl<'a, P> Clone for InternalSpacePoint<'a, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, P> Copy for InternalSpacePoint<'a, P> {}

impl<'a, P> InternalSpacePoint<'a, P> {
    pub(crate) fn new(sp: &'a P, x: f64, y: f64, z: f64, cov_r: f64, cov_z: f64) -> Self {
        InternalSpacePoint {
            sp,
            x,
            y,
            z,
            r: x.hypot(y),
            phi: y.atan2(x),
            cov_r,
            cov_z,
        }
    }
    /// The borrowed external measurement.
    pub fn spacepoint(&self) -> &'a P {
        self.sp
    }
    /// Beam-frame `x` (mm).
    pub fn x(&self) -> f64 {
        self.x
    }
    /// Beam-frame `y` (mm).
    pub fn y(&self) -> f64 {
        self.y
    }
    /// `z` coordinate (mm).
    pub fn z(&self) -> f64 {
        self.z
    }
    /// Transverse radius in the beam frame (mm). Non-negative.
    pub fn radius(&self) -> f64 {
        self.r
    }
    /// Azimuth in the beam frame, in `[-pi, pi]`.
    pub fn phi(&self) -> f64 {
        self.phi
    }
    /// Radial covariance contribution (mm^2).
    pub fn cov_r(&self) -> f64 {
        self.cov_r
    }
    /// Longitudinal covariance contribution (mm^2).
    pub fn cov_z(&self) -> f64 {
        self.cov_z
    }
}

/// Two-dimensional (azimuth, z) index over the spacepoints of one event.
///
/// Each cell holds the [`InternalSpacePoint`]s whose beam-frame azimuth and z
/// fall into it, sorted by non-decreasing radius up to the width of one radius
/// bucket (see [`SpacePointGrid::R_BUCKET`]). The grid is immutable once
/// built, so distinct cells can be consumed from parallel threads.
pub struct SpacePointGrid<'a, P> {
    size: GridSize,
    z_min: f64,
    z_max: f64,
    cells: Vec<Vec<InternalSpacePoint<'a, P>>>,
}

impl<'a, P: SpacePoint> SpacePointGrid<'a, P> {
    /// Width (mm) of the radius buckets used to order each cell during
    /// construction. Cells are sorted by radius up to this tolerance.
    pub const R_BUCKET: f64 = 1.0;

    pub(crate) fn new<C>(
        spacepoints: impl IntoIterator<Item = &'a P>,
        covariance_tool: &C,
        config: &SeedingConfig,
        derived: &DerivedConfig,
    ) -> Self
    where
        C: CovarianceTool<P>,
    {
        let size = grid_size(derived);
        let cells = vec![Vec::new(); size.phi_bins * size.z_bins];

        // Bucketing the points by floored radius and flushing the buckets in
        // increasing-radius order leaves every destination cell sorted up to
        // one bucket width, without a comparison sort.
        let beam_distance = derived.beam_pos.0.hypot(derived.beam_pos.1);
        let num_r_buckets = (derived.r_max + beam_distance) as usize;
        let mut r_buckets: Vec<Vec<InternalSpacePoint<'a, P>>> = vec![Vec::new(); num_r_buckets];

        for sp in spacepoints {
            let z = sp.z().get::<millimeter>();
            if z < derived.z_min || z > derived.z_max {
                continue;
            }
            let x = sp.x().get::<millimeter>();
            let y = sp.y().get::<millimeter>();
            // The region of interest is expressed in detector coordinates;
            // the beam-frame azimuth is only computed afterwards.
            let phi = y.atan2(x);
            if phi < derived.phi_min || phi > derived.phi_max {
                continue;
            }
            let (cov_r, cov_z) = covariance_tool.covariances(
                sp,
                config.z_align,
                config.r_align,
                config.sigma_error,
            );
            let internal = InternalSpacePoint::new(
                sp,
                x - derived.beam_pos.0,
                y - derived.beam_pos.1,
                z,
                cov_r.get::<square_millimeter>(),
                cov_z.get::<square_millimeter>(),
            );
            // A point whose floored radius lands at or past the last bucket
            // is outside the region of interest.
            let r_index = internal.r as usize;
            if r_index >= num_r_buckets {
                continue;
            }
            r_buckets[r_index].push(internal);
        }

        let mut grid = SpacePointGrid {
            size,
            z_min: derived.z_min,
            z_max: derived.z_max,
            cells,
        };
        for bucket in r_buckets {
            for internal in bucket {
                let cell = grid.cell_of(internal.phi, internal.z);
                grid.cells[cell.phi * grid.size.z_bins + cell.z].push(internal);
            }
        }

        grid
    }

    // Map a beam-frame azimuth and z to the containing cell. The azimuth
    // axis covers the full turn and wraps; the z axis is clamped to its
    // outermost cells.
    fn cell_of(&self, phi: f64, z: f64) -> GridCell {
        let phi_bin = ((phi + PI) / (2.0 * PI) * self.size.phi_bins as f64) as usize;
        let z_bin = ((z - self.z_min) / (self.z_max - self.z_min) * self.size.z_bins as f64) as usize;

        GridCell {
            phi: phi_bin.min(self.size.phi_bins - 1),
            z: z_bin.min(self.size.z_bins - 1),
        }
    }
}

impl<'a, P> SpacePointGrid<'a, P> {
    /// Number of cells along each axis.
    pub fn size(&self) -> GridSize {
        self.size
    }
    /// The spacepoints of one cell, sorted by non-decreasing radius up to
    /// [`SpacePointGrid::R_BUCKET`].
    pub fn at(&self, cell: GridCell) -> &[InternalSpacePoint<'a, P>] {
        &self.cells[cell.phi * self.size.z_bins + cell.z]
    }
    /// All cells in natural order (azimuth-major).
    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        iproduct!(0..self.size.phi_bins, 0..self.size.z_bins).map(|(phi, z)| GridCell { phi, z })
    }
    /// Number of spacepoints indexed by the grid.
    pub fn num_spacepoints(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

// Derive the cell sizes from the configuration.
//
// Azimuth: a seed bends at most as much as a helix at the minimum transverse
// momentum. Intersecting that helix with the outer radius (and with the
// smallest radius a top partner of an outer middle can have) bounds the
// azimuthal spread of one triplet; one cell covers that spread.
// z: one cell covers the longitudinal extent of the longest allowed doublet
// at the cot(theta) acceptance edge.
fn grid_size(config: &DerivedConfig) -> GridSize {
    let min_helix_radius = config.min_pt / config.pt_per_helix_radius;
    let max_r2 = config.r_max * config.r_max;
    let x_outer = max_r2 / (2.0 * min_helix_radius);
    let y_outer = (max_r2 - x_outer * x_outer).sqrt();
    let outer_angle = (x_outer / y_outer).atan();
    let mut inner_angle = 0.0;
    if config.r_max > config.delta_r_max {
        let inner_r = config.r_max - config.delta_r_max;
        let inner_r2 = inner_r * inner_r;
        let x_inner = inner_r2 / (2.0 * min_helix_radius);
        let y_inner = (inner_r2 - x_inner * x_inner).sqrt();
        inner_angle = (x_inner / y_inner).atan();
    }
    // Degenerate configurations (a minimum-pT helix diameter smaller than
    // the outer radius, or a z window narrower than one doublet) collapse to
    // a single cell instead of failing.
    let phi_bins = ((2.0 * PI / (outer_angle - inner_angle)) as usize).max(1);
    let z_bin_size = config.cot_theta_max * config.delta_r_max;
    let z_bins = (((config.z_max - config.z_min) / z_bin_size) as usize).max(1);

    GridSize { phi_bins, z_bins }
}

/// Strategy that selects which cells to search for partners of a middle
/// cell.
///
/// The seed finder only assumes that each query returns a finite set of
/// cells valid for the grid it is given.
pub trait BinFinder {
    /// Cells that may contain bottom partners for middles in `cell`.
    fn bottom_neighborhood(&self, cell: GridCell, size: GridSize) -> Vec<GridCell>;
    /// Cells that may contain top partners for middles in `cell`.
    fn top_neighborhood(&self, cell: GridCell, size: GridSize) -> Vec<GridCell>;
}

/// [`BinFinder`] that searches only the middle cell itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleCellBinFinder;

impl BinFinder for SingleCellBinFinder {
    fn bottom_neighborhood(&self, cell: GridCell, _size: GridSize) -> Vec<GridCell> {
        vec![cell]
    }
    fn top_neighborhood(&self, cell: GridCell, _size: GridSize) -> Vec<GridCell> {
        vec![cell]
    }
}

/// [`BinFinder`] that searches the middle cell and its two azimuthal
/// neighbours at the same z, with wrap-around in azimuth.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhiNeighborBinFinder;

impl BinFinder for PhiNeighborBinFinder {
    fn bottom_neighborhood(&self, cell: GridCell, size: GridSize) -> Vec<GridCell> {
        phi_neighborhood(cell, size)
    }
    fn top_neighborhood(&self, cell: GridCell, size: GridSize) -> Vec<GridCell> {
        phi_neighborhood(cell, size)
    }
}

// The azimuth axis is periodic: the left neighbour of the first cell is the
// last cell. Narrow grids must not report the same cell twice.
fn phi_neighborhood(cell: GridCell, size: GridSize) -> Vec<GridCell> {
    let left = GridCell {
        phi: (cell.phi + size.phi_bins - 1) % size.phi_bins,
        z: cell.z,
    };
    let right = GridCell {
        phi: (cell.phi + 1) % size.phi_bins,
        z: cell.z,
    };
    match size.phi_bins {
        1 => vec![cell],
        2 => vec![left, cell],
        _ => vec![left, cell, right],
    }
}

#[cfg(test)]
mod tests;
