// Spacepoint ownership
//
// The seed finder never owns a measurement. Every detector has its own
// spacepoint type (with cluster shapes, timing, calibration context, ...) and
// copying that into the finder would force a conversion layer on every
// caller. Instead the finder borrows measurements through the `SpacePoint`
// accessor capability and hands the same references back inside the produced
// seeds, so downstream fitting keeps working with the caller's own objects.

use uom::si::f64::{Area, Length};
use uom::typenum::P2;

mod config;
mod grid;
mod seeding;

pub use config::{SeedingConfig, TrySeedFinderFromConfigError};
pub use grid::{
    BinFinder, GridCell, GridSize, InternalSpacePoint, PhiNeighborBinFinder, SingleCellBinFinder,
    SpacePointGrid,
};
pub use seeding::filter::{
    SeedCandidate, SeedFilter, SeedFilterConfig, StandardSeedFilter, TopCandidate,
};
pub use seeding::{Seed, SeedFinder};

/// A 3D position measurement from a detector hit.
///
/// Measurements remain owned by the caller; the seed finder only reads them
/// through these accessors and returns references to them in [`Seed`]s.
pub trait SpacePoint {
    /// Global `x` coordinate.
    fn x(&self) -> Length;
    /// Global `y` coordinate.
    fn y(&self) -> Length;
    /// Global `z` coordinate.
    fn z(&self) -> Length;
}

/// Per-measurement covariance contribution in the beam-anchored frame.
///
/// The uncertainty of a measurement depends on detector and alignment details
/// the seed finder knows nothing about. Callers provide them through this
/// capability; the configured alignment uncertainties are forwarded on every
/// call.
pub trait CovarianceTool<P> {
    /// Return the `(covr, covz)` contribution of `sp`.
    fn covariances(
        &self,
        sp: &P,
        z_align: Length,
        r_align: Length,
        sigma_error: f64,
    ) -> (Area, Area);
}

impl<P, F> CovarianceTool<P> for F
where
    F: Fn(&P, Length, Length, f64) -> (Area, Area),
{
    fn covariances(
        &self,
        sp: &P,
        z_align: Length,
        r_align: Length,
        sigma_error: f64,
    ) -> (Area, Area) {
        self(sp, z_align, r_align, sigma_error)
    }
}

/// Covariance contributions from the alignment uncertainties alone.
///
/// Callers with per-measurement variances should provide their own
/// [`CovarianceTool`]; this one only scales the configured alignment terms.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlignmentCovariance;

impl<P> CovarianceTool<P> for AlignmentCovariance {
    fn covariances(
        &self,
        _sp: &P,
        z_align: Length,
        r_align: Length,
        sigma_error: f64,
    ) -> (Area, Area) {
        (
            sigma_error * r_align.powi(P2::new()),
            sigma_error * z_align.powi(P2::new()),
        )
    }
}
