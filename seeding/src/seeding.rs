use crate::config::{self, DerivedConfig};
use crate::grid::{BinFinder, GridCell, SpacePointGrid};
use crate::{CovarianceTool, SeedingConfig, SpacePoint, TrySeedFinderFromConfigError};
use filter::SeedFilter;
use uom::si::f64::Length;

// Select the partners of a middle spacepoint that can form a doublet.
mod doublet_finding;
// Rank the accepted triplets of a middle spacepoint.
pub(crate) mod filter;
// Map partners into conformal coordinates anchored at the middle spacepoint.
mod transform;
// Pair compatible bottoms with compatible tops and apply the triplet cuts.
mod triplet_finding;

/// An ordered (bottom, middle, top) triplet of spacepoints compatible with a
/// single helical track hypothesis.
#[derive(Debug)]
pub struct Seed<'a, P> {
    /// Innermost spacepoint.
    pub bottom: &'a P,
    /// Middle spacepoint; the anchor of the triplet cuts.
    pub middle: &'a P,
    /// Outermost spacepoint.
    pub top: &'a P,
    /// z-axis intercept of the bottom doublet extrapolated to `r = 0`.
    pub z_origin: Length,
    /// Quality assigned by the seed filter; larger is better.
    pub weight: f64,
}

// Not derived; `P` itself does not need to be `Clone` to copy a reference
// to it around.
impl<'a, P> Clone for Seed<'a, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, P> Copy for Seed<'a, P> {}

/// Triplet seed finder.
///
/// Constructed from a validated [`SeedingConfig`]. One finder serves any
/// number of events: build a [`SpacePointGrid`] per event and consume its
/// cells, either through [`SeedFinder::find_seeds`] or cell by cell through
/// [`SeedFinder::seeds_in_cell`].
#[derive(Clone, Debug)]
pub struct SeedFinder {
    config: SeedingConfig,
    derived: DerivedConfig,
}

impl TryFrom<SeedingConfig> for SeedFinder {
    type Error = TrySeedFinderFromConfigError;

    fn try_from(config: SeedingConfig) -> Result<Self, Self::Error> {
        config::validate(&config)?;
        let derived = DerivedConfig::from(&config);

        Ok(SeedFinder { config, derived })
    }
}

impl SeedFinder {
    /// The validated configuration.
    pub fn config(&self) -> &SeedingConfig {
        &self.config
    }

    /// Index the spacepoints of one event.
    ///
    /// Spacepoints outside the configured region of interest are silently
    /// skipped.
    pub fn build_grid<'a, P, C>(
        &self,
        spacepoints: impl IntoIterator<Item = &'a P>,
        covariance_tool: &C,
    ) -> SpacePointGrid<'a, P>
    where
        P: SpacePoint,
        C: CovarianceTool<P>,
    {
        SpacePointGrid::new(spacepoints, covariance_tool, &self.config, &self.derived)
    }

    /// Find the seeds whose middle spacepoint lies in `cell`.
    ///
    /// Distinct cells are independent: the grid is read-only and all scratch
    /// is local to the call, so callers may process cells from parallel
    /// threads.
    pub fn seeds_in_cell<'a, P, B, F>(
        &self,
        grid: &SpacePointGrid<'a, P>,
        cell: GridCell,
        bin_finder: &B,
        seed_filter: &F,
    ) -> Vec<Seed<'a, P>>
    where
        B: BinFinder + ?Sized,
        F: SeedFilter<P> + ?Sized,
    {
        let bottom_cells = bin_finder.bottom_neighborhood(cell, grid.size());
        let top_cells = bin_finder.top_neighborhood(cell, grid.size());

        let mut scratch = triplet_finding::Scratch::new();
        let mut seeds = Vec::new();
        for middle in grid.at(cell) {
            triplet_finding::seeds_for_middle(
                &self.derived,
                grid,
                middle,
                &bottom_cells,
                &top_cells,
                seed_filter,
                self.config.max_seeds_per_middle,
                &mut scratch,
                &mut seeds,
            );
        }

        seeds
    }

    /// Find all seeds of the event, as one list per grid cell in natural
    /// cell order.
    pub fn find_seeds<'a, P, B, F>(
        &self,
        grid: &SpacePointGrid<'a, P>,
        bin_finder: &B,
        seed_filter: &F,
    ) -> Vec<Vec<Seed<'a, P>>>
    where
        B: BinFinder + ?Sized,
        F: SeedFilter<P> + ?Sized,
    {
        grid.cells()
            .map(|cell| self.seeds_in_cell(grid, cell, bin_finder, seed_filter))
            .collect()
    }
}
