use super::Seed;
use crate::grid::InternalSpacePoint;
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;
use uom::si::length::millimeter;

/// A top spacepoint accepted by the triplet cuts for one (bottom, middle)
/// pair.
#[derive(Debug)]
pub struct TopCandidate<'g, 'a, P> {
    /// The accepted top partner.
    pub top: &'g InternalSpacePoint<'a, P>,
    /// Signed curvature of the fitted circle (1/mm); the sign encodes the
    /// bending direction.
    pub curvature: f64,
    /// Transverse impact parameter of the fitted circle (mm).
    pub impact: f64,
}

// Not derived; `P` itself does not need to be `Clone` to copy a reference
// to it around.
impl<'g, 'a, P> Clone for TopCandidate<'g, 'a, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'g, 'a, P> Copy for TopCandidate<'g, 'a, P> {}

/// A weighted triplet awaiting the per-middle selection stage.
#[derive(Debug)]
pub struct SeedCandidate<'a, P> {
    /// Innermost spacepoint.
    pub bottom: &'a P,
    /// Middle spacepoint.
    pub middle: &'a P,
    /// Outermost spacepoint.
    pub top: &'a P,
    /// z-axis intercept of the bottom doublet extrapolated to `r = 0` (mm).
    pub z_origin: f64,
    /// Quality assigned by the first filter stage; larger is better.
    pub weight: f64,
}

// Not derived; `P` itself does not need to be `Clone` to copy a reference
// to it around.
impl<'a, P> Clone for SeedCandidate<'a, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, P> Copy for SeedCandidate<'a, P> {}

impl<'a, P> SeedCandidate<'a, P> {
    /// Promote this candidate to a [`Seed`].
    pub fn into_seed(self) -> Seed<'a, P> {
        Seed {
            bottom: self.bottom,
            middle: self.middle,
            top: self.top,
            z_origin: Length::new::<millimeter>(self.z_origin),
            weight: self.weight,
        }
    }
}

/// Ranking policy of the seed finder.
///
/// The filter is the only component that orders seeds; everything upstream
/// produces sets, not sequences. Implementations decide how triplet quality
/// is scored, the finder decides which triplets exist.
pub trait SeedFilter<P> {
    /// First stage, fixed bottom: weigh the accepted tops of one
    /// (bottom, middle) pair and append the survivors to `out`. `z_origin`
    /// is the bottom doublet's, in mm.
    fn filter_fixed_bottom<'a>(
        &self,
        bottom: &InternalSpacePoint<'a, P>,
        middle: &InternalSpacePoint<'a, P>,
        tops: &[TopCandidate<'_, 'a, P>],
        z_origin: f64,
        out: &mut Vec<SeedCandidate<'a, P>>,
    );

    /// Second stage: drain the merged candidates of one middle spacepoint
    /// into `out`, keeping at most `max_seeds` of them.
    fn filter_per_middle<'a>(
        &self,
        candidates: &mut Vec<SeedCandidate<'a, P>>,
        max_seeds: usize,
        out: &mut Vec<Seed<'a, P>>,
    );
}

/// Tuning of [`StandardSeedFilter`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SeedFilterConfig {
    /// Two tops are curvature-compatible when their signed curvatures differ
    /// by less than this (1/mm).
    pub delta_inv_helix_diameter: f64,
    /// Weight penalty per millimetre of impact parameter.
    pub impact_weight_factor: f64,
    /// Weight bonus per distinct curvature-compatible top.
    pub compat_seed_weight: f64,
    /// Stop counting compatible tops past this many.
    pub compat_seed_limit: usize,
    /// Two compatible tops closer than this in radius (mm) count as the
    /// same layer crossing.
    pub delta_r_min: f64,
}

impl Default for SeedFilterConfig {
    fn default() -> Self {
        SeedFilterConfig {
            delta_inv_helix_diameter: 3.0e-5,
            impact_weight_factor: 1.0,
            compat_seed_weight: 200.0,
            compat_seed_limit: 2,
            delta_r_min: 5.0,
        }
    }
}

/// Reference [`SeedFilter`].
///
/// Rewards a triplet for every other top candidate of the same
/// (bottom, middle) pair that measures a compatible curvature (the same
/// track crossing further detector layers) and penalises large impact
/// parameters. The per-middle stage keeps the heaviest seeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardSeedFilter {
    config: SeedFilterConfig,
}

impl StandardSeedFilter {
    /// Create a filter with the given tuning.
    pub fn new(config: SeedFilterConfig) -> Self {
        StandardSeedFilter { config }
    }
}

impl<P> SeedFilter<P> for StandardSeedFilter {
    fn filter_fixed_bottom<'a>(
        &self,
        bottom: &InternalSpacePoint<'a, P>,
        middle: &InternalSpacePoint<'a, P>,
        tops: &[TopCandidate<'_, 'a, P>],
        z_origin: f64,
        out: &mut Vec<SeedCandidate<'a, P>>,
    ) {
        let mut compatible_radii = Vec::with_capacity(self.config.compat_seed_limit);
        for (i, candidate) in tops.iter().enumerate() {
            let lower_limit = candidate.curvature - self.config.delta_inv_helix_diameter;
            let upper_limit = candidate.curvature + self.config.delta_inv_helix_diameter;

            compatible_radii.clear();
            let mut weight = -candidate.impact * self.config.impact_weight_factor;
            for (j, other) in tops.iter().enumerate() {
                if i == j {
                    continue;
                }
                if other.curvature < lower_limit || other.curvature > upper_limit {
                    continue;
                }
                // A top within `delta_r_min` of one already counted is the
                // same layer crossing, not new evidence for the track.
                let is_new = compatible_radii
                    .iter()
                    .all(|&r: &f64| (r - other.top.radius()).abs() >= self.config.delta_r_min);
                if !is_new {
                    continue;
                }
                compatible_radii.push(other.top.radius());
                weight += self.config.compat_seed_weight;
                if compatible_radii.len() >= self.config.compat_seed_limit {
                    break;
                }
            }

            out.push(SeedCandidate {
                bottom: bottom.spacepoint(),
                middle: middle.spacepoint(),
                top: candidate.top.spacepoint(),
                z_origin,
                weight,
            });
        }
    }

    fn filter_per_middle<'a>(
        &self,
        candidates: &mut Vec<SeedCandidate<'a, P>>,
        max_seeds: usize,
        out: &mut Vec<Seed<'a, P>>,
    ) {
        // Heavier seeds first; ties broken towards the origin closest to the
        // nominal interaction point to keep the output reproducible.
        candidates.sort_unstable_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap()
                .then_with(|| a.z_origin.abs().partial_cmp(&b.z_origin.abs()).unwrap())
        });
        out.extend(candidates.drain(..).take(max_seeds).map(SeedCandidate::into_seed));
    }
}

#[cfg(test)]
mod tests;
