use super::filter::{SeedCandidate, SeedFilter, TopCandidate};
use super::transform::{self, LinCircle};
use super::{doublet_finding, Seed};
use crate::config::DerivedConfig;
use crate::grid::{GridCell, InternalSpacePoint, SpacePointGrid};

// Buffers reused across the middles of one cell. They are cleared, never
// reallocated, between middles; the triplet scan allocates nothing once they
// have reached their working size.
pub(super) struct Scratch<'g, 'a, P> {
    compat_bottoms: Vec<&'g InternalSpacePoint<'a, P>>,
    compat_tops: Vec<&'g InternalSpacePoint<'a, P>>,
    lin_bottoms: Vec<LinCircle>,
    lin_tops: Vec<LinCircle>,
    top_candidates: Vec<TopCandidate<'g, 'a, P>>,
    seed_candidates: Vec<SeedCandidate<'a, P>>,
}

impl<'g, 'a, P> Scratch<'g, 'a, P> {
    pub(super) fn new() -> Self {
        Scratch {
            compat_bottoms: Vec::new(),
            compat_tops: Vec::new(),
            lin_bottoms: Vec::new(),
            lin_tops: Vec::new(),
            top_candidates: Vec::new(),
            seed_candidates: Vec::new(),
        }
    }
}

// Pair every compatible bottom of `middle` with every compatible top in
// conformal space, apply the scattering, helix-diameter, and
// impact-parameter cuts, and hand the survivors to the seed filter.
//
// Everything on the way to an accepted candidate stays squared; the only
// square roots taken are the error bound of a pair whose angular difference
// sticks out of its measurement error, and the curvature of an accepted
// candidate.
#[allow(clippy::too_many_arguments)]
pub(super) fn seeds_for_middle<'g, 'a, P, F>(
    config: &DerivedConfig,
    grid: &'g SpacePointGrid<'a, P>,
    middle: &'g InternalSpacePoint<'a, P>,
    bottom_cells: &[GridCell],
    top_cells: &[GridCell],
    seed_filter: &F,
    max_seeds_per_middle: usize,
    scratch: &mut Scratch<'g, 'a, P>,
    out: &mut Vec<Seed<'a, P>>,
) where
    F: SeedFilter<P> + ?Sized,
{
    let Scratch {
        compat_bottoms,
        compat_tops,
        lin_bottoms,
        lin_tops,
        top_candidates,
        seed_candidates,
    } = scratch;

    doublet_finding::compatible_bottoms(config, grid, middle, bottom_cells, compat_bottoms);
    if compat_bottoms.is_empty() {
        return;
    }
    doublet_finding::compatible_tops(config, grid, middle, top_cells, compat_tops);
    if compat_tops.is_empty() {
        return;
    }

    transform::transform_coordinates(middle, compat_bottoms, true, lin_bottoms);
    transform::transform_coordinates(middle, compat_tops, false, lin_tops);

    let r_m = middle.radius();
    let cov_r_m = middle.cov_r();
    let cov_z_m = middle.cov_z();
    let sigma2 = config.sigma_scattering * config.sigma_scattering;

    seed_candidates.clear();
    for (&bottom, lin_b) in compat_bottoms.iter().zip(lin_bottoms.iter()) {
        let cot_theta_b = lin_b.cot_theta;
        // 1 + cot^2(theta) = 1 / sin^2(theta)
        let i_sin_theta2 = 1.0 + cot_theta_b * cot_theta_b;
        // The scattering bound for a track at the softest accepted momentum,
        // widened to the configured number of standard deviations.
        let scattering_in_region2 = config.max_scattering_angle2 * i_sin_theta2 * sigma2;

        top_candidates.clear();
        for (&top, lin_t) in compat_tops.iter().zip(lin_tops.iter()) {
            // Squared error on the difference of the two doublet angles,
            // including the correlated contribution of the shared middle
            // point.
            let error2 = lin_t.er
                + lin_b.er
                + 2.0 * (cot_theta_b * lin_t.cot_theta * cov_r_m + cov_z_m)
                    * lin_b.i_delta_r
                    * lin_t.i_delta_r;
            let delta_cot_theta = cot_theta_b - lin_t.cot_theta;
            let delta_cot_theta2 = delta_cot_theta * delta_cot_theta;
            // (|delta cot(theta)| - error)^2, the part of the angular
            // difference that sticks out of the measurement error. Zero when
            // the difference is within the error.
            let mut d_cot_excess2 = 0.0;
            if delta_cot_theta2 - error2 > 0.0 {
                let error = error2.sqrt();
                d_cot_excess2 = delta_cot_theta2 + error2 - 2.0 * delta_cot_theta.abs() * error;
                if d_cot_excess2 > scattering_in_region2 {
                    continue;
                }
            }
            // Line through the two partners in the conformal plane.
            let d_u = lin_t.u - lin_b.u;
            // Parallel rays: no circle maps onto this pair.
            if d_u == 0.0 {
                continue;
            }
            let a = (lin_t.v - lin_b.v) / d_u;
            let s2 = 1.0 + a * a;
            let b = lin_b.v - a * lin_b.u;
            let b2 = b * b;
            // S^2 / B^2 is the squared helix diameter; a seed must curve
            // less than one at the minimum transverse momentum.
            if s2 < b2 * config.min_helix_diameter2 {
                continue;
            }
            // Repeat the scattering comparison against the momentum actually
            // measured by the triplet instead of the softest accepted one.
            let i_helix_diameter2 = b2 / s2;
            let pt2_scatter = 4.0 * i_helix_diameter2 * config.pt2_per_radius;
            let p2_scatter = pt2_scatter * i_sin_theta2;
            if delta_cot_theta2 - error2 > 0.0 && d_cot_excess2 > p2_scatter * sigma2 {
                continue;
            }
            // Transverse impact parameter of the fitted circle.
            let impact = ((a - b * r_m) * r_m).abs();
            if impact > config.impact_max {
                continue;
            }
            top_candidates.push(TopCandidate {
                top,
                curvature: b / s2.sqrt(),
                impact,
            });
        }
        if top_candidates.is_empty() {
            continue;
        }
        seed_filter.filter_fixed_bottom(
            bottom,
            middle,
            top_candidates,
            lin_b.z_origin,
            seed_candidates,
        );
    }

    seed_filter.filter_per_middle(seed_candidates, max_seeds_per_middle, out);
}
