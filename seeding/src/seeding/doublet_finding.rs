use crate::config::DerivedConfig;
use crate::grid::{GridCell, InternalSpacePoint, SpacePointGrid};

// The doublet predicate is a pure filter: partners that cannot form a track
// with `middle` are skipped, the survivors are pushed into `out`.
//
// Every cell is sorted by non-decreasing radius up to one radius bucket, so
// once the radial separation falls out of the window on the short side there
// is nothing left to find in that cell. The early `break`s below rely on
// `delta_r_min` being larger than the bucket width, which holds in any
// practical configuration.

pub(super) fn compatible_bottoms<'g, 'a, P>(
    config: &DerivedConfig,
    grid: &'g SpacePointGrid<'a, P>,
    middle: &InternalSpacePoint<'a, P>,
    cells: &[GridCell],
    out: &mut Vec<&'g InternalSpacePoint<'a, P>>,
) {
    out.clear();
    let r_m = middle.radius();
    let z_m = middle.z();

    for &cell in cells {
        for bottom in grid.at(cell) {
            // Shrinks as the cell is traversed in increasing partner radius.
            let delta_r = r_m - bottom.radius();
            if delta_r > config.delta_r_max {
                continue;
            }
            if delta_r < config.delta_r_min {
                break;
            }
            let cot_theta = (z_m - bottom.z()) / delta_r;
            if cot_theta.abs() > config.cot_theta_max {
                continue;
            }
            let z_origin = z_m - r_m * cot_theta;
            if z_origin < config.collision_region_min || z_origin > config.collision_region_max {
                continue;
            }
            out.push(bottom);
        }
    }
}

pub(super) fn compatible_tops<'g, 'a, P>(
    config: &DerivedConfig,
    grid: &'g SpacePointGrid<'a, P>,
    middle: &InternalSpacePoint<'a, P>,
    cells: &[GridCell],
    out: &mut Vec<&'g InternalSpacePoint<'a, P>>,
) {
    out.clear();
    let r_m = middle.radius();
    let z_m = middle.z();

    for &cell in cells {
        for top in grid.at(cell) {
            // Grows as the cell is traversed in increasing partner radius.
            let delta_r = top.radius() - r_m;
            if delta_r < config.delta_r_min {
                continue;
            }
            if delta_r > config.delta_r_max {
                break;
            }
            let cot_theta = (top.z() - z_m) / delta_r;
            if cot_theta.abs() > config.cot_theta_max {
                continue;
            }
            let z_origin = z_m - r_m * cot_theta;
            if z_origin < config.collision_region_min || z_origin > config.collision_region_max {
                continue;
            }
            out.push(top);
        }
    }
}
