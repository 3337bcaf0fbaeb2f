use crate::grid::InternalSpacePoint;

// In the transverse plane, the conformal transformation:
// u = x / (x^2 + y^2)
// v = y / (x^2 + y^2)
// anchored at the middle spacepoint maps the circle through the middle point,
// x^2 + y^2 - 2*x0*x - 2*y0*y = 0, into the straight line
// 1 - 2*x0*u - 2*y0*v = 0.
//
// Fitting a triplet therefore reduces to the line through its two partners
// in (u, v), which the triplet cuts evaluate with affine arithmetic only.

// The conformal coordinates of one (middle, partner) pair, together with the
// longitudinal quantities that the triplet cuts consume.
#[derive(Clone, Copy, Debug)]
pub(super) struct LinCircle {
    pub(super) cot_theta: f64,
    // z-axis intercept of the doublet extrapolated to r = 0 (mm).
    pub(super) z_origin: f64,
    // Reciprocal transverse distance between partner and middle (1/mm).
    pub(super) i_delta_r: f64,
    pub(super) u: f64,
    pub(super) v: f64,
    // Propagated squared error on cot(theta), dimensionless.
    pub(super) er: f64,
}

// Transform `partners` into conformal coordinates anchored at `middle`.
// `bottom` selects the sign convention of cot(theta) so that both doublets
// of an accepted triplet measure the same polar angle.
pub(super) fn transform_coordinates<'g, 'a, P>(
    middle: &InternalSpacePoint<'a, P>,
    partners: &[&'g InternalSpacePoint<'a, P>],
    bottom: bool,
    out: &mut Vec<LinCircle>,
) {
    out.clear();
    let r_m = middle.radius();
    let z_m = middle.z();
    let cov_r_m = middle.cov_r();
    let cov_z_m = middle.cov_z();
    let cos_phi_m = middle.x() / r_m;
    let sin_phi_m = middle.y() / r_m;
    let sign = if bottom { -1.0 } else { 1.0 };

    for partner in partners {
        let delta_x = partner.x() - middle.x();
        let delta_y = partner.y() - middle.y();
        let delta_z = partner.z() - middle.z();
        // Rotate into the frame whose x axis points along the middle
        // point's radial direction.
        let x = delta_x * cos_phi_m + delta_y * sin_phi_m;
        let y = delta_y * cos_phi_m - delta_x * sin_phi_m;
        let i_delta_r2 = 1.0 / (delta_x * delta_x + delta_y * delta_y);
        let i_delta_r = i_delta_r2.sqrt();
        let cot_theta = delta_z * i_delta_r * sign;

        out.push(LinCircle {
            cot_theta,
            z_origin: z_m - r_m * cot_theta,
            i_delta_r,
            u: x * i_delta_r2,
            v: y * i_delta_r2,
            er: ((cov_z_m + partner.cov_z())
                + cot_theta * cot_theta * (cov_r_m + partner.cov_r()))
                * i_delta_r2,
        });
    }
}
