use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::angle::radian;
use uom::si::energy::megaelectronvolt;
use uom::si::f64::{Angle, Energy, Length, MagneticFluxDensity};
use uom::si::length::millimeter;
use uom::si::magnetic_flux_density::kilotesla;

/// Configuration surface of the seed finder.
///
/// Every cut of the seeding pipeline is a field here. The configuration is
/// validated once, when it is turned into a
/// [`SeedFinder`](crate::SeedFinder); after that it is immutable.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SeedingConfig {
    /// Lower bound on the transverse momentum of a seed. Drives both the
    /// helix-diameter floor and the multiple-scattering bound.
    pub min_pt: Energy,
    /// Maximum |cot(theta)| of any doublet (longitudinal acceptance).
    pub cot_theta_max: f64,
    /// Minimum radial separation between the middle point and a partner.
    pub delta_r_min: Length,
    /// Maximum radial separation between the middle point and a partner.
    pub delta_r_max: Length,
    /// Maximum transverse impact parameter of the fitted helix.
    pub impact_max: Length,
    /// Width of the multiple-scattering bound, in standard deviations.
    pub sigma_scattering: f64,
    /// Cap on the number of seeds kept per middle spacepoint, enforced by
    /// the seed filter.
    pub max_seeds_per_middle: usize,
    /// Lower edge of the z-range within which the extrapolated origin of a
    /// doublet must lie.
    pub collision_region_min: Length,
    /// Upper edge of the z-range within which the extrapolated origin of a
    /// doublet must lie.
    pub collision_region_max: Length,
    /// Lower edge of the azimuthal region of interest.
    pub phi_min: Angle,
    /// Upper edge of the azimuthal region of interest.
    pub phi_max: Angle,
    /// Lower edge of the longitudinal region of interest.
    pub z_min: Length,
    /// Upper edge of the longitudinal region of interest.
    pub z_max: Length,
    /// Outer radius of the region of interest.
    pub r_max: Length,
    /// Longitudinal magnetic field.
    pub b_field_in_z: MagneticFluxDensity,
    /// Beam position in the transverse plane. Internal radii and azimuths
    /// are computed in a frame anchored here.
    pub beam_pos: (Length, Length),
    /// Radiation-length budget traversed by a seed (dimensionless fraction
    /// of X0); input of the Highland scattering term.
    pub rad_length_per_seed: f64,
    /// Alignment uncertainty along z, forwarded to the covariance tool.
    pub z_align: Length,
    /// Alignment uncertainty along r, forwarded to the covariance tool.
    pub r_align: Length,
    /// Scale factor forwarded to the covariance tool.
    pub sigma_error: f64,
}

impl Default for SeedingConfig {
    // The reference operating point: a 2 T solenoid, seeds above 400 MeV,
    // and an interaction region of +-150 mm.
    fn default() -> Self {
        SeedingConfig {
            min_pt: Energy::new::<megaelectronvolt>(400.0),
            cot_theta_max: 7.406_27,
            delta_r_min: Length::new::<millimeter>(5.0),
            delta_r_max: Length::new::<millimeter>(270.0),
            impact_max: Length::new::<millimeter>(10.0),
            sigma_scattering: 5.0,
            max_seeds_per_middle: 5,
            collision_region_min: Length::new::<millimeter>(-150.0),
            collision_region_max: Length::new::<millimeter>(150.0),
            phi_min: -Angle::HALF_TURN,
            phi_max: Angle::HALF_TURN,
            z_min: Length::new::<millimeter>(-2800.0),
            z_max: Length::new::<millimeter>(2800.0),
            r_max: Length::new::<millimeter>(600.0),
            b_field_in_z: MagneticFluxDensity::new::<kilotesla>(0.002),
            beam_pos: (
                Length::new::<millimeter>(0.0),
                Length::new::<millimeter>(0.0),
            ),
            rad_length_per_seed: 0.1,
            z_align: Length::new::<millimeter>(0.0),
            r_align: Length::new::<millimeter>(0.0),
            sigma_error: 5.0,
        }
    }
}

/// The error type returned when conversion from [`SeedingConfig`] to
/// [`SeedFinder`](crate::SeedFinder) fails.
#[derive(Debug, Error)]
pub enum TrySeedFinderFromConfigError {
    /// `min_pt` is not positive.
    #[error("`min_pt` must be positive (found `{found:?}`)")]
    NonPositiveMinPt { found: Energy },
    /// `b_field_in_z` is not positive.
    #[error("`b_field_in_z` must be positive (found `{found:?}`)")]
    NonPositiveBField { found: MagneticFluxDensity },
    /// `delta_r_min` is not positive.
    #[error("`delta_r_min` must be positive (found `{found:?}`)")]
    NonPositiveDeltaRMin { found: Length },
    /// The radial separation window is inverted.
    #[error("inverted radial separation window (min `{min:?}`, max `{max:?}`)")]
    InvertedDeltaRWindow { min: Length, max: Length },
    /// The azimuthal region of interest is empty.
    #[error("empty azimuthal region (min `{min:?}`, max `{max:?}`)")]
    EmptyPhiRegion { min: Angle, max: Angle },
    /// The longitudinal region of interest is empty.
    #[error("empty longitudinal region (min `{min:?}`, max `{max:?}`)")]
    EmptyZRegion { min: Length, max: Length },
    /// The collision region is inverted.
    #[error("inverted collision region (min `{min:?}`, max `{max:?}`)")]
    InvertedCollisionRegion { min: Length, max: Length },
    /// `r_max` is not positive.
    #[error("`r_max` must be positive (found `{found:?}`)")]
    NonPositiveRMax { found: Length },
    /// `sigma_scattering` is not positive.
    #[error("`sigma_scattering` must be positive (found `{found}`)")]
    NonPositiveSigmaScattering { found: f64 },
}

pub(crate) fn validate(config: &SeedingConfig) -> Result<(), TrySeedFinderFromConfigError> {
    let zero_energy = Energy::new::<megaelectronvolt>(0.0);
    let zero_length = Length::new::<millimeter>(0.0);
    let zero_field = MagneticFluxDensity::new::<kilotesla>(0.0);

    if config.min_pt <= zero_energy {
        return Err(TrySeedFinderFromConfigError::NonPositiveMinPt {
            found: config.min_pt,
        });
    }
    if config.b_field_in_z <= zero_field {
        return Err(TrySeedFinderFromConfigError::NonPositiveBField {
            found: config.b_field_in_z,
        });
    }
    if config.delta_r_min <= zero_length {
        return Err(TrySeedFinderFromConfigError::NonPositiveDeltaRMin {
            found: config.delta_r_min,
        });
    }
    if config.delta_r_min >= config.delta_r_max {
        return Err(TrySeedFinderFromConfigError::InvertedDeltaRWindow {
            min: config.delta_r_min,
            max: config.delta_r_max,
        });
    }
    if config.phi_min >= config.phi_max {
        return Err(TrySeedFinderFromConfigError::EmptyPhiRegion {
            min: config.phi_min,
            max: config.phi_max,
        });
    }
    if config.z_min >= config.z_max {
        return Err(TrySeedFinderFromConfigError::EmptyZRegion {
            min: config.z_min,
            max: config.z_max,
        });
    }
    if config.collision_region_min > config.collision_region_max {
        return Err(TrySeedFinderFromConfigError::InvertedCollisionRegion {
            min: config.collision_region_min,
            max: config.collision_region_max,
        });
    }
    if config.r_max <= zero_length {
        return Err(TrySeedFinderFromConfigError::NonPositiveRMax {
            found: config.r_max,
        });
    }
    if config.sigma_scattering <= 0.0 {
        return Err(TrySeedFinderFromConfigError::NonPositiveSigmaScattering {
            found: config.sigma_scattering,
        });
    }

    Ok(())
}

// The seeding kernel works exclusively with `f64`. There is no risk of
// messing up the units inside the kernel; BUT every value below is in
// MILLIMETER and MEGAELECTRONVOLT because that is what the seeding arithmetic
// expects the `f64`s to represent.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DerivedConfig {
    pub(crate) min_pt: f64,
    pub(crate) cot_theta_max: f64,
    pub(crate) delta_r_min: f64,
    pub(crate) delta_r_max: f64,
    pub(crate) impact_max: f64,
    pub(crate) sigma_scattering: f64,
    pub(crate) collision_region_min: f64,
    pub(crate) collision_region_max: f64,
    pub(crate) phi_min: f64,
    pub(crate) phi_max: f64,
    pub(crate) z_min: f64,
    pub(crate) z_max: f64,
    pub(crate) r_max: f64,
    pub(crate) beam_pos: (f64, f64),
    // Highland's rms multiple-scattering angle for the configured
    // radiation-length budget, in MeV (it multiplies 1/pT).
    pub(crate) highland: f64,
    // (highland / min_pt)^2; the squared scattering angle at the softest
    // accepted momentum.
    pub(crate) max_scattering_angle2: f64,
    // MeV/mm/kT convention: pT [MeV] = 300 * B [kT] * helix radius [mm].
    pub(crate) pt_per_helix_radius: f64,
    // Squared helix diameter of a `min_pt` track; any seed must curve less.
    pub(crate) min_helix_diameter2: f64,
    // (highland / pt_per_helix_radius)^2; turns a squared inverse helix
    // diameter into a squared scattering angle.
    pub(crate) pt2_per_radius: f64,
}

impl From<&SeedingConfig> for DerivedConfig {
    fn from(config: &SeedingConfig) -> Self {
        let min_pt = config.min_pt.get::<megaelectronvolt>();
        let rad_length = config.rad_length_per_seed;
        let highland = 13.6 * rad_length.sqrt() * (1.0 + 0.038 * rad_length.ln());
        let max_scattering_angle = highland / min_pt;
        let pt_per_helix_radius = 300.0 * config.b_field_in_z.get::<kilotesla>();
        let min_helix_diameter = 2.0 * min_pt / pt_per_helix_radius;

        DerivedConfig {
            min_pt,
            cot_theta_max: config.cot_theta_max,
            delta_r_min: config.delta_r_min.get::<millimeter>(),
            delta_r_max: config.delta_r_max.get::<millimeter>(),
            impact_max: config.impact_max.get::<millimeter>(),
            sigma_scattering: config.sigma_scattering,
            collision_region_min: config.collision_region_min.get::<millimeter>(),
            collision_region_max: config.collision_region_max.get::<millimeter>(),
            phi_min: config.phi_min.get::<radian>(),
            phi_max: config.phi_max.get::<radian>(),
            z_min: config.z_min.get::<millimeter>(),
            z_max: config.z_max.get::<millimeter>(),
            r_max: config.r_max.get::<millimeter>(),
            beam_pos: (
                config.beam_pos.0.get::<millimeter>(),
                config.beam_pos.1.get::<millimeter>(),
            ),
            highland,
            max_scattering_angle2: max_scattering_angle * max_scattering_angle,
            pt_per_helix_radius,
            min_helix_diameter2: min_helix_diameter * min_helix_diameter,
            pt2_per_radius: (highland / pt_per_helix_radius).powi(2),
        }
    }
}
