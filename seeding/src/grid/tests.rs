use super::*;
use crate::config::DerivedConfig;
use crate::AlignmentCovariance;
use proptest::prelude::*;
use uom::si::angle::radian;
use uom::si::f64::{Angle, Length};
use uom::si::length::millimeter;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Point {
    x: f64,
    y: f64,
    z: f64,
}

impl SpacePoint for Point {
    fn x(&self) -> Length {
        Length::new::<millimeter>(self.x)
    }
    fn y(&self) -> Length {
        Length::new::<millimeter>(self.y)
    }
    fn z(&self) -> Length {
        Length::new::<millimeter>(self.z)
    }
}

fn build<'a>(points: &'a [Point], config: &SeedingConfig) -> SpacePointGrid<'a, Point> {
    let derived = DerivedConfig::from(config);
    SpacePointGrid::new(points, &AlignmentCovariance, config, &derived)
}

#[test]
fn grid_dimensions_at_default_config() {
    let size = grid_size(&DerivedConfig::from(&SeedingConfig::default()));
    // One z cell covers 7.40627 * 270 mm of the 5600 mm long region.
    assert_eq!(size.z_bins, 2);
    // The azimuthal coverage of one 400 MeV triplet in a 2 T field is a bit
    // more than 0.2 rad.
    assert!(size.phi_bins >= 25);
    assert!(size.phi_bins <= 32);
}

#[test]
fn degenerate_configurations_collapse_to_one_cell() {
    let config = SeedingConfig {
        z_min: Length::new::<millimeter>(-100.0),
        z_max: Length::new::<millimeter>(100.0),
        ..Default::default()
    };
    let size = grid_size(&DerivedConfig::from(&config));
    assert_eq!(size.z_bins, 1);
}

#[test]
fn out_of_region_points_are_skipped() {
    let config = SeedingConfig::default();
    let points = [
        // In region.
        Point {
            x: 100.0,
            y: 0.0,
            z: 0.0,
        },
        // Beyond the z region.
        Point {
            x: 100.0,
            y: 0.0,
            z: 2801.0,
        },
        Point {
            x: 100.0,
            y: 0.0,
            z: -2801.0,
        },
        // Beyond the outer radius.
        Point {
            x: 601.0,
            y: 0.0,
            z: 0.0,
        },
    ];
    let grid = build(&points, &config);

    assert_eq!(grid.num_spacepoints(), 1);
}

#[test]
fn radius_edge_is_dropped_by_bucket_index() {
    let config = SeedingConfig {
        r_max: Length::new::<millimeter>(600.5),
        ..Default::default()
    };
    // Both radii are below `r_max`, but the floored radius of the second
    // point lands past the last whole-millimetre bucket and is discarded
    // with it.
    let points = [
        Point {
            x: 599.5,
            y: 0.0,
            z: 0.0,
        },
        Point {
            x: 600.2,
            y: 0.0,
            z: 0.0,
        },
    ];
    let grid = build(&points, &config);

    assert_eq!(grid.num_spacepoints(), 1);
}

#[test]
fn radii_are_computed_in_the_beam_frame() {
    let config = SeedingConfig {
        beam_pos: (
            Length::new::<millimeter>(3.0),
            Length::new::<millimeter>(4.0),
        ),
        ..Default::default()
    };
    let points = [Point {
        x: 33.0,
        y: 44.0,
        z: 0.0,
    }];
    let grid = build(&points, &config);

    let cell = grid.cells().find(|&c| !grid.at(c).is_empty()).unwrap();
    let internal = &grid.at(cell)[0];
    assert!((internal.radius() - 50.0).abs() < 1e-9);
    assert!((internal.phi() - (40.0f64).atan2(30.0)).abs() < 1e-9);
}

#[test]
fn azimuthal_region_is_cut_in_detector_coordinates() {
    let config = SeedingConfig {
        phi_min: Angle::new::<radian>(-1.0),
        phi_max: Angle::new::<radian>(1.0),
        ..Default::default()
    };
    let points = [
        Point {
            x: 100.0,
            y: 10.0,
            z: 0.0,
        },
        // phi = pi/2, outside the configured region.
        Point {
            x: 0.0,
            y: 100.0,
            z: 0.0,
        },
    ];
    let grid = build(&points, &config);

    assert_eq!(grid.num_spacepoints(), 1);
}

#[test]
fn single_cell_neighborhood_is_the_cell_itself() {
    let size = GridSize {
        phi_bins: 28,
        z_bins: 2,
    };
    let cell = GridCell { phi: 3, z: 1 };

    assert_eq!(SingleCellBinFinder.bottom_neighborhood(cell, size), [cell]);
    assert_eq!(SingleCellBinFinder.top_neighborhood(cell, size), [cell]);
}

#[test]
fn phi_neighborhood_wraps_around() {
    let size = GridSize {
        phi_bins: 28,
        z_bins: 2,
    };

    let first = GridCell { phi: 0, z: 0 };
    assert_eq!(
        PhiNeighborBinFinder.bottom_neighborhood(first, size),
        [
            GridCell { phi: 27, z: 0 },
            GridCell { phi: 0, z: 0 },
            GridCell { phi: 1, z: 0 },
        ]
    );

    let last = GridCell { phi: 27, z: 1 };
    assert_eq!(
        PhiNeighborBinFinder.top_neighborhood(last, size),
        [
            GridCell { phi: 26, z: 1 },
            GridCell { phi: 27, z: 1 },
            GridCell { phi: 0, z: 1 },
        ]
    );
}

#[test]
fn narrow_grids_report_each_neighbor_once() {
    let one = GridSize {
        phi_bins: 1,
        z_bins: 1,
    };
    let cell = GridCell { phi: 0, z: 0 };
    assert_eq!(PhiNeighborBinFinder.bottom_neighborhood(cell, one), [cell]);

    let two = GridSize {
        phi_bins: 2,
        z_bins: 1,
    };
    assert_eq!(
        PhiNeighborBinFinder.bottom_neighborhood(cell, two),
        [GridCell { phi: 1, z: 0 }, cell]
    );
}

proptest! {
    #[test]
    fn every_in_region_point_is_indexed_exactly_once(
        raw in prop::collection::vec(
            (-650.0..650.0f64, -650.0..650.0f64, -3000.0..3000.0f64),
            0..200,
        )
    ) {
        let points: Vec<Point> = raw
            .into_iter()
            .map(|(x, y, z)| Point { x, y, z })
            .collect();
        let config = SeedingConfig::default();
        let grid = build(&points, &config);

        let in_region = points
            .iter()
            .filter(|p| p.z.abs() <= 2800.0 && (p.x.hypot(p.y) as usize) < 600)
            .count();
        prop_assert_eq!(grid.num_spacepoints(), in_region);
    }

    #[test]
    fn bins_are_near_sorted_by_radius(
        raw in prop::collection::vec(
            (-600.0..600.0f64, -600.0..600.0f64, -2800.0..2800.0f64),
            0..200,
        )
    ) {
        let points: Vec<Point> = raw
            .into_iter()
            .map(|(x, y, z)| Point { x, y, z })
            .collect();
        let config = SeedingConfig::default();
        let grid = build(&points, &config);

        for cell in grid.cells() {
            for pair in grid.at(cell).windows(2) {
                prop_assert!(
                    pair[1].radius() > pair[0].radius() - SpacePointGrid::<Point>::R_BUCKET
                );
            }
        }
    }
}
