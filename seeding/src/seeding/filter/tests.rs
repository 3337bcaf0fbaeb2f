use super::*;
use uom::si::length::millimeter;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Point(u32);

const BOTTOM: Point = Point(0);
const MIDDLE: Point = Point(1);
const TOPS: [Point; 3] = [Point(2), Point(3), Point(4)];

fn internal(sp: &Point, r: f64) -> InternalSpacePoint<'_, Point> {
    InternalSpacePoint::new(sp, r, 0.0, 0.0, 0.0, 0.0)
}

#[test]
fn impact_parameter_penalises_weight() {
    let bottom = internal(&BOTTOM, 30.0);
    let middle = internal(&MIDDLE, 80.0);
    let top_0 = internal(&TOPS[0], 180.0);
    let top_1 = internal(&TOPS[1], 250.0);
    // Curvatures far beyond the compatibility window; no bonus applies.
    let tops = [
        TopCandidate {
            top: &top_0,
            curvature: 0.001,
            impact: 2.0,
        },
        TopCandidate {
            top: &top_1,
            curvature: 0.005,
            impact: 7.0,
        },
    ];

    let mut candidates = Vec::new();
    StandardSeedFilter::default().filter_fixed_bottom(&bottom, &middle, &tops, 25.0, &mut candidates);

    assert_eq!(candidates.len(), 2);
    assert!((candidates[0].weight + 2.0).abs() < 1e-12);
    assert!((candidates[1].weight + 7.0).abs() < 1e-12);
}

#[test]
fn compatible_curvatures_boost_weight() {
    let bottom = internal(&BOTTOM, 30.0);
    let middle = internal(&MIDDLE, 80.0);
    let top_0 = internal(&TOPS[0], 150.0);
    let top_1 = internal(&TOPS[1], 200.0);
    let top_2 = internal(&TOPS[2], 250.0);
    let tops = [
        TopCandidate {
            top: &top_0,
            curvature: 0.001,
            impact: 0.0,
        },
        TopCandidate {
            top: &top_1,
            curvature: 0.001,
            impact: 0.0,
        },
        TopCandidate {
            top: &top_2,
            curvature: 0.001,
            impact: 0.0,
        },
    ];

    let mut candidates = Vec::new();
    StandardSeedFilter::default().filter_fixed_bottom(&bottom, &middle, &tops, 0.0, &mut candidates);

    // Every candidate sees the two others as distinct compatible tops.
    assert_eq!(candidates.len(), 3);
    for candidate in &candidates {
        assert!((candidate.weight - 400.0).abs() < 1e-12);
    }
}

#[test]
fn close_radii_count_as_one_compatible_top() {
    let bottom = internal(&BOTTOM, 30.0);
    let middle = internal(&MIDDLE, 80.0);
    let top_0 = internal(&TOPS[0], 150.0);
    let top_1 = internal(&TOPS[1], 200.0);
    let top_2 = internal(&TOPS[2], 202.0);
    let tops = [
        TopCandidate {
            top: &top_0,
            curvature: 0.001,
            impact: 0.0,
        },
        TopCandidate {
            top: &top_1,
            curvature: 0.001,
            impact: 0.0,
        },
        TopCandidate {
            top: &top_2,
            curvature: 0.001,
            impact: 0.0,
        },
    ];

    let mut candidates = Vec::new();
    StandardSeedFilter::default().filter_fixed_bottom(&bottom, &middle, &tops, 0.0, &mut candidates);

    // The first candidate counts the tops at 200 mm and 202 mm as the same
    // layer crossing; the others see two distinct radii each.
    assert!((candidates[0].weight - 200.0).abs() < 1e-12);
    assert!((candidates[1].weight - 400.0).abs() < 1e-12);
    assert!((candidates[2].weight - 400.0).abs() < 1e-12);
}

#[test]
fn per_middle_stage_keeps_the_heaviest_seeds() {
    let mut candidates: Vec<SeedCandidate<'_, Point>> = (0..7)
        .map(|i| SeedCandidate {
            bottom: &BOTTOM,
            middle: &MIDDLE,
            top: &TOPS[0],
            z_origin: 10.0,
            weight: f64::from(i),
        })
        .collect();

    let mut seeds = Vec::new();
    StandardSeedFilter::default().filter_per_middle(&mut candidates, 3, &mut seeds);

    assert!(candidates.is_empty());
    assert_eq!(seeds.len(), 3);
    assert_eq!(seeds[0].weight, 6.0);
    assert_eq!(seeds[1].weight, 5.0);
    assert_eq!(seeds[2].weight, 4.0);
}

#[test]
fn equal_weights_prefer_origins_near_the_interaction_point() {
    let mut candidates: Vec<SeedCandidate<'_, Point>> = [50.0, -10.0, 30.0]
        .iter()
        .map(|&z_origin| SeedCandidate {
            bottom: &BOTTOM,
            middle: &MIDDLE,
            top: &TOPS[0],
            z_origin,
            weight: 0.0,
        })
        .collect();

    let mut seeds = Vec::new();
    StandardSeedFilter::default().filter_per_middle(&mut candidates, 2, &mut seeds);

    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].z_origin, Length::new::<millimeter>(-10.0));
    assert_eq!(seeds[1].z_origin, Length::new::<millimeter>(30.0));
}

#[test]
fn candidates_promote_to_seeds_with_dimensionful_origin() {
    let candidate = SeedCandidate {
        bottom: &BOTTOM,
        middle: &MIDDLE,
        top: &TOPS[0],
        z_origin: 42.0,
        weight: 1.5,
    };
    let seed = candidate.into_seed();

    assert_eq!(seed.bottom, &BOTTOM);
    assert_eq!(seed.top, &TOPS[0]);
    assert_eq!(seed.z_origin, Length::new::<millimeter>(42.0));
    assert_eq!(seed.weight, 1.5);
}
