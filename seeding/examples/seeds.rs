use trackrec_seeding::{
    AlignmentCovariance, PhiNeighborBinFinder, SeedFinder, SeedingConfig, SpacePoint,
    StandardSeedFilter,
};
use uom::si::f64::Length;
use uom::si::length::millimeter;

// The finder works with whatever spacepoint type the caller already has; it
// only needs the position accessors.
struct Hit {
    x: f64,
    y: f64,
    z: f64,
}

impl SpacePoint for Hit {
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

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Three hits of a straight central track.
    let hits = vec![
        Hit {
            x: 30.0,
            y: 0.0,
            z: 10.0,
        },
        Hit {
            x: 80.0,
            y: 0.0,
            z: 25.0,
        },
        Hit {
            x: 180.0,
            y: 0.0,
            z: 55.0,
        },
    ];

    let finder = SeedFinder::try_from(SeedingConfig::default())?;
    let grid = finder.build_grid(&hits, &AlignmentCovariance);
    let seeds = finder.find_seeds(&grid, &PhiNeighborBinFinder, &StandardSeedFilter::default());

    for seed in seeds.into_iter().flatten() {
        println!(
            "seed: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1}), \
             weight {:.2}, origin {:.2} mm",
            seed.bottom.x, seed.bottom.y, seed.bottom.z,
            seed.middle.x, seed.middle.y, seed.middle.z,
            seed.top.x, seed.top.y, seed.top.z,
            seed.weight,
            seed.z_origin.get::<millimeter>(),
        );
    }

    Ok(())
}
