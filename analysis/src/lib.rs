use serde::{Deserialize, Serialize};
use trackrec_seeding::{Seed, SpacePoint};
use uom::si::f64::Length;
use uom::si::length::millimeter;

/// One spacepoint row of an event CSV file. All coordinates are in mm.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct SpacePointRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SpacePoint for SpacePointRecord {
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

/// One output row per seed. The spacepoints are identified by their row
/// index in the input file; `z_origin` is in mm.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct SeedRecord {
    pub bottom: usize,
    pub middle: usize,
    pub top: usize,
    pub weight: f64,
    pub z_origin: f64,
}

/// Build the output row for `seed`, resolving every spacepoint reference
/// back to its row index in `spacepoints`.
///
/// # Panics
///
/// Panics if `seed` does not borrow from `spacepoints`.
pub fn seed_record(
    spacepoints: &[SpacePointRecord],
    seed: &Seed<'_, SpacePointRecord>,
) -> SeedRecord {
    let index = |sp: &SpacePointRecord| {
        spacepoints
            .iter()
            .position(|p| std::ptr::eq(p, sp))
            .expect("seed refers to a foreign spacepoint")
    };

    SeedRecord {
        bottom: index(seed.bottom),
        middle: index(seed.middle),
        top: index(seed.top),
        weight: seed.weight,
        z_origin: seed.z_origin.get::<millimeter>(),
    }
}

#[cfg(test)]
mod tests;
