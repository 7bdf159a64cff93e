/// Number of biome variants; biome selection truncates a `[0, 1)` noise
/// sample scaled by this count.
pub const NUM_BIOMES: usize = 4;

/// Visual/audio theme of a room. Closed set: everything downstream branches
/// on the id, so new variants mean new table rows, not new subclasses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Office,
    Pool,
    Garage,
    School,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeConfig {
    /// Floor-to-ceiling height of rooms in this biome, in world units.
    pub room_height: f32,
    pub wall_tint: [f32; 3],
    pub fog_density: f32,
}

impl Biome {
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < NUM_BIOMES);
        match index {
            0 => Biome::Office,
            1 => Biome::Pool,
            2 => Biome::Garage,
            _ => Biome::School,
        }
    }

    /// Numeric id as consumed by shader attributes and the audio
    /// collaborator.
    pub fn id(self) -> u32 {
        match self {
            Biome::Office => 0,
            Biome::Pool => 1,
            Biome::Garage => 2,
            Biome::School => 3,
        }
    }

    pub fn config(self) -> BiomeConfig {
        match self {
            Biome::Office => BiomeConfig {
                room_height: 6.0,
                wall_tint: [0.7, 0.7, 0.0],
                fog_density: 0.055,
            },
            Biome::Pool => BiomeConfig {
                room_height: 12.0,
                wall_tint: [0.7, 0.0, 0.0],
                fog_density: 0.085,
            },
            Biome::Garage => BiomeConfig {
                room_height: 9.0,
                wall_tint: [0.0, 0.7, 0.7],
                fog_density: 0.04,
            },
            Biome::School => BiomeConfig {
                room_height: 6.0,
                wall_tint: [0.7, 0.0, 0.7],
                fog_density: 0.05,
            },
        }
    }

    pub fn room_height(self) -> f32 {
        self.config().room_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_index() {
        for id in 0..NUM_BIOMES {
            assert_eq!(Biome::from_index(id).id() as usize, id);
        }
    }

    #[test]
    fn room_heights_are_at_least_base_height() {
        for id in 0..NUM_BIOMES {
            assert!(Biome::from_index(id).room_height() >= 6.0);
        }
    }

    #[test]
    fn palette_table_rows_are_pinned() {
        assert_eq!(Biome::Office.config().wall_tint, [0.7, 0.7, 0.0]);
        assert_eq!(Biome::Pool.config().wall_tint, [0.7, 0.0, 0.0]);
        assert_eq!(Biome::Garage.config().wall_tint, [0.0, 0.7, 0.7]);
        assert_eq!(Biome::School.config().wall_tint, [0.7, 0.0, 0.7]);

        assert_eq!(Biome::Office.config().fog_density, 0.055);
        assert_eq!(Biome::Pool.config().fog_density, 0.085);
        assert_eq!(Biome::Garage.config().fog_density, 0.04);
        assert_eq!(Biome::School.config().fog_density, 0.05);
    }
}
