use anyhow::{bail, Result};

/// Immutable world configuration, shared by reference between the loader,
/// its chunks, and their partition trees. All generation is a pure function
/// of these values plus a chunk center.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSettings {
    /// Chunk side length in tiles.
    pub size: u32,
    /// World units per tile.
    pub tile_size: f32,
    pub seed: i32,
    /// World height of the (flat) floor plane.
    pub floor_y: f32,
}

impl WorldSettings {
    /// Side length of one chunk in world units.
    pub fn chunk_length(&self) -> f32 {
        self.size as f32 * self.tile_size
    }

    /// Rejects configurations the generator cannot tile.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size <= 0.0 || !self.tile_size.is_finite() {
            bail!("tile_size must be a positive finite number, got {}", self.tile_size);
        }
        if self.size == 0 {
            bail!("size must allow at least one tile per chunk side");
        }
        Ok(())
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            size: 64,
            tile_size: 8.0,
            seed: 0,
            floor_y: 70.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(WorldSettings::default().validate().is_ok());
        assert_eq!(WorldSettings::default().chunk_length(), 512.0);
    }

    #[test]
    fn degenerate_tile_size_rejected() {
        let settings = WorldSettings {
            tile_size: 0.0,
            ..WorldSettings::default()
        };
        assert!(settings.validate().is_err());
        let settings = WorldSettings {
            tile_size: -4.0,
            ..WorldSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_size_rejected() {
        let settings = WorldSettings {
            size: 0,
            ..WorldSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
