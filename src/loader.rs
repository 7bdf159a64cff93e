use std::sync::Arc;

use anyhow::Result;
use cgmath::Point2;

use crate::biome::Biome;
use crate::floor_chunk::FloorChunk;
use crate::settings::WorldSettings;

/// Relative offsets of the eight neighbor slots around the center chunk,
/// row-major over the 3x3 window with the origin removed.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A neighbor toward the low side of an axis is wanted once the observer's
/// fractional position drops below this; symmetrically `1 - LOAD_MARGIN`
/// for the high side. Prefetches before the boundary is crossed.
const LOAD_MARGIN: f32 = 0.2;

/// Streaming cache of a 3x3 chunk neighborhood around the observer. The
/// center chunk is always resident; neighbors are loaded and evicted
/// incrementally as the observer approaches or leaves the chunk edges, and
/// the whole window is rebuilt when the observer exits the center chunk.
pub struct FloorChunkLoader {
    settings: Arc<WorldSettings>,
    center: FloorChunk,
    neighbors: [Option<FloorChunk>; 8],
}

impl FloorChunkLoader {
    /// Builds the window around `(x, z)` with only the center chunk
    /// resident; neighbors fill in lazily on later movement. Fails on
    /// degenerate settings.
    pub fn new(x: f32, z: f32, settings: WorldSettings) -> Result<Self> {
        settings.validate()?;
        let settings = Arc::new(settings);
        let center = FloorChunk::new(aligned_center(x, z, &settings), settings.clone());
        Ok(Self {
            settings,
            center,
            neighbors: Default::default(),
        })
    }

    /// Per-tick streaming step driven by the observer position. Recenter
    /// is checked first: if the observer has left the center chunk
    /// entirely, the old window is dropped wholesale, so a large per-tick
    /// displacement can never leave a stale-centered window behind.
    pub fn load_after_movement(&mut self, x: f32, z: f32) {
        if !self.center.in_bounds(x, z) {
            let center = aligned_center(x, z, &self.settings);
            log::info!("recentering chunk window to ({}, {})", center.x, center.y);
            self.center = FloorChunk::new(center, self.settings.clone());
            self.neighbors = Default::default();
            return;
        }

        let length = self.center.length();
        let x_frac = (x - self.center.min_x()) / length;
        let z_frac = (z - self.center.min_z()) / length;

        for (slot, &(dx, dz)) in NEIGHBOR_OFFSETS.iter().enumerate() {
            let wanted = axis_wanted(x_frac, dx) && axis_wanted(z_frac, dz);
            match (self.neighbors[slot].is_some(), wanted) {
                (false, true) => {
                    log::debug!("loading neighbor chunk at offset ({dx}, {dz})");
                    self.neighbors[slot] = Some(self.center.new_neighbor(dx, dz));
                }
                (true, false) => {
                    log::debug!("evicting neighbor chunk at offset ({dx}, {dz})");
                    self.neighbors[slot] = None;
                }
                _ => {}
            }
        }
    }

    pub fn center_chunk(&self) -> &FloorChunk {
        &self.center
    }

    /// All resident chunks, center first. Never more than 9.
    pub fn chunks(&self) -> impl Iterator<Item = &FloorChunk> {
        std::iter::once(&self.center).chain(self.neighbors.iter().flatten())
    }

    /// World height of the flat floor plane.
    pub fn floor_y(&self) -> f32 {
        self.settings.floor_y
    }

    /// Floor height under `(x, z)`, or `None` when no resident chunk
    /// contains the point (unknown: do not collide).
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.chunk_at(x, z).map(FloorChunk::height)
    }

    /// Biome at `(x, z)` for the audio collaborator, or `None` when the
    /// point is outside every resident chunk.
    pub fn biome_at(&self, x: f32, z: f32) -> Option<Biome> {
        self.chunk_at(x, z).and_then(|chunk| chunk.biome_at(x, z))
    }

    fn chunk_at(&self, x: f32, z: f32) -> Option<&FloorChunk> {
        self.chunks().find(|chunk| chunk.in_bounds(x, z))
    }
}

/// Nearest chunk-aligned center to a world position. Rounds to the nearest
/// chunk, not merely truncates, and resolves a position exactly on a chunk
/// boundary to the chunk that starts there, matching the half-open
/// `[min, max)` rectangle test.
fn aligned_center(x: f32, z: f32, settings: &WorldSettings) -> Point2<f32> {
    let length = settings.chunk_length();
    Point2::new(
        (x / length + 0.5).floor() * length,
        (z / length + 0.5).floor() * length,
    )
}

fn axis_wanted(frac: f32, direction: i32) -> bool {
    if direction < 0 {
        frac < LOAD_MARGIN
    } else if direction > 0 {
        frac > 1.0 - LOAD_MARGIN
    } else {
        true
    }
}
