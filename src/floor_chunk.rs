use std::sync::Arc;

use cgmath::Point2;

use crate::biome::Biome;
use crate::room::{Room, TileInstance, WallInstance};
use crate::room_tree::RoomTree;
use crate::settings::WorldSettings;

/// One streamed square of the world: the partition of its footprint into
/// rooms plus the flattened union of every room's geometry buffers, ready
/// for batched upload. Immutable once built; regeneration from the same
/// seed and center is bit-identical.
pub struct FloorChunk {
    center: Point2<f32>,
    settings: Arc<WorldSettings>,
    tree: RoomTree,
    tile_positions: Vec<TileInstance>,
    ceiling_positions: Vec<TileInstance>,
    tile_biomes: Vec<f32>,
    walls: Vec<WallInstance>,
    wall_biomes: Vec<f32>,
}

impl FloorChunk {
    pub fn new(center: Point2<f32>, settings: Arc<WorldSettings>) -> Self {
        let half = settings.chunk_length() / 2.0;
        let min = Point2::new(center.x - half, center.y - half);
        let max = Point2::new(center.x + half, center.y + half);
        let tree = RoomTree::new(min, max, settings.clone());

        let mut chunk = Self {
            center,
            settings,
            tree,
            tile_positions: Vec::new(),
            ceiling_positions: Vec::new(),
            tile_biomes: Vec::new(),
            walls: Vec::new(),
            wall_biomes: Vec::new(),
        };
        for room in chunk.tree.rooms() {
            chunk.tile_positions.extend_from_slice(room.tile_positions());
            chunk
                .ceiling_positions
                .extend_from_slice(room.ceiling_positions());
            chunk.tile_biomes.extend_from_slice(room.tile_biomes());
            chunk.walls.extend_from_slice(room.walls());
            chunk.wall_biomes.extend_from_slice(room.wall_biomes());
        }
        chunk
    }

    /// A freshly generated chunk offset by whole chunk lengths. No state is
    /// shared with this chunk; determinism makes regeneration equivalent to
    /// caching.
    pub fn new_neighbor(&self, dx: i32, dz: i32) -> FloorChunk {
        let length = self.length();
        let center = Point2::new(
            self.center.x + dx as f32 * length,
            self.center.y + dz as f32 * length,
        );
        FloorChunk::new(center, self.settings.clone())
    }

    pub fn center(&self) -> Point2<f32> {
        self.center
    }

    pub fn length(&self) -> f32 {
        self.settings.chunk_length()
    }

    pub fn min_x(&self) -> f32 {
        self.center.x - self.length() / 2.0
    }

    pub fn max_x(&self) -> f32 {
        self.center.x + self.length() / 2.0
    }

    pub fn min_z(&self) -> f32 {
        self.center.y - self.length() / 2.0
    }

    pub fn max_z(&self) -> f32 {
        self.center.y + self.length() / 2.0
    }

    /// Half-open rectangle test: the min edges are inside, the max edges
    /// belong to the next chunk over.
    pub fn in_bounds(&self, x: f32, z: f32) -> bool {
        x >= self.min_x() && x < self.max_x() && z >= self.min_z() && z < self.max_z()
    }

    /// The floor is flat: every point of the chunk sits at `floor_y`.
    pub fn height(&self) -> f32 {
        self.settings.floor_y
    }

    pub fn biome_at(&self, x: f32, z: f32) -> Option<Biome> {
        self.tree.biome_at(x, z)
    }

    pub fn rooms(&self) -> &[Room] {
        self.tree.rooms()
    }

    pub fn num_tiles(&self) -> usize {
        self.tile_positions.len()
    }

    pub fn num_walls(&self) -> usize {
        self.walls.len()
    }

    pub fn tile_positions(&self) -> &[TileInstance] {
        &self.tile_positions
    }

    pub fn ceiling_positions(&self) -> &[TileInstance] {
        &self.ceiling_positions
    }

    pub fn tile_biomes(&self) -> &[f32] {
        &self.tile_biomes
    }

    pub fn walls(&self) -> &[WallInstance] {
        &self.walls
    }

    pub fn wall_biomes(&self) -> &[f32] {
        &self.wall_biomes
    }

    /// Byte views for direct buffer upload.
    pub fn tile_position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tile_positions)
    }

    pub fn ceiling_position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.ceiling_positions)
    }

    pub fn tile_biome_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tile_biomes)
    }

    pub fn wall_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.walls)
    }

    pub fn wall_biome_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.wall_biomes)
    }
}
