use bytemuck::{Pod, Zeroable};
use cgmath::Point2;

use crate::biome::{Biome, NUM_BIOMES};
use crate::noise::{value_noise, white_noise};
use crate::room_tree::Axis;
use crate::settings::WorldSettings;

/// Height of the ground-level wall panels. Biomes taller than this get a
/// continuous lintel above the doorway line.
pub const BASE_WALL_HEIGHT: f32 = 6.0;

/// A panel is left open as a doorway when its noise sample falls at or
/// below this cutoff, so roughly one panel in ten is a door.
const DOOR_NOISE_CUTOFF: f64 = 0.1;

/// One floor or ceiling tile, laid out for direct upload as a per-instance
/// vertex attribute (x, y, z, pad).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TileInstance {
    pub position: [f32; 3],
    pub pad: f32,
}

/// One wall segment: world-space center offset plus a per-axis scale for a
/// unit cube. Two vec4 attributes per instance.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct WallInstance {
    pub offset: [f32; 4],
    pub scale: [f32; 4],
}

impl TileInstance {
    fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            pad: 0.0,
        }
    }
}

/// A terminal region of the partition: one rectangular playable space with
/// a single biome, its floor and ceiling tile grids, and four walls pierced
/// by doorway gaps.
pub struct Room {
    min_corner: Point2<f32>,
    max_corner: Point2<f32>,
    biome: Biome,
    tile_positions: Vec<TileInstance>,
    ceiling_positions: Vec<TileInstance>,
    tile_biomes: Vec<f32>,
    walls: Vec<WallInstance>,
    wall_biomes: Vec<f32>,
}

impl Room {
    pub fn new(min_corner: Point2<f32>, max_corner: Point2<f32>, settings: &WorldSettings) -> Self {
        let mut room = Self {
            min_corner,
            max_corner,
            biome: Self::biome_for(min_corner, max_corner, settings),
            tile_positions: Vec::new(),
            ceiling_positions: Vec::new(),
            tile_biomes: Vec::new(),
            walls: Vec::new(),
            wall_biomes: Vec::new(),
        };
        room.generate_tiles(settings);
        room.generate_walls(settings);
        room
    }

    /// Biome classification for a room rectangle: coherent noise sampled
    /// once at the rectangle center, truncated into `[0, NUM_BIOMES)`.
    /// Pure, so the partition tree can re-derive it during point lookups.
    pub fn biome_for(
        min_corner: Point2<f32>,
        max_corner: Point2<f32>,
        settings: &WorldSettings,
    ) -> Biome {
        let center = Point2::new(
            (min_corner.x + max_corner.x) / 2.0,
            (min_corner.y + max_corner.y) / 2.0,
        );
        let sample = value_noise(center, settings.tile_size, settings.seed);
        Biome::from_index((sample * NUM_BIOMES as f64) as usize)
    }

    fn generate_tiles(&mut self, settings: &WorldSettings) {
        let tile = settings.tile_size;
        let width = ((self.max_corner.x - self.min_corner.x) / tile).round() as u32;
        let depth = ((self.max_corner.y - self.min_corner.y) / tile).round() as u32;
        let ceiling_y = settings.floor_y + self.biome.room_height();
        let biome_id = self.biome.id() as f32;

        self.tile_positions.reserve((width * depth) as usize);
        self.ceiling_positions.reserve((width * depth) as usize);
        self.tile_biomes.reserve((width * depth) as usize);
        for i in 0..depth {
            for j in 0..width {
                let x = self.min_corner.x + j as f32 * tile;
                let z = self.min_corner.y + i as f32 * tile;
                self.tile_positions
                    .push(TileInstance::at(x, settings.floor_y, z));
                self.ceiling_positions.push(TileInstance::at(x, ceiling_y, z));
                self.tile_biomes.push(biome_id);
            }
        }
    }

    fn generate_walls(&mut self, settings: &WorldSettings) {
        let (min, max) = (self.min_corner, self.max_corner);
        self.wall_side(min.y, max.y, min.x, Axis::X, settings);
        self.wall_side(min.y, max.y, max.x, Axis::X, settings);
        self.wall_side(min.x, max.x, min.y, Axis::Z, settings);
        self.wall_side(min.x, max.x, max.y, Axis::Z, settings);
    }

    /// Emits one side of the room: `panel_count` door-sized ground panels,
    /// each solid or left open by the noise field, plus a full-length
    /// lintel above the doorway line for tall biomes.
    fn wall_side(
        &mut self,
        start: f32,
        stop: f32,
        const_coord: f32,
        const_axis: Axis,
        settings: &WorldSettings,
    ) {
        let tile = settings.tile_size;
        // Wall cubes are unit-centered; shift by half a tile so segments
        // land on the tile grid edges.
        let shift = tile / 2.0;
        let room_height = self.biome.room_height();
        let panel_height = room_height.min(BASE_WALL_HEIGHT);
        let panel_count = ((stop - start) / tile).round() as u32;

        for panel in 0..panel_count {
            let run_center = start + (panel as f32 + 0.5) * tile;
            let panel_center = match const_axis {
                Axis::X => Point2::new(const_coord, run_center),
                Axis::Z => Point2::new(run_center, const_coord),
            };
            if white_noise(panel_center, settings.seed) <= DOOR_NOISE_CUTOFF {
                continue; // doorway
            }
            self.push_wall(
                const_axis,
                const_coord - shift,
                run_center - shift,
                settings.floor_y + panel_height / 2.0,
                tile,
                panel_height,
            );
        }

        if room_height > BASE_WALL_HEIGHT {
            let lintel_height = room_height - BASE_WALL_HEIGHT;
            self.push_wall(
                const_axis,
                const_coord - shift,
                (start + stop) / 2.0 - shift,
                settings.floor_y + BASE_WALL_HEIGHT + lintel_height / 2.0,
                stop - start,
                lintel_height,
            );
        }
    }

    fn push_wall(
        &mut self,
        const_axis: Axis,
        const_pos: f32,
        run_pos: f32,
        y: f32,
        run_length: f32,
        height: f32,
    ) {
        let (offset, scale) = match const_axis {
            Axis::X => (
                [const_pos, y, run_pos, 0.0],
                [1.0, height, run_length, 1.0],
            ),
            Axis::Z => (
                [run_pos, y, const_pos, 0.0],
                [run_length, height, 1.0, 1.0],
            ),
        };
        self.walls.push(WallInstance { offset, scale });
        self.wall_biomes.push(self.biome.id() as f32);
    }

    pub fn min_corner(&self) -> Point2<f32> {
        self.min_corner
    }

    pub fn max_corner(&self) -> Point2<f32> {
        self.max_corner
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn num_tiles(&self) -> usize {
        self.tile_positions.len()
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(seed: i32) -> WorldSettings {
        WorldSettings {
            size: 64,
            tile_size: 8.0,
            seed,
            floor_y: 70.0,
        }
    }

    fn room_with_biome(settings: &WorldSettings, want: Biome) -> Room {
        // Biome follows the noise field, so scan rectangle positions until
        // one classifies as the requested variant.
        for i in 0..512 {
            let min = Point2::new(i as f32 * 32.0, 0.0);
            let max = min + cgmath::Vector2::new(32.0, 24.0);
            if Room::biome_for(min, max, settings) == want {
                return Room::new(min, max, settings);
            }
        }
        panic!("no {want:?} room found in scan");
    }

    #[test]
    fn tile_grids_cover_the_rectangle() {
        let settings = settings(7);
        let room = Room::new(Point2::new(-32.0, 16.0), Point2::new(8.0, 48.0), &settings);
        // 5 x 4 tiles.
        assert_eq!(room.num_tiles(), 20);
        assert_eq!(room.ceiling_positions().len(), 20);
        assert_eq!(room.tile_biomes().len(), 20);
        assert_eq!(room.tile_positions()[0].position, [-32.0, 70.0, 16.0]);
        let last = room.tile_positions()[19].position;
        assert_eq!(last, [0.0, 70.0, 40.0]);
    }

    #[test]
    fn ceiling_sits_one_room_height_above_the_floor() {
        let settings = settings(7);
        let room = Room::new(Point2::new(0.0, 0.0), Point2::new(32.0, 32.0), &settings);
        let height = room.biome().room_height();
        for (floor, ceiling) in room.tile_positions().iter().zip(room.ceiling_positions()) {
            assert_eq!(ceiling.position[1], floor.position[1] + height);
            assert_eq!(ceiling.position[0], floor.position[0]);
            assert_eq!(ceiling.position[2], floor.position[2]);
        }
    }

    #[test]
    fn door_panels_are_deterministic_and_bounded() {
        let settings = settings(7);
        let a = Room::new(Point2::new(-64.0, -64.0), Point2::new(0.0, -24.0), &settings);
        let b = Room::new(Point2::new(-64.0, -64.0), Point2::new(0.0, -24.0), &settings);
        assert_eq!(a.walls(), b.walls());
        assert_eq!(a.wall_biomes(), b.wall_biomes());

        // 8 + 8 + 5 + 5 ground panels plus at most 4 lintels.
        let panels = 2 * 8 + 2 * 5;
        assert!(a.walls().len() <= panels + 4);
    }

    #[test]
    fn geometry_follows_the_seed() {
        let rects = [
            (0.0, 0.0),
            (64.0, 0.0),
            (0.0, 64.0),
            (-64.0, -64.0),
        ];
        let differs = rects.iter().any(|&(x, z)| {
            let min = Point2::new(x, z);
            let max = min + cgmath::Vector2::new(64.0, 64.0);
            let a = Room::new(min, max, &settings(7));
            let b = Room::new(min, max, &settings(8));
            a.walls() != b.walls() || a.biome() != b.biome()
        });
        assert!(differs, "seed change left every room untouched");
    }

    #[test]
    fn tall_biomes_emit_lintels() {
        let settings = settings(7);
        let room = room_with_biome(&settings, Biome::Garage);
        let room_height = Biome::Garage.room_height();
        let lintels: Vec<_> = room
            .walls()
            .iter()
            .filter(|w| w.scale[1] > BASE_WALL_HEIGHT)
            .collect();
        assert!(lintels.is_empty(), "lintels must not exceed base height scale");

        let lintels: Vec<_> = room
            .walls()
            .iter()
            .filter(|w| w.scale[1] == room_height - BASE_WALL_HEIGHT)
            .collect();
        assert_eq!(lintels.len(), 4, "one lintel per side");
        for lintel in &lintels {
            // Spans the full side above the doorway line.
            assert!(lintel.scale[0] >= 24.0 || lintel.scale[2] >= 24.0);
            assert_eq!(
                lintel.offset[1],
                settings.floor_y + BASE_WALL_HEIGHT + (room_height - BASE_WALL_HEIGHT) / 2.0
            );
        }
    }

    #[test]
    fn base_height_biomes_emit_no_lintels() {
        let settings = settings(7);
        let room = room_with_biome(&settings, Biome::Office);
        for wall in room.walls() {
            assert_eq!(wall.scale[1], BASE_WALL_HEIGHT);
        }
    }

    #[test]
    fn wall_instances_cast_to_bytes() {
        let settings = settings(7);
        let room = Room::new(Point2::new(0.0, 0.0), Point2::new(32.0, 32.0), &settings);
        let bytes: &[u8] = bytemuck::cast_slice(room.walls());
        assert_eq!(bytes.len(), room.walls().len() * 32);
    }
}
