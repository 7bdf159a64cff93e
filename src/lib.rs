//! Procedural floor-plan generation for an infinite, tile-based backrooms
//! world: a recursive spatial partition carves each streamed chunk into
//! rooms, rooms synthesize floor/ceiling tiles and door-pierced walls, and
//! a 3x3 chunk cache keeps a bounded window of the world resident around a
//! moving observer.
//!
//! The crate ends at the flat-buffer interface: chunks expose per-instance
//! attribute arrays (tile positions, ceiling positions, biome ids, wall
//! transforms) for a rendering collaborator to upload, plus height/biome
//! point queries for collision and audio collaborators.

mod biome;
mod floor_chunk;
mod loader;
mod noise;
mod room;
mod room_tree;
mod settings;

pub use biome::{Biome, BiomeConfig, NUM_BIOMES};
pub use floor_chunk::FloorChunk;
pub use loader::FloorChunkLoader;
pub use noise::{round_down, value_noise, white_noise};
pub use room::{Room, TileInstance, WallInstance, BASE_WALL_HEIGHT};
pub use room_tree::{Axis, RoomTree};
pub use settings::WorldSettings;
