use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use cgmath::Point2;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::biome::Biome;
use crate::noise::{round_down, white_noise};
use crate::room::Room;
use crate::settings::WorldSettings;

/// Split axis of a partition node. `Point2.y` holds the world z coordinate
/// throughout the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    pub fn component(self, p: Point2<f32>) -> f32 {
        match self {
            Axis::X => p.x,
            Axis::Z => p.y,
        }
    }
}

/// Regions with fewer tile sectors than this along the split axis are never
/// subdivided.
const MIN_SECTORS_TO_SPLIT: i32 = 6;
/// A split must leave at least this many tile sectors on each side.
const MIN_SECTORS_PER_SIDE: i32 = 3;

enum NodeKind {
    Leaf {
        point: Option<Point2<f32>>,
    },
    Split {
        threshold: f32,
        left: Box<RoomTreeNode>,
        right: Box<RoomTreeNode>,
    },
}

/// One node of the binary space partition. A node is a leaf until a second
/// sample point lands in a different sector, at which point it becomes a
/// `Split` permanently and both points are pushed down into the children.
struct RoomTreeNode {
    min_corner: Point2<f32>,
    max_corner: Point2<f32>,
    axis: Axis,
    kind: NodeKind,
}

impl RoomTreeNode {
    fn new(axis: Axis, min_corner: Point2<f32>, max_corner: Point2<f32>) -> Self {
        Self {
            min_corner,
            max_corner,
            axis,
            kind: NodeKind::Leaf { point: None },
        }
    }

    /// Tile-aligned extent of this node along its split axis, in sectors.
    fn sectors(&self, settings: &WorldSettings) -> i32 {
        let span = self.axis.component(self.max_corner) - self.axis.component(self.min_corner);
        (span / settings.tile_size).round() as i32
    }

    /// Sector index of a point along the split axis.
    fn sector(&self, p: Point2<f32>, settings: &WorldSettings) -> i32 {
        let aligned = round_down(self.axis.component(p), settings.tile_size);
        ((aligned - self.axis.component(self.min_corner)) / settings.tile_size).round() as i32
    }

    fn sector_to_world(&self, sector: i32, settings: &WorldSettings) -> f32 {
        self.axis.component(self.min_corner) + sector as f32 * settings.tile_size
    }

    fn add_point(&mut self, p: Point2<f32>, settings: &WorldSettings) {
        let stored = match &mut self.kind {
            NodeKind::Split {
                threshold,
                left,
                right,
            } => {
                if self.axis.component(p) >= *threshold {
                    right.add_point(p, settings);
                } else {
                    left.add_point(p, settings);
                }
                return;
            }
            NodeKind::Leaf { point } => match *point {
                None => {
                    *point = Some(p);
                    return;
                }
                Some(stored) => stored,
            },
        };

        // Second point in an occupied leaf: split if a valid tile-aligned
        // threshold exists, otherwise the first point wins and the new one
        // is discarded.
        let Some(threshold) = self.split_threshold(stored, p, settings) else {
            return;
        };
        self.split_at(threshold);
        self.add_point(stored, settings);
        self.add_point(p, settings);
    }

    /// Picks the tile-aligned split coordinate between two points, or
    /// `None` when the region must stay whole: too few sectors, both
    /// points in the same sector, or no candidate leaves at least
    /// `MIN_SECTORS_PER_SIDE` sectors on both sides.
    fn split_threshold(
        &self,
        a: Point2<f32>,
        b: Point2<f32>,
        settings: &WorldSettings,
    ) -> Option<f32> {
        let sectors = self.sectors(settings);
        if sectors < MIN_SECTORS_TO_SPLIT {
            return None;
        }
        let a_sector = self.sector(a, settings);
        let b_sector = self.sector(b, settings);
        if a_sector == b_sector {
            return None;
        }

        let lo = (a_sector.min(b_sector) + 1).max(MIN_SECTORS_PER_SIDE);
        let hi = a_sector.max(b_sector).min(sectors - MIN_SECTORS_PER_SIDE);
        if lo > hi {
            return None;
        }

        let sector = if lo == hi {
            lo
        } else {
            // Deterministic pick among the candidates, keyed on the node
            // corner so repeated generation of the same chunk agrees.
            lo + (white_noise(self.min_corner, settings.seed) * (hi - lo) as f64) as i32
        };
        Some(self.sector_to_world(sector, settings))
    }

    fn split_at(&mut self, threshold: f32) {
        let child_axis = self.axis.other();
        let (left_max, right_min) = match self.axis {
            Axis::X => (
                Point2::new(threshold, self.max_corner.y),
                Point2::new(threshold, self.min_corner.y),
            ),
            Axis::Z => (
                Point2::new(self.max_corner.x, threshold),
                Point2::new(self.min_corner.x, threshold),
            ),
        };
        self.kind = NodeKind::Split {
            threshold,
            left: Box::new(RoomTreeNode::new(child_axis, self.min_corner, left_max)),
            right: Box::new(RoomTreeNode::new(child_axis, right_min, self.max_corner)),
        };
    }

    /// Post-order walk collecting one room per leaf, left before right.
    fn collect_rooms(&self, settings: &WorldSettings, rooms: &mut Vec<Room>) {
        match &self.kind {
            NodeKind::Leaf { .. } => {
                rooms.push(Room::new(self.min_corner, self.max_corner, settings));
            }
            NodeKind::Split { left, right, .. } => {
                left.collect_rooms(settings, rooms);
                right.collect_rooms(settings, rooms);
            }
        }
    }
}

/// The finished partition of one chunk footprint into rooms, retained for
/// point-to-room lookups after construction.
pub struct RoomTree {
    settings: Arc<WorldSettings>,
    root: RoomTreeNode,
    rooms: Vec<Room>,
}

impl RoomTree {
    pub fn new(
        min_corner: Point2<f32>,
        max_corner: Point2<f32>,
        settings: Arc<WorldSettings>,
    ) -> Self {
        let mut root = RoomTreeNode::new(Axis::X, min_corner, max_corner);
        let length = settings.chunk_length();
        let mut rng = corner_rng(min_corner, settings.seed);
        let point_count = 2 * (length.sqrt().ceil() as u32);
        for _ in 0..point_count {
            let p = Point2::new(
                min_corner.x + rng.gen::<f32>() * length,
                min_corner.y + rng.gen::<f32>() * length,
            );
            root.add_point(p, &settings);
        }

        let mut rooms = Vec::new();
        root.collect_rooms(&settings, &mut rooms);
        Self {
            settings,
            root,
            rooms,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Biome of the room containing `(x, z)`, or `None` outside the
    /// tree's rectangle (half-open bounds). Callers must treat `None` as
    /// unknown.
    pub fn biome_at(&self, x: f32, z: f32) -> Option<Biome> {
        let p = Point2::new(x, z);
        if x < self.root.min_corner.x
            || x >= self.root.max_corner.x
            || z < self.root.min_corner.y
            || z >= self.root.max_corner.y
        {
            return None;
        }
        let mut node = &self.root;
        loop {
            match &node.kind {
                NodeKind::Leaf { .. } => {
                    return Some(Room::biome_for(
                        node.min_corner,
                        node.max_corner,
                        &self.settings,
                    ));
                }
                NodeKind::Split {
                    threshold,
                    left,
                    right,
                } => {
                    node = if node.axis.component(p) >= *threshold {
                        right
                    } else {
                        left
                    };
                }
            }
        }
    }
}

/// Per-chunk point stream: deterministic for a given seed and chunk corner.
fn corner_rng(corner: Point2<f32>, seed: i32) -> SmallRng {
    let mut hasher = DefaultHasher::new();
    (corner.x.to_bits(), corner.y.to_bits(), seed).hash(&mut hasher);
    SmallRng::seed_from_u64(hasher.finish())
}
