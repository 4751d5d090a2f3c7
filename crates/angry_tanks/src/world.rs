//! The static map: world bounds and the boxes in it
//!
//! A [`World`] owns every map object and a [`MapGrid`] over their bounds, so
//! movement code only runs the exact overlap test against nearby objects. The
//! world is an explicit value owned by the game client and handed to players
//! by reference.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tank_engine::foundation::math::{utils::deg_to_rad, Vec2};
use tank_engine::physics::RotatedRectangle;
use tank_engine::spatial::{GridError, MapGrid, SpatialIndex};

use crate::sprite::{Sprite, StaticSprite};

new_key_type! {
    /// Handle of an object placed in a [`World`]
    pub struct MapObjectId;
}

/// Errors raised while building a world
#[derive(thiserror::Error, Debug)]
pub enum WorldError {
    /// World or grid dimensions are unusable
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// The map payload is not a valid map description
    #[error("failed to parse map: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The map description could not be written out
    #[error("failed to serialize map: {0}")]
    Serialize(#[from] ron::Error),

    /// A map object has a non-positive or non-finite size
    #[error("map object {index} has invalid size {width}x{height}")]
    InvalidObjectSize {
        /// Position of the object in the description
        index: usize,
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },
}

/// What a map object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapObjectKind {
    /// Solid wall block
    #[default]
    Box,
    /// Pyramid; collides like a box
    Pyramid,
}

/// One static object in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapObject {
    /// What it is
    pub kind: MapObjectKind,
    /// Where it is
    pub sprite: StaticSprite,
}

impl MapObject {
    /// Collision bounds
    pub fn bounds(&self) -> RotatedRectangle {
        self.sprite.bounds()
    }
}

/// A map object as written in a map file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// What it is
    #[serde(default)]
    pub kind: MapObjectKind,
    /// Center
    pub position: (f32, f32),
    /// Width and height
    pub size: (f32, f32),
    /// Rotation in degrees
    #[serde(default)]
    pub rotation: f32,
}

/// Serialized form of a map; the payload of `MsgWorld`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescription {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Width and height of the world, centered on the origin
    pub world_size: (f32, f32),
    /// Static objects
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

impl MapDescription {
    /// Four 100x100 boxes around the origin, one turned 45 degrees, in an
    /// 800x800 world
    pub fn test_arena() -> Self {
        let block = |x: f32, y: f32, rotation: f32| ObjectDescription {
            kind: MapObjectKind::Box,
            position: (x, y),
            size: (100.0, 100.0),
            rotation,
        };

        Self {
            name: "Test Arena".to_string(),
            world_size: (800.0, 800.0),
            objects: vec![
                block(-100.0, 100.0, 0.0),
                block(100.0, 100.0, 0.0),
                block(100.0, -100.0, 0.0),
                block(-100.0, -100.0, 45.0),
            ],
        }
    }

    /// Parse a RON map
    ///
    /// # Errors
    ///
    /// Fails if `raw` is not a RON map description.
    pub fn from_ron(raw: &[u8]) -> Result<Self, WorldError> {
        Ok(ron::de::from_bytes(raw)?)
    }

    /// Write the map as RON
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_ron(&self) -> Result<String, WorldError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

impl Default for MapDescription {
    fn default() -> Self {
        Self::test_arena()
    }
}

/// The map the game is played on
#[derive(Debug, Clone)]
pub struct World {
    name: String,
    world_size: Vec2,
    objects: SlotMap<MapObjectId, MapObject>,
    grid: MapGrid<MapObjectId>,
}

impl World {
    /// An empty world
    ///
    /// # Errors
    ///
    /// Fails on a non-positive world size or an invalid grid size.
    pub fn empty(world_size: Vec2, grid_size: (u16, u16)) -> Result<Self, WorldError> {
        Ok(Self {
            name: String::new(),
            world_size,
            objects: SlotMap::with_key(),
            grid: MapGrid::new(world_size, grid_size)?,
        })
    }

    /// Build a world from a map description
    ///
    /// # Errors
    ///
    /// Fails on invalid world, grid or object sizes.
    pub fn from_description(description: &MapDescription, grid_size: (u16, u16)) -> Result<Self, WorldError> {
        let (width, height) = description.world_size;
        let mut world = Self::empty(Vec2::new(width, height), grid_size)?;
        world.name.clone_from(&description.name);

        for (index, object) in description.objects.iter().enumerate() {
            let (width, height) = object.size;
            if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
                return Err(WorldError::InvalidObjectSize { index, width, height });
            }

            let (x, y) = object.position;
            world.add_object(
                object.kind,
                StaticSprite::new(Vec2::new(x, y), Vec2::new(width, height), deg_to_rad(object.rotation)),
            );
        }

        log::info!(
            "Loaded map '{}' ({}x{}) with {} objects",
            world.name,
            width,
            height,
            world.objects.len()
        );
        Ok(world)
    }

    /// Build a world from the payload of a `MsgWorld` message
    ///
    /// # Errors
    ///
    /// Fails if the payload does not parse or describes an invalid world.
    pub fn from_raw(raw: &[u8], grid_size: (u16, u16)) -> Result<Self, WorldError> {
        Self::from_description(&MapDescription::from_ron(raw)?, grid_size)
    }

    /// Place an object
    pub fn add_object(&mut self, kind: MapObjectKind, sprite: StaticSprite) -> MapObjectId {
        let object = MapObject { kind, sprite };
        let id = self.objects.insert(object);
        self.grid.insert(id, object.bounds());
        id
    }

    /// Remove every object
    pub fn clear(&mut self) {
        self.objects.clear();
        self.grid.clear();
    }

    /// Map name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width and height, centered on the origin
    pub const fn world_size(&self) -> Vec2 {
        self.world_size
    }

    /// Look up an object
    pub fn object(&self, id: MapObjectId) -> Option<&MapObject> {
        self.objects.get(id)
    }

    /// Every object
    pub fn objects(&self) -> impl Iterator<Item = (MapObjectId, &MapObject)> {
        self.objects.iter()
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the world has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects that may overlap `bounds`
    pub fn potential_intersects(&self, bounds: &RotatedRectangle) -> Vec<MapObjectId> {
        self.grid.potential_intersects(bounds)
    }

    /// Bounds of the objects that may overlap `bounds`
    pub fn potential_bounds(&self, bounds: &RotatedRectangle) -> Vec<RotatedRectangle> {
        self.potential_intersects(bounds)
            .into_iter()
            .filter_map(|id| self.objects.get(id))
            .map(MapObject::bounds)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tank_engine::foundation::math::constants::QUARTER_PI;
    use tank_engine::spatial::DEFAULT_GRID_SIZE;

    fn arena() -> World {
        World::from_description(&MapDescription::test_arena(), DEFAULT_GRID_SIZE).unwrap()
    }

    #[test]
    fn test_arena_layout() {
        let world = arena();
        assert_eq!(world.len(), 4);
        assert_eq!(world.world_size(), Vec2::new(800.0, 800.0));
        assert_eq!(world.name(), "Test Arena");

        let rotated: Vec<_> = world
            .objects()
            .filter(|(_, object)| object.sprite.rotation != 0.0)
            .collect();
        assert_eq!(rotated.len(), 1);
        assert_relative_eq!(rotated[0].1.sprite.rotation, QUARTER_PI, epsilon = 1e-6);
        assert_eq!(rotated[0].1.sprite.position, Vec2::new(-100.0, -100.0));
    }

    #[test]
    fn test_potential_intersects_near_box() {
        let world = arena();
        let probe = RotatedRectangle::axis_aligned(Vec2::new(100.0, 48.0), Vec2::new(6.0, 4.86));

        let nearby = world.potential_intersects(&probe);
        assert_eq!(nearby.len(), 1);
        let object = world.object(nearby[0]).unwrap();
        assert_eq!(object.sprite.position, Vec2::new(100.0, 100.0));

        let bounds = world.potential_bounds(&probe);
        assert_eq!(bounds, vec![object.bounds()]);
    }

    #[test]
    fn test_open_ground_has_no_candidates() {
        let world = arena();
        let probe = RotatedRectangle::axis_aligned(Vec2::new(300.0, -300.0), Vec2::new(6.0, 4.86));
        assert!(world.potential_intersects(&probe).is_empty());
    }

    #[test]
    fn test_ron_round_trip_through_raw() {
        let description = MapDescription::test_arena();
        let raw = description.to_ron().unwrap();
        assert_eq!(MapDescription::from_ron(raw.as_bytes()).unwrap(), description);

        let world = World::from_raw(raw.as_bytes(), DEFAULT_GRID_SIZE).unwrap();
        assert_eq!(world.len(), 4);
    }

    #[test]
    fn test_handwritten_map_uses_defaults() {
        let raw = br#"(
            world_size: (200.0, 100.0),
            objects: [
                (position: (10.0, 10.0), size: (5.0, 5.0)),
                (kind: Pyramid, position: (-10.0, 0.0), size: (8.0, 8.0), rotation: 90.0),
            ],
        )"#;
        let world = World::from_raw(raw, (4, 2)).unwrap();
        assert_eq!(world.len(), 2);
        assert!(world.objects().any(|(_, object)| object.kind == MapObjectKind::Pyramid));
        assert!(world.name().is_empty());
    }

    #[test]
    fn test_invalid_maps_rejected() {
        assert!(matches!(World::from_raw(b"not a map", DEFAULT_GRID_SIZE), Err(WorldError::Parse(_))));

        let mut description = MapDescription::test_arena();
        description.objects[2].size = (0.0, 10.0);
        assert!(matches!(
            World::from_description(&description, DEFAULT_GRID_SIZE),
            Err(WorldError::InvalidObjectSize { index: 2, .. })
        ));

        description = MapDescription::test_arena();
        description.world_size = (-1.0, 10.0);
        assert!(matches!(
            World::from_description(&description, DEFAULT_GRID_SIZE),
            Err(WorldError::Grid(_))
        ));
    }

    #[test]
    fn test_bundled_demo_map_loads() {
        let world = World::from_raw(include_bytes!("../../../demos/crossroads.ron"), DEFAULT_GRID_SIZE).unwrap();
        assert_eq!(world.name(), "Crossroads");
        assert_eq!(world.len(), 5);
        assert_eq!(world.world_size(), Vec2::new(600.0, 600.0));
    }

    #[test]
    fn test_clear_empties_grid() {
        let mut world = arena();
        world.clear();
        assert!(world.is_empty());
        let probe = RotatedRectangle::axis_aligned(Vec2::new(100.0, 100.0), Vec2::new(10.0, 10.0));
        assert!(world.potential_intersects(&probe).is_empty());
    }
}
