//! Uniform grid over a square-ish world centered on the origin

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::SpatialIndex;
use crate::foundation::math::Vec2;
use crate::physics::collision::RotatedRectangle;

/// Cells per axis used when no grid size is configured
pub const DEFAULT_GRID_SIZE: (u16, u16) = (16, 16);

/// Integer coordinates of one grid cell, counted from the world center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridLocation {
    /// Column, negative to the left of the world center
    pub x: i16,
    /// Row, negative above the world center
    pub y: i16,
}

impl GridLocation {
    /// Creates a location
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// World-space bounds of this cell
    pub fn bounds(&self, cell_size: Vec2) -> RotatedRectangle {
        let corner = Vec2::new(f32::from(self.x) * cell_size.x, f32::from(self.y) * cell_size.y);
        RotatedRectangle::from_upper_left(corner, cell_size)
    }
}

/// Grid construction errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// World dimensions must be positive and finite
    #[error("invalid world size {width}x{height}")]
    InvalidWorldSize {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// Grid dimensions must be positive and even
    #[error("invalid grid size {columns}x{rows}, both must be positive and even")]
    InvalidGridSize {
        /// Requested columns
        columns: u16,
        /// Requested rows
        rows: u16,
    },
}

/// Broad-phase grid filing every object under each cell its bounds touch.
///
/// The world spans `-world_size / 2 ..= world_size / 2` on both axes and is cut
/// into `columns x rows` cells. Objects reaching outside the world are only
/// filed under the cells they share with it.
#[derive(Debug, Clone)]
pub struct MapGrid<K> {
    world_size: Vec2,
    cell_size: Vec2,
    min_cell: GridLocation,
    max_cell: GridLocation,
    cells: HashMap<GridLocation, Vec<K>>,
    objects: HashMap<K, (RotatedRectangle, Vec<GridLocation>)>,
}

impl<K: Copy + Eq + Hash> MapGrid<K> {
    /// Creates an empty grid of `columns x rows` cells
    ///
    /// # Errors
    ///
    /// Rejects non-positive world sizes and zero or odd grid sizes.
    pub fn new(world_size: Vec2, (columns, rows): (u16, u16)) -> Result<Self, GridError> {
        let valid_world = world_size.iter().all(|side| side.is_finite() && *side > 0.0);
        if !valid_world {
            return Err(GridError::InvalidWorldSize {
                width: world_size.x,
                height: world_size.y,
            });
        }
        if columns == 0 || rows == 0 || columns % 2 != 0 || rows % 2 != 0 || columns > 512 || rows > 512
        {
            return Err(GridError::InvalidGridSize { columns, rows });
        }

        // Both fit in i16 after the range check above
        let half_columns = (columns / 2) as i16;
        let half_rows = (rows / 2) as i16;

        Ok(Self {
            world_size,
            cell_size: Vec2::new(world_size.x / f32::from(columns), world_size.y / f32::from(rows)),
            min_cell: GridLocation::new(-half_columns, -half_rows),
            max_cell: GridLocation::new(half_columns - 1, half_rows - 1),
            cells: HashMap::new(),
            objects: HashMap::new(),
        })
    }

    /// Creates an empty 16x16 grid
    ///
    /// # Errors
    ///
    /// Rejects non-positive world sizes.
    pub fn with_default_size(world_size: Vec2) -> Result<Self, GridError> {
        Self::new(world_size, DEFAULT_GRID_SIZE)
    }

    /// Size of the whole world
    pub const fn world_size(&self) -> Vec2 {
        self.world_size
    }

    /// Size of a single cell
    pub const fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Upper-left and lower-right cells
    pub const fn cell_range(&self) -> (GridLocation, GridLocation) {
        (self.min_cell, self.max_cell)
    }

    /// Bounds stored for `key`
    pub fn bounds_of(&self, key: K) -> Option<&RotatedRectangle> {
        self.objects.get(&key).map(|(bounds, _)| bounds)
    }

    /// Objects filed under `location`
    pub fn objects_in(&self, location: GridLocation) -> &[K] {
        self.cells.get(&location).map_or(&[], Vec::as_slice)
    }

    /// Every cell that `bounds` touches, in row-major order
    pub fn cells_intersecting(&self, bounds: &RotatedRectangle) -> Vec<GridLocation> {
        let (min, max) = bounds.bounding_box();
        let Some((first, last)) = self.cell_span(min, max) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for y in first.y..=last.y {
            for x in first.x..=last.x {
                let location = GridLocation::new(x, y);
                if bounds.intersects(&location.bounds(self.cell_size)) {
                    found.push(location);
                }
            }
        }
        found
    }

    /// Clamp the cell range covered by an axis-aligned box to the grid
    fn cell_span(&self, min: Vec2, max: Vec2) -> Option<(GridLocation, GridLocation)> {
        let half = self.world_size / 2.0;
        if max.x < -half.x || max.y < -half.y || min.x > half.x || min.y > half.y {
            return None;
        }

        let to_cell = |value: f32, cell: f32, low: i16, high: i16| {
            // Clamped before the cast, so it never truncates
            (value / cell).floor().clamp(f32::from(low), f32::from(high)) as i16
        };

        Some((
            GridLocation::new(
                to_cell(min.x, self.cell_size.x, self.min_cell.x, self.max_cell.x),
                to_cell(min.y, self.cell_size.y, self.min_cell.y, self.max_cell.y),
            ),
            GridLocation::new(
                to_cell(max.x, self.cell_size.x, self.min_cell.x, self.max_cell.x),
                to_cell(max.y, self.cell_size.y, self.min_cell.y, self.max_cell.y),
            ),
        ))
    }
}

impl<K: Copy + Eq + Hash> SpatialIndex<K> for MapGrid<K> {
    fn insert(&mut self, key: K, bounds: RotatedRectangle) {
        self.remove(key);

        let locations = self.cells_intersecting(&bounds);
        if locations.is_empty() {
            log::debug!("Object at {:?} lies outside the grid", bounds.position());
        }
        for location in &locations {
            self.cells.entry(*location).or_default().push(key);
        }
        self.objects.insert(key, (bounds, locations));
    }

    fn remove(&mut self, key: K) -> bool {
        let Some((_, locations)) = self.objects.remove(&key) else {
            return false;
        };

        for location in locations {
            if let Some(keys) = self.cells.get_mut(&location) {
                keys.retain(|existing| *existing != key);
                if keys.is_empty() {
                    self.cells.remove(&location);
                }
            }
        }
        true
    }

    fn potential_intersects(&self, bounds: &RotatedRectangle) -> Vec<K> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for location in self.cells_intersecting(bounds) {
            for key in self.objects_in(location) {
                if seen.insert(*key) {
                    found.push(*key);
                }
            }
        }
        found
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.objects.clear();
    }

    fn len(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> MapGrid<u32> {
        // 16x16 cells of 50x50 over an 800x800 world
        MapGrid::with_default_size(Vec2::new(800.0, 800.0)).unwrap()
    }

    fn box_at(x: f32, y: f32, side: f32) -> RotatedRectangle {
        RotatedRectangle::axis_aligned(Vec2::new(x, y), Vec2::new(side, side))
    }

    #[test]
    fn test_cell_layout() {
        let grid = grid();
        assert_eq!(grid.cell_size(), Vec2::new(50.0, 50.0));
        assert_eq!(grid.cell_range(), (GridLocation::new(-8, -8), GridLocation::new(7, 7)));

        let bounds = GridLocation::new(-8, -8).bounds(grid.cell_size());
        assert_eq!(bounds.upper_left(), Vec2::new(-400.0, -400.0));
    }

    #[test]
    fn test_invalid_sizes_are_rejected() {
        assert!(matches!(
            MapGrid::<u32>::new(Vec2::new(0.0, 10.0), (16, 16)),
            Err(GridError::InvalidWorldSize { .. })
        ));
        assert!(matches!(
            MapGrid::<u32>::new(Vec2::new(10.0, 10.0), (15, 16)),
            Err(GridError::InvalidGridSize { .. })
        ));
        assert!(matches!(
            MapGrid::<u32>::new(Vec2::new(10.0, 10.0), (0, 16)),
            Err(GridError::InvalidGridSize { .. })
        ));
    }

    #[test]
    fn test_small_object_inside_one_cell() {
        let grid = grid();
        let cells = grid.cells_intersecting(&box_at(25.0, 25.0, 10.0));
        assert_eq!(cells, vec![GridLocation::new(0, 0)]);
    }

    #[test]
    fn test_object_spanning_cells() {
        let grid = grid();
        let cells = grid.cells_intersecting(&box_at(0.0, 0.0, 20.0));
        assert_eq!(
            cells,
            vec![
                GridLocation::new(-1, -1),
                GridLocation::new(0, -1),
                GridLocation::new(-1, 0),
                GridLocation::new(0, 0),
            ]
        );
    }

    #[test]
    fn test_rotated_object_skips_cells_it_does_not_touch() {
        let grid = grid();
        // A thin diagonal bar's bounding box covers 3x3 cells, the bar itself fewer
        let bar = RotatedRectangle::new(
            Vec2::new(75.0, 75.0),
            Vec2::new(140.0, 2.0),
            std::f32::consts::FRAC_PI_4,
        );
        let cells = grid.cells_intersecting(&bar);
        assert!(cells.contains(&GridLocation::new(1, 1)));
        assert!(cells.contains(&GridLocation::new(0, 0)));
        assert!(!cells.contains(&GridLocation::new(0, 2)));
        assert!(!cells.contains(&GridLocation::new(2, 0)));
    }

    #[test]
    fn test_object_outside_world_is_not_filed() {
        let mut grid = grid();
        grid.insert(1, box_at(1000.0, 1000.0, 10.0));
        assert_eq!(grid.len(), 1);
        assert!(grid.potential_intersects(&box_at(399.0, 399.0, 2.0)).is_empty());
    }

    #[test]
    fn test_potential_intersects_is_unique() {
        let mut grid = grid();
        grid.insert(1, box_at(0.0, 0.0, 120.0));
        grid.insert(2, box_at(-300.0, -300.0, 10.0));
        grid.insert(3, box_at(40.0, 40.0, 10.0));

        let mut found = grid.potential_intersects(&box_at(10.0, 10.0, 60.0));
        found.sort_unstable();
        assert_eq!(found, vec![1, 3]);
    }

    #[test]
    fn test_update_and_remove() {
        let mut grid = grid();
        grid.insert(7, box_at(-300.0, -300.0, 10.0));
        assert_eq!(grid.potential_intersects(&box_at(-300.0, -300.0, 1.0)), vec![7]);

        grid.update(7, box_at(300.0, 300.0, 10.0));
        assert!(grid.potential_intersects(&box_at(-300.0, -300.0, 1.0)).is_empty());
        assert_eq!(grid.potential_intersects(&box_at(300.0, 300.0, 1.0)), vec![7]);
        assert_eq!(grid.bounds_of(7).map(RotatedRectangle::position), Some(Vec2::new(300.0, 300.0)));

        assert!(grid.remove(7));
        assert!(!grid.remove(7));
        assert!(grid.is_empty());
        assert!(grid.objects_in(GridLocation::new(6, 6)).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut grid = grid();
        grid.insert(1, box_at(0.0, 0.0, 10.0));
        grid.insert(2, box_at(100.0, 0.0, 10.0));
        grid.clear();
        assert!(grid.is_empty());
        assert!(grid.potential_intersects(&box_at(0.0, 0.0, 500.0)).is_empty());
    }
}
