//! Tile grid and the solid things placed on it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::runtime::error::MapError;
use crate::runtime::host::{Position, Rect};

/// Tile ids that block movement unless overridden (water).
pub const DEFAULT_SOLID_TILES: [u8; 1] = [3];

/// Rectangular grid of tile ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    columns: usize,
    rows: usize,
    tile_size: u32,
    tiles: Vec<u8>,
    solid: BTreeSet<u8>,
}

impl TileMap {
    /// A map of `columns` x `rows` walkable tiles (id 0).
    pub fn open(columns: usize, rows: usize, tile_size: u32) -> Self {
        Self {
            columns,
            rows,
            tile_size: tile_size.max(1),
            tiles: vec![0; columns * rows],
            solid: DEFAULT_SOLID_TILES.into_iter().collect(),
        }
    }

    /// Parse rows of whitespace-separated tile ids. Blank lines are ignored.
    pub fn parse(text: &str, tile_size: u32) -> Result<Self, MapError> {
        let mut tiles = Vec::new();
        let mut columns = None;
        let mut rows = 0;

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let mut found = 0;
            for (col, token) in line.split_whitespace().enumerate() {
                let id = token.parse::<u8>().map_err(|_| MapError::InvalidTile {
                    row: rows,
                    col,
                    token: token.to_string(),
                })?;
                tiles.push(id);
                found += 1;
            }
            let expected = *columns.get_or_insert(found);
            if found != expected {
                return Err(MapError::RaggedRow {
                    row: rows,
                    expected,
                    found,
                });
            }
            rows += 1;
        }

        let Some(columns) = columns else {
            return Err(MapError::Empty);
        };
        Ok(Self {
            columns,
            rows,
            tile_size: tile_size.max(1),
            tiles,
            solid: DEFAULT_SOLID_TILES.into_iter().collect(),
        })
    }

    /// Replace the set of blocking tile ids.
    pub fn with_solid_tiles(mut self, ids: impl IntoIterator<Item = u8>) -> Self {
        self.solid = ids.into_iter().collect();
        self
    }

    /// Width in tiles.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Height in tiles.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Tile id at a grid cell.
    pub fn tile(&self, col: usize, row: usize) -> Option<u8> {
        if col >= self.columns || row >= self.rows {
            return None;
        }
        self.tiles.get(row * self.columns + col).copied()
    }

    /// Overwrite a grid cell; out-of-range cells are ignored.
    pub fn set_tile(&mut self, col: usize, row: usize, id: u8) {
        if col < self.columns && row < self.rows {
            self.tiles[row * self.columns + col] = id;
        }
    }

    /// Top-left pixel of a grid cell.
    pub fn cell_origin(&self, col: usize, row: usize) -> Position {
        let size = self.size();
        Position::new(col as i32 * size, row as i32 * size)
    }

    /// World extent in pixels.
    pub fn bounds(&self) -> Rect {
        let size = self.size();
        Rect::new(0, 0, self.columns as i32 * size, self.rows as i32 * size)
    }

    /// Whether `rect` leaves the map or touches a solid tile.
    pub fn blocks(&self, rect: &Rect) -> bool {
        if !self.bounds().contains(rect) {
            return true;
        }
        if rect.width <= 0 || rect.height <= 0 {
            return false;
        }
        let size = self.size();
        let first_col = rect.x.div_euclid(size);
        let last_col = (rect.right() - 1).div_euclid(size);
        let first_row = rect.y.div_euclid(size);
        let last_row = (rect.bottom() - 1).div_euclid(size);

        (first_row..=last_row).any(|row| {
            (first_col..=last_col).any(|col| {
                self.tile(col as usize, row as usize)
                    .is_some_and(|id| self.solid.contains(&id))
            })
        })
    }

    fn size(&self) -> i32 {
        i32::try_from(self.tile_size).unwrap_or(i32::MAX)
    }
}

/// A placed object (wall, tree, chest...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObject {
    /// Display name.
    pub name: String,
    /// Collision area in world pixels.
    pub area: Rect,
    /// Whether the object blocks movement.
    pub solid: bool,
}

/// A non-player character standing in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    /// Display name.
    pub name: String,
    /// World position (sprite origin).
    pub position: Position,
    /// Collision area relative to `position`.
    pub solid_area: Rect,
}

impl Npc {
    /// Collision rectangle in world pixels.
    pub fn rect(&self) -> Rect {
        self.solid_area.translated(self.position.x, self.position.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows() {
        let map = TileMap::parse("0 0 3\n0 1 2\n", 64).unwrap();
        assert_eq!(map.columns(), 3);
        assert_eq!(map.rows(), 2);
        assert_eq!(map.tile(2, 0), Some(3));
        assert_eq!(map.tile(3, 0), None);
        assert_eq!(map.bounds(), Rect::new(0, 0, 192, 128));
    }

    #[test]
    fn rejects_bad_rows() {
        assert_eq!(TileMap::parse("", 64), Err(MapError::Empty));
        assert_eq!(
            TileMap::parse("0 0\n0\n", 64),
            Err(MapError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert!(matches!(
            TileMap::parse("0 x\n", 64),
            Err(MapError::InvalidTile { row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn water_and_edges_block() {
        let map = TileMap::parse("0 3\n0 0\n", 64).unwrap();
        assert!(map.blocks(&Rect::new(64 + 8, 16, 32, 32)));
        assert!(!map.blocks(&Rect::new(8, 64 + 16, 32, 32)));
        assert!(map.blocks(&Rect::new(-4, 0, 32, 32)));
        assert!(map.blocks(&Rect::new(8, 112, 32, 32)));
    }
}
