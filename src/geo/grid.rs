//! Uniform Grid Module
//!
//! Buckets typed entities into fixed-size square cells on the x/z plane so
//! radius queries only look at cells near the query point.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use crate::error::{IndexError, Result};
use crate::geo::{CellKey, Point, QueryResult};

/// Ids per kind inside one cell.
type Bucket<Id> = HashMap<String, HashSet<Id>>;

// == Entity ==
/// A tracked entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity<Id> {
    pub id: Id,
    pub kind: String,
    pub position: Point,
    #[serde(skip)]
    cell: CellKey,
}

// == Geo Grid ==
/// Spatial index over typed, moving entities.
///
/// Each tracked id sits in exactly one cell bucket, under exactly one kind,
/// and that cell is always the one containing its position.
#[derive(Debug, Clone)]
pub struct GeoGrid<Id = String> {
    cell_size: f64,
    /// Declared kinds, in declaration order
    kinds: Vec<String>,
    cells: HashMap<CellKey, Bucket<Id>>,
    entities: HashMap<Id, Entity<Id>>,
}

impl<Id> GeoGrid<Id>
where
    Id: Eq + Hash + Clone + fmt::Display,
{
    // == Constructor ==
    /// Creates a grid with square cells of `cell_size` and a closed set of kinds.
    ///
    /// Duplicate kinds are collapsed.
    pub fn new<I, K>(cell_size: f64, kinds: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(IndexError::InvalidCellSize(cell_size));
        }

        let mut declared: Vec<String> = Vec::new();
        for kind in kinds {
            let kind = kind.into();
            if !declared.contains(&kind) {
                declared.push(kind);
            }
        }

        Ok(Self {
            cell_size,
            kinds: declared,
            cells: HashMap::new(),
            entities: HashMap::new(),
        })
    }

    // == Add ==
    /// Starts tracking `id` as a `kind` at `position`.
    pub fn add(&mut self, kind: &str, id: Id, position: Point) -> Result<()> {
        if !self.is_declared(kind) {
            return Err(IndexError::UnknownKind(kind.to_string()));
        }
        if self.entities.contains_key(&id) {
            return Err(IndexError::DuplicateId(id.to_string()));
        }
        ensure_finite(&id, &position)?;

        let cell = CellKey::containing(&position, self.cell_size);
        register(&mut self.cells, cell, kind, id.clone());
        self.entities.insert(
            id.clone(),
            Entity {
                id,
                kind: kind.to_string(),
                position,
                cell,
            },
        );
        Ok(())
    }

    // == Remove ==
    /// Stops tracking `id`. Returns false if it was not tracked.
    pub fn remove(&mut self, id: &Id) -> bool {
        match self.entities.remove(id) {
            Some(entity) => {
                unregister(&mut self.cells, entity.cell, &entity.kind, id);
                true
            }
            None => false,
        }
    }

    // == Update Position ==
    /// Moves `id` to `position`, changing cell bucket when needed.
    pub fn update_position(&mut self, id: &Id, position: Point) -> Result<()> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or_else(|| IndexError::UnknownId(id.to_string()))?;
        ensure_finite(id, &position)?;

        let cell = CellKey::containing(&position, self.cell_size);
        entity.position = position;

        if cell != entity.cell {
            debug!(%id, from = ?entity.cell, to = ?cell, "entity changed cell");
            unregister(&mut self.cells, entity.cell, &entity.kind, id);
            register(&mut self.cells, cell, &entity.kind, id.clone());
            entity.cell = cell;
        }
        Ok(())
    }

    // == Change Type ==
    /// Reclassifies `id` as `kind`, keeping its position.
    pub fn change_type(&mut self, id: &Id, kind: &str) -> Result<()> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or_else(|| IndexError::UnknownId(id.to_string()))?;
        if !self.kinds.iter().any(|declared| declared == kind) {
            return Err(IndexError::UnknownKind(kind.to_string()));
        }

        if entity.kind != kind {
            unregister(&mut self.cells, entity.cell, &entity.kind, id);
            register(&mut self.cells, entity.cell, kind, id.clone());
            entity.kind = kind.to_string();
        }
        Ok(())
    }

    // == Query Radius ==
    /// Finds ids of the requested kinds within `radius` of `center`.
    ///
    /// Distance is planar and the boundary is inclusive. Kinds the grid does
    /// not know, a negative radius and non-finite input all give empty sets.
    pub fn query_radius(&self, center: Point, radius: f64, kinds: &[&str]) -> QueryResult<Id> {
        let mut result = QueryResult::for_kinds(kinds);
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return result;
        }

        let mut wanted: Vec<&str> = Vec::new();
        for kind in kinds {
            if self.is_declared(kind) && !wanted.contains(kind) {
                wanted.push(*kind);
            }
        }
        if wanted.is_empty() || self.entities.is_empty() {
            return result;
        }

        // One cell of margin on every side so aligned boundaries are never missed
        let low = CellKey::containing(
            &Point::new(center.x - radius, center.z - radius),
            self.cell_size,
        );
        let high = CellKey::containing(
            &Point::new(center.x + radius, center.z + radius),
            self.cell_size,
        );
        let (min_col, max_col) = (low.col.saturating_sub(1), high.col.saturating_add(1));
        let (min_row, max_row) = (low.row.saturating_sub(1), high.row.saturating_add(1));

        let radius_squared = radius * radius;
        let mut visit = |bucket: &Bucket<Id>| {
            for kind in &wanted {
                let Some(ids) = bucket.get(*kind) else {
                    continue;
                };
                for id in ids {
                    let within = self
                        .entities
                        .get(id)
                        .is_some_and(|e| e.position.distance_squared(&center) <= radius_squared);
                    if within {
                        result.insert(kind, id.clone());
                    }
                }
            }
        };

        let width = i128::from(max_col) - i128::from(min_col) + 1;
        let height = i128::from(max_row) - i128::from(min_row) + 1;
        let span = width.checked_mul(height).unwrap_or(i128::MAX);

        if span > self.cells.len() as i128 {
            // Range is wider than the occupied cells, walk those instead
            for (cell, bucket) in &self.cells {
                let in_cols = (min_col..=max_col).contains(&cell.col);
                if in_cols && (min_row..=max_row).contains(&cell.row) {
                    visit(bucket);
                }
            }
        } else {
            for col in min_col..=max_col {
                for row in min_row..=max_row {
                    if let Some(bucket) = self.cells.get(&CellKey { col, row }) {
                        visit(bucket);
                    }
                }
            }
        }

        result
    }

    // == Accessors ==
    /// Number of tracked entities.
    pub fn size(&self) -> usize {
        self.entities.len()
    }

    pub fn has(&self, id: &Id) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: &Id) -> Option<&Entity<Id>> {
        self.entities.get(id)
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Forgets every entity; cell size and kinds are kept.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entities.clear();
    }

    fn is_declared(&self, kind: &str) -> bool {
        self.kinds.iter().any(|declared| declared == kind)
    }

    /// Panics if the cell buckets and the entity map disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut bucketed = 0;
        for (cell, bucket) in &self.cells {
            assert!(!bucket.is_empty(), "empty cell {cell:?} kept");
            for (kind, ids) in bucket {
                assert!(!ids.is_empty(), "empty bucket {kind} kept in {cell:?}");
                for id in ids {
                    let entity = &self.entities[id];
                    assert_eq!(&entity.kind, kind);
                    assert_eq!(entity.cell, *cell);
                    assert_eq!(entity.cell, CellKey::containing(&entity.position, self.cell_size));
                    bucketed += 1;
                }
            }
        }
        assert_eq!(bucketed, self.entities.len());
    }
}

fn ensure_finite<Id: fmt::Display>(id: &Id, position: &Point) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(IndexError::InvalidPosition(format!(
            "{} at ({}, {})",
            id, position.x, position.z
        )))
    }
}

fn register<Id: Eq + Hash>(
    cells: &mut HashMap<CellKey, Bucket<Id>>,
    cell: CellKey,
    kind: &str,
    id: Id,
) {
    cells
        .entry(cell)
        .or_default()
        .entry(kind.to_string())
        .or_default()
        .insert(id);
}

fn unregister<Id: Eq + Hash>(
    cells: &mut HashMap<CellKey, Bucket<Id>>,
    cell: CellKey,
    kind: &str,
    id: &Id,
) {
    let Some(bucket) = cells.get_mut(&cell) else {
        return;
    };
    if let Some(ids) = bucket.get_mut(kind) {
        ids.remove(id);
        if ids.is_empty() {
            bucket.remove(kind);
        }
    }
    if bucket.is_empty() {
        cells.remove(&cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GeoGrid {
        GeoGrid::new(2000.0, ["Unit", "Static", "Track"]).unwrap()
    }

    fn id(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_new_rejects_bad_cell_size() {
        assert!(matches!(
            GeoGrid::<String>::new(0.0, ["Unit"]),
            Err(IndexError::InvalidCellSize(_))
        ));
        assert!(GeoGrid::<String>::new(-5.0, ["Unit"]).is_err());
        assert!(GeoGrid::<String>::new(f64::NAN, ["Unit"]).is_err());
    }

    #[test]
    fn test_new_collapses_duplicate_kinds() {
        let grid: GeoGrid = GeoGrid::new(10.0, ["Unit", "Track", "Unit"]).unwrap();
        assert_eq!(grid.kinds(), ["Unit".to_string(), "Track".to_string()]);
        assert_eq!(grid.cell_size(), 10.0);
    }

    #[test]
    fn test_add_and_has() {
        let mut grid = grid();

        grid.add("Unit", id("u1"), Point::new(100.0, 100.0)).unwrap();

        assert!(grid.has(&id("u1")));
        assert_eq!(grid.size(), 1);
        assert_eq!(grid.get(&id("u1")).unwrap().kind, "Unit");
        grid.assert_consistent();
    }

    #[test]
    fn test_add_failures() {
        let mut grid = grid();
        grid.add("Unit", id("u1"), Point::new(0.0, 0.0)).unwrap();

        assert!(matches!(
            grid.add("Ship", id("s1"), Point::new(0.0, 0.0)),
            Err(IndexError::UnknownKind(_))
        ));
        assert!(matches!(
            grid.add("Track", id("u1"), Point::new(5.0, 5.0)),
            Err(IndexError::DuplicateId(_))
        ));
        assert!(matches!(
            grid.add("Unit", id("u2"), Point::new(f64::NAN, 0.0)),
            Err(IndexError::InvalidPosition(_))
        ));
        assert_eq!(grid.size(), 1);
        assert_eq!(grid.get(&id("u1")).unwrap().position, Point::new(0.0, 0.0));
        grid.assert_consistent();
    }

    #[test]
    fn test_remove() {
        let mut grid = grid();
        grid.add("Unit", id("u1"), Point::new(0.0, 0.0)).unwrap();

        assert!(grid.remove(&id("u1")));
        assert!(!grid.remove(&id("u1")));
        assert!(!grid.has(&id("u1")));
        assert_eq!(grid.size(), 0);
        assert_eq!(grid.cell_count(), 0);
    }

    #[test]
    fn test_query_inclusive_boundary() {
        let mut grid = grid();
        let center = Point::new(500.0, -700.0);

        grid.add("Track", id("near"), Point::new(center.x + 2900.0, center.z)).unwrap();
        grid.add("Track", id("edge"), Point::new(center.x, center.z - 3000.0)).unwrap();
        grid.add("Track", id("far"), Point::new(center.x - 3100.0, center.z)).unwrap();

        let result = grid.query_radius(center, 3000.0, &["Track"]);
        let ids = result.ids("Track").unwrap();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains("near"));
        assert!(ids.contains("edge"));
        assert!(!ids.contains("far"));
    }

    #[test]
    fn test_query_filters_by_kind() {
        let mut grid = grid();
        grid.add("Unit", id("u1"), Point::new(10.0, 10.0)).unwrap();
        grid.add("Static", id("s1"), Point::new(20.0, 20.0)).unwrap();
        grid.add("Track", id("t1"), Point::new(30.0, 30.0)).unwrap();

        let result = grid.query_radius(Point::new(0.0, 0.0), 100.0, &["Unit", "Track", "Ship"]);

        assert_eq!(result.ids("Unit").unwrap().len(), 1);
        assert_eq!(result.ids("Track").unwrap().len(), 1);
        assert!(result.get("ShipIds").unwrap().is_empty());
        assert!(result.ids("Static").is_none());
        assert!(!result.contains("Unit", &id("s1")));
    }

    #[test]
    fn test_query_degenerate_input() {
        let mut grid = grid();
        grid.add("Unit", id("u1"), Point::new(0.0, 0.0)).unwrap();

        assert_eq!(grid.query_radius(Point::new(0.0, 0.0), -1.0, &["Unit"]).total(), 0);
        assert_eq!(grid.query_radius(Point::new(f64::NAN, 0.0), 10.0, &["Unit"]).total(), 0);
        // Zero radius still finds an entity sitting exactly on the center
        assert_eq!(grid.query_radius(Point::new(0.0, 0.0), 0.0, &["Unit"]).total(), 1);
        // Huge radius falls back to walking occupied cells
        assert_eq!(grid.query_radius(Point::new(0.0, 0.0), 1.0e300, &["Unit"]).total(), 1);
    }

    #[test]
    fn test_query_across_cell_boundary() {
        let mut grid = grid();
        // Exactly on the boundary: floor puts it in column 1
        grid.add("Unit", id("b"), Point::new(2000.0, 0.0)).unwrap();

        let result = grid.query_radius(Point::new(1999.0, 0.0), 1.0, &["Unit"]);
        assert!(result.contains("Unit", &id("b")));

        let result = grid.query_radius(Point::new(1998.0, 0.0), 1.0, &["Unit"]);
        assert!(!result.contains("Unit", &id("b")));
    }

    #[test]
    fn test_update_position_moves_between_cells() {
        let mut grid = grid();
        grid.add("Unit", id("u1"), Point::new(100.0, 100.0)).unwrap();

        grid.update_position(&id("u1"), Point::new(4100.0, 100.0)).unwrap();
        grid.assert_consistent();

        let old = grid.query_radius(Point::new(0.0, 0.0), 500.0, &["Unit"]);
        let new = grid.query_radius(Point::new(4000.0, 0.0), 500.0, &["Unit"]);

        assert!(!old.contains("Unit", &id("u1")));
        assert!(new.contains("Unit", &id("u1")));
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn test_update_position_within_cell() {
        let mut grid = grid();
        grid.add("Unit", id("u1"), Point::new(100.0, 100.0)).unwrap();

        grid.update_position(&id("u1"), Point::new(150.0, 120.0)).unwrap();

        assert_eq!(grid.get(&id("u1")).unwrap().position, Point::new(150.0, 120.0));
        grid.assert_consistent();
    }

    #[test]
    fn test_update_position_failures() {
        let mut grid = grid();
        grid.add("Unit", id("u1"), Point::new(0.0, 0.0)).unwrap();

        assert!(matches!(
            grid.update_position(&id("ghost"), Point::new(1.0, 1.0)),
            Err(IndexError::UnknownId(_))
        ));
        assert!(grid
            .update_position(&id("u1"), Point::new(0.0, f64::INFINITY))
            .is_err());
        assert_eq!(grid.get(&id("u1")).unwrap().position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_change_type() {
        let mut grid = grid();
        grid.add("Unit", id("u1"), Point::new(10.0, 10.0)).unwrap();

        grid.change_type(&id("u1"), "Track").unwrap();
        grid.assert_consistent();

        let result = grid.query_radius(Point::new(0.0, 0.0), 50.0, &["Unit", "Track"]);
        assert!(!result.contains("Unit", &id("u1")));
        assert!(result.contains("Track", &id("u1")));
        assert_eq!(grid.get(&id("u1")).unwrap().position, Point::new(10.0, 10.0));

        assert!(matches!(
            grid.change_type(&id("u1"), "Ship"),
            Err(IndexError::UnknownKind(_))
        ));
        assert!(matches!(
            grid.change_type(&id("ghost"), "Unit"),
            Err(IndexError::UnknownId(_))
        ));
        // Same kind is a no-op
        grid.change_type(&id("u1"), "Track").unwrap();
        grid.assert_consistent();
    }

    #[test]
    fn test_integer_ids_and_clear() {
        let mut grid: GeoGrid<u32> = GeoGrid::new(50.0, ["Static"]).unwrap();
        grid.add("Static", 1, Point::new(-10.0, -10.0)).unwrap();
        grid.add("Static", 2, Point::new(-60.0, 10.0)).unwrap();

        let result = grid.query_radius(Point::new(-30.0, 0.0), 40.0, &["Static"]);
        assert_eq!(result.total(), 2);

        grid.clear();
        assert_eq!(grid.size(), 0);
        assert_eq!(grid.cell_count(), 0);
        assert_eq!(grid.kinds().len(), 1);
    }
}
