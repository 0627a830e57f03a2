//! Uniform grid broad phase
//!
//! Objects are bucketed by the XZ cells their square footprint overlaps
//! (one cell for point-sized objects). A neighborhood query reads the 3x3
//! block of cells around the query point, so its result is a superset of
//! every object within one cell size of that point. Callers still run exact
//! shape tests; this is only a filter.

use glam::Vec3;
use outpost_core::ObjectId;
use std::collections::{HashMap, HashSet};

/// Footprints covering more cells than this are not bucketed; they are
/// returned by every query instead.
const MAX_FOOTPRINT_CELLS: i64 = 4096;

/// Integer grid coordinates of a cell in the XZ plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i32,
    pub z: i32,
}

impl CellKey {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The 3x3 block of cells centered on this one
    pub fn neighborhood(self) -> impl Iterator<Item = CellKey> {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dz| CellKey::new(self.x + dx, self.z + dz)))
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    position: Vec3,
    extent: f32,
    cells: Vec<CellKey>,
}

/// Uniform spatial grid over object ids
#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f32,
    inv_cell_size: f32,
    cells: HashMap<CellKey, HashSet<ObjectId>>,
    entries: HashMap<ObjectId, IndexEntry>,
    oversized: HashSet<ObjectId>,
}

impl SpatialIndex {
    /// Create an empty grid. Non-positive cell sizes fall back to 1.0.
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 && cell_size.is_finite() {
            cell_size
        } else {
            log::warn!("Invalid grid cell size {}, using 1.0", cell_size);
            1.0
        };
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::with_capacity(256),
            entries: HashMap::new(),
            oversized: HashSet::new(),
        }
    }

    /// Cell edge length
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing a position
    #[inline]
    pub fn cell_of(&self, position: Vec3) -> CellKey {
        CellKey::new(
            (position.x * self.inv_cell_size).floor() as i32,
            (position.z * self.inv_cell_size).floor() as i32,
        )
    }

    /// Cells a square footprint overlaps, or `None` past `MAX_FOOTPRINT_CELLS`
    fn covered_cells(&self, position: Vec3, extent: f32) -> Option<Vec<CellKey>> {
        let extent = extent.max(0.0);
        let min = self.cell_of(position - Vec3::new(extent, 0.0, extent));
        let max = self.cell_of(position + Vec3::new(extent, 0.0, extent));

        let span_x = i64::from(max.x) - i64::from(min.x) + 1;
        let span_z = i64::from(max.z) - i64::from(min.z) + 1;
        if span_x.saturating_mul(span_z) > MAX_FOOTPRINT_CELLS {
            return None;
        }

        let mut cells = Vec::with_capacity((span_x * span_z) as usize);
        for x in min.x..=max.x {
            for z in min.z..=max.z {
                cells.push(CellKey::new(x, z));
            }
        }
        Some(cells)
    }

    /// Index an object. `extent` is the half-size of its XZ footprint.
    ///
    /// Inserting an id that is already indexed re-indexes it.
    pub fn insert(&mut self, id: ObjectId, position: Vec3, extent: f32) {
        if self.entries.contains_key(&id) {
            log::debug!("Re-indexing {} on insert", id);
            self.remove(id);
        }

        let cells = match self.covered_cells(position, extent) {
            Some(cells) => cells,
            None => {
                log::debug!("{} footprint {} too large to bucket", id, extent);
                self.oversized.insert(id);
                Vec::new()
            }
        };
        for cell in &cells {
            self.cells.entry(*cell).or_default().insert(id);
        }
        self.entries.insert(
            id,
            IndexEntry {
                position,
                extent,
                cells,
            },
        );
    }

    /// Remove an object. Returns false if it was not indexed.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            log::debug!("Remove of unindexed object {}", id);
            return false;
        };

        self.oversized.remove(&id);
        for cell in &entry.cells {
            if let Some(bucket) = self.cells.get_mut(cell) {
                bucket.remove(&id);
                if bucket.is_empty() {
                    self.cells.remove(cell);
                }
            }
        }
        true
    }

    /// Move an object: always remove-then-reinsert. Returns false if unknown.
    pub fn update(&mut self, id: ObjectId, new_position: Vec3) -> bool {
        let Some(extent) = self.entries.get(&id).map(|e| e.extent) else {
            log::debug!("Update of unindexed object {}", id);
            return false;
        };
        self.remove(id);
        self.insert(id, new_position, extent);
        true
    }

    /// Every id indexed in the 3x3 block around `position`
    pub fn query_neighborhood(&self, position: Vec3) -> HashSet<ObjectId> {
        let mut result: HashSet<ObjectId> = self.oversized.iter().copied().collect();
        for cell in self.cell_of(position).neighborhood() {
            if let Some(bucket) = self.cells.get(&cell) {
                result.extend(bucket.iter().copied());
            }
        }
        result
    }

    /// Same as [`query_neighborhood`](Self::query_neighborhood) but appends to
    /// a caller-owned buffer. The buffer is cleared first; output is sorted
    /// and deduplicated.
    pub fn query_neighborhood_into(&self, position: Vec3, out: &mut Vec<ObjectId>) {
        out.clear();
        out.extend(self.oversized.iter().copied());
        for cell in self.cell_of(position).neighborhood() {
            if let Some(bucket) = self.cells.get(&cell) {
                out.extend(bucket.iter().copied());
            }
        }
        out.sort_unstable();
        out.dedup();
    }

    /// Ids bucketed in a single cell. Oversized objects are not included.
    pub fn query_cell(&self, cell: CellKey) -> impl Iterator<Item = ObjectId> + '_ {
        self.cells.get(&cell).into_iter().flat_map(|bucket| bucket.iter().copied())
    }

    /// Objects whose footprint may reach within `radius` of `position`.
    ///
    /// Scans enough cells to cover the radius, then drops entries whose
    /// center is farther than `radius + extent`. Sorted by id.
    pub fn query_radius(&self, position: Vec3, radius: f32) -> Vec<ObjectId> {
        let radius = radius.max(0.0);
        let within = |id: &ObjectId| {
            self.entries.get(id).is_some_and(|entry| {
                let dx = entry.position.x - position.x;
                let dz = entry.position.z - position.z;
                let reach = radius + entry.extent;
                dx * dx + dz * dz <= reach * reach
            })
        };

        let mut result: Vec<ObjectId> = match self.covered_cells(position, radius) {
            Some(cells) => {
                let mut seen = HashSet::new();
                cells
                    .iter()
                    .filter_map(|cell| self.cells.get(cell))
                    .flatten()
                    .chain(self.oversized.iter())
                    .filter(|id| seen.insert(**id))
                    .filter(|id| within(*id))
                    .copied()
                    .collect()
            }
            // Too many cells to walk: scan the entries
            None => self.entries.keys().filter(|id| within(*id)).copied().collect(),
        };
        result.sort_unstable();
        result
    }

    /// Last indexed position of an object
    pub fn position_of(&self, id: ObjectId) -> Option<Vec3> {
        self.entries.get(&id).map(|e| e.position)
    }

    /// Whether an id is indexed
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of indexed objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
        self.oversized.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_insert_query_remove() {
        let mut grid = SpatialIndex::new(10.0);
        let id = ObjectId::World(1);
        grid.insert(id, Vec3::new(5.0, 0.0, 5.0), 0.0);

        assert!(grid.query_neighborhood(Vec3::new(12.0, 0.0, 3.0)).contains(&id));
        assert!(!grid.query_neighborhood(Vec3::new(40.0, 0.0, 40.0)).contains(&id));

        assert!(grid.remove(id));
        assert!(!grid.remove(id));
        assert!(grid.is_empty());
        assert_eq!(grid.occupied_cells(), 0);
    }

    #[test]
    fn test_update_moves_object() {
        let mut grid = SpatialIndex::new(10.0);
        let id = ObjectId::World(1);
        grid.insert(id, Vec3::ZERO, 0.0);

        assert!(grid.update(id, Vec3::new(100.0, 0.0, 100.0)));
        assert!(!grid.query_neighborhood(Vec3::ZERO).contains(&id));
        assert!(grid.query_neighborhood(Vec3::new(100.0, 0.0, 100.0)).contains(&id));
        // No stale cells left behind
        assert_eq!(grid.occupied_cells(), 1);

        assert!(!grid.update(ObjectId::World(99), Vec3::ZERO));
    }

    #[test]
    fn test_cell_boundary_visible_from_both_sides() {
        let mut grid = SpatialIndex::new(10.0);
        let id = ObjectId::World(1);
        grid.insert(id, Vec3::new(10.0, 0.0, 0.0), 0.0);

        assert!(grid.query_neighborhood(Vec3::new(9.99, 0.0, 0.0)).contains(&id));
        assert!(grid.query_neighborhood(Vec3::new(10.01, 0.0, 0.0)).contains(&id));
    }

    #[test]
    fn test_large_footprint_spans_cells() {
        let mut grid = SpatialIndex::new(10.0);
        let id = ObjectId::World(1);
        // A 60-unit wide building centered at the origin
        grid.insert(id, Vec3::ZERO, 30.0);

        assert!(grid.query_neighborhood(Vec3::new(29.0, 0.0, 0.0)).contains(&id));
        assert!(grid.occupied_cells() > 9);
    }

    #[test]
    fn test_huge_footprint_is_found_everywhere() {
        let mut grid = SpatialIndex::new(10.0);
        let huge = ObjectId::World(1);
        let small = ObjectId::World(2);
        grid.insert(huge, Vec3::ZERO, 1e10);
        grid.insert(small, Vec3::new(500.0, 0.0, 0.0), 0.5);

        assert_eq!(grid.occupied_cells(), 1);
        assert!(grid.query_neighborhood(Vec3::new(-1e6, 0.0, 3e5)).contains(&huge));
        assert_eq!(
            grid.query_radius(Vec3::new(500.0, 0.0, 0.0), 1.0),
            vec![huge, small]
        );
        assert_eq!(grid.query_radius(Vec3::ZERO, f32::MAX), vec![huge, small]);

        assert!(grid.remove(huge));
        assert!(grid.query_neighborhood(Vec3::ZERO).is_empty());
    }

    #[test]
    fn test_neighborhood_into_dedups() {
        let mut grid = SpatialIndex::new(10.0);
        grid.insert(ObjectId::World(2), Vec3::ZERO, 15.0);
        grid.insert(ObjectId::World(1), Vec3::new(1.0, 0.0, 1.0), 0.0);

        let mut out = vec![ObjectId::World(42)];
        grid.query_neighborhood_into(Vec3::ZERO, &mut out);
        assert_eq!(out, vec![ObjectId::World(1), ObjectId::World(2)]);
    }

    #[test]
    fn test_query_radius() {
        let mut grid = SpatialIndex::new(5.0);
        grid.insert(ObjectId::World(1), Vec3::new(20.0, 0.0, 0.0), 0.0);
        grid.insert(ObjectId::World(2), Vec3::new(40.0, 0.0, 0.0), 0.0);

        let near = grid.query_radius(Vec3::ZERO, 25.0);
        assert_eq!(near, vec![ObjectId::World(1)]);
    }

    #[test]
    fn test_broad_phase_soundness() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let cell = 8.0;
        let mut grid = SpatialIndex::new(cell);
        let mut positions = Vec::new();

        for i in 0..400u64 {
            let p = Vec3::new(
                rng.random_range(-60.0..60.0),
                0.0,
                rng.random_range(-60.0..60.0),
            );
            grid.insert(ObjectId::World(i), p, 0.0);
            positions.push((ObjectId::World(i), p));
        }
        // Shuffle some objects around to exercise update
        for i in (0..400u64).step_by(3) {
            let p = Vec3::new(
                rng.random_range(-60.0..60.0),
                0.0,
                rng.random_range(-60.0..60.0),
            );
            grid.update(ObjectId::World(i), p);
            positions[i as usize].1 = p;
        }

        for _ in 0..200 {
            let q = Vec3::new(rng.random_range(-70.0..70.0), 0.0, rng.random_range(-70.0..70.0));
            let found = grid.query_neighborhood(q);
            for (id, p) in &positions {
                let dx = p.x - q.x;
                let dz = p.z - q.z;
                if (dx * dx + dz * dz).sqrt() <= cell {
                    assert!(found.contains(id), "{} at {:?} missed from {:?}", id, p, q);
                }
            }
        }
    }
}
