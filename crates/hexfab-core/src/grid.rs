//! Grid occupancy store: which factory sits on which hex.
//!
//! The grid owns every placed [`Factory`]. Cells map to [`FactoryId`]s in a
//! `BTreeMap`, so iteration is always row-major ([`AxialCoord`]'s ordering)
//! and the engine's stage passes are deterministic. At most one factory may
//! occupy a cell; [`HexGrid::place`] is the only way in.

use crate::event::Event;
use crate::factory::{Factory, FactoryInfo, FactoryKind};
use crate::fixed::Ticks;
use crate::hex::{AxialCoord, HexDirection};
use crate::id::{ExternalHandle, FactoryId};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::BTreeMap;
use tracing::info;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell {0} is already occupied")]
    Occupied(AxialCoord),
    #[error("no factory at {0}")]
    NotFound(AxialCoord),
}

/// A placement change waiting to be published. The engine stamps it with the
/// current tick when it drains the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridChange {
    Placed { coord: AxialCoord, kind: FactoryKind },
    Removed { coord: AxialCoord, kind: FactoryKind },
}

impl GridChange {
    pub fn into_event(self, tick: Ticks) -> Event {
        match self {
            GridChange::Placed { coord, kind } => Event::FactoryPlaced { coord, kind, tick },
            GridChange::Removed { coord, kind } => Event::FactoryRemoved { coord, kind, tick },
        }
    }
}

// ---------------------------------------------------------------------------
// HexGrid
// ---------------------------------------------------------------------------

/// Maps hex cells to factories.
///
/// - `tiles`: cell -> factory id
/// - `factories`: id -> factory instance
/// - `handles`: id -> opaque presentation handle
///
/// Every place and remove also queues a [`GridChange`]. The engine drains
/// the queue each tick; a grid used on its own should call
/// [`HexGrid::drain_changes`] periodically or the queue keeps growing.
#[derive(Debug, Default)]
pub struct HexGrid {
    tiles: BTreeMap<AxialCoord, FactoryId>,
    factories: SlotMap<FactoryId, Factory>,
    handles: SecondaryMap<FactoryId, ExternalHandle>,
    pending: Vec<GridChange>,
}

impl HexGrid {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Placement --

    pub fn is_available(&self, coord: AxialCoord) -> bool {
        !self.tiles.contains_key(&coord)
    }

    /// Put a factory on an empty cell.
    pub fn place(&mut self, coord: AxialCoord, factory: Factory) -> Result<FactoryId, GridError> {
        if !self.is_available(coord) {
            return Err(GridError::Occupied(coord));
        }
        let kind = factory.kind();
        let id = self.factories.insert(factory);
        self.tiles.insert(coord, id);
        self.pending.push(GridChange::Placed { coord, kind });
        info!(%coord, %kind, "placed factory");
        Ok(id)
    }

    /// Take a factory off its cell, returning it. Its external handle, if
    /// any, is dropped with it.
    pub fn remove(&mut self, coord: AxialCoord) -> Result<Factory, GridError> {
        let id = self.tiles.remove(&coord).ok_or(GridError::NotFound(coord))?;
        self.handles.remove(id);
        let factory = self
            .factories
            .remove(id)
            .ok_or(GridError::NotFound(coord))?;
        self.pending.push(GridChange::Removed {
            coord,
            kind: factory.kind(),
        });
        info!(%coord, kind = %factory.kind(), "removed factory");
        Ok(factory)
    }

    /// Change the recipe a placed factory runs. Progress restarts from zero.
    pub fn assign_recipe(
        &mut self,
        coord: AxialCoord,
        recipe_id: Option<String>,
    ) -> Result<(), GridError> {
        let factory = self.get_mut(coord).ok_or(GridError::NotFound(coord))?;
        factory.set_recipe(recipe_id);
        Ok(())
    }

    // -- Point queries --

    pub fn id_at(&self, coord: AxialCoord) -> Option<FactoryId> {
        self.tiles.get(&coord).copied()
    }

    pub fn get(&self, coord: AxialCoord) -> Option<&Factory> {
        self.id_at(coord).and_then(|id| self.factories.get(id))
    }

    pub fn get_mut(&mut self, coord: AxialCoord) -> Option<&mut Factory> {
        let id = self.id_at(coord)?;
        self.factories.get_mut(id)
    }

    pub fn info_at(&self, coord: AxialCoord) -> Option<FactoryInfo> {
        self.get(coord).map(|f| FactoryInfo::new(coord, f))
    }

    // -- Adjacency --

    /// Occupied neighbors of a cell, in direction order. Directions that
    /// leave the coordinate range have no neighbor.
    pub fn neighbors_of(&self, coord: AxialCoord) -> Vec<(AxialCoord, &Factory)> {
        HexDirection::all()
            .into_iter()
            .filter_map(|dir| coord.checked_step(dir))
            .filter_map(|n| self.get(n).map(|f| (n, f)))
            .collect()
    }

    // -- Presentation handles --

    pub fn set_handle(&mut self, coord: AxialCoord, handle: ExternalHandle) -> Result<(), GridError> {
        let id = self.id_at(coord).ok_or(GridError::NotFound(coord))?;
        self.handles.insert(id, handle);
        Ok(())
    }

    pub fn handle_at(&self, coord: AxialCoord) -> Option<ExternalHandle> {
        self.id_at(coord).and_then(|id| self.handles.get(id).copied())
    }

    // -- Iteration --

    /// Placed factories in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (AxialCoord, &Factory)> {
        self.tiles
            .iter()
            .filter_map(|(&coord, &id)| self.factories.get(id).map(|f| (coord, f)))
    }

    /// Mutable access to every placed factory, in no particular order.
    pub fn factories_mut(&mut self) -> impl Iterator<Item = &mut Factory> {
        self.factories.values_mut()
    }

    /// Cells holding a factory of `kind`, row-major.
    pub fn coords_of(&self, kind: FactoryKind) -> Vec<AxialCoord> {
        self.iter()
            .filter(|(_, f)| f.kind() == kind)
            .map(|(coord, _)| coord)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Take the placement changes recorded since the last drain.
    pub fn drain_changes(&mut self) -> Vec<GridChange> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine() -> Factory {
        Factory::new(FactoryKind::Extractor)
    }

    #[test]
    fn place_then_get() {
        let mut grid = HexGrid::new();
        let c = AxialCoord::new(2, -1);
        assert!(grid.is_available(c));
        grid.place(c, mine()).unwrap();
        assert!(!grid.is_available(c));
        assert_eq!(grid.get(c).map(Factory::kind), Some(FactoryKind::Extractor));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn second_place_on_same_cell_fails() {
        let mut grid = HexGrid::new();
        let c = AxialCoord::ORIGIN;
        grid.place(c, mine()).unwrap();
        let err = grid.place(c, Factory::new(FactoryKind::Assembler)).unwrap_err();
        assert_eq!(err, GridError::Occupied(c));
        assert_eq!(grid.get(c).map(Factory::kind), Some(FactoryKind::Extractor));
    }

    #[test]
    fn remove_empty_cell_is_not_found() {
        let mut grid = HexGrid::new();
        let c = AxialCoord::new(5, 5);
        assert_eq!(grid.remove(c).unwrap_err(), GridError::NotFound(c));
    }

    #[test]
    fn remove_frees_the_cell_and_its_handle() {
        let mut grid = HexGrid::new();
        let c = AxialCoord::new(1, 0);
        grid.place(c, mine()).unwrap();
        grid.set_handle(c, ExternalHandle(42)).unwrap();
        assert_eq!(grid.handle_at(c), Some(ExternalHandle(42)));

        let removed = grid.remove(c).unwrap();
        assert_eq!(removed.kind(), FactoryKind::Extractor);
        assert!(grid.is_available(c));
        assert_eq!(grid.handle_at(c), None);

        grid.place(c, mine()).unwrap();
        assert_eq!(grid.handle_at(c), None);
    }

    #[test]
    fn neighbors_follow_direction_order() {
        let mut grid = HexGrid::new();
        let center = AxialCoord::ORIGIN;
        grid.place(center, Factory::new(FactoryKind::Assembler)).unwrap();
        let west = center.step(HexDirection::West);
        let east = center.step(HexDirection::East);
        grid.place(west, mine()).unwrap();
        grid.place(east, Factory::new(FactoryKind::Converter)).unwrap();
        grid.place(AxialCoord::new(5, 5), mine()).unwrap();

        let found: Vec<AxialCoord> = grid.neighbors_of(center).iter().map(|(c, _)| *c).collect();
        assert_eq!(found, vec![east, west]);
        assert!(grid.neighbors_of(AxialCoord::new(-9, 9)).is_empty());
    }

    #[test]
    fn neighbors_at_the_range_edge() {
        let mut grid = HexGrid::new();
        let edge = AxialCoord::new(i32::MAX, 0);
        let west = AxialCoord::new(i32::MAX - 1, 0);
        grid.place(edge, mine()).unwrap();
        grid.place(west, mine()).unwrap();

        let found: Vec<AxialCoord> = grid.neighbors_of(edge).iter().map(|(c, _)| *c).collect();
        assert_eq!(found, vec![west]);
        let found: Vec<AxialCoord> = grid.neighbors_of(west).iter().map(|(c, _)| *c).collect();
        assert_eq!(found, vec![edge]);
    }

    #[test]
    fn iteration_is_row_major() {
        let mut grid = HexGrid::new();
        for c in [
            AxialCoord::new(1, 1),
            AxialCoord::new(-1, 0),
            AxialCoord::new(2, -1),
            AxialCoord::new(0, 0),
        ] {
            grid.place(c, mine()).unwrap();
        }
        let order: Vec<AxialCoord> = grid.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                AxialCoord::new(2, -1),
                AxialCoord::new(-1, 0),
                AxialCoord::new(0, 0),
                AxialCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn assign_recipe_resets_progress() {
        let mut grid = HexGrid::new();
        let c = AxialCoord::ORIGIN;
        grid.place(c, Factory::new(FactoryKind::Converter).with_recipe("iron_ingot"))
            .unwrap();
        grid.get_mut(c).unwrap().accumulate(crate::fixed::secs(2));
        grid.assign_recipe(c, Some("copper_ingot".into())).unwrap();
        let f = grid.get(c).unwrap();
        assert_eq!(f.recipe_id(), Some("copper_ingot"));
        assert_eq!(f.elapsed(), crate::fixed::Fixed64::ZERO);
        assert!(grid.assign_recipe(AxialCoord::new(3, 3), None).is_err());
    }

    #[test]
    fn changes_are_queued_in_order() {
        let mut grid = HexGrid::new();
        let c = AxialCoord::new(0, 1);
        grid.place(c, mine()).unwrap();
        grid.remove(c).unwrap();
        let changes = grid.drain_changes();
        assert_eq!(
            changes,
            vec![
                GridChange::Placed {
                    coord: c,
                    kind: FactoryKind::Extractor
                },
                GridChange::Removed {
                    coord: c,
                    kind: FactoryKind::Extractor
                },
            ]
        );
        assert!(grid.drain_changes().is_empty());
        assert_eq!(
            changes[0].into_event(7),
            Event::FactoryPlaced {
                coord: c,
                kind: FactoryKind::Extractor,
                tick: 7
            }
        );
    }

    #[test]
    fn coords_of_kind() {
        let mut grid = HexGrid::new();
        grid.place(AxialCoord::new(0, 1), mine()).unwrap();
        grid.place(AxialCoord::new(0, 0), Factory::new(FactoryKind::Converter))
            .unwrap();
        grid.place(AxialCoord::new(3, -1), mine()).unwrap();
        assert_eq!(
            grid.coords_of(FactoryKind::Extractor),
            vec![AxialCoord::new(3, -1), AxialCoord::new(0, 1)]
        );
    }
}
