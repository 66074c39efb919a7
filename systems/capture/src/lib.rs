#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic territory-capture system.
//!
//! The system consumes the world's occupancy events, tracks the trail the
//! agent carves across open land, detects the moment a trail reconnects with
//! secured territory, and commits the enclosed region through capture
//! commands. Movement never depends on anything computed here; the event
//! stream flows strictly from the world into this system.

use std::collections::VecDeque;

use fenceline_core::{CellClass, CellCoord, Command, Direction, Event};
use fenceline_world::query::ClassView;

const NEIGHBOUR_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// Pure system that reacts to occupancy events and emits capture commands.
#[derive(Debug, Default)]
pub struct Capture {
    on_land: bool,
    trail: Vec<CellCoord>,
}

impl Capture {
    /// Creates a new capture system with no excursion in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the agent's last observed cell was classified land.
    #[must_use]
    pub fn on_land(&self) -> bool {
        self.on_land
    }

    /// Cells carved during the current excursion, in walk order. The first
    /// entry seeds the enclosure fill.
    #[must_use]
    pub fn trail(&self) -> &[CellCoord] {
        &self.trail
    }

    /// Consumes world events against a class-view snapshot and emits capture
    /// commands.
    ///
    /// Occupancy notifications are processed in order; each is evaluated
    /// against a single snapshot of the cell's class and the pre-existing
    /// on-land flag, so one notification can never both open an excursion and
    /// close a loop. Board configuration and agent placement reset any
    /// excursion in progress.
    pub fn handle(&mut self, events: &[Event], classes: ClassView<'_>, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::BoardConfigured { .. } | Event::AgentPlaced { .. } => {
                    self.on_land = false;
                    self.trail.clear();
                }
                Event::CellOccupied { cell } => self.on_cell_entered(*cell, classes, out),
                _ => {}
            }
        }
    }

    fn on_cell_entered(&mut self, cell: CellCoord, classes: ClassView<'_>, out: &mut Vec<Command>) {
        match classes.class_of(cell) {
            Some(CellClass::Land) => {
                if !self.on_land {
                    self.on_land = true;
                    self.trail.clear();
                }
                if !self.trail.contains(&cell) {
                    self.trail.push(cell);
                    // Eager marking: the cell is carved the moment it is
                    // walked, before the enclosure outcome is known, and
                    // stays cleared even when no region commits.
                    out.push(Command::CarveTrail { cell });
                }
            }
            Some(CellClass::Border) | Some(CellClass::Cleared) => {
                if self.on_land {
                    self.on_land = false;
                    self.commit_enclosure(classes, out);
                    self.trail.clear();
                }
            }
            // Void cells carry no class and are neither a land entry nor a
            // closure; the excursion state is left untouched.
            None => {}
        }
    }

    fn commit_enclosure(&self, classes: ClassView<'_>, out: &mut Vec<Command>) {
        if self.trail.is_empty() {
            return;
        }

        let fill = flood_fill(&self.trail, classes);
        let cells = if fill.enclosed { fill.region } else { Vec::new() };
        out.push(Command::CaptureRegion { cells });
    }
}

/// Result of an enclosure fill: the traversed region and whether it stayed
/// bounded by secured territory.
#[derive(Clone, Debug, Default)]
struct Enclosure {
    region: Vec<CellCoord>,
    enclosed: bool,
}

/// Breadth-first fill seeded from the trail's first cell.
///
/// The traversal domain is the trail itself plus every cell currently
/// classified land. Border and cleared frontier cells bound the region and
/// never disqualify it; a frontier cell inside the board that carries no
/// class at all is a gap in the perimeter, which makes the region unbounded.
/// Each cell is visited at most once, so the fill always terminates. The
/// trail is 4-connected by construction, so the outcome does not depend on
/// which trail cell seeds the fill.
fn flood_fill(trail: &[CellCoord], classes: ClassView<'_>) -> Enclosure {
    let Some(&seed) = trail.first() else {
        return Enclosure::default();
    };

    let (columns, rows) = classes.dimensions();
    let width = usize::try_from(columns).unwrap_or(0);
    let height = usize::try_from(rows).unwrap_or(0);
    let Some(cell_count) = width.checked_mul(height) else {
        return Enclosure::default();
    };
    if cell_count == 0 {
        return Enclosure::default();
    }

    let mut on_trail = vec![false; cell_count];
    for cell in trail {
        if let Some(index) = dense_index(width, columns, rows, *cell) {
            on_trail[index] = true;
        }
    }

    let mut visited = vec![false; cell_count];
    let mut region = Vec::new();
    let mut queue = VecDeque::new();
    let mut escaped = false;

    let Some(seed_index) = dense_index(width, columns, rows, seed) else {
        return Enclosure::default();
    };
    visited[seed_index] = true;
    queue.push_back(seed);

    while let Some(cell) = queue.pop_front() {
        region.push(cell);

        for direction in NEIGHBOUR_DIRECTIONS {
            let Some(neighbour) = cell.step(direction) else {
                continue;
            };
            let Some(index) = dense_index(width, columns, rows, neighbour) else {
                // The board edge itself is a hard boundary of the finite
                // grid, not a perimeter gap.
                continue;
            };
            if visited[index] {
                continue;
            }

            let traversable =
                on_trail[index] || classes.class_of(neighbour) == Some(CellClass::Land);
            if traversable {
                visited[index] = true;
                queue.push_back(neighbour);
            } else if classes.class_of(neighbour).is_none() {
                escaped = true;
            }
        }
    }

    Enclosure {
        region,
        enclosed: !escaped,
    }
}

fn dense_index(width: usize, columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < columns && cell.row() < rows {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    } else {
        None
    }
}
