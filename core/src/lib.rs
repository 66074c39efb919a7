#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fenceline engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Fenceline.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs the playfield described by the provided layout.
    ConfigureBoard {
        /// Cell layers and dimensions that make up the board.
        layout: BoardLayout,
    },
    /// Updates the speed at which the agent glides between cell centres.
    ConfigureMoveSpeed {
        /// Interpolation speed measured in grid cells per second.
        cells_per_second: f32,
    },
    /// Places the agent at the centre of the provided cell.
    PlaceAgent {
        /// Cell the agent should occupy.
        cell: CellCoord,
    },
    /// Feeds one sample of directional input into the agent's heading.
    SetHeading {
        /// Raw input vector captured by the host for this tick.
        input: RawInput,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Marks a single walked land cell as cleared ahead of enclosure.
    CarveTrail {
        /// Land cell the agent stepped on during the current excursion.
        cell: CellCoord,
    },
    /// Commits an enclosed region discovered by the capture system.
    CaptureRegion {
        /// Cells composing the region; empty when the fill escaped.
        cells: Vec<CellCoord>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a board layout was installed.
    BoardConfigured {
        /// Number of cell columns laid out on the board.
        columns: u32,
        /// Number of cell rows laid out on the board.
        rows: u32,
        /// Count of cells that start classified as land.
        land_cells: usize,
    },
    /// Confirms that the agent was placed on the board.
    AgentPlaced {
        /// Cell the agent occupies after placement.
        cell: CellCoord,
    },
    /// Reports that an agent placement request was rejected.
    AgentPlacementRejected {
        /// Cell provided in the rejected placement request.
        cell: CellCoord,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the agent finished a grid step and occupies a new cell.
    ///
    /// Fires exactly once per completed step, never on intermediate
    /// interpolation frames. This is the sole channel the capture system
    /// uses to observe the agent's grid position.
    CellOccupied {
        /// Cell the agent occupies after completing the step.
        cell: CellCoord,
    },
    /// Reports that an attempted step was vetoed by the obstacle probe.
    StepBlocked {
        /// Cell the agent occupied when the step was attempted.
        from: CellCoord,
        /// Direction of the vetoed step.
        direction: Direction,
    },
    /// Announces that an occupancy moved the agent from secured ground onto
    /// open land. Diagnostics only; the capture system tracks its own flag.
    LandEntered {
        /// Land cell the agent stepped onto.
        cell: CellCoord,
    },
    /// Confirms that a walked land cell was reclassified as cleared.
    TrailCarved {
        /// Cell that transitioned from land to cleared.
        cell: CellCoord,
    },
    /// Announces that a trail reconnected with secured territory.
    LoopClosed {
        /// Cells newly reclassified by the enclosure commit; empty when the
        /// fill escaped through a gap and nothing beyond the trail changed.
        captured: Vec<CellCoord>,
    },
    /// Publishes a refreshed territory statistics report.
    StatsUpdated {
        /// Report computed from the current board state.
        report: StatsReport,
    },
}

/// Cardinal movement directions available to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Raw directional input sampled by the host once per tick.
///
/// Positive `horizontal` points East, positive `vertical` points North
/// (toward decreasing rows). Components are sign-only; magnitudes beyond one
/// carry no extra meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawInput {
    horizontal: i32,
    vertical: i32,
}

impl RawInput {
    /// Creates a new raw input sample from axis readings.
    #[must_use]
    pub const fn new(horizontal: i32, vertical: i32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Resolves the sample to a single cardinal direction.
    ///
    /// A nonzero horizontal component suppresses the vertical one, so
    /// diagonal samples always resolve to East or West. A fully zero sample
    /// yields `None`, which callers treat as "keep the previous heading".
    #[must_use]
    pub const fn dominant_axis(&self) -> Option<Direction> {
        if self.horizontal > 0 {
            Some(Direction::East)
        } else if self.horizontal < 0 {
            Some(Direction::West)
        } else if self.vertical > 0 {
            Some(Direction::North)
        } else if self.vertical < 0 {
            Some(Direction::South)
        } else {
            None
        }
    }
}

/// Per-cell territory category tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellClass {
    /// Permanently secured perimeter cell; never transitions.
    Border,
    /// Capturable cell; transitions to [`CellClass::Cleared`] exactly once.
    Land,
    /// Permanently secured cell reached by capture; terminal.
    Cleared,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the 4-neighbour in the provided direction, or `None` when the
    /// step would leave the non-negative coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Continuous position expressed in grid units.
///
/// Cell centres sit at integral coordinates, so the distance between the
/// centres of two 4-adjacent cells is exactly one grid unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPosition {
    x: f32,
    y: f32,
}

impl GridPosition {
    /// Creates a position from explicit grid-unit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the centre of the provided cell.
    #[must_use]
    pub fn from_cell(cell: CellCoord) -> Self {
        Self {
            x: cell.column() as f32,
            y: cell.row() as f32,
        }
    }

    /// Horizontal coordinate in grid units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in grid units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another position in grid units.
    #[must_use]
    pub fn distance_to(self, other: GridPosition) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Advances toward `target` by at most `max_delta` grid units.
    ///
    /// Never overshoots: once the remaining distance drops below
    /// `max_delta`, the result is exactly `target`.
    #[must_use]
    pub fn move_toward(self, target: GridPosition, max_delta: f32) -> GridPosition {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= max_delta || distance == 0.0 {
            return target;
        }
        Self {
            x: self.x + dx / distance * max_delta,
            y: self.y + dy / distance * max_delta,
        }
    }
}

/// Startup description of the playfield cell layers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    columns: u32,
    rows: u32,
    border: Vec<CellCoord>,
    land: Vec<CellCoord>,
    obstacles: Vec<CellCoord>,
}

impl BoardLayout {
    /// Assembles a layout from explicit cell layers.
    ///
    /// Cells outside the `columns` x `rows` footprint are dropped when the
    /// layout is installed. A cell listed in both class layers resolves as
    /// border; the obstacle layer is independent of cell classes.
    #[must_use]
    pub fn from_layers(
        columns: u32,
        rows: u32,
        border: Vec<CellCoord>,
        land: Vec<CellCoord>,
        obstacles: Vec<CellCoord>,
    ) -> Self {
        Self {
            columns,
            rows,
            border,
            land,
            obstacles,
        }
    }

    /// Builds the canonical playfield: a solid border ring around an
    /// all-land interior.
    #[must_use]
    pub fn walled(columns: u32, rows: u32) -> Self {
        let mut border = Vec::new();
        let mut land = Vec::new();

        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                let on_ring =
                    column == 0 || row == 0 || column + 1 == columns || row + 1 == rows;
                if on_ring {
                    border.push(cell);
                } else {
                    land.push(cell);
                }
            }
        }

        Self {
            columns,
            rows,
            border,
            land,
            obstacles: Vec::new(),
        }
    }

    /// Number of cell columns covered by the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows covered by the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cells that start classified as border.
    #[must_use]
    pub fn border(&self) -> &[CellCoord] {
        &self.border
    }

    /// Cells that start classified as land.
    #[must_use]
    pub fn land(&self) -> &[CellCoord] {
        &self.land
    }

    /// Cells the obstacle probe reports as blocked.
    #[must_use]
    pub fn obstacles(&self) -> &[CellCoord] {
        &self.obstacles
    }
}

/// Territory statistics computed from the authoritative board state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Count of cells that started classified as land.
    pub initial_land: usize,
    /// Count of cells currently classified as cleared.
    pub cleared: usize,
    /// Count of cells still classified as land.
    pub land_remaining: usize,
    /// Number of loop closures observed since the board was configured.
    pub loops_closed: u32,
}

#[cfg(test)]
mod tests {
    use super::{BoardLayout, CellClass, CellCoord, Direction, GridPosition, RawInput, StatsReport};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn step_covers_all_directions() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(origin.step(Direction::North), Some(CellCoord::new(3, 2)));
        assert_eq!(origin.step(Direction::East), Some(CellCoord::new(4, 3)));
        assert_eq!(origin.step(Direction::South), Some(CellCoord::new(3, 4)));
        assert_eq!(origin.step(Direction::West), Some(CellCoord::new(2, 3)));
    }

    #[test]
    fn step_refuses_to_leave_coordinate_space() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
    }

    #[test]
    fn diagonal_input_resolves_to_horizontal() {
        assert_eq!(
            RawInput::new(1, 1).dominant_axis(),
            Some(Direction::East)
        );
        assert_eq!(
            RawInput::new(-1, -1).dominant_axis(),
            Some(Direction::West)
        );
    }

    #[test]
    fn vertical_input_resolves_when_horizontal_is_zero() {
        assert_eq!(RawInput::new(0, 1).dominant_axis(), Some(Direction::North));
        assert_eq!(RawInput::new(0, -1).dominant_axis(), Some(Direction::South));
    }

    #[test]
    fn zero_input_resolves_to_none() {
        assert_eq!(RawInput::new(0, 0).dominant_axis(), None);
    }

    #[test]
    fn move_toward_clamps_and_snaps() {
        let start = GridPosition::from_cell(CellCoord::new(0, 0));
        let target = GridPosition::from_cell(CellCoord::new(1, 0));

        let partway = start.move_toward(target, 0.25);
        assert!((partway.x() - 0.25).abs() < f32::EPSILON);
        assert!((partway.y()).abs() < f32::EPSILON);

        let arrived = partway.move_toward(target, 10.0);
        assert_eq!(arrived, target);
    }

    #[test]
    fn move_toward_never_overshoots() {
        let start = GridPosition::new(0.0, 0.0);
        let target = GridPosition::new(0.0, 1.0);
        let moved = start.move_toward(target, 5.0);
        assert_eq!(moved, target);
    }

    #[test]
    fn walled_layout_splits_ring_and_interior() {
        let layout = BoardLayout::walled(5, 5);
        assert_eq!(layout.border().len(), 16);
        assert_eq!(layout.land().len(), 9);
        assert!(layout.obstacles().is_empty());
        assert!(layout.border().contains(&CellCoord::new(0, 4)));
        assert!(layout.land().contains(&CellCoord::new(2, 2)));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(7, 11));
    }

    #[test]
    fn cell_class_round_trips_through_bincode() {
        assert_round_trip(&CellClass::Cleared);
    }

    #[test]
    fn board_layout_round_trips_through_bincode() {
        assert_round_trip(&BoardLayout::walled(6, 4));
    }

    #[test]
    fn stats_report_round_trips_through_bincode() {
        let report = StatsReport {
            initial_land: 9,
            cleared: 4,
            land_remaining: 5,
            loops_closed: 1,
        };
        assert_round_trip(&report);
    }
}
