#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state and grid-aligned agent motion for Fenceline.
//!
//! The world owns the cell-class layers, the obstacle layer, and the agent's
//! continuous position. Adapters and systems mutate it exclusively through
//! [`apply`]; the world answers with [`Event`] values, and read access goes
//! through the [`query`] module.

mod classes;

use std::time::Duration;

use fenceline_core::{
    CellClass, CellCoord, Command, Direction, Event, GridPosition, WELCOME_BANNER,
};

use crate::classes::{ClassGrid, ObstacleGrid};

/// Interpolation speed applied until a host reconfigures it, in cells per
/// second.
const DEFAULT_MOVE_SPEED: f32 = 5.0;

/// Distance below which an interpolating agent snaps onto the target centre,
/// in grid units.
const ARRIVAL_EPSILON: f32 = 0.01;

/// Length of a single-cell step probe, in grid units.
const STEP_PROBE_DISTANCE: f32 = 1.0;

/// Represents the authoritative Fenceline world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    classes: ClassGrid,
    obstacles: ObstacleGrid,
    initial_land: Vec<CellCoord>,
    agent: Option<Agent>,
    move_speed: f32,
}

impl World {
    /// Creates an empty world awaiting a board configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            classes: ClassGrid::default(),
            obstacles: ObstacleGrid::default(),
            initial_land: Vec::new(),
            agent: None,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }

    fn advance_agent(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(mut agent) = self.agent.take() else {
            return;
        };

        if let Some(target) = agent.target {
            let max_delta = self.move_speed * dt.as_secs_f32();
            let centre = GridPosition::from_cell(target);
            agent.position = agent.position.move_toward(centre, max_delta);

            if agent.position.distance_to(centre) < ARRIVAL_EPSILON {
                agent.position = centre;
                agent.cell = target;
                agent.target = None;
                self.note_occupancy(&mut agent, out_events);

                if agent.heading.is_some() {
                    self.attempt_step(&mut agent, out_events);
                }
            }
        } else if agent.heading.is_some() {
            self.attempt_step(&mut agent, out_events);
        }

        self.agent = Some(agent);
    }

    /// Starts a transition toward the held heading, or clears the heading
    /// when the one-cell probe reports the way blocked. No redirect, no
    /// queued retry.
    fn attempt_step(&self, agent: &mut Agent, out_events: &mut Vec<Event>) {
        let Some(direction) = agent.heading else {
            return;
        };

        if self.segment_blocked(agent.position, direction, STEP_PROBE_DISTANCE) {
            agent.heading = None;
            out_events.push(Event::StepBlocked {
                from: agent.cell,
                direction,
            });
        } else {
            agent.target = agent.cell.step(direction);
        }
    }

    /// Records a completed step, emitting the occupancy notification and the
    /// land-entry diagnostic. Fires once per snap, never mid-interpolation.
    fn note_occupancy(&self, agent: &mut Agent, out_events: &mut Vec<Event>) {
        let cell = agent.cell;
        out_events.push(Event::CellOccupied { cell });

        match self.classes.class_of(cell) {
            Some(CellClass::Land) => {
                if !agent.on_land {
                    agent.on_land = true;
                    out_events.push(Event::LandEntered { cell });
                }
            }
            Some(CellClass::Border) | Some(CellClass::Cleared) => agent.on_land = false,
            None => {}
        }
    }

    fn segment_blocked(
        &self,
        origin: GridPosition,
        direction: Direction,
        max_distance: f32,
    ) -> bool {
        let Some(mut cell) = nearest_cell(origin) else {
            return true;
        };

        // The origin cell is already occupied; the first boundary crossing
        // sits half a grid unit from its centre.
        let mut travelled = 0.5_f32;
        while travelled < max_distance {
            let Some(next) = cell.step(direction) else {
                return true;
            };
            if self.cell_blocked(next) {
                return true;
            }
            cell = next;
            travelled += 1.0;
        }

        false
    }

    fn cell_blocked(&self, cell: CellCoord) -> bool {
        self.classes.class_of(cell).is_none() || self.obstacles.blocked(cell)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { layout } => {
            world.classes = ClassGrid::from_layout(&layout);
            world.obstacles = ObstacleGrid::from_layout(&layout);
            world.initial_land = world.classes.cells_of_class(CellClass::Land);
            world.agent = None;

            let (columns, rows) = world.classes.dimensions();
            out_events.push(Event::BoardConfigured {
                columns,
                rows,
                land_cells: world.initial_land.len(),
            });
        }
        Command::ConfigureMoveSpeed { cells_per_second } => {
            if cells_per_second > 0.0 {
                world.move_speed = cells_per_second;
            }
        }
        Command::PlaceAgent { cell } => {
            if world.cell_blocked(cell) {
                out_events.push(Event::AgentPlacementRejected { cell });
            } else {
                let mut agent = Agent::at(cell);
                out_events.push(Event::AgentPlaced { cell });
                world.note_occupancy(&mut agent, out_events);
                world.agent = Some(agent);
            }
        }
        Command::SetHeading { input } => {
            if let Some(agent) = world.agent.as_mut() {
                if let Some(direction) = input.dominant_axis() {
                    agent.heading = Some(direction);
                }
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_agent(dt, out_events);
        }
        Command::CarveTrail { cell } => {
            if world.classes.reclassify_land_to_cleared(cell) {
                out_events.push(Event::TrailCarved { cell });
            }
        }
        Command::CaptureRegion { cells } => {
            let mut captured = Vec::new();
            for cell in cells {
                if world.classes.reclassify_land_to_cleared(cell) {
                    captured.push(cell);
                }
            }
            out_events.push(Event::LoopClosed { captured });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use fenceline_core::{CellClass, CellCoord, Direction, GridPosition};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Dimensions of the configured board in cells.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.classes.dimensions()
    }

    /// Exposes a read-only view of the dense cell-class grid.
    #[must_use]
    pub fn class_view(world: &World) -> ClassView<'_> {
        let (columns, rows) = world.classes.dimensions();
        ClassView {
            cells: world.classes.cells(),
            columns,
            rows,
        }
    }

    /// Captures a read-only snapshot of the agent, if one is placed.
    #[must_use]
    pub fn agent_view(world: &World) -> Option<AgentSnapshot> {
        world.agent.as_ref().map(|agent| AgentSnapshot {
            cell: agent.cell,
            position: agent.position,
            target: agent.target,
            heading: agent.heading,
            moving: agent.target.is_some(),
        })
    }

    /// Land footprint recorded when the board was configured, in row-major
    /// order. Read-only reference data for diagnostics and baselines.
    #[must_use]
    pub fn initial_land(world: &World) -> &[CellCoord] {
        &world.initial_land
    }

    /// Reports whether any obstacle intersects the axis-aligned segment from
    /// `origin` toward `direction`, up to `max_distance` grid units. This is
    /// the probe the world consults before starting a step.
    #[must_use]
    pub fn segment_blocked(
        world: &World,
        origin: GridPosition,
        direction: Direction,
        max_distance: f32,
    ) -> bool {
        world.segment_blocked(origin, direction, max_distance)
    }

    /// Read-only view into the dense cell-class grid.
    #[derive(Clone, Copy, Debug)]
    pub struct ClassView<'a> {
        pub(super) cells: &'a [Option<CellClass>],
        pub(super) columns: u32,
        pub(super) rows: u32,
    }

    impl<'a> ClassView<'a> {
        /// Returns the class of the provided cell, or `None` for void cells
        /// and coordinates outside the board footprint.
        #[must_use]
        pub fn class_of(&self, cell: CellCoord) -> Option<CellClass> {
            self.index(cell)
                .and_then(|index| self.cells.get(index).copied().flatten())
        }

        /// Returns an iterator over all cell slots in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = Option<CellClass>> + 'a {
            self.cells.iter().copied()
        }

        /// Provides the dimensions of the underlying grid.
        #[must_use]
        pub const fn dimensions(&self) -> (u32, u32) {
            (self.columns, self.rows)
        }

        fn index(&self, cell: CellCoord) -> Option<usize> {
            if cell.column() < self.columns && cell.row() < self.rows {
                let row = usize::try_from(cell.row()).ok()?;
                let column = usize::try_from(cell.column()).ok()?;
                let width = usize::try_from(self.columns).ok()?;
                Some(row * width + column)
            } else {
                None
            }
        }
    }

    /// Immutable representation of the agent's motion state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct AgentSnapshot {
        /// Cell the agent last fully occupied.
        pub cell: CellCoord,
        /// Continuous position in grid units.
        pub position: GridPosition,
        /// Cell the agent is currently gliding toward, if any.
        pub target: Option<CellCoord>,
        /// Held movement direction, if any.
        pub heading: Option<Direction>,
        /// Indicates whether a transition is in progress.
        pub moving: bool,
    }
}

#[derive(Clone, Debug)]
struct Agent {
    cell: CellCoord,
    position: GridPosition,
    target: Option<CellCoord>,
    heading: Option<Direction>,
    on_land: bool,
}

impl Agent {
    fn at(cell: CellCoord) -> Self {
        Self {
            cell,
            position: GridPosition::from_cell(cell),
            target: None,
            heading: None,
            on_land: false,
        }
    }
}

fn nearest_cell(position: GridPosition) -> Option<CellCoord> {
    let column = position.x().round();
    let row = position.y().round();
    if column < 0.0 || row < 0.0 {
        return None;
    }
    Some(CellCoord::new(column as u32, row as u32))
}
