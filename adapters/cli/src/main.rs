#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Fenceline experience.
//!
//! The host drives the world with a scripted per-tick input sequence, pumps
//! the capture and analytics systems until each tick's command queue drains,
//! prints one line per diagnostic event, and renders the final board as
//! ASCII.

mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fenceline_core::{BoardLayout, CellClass, CellCoord, Command, Direction, Event};
use fenceline_system_analytics::Analytics;
use fenceline_system_capture::Capture;
use fenceline_world::{self as world, query, World};

use crate::scenario::Scenario;

/// Command-line arguments accepted by the Fenceline host.
#[derive(Debug, Parser)]
#[command(name = "fenceline", about = "Scripted territory-capture simulation")]
struct Args {
    /// Path to a TOML scenario file; the built-in demonstration runs
    /// otherwise.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Entry point for the Fenceline command-line host.
fn main() -> Result<()> {
    let args = Args::parse();
    let scenario = match &args.config {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario from {}", path.display()))?,
        None => Scenario::demonstration(),
    };
    run(&scenario)
}

fn run(scenario: &Scenario) -> Result<()> {
    let inputs = scenario.inputs().context("decoding move script")?;

    let mut world = World::new();
    let mut capture = Capture::new();
    let mut analytics = Analytics::new();

    println!("{}", query::welcome_banner(&world));

    dispatch(
        &mut world,
        &mut capture,
        &mut analytics,
        Command::ConfigureBoard {
            layout: BoardLayout::walled(scenario.columns(), scenario.rows()),
        },
    );
    dispatch(
        &mut world,
        &mut capture,
        &mut analytics,
        Command::ConfigureMoveSpeed {
            cells_per_second: scenario.move_speed(),
        },
    );
    dispatch(
        &mut world,
        &mut capture,
        &mut analytics,
        Command::PlaceAgent {
            cell: scenario.start(),
        },
    );

    for input in inputs {
        dispatch(
            &mut world,
            &mut capture,
            &mut analytics,
            Command::SetHeading { input },
        );
        dispatch(
            &mut world,
            &mut capture,
            &mut analytics,
            Command::Tick {
                dt: scenario.tick(),
            },
        );
    }

    render_board(&world);
    Ok(())
}

/// Applies one command and pumps the systems until no commands remain, so
/// every enclosure commits within the tick that produced it.
fn dispatch(world: &mut World, capture: &mut Capture, analytics: &mut Analytics, command: Command) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    while !events.is_empty() {
        for event in &events {
            if let Some(line) = describe(event) {
                println!("{line}");
            }
        }

        let mut commands = Vec::new();
        capture.handle(&events, query::class_view(world), &mut commands);

        let mut follow_up = Vec::new();
        analytics.handle(&events, query::class_view(world), &mut follow_up);

        for command in commands {
            world::apply(world, command, &mut follow_up);
        }
        events = follow_up;
    }
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::BoardConfigured {
            columns,
            rows,
            land_cells,
        } => Some(format!(
            "board configured: {columns}x{rows} with {land_cells} land tiles"
        )),
        Event::AgentPlaced { cell } => Some(format!("agent placed at {}", cell_label(*cell))),
        Event::AgentPlacementRejected { cell } => {
            Some(format!("agent placement rejected at {}", cell_label(*cell)))
        }
        Event::LandEntered { cell } => Some(format!(
            "agent stepped onto open land at {}",
            cell_label(*cell)
        )),
        Event::TrailCarved { cell } => Some(format!("trail carved at {}", cell_label(*cell))),
        Event::StepBlocked { from, direction } => Some(format!(
            "step {} from {} blocked",
            direction_label(*direction),
            cell_label(*from)
        )),
        Event::LoopClosed { captured } if captured.is_empty() => {
            Some("loop completed: no enclosed area detected".to_owned())
        }
        Event::LoopClosed { captured } => {
            Some(format!("loop completed: captured {} tiles", captured.len()))
        }
        Event::StatsUpdated { report } => Some(format!(
            "territory: {} of {} tiles cleared, {} loops closed",
            report.cleared, report.initial_land, report.loops_closed
        )),
        Event::TimeAdvanced { .. } | Event::CellOccupied { .. } => None,
    }
}

fn render_board(world: &World) {
    let view = query::class_view(world);
    let (columns, rows) = view.dimensions();
    let agent_cell = query::agent_view(world).map(|agent| agent.cell);

    println!();
    for row in 0..rows {
        let mut line = String::with_capacity(usize::try_from(columns).unwrap_or(0));
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let glyph = if agent_cell == Some(cell) {
                '@'
            } else {
                match view.class_of(cell) {
                    Some(CellClass::Border) => '#',
                    Some(CellClass::Land) => '.',
                    Some(CellClass::Cleared) => 'o',
                    None => ' ',
                }
            };
            line.push(glyph);
        }
        println!("{line}");
    }
}

fn cell_label(cell: CellCoord) -> String {
    format!("({}, {})", cell.column(), cell.row())
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::North => "north",
        Direction::East => "east",
        Direction::South => "south",
        Direction::West => "west",
    }
}
