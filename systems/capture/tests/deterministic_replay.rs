use std::time::Duration;

use fenceline_core::{BoardLayout, CellClass, CellCoord, Command, Event, RawInput};
use fenceline_system_capture::Capture;
use fenceline_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");

    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::LoopClosed { captured } if !captured.is_empty())),
        "scripted walk should close a capturing loop"
    );
    assert_eq!(first.cleared.len(), 9);
    assert!(first.cleared.contains(&CellCoord::new(2, 2)));
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut capture = Capture::new();
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        process_capture(&mut world, &mut capture, events, &mut log);
    }

    let view = query::class_view(&world);
    let (columns, rows) = view.dimensions();
    let mut cleared = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            if view.class_of(cell) == Some(CellClass::Cleared) {
                cleared.push(cell);
            }
        }
    }

    ReplayOutcome {
        cleared,
        events: log,
    }
}

fn process_capture(
    world: &mut World,
    capture: &mut Capture,
    pending_events: Vec<Event>,
    log: &mut Vec<Event>,
) {
    let mut events = pending_events;

    loop {
        if events.is_empty() {
            break;
        }

        log.extend(events.iter().cloned());
        let mut commands = Vec::new();
        capture.handle(&events, query::class_view(world), &mut commands);

        if commands.is_empty() {
            break;
        }

        events = Vec::new();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}

/// One tick per sample; at ten cells per second and 100 ms ticks every
/// transition completes on the tick after it starts, so the heading sampled
/// on an arrival tick steers the chained step out of the arriving cell.
fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::ConfigureBoard {
            layout: BoardLayout::walled(5, 5),
        },
        Command::ConfigureMoveSpeed {
            cells_per_second: 10.0,
        },
        Command::PlaceAgent {
            cell: CellCoord::new(0, 1),
        },
    ];

    let samples = [
        (1, 0),
        (1, 0),
        (1, 0),
        (0, -1),
        (0, -1),
        (-1, 0),
        (-1, 0),
        (0, 1),
        (-1, 0),
        (0, 0),
    ];
    for (horizontal, vertical) in samples {
        commands.push(Command::SetHeading {
            input: RawInput::new(horizontal, vertical),
        });
        commands.push(Command::Tick {
            dt: Duration::from_millis(100),
        });
    }

    commands
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReplayOutcome {
    cleared: Vec<CellCoord>,
    events: Vec<Event>,
}
