#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic territory analytics published as events.

use fenceline_core::{CellClass, Event, StatsReport};
use fenceline_world::query::ClassView;

/// Pure analytics system that recomputes territory statistics on demand.
///
/// Territory mutations mark the report dirty; the next observed tick
/// triggers at most one recompute from the class view, keeping the work off
/// the mutation path and bounded to one scan per tick.
#[derive(Debug, Default)]
pub struct Analytics {
    last_report: Option<StatsReport>,
    loops_closed: u32,
    dirty: bool,
}

impl Analytics {
    /// Creates a new analytics system with no published report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last report published by the system, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&StatsReport> {
        self.last_report.as_ref()
    }

    /// Consumes world events and the class view to publish statistics.
    pub fn handle(&mut self, events: &[Event], classes: ClassView<'_>, out: &mut Vec<Event>) {
        let mut tick_observed = false;

        for event in events {
            match event {
                Event::BoardConfigured { .. } => {
                    self.last_report = None;
                    self.loops_closed = 0;
                    self.dirty = true;
                }
                Event::TrailCarved { .. } => self.dirty = true,
                Event::LoopClosed { .. } => {
                    self.loops_closed = self.loops_closed.saturating_add(1);
                    self.dirty = true;
                }
                Event::TimeAdvanced { .. } => tick_observed = true,
                _ => {}
            }
        }

        if !tick_observed || !self.dirty {
            return;
        }
        self.dirty = false;

        let report = compute_report(classes, self.loops_closed);
        self.last_report = Some(report);
        out.push(Event::StatsUpdated { report });
    }
}

/// Derives the report from the current class grid. Cleared cells only ever
/// originate from land, so the initial land footprint is the sum of both.
fn compute_report(classes: ClassView<'_>, loops_closed: u32) -> StatsReport {
    let mut land_remaining = 0;
    let mut cleared = 0;

    for slot in classes.iter() {
        match slot {
            Some(CellClass::Land) => land_remaining += 1,
            Some(CellClass::Cleared) => cleared += 1,
            Some(CellClass::Border) | None => {}
        }
    }

    StatsReport {
        initial_land: land_remaining + cleared,
        cleared,
        land_remaining,
        loops_closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenceline_core::{BoardLayout, CellCoord, Command};
    use fenceline_world::{self as world, query, World};
    use std::time::Duration;

    fn walled_world() -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureBoard {
                layout: BoardLayout::walled(5, 5),
            },
            &mut events,
        );
        (world, events)
    }

    fn tick_events() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(100),
        }]
    }

    #[test]
    fn report_waits_for_a_tick() {
        let (world, configure_events) = walled_world();
        let mut analytics = Analytics::new();
        let mut out = Vec::new();

        analytics.handle(&configure_events, query::class_view(&world), &mut out);
        assert!(out.is_empty());
        assert!(analytics.last_report().is_none());

        analytics.handle(&tick_events(), query::class_view(&world), &mut out);
        assert_eq!(
            out,
            vec![Event::StatsUpdated {
                report: StatsReport {
                    initial_land: 9,
                    cleared: 0,
                    land_remaining: 9,
                    loops_closed: 0,
                },
            }]
        );
    }

    #[test]
    fn recompute_runs_at_most_once_per_tick() {
        let (world, configure_events) = walled_world();
        let mut analytics = Analytics::new();
        let mut out = Vec::new();

        analytics.handle(&configure_events, query::class_view(&world), &mut out);
        analytics.handle(&tick_events(), query::class_view(&world), &mut out);
        analytics.handle(&tick_events(), query::class_view(&world), &mut out);

        assert_eq!(out.len(), 1, "clean ticks must not republish");
    }

    #[test]
    fn carved_and_captured_cells_update_the_report() {
        let (mut world, configure_events) = walled_world();
        let mut analytics = Analytics::new();
        let mut out = Vec::new();
        analytics.handle(&configure_events, query::class_view(&world), &mut out);

        let mut mutation_events = Vec::new();
        world::apply(
            &mut world,
            Command::CarveTrail {
                cell: CellCoord::new(1, 1),
            },
            &mut mutation_events,
        );
        world::apply(
            &mut world,
            Command::CaptureRegion {
                cells: vec![CellCoord::new(2, 1), CellCoord::new(2, 2)],
            },
            &mut mutation_events,
        );
        analytics.handle(&mutation_events, query::class_view(&world), &mut out);
        assert!(out.is_empty(), "mutations alone must not publish");

        analytics.handle(&tick_events(), query::class_view(&world), &mut out);
        assert_eq!(
            out,
            vec![Event::StatsUpdated {
                report: StatsReport {
                    initial_land: 9,
                    cleared: 3,
                    land_remaining: 6,
                    loops_closed: 1,
                },
            }]
        );
        assert_eq!(
            analytics.last_report(),
            Some(&StatsReport {
                initial_land: 9,
                cleared: 3,
                land_remaining: 6,
                loops_closed: 1,
            })
        );
    }

    #[test]
    fn board_reconfiguration_resets_the_loop_counter() {
        let (mut world, configure_events) = walled_world();
        let mut analytics = Analytics::new();
        let mut out = Vec::new();
        analytics.handle(&configure_events, query::class_view(&world), &mut out);

        let mut closure_events = Vec::new();
        world::apply(
            &mut world,
            Command::CaptureRegion { cells: Vec::new() },
            &mut closure_events,
        );
        analytics.handle(&closure_events, query::class_view(&world), &mut out);
        analytics.handle(&tick_events(), query::class_view(&world), &mut out);

        let mut reconfigure_events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureBoard {
                layout: BoardLayout::walled(5, 5),
            },
            &mut reconfigure_events,
        );
        out.clear();
        analytics.handle(&reconfigure_events, query::class_view(&world), &mut out);
        analytics.handle(&tick_events(), query::class_view(&world), &mut out);

        assert_eq!(
            out,
            vec![Event::StatsUpdated {
                report: StatsReport {
                    initial_land: 9,
                    cleared: 0,
                    land_remaining: 9,
                    loops_closed: 0,
                },
            }]
        );
    }
}
