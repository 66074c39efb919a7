//! Scenario files that script the command-line host.

use std::{fs, path::Path, time::Duration};

use fenceline_core::{CellCoord, RawInput};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_MOVE_SPEED: f32 = 10.0;
const DEFAULT_TICK_MS: u64 = 100;

/// Errors raised while loading or validating a scenario file.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    /// The scenario file could not be read from disk.
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),
    /// The scenario file is not valid TOML for the expected schema.
    #[error("failed to parse scenario file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The move script contains a character outside `U`, `D`, `L`, `R`, `.`.
    #[error("unsupported move character {found:?} at position {index}")]
    InvalidMove {
        /// Zero-based position of the offending character.
        index: usize,
        /// The character that could not be interpreted.
        found: char,
    },
}

/// Declarative description of one host run: a walled board, the agent start
/// cell, and a per-tick input script.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    columns: u32,
    rows: u32,
    #[serde(default = "default_move_speed")]
    move_speed: f32,
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,
    start: CellCoord,
    moves: String,
}

impl Scenario {
    /// Loads and validates a scenario from the provided TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        let scenario: Self = toml::from_str(&text)?;
        let _ = scenario.inputs()?;
        Ok(scenario)
    }

    /// Built-in demonstration: carve a loop on a 12x8 walled board and let
    /// the enclosure fill sweep the field.
    pub(crate) fn demonstration() -> Self {
        Self {
            columns: 12,
            rows: 8,
            move_speed: DEFAULT_MOVE_SPEED,
            tick_ms: DEFAULT_TICK_MS,
            start: CellCoord::new(0, 3),
            moves: "RRRUULLDL..".to_owned(),
        }
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) const fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub(crate) const fn start(&self) -> CellCoord {
        self.start
    }

    /// Simulated time covered by one tick of the script.
    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Decodes the move script into one input sample per tick. `.` is a tick
    /// without input, which keeps the previously held heading. Whitespace is
    /// ignored so scripts can be grouped for readability.
    pub(crate) fn inputs(&self) -> Result<Vec<RawInput>, ScenarioError> {
        let mut samples = Vec::new();
        for (index, found) in self.moves.chars().enumerate() {
            let sample = match found {
                'R' => RawInput::new(1, 0),
                'L' => RawInput::new(-1, 0),
                'U' => RawInput::new(0, 1),
                'D' => RawInput::new(0, -1),
                '.' => RawInput::new(0, 0),
                c if c.is_whitespace() => continue,
                _ => return Err(ScenarioError::InvalidMove { index, found }),
            };
            samples.push(sample);
        }
        Ok(samples)
    }
}

fn default_move_speed() -> f32 {
    DEFAULT_MOVE_SPEED
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}
