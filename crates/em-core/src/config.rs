//! Settings consumed by the ingestor, route builder, and movement scheduler.
//!
//! Typically loaded from a TOML file by the host application:
//!
//! ```toml
//! [trace]
//! path        = "traces/campus.csv"
//! time_format = "date"
//! start_point = "03/14/09 08:00"
//! columns     = { id = 0, time = 1, x = 2, y = 3 }
//!
//! [movement]
//! mode  = 1
//! speed = { min = 0.5, max = 1.5 }
//! seed  = 42
//!
//! [map]
//! mirror = true
//! offset = { x = 0.0, y = 0.0 }
//! ```
//!
//! Only `trace.path` is required; every other field has a default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Coord, CoreError, CoreResult, TimeFormat};

// ── TraceColumns ──────────────────────────────────────────────────────────────

/// Zero-based column positions of the four trace fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TraceColumns {
    pub id:   usize,
    pub time: usize,
    pub x:    usize,
    pub y:    usize,
}

impl Default for TraceColumns {
    fn default() -> Self {
        Self { id: 0, time: 1, x: 2, y: 3 }
    }
}

impl TraceColumns {
    /// Fail unless the four positions are pairwise distinct.
    pub fn validate(&self) -> CoreResult<()> {
        let cols = [self.id, self.time, self.x, self.y];
        for i in 0..cols.len() {
            for j in i + 1..cols.len() {
                if cols[i] == cols[j] {
                    return Err(CoreError::Config(format!(
                        "trace columns must be different for id, time, x, y (got {}, {}, {}, {})",
                        self.id, self.time, self.x, self.y
                    )));
                }
            }
        }
        Ok(())
    }

    /// Minimum number of fields a trace line must have.
    pub fn min_fields(&self) -> usize {
        self.id.max(self.time).max(self.x).max(self.y) + 1
    }
}

// ── MovementMode ──────────────────────────────────────────────────────────────

/// Timing policy of the movement scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum MovementMode {
    /// Tag `0`: speed = distance / available time; always on schedule.
    #[default]
    ScheduleSpeed,
    /// Tag `1`: externally sampled speed; slack becomes wait time.
    SampledSpeed,
}

impl TryFrom<u8> for MovementMode {
    type Error = CoreError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(MovementMode::ScheduleSpeed),
            1 => Ok(MovementMode::SampledSpeed),
            n => Err(CoreError::Config(format!("movement mode must be 0 or 1, got {n}"))),
        }
    }
}

// ── SpeedRange ────────────────────────────────────────────────────────────────

/// Uniform speed range in m/s.  `max` doubles as the entity's top speed.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self { min: 0.5, max: 1.5 }
    }
}

impl SpeedRange {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.min > self.max {
            return Err(CoreError::Config(format!(
                "speed range must satisfy 0 <= min <= max, got {}..{}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// Where the trace lives and how to read it.
#[derive(Clone, Debug, Deserialize)]
pub struct TraceConfig {
    pub path: PathBuf,

    #[serde(default)]
    pub columns: TraceColumns,

    #[serde(default)]
    pub time_format: TimeFormat,

    /// Simulation time zero, in `time_format`.  Defaults to the earliest
    /// sample; must not be later than it.
    #[serde(default)]
    pub start_point: Option<String>,
}

/// Movement-scheduler settings shared by every entity of a group.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub mode: MovementMode,
    pub speed: SpeedRange,
    /// Master seed for per-entity speed sampling.
    pub seed: u64,
    /// Coordinate snapping radius when resolving trace points to graph
    /// nodes.  `0.0` requires an exact match.
    pub snap_tolerance: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            mode:           MovementMode::default(),
            speed:          SpeedRange::default(),
            seed:           0,
            snap_tolerance: 0.0,
        }
    }
}

/// Geometry transform applied to trace coordinates before graph lookup.
#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub mirror: bool,
    pub offset: Coord,
}

/// Top-level settings document.
#[derive(Clone, Debug, Deserialize)]
pub struct ExternalMovementConfig {
    pub trace: TraceConfig,

    #[serde(default)]
    pub movement: MovementConfig,

    #[serde(default)]
    pub map: MapConfig,
}

impl ExternalMovementConfig {
    /// Parse and validate a TOML settings document.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let cfg: Self = toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a TOML settings file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Cross-field checks that serde cannot express.
    pub fn validate(&self) -> CoreResult<()> {
        self.trace.columns.validate()?;
        self.movement.speed.validate()?;
        let tol = self.movement.snap_tolerance;
        if tol.is_nan() || tol < 0.0 {
            return Err(CoreError::Config(format!(
                "snap_tolerance must be >= 0, got {}",
                self.movement.snap_tolerance
            )));
        }
        Ok(())
    }
}
