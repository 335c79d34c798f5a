//! CSV trace loader.
//!
//! # Trace format
//!
//! One sample per line, split on plain commas with no quote handling; `#`
//! lines and blank lines are skipped.  Only the four configured columns are
//! read, so extra columns are ignored:
//!
//! ```csv
//! # id,time,x,y
//! A,0,0,0
//! A,10,10,0
//! B,0,5,5
//! ```
//!
//! # Pipeline
//!
//! 1. Parse every record into a [`Sample`], keeping the raw field text.
//! 2. Sort by time (ties broken by the raw fields), then drop adjacent
//!    duplicates.  The result is independent of input line order.
//! 3. The first sample is the earliest; resolve the global start point.
//! 4. Stable sort by entity id, so each entity's samples stay time-ordered.
//! 5. Walk each id group and compute time deltas, rejecting an entity that
//!    is at two places at the same instant.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use em_core::{Coord, TimeFormat, Timestamp, TraceColumns, TraceConfig};

use crate::canonical::{CanonicalTrace, EntityTrace};
use crate::{TraceError, TraceResult};

// ── Sample ────────────────────────────────────────────────────────────────────

/// One parsed trace line.  Raw field text is kept for deduplication and for
/// error messages.
#[derive(Clone, Debug)]
struct Sample {
    id:       String,
    time_raw: String,
    x_raw:    String,
    y_raw:    String,
    time:     Timestamp,
    loc:      Coord,
}

impl Sample {
    fn raw_key(&self) -> (&str, &str, &str, &str) {
        (&self.id, &self.time_raw, &self.x_raw, &self.y_raw)
    }
}

// ── TraceIngestor ─────────────────────────────────────────────────────────────

/// Turns a raw trace into a [`CanonicalTrace`].
///
/// # Example
///
/// ```
/// use em_core::{TimeFormat, TraceColumns};
/// use em_trace::TraceIngestor;
///
/// let text = "A,0,0,0\nA,10,10,0\nB,0,5,5\n";
/// let trace = TraceIngestor::new(TraceColumns::default(), TimeFormat::Seconds)
///     .ingest(text.as_bytes())
///     .unwrap();
/// assert_eq!(trace.entity_count(), 2);
/// assert_eq!(trace.get("A").unwrap().deltas, vec![0.0, 10.0]);
/// ```
#[derive(Clone, Debug)]
pub struct TraceIngestor {
    columns:     TraceColumns,
    time_format: TimeFormat,
    start_point: Option<String>,
}

impl TraceIngestor {
    pub fn new(columns: TraceColumns, time_format: TimeFormat) -> Self {
        Self { columns, time_format, start_point: None }
    }

    /// Explicit simulation time zero, written in the trace's time format.
    pub fn start_point(mut self, start: Option<String>) -> Self {
        self.start_point = start;
        self
    }

    pub fn from_config(cfg: &TraceConfig) -> Self {
        Self::new(cfg.columns, cfg.time_format).start_point(cfg.start_point.clone())
    }

    /// Ingest the trace file named by `cfg.path`.
    pub fn load(cfg: &TraceConfig) -> TraceResult<CanonicalTrace> {
        Self::from_config(cfg).ingest_path(&cfg.path)
    }

    pub fn ingest_path(&self, path: &Path) -> TraceResult<CanonicalTrace> {
        let file = std::fs::File::open(path)?;
        self.ingest(file)
    }

    /// Like [`ingest_path`](Self::ingest_path) but accepts any `Read` source.
    pub fn ingest<R: Read>(&self, reader: R) -> TraceResult<CanonicalTrace> {
        self.columns.validate()?;

        let mut samples = self.read_samples(reader)?;
        let read = samples.len();

        // ── Time sort + dedup ─────────────────────────────────────────────
        samples.sort_by(|a, b| a.time.total_cmp(&b.time).then_with(|| a.raw_key().cmp(&b.raw_key())));
        samples.dedup_by(|a, b| a.raw_key() == b.raw_key());
        let duplicates = read - samples.len();

        let Some(earliest) = samples.first() else {
            return Err(TraceError::Empty);
        };
        let (start, start_raw) = self.resolve_start(earliest)?;

        // ── Id sort (stable: keeps time order inside each entity) ─────────
        samples.sort_by(|a, b| a.id.cmp(&b.id));

        let entities = samples
            .chunk_by(|a, b| a.id == b.id)
            .map(|group| entity_series(group, start))
            .collect::<TraceResult<Vec<_>>>()?;

        let trace = CanonicalTrace::new(start, start_raw, self.time_format, entities);
        tracing::info!(
            records    = read,
            duplicates,
            entities   = trace.entity_count(),
            samples    = trace.sample_count(),
            start      = %trace.start_raw,
            format     = %self.time_format,
            "trace ingested"
        );
        Ok(trace)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn read_samples<R: Read>(&self, reader: R) -> TraceResult<Vec<Sample>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .quoting(false)
            .trim(Trim::All)
            .from_reader(reader);

        let min_fields = self.columns.min_fields();
        let mut samples = Vec::new();
        let mut record = StringRecord::new();

        while rdr.read_record(&mut record).map_err(read_error)? {
            // Blank line: a single empty field after trimming.
            if record.len() == 1 && record.get(0) == Some("") {
                continue;
            }
            let line = record.position().map_or(0, |p| p.line());
            if record.len() < min_fields {
                return Err(TraceError::Malformed {
                    line,
                    reason: format!("expected at least {min_fields} fields, found {}", record.len()),
                });
            }
            samples.push(self.parse_sample(&record, line)?);
        }
        Ok(samples)
    }

    fn parse_sample(&self, record: &StringRecord, line: u64) -> TraceResult<Sample> {
        let field = |col: usize| record.get(col).unwrap_or_default();
        let (id, time_raw) = (field(self.columns.id), field(self.columns.time));
        let (x_raw, y_raw) = (field(self.columns.x), field(self.columns.y));

        let time = self.time_format.parse(time_raw).ok_or_else(|| TraceError::Malformed {
            line,
            reason: format!("time {time_raw:?} is not in {} format", self.time_format),
        })?;
        let coord = |raw: &str, axis: &str| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| TraceError::Malformed {
                    line,
                    reason: format!("{axis} coordinate {raw:?} is not a number"),
                })
        };
        let loc = Coord::new(coord(x_raw, "x")?, coord(y_raw, "y")?);

        Ok(Sample {
            id:       id.to_owned(),
            time_raw: time_raw.to_owned(),
            x_raw:    x_raw.to_owned(),
            y_raw:    y_raw.to_owned(),
            time,
            loc,
        })
    }

    /// Global start point: the configured one if present, else the earliest
    /// sample.  A configured start later than the earliest sample is rejected.
    fn resolve_start(&self, earliest: &Sample) -> TraceResult<(Timestamp, String)> {
        let Some(raw) = self.start_point.as_deref() else {
            return Ok((earliest.time, earliest.time_raw.clone()));
        };
        let start = self.time_format.parse(raw).ok_or_else(|| {
            TraceError::Config(format!(
                "start point {raw:?} is not in {} format",
                self.time_format
            ))
        })?;
        if start > earliest.time {
            return Err(TraceError::StartAfterEarliest {
                start:    raw.trim().to_owned(),
                earliest: earliest.time_raw.clone(),
            });
        }
        Ok((start, raw.trim().to_owned()))
    }
}

/// Undecodable content is a bad line; only a failing reader stays an I/O error.
fn read_error(err: csv::Error) -> TraceError {
    let line   = err.position().map_or(0, |p| p.line());
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => TraceError::Io(io),
        _ => TraceError::Malformed { line, reason },
    }
}

/// Locations and deltas for one entity's time-ordered samples.
fn entity_series(group: &[Sample], start: Timestamp) -> TraceResult<EntityTrace> {
    let mut locations = Vec::with_capacity(group.len());
    let mut deltas    = Vec::with_capacity(group.len());
    let mut prev: Option<&Sample> = None;

    for s in group {
        let delta = match prev {
            None => s.time.since(start),
            Some(p) => {
                let d = s.time.since(p.time);
                if d == 0.0 && s.loc != p.loc {
                    return Err(TraceError::TwoPlacesAtOnce {
                        entity: s.id.clone(),
                        time:   s.time_raw.clone(),
                        first:  p.loc,
                        second: s.loc,
                    });
                }
                d
            }
        };
        locations.push(s.loc);
        deltas.push(delta);
        prev = Some(s);
    }

    Ok(EntityTrace { entity_id: group[0].id.clone(), locations, deltas })
}
