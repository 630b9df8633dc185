use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;
pub mod convert;
pub mod decomposition;
pub mod error;
pub mod plot;

pub use error::{Result, SeriesError};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const MONTHS_PER_YEAR: u32 = 12;

/// Sets up the stderr log subscriber, `warn` unless `RUST_LOG` says otherwise.
/// Stdout is left alone, it carries the JSON document.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// The first instant of the given calendar month in `tz`,
/// built from the integer fields, never from a formatted string.
/// An ambiguous local midnight resolves to the earliest instant.
pub fn month_start<Tz: TimeZone>(tz: &Tz, year: i32, month: u32) -> Result<DateTime<Tz>> {
    if month == 0 || month > MONTHS_PER_YEAR {
        return Err(SeriesError::InvalidMonth { year, month });
    }
    let naive = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(SeriesError::InvalidMonth { year, month })?;
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or(SeriesError::NonexistentLocalTime { year, month })
}

/// Splits one input row into its year and monthly values.
/// `line_number` is 1-based and only used for error reporting.
pub fn parse_row(line: &str, line_number: usize) -> Result<(i32, Vec<f64>)> {
    let mut tokens = line.split_whitespace();
    let year_token = tokens
        .next()
        .ok_or(SeriesError::MissingYear { line: line_number })?;
    let year: i32 = year_token.parse().map_err(|_| SeriesError::InvalidYear {
        line: line_number,
        token: year_token.to_string(),
    })?;
    let mut values: Vec<f64> = Vec::with_capacity(MONTHS_PER_YEAR as usize);
    for (month, token) in (1..).zip(tokens) {
        if month > MONTHS_PER_YEAR {
            return Err(SeriesError::InvalidMonth { year, month });
        }
        // JSON has no representation for NaN or infinities
        let value: f64 = match token.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(SeriesError::InvalidValue {
                    line: line_number,
                    month,
                    token: token.to_string(),
                })
            }
        };
        values.push(value);
    }
    Ok((year, values))
}

/// The normalized monthly series: epoch-second timestamps of the month starts
/// and their values, index i of one belonging to index i of the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    #[serde(rename = "ts")]
    pub time: Vec<i64>,
    #[serde(rename = "ys")]
    pub value: Vec<f64>,
}

impl MonthlySeries {
    pub fn new(capacity: usize) -> MonthlySeries {
        MonthlySeries {
            time: Vec::with_capacity(capacity),
            value: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// appends one sample per value, months counted from January
    pub fn push_row<Tz: TimeZone>(&mut self, tz: &Tz, year: i32, values: &[f64]) -> Result<()> {
        for (month, &v) in (1..).zip(values.iter()) {
            let start = month_start(tz, year, month)?;
            self.time.push(start.timestamp());
            self.value.push(v);
        }
        Ok(())
    }

    /// Reads the whole table with month starts in local time.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<MonthlySeries> {
        MonthlySeries::from_reader_tz(reader, &Local)
    }

    /// Reads the whole table, one year per line, with month starts in `tz`.
    /// The first malformed line aborts the read, no partial series is returned.
    pub fn from_reader_tz<R: BufRead, Tz: TimeZone>(reader: R, tz: &Tz) -> Result<MonthlySeries> {
        let mut series = MonthlySeries::new(120);
        for (i, l) in reader.lines().enumerate() {
            let l = l?;
            let (year, values) = parse_row(&l, i + 1)?;
            debug!(line = i + 1, year, months = values.len(), "parsed row");
            series.push_row(tz, year, &values)?;
        }
        Ok(series)
    }

    /// a document read back from JSON must still pair every timestamp with a value
    pub fn validate(&self) -> Result<()> {
        if self.time.is_empty() {
            return Err(SeriesError::EmptySeries);
        }
        if self.value.len() != self.time.len() {
            return Err(SeriesError::LengthMismatch {
                field: "ys",
                expected: self.time.len(),
                found: self.value.len(),
            });
        }
        Ok(())
    }

    /// writes `{"ts":[...],"ys":[...]}` on a single line
    pub fn to_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// plots the series as a single panel to svg
    pub fn plot_svg(&self, fout: &Path) -> Result<()> {
        let axis = plot::TimeAxis::new(&self.time)?;
        let panels = [plot::Panel {
            label: "value",
            lines: vec![&self.value[..]],
        }];
        plot::plot_panels(fout, &axis, &Local, &self.time, &panels)
    }
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}
