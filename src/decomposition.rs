use super::plot::{plot_panels, Panel, TimeAxis};
use super::{MonthlySeries, Result, SeriesError};
use chrono::Local;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A seasonal-trend decomposition of a series, as produced by an external
/// decomposition step: every component shares the `times` axis (epoch seconds).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Decomposition {
    pub times: Vec<i64>,
    pub series: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub remainder: Vec<f64>,
}

impl Decomposition {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.times.is_empty() {
            return Err(SeriesError::EmptySeries);
        }
        let components: [(&'static str, &Vec<f64>); 4] = [
            ("series", &self.series),
            ("trend", &self.trend),
            ("seasonal", &self.seasonal),
            ("remainder", &self.remainder),
        ];
        for (field, values) in components.iter() {
            if values.len() != self.times.len() {
                return Err(SeriesError::LengthMismatch {
                    field: *field,
                    expected: self.times.len(),
                    found: values.len(),
                });
            }
        }
        Ok(())
    }

    /// Five stacked panels: each component, then series and trend together.
    pub fn plot_svg(&self, fout: &Path) -> Result<()> {
        let axis = TimeAxis::new(&self.times)?;
        let panels = [
            Panel {
                label: "series",
                lines: vec![&self.series[..]],
            },
            Panel {
                label: "trend",
                lines: vec![&self.trend[..]],
            },
            Panel {
                label: "seasonal",
                lines: vec![&self.seasonal[..]],
            },
            Panel {
                label: "remainder",
                lines: vec![&self.remainder[..]],
            },
            Panel {
                label: "series and trend",
                lines: vec![&self.series[..], &self.trend[..]],
            },
        ];
        plot_panels(fout, &axis, &Local, &self.times, &panels)
    }
}

/// Any JSON document the plotter accepts, told apart by its field names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlotDocument {
    Decomposition(Decomposition),
    Series(MonthlySeries),
}

impl PlotDocument {
    pub fn from_json_str(s: &str) -> Result<PlotDocument> {
        let document: PlotDocument = serde_json::from_str(s)?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_json_file(fin: &Path) -> Result<PlotDocument> {
        let content = fs::read_to_string(fin).map_err(|source| SeriesError::Io {
            path: fin.to_path_buf(),
            source,
        })?;
        PlotDocument::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            PlotDocument::Decomposition(d) => d.validate(),
            PlotDocument::Series(s) => s.validate(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PlotDocument::Decomposition(d) => d.len(),
            PlotDocument::Series(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn plot_svg(&self, fout: &Path) -> Result<()> {
        match self {
            PlotDocument::Decomposition(d) => d.plot_svg(fout),
            PlotDocument::Series(s) => s.plot_svg(fout),
        }
    }
}
