use super::{min_and_max, month_start, Result, SeriesError, MONTHS_PER_YEAR, VERSION};
use chrono::prelude::*;
use clap::{App, Arg};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub const SVG_WIDTH: u32 = 1600;
pub const SVG_PANEL_HEIGHT: u32 = 360;
pub const YEAR_FMT: &str = "%Y";

const SECONDS_PER_DAY: i64 = 86_400;
const LINE_COLORS: [RGBColor; 2] = [RGBColor(30, 30, 30), RGBColor(200, 40, 40)];

/// Takes the CLI arguments that control the plotting of a json series.
pub fn parse_cli() -> (PathBuf, PathBuf) {
    let arg_jsonin = Arg::with_name("input_jsonfile")
        .help("json document: a decomposition (times, series, trend, seasonal, remainder) or a converted series (ts, ys)")
        .index(1)
        .required(true);
    let cli_args = App::new("stl_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot a decomposed time series to svg")
        .arg(arg_jsonin)
        .get_matches();
    let jsonin = PathBuf::from(cli_args.value_of("input_jsonfile").unwrap_or_default());
    let mut svgout = jsonin.clone();
    svgout.set_extension("svg");
    (jsonin, svgout)
}

/// The shared x axis: epoch-second range plus the year (major)
/// and month (minor) tick positions inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub start: i64,
    pub end: i64,
    pub years: Vec<i64>,
    pub months: Vec<i64>,
}

impl TimeAxis {
    pub fn new(times: &[i64]) -> Result<TimeAxis> {
        TimeAxis::with_tz(times, &Local)
    }

    pub fn with_tz<Tz: TimeZone>(times: &[i64], tz: &Tz) -> Result<TimeAxis> {
        let (tmin, tmax) = min_and_max(times).ok_or(SeriesError::EmptySeries)?;
        let out_of_range = || SeriesError::Plot(format!("timestamps {}..{} out of range", tmin, tmax));
        let span = tmax.checked_sub(tmin).ok_or_else(out_of_range)?;
        let margin = (span / 20).max(SECONDS_PER_DAY);
        let start = tmin.checked_sub(margin).ok_or_else(out_of_range)?;
        let end = tmax.checked_add(margin).ok_or_else(out_of_range)?;
        let first = tz
            .timestamp_opt(start, 0)
            .single()
            .ok_or_else(out_of_range)?;
        tz.timestamp_opt(end, 0).single().ok_or_else(out_of_range)?;
        let (mut year, mut month) = (first.year(), first.month());
        let mut years: Vec<i64> = Vec::new();
        let mut months: Vec<i64> = Vec::new();
        loop {
            match month_start(tz, year, month) {
                Ok(t) => {
                    let t = t.timestamp();
                    if t > end {
                        break;
                    }
                    if t >= start {
                        if month == 1 {
                            years.push(t);
                        } else {
                            months.push(t);
                        }
                    }
                }
                // local midnight in a DST gap, no tick for that month
                Err(SeriesError::NonexistentLocalTime { .. }) => {}
                Err(e) => return Err(e),
            }
            month += 1;
            if month > MONTHS_PER_YEAR {
                month = 1;
                year += 1;
            }
        }
        Ok(TimeAxis {
            start,
            end,
            years,
            months,
        })
    }
}

/// One chart row: a y label and the lines drawn against the shared times.
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    pub label: &'a str,
    pub lines: Vec<&'a [f64]>,
}

/// y range over all the lines with a tenth of the span as margin
pub fn value_range(lines: &[&[f64]]) -> Result<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for line in lines {
        if let Some((lo, hi)) = min_and_max(line) {
            bounds = match bounds {
                Some((min, max)) => Some((min.min(lo), max.max(hi))),
                None => Some((lo, hi)),
            };
        }
    }
    let (ymin, ymax) = bounds.ok_or(SeriesError::EmptySeries)?;
    let span = ymax - ymin;
    let margin = if span > 0. { span / 10f64 } else { 1. };
    Ok((ymin - margin, ymax + margin))
}

fn year_label<Tz: TimeZone>(tz: &Tz, t: i64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_opt(t, 0).single() {
        Some(dt) => dt.format(YEAR_FMT).to_string(),
        None => String::new(),
    }
}

/// Plots the panels stacked vertically to svg, all sharing the time axis.
/// Year labels are written in `tz`, which should be the zone the axis was built in.
pub fn plot_panels<Tz: TimeZone>(
    fout: &Path,
    axis: &TimeAxis,
    tz: &Tz,
    times: &[i64],
    panels: &[Panel],
) -> Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    draw_panels(fout, axis, tz, times, panels).map_err(|e| SeriesError::Plot(e.to_string()))
}

fn draw_panels<Tz: TimeZone>(
    fout: &Path,
    axis: &TimeAxis,
    tz: &Tz,
    times: &[i64],
    panels: &[Panel],
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    Tz::Offset: std::fmt::Display,
{
    let height = SVG_PANEL_HEIGHT * panels.len().max(1) as u32;
    let root = SVGBackend::new(fout, (SVG_WIDTH, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((panels.len(), 1));
    for (area, panel) in areas.iter().zip(panels.iter()) {
        let (ymin, ymax) = value_range(&panel.lines)?;
        let xrange = (axis.start..axis.end)
            .with_key_points(axis.years.clone())
            .with_light_points(axis.months.clone());
        let mut chart = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(100)
            .build_cartesian_2d(xrange, ymin..ymax)?;
        chart
            .configure_mesh()
            .light_line_style(&RGBColor(225, 225, 225))
            .bold_line_style(RGBColor(150, 150, 150).stroke_width(2))
            .set_all_tick_mark_size(2)
            .label_style(("sans-serif", 20))
            .y_desc(panel.label)
            .x_label_formatter(&|x: &i64| year_label(tz, *x))
            .y_label_formatter(&|y: &f64| format!("{:.2}", y))
            .draw()?;
        for (line, color) in panel.lines.iter().zip(LINE_COLORS.iter().cycle()) {
            let points = times.iter().zip(line.iter()).map(|(t, y)| (*t, *y));
            chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
        }
    }
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(year: i32, month: u32) -> i64 {
        month_start(&Utc, year, month).unwrap().timestamp()
    }

    #[test]
    fn axis_ticks_cover_the_range() {
        let times = vec![utc(2000, 1), utc(2000, 6), utc(2002, 12)];
        let axis = TimeAxis::with_tz(&times, &Utc).unwrap();
        assert!(axis.start < times[0]);
        assert!(axis.end > times[2]);
        // the twentieth-of-span margin reaches past the next new year
        assert_eq!(
            axis.years,
            vec![utc(2000, 1), utc(2001, 1), utc(2002, 1), utc(2003, 1)]
        );
        assert!(axis.months.contains(&utc(2000, 2)));
        assert!(axis.months.contains(&utc(2002, 12)));
        assert!(!axis.months.contains(&utc(2001, 1)));
        for t in axis.years.iter().chain(axis.months.iter()) {
            assert!(*t >= axis.start && *t <= axis.end);
            assert_eq!(Utc.timestamp_opt(*t, 0).unwrap().day(), 1);
        }
        for t in axis.years.iter() {
            assert_eq!(Utc.timestamp_opt(*t, 0).unwrap().month(), 1);
        }
    }

    #[test]
    fn single_sample_gets_a_day_of_margin() {
        let t = utc(2010, 3);
        let axis = TimeAxis::with_tz(&[t], &Utc).unwrap();
        assert_eq!(axis.start, t - SECONDS_PER_DAY);
        assert_eq!(axis.end, t + SECONDS_PER_DAY);
        assert_eq!(axis.months, vec![t]);
        assert!(axis.years.is_empty());
    }

    #[test]
    fn axis_past_the_calendar_is_rejected() {
        match TimeAxis::with_tz(&[0, 10_000_000_000_000], &Utc) {
            Err(SeriesError::Plot(msg)) => assert!(msg.contains("out of range")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        assert!(matches!(
            TimeAxis::with_tz(&[i64::MIN, i64::MAX], &Utc),
            Err(SeriesError::Plot(_))
        ));
        assert!(matches!(
            TimeAxis::with_tz(&[i64::MAX], &Utc),
            Err(SeriesError::Plot(_))
        ));
    }

    #[test]
    fn renders_utc_panels_to_svg() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("panels.svg");
        let times = vec![utc(2000, 1), utc(2000, 2), utc(2001, 7)];
        let a = [1.0, 2.0, 0.5];
        let b = [1.5, 1.5, 1.5];
        let axis = TimeAxis::with_tz(&times, &Utc).unwrap();
        let panels = [Panel {
            label: "both",
            lines: vec![&a[..], &b[..]],
        }];
        plot_panels(&fout, &axis, &Utc, &times, &panels).unwrap();
        let svg = std::fs::read_to_string(&fout).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("2001"));
    }

    #[test]
    fn empty_axis_is_rejected() {
        assert!(matches!(
            TimeAxis::with_tz(&[], &Utc),
            Err(SeriesError::EmptySeries)
        ));
    }

    #[test]
    fn value_range_spans_all_lines() {
        let a = [0.0, 10.0];
        let b = [-10.0, 5.0];
        assert_eq!(value_range(&[&a[..], &b[..]]).unwrap(), (-12.0, 12.0));
    }

    #[test]
    fn flat_line_gets_unit_margin() {
        let a = [3.0, 3.0];
        assert_eq!(value_range(&[&a[..]]).unwrap(), (2.0, 4.0));
    }

    #[test]
    fn year_labels() {
        assert_eq!(year_label(&Utc, utc(1999, 1)), "1999");
    }
}
