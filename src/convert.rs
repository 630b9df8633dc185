use super::{MonthlySeries, Result, VERSION};
use clap::{App, Arg};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Takes the optional input file; stdin is read when it is missing.
pub fn parse_cli() -> Option<PathBuf> {
    let arg_input = Arg::with_name("input_file")
        .help("table of monthly values, one year per line: YEAR JAN FEB ... (stdin if omitted)")
        .index(1);
    let cli_args = App::new("stl_convert")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to convert a yearly table of monthly values to a {\"ts\", \"ys\"} json series")
        .arg(arg_input)
        .get_matches();
    cli_args.value_of("input_file").map(PathBuf::from)
}

/// Normalizes the whole input before writing anything,
/// so a malformed row leaves `output` untouched.
/// Returns the number of samples written.
pub fn run<R: BufRead, W: Write>(input: R, output: W) -> Result<usize> {
    let series = MonthlySeries::from_reader(input)?;
    series.to_json(output)?;
    Ok(series.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeriesError;
    use std::io::Cursor;

    #[test]
    fn empty_input_is_an_empty_series() {
        let mut out: Vec<u8> = Vec::new();
        let n = run(Cursor::new(""), &mut out).unwrap();
        assert_eq!(n, 0);
        assert_eq!(out, b"{\"ts\":[],\"ys\":[]}\n".to_vec());
    }

    #[test]
    fn bad_row_writes_nothing() {
        let mut out: Vec<u8> = Vec::new();
        let err = run(Cursor::new("2000 1.0 2.0\n2001 abc\n"), &mut out).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidValue { line: 2, .. }));
        assert!(out.is_empty());
    }
}
