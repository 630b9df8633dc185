use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader};
use stl_series::convert::{parse_cli, run};
use stl_series::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();
    let input = parse_cli();
    let stdout = io::stdout();
    let samples = match input {
        Some(fin) => {
            info!("read rows from {}", fin.display());
            let file = File::open(&fin).with_context(|| format!("could not open {}", fin.display()))?;
            run(BufReader::new(file), stdout.lock())
                .with_context(|| format!("could not convert {}", fin.display()))?
        }
        None => {
            info!("read rows from stdin");
            let stdin = io::stdin();
            run(stdin.lock(), stdout.lock()).context("could not convert stdin")?
        }
    };
    info!(samples, "wrote series to stdout");
    Ok(())
}
