use anyhow::{Context, Result};
use stl_series::decomposition::PlotDocument;
use stl_series::init_tracing;
use stl_series::plot::parse_cli;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();
    let (jsonin, svgout) = parse_cli();
    info!(
        "read data from {} and plot to {}",
        jsonin.display(),
        svgout.display()
    );
    let document = PlotDocument::from_json_file(&jsonin)?;
    info!(samples = document.len(), "loaded document");
    document
        .plot_svg(&svgout)
        .with_context(|| format!("could not plot {}", svgout.display()))?;
    Ok(())
}
