use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use em_fieldlines::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fieldlines", version, about = "Draw electrostatic field lines of 2D point charges")]
struct Cli {
    #[arg(long, help = "TOML scene file; flags below override its values")]
    config: Option<PathBuf>,
    #[arg(long, help = "Half-width of the sampled square")]
    gridsize: Option<Scalar>,
    #[arg(long, help = "Samples per axis (at least 2)")]
    subdivisions: Option<usize>,
    #[arg(short = 'k', long = "coulomb-constant", help = "Electrostatic constant k")]
    k: Option<Scalar>,
    #[arg(
        long = "charge",
        value_name = "X,Y,Q",
        allow_hyphen_values = true,
        help = "Point charge as x0,y0,q; repeat for several charges (replaces the scene's charges)"
    )]
    charges: Vec<PointCharge>,
    #[arg(long, value_enum, help = "Treatment of samples lying on a charge")]
    singularity: Option<Singularity>,
    #[arg(short, long, default_value = "fieldlines.svg", help = "Figure path (.svg or .png)")]
    output: PathBuf,
    #[arg(long, help = "Skip drawing the figure")]
    no_plot: bool,
    #[arg(long, help = "Also export the sampled field as CSV")]
    csv: Option<PathBuf>,
    #[arg(long, help = "Also export the sampled field as legacy VTK")]
    vtk: Option<PathBuf>,
    #[arg(long, help = "Streamline density")]
    density: Option<Scalar>,
    #[arg(long, help = "Colour scale for |E| (coolwarm, viridis)")]
    colormap: Option<Colormap>,
    #[arg(long, help = "Figure title")]
    title: Option<String>,
    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v, -vv, -vvv)")]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Singularity {
    Propagate,
    Skip,
}

impl From<Singularity> for SingularityPolicy {
    fn from(value: Singularity) -> Self {
        match value {
            Singularity::Propagate => Self::Propagate,
            Singularity::Skip => Self::Skip,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn resolve_config(cli: &Cli) -> Result<FieldLinesConfig> {
    let mut config = match &cli.config {
        Some(path) => FieldLinesConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => FieldLinesConfig::default(),
    };
    let scene = &mut config.scene;
    if let Some(gridsize) = cli.gridsize {
        scene.gridsize = gridsize;
    }
    if let Some(subdivisions) = cli.subdivisions {
        scene.subdivisions = subdivisions;
    }
    if let Some(k) = cli.k {
        scene.k = k;
    }
    if !cli.charges.is_empty() {
        scene.charges = cli.charges.clone();
    }
    if let Some(policy) = cli.singularity {
        scene.singularity = policy.into();
    }
    let plot = &mut config.plot;
    if let Some(density) = cli.density {
        plot.density = density;
    }
    if let Some(colormap) = cli.colormap {
        plot.colormap = colormap;
    }
    if let Some(title) = &cli.title {
        plot.title = title.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = resolve_config(&cli)?;
    let scene = &config.scene;
    info!(
        gridsize = scene.gridsize,
        subdivisions = scene.subdivisions,
        k = scene.k,
        charges = scene.charges.len(),
        "scene ready"
    );

    let solution = solve(scene).context("computing the field")?;

    if let Some(path) = &cli.csv {
        let mut out = BufWriter::new(File::create(path).with_context(|| format!("creating {}", path.display()))?);
        write_field_csv(&mut out, &solution.grid, &solution.field)
            .and_then(|()| out.flush())
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "csv written");
    }
    if let Some(path) = &cli.vtk {
        let mut out = BufWriter::new(File::create(path).with_context(|| format!("creating {}", path.display()))?);
        write_field_vtk(&mut out, &config.plot.title, &solution.grid, &solution.field)
            .and_then(|()| out.flush())
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "vtk written");
    }
    if !cli.no_plot {
        let mut renderer = PlottersRenderer::new(&cli.output)?;
        solution
            .render(&mut renderer, &config.plot)
            .with_context(|| format!("rendering {}", cli.output.display()))?;
        println!("{}", renderer.path().display());
    }
    Ok(())
}
