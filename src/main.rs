use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fuplot::plot::{ColParams, LineParams, PointParams};
use fuplot::{aes, style, FuPlot, PlotData, PlotOptions};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(name = "fuplot")]
#[command(about = "Compile CSV data into a Fusion node graph", long_about = None)]
struct Args {
    /// Geometry kind for the layer
    #[arg(long, value_enum)]
    geom: GeomKind,

    /// Column mapped to the x aesthetic
    #[arg(short = 'x', long = "x-col")]
    x: Option<String>,

    /// Column mapped to the y aesthetic
    #[arg(short = 'y', long = "y-col")]
    y: Option<String>,

    /// Column mapped to the point size aesthetic
    #[arg(long)]
    size_by: Option<String>,

    /// Layer color as "r,g,b" or "r,g,b,a" with 0..1 channels
    #[arg(long)]
    color: Option<String>,

    /// Line thickness (canvas fraction)
    #[arg(long)]
    thickness: Option<f64>,

    /// Point opacity
    #[arg(long)]
    opacity: Option<f64>,

    /// Column spacing fraction (0 = touching bars)
    #[arg(long)]
    spacing: Option<f64>,

    /// Plot width as a canvas fraction
    #[arg(long, default_value_t = 0.75)]
    plot_width: f64,

    /// Plot height as a canvas fraction
    #[arg(long, default_value_t = 0.75)]
    plot_height: f64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GeomKind {
    Line,
    Point,
    Col,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Read CSV from stdin
    let csv_data =
        fuplot::csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
    let data = PlotData::from_csv(csv_data).context("Failed to build plot data")?;

    let mut mapping = aes();
    if let Some(x) = &args.x {
        mapping = mapping.x(x);
    }
    if let Some(y) = &args.y {
        mapping = mapping.y(y);
    }
    if let Some(size) = &args.size_by {
        mapping = mapping.map("size", size);
    }

    let color = match &args.color {
        Some(s) => Some(
            style::parse_color(s)
                .with_context(|| format!("Invalid color '{}' (expected r,g,b[,a])", s))?,
        ),
        None => None,
    };

    let options = PlotOptions {
        width: args.plot_width,
        height: args.plot_height,
        ..Default::default()
    };

    let mut plot = FuPlot::with_options(data, mapping, options)
        .context("Failed to construct plot")?;

    match args.geom {
        GeomKind::Line => {
            plot.geom_line(LineParams {
                thickness: args.thickness,
                color,
                ..Default::default()
            })?;
        }
        GeomKind::Point => {
            plot.geom_point(PointParams {
                fill: color,
                opacity: args.opacity,
                ..Default::default()
            })?;
        }
        GeomKind::Col => {
            plot.geom_col(ColParams {
                fill: color,
                spacing: args.spacing,
                ..Default::default()
            })?;
        }
    }

    let rendered = plot.render().context("Failed to render plot")?;

    // Write the node tree to stdout
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(rendered.as_bytes())
        .context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
