// Library exports for fuplot

pub mod aes;
pub mod axes;
pub mod comp;
pub mod csv_reader;
pub mod data;
pub mod error;
pub mod geom;
pub mod plot;
pub mod scale;
pub mod style;

pub use aes::{aes, Aes};
pub use data::PlotData;
pub use error::{Error, Result};
pub use plot::{ColParams, FuPlot, LineParams, PointParams};
pub use style::Rgba;

use serde::Deserialize;

/// Canvas geometry for a plot: plot dimensions as canvas fractions plus
/// the output resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct PlotOptions {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_resolution")]
    pub resolution: (u32, u32),
}

fn default_width() -> f64 { 0.75 }
fn default_height() -> f64 { 0.75 }
fn default_resolution() -> (u32, u32) { (1920, 1080) }

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 0.75,
            height: 0.75,
            resolution: (1920, 1080),
        }
    }
}
