// Geometry layers. Each variant turns its data and resolved mapping into a
// group of primitive tools; the orchestrator stacks the groups into the
// merge chain.

pub mod col;
pub mod line;
pub mod point;

pub use col::GeomCol;
pub use line::GeomLine;
pub use point::GeomPoint;

use crate::comp::Group;
use crate::error::Result;
use crate::scale::ScaleRegistry;

/// Everything a renderer needs besides its own layer state.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub width: f64,
    pub height: f64,
    pub scales: &'a ScaleRegistry,
    pub resolution: (u32, u32),
}

/// A geometry layer bound to its data, resolved mapping, style and
/// 1-based insertion index.
#[derive(Debug, Clone)]
pub enum Geom {
    Line(GeomLine),
    Point(GeomPoint),
    Col(GeomCol),
}

impl Geom {
    /// Name of the group that outputs the final layer image.
    pub fn name(&self) -> String {
        match self {
            Geom::Line(g) => g.name(),
            Geom::Point(g) => g.name(),
            Geom::Col(g) => g.name(),
        }
    }

    /// Render the layer into a group of tools.
    pub fn render(&self, ctx: &RenderContext) -> Result<Group> {
        match self {
            Geom::Line(g) => g.render(ctx),
            Geom::Point(g) => g.render(ctx),
            Geom::Col(g) => g.render(ctx),
        }
    }
}
