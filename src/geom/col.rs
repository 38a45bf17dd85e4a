use crate::aes::Aes;
use crate::comp::{Composition, Group, InputValue};
use crate::data::PlotData;
use crate::error::{Error, Result};
use crate::geom::RenderContext;
use crate::scale::{categorical_positions, dim_to_scale, rescale};
use crate::style::Rgba;

/// A column layer: categories in row order along x, bar length from y.
///
/// One base rectangle defines the bar shape; every category is a transform
/// instance of it, so the geometry exists once no matter how many bars.
#[derive(Debug, Clone)]
pub struct GeomCol {
    pub data: PlotData,
    pub mapping: Aes,
    pub fill: Rgba,
    pub spacing: f64,
    pub index: usize,
}

impl GeomCol {
    /// Same name as the group that outputs the final layer image.
    pub fn name(&self) -> String {
        format!("GeomCol{}", self.index)
    }

    /// Width of one bar given the slot width and the spacing fraction.
    pub fn bar_width(plot_width: f64, n: usize, spacing: f64) -> f64 {
        plot_width / n as f64 * (1.0 - spacing)
    }

    pub fn render(&self, ctx: &RenderContext) -> Result<Group> {
        let y_col = self.mapping.get("y").ok_or(Error::RequiredFieldMissing {
            geom: "geom_col",
            field: "y",
        })?;

        let ys = self.data.numeric_column(y_col)?;
        let n = ys.len();
        if n == 0 {
            return Err(Error::EmptyData);
        }

        let positions = categorical_positions(n, dim_to_scale(ctx.width, 0.5));
        let tops = rescale(&ys, ctx.scales.get("y"), dim_to_scale(ctx.height, 0.5));
        let baseline = (1.0 - ctx.height) / 2.0;
        let bar_width = Self::bar_width(ctx.width, n, self.spacing);

        let mut nodes = Composition::new();

        let shape = nodes.add_named("BarShape", "sRectangle", (0.0, -1.0))?;
        nodes.set_number(shape, "Width", bar_width);
        nodes.set_number(shape, "Height", 1.0);
        nodes.set_number(shape, "Red", self.fill.red);
        nodes.set_number(shape, "Green", self.fill.green);
        nodes.set_number(shape, "Blue", self.fill.blue);
        nodes.set_number(shape, "Alpha", self.fill.alpha);

        let merge = nodes.add_named("BarMerge", "sMerge", (2.0, 0.0))?;

        for (i, (&pos, &top)) in positions.iter().zip(tops.iter()).enumerate() {
            let length = top - baseline;
            let center_y = baseline + length / 2.0;

            let bar = nodes.add_named(&format!("Bar{}", i + 1), "sTransform", (1.0, i as f64))?;
            // Shape space is centered on the canvas midpoint
            nodes.set_number(bar, "XOffset", pos - 0.5);
            nodes.set_number(bar, "YOffset", center_y - 0.5);
            nodes.set_number(bar, "XSize", 1.0);
            nodes.set_number(bar, "YSize", length);
            nodes.connect(shape, bar, "Input");
            nodes.connect(bar, merge, &format!("Input{}", i + 1));
        }

        let render = nodes.add_named("GeomColRender", "sRender", (3.0, 0.0))?;
        nodes.connect(merge, render, "Input");
        nodes.set_input(render, "Width", InputValue::Integer(ctx.resolution.0 as i64));
        nodes.set_input(render, "Height", InputValue::Integer(ctx.resolution.1 as i64));

        Ok(Group::new(nodes, render))
    }
}
