use crate::aes::Aes;
use crate::comp::{Composition, Group, InputValue, InstanceInput};
use crate::data::PlotData;
use crate::error::{Error, Result};
use crate::geom::RenderContext;
use crate::scale::{dim_to_scale, rescale};
use crate::style::Rgba;

/// A line layer: one polyline through the mapped points plus a color node
/// masked by it.
#[derive(Debug, Clone)]
pub struct GeomLine {
    pub data: PlotData,
    pub mapping: Aes,
    pub thickness: f64,
    pub color: Rgba,
    pub index: usize,
}

impl GeomLine {
    /// Same name as the group that outputs the final layer image.
    pub fn name(&self) -> String {
        format!("GeomLine{}", self.index)
    }

    pub fn render(&self, ctx: &RenderContext) -> Result<Group> {
        let x_col = self.mapping.get("x").ok_or(Error::RequiredFieldMissing {
            geom: "geom_line",
            field: "x",
        })?;
        let y_col = self.mapping.get("y").ok_or(Error::RequiredFieldMissing {
            geom: "geom_line",
            field: "y",
        })?;

        let xs = self.data.numeric_column(x_col)?;
        let ys = self.data.numeric_column(y_col)?;

        let fu_x = rescale(&xs, ctx.scales.get("x"), dim_to_scale(ctx.width, 0.5));
        let fu_y = rescale(&ys, ctx.scales.get("y"), dim_to_scale(ctx.height, 0.5));

        // Left-to-right path regardless of input row order
        let mut points: Vec<(f64, f64)> = fu_x.into_iter().zip(fu_y).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut nodes = Composition::new();

        let line = nodes.add_named("PlotLine", "PolylineMask", (0.0, -1.0))?;
        nodes.set_number(line, "BorderWidth", self.thickness);
        nodes.set_input(line, "Polyline", InputValue::Polyline(points));

        let alpha = self.color.alpha;
        let fill = nodes.add_named("PlotColor", "Background", (0.0, 0.0))?;
        nodes.set_number(fill, "TopLeftRed", self.color.red * alpha);
        nodes.set_number(fill, "TopLeftGreen", self.color.green * alpha);
        nodes.set_number(fill, "TopLeftBlue", self.color.blue * alpha);
        nodes.set_number(fill, "TopLeftAlpha", alpha);
        nodes.set_input(fill, "UseFrameFormatSettings", InputValue::Integer(1));
        nodes.set_mask(fill, line);

        Ok(Group::new(nodes, fill)
            .expose(InstanceInput::new(fill, "TopLeftRed").name("Color").control_group(1))
            .expose(InstanceInput::new(fill, "TopLeftGreen").control_group(1))
            .expose(InstanceInput::new(fill, "TopLeftBlue").control_group(1))
            .expose(InstanceInput::new(fill, "TopLeftAlpha").control_group(1))
            .expose(InstanceInput::new(line, "BorderWidth").name("Thickness"))
            .expose(InstanceInput::new(line, "WritePosition").default(0.0))
            .expose(InstanceInput::new(line, "WriteLength").default(1.0)))
    }
}
