// Background and axes construction. The orchestrator only merges against
// the finished nodes; everything about their internal shape lives here.

use crate::comp::{Composition, GridPos, Group, InputValue, NodeId};
use crate::error::Result;
use crate::style::Rgba;

/// A full-frame color node.
pub fn background(
    comp: &mut Composition,
    name: &str,
    color: Rgba,
    resolution: (u32, u32),
    position: GridPos,
) -> Result<NodeId> {
    let node = comp.add_named(name, "Background", position)?;
    set_background_color(comp, node, color);
    comp.set_input(node, "Width", InputValue::Integer(resolution.0 as i64));
    comp.set_input(node, "Height", InputValue::Integer(resolution.1 as i64));
    comp.set_input(node, "UseFrameFormatSettings", InputValue::Integer(1));
    Ok(node)
}

/// Flat color inputs of a Background tool.
pub fn set_background_color(comp: &mut Composition, node: NodeId, color: Rgba) {
    comp.set_number(node, "TopLeftRed", color.red);
    comp.set_number(node, "TopLeftGreen", color.green);
    comp.set_number(node, "TopLeftBlue", color.blue);
    comp.set_number(node, "TopLeftAlpha", color.alpha);
}

/// Geometry of the axes group: bar lengths and crossing point derived from
/// the plot dimensions and padding.
#[derive(Debug, Clone)]
pub struct AxesSpec {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub thickness: f64,
    pub color: Rgba,
    pub resolution: (u32, u32),
}

impl AxesSpec {
    fn aspect_ratio(&self) -> f64 {
        self.resolution.0 as f64 / self.resolution.1 as f64
    }
}

/// Two axis bars plus their fill, grouped as one unit. The x axis sits at
/// the lower edge of the padded plot area, the y axis at the left edge;
/// both extend past the plot by the padding.
pub fn axes_group(spec: &AxesSpec) -> Result<Group> {
    let ar = spec.aspect_ratio();
    let pd = spec.padding;

    let height = spec.height + pd * ar;
    let width = spec.width + pd;

    let x_pos = 0.5 - 0.5 * (spec.width + pd);
    let y_pos = 0.5 - 0.5 * (spec.height + pd * ar);

    let mut nodes = Composition::new();

    let x_axis = nodes.add_named("XAxis", "RectangleMask", (0.0, -2.0))?;
    nodes.set_number(x_axis, "Height", spec.thickness * ar);
    nodes.set_number(x_axis, "Width", width);
    nodes.set_point(x_axis, "Center", 0.5, y_pos);

    let y_axis = nodes.add_named("YAxis", "RectangleMask", (0.0, -1.0))?;
    nodes.set_number(y_axis, "Height", height);
    nodes.set_number(y_axis, "Width", spec.thickness);
    nodes.set_point(y_axis, "Center", x_pos, 0.5);
    nodes.set_mask(y_axis, x_axis);

    let fill = background(&mut nodes, "AxisFill", spec.color, spec.resolution, (0.0, 0.0))?;
    nodes.set_mask(fill, y_axis);

    Ok(Group::new(nodes, fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;

    fn make_spec() -> AxesSpec {
        AxesSpec {
            width: 0.75,
            height: 0.75,
            padding: 0.05,
            thickness: 0.001,
            color: Rgba::rgb(0.6, 0.6, 0.6),
            resolution: (1920, 1080),
        }
    }

    #[test]
    fn test_axes_group_wiring() {
        let group = axes_group(&make_spec()).unwrap();
        let mut comp = Composition::new();
        comp.add_group("Axes", (0.0, -1.0), group).unwrap();
        let text = comp.serialize();

        assert!(text.contains("XAxis = RectangleMask {"));
        assert!(text.contains("YAxis = RectangleMask {"));
        assert!(text.contains("AxisFill = Background {"));
        // x axis chains into the y axis mask, y axis masks the fill
        assert!(text.contains("SourceOp = \"XAxis\""));
        assert!(text.contains("SourceOp = \"YAxis\""));
    }

    #[test]
    fn test_background_carries_color_and_frame() {
        let mut comp = Composition::new();
        background(&mut comp, "PlotBG", style::WHITE, (1920, 1080), (-1.0, 0.0)).unwrap();
        let text = comp.serialize();
        assert!(text.contains("TopLeftRed = Input { Value = 1, },"));
        assert!(text.contains("Width = Input { Value = 1920, },"));
        assert!(text.contains("UseFrameFormatSettings = Input { Value = 1, },"));
    }
}
