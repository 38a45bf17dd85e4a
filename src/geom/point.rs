use crate::aes::Aes;
use crate::comp::{Composition, Group, InputValue, NodeId};
use crate::data::PlotData;
use crate::error::{Error, Result};
use crate::geom::RenderContext;
use crate::scale::{dim_to_scale, rescale};
use crate::style::Rgba;

/// A point layer: one ellipse per point, chained through additive masks,
/// with a single fill over the final mask.
///
/// Fill color and opacity stay separate: opacity drives the ellipse level
/// while the fill node carries the raw RGB. Premultiplying the fill by the
/// opacity darkened overlapping points and must not come back.
#[derive(Debug, Clone)]
pub struct GeomPoint {
    pub data: PlotData,
    pub mapping: Aes,
    pub fill: Rgba,
    pub opacity: f64,
    pub size: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub index: usize,
}

impl GeomPoint {
    /// Same name as the group that outputs the final layer image.
    pub fn name(&self) -> String {
        format!("GeomPoint{}", self.index)
    }

    pub fn render(&self, ctx: &RenderContext) -> Result<Group> {
        let x_col = self.mapping.get("x").ok_or(Error::RequiredFieldMissing {
            geom: "geom_point",
            field: "x",
        })?;
        let y_col = self.mapping.get("y").ok_or(Error::RequiredFieldMissing {
            geom: "geom_point",
            field: "y",
        })?;

        let xs = self.data.numeric_column(x_col)?;
        let ys = self.data.numeric_column(y_col)?;

        let fu_x = rescale(&xs, ctx.scales.get("x"), dim_to_scale(ctx.width, 0.5));
        let fu_y = rescale(&ys, ctx.scales.get("y"), dim_to_scale(ctx.height, 0.5));

        let fu_size = match self.mapping.get("size") {
            Some(size_col) => {
                let sizes = self.data.numeric_column(size_col)?;
                rescale(
                    &sizes,
                    ctx.scales.get("size"),
                    (self.min_size, self.max_size),
                )
            }
            None => vec![self.size; fu_x.len()],
        };

        // Sizes travel with their points through the sort
        let mut points: Vec<(f64, f64, f64)> = fu_x
            .into_iter()
            .zip(fu_y)
            .zip(fu_size)
            .map(|((x, y), s)| (x, y, s))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut nodes = Composition::new();
        let mut prev: Option<NodeId> = None;

        for (i, (x, y, size)) in points.iter().enumerate() {
            let ellipse = nodes.add_named(
                &format!("Point{}", i + 1),
                "EllipseMask",
                (0.0, i as f64),
            )?;
            nodes.set_number(ellipse, "Width", *size);
            nodes.set_number(ellipse, "Height", *size);
            nodes.set_point(ellipse, "Center", *x, *y);
            nodes.set_number(ellipse, "Level", self.opacity);
            // Union with everything accumulated so far
            if let Some(prev) = prev {
                nodes.set_mask(ellipse, prev);
            }
            prev = Some(ellipse);
        }

        let Some(last) = prev else {
            return Err(Error::EmptyData);
        };

        let fill = nodes.add_named("GeomPointFill", "Background", (0.0, points.len() as f64))?;
        nodes.set_input(fill, "UseFrameFormatSettings", InputValue::Integer(1));
        nodes.set_number(fill, "TopLeftRed", self.fill.red);
        nodes.set_number(fill, "TopLeftGreen", self.fill.green);
        nodes.set_number(fill, "TopLeftBlue", self.fill.blue);
        nodes.set_number(fill, "TopLeftAlpha", 1.0);
        nodes.set_mask(fill, last);

        Ok(Group::new(nodes, fill))
    }
}
