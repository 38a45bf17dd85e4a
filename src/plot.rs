use crate::aes::Aes;
use crate::axes::{self, AxesSpec};
use crate::comp::Composition;
use crate::data::PlotData;
use crate::error::Result;
use crate::geom::{Geom, GeomCol, GeomLine, GeomPoint, RenderContext};
use crate::scale::ScaleRegistry;
use crate::style::{self, Rgba};
use crate::PlotOptions;

/// Per-layer arguments for [`FuPlot::geom_line`]. Unset fields fall back
/// to the plot's data/mapping and the layer defaults.
#[derive(Debug, Clone, Default)]
pub struct LineParams {
    pub data: Option<PlotData>,
    pub mapping: Option<Aes>,
    pub thickness: Option<f64>,
    pub color: Option<Rgba>,
}

/// Per-layer arguments for [`FuPlot::geom_point`].
#[derive(Debug, Clone, Default)]
pub struct PointParams {
    pub data: Option<PlotData>,
    pub mapping: Option<Aes>,
    pub fill: Option<Rgba>,
    pub opacity: Option<f64>,
    pub size: Option<f64>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
}

/// Per-layer arguments for [`FuPlot::geom_col`].
#[derive(Debug, Clone, Default)]
pub struct ColParams {
    pub data: Option<PlotData>,
    pub mapping: Option<Aes>,
    pub fill: Option<Rgba>,
    pub spacing: Option<f64>,
}

/// The plot builder: owns the dataset and base mapping, accumulates
/// geometry layers and their scale ranges, and compiles everything into
/// one node graph on [`render`].
///
/// [`render`]: FuPlot::render
#[derive(Debug, Clone)]
pub struct FuPlot {
    data: PlotData,
    mapping: Aes,
    width: f64,
    height: f64,
    resolution: (u32, u32),
    geoms: Vec<Geom>,
    scales: ScaleRegistry,
    background_color: Rgba,
    padding: f64,
    axis_thickness: f64,
    axis_color: Rgba,
}

impl FuPlot {
    /// Create a plot over a dataset with a base aesthetic mapping. Every
    /// mapped column must exist in the data.
    pub fn new(data: PlotData, mapping: Aes) -> Result<Self> {
        Self::with_options(data, mapping, PlotOptions::default())
    }

    pub fn with_options(data: PlotData, mapping: Aes, options: PlotOptions) -> Result<Self> {
        mapping.validate(&data)?;

        let mut scales = ScaleRegistry::default();
        scales.seed(&mapping, &data)?;

        Ok(Self {
            data,
            mapping,
            width: options.width,
            height: options.height,
            resolution: options.resolution,
            geoms: Vec::new(),
            scales,
            background_color: style::WHITE,
            padding: 0.05,
            axis_thickness: 0.001,
            axis_color: Rgba::rgb(0.6, 0.6, 0.6),
        })
    }

    /// Ranges accumulated so far, exposed for inspection in tests.
    pub fn scales(&self) -> &ScaleRegistry {
        &self.scales
    }

    /// Resolve a layer's data and mapping against the plot's, validate,
    /// and widen the scale ranges. On error the plot state is untouched.
    fn pass_to_geom(
        &mut self,
        data: Option<PlotData>,
        mapping: Option<Aes>,
    ) -> Result<(PlotData, Aes)> {
        let data = data.unwrap_or_else(|| self.data.clone());
        let mapping = match mapping {
            Some(layer) => layer.merged_over(&self.mapping),
            None => self.mapping.clone(),
        };

        mapping.validate(&data)?;
        self.scales.extend(&mapping, &data)?;

        Ok((data, mapping))
    }

    /// Add a line layer.
    pub fn geom_line(&mut self, params: LineParams) -> Result<&mut Self> {
        let (data, mapping) = self.pass_to_geom(params.data, params.mapping)?;
        let index = self.geoms.len() + 1;
        self.geoms.push(Geom::Line(GeomLine {
            data,
            mapping,
            thickness: params.thickness.unwrap_or(0.003),
            color: params.color.unwrap_or(style::BLACK),
            index,
        }));
        Ok(self)
    }

    /// Add a point layer.
    pub fn geom_point(&mut self, params: PointParams) -> Result<&mut Self> {
        let (data, mapping) = self.pass_to_geom(params.data, params.mapping)?;
        let index = self.geoms.len() + 1;
        self.geoms.push(Geom::Point(GeomPoint {
            data,
            mapping,
            fill: params.fill.unwrap_or(style::BLACK),
            opacity: params.opacity.unwrap_or(1.0),
            size: params.size.unwrap_or(0.005),
            min_size: params.min_size.unwrap_or(0.002),
            max_size: params.max_size.unwrap_or(0.03),
            index,
        }));
        Ok(self)
    }

    /// Add a column layer. Categories come from row order.
    pub fn geom_col(&mut self, params: ColParams) -> Result<&mut Self> {
        let (data, mapping) = self.pass_to_geom(params.data, params.mapping)?;
        let index = self.geoms.len() + 1;
        self.geoms.push(Geom::Col(GeomCol {
            data,
            mapping,
            fill: params.fill.unwrap_or(style::BLACK),
            spacing: params.spacing.unwrap_or(0.5),
            index,
        }));
        Ok(self)
    }

    /// Override plot-level style defaults.
    pub fn theme(&mut self, background_color: Option<Rgba>) -> &mut Self {
        if let Some(color) = background_color {
            self.background_color = color;
        }
        self
    }

    /// Compile the full node graph and serialize it. Layers stack
    /// bottom-to-top in insertion order behind a right-folding merge
    /// chain; nothing is emitted on failure.
    pub fn render(&self) -> Result<String> {
        let mut comp = Composition::new();

        let bg = axes::background(
            &mut comp,
            "PlotBG",
            self.background_color,
            self.resolution,
            (-1.0, 0.0),
        )?;

        let axes_spec = AxesSpec {
            width: self.width,
            height: self.height,
            padding: self.padding,
            thickness: self.axis_thickness,
            color: self.axis_color,
            resolution: self.resolution,
        };
        let axes_id = comp.add_group("Axes", (0.0, -1.0), axes::axes_group(&axes_spec)?)?;

        let ctx = RenderContext {
            width: self.width,
            height: self.height,
            scales: &self.scales,
            resolution: self.resolution,
        };

        let mut elements = vec![bg, axes_id];
        for geom in &self.geoms {
            let group = geom.render(&ctx)?;
            let grid_x = elements.len() as f64 - 1.0;
            let id = comp.add_group(&geom.name(), (grid_x, -1.0), group)?;
            elements.push(id);
        }

        // Merge_i takes everything merged so far as background and the
        // next element as foreground, so later layers land on top
        let mut prev = elements[0];
        for (i, &element) in elements.iter().enumerate().skip(1) {
            let merge = comp.add_named(&format!("Merge{i}"), "Merge", ((i - 1) as f64, 0.0))?;
            comp.connect(prev, merge, "Background");
            comp.connect(element, merge, "Foreground");
            prev = merge;
        }

        Ok(comp.serialize())
    }
}
