use std::path::Path;

use kurbo::{Affine, Point, Rect, Stroke};
use parley::FontWeight;
use peniko::Brush;

use crate::{
  Color, ChartData, ColorRangeInfo, ColorScale, interpolate_colors, pie,
  render::{self, Align, DrawText, Render, RenderConfig, RenderError},
};

const TEXT_COLOR: Color = Color::from_rgb8(32, 32, 32);
const FALLBACK_COLOR: Color = Color::from_rgb8(128, 128, 128);

const PADDING: f64 = 24.0;
const TITLE_HEIGHT: f64 = 48.0;
const LEGEND_GAP: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
  Pie,
  Doughnut,
}

impl ChartKind {
  /// Fraction of the radius left empty in the middle.
  pub const fn cutout(self) -> f64 {
    match self {
      ChartKind::Pie => 0.0,
      ChartKind::Doughnut => 0.5,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
  pub data:             Vec<f64>,
  pub background_color: Vec<Color>,
  pub border_color:     Color,
  pub border_width:     f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartConfigData {
  pub labels:   Vec<String>,
  pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
  pub title:      Option<String>,
  pub legend:     bool,
  pub background: Color,
}

/// Everything needed to draw a chart: what kind, which data, and how it looks.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
  pub kind:    ChartKind,
  pub data:    ChartConfigData,
  pub options: ChartOptions,
}

/// Where a chart is drawn.
#[derive(Debug, Clone, Copy)]
pub enum Surface<'a> {
  /// Render offscreen and save to an image file.
  Image(&'a Path),
  /// Open a window and block until it is closed.
  Window,
}

pub struct Chart {
  config: ChartConfig,
  size:   RenderConfig,
}

impl Default for ChartOptions {
  fn default() -> Self { ChartOptions { title: None, legend: true, background: Color::WHITE } }
}

impl Dataset {
  pub fn new(data: Vec<f64>, background_color: Vec<Color>) -> Self {
    Dataset { data, background_color, border_color: Color::WHITE, border_width: 2.0 }
  }

  /// A dataset colored with one interpolated color per value.
  pub fn interpolated<S>(data: Vec<f64>, color_scale: &S, color_range: &ColorRangeInfo) -> Self
  where
    S: ColorScale<Color = Color> + ?Sized,
  {
    let colors = interpolate_colors(data.len(), color_scale, color_range);
    Dataset::new(data, colors)
  }

  /// Colors repeat when there are fewer colors than values.
  pub fn color(&self, index: usize) -> Color {
    if self.background_color.is_empty() {
      FALLBACK_COLOR
    } else {
      self.background_color[index % self.background_color.len()]
    }
  }
}

impl ChartConfig {
  pub fn new(kind: ChartKind, chart_data: &ChartData, background_color: Vec<Color>) -> Self {
    ChartConfig {
      kind,
      data: ChartConfigData {
        labels:   chart_data.labels.clone(),
        datasets: vec![Dataset::new(chart_data.data.clone(), background_color)],
      },
      options: ChartOptions::default(),
    }
  }

  pub fn pie<S>(chart_data: &ChartData, color_scale: &S, color_range: &ColorRangeInfo) -> Self
  where
    S: ColorScale<Color = Color> + ?Sized,
  {
    let colors = interpolate_colors(chart_data.len(), color_scale, color_range);
    log::debug!("interpolated {} pie colors over {:?}", colors.len(), color_range);
    ChartConfig::new(ChartKind::Pie, chart_data, colors)
  }

  pub fn doughnut<S>(chart_data: &ChartData, color_scale: &S, color_range: &ColorRangeInfo) -> Self
  where
    S: ColorScale<Color = Color> + ?Sized,
  {
    ChartConfig { kind: ChartKind::Doughnut, ..ChartConfig::pie(chart_data, color_scale, color_range) }
  }

  /// Adds another ring inside the existing ones.
  pub fn push_dataset<S>(
    &mut self,
    data: Vec<f64>,
    color_scale: &S,
    color_range: &ColorRangeInfo,
  ) -> &mut Self
  where
    S: ColorScale<Color = Color> + ?Sized,
  {
    self.data.datasets.push(Dataset::interpolated(data, color_scale, color_range));
    self
  }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.options.title = Some(title.to_string());
    self
  }

  pub fn legend(&mut self, show: bool) -> &mut Self {
    self.options.legend = show;
    self
  }

  pub fn background(&mut self, color: Color) -> &mut Self {
    self.options.background = color;
    self
  }
}

/// Computes the palette for `chart_data`, builds a pie chart from it and
/// draws it once on `surface`.
pub fn create_chart<S>(
  surface: Surface<'_>,
  chart_data: &ChartData,
  color_scale: &S,
  color_range: &ColorRangeInfo,
) -> Result<Chart, RenderError>
where
  S: ColorScale<Color = Color> + ?Sized,
{
  let chart = Chart::new(ChartConfig::pie(chart_data, color_scale, color_range));
  chart.render_to(surface)?;
  Ok(chart)
}

impl Chart {
  pub fn new(config: ChartConfig) -> Self { Chart { config, size: RenderConfig::default() } }

  pub fn size(&mut self, width: u32, height: u32) -> &mut Self {
    self.size = RenderConfig { width, height };
    self
  }

  pub fn config(&self) -> &ChartConfig { &self.config }

  pub fn render_to(&self, surface: Surface<'_>) -> Result<(), RenderError> {
    match surface {
      Surface::Image(path) => self.save(path),
      Surface::Window => self.show(),
    }
  }

  pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
    self.size.check()?;

    let mut render = Render::new();
    self.draw(&mut render, self.size);
    render::save(&render, self.size, path.as_ref())
  }

  pub fn show(&self) -> Result<(), RenderError> {
    self.size.check()?;
    render::show(self, self.size)
  }

  /// Draws the chart and returns the area the pie was fitted into.
  pub(crate) fn draw(&self, render: &mut Render, size: RenderConfig) -> Rect {
    render.background = self.config.options.background;

    let mut viewport =
      Rect::new(PADDING, PADDING, f64::from(size.width) - PADDING, f64::from(size.height) - PADDING);

    if let Some(title) = &self.config.options.title {
      render.draw_text(DrawText {
        text: title,
        size: 28.0,
        weight: FontWeight::BOLD,
        brush: Brush::Solid(TEXT_COLOR),
        position: Point::new(viewport.center().x, viewport.y0),
        horizontal_align: Align::Center,
        ..Default::default()
      });
      viewport.y0 += TITLE_HEIGHT;
    }

    if self.config.options.legend
      && let Some(legend) = self.draw_legend(render, viewport)
    {
      viewport.x1 = legend.x0 - LEGEND_GAP;
    }

    let center = viewport.center();
    let radius = (viewport.width().min(viewport.height()) / 2.0).max(0.0);
    let rings = pie::rings(self.config.data.datasets.len(), radius, self.config.kind.cutout());

    for (dataset, (outer, inner)) in self.config.data.datasets.iter().zip(rings) {
      for (i, slice) in pie::slices(&dataset.data).iter().enumerate() {
        if slice.sweep_angle == 0.0 {
          continue;
        }

        let wedge = slice.wedge(center, outer, inner);
        render.fill(&wedge, Affine::IDENTITY, dataset.color(i));
        if dataset.border_width > 0.0 {
          render.stroke(
            &wedge,
            Affine::IDENTITY,
            dataset.border_color,
            &Stroke::new(dataset.border_width),
          );
        }
      }
    }

    viewport
  }
}
