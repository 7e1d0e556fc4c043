use parley::{Alignment, FontWeight, Layout, PositionedLayoutItem, StyleProperty};
use thiserror::Error;
use vello::{
  kurbo::{Affine, Point, Shape, Stroke, Vec2},
  peniko::{Brush, BrushRef, Color, Fill},
  wgpu::{self, TextureDescriptor},
};

mod texture;
mod window;

pub(crate) use texture::save;
pub(crate) use window::show;

#[derive(Debug, Error)]
pub enum RenderError {
  #[error("the width and height must be larger than 0 but received {0}x{1}")]
  EmptySize(u32, u32),
  #[error("{width}x{height} exceeds the largest texture the gpu supports ({max}x{max})")]
  TooLarge { width: u32, height: u32, max: u32 },
  #[error("unable to get an adapter for the gpu: {0}")]
  Adapter(#[from] wgpu::RequestAdapterError),
  #[error("unable to retrieve logical device: {0}")]
  Device(#[from] wgpu::RequestDeviceError),
  #[error("unable to create surface: {0}")]
  Surface(#[from] wgpu::CreateSurfaceError),
  #[error("no compatible surface format found")]
  SurfaceFormat,
  #[error("unable to create window: {0}")]
  Window(#[from] winit::error::OsError),
  #[error("event loop failed: {0}")]
  EventLoop(#[from] winit::error::EventLoopError),
  #[error("vello failed to render: {0}")]
  Vello(#[from] vello::Error),
  #[error("unable to wait for the gpu: {0}")]
  Poll(#[from] wgpu::PollError),
  #[error("unable to map the output buffer: {0}")]
  BufferMap(#[from] wgpu::BufferAsyncError),
  #[error("output buffer mapping was cancelled")]
  MapCancelled,
  #[error("output buffer does not hold a {0}x{1} image")]
  ImageSize(u32, u32),
  #[error("unable to save image: {0}")]
  Image(#[from] image::ImageError),
}

/// Output size of a rendered chart, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
  pub width:  u32,
  pub height: u32,
}

impl Default for RenderConfig {
  fn default() -> Self { RenderConfig { width: 1024, height: 1024 } }
}

impl RenderConfig {
  pub(crate) fn extent_3d(&self) -> wgpu::Extent3d {
    wgpu::Extent3d {
      width:                 self.width,
      height:                self.height,
      depth_or_array_layers: 1,
    }
  }

  /// Rows copied out of a texture must be aligned to `COPY_BYTES_PER_ROW_ALIGNMENT`.
  pub(crate) fn padded_bytes_per_row(&self) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (4 * self.width).div_ceil(align) * align
  }

  pub(crate) fn check(&self) -> Result<(), RenderError> {
    if self.width == 0 || self.height == 0 {
      return Err(RenderError::EmptySize(self.width, self.height));
    }
    Ok(())
  }

  /// Rejects sizes a texture on a device with `limits` cannot hold.
  pub(crate) fn fits(&self, limits: &wgpu::Limits) -> Result<(), RenderError> {
    self.check()?;

    let max = limits.max_texture_dimension_2d;
    if self.width > max || self.height > max {
      return Err(RenderError::TooLarge { width: self.width, height: self.height, max });
    }
    Ok(())
  }
}

pub(crate) struct Render {
  pub scene:      vello::Scene,
  pub background: Color,
  font:           parley::FontContext,
  layout:         parley::LayoutContext<Brush>,
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Align {
  #[default]
  Start,
  Center,
  End,
}

pub(crate) struct DrawText<'a> {
  pub text:             &'a str,
  pub size:             f32,
  pub weight:           FontWeight,
  pub brush:            Brush,
  pub position:         Point,
  pub transform:        Affine,
  pub horizontal_align: Align,
  pub vertical_align:   Align,
}

impl Default for DrawText<'_> {
  fn default() -> Self {
    DrawText {
      text:             "",
      size:             16.0,
      weight:           FontWeight::NORMAL,
      brush:            Brush::Solid(Color::BLACK),
      position:         Point::ORIGIN,
      transform:        Affine::IDENTITY,
      horizontal_align: Align::Start,
      vertical_align:   Align::Start,
    }
  }
}

impl Align {
  fn offset(self, size: f64) -> f64 {
    match self {
      Align::Start => 0.0,
      Align::Center => -size / 2.0,
      Align::End => -size,
    }
  }
}

impl Render {
  pub fn new() -> Self {
    Render {
      scene:      vello::Scene::new(),
      background: Color::WHITE,
      font:       parley::FontContext::new(),
      layout:     parley::LayoutContext::new(),
    }
  }

  pub fn fill<'b>(&mut self, shape: &impl Shape, transform: Affine, brush: impl Into<BrushRef<'b>>) {
    self.scene.fill(Fill::NonZero, transform, brush, None, shape);
  }

  pub fn stroke<'b>(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: impl Into<BrushRef<'b>>,
    stroke: &Stroke,
  ) {
    self.scene.stroke(stroke, transform, brush, None, shape);
  }

  pub fn layout_text(&mut self, text: &DrawText) -> Layout<Brush> {
    let mut builder = self.layout.ranged_builder(&mut self.font, text.text, 1.0, true);

    builder.push_default(StyleProperty::FontSize(text.size));
    builder.push_default(StyleProperty::FontWeight(text.weight));
    builder.push_default(StyleProperty::Brush(text.brush.clone()));

    let mut layout = builder.build(text.text);
    layout.break_all_lines(None);
    layout.align(None, Alignment::Start, Default::default());
    layout
  }

  pub fn draw_text(&mut self, text: DrawText) {
    let layout = self.layout_text(&text);
    self.draw_text_layout(layout, text);
  }

  pub fn draw_text_layout(&mut self, layout: Layout<Brush>, text: DrawText) {
    let offset = Vec2::new(
      text.horizontal_align.offset(f64::from(layout.width())),
      text.vertical_align.offset(f64::from(layout.height())),
    );
    let transform =
      Affine::translate(text.position.to_vec2()) * text.transform * Affine::translate(offset);

    for line in layout.lines() {
      for item in line.items() {
        let PositionedLayoutItem::GlyphRun(glyph_run) = item else { continue };

        let run = glyph_run.run();
        let mut x = glyph_run.offset();
        let baseline = glyph_run.baseline();

        self
          .scene
          .draw_glyphs(run.font())
          .brush(&glyph_run.style().brush)
          .hint(false)
          .transform(transform)
          .glyph_transform(
            run.synthesis().skew().map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0)),
          )
          .font_size(run.font_size())
          .normalized_coords(run.normalized_coords())
          .draw(
            Fill::NonZero,
            glyph_run.glyphs().map(|glyph| {
              let gx = x + glyph.x;
              let gy = baseline + glyph.y;
              x += glyph.advance;
              vello::Glyph { id: glyph.id.into(), x: gx, y: gy }
            }),
          );
      }
    }
  }

  /// Rasterizes the scene into `handle`'s texture.
  pub fn render_to_texture(
    &self,
    renderer: &mut vello::Renderer,
    handle: &GpuHandle,
    config: &RenderConfig,
  ) -> Result<(), RenderError> {
    renderer.render_to_texture(
      &handle.device,
      &handle.queue,
      &self.scene,
      &handle.view,
      &vello::RenderParams {
        base_color:          self.background,
        width:               config.width,
        height:              config.height,
        antialiasing_method: vello::AaConfig::Msaa16,
      },
    )?;
    Ok(())
  }
}

pub(crate) struct GpuHandle {
  pub device:  wgpu::Device,
  pub queue:   wgpu::Queue,
  pub texture: wgpu::Texture,
  pub view:    wgpu::TextureView,
}

impl GpuHandle {
  /// Requests a device from `adapter`, or from a default adapter when there is none.
  pub fn new(config: &RenderConfig, adapter: Option<wgpu::Adapter>) -> Result<Self, RenderError> {
    let adapter = match adapter {
      Some(adapter) => adapter,
      None => {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?
      }
    };

    let (device, queue) = pollster::block_on(
      adapter.request_device(&wgpu::DeviceDescriptor { label: Some("pieplot"), ..Default::default() }),
    )?;

    config.fits(&device.limits())?;
    let (texture, view) = create_target(&device, config);
    log::debug!("created {}x{} render target", config.width, config.height);

    Ok(GpuHandle { device, queue, texture, view })
  }

  pub fn resize(&mut self, config: &RenderConfig) -> Result<(), RenderError> {
    config.fits(&self.device.limits())?;
    (self.texture, self.view) = create_target(&self.device, config);
    Ok(())
  }
}

fn create_target(
  device: &wgpu::Device,
  config: &RenderConfig,
) -> (wgpu::Texture, wgpu::TextureView) {
  let texture = device.create_texture(&TextureDescriptor {
    label:           Some("Render Texture"),
    size:            config.extent_3d(),
    mip_level_count: 1,
    sample_count:    1,
    dimension:       wgpu::TextureDimension::D2,
    format:          wgpu::TextureFormat::Rgba8Unorm,
    usage:           wgpu::TextureUsages::STORAGE_BINDING
      | wgpu::TextureUsages::TEXTURE_BINDING
      | wgpu::TextureUsages::COPY_SRC,
    view_formats:    &[],
  });
  let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
  (texture, view)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rows_are_padded_to_copy_alignment() {
    assert_eq!(RenderConfig { width: 1024, height: 1 }.padded_bytes_per_row(), 4096);
    assert_eq!(RenderConfig { width: 100, height: 1 }.padded_bytes_per_row(), 512);
    assert_eq!(RenderConfig { width: 64, height: 1 }.padded_bytes_per_row(), 256);
  }

  #[test]
  fn empty_sizes_are_rejected() {
    assert!(RenderConfig { width: 0, height: 10 }.check().is_err());
    assert!(RenderConfig::default().check().is_ok());
  }

  #[test]
  fn oversized_textures_are_rejected() {
    let limits = wgpu::Limits { max_texture_dimension_2d: 2048, ..wgpu::Limits::default() };

    assert!(RenderConfig { width: 2048, height: 2048 }.fits(&limits).is_ok());
    assert!(matches!(
      RenderConfig { width: 2049, height: 10 }.fits(&limits),
      Err(RenderError::TooLarge { width: 2049, height: 10, max: 2048 })
    ));
    assert!(matches!(
      RenderConfig { width: 10, height: u32::MAX }.fits(&limits),
      Err(RenderError::TooLarge { .. })
    ));
    assert!(matches!(
      RenderConfig { width: 0, height: 10 }.fits(&limits),
      Err(RenderError::EmptySize(0, 10))
    ));
  }

  #[test]
  fn alignment_offsets() {
    assert_eq!(Align::Start.offset(40.0), 0.0);
    assert_eq!(Align::Center.offset(40.0), -20.0);
    assert_eq!(Align::End.offset(40.0), -40.0);
  }
}
