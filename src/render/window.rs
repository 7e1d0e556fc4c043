use std::sync::Arc;

use vello::wgpu;
use winit::{
  application::ApplicationHandler,
  dpi::LogicalSize,
  event::{KeyEvent, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::Key,
  window::{Window, WindowId},
};

use crate::{
  Chart, ResultExt,
  render::{GpuHandle, Render, RenderConfig, RenderError},
};

/// Opens a window showing `chart` and blocks until it is closed.
pub fn show(chart: &Chart, config: RenderConfig) -> Result<(), RenderError> {
  let event_loop = EventLoop::new()?;
  event_loop.set_control_flow(ControlFlow::Wait);

  let mut app = App { chart, config, stale: true, render: None, init: None, error: None };
  event_loop.run_app(&mut app)?;

  match app.error.take() {
    Some(err) => Err(err),
    None => Ok(()),
  }
}

struct App<'a> {
  chart:  &'a Chart,
  config: RenderConfig,
  stale:  bool,
  render: Option<Render>,

  init:  Option<Init>,
  error: Option<RenderError>,
}

// Fields drop in order, so the surface goes before the window it draws to.
struct Init {
  surface: wgpu::Surface<'static>,
  config:  wgpu::SurfaceConfiguration,
  handle:  GpuHandle,

  blit:   wgpu::util::TextureBlitter,
  vello:  vello::Renderer,
  window: Arc<Window>,
}

impl App<'_> {
  fn init(&self, event_loop: &ActiveEventLoop) -> Result<Init, RenderError> {
    let title = self.chart.config().options.title.as_deref().unwrap_or("pieplot");
    let window = Arc::new(
      event_loop.create_window(
        Window::default_attributes()
          .with_title(title)
          .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
          .with_min_inner_size(LogicalSize::new(100, 100)),
      )?,
    );
    let size = window.inner_size();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let surface = instance.create_surface(window.clone())?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
      compatible_surface: Some(&surface),
      ..Default::default()
    }))?;

    // vello writes sRGB-encoded values, so blitting onto an sRGB surface would encode them twice.
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
      .formats
      .iter()
      .copied()
      .find(|f| !f.is_srgb())
      .or_else(|| surface_caps.formats.first().copied())
      .ok_or(RenderError::SurfaceFormat)?;

    let render_config = RenderConfig { width: size.width.max(1), height: size.height.max(1) };
    let handle = GpuHandle::new(&render_config, Some(adapter))?;

    let config = wgpu::SurfaceConfiguration {
      usage:                         wgpu::TextureUsages::RENDER_ATTACHMENT
        | wgpu::TextureUsages::COPY_DST,
      format:                        surface_format,
      width:                         render_config.width,
      height:                        render_config.height,
      present_mode:                  wgpu::PresentMode::AutoNoVsync,
      alpha_mode:                    surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto),
      view_formats:                  vec![],
      desired_maximum_frame_latency: 2,
    };
    surface.configure(&handle.device, &config);

    let vello = vello::Renderer::new(&handle.device, vello::RendererOptions::default())?;
    let blit = wgpu::util::TextureBlitter::new(&handle.device, config.format);

    Ok(Init { surface, config, handle, blit, vello, window })
  }
}

impl ApplicationHandler for App<'_> {
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.init.is_some() {
      return;
    }

    match self.init(event_loop) {
      Ok(init) => {
        init.window.request_redraw();
        self.init = Some(init);
      }
      Err(err) => {
        log::error!("unable to open chart window: {err}");
        self.error = Some(err);
        event_loop.exit();
      }
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
    match event {
      WindowEvent::CloseRequested => {
        event_loop.exit();
      }

      WindowEvent::KeyboardInput {
        event: KeyEvent { logical_key: Key::Character(c), .. }, ..
      } if c == "q" => {
        event_loop.exit();
      }

      WindowEvent::Resized(new_size) => {
        if let Some(init) = &mut self.init
          && new_size.width > 0
          && new_size.height > 0
        {
          let config = RenderConfig { width: new_size.width, height: new_size.height };
          if init.handle.resize(&config).log_err().is_none() {
            return;
          }

          init.config.width = config.width;
          init.config.height = config.height;
          init.surface.configure(&init.handle.device, &init.config);

          self.stale = true;
          init.window.request_redraw();
        }
      }

      WindowEvent::RedrawRequested => {
        let Some(init) = &mut self.init else { return };

        if self.stale {
          let config = RenderConfig { width: init.config.width, height: init.config.height };
          let render = self.render.get_or_insert_with(Render::new);
          render.scene.reset();
          self.chart.draw(render, config);
          self.stale =
            still_stale(render.render_to_texture(&mut init.vello, &init.handle, &config));
        }
        init.redraw();
      }

      _ => (),
    }
  }
}

impl Init {
  fn redraw(&mut self) {
    let frame = match self.surface.get_current_texture() {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost) => {
        self.surface.configure(&self.handle.device, &self.config);
        return;
      }
      Err(e) => {
        log::warn!("dropped frame: {e:?}");
        return;
      }
    };

    let surface_view = &frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = self
      .handle
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

    self.blit.copy(&self.handle.device, &mut encoder, &self.handle.view, surface_view);

    self.handle.queue.submit(std::iter::once(encoder.finish()));

    self.window.pre_present_notify();
    frame.present();
  }
}

/// A failed render leaves the texture stale so the next redraw retries it.
fn still_stale(rendered: Result<(), RenderError>) -> bool { rendered.log_err().is_none() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failed_render_is_retried() {
    assert!(still_stale(Err(RenderError::MapCancelled)));
    assert!(!still_stale(Ok(())));
  }
}
