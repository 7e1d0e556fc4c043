use std::{path::Path, sync::mpsc};

use image::{ImageBuffer, Rgba};
use vello::wgpu;

use crate::render::{GpuHandle, Render, RenderConfig, RenderError};

/// Renders `render` offscreen and writes it to `path` as an image.
pub fn save(render: &Render, config: RenderConfig, path: &Path) -> Result<(), RenderError> {
  let handle = GpuHandle::new(&config, None)?;
  let mut renderer = vello::Renderer::new(&handle.device, vello::RendererOptions::default())?;
  render.render_to_texture(&mut renderer, &handle, &config)?;

  let padded_row = config.padded_bytes_per_row();
  let buffer = handle.device.create_buffer(&wgpu::BufferDescriptor {
    label:              Some("Output Buffer"),
    size:               u64::from(padded_row) * u64::from(config.height),
    usage:              wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
    mapped_at_creation: false,
  });

  let mut encoder = handle.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
    label: Some("texture_buffer_copy_encoder"),
  });

  encoder.copy_texture_to_buffer(
    wgpu::TexelCopyTextureInfo {
      texture:   &handle.texture,
      mip_level: 0,
      origin:    wgpu::Origin3d::ZERO,
      aspect:    wgpu::TextureAspect::All,
    },
    wgpu::TexelCopyBufferInfo {
      buffer: &buffer,
      layout: wgpu::TexelCopyBufferLayout {
        offset:         0,
        bytes_per_row:  Some(padded_row),
        rows_per_image: Some(config.height),
      },
    },
    config.extent_3d(),
  );

  handle.queue.submit(std::iter::once(encoder.finish()));

  let buffer_slice = buffer.slice(..);
  let (sender, receiver) = mpsc::channel();
  buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
    let _ = sender.send(result);
  });
  handle.device.poll(wgpu::PollType::Wait)?;
  receiver.recv().map_err(|_| RenderError::MapCancelled)??;

  let row = 4 * config.width as usize;
  let mut pixels = Vec::with_capacity(row * config.height as usize);
  {
    let data = buffer_slice.get_mapped_range();
    for chunk in data.chunks(padded_row as usize) {
      pixels.extend_from_slice(&chunk[..row]);
    }
  }
  buffer.unmap();

  let image = ImageBuffer::<Rgba<u8>, _>::from_raw(config.width, config.height, pixels)
    .ok_or(RenderError::ImageSize(config.width, config.height))?;
  image.save(path)?;

  log::info!("saved {}x{} chart to {}", config.width, config.height, path.display());
  Ok(())
}
