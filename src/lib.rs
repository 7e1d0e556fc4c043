//! Pie and doughnut charts colored from an interpolated palette.
//!
//! ```no_run
//! use pieplot::{ChartData, ColorRangeInfo, Surface, create_chart, palette};
//!
//! let data = ChartData::new(["Tari", "Musik", "Makanan"], vec![12.0, 7.0, 4.0]);
//! create_chart(
//!   Surface::Image("budaya.png".as_ref()),
//!   &data,
//!   &palette::VIRIDIS,
//!   &ColorRangeInfo::new(0.2, 0.9),
//! )?;
//! # Ok::<(), pieplot::RenderError>(())
//! ```

mod chart;
mod data;
mod legend;
pub mod palette;
pub mod pie;
mod render;

pub use chart::{
  Chart, ChartConfig, ChartConfigData, ChartKind, ChartOptions, Dataset, Surface, create_chart,
};
pub use data::ChartData;
pub use palette::{ColorRangeInfo, ColorScale, color_points, interpolate_colors};
pub use render::{RenderConfig, RenderError};

/// Colors handed to the renderer.
pub type Color = peniko::Color;

pub(crate) trait ResultExt<T> {
  /// Logs the error and discards it.
  fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
  fn log_err(self) -> Option<T> {
    match self {
      Ok(value) => Some(value),
      Err(err) => {
        log::error!("{err}");
        None
      }
    }
  }
}
