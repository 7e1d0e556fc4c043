use color::{HueDirection, Oklab, Oklch, OpaqueColor, Srgb};

use crate::Color;

/// Maps a color point in `[0, 1]` to a color.
///
/// Any `Fn(f64) -> C` is a color scale, so plain closures can be handed to
/// [`interpolate_colors`] directly.
pub trait ColorScale {
  type Color;

  fn color_at(&self, point: f64) -> Self::Color;
}

impl<C, F: Fn(f64) -> C> ColorScale for F {
  type Color = C;

  fn color_at(&self, point: f64) -> C { self(point) }
}

/// The part of a color scale a palette is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRangeInfo {
  pub color_start:      f64,
  pub color_end:        f64,
  pub use_end_as_start: bool,
}

impl Default for ColorRangeInfo {
  fn default() -> Self { ColorRangeInfo::new(0.0, 1.0) }
}

impl ColorRangeInfo {
  pub const fn new(color_start: f64, color_end: f64) -> Self {
    ColorRangeInfo { color_start, color_end, use_end_as_start: false }
  }

  /// Walk the range from `color_end` down to `color_start` instead.
  pub const fn reversed(self) -> Self { ColorRangeInfo { use_end_as_start: true, ..self } }

  pub const fn range(&self) -> f64 { self.color_end - self.color_start }
}

/// Evenly spaced color points, one per data point.
///
/// The first point is `color_start` (or `color_end` when reversed), and each
/// following point moves by `range / data_length` towards the other end. The
/// far end itself is never produced.
pub fn color_points(data_length: usize, color_range: &ColorRangeInfo) -> ColorPoints {
  if data_length == 0 {
    return ColorPoints { start: color_range.color_start, step: 0.0, index: 0, len: 0 };
  }

  let interval_size = color_range.range() / data_length as f64;
  if color_range.use_end_as_start {
    ColorPoints { start: color_range.color_end, step: -interval_size, index: 0, len: data_length }
  } else {
    ColorPoints { start: color_range.color_start, step: interval_size, index: 0, len: data_length }
  }
}

/// Samples `color_scale` once per data point, in index order.
pub fn interpolate_colors<S: ColorScale + ?Sized>(
  data_length: usize,
  color_scale: &S,
  color_range: &ColorRangeInfo,
) -> Vec<S::Color> {
  color_points(data_length, color_range).map(|point| color_scale.color_at(point)).collect()
}

pub struct ColorPoints {
  start: f64,
  step:  f64,
  index: usize,
  len:   usize,
}

impl Iterator for ColorPoints {
  type Item = f64;

  fn next(&mut self) -> Option<f64> {
    if self.index < self.len {
      let point = self.start + self.index as f64 * self.step;
      self.index += 1;
      Some(point)
    } else {
      None
    }
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = self.len - self.index;
    (remaining, Some(remaining))
  }
}

impl ExactSizeIterator for ColorPoints {}

pub struct LinearPalette {
  start: OpaqueColor<Oklch>,
  end:   OpaqueColor<Oklch>,
}

pub const ROCKET: LinearPalette =
  LinearPalette::new(OpaqueColor::new([0.7, 0.13, 50.0]), OpaqueColor::new([0.7, 0.13, 290.0]));
pub const OCEAN: LinearPalette =
  LinearPalette::new(OpaqueColor::new([0.85, 0.1, 180.0]), OpaqueColor::new([0.4, 0.15, 265.0]));
pub const SUNSET: LinearPalette =
  LinearPalette::new(OpaqueColor::new([0.9, 0.15, 95.0]), OpaqueColor::new([0.5, 0.2, 0.0]));

impl LinearPalette {
  pub const fn new(start: OpaqueColor<Oklch>, end: OpaqueColor<Oklch>) -> Self {
    Self { start, end }
  }

  pub fn sample(&self, t: f32) -> OpaqueColor<Oklch> {
    let t = t.clamp(0.0, 1.0);
    self.start.lerp(self.end, t, HueDirection::Shorter)
  }
}

impl ColorScale for LinearPalette {
  type Color = Color;

  fn color_at(&self, point: f64) -> Color {
    self.sample(point as f32).convert::<Srgb>().with_alpha(1.0)
  }
}

/// Piecewise palette through evenly spaced sRGB stops, blended in Oklab.
pub struct Gradient {
  stops: &'static [OpaqueColor<Srgb>],
}

const fn rgb8(r: u8, g: u8, b: u8) -> OpaqueColor<Srgb> {
  OpaqueColor::new([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

pub const VIRIDIS: Gradient = Gradient::new(&[
  rgb8(68, 1, 84),
  rgb8(59, 82, 139),
  rgb8(33, 145, 140),
  rgb8(94, 201, 98),
  rgb8(253, 231, 37),
]);
pub const INFERNO: Gradient = Gradient::new(&[
  rgb8(0, 0, 4),
  rgb8(66, 10, 104),
  rgb8(147, 38, 103),
  rgb8(221, 81, 58),
  rgb8(252, 165, 10),
  rgb8(252, 255, 164),
]);
pub const MAGMA: Gradient = Gradient::new(&[
  rgb8(0, 0, 4),
  rgb8(59, 15, 112),
  rgb8(140, 41, 129),
  rgb8(222, 73, 104),
  rgb8(254, 159, 109),
  rgb8(252, 253, 191),
]);
pub const COOL: Gradient =
  Gradient::new(&[rgb8(110, 64, 170), rgb8(65, 125, 224), rgb8(29, 223, 163), rgb8(175, 240, 91)]);
pub const WARM: Gradient =
  Gradient::new(&[rgb8(110, 64, 170), rgb8(238, 67, 149), rgb8(255, 140, 56), rgb8(175, 240, 91)]);

impl Gradient {
  /// Panics if `stops` is empty, which fails the build for a `const` gradient.
  pub const fn new(stops: &'static [OpaqueColor<Srgb>]) -> Self {
    assert!(!stops.is_empty(), "a gradient needs at least one stop");
    Gradient { stops }
  }

  pub fn sample(&self, t: f32) -> OpaqueColor<Srgb> {
    let t = t.clamp(0.0, 1.0);
    let segments = self.stops.len() - 1;
    if segments == 0 {
      return self.stops[0];
    }

    let scaled = t * segments as f32;
    let index = (scaled as usize).min(segments - 1);
    let from = self.stops[index].convert::<Oklab>();
    let to = self.stops[index + 1].convert::<Oklab>();
    from.lerp(to, scaled - index as f32, HueDirection::Shorter).convert::<Srgb>()
  }
}

impl ColorScale for Gradient {
  type Color = Color;

  fn color_at(&self, point: f64) -> Color { self.sample(point as f32).with_alpha(1.0) }
}
