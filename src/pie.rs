use std::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{CircleSegment, Point};

/// Angular extent of one pie slice, in radians.
///
/// Angles follow screen coordinates, so a positive sweep runs clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
  pub start_angle: f64,
  pub sweep_angle: f64,
}

impl Slice {
  pub fn end_angle(&self) -> f64 { self.start_angle + self.sweep_angle }

  pub fn wedge(&self, center: Point, outer_radius: f64, inner_radius: f64) -> CircleSegment {
    CircleSegment::new(center, outer_radius, inner_radius, self.start_angle, self.sweep_angle)
  }
}

fn weight(value: f64) -> f64 { if value.is_finite() && value > 0.0 { value } else { 0.0 } }

/// Splits a full turn among `values`, starting at the top.
///
/// Negative and non-finite values get an empty slice. If nothing is left to
/// share, every slice is empty.
pub fn slices(values: &[f64]) -> Vec<Slice> {
  let total: f64 = values.iter().copied().map(weight).sum();
  let mut angle = -FRAC_PI_2;

  values
    .iter()
    .map(|&value| {
      let sweep_angle = if total > 0.0 { weight(value) / total * TAU } else { 0.0 };
      let slice = Slice { start_angle: angle, sweep_angle };
      angle += sweep_angle;
      slice
    })
    .collect()
}

/// Outer and inner radius of each dataset ring, outermost first.
///
/// The annulus between `radius * cutout` and `radius` is shared evenly.
pub fn rings(count: usize, radius: f64, cutout: f64) -> Vec<(f64, f64)> {
  if count == 0 {
    return vec![];
  }

  let hole = radius * cutout.clamp(0.0, 1.0);
  let width = (radius - hole) / count as f64;
  (0..count)
    .map(|i| {
      let outer = radius - i as f64 * width;
      (outer, outer - width)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slices_cover_full_turn() {
    let slices = slices(&[10.0, 20.0, 15.0, 25.0]);
    let total: f64 = slices.iter().map(|s| s.sweep_angle).sum();

    assert!((total - TAU).abs() < 1e-9);
    assert_eq!(slices[0].start_angle, -FRAC_PI_2);
    for pair in slices.windows(2) {
      assert!((pair[0].end_angle() - pair[1].start_angle).abs() < 1e-12);
    }
  }

  #[test]
  fn slices_are_proportional() {
    let slices = slices(&[1.0, 3.0]);
    assert!((slices[0].sweep_angle - TAU / 4.0).abs() < 1e-12);
    assert!((slices[1].sweep_angle - TAU * 3.0 / 4.0).abs() < 1e-12);
  }

  #[test]
  fn bad_values_get_empty_slices() {
    let slices = slices(&[2.0, -1.0, f64::NAN, f64::INFINITY, 2.0]);
    assert_eq!(slices[1].sweep_angle, 0.0);
    assert_eq!(slices[2].sweep_angle, 0.0);
    assert_eq!(slices[3].sweep_angle, 0.0);
    assert!((slices[4].sweep_angle - TAU / 2.0).abs() < 1e-12);
  }

  #[test]
  fn zero_total_gives_empty_slices() {
    assert!(slices(&[0.0, 0.0]).iter().all(|s| s.sweep_angle == 0.0));
    assert!(slices(&[]).is_empty());
  }

  #[test]
  fn rings_share_the_annulus() {
    assert_eq!(rings(1, 100.0, 0.0), vec![(100.0, 0.0)]);
    assert_eq!(rings(2, 100.0, 0.5), vec![(100.0, 75.0), (75.0, 50.0)]);
    assert!(rings(0, 100.0, 0.5).is_empty());
  }
}
