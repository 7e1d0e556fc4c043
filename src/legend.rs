use kurbo::{Affine, Point, Rect, RoundedRect, Size, Stroke, Vec2};
use peniko::Brush;

use crate::{
  Chart, Color,
  render::{Align, DrawText, Render},
};

struct LegendItem<'a> {
  label: &'a str,
  color: Color,
}

const PADDING: f64 = 10.0;
const FONT_SIZE: f32 = 16.0;
const LINE_HEIGHT: f64 = 24.0;
const SWATCH: f64 = 14.0;
const SWATCH_GAP: f64 = 8.0;

impl Chart {
  /// One item per label of the outermost ring, as long as it has a value.
  fn legend_items(&self) -> Vec<LegendItem<'_>> {
    let config = self.config();
    let Some(dataset) = config.data.datasets.first() else { return vec![] };

    config
      .data
      .labels
      .iter()
      .take(dataset.data.len())
      .enumerate()
      .map(|(i, label)| LegendItem { label, color: dataset.color(i) })
      .collect()
  }

  /// Draws the legend against the right edge of `viewport`, and returns the
  /// box it takes up.
  pub(crate) fn draw_legend(&self, render: &mut Render, viewport: Rect) -> Option<Rect> {
    let items = self.legend_items();
    if items.is_empty() {
      return None;
    }

    let mut inner_width = 0.0_f64;
    let mut layouts = vec![];
    for item in &items {
      let text = DrawText {
        text: item.label,
        size: FONT_SIZE,
        brush: Brush::Solid(Color::from_rgb8(32, 32, 32)),
        vertical_align: Align::Center,
        ..Default::default()
      };
      let layout = render.layout_text(&text);
      inner_width = inner_width.max(f64::from(layout.width()));
      layouts.push((layout, text));
    }

    inner_width += SWATCH + SWATCH_GAP;
    let inner_height = items.len() as f64 * LINE_HEIGHT;

    let middle = viewport.center().y;
    let rect = Rect::new(
      viewport.x1 - inner_width - PADDING * 2.0,
      middle - inner_height / 2.0 - PADDING,
      viewport.x1,
      middle + inner_height / 2.0 + PADDING,
    );
    let background = RoundedRect::from_rect(rect, 5.0);
    render.fill(&background, Affine::IDENTITY, Color::from_rgba8(255, 255, 255, 200));
    render.stroke(
      &background,
      Affine::IDENTITY,
      Color::from_rgb8(128, 128, 128),
      &Stroke::new(1.0),
    );

    for (i, ((layout, mut text), item)) in layouts.into_iter().zip(&items).enumerate() {
      let pos = Point::new(
        rect.x0 + PADDING,
        rect.y0 + PADDING + i as f64 * LINE_HEIGHT + LINE_HEIGHT / 2.0,
      );

      let swatch =
        Rect::from_origin_size(pos - Vec2::new(0.0, SWATCH / 2.0), Size::new(SWATCH, SWATCH));
      render.fill(&swatch, Affine::IDENTITY, item.color);

      text.position = pos + Vec2::new(SWATCH + SWATCH_GAP, 0.0);
      render.draw_text_layout(layout, text);
    }

    Some(rect)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ChartConfig, ChartData, ColorRangeInfo, palette};

  const VIEWPORT: Rect = Rect::new(24.0, 24.0, 776.0, 576.0);

  fn chart(labels: &[&str], data: Vec<f64>) -> Chart {
    let data = ChartData::new(labels.iter().copied(), data);
    Chart::new(ChartConfig::pie(&data, &palette::VIRIDIS, &ColorRangeInfo::default()))
  }

  #[test]
  fn empty_data_has_no_legend() {
    let empty = chart(&[], vec![]);
    assert!(empty.draw_legend(&mut Render::new(), VIEWPORT).is_none());

    let labels_only = chart(&["a", "b"], vec![]);
    assert!(labels_only.draw_legend(&mut Render::new(), VIEWPORT).is_none());
  }

  #[test]
  fn legend_hugs_the_right_edge() {
    let chart = chart(&["a", "b", "c"], vec![1.0, 2.0, 3.0]);
    let rect = chart.draw_legend(&mut Render::new(), VIEWPORT).unwrap();

    assert_eq!(rect.x1, VIEWPORT.x1);
    assert!(rect.x0 < VIEWPORT.x1);
    assert_eq!(rect.center().y, VIEWPORT.center().y);
    assert_eq!(rect.height(), 3.0 * LINE_HEIGHT + 2.0 * PADDING);
  }

  #[test]
  fn entries_are_capped_by_values() {
    let chart = chart(&["a", "b", "c"], vec![1.0]);
    let items = chart.legend_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "a");

    let rect = chart.draw_legend(&mut Render::new(), VIEWPORT).unwrap();
    assert_eq!(rect.height(), LINE_HEIGHT + 2.0 * PADDING);
  }

  #[test]
  fn entries_are_capped_by_labels() {
    let chart = chart(&["a"], vec![1.0, 2.0, 3.0]);
    assert_eq!(chart.legend_items().len(), 1);
  }
}
