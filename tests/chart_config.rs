// Purpose: Build pie and doughnut configs from polars columns.

use pieplot::{
  ChartConfig, ChartData, ChartKind, Color, ColorRangeInfo, Dataset, interpolate_colors, palette,
};
use polars::prelude::*;

#[test]
fn tallied_column_feeds_a_pie() -> PolarsResult<()> {
  let df = df! {
    "name" => &["Saman", "Kecak", "Angklung", "Rendang", "Gamelan"],
    "type" => &["Tari", "Tari", "Musik", "Makanan", "Musik"],
  }?;

  let data = ChartData::tally(df.column("type")?)?;
  let config = ChartConfig::pie(&data, &palette::VIRIDIS, &ColorRangeInfo::default());

  assert_eq!(config.kind, ChartKind::Pie);
  assert_eq!(config.data.labels, vec!["Tari", "Musik", "Makanan"]);
  assert_eq!(config.data.datasets[0].data, vec![2.0, 2.0, 1.0]);
  assert_eq!(config.data.datasets[0].background_color.len(), 3);

  Ok(())
}

#[test]
fn columns_feed_a_doughnut() -> PolarsResult<()> {
  let df = df! {
    "label" => &["A", "B", "C", "D"],
    "value" => &[10, 20, 15, 25],
  }?;

  let data = ChartData::from_columns(df.column("label")?, df.column("value")?)?;
  let range = ColorRangeInfo::new(0.0, 1.0).reversed();
  let config = ChartConfig::doughnut(&data, &palette::ROCKET, &range);

  assert_eq!(config.kind, ChartKind::Doughnut);
  assert_eq!(
    config.data.datasets[0].background_color,
    interpolate_colors(4, &palette::ROCKET, &range)
  );

  Ok(())
}

#[test]
fn empty_data_gives_empty_palette() {
  let config = ChartConfig::pie(&ChartData::default(), &palette::COOL, &ColorRangeInfo::default());
  assert!(config.data.labels.is_empty());
  assert!(config.data.datasets[0].background_color.is_empty());
}

#[test]
fn datasets_default_to_white_borders() {
  let dataset = Dataset::new(vec![1.0], vec![Color::BLACK]);
  assert_eq!(dataset.border_color, Color::WHITE);
  assert_eq!(dataset.border_width, 2.0);
}
