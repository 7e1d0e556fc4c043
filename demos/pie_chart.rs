use pieplot::{Chart, ChartConfig, ChartData, ColorRangeInfo, Surface, create_chart, palette};
use polars::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  env_logger::init();

  let df = df! {
    "name" => &["Saman", "Kecak", "Angklung", "Rendang", "Gamelan", "Pendet", "Sasando"],
    "type" => &["Tari", "Tari", "Musik", "Makanan", "Musik", "Tari", "Musik"],
    "prov" => &["Aceh", "Bali", "Jawa Barat", "Sumatera Barat", "Jawa Tengah", "Bali", "NTT"],
  }?;

  let by_type = ChartData::tally(df.column("type")?)?;
  create_chart(
    Surface::Image("by_type.png".as_ref()),
    &by_type,
    &palette::VIRIDIS,
    &ColorRangeInfo::new(0.2, 0.9),
  )?;

  let by_prov = ChartData::tally_or_empty(df.column("prov")?);
  let mut config =
    ChartConfig::doughnut(&by_prov, &palette::ROCKET, &ColorRangeInfo::default().reversed());
  config.title("Budaya by province");

  let mut chart = Chart::new(config);
  chart.size(800, 600).render_to(Surface::Window)?;

  Ok(())
}
