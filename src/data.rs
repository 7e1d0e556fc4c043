use std::collections::HashMap;

use polars::prelude::*;

use crate::ResultExt;

/// Labels and values for a single chart dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
  pub labels: Vec<String>,
  pub data:   Vec<f64>,
}

impl ChartData {
  pub fn new(labels: impl IntoIterator<Item = impl Into<String>>, data: Vec<f64>) -> Self {
    ChartData { labels: labels.into_iter().map(Into::into).collect(), data }
  }

  /// Pairs a label column with a numeric value column.
  ///
  /// Null labels become empty strings and null values become `0.0`.
  pub fn from_columns(labels: &Column, values: &Column) -> PolarsResult<Self> {
    if labels.len() != values.len() {
      return Err(PolarsError::ShapeMismatch(
        format!(
          "chart labels have {} rows but values have {} rows",
          labels.len(),
          values.len()
        )
        .into(),
      ));
    }

    let labels = labels.cast(&DataType::String)?;
    let values = values.cast(&DataType::Float64)?;

    Ok(ChartData {
      labels: labels
        .as_materialized_series()
        .str()?
        .iter()
        .map(|label| label.unwrap_or_default().to_string())
        .collect(),
      data:   values
        .as_materialized_series()
        .f64()?
        .iter()
        .map(|value| value.unwrap_or(0.0))
        .collect(),
    })
  }

  /// Counts how often each distinct value occurs in `column`.
  ///
  /// Labels come out in the order they are first seen. Nulls are skipped.
  pub fn tally(column: &Column) -> PolarsResult<Self> {
    let column = column.cast(&DataType::String)?;
    let mut index = HashMap::<&str, usize>::new();
    let mut chart = ChartData::default();

    for value in column.as_materialized_series().str()?.iter() {
      let Some(value) = value else {
        log::debug!("skipping null while tallying `{}`", column.name());
        continue;
      };

      match index.get(value) {
        Some(&i) => chart.data[i] += 1.0,
        None => {
          index.insert(value, chart.labels.len());
          chart.labels.push(value.to_string());
          chart.data.push(1.0);
        }
      }
    }

    Ok(chart)
  }

  /// Like [`ChartData::tally`], logging and returning an empty chart on failure.
  pub fn tally_or_empty(column: &Column) -> Self {
    ChartData::tally(column).log_err().unwrap_or_default()
  }

  pub fn len(&self) -> usize { self.data.len() }
  pub fn is_empty(&self) -> bool { self.data.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tally_keeps_first_seen_order() {
    let column = Column::new("type".into(), ["Tari", "Musik", "Tari", "Makanan", "Tari", "Musik"]);
    let chart = ChartData::tally(&column).unwrap();

    assert_eq!(chart.labels, vec!["Tari", "Musik", "Makanan"]);
    assert_eq!(chart.data, vec![3.0, 2.0, 1.0]);
  }

  #[test]
  fn tally_skips_nulls() {
    let column = Column::new("prov".into(), [Some("Bali"), None, Some("Bali"), Some("Aceh")]);
    let chart = ChartData::tally(&column).unwrap();

    assert_eq!(chart.labels, vec!["Bali", "Aceh"]);
    assert_eq!(chart.data, vec![2.0, 1.0]);
  }

  #[test]
  fn from_columns_casts_values() {
    let labels = Column::new("label".into(), ["A", "B", "C"]);
    let values = Column::new("value".into(), [10i64, 20, 15]);
    let chart = ChartData::from_columns(&labels, &values).unwrap();

    assert_eq!(chart.labels, vec!["A", "B", "C"]);
    assert_eq!(chart.data, vec![10.0, 20.0, 15.0]);
  }

  #[test]
  fn from_columns_rejects_mismatched_lengths() {
    let labels = Column::new("label".into(), ["A", "B"]);
    let values = Column::new("value".into(), [1.0]);
    assert!(ChartData::from_columns(&labels, &values).is_err());
  }
}
