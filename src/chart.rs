//! Visualizer stage: bar chart over the first two numeric columns

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::model::Table;

/// Numeric columns charted at most
pub const MAX_SERIES: usize = 2;

const COLORS: [&str; MAX_SERIES] = ["#4e79a7", "#f28e2b"];
const BAR_CHARS: [char; MAX_SERIES] = ['█', '▒'];

/// One charted column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// One value per row; missing cells have no bar
    pub values: Vec<Option<f64>>,
}

/// Grouped bar chart: one group per row, x = row index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub series: Vec<Series>,
}

/// Build a chart from the first numeric columns of `table`.
///
/// Returns `None` when the table has no numeric column.
pub fn bar_chart(table: &Table) -> Option<BarChart> {
    let series: Vec<Series> = table
        .numeric_columns()
        .into_iter()
        .take(MAX_SERIES)
        .map(|idx| Series {
            name: table.columns[idx].name.clone(),
            values: table.column_values(idx).map(|c| c.as_f64()).collect(),
        })
        .collect();

    if series.is_empty() {
        None
    } else {
        Some(BarChart { series })
    }
}

impl BarChart {
    /// Number of bar groups
    pub fn group_count(&self) -> usize {
        self.series.first().map(|s| s.values.len()).unwrap_or(0)
    }

    /// Lowest and highest plotted value, always spanning zero
    fn bounds(&self) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Horizontal text bars, `width` characters for the largest magnitude
    pub fn write_text(&self, writer: &mut dyn Write, width: usize) -> Result<()> {
        let (lo, hi) = self.bounds();
        let scale = lo.abs().max(hi);

        let legend: Vec<String> = self
            .series
            .iter()
            .zip(BAR_CHARS)
            .map(|(s, ch)| format!("{} {}", ch, s.name))
            .collect();
        writeln!(writer, "  {}", legend.join("   "))?;

        let label_width = self.group_count().saturating_sub(1).to_string().len();
        for row in 0..self.group_count() {
            for (i, (series, ch)) in self.series.iter().zip(BAR_CHARS).enumerate() {
                let label = if i == 0 {
                    format!("{:>w$}", row, w = label_width)
                } else {
                    " ".repeat(label_width)
                };
                match series.values[row] {
                    Some(v) => {
                        let len = if scale > 0.0 {
                            ((v.abs() / scale) * width as f64).round() as usize
                        } else {
                            0
                        };
                        let sign = if v < 0.0 { "-" } else { "" };
                        writeln!(
                            writer,
                            "  {} │{}{} {}",
                            label,
                            sign,
                            ch.to_string().repeat(len),
                            v
                        )?;
                    }
                    None => writeln!(writer, "  {} │", label)?,
                }
            }
        }
        Ok(())
    }

    /// Standalone SVG document
    pub fn write_svg(&self, writer: &mut dyn Write) -> Result<()> {
        const HEIGHT: f64 = 240.0;
        const MARGIN: f64 = 30.0;
        const BAR_WIDTH: f64 = 12.0;
        const GAP: f64 = 8.0;

        let groups = self.group_count();
        let group_width = BAR_WIDTH * self.series.len() as f64 + GAP;
        let width = MARGIN * 2.0 + group_width * groups.max(1) as f64;
        let plot_height = HEIGHT - MARGIN * 2.0;

        let (lo, hi) = self.bounds();
        let span = if hi - lo > 0.0 { hi - lo } else { 1.0 };
        let y_of = |v: f64| MARGIN + (hi - v) / span * plot_height;
        let zero_y = y_of(0.0);

        writeln!(
            writer,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = width,
            h = HEIGHT
        )?;
        writeln!(writer, "  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>")?;

        for (i, (series, color)) in self.series.iter().zip(COLORS).enumerate() {
            writeln!(
                writer,
                "  <text x=\"{}\" y=\"16\" font-size=\"11\" fill=\"{}\">{}</text>",
                MARGIN + i as f64 * 120.0,
                color,
                xml_escape(&series.name)
            )?;
        }

        for row in 0..groups {
            let group_x = MARGIN + row as f64 * group_width;
            for (i, (series, color)) in self.series.iter().zip(COLORS).enumerate() {
                let Some(v) = series.values[row] else {
                    continue;
                };
                let y = y_of(v).min(zero_y);
                let h = (y_of(v) - zero_y).abs();
                writeln!(
                    writer,
                    "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{}\" height=\"{:.1}\" fill=\"{}\"><title>{}: {}</title></rect>",
                    group_x + i as f64 * BAR_WIDTH,
                    y,
                    BAR_WIDTH,
                    h,
                    color,
                    xml_escape(&series.name),
                    v
                )?;
            }
            writeln!(
                writer,
                "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\">{}</text>",
                group_x,
                HEIGHT - MARGIN / 2.0,
                row
            )?;
        }

        writeln!(
            writer,
            "  <line x1=\"{m}\" y1=\"{z:.1}\" x2=\"{x2}\" y2=\"{z:.1}\" stroke=\"#333\"/>",
            m = MARGIN,
            z = zero_y,
            x2 = width - MARGIN
        )?;
        writeln!(writer, "</svg>")?;
        Ok(())
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    fn table() -> Table {
        let mut t = Table::new(vec![
            Column::new("name", 0),
            Column::new("a", 1),
            Column::new("b", 2),
            Column::new("c", 3),
        ]);
        t.add_row(vec!["x".into(), 1i64.into(), 2.5f64.into(), 9i64.into()], 2);
        t.add_row(vec!["y".into(), CellValue::Null, 4i64.into(), 9i64.into()], 3);
        t.infer_column_types();
        t
    }

    #[test]
    fn test_takes_first_two_numeric_columns() {
        let chart = bar_chart(&table()).unwrap();
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(chart.series[0].values, vec![Some(1.0), None]);
        assert_eq!(chart.group_count(), 2);
    }

    #[test]
    fn test_single_numeric_column() {
        let mut t = Table::new(vec![Column::new("name", 0), Column::new("n", 1)]);
        t.add_row(vec!["x".into(), 3i64.into()], 2);
        t.infer_column_types();
        assert_eq!(bar_chart(&t).unwrap().series.len(), 1);
    }

    #[test]
    fn test_no_numeric_columns_suppresses_chart() {
        let mut t = Table::new(vec![Column::new("name", 0)]);
        t.add_row(vec!["x".into()], 2);
        t.infer_column_types();
        assert!(bar_chart(&t).is_none());
    }

    #[test]
    fn test_renderers() {
        let chart = bar_chart(&table()).unwrap();

        let mut text = Vec::new();
        chart.write_text(&mut text, 20).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("█ a"));
        assert!(text.contains(&"▒".repeat(20)));

        let mut svg = Vec::new();
        chart.write_svg(&mut svg).unwrap();
        let svg = String::from_utf8(svg).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect x=").count(), 3);
    }
}
