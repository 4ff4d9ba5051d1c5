use std::path::Path;

use crate::chart::MonthChart;
use crate::Result;

/// Padding token between columns in the inline chat rendering.
const ALIGN_GAP: &str = "    ";

/// Write the header plus all kept rows as a comma-delimited file.
pub fn write_month_csv(chart: &MonthChart, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&chart.header)?;
    for row in &chart.rows {
        let mut record = Vec::with_capacity(1 + row.values.len());
        record.push(row.date.as_str());
        record.extend(row.values.iter().map(String::as_str));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// The same rows re-rendered for inline display, columns separated by a
/// fixed-width gap instead of commas.
pub fn render_aligned(chart: &MonthChart) -> String {
    let mut lines = Vec::with_capacity(1 + chart.rows.len());
    lines.push(chart.header.join(ALIGN_GAP));
    for row in &chart.rows {
        let mut line = row.date.clone();
        for value in &row.values {
            line.push_str(ALIGN_GAP);
            line.push_str(value);
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartRow;

    fn sample() -> MonthChart {
        MonthChart {
            header: vec!["Date".into(), "DESAWAR".into(), "GALI".into()],
            rows: vec![
                ChartRow {
                    date: "01".into(),
                    values: vec!["12".into(), "78".into()],
                },
                ChartRow {
                    date: "02".into(),
                    values: vec!["90".into(), "33".into()],
                },
            ],
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.csv");
        write_month_csv(&sample(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Date,DESAWAR,GALI\n01,12,78\n02,90,33\n");
    }

    #[test]
    fn aligned_rendering_uses_fixed_gap() {
        let text = render_aligned(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date    DESAWAR    GALI");
        assert_eq!(lines[1], "01    12    78");
        assert_eq!(lines.len(), 3);
    }
}
