//! Interactive display as a terminal bar chart.

use console::{Term, style};

use crate::{ChartData, ChartError};

/// Columns used by a 100% bar.
const FULL_WIDTH: f64 = 40.0;

/// Renders the chart as text lines, one bar per category.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render(data: &ChartData) -> String {
    let label_width = data
        .bars
        .iter()
        .map(|(c, _)| c.chart_label().len())
        .max()
        .unwrap_or(0);

    let mut out = format!("{}\n", style(data.title()).bold());
    for (category, value) in &data.bars {
        let cells = (value.clamp(0.0, 100.0) / 100.0 * FULL_WIDTH).round() as usize;
        let bar = "█".repeat(cells);
        let padding = " ".repeat(FULL_WIDTH as usize - cells);
        out.push_str(&format!(
            "  {:<label_width$}  {}{padding} {value:>5.1}%\n",
            category.chart_label(),
            style(bar).green(),
        ));
    }
    out
}

/// Writes the chart to standard output.
///
/// # Errors
///
/// Returns [`ChartError::Io`] if writing to the terminal fails.
pub fn display(data: &ChartData) -> Result<(), ChartError> {
    Term::stdout().write_str(&render(data))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::row;

    #[test]
    fn one_line_per_category_after_title() {
        let data = ChartData::from_row(&row("00530", Some(25.0), None, Some(62.5)));

        let text = render(&data);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Land use percentages in Kallio"));
        assert!(lines[1].contains("Green area"));
        assert!(lines[1].contains("25.0%"));
        assert!(lines[2].contains("Industrial area"));
        assert!(lines[2].contains(" 0.0%"));
        assert!(lines[3].contains("Other land use"));
        assert!(lines[3].contains("62.5%"));
    }

    #[test]
    fn bar_length_scales_with_value() {
        let data = ChartData::from_row(&row("00530", Some(50.0), Some(0.0), Some(100.0)));

        let text = render(&data);
        let blocks: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|line| line.chars().filter(|c| *c == '█').count())
            .collect();

        assert_eq!(blocks, vec![20, 0, 40]);
    }
}
