//! Plain-text table rendering for filtered results.

use crate::constants;
use serde_json::Value;

/// How column widths are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// Every column gets exactly `width` characters.
    Fixed { width: usize },
    /// Columns fit their content, shrinking wide columns to fit the terminal.
    Adaptive {
        min_width: usize,
        terminal_width: usize,
    },
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::adaptive(constants::DEFAULT_TERMINAL_WIDTH)
    }
}

impl TableLayout {
    #[must_use]
    pub const fn adaptive(terminal_width: usize) -> Self {
        Self::Adaptive {
            min_width: constants::MIN_COLUMN_WIDTH,
            terminal_width,
        }
    }

    /// Layout from the environment.
    ///
    /// `CLUSTER_CLI_TABLE_WIDTH` selects a fixed layout with that column
    /// width. Otherwise the layout is adaptive, sized from `COLUMNS` and
    /// falling back to 120 columns.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(constants::ENV_TABLE_WIDTH).ok().as_deref(),
            std::env::var(constants::ENV_COLUMNS).ok().as_deref(),
        )
    }

    fn from_values(column_width: Option<&str>, terminal_width: Option<&str>) -> Self {
        if let Some(width) = column_width.and_then(positive) {
            return Self::Fixed { width };
        }
        Self::adaptive(terminal_width.and_then(positive).unwrap_or(constants::DEFAULT_TERMINAL_WIDTH))
    }
}

fn positive(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|w| *w > 0)
}

/// Pads `value` to exactly `width` characters.
///
/// The cell starts with one space, then the value, then `fill_char` up to
/// `width`. A value fits when it leaves room for at least one trailing fill
/// character. Otherwise it is cut short and ends with a single ellipsis, so
/// the result is still exactly `width` characters long.
#[must_use]
pub fn fill(width: usize, value: &str, fill_char: char) -> String {
    let len = value.chars().count();
    let mut cell = String::with_capacity(width + 2);
    cell.push(' ');

    if len + 2 <= width {
        cell.push_str(value);
        cell.extend(std::iter::repeat(fill_char).take(width - len - 1));
    } else if width >= 2 {
        cell.extend(value.chars().take(width - 2));
        cell.push(constants::ELLIPSIS);
    } else {
        cell.truncate(width);
    }
    cell
}

/// Column names across all rows, in first-seen order.
///
/// Elements that are not objects contribute a single `value` column.
#[must_use]
pub fn collect_headers(results: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in results {
        match row {
            Value::Object(map) => {
                for key in map.keys() {
                    if !headers.iter().any(|h| h == key) {
                        headers.push(key.clone());
                    }
                }
            }
            _ => {
                if !headers.iter().any(|h| h == constants::VALUE_COLUMN) {
                    headers.push(constants::VALUE_COLUMN.to_string());
                }
            }
        }
    }
    headers
}

/// Renders rows with columns derived from the rows themselves.
#[must_use]
pub fn render_table(results: &[Value], layout: &TableLayout) -> String {
    let headers = collect_headers(results);
    render_table_with_headers(&headers, results, layout)
}

/// Renders rows under an explicit set of headers.
///
/// Output is the header line, a dash separator, one line per row, and a
/// trailing count line. Lines are joined with `\n` with no final newline.
#[must_use]
pub fn render_table_with_headers(
    headers: &[String],
    results: &[Value],
    layout: &TableLayout,
) -> String {
    let cells: Vec<Vec<String>> = results
        .iter()
        .map(|row| headers.iter().map(|h| cell_text(row, h)).collect())
        .collect();

    let widths = match *layout {
        TableLayout::Fixed { width } => vec![width; headers.len()],
        TableLayout::Adaptive {
            min_width,
            terminal_width,
        } => {
            let natural = natural_widths(headers, &cells, min_width);
            shrink_to_fit(natural, terminal_width, min_width)
        }
    };

    let mut lines = Vec::with_capacity(cells.len() + 3);
    if !headers.is_empty() {
        lines.push(render_line(&widths, headers));
        let total = widths.iter().sum::<usize>() + widths.len() - 1;
        lines.push("-".repeat(total));
        for row in &cells {
            lines.push(render_line(&widths, row));
        }
    }
    lines.push(count_line(results.len()));
    lines.join("\n")
}

fn render_line(widths: &[usize], values: &[String]) -> String {
    widths
        .iter()
        .zip(values)
        .map(|(width, value)| fill(*width, value, ' '))
        .collect::<Vec<_>>()
        .join(&constants::COLUMN_SEPARATOR.to_string())
}

fn count_line(count: usize) -> String {
    if count == 1 {
        "1 row".to_string()
    } else {
        format!("{count} rows")
    }
}

fn cell_text(row: &Value, header: &str) -> String {
    let value = match row {
        Value::Object(map) => map.get(header),
        other if header == constants::VALUE_COLUMN => Some(other),
        _ => None,
    };
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Widest value (or header) plus two characters of padding, at least `min_width`.
fn natural_widths(headers: &[String], cells: &[Vec<String>], min_width: usize) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let widest = cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            (widest + 2).max(min_width)
        })
        .collect()
}

/// Shrinks above-average columns so the table fits `terminal_width`.
///
/// The deficit is split evenly (integer division) across the columns wider
/// than the unweighted average. No column drops below `min_width`.
fn shrink_to_fit(mut widths: Vec<usize>, terminal_width: usize, min_width: usize) -> Vec<usize> {
    if widths.is_empty() {
        return widths;
    }

    let sum: usize = widths.iter().sum();
    let total = sum + widths.len();
    if total <= terminal_width {
        return widths;
    }

    let average = sum / widths.len();
    let wide = widths.iter().filter(|w| **w > average).count();
    if wide == 0 {
        return widths;
    }

    let per_column = (total - terminal_width) / wide;
    for width in widths.iter_mut().filter(|w| **w > average) {
        *width = width.saturating_sub(per_column).max(min_width);
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fill_pads_to_width() {
        let cell = fill(20, "some string", '-');
        assert_eq!(cell, " some string--------");
        assert_eq!(cell.chars().count(), 20);
    }

    #[test]
    fn test_fill_truncates_with_single_ellipsis() {
        let cell = fill(8, "a-very-long-hostname", ' ');
        assert_eq!(cell, " a-very…");
        assert_eq!(cell.chars().count(), 8);
        assert_eq!(cell.matches('…').count(), 1);
    }

    #[test]
    fn test_fill_keeps_trailing_padding() {
        assert_eq!(fill(6, "abcd", ' '), " abcd ");
        assert_eq!(fill(6, "abcd", '-'), " abcd-");
        assert_eq!(fill(6, "abcde", ' '), " abcd…");
        assert_eq!(fill(5, "abcde", ' '), " abc…");
    }

    #[test]
    fn test_headers_in_first_seen_order() {
        let rows = vec![json!({"id": 1, "host": "a"}), json!({"status": "up", "id": 2}), json!(7)];
        assert_eq!(collect_headers(&rows), vec!["id", "host", "status", "value"]);
    }

    #[test]
    fn test_missing_and_null_cells_are_blank() {
        let rows = vec![json!({"id": "a", "host": null}), json!({"id": "b"})];
        let table = render_table(&rows, &TableLayout::Fixed { width: 6 });
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], " id   | host ");
        assert_eq!(lines[2], " a    |      ");
        assert_eq!(lines[3], " b    |      ");
        assert_eq!(lines[4], "2 rows");
    }

    #[test]
    fn test_fixed_width_scenario() {
        let rows = vec![json!({"id": "server3", "host": "10.1.1.1", "status": "online", "pid": 63340})];
        let headers: Vec<String> = ["id", "host", "status", "pid"].map(String::from).to_vec();
        let table = render_table_with_headers(&headers, &rows, &TableLayout::Fixed { width: 20 });
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            format!("{}|{}|{}|{}", fill(20, "id", ' '), fill(20, "host", ' '), fill(20, "status", ' '), fill(20, "pid", ' '))
        );
        assert_eq!(lines[1], "-".repeat(20 * 4 + 3));
        assert_eq!(
            lines[2],
            format!(
                "{}|{}|{}|{}",
                fill(20, "server3", ' '),
                fill(20, "10.1.1.1", ' '),
                fill(20, "online", ' '),
                fill(20, "63340", ' ')
            )
        );
        assert_eq!(lines[3], "1 row");
    }

    #[test]
    fn test_adaptive_widths_fit_content() {
        let rows = vec![json!({"id": "server3", "pid": 1})];
        let table = render_table(&rows, &TableLayout::adaptive(120));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], " id      | pid ");
        assert_eq!(lines[2], " server3 | 1   ");
    }

    #[test]
    fn test_shrink_only_above_average_columns() {
        // sum 60, total 63 > 40, average 20: only the 40-wide column shrinks by 23.
        let widths = shrink_to_fit(vec![10, 10, 40], 40, 5);
        assert_eq!(widths, vec![10, 10, 17]);
    }

    #[test]
    fn test_shrink_splits_deficit_evenly() {
        // sum 80, total 84 > 60, average 20: deficit 24 split across two columns.
        let widths = shrink_to_fit(vec![5, 5, 35, 35], 60, 5);
        assert_eq!(widths, vec![5, 5, 23, 23]);
    }

    #[test]
    fn test_shrink_never_below_minimum() {
        let widths = shrink_to_fit(vec![6, 6, 30], 10, 5);
        assert_eq!(widths, vec![6, 6, 5]);
    }

    #[test]
    fn test_no_shrink_when_table_fits() {
        assert_eq!(shrink_to_fit(vec![10, 12], 40, 5), vec![10, 12]);
    }

    #[test]
    fn test_layout_from_environment_values() {
        assert_eq!(
            TableLayout::from_values(Some("20"), Some("80")),
            TableLayout::Fixed { width: 20 }
        );
        assert_eq!(TableLayout::from_values(None, Some("80")), TableLayout::adaptive(80));
        assert_eq!(TableLayout::from_values(Some("0"), Some("wide")), TableLayout::default());
        assert_eq!(TableLayout::from_values(None, None), TableLayout::default());
    }

    #[test]
    fn test_empty_results_render_count_only() {
        assert_eq!(render_table(&[], &TableLayout::default()), "0 rows");
    }
}
