//! Plain-text rendering of list view-models.

use client_core::{view::RowView, PageControl};

pub fn control_strip(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|control| match *control {
            PageControl::Previous(_) => "<".to_string(),
            PageControl::First => "1".to_string(),
            PageControl::Ellipsis => "...".to_string(),
            PageControl::Page { index, active: true } => format!("[{}]", index + 1),
            PageControl::Page { index, .. } => (index + 1).to_string(),
            PageControl::Last(index) => (index + 1).to_string(),
            PageControl::Next(_) => ">".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header plus one line per row, columns padded to the widest cell.
pub fn table(headers: &[&str], rows: &[RowView]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.cells.iter().enumerate() {
            let len = cell.text.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut lines = vec![pad_line(headers, &widths)];
    lines.extend(rows.iter().map(|row| {
        let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        pad_line(&cells, &widths)
    }));
    lines
}

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(text, &width)| format!("{text:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
