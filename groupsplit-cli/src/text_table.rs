use std::fmt::Write;

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// Plain-text table with padded columns and a rule under the header.
#[derive(Default)]
pub struct TextTableBuilder<'a> {
    headers: &'a [&'a str],
    alignments: &'a [Alignment],
    rows: Vec<Vec<String>>,
}

impl<'a> TextTableBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(mut self, headers: &'a [&'a str]) -> Self {
        self.headers = headers;
        self
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = alignments;
        self
    }

    pub fn row(mut self, row: Vec<String>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::with_capacity(64 * (self.rows.len() + 2));
        self.write_line(&mut out, self.headers.iter().copied(), &widths);
        let rule_width = widths.iter().sum::<usize>() + 2 * (col_count - 1);
        let _ = writeln!(out, "{}", "-".repeat(rule_width));
        for row in &self.rows {
            self.write_line(&mut out, row.iter().map(String::as_str), &widths);
        }
        out
    }

    fn write_line<'b>(
        &self,
        out: &mut String,
        cells: impl Iterator<Item = &'b str>,
        widths: &[usize],
    ) {
        let mut line = String::new();
        for (idx, (cell, width)) in cells.zip(widths).enumerate() {
            if idx > 0 {
                line.push_str("  ");
            }
            let _ = match self.alignments.get(idx).copied().unwrap_or_default() {
                Alignment::Left => write!(line, "{cell:<width$}"),
                Alignment::Right => write!(line, "{cell:>width$}"),
            };
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_columns_to_widest_cell() {
        let table = TextTableBuilder::new()
            .headers(&["Member", "Balance"])
            .alignments(&[Alignment::Left, Alignment::Right])
            .row(vec!["alice".to_string(), "+60.00".to_string()])
            .row(vec!["bob".to_string(), "-30.00".to_string()])
            .build();

        assert_eq!(
            table,
            "Member  Balance\n---------------\nalice    +60.00\nbob      -30.00\n"
        );
    }

    #[test]
    fn empty_headers_render_nothing() {
        assert_eq!(TextTableBuilder::new().build(), "");
    }
}
