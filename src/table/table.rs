use crate::table::{Column, Section};

pub const EMPTY_MESSAGE: &str = "No data available.";

/// Pipe-delimited table: header, `|---|` rule, one line per row.
pub struct TableBuilder {
    title: String,
    columns: Vec<Box<dyn Column>>,
    empty_message: String,
}

impl TableBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: Vec::new(),
            empty_message: EMPTY_MESSAGE.to_string(),
        }
    }

    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Panics if the column's length differs from the columns already added.
    pub fn add_column(mut self, column: impl Into<Box<dyn Column>>) -> Self {
        let column = column.into();
        if let Some(rows) = self.rows() {
            assert!(
                rows == column.len(),
                "column length mismatch: expected {} rows but received {}",
                rows,
                column.len()
            );
        }
        self.columns.push(column);
        self
    }

    fn rows(&self) -> Option<usize> {
        self.columns.first().map(|c| c.len())
    }

    pub fn build(self) -> Section {
        let mut section = Section::new(&self.title);
        let rows = self.rows().unwrap_or(0);
        if rows == 0 {
            section.add_line(self.empty_message);
            return section;
        }

        let widths: Vec<usize> = self.columns.iter().map(|c| c.width()).collect();
        section.add_line(self.line(&widths, |c, w| c.header_cell(w)));
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w + 2)).collect();
        section.add_line(format!("|{}|", rule.join("|")));
        for row in 0..rows {
            section.add_line(self.line(&widths, |c, w| c.cell(row, w)));
        }
        section
    }

    fn line(&self, widths: &[usize], cell: impl Fn(&dyn Column, usize) -> String) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .map(|(c, &w)| cell(c.as_ref(), w))
            .collect();
        format!("| {} |", cells.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Text;

    #[test]
    fn test_builds_aligned_rows() {
        let section = TableBuilder::new("Scores")
            .add_column(Text::new("Player", vec!["Mira".to_string(), "Tor".to_string()]))
            .add_column(Text::new("Time", vec!["2m 5s".to_string(), "45s".to_string()]).align_right())
            .build();

        assert_eq!(
            section.lines,
            vec![
                "| Player |  Time |",
                "|--------|-------|",
                "| Mira   | 2m 5s |",
                "| Tor    |   45s |",
            ]
        );
    }

    #[test]
    fn test_empty_table_uses_message() {
        let section = TableBuilder::new("Scores")
            .empty_message("Nothing here")
            .add_column(Text::new("Player", vec![]))
            .build();
        assert_eq!(section.lines, vec!["Nothing here"]);
    }

    #[test]
    #[should_panic(expected = "column length mismatch")]
    fn test_mismatched_columns_panic() {
        let _ = TableBuilder::new("Scores")
            .add_column(Text::new("A", vec!["1".to_string()]))
            .add_column(Text::new("B", vec![]));
    }

    #[test]
    fn test_painter_wraps_padded_cell() {
        let section = TableBuilder::new("Scores")
            .add_column(Text::new("Rank", vec!["1".to_string()]).with_painter(|_, cell| format!("<{}>", cell)))
            .build();
        assert_eq!(section.lines[2], "| <1   > |");
    }
}
