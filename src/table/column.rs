use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// One table column; every column of a table holds the same number of rows.
pub trait Column {
    fn len(&self) -> usize;
    /// Widest of header and values, in terminal cells.
    fn width(&self) -> usize;
    fn header_cell(&self, width: usize) -> String;
    fn cell(&self, row: usize, width: usize) -> String;
}

/// Terminal columns, not bytes or chars: medals take two cells.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

pub fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(text)));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}
