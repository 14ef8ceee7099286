use crate::table::column::{display_width, pad, Align, Column};

type Painter = Box<dyn Fn(usize, &str) -> String + Send + Sync>;

/// A plain text column. An optional painter styles each padded cell, so
/// escape codes never count towards the width.
pub struct Text {
    header: String,
    values: Vec<String>,
    align: Align,
    painter: Option<Painter>,
}

impl Text {
    pub fn new(header: &str, values: Vec<String>) -> Self {
        Self {
            header: header.into(),
            values,
            align: Align::Left,
            painter: None,
        }
    }

    pub fn align_right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub fn with_painter(mut self, painter: impl Fn(usize, &str) -> String + Send + Sync + 'static) -> Self {
        self.painter = Some(Box::new(painter));
        self
    }
}

impl Column for Text {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn width(&self) -> usize {
        self.values
            .iter()
            .chain(std::iter::once(&self.header))
            .map(|v| display_width(v))
            .max()
            .unwrap_or(0)
    }

    fn header_cell(&self, width: usize) -> String {
        pad(&self.header, width, self.align)
    }

    fn cell(&self, row: usize, width: usize) -> String {
        let padded = pad(&self.values[row], width, self.align);
        match &self.painter {
            Some(paint) => paint(row, &padded),
            None => padded,
        }
    }
}

impl From<Text> for Box<dyn Column> {
    fn from(text: Text) -> Self {
        Box::new(text)
    }
}
