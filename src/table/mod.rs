pub mod column;
pub mod section;
pub mod table;
pub mod text;

pub use column::{Align, Column};
pub use section::Section;
pub use table::TableBuilder;
pub use text::Text;
