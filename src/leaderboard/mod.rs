pub mod country;
pub mod format;
pub mod mode;
pub mod render;
pub mod view;

pub use mode::LeaderboardMode;
pub use view::{LeaderboardView, ViewEvent, ViewHandle, ViewState};
