pub mod layout;
pub mod widgets;

pub use layout::{AppLayout, LayoutAreas};
pub use widgets::*;
