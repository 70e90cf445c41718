mod dropdown;
mod scroll;

pub use dropdown::{Dropdown, DropdownState, Hit};
pub use scroll::PanelScroll;
