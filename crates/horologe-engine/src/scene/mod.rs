//! Draw stream for one frame of the clock face.
//!
//! The app records circles, hands and text into a [`DrawList`]; each renderer
//! picks out its own commands in paint order (z, then insertion).

mod cmd;
mod key;
mod list;
mod z_index;

pub mod shapes;

pub use cmd::DrawCmd;
pub use key::SortKey;
pub use list::{DrawItem, DrawList};
pub use z_index::ZIndex;
