//! Command implementations for the radiocat CLI
//!
//! Each command lives in its own submodule.

mod categories;
mod list;
mod update;

pub use categories::execute as show_categories;
pub use list::execute as list_catalogs;
pub use update::{UpdateRequest, execute as update_categories};
