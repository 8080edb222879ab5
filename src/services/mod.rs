pub mod file_locator;
pub mod naming;
pub mod store;

pub use file_locator::find_by_extensions;
pub use naming::{output_base_name, resolve_unique_path, sanitize};
pub use store::OutputStore;
