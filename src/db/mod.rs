mod migrate;
mod save;

pub use migrate::{clear, migrate};
pub use save::save_snapshot;
