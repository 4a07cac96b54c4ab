pub mod clean;
pub mod collect;

// Re-export command functions for convenience
pub use clean::{clean, vocabulary};
pub use collect::collect;
