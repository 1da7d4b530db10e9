//! Database module for PostgreSQL persistence.

mod pool;
mod submissions;

pub use pool::*;
pub use submissions::*;
