pub mod memory;
pub mod postgres;

pub use memory::MemoryGraph;
pub use postgres::{create_pool, PgSocialGraph};
