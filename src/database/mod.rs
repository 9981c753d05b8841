pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{MemoryProductRepository, MemoryUserRepository};
pub use postgres::{PgProductRepository, PgUserRepository};
pub use repository::{ProductRepository, UserRepository};
