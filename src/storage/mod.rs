pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::MemoryStore;
pub use repository::{
    CategoryRepository, OrderRepository, ProductRepository, StoreError, StoreResult,
};
