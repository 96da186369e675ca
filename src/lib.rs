pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{CatalogService, CategoryService, FsPhotoReader, OrderService, PhotoReader, ServiceError};
pub use domain::model::{Category, Order, OrderStatus, Product};
pub use infra::config::{Config, StoreBackend};
pub use storage::{MemoryStore, StoreError};
pub use transport::http::{create_router, ApiDoc, AppState, HeaderAuthenticator};
