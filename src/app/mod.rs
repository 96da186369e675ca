//! Catalog, category and order operations.
//!
//! Services hold injected repositories and never touch the HTTP layer; failures are
//! reported as [`ServiceError`] and turned into envelopes by the handlers.

pub mod catalog_service;
pub mod category_service;
pub mod error;
pub mod order_service;
pub mod photo;

pub use catalog_service::{
    validate_fields, CatalogService, FieldViolation, PhotoLookup, ProductFields, ProductInput,
};
pub use category_service::CategoryService;
pub use error::{ServiceError, ServiceResult};
pub use order_service::OrderService;
pub use photo::{FsPhotoReader, PhotoReader, PhotoUpload};
