//! Catalog and order records.

pub mod category;
pub mod order;
pub mod product;

pub use category::Category;
pub use order::{BuyerRef, InvalidStatus, NewOrder, Order, OrderStatus, OrderView};
pub use product::{
    matches_keyword, Photo, Product, ProductFilter, ProductSummary, ProductView, MAX_PHOTO_BYTES,
};
