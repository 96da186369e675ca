use super::Category;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Largest accepted photo payload, inclusive.
pub const MAX_PHOTO_BYTES: u64 = 1_000_000;

/// Binary photo stored inline on a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// The full persisted product, photo included.
///
/// Only the store and the save routine see this shape; every read path hands out
/// [`ProductSummary`] or [`ProductView`], which never carry photo bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category: Uuid,
    pub quantity: i64,
    pub photo: Option<Photo>,
    pub shipping: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// A fresh record with a new id and no meaningful fields yet.
    pub fn blank() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            price: 0.0,
            category: Uuid::nil(),
            quantity: 0,
            photo: None,
            shipping: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            price: self.price,
            category: self.category,
            quantity: self.quantity,
            shipping: self.shipping,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Product without its photo; `category` left as a reference.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category: Uuid,
    pub quantity: i64,
    pub shipping: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product without its photo, with `category` populated.
///
/// `category` is `None` when the referenced category no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category: Option<Category>,
    pub quantity: i64,
    pub shipping: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductView {
    pub fn from_summary(summary: ProductSummary, category: Option<Category>) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            slug: summary.slug,
            description: summary.description,
            price: summary.price,
            category,
            quantity: summary.quantity,
            shipping: summary.shipping,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

/// Constraints for the catalog filter.
///
/// An empty `categories` list and a `None` price range both mean "unconstrained".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub categories: Vec<Uuid>,
    pub price_range: Option<(f64, f64)>,
}

impl ProductFilter {
    pub fn matches(&self, product: &ProductSummary) -> bool {
        let category_ok = self.categories.is_empty() || self.categories.contains(&product.category);
        let price_ok = match self.price_range {
            Some((min, max)) => product.price >= min && product.price <= max,
            None => true,
        };
        category_ok && price_ok
    }
}

/// Case-insensitive substring match against name or description.
pub fn matches_keyword(product: &ProductSummary, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
}
