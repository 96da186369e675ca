//! Product catalog operations.
//!
//! Create and update both go through [`save`], so a product is always validated the
//! same way regardless of which endpoint wrote it.

use crate::app::error::{ServiceError, ServiceResult};
use crate::app::photo::{attach_photo, PhotoReader, PhotoUpload};
use crate::domain::model::{
    Category, Photo, Product, ProductFilter, ProductSummary, ProductView, MAX_PHOTO_BYTES,
};
use crate::domain::slug::{slugify, SlugOptions};
use crate::storage::{CategoryRepository, ProductRepository};
use std::sync::Arc;
use uuid::Uuid;

/// Products returned by the storefront landing read.
pub const LATEST_LIMIT: usize = 12;
/// Products per page of the paginated listing.
pub const PAGE_SIZE: usize = 6;
pub const RELATED_LIMIT: usize = 3;

const BAD_REQUEST: u16 = 400;

/// Raw form fields of a product write, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub shipping: Option<String>,
}

/// Fields after validation and type conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Uuid,
    pub quantity: i64,
    pub shipping: bool,
}

/// The first field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub status: u16,
    pub message: String,
}

impl FieldViolation {
    fn bad_request(message: &str) -> Self {
        Self {
            status: BAD_REQUEST,
            message: message.to_string(),
        }
    }
}

/// Outcome of a photo read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoLookup {
    ProductMissing,
    PhotoMissing,
    Found(Photo),
}

fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, FieldViolation> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FieldViolation::bad_request(message)),
    }
}

fn parse_shipping(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Checks product fields in a fixed order and reports only the first failure:
/// name, description, price, category, quantity, shipping, photo size.
///
/// `shipping` only has to be present; an explicit false value is valid.
pub fn validate_fields(
    fields: &ProductFields,
    photo: Option<&PhotoUpload>,
) -> Result<ProductInput, FieldViolation> {
    let name = required(&fields.name, "Name is Required")?;
    let description = required(&fields.description, "Description is Required")?;

    let price = required(&fields.price, "Price is Required")?;
    let price: f64 = price
        .trim()
        .parse()
        .ok()
        .filter(|p: &f64| p.is_finite())
        .ok_or_else(|| FieldViolation::bad_request("Price must be a number"))?;

    let category = required(&fields.category, "Category is Required")?;
    let category = Uuid::parse_str(category.trim())
        .map_err(|_| FieldViolation::bad_request("Category must be a valid category id"))?;

    let quantity = required(&fields.quantity, "Quantity is Required")?;
    let quantity: i64 = quantity
        .trim()
        .parse()
        .map_err(|_| FieldViolation::bad_request("Quantity must be a whole number"))?;

    let shipping = fields
        .shipping
        .as_deref()
        .ok_or_else(|| FieldViolation::bad_request("Shipping is Required"))?;
    let shipping = parse_shipping(shipping)
        .ok_or_else(|| FieldViolation::bad_request("Shipping must be true or false"))?;

    if let Some(photo) = photo {
        if photo.size > MAX_PHOTO_BYTES {
            return Err(FieldViolation::bad_request(
                "Photo is Required and should be less than 1mb",
            ));
        }
    }

    Ok(ProductInput {
        name: name.to_string(),
        description: description.to_string(),
        price,
        category,
        quantity,
        shipping,
    })
}

/// Validates, applies the fields and optional photo to `record`, then persists it.
///
/// Nothing is written when validation fails.
pub async fn save(
    products: &dyn ProductRepository,
    reader: &dyn PhotoReader,
    mut record: Product,
    fields: &ProductFields,
    photo: Option<&PhotoUpload>,
) -> ServiceResult<Product> {
    let input = validate_fields(fields, photo)?;

    record.slug = slugify(&input.name, SlugOptions::default());
    record.name = input.name;
    record.description = input.description;
    record.price = input.price;
    record.category = input.category;
    record.quantity = input.quantity;
    record.shipping = input.shipping;
    attach_photo(&mut record, photo, reader).await?;

    Ok(products.save(&record).await?)
}

pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    reader: Arc<dyn PhotoReader>,
}

impl CatalogService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        reader: Arc<dyn PhotoReader>,
    ) -> Self {
        Self {
            products,
            categories,
            reader,
        }
    }

    pub async fn create(
        &self,
        fields: &ProductFields,
        photo: Option<&PhotoUpload>,
    ) -> ServiceResult<Product> {
        let saved = save(
            self.products.as_ref(),
            self.reader.as_ref(),
            Product::blank(),
            fields,
            photo,
        )
        .await?;
        tracing::info!(product_id = %saved.id, slug = %saved.slug, "product created");
        Ok(saved)
    }

    pub async fn update(
        &self,
        id: Uuid,
        fields: &ProductFields,
        photo: Option<&PhotoUpload>,
    ) -> ServiceResult<Product> {
        let existing = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;
        let saved = save(
            self.products.as_ref(),
            self.reader.as_ref(),
            existing,
            fields,
            photo,
        )
        .await?;
        tracing::info!(product_id = %saved.id, "product updated");
        Ok(saved)
    }

    /// The newest products with their category populated.
    pub async fn get_many(&self) -> ServiceResult<Vec<ProductView>> {
        Ok(self.products.latest(LATEST_LIMIT).await?)
    }

    /// `None` when no product has this slug.
    pub async fn get_one(&self, slug: &str) -> ServiceResult<Option<ProductView>> {
        Ok(self.products.find_by_slug(slug).await?)
    }

    pub async fn get_photo(&self, id: Uuid) -> ServiceResult<PhotoLookup> {
        Ok(match self.products.find_photo(id).await? {
            None => PhotoLookup::ProductMissing,
            Some(None) => PhotoLookup::PhotoMissing,
            Some(Some(photo)) => PhotoLookup::Found(photo),
        })
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        self.products.delete(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// `checked` lists category ids, `radio` is empty or a `[min, max]` price pair.
    pub async fn filter(&self, checked: Vec<Uuid>, radio: &[f64]) -> ServiceResult<Vec<ProductSummary>> {
        let price_range = match radio {
            [] => None,
            [min, max] => Some((*min, *max)),
            _ => {
                return Err(ServiceError::Validation(
                    "radio must be empty or a [min, max] price pair".to_string(),
                ))
            }
        };
        let filter = ProductFilter {
            categories: checked,
            price_range,
        };
        Ok(self.products.filter(&filter).await?)
    }

    pub async fn count(&self) -> ServiceResult<u64> {
        Ok(self.products.estimated_count().await?)
    }

    /// 1-indexed page of the newest-first listing; a missing or zero page reads page 1.
    pub async fn list_page(&self, page: Option<u32>) -> ServiceResult<Vec<ProductSummary>> {
        let page = page.unwrap_or(1).max(1) as usize;
        let offset = (page - 1) * PAGE_SIZE;
        Ok(self.products.page(offset, PAGE_SIZE).await?)
    }

    pub async fn search(&self, keyword: &str) -> ServiceResult<Vec<ProductSummary>> {
        Ok(self.products.search(keyword).await?)
    }

    pub async fn related(&self, product_id: Uuid, category_id: Uuid) -> ServiceResult<Vec<ProductView>> {
        Ok(self
            .products
            .related(product_id, category_id, RELATED_LIMIT)
            .await?)
    }

    /// Resolves the category by slug, then lists its products.
    ///
    /// An unknown slug yields no category and no products.
    pub async fn by_category(
        &self,
        slug: &str,
    ) -> ServiceResult<(Option<Category>, Vec<ProductView>)> {
        let Some(category) = self.categories.find_by_slug(slug).await? else {
            return Ok((None, Vec::new()));
        };
        let products = self.products.by_category(category.id).await?;
        Ok((Some(category), products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn complete() -> ProductFields {
        ProductFields {
            name: Some("Oak Chair".to_string()),
            description: Some("Sturdy".to_string()),
            price: Some("49.5".to_string()),
            category: Some(Uuid::new_v4().to_string()),
            quantity: Some("3".to_string()),
            shipping: Some("false".to_string()),
        }
    }

    fn upload(size: u64) -> PhotoUpload {
        PhotoUpload {
            path: PathBuf::from("/tmp/photo"),
            size,
            content_type: "image/png".to_string(),
        }
    }

    fn message(fields: &ProductFields, photo: Option<&PhotoUpload>) -> String {
        validate_fields(fields, photo).unwrap_err().message
    }

    #[test]
    fn reports_first_failure_in_fixed_order() {
        let empty = ProductFields::default();
        assert_eq!(message(&empty, Some(&upload(MAX_PHOTO_BYTES + 1))), "Name is Required");

        let mut fields = complete();
        fields.description = None;
        fields.quantity = None;
        assert_eq!(message(&fields, None), "Description is Required");

        let mut fields = complete();
        fields.price = Some(String::new());
        fields.shipping = None;
        assert_eq!(message(&fields, None), "Price is Required");

        let mut fields = complete();
        fields.category = None;
        assert_eq!(message(&fields, None), "Category is Required");

        let mut fields = complete();
        fields.quantity = None;
        fields.shipping = None;
        assert_eq!(message(&fields, None), "Quantity is Required");

        let mut fields = complete();
        fields.shipping = None;
        assert_eq!(
            message(&fields, Some(&upload(MAX_PHOTO_BYTES + 1))),
            "Shipping is Required"
        );
    }

    #[test]
    fn explicit_false_shipping_is_present() {
        let input = validate_fields(&complete(), None).unwrap();
        assert!(!input.shipping);
        assert_eq!(input.price, 49.5);
        assert_eq!(input.quantity, 3);
    }

    #[test]
    fn photo_size_boundary_is_inclusive() {
        assert!(validate_fields(&complete(), Some(&upload(MAX_PHOTO_BYTES))).is_ok());
        assert_eq!(
            message(&complete(), Some(&upload(MAX_PHOTO_BYTES + 1))),
            "Photo is Required and should be less than 1mb"
        );
    }

    #[test]
    fn malformed_values_are_rejected_in_their_slot() {
        let mut fields = complete();
        fields.price = Some("cheap".to_string());
        fields.quantity = Some("many".to_string());
        assert_eq!(message(&fields, None), "Price must be a number");

        let mut fields = complete();
        fields.quantity = Some("2.5".to_string());
        assert_eq!(message(&fields, None), "Quantity must be a whole number");

        let mut fields = complete();
        fields.shipping = Some(String::new());
        assert_eq!(message(&fields, None), "Shipping must be true or false");
    }

    #[test]
    fn violations_are_bad_requests() {
        assert_eq!(validate_fields(&ProductFields::default(), None).unwrap_err().status, 400);
    }

    struct NoPhotos;

    #[async_trait::async_trait]
    impl PhotoReader for NoPhotos {
        async fn read_bytes(&self, _path: &std::path::Path) -> std::io::Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    fn service() -> CatalogService {
        let store = Arc::new(crate::storage::MemoryStore::new());
        CatalogService::new(store.clone(), store, Arc::new(NoPhotos))
    }

    #[tokio::test]
    async fn invalid_fields_write_nothing() {
        let catalog = service();
        let mut fields = complete();
        fields.name = None;
        assert!(matches!(
            catalog.create(&fields, None).await,
            Err(ServiceError::Field(_))
        ));
        assert_eq!(catalog.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_of_unknown_product_is_not_found() {
        let catalog = service();
        let err = catalog.update(Uuid::new_v4(), &complete(), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn filter_rejects_half_price_ranges() {
        let catalog = service();
        assert!(catalog.filter(Vec::new(), &[]).await.unwrap().is_empty());
        assert!(matches!(
            catalog.filter(Vec::new(), &[1.0]).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            catalog.filter(Vec::new(), &[1.0, 2.0, 3.0]).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn page_zero_reads_the_first_page() {
        let catalog = service();
        for i in 0..7 {
            let mut fields = complete();
            fields.name = Some(format!("Chair {}", i));
            catalog.create(&fields, None).await.unwrap();
        }
        assert_eq!(catalog.list_page(Some(0)).await.unwrap().len(), PAGE_SIZE);
        assert_eq!(catalog.list_page(None).await.unwrap().len(), PAGE_SIZE);
        assert_eq!(catalog.list_page(Some(2)).await.unwrap().len(), 1);
        assert!(catalog.list_page(Some(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_slug_lists_nothing() {
        let (category, products) = service().by_category("nope").await.unwrap();
        assert!(category.is_none());
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn photo_lookup_outcomes() {
        let catalog = service();
        assert_eq!(
            catalog.get_photo(Uuid::new_v4()).await.unwrap(),
            PhotoLookup::ProductMissing
        );
        let product = catalog.create(&complete(), None).await.unwrap();
        assert_eq!(
            catalog.get_photo(product.id).await.unwrap(),
            PhotoLookup::PhotoMissing
        );
        let product = catalog
            .update(product.id, &complete(), Some(&upload(4)))
            .await
            .unwrap();
        assert!(matches!(
            catalog.get_photo(product.id).await.unwrap(),
            PhotoLookup::Found(_)
        ));
    }
}
