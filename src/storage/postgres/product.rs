use crate::domain::model::{Category, Photo, Product, ProductFilter, ProductSummary, ProductView};
use crate::storage::repository::{ProductRepository, StoreResult};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

// Every read path except `find_by_id` selects these, never the photo columns.
const SUMMARY_COLUMNS: &str = "p.id, p.name, p.slug, p.description, p.price, p.category, \
     p.quantity, p.shipping, p.created_at, p.updated_at";

const VIEW_SELECT: &str = "SELECT p.id, p.name, p.slug, p.description, p.price, p.category, \
     p.quantity, p.shipping, p.created_at, p.updated_at, \
     c.id AS c_id, c.name AS c_name, c.slug AS c_slug \
     FROM products p LEFT JOIN categories c ON c.id = p.category";

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_summary(row: &PgRow) -> StoreResult<ProductSummary> {
    Ok(ProductSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        quantity: row.try_get("quantity")?,
        shipping: row.try_get("shipping")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_view(row: &PgRow) -> StoreResult<ProductView> {
    let summary = row_to_summary(row)?;
    let category_id: Option<Uuid> = row.try_get("c_id")?;
    let category = match category_id {
        Some(id) => Some(Category {
            id,
            name: row.try_get("c_name")?,
            slug: row.try_get("c_slug")?,
        }),
        None => None,
    };
    Ok(ProductView::from_summary(summary, category))
}

fn row_to_product(row: &PgRow) -> StoreResult<Product> {
    let data: Option<Vec<u8>> = row.try_get("photo_data")?;
    let content_type: Option<String> = row.try_get("photo_content_type")?;
    let photo = data.map(|data| Photo {
        data,
        content_type: content_type.unwrap_or_default(),
    });
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        quantity: row.try_get("quantity")?,
        photo,
        shipping: row.try_get("shipping")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Escapes LIKE metacharacters so the keyword is matched literally.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn save(&self, product: &Product) -> StoreResult<Product> {
        let (photo_data, photo_content_type) = match &product.photo {
            Some(photo) => (Some(photo.data.as_slice()), Some(photo.content_type.as_str())),
            None => (None, None),
        };
        let row = sqlx::query(
            "INSERT INTO products (id, name, slug, description, price, category, quantity,
                                   photo_data, photo_content_type, shipping, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now())
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                slug = EXCLUDED.slug,
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                category = EXCLUDED.category,
                quantity = EXCLUDED.quantity,
                photo_data = EXCLUDED.photo_data,
                photo_content_type = EXCLUDED.photo_content_type,
                shipping = EXCLUDED.shipping,
                updated_at = now()
             RETURNING *",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.category)
        .bind(product.quantity)
        .bind(photo_data)
        .bind(photo_content_type)
        .bind(product.shipping)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await?;
        row_to_product(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<ProductView>> {
        let row = sqlx::query(&format!("{} WHERE p.slug = $1 LIMIT 1", VIEW_SELECT))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_view).transpose()
    }

    async fn latest(&self, limit: usize) -> StoreResult<Vec<ProductView>> {
        let rows = sqlx::query(&format!("{} ORDER BY p.created_at DESC, p.id DESC LIMIT $1", VIEW_SELECT))
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_view).collect()
    }

    async fn find_photo(&self, id: Uuid) -> StoreResult<Option<Option<Photo>>> {
        let row = sqlx::query("SELECT photo_data, photo_content_type FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let data: Option<Vec<u8>> = row.try_get("photo_data")?;
        let content_type: Option<String> = row.try_get("photo_content_type")?;
        Ok(Some(data.map(|data| Photo {
            data,
            content_type: content_type.unwrap_or_default(),
        })))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn filter(&self, filter: &ProductFilter) -> StoreResult<Vec<ProductSummary>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM products p WHERE TRUE", SUMMARY_COLUMNS));
        if !filter.categories.is_empty() {
            builder.push(" AND p.category = ANY(");
            builder.push_bind(filter.categories.clone());
            builder.push(")");
        }
        if let Some((min, max)) = filter.price_range {
            builder.push(" AND p.price >= ");
            builder.push_bind(min);
            builder.push(" AND p.price <= ");
            builder.push_bind(max);
        }
        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_summary).collect()
    }

    async fn estimated_count(&self) -> StoreResult<u64> {
        // Planner statistics are cheap but absent (or zero) until the table has been analyzed.
        let estimate: Option<i64> = sqlx::query_scalar(
            "SELECT reltuples::BIGINT FROM pg_class WHERE relname = 'products' AND relkind = 'r'",
        )
        .fetch_optional(&self.pool)
        .await?;
        if let Some(n) = estimate.filter(|n| *n > 0) {
            return Ok(n as u64);
        }
        let exact: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(exact.max(0) as u64)
    }

    async fn page(&self, offset: usize, limit: usize) -> StoreResult<Vec<ProductSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products p ORDER BY p.created_at DESC, p.id DESC OFFSET $1 LIMIT $2",
            SUMMARY_COLUMNS
        ))
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_summary).collect()
    }

    async fn search(&self, keyword: &str) -> StoreResult<Vec<ProductSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products p WHERE p.name ILIKE $1 OR p.description ILIKE $1",
            SUMMARY_COLUMNS
        ))
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_summary).collect()
    }

    async fn related(
        &self,
        exclude: Uuid,
        category: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<ProductView>> {
        let rows = sqlx::query(&format!(
            "{} WHERE p.category = $1 AND p.id <> $2 LIMIT $3",
            VIEW_SELECT
        ))
        .bind(category)
        .bind(exclude)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_view).collect()
    }

    async fn by_category(&self, category: Uuid) -> StoreResult<Vec<ProductView>> {
        let rows = sqlx::query(&format!("{} WHERE p.category = $1", VIEW_SELECT))
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_view).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("desk"), "%desk%");
    }
}
