//! Runs the repositories against a real database.
//!
//! Skipped unless `DATABASE_URL` points at a Postgres instance. Every name is suffixed
//! with a fresh id so the test can share a database with other runs.

use serde_json::json;
use std::time::Duration;
use storefront_catalog::domain::model::{Category, NewOrder, Photo, Product, ProductFilter};
use storefront_catalog::storage::postgres::{
    self, PgCategoryRepository, PgOrderRepository, PgProductRepository,
};
use storefront_catalog::storage::{CategoryRepository, OrderRepository, ProductRepository, StoreError};
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn postgres_repositories_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping postgres test");
        return Ok(());
    };

    let pool = postgres::connect(&url, 2, Duration::from_secs(5)).await?;
    postgres::ensure_schema(&pool).await?;
    let categories = PgCategoryRepository::new(pool.clone());
    let products = PgProductRepository::new(pool.clone());
    let orders = PgOrderRepository::new(pool.clone());

    let tag = Uuid::new_v4().simple().to_string();

    // --- Categories ---
    let name = format!("Chairs {}", tag);
    let category = Category::new(name.clone(), format!("chairs-{}", tag));
    CategoryRepository::insert(&categories, &category).await?;
    assert_eq!(categories.find_by_name(&name).await?, Some(category.clone()));
    assert_eq!(
        categories.find_by_slug(&category.slug).await?.map(|c| c.id),
        Some(category.id)
    );

    // --- Products ---
    let mut product = Product::blank();
    product.name = format!("Oak 100% Chair {}", tag);
    product.slug = format!("Oak-100-Chair-{}", tag);
    product.description = "solid_oak".to_string();
    product.price = 42.0;
    product.category = category.id;
    product.quantity = 3;
    product.shipping = false;
    product.photo = Some(Photo {
        data: vec![1, 2, 3, 4],
        content_type: "image/png".to_string(),
    });
    let saved = products.save(&product).await?;
    assert_eq!(saved.id, product.id);

    let view = products.find_by_slug(&product.slug).await?.expect("view by slug");
    assert_eq!(view.category.map(|c| c.id), Some(category.id));
    assert_eq!(
        products.find_photo(product.id).await?,
        Some(product.photo.clone())
    );

    // `%` is matched literally.
    let hits = products.search(&format!("100% Chair {}", tag)).await?;
    assert_eq!(hits.len(), 1);
    assert!(products.search(&format!("1%0 {}", tag)).await?.is_empty());

    let filtered = products
        .filter(&ProductFilter {
            categories: vec![category.id],
            price_range: Some((42.0, 42.0)),
        })
        .await?;
    assert_eq!(filtered.len(), 1);

    // Upsert keeps the first creation time.
    let mut renamed = saved.clone();
    renamed.name = format!("Walnut Chair {}", tag);
    let resaved = products.save(&renamed).await?;
    assert_eq!(resaved.created_at, saved.created_at);

    // Equal timestamps page in a stable order: no row repeats or goes missing.
    let future = chrono::Utc::now() + chrono::Duration::days(365 * 50);
    let mut twins = Vec::new();
    for i in 0..2 {
        let mut twin = Product::blank();
        twin.name = format!("Twin {} {}", i, tag);
        twin.slug = format!("Twin-{}-{}", i, tag);
        twin.category = category.id;
        twin.created_at = future;
        twins.push(products.save(&twin).await?.id);
    }
    let first = products.page(0, 1).await?;
    let second = products.page(1, 1).await?;
    let paged = vec![first[0].id, second[0].id];
    let mut expected = twins.clone();
    expected.sort();
    expected.reverse();
    assert_eq!(paged, expected);
    assert_eq!(products.page(0, 2).await?.iter().filter(|p| twins.contains(&p.id)).count(), 2);
    for id in &twins {
        ProductRepository::delete(&products, *id).await?;
    }

    // --- Orders ---
    let buyer = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, name) VALUES ($1, $2)")
        .bind(buyer)
        .bind("Ada")
        .execute(&pool)
        .await?;
    let order = OrderRepository::insert(
        &orders,
        NewOrder {
            products: vec![product.id, Uuid::new_v4()],
            payment: json!({ "success": true }),
            buyer,
        },
    )
    .await?;

    let mine = orders.find_by_buyer(buyer).await?;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].buyer.as_ref().map(|b| b.name.as_str()), Some("Ada"));
    assert!(mine[0].products[0].is_some());
    assert!(mine[0].products[1].is_none());

    let shipped = orders.update_status(order.id, "Shipped").await?.expect("order");
    assert_eq!(shipped.status.as_str(), "Shipped");
    assert!(matches!(
        orders.update_status(order.id, "delivered").await,
        Err(StoreError::InvalidRecord(_))
    ));
    assert!(orders.update_status(Uuid::new_v4(), "Shipped").await?.is_none());

    // --- Cleanup ---
    ProductRepository::delete(&products, product.id).await?;
    assert!(ProductRepository::find_by_id(&products, product.id).await?.is_none());
    CategoryRepository::delete(&categories, category.id).await?;
    sqlx::query("DELETE FROM orders WHERE id = $1").bind(order.id).execute(&pool).await?;
    sqlx::query("DELETE FROM users WHERE id = $1").bind(buyer).execute(&pool).await?;

    Ok(())
}
