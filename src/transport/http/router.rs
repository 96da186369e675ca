use crate::domain::model::{
    BuyerRef, Category, Order, OrderStatus, OrderView, ProductSummary, ProductView,
};
use crate::transport::http::handlers::{category, health, order, product};
use crate::transport::http::types::{
    AppState, CategoryListResponse, CategoryRequest, CategoryResponse, HealthResponse,
    LatestProductsResponse, MessageResponse, OrderStatusRequest, PopulatedProductsResponse,
    ProductCategoryResponse, ProductCountResponse, ProductErrorResponse, ProductFilterRequest,
    ProductForm, ProductWriteResponse, ProductsResponse, SingleProductResponse,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Upper bound on product form bodies. The photo itself is capped lower, by validation,
/// so that an oversized photo gets the field error rather than a bare 413.
pub const PRODUCT_FORM_LIMIT: usize = 8 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        category::list_categories_handler,
        category::create_category_handler,
        category::update_category_handler,
        category::single_category_handler,
        category::delete_category_handler,
        product::create_product_handler,
        product::update_product_handler,
        product::get_products_handler,
        product::get_product_handler,
        product::product_photo_handler,
        product::delete_product_handler,
        product::product_filters_handler,
        product::product_count_handler,
        product::product_list_handler,
        product::search_product_handler,
        product::related_product_handler,
        product::product_category_handler,
        order::buyer_orders_handler,
        order::all_orders_handler,
        order::order_status_handler
    ),
    components(schemas(
        Category,
        ProductSummary,
        ProductView,
        Order,
        OrderView,
        OrderStatus,
        BuyerRef,
        CategoryRequest,
        ProductFilterRequest,
        OrderStatusRequest,
        ProductForm,
        MessageResponse,
        ProductErrorResponse,
        CategoryResponse,
        CategoryListResponse,
        ProductWriteResponse,
        LatestProductsResponse,
        SingleProductResponse,
        ProductsResponse,
        PopulatedProductsResponse,
        ProductCountResponse,
        ProductCategoryResponse,
        HealthResponse
    ))
)]
pub struct ApiDoc;

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/get-category", get(category::list_categories_handler))
        .route("/create-category", post(category::create_category_handler))
        .route("/update-category/:id", put(category::update_category_handler))
        .route("/single-category/:slug", get(category::single_category_handler))
        .route("/delete-category/:id", delete(category::delete_category_handler))
}

fn product_routes() -> Router<AppState> {
    let writes = Router::new()
        .route("/create-product", post(product::create_product_handler))
        .route("/update-product/:pid", put(product::update_product_handler))
        .layer(DefaultBodyLimit::max(PRODUCT_FORM_LIMIT));

    Router::new()
        .route("/get-product", get(product::get_products_handler))
        .route("/get-product/:slug", get(product::get_product_handler))
        .route("/product-photo/:pid", get(product::product_photo_handler))
        .route("/delete-product/:pid", delete(product::delete_product_handler))
        .route("/product-filters", post(product::product_filters_handler))
        .route("/product-count", get(product::product_count_handler))
        .route("/product-list", get(product::product_list_first_page_handler))
        .route("/product-list/:page", get(product::product_list_handler))
        .route("/search/:keyword", get(product::search_product_handler))
        .route("/related-product/:pid/:cid", get(product::related_product_handler))
        .route("/product-category/:slug", get(product::product_category_handler))
        .merge(writes)
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(order::buyer_orders_handler))
        .route("/all-orders", get(order::all_orders_handler))
        .route("/order-status/:orderId", put(order::order_status_handler))
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .nest("/api/v1/category", category_routes())
        .nest("/api/v1/product", product_routes())
        .nest("/api/v1/auth", order_routes())
        .with_state(app_state)
}
