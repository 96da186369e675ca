use crate::app::{PhotoLookup, PhotoUpload, ProductFields};
use crate::transport::http::auth::RequireAdmin;
use crate::transport::http::handlers::common::{error_failure, message_failure, parse_id};
use crate::transport::http::types::{
    json_422, AppState, LatestProductsResponse, MessageResponse, PopulatedProductsResponse,
    ProductCategoryResponse, ProductCountResponse, ProductErrorResponse, ProductFilterRequest,
    ProductWriteResponse, ProductsResponse, SingleProductResponse,
};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::Path as FsPath;
use tempfile::NamedTempFile;

const PHOTO_FIELD: &str = "photo";

/// A photo part written to disk; the file is removed when this is dropped.
struct SpooledPhoto {
    _file: NamedTempFile,
    upload: PhotoUpload,
}

struct ParsedForm {
    fields: ProductFields,
    photo: Option<SpooledPhoto>,
}

fn bad_form(detail: impl std::fmt::Display) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ProductErrorResponse {
            error: format!("Invalid multipart body: {}", detail),
        }),
    )
        .into_response()
}

async fn spool_photo(
    upload_dir: &FsPath,
    bytes: &[u8],
    content_type: String,
) -> std::io::Result<SpooledPhoto> {
    let file = tempfile::Builder::new()
        .prefix("photo-")
        .tempfile_in(upload_dir)?;
    tokio::fs::write(file.path(), bytes).await?;
    let upload = PhotoUpload {
        path: file.path().to_path_buf(),
        size: bytes.len() as u64,
        content_type,
    };
    Ok(SpooledPhoto {
        _file: file,
        upload,
    })
}

/// Collects text fields and spools the optional `photo` part.
///
/// A photo part with no file name and no bytes counts as "no photo", which is what
/// browsers send for an untouched file input. A body that fails to parse before its
/// first part is read as an empty form, so validation names the first missing field.
async fn read_product_form(
    multipart: Result<Multipart, MultipartRejection>,
    upload_dir: &FsPath,
) -> Result<ParsedForm, Response> {
    let mut multipart = multipart.map_err(|rejection| bad_form(rejection.body_text()))?;
    let mut fields = ProductFields::default();
    let mut photo = None;
    let mut parts_read = 0usize;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if parts_read == 0 => {
                tracing::debug!(error = %e, "unparsable form body read as empty");
                break;
            }
            Err(e) => return Err(bad_form(e)),
        };
        parts_read += 1;
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == PHOTO_FIELD {
            let has_file_name = field.file_name().is_some_and(|n| !n.is_empty());
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(bad_form)?;
            if bytes.is_empty() && !has_file_name {
                continue;
            }
            let spooled = spool_photo(upload_dir, &bytes, content_type)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "failed to spool photo upload");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ProductErrorResponse {
                            error: "Failed to store photo upload".to_string(),
                        }),
                    )
                        .into_response()
                })?;
            photo = Some(spooled);
            continue;
        }

        let value = field.text().await.map_err(bad_form)?;
        let slot = match name.as_str() {
            "name" => &mut fields.name,
            "description" => &mut fields.description,
            "price" => &mut fields.price,
            "category" => &mut fields.category,
            "quantity" => &mut fields.quantity,
            "shipping" => &mut fields.shipping,
            _ => continue,
        };
        *slot = Some(value);
    }

    Ok(ParsedForm { fields, photo })
}

#[utoipa::path(
    post,
    path = "/api/v1/product/create-product",
    request_body(content = crate::transport::http::types::ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ProductWriteResponse),
        (status = 400, description = "First failing field", body = ProductErrorResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let form = match read_product_form(multipart, &state.upload_dir).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let photo = form.photo.as_ref().map(|p| &p.upload);

    match state.catalog.create(&form.fields, photo).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(ProductWriteResponse {
                success: true,
                message: "Product Created Successfully".to_string(),
                products: product.summary(),
            }),
        )
            .into_response(),
        Err(e) => error_failure(e, "Error in creating product"),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/product/update-product/{pid}",
    params(("pid" = String, Path, description = "Product id")),
    request_body(content = crate::transport::http::types::ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = ProductWriteResponse),
        (status = 400, description = "First failing field", body = ProductErrorResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 404, description = "Product not found", body = ProductErrorResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(pid): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let Some(pid) = parse_id(&pid) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ProductErrorResponse {
                error: "Product not found".to_string(),
            }),
        )
            .into_response();
    };
    let form = match read_product_form(multipart, &state.upload_dir).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let photo = form.photo.as_ref().map(|p| &p.upload);

    match state.catalog.update(pid, &form.fields, photo).await {
        Ok(product) => Json(ProductWriteResponse {
            success: true,
            message: "Product Updated Successfully".to_string(),
            products: product.summary(),
        })
        .into_response(),
        Err(e) => error_failure(e, "Error in updating product"),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/product/get-product",
    responses(
        (status = 200, description = "Newest products", body = LatestProductsResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn get_products_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog.get_many().await {
        Ok(products) => Json(LatestProductsResponse {
            success: true,
            count_total: products.len(),
            message: "All Products".to_string(),
            products,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error in getting products"),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/product/get-product/{slug}",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product, or null when the slug is unknown", body = SingleProductResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.catalog.get_one(&slug).await {
        Ok(product) => Json(SingleProductResponse {
            success: true,
            message: "Single Product Fetched".to_string(),
            product,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error while getting single product"),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/product/product-photo/{pid}",
    params(("pid" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Raw photo bytes with their stored content type"),
        (status = 404, description = "Product or photo not found", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn product_photo_handler(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> impl IntoResponse {
    let lookup = match parse_id(&pid) {
        Some(pid) => state.catalog.get_photo(pid).await,
        None => Ok(PhotoLookup::ProductMissing),
    };
    match lookup {
        Ok(PhotoLookup::Found(photo)) => {
            ([(header::CONTENT_TYPE, photo.content_type)], photo.data).into_response()
        }
        Ok(PhotoLookup::ProductMissing) => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::failed("Product not found")),
        )
            .into_response(),
        Ok(PhotoLookup::PhotoMissing) => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::failed("Photo not found")),
        )
            .into_response(),
        Err(e) => message_failure(e, "Error while getting photo"),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/product/delete-product/{pid}",
    params(("pid" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted (also when the id is unknown)", body = MessageResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(pid): Path<String>,
) -> impl IntoResponse {
    if let Some(pid) = parse_id(&pid) {
        if let Err(e) = state.catalog.delete(pid).await {
            return message_failure(e, "Error while deleting product");
        }
    }
    Json(MessageResponse::ok("Product Deleted successfully")).into_response()
}

#[utoipa::path(
    post,
    path = "/api/v1/product/product-filters",
    request_body = ProductFilterRequest,
    responses(
        (status = 200, description = "Matching products", body = ProductsResponse),
        (status = 400, description = "Malformed price range", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn product_filters_handler(
    State(state): State<AppState>,
    request: Result<Json<ProductFilterRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e),
    };
    match state.catalog.filter(request.checked, &request.radio).await {
        Ok(products) => Json(ProductsResponse {
            success: true,
            products,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error while filtering products"),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/product/product-count",
    responses(
        (status = 200, description = "Approximate product count", body = ProductCountResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn product_count_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog.count().await {
        Ok(total) => Json(ProductCountResponse {
            success: true,
            total,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error in product count"),
    }
}

async fn list_page(state: &AppState, page: Option<u32>) -> Response {
    match state.catalog.list_page(page).await {
        Ok(products) => Json(ProductsResponse {
            success: true,
            products,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error in per page listing"),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/product/product-list/{page}",
    params(("page" = String, Path, description = "1-indexed page; anything unparsable reads page 1")),
    responses(
        (status = 200, description = "Six products, newest first", body = ProductsResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn product_list_handler(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> impl IntoResponse {
    list_page(&state, page.trim().parse::<u32>().ok()).await
}

/// Same listing without a page segment; reads page 1.
pub async fn product_list_first_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    list_page(&state, None).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/search/{keyword}",
    params(("keyword" = String, Path, description = "Matched against name or description")),
    responses(
        (status = 200, description = "Bare array of matches", body = Vec<crate::domain::model::ProductSummary>),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn search_product_handler(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> impl IntoResponse {
    match state.catalog.search(&keyword).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => message_failure(e, "Error in search product API"),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/product/related-product/{pid}/{cid}",
    params(
        ("pid" = String, Path, description = "Product to exclude"),
        ("cid" = String, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Up to three products of the same category", body = PopulatedProductsResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn related_product_handler(
    State(state): State<AppState>,
    Path((pid, cid)): Path<(String, String)>,
) -> impl IntoResponse {
    let products = match (parse_id(&pid), parse_id(&cid)) {
        (Some(pid), Some(cid)) => match state.catalog.related(pid, cid).await {
            Ok(products) => products,
            Err(e) => return message_failure(e, "Error while getting related product"),
        },
        _ => Vec::new(),
    };
    Json(PopulatedProductsResponse {
        success: true,
        products,
    })
    .into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/product/product-category/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category and its products", body = ProductCategoryResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn product_category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.catalog.by_category(&slug).await {
        Ok((category, products)) => Json(ProductCategoryResponse {
            success: true,
            category,
            products,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error while getting products"),
    }
}
