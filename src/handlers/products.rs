// handlers/products.rs - /api/v1/products and /api/v1/products/:id

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::validate::{no_changes, non_negative_price, parse_id, trim, validated, Normalize};
use crate::database::models::{NewProduct, Product, ProductChanges};
use crate::error::ErrorBody;
use crate::filter::{ListParams, Page, ProductQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    #[schema(example = "Laptop")]
    pub name: String,
    #[validate(length(min = 1, max = 4096, message = "must be 1-4096 characters"))]
    pub description: String,
    #[validate(custom(function = "non_negative_price"))]
    #[schema(example = 999.99)]
    pub price: f64,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    #[schema(example = "Electronics")]
    pub category: String,
}

impl Normalize for CreateProductRequest {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.description);
        trim(&mut self.category);
    }
}

/// Partial update; at least one field must be present.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "has_product_changes"))]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 4096, message = "must be 1-4096 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub category: Option<String>,
}

impl Normalize for UpdateProductRequest {
    fn normalize(&mut self) {
        for field in [&mut self.name, &mut self.description, &mut self.category].into_iter().flatten() {
            trim(field);
        }
    }
}

impl UpdateProductRequest {
    fn into_changes(self) -> ProductChanges {
        ProductChanges {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
        }
    }
}

fn has_product_changes(request: &UpdateProductRequest) -> Result<(), ValidationError> {
    let unchanged = request.name.is_none()
        && request.description.is_none()
        && request.price.is_none()
        && request.category.is_none();
    if unchanged {
        Err(no_changes())
    } else {
        Ok(())
    }
}

/// GET /api/v1/products - paginated, filterable listing
///
/// Query: `page`, `limit`, `sortField`, `sortOrder`, `category`, `search`.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListParams),
    responses(
        (status = 200, description = "One page of products", body = Page<Product>),
        (status = 400, description = "Invalid paging, sort or filter", body = ErrorBody)
    ),
    tag = "products"
)]
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<Product>> {
    let Query(params) = params?;
    let query = ProductQuery::from_params(params, &state.config.api)?;

    let page = state.products.list(&query).await?;
    Ok(ApiResponse::with_message(page, "Products retrieved successfully"))
}

/// GET /api/v1/products/:id
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "No such product", body = ErrorBody)
    ),
    tag = "products"
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let id = parse_id(&id)?;
    let product = state.products.get(id).await?;
    Ok(ApiResponse::success(product))
}

/// POST /api/v1/products
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Caller is not ADMIN", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<Product> {
    let body = validated(payload)?;
    let product = NewProduct {
        name: body.name,
        description: body.description,
        price: body.price,
        category: body.category,
    };

    let product = state.products.create(product).await?;
    Ok(ApiResponse::created(product, "Product created successfully"))
}

/// PATCH /api/v1/products/:id - partial update, at least one field
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Caller is not ADMIN", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<Product> {
    let id = parse_id(&id)?;
    let changes = validated(payload)?.into_changes();

    let product = state.products.update(id, changes).await?;
    Ok(ApiResponse::with_message(product, "Product updated successfully"))
}

/// DELETE /api/v1/products/:id - returns the removed product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = Product),
        (status = 403, description = "Caller is not ADMIN", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let id = parse_id(&id)?;
    let product = state.products.delete(id).await?;
    Ok(ApiResponse::with_message(product, "Product deleted successfully"))
}
