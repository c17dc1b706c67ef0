use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use super::{AuthenticatedUser, MessageResponse};
use crate::domain::cart::Cart;
use crate::domain::ids::ObjectId;
use crate::domain::product::Product;
use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::{CartItemRequest, UpdateCartItemRequest};

// ── Response DTOs ────────────────────────────────────────────────────────────

/// Current catalog details of a cart item's product.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub name: String,
    pub price: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub product_id: String,
    pub quantity: i32,
    /// Price recorded when the item was last added or updated.
    pub price_at_addition: String,
    pub line_total: String,
    /// Present only on `GET /api/cart`, and only while the product exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    /// Absent when the user has no stored cart yet.
    pub id: Option<String>,
    pub user_id: String,
    pub items: Vec<CartItemResponse>,
    pub item_count: i64,
    pub subtotal: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl CartResponse {
    fn new(cart: &Cart, products: Option<&HashMap<ObjectId, Product>>) -> Self {
        let items = cart
            .items
            .iter()
            .map(|item| CartItemResponse {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
                price_at_addition: item.price_at_addition.to_string(),
                line_total: item.line_total().to_string(),
                product: products
                    .and_then(|p| p.get(&item.product_id))
                    .map(|p| ProductSummary {
                        name: p.name.clone(),
                        price: p.price.to_string(),
                        image_url: p.image_url.clone(),
                    }),
            })
            .collect();

        Self {
            id: cart.id.as_ref().map(ToString::to_string),
            user_id: cart.user_id.to_string(),
            items,
            item_count: cart.item_count(),
            subtotal: cart.subtotal().to_string(),
            created_at: cart.created_at.map(|t| t.to_rfc3339()),
            updated_at: cart.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/cart
///
/// Returns the caller's cart with current product details. A user without a
/// cart gets an empty one; nothing is stored.
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "The caller's cart", body = CartResponse),
        (status = 401, description = "Missing or invalid token", body = super::ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let carts = state.carts.clone();

    let view = web::block(move || carts.view(&user.0))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::new(&view.cart, Some(&view.products))))
}

/// POST /api/cart
///
/// Adds a product, accumulating onto an existing entry for the same product.
#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = CartItemRequest,
    responses(
        (status = 201, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Invalid input or insufficient stock", body = super::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = super::ErrorResponse),
        (status = 404, description = "Product not found", body = super::ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.validate()?;
    let carts = state.carts.clone();

    let cart = web::block(move || carts.add_item(&user.0, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CartResponse::new(&cart, None)))
}

/// PUT /api/cart/{product_id}
///
/// Sets the quantity of a product already in the cart.
#[utoipa::path(
    put,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = String, Path, description = "24-character hexadecimal product id"),
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Invalid input or insufficient stock", body = super::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = super::ErrorResponse),
        (status = 404, description = "Product, cart or cart item not found", body = super::ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn update_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let quantity = body.validate()?;
    let product_id = path.into_inner();
    let carts = state.carts.clone();

    let cart = web::block(move || carts.update_item(&user.0, &product_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::new(&cart, None)))
}

/// DELETE /api/cart/{product_id}
#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = String, Path, description = "24-character hexadecimal product id"),
    ),
    responses(
        (status = 200, description = "Product removed", body = MessageResponse),
        (status = 400, description = "Malformed product id", body = super::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = super::ErrorResponse),
        (status = 404, description = "Cart or cart item not found", body = super::ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let carts = state.carts.clone();

    web::block(move || carts.remove_item(&user.0, &product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Product removed from cart".to_string(),
    }))
}
