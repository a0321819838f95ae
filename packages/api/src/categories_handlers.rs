// ABOUTME: HTTP request handlers for category operations
// ABOUTME: Handles CRUD for categories; deletes move scans to General

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use scansheet_categories::{CategoryCreateInput, CategoryUpdateInput};

use crate::db::DbState;
use crate::error::AppError;
use crate::response::{created, ok};

/// List all categories with their scan counts
pub async fn list_categories(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing categories");

    match db.category_storage.list_categories().await {
        Ok(categories) => ok(categories),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Get a single category by ID
pub async fn get_category(
    State(db): State<DbState>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    info!("Getting category: {}", category_id);

    match db.category_storage.get_category(&category_id).await {
        Ok(category) => ok(category),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Request body for creating a category
#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_category(
    State(db): State<DbState>,
    Json(request): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    info!("Creating category: {}", request.name);

    let input = CategoryCreateInput {
        name: request.name,
        description: request.description,
    };

    match db.category_storage.create_category(input).await {
        Ok(category) => created(category),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Request body for updating a category
#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn update_category(
    State(db): State<DbState>,
    Path(category_id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    info!("Updating category: {}", category_id);

    let input = CategoryUpdateInput {
        name: request.name,
        description: request.description,
    };

    match db.category_storage.update_category(&category_id, input).await {
        Ok(category) => ok(category),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Delete a category, reassigning its scans to General
pub async fn delete_category(
    State(db): State<DbState>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting category: {}", category_id);

    match db.category_storage.delete_category(&category_id).await {
        Ok(outcome) => ok(outcome),
        Err(e) => AppError::from(e).into_response(),
    }
}
