// ABOUTME: HTTP request handlers for products, iterations, and document drafting
// ABOUTME: Every product-scoped operation passes through the access evaluator

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use canopy_ai::prompts::build_prompt;
use canopy_products::{
    DocumentKind, IterationContext, Product, ProductCreateInput, ProductUpdateInput, Role,
};

use crate::auth::CurrentUser;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// List products visible to the caller: owned directly or via any grant.
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state
        .product_storage
        .list_products_for_user(&current_user.id)
        .await?;
    Ok(Json(ApiResponse::success(products)))
}

/// Create a root product. The caller becomes its owner.
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ProductCreateInput>,
) -> ApiResult<impl IntoResponse> {
    let product = state
        .product_storage
        .create_product(&current_user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let product = state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Viewer)
        .await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
    Json(input): Json<ProductUpdateInput>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Editor)
        .await?;

    let product = state
        .product_storage
        .update_product(&product_id, input)
        .await?;
    Ok(Json(ApiResponse::success(product)))
}

/// Delete a product and cascade through its subtree. Owner only.
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state
        .hierarchy
        .delete_product(&current_user.id, &product_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

/// List the direct child iterations of a product.
pub async fn list_iterations(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Viewer)
        .await?;

    let children = state.product_storage.list_children(&product_id).await?;
    Ok(Json(ApiResponse::success(children)))
}

/// Create a child iteration under a product. Editor access on the parent.
pub async fn create_iteration(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
    Json(input): Json<ProductCreateInput>,
) -> ApiResult<impl IntoResponse> {
    let child = state
        .hierarchy
        .create_child(&current_user.id, &product_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(child))))
}

/// Expose the assembled cross-iteration context for a product.
pub async fn get_iteration_context(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ApiResponse<IterationContext>>> {
    let product = state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Viewer)
        .await?;

    let context = state.hierarchy.assemble_iteration_context(&product).await?;
    Ok(Json(ApiResponse::success(context)))
}

#[derive(Deserialize, Default)]
pub struct GenerateDocumentRequest {
    #[serde(default)]
    pub user_input: String,
}

#[derive(Serialize)]
pub struct GenerateDocumentResponse {
    pub document: String,
    pub product: Product,
}

/// Draft a document with the AI collaborator and persist it.
///
/// Editor access. The iteration context is assembled into the prompt; on
/// success the document and its phase status are written together. On AI
/// failure nothing is written.
pub async fn generate_document(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, kind)): Path<(String, String)>,
    Json(request): Json<GenerateDocumentRequest>,
) -> ApiResult<Json<ApiResponse<GenerateDocumentResponse>>> {
    let kind: DocumentKind = kind.parse()?;

    let product = state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Editor)
        .await?;

    let context = state.hierarchy.assemble_iteration_context(&product).await?;
    let prompt = build_prompt(kind, &product.name, &request.user_input, &context);

    let document = state.ai.generate_text(prompt).await?;

    let product = state
        .product_storage
        .save_generated_document(&product_id, kind, &document)
        .await?;

    info!(
        "Generated {} document for product {}",
        kind.document_column(),
        product_id
    );

    Ok(Json(ApiResponse::success(GenerateDocumentResponse {
        document,
        product,
    })))
}
