// ABOUTME: HTTP API layer for Canopy providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod access_handlers;
pub mod auth;
pub mod auth_handlers;
pub mod interviews_handlers;
pub mod products_handlers;
pub mod reminders_handlers;
pub mod response;
pub mod state;
pub mod tasks_handlers;
pub mod users_handlers;

pub use state::AppState;

/// Creates the full API router mounted under /api
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", create_auth_router())
        .nest("/api/users", create_users_router())
        .nest("/api/products", create_products_router())
        .nest("/api/templates", create_templates_router())
        .nest("/api/reminders", create_reminders_router())
        .route("/api/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "Product management backend is running"
}

fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth_handlers::signup))
        .route("/login", post(auth_handlers::login))
}

fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users_handlers::get_current_user))
        .route("/me", put(users_handlers::update_profile))
        .route("/{user_id}/approve", post(users_handlers::approve_user))
}

fn create_products_router() -> Router<AppState> {
    Router::new()
        .route("/", get(products_handlers::list_products))
        .route("/", post(products_handlers::create_product))
        .route("/{id}", get(products_handlers::get_product))
        .route("/{id}", put(products_handlers::update_product))
        .route("/{id}", delete(products_handlers::delete_product))
        // Iteration hierarchy
        .route("/{id}/iterations", get(products_handlers::list_iterations))
        .route("/{id}/iterations", post(products_handlers::create_iteration))
        .route("/{id}/context", get(products_handlers::get_iteration_context))
        // AI document drafting
        .route(
            "/{id}/documents/{kind}/generate",
            post(products_handlers::generate_document),
        )
        // Access grants
        .route("/{id}/access", get(access_handlers::list_grants))
        .route("/{id}/access", post(access_handlers::invite))
        .route("/{id}/access/{user_id}", put(access_handlers::update_role))
        .route("/{id}/access/{user_id}", delete(access_handlers::revoke))
        // Tasks
        .route("/{id}/tasks", get(tasks_handlers::list_tasks))
        .route("/{id}/tasks", post(tasks_handlers::create_task))
        .route("/{id}/tasks/{task_id}", get(tasks_handlers::get_task))
        .route("/{id}/tasks/{task_id}", put(tasks_handlers::update_task))
        .route("/{id}/tasks/{task_id}", delete(tasks_handlers::delete_task))
        // Customer interviews
        .route("/{id}/interviews", get(interviews_handlers::list_interviews))
        .route("/{id}/interviews", post(interviews_handlers::create_interview))
        .route(
            "/{id}/interviews/{interview_id}",
            get(interviews_handlers::get_interview),
        )
        .route(
            "/{id}/interviews/{interview_id}",
            put(interviews_handlers::update_interview),
        )
        .route(
            "/{id}/interviews/{interview_id}",
            delete(interviews_handlers::delete_interview),
        )
}

fn create_templates_router() -> Router<AppState> {
    Router::new()
        .route("/", get(interviews_handlers::list_templates))
        .route("/", post(interviews_handlers::create_template))
        .route("/{template_id}", get(interviews_handlers::get_template))
        .route("/{template_id}", put(interviews_handlers::update_template))
        .route("/{template_id}", delete(interviews_handlers::delete_template))
}

fn create_reminders_router() -> Router<AppState> {
    Router::new()
        .route("/", get(reminders_handlers::list_reminders))
        .route("/", post(reminders_handlers::create_reminder))
        .route("/due", get(reminders_handlers::list_due_reminders))
        .route("/{reminder_id}", get(reminders_handlers::get_reminder))
        .route("/{reminder_id}", put(reminders_handlers::update_reminder))
        .route("/{reminder_id}", delete(reminders_handlers::delete_reminder))
}
