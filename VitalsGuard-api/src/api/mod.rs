pub mod handlers;
pub mod routes;

use axum::Router;

/// Create the application with all routes and middleware
pub async fn create_application() -> Router {
    routes::create_app().await
}
