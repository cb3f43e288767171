use crate::api::handlers::{agents, conversations, health, tools};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/agents",
            get(agents::list_agents).post(agents::create_agent),
        )
        .route("/agents/{id}", get(agents::get_agent))
        .route("/agents/{id}/tools", post(agents::assign_tool))
        .route("/tools", get(tools::list_tools))
        .route("/conversations", post(conversations::run_conversation))
}

/// Full application: routes, state, CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
