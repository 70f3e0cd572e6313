pub mod extract;
pub mod handlers;

use crate::config::ServerConfig;
use crate::core::auth::TokenIssuer;
use crate::core::gateway::GenerationGateway;
use crate::domain::ports::{ProposalStore, TemplateStore, UserStore};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, request::Parts, HeaderValue, Method, StatusCode};
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared per-process handles; cheap to clone into every request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub proposals: Arc<dyn ProposalStore>,
    pub templates: Arc<dyn TemplateStore>,
    pub tokens: TokenIssuer,
    pub gateway: GenerationGateway,
}

impl AppState {
    /// Uses one backing store for all three collections.
    pub fn with_store<S>(store: Arc<S>, tokens: TokenIssuer, gateway: GenerationGateway) -> Self
    where
        S: UserStore + ProposalStore + TemplateStore + 'static,
    {
        Self {
            users: store.clone(),
            proposals: store.clone(),
            templates: store,
            tokens,
            gateway,
        }
    }
}

pub fn is_local_origin(origin: &str) -> bool {
    origin.starts_with("http://localhost:") || origin.starts_with("http://127.0.0.1:")
}

/// 依環境建立 CORS 設定；開發模式額外允許本機任意 port
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let allowed: Vec<HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();
    let development = config.is_development();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                allowed.contains(origin)
                    || (development && origin.to_str().is_ok_and(is_local_origin))
            },
        ))
}

pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    let api_router = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/proposals",
            get(handlers::proposals::list_proposals).post(handlers::proposals::create_proposal),
        )
        .route(
            "/proposals/{id}",
            get(handlers::proposals::get_proposal).put(handlers::proposals::update_proposal),
        )
        .route(
            "/templates",
            get(handlers::templates::list_templates).post(handlers::templates::create_template),
        )
        .route(
            "/templates/{id}",
            put(handlers::templates::update_template).delete(handlers::templates::delete_template),
        )
        .route(
            "/ai/generate-proposal",
            post(handlers::ai::generate_proposal),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_router)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.request_timeout(),
                ))
                .layer(DefaultBodyLimit::max(config.max_body_bytes))
                .layer(build_cors_layer(config))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}
