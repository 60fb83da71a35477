use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use videomenu_catalog::MenuService;
use videomenu_common::Config;

use crate::graphql::context::AuthContext;
use crate::graphql::{self, AppSchema};
use crate::jwt::{bearer_token, Claims, JwtService};

#[derive(Clone)]
pub struct AppState {
    schema: AppSchema,
    jwt_service: Option<JwtService>,
}

pub fn build_router(config: &Config, service: Arc<MenuService>) -> Router {
    let jwt_service = config
        .jwt_secret
        .as_ref()
        .map(|secret| JwtService::new(secret, config.jwt_issuer.clone()));
    if jwt_service.is_none() {
        tracing::warn!("JWT_SECRET not set, platform queries will be rejected");
    }

    let schema = graphql::build_schema(service);

    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/graphql", get(graphiql_handler).post(graphql_handler))
        .route("/health", get(health))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(AppState {
            schema,
            jwt_service,
        })
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let claims = state.jwt_service.as_ref().and_then(|jwt| {
        let header = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        extract_claims(jwt, header)
    });

    let request = req.into_inner().data(AuthContext(claims));
    let response = state.schema.execute(request).await;
    if !response.errors.is_empty() {
        tracing::warn!(errors = ?response.errors, "GraphQL errors");
    }
    response.into()
}

/// Claims from an `Authorization` header. Invalid tokens are treated as absent.
fn extract_claims(jwt: &JwtService, header: Option<&str>) -> Option<Claims> {
    let token = bearer_token(header)?;
    jwt.verify_token(token)
        .inspect_err(|e| tracing::debug!(error = %e, "Bearer token rejected"))
        .ok()
}

async fn graphiql_handler() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health() -> &'static str {
    "ok"
}
