pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod performance;
pub mod purchase_orders;
pub mod query;
pub mod validation;
pub mod vendors;

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts},
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, AuthenticatedUser, TokenService};
use auth::repository::UserRepository;
use error::ApiError;
use purchase_orders::PurchaseOrderService;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::obtain_token_handler,
        auth::handlers::refresh_token_handler,
        vendors::handlers::create_vendor,
        vendors::handlers::list_vendors,
        vendors::handlers::get_vendor,
        vendors::handlers::update_vendor,
        vendors::handlers::patch_vendor,
        vendors::handlers::delete_vendor,
        performance::handlers::get_vendor_performance,
        performance::handlers::get_vendor_history,
        purchase_orders::handlers::create_purchase_order,
        purchase_orders::handlers::list_purchase_orders,
        purchase_orders::handlers::get_purchase_order,
        purchase_orders::handlers::update_purchase_order,
        purchase_orders::handlers::patch_purchase_order,
        purchase_orders::handlers::delete_purchase_order,
        purchase_orders::handlers::acknowledge_purchase_order,
    ),
    components(
        schemas(
            auth::TokenRequest,
            auth::RefreshRequest,
            auth::TokenPairResponse,
            auth::AccessTokenResponse,
            vendors::Vendor,
            vendors::VendorRequest,
            vendors::VendorPatch,
            performance::VendorPerformance,
            performance::HistoricalPerformance,
            purchase_orders::LineItem,
            purchase_orders::PurchaseOrderStatus,
            purchase_orders::PurchaseOrderRequest,
            purchase_orders::PurchaseOrderPatch,
            purchase_orders::PurchaseOrderResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "vendors", description = "Vendor management"),
        (name = "performance", description = "Vendor performance metrics"),
        (name = "purchase_orders", description = "Purchase orders and acknowledgment")
    ),
    info(
        title = "Vendor Management API",
        version = "1.0.0",
        description = "Vendors, purchase orders and vendor performance metrics"
    )
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by the protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub token_service: Arc<TokenService>,
    pub auth_service: AuthService,
    pub purchase_order_service: PurchaseOrderService,
}

impl AppState {
    pub fn new(db: PgPool, token_service: TokenService) -> Self {
        let token_service = Arc::new(token_service);
        let auth_service = AuthService::new(UserRepository::new(db.clone()), token_service.clone());
        let purchase_order_service = PurchaseOrderService::new(db.clone());

        Self {
            db,
            token_service,
            auth_service,
            purchase_order_service,
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.token_service.clone()
    }
}

/// JSON body extractor whose rejections use the API error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the API error envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor whose rejections use the API error envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Creates and configures the application router
///
/// `/token/` endpoints and the API docs are public; every `/api` route
/// requires a valid access token.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(
            "/vendors/",
            get(vendors::list_vendors).post(vendors::create_vendor),
        )
        .route(
            "/vendors/:id/",
            get(vendors::get_vendor)
                .put(vendors::update_vendor)
                .patch(vendors::patch_vendor)
                .delete(vendors::delete_vendor),
        )
        .route("/vendors/:id/performance/", get(performance::get_vendor_performance))
        .route("/vendors/:id/history/", get(performance::get_vendor_history))
        .route(
            "/purchase_orders/",
            get(purchase_orders::list_purchase_orders).post(purchase_orders::create_purchase_order),
        )
        .route(
            "/purchase_orders/:id/",
            get(purchase_orders::get_purchase_order)
                .put(purchase_orders::update_purchase_order)
                .patch(purchase_orders::patch_purchase_order)
                .delete(purchase_orders::delete_purchase_order),
        )
        .route(
            "/purchase_orders/:id/acknowledge/",
            patch(purchase_orders::acknowledge_purchase_order).put(purchase_orders::acknowledge_purchase_order),
        )
        .route_layer(middleware::from_extractor_with_state::<AuthenticatedUser, _>(
            state.clone(),
        ));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/token/", post(auth::obtain_token_handler))
        .route("/token/refresh/", post(auth::refresh_token_handler))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
