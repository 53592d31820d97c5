use crate::{
    api::handlers::{
        employee, employee::__path_create_employee_profile, health, health::__path_health, login,
        login::__path_login, logout, logout::__path_logout, me, me::__path_me, password_reset,
        password_reset::__path_password_reset, register, register::__path_register, roles,
        roles::__path_validate_employee, roles::__path_validate_manager,
        roles::__path_validate_sponsor, root, root::__path_root, throttle_status,
        throttle_status::__path_throttle_status, types,
    },
    error::ErrorResponse,
    provider::{types as records, Provider},
    throttle::{Throttle, ThrottleStatus},
};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal, sync::mpsc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        health,
        register,
        login,
        me,
        logout,
        password_reset,
        create_employee_profile,
        validate_manager,
        validate_employee,
        validate_sponsor,
        throttle_status
    ),
    components(schemas(
        health::Health,
        root::ServiceInfo,
        types::RegisterRequest,
        types::LoginRequest,
        types::PasswordResetRequest,
        types::EmployeeCreateRequest,
        types::AuthResponse,
        types::MessageResponse,
        types::RoleCheckResponse,
        types::ThrottleStatusResponse,
        ErrorResponse,
        ThrottleStatus,
        records::Role,
        records::SalaryType,
        records::EmployeeStatus,
        records::UserRecord,
        records::EmployeeRecord
    )),
    tags(
        (name = "auth", description = "Authentication and access control API"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    frontend_url: &str,
    provider: Arc<Provider>,
    throttle: Arc<Throttle>,
) -> Result<()> {
    // Interrupt or terminate signals feed the shutdown channel
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = tx.send(());
    });

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::exact(frontend_origin(frontend_url)?))
        .allow_credentials(true);

    let app = Router::new()
        .route("/", get(root::root))
        .route("/api/auth/register", post(register::register))
        .route("/api/auth/login", post(login::login))
        .route("/api/auth/me", get(me::me))
        .route("/api/auth/logout", post(logout::logout))
        .route("/api/auth/password-reset", post(password_reset::password_reset))
        .route(
            "/api/auth/employee-profile",
            post(employee::create_employee_profile),
        )
        .route("/api/auth/validate-manager", get(roles::validate_manager))
        .route("/api/auth/validate-employee", get(roles::validate_employee))
        .route("/api/auth/validate-sponsor", get(roles::validate_sponsor))
        .route(
            "/api/auth/rate-limit-status",
            get(throttle_status::throttle_status),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(throttle.clone()))
                .layer(Extension(provider.clone())),
        )
        .route(
            "/health",
            get(handlers::health::health).options(handlers::health::health),
        )
        .layer(Extension(provider));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            rx.recv().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn frontend_origin(frontend_base_url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(frontend_base_url)
        .with_context(|| format!("Invalid frontend base URL: {frontend_base_url}"))?;
    let host = parsed.host_str().ok_or_else(|| {
        anyhow!("Frontend base URL must include a valid host: {frontend_base_url}")
    })?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            error!("Failed to listen for interrupt signal: {}", error);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                error!("Failed to install terminate signal handler: {}", error);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => (),
        () = terminate => (),
    }
}
