//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy layer and static fallback
//! - Wire up middleware (request ID, tracing)
//! - Bound every request by `timeouts.request_secs`
//! - Bind server to listener
//! - Forward matched requests to their upstream
//! - Serve everything else from the source directory
//!
//! # Request Flow
//! ```text
//! SetRequestId → Trace → PropagateRequestId
//!     → proxy layer (deadline) ── rule matched ──→ upstream (hyper client)
//!            └──────── no match ──────→ ServeDir(src_dir) / 404
//! ```

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{Uri, Version},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::Span;

use crate::config::{Mode, ProxyConfig};
use crate::http::headers::{prepare_upstream_headers, strip_hop_by_hop};
use crate::http::request::{MakeRequestUuid, RequestIdExt};
use crate::http::response::ProxyError;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{RouteError, Router as ProxyRouter};

/// Client used for upstream calls.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Application state injected into the proxy layer.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub client: UpstreamClient,
    /// Deadline for a whole request, proxied or local.
    pub request_timeout: Duration,
}

/// HTTP server for the development proxy.
pub struct HttpServer {
    router: Router,
    routes: Arc<ProxyRouter>,
    config: ProxyConfig,
    mode: Mode,
}

impl HttpServer {
    /// Create a new HTTP server for the profile active in `mode`.
    pub fn new(config: ProxyConfig, mode: Mode) -> Result<Self, RouteError> {
        let routes = Arc::new(ProxyRouter::for_mode(&config, mode)?);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            router: routes.clone(),
            client,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            routes,
            config,
            mode,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .fallback_service(ServeDir::new(&config.src_dir))
            .layer(middleware::from_fn_with_state(state, proxy_layer))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = %self.mode,
            src_dir = %self.config.src_dir,
            rules = self.routes.routes().len(),
            "HTTP server starting"
        );
        for route in self.routes.routes() {
            tracing::info!(pattern = %route.pattern, target = %route.target, "Proxy rule active");
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for serving on a custom transport.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn routes(&self) -> &ProxyRouter {
        &self.routes
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

fn request_span(request: &Request) -> Span {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        request_id = %request.request_id(),
        method = %request.method(),
        uri = %request.uri(),
        peer = %peer,
    )
}

/// Proxy layer.
/// Forwards requests matching a rule; hands the rest to the inner service.
/// Both paths share the request deadline and report overruns as `ProxyError::Timeout`.
async fn proxy_layer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let deadline = state.request_timeout;
    let method = request.method().to_string();

    let matched = state.router.find(request.uri().path()).map(|m| {
        (
            m.route.pattern.to_string(),
            m.upstream(request.uri().query()),
        )
    });

    let Some((route, upstream)) = matched else {
        let response = match tokio::time::timeout(deadline, next.run(request)).await {
            Ok(response) => response,
            Err(elapsed) => {
                tracing::warn!(error = %elapsed, "Local request timed out");
                ProxyError::from(elapsed).into_response()
            }
        };
        metrics::record_request(&method, response.status().as_u16(), metrics::LOCAL_ROUTE, start);
        return response;
    };

    let result = match upstream {
        Ok(upstream) => {
            tracing::debug!(route = %route, upstream = %upstream, "Proxying request");
            tokio::time::timeout(deadline, forward(&state.client, request, upstream))
                .await
                .unwrap_or_else(|elapsed| Err(elapsed.into()))
        }
        Err(e) => Err(ProxyError::from(e)),
    };

    let response = result.unwrap_or_else(|e| {
        tracing::error!(route = %route, error = %e, "Proxy request failed");
        e.into_response()
    });

    metrics::record_request(&method, response.status().as_u16(), &route, start);
    response
}

/// Send `request` to `upstream` and relay the answer.
///
/// Method, end-to-end headers and body go out unchanged; the upstream status,
/// end-to-end headers and body come back unchanged. Bodies are streamed.
pub async fn forward(
    client: &UpstreamClient,
    request: Request,
    upstream: Uri,
) -> Result<Response, ProxyError> {
    let (mut parts, body) = request.into_parts();
    prepare_upstream_headers(&mut parts.headers);
    parts.uri = upstream;
    parts.version = Version::HTTP_11;

    let response: hyper::Response<Incoming> =
        client.request(Request::from_parts(parts, body)).await?;

    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Ok(Response::from_parts(parts, Body::new(body)))
}
