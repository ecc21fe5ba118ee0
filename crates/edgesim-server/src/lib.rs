//! HTTP front end for the telemetry simulator.
//!
//! Exposes node births, device births, device data, metric lookups and write
//! acknowledgements as JSON endpoints, so a pipeline under test can pull
//! payloads without a broker in between.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use log::info;
use serde::Serialize;

use edgesim_core::{
    DataSimulator, DeviceDescriptor, EdgeNodeDescriptor, Metric, RandomDataSimulator,
    SimulatorError, SourceId,
};

/// Shared server state.
struct AppState {
    sim: RandomDataSimulator,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct PayloadResponse<T: Serialize> {
    success: bool,
    source: String,
    payload: T,
}

#[derive(Serialize)]
struct MetricLookupResponse {
    source: String,
    name: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    metric: Option<Metric>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    sources: usize,
    payloads_built: u64,
    failures: u64,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Status code for a failed birth/data request.
fn status_for(err: &SimulatorError) -> StatusCode {
    match err {
        SimulatorError::UnknownDevice(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(status: StatusCode, error: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error,
        }),
    )
}

fn error_response(err: SimulatorError) -> (StatusCode, Json<ErrorResponse>) {
    failure(status_for(&err), err.to_string())
}

/// A write body that is not a well-typed metric is a client error.
fn rejection_response(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    failure(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn payload_response<T: Serialize>(source: impl ToString, payload: T) -> Json<PayloadResponse<T>> {
    Json(PayloadResponse {
        success: true,
        source: source.to_string(),
        payload,
    })
}

fn lookup(sim: &RandomDataSimulator, source: SourceId, name: String) -> Json<MetricLookupResponse> {
    let exists = sim.has_metric(&source, &name);
    Json(MetricLookupResponse {
        metric: sim.metric(&source, &name),
        source: source.to_string(),
        name,
        exists,
    })
}

async fn handle_node_birth(
    State(state): State<Arc<AppState>>,
    Path((group, node)): Path<(String, String)>,
) -> ApiResult<PayloadResponse<edgesim_core::PayloadMap>> {
    let node = EdgeNodeDescriptor::new(group, node);
    let payload = state.sim.node_birth(&node).map_err(error_response)?;
    Ok(payload_response(node, payload))
}

async fn handle_device_birth(
    State(state): State<Arc<AppState>>,
    Path((group, node, device)): Path<(String, String, String)>,
) -> ApiResult<PayloadResponse<edgesim_core::Payload>> {
    let device = DeviceDescriptor::new(group, node, device);
    let payload = state.sim.device_birth(&device).map_err(error_response)?;
    Ok(payload_response(device, payload))
}

async fn handle_device_data(
    State(state): State<Arc<AppState>>,
    Path((group, node, device)): Path<(String, String, String)>,
) -> ApiResult<PayloadResponse<edgesim_core::Payload>> {
    let device = DeviceDescriptor::new(group, node, device);
    let payload = state.sim.device_data(&device).map_err(error_response)?;
    Ok(payload_response(device, payload))
}

async fn handle_node_metric(
    State(state): State<Arc<AppState>>,
    Path((group, node, name)): Path<(String, String, String)>,
) -> Json<MetricLookupResponse> {
    let source = SourceId::from(EdgeNodeDescriptor::new(group, node));
    lookup(&state.sim, source, name)
}

async fn handle_device_metric(
    State(state): State<Arc<AppState>>,
    Path((group, node, device, name)): Path<(String, String, String, String)>,
) -> Json<MetricLookupResponse> {
    let source = SourceId::from(DeviceDescriptor::new(group, node, device));
    lookup(&state.sim, source, name)
}

async fn handle_node_write(
    State(state): State<Arc<AppState>>,
    Path((group, node)): Path<(String, String)>,
    body: Result<Json<Metric>, JsonRejection>,
) -> ApiResult<Metric> {
    let Json(metric) = body.map_err(rejection_response)?;
    let source = SourceId::from(EdgeNodeDescriptor::new(group, node));
    Ok(Json(state.sim.handle_metric_write(&source, metric)))
}

async fn handle_device_write(
    State(state): State<Arc<AppState>>,
    Path((group, node, device)): Path<(String, String, String)>,
    body: Result<Json<Metric>, JsonRejection>,
) -> ApiResult<Metric> {
    let Json(metric) = body.map_err(rejection_response)?;
    let source = SourceId::from(DeviceDescriptor::new(group, node, device));
    Ok(Json(state.sim.handle_metric_write(&source, metric)))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let report = state.sim.report();
    Json(HealthResponse {
        status: if report.failures == 0 {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        sources: report.total,
        payloads_built: report.payloads_built,
        failures: report.failures,
    })
}

async fn handle_sources(
    State(state): State<Arc<AppState>>,
) -> Json<edgesim_core::SimulatorReport> {
    Json(state.sim.report())
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "edgesim server",
        "version": edgesim_core::VERSION,
        "node_metrics": state.sim.num_node_metrics(),
        "value_ranges": state.sim.value_ranges().to_string(),
        "endpoints": {
            "/": "This API index",
            "/nodes/{group}/{node}/birth": "GET node birth (NBIRTH)",
            "/devices/{group}/{node}/{device}/birth": "GET device birth (DBIRTH)",
            "/devices/{group}/{node}/{device}/data": "GET device data (DDATA)",
            "/nodes/{group}/{node}/metrics/{name}": "GET whether the node reports a metric",
            "/devices/{group}/{node}/{device}/metrics/{name}": "GET whether the device reports a metric",
            "/nodes/{group}/{node}/metrics": "POST a metric write to a node",
            "/devices/{group}/{node}/{device}/metrics": "POST a metric write to a device",
            "/sources": "Recorded state per source",
            "/health": "Health check",
        },
        "examples": {
            "node_birth": "/nodes/G1/E1/birth",
            "device_data": "/devices/G1/E1/D1/data",
            "lookup": "/nodes/G1/E1/metrics/NT-0",
        }
    }))
}

/// Build the axum router.
pub fn build_router(sim: RandomDataSimulator) -> Router {
    let state = Arc::new(AppState { sim });

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/sources", get(handle_sources))
        .route("/nodes/{group}/{node}/birth", get(handle_node_birth))
        .route(
            "/nodes/{group}/{node}/metrics",
            axum::routing::post(handle_node_write),
        )
        .route("/nodes/{group}/{node}/metrics/{name}", get(handle_node_metric))
        .route(
            "/devices/{group}/{node}/{device}/birth",
            get(handle_device_birth),
        )
        .route(
            "/devices/{group}/{node}/{device}/data",
            get(handle_device_data),
        )
        .route(
            "/devices/{group}/{node}/{device}/metrics",
            axum::routing::post(handle_device_write),
        )
        .route(
            "/devices/{group}/{node}/{device}/metrics/{name}",
            get(handle_device_metric),
        )
        .with_state(state)
}

/// Run the HTTP server until the listener fails.
pub async fn run_server(sim: RandomDataSimulator, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(sim);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("edgesim server listening on http://{addr}");
    axum::serve(listener, app).await
}
