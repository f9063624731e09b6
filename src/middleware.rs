use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

/// Logs method, path, status and elapsed time for every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = started.elapsed();
    if status.is_server_error() {
        log::error!("{} {} -> {} ({:?})", method, path, status.as_u16(), elapsed);
    } else if status.is_client_error() {
        log::warn!("{} {} -> {} ({:?})", method, path, status.as_u16(), elapsed);
    } else {
        log::info!("{} {} -> {} ({:?})", method, path, status.as_u16(), elapsed);
    }
    response
}
