//! Request metrics middleware

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::infrastructure::observability::record_http_request;

/// Records a counter and latency histogram per handled request
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());
    response
}
