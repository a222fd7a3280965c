//! Request metrics middleware
//!
//! Records a request counter and latency histogram per matched route.
//! Unmatched paths are folded into one label so scanners cannot blow up
//! label cardinality.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use shopscout_common::metrics::RequestMetrics;

const UNMATCHED_ROUTE: &str = "unmatched";

pub async fn track_requests(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let metrics = RequestMetrics::start(request.method().as_str(), &endpoint);
    let response = next.run(request).await;
    metrics.finish(response.status().as_u16());

    response
}
