use std::time::Duration;

use axum::{
	extract::{MatchedPath, Request},
	response::Response,
	Router,
};
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{debug, error, info_span, Span};

/// One `http_request` span per request, tagged with method and route.
pub fn tower_trace(routes: Router) -> Router {
	routes.layer(
		TraceLayer::new_for_http()
			.make_span_with(|request: &Request<_>| {
				let matched_path = request
					.extensions()
					.get::<MatchedPath>()
					.map(MatchedPath::as_str);

				info_span!(
					"http_request",
					method = ?request.method(),
					path = request.uri().path(),
					matched_path,
				)
			})
			.on_request(|request: &Request, _span: &Span| {
				debug!("new request: {} {}", request.method(), request.uri().path())
			})
			.on_response(|response: &Response, latency: Duration, _span: &Span| {
				debug!(status = %response.status(), "response generated in {:?}", latency)
			})
			.on_failure(|error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
				error!("request failed: {} after {:?}", error, latency)
			}),
	)
}
