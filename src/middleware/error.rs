use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use gatehouse_config::Environment;
use gatehouse_core::{AppError, ErrorKind, ErrorReport};
use tracing::{error, warn};

/// Last stop for failed requests.
///
/// Every [`AppError`](gatehouse_core::AppError) raised further down has
/// already been rendered into the standard envelope and tagged with an
/// [`ErrorReport`]. This layer logs it with the request's method and path,
/// and in development swaps the body of internal failures for the detailed
/// one. Error responses produced by axum itself (405, body limits, extractor
/// rejections) carry no report and are re-rendered into the envelope here.
/// Handlers that answer an error status with their own JSON body, like the
/// readiness check, are left alone.
pub async fn handle_errors(
    State(environment): State<Environment>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;

    let (report, response) = match response.extensions().get::<ErrorReport>().cloned() {
        Some(report) => (report, response),
        None if needs_envelope(&response) => wrap_bare_error(response),
        None => return response,
    };

    if report.status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = report.status.as_u16(),
            kind = report.kind.as_str(),
            error = %report.cause,
            "Request failed"
        );
    } else {
        warn!(
            method = %method,
            path = %path,
            status = report.status.as_u16(),
            kind = report.kind.as_str(),
            error = %report.cause,
            "Request rejected"
        );
    }

    if environment.is_development() && report.kind == ErrorKind::Internal {
        return report.render(true);
    }

    response
}

fn needs_envelope(response: &Response) -> bool {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return false;
    }

    !response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Renders an error response that bypassed [`AppError`] into the envelope.
/// The `Allow` header of a 405 is kept.
fn wrap_bare_error(original: Response) -> (ErrorReport, Response) {
    let status = original.status();
    let report = AppError::new(status, status.canonical_reason().unwrap_or("Request failed")).report();

    let mut response = report.render(false);
    if let Some(allow) = original.headers().get(header::ALLOW) {
        response.headers_mut().insert(header::ALLOW, allow.clone());
    }

    (report, response)
}
