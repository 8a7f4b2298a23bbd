use std::io::ErrorKind as IoErrorKind;

use http::header::HeaderName;
use http::response::Builder as HttpResponseBuilder;
use http::{header, HeaderValue, Method, Request, Response, Result, StatusCode};
use hyper::Body;
use tracing::error;

use crate::listing::directory_listing;
use crate::resolve::Resolved;
use crate::util::FileResponseBuilder;

/// Value of the `Cross-Origin-Opener-Policy` header sent on every response.
pub const OPENER_POLICY: &str = "same-origin";

/// Value of the `Cross-Origin-Embedder-Policy` header sent on every response.
pub const EMBEDDER_POLICY: &str = "require-corp";

/// Utility to build the response for a resolved request.
///
/// Every response produced here, success or error, passes through
/// [`ResponseBuilder::finalize`] before being returned, so clients always
/// observe the two cross-origin isolation headers.
#[derive(Clone, Debug, Default)]
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a new response builder.
    pub fn new() -> Self {
        Self
    }

    /// Build a response for the given request and `resolve` result.
    pub async fn build<B>(&self, req: &Request<B>, result: Resolved) -> Result<Response<Body>> {
        let response = match result {
            Resolved::MethodNotAllowed => HttpResponseBuilder::new()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .header(header::ALLOW, "GET, HEAD")
                .body(Body::empty()),
            Resolved::UriNotPath => status_only(StatusCode::BAD_REQUEST),
            Resolved::Traversal | Resolved::PermissionDenied => {
                status_only(StatusCode::FORBIDDEN)
            }
            Resolved::NotFound => status_only(StatusCode::NOT_FOUND),
            Resolved::RedirectToDirectory => {
                let mut target = req.uri().path().to_owned();
                target.push('/');
                if let Some(query) = req.uri().query() {
                    target.push('?');
                    target.push_str(query);
                }

                HttpResponseBuilder::new()
                    .status(StatusCode::MOVED_PERMANENTLY)
                    .header(header::LOCATION, target)
                    .body(Body::empty())
            }
            Resolved::Directory(path) => {
                match directory_listing(&path, req.uri().path()).await {
                    Ok(html) => listing_page(req, html),
                    Err(err) if err.kind() == IoErrorKind::PermissionDenied => {
                        status_only(StatusCode::FORBIDDEN)
                    }
                    Err(err) => {
                        error!(path = %path.display(), error = %err, "failed to list directory");
                        status_only(StatusCode::INTERNAL_SERVER_ERROR)
                    }
                }
            }
            Resolved::File(file) => {
                FileResponseBuilder::from_request(req).build(file.handle, file.metadata, file.mime)
            }
        };

        response.map(Self::finalize)
    }

    /// The response-finalization step.
    ///
    /// Stamps `Cross-Origin-Opener-Policy` and `Cross-Origin-Embedder-Policy`
    /// onto the response. Every response leaving this crate goes through
    /// here, whatever its status code.
    pub fn finalize<B>(mut response: Response<B>) -> Response<B> {
        let headers = response.headers_mut();
        headers.insert(
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static(OPENER_POLICY),
        );
        headers.insert(
            HeaderName::from_static("cross-origin-embedder-policy"),
            HeaderValue::from_static(EMBEDDER_POLICY),
        );
        response
    }

    pub(crate) fn internal_error() -> Response<Body> {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        Self::finalize(response)
    }
}

fn status_only(status: StatusCode) -> Result<Response<Body>> {
    HttpResponseBuilder::new().status(status).body(Body::empty())
}

fn listing_page<B>(req: &Request<B>, html: String) -> Result<Response<Body>> {
    let length = html.len() as u64;
    HttpResponseBuilder::new()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CONTENT_LENGTH, length)
        .body(if *req.method() == Method::HEAD {
            Body::empty()
        } else {
            Body::from(html)
        })
}
