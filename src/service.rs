use std::convert::Infallible;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use http::{Request, Response};
use hyper::service::Service;
use hyper::Body;
use tracing::{debug, error, warn};

use crate::resolve::{resolve, Resolved};
use crate::response_builder::ResponseBuilder;

/// High-level interface for cross-origin isolated static file serving.
///
/// This service serves files from a single root path, which may be absolute
/// or relative. Requests are mapped onto the filesystem by appending their
/// URL path to the root path; `..` segments that would climb above the root
/// are rejected. Each response carries the two cross-origin isolation
/// headers, whatever its status.
///
/// The `serve` method never fails: per-request problems, including
/// unexpected IO errors, become plain HTTP error responses so the header
/// invariant holds on those too. The service also implements
/// `hyper::service::Service`, which simply wraps `serve`.
#[derive(Clone, Debug)]
pub struct FileService {
    /// The root directory path to serve files from.
    pub root: PathBuf,
}

impl FileService {
    /// Create a new instance of `FileService` with a given root path.
    ///
    /// If `Path::new("")` is given, files will be served from the current
    /// directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileService { root: root.into() }
    }

    /// Serve a request.
    pub async fn serve<B>(&self, request: Request<B>) -> Response<Body> {
        let path = request.uri().path().to_owned();

        let response = match resolve(&self.root, &request).await {
            Ok(resolved) => {
                if matches!(resolved, Resolved::Traversal) {
                    warn!(%path, "rejected path traversal attempt");
                }
                ResponseBuilder::new().build(&request, resolved).await
            }
            Err(err) => {
                error!(%path, error = %err, "error resolving request");
                Ok(ResponseBuilder::internal_error())
            }
        };

        let response = response.unwrap_or_else(|err| {
            error!(%path, error = %err, "failed to build response");
            ResponseBuilder::internal_error()
        });

        debug!(
            method = %request.method(),
            %path,
            status = %response.status(),
            "served request"
        );
        response
    }
}

impl Service<Request<Body>> for FileService {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future =
        Pin<Box<dyn Future<Output = std::result::Result<Response<Body>, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.serve(request).await) })
    }
}
