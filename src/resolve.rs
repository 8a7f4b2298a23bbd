use std::fs::Metadata;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::path::PathBuf;

use http::{Method, Request};
use mime_guess::{Mime, MimeGuess};
use tokio::fs::File;

use crate::util::{open_with_metadata, RequestedPath};

/// The result of `resolve`.
///
/// Covers all the 'normal' scenarios encountered when mapping a request onto
/// the document root. Each variant corresponds to one response class; the
/// mapping to statuses lives in `ResponseBuilder`.
#[derive(Debug)]
pub enum Resolved {
    /// The request was not a `GET` or `HEAD` request.
    MethodNotAllowed,
    /// The request URI was not just a path.
    UriNotPath,
    /// The request path would climb above the document root.
    Traversal,
    /// Nothing exists at the resolved path.
    NotFound,
    /// The resolved path could not be accessed.
    PermissionDenied,
    /// A directory was requested without a trailing slash.
    RedirectToDirectory,
    /// A directory without an index file; its entries should be listed.
    Directory(PathBuf),
    /// The requested file was found.
    File(ResolvedFile),
}

/// An open file handle with everything needed to build a response.
#[derive(Debug)]
pub struct ResolvedFile {
    /// Open file handle.
    pub handle: File,
    /// Filesystem metadata of the file.
    pub metadata: Metadata,
    /// Content type guessed from the file extension.
    pub mime: Mime,
}

/// Some IO errors are expected when serving files, and mapped to a regular
/// result here.
fn map_open_err(err: IoError) -> Result<Resolved, IoError> {
    match err.kind() {
        IoErrorKind::NotFound => Ok(Resolved::NotFound),
        IoErrorKind::PermissionDenied => Ok(Resolved::PermissionDenied),
        _ => Err(err),
    }
}

/// Resolve the request by trying to find the file in the given root.
///
/// This root may be absolute or relative. The request is mapped onto the
/// filesystem by appending its URL path to the root path. A regular file at
/// the resolved path is served directly. A directory either redirects (when
/// the request path lacks its trailing slash), serves its `index.html`, or
/// reports itself for listing.
///
/// The returned future may error for unexpected IO errors, passing on the
/// `std::io::Error`. Certain expected IO errors are handled, though, and
/// simply reflected in the result. These are `NotFound` and
/// `PermissionDenied`.
pub async fn resolve<B>(
    root: impl Into<PathBuf>,
    req: &Request<B>,
) -> Result<Resolved, IoError> {
    // Handle only `GET`/`HEAD` and plain path requests.
    match *req.method() {
        Method::HEAD | Method::GET => {}
        _ => {
            return Ok(Resolved::MethodNotAllowed);
        }
    }

    if req.uri().scheme_str().is_some() || req.uri().host().is_some() {
        return Ok(Resolved::UriNotPath);
    }

    resolve_path(root, req.uri().path()).await
}

/// Resolve the request path by trying to find the file in the given root.
///
/// Note that, unlike `resolve`, it is up to the caller to check the request
/// method.
pub async fn resolve_path(
    root: impl Into<PathBuf>,
    request_path: &str,
) -> Result<Resolved, IoError> {
    let requested = match RequestedPath::resolve(request_path) {
        Some(requested) => requested,
        None => return Ok(Resolved::Traversal),
    };

    let mut full_path = root.into();
    full_path.push(&requested.sanitized);

    let (file, metadata) = match open_with_metadata(&full_path).await {
        Ok(pair) => pair,
        Err(err) => return map_open_err(err),
    };

    // The sanitized path doesn't contain the trailing slash anymore, so we
    // may have opened a file for a directory request, which we treat as
    // 'not found'.
    if requested.is_dir_request && !metadata.is_dir() {
        return Ok(Resolved::NotFound);
    }

    // We may have opened a directory for a file request, in which case we
    // redirect so relative links inside the directory resolve correctly.
    if !requested.is_dir_request && metadata.is_dir() {
        return Ok(Resolved::RedirectToDirectory);
    }

    // If not a directory, serve this file.
    if !requested.is_dir_request {
        let mime = MimeGuess::from_path(&full_path).first_or_octet_stream();
        return Ok(Resolved::File(ResolvedFile {
            handle: file,
            metadata,
            mime,
        }));
    }

    // Resolve the directory index, falling back to a generated listing.
    let index_path = full_path.join("index.html");
    let (file, metadata) = match open_with_metadata(&index_path).await {
        Ok(pair) => pair,
        Err(err) if err.kind() == IoErrorKind::NotFound => {
            return Ok(Resolved::Directory(full_path));
        }
        Err(err) => return map_open_err(err),
    };

    // The directory index cannot itself be a directory.
    if metadata.is_dir() {
        return Ok(Resolved::Directory(full_path));
    }

    // Serve this file.
    let mime = MimeGuess::from_path(&index_path).first_or_octet_stream();
    Ok(Resolved::File(ResolvedFile {
        handle: file,
        metadata,
        mime,
    }))
}
