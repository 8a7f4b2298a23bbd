use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

use http::response::Builder as HttpResponseBuilder;
use http::{header, Method, Request, Response, Result, StatusCode};
use http_range::{HttpRange, HttpRangeParseError};
use hyper::Body;
use mime_guess::Mime;
use tokio::fs::File;

use super::{FileBytesStream, FileBytesStreamRange};

/// Utility to build responses for serving a `tokio::fs::File`.
///
/// This struct allows direct access to its fields, but these fields are
/// typically initialized by `from_request`.
#[derive(Clone, Debug, Default)]
pub struct FileResponseBuilder {
    /// Whether this is a `HEAD` request, with no response body.
    pub is_head: bool,
    /// The parsed value of the `If-Modified-Since` request header.
    pub if_modified_since: Option<SystemTime>,
    /// The raw value of the `Range` request header.
    pub range_header: Option<String>,
}

impl FileResponseBuilder {
    /// Create a new builder with a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with conditional and range settings taken from the
    /// given request.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            is_head: *req.method() == Method::HEAD,
            if_modified_since: req
                .headers()
                .get(header::IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| httpdate::parse_http_date(v).ok()),
            range_header: req
                .headers()
                .get(header::RANGE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned),
        }
    }

    /// Build a response streaming the given file.
    pub fn build(&self, file: File, metadata: Metadata, mime: Mime) -> Result<Response<Body>> {
        let mut res = HttpResponseBuilder::new();
        let size = metadata.len();

        if let Ok(modified) = metadata.modified() {
            // HTTP dates carry whole-second precision, so compare truncated
            // to seconds.
            if let Some(since) = self.if_modified_since {
                if unix_secs(modified) <= unix_secs(since) {
                    return HttpResponseBuilder::new()
                        .status(StatusCode::NOT_MODIFIED)
                        .body(Body::empty());
                }
            }

            res = res.header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified));
            res = res.header(header::ETAG, etag(size, modified));
        }

        res = res.header(header::CONTENT_TYPE, mime.as_ref());

        // Serve one syntactically valid, satisfiable range. Multiple or
        // malformed ranges fall back to the whole file.
        match self.single_range(size) {
            RangeDecision::Partial(range) => {
                let last = range.start + range.length - 1;
                res.status(StatusCode::PARTIAL_CONTENT)
                    .header(
                        header::CONTENT_RANGE,
                        format!("bytes {}-{}/{}", range.start, last, size),
                    )
                    .header(header::CONTENT_LENGTH, range.length)
                    .body(if self.is_head {
                        Body::empty()
                    } else {
                        Body::wrap_stream(FileBytesStreamRange::new(file, range))
                    })
            }
            RangeDecision::NotSatisfiable => HttpResponseBuilder::new()
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(header::CONTENT_RANGE, format!("bytes */{}", size))
                .body(Body::empty()),
            RangeDecision::Full => res
                .header(header::CONTENT_LENGTH, size)
                .body(if self.is_head {
                    Body::empty()
                } else {
                    Body::wrap_stream(FileBytesStream::new(file))
                }),
        }
    }

    fn single_range(&self, size: u64) -> RangeDecision {
        match self.range_header.as_deref() {
            None => RangeDecision::Full,
            Some(value) => match HttpRange::parse(value, size) {
                Ok(ranges) if ranges.len() == 1 => RangeDecision::Partial(ranges[0]),
                Ok(_) => RangeDecision::Full,
                Err(HttpRangeParseError::NoOverlap) => RangeDecision::NotSatisfiable,
                Err(HttpRangeParseError::InvalidRange) => RangeDecision::Full,
            },
        }
    }
}

enum RangeDecision {
    Full,
    Partial(HttpRange),
    NotSatisfiable,
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn etag(size: u64, modified: SystemTime) -> String {
    let stamp = modified.duration_since(UNIX_EPOCH).unwrap_or_default();
    format!(
        "W/\"{0:x}-{1:x}.{2:x}\"",
        size,
        stamp.as_secs(),
        stamp.subsec_nanos()
    )
}
