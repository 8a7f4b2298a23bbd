#![crate_name = "isoserve"]
#![deny(missing_docs)]

//! Cross-origin isolated static file serving for
//! [Hyper 0.14](https://github.com/hyperium/hyper).
//!
//! This library serves files from a single document root and stamps the two
//! cross-origin isolation headers on every response it produces:
//!
//! * `Cross-Origin-Opener-Policy: same-origin`
//! * `Cross-Origin-Embedder-Policy: require-corp`
//!
//! Together these make browsers treat the served pages as cross-origin
//! isolated, unlocking APIs gated on that state, such as `SharedArrayBuffer`
//! and high-resolution timers. The headers are applied in one finalization
//! step that every response passes through, so they appear on error
//! responses too.
//!
//! ## Basic usage
//!
//! The `FileService` type is a struct containing some settings, and a
//! `serve` method to handle the request. It also implements the
//! `hyper::Service` trait. It can be used as:
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // Instance of `FileService` containing configuration.
//! let service = isoserve::FileService::new("my/doc/root/");
//!
//! // A dummy request, but normally obtained from Hyper.
//! let request = http::Request::get("/foo/bar.txt").body(()).unwrap();
//!
//! // Serve the request. Never fails; errors become responses.
//! let response = service.serve(request).await;
//! assert_eq!(
//!     response.headers()["cross-origin-opener-policy"],
//!     "same-origin"
//! );
//! # }
//! ```
//!
//! ## Advanced usage
//!
//! The `FileService` type is a simple wrapper for `resolve` and
//! `ResponseBuilder`. You can achieve the same by doing something similar to
//! the following:
//!
//! ```rust
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // Document root path.
//!     let root = Path::new("my/doc/root/");
//!
//!     // A dummy request, but normally obtained from Hyper.
//!     let request = http::Request::get("/foo/bar.txt").body(()).unwrap();
//!
//!     // First, resolve the request against the root.
//!     let result = isoserve::resolve(root, &request).await.unwrap();
//!
//!     // Then, build a response based on the result. The isolation headers
//!     // are stamped on here.
//!     let response = isoserve::ResponseBuilder::new()
//!         .build(&request, result)
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! It's useful to sit between these two steps to implement custom 404 pages,
//! for example. Your custom logic can override specific cases of `Resolved`,
//! and fall back to the default behavior using `ResponseBuilder` if
//! necessary. Route custom responses through `ResponseBuilder::finalize` to
//! keep the header invariant.
//!
//! ## Running a server
//!
//! The `Server` type owns the listening socket: `Server::bind` validates the
//! configuration and binds the port (both can fail with a `StartupError`),
//! and `Server::run` serves until the paired `ShutdownHandle` fires. The
//! `isoserve` binary is a thin CLI wrapper around this type.

mod config;
mod error;
mod listing;
mod resolve;
mod response_builder;
mod server;
mod service;
mod util;

pub use crate::config::{Config, DEFAULT_PORT, DEFAULT_ROOT};
pub use crate::error::StartupError;
pub use crate::listing::directory_listing;
pub use crate::resolve::{resolve, resolve_path, Resolved, ResolvedFile};
pub use crate::response_builder::{ResponseBuilder, EMBEDDER_POLICY, OPENER_POLICY};
pub use crate::server::{Server, ShutdownHandle};
pub use crate::service::FileService;
pub use crate::util::{FileBytesStream, FileBytesStreamRange, FileResponseBuilder};
