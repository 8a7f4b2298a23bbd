use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::AddrIncoming;
use hyper::service::make_service_fn;
use hyper::Server as HyperServer;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::info;

use crate::config::Config;
use crate::error::StartupError;
use crate::service::FileService;

/// Slow clients get this long to deliver their request head.
const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// A bound listening socket, ready to serve.
///
/// Binding is separate from running so that startup failures, a bad document
/// root or an occupied port, surface before anything is announced to the
/// user. Once bound, `run` serves until the paired [`ShutdownHandle`] fires.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    addr: SocketAddr,
    service: FileService,
    shutdown: Arc<Notify>,
}

impl Server {
    /// Validate the configuration and bind the listening socket.
    ///
    /// An invalid document root or an unbindable port yields a
    /// [`StartupError`]; no socket is left open in that case.
    pub async fn bind(config: &Config) -> Result<Server, StartupError> {
        config.validate()?;

        let listener = TcpListener::bind(config.socket_addr())
            .await
            .map_err(|source| StartupError::Bind {
                port: config.port,
                source,
            })?;
        let addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind {
                port: config.port,
                source,
            })?;

        Ok(Server {
            listener,
            addr,
            service: FileService::new(&config.root),
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// The bound socket address. With port 0 in the configuration, this
    /// reports the port the kernel picked.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// A handle that triggers graceful shutdown of this server.
    ///
    /// May be called before or during `run`; shutting down before `run`
    /// makes it return immediately.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.shutdown.clone())
    }

    /// Serve connections until shut down.
    ///
    /// Accepts concurrently, one task per connection. On shutdown the
    /// listening socket closes to new connections and in-flight requests are
    /// allowed to drain.
    pub async fn run(self) -> hyper::Result<()> {
        let Server {
            listener,
            addr,
            service,
            shutdown,
        } = self;

        let incoming = AddrIncoming::from_listener(listener)?;
        let make_service = make_service_fn(move |_conn| {
            let service = service.clone();
            async move { Ok::<_, Infallible>(service) }
        });

        info!(%addr, "accepting connections");

        HyperServer::builder(incoming)
            .http1_header_read_timeout(HEADER_READ_TIMEOUT)
            .serve(make_service)
            .with_graceful_shutdown(async move {
                shutdown.notified().await;
                info!("shutting down, draining connections");
            })
            .await
    }
}

/// Triggers graceful shutdown of the paired [`Server`].
#[derive(Clone)]
pub struct ShutdownHandle(Arc<Notify>);

impl ShutdownHandle {
    /// Stop accepting connections. Requests already in flight may complete.
    pub fn shutdown(&self) {
        self.0.notify_one();
    }
}
