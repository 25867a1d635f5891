//! Router assembly, startup and signal-driven graceful shutdown.

use crate::config::Settings;
use crate::error::StartupError;
use crate::repository::Repository;
use crate::routes::{common_routes, record_routes};
use crate::state::AppState;
use crate::store::Database;
use axum::{extract::DefaultBodyLimit, Router};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::pin;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::{Service, ServiceBuilder};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
/// How long a connection may sit without sending a request head before it is closed.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(120);
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Full HTTP surface over `state` with CORS, tracing, request timeout and body limit applied.
pub fn build_router<R: Repository>(state: AppState<R>) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(record_routes(&state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// A connected, bound server that has not started accepting requests yet.
pub struct Application {
    database: Database,
    listener: TcpListener,
    router: Router,
}

/// Connect to MongoDB and bind the listener. Nothing is served until [`Application::run`].
pub async fn bootstrap(settings: Settings) -> Result<Application, StartupError> {
    let database = Database::connect(&settings).await?;
    let router = build_router(database.repositories());

    let addr = settings.bind_addr();
    let listener = TcpListener::bind(addr).await.map_err(|source| StartupError::Bind {
        addr: addr.to_string(),
        source,
    })?;

    Ok(Application {
        database,
        listener,
        router,
    })
}

impl Application {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until SIGINT/SIGTERM, drain, then close the database connection.
    pub async fn run(self) -> io::Result<()> {
        let Application {
            database,
            listener,
            router,
        } = self;
        tracing::info!("listening on {}", listener.local_addr()?);
        let served = serve_until(listener, router, shutdown_signal()).await;
        database.close().await;
        served
    }
}

/// Serve `router` until `signal` resolves, then give in-flight requests [`SHUTDOWN_GRACE`] to
/// complete before abandoning them. Connections idle for [`IDLE_TIMEOUT`] are closed.
pub async fn serve_until<F>(listener: TcpListener, router: Router, signal: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    serve_with_idle_timeout(listener, router, signal, IDLE_TIMEOUT).await
}

async fn serve_with_idle_timeout<F>(
    listener: TcpListener,
    router: Router,
    signal: F,
    idle_timeout: Duration,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = watch::channel(());
    let mut server = tokio::spawn(accept_loop(listener, router, stop_rx, idle_timeout));

    tokio::select! {
        joined = &mut server => return flatten(joined),
        _ = signal => {}
    }

    tracing::info!("shutting down server");
    let _ = stop_tx.send(());
    match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
        Ok(joined) => flatten(joined)?,
        Err(_) => {
            tracing::warn!(
                grace = ?SHUTDOWN_GRACE,
                "graceful shutdown timed out, dropping connections"
            );
            server.abort();
        }
    }
    tracing::info!("server stopped");
    Ok(())
}

/// Accept connections until `stop` fires, then let every open connection finish its current
/// request and close.
async fn accept_loop(
    listener: TcpListener,
    router: Router,
    mut stop: watch::Receiver<()>,
    idle_timeout: Duration,
) -> io::Result<()> {
    let mut http = http1::Builder::new();
    http.timer(TokioTimer::new()).header_read_timeout(idle_timeout);
    let mut connections = JoinSet::new();

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => continue,
            _ = stop.changed() => break,
        };

        let router = router.clone();
        let service =
            service_fn(move |request: hyper::Request<Incoming>| router.clone().call(request));
        let connection = http.serve_connection(TokioIo::new(stream), service);
        let mut stop = stop.clone();
        connections.spawn(async move {
            let mut connection = pin!(connection);
            let mut draining = false;
            loop {
                tokio::select! {
                    result = connection.as_mut() => {
                        if let Err(e) = result {
                            tracing::debug!(peer = %peer, error = %e, "connection closed");
                        }
                        break;
                    }
                    _ = stop.changed(), if !draining => {
                        draining = true;
                        connection.as_mut().graceful_shutdown();
                    }
                }
            }
        });
    }

    drop(listener);
    while connections.join_next().await.is_some() {}
    Ok(())
}

fn flatten(joined: Result<io::Result<()>, tokio::task::JoinError>) -> io::Result<()> {
    joined.map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
