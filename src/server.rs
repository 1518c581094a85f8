//! Web server

use crate::cli;

use std::{net::SocketAddr, path::PathBuf, process::exit, str::FromStr, time::Duration};

use axum::ServiceExt;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use expanduser::expanduser;
use tokio::signal;
use tracing::{event, Level};

/// Resolve a TLS file path, expanding `~`, and exit if it does not exist.
fn tls_file(path: &str, description: &str) -> PathBuf {
    let expanded = match expanduser(path) {
        Ok(expanded) => expanded,
        Err(error) => {
            event!(
                Level::ERROR,
                "failed to expand ~ in {} path {}: {}. Please provide an absolute path instead.",
                description,
                path,
                error
            );
            exit(1)
        }
    };
    if !expanded.exists() {
        event!(
            Level::ERROR,
            "{} file expected at '{}' but not found.",
            description,
            expanded.display()
        );
        exit(1)
    }
    expanded
}

/// Serve the dashboard
///
/// # Arguments
///
/// * `args`: Command line arguments
/// * `service`: The [crate::app::Service] to serve
pub async fn serve(args: &cli::CommandLineArgs, service: crate::app::Service) {
    let addr = match SocketAddr::from_str(&format!("{}:{}", args.host, args.port)) {
        Ok(addr) => addr,
        Err(error) => {
            event!(
                Level::ERROR,
                "invalid host name, IP address or port number: {}",
                error
            );
            exit(1)
        }
    };

    // Catch ctrl+c and try to shutdown gracefully
    let handle = Handle::new();
    tokio::spawn(shutdown_signal(
        handle.clone(),
        args.graceful_shutdown_timeout,
    ));

    let result = if args.https {
        let cert_file = tls_file(&args.cert_file, "TLS certificate");
        let key_file = tls_file(&args.key_file, "TLS key");
        let tls_config = match RustlsConfig::from_pem_file(cert_file, key_file).await {
            Ok(tls_config) => tls_config,
            Err(error) => {
                event!(Level::ERROR, "failed to load TLS certificate files: {}", error);
                exit(1)
            }
        };
        event!(Level::INFO, "listening on https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(service.into_make_service())
            .await
    } else {
        event!(Level::INFO, "listening on http://{}", addr);
        axum_server::bind(addr)
            .handle(handle)
            .serve(service.into_make_service())
            .await
    };
    if let Err(error) = result {
        event!(Level::ERROR, "server error: {}", error);
        exit(1)
    }
}

/// Graceful shutdown handler
///
/// Installs signal handlers to catch Ctrl-C or SIGTERM and trigger a graceful shutdown.
async fn shutdown_signal(handle: Handle, timeout: u64) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            event!(Level::ERROR, "failed to install Ctrl+C handler: {}", error);
            std::future::pending::<()>().await
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                event!(Level::ERROR, "failed to install signal handler: {}", error);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    event!(Level::INFO, "signal received, starting graceful shutdown");
    // Force shutdown if graceful shutdown takes longer than the timeout
    handle.graceful_shutdown(Some(Duration::from_secs(timeout)));
}
