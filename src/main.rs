use env_logger::Env;
use log::{error, info, warn};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use version_server::cli::configure_cli;
use version_server::config::load_config;
use version_server::domain::status::service::Service;
use version_server::inbound::server::{AppState, create_app};
use version_server::outbound::runtime_cli::RuntimeCli;
use version_server::outbound::state_file::StateFile;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = configure_cli();
    let mut config = load_config(&cli.config)?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    #[cfg(target_os = "linux")]
    set_group_id(config.runtime.gid);

    let containers = config.managed_containers()?;
    let inspector = RuntimeCli::new(config.runtime.binary.as_str(), config.runtime.timeout());
    let service = Service::new(inspector, StateFile, containers.clone(), &config.state_file);
    let app = create_app(AppState::new(service));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;

    info!("Starting version server on http://{addr}");
    if containers.is_empty() {
        warn!("No managed containers configured, /health will answer 503");
    } else {
        info!("Managed containers: {containers}");
    }
    info!("Poller state file: {}", config.state_file.display());
    info!(
        "Runtime: `{} inspect` (timeout {}s)",
        config.runtime.binary, config.runtime.timeout_secs
    );
    info!("  GET    /version    - running container versions and poller state");
    info!("  GET    /health     - 200 if at least one managed container is running");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Version server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Error listening for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Error listening for SIGTERM: {e}");
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
    info!("Received shutdown signal, gracefully shutting down...");
}

#[cfg(target_os = "linux")]
fn set_group_id(gid: Option<u32>) {
    let Some(gid) = gid else {
        return;
    };
    info!("Setting GID to {gid}");
    // Note: This requires CAP_SETGID capability
    unsafe {
        if libc::setgid(gid) != 0 {
            error!("Failed to set GID to {gid}");
        }
    }
}
