use voxlingo_backend::config::Config;
use voxlingo_backend::logging::init_tracing;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config);

    let state = match voxlingo_backend::build_state(&config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, data_dir = %config.data_dir.display(), "failed to open word storage");
            std::process::exit(1);
        }
    };
    tracing::info!(saved_words = state.words().len(), "word list ready");

    let app = voxlingo_backend::create_app(state);

    let addr = config.bind_addr();
    tracing::info!(%addr, "voxlingo-backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
