// study schedule

mod config;
mod error;
mod extract;
mod logging;
mod middleware;
mod password;
mod routes;
mod sql;
mod types;

use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info};

use config::Settings;
use sql::Store;

#[tokio::main]
async fn main() -> ExitCode {
	// a missing .env is fine, defaults cover everything
	let _ = dotenvy::dotenv();
	logging::init_logging();

	match run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!(error = %e, "server stopped");
			ExitCode::FAILURE
		}
	}
}

async fn run() -> error::Result<()> {
	let settings = Settings::from_env()?;

	// tables exist before the first connection is accepted
	let store = Store::open(&settings.database).await?;

	let app = middleware::tower_trace(routes::build_routes(store.clone(), &settings.public_dir));

	let listener = TcpListener::bind(settings.address).await?;
	info!("server running on http://{}", listener.local_addr()?);
	info!(public_dir = %settings.public_dir.display(), "   GET  /                 - form page");
	info!("   GET  /usuarios         - list users");
	info!("   GET  /materias         - list subjects");
	info!("   POST /usuarios-add     - add user");
	info!("   POST /usuarios-update  - update user");

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	store.close().await;
	info!("store closed, bye");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			error!(error = %e, "can't listen for ctrl-c");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut sig) => {
				sig.recv().await;
			}
			Err(e) => {
				error!(error = %e, "can't listen for SIGTERM");
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
	info!("shutdown signal received");
}
