//! Process lifecycle: open the store, build the router, serve, drain.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::{UploadService, UserService};
use crate::config::{AppConfig, LoggingConfig};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::UserRepository;
use crate::infrastructure::{DataStore, DatabaseConfig, LocalFileStore};
use crate::interfaces::{create_api_router, ApiContext};
use crate::shared::{AppError, InfraError, ShutdownCoordinator, ShutdownSignal};

static PROMETHEUS: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

/// Install the Prometheus recorder on first use; later calls share its handle.
fn prometheus_handle() -> Result<PrometheusHandle, InfraError> {
    PROMETHEUS
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(InfraError::Metrics)
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured level.
///
/// Call once at process startup, before [`ServerHandle::start`].
pub fn init_tracing(logging: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("Tracing subscriber already installed: {}", e);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub config: AppConfig,
    /// Create the `users` table on startup regardless of `database.auto_migrate`.
    pub auto_migrate: bool,
}

/// A running HTTP server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    coordinator: ShutdownCoordinator,
    server: JoinHandle<std::io::Result<()>>,
    store: DataStore,
}

impl ServerHandle {
    pub async fn start(options: ServerOptions) -> Result<Self, AppError> {
        let cfg = options.config;
        let started_at = Instant::now();

        let metrics = match prometheus_handle() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                None
            }
        };

        let store = DataStore::open(&DatabaseConfig::from(&cfg.database)).await?;

        if options.auto_migrate || cfg.database.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(store.connection(), None)
                .await
                .map_err(InfraError::from)?;
            info!("Migrations completed");
        }

        let files = LocalFileStore::new(&cfg.uploads.dir);
        files.ensure_root().await.map_err(InfraError::from)?;
        info!("Upload directory: {}", files.root().display());

        let user_repo = Arc::new(UserRepository::new(store.clone()));
        let router = create_api_router(ApiContext {
            user_service: Arc::new(UserService::new(user_repo)),
            upload_service: Arc::new(UploadService::new(files, cfg.uploads.max_size_bytes)),
            store: store.clone(),
            metrics,
            started_at,
        });

        let listener = TcpListener::bind(cfg.server.address())
            .await
            .map_err(InfraError::from)?;
        let local_addr = listener.local_addr().map_err(InfraError::from)?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let coordinator = ShutdownCoordinator::new(cfg.server.shutdown_timeout);
        let signal = coordinator.signal();
        let server = tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                signal.wait().await;
                info!("REST API server received shutdown signal");
            })
            .await
        });

        Ok(Self {
            local_addr,
            coordinator,
            server,
            store,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Trigger shutdown on SIGINT or SIGTERM.
    pub fn install_signal_handler(&self) {
        self.coordinator.start_signal_listener();
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.coordinator.signal()
    }

    /// Run until the server exits or shutdown is requested, drain in-flight
    /// requests within the configured timeout, then close the store.
    pub async fn wait(self) -> Result<(), AppError> {
        let ServerHandle {
            coordinator,
            mut server,
            store,
            ..
        } = self;
        let signal = coordinator.signal();

        let finished = tokio::select! {
            res = &mut server => Some(res),
            _ = signal.wait() => None,
        };

        let outcome = match finished {
            Some(res) => Some(res),
            None => {
                let mut drained = None;
                let completed = coordinator
                    .drain_with_timeout(async {
                        drained = Some((&mut server).await);
                    })
                    .await;
                if !completed {
                    server.abort();
                }
                drained
            }
        };

        let result = match outcome {
            Some(Ok(Ok(()))) => {
                info!("REST API server stopped");
                Ok(())
            }
            Some(Ok(Err(e))) => {
                error!("REST API server error: {}", e);
                Err(AppError::from(InfraError::Io(e)))
            }
            Some(Err(e)) => {
                error!("REST API server task failed: {}", e);
                Ok(())
            }
            None => {
                warn!("REST API server aborted with requests still in flight");
                Ok(())
            }
        };

        match store.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!("Error closing database connection: {}", e),
        }

        result
    }

    /// Request shutdown and wait for it to complete.
    pub async fn shutdown(self) -> Result<(), AppError> {
        self.coordinator.signal().trigger();
        self.wait().await
    }
}
