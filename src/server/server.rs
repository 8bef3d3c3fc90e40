//! HTTP server wiring

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer as ActixHttpServer};
use std::time::Duration;
use tracing::info;

use crate::config::{Config, CorsConfig};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};

/// HTTP server for the prompt builder API
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Build application state from configuration
    pub fn new(config: Config) -> Result<Self> {
        info!("creating HTTP server");
        let state = AppState::from_config(config)?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bind and serve until shutdown
    pub async fn start(self) -> Result<()> {
        let server_config = self.state.config.server.clone();
        let bind_addr = server_config.bind_addr();

        self.spawn_health_sweep();

        let state = web::Data::new(self.state);
        info!(%bind_addr, "starting HTTP server");

        let mut server = ActixHttpServer::new(move || {
            let cors = build_cors(&state.config.server.cors);
            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .wrap(Logger::default())
                .configure(routes::configure_all)
        })
        .bind(&bind_addr)
        .map_err(|e| GatewayError::Config(format!("failed to bind {}: {}", bind_addr, e)))?;

        if server_config.workers > 0 {
            server = server.workers(server_config.workers);
        }

        server
            .run()
            .await
            .map_err(|e| GatewayError::Internal(format!("server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Periodic provider health sweep, when configured
    fn spawn_health_sweep(&self) {
        let interval_secs = self.state.config.router.health_check_interval_secs;
        if interval_secs == 0 {
            return;
        }
        let manager = self.state.manager.clone();
        info!(interval_secs, "starting background health sweep");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            // first tick fires immediately, giving an early baseline
            loop {
                ticker.tick().await;
                manager.check_health_all().await;
            }
        });
    }
}

fn build_cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    if config.allows_all_origins() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}
