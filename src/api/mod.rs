use actix_web::{
    HttpResponse,
    Responder,
};
use log::{
    error,
    info,
};

use std::env;
use std::time::Duration;

use crate::types::{
    HealthStatus,
    ShutdownAck,
};

const DEFAULT_PORT: u16 = 8080;
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus::healthy())
}

/// Acknowledges first, terminates later: the reboot fires on a detached task
/// after a grace delay so the response flushes to the caller. One-shot,
/// irreversible, not cancellable.
pub async fn shutdown() -> impl Responder {
    info!("Shutdown requested, rebooting in {:?}", SHUTDOWN_GRACE);
    schedule_host_shutdown(SHUTDOWN_GRACE);
    HttpResponse::Ok().json(ShutdownAck::shutting_down())
}

fn schedule_host_shutdown(grace: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        match tokio::process::Command::new("reboot").arg("-f").status().await {
            Ok(status) => error!("reboot returned without terminating the host: {}", status),
            Err(e) => error!("Failed to invoke reboot: {}", e),
        }
    });
}

pub fn get_server_port() -> u16 {
    env::var("APP_PORT")
        .unwrap_or_else(|_| DEFAULT_PORT.to_string())
        .parse()
        .unwrap_or(DEFAULT_PORT)
}
