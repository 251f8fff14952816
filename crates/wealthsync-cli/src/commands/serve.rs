//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use wealthsync_core::InMemoryHistory;

use super::open_calculator;

/// Port used when neither --port nor PORT is set
pub const DEFAULT_PORT: u16 = 5000;

pub async fn cmd_serve(reference_path: Option<&Path>, host: &str, port: Option<u16>) -> Result<()> {
    let port = match port {
        Some(port) => port,
        None => port_from_env(std::env::var("PORT").ok().as_deref())?,
    };

    let calculator = open_calculator(reference_path)?;
    let config = wealthsync_server::ServerConfig::from_env();

    println!("🚀 Starting WealthSync budget server...");
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   Reference data: {} regions, {} cities",
        calculator.reference().region_count(),
        calculator.reference().cities().count()
    );
    if config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!(
            "   🌐 CORS origins: {} ({})",
            config.allowed_origins.join(", "),
            wealthsync_server::ALLOWED_ORIGINS_ENV
        );
    }
    println!("   ⚠️  Budget history is kept in memory and lost on restart");
    println!();
    println!("   Press Ctrl+C to stop");

    let history = Arc::new(InMemoryHistory::new());
    wealthsync_server::serve_with_config(calculator, history, host, port, config).await?;

    Ok(())
}

/// Resolve the listening port from the PORT environment value
pub fn port_from_env(value: Option<&str>) -> Result<u16> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .with_context(|| format!("Invalid PORT value: {}", v)),
        None => Ok(DEFAULT_PORT),
    }
}
