//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tesorin_core::Planner;
use tesorin_server::{ServerConfig, API_KEYS_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    planner: Planner<'static>,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Tesorin web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let api_keys = ServerConfig::api_keys_from_env();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        anyhow::bail!(
            "No API keys configured. Set {} (comma-separated) or use --no-auth for local development",
            API_KEYS_ENV
        );
    } else {
        println!(
            "   🔑 API keys: {} configured ({})",
            api_keys.len(),
            API_KEYS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = ServerConfig {
        require_auth: !no_auth,
        allowed_origins: vec![],
        api_keys,
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    tesorin_server::serve_with_config(db, planner, host, port, static_dir_str, config).await?;

    Ok(())
}
