//! Server command implementation

use anyhow::{Context as _, Result};
use finsight_server::ServerConfig;

use super::Context;

pub async fn cmd_serve(
    ctx: Context,
    host: &str,
    port: u16,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting FinSight web server...");
    println!("   Database: {}", ctx.db.path());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Currency: {}", ctx.config.currency);
    if allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", allowed_origins.join(", "));
    }
    println!();
    println!(
        "   Requests must carry the {} header from your auth gateway.",
        finsight_server::USER_ID_HEADER
    );

    let config = ServerConfig { allowed_origins };

    finsight_server::serve(ctx.db, ctx.config, host, port, config)
        .await
        .context("Server error")
}
