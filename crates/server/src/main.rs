use clap::Parser;
use kaede_server::{ServerConfig, init_tracing, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_tracing();
    serve(config).await
}
