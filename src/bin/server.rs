use ballista::server::{ServerConfig, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    serve(ServerConfig::from_env()).await
}
