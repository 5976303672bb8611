use axum::{Json, Router, response::Html, routing::get};
use serde_json::{Value, json};

/// Configuration for the demo web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Default configuration with the port overridden by the
    /// `PORT` environment variable when set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        config
    }
}

/// Build the two-route application router.
#[must_use]
pub fn router() -> Router {
    Router::new().route("/", get(home)).route("/api", get(api))
}

async fn home() -> Html<&'static str> {
    Html(include_str!("../templates/index.html"))
}

async fn api() -> Json<Value> {
    Json(json!({ "message": "Hello, Flask!" }))
}

/// Serve the demo application until the process is stopped.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    eprintln!("Listening on http://{addr}");
    axum::serve(listener, router()).await?;
    Ok(())
}
