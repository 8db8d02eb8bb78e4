//! Development backend for favdash: the login exchange and the engagement
//! endpoint, with bearer auth. Tokens are minted per login and kept hashed
//! in memory.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use tokio::sync::RwLock;

use favdash::model::Category;

#[derive(Clone)]
struct AppState {
    email: String,
    senha_hash: String,

    // Hashes of issued bearer tokens.
    tokens: Arc<RwLock<HashSet<String>>>,

    categories: Arc<Vec<Category>>,
}

#[derive(Parser)]
#[command(name = "favdash-server")]
#[command(about = "favdash backend stub (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Development login email
    #[arg(long, default_value = "admin@example.com")]
    dev_email: String,

    /// Development login password
    #[arg(long, default_value = "dev")]
    dev_senha: String,

    /// JSON array of {nome, favoritos} records overriding the seeded data
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let categories = match &args.data_file {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read data file {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parse data file {}", path.display()))?
        }
        None => seed_categories(),
    };

    let state = Arc::new(AppState {
        email: args.dev_email,
        senha_hash: hash_secret(&args.dev_senha),
        tokens: Arc::new(RwLock::new(HashSet::new())),
        categories: Arc::new(categories),
    });

    let authed = Router::new()
        .route("/ofertas/categorias-mais-engajadas", get(categorias))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/usuarios/login", post(login))
        .merge(authed)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("favdash-server listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// The original backend's seeded engagement data, already sorted descending
/// the way the real endpoint responds.
fn seed_categories() -> Vec<Category> {
    let mut out = vec![
        category("Eletrônicos", 42),
        category("Moda", 55),
        category("Casa", 30),
        category("Beleza", 61),
        category("Esportes", 61),
    ];
    out.sort_by(|a, b| b.favorites.cmp(&a.favorites));
    out
}

fn category(name: &str, favorites: u64) -> Category {
    Category {
        name: name.to_string(),
        favorites,
    }
}

fn hash_secret(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}

fn new_token() -> Result<String> {
    // 32 bytes of entropy, hex-encoded.
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(64);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return unauthorized();
    };

    let Ok(value) = value.to_str() else {
        return unauthorized();
    };

    let Some(token) = value.strip_prefix("Bearer ") else {
        return unauthorized();
    };

    if !state.tokens.read().await.contains(&hash_secret(token)) {
        return unauthorized();
    }

    next.run(req).await
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": "unauthorized"})),
    )
        .into_response()
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Debug, serde::Deserialize)]
struct LoginRequest {
    email: String,
    senha: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    if req.email != state.email || hash_secret(&req.senha) != state.senha_hash {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "invalid credentials"})),
        )
            .into_response();
    }

    let token = match new_token() {
        Ok(token) => token,
        Err(err) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": format!("{:#}", err)})),
            )
                .into_response();
        }
    };

    state.tokens.write().await.insert(hash_secret(&token));
    (StatusCode::OK, Json(serde_json::json!({"token": token}))).into_response()
}

async fn categorias(State(state): State<Arc<AppState>>) -> Json<Vec<Category>> {
    Json(state.categories.as_ref().clone())
}
