use actix_web::HttpServer;
use login_shield::{AppState, create_app};
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let state = AppState::from_env().map_err(std::io::Error::other)?;
    let config = state
        .shield
        .config()
        .map_err(std::io::Error::other)?;
    let bind_address = state.network.bind_address.clone();

    tracing::info!(
        bind_address = %bind_address,
        max_by_ip_user = config.max_by_ip_user,
        max_by_ip = config.max_by_ip,
        whitelist_remotes = config.whitelist_remotes.len(),
        admin_enabled = state.admin_auth.is_enabled(),
        "Starting login shield"
    );
    if !state.admin_auth.is_enabled() {
        tracing::warn!("ADMIN_HMAC_SECRET is not set, administrative endpoints are disabled");
    }

    HttpServer::new(move || create_app(state.clone()))
        .bind(bind_address)?
        .run()
        .await
}
