use anyhow::Context;
use rewards_client::{
    storage::{FileStore, MemoryStore, TokenStorage},
    Client, Config,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let storage = match &config.token_file {
        Some(path) => {
            let durable = FileStore::open(path)
                .with_context(|| format!("opening token store {}", path.display()))?;
            TokenStorage::new(durable, MemoryStore::default())
        }
        None => {
            info!("REWARDS_TOKEN_FILE not set, credentials will not outlive this run");
            TokenStorage::in_memory()
        }
    };

    let client = Client::new(&config, storage)?;

    info!(message = "Using backend", api_base = client.api_base());

    if !client.ping().await {
        anyhow::bail!("backend at {} is unreachable", client.api_base());
    }
    info!("Backend reachable");

    if !client.is_authenticated() {
        info!("No stored credentials, nothing else to check");
        return Ok(());
    }

    match client.me().await {
        Ok(me) => {
            println!("{}", serde_json::to_string_pretty(&me.user)?);
            info!(message = "Signed in", notifications = me.notification_badge());
        }
        Err(err) if err.requires_login() => {
            warn!(message = "Stored credentials were rejected, sign in again", error = %err);
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
