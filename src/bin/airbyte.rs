//! airbyte-bootstrap - provision a self-hosted Airbyte stack
//!
//! Fetches the upstream reference compose file and env file for the
//! requested ref, optionally drops the bundled database and overlays
//! secret-derived values, then restarts the stack with the local
//! `docker compose` CLI.

use clap::Parser;
use stackboot::compose::{codec, transform};
use stackboot::config::BootstrapConfig;
use stackboot::download;
use stackboot::envfile::EnvFile;
use stackboot::error::{Result, StackbootError};
use stackboot::orchestrator::ComposeDriver;
use stackboot::secrets::{AwsSecretStore, SecretBundle, SecretStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Provision a self-hosted Airbyte stack
#[derive(Parser)]
#[command(name = "airbyte-bootstrap")]
#[command(about = "Provision a self-hosted Airbyte stack", long_about = None)]
struct Cli {
    /// Airbyte ref whose reference files are fetched
    #[arg(short = 'v', long, default_value = "master")]
    version: String,

    /// Working directory for the stack
    #[arg(short = 'w', long, default_value = "/home/ec2-user/airbyte")]
    workdir: PathBuf,

    /// Fetch secrets, drop the bundled database, and patch the env file
    #[arg(long)]
    with_secrets: bool,

    /// Pin every service to this container image
    #[arg(long)]
    image: Option<String>,

    /// Secret holding the external database credentials
    #[arg(long, default_value = "Airbyte/Database")]
    db_secret_name: String,

    /// Secret holding the basic-auth credentials
    #[arg(long, default_value = "Airbyte/BasicAuth")]
    auth_secret_name: String,

    /// Secret store region
    #[arg(long, default_value = "eu-west-1")]
    region: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    std::process::exit(match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // Monitoring greps read errors from stdout
            println!("{e}");
            1
        }
    });
}

async fn run(cli: Cli) -> Result<()> {
    let config = BootstrapConfig::new(cli.workdir.clone(), "docker-compose.yaml", ".env");

    tracing::info!("Setting up working directory {}", config.workdir().display());
    config.ensure_workdir()?;

    let client = reqwest::Client::new();

    if cli.with_secrets {
        let default_descriptor = config.path_of("docker-compose.default.yaml");
        let default_env = config.path_of("env.default");

        let url = download::airbyte_descriptor_url(&cli.version);
        download::fetch_to_file(&client, &url, &default_descriptor).await?;
        let url = download::airbyte_env_url(&cli.version);
        download::fetch_to_file(&client, &url, &default_env).await?;

        let mut descriptor = codec::parse_file(&default_descriptor)?;
        codec::services(&descriptor)?;

        tracing::info!("Dropping the bundled database");
        transform::drop_bundled_database(&mut descriptor);
        if let Some(image) = &cli.image {
            tracing::info!("Pinning every service to {}", image);
            transform::pin_image(&mut descriptor, image)?;
        }
        codec::write_file(&descriptor, &config.descriptor_path())?;

        tracing::info!("Loading secrets");
        let store = AwsSecretStore::new();
        let db = store.fetch(&cli.db_secret_name, &cli.region).await?;
        let auth = store.fetch(&cli.auth_secret_name, &cli.region).await?;

        tracing::info!("Writing env file");
        let mut env = EnvFile::load(&default_env)?;
        apply_secrets(&mut env, &db, &auth)?;
        env.write(&config.env_path())?;
    } else {
        let url = download::airbyte_descriptor_url(&cli.version);
        download::fetch_to_file(&client, &url, &config.descriptor_path()).await?;
        let url = download::airbyte_env_url(&cli.version);
        download::fetch_to_file(&client, &url, &config.env_path()).await?;
    }

    let driver = ComposeDriver::new(config.workdir());
    driver.down().await?;
    driver.prune_images().await?;
    driver.prune_containers().await?;

    tracing::info!("Starting the stack in detached mode");
    driver.up_detached().await?;
    Ok(())
}

/// Overlay secret-derived variables onto the default env file contents
fn apply_secrets(env: &mut EnvFile, db: &SecretBundle, auth: &SecretBundle) -> Result<()> {
    let field = |bundle: &SecretBundle, name: &str| -> Result<String> {
        bundle
            .get(name)
            .cloned()
            .ok_or_else(|| StackbootError::MissingSecretField(name.to_owned()))
    };

    env.set("BASIC_AUTH_USERNAME", field(auth, "username")?);
    env.set("BASIC_AUTH_PASSWORD", field(auth, "password")?);

    let host = field(db, "host")?;
    let port = field(db, "port")?;
    let dbname = field(db, "dbname")?;
    env.set("DATABASE_USER", field(db, "username")?);
    env.set("DATABASE_PASSWORD", field(db, "password")?);
    env.set("DATABASE_HOST", host.clone());
    env.set("DATABASE_PORT", port.clone());
    env.set("DATABASE_DB", dbname.clone());
    env.set(
        "DATABASE_URL",
        format!("jdbc:postgresql://{host}:{port}/{dbname}"),
    );
    Ok(())
}
