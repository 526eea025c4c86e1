//! airflow-bootstrap - provision a self-hosted Apache Airflow stack
//!
//! Fetches the upstream reference compose file for the requested
//! release, patches it, writes the env file, and brings the stack up
//! with the local `docker compose` CLI.

use clap::Parser;
use stackboot::compose::{codec, transform};
use stackboot::config::BootstrapConfig;
use stackboot::download;
use stackboot::envfile::EnvFile;
use stackboot::error::Result;
use stackboot::orchestrator::ComposeDriver;
use stackboot::secrets::{AwsSecretStore, SecretStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Provision a self-hosted Apache Airflow stack
#[derive(Parser)]
#[command(name = "airflow-bootstrap")]
#[command(about = "Provision a self-hosted Apache Airflow stack", long_about = None)]
struct Cli {
    /// Airflow release whose reference compose file is fetched
    #[arg(short = 'v', long, default_value = "2.4.3")]
    version: String,

    /// Working directory for the stack
    #[arg(short = 'w', long, default_value = "/home/ec2-user/airflow")]
    workdir: PathBuf,

    /// Point Airflow at an external database instead of the bundled one
    #[arg(long)]
    external_db: bool,

    /// Keep the example DAGs shipped with the reference file
    #[arg(long)]
    with_example_dags: bool,

    /// Extra Python requirements installed into the Airflow containers
    #[arg(long)]
    requirements: Option<String>,

    /// Pin every service to this container image
    #[arg(long)]
    image: Option<String>,

    /// Run only the database init service, do not start the stack
    #[arg(long)]
    init_only: bool,

    /// Re-download the reference compose file even if a local copy exists
    #[arg(long)]
    download_source: bool,

    /// Secret holding the external database credentials
    #[arg(long, default_value = "Airflow/Database")]
    secret_name: String,

    /// Secret store region
    #[arg(long, default_value = "eu-west-1")]
    region: String,

    /// Uid the Airflow containers run as; defaults to the current user
    #[arg(long)]
    uid: Option<u32>,

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
    config.ensure_subdirs(&["dags", "logs", "plugins"])?;

    tracing::info!("Writing env file");
    let mut env = EnvFile::new();
    env.set("AIRFLOW_UID", cli.uid.unwrap_or_else(current_uid).to_string());
    if let Some(requirements) = &cli.requirements {
        tracing::info!("Adding additional requirements");
        env.set("_PIP_ADDITIONAL_REQUIREMENTS", requirements.clone());
    }
    env.write(&config.env_path())?;

    let descriptor_path = config.descriptor_path();
    if cli.download_source || !descriptor_path.exists() {
        let client = reqwest::Client::new();
        let url = download::airflow_descriptor_url(&cli.version);
        download::fetch_to_file(&client, &url, &descriptor_path).await?;
    } else {
        tracing::info!("Reusing existing {}", descriptor_path.display());
    }

    let mut descriptor = codec::parse_file(&descriptor_path)?;
    codec::services(&descriptor)?;

    if !cli.with_example_dags {
        tracing::info!("Disabling example DAGs");
        transform::disable_example_workloads(&mut descriptor);
    }

    if cli.external_db {
        tracing::info!("Pointing Airflow at the external database");
        let secrets = AwsSecretStore::new()
            .fetch(&cli.secret_name, &cli.region)
            .await?;
        transform::replace_database(&mut descriptor, &secrets)?;
    }

    if let Some(image) = &cli.image {
        tracing::info!("Pinning every service to {}", image);
        transform::pin_image(&mut descriptor, image)?;
    }

    tracing::info!("Updating {}", descriptor_path.display());
    codec::write_file(&descriptor, &descriptor_path)?;

    let driver = ComposeDriver::new(config.workdir());
    tracing::info!("Running database init");
    driver.up_service("airflow-init").await?;

    if cli.init_only {
        tracing::info!("Init-only run, not starting the stack");
        return Ok(());
    }

    tracing::info!("Starting the stack in detached mode");
    driver.up_detached().await?;
    Ok(())
}

fn current_uid() -> u32 {
    // SAFETY: getuid cannot fail and touches no memory
    unsafe { libc::getuid() }
}
