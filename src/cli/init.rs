//! Initialization run

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::initializer::Initializer;
use crate::loader::InitializerFiles;
use crate::netbox::Session;
use crate::report::Reporter;

#[derive(Args)]
pub struct InitArgs {
    /// NetBox URL
    #[arg(short = 'u', long, env = "NB_URL", value_name = "URL")]
    pub url: Option<String>,

    /// NetBox username (used with --password when no token is given)
    #[arg(short = 'U', long, env = "NB_USER", value_name = "USERNAME")]
    pub username: Option<String>,

    /// NetBox password
    #[arg(short = 'p', long, env = "NB_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// NetBox API token (preferred over username/password)
    #[arg(short = 't', long, env = "NB_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to config file [default: nb-init.yaml]
    #[arg(short = 'c', long, env = "NB_INIT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the initializer files [default: yaml]
    #[arg(short = 'd', long, env = "NB_YAML_DIR", value_name = "DIR")]
    pub yaml_dir: Option<PathBuf>,
}

impl InitArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            token: self.token.clone(),
            yaml_dir: self.yaml_dir.clone(),
        }
    }
}

pub fn run(args: InitArgs) -> Result<()> {
    let file_config = load_config(Path::new("."), args.config.as_deref())?;
    let config = merge_cli_with_config(args.overrides(), file_config)?;
    tracing::debug!("Resolved configuration: {:?}", config);

    println!("Using {} authentication against {}", config.auth.method(), config.url);

    // The directory is checked before connecting so a missing one costs no API calls
    let files = InitializerFiles::open(&config.yaml_dir)?;
    if files.remaining() == 0 {
        tracing::warn!("No .yml files in {}", config.yaml_dir.display());
    }

    let session = Session::connect(&config)?;
    println!("Connected to {}", session.api().base_url());

    let mut reporter = Reporter::stdout();
    let summary = Initializer::new(session.api())
        .run(files, &mut reporter)
        .context("Failed writing progress output")?;
    session.close();

    if summary.has_failures() {
        tracing::warn!("{} record(s) failed", summary.failed);
    }
    Ok(())
}
