use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, Subcommand};

use gh_project_copy::api::{GitHubProjects, RequestContext};
use gh_project_copy::config::loader;
use gh_project_copy::config::types::AppConfig;
use gh_project_copy::copier::{CopyOptions, CopyOutcome, ProjectCopier};
use gh_project_copy::list::{self, ListTarget};
use gh_project_copy::prompt::ConsolePrompt;
use gh_project_copy::url::OrgRepo;

/// Exit status used when the run is interrupted with Ctrl-C.
const INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(
    name = "gh-project-copy",
    version,
    about = "Copy a GitHub classic project board into another organization"
)]
struct Cli {
    /// Org/Repo where the project currently resides.
    #[arg(long, default_value = "")]
    orgrepo: String,

    /// Org where the project should reside.
    #[arg(long, default_value = "")]
    org: String,

    /// Project number from the URL (not the id).
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    project_number: i64,

    /// Delete a same-named project in the destination org first (asks for confirmation).
    #[arg(long)]
    delete_project_if_exists: bool,

    /// Abort on the first column or card creation failure.
    #[arg(long)]
    strict: bool,

    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List classic projects of an organization or repository.
    #[command(group(ArgGroup::new("owner").required(true).args(["org", "orgrepo"])))]
    ListProjects {
        /// Organization whose projects to list.
        #[arg(long)]
        org: Option<String>,
        /// Repository (org/repo) whose projects to list.
        #[arg(long)]
        orgrepo: Option<String>,
    },
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = loader::load_config(cli.config.as_deref())?;
    if cli.strict {
        config.copy.strict = true;
    }

    // Install the rustls CryptoProvider before any TLS client is constructed.
    // An error only means one is already installed.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    let result = runtime.block_on(async {
        tokio::select! {
            result = dispatch(cli, config) => result.map(|()| ExitCode::SUCCESS),
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("interrupted; the destination project may be partially copied");
                Ok(ExitCode::from(INTERRUPTED))
            }
        }
    });
    // An interrupted confirmation leaves its stdin read parked on the
    // blocking pool; do not wait for it.
    runtime.shutdown_background();
    result
}

async fn dispatch(cli: Cli, config: AppConfig) -> Result<()> {
    let ctx = RequestContext::new(config.github.request_timeout());

    if let Some(Commands::ListProjects { org, orgrepo }) = cli.command {
        let target = match (org, orgrepo) {
            (Some(org), _) => ListTarget::Org(org),
            (None, Some(orgrepo)) => ListTarget::Repo(OrgRepo::parse(&orgrepo)?),
            (None, None) => bail!("list-projects needs --org or --orgrepo"),
        };
        let api = GitHubProjects::connect(&config.github)?;
        let count = list::run(&api, &ctx, &target, &mut std::io::stdout().lock()).await?;
        tracing::debug!("listed {count} project(s)");
        return Ok(());
    }

    let source = OrgRepo::parse(&cli.orgrepo)?;
    if cli.org.is_empty() {
        bail!("--org (the destination organization) is required");
    }
    let options = CopyOptions {
        source,
        dest_org: cli.org,
        project_number: cli.project_number,
        delete_existing: cli.delete_project_if_exists,
        strict: config.copy.strict,
    };

    let api = GitHubProjects::connect(&config.github)?;
    let mut copier = ProjectCopier::new(api, ctx, ConsolePrompt::stdio(), options);
    if let CopyOutcome::NotFound = copier.run().await? {
        tracing::warn!("check the number with `gh-project-copy list-projects --orgrepo <org/repo>`");
    }
    Ok(())
}
