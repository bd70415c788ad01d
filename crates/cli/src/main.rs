mod commands;
mod query;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use commands::actions::{run_check, run_feed, run_query};
use commands::options::{self, OptionsCommand};
use commands::ActivityContext;
use jira_activity_api::ApiClient;
use jira_activity_config::Config;
use jira_activity_output::{OutputFormat, Page};
use query::{activity::FeedQuery, jql::SearchQuery};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "jira-activity", version, about = "Render JIRA issue searches and activity feeds as HTML", long_about = None)]
struct Cli {
    /// Path to config file (defaults to ~/.jira-activity/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JIRA server URL, overrides the configured one
    #[arg(long, global = true, env = "JIRA_ACTIVITY_BASE_URL")]
    base_url: Option<String>,

    /// API token; sent as basic auth with the configured email, otherwise as a bearer token
    #[arg(long, global = true, env = "JIRA_ACTIVITY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format for the rendered page
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Html)]
    output: OutputFormat,

    /// Skip the project existence check
    #[arg(long, global = true)]
    skip_project_check: bool,

    /// Enable verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Show or save default options
    #[command(subcommand)]
    Options(OptionsCommand),
    #[command(flatten)]
    Action(ActionCommand),
}

#[derive(Subcommand, Debug, Clone)]
enum ActionCommand {
    /// Search issues that have stayed in a status for longer than a number of days
    Query(QueryArgs),
    /// Show recent issue activity of a user
    Feed(FeedArgs),
    /// Check that a project exists and is visible
    Check {
        /// Project to check (defaults to the configured project)
        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
struct QueryArgs {
    /// Project (defaults to the configured project)
    #[arg(short, long)]
    project: Option<String>,
    /// Status the issues are in, e.g. Open
    #[arg(short, long, default_value = "")]
    status: String,
    /// Issues must have entered the status more than this many days ago
    #[arg(short, long, default_value = "")]
    days: String,
    /// Maximum number of issues (defaults to the configured maximum)
    #[arg(short, long)]
    max_results: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct FeedArgs {
    /// User whose activity to show (defaults to the configured user)
    #[arg(short, long)]
    user: Option<String>,
    /// Maximum number of entries (defaults to the configured maximum)
    #[arg(short, long)]
    max_results: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let mut config = Config::load(cli.config.as_ref())?;

    let action = match cli.command {
        Command::Options(command) => {
            let message = options::handle(command, &mut config, cli.config.as_deref())?;
            println!("{message}");
            return Ok(ExitCode::SUCCESS);
        }
        Command::Action(action) => action,
    };

    let base_url = cli
        .base_url
        .clone()
        .unwrap_or_else(|| config.base_url.clone());
    let client = build_client(&base_url, &config, cli.token.as_deref())?;
    let ctx = ActivityContext {
        client: &client,
        base_url: &base_url,
        check_project: !cli.skip_project_check,
    };

    let default_max = config.maximum_results.to_string();
    let mut page = Page::new();

    let outcome = match &action {
        ActionCommand::Query(args) => {
            let query = SearchQuery::new(
                args.project.as_deref().unwrap_or(&config.project),
                &args.status,
                &args.days,
                args.max_results.as_deref().unwrap_or(&default_max),
            );
            run_query(&ctx, query, &mut page).await
        }
        ActionCommand::Feed(args) => {
            let query = FeedQuery::new(
                args.user.as_deref().unwrap_or(&config.user),
                args.max_results.as_deref().unwrap_or(&default_max),
            );
            run_feed(&ctx, query, &config.project, &mut page).await
        }
        ActionCommand::Check { project } => {
            run_check(&ctx, project.as_deref().unwrap_or(&config.project), &mut page).await
        }
    };

    print!("{}", page.render(cli.output));

    Ok(if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,jira_activity=debug,jira_activity_api=debug,jira_activity_output=debug,jira_activity_config=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

fn build_client(base_url: &str, config: &Config, token: Option<&str>) -> Result<ApiClient> {
    let client = ApiClient::new(base_url)
        .with_context(|| format!("Invalid JIRA base URL '{base_url}'"))?;

    let token = token.map(str::trim).filter(|t| !t.is_empty());
    Ok(match (token, config.email.as_deref()) {
        (Some(token), Some(email)) => client.with_basic_auth(email, token),
        (Some(token), None) => client.with_bearer_token(token),
        (None, _) => client,
    })
}
