use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mimalloc::MiMalloc;
use net::RouterFetcher;
use shell::{ClickOutcome, Session, ShellConfig, Step, StepOutcome};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Opens a page of a shared-layout site and replays navigation steps against it.
#[derive(Debug, Parser)]
#[command(name = "navshell", version)]
struct Cli {
    /// Page URL, or a path to a local HTML file or site directory.
    location: String,

    /// `click:<href>`, `back` or `forward`; repeatable, applied in order.
    #[arg(long = "step", value_name = "STEP")]
    steps: Vec<Step>,

    /// TOML file overriding markers, header URL and messages.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = View::Content)]
    print: View,

    /// Debug logging (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Html,
    Content,
    Outline,
}

const OUTLINE_CAP: usize = 400;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };
    let location = shell::parse_location(&cli.location)?;

    let mut session = Session::open(RouterFetcher::default(), config, location.clone())
        .with_context(|| format!("opening {location}"))?;
    if let Some(report) = session.init_report() {
        info!(
            header = report.header_loaded,
            interceptor = report.interceptor_attached,
            hardened = report.hardened_links,
            "initialized: {:?}",
            report.content
        );
    }

    for step in &cli.steps {
        let outcome = session
            .run_step(step)
            .with_context(|| format!("step {step}"))?;
        match outcome {
            StepOutcome::Click(ClickOutcome::Intercepted { page, load, .. }) => {
                info!(%page, "intercepted: {load:?}");
            }
            StepOutcome::Click(ClickOutcome::Native { url, new_tab }) => {
                info!(%url, new_tab, "native navigation");
            }
            StepOutcome::Click(ClickOutcome::Ignored) => warn!("click on {step} was ignored"),
            StepOutcome::History(Some(load)) => info!("history traversal: {load:?}"),
            StepOutcome::History(None) => warn!("{step}: nothing to do"),
        }
        let state = serde_json::to_string(&session.window().history.state())?;
        info!(location = %session.location(), %state, "after {step}");
    }

    print_view(&session, cli.print);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_view<F: net::Fetcher>(session: &Session<F>, view: View) {
    match view {
        View::Html => println!("{}", html::outer_html(session.document().root())),
        View::Content => match session.content_html() {
            Some(content) => println!("{content}"),
            None => warn!("page has no content region"),
        },
        View::Outline => {
            for line in html::outline(session.document().root(), OUTLINE_CAP) {
                println!("{line}");
            }
        }
    }
}
