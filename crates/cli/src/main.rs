//! # noterag-cli: a CLI for `noterag-server`
//!
//! `noterag-cli ask "<question>"` sends a single question; `noterag-cli repl` keeps
//! asking until end of input.

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use noterag_cli::{
    api_client::DEFAULT_TIMEOUT,
    form::{submit_label, DEFAULT_TOP_K, DEFAULT_WEB_SEARCH_RESULTS},
    render::{render_error, render_response, render_sources},
    ApiClient, QuerySnapshot, RagQuery, SearchForm,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the noterag server
    #[arg(long, env = "NOTERAG_SERVER_URL", default_value = "http://localhost:8080")]
    server: String,
    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskArgs),
    /// Ask questions interactively, one per line
    Repl(QueryOptions),
}

#[derive(Args, Debug)]
struct AskArgs {
    /// The question to ask
    query: String,
    #[command(flatten)]
    options: QueryOptions,
}

#[derive(Args, Debug, Clone)]
struct QueryOptions {
    /// Answer from the local knowledge base only
    #[arg(long)]
    no_web_search: bool,
    /// Number of web results to include
    #[arg(long, default_value_t = DEFAULT_WEB_SEARCH_RESULTS, value_parser = clap::value_parser!(u32).range(1..))]
    web_search_results: u32,
    /// Number of notes to retrieve
    #[arg(long, default_value_t = DEFAULT_TOP_K, value_parser = clap::value_parser!(u32).range(1..))]
    top_k: u32,
    /// Print previews of the sources behind the answer
    #[arg(long)]
    show_sources: bool,
}

impl QueryOptions {
    fn form(&self, query: impl Into<String>) -> SearchForm {
        SearchForm {
            query: query.into(),
            use_web_search: !self.no_web_search,
            web_search_results: self.web_search_results,
            top_k: self.top_k,
        }
    }
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries answers.
    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server, Duration::from_secs(cli.timeout))?;
    info!("Using server at {}", client.base_url());
    let controller = RagQuery::new(client);

    match cli.command {
        Commands::Ask(args) => handle_ask(&controller, &args).await,
        Commands::Repl(options) => handle_repl(&controller, &options).await,
    }
}

// --- Command Handlers ---

async fn handle_ask(controller: &RagQuery<ApiClient>, args: &AskArgs) -> Result<()> {
    let form = args.options.form(args.query.as_str());
    if form.to_request().is_none() {
        bail!("Please enter a question.");
    }

    eprintln!("{}", submit_label(true));
    form.submit(controller).await;

    let snapshot = controller.snapshot();
    if let Some(message) = snapshot.error() {
        return Err(anyhow!(message.to_string()));
    }
    print_snapshot(&snapshot, args.options.show_sources);
    Ok(())
}

async fn handle_repl(controller: &RagQuery<ApiClient>, options: &QueryOptions) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        let form = options.form(line);
        if form.to_request().is_none() {
            println!("Please enter a question.");
            continue;
        }

        eprintln!("{}", submit_label(true));
        form.submit(controller).await;

        let snapshot = controller.snapshot();
        match snapshot.error() {
            Some(message) => println!("{}", render_error(message)),
            None => print_snapshot(&snapshot, options.show_sources),
        }
    }
    Ok(())
}

fn print_snapshot(snapshot: &QuerySnapshot, show_sources: bool) {
    if let Some(response) = snapshot.response() {
        println!("{}", render_response(response));
        if show_sources && !response.sources.is_empty() {
            println!();
            print!("{}", render_sources(&response.sources));
        }
    }
}
