//! ask-chat - ask questions of a campus knowledge base from the terminal
//!
//! Posts each question to the service's `/ask` endpoint and renders the
//! markdown answer together with the documents it cites.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

use ask_chat::api::AskClient;
use ask_chat::chat::ChatController;
use ask_chat::config::{self, Config, Overrides, Settings};
use ask_chat::repl;
use ask_chat::repl::colors::Theme;
use ask_chat::repl::display::format_message;
use ask_chat::repl::render::strip_ansi;

#[derive(Parser)]
#[command(name = "ask-chat", version)]
#[command(about = "Terminal chat client for a retrieval-augmented /ask service")]
struct Args {
    /// Base URL of the ask service
    #[arg(long, env = "ASK_CHAT_ENDPOINT")]
    endpoint: Option<String>,

    /// Documents to retrieve per question
    #[arg(long, env = "ASK_CHAT_TOP_K")]
    top_k: Option<u32>,

    /// Give up on a request after this many seconds (0 disables)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Color theme: dark or light
    #[arg(long, env = "ASK_CHAT_THEME")]
    theme: Option<Theme>,

    /// Don't print cited sources under answers
    #[arg(long)]
    no_sources: bool,

    /// Ask a single question and exit instead of starting the REPL
    #[arg(long, short = 'q')]
    question: Option<String>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file (from ~/.ask-chat/.env or current dir)
    let env_path = Some(config::config_dir().join(".env")).filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv(); // fallback to current dir
    }

    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "ask_chat=debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let overrides = Overrides {
        endpoint: args.endpoint,
        top_k: args.top_k,
        timeout_secs: args.timeout_secs,
        theme: args.theme,
        no_sources: args.no_sources,
    };
    let settings = Settings::resolve(overrides, Config::load());
    tracing::debug!(?settings, "resolved settings");

    let mut client = AskClient::new(&settings.endpoint)?.with_top_k(settings.top_k);
    if let Some(timeout) = settings.timeout {
        client = client.with_timeout(timeout)?;
    }

    if let Some(question) = args.question {
        return ask_once(client, &settings, &question).await;
    }

    print_banner(&settings);
    repl::run(client, &settings).await?;
    Ok(ExitCode::SUCCESS)
}

/// One-shot mode: ask, print, exit non-zero on failure
async fn ask_once(client: AskClient, settings: &Settings, question: &str) -> Result<ExitCode> {
    let palette = settings.theme.palette();
    let mut controller = ChatController::new(client);
    let interrupts = repl::Interrupts::install()?;

    let Some(bot) = repl::ask_with_ctrl_c(&mut controller, &interrupts, question).await else {
        let reason = controller.state().error().unwrap_or("Nothing to ask");
        anyhow::bail!("{}", reason);
    };

    let mut output = format_message(&bot, palette, settings.show_sources);
    if !std::io::stdout().is_terminal() {
        output = strip_ansi(&output);
    }
    println!("{}", output);

    if let Some(banner) = controller.state().error() {
        eprintln!("{}", palette.banner(banner));
        return Ok(ExitCode::FAILURE);
    }
    if bot.is_error || bot.is_stopped {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_banner(settings: &Settings) {
    let palette = settings.theme.palette();

    println!();
    println!(
        "{}",
        palette.banner_accent(&format!("  ask-chat {}", env!("CARGO_PKG_VERSION")))
    );
    println!("{}", palette.separator(50));
    println!("{}", palette.banner_line("Endpoint", &settings.endpoint));
    println!("{}", palette.banner_line("Theme", settings.theme.as_str()));
    let top_k = settings
        .top_k
        .map(|k| k.to_string())
        .unwrap_or_else(|| "service default".to_string());
    println!("{}", palette.banner_line("Top-k", &top_k));
    println!(
        "{}",
        palette.banner_line(
            "Sources",
            if settings.show_sources { "shown" } else { "hidden" }
        )
    );
    println!("{}", palette.separator(50));
    println!();
}
