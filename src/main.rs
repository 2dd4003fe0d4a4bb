use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use nrt_cli::{CliProgress, display_banner, print_help, prompt_input, render_answer, render_error};
use nrt_openai::OpenAiClient;
use nrt_rag::{
    DEFAULT_INDEX_PATH, HttpArticleFetcher, IndexStore, IngestPipeline, MAX_URLS, QueryEngine,
};

#[derive(Parser)]
#[command(name = "nrt")]
#[command(about = "AI-powered news research assistant", long_about = None)]
struct Cli {
    /// Path of the persisted index file
    #[arg(long, default_value = DEFAULT_INDEX_PATH)]
    index_path: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, index, and persist up to 3 article URLs
    Ingest {
        #[arg(num_args = 1..=3)]
        urls: Vec<String>,
    },
    /// Ask a question about the indexed articles
    Ask { question: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let store = IndexStore::new(cli.index_path);

    match cli.command {
        Some(Command::Ingest { urls }) => {
            if let Err(e) = run_ingest(&store, &urls).await {
                render_error(&e);
                std::process::exit(1);
            }
        }
        Some(Command::Ask { question }) => {
            if let Err(e) = run_ask(&store, &question).await {
                render_error(&e);
                std::process::exit(1);
            }
        }
        None => run_interactive(&store).await?,
    }

    Ok(())
}

async fn run_ingest(store: &IndexStore, urls: &[String]) -> nrt_rag::Result<()> {
    let client = Arc::new(OpenAiClient::from_env()?);
    let pipeline = IngestPipeline::new(HttpArticleFetcher::new()?, client);

    let index = pipeline.build_index(urls, &CliProgress).await?;
    store.save(&index)?;

    println!(
        "{} Indexed {} chunks from {} URL(s) into {}",
        "✅".green(),
        index.len(),
        urls.len(),
        store.path().display()
    );
    println!("{}", "You can now ask questions about the articles.".dimmed());
    Ok(())
}

async fn run_ask(store: &IndexStore, question: &str) -> nrt_rag::Result<()> {
    let client = Arc::new(OpenAiClient::from_env()?);
    let engine = QueryEngine::new(client.clone(), client);

    let result = engine.answer(store, question).await?;
    render_answer(&result);
    Ok(())
}

async fn run_interactive(store: &IndexStore) -> Result<()> {
    display_banner();

    let mut history = Vec::new();
    let mut pending_urls: Vec<String> = Vec::new();

    loop {
        let input = prompt_input(&mut history).await?;

        if input.is_empty() {
            continue;
        }

        let input_lower = input.to_lowercase();

        if input_lower == "exit" || input_lower == "quit" {
            println!("{}", "👋 Goodbye!".green());
            break;
        }

        if input_lower == "help" {
            print_help();
            continue;
        }

        if input_lower == "urls" {
            if pending_urls.is_empty() {
                println!("{}", "No URLs collected yet. Use 'add <url>'.".dimmed());
            } else {
                for (i, url) in pending_urls.iter().enumerate() {
                    println!("  {}. {}", i + 1, url);
                }
            }
            continue;
        }

        if input_lower == "clear" {
            pending_urls.clear();
            println!("{} Cleared collected URLs", "🗑️".cyan());
            continue;
        }

        if let Some(url) = input.strip_prefix("add ") {
            let url = url.trim();
            if pending_urls.len() >= MAX_URLS {
                println!(
                    "{} At most {} URLs are supported; 'process' or 'clear' first",
                    "⚠️".yellow(),
                    MAX_URLS
                );
            } else if pending_urls.iter().any(|u| u == url) {
                println!("{} Already collected: {}", "⚠️".yellow(), url);
            } else {
                pending_urls.push(url.to_string());
                println!(
                    "{} Collected {} of {} URLs",
                    "📰".cyan(),
                    pending_urls.len(),
                    MAX_URLS
                );
            }
            continue;
        }

        if input_lower == "process" {
            if pending_urls.is_empty() {
                println!("{} Nothing to process; 'add <url>' first", "⚠️".yellow());
                continue;
            }

            match run_ingest(store, &pending_urls).await {
                Ok(()) => pending_urls.clear(),
                Err(e) => render_error(&e),
            }
            continue;
        }

        // Anything else is a question about the indexed articles.
        if !store.exists() {
            println!(
                "{} No index at {} yet; 'add <url>' then 'process' first",
                "ℹ️".yellow(),
                store.path().display()
            );
            continue;
        }

        println!("{} Thinking...", "🤖".blue());
        if let Err(e) = run_ask(store, &input).await {
            render_error(&e);
        }
    }

    Ok(())
}
