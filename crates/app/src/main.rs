use anyhow::anyhow;
use chrono::Utc;
use clap::{Parser, Subcommand};
use restaurant_chat_core::{
    ingest_document, ChatOptions, ChatPipeline, ChunkingOptions, DiskVectorStore, GeminiConfig,
    GeminiEmbedder, GeminiGenerator, ChatSession, Menu, CONTACT, LOCATION, RESTAURANT_NAME,
    TIMINGS,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "restaurant-chat", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the persisted vector index.
    #[arg(long, default_value = "vector_index")]
    index_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Build the vector index from the knowledge PDF.
    Ingest {
        /// Path to the knowledge document.
        #[arg(long, default_value = "data.pdf")]
        pdf: PathBuf,
        /// Maximum characters per chunk.
        #[arg(long, default_value = "300")]
        chunk_chars: usize,
    },
    /// Ask a single question in a fresh session.
    Ask {
        /// The question to ask.
        #[arg(long)]
        question: String,
        /// Number of chunks retrieved per question.
        #[arg(long, default_value = "10")]
        top_k: usize,
        /// Print the retrieved chunks alongside the answer.
        #[arg(long, default_value_t = false)]
        show_sources: bool,
    },
    /// Interactive chat session with the assistant.
    Chat {
        /// Number of chunks retrieved per question.
        #[arg(long, default_value = "10")]
        top_k: usize,
    },
    /// Browse the menu: list categories, or show one category's items.
    Menu {
        /// Category to display, e.g. "Pizza".
        #[arg(long)]
        category: Option<String>,
    },
}

type GeminiPipeline = ChatPipeline<GeminiEmbedder, DiskVectorStore, GeminiGenerator>;

fn build_pipeline(index_dir: &PathBuf, top_k: usize) -> anyhow::Result<GeminiPipeline> {
    let config = GeminiConfig::from_env()
        .ok_or_else(|| anyhow!("GEMINI_API_KEY is not set; the assistant needs credentials"))?;
    let index = DiskVectorStore::open(index_dir.clone())?;

    if index.chunk_count() == 0 {
        warn!(index_dir = %index_dir.display(), "vector index is empty; run `ingest` first");
    }
    // Similarity scores are meaningless if the index was built with a
    // different embedding model than the one answering queries.
    if let Some(indexed_model) = index.embedding_model() {
        if indexed_model != config.embedding_model {
            return Err(anyhow!(
                "index was built with {indexed_model} but queries would use {}; re-run `ingest`",
                config.embedding_model
            ));
        }
    }

    let options = ChatOptions {
        top_k,
        ..ChatOptions::default()
    };

    Ok(ChatPipeline::new(
        GeminiEmbedder::new(config.clone()),
        index,
        GeminiGenerator::new(config),
        options,
    ))
}

fn print_header() {
    println!("{RESTAURANT_NAME}");
    println!("Location: {LOCATION}");
    println!("Contact: {CONTACT}");
    println!("Timings: {TIMINGS}");
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "restaurant-chat boot"
    );

    match cli.command {
        Command::Ingest { pdf, chunk_chars } => {
            let config = GeminiConfig::from_env()
                .ok_or_else(|| anyhow!("GEMINI_API_KEY is not set; ingestion embeds chunks remotely"))?;
            let embedder = GeminiEmbedder::new(config);
            let index = DiskVectorStore::open(cli.index_dir.clone())?;

            let report = ingest_document(
                &pdf,
                ChunkingOptions {
                    max_chars: chunk_chars,
                },
                &embedder,
                &index,
            )
            .await?;

            info!(
                document = %report.document.document_title,
                pages = report.page_count,
                chunks = report.chunk_count,
                "index rebuilt"
            );
            println!(
                "{} chunks from {} pages indexed at {}",
                report.chunk_count,
                report.page_count,
                Utc::now().to_rfc3339()
            );
        }
        Command::Ask {
            question,
            top_k,
            show_sources,
        } => {
            let pipeline = build_pipeline(&cli.index_dir, top_k)?;
            let mut session = ChatSession::new();

            let result = pipeline.ask(&mut session, &question).await?;
            println!("{}", result.answer);

            if show_sources {
                for source in &result.sources {
                    println!("[page {} score={:.4}] {}", source.page, source.score, source.text);
                }
            }
        }
        Command::Chat { top_k } => {
            let pipeline = build_pipeline(&cli.index_dir, top_k)?;
            let mut session = ChatSession::new();

            print_header();
            println!("Ask me about our menu, booking a table, or placing an order!");
            println!("Type 'exit' or 'quit' to end the session.");

            loop {
                print!("\nYou: ");
                io::stdout().flush()?;

                let mut input = String::new();
                if io::stdin().read_line(&mut input)? == 0 {
                    break;
                }
                let input = input.trim();

                if input.is_empty() {
                    continue;
                }
                if matches!(input.to_lowercase().as_str(), "exit" | "quit") {
                    println!("Goodbye!");
                    break;
                }

                match pipeline.ask(&mut session, input).await {
                    Ok(result) => {
                        if let Some(standalone) = &result.standalone_question {
                            info!(session = %session.session_id, %standalone, "restated question");
                        }
                        println!("\nAssistant: {}", result.answer);
                    }
                    // The turn failed; the session is unchanged and the
                    // same question can be asked again.
                    Err(error) => {
                        warn!(session = %session.session_id, %error, "turn failed");
                        println!("\nAssistant: Sorry, something went wrong ({error}). Please try again.");
                    }
                }
            }
        }
        Command::Menu { category } => {
            let menu = Menu::load()?;

            match category {
                Some(name) => {
                    let Some(section) = menu.category(&name) else {
                        println!("No category named {name:?}. Available categories:");
                        for category_name in menu.category_names() {
                            println!("  {category_name}");
                        }
                        return Ok(());
                    };

                    println!("{}", section.category);
                    for item in &section.items {
                        println!("  {} - {}", item.name, item.display_price());
                        if let Some(description) = &item.description {
                            println!("      {description}");
                        }
                    }
                }
                None => {
                    print_header();
                    println!("Menu categories:");
                    for category_name in menu.category_names() {
                        println!("  {category_name}");
                    }
                }
            }
        }
    }

    Ok(())
}
