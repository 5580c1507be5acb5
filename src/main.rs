use std::{path::PathBuf, sync::Arc};

use anyhow::bail;
use clap::{Parser, Subcommand};
use client::{log_api_config, BlogApi, Client};
use highlighter::Highlighter;
use render::{RenderOptions, Renderer};
use store::{
    CategoryStore, ContentStore, PostItemDetailStore, PostItemStore,
    StoreState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use util::config::Config;

#[derive(Parser)]
#[command(name = "blog", about = "Read posts from the blog backend")]
struct Cli {
    /// TOML file with [app], [api], [ws], [static] and [media] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List posts with their categories
    Posts {
        #[arg(long)]
        private: bool,
        /// Only show posts in this category id
        #[arg(long)]
        category: Option<String>,
    },
    /// Render one post as HTML
    Post {
        id: String,
        #[arg(long)]
        line_numbers: bool,
    },
    /// Render a content block tree as HTML
    Content {
        id: String,
        #[arg(long)]
        line_numbers: bool,
    },
    /// Check whether the backend answers
    Check,
    /// Forward /api, /ws, /static and /media to the backend
    Proxy {
        #[arg(long, default_value_t = 5173)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let level = if config.debug_mode { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(task = "start", mode = %config.mode);
    log_api_config(&config);

    let api = Arc::new(Client::new(&config)?);

    match cli.command {
        Command::Posts { private, category } => {
            list_posts(api, private, category).await
        }
        Command::Post { id, line_numbers } => {
            let store = PostItemDetailStore::new(api);
            store.fetch_content(&id).await;

            let state = store.state();
            let post = ok_or_bail(&state)?.as_ref();
            let Some(post) = post else {
                bail!("post {} was not found", id);
            };

            let highlighter = Highlighter::new();
            let renderer =
                Renderer::new(&highlighter, options(&config, line_numbers));
            println!("{}", renderer.render_post(post));
            Ok(())
        }
        Command::Content { id, line_numbers } => {
            let store = ContentStore::new(api);
            store.fetch_content(&id).await;

            let state = store.state();
            let Some(block) = ok_or_bail(&state)? else {
                bail!("content {} was not found", id);
            };

            let highlighter = Highlighter::new();
            let renderer =
                Renderer::new(&highlighter, options(&config, line_numbers));
            println!("{}", renderer.render(block));
            Ok(())
        }
        Command::Check => {
            if api.test_connection().await {
                println!("ok: {}", api.base_url());
                Ok(())
            } else {
                bail!("backend at {} is not reachable", api.base_url())
            }
        }
        Command::Proxy { port } => dev_proxy::serve(&config, port).await,
    }
}

async fn list_posts<A: BlogApi>(
    api: Arc<A>,
    private: bool,
    category: Option<String>,
) -> anyhow::Result<()> {
    let posts = PostItemStore::new(api);
    posts.fetch_content(private).await;

    let state = posts.state();
    let items = ok_or_bail(&state)?;

    let categories = CategoryStore::new();
    categories.extract_categories_from_posts(items);
    categories.set_selected_category(category);

    let names: Vec<String> = categories
        .state()
        .categories
        .iter()
        .map(|c| c.name.clone())
        .collect();
    println!("categories: {}", names.join(", "));

    for post in categories.filter_posts(items) {
        println!(
            "{}\t{}\t{}\t{} hits",
            post.id,
            post.published_at.format("%Y-%m-%d"),
            post.title,
            post.hits
        );
    }

    Ok(())
}

fn ok_or_bail<T>(state: &StoreState<T>) -> anyhow::Result<&T> {
    match &state.error {
        Some(message) => bail!("{}", message),
        None => Ok(&state.content),
    }
}

fn options(config: &Config, line_numbers: bool) -> RenderOptions {
    RenderOptions {
        line_numbers,
        line_number_start: None,
        media_base_url: Some(config.media_base_url()),
    }
}
