use anyhow::Context;
use badgecard::icons::DirIconStore;
use badgecard::server::Server;
use badgecard::{CardConfig, CardGenerator, OutputFormat, DEFAULT_USER_AGENT, USER_AGENT_ENV};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_LOGO: &str = "https://i.postimg.cc/4y1Dpxv4/hackerrank.jpg";

#[derive(Parser)]
#[command(name = "badgecard", version, about = "Render HackerRank badge cards")]
struct Cli {
    #[command(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Common {
    /// User-Agent sent to the profile site and icon hosts
    #[arg(long, global = true, env = USER_AGENT_ENV, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Profile site root
    #[arg(long, global = true, default_value = "https://www.hackerrank.com")]
    profile_base_url: String,

    /// Logo file path or http(s) URL
    #[arg(long, global = true, default_value = DEFAULT_LOGO)]
    logo: String,

    /// Keep downloaded badge icons in this directory
    #[arg(long, global = true)]
    icon_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve cards over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, short, default_value_t = 3000)]
        port: u16,
    },
    /// Render one card to a file
    Render {
        username: String,
        /// Output file (default: output/<username>_hackerrank_card.<ext>)
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long, short, default_value = "svg")]
        format: OutputFormat,
    },
}

async fn build_generator(common: &Common) -> anyhow::Result<CardGenerator> {
    let config = CardConfig {
        user_agent: common.user_agent.clone(),
        timeout_ms: common.timeout_ms,
        profile_base_url: common.profile_base_url.clone(),
        ..Default::default()
    };

    let generator = CardGenerator::new(config)?;
    let logo = generator.load_logo(&common.logo).await;
    let mut generator = generator.with_logo(logo);
    if let Some(dir) = &common.icon_dir {
        let store = DirIconStore::open(dir)
            .with_context(|| format!("open icon directory {}", dir.display()))?;
        generator = generator.with_icon_store(Arc::new(store));
    }
    Ok(generator)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let generator = build_generator(&cli.common).await?;

    match cli.command {
        Command::Serve { host, port } => {
            let server = Server::bind(&format!("{}:{}", host, port), generator)?;
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || server.serve(runtime))
                .await
                .context("server loop panicked")?;
        }
        Command::Render {
            username,
            output,
            format,
        } => {
            let card = generator
                .generate(&username, format)
                .await
                .with_context(|| format!("generate card for {}", username))?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from("output").join(format!("{}_hackerrank_card.{}", username, format.extension()))
            });
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            std::fs::write(&path, &card.data).with_context(|| format!("write {}", path.display()))?;
            println!("Card saved as {} ({}x{})", path.display(), card.width, card.height);
        }
    }
    Ok(())
}
