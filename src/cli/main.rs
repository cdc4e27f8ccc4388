/**
 * MarketSync Command-Line Entry Point
 *
 * Runs the sync core against a live backend: watches conversations, sends
 * messages and edits the wishlist. Logging goes through tracing; set
 * RUST_LOG to change the level.
 */
use clap::{Parser, Subcommand};
use marketsync::client::{
    Config, ConversationBoard, ConversationSync, CredentialProvider, HttpRemoteClient,
    OptimisticMutator, SessionCredentials, SyncEvent, WishlistStore,
};
use marketsync::shared::{AppConfig, ConfigError, MessageEntry, SyncError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "marketsync")]
#[command(about = "Marketplace messaging and wishlist sync", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/marketsync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bearer token
    #[arg(long, global = true, env = "MARKETSYNC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll conversations and the active conversation's messages until Ctrl-C
    Watch {
        /// Conversation to open first
        #[arg(long)]
        conversation: Option<i64>,
    },

    /// Send a message to a conversation
    Send {
        conversation: i64,
        body: String,
    },

    /// Wishlist operations
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommands,
    },
}

#[derive(Subcommand)]
enum WishlistCommands {
    /// Print the wishlist
    List,
    /// Add or remove a listing
    Toggle { listing: i64 },
}

#[tokio::main]
async fn main() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "marketsync=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            eprintln!("configuration error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(cli, config).await {
        tracing::error!("{}", e);
        eprintln!("error: {}", e.user_message());
        std::process::exit(1);
    }
}

/// Config file from `--config`, or the default location plus environment
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let app = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    Ok(Config::from_app(app))
}

async fn run(cli: Cli, config: Config) -> Result<(), SyncError> {
    tracing::info!("Using backend {}", config.server_url());

    let credentials = Arc::new(SessionCredentials::new());
    credentials.set_token(cli.token);
    let client = Arc::new(HttpRemoteClient::new(config.clone(), credentials.clone())?);

    match cli.command {
        Commands::Watch { conversation } => watch(client, config, conversation).await,
        Commands::Send { conversation, body } => {
            let board = ConversationBoard::new();
            let mutator = OptimisticMutator::new(client, credentials);
            let message = mutator.send_message(&board, conversation, &body).await?;
            println!("sent message {} at {}", message.id, message.created_at);
            Ok(())
        }
        Commands::Wishlist { command } => {
            let wishlist = WishlistStore::new();
            wishlist.refresh(&*client, &*credentials).await?;
            match command {
                WishlistCommands::List => {
                    if !credentials.is_authenticated() {
                        return Err(SyncError::AuthRequired);
                    }
                    for item in wishlist.items().iter() {
                        println!(
                            "{}\t{}\t{}\t{}",
                            item.announcement_id,
                            item.title().unwrap_or("-"),
                            item.price().map(|p| format!("{} DA", p)).unwrap_or_default(),
                            item.status().unwrap_or("-"),
                        );
                    }
                    Ok(())
                }
                WishlistCommands::Toggle { listing } => {
                    let mutator = OptimisticMutator::new(client, credentials);
                    let change = mutator.toggle(&wishlist, listing).await?;
                    println!("{:?} listing {}", change, listing);
                    Ok(())
                }
            }
        }
    }
}

async fn watch(
    client: Arc<HttpRemoteClient>,
    config: Config,
    conversation: Option<i64>,
) -> Result<(), SyncError> {
    let sync = ConversationSync::new(client, config);
    let mut events = sync.subscribe_events();
    sync.mount(conversation);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping");
                sync.unmount();
                return Ok(());
            }
            event = events.recv() => match event {
                Ok(SyncEvent::ConversationsChanged) => {
                    for conv in sync.board().conversations().iter() {
                        println!(
                            "[{}] {} - {}",
                            conv.id,
                            conv.other_user_username,
                            conv.last_message.as_deref().unwrap_or("")
                        );
                    }
                }
                Ok(SyncEvent::MessagesChanged { conversation_id }) => {
                    let other = sync.board().active_conversation().map(|c| c.other_user_id);
                    println!("-- conversation {} --", conversation_id);
                    for entry in sync.board().messages().iter() {
                        let direction = match (entry, other) {
                            (_, None) => "?",
                            (MessageEntry::Pending { .. }, _) => "…",
                            (MessageEntry::Confirmed(m), Some(other)) => {
                                if m.is_outgoing(other) { ">" } else { "<" }
                            }
                        };
                        println!("{} {} {}", direction, entry.created_at(), entry.content());
                    }
                }
                Ok(other) => tracing::debug!("{:?}", other),
                Err(e) => tracing::warn!("Event stream lagged: {}", e),
            }
        }
    }
}
