use std::io::Write;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vision_ai_console::client::ApiClient;
use vision_ai_console::config::Config;
use vision_ai_console::console::run_classifier;
use vision_ai_console::guard::{Access, Route, RouteGuard};
use vision_ai_console::nav::NavMenu;
use vision_ai_console::render;
use vision_ai_console::session::SessionStore;
use vision_ai_console::workflow::ClassificationWorkflow;

#[derive(Parser)]
#[command(name = "vai")]
#[command(about = "Admin console and label classifier for Vision AI")]
struct Cli {
    /// API base URL (overrides VISION_AI_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        #[arg(short, long)]
        username: String,

        /// Falls back to VISION_AI_PASSWORD
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the session token
    Logout,
    /// Show whether a session is active
    Status,
    /// Show the navigation menu
    Menu,
    /// List cameras
    Cameras {
        #[arg(long)]
        json: bool,
    },
    /// List objects and their labels
    Objects {
        #[arg(long)]
        json: bool,
    },
    /// List model prompts
    Prompts {
        #[arg(long)]
        json: bool,
    },
    /// List pending AI identifications
    Identifications {
        #[arg(long)]
        json: bool,
    },
    /// Classify pending identifications interactively
    Classify,
}

impl Commands {
    fn route(&self) -> Route {
        match self {
            Self::Login { .. } | Self::Logout => Route::Login,
            Self::Status | Self::Menu => Route::Home,
            Self::Cameras { .. } => Route::Cameras,
            Self::Objects { .. } => Route::Objects,
            Self::Prompts { .. } => Route::Prompts,
            Self::Identifications { .. } => Route::Identifications,
            Self::Classify => Route::Classify,
        }
    }
}

/// Logs go to stderr so stdout only carries command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "vision_ai_console=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_output<T: Serialize>(
    json: bool,
    items: &[T],
    table: impl FnOnce(&[T]) -> String,
) -> anyhow::Result<()> {
    let text = if json {
        serde_json::to_string_pretty(items)?
    } else {
        table(items)
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text.trim_end())?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::from_env(cli.api_url)?;
    let session = SessionStore::open(&config.session_path);
    let client = || -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(config.api_url()?, session.clone()))
    };

    let guard = RouteGuard::new(session.clone());
    if let Access::Redirect { to, return_to } = guard.check(cli.command.route()) {
        bail!("{} requires a session; run `vai login` first ({})", return_to, to);
    }

    match cli.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => std::env::var("VISION_AI_PASSWORD")
                    .context("No password given; pass --password or set VISION_AI_PASSWORD")?,
            };
            session.login(&client()?, &username, &password).await?;
            println!("Logged in as {}", username);
        }
        Commands::Logout => {
            session.logout();
            println!("Logged out");
        }
        Commands::Status => {
            if !session.is_authenticated() {
                println!("Not logged in");
            } else if let Some(url) = &config.api_url {
                println!("Logged in ({})", url);
            } else {
                println!("Logged in");
            }
        }
        Commands::Menu => {
            let mut menu = NavMenu::new();
            menu.toggle();
            print!("{}", menu.render(&session));
        }
        Commands::Cameras { json } => {
            let cameras = client()?.list_cameras(config.page_size).await?;
            print_output(json, &cameras, render::render_cameras)?;
        }
        Commands::Objects { json } => {
            let objects = client()?.list_objects(config.page_size).await?;
            print_output(json, &objects, render::render_objects)?;
        }
        Commands::Prompts { json } => {
            let prompts = client()?.list_prompts(config.page_size).await?;
            print_output(json, &prompts, render::render_prompts)?;
        }
        Commands::Identifications { json } => {
            let items = client()?.list_ai_identifications(config.page_size).await?;
            print_output(json, &items, render::render_identifications)?;
        }
        Commands::Classify => {
            let client = client()?;
            let mut workflow = ClassificationWorkflow::new(config.page_size);
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            run_classifier(&mut workflow, &client, input, &mut stdout).await?;
        }
    }

    Ok(())
}
