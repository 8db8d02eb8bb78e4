use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use favdash::dashboard;
use favdash::export;
use favdash::metrics;
use favdash::model::RemoteConfig;
use favdash::remote::RemoteClient;
use favdash::session::SessionStore;
use favdash::tui;

#[derive(Parser)]
#[command(name = "favdash")]
#[command(about = "Category engagement dashboard", long_about = None)]
struct Cli {
    /// Session store root (defaults to FAVDASH_HOME, then the home dir)
    #[arg(long, value_name = "PATH", global = true)]
    store_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the remote and perform the login exchange
    Login {
        /// Backend base URL, e.g. http://localhost:5000
        #[arg(long)]
        url: String,
        #[arg(long)]
        email: String,
        /// Password (falls back to FAVDASH_SENHA)
        #[arg(long)]
        senha: Option<String>,
        /// Persist the senha in config.json for unattended bootstraps
        #[arg(long)]
        remember_senha: bool,
    },

    /// Drop the stored token for the configured remote
    Logout,

    /// Print the sorted category list
    Categories {
        /// Emit JSON
        #[arg(long)]
        json: bool,
        /// Case-insensitive substring filter on the name
        #[arg(long)]
        filter: Option<String>,
    },

    /// Write the category CSV (original order, unaffected by filters)
    Export {
        /// Output path (defaults to categorias.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return tui::run(tui::TuiRunOptions {
            store_root: cli.store_root,
        });
    };

    let store = open_store(cli.store_root)?;

    match command {
        Commands::Login {
            url,
            email,
            senha,
            remember_senha,
        } => {
            let remote = RemoteConfig {
                base_url: url.trim_end_matches('/').to_string(),
                email,
                senha: None,
            };
            let senha = match senha {
                Some(s) => s,
                None => dashboard::resolve_senha(&remote)?,
            };

            let client = RemoteClient::new(remote.clone())?;
            let token = client.login(&senha).context("login")?;
            store.set_token(&remote, &token).context("persist token")?;

            let email = remote.email.clone();
            let mut cfg = store.read_config()?;
            cfg.remote = Some(RemoteConfig {
                senha: remember_senha.then_some(senha),
                ..remote
            });
            store.write_config(&cfg).context("persist remote config")?;

            println!("Logged in as {}", email);
        }

        Commands::Logout => {
            let remote = dashboard::require_remote(&store)?;
            store.clear_token(&remote)?;
            println!("Logged out");
        }

        Commands::Categories { json, filter } => {
            let remote = dashboard::require_remote(&store)?;
            let data = dashboard::load(&store, &remote)?;

            let term = filter.unwrap_or_default();
            let rows = metrics::filter_by_name(&data.sorted, &term);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&rows).context("serialize categories json")?
                );
            } else {
                for c in &rows {
                    let marker = if metrics::is_top(data.stats, c.favorites) {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{} {} {}  {} favorites ({:.1}%)",
                        marker,
                        metrics::icon(&c.name),
                        c.name,
                        c.favorites,
                        metrics::share_percent(data.stats, c.favorites),
                    );
                }
                if rows.is_empty() {
                    println!("(no categories)");
                }
            }
        }

        Commands::Export { out } => {
            let remote = dashboard::require_remote(&store)?;
            let data = dashboard::load(&store, &remote)?;

            let path = out.unwrap_or_else(|| PathBuf::from(export::EXPORT_FILE_NAME));
            export::write_csv(&data.categories, &path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn open_store(store_root: Option<PathBuf>) -> Result<SessionStore> {
    let root = match store_root {
        Some(root) => root,
        None => SessionStore::default_root()?,
    };
    SessionStore::open_or_init(&root)
}
