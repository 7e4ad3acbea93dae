use actix_web::{App, HttpServer, web};
use clap::{Parser, Subcommand};
use mica::config::{self, SiteConfig};
use mica::index::{self, SortKey};
use mica::server::{self, AppState};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mica")]
#[command(about = "Flat-file blog server: Markdown in, themed HTML out")]
#[command(long_about = "\
Flat-file blog server: Markdown in, themed HTML out

Your filesystem is the database. Markdown files under the content
directory become pages; an optional metadata header at the top of each
file carries its title, date, author, and template.

Content file format:

  /*
  Title: Hello World
  Date: 2021/05/05
  Template: post
  */
  # Hello

  Markdown body...

URL resolution: /a/b tries content/a/b.md, then content/a/b/index.md.
Misses serve the configured not-found document with status 404.

Themes are directories of Tera templates under theme/<name>/. A page
picks its template via the Template header (default \"post\"); the root
listing uses \"index\".

Run 'mica gen-config' to print a documented mica.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "mica.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the server
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate config and content without serving
    Check,
    /// Print a stock mica.toml with all options documented
    GenConfig,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut site_config = SiteConfig::load(&cli.config)?;

    let default_filter = if site_config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                site_config.host = host;
            }
            if let Some(port) = port {
                site_config.port = port;
            }
            let bind = (site_config.host.clone(), site_config.port);
            let state = web::Data::new(AppState::from_config(site_config)?);

            tracing::info!(
                host = %bind.0,
                port = bind.1,
                theme = state.theme.name(),
                "mica serving"
            );
            let configure = server::configure(state);
            HttpServer::new(move || App::new().configure(configure.clone()))
                .bind(bind)?
                .run()
                .await?;
        }
        Command::Check => {
            site_config.validate()?;
            let pages = index::build_index(&site_config, SortKey::Date, true)?;
            println!(
                "{}: {} pages under {}",
                site_config.site_title,
                pages.len(),
                site_config.content_dir.display()
            );
            for page in &pages {
                println!("  {}  {}", page.url, page.title);
            }
            println!("config ok");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
