use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use votewallet_core::views::{
    better_alternatives, global_search, ranked_companies, visible_ordered_categories,
};
use votewallet_core::{Catalog, Config, CurationStore};

mod render;
mod session;

use render::{CategorySummary, CompanyRow};

#[derive(Parser)]
#[command(name = "votewallet")]
#[command(version, about = "Track brands by impact score and curate your stores per category", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "VOTEWALLET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List categories with their average score
    Categories {
        /// Include hidden categories
        #[arg(long)]
        all: bool,
    },
    /// Rank the companies of one category
    Category {
        /// Category id
        id: String,
        /// Only companies whose name or description contains this
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Find categories by name or by the companies they contain
    Search {
        /// Search term
        term: String,
    },
    /// Show company details and political info
    Company {
        /// Company id
        id: String,
    },
    /// Start an interactive curation session
    Session {
        /// Log in with this name
        #[arg(long, requires = "email", conflicts_with = "guest")]
        name: Option<String>,
        /// Email for the login
        #[arg(long, requires = "name")]
        email: Option<String>,
        /// Browse without an account
        #[arg(long)]
        guest: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging - goes to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "votewallet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let catalog = Catalog::from_config(&config)?;
    tracing::debug!(
        "Catalog has {} categories, {} companies",
        catalog.categories.len(),
        catalog.company_count()
    );
    let mut store = CurationStore::new(catalog, &config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Categories { all }) => {
            let categories: Vec<_> = if all {
                store.categories().iter().collect()
            } else {
                visible_ordered_categories(store.profile(), store.categories())
            };
            let summaries: Vec<_> = categories.into_iter().map(CategorySummary::new).collect();
            if cli.json {
                render::write_json(&mut out, &summaries)?;
            } else {
                render::write_categories(
                    &mut out,
                    &summaries,
                    store.profile().max_stores_per_category,
                )?;
            }
        }
        Some(Commands::Category { id, search }) => {
            let category = store
                .category(&id)
                .ok_or_else(|| anyhow::anyhow!("No category with id '{}'", id))?;
            tracing::info!("Ranking {} (search: {:?})", category.name, search);
            let rows: Vec<_> = ranked_companies(category, &search)
                .map(|c| CompanyRow::new(c, category.has_store(&c.id)))
                .collect();
            if cli.json {
                render::write_json(&mut out, &rows)?;
            } else {
                writeln!(out, "{} {}", category.icon, category.name)?;
                render::write_company_rows(&mut out, &rows)?;
            }
        }
        Some(Commands::Search { term }) => {
            tracing::info!("Searching for: {}", term);
            let summaries: Vec<_> = global_search(store.categories(), &term)
                .into_iter()
                .map(CategorySummary::new)
                .collect();
            if cli.json {
                render::write_json(&mut out, &summaries)?;
            } else {
                render::write_categories(
                    &mut out,
                    &summaries,
                    store.profile().max_stores_per_category,
                )?;
            }
        }
        Some(Commands::Company { id }) => {
            let company = store
                .company(&id)
                .ok_or_else(|| anyhow::anyhow!("No company with id '{}'", id))?;
            let alternatives = if votewallet_core::score::should_suggest_alternatives(company.score)
            {
                better_alternatives(company, store.categories(), config.curation.alternatives_limit)
            } else {
                Vec::new()
            };
            if cli.json {
                render::write_json(&mut out, company)?;
            } else {
                render::write_company_detail(&mut out, company, &alternatives)?;
            }
        }
        Some(Commands::Session { name, email, guest }) => {
            match (name, email) {
                (Some(name), Some(email)) => {
                    store.login(name, email);
                }
                _ if guest => {
                    store.login_as_guest();
                }
                _ => {}
            }
            let stdin = std::io::stdin();
            session::run_session(&mut store, &config, stdin.lock(), &mut out)?;
        }
        None => {
            writeln!(out, "No command specified. Try --help")?;
        }
    }

    Ok(())
}
