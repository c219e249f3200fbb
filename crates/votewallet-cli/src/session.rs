// Line-oriented interactive session over a single curation store
use crate::render::{self, CategorySummary, CompanyRow};
use std::io::{BufRead, Write};
use votewallet_core::views::{
    better_alternatives, global_search, hidden_ordered_categories, ranked_companies,
    spending_summary, top_companies, visible_ordered_categories,
};
use votewallet_core::{AddOutcome, Config, CurationStore, Error, Result, WhiteLabelSettings};

const HELP: &str = "\
Commands:
  list                         visible categories in your order
  hidden                       hidden categories
  rank <category> [term]       companies in a category, best first
  find <term>                  categories matching a term
  show-company <company>       company details
  top                          best rated companies overall
  add <category> <company>     add a store to your top list
  remove <category> <company>  remove a store from your top list
  move <from> <to>             move a category (1-based positions)
  hide|show|toggle <category>  change category visibility
  limit <n>                    stores allowed per category
  brand <#rrggbb> <app name>   white-label colors and name
  spending                     your spending and overall score
  news [all]                   score changes at brands you buy from
  login <name> <email>         start a fresh session
  guest                        browse as a guest
  logout                       end the session
  help                         this text
  quit                         leave";

/// A parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Hidden,
    Rank { category: String, term: String },
    Find { term: String },
    ShowCompany { company: String },
    Top,
    Add { category: String, company: String },
    Remove { category: String, company: String },
    Move { from: usize, to: usize },
    Visibility { category: String, change: VisibilityChange },
    Limit(usize),
    Brand { color: String, app_name: String },
    Spending,
    News { all: bool },
    Login { name: String, email: String },
    Guest,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    Hide,
    Show,
    Toggle,
}

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    /// Parse one input line. `Ok(None)` means the line was blank
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let arg = |i: usize, what: &str| -> std::result::Result<String, String> {
            rest.get(i)
                .map(|s| s.to_string())
                .ok_or_else(|| format!("{} needs a {}", verb, what))
        };
        let number = |i: usize, what: &str| -> std::result::Result<usize, String> {
            let raw = arg(i, what)?;
            raw.parse()
                .map_err(|_| format!("'{}' is not a valid {}", raw, what))
        };

        let command = match verb.to_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "hidden" => Command::Hidden,
            "rank" => Command::Rank {
                category: arg(0, "category id")?,
                term: rest.iter().skip(1).copied().collect::<Vec<_>>().join(" "),
            },
            "find" | "search" => {
                if rest.is_empty() {
                    return Err("find needs a search term".to_string());
                }
                Command::Find {
                    term: rest.join(" "),
                }
            }
            "show-company" | "company" => Command::ShowCompany {
                company: arg(0, "company id")?,
            },
            "top" => Command::Top,
            "add" => Command::Add {
                category: arg(0, "category id")?,
                company: arg(1, "company id")?,
            },
            "remove" | "rm" => Command::Remove {
                category: arg(0, "category id")?,
                company: arg(1, "company id")?,
            },
            "move" | "mv" => {
                let from = number(0, "position")?;
                let to = number(1, "position")?;
                if from == 0 || to == 0 {
                    return Err("positions start at 1".to_string());
                }
                Command::Move {
                    from: from - 1,
                    to: to - 1,
                }
            }
            "hide" => Command::Visibility {
                category: arg(0, "category id")?,
                change: VisibilityChange::Hide,
            },
            "show" => Command::Visibility {
                category: arg(0, "category id")?,
                change: VisibilityChange::Show,
            },
            "toggle" => Command::Visibility {
                category: arg(0, "category id")?,
                change: VisibilityChange::Toggle,
            },
            "limit" => Command::Limit(number(0, "number")?),
            "brand" => {
                let color = arg(0, "color")?;
                if rest.len() < 2 {
                    return Err("brand needs an app name".to_string());
                }
                Command::Brand {
                    color,
                    app_name: rest[1..].join(" "),
                }
            }
            "spending" | "profile" => Command::Spending,
            "news" => match rest.first() {
                None => Command::News { all: false },
                Some(&"all") => Command::News { all: true },
                Some(other) => return Err(format!("news takes 'all', not '{}'", other)),
            },
            "login" => Command::Login {
                name: arg(0, "name")?,
                email: arg(1, "email")?,
            },
            "guest" => Command::Guest,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command '{}'. Try 'help'", other)),
        };

        Ok(Some(command))
    }
}

/// Run one command against the store
pub fn execute<W: Write>(
    store: &mut CurationStore,
    config: &Config,
    command: Command,
    out: &mut W,
) -> Result<Flow> {
    match command {
        Command::List => {
            let summaries: Vec<_> = visible_ordered_categories(store.profile(), store.categories())
                .into_iter()
                .map(CategorySummary::new)
                .collect();
            render::write_categories(out, &summaries, store.profile().max_stores_per_category)?;
        }
        Command::Hidden => {
            let summaries: Vec<_> = hidden_ordered_categories(store.profile(), store.categories())
                .into_iter()
                .map(CategorySummary::new)
                .collect();
            render::write_categories(out, &summaries, store.profile().max_stores_per_category)?;
        }
        Command::Rank { category, term } => {
            let category = store
                .category(&category)
                .ok_or_else(|| Error::NotFound(format!("category '{}'", category)))?;
            let rows: Vec<_> = ranked_companies(category, &term)
                .map(|c| CompanyRow::new(c, category.has_store(&c.id)))
                .collect();
            render::write_company_rows(out, &rows)?;
        }
        Command::Find { term } => {
            let visible = visible_ordered_categories(store.profile(), store.categories());
            let summaries: Vec<_> = global_search(visible, &term)
                .into_iter()
                .map(CategorySummary::new)
                .collect();
            render::write_categories(out, &summaries, store.profile().max_stores_per_category)?;
        }
        Command::ShowCompany { company } => {
            let company = store
                .company(&company)
                .ok_or_else(|| Error::NotFound(format!("company '{}'", company)))?;
            let alternatives = if votewallet_core::score::should_suggest_alternatives(company.score) {
                better_alternatives(company, store.categories(), config.curation.alternatives_limit)
            } else {
                Vec::new()
            };
            render::write_company_detail(out, company, &alternatives)?;
        }
        Command::Top => {
            let rows: Vec<_> = top_companies(store.categories(), config.curation.top_companies_limit)
                .into_iter()
                .map(|c| {
                    let curated = store
                        .category(&c.category)
                        .is_some_and(|cat| cat.has_store(&c.id));
                    CompanyRow::new(c, curated)
                })
                .collect();
            render::write_company_rows(out, &rows)?;
        }
        Command::Add { category, company } => match store.add_store(&category, &company)? {
            AddOutcome::Added => writeln!(out, "Added {} to your top list", company)?,
            AddOutcome::AlreadyPresent => writeln!(out, "{} is already in your top list", company)?,
        },
        Command::Remove { category, company } => {
            if store.remove_store(&category, &company)? {
                writeln!(out, "Removed {}", company)?;
            } else {
                writeln!(out, "{} was not in your top list", company)?;
            }
        }
        Command::Move { from, to } => {
            store.move_category(from, to)?;
            writeln!(out, "Moved category {} to position {}", from + 1, to + 1)?;
        }
        Command::Visibility { category, change } => {
            if store.category(&category).is_none() {
                return Err(Error::NotFound(format!("category '{}'", category)));
            }
            let visible = match change {
                VisibilityChange::Hide => {
                    store.set_category_visibility(&category, false);
                    false
                }
                VisibilityChange::Show => {
                    store.set_category_visibility(&category, true);
                    true
                }
                VisibilityChange::Toggle => store.toggle_category_visibility(&category),
            };
            let state = if visible { "visible" } else { "hidden" };
            writeln!(out, "Category {} is now {}", category, state)?;
        }
        Command::Limit(requested) => {
            let limit = config.curation.clamp_limit(requested);
            store.set_max_stores_per_category(limit)?;
            writeln!(out, "Up to {} stores per category", limit)?;
            let over = store.over_limit_categories();
            if !over.is_empty() {
                writeln!(
                    out,
                    "Categories {} have more picks than that; remove some to add new ones",
                    over.join(", ")
                )?;
            }
        }
        Command::Brand { color, app_name } => {
            let mantra = store.white_label().mantra.clone();
            let settings = WhiteLabelSettings::new(app_name, color, mantra)?;
            store.set_white_label(settings)?;
            let brand = store.white_label();
            writeln!(out, "Branding set to {} ({})", brand.app_name, brand.color)?;
        }
        Command::Spending => {
            if !store.is_logged_in() {
                return Err(Error::NotLoggedIn);
            }
            let summary = spending_summary(store.spending(), store.categories());
            render::write_spending_summary(out, &summary, store.categories())?;
        }
        Command::News { all } => {
            if !store.is_logged_in() {
                return Err(Error::NotLoggedIn);
            }
            let feed = store.notifications();
            let shown = if all {
                feed.len()
            } else {
                feed.len().min(config.curation.notification_preview)
            };
            render::write_notifications(out, &feed[..shown], feed.len() - shown)?;
        }
        Command::Login { name, email } => {
            let account = store.login(name, email);
            writeln!(out, "Welcome, {}!", account.name)?;
        }
        Command::Guest => {
            store.login_as_guest();
            writeln!(out, "Browsing as a guest")?;
        }
        Command::Logout => {
            store.logout();
            writeln!(out, "Logged out; all picks and preferences were reset")?;
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Read commands until EOF or `quit`
///
/// Recoverable errors (limit reached, stale ids, bad input) are reported and
/// the session carries on; anything else ends it.
pub fn run_session<R: BufRead, W: Write>(
    store: &mut CurationStore,
    config: &Config,
    input: R,
    out: &mut W,
) -> anyhow::Result<()> {
    let app_name = store.white_label().app_name.clone();
    writeln!(out, "{} - type 'help' for commands", app_name)?;

    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "! {}", msg)?;
                continue;
            }
        };

        tracing::debug!("Session command: {:?}", command);
        match execute(store, config, command, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) if e.is_recoverable() => writeln!(out, "! {}", e)?,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
