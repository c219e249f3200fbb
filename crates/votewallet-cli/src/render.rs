// Plain-text and JSON rendering of the derived views
use serde::Serialize;
use std::io::Write;
use votewallet_core::models::{Category, Company, DonationsInfo, LobbyingInfo, StatementsInfo};
use votewallet_core::views::{category_average_score, user_top_list, SpendingSummary};
use votewallet_core::{Notification, ScoreBand};

/// One line of the category overview
#[derive(Debug, Serialize)]
pub struct CategorySummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub icon: &'a str,
    pub average_score: u8,
    pub band: ScoreBand,
    pub companies: usize,
    /// Curated picks, best first
    pub picks: Vec<&'a str>,
}

impl<'a> CategorySummary<'a> {
    pub fn new(category: &'a Category) -> Self {
        let average_score = category_average_score(category);
        Self {
            id: &category.id,
            name: &category.name,
            icon: &category.icon,
            average_score,
            band: ScoreBand::from_score(average_score),
            companies: category.companies.len(),
            picks: user_top_list(category)
                .into_iter()
                .map(|c| c.name.as_str())
                .collect(),
        }
    }
}

/// Compact company row for ranked lists
#[derive(Debug, Serialize)]
pub struct CompanyRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub score: u8,
    pub band: ScoreBand,
    pub curated: bool,
}

impl<'a> CompanyRow<'a> {
    pub fn new(company: &'a Company, curated: bool) -> Self {
        Self {
            id: &company.id,
            name: &company.name,
            description: &company.description,
            score: company.score,
            band: ScoreBand::from_score(company.score),
            curated,
        }
    }
}

pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

pub fn write_categories<W: Write>(
    out: &mut W,
    summaries: &[CategorySummary<'_>],
    limit: usize,
) -> std::io::Result<()> {
    if summaries.is_empty() {
        return writeln!(out, "No categories to show.");
    }

    for (position, s) in summaries.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {} {} [{}] avg {} {} ({} companies)",
            position + 1,
            s.icon,
            s.name,
            s.id,
            s.average_score,
            s.band.emoji(),
            s.companies
        )?;
        if !s.picks.is_empty() {
            writeln!(out, "      your top {}: {}", limit, s.picks.join(", "))?;
        }
    }
    Ok(())
}

pub fn write_company_rows<W: Write>(out: &mut W, rows: &[CompanyRow<'_>]) -> std::io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No companies match.");
    }

    for row in rows {
        let marker = if row.curated { "*" } else { " " };
        writeln!(
            out,
            "{} {:>3} {} {} [{}] - {}",
            marker,
            row.score,
            row.band.emoji(),
            row.name,
            row.id,
            row.description
        )?;
    }
    Ok(())
}

/// Full detail view, political info included
pub fn write_company_detail<W: Write>(
    out: &mut W,
    company: &Company,
    alternatives: &[&Company],
) -> std::io::Result<()> {
    let band = ScoreBand::from_score(company.score);
    writeln!(out, "{} [{}]", company.name, company.id)?;
    writeln!(out, "  {}", company.description)?;
    writeln!(
        out,
        "  Score: {}/100 ({}) | Status: {}",
        company.score,
        band.label(),
        company.status
    )?;
    if let Some(lean) = company.political_lean {
        writeln!(out, "  Political lean: {}", lean)?;
    }
    if let Some(website) = &company.website {
        writeln!(out, "  Website: {}", website)?;
    }

    match &company.political_info.donations {
        DonationsInfo::Available {
            pac_name,
            total_donations,
            last_donation_date,
            party_breakdown,
            top_recipients,
            source,
        } => {
            writeln!(out, "  Donations: {} gave ${}", pac_name, format_amount(*total_donations))?;
            writeln!(out, "    last donation {} (source: {})", last_donation_date, source)?;
            for party in party_breakdown {
                writeln!(out, "    {}: ${}", party.party, format_amount(party.amount))?;
            }
            for recipient in top_recipients {
                writeln!(out, "    -> {}: ${}", recipient.name, format_amount(recipient.amount))?;
            }
        }
        DonationsInfo::Unavailable => writeln!(out, "  Donations: no data")?,
    }

    match &company.political_info.lobbying {
        LobbyingInfo::Available {
            total_spend,
            last_filing_year,
            top_issues,
        } => {
            let spend = total_spend.map(format_amount).unwrap_or_else(|| "?".to_string());
            let year = last_filing_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "?".to_string());
            writeln!(out, "  Lobbying: ${} (last filing {})", spend, year)?;
            if !top_issues.is_empty() {
                writeln!(out, "    issues: {}", top_issues.join(", "))?;
            }
        }
        LobbyingInfo::Unavailable => writeln!(out, "  Lobbying: no data")?,
    }

    match &company.political_info.statements {
        StatementsInfo::Available { tags } if !tags.is_empty() => {
            writeln!(out, "  Statements: {}", tags.join("; "))?;
        }
        _ => writeln!(out, "  Statements: none on record")?,
    }

    if !alternatives.is_empty() {
        writeln!(out, "  Better-rated alternatives:")?;
        for alt in alternatives {
            writeln!(out, "    {} ({})", alt.name, alt.score)?;
        }
    }
    Ok(())
}

/// Profile totals: overall score, then spending per category
pub fn write_spending_summary<W: Write>(
    out: &mut W,
    summary: &SpendingSummary,
    categories: &[Category],
) -> std::io::Result<()> {
    if summary.by_category.is_empty() {
        return writeln!(out, "No spending tracked yet.");
    }

    match summary.overall_score {
        Some(score) => {
            let band = ScoreBand::from_score(score);
            writeln!(out, "Overall score: {}/100 {} ({})", score, band.emoji(), band.label())?;
        }
        None => writeln!(out, "Overall score: not enough data")?,
    }
    writeln!(
        out,
        "Spent ${} at {} companies",
        format_amount(summary.total_spent),
        summary.unique_companies
    )?;

    for entry in &summary.by_category {
        let name = categories
            .iter()
            .find(|c| c.id == entry.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or(entry.category_id.as_str());
        writeln!(
            out,
            "  {}: ${} across {} {}",
            name,
            format_amount(entry.total),
            entry.unique_companies,
            if entry.unique_companies == 1 { "company" } else { "companies" }
        )?;
    }
    Ok(())
}

pub fn write_notifications<W: Write>(
    out: &mut W,
    notifications: &[Notification],
    hidden: usize,
) -> std::io::Result<()> {
    if notifications.is_empty() {
        return writeln!(out, "No score changes.");
    }

    for n in notifications {
        writeln!(
            out,
            "{} {} {} -> {} ({:+}) {}",
            n.trend.arrow(),
            n.company_name,
            n.old_score,
            n.new_score,
            n.delta(),
            n.date.format("%Y-%m-%d")
        )?;
        writeln!(out, "    {}", n.reason)?;
        if let Some(url) = &n.news_url {
            writeln!(out, "    {}", url)?;
        }
    }
    if hidden > 0 {
        writeln!(out, "({} more, 'news all' to see them)", hidden)?;
    }
    Ok(())
}

/// Format numbers with K/M suffixes
fn format_amount(amount: u64) -> String {
    if amount >= 1_000_000 {
        format!("{:.1}M", amount as f64 / 1_000_000.0)
    } else if amount >= 1_000 {
        format!("{:.1}k", amount as f64 / 1_000.0)
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votewallet_core::views::spending_summary;
    use votewallet_core::CurationStore;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(950), "950");
        assert_eq!(format_amount(420_000), "420.0k");
        assert_eq!(format_amount(1_200_000), "1.2M");
    }

    #[test]
    fn test_company_detail_lists_donations() {
        let store = CurationStore::with_builtin_catalog().unwrap();
        let walmart = store.company("c405").unwrap();
        let whole_foods = store.company("c1").unwrap();

        let mut out = Vec::new();
        write_company_detail(&mut out, walmart, &[whole_foods]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Walmart Inc. PAC"));
        assert!(text.contains("1.2M"));
        assert!(text.contains("Lobbying: no data"));
        assert!(text.contains("Whole Foods (85)"));
    }

    #[test]
    fn test_spending_summary_text() {
        let mut store = CurationStore::with_builtin_catalog().unwrap();
        store.login("Ada".into(), "ada@example.com".into());
        let summary = spending_summary(store.spending(), store.categories());

        let mut out = Vec::new();
        write_spending_summary(&mut out, &summary, store.categories()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Overall score: 72/100"));
        assert!(text.contains("Spent $1.0k at 9 companies"));
        assert!(text.contains("Grocery shopping: $545 across 3 companies"));
    }

    #[test]
    fn test_notifications_text() {
        let mut store = CurationStore::with_builtin_catalog().unwrap();
        store.login("Ada".into(), "ada@example.com".into());

        let mut out = Vec::new();
        write_notifications(&mut out, &store.notifications()[..2], 2).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("▲ Whole Foods 82 -> 85 (+3)"));
        assert!(text.contains("(2 more, 'news all' to see them)"));
        assert!(!text.contains("Patagonia"));
    }

    #[test]
    fn test_summary_json_shape() {
        let mut store = CurationStore::with_builtin_catalog().unwrap();
        store.add_store("1", "c3").unwrap();
        store.add_store("1", "c1").unwrap();

        let summary = CategorySummary::new(store.category("1").unwrap());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["picks"][0], "Whole Foods");
        assert_eq!(json["band"], "Moderate");
    }
}
