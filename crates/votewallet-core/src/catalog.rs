use crate::config::Config;
use crate::models::Category;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// The bundled catalog, compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Static category and company data the store is seeded from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    /// Purchases a freshly logged-in user starts with. They also become the
    /// user's initial picks, in this order
    #[serde(default)]
    pub starter_spending: Vec<SpendingSeed>,
    /// Score-change feed handed to a freshly logged-in user
    #[serde(default)]
    pub notifications: Vec<NotificationSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingSeed {
    pub category_id: String,
    pub company_id: String,
    pub amount: u64,
}

/// A score change, dated relative to login time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSeed {
    pub id: String,
    pub company_id: String,
    pub old_score: u8,
    pub new_score: u8,
    pub reason: String,
    pub days_ago: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_url: Option<String>,
}

impl Catalog {
    /// Load the catalog shipped with the library
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file on disk
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!("Loading catalog from {}", path.display());
        Self::from_json(&contents)
    }

    /// The catalog `config` points at, or the bundled one
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.curation.catalog_path {
            Some(path) => Self::load_from(path),
            None => Self::builtin(),
        }
    }

    /// Total number of companies across every category
    pub fn company_count(&self) -> usize {
        self.categories.iter().map(|c| c.companies.len()).sum()
    }

    /// Check the structural rules the store relies on
    pub fn validate(&self) -> Result<()> {
        let mut category_ids = HashSet::new();
        let mut company_ids = HashSet::new();

        for category in &self.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(Error::Catalog(format!(
                    "duplicate category id '{}'",
                    category.id
                )));
            }

            for company in &category.companies {
                if !company_ids.insert(company.id.as_str()) {
                    return Err(Error::Catalog(format!(
                        "duplicate company id '{}'",
                        company.id
                    )));
                }
                if company.category != category.id {
                    return Err(Error::Catalog(format!(
                        "company '{}' claims category '{}' but is listed under '{}'",
                        company.id, company.category, category.id
                    )));
                }
                if company.score > 100 {
                    return Err(Error::Catalog(format!(
                        "company '{}' has score {} (max 100)",
                        company.id, company.score
                    )));
                }
            }
        }

        for seed in &self.starter_spending {
            let category = self
                .categories
                .iter()
                .find(|c| c.id == seed.category_id)
                .ok_or_else(|| {
                    Error::Catalog(format!(
                        "starter spending references unknown category '{}'",
                        seed.category_id
                    ))
                })?;

            if category.company(&seed.company_id).is_none() {
                return Err(Error::Catalog(format!(
                    "starter spending at '{}' is not a company of category '{}'",
                    seed.company_id, seed.category_id
                )));
            }
        }

        let mut notification_ids = HashSet::new();
        for notification in &self.notifications {
            if !notification_ids.insert(notification.id.as_str()) {
                return Err(Error::Catalog(format!(
                    "duplicate notification id '{}'",
                    notification.id
                )));
            }
            if !company_ids.contains(notification.company_id.as_str()) {
                return Err(Error::Catalog(format!(
                    "notification '{}' references unknown company '{}'",
                    notification.id, notification.company_id
                )));
            }
            if notification.old_score > 100 || notification.new_score > 100 {
                return Err(Error::Catalog(format!(
                    "notification '{}' has a score above 100",
                    notification.id
                )));
            }
            if notification.old_score == notification.new_score {
                return Err(Error::Catalog(format!(
                    "notification '{}' does not change the score",
                    notification.id
                )));
            }
        }

        Ok(())
    }
}
