use crate::catalog::{Catalog, NotificationSeed, SpendingSeed};
use crate::config::Config;
use crate::models::{Category, Company};
use crate::profile::{
    CurationProfile, Notification, Trend, UserAccount, UserSpending, WhiteLabelSettings,
};
use crate::{Error, Result};
use chrono::Utc;
use std::collections::HashSet;

/// What `add_store` actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The company was already curated; nothing changed
    AlreadyPresent,
}

/// Single source of truth for curated picks and display preferences
///
/// Owned by whatever shell drives the session. Every mutation goes through
/// one of the methods below, which keep these invariants:
/// - curated ids belong to their category and never repeat
/// - a list only grows while it is below `max_stores_per_category`
/// - `category_order` is a permutation of the category ids
#[derive(Debug)]
pub struct CurationStore {
    categories: Vec<Category>,
    starter_spending: Vec<SpendingSeed>,
    notification_seeds: Vec<NotificationSeed>,
    new_store_spend: u64,
    profile: CurationProfile,
    account: Option<UserAccount>,
    white_label: WhiteLabelSettings,
    default_max_stores: usize,
    default_white_label: WhiteLabelSettings,
}

impl CurationStore {
    /// Build a store from a catalog, taking defaults from `config`
    pub fn new(catalog: Catalog, config: &Config) -> Result<Self> {
        catalog.validate()?;
        config.validate()?;

        let default_max_stores = config.curation.default_max_stores;
        let default_white_label = WhiteLabelSettings::from(&config.branding);
        let mut categories = catalog.categories;
        for category in &mut categories {
            category.user_stores.clear();
        }
        let profile = CurationProfile::seeded(&categories, default_max_stores);

        tracing::debug!(
            "Curation store ready with {} categories",
            categories.len()
        );

        Ok(Self {
            categories,
            starter_spending: catalog.starter_spending,
            notification_seeds: catalog.notifications,
            new_store_spend: config.curation.new_store_spend,
            profile,
            account: None,
            white_label: default_white_label.clone(),
            default_max_stores,
            default_white_label,
        })
    }

    /// Store over the bundled catalog with default settings
    pub fn with_builtin_catalog() -> Result<Self> {
        Self::new(Catalog::builtin()?, &Config::default())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Find a company anywhere in the catalog
    pub fn company(&self, company_id: &str) -> Option<&Company> {
        self.categories
            .iter()
            .flat_map(|c| c.companies.iter())
            .find(|c| c.id == company_id)
    }

    pub fn profile(&self) -> &CurationProfile {
        &self.profile
    }

    pub fn account(&self) -> Option<&UserAccount> {
        self.account.as_ref()
    }

    pub fn white_label(&self) -> &WhiteLabelSettings {
        &self.white_label
    }

    pub fn is_logged_in(&self) -> bool {
        self.account.as_ref().is_some_and(|a| !a.is_guest)
    }

    /// The logged-in user's purchases; empty without an account
    pub fn spending(&self) -> &[UserSpending] {
        self.account
            .as_ref()
            .map(|a| a.spending.as_slice())
            .unwrap_or_default()
    }

    /// The logged-in user's score-change feed, newest first
    pub fn notifications(&self) -> &[Notification] {
        self.account
            .as_ref()
            .map(|a| a.notifications.as_slice())
            .unwrap_or_default()
    }

    fn category_mut(&mut self, category_id: &str) -> Result<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| Error::NotFound(format!("category '{}'", category_id)))
    }

    /// Add a company to a category's curated list
    pub fn add_store(&mut self, category_id: &str, company_id: &str) -> Result<AddOutcome> {
        let limit = self.profile.max_stores_per_category;
        let category = self.category_mut(category_id)?;

        let Some(company_name) = category.company(company_id).map(|c| c.name.clone()) else {
            tracing::debug!(
                "Ignoring add of '{}': not a company of category '{}'",
                company_id,
                category_id
            );
            return Err(Error::NotFound(format!(
                "company '{}' in category '{}'",
                company_id, category_id
            )));
        };

        if category.has_store(company_id) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        if category.store_count() >= limit {
            tracing::warn!(
                "Category '{}' already has {} of {} stores",
                category_id,
                category.store_count(),
                limit
            );
            return Err(Error::LimitReached {
                category_id: category_id.to_string(),
                limit,
            });
        }

        category.user_stores.push(company_id.to_string());
        tracing::debug!("Added '{}' to category '{}'", company_id, category_id);
        self.record_purchase(category_id, company_id, company_name);
        Ok(AddOutcome::Added)
    }

    /// Track a new store as spending for a signed-in (non-guest) user
    fn record_purchase(&mut self, category_id: &str, company_id: &str, company_name: String) {
        let amount = self.new_store_spend;
        if let Some(account) = self.account.as_mut().filter(|a| !a.is_guest) {
            account.spending.push(UserSpending {
                company_id: company_id.to_string(),
                company_name,
                category_id: category_id.to_string(),
                amount,
                date: Utc::now(),
            });
            tracing::debug!("Recorded ${} at '{}' for {}", amount, company_id, account.name);
        }
    }

    /// Drop a company from a category's curated list
    ///
    /// Returns whether anything was removed. Removing a company that isn't
    /// curated is fine.
    pub fn remove_store(&mut self, category_id: &str, company_id: &str) -> Result<bool> {
        let category = self.category_mut(category_id)?;
        let before = category.user_stores.len();
        category.user_stores.retain(|id| id != company_id);
        let removed = category.user_stores.len() != before;

        if removed {
            tracing::debug!("Removed '{}' from category '{}'", company_id, category_id);
        }
        Ok(removed)
    }

    /// Replace the category display order
    ///
    /// `new_order` must contain every category id exactly once; otherwise
    /// the current order is kept.
    pub fn reorder_categories(&mut self, new_order: Vec<String>) -> Result<()> {
        if new_order.len() != self.categories.len() {
            return Err(Error::InvalidOrder(format!(
                "expected {} category ids, got {}",
                self.categories.len(),
                new_order.len()
            )));
        }

        let known: HashSet<&str> = self.categories.iter().map(|c| c.id.as_str()).collect();
        let mut seen = HashSet::with_capacity(new_order.len());
        for id in &new_order {
            if !known.contains(id.as_str()) {
                return Err(Error::InvalidOrder(format!("unknown category '{}'", id)));
            }
            if !seen.insert(id.as_str()) {
                return Err(Error::InvalidOrder(format!("category '{}' listed twice", id)));
            }
        }

        self.profile.category_order = new_order;
        tracing::debug!("Category order updated");
        Ok(())
    }

    /// Move the category at position `from` to position `to`
    ///
    /// This is what a drag-and-drop gesture boils down to.
    pub fn move_category(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.profile.category_order.len();
        if from >= len || to >= len {
            return Err(Error::InvalidOrder(format!(
                "move {} -> {} is outside 0..{}",
                from, to, len
            )));
        }

        let mut order = self.profile.category_order.clone();
        let id = order.remove(from);
        order.insert(to, id);
        self.reorder_categories(order)
    }

    /// Drop `active_id` onto the slot currently held by `over_id`
    pub fn move_category_before(&mut self, active_id: &str, over_id: &str) -> Result<()> {
        if active_id == over_id {
            return Ok(());
        }

        let from = self
            .profile
            .position(active_id)
            .ok_or_else(|| Error::NotFound(format!("category '{}'", active_id)))?;
        let to = self
            .profile
            .position(over_id)
            .ok_or_else(|| Error::NotFound(format!("category '{}'", over_id)))?;

        self.move_category(from, to)
    }

    /// Show or hide a category
    pub fn set_category_visibility(&mut self, category_id: &str, visible: bool) {
        self.profile
            .category_visibility
            .insert(category_id.to_string(), visible);
        tracing::debug!("Category '{}' visible: {}", category_id, visible);
    }

    /// Flip a category's visibility and return the new value
    pub fn toggle_category_visibility(&mut self, category_id: &str) -> bool {
        let visible = !self.profile.is_visible(category_id);
        self.set_category_visibility(category_id, visible);
        visible
    }

    /// Change the per-category limit
    ///
    /// Lists already longer than `n` are left alone; they just can't grow
    /// until enough entries are removed. See `over_limit_categories`.
    pub fn set_max_stores_per_category(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(Error::InvalidLimit(n));
        }

        self.profile.max_stores_per_category = n;

        let over = self.over_limit_categories();
        if !over.is_empty() {
            tracing::info!(
                "Limit lowered to {}; {} categories keep their longer lists",
                n,
                over.len()
            );
        }
        Ok(())
    }

    /// Categories whose curated list is longer than the current limit
    pub fn over_limit_categories(&self) -> Vec<&str> {
        let limit = self.profile.max_stores_per_category;
        self.categories
            .iter()
            .filter(|c| c.store_count() > limit)
            .map(|c| c.id.as_str())
            .collect()
    }

    /// Start a session for a named user
    ///
    /// Seeds the starter spending, turns it into initial picks through
    /// `add_store`, and hands over the score-change feed.
    pub fn login(&mut self, name: String, email: String) -> &UserAccount {
        tracing::info!("Starting session for {}", name);
        self.reset_session();

        let picks: Vec<(String, String)> = self
            .starter_spending
            .iter()
            .map(|seed| (seed.category_id.clone(), seed.company_id.clone()))
            .collect();

        // No account yet, so seeding picks doesn't double-count spending
        for (category_id, company_id) in picks {
            if let Err(e) = self.add_store(&category_id, &company_id) {
                tracing::warn!("Skipping starter pick '{}': {}", company_id, e);
            }
        }

        let now = Utc::now();
        let mut account = UserAccount::new(name, email);
        account.spending = self
            .starter_spending
            .iter()
            .filter_map(|seed| {
                let company = self.company(&seed.company_id)?;
                Some(UserSpending {
                    company_id: seed.company_id.clone(),
                    company_name: company.name.clone(),
                    category_id: seed.category_id.clone(),
                    amount: seed.amount,
                    date: now,
                })
            })
            .collect();
        account.notifications = self
            .notification_seeds
            .iter()
            .filter_map(|seed| {
                let company = self.company(&seed.company_id)?;
                let trend = Trend::between(seed.old_score, seed.new_score)?;
                Some(Notification {
                    id: seed.id.clone(),
                    company_id: seed.company_id.clone(),
                    company_name: company.name.clone(),
                    old_score: seed.old_score,
                    new_score: seed.new_score,
                    trend,
                    reason: seed.reason.clone(),
                    date: now - chrono::Duration::days(i64::from(seed.days_ago)),
                    news_url: seed.news_url.clone(),
                })
            })
            .collect();

        self.account.insert(account)
    }

    /// Browse without an account: default profile, nothing curated
    pub fn login_as_guest(&mut self) -> &UserAccount {
        self.reset_session();
        self.account.insert(UserAccount::guest())
    }

    /// End the session and throw away everything it changed
    pub fn logout(&mut self) {
        if let Some(account) = self.account.as_ref() {
            tracing::info!("Ending session for {}", account.name);
        }
        self.reset_session();
    }

    /// Apply new branding for the logged-in user
    pub fn set_white_label(&mut self, settings: WhiteLabelSettings) -> Result<()> {
        if !self.is_logged_in() {
            return Err(Error::NotLoggedIn);
        }
        settings.validate()?;
        self.white_label = settings;
        Ok(())
    }

    fn reset_session(&mut self) {
        self.account = None;
        for category in &mut self.categories {
            category.user_stores.clear();
        }
        self.profile = CurationProfile::seeded(&self.categories, self.default_max_stores);
        self.white_label = self.default_white_label.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyStatus, PoliticalInfo};

    fn company(id: &str, category: &str, score: u8) -> Company {
        Company {
            id: id.to_string(),
            name: format!("Company {}", id),
            description: String::new(),
            category: category.to_string(),
            score,
            status: CompanyStatus::Neutral,
            website: None,
            political_lean: None,
            political_info: PoliticalInfo::default(),
        }
    }

    fn test_store() -> CurationStore {
        let catalog = Catalog {
            categories: vec![
                Category {
                    id: "1".to_string(),
                    name: "Grocery".to_string(),
                    icon: "🛒".to_string(),
                    companies: vec![
                        company("x", "1", 80),
                        company("y", "1", 70),
                        company("z", "1", 60),
                        company("w", "1", 50),
                    ],
                    user_stores: vec![],
                },
                Category {
                    id: "2".to_string(),
                    name: "Hardware".to_string(),
                    icon: "🔨".to_string(),
                    companies: vec![company("h", "2", 40)],
                    user_stores: vec![],
                },
                Category {
                    id: "3".to_string(),
                    name: "Clothes".to_string(),
                    icon: "👕".to_string(),
                    companies: vec![],
                    user_stores: vec![],
                },
            ],
            starter_spending: vec![SpendingSeed {
                category_id: "1".to_string(),
                company_id: "x".to_string(),
                amount: 40,
            }],
            notifications: vec![NotificationSeed {
                id: "n1".to_string(),
                company_id: "y".to_string(),
                old_score: 64,
                new_score: 70,
                reason: "New labor agreement".to_string(),
                days_ago: 3,
                news_url: None,
            }],
        };
        CurationStore::new(catalog, &Config::default()).unwrap()
    }

    fn stores(store: &CurationStore, category_id: &str) -> Vec<String> {
        store.category(category_id).unwrap().user_stores.clone()
    }

    #[test]
    fn test_add_store_appends() {
        let mut store = test_store();
        assert_eq!(store.add_store("1", "y").unwrap(), AddOutcome::Added);
        assert_eq!(store.add_store("1", "x").unwrap(), AddOutcome::Added);
        assert_eq!(stores(&store, "1"), vec!["y", "x"]);
    }

    #[test]
    fn test_add_store_is_idempotent() {
        let mut store = test_store();
        store.add_store("1", "x").unwrap();
        assert_eq!(store.add_store("1", "x").unwrap(), AddOutcome::AlreadyPresent);
        assert_eq!(stores(&store, "1"), vec!["x"]);
    }

    #[test]
    fn test_limit_reached_leaves_list_unchanged() {
        let mut store = test_store();
        for id in ["x", "y", "z"] {
            store.add_store("1", id).unwrap();
        }

        let err = store.add_store("1", "w").unwrap_err();
        assert!(matches!(err, Error::LimitReached { limit: 3, .. }));
        assert_eq!(stores(&store, "1"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_already_present_wins_over_limit() {
        let mut store = test_store();
        for id in ["x", "y", "z"] {
            store.add_store("1", id).unwrap();
        }
        assert_eq!(store.add_store("1", "y").unwrap(), AddOutcome::AlreadyPresent);
    }

    #[test]
    fn test_add_rejects_stale_and_foreign_ids() {
        let mut store = test_store();
        assert!(matches!(store.add_store("9", "x"), Err(Error::NotFound(_))));
        assert!(matches!(store.add_store("1", "nope"), Err(Error::NotFound(_))));
        // "h" exists, but in another category
        assert!(matches!(store.add_store("1", "h"), Err(Error::NotFound(_))));
        assert!(stores(&store, "1").is_empty());
    }

    #[test]
    fn test_remove_store() {
        let mut store = test_store();
        store.add_store("1", "x").unwrap();
        store.add_store("1", "y").unwrap();

        assert!(store.remove_store("1", "x").unwrap());
        assert_eq!(stores(&store, "1"), vec!["y"]);
        assert!(!store.remove_store("1", "x").unwrap());
        assert!(matches!(store.remove_store("9", "x"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_remove_then_add_restores_membership() {
        let mut store = test_store();
        store.add_store("1", "x").unwrap();
        store.add_store("1", "y").unwrap();

        store.remove_store("1", "x").unwrap();
        store.add_store("1", "x").unwrap();

        let mut members = stores(&store, "1");
        members.sort();
        assert_eq!(members, vec!["x", "y"]);
    }

    #[test]
    fn test_reorder_identity_is_noop() {
        let mut store = test_store();
        let before = store.profile().clone();
        store
            .reorder_categories(before.category_order.clone())
            .unwrap();
        assert_eq!(store.profile(), &before);
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let mut store = test_store();
        let before = store.profile().category_order.clone();

        let bad_orders = vec![
            vec!["1".to_string(), "2".to_string()],
            vec!["1".to_string(), "2".to_string(), "2".to_string()],
            vec!["1".to_string(), "2".to_string(), "9".to_string()],
            vec!["1".to_string(), "2".to_string(), "3".to_string(), "3".to_string()],
        ];
        for order in bad_orders {
            assert!(matches!(
                store.reorder_categories(order),
                Err(Error::InvalidOrder(_))
            ));
            assert_eq!(store.profile().category_order, before);
        }
    }

    #[test]
    fn test_move_category() {
        let mut store = test_store();
        store.move_category(2, 0).unwrap();
        assert_eq!(store.profile().category_order, vec!["3", "1", "2"]);

        store.move_category(0, 2).unwrap();
        assert_eq!(store.profile().category_order, vec!["1", "2", "3"]);

        assert!(matches!(store.move_category(0, 3), Err(Error::InvalidOrder(_))));
    }

    #[test]
    fn test_move_category_before() {
        let mut store = test_store();
        store.move_category_before("1", "3").unwrap();
        assert_eq!(store.profile().category_order, vec!["2", "3", "1"]);

        store.move_category_before("2", "2").unwrap();
        assert_eq!(store.profile().category_order, vec!["2", "3", "1"]);

        assert!(matches!(
            store.move_category_before("9", "1"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_visibility() {
        let mut store = test_store();
        assert!(store.profile().is_visible("2"));

        store.set_category_visibility("2", false);
        assert!(!store.profile().is_visible("2"));

        assert!(store.toggle_category_visibility("2"));
        assert!(!store.toggle_category_visibility("2"));
        // unknown ids are accepted and simply recorded
        store.set_category_visibility("99", false);
        assert!(!store.profile().is_visible("99"));
    }

    #[test]
    fn test_lowering_limit_keeps_existing_picks() {
        let mut store = test_store();
        for id in ["x", "y", "z"] {
            store.add_store("1", id).unwrap();
        }

        store.set_max_stores_per_category(1).unwrap();
        assert_eq!(stores(&store, "1"), vec!["x", "y", "z"]);
        assert_eq!(store.over_limit_categories(), vec!["1"]);
        assert!(matches!(
            store.add_store("1", "w"),
            Err(Error::LimitReached { limit: 1, .. })
        ));

        store.remove_store("1", "x").unwrap();
        store.remove_store("1", "y").unwrap();
        assert!(store.over_limit_categories().is_empty());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut store = test_store();
        assert!(matches!(
            store.set_max_stores_per_category(0),
            Err(Error::InvalidLimit(0))
        ));
        assert_eq!(store.profile().max_stores_per_category, 3);
    }

    #[test]
    fn test_raising_limit_allows_more() {
        let mut store = test_store();
        store.set_max_stores_per_category(4).unwrap();
        for id in ["x", "y", "z", "w"] {
            store.add_store("1", id).unwrap();
        }
        assert_eq!(stores(&store, "1").len(), 4);
    }

    #[test]
    fn test_login_seeds_starter_picks_and_logout_resets() {
        let mut store = test_store();
        store.move_category(0, 2).unwrap();

        let account = store.login("Ada".to_string(), "ada@example.com".to_string());
        assert_eq!(account.name, "Ada");
        assert!(store.is_logged_in());
        assert_eq!(stores(&store, "1"), vec!["x"]);
        assert_eq!(store.profile().category_order, vec!["1", "2", "3"]);

        store.set_category_visibility("2", false);
        store.set_max_stores_per_category(5).unwrap();
        store.logout();

        assert!(store.account().is_none());
        assert!(stores(&store, "1").is_empty());
        assert!(store.profile().is_visible("2"));
        assert_eq!(store.profile().max_stores_per_category, 3);
    }

    #[test]
    fn test_login_seeds_spending_and_feed() {
        let mut store = test_store();
        assert!(store.spending().is_empty());
        assert!(store.notifications().is_empty());

        store.login("Ada".to_string(), "ada@example.com".to_string());
        let spending = store.spending();
        assert_eq!(spending.len(), 1);
        assert_eq!(spending[0].company_name, "Company x");
        assert_eq!(spending[0].amount, 40);

        let feed = store.notifications();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].company_name, "Company y");
        assert_eq!(feed[0].trend, Trend::Up);
        assert!(feed[0].date < Utc::now() - chrono::Duration::days(2));

        store.logout();
        assert!(store.spending().is_empty());
    }

    #[test]
    fn test_adding_a_store_records_spending() {
        let mut store = test_store();
        store.login("Ada".to_string(), "ada@example.com".to_string());

        assert_eq!(store.add_store("1", "y").unwrap(), AddOutcome::Added);
        let last = store.spending().last().unwrap();
        assert_eq!(last.company_id, "y");
        assert_eq!(last.category_id, "1");
        assert_eq!(last.amount, 100);
        assert_eq!(store.spending().len(), 2);

        // Only real additions count
        store.add_store("1", "y").unwrap();
        store.add_store("1", "z").unwrap();
        assert!(store.add_store("1", "w").is_err());
        assert_eq!(store.spending().len(), 3);
    }

    #[test]
    fn test_no_spending_without_an_account() {
        let mut store = test_store();
        store.add_store("1", "x").unwrap();
        assert!(store.spending().is_empty());

        store.login_as_guest();
        store.add_store("1", "y").unwrap();
        assert!(store.account().unwrap().spending.is_empty());
    }

    #[test]
    fn test_guest_session() {
        let mut store = test_store();
        let guest = store.login_as_guest();
        assert!(guest.is_guest);
        assert!(!store.is_logged_in());
        assert!(stores(&store, "1").is_empty());
    }

    #[test]
    fn test_white_label_requires_login() {
        let mut store = test_store();
        let settings =
            WhiteLabelSettings::new("Mine".into(), "#3b82f6".into(), "Hi".into()).unwrap();

        assert!(matches!(
            store.set_white_label(settings.clone()),
            Err(Error::NotLoggedIn)
        ));

        store.login("Ada".into(), "ada@example.com".into());
        store.set_white_label(settings.clone()).unwrap();
        assert_eq!(store.white_label(), &settings);

        store.logout();
        assert_eq!(store.white_label().app_name, "VoteWallet");
    }

    #[test]
    fn test_white_label_rejects_unvalidated_settings() {
        let mut store = test_store();
        store.login("Ada".into(), "ada@example.com".into());

        let settings = WhiteLabelSettings {
            app_name: String::new(),
            color: "banana".into(),
            mantra: String::new(),
        };
        assert!(matches!(
            store.set_white_label(settings),
            Err(Error::InvalidSetting(_))
        ));
        assert_eq!(store.white_label().color, "#14b8a6");
    }

    #[test]
    fn test_store_is_debug_printable() {
        let store = test_store();
        let debug = format!("{:?}", store);
        assert!(debug.starts_with("CurationStore"));
        assert!(debug.contains("Grocery"));
    }

    #[test]
    fn test_company_lookup_across_categories() {
        let store = test_store();
        assert_eq!(store.company("h").unwrap().category, "2");
        assert!(store.company("nope").is_none());
    }
}
