use crate::config::BrandingConfig;
use crate::models::Category;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Session-scoped display preferences for the curated view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurationProfile {
    /// Every category id exactly once, in display order
    pub category_order: Vec<String>,
    /// Missing entries count as visible
    pub category_visibility: HashMap<String, bool>,
    pub max_stores_per_category: usize,
}

impl CurationProfile {
    /// Fresh profile: fixture order, everything visible
    pub fn seeded(categories: &[Category], max_stores_per_category: usize) -> Self {
        Self {
            category_order: categories.iter().map(|c| c.id.clone()).collect(),
            category_visibility: categories.iter().map(|c| (c.id.clone(), true)).collect(),
            max_stores_per_category,
        }
    }

    pub fn is_visible(&self, category_id: &str) -> bool {
        self.category_visibility
            .get(category_id)
            .copied()
            .unwrap_or(true)
    }

    /// Position of a category in the display order
    pub fn position(&self, category_id: &str) -> Option<usize> {
        self.category_order.iter().position(|id| id == category_id)
    }
}

/// Who is using the app right now
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
    /// Purchases tracked for this user, oldest first
    #[serde(default)]
    pub spending: Vec<UserSpending>,
    /// Score changes for brands the user buys from, newest first
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl UserAccount {
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            is_guest: false,
            created_at: Utc::now(),
            spending: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn guest() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Guest".to_string(),
            email: String::new(),
            is_guest: true,
            created_at: Utc::now(),
            spending: Vec::new(),
            notifications: Vec::new(),
        }
    }
}

/// One purchase at a curated store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSpending {
    pub company_id: String,
    pub company_name: String,
    pub category_id: String,
    /// Whole dollars
    pub amount: u64,
    pub date: DateTime<Utc>,
}

/// Direction of a score change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// `None` when the score did not move
    pub fn between(old_score: u8, new_score: u8) -> Option<Self> {
        match new_score.cmp(&old_score) {
            std::cmp::Ordering::Greater => Some(Trend::Up),
            std::cmp::Ordering::Less => Some(Trend::Down),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
        }
    }
}

/// A score change worth telling the user about
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub company_id: String,
    pub company_name: String,
    pub old_score: u8,
    pub new_score: u8,
    pub trend: Trend,
    pub reason: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_url: Option<String>,
}

impl Notification {
    /// Signed score delta
    pub fn delta(&self) -> i16 {
        i16::from(self.new_score) - i16::from(self.old_score)
    }
}

/// Branding a user can apply on top of the default look
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhiteLabelSettings {
    pub app_name: String,
    /// `#rrggbb`
    pub color: String,
    pub mantra: String,
}

impl WhiteLabelSettings {
    /// Build validated settings
    pub fn new(app_name: String, color: String, mantra: String) -> Result<Self> {
        let settings = Self {
            app_name,
            color,
            mantra,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Non-empty app name and a `#rrggbb` color
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(Error::InvalidSetting("app name cannot be empty".into()));
        }
        if !is_hex_color(&self.color) {
            return Err(Error::InvalidSetting(format!(
                "color '{}' is not a #rrggbb value",
                self.color
            )));
        }
        Ok(())
    }
}

impl From<&BrandingConfig> for WhiteLabelSettings {
    fn from(branding: &BrandingConfig) -> Self {
        Self {
            app_name: branding.app_name.clone(),
            color: branding.color.clone(),
            mantra: branding.mantra.clone(),
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
