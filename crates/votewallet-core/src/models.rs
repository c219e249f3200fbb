use serde::{Deserialize, Serialize};

/// A tracked brand - the thing users curate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Id of the owning category
    pub category: String,
    /// Impact score, 0-100. Computed upstream, never touched here
    pub score: u8,
    pub status: CompanyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub political_lean: Option<PoliticalLean>,
    pub political_info: PoliticalInfo,
}

/// Editorial recommendation for a company
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    Support,
    Neutral,
    Boycott,
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanyStatus::Support => write!(f, "Support"),
            CompanyStatus::Neutral => write!(f, "Neutral"),
            CompanyStatus::Boycott => write!(f, "Boycott"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PoliticalLean {
    Progressive,
    Neutral,
    Conservative,
}

impl std::fmt::Display for PoliticalLean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoliticalLean::Progressive => write!(f, "Progressive"),
            PoliticalLean::Neutral => write!(f, "Neutral"),
            PoliticalLean::Conservative => write!(f, "Conservative"),
        }
    }
}

/// Political data attached to a company
///
/// Each section is either missing entirely or fully populated, so there is
/// no way to end up with detail fields on an unavailable section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PoliticalInfo {
    pub donations: DonationsInfo,
    pub lobbying: LobbyingInfo,
    pub statements: StatementsInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DonationsInfo {
    #[default]
    Unavailable,
    Available {
        pac_name: String,
        /// Whole dollars
        total_donations: u64,
        /// ISO date (YYYY-MM-DD)
        last_donation_date: String,
        party_breakdown: Vec<PartyAmount>,
        top_recipients: Vec<Recipient>,
        source: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartyAmount {
    pub party: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipient {
    pub name: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LobbyingInfo {
    #[default]
    Unavailable,
    Available {
        #[serde(default)]
        total_spend: Option<u64>,
        #[serde(default)]
        last_filing_year: Option<u16>,
        #[serde(default)]
        top_issues: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatementsInfo {
    #[default]
    Unavailable,
    Available {
        #[serde(default)]
        tags: Vec<String>,
    },
}

impl DonationsInfo {
    pub fn is_available(&self) -> bool {
        matches!(self, DonationsInfo::Available { .. })
    }
}

impl LobbyingInfo {
    pub fn is_available(&self) -> bool {
        matches!(self, LobbyingInfo::Available { .. })
    }
}

impl StatementsInfo {
    pub fn is_available(&self) -> bool {
        matches!(self, StatementsInfo::Available { .. })
    }
}

/// A shopping domain grouping companies, plus the user's picks in it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Fixture order matters: it breaks score ties
    pub companies: Vec<Company>,
    /// Curated company ids in insertion order
    #[serde(default)]
    pub user_stores: Vec<String>,
}

impl Category {
    /// Look up a member company by id
    pub fn company(&self, company_id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == company_id)
    }

    pub fn has_store(&self, company_id: &str) -> bool {
        self.user_stores.iter().any(|id| id == company_id)
    }

    pub fn store_count(&self) -> usize {
        self.user_stores.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_section_has_no_fields() {
        let info: DonationsInfo = serde_json::from_str(r#"{"status":"unavailable"}"#).unwrap();
        assert_eq!(info, DonationsInfo::Unavailable);
        assert!(!info.is_available());
    }

    #[test]
    fn test_available_donations_parse() {
        let json = r#"{
            "status": "available",
            "pac_name": "Test PAC",
            "total_donations": 1000,
            "last_donation_date": "2024-01-01",
            "party_breakdown": [{"party": "Democratic", "amount": 600}],
            "top_recipients": [{"name": "Someone", "amount": 100}],
            "source": "mock"
        }"#;
        let info: DonationsInfo = serde_json::from_str(json).unwrap();
        match info {
            DonationsInfo::Available {
                pac_name,
                total_donations,
                party_breakdown,
                ..
            } => {
                assert_eq!(pac_name, "Test PAC");
                assert_eq!(total_donations, 1000);
                assert_eq!(party_breakdown[0].amount, 600);
            }
            DonationsInfo::Unavailable => panic!("expected available donations"),
        }
    }

    #[test]
    fn test_available_section_missing_fields_rejected() {
        // "available" without the detail fields is not representable
        let result: Result<DonationsInfo, _> = serde_json::from_str(r#"{"status":"available"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_section_defaults_are_unavailable() {
        let info = PoliticalInfo::default();
        assert!(!info.donations.is_available());
        assert!(!info.lobbying.is_available());
        assert!(!info.statements.is_available());

        let statements = StatementsInfo::Available { tags: vec![] };
        assert!(statements.is_available());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&CompanyStatus::Boycott).unwrap();
        assert_eq!(json, "\"boycott\"");
        assert_eq!(CompanyStatus::Support.to_string(), "Support");
    }

    #[test]
    fn test_category_store_helpers() {
        let category = Category {
            id: "1".to_string(),
            name: "Grocery".to_string(),
            icon: "🛒".to_string(),
            companies: vec![],
            user_stores: vec!["c1".to_string()],
        };
        assert!(category.has_store("c1"));
        assert!(!category.has_store("c2"));
        assert_eq!(category.store_count(), 1);
        assert!(category.company("c1").is_none());
    }
}
