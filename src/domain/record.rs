// src/domain/record.rs

use crate::crm::leads::LeadLookup;
use crate::domain::completeness::Completeness;
use chrono::NaiveDate;

/// Opportunity statuses with a fixed display priority. Anything the CRM
/// sends outside this list still flows through grouping and tables; it just
/// sorts after the known ones.
pub const STATUS_PRIORITY: [&str; 4] = ["Purchased", "Listed", "Under Contract", "Off Market"];

/// Group label for records with no status at all.
pub const NO_STATUS: &str = "(No Status)";

/// Sentinel used when the CRM export carries no county for a record.
pub const UNKNOWN_COUNTY: &str = "Unknown County";

/// Sentinel used when the CRM export carries no state for a record.
pub const UNKNOWN_STATE: &str = "Unknown";

/// Rank of a status within the fixed priority order, if it is a known one.
pub fn status_rank(status: &str) -> Option<usize> {
    STATUS_PRIORITY.iter().position(|s| *s == status)
}

/// Primary records are the asset itself; Secondary records are alternate
/// MLS/acreage listings of the same underlying asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingType {
    Primary,
    Secondary,
}

impl ListingType {
    /// The CRM field is free text ("Secondary MLS Listing", "Secondary -
    /// 10ac split", ...), so classification is a substring match. Missing
    /// values are Primary.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.to_lowercase().contains("secondary") => ListingType::Secondary,
            _ => ListingType::Primary,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingType::Primary => "Primary",
            ListingType::Secondary => "Secondary",
        }
    }
}

/// One row of the CRM export, normalized and typed, ready for derivation.
/// Every enrichable field is an `Option`: a structurally absent column and a
/// present-but-empty cell both land as `None`.
///
/// Numeric coercion rule: absent/empty cell -> `None`; present but
/// unparseable -> `Some(0.0)`, so arithmetic downstream never raises.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub id: String,
    pub display_name: String,

    pub status: Option<String>,
    pub state: Option<String>,
    /// Normalized at ingest: missing -> "Unknown County", otherwise
    /// title-cased.
    pub county: String,
    pub listing_type_raw: Option<String>,

    pub cost_basis: Option<f64>,
    pub asking_price: Option<f64>,
    pub original_listing_price: Option<f64>,
    pub surveyed_acres: Option<f64>,

    pub date_purchased: Option<NaiveDate>,
    pub mls_listing_date: Option<NaiveDate>,

    // Completeness-only metadata.
    pub apn: Option<String>,
    pub street_address: Option<String>,
    pub owner: Option<String>,
    pub listing_number: Option<String>,
    pub mapright_url: Option<String>,
    pub gis_url: Option<String>,
    pub photos_url: Option<String>,
    pub listing_website_url: Option<String>,
    pub last_mapping_audit: Option<String>,
    pub avg_opportunity_value: Option<f64>,
}

impl PropertyRecord {
    pub fn listing_type(&self) -> ListingType {
        ListingType::from_raw(self.listing_type_raw.as_deref())
    }

    /// Status label used for grouping and display.
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or(NO_STATUS)
    }

    /// State label used for grouping and display.
    pub fn state_label(&self) -> &str {
        self.state.as_deref().unwrap_or(UNKNOWN_STATE)
    }
}

/// Metrics computed once per record immediately after ingest. Pure function
/// of the raw record and the processing instant; never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub price_reductions: u32,
    pub days_held: Option<i64>,
    pub current_margin: f64,
    pub current_margin_pct: f64,
    pub price_per_acre: f64,
    pub cost_basis_per_acre: f64,
    pub markup_percentage: f64,
    pub percent_of_initial_listing: f64,
    pub completeness: Completeness,
}

/// A record plus everything computed from it. The optional lead count comes
/// from the CRM enrichment pass and lives beside the derived metrics so
/// those stay a pure function of the raw row.
#[derive(Debug, Clone)]
pub struct AnalyzedProperty {
    pub record: PropertyRecord,
    pub derived: DerivedMetrics,
    pub leads: Option<LeadLookup>,
}
