// src/ingest/fields.rs
//
// Exact, case-sensitive column names of the CRM CSV export. The export is
// a Close-style dump: built-in opportunity columns plus `custom.*` fields.

pub const ID: &str = "id";
pub const DISPLAY_NAME: &str = "display_name";
pub const STATUS: &str = "primary_opportunity_status_label";
pub const CURRENT_VALUE: &str = "primary_opportunity_value";
pub const AVG_OPPORTUNITY_VALUE: &str = "custom.Average_Opportunity_Value";

pub const STATE: &str = "custom.All_State";
pub const COUNTY: &str = "custom.All_County";
pub const STREET_ADDRESS: &str = "custom.Asset_Street_Address";
pub const APN: &str = "custom.Asset_APN";

pub const COST_BASIS: &str = "custom.Asset_Cost_Basis";
pub const INITIAL_LISTING_PRICE: &str = "custom.Asset_Initial_Listing_Price";
pub const SURVEYED_ACRES: &str = "custom.All_Asset_Surveyed_Acres";

pub const DATE_PURCHASED: &str = "custom.Asset_Date_Purchased";
pub const MLS_LISTING_DATE: &str = "custom.Asset_MLS_Listing_Date";

pub const OWNER: &str = "custom.Asset_Owner";
pub const LISTING_TYPE: &str = "custom.Asset_Listing_Type";
pub const LISTING_NUMBER: &str = "custom.Asset_Listing_Number";
pub const LAST_MAPPING_AUDIT: &str = "custom.Asset_Last_Mapping_Audit";

pub const MAPRIGHT_URL: &str = "custom.Asset_MapRight_URL";
pub const GIS_URL: &str = "custom.Asset_GIS_URL";
pub const PHOTOS_URL: &str = "custom.Asset_Photos_URL";
pub const LISTING_WEBSITE_URL: &str = "custom.Asset_Listing_Website_URL";

/// Key columns surfaced on the upload page's expected-format card.
pub const KEY_FIELDS: &[&str] = &[
    ID,
    DISPLAY_NAME,
    STATUS,
    CURRENT_VALUE,
    STATE,
    COUNTY,
    COST_BASIS,
    INITIAL_LISTING_PRICE,
    SURVEYED_ACRES,
    DATE_PURCHASED,
    MLS_LISTING_DATE,
    LISTING_TYPE,
];
