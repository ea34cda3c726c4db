// src/domain/completeness.rs

use crate::domain::record::{PropertyRecord, UNKNOWN_COUNTY, UNKNOWN_STATE};

/// Result of the required-field check for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    /// Labels of the missing fields, in required-field table order.
    Missing(Vec<&'static str>),
}

impl Completeness {
    pub fn is_complete(&self) -> bool {
        matches!(self, Completeness::Complete)
    }

    pub fn missing(&self) -> &[&'static str] {
        match self {
            Completeness::Complete => &[],
            Completeness::Missing(labels) => labels,
        }
    }

    /// Display form: the literal "Complete", or the missing labels joined.
    pub fn label(&self) -> String {
        match self {
            Completeness::Complete => "Complete".to_string(),
            Completeness::Missing(labels) => format!("Missing: {}", labels.join(", ")),
        }
    }
}

struct RequiredField {
    label: &'static str,
    is_present: fn(&PropertyRecord) -> bool,
}

/// A text field counts as present when it is non-empty after trimming and
/// not a placeholder sentinel.
fn text_present(value: Option<&str>) -> bool {
    match value {
        Some(s) => {
            let s = s.trim();
            !s.is_empty() && s != UNKNOWN_STATE && s != UNKNOWN_COUNTY
        }
        None => false,
    }
}

/// The fixed, ordered required-field table. An absent CSV column lands as
/// `None` on the record, so it is indistinguishable from a present-but-empty
/// cell here; both count as missing.
///
/// Cost Basis alone also treats a numeric 0 as missing: a $0 cost basis is
/// never legitimate for an owned asset and means the field was never set.
const REQUIRED_FIELDS: &[RequiredField] = &[
    RequiredField {
        label: "APN",
        is_present: |r| text_present(r.apn.as_deref()),
    },
    RequiredField {
        label: "Surveyed Acres",
        is_present: |r| r.surveyed_acres.is_some(),
    },
    RequiredField {
        label: "County",
        is_present: |r| text_present(Some(r.county.as_str())),
    },
    RequiredField {
        label: "MapRight URL",
        is_present: |r| text_present(r.mapright_url.as_deref()),
    },
    RequiredField {
        label: "GIS URL",
        is_present: |r| text_present(r.gis_url.as_deref()),
    },
    RequiredField {
        label: "State",
        is_present: |r| text_present(r.state.as_deref()),
    },
    RequiredField {
        label: "Cost Basis",
        is_present: |r| matches!(r.cost_basis, Some(v) if v != 0.0),
    },
    RequiredField {
        label: "Date Purchased",
        is_present: |r| r.date_purchased.is_some(),
    },
    RequiredField {
        label: "Initial Listing Price",
        is_present: |r| r.original_listing_price.is_some(),
    },
    RequiredField {
        label: "Photos URL",
        is_present: |r| text_present(r.photos_url.as_deref()),
    },
    RequiredField {
        label: "Listing Website URL",
        is_present: |r| text_present(r.listing_website_url.as_deref()),
    },
    RequiredField {
        label: "Listing Number",
        is_present: |r| text_present(r.listing_number.as_deref()),
    },
    RequiredField {
        label: "MLS Listing Date",
        is_present: |r| r.mls_listing_date.is_some(),
    },
    RequiredField {
        label: "Street Address",
        is_present: |r| text_present(r.street_address.as_deref()),
    },
    RequiredField {
        label: "Last Mapping Audit",
        is_present: |r| text_present(r.last_mapping_audit.as_deref()),
    },
    RequiredField {
        label: "Owner",
        is_present: |r| text_present(r.owner.as_deref()),
    },
    RequiredField {
        label: "Listing Type",
        is_present: |r| text_present(r.listing_type_raw.as_deref()),
    },
    RequiredField {
        label: "Avg Opportunity Value",
        is_present: |r| r.avg_opportunity_value.is_some(),
    },
];

/// Checks a record against the required-field table.
pub fn check(record: &PropertyRecord) -> Completeness {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .filter(|f| !(f.is_present)(record))
        .map(|f| f.label)
        .collect();

    if missing.is_empty() {
        Completeness::Complete
    } else {
        Completeness::Missing(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn full_record() -> PropertyRecord {
        PropertyRecord {
            id: "prop_001".to_string(),
            display_name: "Smith Ranch 40ac".to_string(),
            status: Some("Listed".to_string()),
            state: Some("TX".to_string()),
            county: "Brewster".to_string(),
            listing_type_raw: Some("Primary".to_string()),
            cost_basis: Some(100_000.0),
            asking_price: Some(150_000.0),
            original_listing_price: Some(180_000.0),
            surveyed_acres: Some(40.0),
            date_purchased: NaiveDate::from_ymd_opt(2023, 4, 1),
            mls_listing_date: NaiveDate::from_ymd_opt(2023, 5, 15),
            apn: Some("123-456-789".to_string()),
            street_address: Some("TBD County Rd 12".to_string()),
            owner: Some("Highline Land LLC".to_string()),
            listing_number: Some("LN-0042".to_string()),
            mapright_url: Some("https://mapright.example/m/1".to_string()),
            gis_url: Some("https://gis.example/p/1".to_string()),
            photos_url: Some("https://photos.example/a/1".to_string()),
            listing_website_url: Some("https://listings.example/1".to_string()),
            last_mapping_audit: Some("2024-01-10".to_string()),
            avg_opportunity_value: Some(145_000.0),
        }
    }

    #[test]
    fn complete_record_is_complete() {
        assert_eq!(check(&full_record()), Completeness::Complete);
        assert_eq!(check(&full_record()).label(), "Complete");
    }

    #[test]
    fn missing_fields_are_listed_in_table_order() {
        let mut r = full_record();
        r.owner = None;
        r.apn = Some("  ".to_string());
        r.state = Some(UNKNOWN_STATE.to_string());

        match check(&r) {
            Completeness::Missing(labels) => {
                assert_eq!(labels, vec!["APN", "State", "Owner"]);
            }
            Completeness::Complete => panic!("expected missing fields"),
        }
    }

    #[test]
    fn zero_cost_basis_counts_as_missing() {
        let mut r = full_record();
        r.cost_basis = Some(0.0);
        assert_eq!(check(&r).missing(), ["Cost Basis"]);

        // Other numeric fields do not get the zero rule.
        let mut r = full_record();
        r.surveyed_acres = Some(0.0);
        r.avg_opportunity_value = Some(0.0);
        assert!(check(&r).is_complete());
    }

    #[test]
    fn sentinel_county_counts_as_missing() {
        let mut r = full_record();
        r.county = UNKNOWN_COUNTY.to_string();
        assert_eq!(check(&r).missing(), ["County"]);
    }

    #[test]
    fn unparseable_date_counts_as_missing() {
        let mut r = full_record();
        r.date_purchased = None;
        r.mls_listing_date = None;
        assert_eq!(check(&r).missing(), ["Date Purchased", "MLS Listing Date"]);
    }
}
