// src/crm/leads.rs
//
// Optional enrichment: ask the CRM how many active leads reference each
// parcel. One synchronous search per record, serially, with a fixed pause
// between calls; a failed lookup degrades that record only.

use crate::domain::record::PropertyRecord;
use crate::errors::ServerError;
use crate::store::Store;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Lead statuses that never count toward a parcel's active-lead tally.
pub const EXCLUDED_LEAD_STATUSES: &[&str] = &[
    "Dead",
    "Do Not Contact",
    "Duplicate",
    "Sold/Closed",
    "Unqualified",
];

/// Pause between per-record searches so a batch stays polite to the CRM.
const RECORD_PAUSE: Duration = Duration::from_millis(200);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStatus {
    Found,
    NoMatch,
    Error(String),
}

/// Result of one record's lead lookup, stored beside the derived metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadLookup {
    pub count: u32,
    pub status: LookupStatus,
}

#[derive(Debug, Deserialize)]
struct LeadSearchResponse {
    #[serde(default)]
    data: Vec<LeadSummary>,
}

#[derive(Debug, Deserialize)]
pub struct LeadSummary {
    pub status_label: Option<String>,
}

pub struct LeadClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl LeadClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServerError::CrmError(format!("Client build failed: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn search(&self, query: &str) -> Result<Vec<LeadSummary>, ServerError> {
        let response = self
            .client
            .get(format!("{}/api/v1/lead/", self.base_url))
            .query(&[("query", query)])
            .basic_auth(&self.api_key, Some(""))
            .send()
            .map_err(|e| ServerError::CrmError(format!("Lead search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ServerError::CrmError(format!(
                "Lead search returned {status}: {text}"
            )));
        }

        let body: LeadSearchResponse = response
            .json()
            .map_err(|e| ServerError::CrmError(format!("Malformed lead search response: {e}")))?;
        Ok(body.data)
    }

    /// Counts active, non-excluded leads referencing a parcel. The query
    /// phrasings are tried in sequence, one attempt each, and the first
    /// phrasing that returns any leads wins. Any request failure maps to
    /// an error status with a zero count for this record alone.
    pub fn count_active_leads(&self, record: &PropertyRecord) -> LeadLookup {
        for phrasing in query_phrasings(record) {
            match self.search(&phrasing) {
                Ok(leads) if !leads.is_empty() => {
                    return LeadLookup {
                        count: count_active(&leads),
                        status: LookupStatus::Found,
                    };
                }
                Ok(_) => continue,
                Err(e) => {
                    return LeadLookup {
                        count: 0,
                        status: LookupStatus::Error(e.to_string()),
                    };
                }
            }
        }

        LeadLookup {
            count: 0,
            status: LookupStatus::NoMatch,
        }
    }
}

/// Query phrasings in preference order: exact APN, exact display name,
/// bare APN. Records with no APN just have fewer phrasings.
fn query_phrasings(record: &PropertyRecord) -> Vec<String> {
    let mut phrasings = Vec::new();
    if let Some(apn) = record.apn.as_deref() {
        phrasings.push(format!("\"{apn}\""));
    }
    if !record.display_name.is_empty() {
        phrasings.push(format!("\"{}\"", record.display_name));
    }
    if let Some(apn) = record.apn.as_deref() {
        phrasings.push(apn.to_string());
    }
    phrasings
}

fn count_active(leads: &[LeadSummary]) -> u32 {
    leads
        .iter()
        .filter(|lead| match lead.status_label.as_deref() {
            Some(status) => !EXCLUDED_LEAD_STATUSES.contains(&status),
            None => true,
        })
        .count() as u32
}

#[derive(Debug, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub records: usize,
    pub found: usize,
    pub errors: usize,
}

/// Walks the stored portfolio serially, attaching a lead lookup to every
/// record. Failures never abort the batch.
pub fn enrich_portfolio(store: &Store, client: &LeadClient) -> Result<EnrichmentSummary, ServerError> {
    store.with_portfolio_mut(|portfolio| {
        let mut found = 0usize;
        let mut errors = 0usize;

        for (idx, prop) in portfolio.properties.iter_mut().enumerate() {
            if idx > 0 {
                std::thread::sleep(RECORD_PAUSE);
            }

            let lookup = client.count_active_leads(&prop.record);
            match &lookup.status {
                LookupStatus::Found => found += 1,
                LookupStatus::NoMatch => {}
                LookupStatus::Error(msg) => {
                    errors += 1;
                    eprintln!("Lead lookup failed for {}: {msg}", prop.record.id);
                }
            }
            prop.leads = Some(lookup);
        }

        let summary = EnrichmentSummary {
            records: portfolio.properties.len(),
            found,
            errors,
        };
        println!(
            "✅ Lead enrichment finished: {} records, {} with leads, {} errors",
            summary.records, summary.found, summary.errors
        );
        Ok(summary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries(labels: &[Option<&str>]) -> Vec<LeadSummary> {
        labels
            .iter()
            .map(|l| LeadSummary {
                status_label: l.map(str::to_string),
            })
            .collect()
    }

    #[test]
    fn lead_search_response_parses_crm_shape() {
        let body = r#"{
            "data": [
                {"status_label": "Interested", "id": "lead_1"},
                {"status_label": "Dead", "id": "lead_2"},
                {"id": "lead_3"}
            ],
            "has_more": false
        }"#;
        let parsed: LeadSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 3);
        assert_eq!(count_active(&parsed.data), 2);

        // A body with no data array still parses to an empty result.
        let empty: LeadSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.data.is_empty());
    }

    #[test]
    fn excluded_statuses_do_not_count() {
        let leads = summaries(&[
            Some("Interested"),
            Some("Dead"),
            Some("Do Not Contact"),
            Some("Duplicate"),
            Some("Sold/Closed"),
            Some("Unqualified"),
            Some("Negotiating"),
            None,
        ]);
        // Two live statuses plus the unlabeled lead.
        assert_eq!(count_active(&leads), 3);
    }

    #[test]
    fn phrasings_prefer_quoted_apn_then_name() {
        let mut record = PropertyRecord {
            id: "prop_1".to_string(),
            display_name: "Smith Ranch".to_string(),
            status: None,
            state: None,
            county: "Brewster".to_string(),
            listing_type_raw: None,
            cost_basis: None,
            asking_price: None,
            original_listing_price: None,
            surveyed_acres: None,
            date_purchased: None,
            mls_listing_date: None,
            apn: Some("123-45".to_string()),
            street_address: None,
            owner: None,
            listing_number: None,
            mapright_url: None,
            gis_url: None,
            photos_url: None,
            listing_website_url: None,
            last_mapping_audit: None,
            avg_opportunity_value: None,
        };

        assert_eq!(
            query_phrasings(&record),
            vec!["\"123-45\"", "\"Smith Ranch\"", "123-45"]
        );

        record.apn = None;
        assert_eq!(query_phrasings(&record), vec!["\"Smith Ranch\""]);
    }
}
