// src/tests/utils.rs

use crate::router::{handle, AppContext};
use crate::store::Store;
use astra::Body;
use std::io::Read;

/// A small but representative CRM export: three statuses, two states, one
/// secondary listing, one row with gaps, and one unknown status.
pub const SAMPLE_CSV: &str = "\
id,display_name,primary_opportunity_status_label,primary_opportunity_value,custom.All_State,custom.All_County,custom.Asset_Cost_Basis,custom.Asset_Initial_Listing_Price,custom.All_Asset_Surveyed_Acres,custom.Asset_Date_Purchased,custom.Asset_MLS_Listing_Date,custom.Asset_Listing_Type,custom.Asset_Owner
prop_1,Brewster 40ac,Listed,150000,TX,brewster,100000,180000,40,2023-04-01,2023-05-15,Primary,Highline Land LLC
prop_2,Park County 12ac,Purchased,89999,CO,Park,60000,95000,12,2023-01-10,,Primary,Highline Land LLC
prop_3,Brewster 40ac - MLS Split,Listed,75000,TX,brewster,50000,80000,20,2023-04-01,2023-06-01,Secondary MLS Listing,Highline Land LLC
prop_4,Mystery Tract,Under Contract,120001,AZ,,0,,,,,,
prop_5,Legacy Holding,Zzz-Migrated,50000,NM,Catron,20000,55000,8,2022-08-20,,Primary,Old Owner Trust
";

/// Context with an empty store and no CRM client, the shape the server
/// starts in.
pub fn make_ctx() -> AppContext {
    AppContext {
        store: Store::new(),
        lead_client: None,
    }
}

pub fn get(path: &str) -> astra::Request {
    http::Request::builder()
        .method(http::Method::GET)
        .uri(path)
        .body(Body::new(""))
        .expect("request build failed")
}

pub fn post(path: &str, body: &str) -> astra::Request {
    http::Request::builder()
        .method(http::Method::POST)
        .uri(path)
        .body(Body::new(body.to_string()))
        .expect("request build failed")
}

/// Uploads the sample CSV into the context's store, panicking on failure.
pub fn upload_sample(ctx: &AppContext) {
    let resp = handle(post("/upload", SAMPLE_CSV), ctx).expect("upload route failed");
    assert_eq!(resp.status(), 200, "sample upload should succeed");
}

pub fn body_bytes(resp: &mut astra::Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.body_mut()
        .reader()
        .read_to_end(&mut bytes)
        .expect("body read failed");
    bytes
}

pub fn body_string(resp: &mut astra::Response) -> String {
    String::from_utf8(body_bytes(resp)).expect("body was not utf-8")
}

pub fn content_type(resp: &astra::Response) -> String {
    resp.headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
