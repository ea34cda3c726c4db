pub mod checklist;
pub mod export_xlsx;
pub mod inventory;
pub mod pdf_table;

pub use checklist::checklist_pdf;
pub use export_xlsx::export_properties_xlsx;
pub use inventory::inventory_pdf;
