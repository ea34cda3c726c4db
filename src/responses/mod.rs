pub mod errors;
pub mod html;
pub mod pdf;
pub mod xlsx;

pub use errors::{html_error_response, ResultResp};
pub use html::{html_response, text_response};
pub use pdf::pdf_response;
pub use xlsx::xlsx_response;
