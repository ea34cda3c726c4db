use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    let body = markup.into_string();

    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}

/// Plain-text reply, used by the upload and enrichment routes so the page
/// script can drop the body straight into an inline message element.
pub fn text_response(status: u16, message: &str) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Body::from(message.to_string()))
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}
