mod emails;
mod health_check;
mod track;

pub use emails::*;
pub use health_check::*;
pub use track::*;

use rocket::http::{ContentType, Status};
use rocket::Response;
use std::io::Cursor;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

// Client errors explain themselves, server errors stay opaque.
fn error_response(status: Status, message: String) -> rocket::response::Result<'static> {
    let body = if status.code >= 500 {
        "Something went wrong on our side.".to_string()
    } else {
        message
    };
    Response::build()
        .status(status)
        .header(ContentType::Plain)
        .sized_body(body.len(), Cursor::new(body))
        .ok()
}
