//! iCalendar feed route.

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use furlough_core::export::CONTENT_TYPE;
use furlough_db::repositories::ExportRepository;

use super::path_location;
use crate::{ApiError, AppState};

/// Creates the calendar routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ics/{location}", get(location_feed))
}

/// GET `/ics/{location}` - Approved absences at a location as `.ics`.
///
/// Accepts the key with or without a trailing `.ics`.
async fn location_feed(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let key = location.strip_suffix(".ics").unwrap_or(&location);
    let location = path_location(key)?;

    let absences = ExportRepository::new((*state.db).clone())
        .approved_absences(location)
        .await?;
    let body = state.exporter.render(location, &absences);

    Ok((
        [
            (header::CONTENT_TYPE, CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{location}.ics\""),
            ),
        ],
        body,
    ))
}
