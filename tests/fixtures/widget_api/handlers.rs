use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::{NewWidget, Page, Widget};

#[derive(Debug, Deserialize)]
pub struct Filter {
    /// Page size.
    pub limit: Option<u32>,
    pub status: Option<crate::models::Status>,
}

/// List widgets, newest first.
pub async fn list_widgets(
    State(db): State<Db>,
    Query(filter): Query<Filter>,
) -> Json<Page<Widget>> {
    todo!()
}

/// Create a widget.
pub async fn create_widget(
    State(db): State<Db>,
    Json(body): Json<NewWidget>,
) -> Result<(StatusCode, Json<Widget>), ApiError> {
    todo!()
}

/// Fetch one widget.
pub async fn get_widget(Path(widget_id): Path<u64>) -> Result<Json<Widget>, ApiError> {
    todo!()
}

/// Delete a widget.
pub async fn delete_widget(Path(widget_id): Path<u64>) -> StatusCode {
    todo!()
}

/// Export the catalogue.
pub async fn export() -> Json<Report> {
    todo!()
}
