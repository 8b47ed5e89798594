use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use songlib_core::model::VersePage;
use songlib_core::Verse;

use super::blocking;
use super::songs::parse_id;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct VerseParams {
    pub song_id: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

fn lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// `GET /api/verses?song_id=&page=&page_size=`
pub async fn list_verses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerseParams>,
) -> ApiResult<Json<Vec<Verse>>> {
    let song_id = parse_id(params.song_id.as_deref())?;
    let page = VersePage::lenient(
        lenient(params.page.as_deref()),
        lenient(params.page_size.as_deref()),
    );
    let repo = state.verses.clone();
    let verses = blocking(move || repo.for_song(song_id, page)).await?;
    Ok(Json(verses))
}
