use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use songlib_core::model::page::{DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use songlib_core::{
    CatalogError, ExError, ExErrorKind, NewSong, PageRequest, SongFilter, SongUpdate,
};

use super::{blocking, number_or};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const CACHE_CONTROL_VALUE: &str = "public, max-age=300";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> Result<SongFilter, CatalogError> {
        let page = PageRequest::new(
            number_or(self.page.as_deref(), DEFAULT_PAGE),
            number_or(self.per_page.as_deref(), DEFAULT_PER_PAGE),
            MAX_PER_PAGE,
        )?;
        let year = self
            .year
            .as_deref()
            .and_then(|y| y.trim().parse::<i32>().ok())
            .filter(|y| *y != 0);

        Ok(SongFilter {
            title: self.title.unwrap_or_default(),
            artist: self.artist.unwrap_or_default(),
            album: self.album.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            year,
            page,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

impl IdParams {
    fn id(&self) -> Result<i64, CatalogError> {
        parse_id(self.id.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InfoParams {
    pub group: Option<String>,
    pub song: Option<String>,
}

pub(crate) fn parse_id(raw: Option<&str>) -> Result<i64, CatalogError> {
    let raw = raw.unwrap_or_default();
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CatalogError::InvalidId {
            raw: raw.to_string(),
        })
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError(
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("decode_body")
            .with_message(rejection.body_text()),
    )
}

/// `GET /api/songs`
pub async fn list_songs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Response> {
    let filter = params.into_filter()?;
    let songs = state.songs.clone();
    let page = blocking(move || songs.list(&filter)).await?;
    Ok((
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(page),
    )
        .into_response())
}

/// `POST /api/songs/create`
///
/// Enriches the song from the info endpoint before storing it. An info
/// failure stores nothing.
pub async fn create_song(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewSong>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(new_song) = payload.map_err(bad_body)?;
    new_song.validate()?;

    let detail = state.info.fetch(&new_song).await?;
    let songs = state.songs.clone();
    let id = blocking(move || songs.create(&new_song, &detail)).await?;
    info!(song_id = id, "song created");

    Ok((
        StatusCode::CREATED,
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(json!({ "id": id })),
    )
        .into_response())
}

/// `PUT /api/songs/update?id=`
pub async fn update_song(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdParams>,
    payload: Result<Json<SongUpdate>, JsonRejection>,
) -> ApiResult<Response> {
    let id = params.id()?;
    let Json(update) = payload.map_err(bad_body)?;
    let songs = state.songs.clone();
    let song = blocking(move || songs.update(id, &update)).await?;
    info!(song_id = id, "song updated");
    Ok(Json(song).into_response())
}

/// `DELETE /api/songs/delete?id=`
pub async fn delete_song(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdParams>,
) -> ApiResult<StatusCode> {
    let id = params.id()?;
    let songs = state.songs.clone();
    blocking(move || songs.delete(id)).await?;
    info!(song_id = id, "song deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/songs/info?group=&song=`
pub async fn song_info(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InfoParams>,
) -> ApiResult<Response> {
    let filter = SongFilter {
        title: params.song.unwrap_or_default(),
        artist: params.group.unwrap_or_default(),
        ..SongFilter::default()
    };
    let songs = state.songs.clone();
    let page = blocking(move || songs.list(&filter)).await?;
    Ok((
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(page),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let filter = ListParams::default().into_filter().unwrap();
        assert_eq!(filter.page, PageRequest::default());
        assert_eq!(filter.year, None);
        assert!(filter.title.is_empty());
    }

    #[test]
    fn test_list_params_reject_bad_paging() {
        let params = ListParams {
            per_page: Some("101".to_string()),
            ..ListParams::default()
        };
        assert!(matches!(
            params.into_filter(),
            Err(CatalogError::InvalidPerPage { per_page: 101, .. })
        ));

        let params = ListParams {
            page: Some("first".to_string()),
            ..ListParams::default()
        };
        assert!(matches!(
            params.into_filter(),
            Err(CatalogError::InvalidPage { page: 0 })
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some("12")), Ok(12));
        assert_eq!(
            parse_id(Some("x1")),
            Err(CatalogError::InvalidId {
                raw: "x1".to_string()
            })
        );
        assert!(parse_id(None).is_err());
    }
}
