//! Client for the song-info enrichment endpoint

use std::time::Duration;

use songlib_core::{ExError, ExErrorKind, NewSong, Result, SongDetail};
use tracing::debug;

pub const INFO_PATH: &str = "/api/songs/info";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches release date, lyrics and link for a `group`/`song` pair
#[derive(Debug, Clone)]
pub struct SongInfoClient {
    http: reqwest::Client,
    base_url: String,
}

impl SongInfoClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| external("build_info_client", e))?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch(&self, song: &NewSong) -> Result<SongDetail> {
        let url = format!("{}{}", self.base_url, INFO_PATH);
        debug!(url = %url, group = %song.group, song = %song.song, "fetching song info");

        let response = self
            .http
            .get(&url)
            .query(&[("group", song.group.as_str()), ("song", song.song.as_str())])
            .send()
            .await
            .map_err(|e| external("fetch_song_info", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExError::new(ExErrorKind::ExternalService)
                .with_op("fetch_song_info")
                .with_message(format!("song info returned {}", status)));
        }

        response
            .json::<SongDetail>()
            .await
            .map_err(|e| external("decode_song_info", e))
    }
}

fn external(op: &str, err: reqwest::Error) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op(op)
        .with_message(err.to_string())
}
