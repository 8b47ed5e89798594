use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::page::PageRequest;
use crate::errors::CatalogError;

/// A song as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of a song's editable fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongUpdate {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl SongUpdate {
    /// Title and artist must be non-blank
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.artist.trim().is_empty() {
            missing.push("artist");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::MissingRequiredFields {
                fields: missing.join(", "),
            })
        }
    }
}

/// Create request: a song identified by group and title only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
    pub group: String,
    pub song: String,
}

impl NewSong {
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut missing = Vec::new();
        if self.group.trim().is_empty() {
            missing.push("group");
        }
        if self.song.trim().is_empty() {
            missing.push("song");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::MissingRequiredFields {
                fields: missing.join(", "),
            })
        }
    }
}

/// Enrichment payload returned by the song-info endpoint
///
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetail {
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Listing filter; empty strings and `None` mean "don't filter"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongFilter {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: Option<i32>,
    pub page: PageRequest,
}
