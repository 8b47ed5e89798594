#![allow(clippy::unwrap_used, clippy::expect_used)]

use songlib_core::errors::{CatalogError, ExError, ExErrorKind};

#[test]
fn test_catalog_error_maps_to_kinds() {
    let cases = [
        (CatalogError::SongNotFound { song_id: 1 }, ExErrorKind::NotFound),
        (CatalogError::InvalidPage { page: 0 }, ExErrorKind::InvalidInput),
        (
            CatalogError::InvalidPerPage {
                per_page: 500,
                max: 100,
            },
            ExErrorKind::InvalidInput,
        ),
        (
            CatalogError::MissingRequiredFields {
                fields: "title".to_string(),
            },
            ExErrorKind::InvalidInput,
        ),
        (
            CatalogError::InvalidId {
                raw: "abc".to_string(),
            },
            ExErrorKind::InvalidInput,
        ),
    ];

    for (err, kind) in cases {
        let ex: ExError = err.clone().into();
        assert_eq!(ex.kind(), kind, "wrong kind for {:?}", err);
        assert_eq!(ex.message(), err.to_string());
    }
}

#[test]
fn test_not_found_carries_entity_id() {
    let ex: ExError = CatalogError::SongNotFound { song_id: 77 }.into();
    assert_eq!(ex.entity_id(), Some("77"));
    assert!(ex.to_string().contains("(entity_id: 77)"));
}

#[test]
fn test_every_kind_has_distinct_code() {
    let kinds = [
        ExErrorKind::Configuration,
        ExErrorKind::Connection,
        ExErrorKind::DirectoryRead,
        ExErrorKind::FileRead,
        ExErrorKind::QueryNotFound,
        ExErrorKind::Execution,
        ExErrorKind::Transaction,
        ExErrorKind::Cancelled,
        ExErrorKind::Timeout,
        ExErrorKind::InvalidInput,
        ExErrorKind::NotFound,
        ExErrorKind::Persistence,
        ExErrorKind::Serialization,
        ExErrorKind::ExternalService,
        ExErrorKind::Io,
        ExErrorKind::Internal,
    ];
    let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}

#[test]
fn test_serde_error_is_serialization() {
    let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::Serialization);
}
