//! Request handlers

pub mod metrics;
pub mod songs;
pub mod verses;

use songlib_core::{ExError, ExErrorKind};

use crate::error::{ApiError, ApiResult};

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

/// Numeric query parameter; absent or blank means `default`
///
/// An unparseable value becomes 0 so range validation rejects it.
pub(crate) fn number_or(raw: Option<&str>, default: i64) -> i64 {
    match raw.map(str::trim) {
        None | Some("") => default,
        Some(value) => value.parse().unwrap_or(0),
    }
}

/// Run a repository call on the blocking pool
///
/// The repositories hold a `std::sync::Mutex` around a rusqlite connection,
/// so they must stay off the async workers.
pub(crate) async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> songlib_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f).await.map_err(|e| {
        ApiError(
            ExError::new(ExErrorKind::Internal)
                .with_op("spawn_blocking")
                .with_message(e.to_string()),
        )
    })?;
    result.map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_or() {
        assert_eq!(number_or(None, 10), 10);
        assert_eq!(number_or(Some(" "), 10), 10);
        assert_eq!(number_or(Some("25"), 10), 25);
        assert_eq!(number_or(Some("abc"), 10), 0);
    }

    #[tokio::test]
    async fn test_blocking_passes_values_and_errors_through() {
        let value = blocking(|| Ok(7)).await.unwrap();
        assert_eq!(value, 7);

        let err = blocking(|| -> songlib_core::Result<()> {
            Err(ExError::new(ExErrorKind::NotFound))
        })
        .await
        .unwrap_err();
        assert_eq!(err.0.kind(), ExErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_blocking_maps_panics_to_internal() {
        let err = blocking(|| -> songlib_core::Result<()> { panic!("repository panicked") })
            .await
            .unwrap_err();
        assert_eq!(err.0.kind(), ExErrorKind::Internal);
        assert_eq!(err.0.op(), Some("spawn_blocking"));
    }
}
