//! Last-login banner shown when a session starts.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use log::warn;

use crate::config::LAST_LOGIN_KEY;
use crate::utils::{KeyValueStore, format_login_time};

/// Build the banner and record `now` as the new last-login time.
///
/// Shows the stored time from the previous visit, or `now` on a first visit
/// (or when the stored value cannot be parsed). A failed write is logged and
/// otherwise ignored.
pub fn last_login_banner<Tz>(store: &dyn KeyValueStore, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let previous = store
        .get(LAST_LOGIN_KEY)
        .and_then(|stored| match DateTime::parse_from_rfc3339(&stored) {
            Ok(time) => Some(time.with_timezone(&now.timezone())),
            Err(err) => {
                warn!("ignoring stored login time {:?}: {}", stored, err);
                None
            }
        });

    if let Err(err) = store.set(LAST_LOGIN_KEY, &now.to_rfc3339()) {
        warn!("{}", err);
    }

    let shown = previous.unwrap_or(now);
    format!("Last login: {}", format_login_time(&shown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StorageError;
    use crate::utils::MemoryStore;
    use chrono::FixedOffset;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn test_first_visit_shows_now() {
        let store = MemoryStore::new();
        let now = offset().with_ymd_and_hms(2025, 6, 4, 22, 50, 34).unwrap();
        assert_eq!(last_login_banner(&store, now), "Last login: Wed Jun 4 22:50:34");
        assert!(store.get(LAST_LOGIN_KEY).is_some());
    }

    #[test]
    fn test_second_visit_shows_previous() {
        let store = MemoryStore::new();
        let first = offset().with_ymd_and_hms(2025, 6, 4, 22, 50, 34).unwrap();
        let second = offset().with_ymd_and_hms(2025, 6, 5, 8, 0, 0).unwrap();
        last_login_banner(&store, first);
        assert_eq!(last_login_banner(&store, second), "Last login: Wed Jun 4 22:50:34");
        assert_eq!(last_login_banner(&store, first), "Last login: Thu Jun 5 08:00:00");
    }

    #[test]
    fn test_stored_time_converted_to_local_offset() {
        let store = MemoryStore::new();
        store.set(LAST_LOGIN_KEY, "2025-06-04T20:50:34+00:00").unwrap();
        let now = offset().with_ymd_and_hms(2025, 6, 5, 8, 0, 0).unwrap();
        assert_eq!(last_login_banner(&store, now), "Last login: Wed Jun 4 22:50:34");
    }

    #[test]
    fn test_garbage_value_replaced() {
        let store = MemoryStore::new();
        store.set(LAST_LOGIN_KEY, "yesterday").unwrap();
        let now = offset().with_ymd_and_hms(2025, 6, 5, 8, 0, 0).unwrap();
        assert_eq!(last_login_banner(&store, now), "Last login: Thu Jun 5 08:00:00");
        assert_eq!(
            store.get(LAST_LOGIN_KEY),
            Some("2025-06-05T08:00:00+02:00".to_string())
        );
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_write_failure_still_shows_banner() {
        let now = offset().with_ymd_and_hms(2025, 6, 4, 22, 50, 34).unwrap();
        assert_eq!(
            last_login_banner(&ReadOnlyStore, now),
            "Last login: Wed Jun 4 22:50:34"
        );
    }
}
