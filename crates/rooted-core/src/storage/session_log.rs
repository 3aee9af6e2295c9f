use super::kv::KvStore;
use crate::breathing::SessionRecord;
use crate::error::StorageError;

pub const SESSIONS_KEY: &str = "breathworkSessions";

/// Append-only log of completed breathing sessions, oldest first.
pub struct SessionLog<S> {
    store: S,
    limit: Option<usize>,
}

impl<S: KvStore> SessionLog<S> {
    pub fn new(store: S) -> Self {
        Self { store, limit: None }
    }

    /// Keep only the newest `limit` records on each append.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn list(&self) -> Result<Vec<SessionRecord>, StorageError> {
        self.store
            .get(SESSIONS_KEY)?
            .map_or_else(|| Ok(Vec::new()), |raw| decode(&raw))
    }

    /// Append a record and return the new log length.
    pub fn append(&self, record: SessionRecord) -> Result<usize, StorageError> {
        let mut record = Some(record);
        let mut count = 0;
        self.store.modify(SESSIONS_KEY, &mut |current| {
            let mut records = match current {
                Some(raw) => decode(&raw)?,
                None => Vec::new(),
            };
            records.extend(record.take());
            if let Some(limit) = self.limit {
                let excess = records.len().saturating_sub(limit);
                records.drain(..excess);
            }
            count = records.len();
            serde_json::to_string(&records).map_err(|e| StorageError::QueryFailed(e.to_string()))
        })?;
        tracing::debug!(count, "breathwork session logged");
        Ok(count)
    }
}

fn decode(raw: &str) -> Result<Vec<SessionRecord>, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Corrupt {
        key: SESSIONS_KEY.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn record(cycles: u32) -> SessionRecord {
        SessionRecord {
            technique: "Box Breathing".into(),
            duration: 4,
            cycles,
            completed_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn append_keeps_order() {
        let log = SessionLog::new(MemoryStore::new());
        assert!(log.list().unwrap().is_empty());
        log.append(record(1)).unwrap();
        assert_eq!(log.append(record(2)).unwrap(), 2);
        let cycles: Vec<_> = log.list().unwrap().iter().map(|r| r.cycles).collect();
        assert_eq!(cycles, vec![1, 2]);
    }

    #[test]
    fn limit_drops_oldest() {
        let log = SessionLog::new(MemoryStore::new()).with_limit(Some(2));
        for n in 1..=4 {
            log.append(record(n)).unwrap();
        }
        let cycles: Vec<_> = log.list().unwrap().iter().map(|r| r.cycles).collect();
        assert_eq!(cycles, vec![3, 4]);
    }

    #[test]
    fn unbounded_by_default() {
        let log = SessionLog::new(MemoryStore::new());
        for n in 0..50 {
            log.append(record(n)).unwrap();
        }
        assert_eq!(log.list().unwrap().len(), 50);
    }

    #[test]
    fn corrupt_log_is_an_error() {
        let kv = MemoryStore::new();
        kv.set(SESSIONS_KEY, r#"{"not":"an array"}"#).unwrap();
        let log = SessionLog::new(&kv);
        assert!(matches!(log.list(), Err(StorageError::Corrupt { .. })));
        assert!(log.append(record(1)).is_err());
    }
}
