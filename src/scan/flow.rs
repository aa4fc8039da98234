use std::time::Instant;
use crate::{Error, Result};
use crate::storage::SqliteStore;
use super::{ScanBuffer, ScanLock};

/// How a scanning flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum FlowOutcome {
    /// The session holds codes and stays
    Kept { codes: usize },
    /// Nothing was ever saved, so the session was deleted
    Discarded,
}

/// One scanning flow: a session created up front, a buffer of pending
/// payloads, and the debounce lock in front of it.
pub struct ScanFlow<'a> {
    store: &'a SqliteStore,
    session_id: String,
    buffer: ScanBuffer,
    lock: ScanLock,
    atomic: bool,
}

impl<'a> ScanFlow<'a> {
    /// Start a flow. The session row is written immediately so the id is valid
    /// before any code is saved.
    pub fn begin(store: &'a SqliteStore, name: &str) -> Result<Self> {
        let session_id = store.create_session(name)?;
        Ok(Self {
            store,
            session_id,
            buffer: ScanBuffer::new(),
            lock: ScanLock::default(),
            atomic: false,
        })
    }

    pub fn with_lock(mut self, lock: ScanLock) -> Self {
        self.lock = lock;
        self
    }

    /// Save the whole buffer in one transaction instead of row by row
    pub fn with_atomic_saves(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn pending(&self) -> &[String] {
        self.buffer.items()
    }

    /// Handle a detection from the camera. Returns whether it was accepted.
    pub fn on_scanned(&mut self, text: &str, now: Instant) -> bool {
        if text.is_empty() || self.lock.is_locked(now) || self.buffer.contains(text) {
            return false;
        }
        self.lock.try_lock(now);
        self.buffer.add(text)
    }

    pub fn remove(&mut self, text: &str) -> bool {
        self.buffer.remove(text)
    }

    pub fn resume(&mut self) {
        self.lock.resume();
    }

    /// Persist the pending payloads and clear the buffer.
    ///
    /// Row-by-row saves keep whatever was written before a failure, and the
    /// buffer is left intact so the caller can report it. Calling `send`
    /// again after such a failure inserts those earlier rows a second time;
    /// use atomic saves when a retry must not duplicate codes.
    pub fn send(&mut self) -> Result<usize> {
        if self.buffer.is_empty() {
            return Err(Error::NothingScanned);
        }
        let saved = if self.atomic {
            self.store.save_qr_codes_atomic(&self.session_id, self.buffer.items())?
        } else {
            self.store.save_qr_codes(&self.session_id, self.buffer.items())?
        };
        self.buffer.clear();
        Ok(saved)
    }

    /// End the flow, deleting the session if it never received a code.
    pub fn finish(self) -> Result<FlowOutcome> {
        let codes = self.store.count_qr_codes(&self.session_id)?;
        if codes == 0 {
            tracing::info!("Discarding empty session {}", self.session_id);
            self.store.delete_session(&self.session_id)?;
            return Ok(FlowOutcome::Discarded);
        }
        Ok(FlowOutcome::Kept { codes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_scan_send_finish() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut flow = ScanFlow::begin(&store, "Escaneo 2024-01-01")
            .unwrap()
            .with_lock(ScanLock::new(Duration::ZERO));
        let t0 = Instant::now();

        assert!(flow.on_scanned("A", t0));
        assert!(flow.on_scanned("B", t0));
        assert!(!flow.on_scanned("A", t0));
        assert!(flow.on_scanned("C", t0));

        assert_eq!(flow.send().unwrap(), 3);
        assert!(flow.pending().is_empty());

        let session_id = flow.session_id().to_string();
        assert_eq!(flow.finish().unwrap(), FlowOutcome::Kept { codes: 3 });

        let texts: Vec<String> = store
            .get_qr_codes_by_session(&session_id)
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_lock_drops_detections_during_cooldown() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut flow = ScanFlow::begin(&store, "debounce").unwrap();
        let t0 = Instant::now();

        assert!(flow.on_scanned("A", t0));
        assert!(!flow.on_scanned("B", t0 + Duration::from_millis(100)));
        assert!(flow.on_scanned("B", t0 + Duration::from_millis(600)));
        assert_eq!(flow.pending().len(), 2);
    }

    #[test]
    fn test_rejected_duplicate_does_not_take_lock() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut flow = ScanFlow::begin(&store, "dup").unwrap();
        let t0 = Instant::now();

        flow.on_scanned("A", t0);
        let later = t0 + Duration::from_millis(600);
        assert!(!flow.on_scanned("A", later));
        assert!(flow.on_scanned("B", later));
    }

    #[test]
    fn test_session_exists_before_first_save() {
        let store = SqliteStore::open_in_memory().unwrap();
        let flow = ScanFlow::begin(&store, "early").unwrap();

        assert!(store.get_session(flow.session_id()).unwrap().is_some());
    }

    #[test]
    fn test_send_empty_buffer() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut flow = ScanFlow::begin(&store, "empty").unwrap();

        assert!(matches!(flow.send(), Err(Error::NothingScanned)));
    }

    #[test]
    fn test_abandoned_flow_discards_session() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut flow = ScanFlow::begin(&store, "abandoned").unwrap();
        flow.on_scanned("never sent", Instant::now());

        assert_eq!(flow.finish().unwrap(), FlowOutcome::Discarded);
        assert_eq!(store.count_sessions().unwrap(), 0);
    }

    #[test]
    fn test_failed_send_keeps_buffer() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut flow = ScanFlow::begin(&store, "retry")
            .unwrap()
            .with_lock(ScanLock::new(Duration::ZERO));
        let t0 = Instant::now();
        flow.on_scanned("A", t0);
        flow.on_scanned("bad", t0);
        store
            .conn()
            .execute_batch(
                "CREATE TRIGGER reject_bad BEFORE INSERT ON qr_codes
                 WHEN NEW.text = 'bad' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        assert!(flow.send().is_err());
        assert_eq!(flow.pending().len(), 2);
        assert_eq!(store.count_qr_codes(flow.session_id()).unwrap(), 1);

        // A retry re-inserts the row that already made it.
        assert!(flow.send().is_err());
        assert_eq!(store.count_qr_codes(flow.session_id()).unwrap(), 2);
    }

    #[test]
    fn test_removed_item_is_not_saved() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut flow = ScanFlow::begin(&store, "edit")
            .unwrap()
            .with_lock(ScanLock::new(Duration::ZERO))
            .with_atomic_saves(true);
        let t0 = Instant::now();
        flow.on_scanned("keep", t0);
        flow.on_scanned("oops", t0);

        assert!(flow.remove("oops"));
        assert_eq!(flow.send().unwrap(), 1);

        let codes = store.get_qr_codes_by_session(flow.session_id()).unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].text, "keep");
    }
}
