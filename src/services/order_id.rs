use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Issues `<prefix><unix millis>` order ids, strictly increasing per generator.
pub struct OrderIdGenerator {
    prefix: String,
    last_issued: AtomicI64,
}

impl OrderIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last_issued: AtomicI64::new(0),
        }
    }

    pub fn next_id(&self) -> String {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    fn next_id_at(&self, now_millis: i64) -> String {
        // Bump past the last issued value when the clock stalls or steps back.
        let update = self
            .last_issued
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                Some(now_millis.max(last + 1))
            });
        let previous = match update {
            Ok(last) | Err(last) => last,
        };
        format!("{}{}", self.prefix, now_millis.max(previous + 1))
    }
}
