// src/domain/id_generator.rs
use crate::domain::error::{DomainError, DomainResult};
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out timestamp-derived ids (milliseconds since epoch).
///
/// Ids are strictly increasing per generator, so two entities created within
/// the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, guaranteed to be greater than `floor` and than every id handed out before.
    ///
    /// Fails once `floor` or the last id handed out is `i64::MAX`.
    pub fn next_above(&self, floor: i64) -> DomainResult<i64> {
        let exhausted = || DomainError::Other("id space exhausted".to_string());
        let now = Utc::now().timestamp_millis();
        let above_floor = floor.checked_add(1).ok_or_else(exhausted)?;
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let after_last = current.checked_add(1).ok_or_else(exhausted)?;
            let candidate = now.max(after_last).max(above_floor);
            match self.last.compare_exchange(
                current,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(candidate),
                Err(actual) => current = actual,
            }
        }
    }
}
