//! Mock implementations for testing without a terminal or host clock
//!
//! Mocks share their state through `Arc<RwLock<_>>` so a test can keep a
//! handle after moving the mock into the component under test.
//!
//! # Usage
//!
//! ```
//! use nexus_hal::mock::MockCueSink;
//! use nexus_hal::{Cue, CueSink};
//!
//! let sink = MockCueSink::new();
//! let mut boxed: Box<dyn CueSink> = Box::new(sink.clone());
//! boxed.play(Cue::Click);
//! assert_eq!(sink.count(Cue::Click), 1);
//! ```

use crate::{Clock, Cue, CueSink, WallTime};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::sync::{Arc, RwLock};

/// Records every cue it receives
#[derive(Debug, Clone, Default)]
pub struct MockCueSink {
    played: Arc<RwLock<Vec<Cue>>>,
}

impl MockCueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All cues in the order they were played
    pub fn cues(&self) -> Vec<Cue> {
        self.played.read().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.played
            .read()
            .map(|p| p.iter().filter(|c| **c == cue).count())
            .unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut played) = self.played.write() {
            played.clear();
        }
    }
}

impl CueSink for MockCueSink {
    fn play(&mut self, cue: Cue) {
        if let Ok(mut played) = self.played.write() {
            played.push(cue);
        }
        tracing::debug!("[MOCK] Cue {}", cue.name());
    }
}

/// Clock frozen at a settable Unix time
#[derive(Debug, Clone)]
pub struct MockClock {
    secs: Arc<RwLock<i64>>,
    offset: FixedOffset,
}

impl MockClock {
    pub fn at(secs: i64) -> Self {
        Self {
            secs: Arc::new(RwLock::new(secs)),
            offset: Utc.fix(),
        }
    }

    /// Show the frozen time at a fixed offset
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn set(&self, secs: i64) {
        if let Ok(mut s) = self.secs.write() {
            *s = secs;
        }
    }

    pub fn advance(&self, secs: i64) {
        if let Ok(mut s) = self.secs.write() {
            *s += secs;
        }
    }
}

impl Default for MockClock {
    /// Mon, Oct 20 2025 12:00 UTC
    fn default() -> Self {
        Self::at(1_760_961_600)
    }
}

impl Clock for MockClock {
    fn now(&self) -> WallTime {
        let secs = self.secs.read().map(|s| *s).unwrap_or(0);
        WallTime::from_unix(secs, self.offset).unwrap_or_else(|| {
            WallTime::new(DateTime::<Utc>::default().with_timezone(&self.offset))
        })
    }
}
