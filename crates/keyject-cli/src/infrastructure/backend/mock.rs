//! Recording mock backends for unit and integration tests.
//!
//! # Why mock backends?
//!
//! The real backends either stuff bytes into the controlling terminal
//! or press keys on the test machine through a uinput device — both
//! require privileges, alter live OS state, and cannot be observed
//! from test code. The mocks replace the OS calls with in-memory
//! recording: every byte or event is pushed into a `Mutex<Vec<...>>`
//! inside a shared [`SinkRecord`], so assertions can inspect exactly
//! what was delivered and in what order.
//!
//! # Fault injection
//!
//! `failing_after(n)` builds a sink that accepts `n` writes and then
//! returns a `BackendError::Write` for every further attempt. This is
//! how the lifecycle tests prove that a mid-stream failure aborts the
//! remaining characters while still closing the backend exactly once
//! (`SinkRecord::close_count`).

use std::io;
use std::sync::{Arc, Mutex};

use keyject_core::KeyEvent;

use crate::application::inject_text::{BackendError, KeyEventSink, RawByteSink};

/// Shared record of everything a mock sink received.
#[derive(Default)]
pub struct SinkRecord {
    /// Bytes delivered to a [`MockRawSink`], in order.
    pub bytes: Mutex<Vec<u8>>,
    /// Events delivered to a [`MockKeySink`], in order.
    pub events: Mutex<Vec<KeyEvent>>,
    /// How many times `close()` was invoked. The lifecycle contract
    /// requires exactly 1 after every run.
    pub close_count: Mutex<usize>,
}

/// Mock raw-byte backend.
pub struct MockRawSink {
    record: Arc<SinkRecord>,
    fail_after: Option<usize>,
}

impl MockRawSink {
    /// A sink that accepts everything.
    pub fn new() -> (Self, Arc<SinkRecord>) {
        Self::with_failure(None)
    }

    /// A sink that accepts `successes` bytes and then fails each write.
    pub fn failing_after(successes: usize) -> (Self, Arc<SinkRecord>) {
        Self::with_failure(Some(successes))
    }

    fn with_failure(fail_after: Option<usize>) -> (Self, Arc<SinkRecord>) {
        let record = Arc::new(SinkRecord::default());
        (
            Self {
                record: Arc::clone(&record),
                fail_after,
            },
            record,
        )
    }
}

impl RawByteSink for MockRawSink {
    fn inject_byte(&mut self, byte: u8) -> Result<(), BackendError> {
        let mut bytes = self.record.bytes.lock().unwrap();
        if self.fail_after.is_some_and(|limit| bytes.len() >= limit) {
            return Err(BackendError::Write(io::Error::other("injected write fault")));
        }
        bytes.push(byte);
        Ok(())
    }

    fn close(&mut self) -> Result<(), BackendError> {
        *self.record.close_count.lock().unwrap() += 1;
        Ok(())
    }
}

/// Mock key-event backend.
pub struct MockKeySink {
    record: Arc<SinkRecord>,
    fail_after: Option<usize>,
}

impl MockKeySink {
    /// A sink that accepts everything.
    pub fn new() -> (Self, Arc<SinkRecord>) {
        Self::with_failure(None)
    }

    /// A sink that accepts `successes` events and then fails each emit.
    pub fn failing_after(successes: usize) -> (Self, Arc<SinkRecord>) {
        Self::with_failure(Some(successes))
    }

    fn with_failure(fail_after: Option<usize>) -> (Self, Arc<SinkRecord>) {
        let record = Arc::new(SinkRecord::default());
        (
            Self {
                record: Arc::clone(&record),
                fail_after,
            },
            record,
        )
    }
}

impl KeyEventSink for MockKeySink {
    fn emit_event(&mut self, event: &KeyEvent) -> Result<(), BackendError> {
        let mut events = self.record.events.lock().unwrap();
        if self.fail_after.is_some_and(|limit| events.len() >= limit) {
            return Err(BackendError::Write(io::Error::other("injected write fault")));
        }
        events.push(*event);
        Ok(())
    }

    fn close(&mut self) -> Result<(), BackendError> {
        *self.record.close_count.lock().unwrap() += 1;
        Ok(())
    }
}
