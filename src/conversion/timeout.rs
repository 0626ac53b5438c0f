//! Deadline wrapper around a conversion service
//!
//! Rate lookups may block on an external source. The wrapper runs the
//! lookup on a worker thread and gives up after the configured duration so
//! that a transfer fails instead of hanging while holding account locks.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{ConversionError, ConversionService};
use crate::models::{Amount, Currency};

pub struct TimeoutConverter<C> {
    inner: Arc<C>,
    timeout: Duration,
}

impl<C> TimeoutConverter<C>
where
    C: ConversionService + 'static,
{
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<C> ConversionService for TimeoutConverter<C>
where
    C: ConversionService + 'static,
{
    fn convert(
        &self,
        amount: Amount,
        from: Currency,
        to: Currency,
    ) -> Result<Amount, ConversionError> {
        if from == to {
            return Ok(amount);
        }

        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            // The receiver may already be gone after a timeout
            let _ = tx.send(inner.convert(amount, from, to));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(%from, %to, timeout = ?self.timeout, "currency conversion timed out");
                Err(ConversionError::Timeout {
                    from,
                    to,
                    after: self.timeout,
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ConversionError::Unavailable {
                from,
                to,
                reason: "conversion worker stopped".into(),
            }),
        }
    }
}
