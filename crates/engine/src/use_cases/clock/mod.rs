//! Clock service.
//!
//! The single gateway to the RTC. The poller and every HTTP handler share
//! one [`ClockService`]; each bus transaction runs while holding its lock, so
//! transactions are totally ordered and never interleave on the bus.
//!
//! - Reading the current time
//! - Setting the time (validated before the lock is taken)

use std::sync::Arc;

use rtcbridge_domain::{DomainError, RtcTime, TimeFields};
use tokio::sync::Mutex;

use crate::infrastructure::ports::{RtcTransport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    #[error("Invalid time: {0}")]
    Validation(#[from] DomainError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Serialized access to the one clock device.
///
/// Lock acquisition is FIFO and unbounded. A hung bus hangs the caller
/// holding the lock and queues everyone behind it.
pub struct ClockService {
    transport: Arc<Mutex<Box<dyn RtcTransport>>>,
}

impl ClockService {
    pub fn new(transport: Box<dyn RtcTransport>) -> Self {
        Self {
            transport: Arc::new(Mutex::new(transport)),
        }
    }

    /// Read the clock.
    pub async fn get_time(&self) -> Result<RtcTime, ClockError> {
        let time = self.exclusive(|transport| transport.read_raw()).await?;
        Ok(time)
    }

    /// Validate `candidate` and write it to the clock.
    ///
    /// An invalid candidate never reaches the bus.
    pub async fn set_time(&self, candidate: TimeFields) -> Result<RtcTime, ClockError> {
        let time = candidate.validate()?;
        self.exclusive(move |transport| transport.write_raw(&time))
            .await?;
        tracing::info!(time = %time, "Clock set");
        Ok(time)
    }

    /// Run one bus transaction under the lock.
    ///
    /// The blocking call runs off the async workers. The owned guard moves
    /// into the blocking task and is dropped when it ends, whether the
    /// transaction succeeded, failed or panicked.
    async fn exclusive<T, F>(&self, op: F) -> Result<T, TransportError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn RtcTransport) -> Result<T, TransportError> + Send + 'static,
    {
        let mut guard = self.transport.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || op(guard.as_mut()))
            .await
            .map_err(TransportError::aborted)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{BusOp, MockRtcTransport};
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn fields(hour: u8, minute: u8, second: u8, day: u8, month: u8, year: u8) -> TimeFields {
        TimeFields {
            hour,
            minute,
            second,
            day,
            month,
            year,
        }
    }

    fn no_ack(op: BusOp) -> TransportError {
        TransportError::Bus {
            op,
            kind: ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            detail: "no ack".into(),
        }
    }

    #[tokio::test]
    async fn get_time_returns_transport_reading() {
        let expected = fields(12, 0, 1, 2, 3, 24).validate().unwrap();
        let mut transport = MockRtcTransport::new();
        transport
            .expect_read_raw()
            .times(1)
            .returning(move || Ok(expected));

        let service = ClockService::new(Box::new(transport));
        assert_eq!(service.get_time().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn get_time_surfaces_transport_error() {
        let mut transport = MockRtcTransport::new();
        transport
            .expect_read_raw()
            .times(1)
            .returning(|| Err(no_ack(BusOp::Read)));

        let service = ClockService::new(Box::new(transport));
        let err = service.get_time().await.unwrap_err();
        assert!(matches!(err, ClockError::Transport(e) if e.is_no_ack()));
    }

    #[tokio::test]
    async fn set_time_writes_validated_value() {
        let candidate = fields(23, 59, 58, 31, 12, 25);
        let expected = candidate.validate().unwrap();
        let mut transport = MockRtcTransport::new();
        transport
            .expect_write_raw()
            .withf(move |t| *t == expected)
            .times(1)
            .returning(|_| Ok(()));

        let service = ClockService::new(Box::new(transport));
        assert_eq!(service.set_time(candidate).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn set_time_rejects_invalid_without_touching_bus() {
        let mut transport = MockRtcTransport::new();
        transport.expect_write_raw().never();
        transport.expect_read_raw().never();

        let service = ClockService::new(Box::new(transport));
        for candidate in [
            fields(24, 0, 0, 1, 1, 0),
            fields(0, 60, 0, 1, 1, 0),
            fields(0, 0, 60, 1, 1, 0),
            fields(0, 0, 0, 0, 1, 0),
            fields(0, 0, 0, 32, 1, 0),
            fields(0, 0, 0, 1, 0, 0),
            fields(0, 0, 0, 1, 13, 0),
            fields(0, 0, 0, 1, 1, 100),
        ] {
            let err = service.set_time(candidate).await.unwrap_err();
            assert!(matches!(err, ClockError::Validation(_)), "{candidate:?}");
        }
    }

    #[tokio::test]
    async fn set_time_surfaces_write_failure() {
        let mut transport = MockRtcTransport::new();
        transport
            .expect_write_raw()
            .times(1)
            .returning(|_| Err(no_ack(BusOp::Write)));

        let service = ClockService::new(Box::new(transport));
        let err = service
            .set_time(fields(1, 2, 3, 4, 5, 6))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClockError::Transport(TransportError::Bus {
                op: BusOp::Write,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn lock_is_released_after_failure() {
        let sample = fields(1, 1, 1, 1, 1, 1).validate().unwrap();
        let mut transport = MockRtcTransport::new();
        let mut calls = 0;
        transport.expect_read_raw().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(no_ack(BusOp::Read))
            } else {
                Ok(sample)
            }
        });

        let service = ClockService::new(Box::new(transport));
        assert!(service.get_time().await.is_err());
        assert_eq!(service.get_time().await.unwrap(), sample);
    }

    #[tokio::test]
    async fn lock_is_released_after_panic() {
        struct PanicsOnce {
            panicked: bool,
        }

        impl RtcTransport for PanicsOnce {
            fn read_raw(&mut self) -> Result<RtcTime, TransportError> {
                if !self.panicked {
                    self.panicked = true;
                    panic!("bus driver blew up");
                }
                Ok(TimeFields {
                    hour: 0,
                    minute: 0,
                    second: 0,
                    day: 1,
                    month: 1,
                    year: 0,
                }
                .validate()
                .unwrap())
            }

            fn write_raw(&mut self, _time: &RtcTime) -> Result<(), TransportError> {
                Ok(())
            }
        }

        let service = ClockService::new(Box::new(PanicsOnce { panicked: false }));
        let err = service.get_time().await.unwrap_err();
        assert!(matches!(err, ClockError::Transport(TransportError::Aborted(_))));
        assert!(service.get_time().await.is_ok());
    }

    /// Counts any call that starts while another is still on the bus.
    struct InterleaveDetector {
        in_flight: Arc<AtomicBool>,
        torn: Arc<AtomicUsize>,
        calls: Arc<AtomicUsize>,
        sample: RtcTime,
    }

    impl InterleaveDetector {
        fn transaction(&self) {
            if self.in_flight.swap(true, Ordering::SeqCst) {
                self.torn.fetch_add(1, Ordering::SeqCst);
            }
            std::thread::sleep(Duration::from_millis(1));
            self.in_flight.store(false, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl RtcTransport for InterleaveDetector {
        fn read_raw(&mut self) -> Result<RtcTime, TransportError> {
            self.transaction();
            Ok(self.sample)
        }

        fn write_raw(&mut self, _time: &RtcTime) -> Result<(), TransportError> {
            self.transaction();
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_never_interleave() {
        let torn = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let detector = InterleaveDetector {
            in_flight: Arc::new(AtomicBool::new(false)),
            torn: torn.clone(),
            calls: calls.clone(),
            sample: fields(6, 30, 0, 15, 8, 24).validate().unwrap(),
        };
        let service = Arc::new(ClockService::new(Box::new(detector)));

        const CALLERS: usize = 64;
        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..CALLERS {
            let service = service.clone();
            tasks.spawn(async move {
                if i % 3 == 0 {
                    let minute = u8::try_from(i % 60).unwrap();
                    service.set_time(fields(10, minute, 0, 1, 1, 24)).await.map(|_| ())
                } else {
                    service.get_time().await.map(|_| ())
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap().unwrap();
        }

        assert_eq!(torn.load(Ordering::SeqCst), 0);
        assert_eq!(calls.load(Ordering::SeqCst), CALLERS);
    }
}
