//! Device orientation events

use crossbeam_channel::Receiver;

use super::PlatformError;

/// One orientation event, angles in degrees.
///
/// `beta` is front/back tilt, `gamma` is left/right tilt. Either may be
/// missing on devices that only report part of the orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationReading {
    pub beta: Option<f32>,
    pub gamma: Option<f32>,
}

/// Live subscription to orientation events.
///
/// Dropping the subscription unsubscribes; `unsubscribe` does the same
/// explicitly.
pub struct SensorSubscription {
    receiver: Receiver<OrientationReading>,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl SensorSubscription {
    pub fn new(receiver: Receiver<OrientationReading>, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            receiver,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Drain pending events and return the most recent one
    pub fn latest(&self) -> Option<OrientationReading> {
        self.receiver.try_iter().last()
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for SensorSubscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

/// Permissioned orientation sensor
pub trait OrientationSensor {
    fn subscribe(&self) -> Result<SensorSubscription, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_latest_keeps_last_event() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sub = SensorSubscription::new(rx, || {});
        tx.send(OrientationReading { beta: Some(1.0), gamma: None }).unwrap();
        tx.send(OrientationReading { beta: Some(2.0), gamma: None }).unwrap();
        assert_eq!(sub.latest().unwrap().beta, Some(2.0));
        assert!(sub.latest().is_none());
    }

    #[test]
    fn test_cancel_runs_exactly_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let (_tx, rx) = crossbeam_channel::unbounded();
        let sub = SensorSubscription::new(rx, move || counter.set(counter.get() + 1));
        sub.unsubscribe();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_drop_cancels() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let (_tx, rx) = crossbeam_channel::unbounded();
        drop(SensorSubscription::new(rx, move || counter.set(counter.get() + 1)));
        assert_eq!(calls.get(), 1);
    }
}
