//! Device event bus
//!
//! The controller publishes everything observable (cues, transitions,
//! battery changes) here. Subscribers run synchronously, in registration
//! order, on the controller's thread.

use crate::state::{Notice, Overlays, PowerState};
use nexus_hal::{Cue, CueSink};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Cue(Cue),
    PowerChanged { from: PowerState, to: PowerState },
    BatteryChanged { level: u8 },
    ChargingChanged { charging: bool },
    Notice(Notice),
    /// Battery hit zero while powered on
    EmergencyShutdown,
    AppOpened(String),
    AppClosed(String),
    OverlaysChanged(Overlays),
    /// Key typed on the on-screen keyboard
    VirtualKey(String),
}

pub trait EventSubscriber {
    fn on_event(&mut self, event: &DeviceEvent);
}

impl<F> EventSubscriber for F
where
    F: FnMut(&DeviceEvent),
{
    fn on_event(&mut self, event: &DeviceEvent) {
        self(event)
    }
}

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn EventSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn EventSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn publish(&mut self, event: DeviceEvent) {
        tracing::trace!("Event: {:?}", event);
        for subscriber in &mut self.subscribers {
            subscriber.on_event(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Forwards cue events to a [`CueSink`]
pub struct CueSubscriber<S: CueSink> {
    sink: S,
}

impl<S: CueSink> CueSubscriber<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: CueSink> EventSubscriber for CueSubscriber<S> {
    fn on_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::Cue(cue) = event {
            self.sink.play(*cue);
        }
    }
}

/// Keeps a shared copy of every event, for tests and the launcher status line
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<RwLock<Vec<DeviceEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DeviceEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<DeviceEvent> {
        self.events
            .write()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DeviceEvent::Cue(cue) => Some(cue),
                _ => None,
            })
            .collect()
    }

    pub fn transitions(&self) -> Vec<(PowerState, PowerState)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DeviceEvent::PowerChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSubscriber for EventRecorder {
    fn on_event(&mut self, event: &DeviceEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_hal::mock::MockCueSink;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_fan_out_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(Box::new(move |_: &DeviceEvent| seen.borrow_mut().push(tag)));
        }
        bus.publish(DeviceEvent::EmergencyShutdown);

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_cue_subscriber_filters() {
        let sink = MockCueSink::new();
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(CueSubscriber::new(sink.clone())));

        bus.publish(DeviceEvent::Cue(Cue::Click));
        bus.publish(DeviceEvent::BatteryChanged { level: 10 });
        bus.publish(DeviceEvent::Cue(Cue::Unlock));

        assert_eq!(sink.cues(), vec![Cue::Click, Cue::Unlock]);
    }

    #[test]
    fn test_recorder() {
        let recorder = EventRecorder::new();
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(recorder.clone()));

        bus.publish(DeviceEvent::PowerChanged {
            from: PowerState::Home,
            to: PowerState::Off,
        });
        bus.publish(DeviceEvent::Cue(Cue::Click));

        assert_eq!(recorder.transitions(), vec![(PowerState::Home, PowerState::Off)]);
        assert_eq!(recorder.cues(), vec![Cue::Click]);
        assert_eq!(recorder.take().len(), 2);
        assert!(recorder.events().is_empty());
    }
}
