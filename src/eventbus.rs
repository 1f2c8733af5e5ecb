use crate::event::InputEvent;
use std::collections::BTreeMap;

/// Trait for reacting to input events.
pub trait InputListener: Send {
    fn on_input(&mut self, event: &InputEvent);
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    AnalogOnly,
    ButtonsOnly,
    Custom(fn(&InputEvent) -> bool),
}

impl EventFilter {
    fn accepts(&self, event: &InputEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::AnalogOnly => event.kind.is_analog(),
            EventFilter::ButtonsOnly => event.kind.is_button(),
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Listener with its filter and enabled flag.
struct ListenerEntry {
    listener: Box<dyn InputListener>,
    enabled: bool,
    filter: EventFilter,
}

/// Fans events out to registered listeners, in registration order.
#[derive(Default)]
pub struct InputEventBus {
    next_id: u64,
    listeners: BTreeMap<u64, ListenerEntry>,
}

impl InputEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its id.
    pub fn add_listener(&mut self, listener: impl InputListener + 'static, filter: EventFilter) -> u64 {
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely.
    pub fn remove_listener(&mut self, id: u64) {
        self.listeners.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn emit(&mut self, event: &InputEvent) {
        for entry in self.listeners.values_mut() {
            if entry.enabled && entry.filter.accepts(event) {
                entry.listener.on_input(event);
            }
        }
    }

    /// Emits a batch of events to matching listeners.
    pub fn emit_all(&mut self, events: &[InputEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputKind;
    use crate::snapshot::{AnalogState, Button};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    #[derive(Clone, Default)]
    struct Collect(Arc<Mutex<Vec<InputKind>>>);

    impl Collect {
        fn kinds(&self) -> Vec<InputKind> {
            self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    impl InputListener for Collect {
        fn on_input(&mut self, event: &InputEvent) {
            self.0
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event.kind.clone());
        }
    }

    fn events() -> Vec<InputEvent> {
        let at = Instant::now();
        vec![
            InputEvent {
                at,
                kind: InputKind::ButtonPressed { button: Button::A },
            },
            InputEvent {
                at,
                kind: InputKind::AnalogChanged {
                    analog: AnalogState::default(),
                },
            },
        ]
    }

    #[test]
    fn test_filters_route_events() {
        let all = Collect::default();
        let buttons = Collect::default();
        let analog = Collect::default();

        let mut bus = InputEventBus::new();
        bus.add_listener(all.clone(), EventFilter::All);
        bus.add_listener(buttons.clone(), EventFilter::ButtonsOnly);
        bus.add_listener(analog.clone(), EventFilter::AnalogOnly);
        bus.emit_all(&events());

        assert_eq!(all.kinds().len(), 2);
        assert_eq!(
            buttons.kinds(),
            vec![InputKind::ButtonPressed { button: Button::A }]
        );
        assert_eq!(analog.kinds().len(), 1);
        assert!(analog.kinds()[0].is_analog());
    }

    #[test]
    fn test_disable_enable_remove() {
        let sink = Collect::default();
        let mut bus = InputEventBus::new();
        let id = bus.add_listener(sink.clone(), EventFilter::All);

        bus.disable(id);
        bus.emit_all(&events());
        assert!(sink.kinds().is_empty());

        bus.enable(id);
        bus.emit_all(&events());
        assert_eq!(sink.kinds().len(), 2);

        bus.remove_listener(id);
        assert!(bus.is_empty());
        bus.emit_all(&events());
        assert_eq!(sink.kinds().len(), 2);
    }

    #[test]
    fn test_custom_filter() {
        fn only_a(event: &InputEvent) -> bool {
            matches!(event.kind, InputKind::ButtonPressed { button: Button::A })
        }
        let sink = Collect::default();
        let mut bus = InputEventBus::new();
        bus.add_listener(sink.clone(), EventFilter::Custom(only_a));
        bus.emit_all(&events());
        assert_eq!(sink.kinds().len(), 1);
    }
}
