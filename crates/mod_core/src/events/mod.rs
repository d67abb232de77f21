//! Event system for config notifications
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Queuing support (immediate + deferred delivery)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Config values were changed through the settings UI
    ConfigChanged,
    /// A config file was changed on disk
    ConfigFileChanged,
}

/// Variant for type-safe event arguments
/// Uses key-value pairs to avoid order dependency problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventArg {
    /// Id of the mod the event is about
    ModId(String),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            args: HashMap::new(),
        }
    }

    /// "Config changed" event for a mod
    pub fn config_changed(mod_id: impl Into<String>) -> Self {
        Self::new(EventType::ConfigChanged).with_arg("mod_id", EventArg::ModId(mod_id.into()))
    }

    /// "Config file changed" event for a mod
    pub fn config_file_changed(mod_id: impl Into<String>) -> Self {
        Self::new(EventType::ConfigFileChanged).with_arg("mod_id", EventArg::ModId(mod_id.into()))
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get mod_id argument if present
    pub fn get_mod_id(&self) -> Option<&str> {
        if let Some(EventArg::ModId(id)) = self.get_arg("mod_id") {
            Some(id)
        } else {
            None
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

impl<H: EventHandler> EventHandler for Rc<RefCell<H>> {
    fn on_event(&mut self, event: &Event) -> bool {
        self.borrow_mut().on_event(event)
    }
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
pub struct EventSystem {
    immediate_queue: Vec<Event>,
    deferred_queue: Vec<(f64, Event)>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
    current_time: f64,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            deferred_queue: Vec::new(),
            handlers: HashMap::new(),
            current_time: 0.0,
        }
    }

    /// Update current time (seconds since start)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Current time (seconds since start)
    pub const fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers
            .entry(event_type)
            .or_default()
            .push(handler);
    }

    /// Send event for handling on the next dispatch
    pub fn send(&mut self, event: Event) {
        self.immediate_queue.push(event);
    }

    /// Post event for deferred delivery at specified time
    ///
    /// Useful to let a burst of file writes settle before reloading.
    pub fn post(&mut self, delivery_time: f64, event: Event) {
        self.deferred_queue.push((delivery_time, event));
    }

    /// Deliver an event right away, bypassing the queues
    ///
    /// Returns true if a handler consumed it.
    pub fn fire(&mut self, event: &Event) -> bool {
        self.dispatch_event(event)
    }

    /// Dispatch all pending events
    /// Processes immediate queue first, then due deferred events.
    /// Returns the number of events that were consumed.
    pub fn dispatch(&mut self) -> usize {
        let mut consumed = 0;

        let immediate = std::mem::take(&mut self.immediate_queue);
        for event in immediate {
            if self.dispatch_event(&event) {
                consumed += 1;
            }
        }

        let mut i = 0;
        while i < self.deferred_queue.len() {
            if self.deferred_queue[i].0 <= self.current_time {
                let (_, event) = self.deferred_queue.remove(i);
                if self.dispatch_event(&event) {
                    consumed += 1;
                }
            } else {
                i += 1;
            }
        }

        consumed
    }

    /// Number of queued events (immediate and deferred)
    pub fn pending(&self) -> usize {
        self.immediate_queue.len() + self.deferred_queue.len()
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &Event) -> bool {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    return true;
                }
            }
        }
        false
    }

    /// Clear all queued events
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
        self.deferred_queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}
