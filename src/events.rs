//! Event bus for host-side notification relay
//!
//! The bus is a plain value owned by the hosting process; there is no
//! process-wide registry. Handlers are capability objects with fixed
//! method signatures, one trait per handler kind, and are addressed by
//! the id returned at registration so they can be removed again.
//! Dispatch is synchronous and fans out in registration order.

use std::collections::HashMap;

/// Kinds of notifications the bus relays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PlayerJoined,
    PlayerParted,
    Chat,
    GameStart,
    GameEnd,
    Tick,
}

/// A relayed notification
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerJoined {
        player_id: i32,
        callsign: String,
        team: String,
    },
    PlayerParted {
        player_id: i32,
    },
    Chat {
        from: i32,
        message: String,
    },
    GameStart,
    GameEnd,
    Tick {
        elapsed: f64,
    },
}

impl GameEvent {
    /// The kind used to route this event to registered handlers
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::PlayerJoined { .. } => EventKind::PlayerJoined,
            GameEvent::PlayerParted { .. } => EventKind::PlayerParted,
            GameEvent::Chat { .. } => EventKind::Chat,
            GameEvent::GameStart => EventKind::GameStart,
            GameEvent::GameEnd => EventKind::GameEnd,
            GameEvent::Tick { .. } => EventKind::Tick,
        }
    }
}

/// Opaque handle identifying one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

// =============================================================================
// Capability Traits
// =============================================================================

/// Receives relayed notifications
pub trait EventHandler {
    fn handle_event(&mut self, event: &GameEvent);
}

/// Handles a registered slash command; returns true if handled
pub trait SlashCommandHandler {
    fn handle_command(&mut self, player_id: i32, command: &str, args: &str) -> bool;
}

/// Handles a registered poll type
pub trait PollTypeHandler {
    /// Called when a poll of this type is requested; returning false
    /// vetoes the poll.
    fn poll_open(&mut self, player_id: i32, action: &str, parameters: &str) -> bool;

    /// Called when the poll ends
    fn poll_close(&mut self, action: &str, parameters: &str, success: bool);
}

/// Handles a custom map object block; returns true if consumed
pub trait MapObjectHandler {
    fn handle_object(&mut self, object: &str, data: &[u8]) -> bool;
}

// =============================================================================
// Event Bus
// =============================================================================

/// Registry plus dispatcher, owned by the hosting process
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    events: HashMap<EventKind, Vec<(HandlerId, Box<dyn EventHandler>)>>,
    slash_commands: HashMap<String, Box<dyn SlashCommandHandler>>,
    poll_types: HashMap<String, Box<dyn PollTypeHandler>>,
    map_objects: HashMap<String, Box<dyn MapObjectHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind
    pub fn register(&mut self, kind: EventKind, handler: Box<dyn EventHandler>) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.events.entry(kind).or_default().push((id, handler));
        id
    }

    /// Remove a previous registration; returns false if unknown
    pub fn unregister(&mut self, kind: EventKind, id: HandlerId) -> bool {
        match self.events.get_mut(&kind) {
            Some(handlers) => {
                let before = handlers.len();
                handlers.retain(|(hid, _)| *hid != id);
                handlers.len() != before
            }
            None => false,
        }
    }

    /// Relay an event to every handler registered for its kind,
    /// in registration order
    pub fn dispatch(&mut self, event: &GameEvent) {
        if let Some(handlers) = self.events.get_mut(&event.kind()) {
            for (_, handler) in handlers.iter_mut() {
                handler.handle_event(event);
            }
        }
    }

    /// Number of handlers registered for a kind
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.events.get(&kind).map_or(0, |h| h.len())
    }

    // -------------------------------------------------------------------------
    // Slash Commands
    // -------------------------------------------------------------------------

    /// Register a slash command; replaces any previous handler for it
    pub fn register_slash_command(
        &mut self,
        command: impl Into<String>,
        handler: Box<dyn SlashCommandHandler>,
    ) {
        self.slash_commands
            .insert(command.into().to_lowercase(), handler);
    }

    /// Remove a slash command registration
    pub fn unregister_slash_command(&mut self, command: &str) -> bool {
        self.slash_commands
            .remove(&command.to_lowercase())
            .is_some()
    }

    /// Route a slash command to its handler.
    /// Returns `None` when no handler is registered for the command.
    pub fn dispatch_slash_command(
        &mut self,
        player_id: i32,
        command: &str,
        args: &str,
    ) -> Option<bool> {
        self.slash_commands
            .get_mut(&command.to_lowercase())
            .map(|h| h.handle_command(player_id, command, args))
    }

    // -------------------------------------------------------------------------
    // Poll Types
    // -------------------------------------------------------------------------

    /// Register a custom poll type; replaces any previous handler
    pub fn register_poll_type(
        &mut self,
        action: impl Into<String>,
        handler: Box<dyn PollTypeHandler>,
    ) {
        self.poll_types.insert(action.into().to_lowercase(), handler);
    }

    /// Remove a poll type registration
    pub fn unregister_poll_type(&mut self, action: &str) -> bool {
        self.poll_types.remove(&action.to_lowercase()).is_some()
    }

    /// Whether a poll type is registered
    pub fn is_poll_type(&self, action: &str) -> bool {
        self.poll_types.contains_key(&action.to_lowercase())
    }

    /// Ask the poll handler whether this poll may open.
    /// Returns `None` when the poll type is unknown.
    pub fn dispatch_poll_open(
        &mut self,
        player_id: i32,
        action: &str,
        parameters: &str,
    ) -> Option<bool> {
        self.poll_types
            .get_mut(&action.to_lowercase())
            .map(|h| h.poll_open(player_id, action, parameters))
    }

    /// Notify the poll handler that the poll closed
    pub fn dispatch_poll_close(&mut self, action: &str, parameters: &str, success: bool) {
        if let Some(handler) = self.poll_types.get_mut(&action.to_lowercase()) {
            handler.poll_close(action, parameters, success);
        }
    }

    // -------------------------------------------------------------------------
    // Map Objects
    // -------------------------------------------------------------------------

    /// Register a custom map object handler; replaces any previous one
    pub fn register_map_object(
        &mut self,
        object: impl Into<String>,
        handler: Box<dyn MapObjectHandler>,
    ) {
        self.map_objects
            .insert(object.into().to_lowercase(), handler);
    }

    /// Remove a map object registration
    pub fn unregister_map_object(&mut self, object: &str) -> bool {
        self.map_objects.remove(&object.to_lowercase()).is_some()
    }

    /// Route a map object block to its handler.
    /// Returns `None` when the object name is unknown.
    pub fn dispatch_map_object(&mut self, object: &str, data: &[u8]) -> Option<bool> {
        self.map_objects
            .get_mut(&object.to_lowercase())
            .map(|h| h.handle_object(object, data))
    }
}
