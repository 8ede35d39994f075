//! Event Bus Tests
//!
//! Registration, removal and dispatch across the handler kinds.

use std::sync::{Arc, Mutex};

use bzquery::events::{
    EventBus, EventHandler, EventKind, GameEvent, MapObjectHandler, PollTypeHandler,
    SlashCommandHandler,
};

/// Handler that appends a tag to a shared log on every event
struct Recorder {
    tag: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl EventHandler for Recorder {
    fn handle_event(&mut self, event: &GameEvent) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{:?}", self.tag, event.kind()));
    }
}

fn recorder(tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Box<Recorder> {
    Box::new(Recorder {
        tag,
        log: Arc::clone(log),
    })
}

// =============================================================================
// Event Dispatch Tests
// =============================================================================

#[test]
fn test_dispatch_reaches_registered_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.register(EventKind::Chat, recorder("a", &log));

    bus.dispatch(&GameEvent::Chat {
        from: 1,
        message: "hello".to_string(),
    });

    assert_eq!(*log.lock().unwrap(), vec!["a:Chat"]);
}

#[test]
fn test_dispatch_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.register(EventKind::GameStart, recorder("first", &log));
    bus.register(EventKind::GameStart, recorder("second", &log));

    bus.dispatch(&GameEvent::GameStart);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["first:GameStart", "second:GameStart"]
    );
}

#[test]
fn test_dispatch_only_matching_kind() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.register(EventKind::PlayerJoined, recorder("join", &log));
    bus.register(EventKind::PlayerParted, recorder("part", &log));

    bus.dispatch(&GameEvent::PlayerParted { player_id: 4 });

    assert_eq!(*log.lock().unwrap(), vec!["part:PlayerParted"]);
}

#[test]
fn test_unregister_stops_delivery() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    let id = bus.register(EventKind::Tick, recorder("t", &log));
    bus.register(EventKind::Tick, recorder("keep", &log));

    assert!(bus.unregister(EventKind::Tick, id));
    assert_eq!(bus.handler_count(EventKind::Tick), 1);

    bus.dispatch(&GameEvent::Tick { elapsed: 0.5 });
    assert_eq!(*log.lock().unwrap(), vec!["keep:Tick"]);
}

#[test]
fn test_unregister_unknown_id() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    let id = bus.register(EventKind::Chat, recorder("a", &log));

    // Wrong kind, and an id that was already removed
    assert!(!bus.unregister(EventKind::Tick, id));
    assert!(bus.unregister(EventKind::Chat, id));
    assert!(!bus.unregister(EventKind::Chat, id));
}

#[test]
fn test_two_buses_are_independent() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut first = EventBus::new();
    let mut second = EventBus::new();
    first.register(EventKind::GameEnd, recorder("one", &log));

    second.dispatch(&GameEvent::GameEnd);
    assert!(log.lock().unwrap().is_empty());

    first.dispatch(&GameEvent::GameEnd);
    assert_eq!(*log.lock().unwrap(), vec!["one:GameEnd"]);
}

// =============================================================================
// Slash Command Tests
// =============================================================================

struct Echo {
    log: Arc<Mutex<Vec<String>>>,
    handled: bool,
}

impl SlashCommandHandler for Echo {
    fn handle_command(&mut self, player_id: i32, command: &str, args: &str) -> bool {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", player_id, command, args));
        self.handled
    }
}

#[test]
fn test_slash_command_routing() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.register_slash_command(
        "vote",
        Box::new(Echo {
            log: Arc::clone(&log),
            handled: true,
        }),
    );

    assert_eq!(bus.dispatch_slash_command(3, "vote", "yes"), Some(true));
    assert_eq!(bus.dispatch_slash_command(3, "kick", "bob"), None);
    assert_eq!(*log.lock().unwrap(), vec!["3:vote:yes"]);
}

#[test]
fn test_slash_command_case_insensitive() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.register_slash_command(
        "Vote",
        Box::new(Echo {
            log: Arc::clone(&log),
            handled: false,
        }),
    );

    assert_eq!(bus.dispatch_slash_command(1, "VOTE", ""), Some(false));
    assert!(bus.unregister_slash_command("vote"));
    assert_eq!(bus.dispatch_slash_command(1, "vote", ""), None);
}

// =============================================================================
// Poll Type Tests
// =============================================================================

struct GatePoll {
    allow: bool,
    closed: Arc<Mutex<Vec<bool>>>,
}

impl PollTypeHandler for GatePoll {
    fn poll_open(&mut self, _player_id: i32, _action: &str, _parameters: &str) -> bool {
        self.allow
    }

    fn poll_close(&mut self, _action: &str, _parameters: &str, success: bool) {
        self.closed.lock().unwrap().push(success);
    }
}

#[test]
fn test_poll_type_lifecycle() {
    let closed = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.register_poll_type(
        "mutiny",
        Box::new(GatePoll {
            allow: true,
            closed: Arc::clone(&closed),
        }),
    );

    assert!(bus.is_poll_type("mutiny"));
    assert!(!bus.is_poll_type("ban"));

    assert_eq!(bus.dispatch_poll_open(2, "mutiny", "captain"), Some(true));
    assert_eq!(bus.dispatch_poll_open(2, "ban", "x"), None);

    bus.dispatch_poll_close("mutiny", "captain", false);
    assert_eq!(*closed.lock().unwrap(), vec![false]);

    assert!(bus.unregister_poll_type("MUTINY"));
    assert!(!bus.is_poll_type("mutiny"));
}

#[test]
fn test_poll_open_can_veto() {
    let closed = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.register_poll_type(
        "flagreset",
        Box::new(GatePoll {
            allow: false,
            closed,
        }),
    );

    assert_eq!(bus.dispatch_poll_open(9, "flagreset", ""), Some(false));
}

// =============================================================================
// Map Object Tests
// =============================================================================

struct ZoneParser {
    seen: Arc<Mutex<Vec<usize>>>,
}

impl MapObjectHandler for ZoneParser {
    fn handle_object(&mut self, _object: &str, data: &[u8]) -> bool {
        self.seen.lock().unwrap().push(data.len());
        true
    }
}

#[test]
fn test_map_object_routing() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.register_map_object(
        "spawnzone",
        Box::new(ZoneParser {
            seen: Arc::clone(&seen),
        }),
    );

    assert_eq!(bus.dispatch_map_object("spawnzone", b"pos 0 0 0"), Some(true));
    assert_eq!(bus.dispatch_map_object("teleporter", b""), None);
    assert_eq!(*seen.lock().unwrap(), vec![9]);

    assert!(bus.unregister_map_object("spawnzone"));
    assert_eq!(bus.dispatch_map_object("spawnzone", b""), None);
}
