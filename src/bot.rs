//! Tick-driven bot controller
//!
//! Movement scripts are modeled as a queue of actions consumed one tick
//! at a time instead of busy-waiting on the simulation until a turn or
//! drive completes. The host calls `tick(dt)` once per simulation step
//! and applies the returned command; the controller never blocks, so a
//! shared simulation thread is never stalled by a slow script.

use std::collections::VecDeque;

/// One scripted action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BotAction {
    /// Turn by this many degrees (negative turns right)
    Turn(f64),

    /// Drive forward this many world units (negative reverses)
    Drive(f64),

    /// Fire one shot
    Fire,

    /// Hold position for this many seconds
    Pause(f64),
}

/// What the host applies for one simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickCommand {
    /// Forward speed in world units per second
    pub speed: f64,

    /// Turn rate in degrees per second (positive is left)
    pub angular_velocity: f64,

    /// Fire one shot this step
    pub fire: bool,
}

impl TickCommand {
    /// Command that keeps the bot still
    pub fn hold() -> Self {
        Self {
            speed: 0.0,
            angular_velocity: 0.0,
            fire: false,
        }
    }
}

/// Movement rates the controller steers with
#[derive(Debug, Clone, Copy)]
pub struct BotRates {
    /// Drive speed in world units per second
    pub speed: f64,

    /// Turn rate in degrees per second
    pub turn_rate: f64,
}

impl Default for BotRates {
    fn default() -> Self {
        Self {
            speed: 25.0,
            turn_rate: 90.0,
        }
    }
}

/// Action queue plus progress on the action currently running
pub struct BotController {
    rates: BotRates,
    queue: VecDeque<BotAction>,
    current: Option<InProgress>,
}

/// Remaining amount of the running action, in its own unit
/// (degrees, world units or seconds)
#[derive(Debug)]
enum InProgress {
    Turning { remaining: f64, direction: f64 },
    Driving { remaining: f64, direction: f64 },
    Pausing { remaining: f64 },
}

impl BotController {
    pub fn new(rates: BotRates) -> Self {
        Self {
            rates,
            queue: VecDeque::new(),
            current: None,
        }
    }

    /// Queue a turn by `degrees` (negative turns right)
    pub fn turn(&mut self, degrees: f64) {
        self.queue.push_back(BotAction::Turn(degrees));
    }

    /// Queue a drive of `distance` world units (negative reverses)
    pub fn drive(&mut self, distance: f64) {
        self.queue.push_back(BotAction::Drive(distance));
    }

    /// Queue a single shot
    pub fn fire(&mut self) {
        self.queue.push_back(BotAction::Fire);
    }

    /// Queue a hold of `seconds`
    pub fn pause(&mut self, seconds: f64) {
        self.queue.push_back(BotAction::Pause(seconds));
    }

    /// Whether all queued actions have completed
    pub fn idle(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Drop the running action and everything queued behind it
    pub fn cancel(&mut self) {
        self.current = None;
        self.queue.clear();
    }

    /// Advance the script by one simulation step of `dt` seconds
    ///
    /// Consumes progress on the running action and starts the next one
    /// from the queue when it finishes. Fire actions are instantaneous:
    /// they set the fire bit for exactly one tick.
    pub fn tick(&mut self, dt: f64) -> TickCommand {
        let mut command = TickCommand::hold();

        if self.current.is_none() {
            self.current = self.queue.pop_front().and_then(|action| match action {
                BotAction::Turn(degrees) => Some(InProgress::Turning {
                    remaining: degrees.abs(),
                    direction: degrees.signum(),
                }),
                BotAction::Drive(distance) => Some(InProgress::Driving {
                    remaining: distance.abs(),
                    direction: distance.signum(),
                }),
                BotAction::Pause(seconds) => Some(InProgress::Pausing { remaining: seconds }),
                BotAction::Fire => {
                    command.fire = true;
                    None
                }
            });
            if command.fire {
                return command;
            }
        }

        let mut done = false;
        match &mut self.current {
            Some(InProgress::Turning {
                remaining,
                direction,
            }) => {
                command.angular_velocity = self.rates.turn_rate * *direction;
                *remaining -= self.rates.turn_rate * dt;
                done = *remaining <= 0.0;
            }
            Some(InProgress::Driving {
                remaining,
                direction,
            }) => {
                command.speed = self.rates.speed * *direction;
                *remaining -= self.rates.speed * dt;
                done = *remaining <= 0.0;
            }
            Some(InProgress::Pausing { remaining }) => {
                *remaining -= dt;
                done = *remaining <= 0.0;
            }
            None => {}
        }
        if done {
            self.current = None;
        }

        command
    }
}

impl Default for BotController {
    fn default() -> Self {
        Self::new(BotRates::default())
    }
}
