//! State shared between the control loop and the jog interrupt
//!
//! Every field has exactly one writer:
//!
//! | field      | writer            | reader             |
//! |------------|-------------------|--------------------|
//! | `jog`      | feedback update   | jog interrupt      |
//! | `position` | jog interrupt     | control loop, host |
//! | `clock`    | timer interrupt   | everyone           |
//!
//! Each value is one machine word behind a `portable-atomic` type, so reads
//! never tear. On cores without read-modify-write atomics (Cortex-M0+) the
//! increments fall back to a short critical section.

use portable_atomic::{AtomicI32, AtomicU32, AtomicU8, Ordering};

/// Jog request for the height axis
///
/// Encodes the `jog_z_up` / `jog_z_down` flag pair as a single value, so
/// both flags can never be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum JogCommand {
    /// Hold position
    #[default]
    Hold = 0,
    /// Raise the torch (voltage too low)
    Up = 1,
    /// Lower the torch (voltage too high)
    Down = 2,
}

impl JogCommand {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => JogCommand::Up,
            2 => JogCommand::Down,
            _ => JogCommand::Hold,
        }
    }
}

/// Jog flags written by the feedback controller and consumed per tick
#[derive(Debug, Default)]
pub struct JogFlags {
    command: AtomicU8,
}

impl JogFlags {
    /// Create flags in the hold state
    pub const fn new() -> Self {
        Self {
            command: AtomicU8::new(JogCommand::Hold as u8),
        }
    }

    /// Publish a new jog request
    pub fn set(&self, command: JogCommand) {
        self.command.store(command as u8, Ordering::Release);
    }

    /// Clear both flags
    pub fn clear(&self) {
        self.set(JogCommand::Hold);
    }

    /// Current jog request
    pub fn get(&self) -> JogCommand {
        JogCommand::from_raw(self.command.load(Ordering::Acquire))
    }

    /// `jog_z_up`
    pub fn is_up(&self) -> bool {
        self.get() == JogCommand::Up
    }

    /// `jog_z_down`
    pub fn is_down(&self) -> bool {
        self.get() == JogCommand::Down
    }
}

/// Step-counted position of the jogged axis
#[derive(Debug, Default)]
pub struct AxisPosition {
    steps: AtomicI32,
}

impl AxisPosition {
    /// Create a position counter starting at zero
    pub const fn new() -> Self {
        Self {
            steps: AtomicI32::new(0),
        }
    }

    /// Current position in steps
    pub fn get(&self) -> i32 {
        self.steps.load(Ordering::Relaxed)
    }

    /// Record one step in the positive direction (interrupt side only)
    pub fn increment(&self) {
        self.steps.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one step in the negative direction (interrupt side only)
    pub fn decrement(&self) {
        self.steps.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Monotonic tick counter driven by the timer interrupt
///
/// At the default 1 kHz tick rate this counts milliseconds. The counter
/// wraps after 2^32 ticks; deadline checks are wrap-safe.
#[derive(Debug, Default)]
pub struct TickClock {
    ticks: AtomicU32,
}

impl TickClock {
    /// Create a clock starting at `ticks`
    pub const fn new(ticks: u32) -> Self {
        Self {
            ticks: AtomicU32::new(ticks),
        }
    }

    /// Current tick count
    pub fn now(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Advance by one tick (timer interrupt only)
    pub fn increment(&self) {
        self.advance(1);
    }

    /// Advance by `ticks` (timer interrupt or simulation only)
    pub fn advance(&self, ticks: u32) {
        self.ticks.fetch_add(ticks, Ordering::Relaxed);
    }

    /// Absolute tick `ticks` from now
    ///
    /// Delays are capped at [`MAX_DEADLINE_TICKS`] so the deadline always
    /// lies ahead of the clock.
    pub fn deadline_after(&self, ticks: u32) -> u32 {
        self.now().wrapping_add(ticks.min(MAX_DEADLINE_TICKS))
    }

    /// Whether `deadline` has been reached
    pub fn has_reached(&self, deadline: u32) -> bool {
        deadline_reached(self.now(), deadline)
    }
}

/// Longest delay a deadline can express without wrapping into the past
pub const MAX_DEADLINE_TICKS: u32 = i32::MAX as u32;

/// Wrap-safe `now >= deadline` for deadlines less than 2^31 ticks away
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Everything the jog interrupt and the control loop share
///
/// Firmware keeps one of these in a `static`; tests create their own.
#[derive(Debug, Default)]
pub struct ThcShared {
    /// Jog request for the height axis
    pub jog: JogFlags,
    /// Height axis position in steps
    pub position: AxisPosition,
    /// Tick counter
    pub clock: TickClock,
}

impl ThcShared {
    /// Create shared state with the clock at zero and the axis holding
    pub const fn new() -> Self {
        Self {
            jog: JogFlags::new(),
            position: AxisPosition::new(),
            clock: TickClock::new(0),
        }
    }

    /// Current tick count
    pub fn now(&self) -> u32 {
        self.clock.now()
    }

    /// Current axis position in steps
    pub fn position(&self) -> i32 {
        self.position.get()
    }
}
