//! Touchless button state machine.
//!
//! Pure logic, no hardware dependencies. Consumes raw distance readings and
//! a monotonic clock, produces trigger events. Fully testable on host.
//!
//! A button is "pressed" when the smoothed distance sits inside its
//! threshold window long enough for the enter gate to confirm, and
//! "released" when it has sat outside the window long enough for the exit
//! gate to confirm. What a confirmed press *does* depends on the behavior:
//!
//! - **Momentary**: one trigger per hand-presence cycle.
//! - **Toggle**: alternates `(id, value)` / `(id, 0)` per cycle.
//! - **Radio**: claims its group and fans on/off triggers to every member.
//! - **Continuous**: streams `(id, value)` on every confirmed poll.

use crate::debounce::DebounceGate;
use crate::radio::RadioGroups;
use crate::smoothing::{SmoothingFilter, SMOOTHING_WINDOW};

/// Default press-confirm debounce, milliseconds.
pub const DEFAULT_TRIGGER_CONFIRM_MS: i64 = 200;

/// Default hand-removed-confirm debounce, milliseconds.
pub const DEFAULT_HAND_REMOVED_CONFIRM_MS: i64 = 500;

/// Receiver for button trigger events.
///
/// Invoked synchronously from [`TouchlessButton::update`]; implementations
/// must not block and must not re-enter `update` on the same button.
pub trait TriggerSink {
    fn on_trigger(&mut self, button_id: u32, value: i32);
}

impl<F: FnMut(u32, i32)> TriggerSink for F {
    fn on_trigger(&mut self, button_id: u32, value: i32) {
        self(button_id, value)
    }
}

/// Button output behavior. Exactly one per button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Fire once per hand-presence cycle.
    Momentary,
    /// Alternate on/off per hand-presence cycle.
    Toggle,
    /// One active member per group; activating fans on/off to all members.
    Radio,
    /// Stream the smoothed value on every confirmed poll.
    Continuous,
}

impl Behavior {
    /// Map the wire/config behavior code (1..=4) to a behavior.
    ///
    /// Unknown codes map to `None`: the button still smooths and confirms
    /// but never dispatches, matching the fail-soft contract.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Behavior::Momentary),
            2 => Some(Behavior::Toggle),
            3 => Some(Behavior::Radio),
            4 => Some(Behavior::Continuous),
            _ => None,
        }
    }
}

/// Per-button configuration.
#[derive(Clone, Copy, Debug)]
pub struct ButtonConfig {
    /// Stable identity used in trigger events.
    pub id: u32,
    /// Output behavior; `None` makes the button a no-op.
    pub behavior: Option<Behavior>,
    /// Inclusive lower threshold on the smoothed value.
    pub min_threshold: i32,
    /// Inclusive upper threshold on the smoothed value.
    pub max_threshold: i32,
    /// Debounce before a press confirms; also the retrigger cool-down.
    pub trigger_confirm_delay_ms: i64,
    /// Debounce before a hand removal confirms.
    pub hand_removed_confirm_delay_ms: i64,
    /// Group this button claims when behavior is [`Behavior::Radio`].
    pub radio_group: Option<u32>,
}

impl ButtonConfig {
    /// Create a config with default debounce delays and no radio group.
    pub const fn new(
        id: u32,
        behavior: Option<Behavior>,
        min_threshold: i32,
        max_threshold: i32,
    ) -> Self {
        Self {
            id,
            behavior,
            min_threshold,
            max_threshold,
            trigger_confirm_delay_ms: DEFAULT_TRIGGER_CONFIRM_MS,
            hand_removed_confirm_delay_ms: DEFAULT_HAND_REMOVED_CONFIRM_MS,
            radio_group: None,
        }
    }

    /// Override both debounce delays.
    pub const fn with_delays(
        mut self,
        trigger_confirm_delay_ms: i64,
        hand_removed_confirm_delay_ms: i64,
    ) -> Self {
        self.trigger_confirm_delay_ms = trigger_confirm_delay_ms;
        self.hand_removed_confirm_delay_ms = hand_removed_confirm_delay_ms;
        self
    }

    /// Assign the radio group claimed by this button.
    pub const fn with_radio_group(mut self, group_id: u32) -> Self {
        self.radio_group = Some(group_id);
        self
    }
}

/// Per-sensor controller turning noisy distance samples into triggers.
///
/// # Example
///
/// ```
/// use touchless_console::button::{Behavior, ButtonConfig, TouchlessButton};
/// use touchless_console::radio::RadioGroups;
///
/// let config = ButtonConfig::new(1, Some(Behavior::Momentary), 10, 25);
/// let mut button: TouchlessButton = TouchlessButton::new(config);
/// let mut groups = RadioGroups::new();
/// let mut fired = Vec::new();
/// let mut sink = |id: u32, value: i32| fired.push((id, value));
///
/// // Hand held at 18 cm, polled every 20 ms: one trigger once the
/// // 200 ms press debounce has elapsed, none after.
/// for tick in 0..30i64 {
///     button.update(18, tick * 20, &mut groups, &mut sink);
/// }
/// assert_eq!(fired, vec![(1, 18)]);
/// ```
pub struct TouchlessButton<const N: usize = SMOOTHING_WINDOW> {
    config: ButtonConfig,
    filter: SmoothingFilter<N>,
    enter_gate: DebounceGate,
    exit_gate: DebounceGate,

    /// True once a removal has confirmed; gates re-arming of the
    /// momentary/toggle/radio behaviors. Starts true.
    hand_removed: bool,
    toggle_on: bool,
    last_confirmed_trigger_ms: i64,
    sensor_value: i32,
}

impl<const N: usize> TouchlessButton<N> {
    /// Create a button in the idle state (hand assumed removed).
    pub const fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            filter: SmoothingFilter::new(),
            enter_gate: DebounceGate::new(),
            exit_gate: DebounceGate::new(),
            hand_removed: true,
            toggle_on: false,
            last_confirmed_trigger_ms: 0,
            sensor_value: 0,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Latest smoothed value while active, 0 otherwise.
    pub fn value(&self) -> i32 {
        self.sensor_value
    }

    /// Adjust the threshold window.
    pub fn set_threshold(&mut self, min_threshold: i32, max_threshold: i32) {
        self.config.min_threshold = min_threshold;
        self.config.max_threshold = max_threshold;
    }

    /// Adjust the press-confirm debounce / retrigger cool-down.
    pub fn set_trigger_delay(&mut self, delay_ms: i64) {
        self.config.trigger_confirm_delay_ms = delay_ms;
    }

    /// Replace the output behavior (`None` disables the button).
    pub fn set_behavior(&mut self, behavior: Option<Behavior>) {
        self.config.behavior = behavior;
    }

    /// Feed one raw sample at time `now_ms`.
    ///
    /// Trigger events are dispatched synchronously through `sink`; the sink
    /// must not block or re-enter this button's `update`.
    pub fn update<S: TriggerSink>(
        &mut self,
        raw: i32,
        now_ms: i64,
        groups: &mut RadioGroups,
        sink: &mut S,
    ) {
        self.filter.push(raw);
        let v = self.filter.average();
        let in_range = v >= self.config.min_threshold && v <= self.config.max_threshold;

        if in_range {
            // A presence reading interrupts any pending removal.
            self.exit_gate.reset();
            if self
                .enter_gate
                .observe(true, now_ms, self.config.trigger_confirm_delay_ms)
            {
                self.sensor_value = v;
                self.dispatch(v, now_ms, groups, sink);
            }
        } else if !self.hand_removed {
            if self
                .exit_gate
                .observe(true, now_ms, self.config.hand_removed_confirm_delay_ms)
            {
                self.hand_removed = true;
                self.exit_gate.reset();
            }
        } else {
            // Idle and clear of the window: require a fresh confirm next time.
            self.enter_gate.reset();
            self.sensor_value = 0;
        }
    }

    /// Behavior dispatch, called on every confirmed in-range poll.
    fn dispatch<S: TriggerSink>(
        &mut self,
        v: i32,
        now_ms: i64,
        groups: &mut RadioGroups,
        sink: &mut S,
    ) {
        let Some(behavior) = self.config.behavior else {
            return;
        };
        match behavior {
            Behavior::Momentary => {
                if self.hand_removed && self.cooldown_elapsed(now_ms) {
                    self.note_activation(now_ms);
                    sink.on_trigger(self.config.id, v);
                }
            }
            Behavior::Toggle => {
                if self.hand_removed && self.cooldown_elapsed(now_ms) {
                    self.note_activation(now_ms);
                    self.toggle_on = !self.toggle_on;
                    let value = if self.toggle_on { v } else { 0 };
                    sink.on_trigger(self.config.id, value);
                }
            }
            Behavior::Radio => {
                let Some(group) = self.config.radio_group else {
                    return;
                };
                if self.hand_removed
                    && groups.active(group) != Some(self.config.id)
                    && self.cooldown_elapsed(now_ms)
                {
                    self.note_activation(now_ms);
                    for (member, is_active) in groups.activate(group, self.config.id) {
                        sink.on_trigger(member, if is_active { v } else { 0 });
                    }
                }
            }
            // Continuous streams unconditionally once confirmed: it never
            // claims the hand-removed flag, so leaving the window skips exit
            // hysteresis and re-entry pays the full confirm delay again.
            Behavior::Continuous => sink.on_trigger(self.config.id, v),
        }
    }

    fn cooldown_elapsed(&self, now_ms: i64) -> bool {
        now_ms - self.last_confirmed_trigger_ms > self.config.trigger_confirm_delay_ms
    }

    fn note_activation(&mut self, now_ms: i64) {
        self.last_confirmed_trigger_ms = now_ms;
        self.hand_removed = false;
    }
}
