//! Button behavior tests: full hand-presence cycles against an injected
//! clock, one poll every 20 ms like the real loop.

use touchless_console::button::{Behavior, ButtonConfig, TouchlessButton};
use touchless_console::radio::RadioGroups;

const IN_RANGE: i32 = 20;
const OUT_OF_RANGE: i32 = 90;
const STEP_MS: i64 = 20;

/// Window of 1 keeps the smoothed value equal to the raw sample, so these
/// tests exercise timing, not the averaging (covered in smoothing_tests).
type Button = TouchlessButton<1>;

fn config(id: u32, behavior: Behavior) -> ButtonConfig {
    ButtonConfig::new(id, Some(behavior), 10, 30).with_delays(100, 200)
}

fn run_phase(
    button: &mut Button,
    groups: &mut RadioGroups,
    raw: i32,
    from_ms: i64,
    to_ms: i64,
    calls: &mut Vec<(u32, i32)>,
) {
    let mut t = from_ms;
    while t < to_ms {
        let mut sink = |id: u32, value: i32| calls.push((id, value));
        button.update(raw, t, groups, &mut sink);
        t += STEP_MS;
    }
}

#[test]
fn test_momentary_fires_once_per_cycle() {
    let mut button = Button::new(config(1, Behavior::Momentary));
    let mut groups = RadioGroups::new();
    let mut calls = Vec::new();

    // Hand in, held well past the confirm delay
    run_phase(&mut button, &mut groups, IN_RANGE, 0, 320, &mut calls);
    assert_eq!(calls, vec![(1, IN_RANGE)]);

    // Hand out long enough for removal to confirm, then back in
    run_phase(&mut button, &mut groups, OUT_OF_RANGE, 320, 640, &mut calls);
    assert_eq!(calls.len(), 1);

    run_phase(&mut button, &mut groups, IN_RANGE, 640, 960, &mut calls);
    assert_eq!(calls, vec![(1, IN_RANGE), (1, IN_RANGE)]);
}

#[test]
fn test_momentary_needs_confirmed_removal_to_rearm() {
    let mut button = Button::new(config(1, Behavior::Momentary));
    let mut groups = RadioGroups::new();
    let mut calls = Vec::new();

    run_phase(&mut button, &mut groups, IN_RANGE, 0, 320, &mut calls);
    assert_eq!(calls.len(), 1);

    // Out for only 100 ms: shorter than the 200 ms removal confirm
    run_phase(&mut button, &mut groups, OUT_OF_RANGE, 320, 420, &mut calls);
    // Back in: still counts as the same press
    run_phase(&mut button, &mut groups, IN_RANGE, 420, 800, &mut calls);
    assert_eq!(calls.len(), 1);
}

#[test]
fn test_toggle_alternates_value_and_zero() {
    let mut button = Button::new(config(2, Behavior::Toggle));
    let mut groups = RadioGroups::new();
    let mut calls = Vec::new();

    for cycle in 0..4i64 {
        let base = cycle * 640;
        run_phase(&mut button, &mut groups, IN_RANGE, base, base + 320, &mut calls);
        run_phase(
            &mut button,
            &mut groups,
            OUT_OF_RANGE,
            base + 320,
            base + 640,
            &mut calls,
        );
    }

    assert_eq!(
        calls,
        vec![(2, IN_RANGE), (2, 0), (2, IN_RANGE), (2, 0)]
    );
}

#[test]
fn test_radio_fan_out_and_handover() {
    let mut buttons = [
        Button::new(config(1, Behavior::Radio).with_radio_group(7)),
        Button::new(config(2, Behavior::Radio).with_radio_group(7)),
        Button::new(config(3, Behavior::Radio).with_radio_group(7)),
    ];
    let mut groups = RadioGroups::new();
    for button in &buttons {
        groups.register(7, button.config().id);
    }
    let mut calls = Vec::new();

    let mut poll_all = |buttons: &mut [Button; 3],
                        groups: &mut RadioGroups,
                        raws: [i32; 3],
                        from_ms: i64,
                        to_ms: i64,
                        calls: &mut Vec<(u32, i32)>| {
        let mut t = from_ms;
        while t < to_ms {
            for (button, raw) in buttons.iter_mut().zip(raws) {
                let mut sink = |id: u32, value: i32| calls.push((id, value));
                button.update(raw, t, groups, &mut sink);
            }
            t += STEP_MS;
        }
    };

    // Activate member 1: one fan-out over the whole group, in member order
    poll_all(
        &mut buttons,
        &mut groups,
        [IN_RANGE, OUT_OF_RANGE, OUT_OF_RANGE],
        0,
        320,
        &mut calls,
    );
    assert_eq!(calls, vec![(1, IN_RANGE), (2, 0), (3, 0)]);
    assert_eq!(groups.active(7), Some(1));

    // Hand moves from 1 to 2: 2 claims the group, 1 goes off in the fan-out
    calls.clear();
    poll_all(
        &mut buttons,
        &mut groups,
        [OUT_OF_RANGE, IN_RANGE, OUT_OF_RANGE],
        320,
        960,
        &mut calls,
    );
    assert_eq!(calls, vec![(1, 0), (2, IN_RANGE), (3, 0)]);
    assert_eq!(groups.active(7), Some(2));
}

#[test]
fn test_radio_reactivating_active_member_is_silent() {
    let mut button = Button::new(config(1, Behavior::Radio).with_radio_group(7));
    let mut groups = RadioGroups::new();
    groups.register(7, 1);
    let mut calls = Vec::new();

    run_phase(&mut button, &mut groups, IN_RANGE, 0, 320, &mut calls);
    assert_eq!(calls, vec![(1, IN_RANGE)]);
    assert_eq!(groups.active(7), Some(1));

    // Full removal, then press the same button again: the registry still
    // lists it active, so nothing fires
    run_phase(&mut button, &mut groups, OUT_OF_RANGE, 320, 640, &mut calls);
    run_phase(&mut button, &mut groups, IN_RANGE, 640, 960, &mut calls);
    assert_eq!(calls.len(), 1);
}

#[test]
fn test_continuous_streams_every_confirmed_poll() {
    let mut button = Button::new(config(5, Behavior::Continuous));
    let mut groups = RadioGroups::new();
    let mut calls = Vec::new();

    // Polls at t = 0, 20, ..., 400; confirm needs t > 100
    run_phase(&mut button, &mut groups, IN_RANGE, 0, 420, &mut calls);
    let expected: usize = (0..420)
        .step_by(STEP_MS as usize)
        .filter(|&t| t > 100)
        .count();
    assert_eq!(calls.len(), expected);
    assert!(calls.iter().all(|&c| c == (5, IN_RANGE)));
}

#[test]
fn test_continuous_reentry_pays_the_confirm_delay_again() {
    let mut button = Button::new(config(5, Behavior::Continuous));
    let mut groups = RadioGroups::new();
    let mut calls = Vec::new();

    run_phase(&mut button, &mut groups, IN_RANGE, 0, 320, &mut calls);
    assert!(!calls.is_empty());

    // Leaving the window stops the stream on the next poll: continuous
    // never claims hand-removed, so there is no exit hysteresis
    calls.clear();
    run_phase(&mut button, &mut groups, OUT_OF_RANGE, 320, 400, &mut calls);
    assert!(calls.is_empty());

    // Re-entry confirms from scratch before streaming resumes
    run_phase(&mut button, &mut groups, IN_RANGE, 400, 620, &mut calls);
    let expected: usize = (400..620)
        .step_by(STEP_MS as usize)
        .filter(|&t| t - 400 > 100)
        .count();
    assert!(expected > 0);
    assert_eq!(calls.len(), expected);
}
