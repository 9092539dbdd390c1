// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap: discrete recognition of one or more short, stationary presses.
//!
//! A press starts when the first contact lands and finishes when the last
//! one lifts. It counts as a tap when:
//!
//! - the peak number of simultaneous contacts equals
//!   [`touches_required`](TapConfig::touches_required),
//! - the centroid stays within [`max_movement`](TapConfig::max_movement) of
//!   where the press started (contacts landing or lifting do not count as
//!   movement),
//! - it lasts at most [`max_duration`](TapConfig::max_duration) ms.
//!
//! After [`taps_required`](TapConfig::taps_required) taps, each starting no
//! later than [`max_interval`](TapConfig::max_interval) ms after the previous
//! release, the recognizer enters `RECOGNIZED`. A press that breaks a rule
//! enters `FAILED`; the remaining contacts of that press are then ignored
//! until all of them lift.

use kurbo::{Point, Vec2};

use crate::error::{ConfigError, assert_valid, check_count, check_threshold};
use crate::geometry::centroid;
use crate::recognizer::{DispatchCx, Recognizer};
use crate::state::{GestureKind, GestureState};
use crate::touch::{TouchEvent, TouchPhase};

/// Tap parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TapConfig {
    /// Taps in the sequence (2 for a double tap).
    pub taps_required: u32,
    /// Contacts per tap.
    pub touches_required: usize,
    /// How far the centroid may drift during a press.
    pub max_movement: f64,
    /// Longest press, in milliseconds.
    pub max_duration: u64,
    /// Longest pause between a release and the next press, in milliseconds.
    pub max_interval: u64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            taps_required: 1,
            touches_required: 1,
            max_movement: 10.0,
            max_duration: 300,
            max_interval: 300,
        }
    }
}

impl TapConfig {
    /// Check the parameters without panicking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.taps_required == 0 {
            return Err(ConfigError::ZeroCount {
                field: "taps_required",
            });
        }
        check_count("touches_required", self.touches_required)?;
        check_threshold("max_movement", self.max_movement, true)
    }
}

#[derive(Copy, Clone, Debug)]
struct Press {
    started: u64,
    peak: usize,
    origin: Point,
    centroid: Point,
    shift: Vec2,
}

impl Press {
    fn drift(&self) -> f64 {
        (self.centroid - self.origin + self.shift).hypot()
    }
}

/// Recognizes taps.
#[derive(Clone, Debug)]
pub struct TapRecognizer {
    config: TapConfig,
    state: GestureState,
    press: Option<Press>,
    tap_count: u32,
    last_release: Option<u64>,
    location: Option<Point>,
    awaiting_release: bool,
}

impl Default for TapRecognizer {
    fn default() -> Self {
        Self::new(TapConfig::default())
    }
}

impl TapRecognizer {
    /// Create a tap recognizer.
    ///
    /// # Panics
    ///
    /// If `config` fails [`TapConfig::validate`].
    #[track_caller]
    pub fn new(config: TapConfig) -> Self {
        assert_valid(GestureKind::Tap, config.validate());
        Self {
            config,
            state: GestureState::Possible,
            press: None,
            tap_count: 0,
            last_release: None,
            location: None,
            awaiting_release: false,
        }
    }

    /// Current parameters.
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Replace the parameters.
    ///
    /// # Panics
    ///
    /// Outside [`GestureState::Possible`], while a press or sequence is in
    /// progress, or if `config` is invalid.
    #[track_caller]
    pub fn set_config(&mut self, config: TapConfig) {
        assert!(
            self.state == GestureState::Possible && !self.is_tracking(),
            "tap configuration can only change while POSSIBLE and idle"
        );
        assert_valid(GestureKind::Tap, config.validate());
        self.config = config;
    }

    /// Set the number of taps in the sequence.
    ///
    /// # Panics
    ///
    /// See [`set_config`](Self::set_config).
    #[track_caller]
    pub fn set_taps_required(&mut self, taps: u32) {
        self.set_config(TapConfig {
            taps_required: taps,
            ..self.config
        });
    }

    /// Set the number of contacts per tap.
    ///
    /// # Panics
    ///
    /// See [`set_config`](Self::set_config).
    #[track_caller]
    pub fn set_touches_required(&mut self, touches: usize) {
        self.set_config(TapConfig {
            touches_required: touches,
            ..self.config
        });
    }

    /// Taps completed in the current sequence.
    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    /// Centroid of the most recent completed tap.
    pub fn location(&self) -> Option<Point> {
        self.location
    }

    fn enter(&mut self, to: GestureState, cx: &mut DispatchCx<'_, Self>) {
        cx.advance(&mut self.state, to);
        cx.notify(self);
    }

    fn reset(&mut self) {
        self.state = GestureState::Possible;
        self.press = None;
        self.tap_count = 0;
        self.last_release = None;
        self.location = None;
    }

    fn fail(&mut self, contacts_down: bool, cx: &mut DispatchCx<'_, Self>) {
        self.enter(GestureState::Failed, cx);
        self.reset();
        self.awaiting_release = contacts_down;
    }

    fn touches_began(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        if self.awaiting_release {
            return;
        }
        let count = event.count();
        let Some(next) = centroid(event.target_touches) else {
            return;
        };
        match &mut self.press {
            Some(press) => {
                press.peak = press.peak.max(count);
                press.shift += press.centroid - next;
                press.centroid = next;
            }
            None => {
                let late = self
                    .last_release
                    .is_some_and(|t| event.timestamp.saturating_sub(t) > self.config.max_interval);
                if late {
                    // The pending sequence timed out; this press starts a new one.
                    self.fail(false, cx);
                }
                self.press = Some(Press {
                    started: event.timestamp,
                    peak: count,
                    origin: next,
                    centroid: next,
                    shift: Vec2::ZERO,
                });
            }
        }
        if count > self.config.touches_required {
            self.fail(true, cx);
        }
    }

    fn touches_moved(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        if self.awaiting_release {
            return;
        }
        let Some(press) = &mut self.press else {
            return;
        };
        let Some(next) = centroid(event.target_touches) else {
            return;
        };
        press.centroid = next;
        if press.drift() > self.config.max_movement {
            self.fail(true, cx);
        }
    }

    fn touches_ended(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let count = event.count();
        if self.awaiting_release {
            self.awaiting_release = count > 0;
            return;
        }
        let Some(press) = &mut self.press else {
            return;
        };
        if let Some(next) = centroid(event.target_touches) {
            press.shift += press.centroid - next;
            press.centroid = next;
            return;
        }

        let press = *press;
        self.press = None;
        let duration = event.timestamp.saturating_sub(press.started);
        if press.peak != self.config.touches_required || duration > self.config.max_duration {
            self.fail(false, cx);
            return;
        }

        self.tap_count += 1;
        self.last_release = Some(event.timestamp);
        self.location = Some(press.centroid);
        if self.tap_count >= self.config.taps_required {
            if cx.may_begin() {
                self.enter(GestureState::Recognized, cx);
                self.reset();
            } else {
                cx.mark_blocked();
                self.fail(false, cx);
            }
        }
    }

    fn touches_cancelled(&mut self, cx: &mut DispatchCx<'_, Self>) {
        if self.is_tracking() {
            self.enter(GestureState::Cancelled, cx);
        }
        self.reset();
        self.awaiting_release = false;
    }
}

impl Recognizer for TapRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Tap
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn is_tracking(&self) -> bool {
        self.state == GestureState::Possible && (self.press.is_some() || self.tap_count > 0)
    }

    fn dispatch(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        match event.phase {
            TouchPhase::Began => self.touches_began(event, cx),
            TouchPhase::Moved => self.touches_moved(event, cx),
            TouchPhase::Ended => self.touches_ended(event, cx),
            TouchPhase::Cancelled => self.touches_cancelled(cx),
        }
    }

    fn interrupt(&mut self, cx: &mut DispatchCx<'_, Self>) {
        if self.is_tracking() {
            let contacts_down = self.press.is_some();
            self.fail(contacts_down, cx);
        }
    }
}
