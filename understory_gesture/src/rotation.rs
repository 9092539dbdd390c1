// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotation: continuous change in the angle between two contacts.
//!
//! The angle is taken from the first to the second contact of the target
//! list and unwrapped across the ±π seam, so turning past half a revolution
//! keeps accumulating. When the leading pair changes mid-gesture (a finger
//! lifts, or the host reorders contacts) the angle jump is folded into a
//! shift and [`rotation`](RotationRecognizer::rotation) stays continuous.
//!
//! Angles are in radians; with page coordinates (y down) a positive
//! rotation is clockwise on screen.

use crate::error::{ConfigError, assert_valid, check_threshold};
use crate::geometry::{pair_angle, wrap_angle};
use crate::recognizer::{DispatchCx, Recognizer};
use crate::state::{GestureKind, GestureState};
use crate::touch::{TouchEvent, TouchId, TouchPhase, TouchPoint};

/// Rotation parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RotationConfig {
    /// Total angle change, in radians, required before the rotation begins.
    pub angle_hysteresis: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            angle_hysteresis: 0.1,
        }
    }
}

impl RotationConfig {
    /// Check the parameters without panicking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("angle_hysteresis", self.angle_hysteresis, true)
    }
}

type Pair = (TouchId, TouchId);

fn sample(touches: &[TouchPoint]) -> Option<(Pair, f64)> {
    match touches {
        [a, b, ..] => Some(((a.id, b.id), pair_angle(a.pos, b.pos))),
        _ => None,
    }
}

/// Recognizes rotations.
#[derive(Clone, Debug)]
pub struct RotationRecognizer {
    config: RotationConfig,
    state: GestureState,
    pair: Option<Pair>,
    raw: f64,
    angle: f64,
    angle_start: f64,
    angle_shift: f64,
    angle_distance: f64,
    awaiting_release: bool,
}

impl Default for RotationRecognizer {
    fn default() -> Self {
        Self::new(RotationConfig::default())
    }
}

impl RotationRecognizer {
    /// Create a rotation recognizer.
    ///
    /// # Panics
    ///
    /// If `config` fails [`RotationConfig::validate`].
    #[track_caller]
    pub fn new(config: RotationConfig) -> Self {
        assert_valid(GestureKind::Rotation, config.validate());
        Self {
            config,
            state: GestureState::Possible,
            pair: None,
            raw: 0.0,
            angle: 0.0,
            angle_start: 0.0,
            angle_shift: 0.0,
            angle_distance: 0.0,
            awaiting_release: false,
        }
    }

    /// Current parameters.
    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Set the angle change required before the rotation begins.
    ///
    /// # Panics
    ///
    /// Outside [`GestureState::Possible`], or if the value is invalid.
    #[track_caller]
    pub fn set_angle_hysteresis(&mut self, radians: f64) {
        assert!(
            self.state == GestureState::Possible,
            "rotation configuration can only change while POSSIBLE (state is {:?})",
            self.state
        );
        let config = RotationConfig {
            angle_hysteresis: radians,
        };
        assert_valid(GestureKind::Rotation, config.validate());
        self.config = config;
    }

    /// Rotation in radians since the reference angle; `0.0` when idle.
    pub fn rotation(&self) -> f64 {
        if self.pair.is_none() {
            return 0.0;
        }
        self.angle - self.angle_start + self.angle_shift
    }

    fn enter(&mut self, to: GestureState, cx: &mut DispatchCx<'_, Self>) {
        cx.advance(&mut self.state, to);
        cx.notify(self);
    }

    fn abandon(&mut self, to: GestureState, cx: &mut DispatchCx<'_, Self>) {
        self.enter(to, cx);
        self.reset();
        self.awaiting_release = true;
    }

    fn reset(&mut self) {
        self.state = GestureState::Possible;
        self.pair = None;
        self.raw = 0.0;
        self.angle = 0.0;
        self.angle_start = 0.0;
        self.angle_shift = 0.0;
        self.angle_distance = 0.0;
    }

    fn anchor(&mut self, sampled: Option<(Pair, f64)>) {
        match sampled {
            Some((pair, raw)) => {
                self.pair = Some(pair);
                self.raw = raw;
                self.angle = raw;
                self.angle_start = raw;
                self.angle_shift = 0.0;
            }
            None => {
                self.pair = None;
                self.angle_distance = 0.0;
            }
        }
    }

    /// Follow `pair` without reporting the jump between the two pairs.
    fn absorb(&mut self, pair: Pair, raw: f64) {
        self.angle_shift += self.angle - raw;
        self.pair = Some(pair);
        self.raw = raw;
        self.angle = raw;
    }

    /// Advance the unwrapped angle; returns the magnitude of the step.
    fn step(&mut self, raw: f64) -> f64 {
        let delta = wrap_angle(raw - self.raw);
        self.raw = raw;
        self.angle += delta;
        delta.abs()
    }

    fn contacts_changed(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let sampled = sample(event.target_touches);
        if !self.state.is_active() {
            self.anchor(sampled);
            return;
        }
        match sampled {
            Some((pair, raw)) if self.pair == Some(pair) => {
                self.step(raw);
            }
            Some((pair, raw)) => self.absorb(pair, raw),
            None => {
                self.enter(GestureState::Ended, cx);
                self.reset();
            }
        }
    }

    fn touches_moved(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let Some((pair, raw)) = sample(event.target_touches) else {
            return;
        };
        match self.pair {
            None => {
                self.anchor(Some((pair, raw)));
                return;
            }
            Some(current) if current != pair => {
                self.absorb(pair, raw);
                return;
            }
            Some(_) => {}
        }
        let step = self.step(raw);
        match self.state {
            GestureState::Possible => {
                self.angle_distance += step;
                if self.angle_distance > self.config.angle_hysteresis {
                    if cx.may_begin() {
                        self.enter(GestureState::Began, cx);
                        self.enter(GestureState::Changed, cx);
                    } else {
                        cx.mark_blocked();
                        self.abandon(GestureState::Failed, cx);
                    }
                }
            }
            GestureState::Began | GestureState::Changed if step > 0.0 => {
                self.enter(GestureState::Changed, cx);
            }
            _ => {}
        }
    }

    fn touches_cancelled(&mut self, cx: &mut DispatchCx<'_, Self>) {
        if self.is_engaged() {
            self.enter(GestureState::Cancelled, cx);
        }
        self.reset();
    }
}

impl Recognizer for RotationRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Rotation
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn is_tracking(&self) -> bool {
        self.state == GestureState::Possible && self.pair.is_some()
    }

    fn dispatch(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        if self.awaiting_release {
            self.awaiting_release = match event.phase {
                TouchPhase::Ended => event.count() > 0,
                TouchPhase::Cancelled => false,
                TouchPhase::Began | TouchPhase::Moved => true,
            };
            return;
        }
        match event.phase {
            TouchPhase::Began | TouchPhase::Ended => self.contacts_changed(event, cx),
            TouchPhase::Moved => self.touches_moved(event, cx),
            TouchPhase::Cancelled => self.touches_cancelled(cx),
        }
    }

    fn interrupt(&mut self, cx: &mut DispatchCx<'_, Self>) {
        if self.state.is_active() {
            self.abandon(GestureState::Cancelled, cx);
        } else if self.is_tracking() {
            self.abandon(GestureState::Failed, cx);
        }
    }
}
