// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe: discrete recognition of a fast, mostly straight flick.
//!
//! The displacement is tracked like a pan's translation (centroid minus
//! origin, plus a shift that absorbs contacts landing or lifting). Once the
//! larger axis of the displacement reaches
//! [`min_distance`](SwipeConfig::min_distance) the attempt is judged: if the
//! average speed along that axis is at least
//! [`min_velocity`](SwipeConfig::min_velocity) it enters `RECOGNIZED` with a
//! [`SwipeDirection`], otherwise `FAILED`. Lifting every contact before that
//! point also fails.

use kurbo::{Point, Vec2};

use crate::error::{ConfigError, assert_valid, check_count, check_threshold};
use crate::geometry::centroid;
use crate::recognizer::{DispatchCx, Recognizer};
use crate::state::{GestureKind, GestureState, SwipeDirection};
use crate::touch::{TouchEvent, TouchPhase};

/// Swipe parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Contacts the swipe is made with.
    pub touches_required: usize,
    /// Distance along the dominant axis that triggers a decision.
    pub min_distance: f64,
    /// Slowest accepted average speed, in page units per millisecond.
    pub min_velocity: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            touches_required: 1,
            min_distance: 30.0,
            min_velocity: 0.3,
        }
    }
}

impl SwipeConfig {
    /// Check the parameters without panicking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_count("touches_required", self.touches_required)?;
        check_threshold("min_distance", self.min_distance, false)?;
        check_threshold("min_velocity", self.min_velocity, true)
    }
}

/// Recognizes swipes.
#[derive(Clone, Debug)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    state: GestureState,
    started: Option<u64>,
    peak: usize,
    centroid: Option<Point>,
    origin: Point,
    shift: Vec2,
    velocity: f64,
    direction: Option<SwipeDirection>,
    awaiting_release: bool,
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

impl SwipeRecognizer {
    /// Create a swipe recognizer.
    ///
    /// # Panics
    ///
    /// If `config` fails [`SwipeConfig::validate`].
    #[track_caller]
    pub fn new(config: SwipeConfig) -> Self {
        assert_valid(GestureKind::Swipe, config.validate());
        Self {
            config,
            state: GestureState::Possible,
            started: None,
            peak: 0,
            centroid: None,
            origin: Point::ORIGIN,
            shift: Vec2::ZERO,
            velocity: 0.0,
            direction: None,
            awaiting_release: false,
        }
    }

    /// Current parameters.
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Replace the parameters.
    ///
    /// # Panics
    ///
    /// Outside [`GestureState::Possible`], while contacts are being tracked,
    /// or if `config` is invalid.
    #[track_caller]
    pub fn set_config(&mut self, config: SwipeConfig) {
        assert!(
            self.state == GestureState::Possible && !self.is_tracking(),
            "swipe configuration can only change while POSSIBLE and idle"
        );
        assert_valid(GestureKind::Swipe, config.validate());
        self.config = config;
    }

    /// Direction of the recognized swipe.
    pub fn direction(&self) -> Option<SwipeDirection> {
        self.direction
    }

    /// Average speed along the dominant axis at recognition.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Centroid displacement since the first contact landed.
    pub fn displacement(&self) -> Vec2 {
        match self.centroid {
            Some(c) => c - self.origin + self.shift,
            None => Vec2::ZERO,
        }
    }

    fn enter(&mut self, to: GestureState, cx: &mut DispatchCx<'_, Self>) {
        cx.advance(&mut self.state, to);
        cx.notify(self);
    }

    fn reset(&mut self) {
        self.state = GestureState::Possible;
        self.started = None;
        self.peak = 0;
        self.centroid = None;
        self.origin = Point::ORIGIN;
        self.shift = Vec2::ZERO;
        self.velocity = 0.0;
        self.direction = None;
    }

    fn settle(&mut self, to: GestureState, contacts_down: bool, cx: &mut DispatchCx<'_, Self>) {
        self.enter(to, cx);
        self.reset();
        self.awaiting_release = contacts_down;
    }

    /// Judge the attempt once it has travelled far enough.
    ///
    /// Returns `true` when a decision was made.
    fn judge(&mut self, now: u64, contacts_down: bool, cx: &mut DispatchCx<'_, Self>) -> bool {
        let Some(started) = self.started else {
            return false;
        };
        let d = self.displacement();
        let (along, direction) = if d.x.abs() >= d.y.abs() {
            let dir = if d.x > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            (d.x.abs(), dir)
        } else {
            let dir = if d.y > 0.0 {
                SwipeDirection::Down
            } else {
                SwipeDirection::Up
            };
            (d.y.abs(), dir)
        };
        if along < self.config.min_distance {
            return false;
        }

        let elapsed = now.saturating_sub(started).max(1) as f64;
        self.velocity = along / elapsed;
        let satisfied = self.peak == self.config.touches_required
            && self.velocity >= self.config.min_velocity;
        if satisfied && cx.may_begin() {
            self.direction = Some(direction);
            self.settle(GestureState::Recognized, contacts_down, cx);
        } else {
            if satisfied {
                cx.mark_blocked();
            }
            self.settle(GestureState::Failed, contacts_down, cx);
        }
        true
    }

    fn touches_began(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        if self.awaiting_release {
            return;
        }
        let count = event.count();
        let Some(next) = centroid(event.target_touches) else {
            return;
        };
        match self.centroid {
            Some(prev) => self.shift += prev - next,
            None => {
                self.started = Some(event.timestamp);
                self.origin = next;
                self.shift = Vec2::ZERO;
            }
        }
        self.centroid = Some(next);
        self.peak = self.peak.max(count);
        if count > self.config.touches_required {
            self.settle(GestureState::Failed, true, cx);
        }
    }

    fn touches_moved(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        if self.awaiting_release || self.started.is_none() {
            return;
        }
        let Some(next) = centroid(event.target_touches) else {
            return;
        };
        self.centroid = Some(next);
        self.judge(event.timestamp, true, cx);
    }

    fn touches_ended(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let count = event.count();
        if self.awaiting_release {
            self.awaiting_release = count > 0;
            return;
        }
        if self.started.is_none() {
            return;
        }
        if let Some(next) = centroid(event.target_touches) {
            if let Some(prev) = self.centroid {
                self.shift += prev - next;
            }
            self.centroid = Some(next);
            return;
        }
        // Last contact lifted: judge on the final position.
        if !self.judge(event.timestamp, false, cx) {
            self.settle(GestureState::Failed, false, cx);
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

impl Recognizer for SwipeRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Swipe
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn is_tracking(&self) -> bool {
        self.state == GestureState::Possible && self.started.is_some()
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
            self.settle(GestureState::Failed, true, cx);
        }
    }
}
