// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch: continuous scale from the spread of two or more contacts.
//!
//! The spread ("span") is the mean distance of the contacts from their
//! centroid; for two contacts that is half the distance between them.
//! [`scale`](PinchRecognizer::scale) is the span relative to the span when
//! the contact set last changed before the pinch began, multiplied by a
//! shift that absorbs contacts landing or lifting mid-gesture.

use kurbo::Point;

use crate::error::{ConfigError, assert_valid, check_threshold};
use crate::geometry::{centroid, mean_span};
use crate::recognizer::{DispatchCx, Recognizer};
use crate::state::{GestureKind, GestureState};
use crate::touch::{TouchEvent, TouchPhase, TouchPoint};

/// Pinch parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinchConfig {
    /// Total span change required before the pinch begins.
    pub span_hysteresis: f64,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            span_hysteresis: 6.0,
        }
    }
}

impl PinchConfig {
    /// Check the parameters without panicking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("span_hysteresis", self.span_hysteresis, true)
    }
}

/// Recognizes pinches.
#[derive(Clone, Debug)]
pub struct PinchRecognizer {
    config: PinchConfig,
    state: GestureState,
    focus: Option<Point>,
    span: f64,
    span_start: f64,
    scale_shift: f64,
    span_distance: f64,
    awaiting_release: bool,
}

impl Default for PinchRecognizer {
    fn default() -> Self {
        Self::new(PinchConfig::default())
    }
}

/// Centroid and span of a contact set, if it has at least two contacts with
/// some spread.
fn sample(touches: &[TouchPoint]) -> Option<(Point, f64)> {
    if touches.len() < 2 {
        return None;
    }
    let c = centroid(touches)?;
    let span = mean_span(touches, c);
    (span > 0.0).then_some((c, span))
}

impl PinchRecognizer {
    /// Create a pinch recognizer.
    ///
    /// # Panics
    ///
    /// If `config` fails [`PinchConfig::validate`].
    #[track_caller]
    pub fn new(config: PinchConfig) -> Self {
        assert_valid(GestureKind::Pinch, config.validate());
        Self {
            config,
            state: GestureState::Possible,
            focus: None,
            span: 0.0,
            span_start: 0.0,
            scale_shift: 1.0,
            span_distance: 0.0,
            awaiting_release: false,
        }
    }

    /// Current parameters.
    pub fn config(&self) -> &PinchConfig {
        &self.config
    }

    /// Set the span change required before the pinch begins.
    ///
    /// # Panics
    ///
    /// Outside [`GestureState::Possible`], or if the value is invalid.
    #[track_caller]
    pub fn set_span_hysteresis(&mut self, distance: f64) {
        assert!(
            self.state == GestureState::Possible,
            "pinch configuration can only change while POSSIBLE (state is {:?})",
            self.state
        );
        let config = PinchConfig {
            span_hysteresis: distance,
        };
        assert_valid(GestureKind::Pinch, config.validate());
        self.config = config;
    }

    /// Scale factor since the reference span; `1.0` when idle.
    pub fn scale(&self) -> f64 {
        if self.focus.is_none() {
            return 1.0;
        }
        self.span / self.span_start * self.scale_shift
    }

    /// Centroid of the contacts driving the pinch.
    pub fn focus(&self) -> Option<Point> {
        self.focus
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
        self.focus = None;
        self.span = 0.0;
        self.span_start = 0.0;
        self.scale_shift = 1.0;
        self.span_distance = 0.0;
    }

    fn anchor(&mut self, sampled: Option<(Point, f64)>) {
        match sampled {
            Some((c, span)) => {
                self.focus = Some(c);
                self.span = span;
                self.span_start = span;
                self.scale_shift = 1.0;
            }
            None => {
                self.focus = None;
                self.span_distance = 0.0;
            }
        }
    }

    fn absorb(&mut self, (c, span): (Point, f64)) {
        self.scale_shift *= self.span / span;
        self.span = span;
        self.focus = Some(c);
    }

    fn contacts_changed(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let sampled = sample(event.target_touches);
        if !self.state.is_active() {
            self.anchor(sampled);
            return;
        }
        match sampled {
            Some(s) => self.absorb(s),
            None => {
                self.enter(GestureState::Ended, cx);
                self.reset();
            }
        }
    }

    fn touches_moved(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let Some((c, span)) = sample(event.target_touches) else {
            return;
        };
        if self.focus.is_none() {
            self.anchor(Some((c, span)));
            return;
        }
        let step = (span - self.span).abs();
        self.span = span;
        self.focus = Some(c);
        match self.state {
            GestureState::Possible => {
                self.span_distance += step;
                if self.span_distance > self.config.span_hysteresis {
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

impl Recognizer for PinchRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Pinch
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn is_tracking(&self) -> bool {
        self.state == GestureState::Possible && self.focus.is_some()
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
