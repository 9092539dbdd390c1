// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan: continuous translation of the contact centroid.
//!
//! ## Behavior
//!
//! - While [`Possible`](GestureState::Possible), centroid movement is summed
//!   into a path length. Once it exceeds
//!   [`move_hysteresis`](PanConfig::move_hysteresis) the recognizer enters
//!   `BEGAN` and `CHANGED` in the same dispatch.
//! - Moves with a contact count outside `[min_touches, max_touches]` are
//!   ignored.
//! - [`translation`](PanRecognizer::translation) is measured from the
//!   centroid at the last contact-set change before the pan began. Contacts
//!   added or lifted mid-gesture fold their centroid jump into a shift, so
//!   the reported value never jumps.
//! - Exceeding `max_touches`, or dropping below `min_touches`, ends the pan.
//! - After losing to a competing recognizer (blocked or interrupted), the
//!   remaining contacts are ignored until all of them lift.
//!
//! ```
//! use understory_gesture::{PanConfig, PanRecognizer};
//!
//! let mut pan = PanRecognizer::new(PanConfig {
//!     min_touches: 2,
//!     ..PanConfig::default()
//! });
//! pan.set_move_hysteresis(10.0);
//! assert_eq!(pan.config().min_touches, 2);
//! assert_eq!(pan.translation(), kurbo::Vec2::ZERO);
//! ```

use kurbo::{Point, Vec2};

use crate::error::{ConfigError, assert_valid, check_range, check_threshold};
use crate::geometry::centroid;
use crate::recognizer::{DispatchCx, Recognizer};
use crate::state::{GestureKind, GestureState};
use crate::touch::{TouchEvent, TouchPhase};

/// Default centroid path length a pan must travel before it begins.
pub const DEFAULT_MOVE_HYSTERESIS: f64 = 6.0;

/// Pan parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanConfig {
    /// Fewest contacts that can drive the pan.
    pub min_touches: usize,
    /// Most contacts that can drive the pan.
    pub max_touches: usize,
    /// Path length the centroid must exceed before the pan begins.
    pub move_hysteresis: f64,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            min_touches: 1,
            max_touches: usize::MAX,
            move_hysteresis: DEFAULT_MOVE_HYSTERESIS,
        }
    }
}

impl PanConfig {
    /// Check the parameters without panicking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(self.min_touches, self.max_touches)?;
        check_threshold("move_hysteresis", self.move_hysteresis, true)
    }
}

/// Recognizes a pan.
#[derive(Clone, Debug)]
pub struct PanRecognizer {
    config: PanConfig,
    state: GestureState,
    touch_count: usize,
    centroid: Option<Point>,
    centroid_start: Point,
    centroid_shift: Vec2,
    centroid_distance: f64,
    awaiting_release: bool,
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self::new(PanConfig::default())
    }
}

impl PanRecognizer {
    /// Create a pan recognizer.
    ///
    /// # Panics
    ///
    /// If `config` fails [`PanConfig::validate`].
    #[track_caller]
    pub fn new(config: PanConfig) -> Self {
        assert_valid(GestureKind::Pan, config.validate());
        Self {
            config,
            state: GestureState::Possible,
            touch_count: 0,
            centroid: None,
            centroid_start: Point::ORIGIN,
            centroid_shift: Vec2::ZERO,
            centroid_distance: 0.0,
            awaiting_release: false,
        }
    }

    /// Current parameters.
    pub fn config(&self) -> &PanConfig {
        &self.config
    }

    /// Set the fewest contacts that can drive the pan.
    ///
    /// # Panics
    ///
    /// Outside [`GestureState::Possible`], or if the value is invalid.
    #[track_caller]
    pub fn set_minimum_touch_count(&mut self, count: usize) {
        self.update_config(PanConfig {
            min_touches: count,
            ..self.config
        });
    }

    /// Set the most contacts that can drive the pan.
    ///
    /// # Panics
    ///
    /// Outside [`GestureState::Possible`], or if the value is invalid.
    #[track_caller]
    pub fn set_maximum_touch_count(&mut self, count: usize) {
        self.update_config(PanConfig {
            max_touches: count,
            ..self.config
        });
    }

    /// Set the path length required before the pan begins.
    ///
    /// # Panics
    ///
    /// Outside [`GestureState::Possible`], or if the value is invalid.
    #[track_caller]
    pub fn set_move_hysteresis(&mut self, distance: f64) {
        self.update_config(PanConfig {
            move_hysteresis: distance,
            ..self.config
        });
    }

    /// Translation of the centroid since the reference point.
    pub fn translation(&self) -> Vec2 {
        match self.centroid {
            Some(c) => c - self.centroid_start + self.centroid_shift,
            None => Vec2::ZERO,
        }
    }

    /// Current centroid of the tracked contacts.
    pub fn centroid(&self) -> Option<Point> {
        self.centroid
    }

    /// Path length travelled by the centroid while waiting to begin.
    pub fn travelled(&self) -> f64 {
        self.centroid_distance
    }

    /// Number of contacts in the last dispatched event.
    pub fn touch_count(&self) -> usize {
        self.touch_count
    }

    #[track_caller]
    fn update_config(&mut self, config: PanConfig) {
        assert!(
            self.state == GestureState::Possible,
            "pan configuration can only change while POSSIBLE (state is {:?})",
            self.state
        );
        assert_valid(GestureKind::Pan, config.validate());
        self.config = config;
    }

    fn in_range(&self, count: usize) -> bool {
        (self.config.min_touches..=self.config.max_touches).contains(&count)
    }

    fn enter(&mut self, to: GestureState, cx: &mut DispatchCx<'_, Self>) {
        cx.advance(&mut self.state, to);
        cx.notify(self);
    }

    fn reset(&mut self) {
        self.state = GestureState::Possible;
        self.centroid = None;
        self.centroid_start = Point::ORIGIN;
        self.centroid_shift = Vec2::ZERO;
        self.centroid_distance = 0.0;
    }

    /// Give up on the current contacts after losing to a competitor.
    fn abandon(&mut self, to: GestureState, cx: &mut DispatchCx<'_, Self>) {
        self.enter(to, cx);
        self.reset();
        self.awaiting_release = true;
    }

    /// Point the reference at the current contact set while waiting to begin.
    fn anchor(&mut self, at: Option<Point>) {
        self.centroid = at;
        self.centroid_start = at.unwrap_or(Point::ORIGIN);
        self.centroid_shift = Vec2::ZERO;
    }

    /// Switch to a new contact set without moving the reported translation.
    fn absorb(&mut self, next: Option<Point>) {
        if let (Some(prev), Some(next)) = (self.centroid, next) {
            self.centroid_shift += prev - next;
        }
        self.centroid = next;
    }

    fn touches_began(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let count = event.count();
        self.touch_count = count;
        let next = centroid(event.target_touches);
        if self.state.is_active() {
            self.absorb(next);
            if count > self.config.max_touches {
                self.enter(GestureState::Ended, cx);
                self.reset();
            }
        } else if count > self.config.max_touches {
            self.reset();
        } else {
            self.anchor(next);
        }
    }

    fn touches_moved(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let count = event.count();
        self.touch_count = count;
        if !self.in_range(count) {
            return;
        }
        let Some(next) = centroid(event.target_touches) else {
            return;
        };
        let Some(prev) = self.centroid.replace(next) else {
            // Tracking restarts here, e.g. after an interruption.
            self.anchor(Some(next));
            return;
        };
        let step = prev.distance(next);
        match self.state {
            GestureState::Possible => {
                self.centroid_distance += step;
                if self.centroid_distance > self.config.move_hysteresis {
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

    fn touches_ended(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        let count = event.count();
        self.touch_count = count;
        let next = centroid(event.target_touches);
        if self.state.is_active() {
            if count > 0 && count >= self.config.min_touches {
                self.absorb(next);
            } else {
                self.enter(GestureState::Ended, cx);
                self.reset();
            }
        } else if count == 0 {
            self.reset();
        } else {
            self.anchor(next);
        }
    }

    fn touches_cancelled(&mut self, cx: &mut DispatchCx<'_, Self>) {
        self.touch_count = 0;
        if self.is_engaged() {
            self.enter(GestureState::Cancelled, cx);
        }
        self.reset();
    }
}

impl Recognizer for PanRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Pan
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn is_tracking(&self) -> bool {
        self.state == GestureState::Possible && self.centroid.is_some()
    }

    fn dispatch(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
        if self.awaiting_release {
            self.touch_count = event.count();
            self.awaiting_release = match event.phase {
                TouchPhase::Ended => event.count() > 0,
                TouchPhase::Cancelled => false,
                TouchPhase::Began | TouchPhase::Moved => true,
            };
            return;
        }
        match event.phase {
            TouchPhase::Began => self.touches_began(event, cx),
            TouchPhase::Moved => self.touches_moved(event, cx),
            TouchPhase::Ended => self.touches_ended(event, cx),
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
