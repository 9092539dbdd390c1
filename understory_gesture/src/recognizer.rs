// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recognizer interface and its per-dispatch context.
//!
//! Every gesture kind implements [`Recognizer`]: one [`dispatch`](Recognizer::dispatch)
//! entry point that branches on [`TouchPhase`](crate::TouchPhase), plus an
//! [`interrupt`](Recognizer::interrupt) hook the manager uses to settle
//! conflicts. State changes are reported through the [`DispatchCx`] the caller
//! passes in, which also carries the arbitration verdict for this event.
//!
//! The recognizers in this crate are driven by a
//! [`GestureManager`](crate::GestureManager), which builds the context and
//! calls `dispatch` itself. Implementing the trait is how a host adds a
//! gesture of its own; the manager arbitrates it like any built-in one:
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//! use understory_gesture::{DispatchCx, GestureKind, GestureManager, GestureState};
//! use understory_gesture::{Recognizer, TouchEvent, TouchPhase, TouchPoint};
//!
//! /// Recognizes as soon as a single contact lands.
//! #[derive(Debug, Default)]
//! struct Press {
//!     state: GestureState,
//! }
//!
//! impl Recognizer for Press {
//!     fn kind(&self) -> GestureKind {
//!         GestureKind::Tap
//!     }
//!
//!     fn state(&self) -> GestureState {
//!         self.state
//!     }
//!
//!     fn is_tracking(&self) -> bool {
//!         false
//!     }
//!
//!     fn dispatch(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>) {
//!         if event.phase != TouchPhase::Began || event.count() != 1 {
//!             return;
//!         }
//!         let to = if cx.may_begin() {
//!             GestureState::Recognized
//!         } else {
//!             cx.mark_blocked();
//!             GestureState::Failed
//!         };
//!         cx.advance(&mut self.state, to);
//!         cx.notify(self);
//!         self.state = GestureState::Possible;
//!     }
//!
//!     fn interrupt(&mut self, _cx: &mut DispatchCx<'_, Self>) {}
//! }
//!
//! let presses = Rc::new(Cell::new(0));
//! let mut gestures = GestureManager::new();
//! let sink = presses.clone();
//! let press = gestures.attach(7_u32, Press::default(), move |p: &Press| {
//!     if p.state() == GestureState::Recognized {
//!         sink.set(sink.get() + 1);
//!     }
//! });
//!
//! let down = [TouchPoint::new(1, 10.0, 10.0)];
//! gestures.dispatch(7, &TouchEvent::new(TouchPhase::Began, &down, 0));
//! assert_eq!(presses.get(), 1);
//! assert_eq!(gestures.state(press), Some(GestureState::Possible));
//! ```

use core::any::Any;
use core::fmt;

use smallvec::SmallVec;

use crate::state::{GestureKind, GestureState};
use crate::touch::TouchEvent;

/// States a recognizer entered during one dispatch, in order.
pub type Transitions = SmallVec<[GestureState; 4]>;

/// Context handed to a recognizer for one dispatch.
///
/// It carries the arbitration verdict ([`may_begin`](Self::may_begin)),
/// delivers state changes to the registered callback and remembers which
/// states were entered so the manager can arbitrate afterwards.
pub struct DispatchCx<'a, R> {
    may_begin: bool,
    blocked: bool,
    notify: &'a mut dyn FnMut(&R),
    entered: Transitions,
}

impl<R> fmt::Debug for DispatchCx<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchCx")
            .field("may_begin", &self.may_begin)
            .field("blocked", &self.blocked)
            .field("entered", &self.entered)
            .finish_non_exhaustive()
    }
}

impl<'a, R> DispatchCx<'a, R> {
    /// Create a context that reports state changes to `notify`.
    ///
    /// With `may_begin == false` the recognizer must not leave
    /// [`GestureState::Possible`]; it fails instead.
    pub fn new(may_begin: bool, notify: &'a mut dyn FnMut(&R)) -> Self {
        Self {
            may_begin,
            blocked: false,
            notify,
            entered: Transitions::new(),
        }
    }

    /// Whether the recognizer may start or complete its gesture now.
    pub fn may_begin(&self) -> bool {
        self.may_begin
    }

    /// Record that the recognizer would have begun or recognized but was
    /// refused by [`may_begin`](Self::may_begin).
    ///
    /// Call it just before entering [`GestureState::Failed`] for that reason,
    /// and only then; failures caused by the input itself are not blocks.
    pub fn mark_blocked(&mut self) {
        debug_assert!(!self.may_begin, "blocked while allowed to begin");
        self.blocked = true;
    }

    /// Whether [`mark_blocked`](Self::mark_blocked) was called.
    pub fn was_blocked(&self) -> bool {
        self.blocked
    }

    /// Move `state` to `to` and record the transition.
    ///
    /// Call [`notify`](Self::notify) right after, once the recognizer's
    /// derived values are up to date.
    pub fn advance(&mut self, state: &mut GestureState, to: GestureState) {
        debug_assert!(
            state.can_transition_to(to),
            "illegal gesture transition {state:?} -> {to:?}"
        );
        *state = to;
        self.entered.push(to);
    }

    /// Invoke the registered callback with the recognizer.
    pub fn notify(&mut self, recognizer: &R) {
        (self.notify)(recognizer);
    }

    /// States entered so far during this dispatch.
    pub fn entered(&self) -> &[GestureState] {
        &self.entered
    }

    /// Consume the context, returning the entered states.
    pub fn into_entered(self) -> Transitions {
        self.entered
    }
}

/// A gesture recognizer bound to one element.
///
/// Implementations keep their configuration and working state private,
/// reset every accumulator whenever they return to
/// [`GestureState::Possible`] and change state only from inside
/// [`dispatch`](Self::dispatch) or [`interrupt`](Self::interrupt).
pub trait Recognizer: Any + fmt::Debug {
    /// Which gesture this recognizer detects.
    fn kind(&self) -> GestureKind;

    /// Current state; consistent with the last dispatched event.
    fn state(&self) -> GestureState;

    /// `true` while in [`GestureState::Possible`] with contacts that could
    /// still complete the gesture.
    fn is_tracking(&self) -> bool;

    /// Process one touch event.
    fn dispatch(&mut self, event: &TouchEvent<'_>, cx: &mut DispatchCx<'_, Self>)
    where
        Self: Sized;

    /// Abandon the current attempt because a competing recognizer claimed
    /// the element.
    ///
    /// Active continuous gestures enter [`GestureState::Cancelled`], anything
    /// else that is tracking enters [`GestureState::Failed`]. Idle
    /// recognizers are left alone.
    fn interrupt(&mut self, cx: &mut DispatchCx<'_, Self>)
    where
        Self: Sized;

    /// `true` when the recognizer is active or tracking.
    fn is_engaged(&self) -> bool {
        self.state().is_active() || self.is_tracking()
    }
}
