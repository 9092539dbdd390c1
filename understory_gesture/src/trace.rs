// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observation hook for gesture dispatch.
//!
//! The manager keeps no history of what happened during a dispatch. When
//! debugging recognizer conflicts it helps to see every transition and every
//! arbitration decision in order; pass a [`GestureTrace`] to
//! [`GestureManager::dispatch_with_trace`](crate::GestureManager::dispatch_with_trace)
//! to receive them. `()` ignores everything; [`TraceLog`] records it.
//!
//! ```
//! use understory_gesture::{GestureManager, GestureState, PanConfig, TapConfig};
//! use understory_gesture::{TouchEvent, TouchPhase, TouchPoint, TraceLog, TraceRecord};
//!
//! let mut gestures = GestureManager::new();
//! let pan = gestures.attach_pan(1_u32, PanConfig::default(), |_| {});
//! let tap = gestures.attach_tap(1, TapConfig::default(), |_| {});
//!
//! let mut log = TraceLog::new();
//! let down = [TouchPoint::new(7, 0.0, 0.0)];
//! let moved = [TouchPoint::new(7, 0.0, 20.0)];
//! gestures.dispatch_with_trace(1, &TouchEvent::new(TouchPhase::Began, &down, 0), &mut log);
//! gestures.dispatch_with_trace(1, &TouchEvent::new(TouchPhase::Moved, &moved, 16), &mut log);
//!
//! // The pan began and pushed the pending tap out.
//! assert!(log.records().contains(&TraceRecord::Interrupted { element: 1, winner: pan, loser: tap }));
//! assert_eq!(log.states_of(tap).collect::<Vec<_>>(), [GestureState::Failed]);
//! ```

use alloc::vec::Vec;

use crate::manager::RecognizerId;
use crate::state::{GestureKind, GestureState};

/// A callback sink for dispatch tracing.
pub trait GestureTrace<E> {
    /// A recognizer entered `state`.
    fn transition(&mut self, element: E, id: RecognizerId, kind: GestureKind, state: GestureState);

    /// `winner` claimed `element` and `loser` was forced to give up.
    ///
    /// The loser's resulting transitions follow as separate
    /// [`transition`](Self::transition) calls.
    fn interrupted(&mut self, element: E, winner: RecognizerId, loser: RecognizerId);

    /// `id` failed while another recognizer held `element`.
    fn blocked(&mut self, element: E, id: RecognizerId);
}

impl<E> GestureTrace<E> for () {
    fn transition(&mut self, _: E, _: RecognizerId, _: GestureKind, _: GestureState) {}

    fn interrupted(&mut self, _: E, _: RecognizerId, _: RecognizerId) {}

    fn blocked(&mut self, _: E, _: RecognizerId) {}
}

/// One entry in a [`TraceLog`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceRecord<E> {
    /// See [`GestureTrace::transition`].
    Transition {
        /// Element the event was routed to.
        element: E,
        /// Recognizer that changed state.
        id: RecognizerId,
        /// Its kind.
        kind: GestureKind,
        /// The state it entered.
        state: GestureState,
    },
    /// See [`GestureTrace::interrupted`].
    Interrupted {
        /// Element the event was routed to.
        element: E,
        /// Recognizer that claimed the element.
        winner: RecognizerId,
        /// Recognizer that was forced out.
        loser: RecognizerId,
    },
    /// See [`GestureTrace::blocked`].
    Blocked {
        /// Element the event was routed to.
        element: E,
        /// Recognizer that was kept from starting.
        id: RecognizerId,
    },
}

/// Records every trace callback in order.
#[derive(Clone, Debug)]
pub struct TraceLog<E> {
    records: Vec<TraceRecord<E>>,
}

impl<E> Default for TraceLog<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<E> TraceLog<E> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn records(&self) -> &[TraceRecord<E>] {
        &self.records
    }

    /// States entered by `id`, in order.
    pub fn states_of(&self, id: RecognizerId) -> impl Iterator<Item = GestureState> + '_ {
        self.records.iter().filter_map(move |r| match *r {
            TraceRecord::Transition { id: rid, state, .. } if rid == id => Some(state),
            _ => None,
        })
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl<E> GestureTrace<E> for TraceLog<E> {
    fn transition(&mut self, element: E, id: RecognizerId, kind: GestureKind, state: GestureState) {
        self.records.push(TraceRecord::Transition {
            element,
            id,
            kind,
            state,
        });
    }

    fn interrupted(&mut self, element: E, winner: RecognizerId, loser: RecognizerId) {
        self.records.push(TraceRecord::Interrupted {
            element,
            winner,
            loser,
        });
    }

    fn blocked(&mut self, element: E, id: RecognizerId) {
        self.records.push(TraceRecord::Blocked { element, id });
    }
}
