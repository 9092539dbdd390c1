// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch contacts and the event payload handed to recognizers.
//!
//! A [`TouchEvent`] mirrors what a host platform delivers for each
//! begin/move/end/cancel notification: every contact currently on the
//! surface, plus the subset whose origin is the element the event is routed
//! to. Recognizers in this crate only look at
//! [`target_touches`](TouchEvent::target_touches).
//!
//! For [`TouchPhase::Ended`] the target list holds the contacts that are
//! *still down*; the lifted ones are already gone.

use kurbo::Point;

/// Stable identifier of one contact for as long as it touches the surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

/// One active contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchPoint {
    /// Identifier of the contact.
    pub id: TouchId,
    /// Position in page coordinates.
    pub pos: Point,
}

impl TouchPoint {
    /// Create a contact at `(x, y)`.
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: TouchId(id),
            pos: Point::new(x, y),
        }
    }
}

/// Which platform notification a [`TouchEvent`] represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// One or more contacts went down.
    Began,
    /// One or more contacts moved.
    Moved,
    /// One or more contacts lifted.
    Ended,
    /// The platform invalidated the touch sequence.
    Cancelled,
}

/// A touch notification for one element.
#[derive(Copy, Clone, Debug)]
pub struct TouchEvent<'a> {
    /// Kind of notification.
    pub phase: TouchPhase,
    /// Every active contact on the surface.
    pub touches: &'a [TouchPoint],
    /// Active contacts that started on the target element.
    pub target_touches: &'a [TouchPoint],
    /// Host timestamp in milliseconds; only differences are meaningful.
    pub timestamp: u64,
}

impl<'a> TouchEvent<'a> {
    /// Build an event where every contact belongs to the target element.
    pub fn new(phase: TouchPhase, touches: &'a [TouchPoint], timestamp: u64) -> Self {
        Self {
            phase,
            touches,
            target_touches: touches,
            timestamp,
        }
    }

    /// Build an event with an explicit on-element subset.
    pub fn with_targets(
        phase: TouchPhase,
        touches: &'a [TouchPoint],
        target_touches: &'a [TouchPoint],
        timestamp: u64,
    ) -> Self {
        Self {
            phase,
            touches,
            target_touches,
            timestamp,
        }
    }

    /// Number of contacts on the target element.
    pub fn count(&self) -> usize {
        self.target_touches.len()
    }
}
