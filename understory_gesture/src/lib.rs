// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: multi-touch gesture recognizers with per-element arbitration.
//!
//! This crate turns a stream of raw touch events into gesture lifecycles. It is
//! split into two layers:
//!
//! - **Recognizers** ([`PanRecognizer`], [`TapRecognizer`], [`SwipeRecognizer`],
//!   [`PinchRecognizer`], [`RotationRecognizer`]): state machines that track
//!   contact geometry (centroid, span, pair angle), apply hysteresis and move
//!   through [`GestureState`]s.
//! - **Manager** ([`GestureManager`]): a registry of recognizers keyed by host
//!   element. It fans each event out in attachment order and keeps competing
//!   recognizers from being active together unless they were declared
//!   compatible.
//!
//! The host routes platform touch events (begin, move, end, cancel) to the
//! manager for the element they target. Each [`TouchEvent`] carries every
//! active contact plus the subset that started on that element; recognizers
//! work from the latter.
//!
//! ## Lifecycle
//!
//! Every recognizer starts in [`GestureState::Possible`]. Continuous gestures
//! (pan, pinch, rotation) go `BEGAN → CHANGED* → ENDED`; discrete ones (tap,
//! swipe) go straight to `RECOGNIZED`. Any attempt can end in `FAILED` or
//! `CANCELLED`. Terminal states are reported to the callback and then reset
//! to `POSSIBLE` before dispatch returns.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use understory_gesture::{GestureManager, GestureState, PanConfig, PinchConfig};
//! use understory_gesture::{Recognizer, TouchEvent, TouchPhase, TouchPoint};
//!
//! #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
//! struct Node(u32);
//!
//! let moved = Rc::new(RefCell::new(Vec::new()));
//! let mut gestures = GestureManager::new();
//!
//! let sink = moved.clone();
//! let pan = gestures.attach_pan(Node(1), PanConfig::default(), move |pan| {
//!     if pan.state() == GestureState::Changed {
//!         sink.borrow_mut().push(pan.translation());
//!     }
//! });
//! let pinch = gestures.attach_pinch(Node(1), PinchConfig::default(), |_| {});
//! gestures.allow_simultaneous(&[pan, pinch]);
//!
//! let down = [TouchPoint::new(1, 100.0, 100.0)];
//! let dragged = [TouchPoint::new(1, 100.0, 108.0)];
//! gestures.dispatch(Node(1), &TouchEvent::new(TouchPhase::Began, &down, 0));
//! gestures.dispatch(Node(1), &TouchEvent::new(TouchPhase::Moved, &dragged, 16));
//!
//! assert_eq!(gestures.state(pan), Some(GestureState::Changed));
//! assert_eq!(moved.borrow()[0].y, 8.0);
//! ```
//!
//! ## Arbitration
//!
//! See the [`manager`] module for the exact rules. In short, a recognizer may
//! only begin while no incompatible recognizer on its element is active, and
//! beginning or recognizing pushes incompatible competitors out.
//! [`GestureManager::dispatch_with_trace`] reports each decision to a
//! [`GestureTrace`].
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Geometry comes from Kurbo, so one
//! of the `std` (default) or `libm` features must be enabled.

#![no_std]

extern crate alloc;

mod error;
pub mod geometry;
pub mod manager;
mod pan;
mod pinch;
mod recognizer;
mod rotation;
mod state;
mod swipe;
mod tap;
mod touch;
mod trace;

pub use error::ConfigError;
pub use manager::{GestureManager, RecognizerId};
pub use pan::{DEFAULT_MOVE_HYSTERESIS, PanConfig, PanRecognizer};
pub use pinch::{PinchConfig, PinchRecognizer};
pub use recognizer::{DispatchCx, Recognizer, Transitions};
pub use rotation::{RotationConfig, RotationRecognizer};
pub use state::{GestureKind, GestureState, SwipeDirection};
pub use swipe::{SwipeConfig, SwipeRecognizer};
pub use tap::{TapConfig, TapRecognizer};
pub use touch::{TouchEvent, TouchId, TouchPhase, TouchPoint};
pub use trace::{GestureTrace, TraceLog, TraceRecord};
