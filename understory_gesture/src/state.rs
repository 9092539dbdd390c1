// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture lifecycle states and the edges between them.
//!
//! ```text
//!              ┌──────────► RECOGNIZED            (discrete)
//!              │
//! POSSIBLE ──► BEGAN ──► CHANGED ──► ENDED        (continuous)
//!                          │  ▲
//!                          └──┘
//!
//! any state ──► FAILED | CANCELLED
//! ```
//!
//! Terminal states are momentary: the recognizer reports them through its
//! callback, resets its working state and is back in [`GestureState::Possible`]
//! before dispatch returns.

/// Lifecycle state of a recognizer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureState {
    /// Idle, or tracking contacts that have not satisfied the gesture yet.
    #[default]
    Possible,
    /// A continuous gesture has started.
    Began,
    /// A continuous gesture updated.
    Changed,
    /// A continuous gesture finished normally.
    Ended,
    /// A discrete gesture was satisfied.
    Recognized,
    /// The input stopped matching the gesture.
    Failed,
    /// The input was invalidated.
    Cancelled,
}

impl GestureState {
    /// `true` for states a gesture attempt finishes in.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Ended | Self::Recognized | Self::Failed | Self::Cancelled
        )
    }

    /// `true` while a continuous gesture is in progress.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }

    /// `true` for states that claim the element against other recognizers.
    pub fn is_claiming(self) -> bool {
        matches!(self, Self::Began | Self::Changed | Self::Recognized)
    }

    /// Whether `self → next` is an allowed edge.
    ///
    /// Terminal states only lead back to [`Possible`](Self::Possible); that
    /// reset is silent and never reported through a callback.
    pub fn can_transition_to(self, next: Self) -> bool {
        use GestureState::*;
        match (self, next) {
            (_, Failed | Cancelled) => !self.is_terminal(),
            (Possible, Began | Recognized) => true,
            (Began | Changed, Changed | Ended) => true,
            (Ended | Recognized | Failed | Cancelled, Possible) => true,
            _ => false,
        }
    }
}

/// Which recognizer a [`Recognizer`](crate::Recognizer) is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Discrete tap or multi-tap.
    Tap,
    /// Continuous translation.
    Pan,
    /// Continuous scale.
    Pinch,
    /// Continuous rotation.
    Rotation,
    /// Discrete directional flick.
    Swipe,
}

impl GestureKind {
    /// `true` for kinds that go through `BEGAN`/`CHANGED`/`ENDED`.
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Pan | Self::Pinch | Self::Rotation)
    }
}

/// Direction reported by a swipe.
///
/// Page coordinates grow downward, so positive `y` is [`Down`](Self::Down).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Toward smaller `y`.
    Up,
    /// Toward larger `y`.
    Down,
    /// Toward smaller `x`.
    Left,
    /// Toward larger `x`.
    Right,
}
