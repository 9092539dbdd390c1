// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element recognizer registry, event fan-out and arbitration.
//!
//! ## Dispatch
//!
//! [`GestureManager::dispatch`] hands a touch event to every recognizer
//! attached to the element, in attachment order. Every recognizer sees every
//! event; each one filters by its own rules.
//!
//! ## Arbitration
//!
//! Recognizers on the same element exclude each other unless they were
//! declared compatible with [`GestureManager::allow_simultaneous`]:
//!
//! - A recognizer is only allowed to begin or recognize while no
//!   incompatible recognizer on the element is in `BEGAN`/`CHANGED`. If it
//!   would, it enters `FAILED` instead.
//! - When a recognizer enters `BEGAN`, `CHANGED` or `RECOGNIZED`, every
//!   incompatible recognizer on the element that is active or tracking
//!   contacts is interrupted: active continuous gestures enter `CANCELLED`,
//!   the rest enter `FAILED`.
//! - A recognizer that failed or was cancelled this way ignores the rest of
//!   the touch sequence. It starts over once every contact has lifted or the
//!   sequence is cancelled.
//!
//! Compatibility is pairwise. Allowing `a`+`b` and `b`+`c` says nothing
//! about `a`+`c`.
//!
//! Callbacks run synchronously inside dispatch and must not dispatch events
//! themselves.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::pan::{PanConfig, PanRecognizer};
use crate::pinch::{PinchConfig, PinchRecognizer};
use crate::recognizer::{DispatchCx, Recognizer, Transitions};
use crate::rotation::{RotationConfig, RotationRecognizer};
use crate::state::{GestureKind, GestureState};
use crate::swipe::{SwipeConfig, SwipeRecognizer};
use crate::tap::{TapConfig, TapRecognizer};
use crate::touch::TouchEvent;
use crate::trace::GestureTrace;

/// Handle to an attached recognizer.
///
/// Ids are never reused by the manager that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerId(u64);

/// A recognizer with its callback, erased so one element can hold any mix
/// of kinds.
trait Slot: fmt::Debug {
    fn kind(&self) -> GestureKind;
    fn state(&self) -> GestureState;
    fn is_engaged(&self) -> bool;
    /// Returns the states entered and whether arbitration refused a start.
    fn dispatch(&mut self, event: &TouchEvent<'_>, may_begin: bool) -> (Transitions, bool);
    fn interrupt(&mut self) -> Transitions;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Attached<R> {
    recognizer: R,
    callback: Box<dyn FnMut(&R)>,
}

impl<R: fmt::Debug> fmt::Debug for Attached<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attached")
            .field("recognizer", &self.recognizer)
            .finish_non_exhaustive()
    }
}

impl<R: Recognizer> Slot for Attached<R> {
    fn kind(&self) -> GestureKind {
        self.recognizer.kind()
    }

    fn state(&self) -> GestureState {
        self.recognizer.state()
    }

    fn is_engaged(&self) -> bool {
        self.recognizer.is_engaged()
    }

    fn dispatch(&mut self, event: &TouchEvent<'_>, may_begin: bool) -> (Transitions, bool) {
        let mut cx = DispatchCx::new(may_begin, &mut *self.callback);
        self.recognizer.dispatch(event, &mut cx);
        let blocked = cx.was_blocked();
        (cx.into_entered(), blocked)
    }

    fn interrupt(&mut self) -> Transitions {
        let mut cx = DispatchCx::new(false, &mut *self.callback);
        self.recognizer.interrupt(&mut cx);
        cx.into_entered()
    }

    fn as_any(&self) -> &dyn Any {
        &self.recognizer
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.recognizer
    }
}

#[derive(Debug)]
struct Entry<E> {
    element: E,
    slot: Box<dyn Slot>,
}

fn pair_key(a: RecognizerId, b: RecognizerId) -> (RecognizerId, RecognizerId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Owns the recognizers attached to a set of elements.
///
/// `E` is the host's element key (a node id, a widget handle, …).
#[derive(Debug)]
pub struct GestureManager<E> {
    elements: HashMap<E, Vec<RecognizerId>>,
    entries: HashMap<RecognizerId, Entry<E>>,
    simultaneous: HashSet<(RecognizerId, RecognizerId)>,
    next_id: u64,
}

impl<E> Default for GestureManager<E> {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
            entries: HashMap::new(),
            simultaneous: HashSet::new(),
            next_id: 0,
        }
    }
}

impl<E: Copy + Eq + Hash> GestureManager<E> {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `recognizer` to `element`; `callback` runs on every state change.
    pub fn attach<R: Recognizer>(
        &mut self,
        element: E,
        recognizer: R,
        callback: impl FnMut(&R) + 'static,
    ) -> RecognizerId {
        let id = RecognizerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                element,
                slot: Box::new(Attached {
                    recognizer,
                    callback: Box::new(callback),
                }),
            },
        );
        self.elements.entry(element).or_default().push(id);
        id
    }

    /// Attach a [`PanRecognizer`].
    ///
    /// # Panics
    ///
    /// If `config` is invalid.
    #[track_caller]
    pub fn attach_pan(
        &mut self,
        element: E,
        config: PanConfig,
        callback: impl FnMut(&PanRecognizer) + 'static,
    ) -> RecognizerId {
        self.attach(element, PanRecognizer::new(config), callback)
    }

    /// Attach a [`TapRecognizer`].
    ///
    /// # Panics
    ///
    /// If `config` is invalid.
    #[track_caller]
    pub fn attach_tap(
        &mut self,
        element: E,
        config: TapConfig,
        callback: impl FnMut(&TapRecognizer) + 'static,
    ) -> RecognizerId {
        self.attach(element, TapRecognizer::new(config), callback)
    }

    /// Attach a [`SwipeRecognizer`].
    ///
    /// # Panics
    ///
    /// If `config` is invalid.
    #[track_caller]
    pub fn attach_swipe(
        &mut self,
        element: E,
        config: SwipeConfig,
        callback: impl FnMut(&SwipeRecognizer) + 'static,
    ) -> RecognizerId {
        self.attach(element, SwipeRecognizer::new(config), callback)
    }

    /// Attach a [`PinchRecognizer`].
    ///
    /// # Panics
    ///
    /// If `config` is invalid.
    #[track_caller]
    pub fn attach_pinch(
        &mut self,
        element: E,
        config: PinchConfig,
        callback: impl FnMut(&PinchRecognizer) + 'static,
    ) -> RecognizerId {
        self.attach(element, PinchRecognizer::new(config), callback)
    }

    /// Attach a [`RotationRecognizer`].
    ///
    /// # Panics
    ///
    /// If `config` is invalid.
    #[track_caller]
    pub fn attach_rotation(
        &mut self,
        element: E,
        config: RotationConfig,
        callback: impl FnMut(&RotationRecognizer) + 'static,
    ) -> RecognizerId {
        self.attach(element, RotationRecognizer::new(config), callback)
    }

    /// Remove one recognizer and every simultaneity pair naming it.
    ///
    /// Returns `false` if `id` is not attached.
    pub fn detach(&mut self, id: RecognizerId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        if let Some(ids) = self.elements.get_mut(&entry.element) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.elements.remove(&entry.element);
            }
        }
        self.simultaneous.retain(|&(a, b)| a != id && b != id);
        true
    }

    /// Remove every recognizer attached to `element`.
    ///
    /// Returns how many were removed.
    pub fn detach_all(&mut self, element: E) -> usize {
        let Some(ids) = self.elements.remove(&element) else {
            return 0;
        };
        for id in &ids {
            self.entries.remove(id);
        }
        self.simultaneous
            .retain(|(a, b)| !ids.contains(a) && !ids.contains(b));
        ids.len()
    }

    /// Let every pair in `ids` be active at the same time.
    ///
    /// Unknown ids are ignored.
    pub fn allow_simultaneous(&mut self, ids: &[RecognizerId]) {
        for (i, &a) in ids.iter().enumerate() {
            if !self.entries.contains_key(&a) {
                continue;
            }
            for &b in &ids[i + 1..] {
                if a != b && self.entries.contains_key(&b) {
                    self.simultaneous.insert(pair_key(a, b));
                }
            }
        }
    }

    /// Whether `a` and `b` were declared compatible.
    pub fn is_simultaneous(&self, a: RecognizerId, b: RecognizerId) -> bool {
        self.simultaneous.contains(&pair_key(a, b))
    }

    /// Borrow an attached recognizer as its concrete type.
    ///
    /// Returns `None` if `id` is unknown or `R` is not its type.
    pub fn get<R: Recognizer>(&self, id: RecognizerId) -> Option<&R> {
        self.entries.get(&id)?.slot.as_any().downcast_ref()
    }

    /// Mutably borrow an attached recognizer, e.g. to call its setters.
    pub fn get_mut<R: Recognizer>(&mut self, id: RecognizerId) -> Option<&mut R> {
        self.entries.get_mut(&id)?.slot.as_any_mut().downcast_mut()
    }

    /// Current state of a recognizer.
    pub fn state(&self, id: RecognizerId) -> Option<GestureState> {
        Some(self.entries.get(&id)?.slot.state())
    }

    /// Kind of a recognizer.
    pub fn kind(&self, id: RecognizerId) -> Option<GestureKind> {
        Some(self.entries.get(&id)?.slot.kind())
    }

    /// Element a recognizer is attached to.
    pub fn element(&self, id: RecognizerId) -> Option<E> {
        Some(self.entries.get(&id)?.element)
    }

    /// Recognizers attached to `element`, in attachment order.
    pub fn recognizers(&self, element: E) -> impl Iterator<Item = RecognizerId> + '_ {
        self.elements
            .get(&element)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    /// Total number of attached recognizers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Route `event` to the recognizers attached to `element`.
    pub fn dispatch(&mut self, element: E, event: &TouchEvent<'_>) {
        self.dispatch_with_trace(element, event, &mut ());
    }

    /// Like [`dispatch`](Self::dispatch), reporting every transition and
    /// arbitration decision to `trace`.
    pub fn dispatch_with_trace(
        &mut self,
        element: E,
        event: &TouchEvent<'_>,
        trace: &mut impl GestureTrace<E>,
    ) {
        let Some(ids) = self.elements.get(&element) else {
            return;
        };
        let ids: SmallVec<[RecognizerId; 8]> = ids.iter().copied().collect();
        for &id in &ids {
            let may_begin = !ids
                .iter()
                .any(|&other| other != id && self.excludes(id, other) && self.is_active(other));
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            let kind = entry.slot.kind();
            let (entered, blocked) = entry.slot.dispatch(event, may_begin);
            for &state in &entered {
                trace.transition(element, id, kind, state);
            }
            if blocked {
                trace.blocked(element, id);
            }
            if entered.iter().any(|s| s.is_claiming()) {
                self.arbitrate(element, id, &ids, trace);
            }
        }
    }

    fn excludes(&self, a: RecognizerId, b: RecognizerId) -> bool {
        !self.is_simultaneous(a, b)
    }

    fn is_active(&self, id: RecognizerId) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|e| e.slot.state().is_active())
    }

    /// Interrupt everything on `element` that `winner` excludes.
    fn arbitrate(
        &mut self,
        element: E,
        winner: RecognizerId,
        ids: &[RecognizerId],
        trace: &mut impl GestureTrace<E>,
    ) {
        for &other in ids {
            if other == winner || !self.excludes(winner, other) {
                continue;
            }
            let Some(entry) = self.entries.get_mut(&other) else {
                continue;
            };
            if !entry.slot.is_engaged() {
                continue;
            }
            let kind = entry.slot.kind();
            let entered = entry.slot.interrupt();
            trace.interrupted(element, winner, other);
            for &state in &entered {
                trace.transition(element, other, kind, state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;
    use crate::recognizer::test_util::points;
    use crate::state::GestureState::*;
    use crate::touch::TouchPhase;
    use crate::trace::{TraceLog, TraceRecord};

    const EL: u32 = 1;

    type Log = Rc<RefCell<Vec<(&'static str, GestureState)>>>;

    fn recorder<R: Recognizer>(log: &Log, name: &'static str) -> impl FnMut(&R) + 'static {
        let log = log.clone();
        move |r: &R| log.borrow_mut().push((name, r.state()))
    }

    fn send(m: &mut GestureManager<u32>, phase: TouchPhase, t: u64, contacts: &[(u64, f64, f64)]) {
        let touches = points(contacts);
        m.dispatch(EL, &TouchEvent::new(phase, &touches, t));
    }

    #[test]
    fn attach_and_detach_bookkeeping() {
        let mut m = GestureManager::new();
        let a = m.attach_pan(EL, PanConfig::default(), |_| {});
        let b = m.attach_tap(EL, TapConfig::default(), |_| {});
        let c = m.attach_pinch(2, PinchConfig::default(), |_| {});
        assert_eq!(m.len(), 3);
        assert_eq!(m.recognizers(EL).collect::<Vec<_>>(), [a, b]);
        assert_eq!(m.kind(b), Some(GestureKind::Tap));
        assert_eq!(m.element(c), Some(2));
        assert_eq!(m.state(a), Some(Possible));

        m.allow_simultaneous(&[a, b, c]);
        assert!(m.is_simultaneous(b, a));
        assert!(m.is_simultaneous(a, c));

        assert!(m.detach(a));
        assert!(!m.detach(a));
        assert!(!m.is_simultaneous(a, b));
        assert!(m.is_simultaneous(b, c));
        assert_eq!(m.recognizers(EL).collect::<Vec<_>>(), [b]);

        assert_eq!(m.detach_all(EL), 1);
        assert_eq!(m.recognizers(EL).count(), 0);
        assert!(!m.is_simultaneous(b, c));
        assert_eq!(m.detach_all(EL), 0);
        assert_eq!(m.len(), 1);

        assert!(m.detach(c));
        assert!(m.is_empty());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut m = GestureManager::new();
        let a = m.attach_pan(EL, PanConfig::default(), |_| {});
        m.detach(a);
        let b = m.attach_pan(EL, PanConfig::default(), |_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn typed_access_and_setters() {
        let mut m = GestureManager::new();
        let pan = m.attach_pan(EL, PanConfig::default(), |_| {});
        assert!(m.get::<TapRecognizer>(pan).is_none());
        m.get_mut::<PanRecognizer>(pan)
            .unwrap()
            .set_move_hysteresis(2.0);
        assert_eq!(
            m.get::<PanRecognizer>(pan).unwrap().config().move_hysteresis,
            2.0
        );
    }

    #[test]
    fn pan_scenario_through_manager() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        let pan = m.attach_pan(EL, PanConfig::default(), recorder(&log, "pan"));

        send(&mut m, TouchPhase::Began, 0, &[(1, 100.0, 100.0)]);
        send(&mut m, TouchPhase::Moved, 16, &[(1, 100.0, 108.0)]);
        assert_eq!(*log.borrow(), [("pan", Began), ("pan", Changed)]);
        let t = m.get::<PanRecognizer>(pan).unwrap().translation();
        assert_eq!((t.x, t.y), (0.0, 8.0));

        send(&mut m, TouchPhase::Moved, 32, &[(1, 105.0, 108.0)]);
        let t = m.get::<PanRecognizer>(pan).unwrap().translation();
        assert_eq!((t.x, t.y), (5.0, 8.0));

        send(&mut m, TouchPhase::Ended, 48, &[]);
        assert_eq!(log.borrow().last(), Some(&("pan", Ended)));
        assert_eq!(m.state(pan), Some(Possible));
    }

    #[test]
    fn events_for_other_elements_are_not_seen() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        m.attach_pan(2, PanConfig::default(), recorder(&log, "pan"));
        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 1, &[(1, 0.0, 50.0)]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn exclusive_pans_first_claim_wins() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        let a = m.attach_pan(EL, PanConfig::default(), recorder(&log, "a"));
        let b = m.attach_pan(EL, PanConfig::default(), recorder(&log, "b"));

        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 1, &[(1, 0.0, 10.0)]);
        assert_eq!(
            *log.borrow(),
            [("a", Began), ("a", Changed), ("b", Failed)]
        );
        assert_eq!(m.state(a), Some(Changed));
        assert_eq!(m.state(b), Some(Possible));

        // `b` sits out the rest of the sequence.
        log.borrow_mut().clear();
        send(&mut m, TouchPhase::Moved, 2, &[(1, 0.0, 20.0)]);
        send(&mut m, TouchPhase::Moved, 3, &[(1, 0.0, 40.0)]);
        assert_eq!(*log.borrow(), [("a", Changed), ("a", Changed)]);
        assert_eq!(m.state(a), Some(Changed));
        assert_eq!(m.state(b), Some(Possible));
        assert!(!m.get::<PanRecognizer>(b).unwrap().is_tracking());

        log.borrow_mut().clear();
        send(&mut m, TouchPhase::Ended, 4, &[]);
        assert_eq!(*log.borrow(), [("a", Ended)]);
    }

    #[test]
    fn loser_fails_once_per_touch_sequence() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        let pan = m.attach_pan(EL, PanConfig::default(), recorder(&log, "pan"));
        let pinch = m.attach_pinch(EL, PinchConfig::default(), recorder(&log, "pinch"));
        let pinch_failures = |log: &Log| {
            log.borrow()
                .iter()
                .filter(|&&e| e == ("pinch", Failed))
                .count()
        };

        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0), (2, 20.0, 0.0)]);
        for k in 1..=10 {
            let y = 10.0 * k as f64;
            send(&mut m, TouchPhase::Moved, k, &[(1, 0.0, y), (2, 20.0, y)]);
        }
        assert_eq!(m.state(pan), Some(Changed));
        assert_eq!(pinch_failures(&log), 1);
        assert_eq!(m.state(pinch), Some(Possible));

        // Once everything lifts the pinch competes again.
        send(&mut m, TouchPhase::Ended, 20, &[]);
        log.borrow_mut().clear();
        send(&mut m, TouchPhase::Began, 30, &[(1, 0.0, 0.0), (2, 20.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 40, &[(1, -10.0, 0.0), (2, 30.0, 0.0)]);
        assert_eq!(m.state(pinch), Some(Changed));
        assert_eq!(
            *log.borrow(),
            [("pinch", Began), ("pinch", Changed), ("pan", Failed)]
        );
    }

    #[test]
    fn simultaneous_pans_both_stay_active() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        let a = m.attach_pan(EL, PanConfig::default(), recorder(&log, "a"));
        let b = m.attach_pan(EL, PanConfig::default(), recorder(&log, "b"));
        m.allow_simultaneous(&[a, b]);

        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 1, &[(1, 0.0, 10.0)]);
        assert_eq!(
            *log.borrow(),
            [("a", Began), ("a", Changed), ("b", Began), ("b", Changed)]
        );
        assert_eq!(m.state(a), Some(Changed));
        assert_eq!(m.state(b), Some(Changed));
    }

    #[test]
    fn simultaneity_is_not_transitive() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        let a = m.attach_pan(EL, PanConfig::default(), recorder(&log, "a"));
        let b = m.attach_pan(EL, PanConfig::default(), recorder(&log, "b"));
        let c = m.attach_pan(EL, PanConfig::default(), recorder(&log, "c"));
        m.allow_simultaneous(&[a, b]);
        m.allow_simultaneous(&[b, c]);
        assert!(!m.is_simultaneous(a, c));

        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 1, &[(1, 0.0, 10.0)]);
        assert_eq!(m.state(a), Some(Changed));
        assert_eq!(m.state(b), Some(Changed));
        assert_eq!(m.state(c), Some(Possible));
        assert!(log.borrow().contains(&("c", Failed)));
    }

    #[test]
    fn tap_recognition_interrupts_tracking_pan() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        m.attach_tap(EL, TapConfig::default(), recorder(&log, "tap"));
        m.attach_pan(EL, PanConfig::default(), recorder(&log, "pan"));

        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 10, &[(1, 3.0, 0.0)]);
        send(&mut m, TouchPhase::Ended, 40, &[]);
        // The pan was tracking the same contact when the tap completed; it
        // had already reset by the time it saw the release.
        assert_eq!(*log.borrow(), [("tap", Recognized), ("pan", Failed)]);
    }

    #[test]
    fn pan_interrupts_pending_tap_and_trace_records_it() {
        let mut m = GestureManager::new();
        let pan = m.attach_pan(EL, PanConfig::default(), |_| {});
        let tap = m.attach_tap(EL, TapConfig::default(), |_| {});
        let mut trace = TraceLog::new();

        let down = points(&[(1, 0.0, 0.0)]);
        let moved = points(&[(1, 0.0, 30.0)]);
        m.dispatch_with_trace(EL, &TouchEvent::new(TouchPhase::Began, &down, 0), &mut trace);
        m.dispatch_with_trace(EL, &TouchEvent::new(TouchPhase::Moved, &moved, 5), &mut trace);

        let pan_entered = |state| TraceRecord::Transition {
            element: EL,
            id: pan,
            kind: GestureKind::Pan,
            state,
        };
        assert_eq!(
            trace.records(),
            [
                pan_entered(Began),
                pan_entered(Changed),
                TraceRecord::Interrupted {
                    element: EL,
                    winner: pan,
                    loser: tap,
                },
                TraceRecord::Transition {
                    element: EL,
                    id: tap,
                    kind: GestureKind::Tap,
                    state: Failed,
                },
            ]
        );
    }

    #[test]
    fn blocked_start_is_traced() {
        let mut m = GestureManager::new();
        let pan = m.attach_pan(EL, PanConfig::default(), |_| {});
        let pinch = m.attach_pinch(EL, PinchConfig::default(), |_| {});

        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 5, &[(1, 0.0, 20.0)]);
        assert_eq!(m.state(pan), Some(Changed));

        // A second finger lands; the pinch starts tracking under the pan.
        send(&mut m, TouchPhase::Began, 10, &[(1, 0.0, 20.0), (2, 20.0, 20.0)]);
        assert!(m.get::<PinchRecognizer>(pinch).unwrap().is_tracking());

        // Spreading around a fixed centroid leaves the pan quiet but would
        // start the pinch.
        let mut trace = TraceLog::new();
        let spread = points(&[(1, -10.0, 20.0), (2, 30.0, 20.0)]);
        m.dispatch_with_trace(
            EL,
            &TouchEvent::new(TouchPhase::Moved, &spread, 20),
            &mut trace,
        );
        assert_eq!(
            trace.records(),
            [
                TraceRecord::Transition {
                    element: EL,
                    id: pinch,
                    kind: GestureKind::Pinch,
                    state: Failed,
                },
                TraceRecord::Blocked {
                    element: EL,
                    id: pinch,
                },
            ]
        );
        assert_eq!(m.state(pan), Some(Changed));
    }

    #[test]
    fn input_failure_under_active_competitor_is_not_blocked() {
        let mut m = GestureManager::new();
        let pan = m.attach_pan(EL, PanConfig::default(), |_| {});
        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 5, &[(1, 0.0, 20.0)]);
        assert_eq!(m.state(pan), Some(Changed));

        // Too many fingers for a single-finger tap; that failure is about the
        // input, not the active pan.
        let tap = m.attach_tap(EL, TapConfig::default(), |_| {});
        let mut trace = TraceLog::new();
        let two = points(&[(1, 0.0, 20.0), (2, 20.0, 20.0)]);
        m.dispatch_with_trace(
            EL,
            &TouchEvent::new(TouchPhase::Began, &two, 10),
            &mut trace,
        );
        assert_eq!(
            trace.records(),
            [TraceRecord::Transition {
                element: EL,
                id: tap,
                kind: GestureKind::Tap,
                state: Failed,
            }]
        );
    }

    #[test]
    fn touch_cancel_cancels_tracking_recognizers_only() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        m.attach_pan(EL, PanConfig::default(), recorder(&log, "pan"));
        m.attach_pinch(EL, PinchConfig::default(), recorder(&log, "pinch"));

        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0)]);
        send(&mut m, TouchPhase::Moved, 1, &[(1, 0.0, 10.0)]);
        log.borrow_mut().clear();
        send(&mut m, TouchPhase::Cancelled, 2, &[]);
        // The pinch never saw two contacts, so it stays quiet.
        assert_eq!(*log.borrow(), [("pan", Cancelled)]);
    }

    #[test]
    fn pan_pinch_rotation_together() {
        let log: Log = Rc::default();
        let mut m = GestureManager::new();
        let pan = m.attach_pan(EL, PanConfig::default(), recorder(&log, "pan"));
        let pinch = m.attach_pinch(EL, PinchConfig::default(), recorder(&log, "pinch"));
        let rot = m.attach_rotation(EL, RotationConfig::default(), recorder(&log, "rot"));
        m.allow_simultaneous(&[pan, pinch, rot]);

        send(&mut m, TouchPhase::Began, 0, &[(1, 0.0, 0.0), (2, 20.0, 0.0)]);
        // Move apart, turn and drift at once.
        send(&mut m, TouchPhase::Moved, 10, &[(1, 0.0, 10.0), (2, 0.0, 50.0)]);
        assert_eq!(m.state(pan), Some(Changed));
        assert_eq!(m.state(pinch), Some(Changed));
        assert_eq!(m.state(rot), Some(Changed));
        assert!(!log.borrow().iter().any(|(_, s)| *s == Failed));

        send(&mut m, TouchPhase::Ended, 20, &[]);
        let ended: Vec<_> = log
            .borrow()
            .iter()
            .filter(|(_, s)| *s == Ended)
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(ended, vec!["pan", "pinch", "rot"]);
    }
}
