// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contact-set metrics shared by the recognizers.
//!
//! All functions are pure. Float work that needs `sqrt`/`atan2` goes through
//! Kurbo so the crate builds with either its `std` or `libm` feature.

use core::f64::consts::{PI, TAU};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::touch::TouchPoint;

/// Arithmetic mean position of `touches`, or `None` when empty.
pub fn centroid(touches: &[TouchPoint]) -> Option<Point> {
    if touches.is_empty() {
        return None;
    }
    let sum = touches
        .iter()
        .fold(Vec2::ZERO, |acc, t| acc + t.pos.to_vec2());
    let n = touches.len() as f64;
    Some((sum / n).to_point())
}

/// Mean distance of `touches` from `center`.
///
/// Returns `0.0` for an empty set.
pub fn mean_span(touches: &[TouchPoint], center: Point) -> f64 {
    if touches.is_empty() {
        return 0.0;
    }
    let total: f64 = touches.iter().map(|t| t.pos.distance(center)).sum();
    let n = touches.len() as f64;
    total / n
}

/// Angle in radians of the vector from `from` to `to`, in `(-π, π]`.
pub fn pair_angle(from: Point, to: Point) -> f64 {
    (to - from).atan2()
}

/// Fold an angle difference into `(-π, π]`.
///
/// Used to unwrap successive [`pair_angle`] samples across the ±π seam.
/// Non-finite input yields `0.0`.
pub fn wrap_angle(delta: f64) -> f64 {
    if !delta.is_finite() {
        return 0.0;
    }
    let wrapped = (delta + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
