//! Automation curves: sparse, time-ordered control points with linear
//! interpolation.
//!
//! A curve always holds at least one point. Points are sorted by time, no two
//! points sit closer than [`POINT_MERGE_TOLERANCE`], and every stored value
//! lies inside `[min_value, max_value]`. Values are clamped on insertion, so
//! reads never need to clamp.

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Two insertions closer than this (in seconds) address the same point.
pub const POINT_MERGE_TOLERANCE: f64 = 0.01;

/// A single control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Time in seconds from the start of the session (>= 0).
    pub time: f64,
    /// Parameter value at this time.
    pub value: f64,
}

impl ControlPoint {
    /// Creates a new control point.
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// A parameter that changes over a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRecord", into = "CurveRecord")]
pub struct AutomationCurve {
    points: Vec<ControlPoint>,
    min_value: f64,
    max_value: f64,
    default_value: f64,
}

/// Serialized form of a curve; rebuilt through [`AutomationCurve::from_points`]
/// so a hand-edited file cannot break the curve invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurveRecord {
    min_value: f64,
    max_value: f64,
    default_value: f64,
    #[serde(default)]
    points: Vec<ControlPoint>,
}

impl TryFrom<CurveRecord> for AutomationCurve {
    type Error = SpecError;

    fn try_from(record: CurveRecord) -> Result<Self, Self::Error> {
        AutomationCurve::from_points(
            record.min_value,
            record.max_value,
            record.default_value,
            record.points,
        )
    }
}

impl From<AutomationCurve> for CurveRecord {
    fn from(curve: AutomationCurve) -> Self {
        Self {
            min_value: curve.min_value,
            max_value: curve.max_value,
            default_value: curve.default_value,
            points: curve.points,
        }
    }
}

impl AutomationCurve {
    /// Curve over compile-time bounds. Only called with the preset
    /// constants; panics if `min > max` or any bound is non-finite.
    pub(crate) fn new(min_value: f64, max_value: f64, default_value: f64) -> Self {
        match Self::try_new(min_value, max_value, default_value) {
            Ok(curve) => curve,
            Err(e) => panic!("invalid automation curve bounds: {e}"),
        }
    }

    /// Creates a curve holding a single default point at `t = 0`.
    ///
    /// Rejects non-finite bounds and `min > max`. The default is clamped into
    /// range.
    pub fn try_new(min_value: f64, max_value: f64, default_value: f64) -> Result<Self, SpecError> {
        for (field, value) in [
            ("min_value", min_value),
            ("max_value", max_value),
            ("default_value", default_value),
        ] {
            if !value.is_finite() {
                return Err(SpecError::non_finite(field, value));
            }
        }
        if min_value > max_value {
            return Err(SpecError::InvalidRange {
                field: "curve",
                min: min_value,
                max: max_value,
            });
        }

        let default_value = default_value.clamp(min_value, max_value);
        Ok(Self {
            points: vec![ControlPoint::new(0.0, default_value)],
            min_value,
            max_value,
            default_value,
        })
    }

    /// Rebuilds a curve from an arbitrary list of points.
    ///
    /// Points are inserted one by one with [`AutomationCurve::add_point`]
    /// semantics. When `points` is non-empty the default point is replaced by
    /// the supplied ones; an empty list keeps the default point.
    pub fn from_points(
        min_value: f64,
        max_value: f64,
        default_value: f64,
        points: impl IntoIterator<Item = ControlPoint>,
    ) -> Result<Self, SpecError> {
        let mut curve = Self::try_new(min_value, max_value, default_value)?;
        let mut replaced_default = false;
        for point in points {
            if !replaced_default {
                curve.points.clear();
                replaced_default = true;
            }
            curve.add_point(point.time, point.value)?;
        }
        Ok(curve)
    }

    /// Lower bound for values.
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Upper bound for values.
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Value used for new curves and appended tail points.
    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Control points, sorted ascending by time.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Number of control points (always at least 1).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inserts a point, or overwrites the value of an existing point within
    /// [`POINT_MERGE_TOLERANCE`] of `time`. Returns the point's index.
    pub fn add_point(&mut self, time: f64, value: f64) -> Result<usize, SpecError> {
        if !time.is_finite() {
            return Err(SpecError::non_finite("time", time));
        }
        if !value.is_finite() {
            return Err(SpecError::non_finite("value", value));
        }

        let time = time.max(0.0);
        let clamped = value.clamp(self.min_value, self.max_value);
        if clamped != value {
            tracing::warn!(
                value,
                clamped,
                min = self.min_value,
                max = self.max_value,
                "control point value clamped into curve range"
            );
        }

        if let Some(index) = self
            .points
            .iter()
            .position(|p| (p.time - time).abs() < POINT_MERGE_TOLERANCE)
        {
            self.points[index].value = clamped;
            return Ok(index);
        }

        let index = self.points.partition_point(|p| p.time < time);
        self.points.insert(index, ControlPoint::new(time, clamped));
        Ok(index)
    }

    /// Removes the point at `index`. The last remaining point is never removed.
    pub fn remove_point(&mut self, index: usize) -> Option<ControlPoint> {
        if self.points.len() <= 1 || index >= self.points.len() {
            return None;
        }
        Some(self.points.remove(index))
    }

    /// Moves an existing point to a new time and value.
    ///
    /// Behaves like removing the point and re-adding it, except that a curve
    /// with a single point keeps that point.
    pub fn move_point(&mut self, index: usize, time: f64, value: f64) -> Result<usize, SpecError> {
        let len = self.points.len();
        if index >= len {
            return Err(SpecError::PointIndex { index, len });
        }
        if !time.is_finite() {
            return Err(SpecError::non_finite("time", time));
        }
        if !value.is_finite() {
            return Err(SpecError::non_finite("value", value));
        }

        let removed = self.points.remove(index);
        match self.add_point(time, value) {
            Ok(new_index) => Ok(new_index),
            Err(e) => {
                self.points.insert(index, removed);
                Err(e)
            }
        }
    }

    /// Interpolated value at `time` (seconds).
    ///
    /// Before the first point the first value holds, after the last point the
    /// last value holds, and in between the bracketing pair is interpolated
    /// linearly.
    pub fn value_at(&self, time: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return self.default_value,
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First index whose time is strictly greater than `time`; both
        // neighbours exist because of the boundary checks above.
        let upper = self.points.partition_point(|p| p.time <= time);
        let p1 = self.points[upper - 1];
        let p2 = self.points[upper];

        if time == p1.time {
            return p1.value;
        }
        let t = (time - p1.time) / (p2.time - p1.time);
        p1.value + t * (p2.value - p1.value)
    }

    /// Time of the last point.
    pub fn duration(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.time)
    }

    /// Mean of all point values.
    pub fn average_value(&self) -> f64 {
        if self.points.is_empty() {
            return self.default_value;
        }
        self.points.iter().map(|p| p.value).sum::<f64>() / self.points.len() as f64
    }

    /// Returns true if every point carries the same value.
    pub fn is_flat(&self) -> bool {
        self.points
            .windows(2)
            .all(|pair| pair[0].value == pair[1].value)
    }

    /// Stretches the curve so its last point sits at `duration`.
    ///
    /// A single-point curve gains a tail point with the default value. Any
    /// intermediate points that now lie at or beyond the new end are merged
    /// into it.
    pub fn set_duration(&mut self, duration: f64) -> Result<(), SpecError> {
        if !duration.is_finite() {
            return Err(SpecError::non_finite("duration", duration));
        }
        let duration = duration.max(0.0);

        if self.points.len() < 2 {
            self.add_point(duration, self.default_value)?;
            return Ok(());
        }

        if let Some(last) = self.points.pop() {
            self.points
                .retain(|p| p.time < duration - POINT_MERGE_TOLERANCE);
            self.add_point(duration, last.value)?;
        }
        Ok(())
    }
}
