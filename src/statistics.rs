//! Streaming (single pass) statistics over intervals.
//!
//! Every accumulator here is updated once per accepted record in O(1) and never
//! revisits earlier records. The genome index keeps one accumulator per
//! chromosome and one for the whole file.
//!
//! # Standard deviation
//!
//! The running standard deviation accumulates the squared deviation of each new
//! observation from the mean *as it stands after adding that observation*, and
//! reports `sqrt(sse / count)`. This is not Welford's recurrence and it drifts
//! from the exact population standard deviation; the output is kept as is,
//! since changing the formula changes reported numbers.

use num_traits::{Bounded, ToPrimitive, Zero};

use crate::{
    ranges::IntervalRecord,
    traits::{Interval, StatisticsAccumulator, ValuedData, ValuedInterval},
    Position,
};

/// Running count, min, max, mean and standard deviation over values of type `T`.
///
/// With no observations, `min` is the largest representable `T` and `max` is
/// zero, so an empty accumulator never claims a real extremum; `mean` and
/// `stdev` are zero.
#[derive(Clone, Debug, PartialEq)]
pub struct RunningStats<T> {
    count: usize,
    min: T,
    max: T,
    sum: f64,
    sse: f64,
    mean: f64,
    stdev: f64,
}

impl<T> Default for RunningStats<T>
where
    T: Bounded + Zero + ToPrimitive + PartialOrd + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RunningStats<T>
where
    T: Bounded + Zero + ToPrimitive + PartialOrd + Copy,
{
    pub fn new() -> Self {
        Self {
            count: 0,
            min: T::max_value(),
            max: T::zero(),
            sum: 0.0,
            sse: 0.0,
            mean: 0.0,
            stdev: 0.0,
        }
    }

    /// Add one observation.
    #[inline]
    pub fn push(&mut self, x: T) {
        self.count += 1;
        if x > self.max {
            self.max = x;
        }
        if x < self.min {
            self.min = x;
        }
        let x = x.to_f64().unwrap_or(f64::NAN);
        let n = self.count as f64;
        self.sum += x;
        self.mean = self.sum / n;
        self.sse += (x - self.mean).powi(2);
        self.stdev = (self.sse / n).sqrt();
    }

    pub fn count(&self) -> usize {
        self.count
    }
    pub fn min(&self) -> T {
        self.min
    }
    pub fn max(&self) -> T {
        self.max
    }
    pub fn sum(&self) -> f64 {
        self.sum
    }
    pub fn mean(&self) -> f64 {
        self.mean
    }
    pub fn stdev(&self) -> f64 {
        self.stdev
    }
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Read access to the summary shared by all accumulators, for reporting.
pub trait SummaryStatistics {
    fn width(&self) -> &RunningStats<Position>;
    /// The value aggregates, for accumulators that track a value.
    fn value(&self) -> Option<&RunningStats<f64>> {
        None
    }
}

/// Width statistics, for any [`Interval`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntervalStatistics {
    pub width: RunningStats<Position>,
}

impl<I: Interval> StatisticsAccumulator<I> for IntervalStatistics {
    fn update(&mut self, item: &I) {
        self.width.push(item.width());
    }
    fn count(&self) -> usize {
        self.width.count()
    }
}

impl SummaryStatistics for IntervalStatistics {
    fn width(&self) -> &RunningStats<Position> {
        &self.width
    }
}

/// Width and value statistics, for records with a numeric value.
///
/// NaN values are left out of the value aggregates (but still count toward the
/// width aggregates). Besides the running value summary, this tracks the
/// most permissive (largest value) and most stringent (smallest value)
/// record; ties keep the first record seen.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueStatistics<U> {
    pub width: RunningStats<Position>,
    pub value: RunningStats<f64>,
    most_permissive: Option<IntervalRecord<U>>,
    most_stringent: Option<IntervalRecord<U>>,
}

impl<U> Default for ValueStatistics<U> {
    fn default() -> Self {
        Self {
            width: RunningStats::new(),
            value: RunningStats::new(),
            most_permissive: None,
            most_stringent: None,
        }
    }
}

impl<U> ValueStatistics<U> {
    /// The record with the largest value.
    pub fn most_permissive(&self) -> Option<&IntervalRecord<U>> {
        self.most_permissive.as_ref()
    }

    /// The record with the smallest value.
    pub fn most_stringent(&self) -> Option<&IntervalRecord<U>> {
        self.most_stringent.as_ref()
    }

    /// The mean of all non-NaN values.
    pub fn mean_value(&self) -> f64 {
        self.value.mean()
    }
}

impl<U> SummaryStatistics for ValueStatistics<U> {
    fn width(&self) -> &RunningStats<Position> {
        &self.width
    }
    fn value(&self) -> Option<&RunningStats<f64>> {
        Some(&self.value)
    }
}

impl<U: ValuedData + Clone> StatisticsAccumulator<IntervalRecord<U>> for ValueStatistics<U> {
    fn update(&mut self, item: &IntervalRecord<U>) {
        self.width.push(item.width());

        let value = item.value();
        if value.is_nan() {
            return;
        }
        self.value.push(value);

        let more_permissive = self
            .most_permissive
            .as_ref()
            .map_or(true, |current| value > current.value());
        if more_permissive {
            self.most_permissive = Some(item.clone());
        }
        let more_stringent = self
            .most_stringent
            .as_ref()
            .map_or(true, |current| value < current.value());
        if more_stringent {
            self.most_stringent = Some(item.clone());
        }
    }
    fn count(&self) -> usize {
        self.width.count()
    }
}
