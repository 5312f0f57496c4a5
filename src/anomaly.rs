//! Rule-based anomaly flags over a track snapshot.
//!
//! Rules are independent and stateless. Every call re-evaluates every track, so a
//! track that crosses a threshold is reported again on each later cycle for as
//! long as the condition holds (level-triggered).

use std::collections::BTreeMap;

use crate::tracker::{Timestamp, Track, TrackId};

/// Separator used when several rules fire for the same track.
pub const REASON_SEPARATOR: &str = "; ";

/// A single anomaly rule: zero or one reason per track.
pub trait AnomalyRule {
    fn evaluate(&self, track: &Track, now: Timestamp) -> Option<String>;
}

/// Fires when a track has existed for at least `loiter_time` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loitering {
    pub loiter_time: f64,
}

impl Loitering {
    pub fn new(loiter_time: f64) -> Self {
        Self { loiter_time }
    }
}

impl Default for Loitering {
    fn default() -> Self {
        Self { loiter_time: 10.0 }
    }
}

impl AnomalyRule for Loitering {
    fn evaluate(&self, track: &Track, now: Timestamp) -> Option<String> {
        let duration = track.age(now);
        (duration >= self.loiter_time).then(|| format!("loitering:{duration:.1}s"))
    }
}

/// Ordered collection of rules applied to every track.
///
/// The built-in loitering rule is held apart from added rules so its threshold can
/// be retuned in place; added rules are only removed by replacing the set.
#[derive(Default)]
pub struct RuleSet {
    loitering: Option<Loitering>,
    rules: Vec<Box<dyn AnomalyRule + Send + Sync>>,
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("loitering", &self.loitering)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rule set: loitering only.
    pub fn loitering(loiter_time: f64) -> Self {
        Self {
            loitering: Some(Loitering::new(loiter_time)),
            rules: Vec::new(),
        }
    }

    /// Built-in loitering rule, if the set has one.
    pub fn loiter_rule(&self) -> Option<&Loitering> {
        self.loitering.as_ref()
    }

    /// Retune the built-in loitering rule. Added rules are left untouched, and a set
    /// without the built-in rule stays without it.
    pub fn set_loiter_time(&mut self, loiter_time: f64) {
        if let Some(rule) = self.loitering.as_mut() {
            rule.loiter_time = loiter_time;
        }
    }

    pub fn with_rule<R>(mut self, rule: R) -> Self
    where
        R: AnomalyRule + Send + Sync + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        usize::from(self.loitering.is_some()) + self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> impl Iterator<Item = &dyn AnomalyRule> {
        self.loitering
            .iter()
            .map(|rule| rule as &dyn AnomalyRule)
            .chain(self.rules.iter().map(|rule| rule.as_ref() as &dyn AnomalyRule))
    }

    /// Evaluate every rule against every track, confirmed or not.
    ///
    /// Tracks with no firing rule are absent from the result.
    pub fn evaluate<'a, I>(&self, tracks: I, now: Timestamp) -> BTreeMap<TrackId, String>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let mut anomalies = BTreeMap::new();
        for track in tracks {
            let reasons: Vec<String> = self
                .iter()
                .filter_map(|rule| rule.evaluate(track, now))
                .collect();
            if !reasons.is_empty() {
                anomalies.insert(track.id, reasons.join(REASON_SEPARATOR));
            }
        }
        anomalies
    }
}

/// Loitering check over a snapshot: `track_id -> "loitering:{secs}s"`.
pub fn evaluate<'a, I>(tracks: I, now: Timestamp, loiter_time: f64) -> BTreeMap<TrackId, String>
where
    I: IntoIterator<Item = &'a Track>,
{
    RuleSet::loitering(loiter_time).evaluate(tracks, now)
}
