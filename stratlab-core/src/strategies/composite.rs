//! Weighted composite — a regime-aware vote across member strategies.
//!
//! Weights are a pure function of the bar series: at index `i` they are the
//! weights computed at the most recent rebalance index
//! `r = i - i % rebalance_period`. At `r` each member's base weight is scaled
//! by `1 + |trend strength|` if the member is trend-following, or by
//! `1 + volatility` if it is an oscillator, and the vector is renormalised to
//! sum to 1. Before `lookback` bars of history exist the base weights are used.
//!
//! Vote: Σ ±w over members (Long = +w, Short = −w, None = 0);
//! total > 0.5 → Long, < −0.5 → Short, else None.

use super::{
    Breakout, MaCrossover, ParameterSpec, RsiThreshold, Strategy, StrategyInfo, StrategyParams,
};
use crate::domain::{BarSeries, Signal};
use crate::indicators::{trend_strength, volatility};

const REBALANCE_PERIOD: usize = 20;
const LOOKBACK: usize = 20;
const VOTE_THRESHOLD: f64 = 0.5;

const TREND_KEYWORDS: &[&str] = &["crossover", "ma", "macd", "breakout", "trend"];
const OSCILLATOR_KEYWORDS: &[&str] = &["rsi", "bollinger", "reversion", "oscillator"];

/// How a member reacts to the market regime, inferred from its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStyle {
    TrendFollowing,
    Oscillator,
    Neutral,
}

impl MemberStyle {
    pub fn classify(id: &str) -> Self {
        let id = id.to_ascii_lowercase();
        if TREND_KEYWORDS.iter().any(|k| id.contains(k)) {
            MemberStyle::TrendFollowing
        } else if OSCILLATOR_KEYWORDS.iter().any(|k| id.contains(k)) {
            MemberStyle::Oscillator
        } else {
            MemberStyle::Neutral
        }
    }
}

struct Member {
    strategy: Box<dyn Strategy>,
    style: MemberStyle,
    params: StrategyParams,
}

pub struct Composite {
    members: Vec<Member>,
    base_weights: Vec<f64>,
}

impl Composite {
    /// Members with uniform base weights. Each runs with its schema defaults.
    pub fn new(members: Vec<Box<dyn Strategy>>) -> Self {
        let n = members.len();
        let uniform = if n == 0 { 0.0 } else { 1.0 / n as f64 };
        Self::with_weights(members, vec![uniform; n])
    }

    /// Members with explicit base weights, normalised to sum to 1.
    ///
    /// Missing weights default to 0; extra weights are ignored.
    pub fn with_weights(members: Vec<Box<dyn Strategy>>, weights: Vec<f64>) -> Self {
        let members: Vec<Member> = members
            .into_iter()
            .map(|strategy| Member {
                style: MemberStyle::classify(&strategy.info().id),
                params: strategy.default_parameters(),
                strategy,
            })
            .collect();
        let mut base_weights: Vec<f64> = (0..members.len())
            .map(|i| weights.get(i).copied().filter(|w| w.is_finite()).unwrap_or(0.0))
            .collect();
        normalize(&mut base_weights);
        Self {
            members,
            base_weights,
        }
    }

    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.strategy.info().id).collect()
    }

    pub fn base_weights(&self) -> &[f64] {
        &self.base_weights
    }

    /// Effective member weights at `index`.
    pub fn weights_at(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Vec<f64> {
        let period = params.period("rebalance_period", REBALANCE_PERIOD);
        let lookback = params.period("lookback", LOOKBACK);
        if period == 0 {
            return self.base_weights.clone();
        }

        let rebalance_index = index - index % period;
        let close = bars.close();
        let trend = trend_strength(close, lookback, rebalance_index);
        let vol = volatility(close, lookback, rebalance_index);
        if trend.is_nan() || vol.is_nan() {
            return self.base_weights.clone();
        }

        let mut weights: Vec<f64> = self
            .members
            .iter()
            .zip(&self.base_weights)
            .map(|(member, &w)| match member.style {
                MemberStyle::TrendFollowing => w * (1.0 + trend.abs()),
                MemberStyle::Oscillator => w * (1.0 + vol),
                MemberStyle::Neutral => w,
            })
            .collect();
        normalize(&mut weights);
        weights
    }
}

impl Default for Composite {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MaCrossover),
            Box::new(RsiThreshold),
            Box::new(Breakout),
        ])
    }
}

impl std::fmt::Debug for Composite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composite")
            .field("members", &self.member_ids())
            .field("base_weights", &self.base_weights)
            .finish()
    }
}

impl Strategy for Composite {
    fn info(&self) -> StrategyInfo {
        StrategyInfo::new(
            "composite",
            "Weighted Composite",
            "Weighted vote across member strategies, re-weighted by trend and volatility regime.",
        )
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("rebalance_period", "Rebalance Period", REBALANCE_PERIOD as f64)
                .range(5.0, 100.0, 1.0),
            ParameterSpec::number("lookback", "Regime Lookback", LOOKBACK as f64)
                .range(5.0, 100.0, 1.0),
        ]
    }

    fn execute(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Signal {
        if self.members.is_empty() || index >= bars.len() {
            return Signal::None;
        }
        let weights = self.weights_at(bars, index, params);
        let total: f64 = self
            .members
            .iter()
            .zip(&weights)
            .map(|(member, &w)| match member.strategy.execute(bars, index, &member.params) {
                Signal::Long => w,
                Signal::Short => -w,
                Signal::None => 0.0,
            })
            .sum();

        if total > VOTE_THRESHOLD {
            Signal::Long
        } else if total < -VOTE_THRESHOLD {
            Signal::Short
        } else {
            Signal::None
        }
    }
}

/// Scale to sum 1 in place. An all-zero vector is left untouched.
fn normalize(weights: &mut [f64]) {
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        for w in weights.iter_mut() {
            *w /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    /// Always returns the same signal.
    struct Fixed(&'static str, Signal);

    impl Strategy for Fixed {
        fn info(&self) -> StrategyInfo {
            StrategyInfo::new(self.0, self.0, "")
        }
        fn parameters(&self) -> Vec<ParameterSpec> {
            Vec::new()
        }
        fn execute(&self, _: &BarSeries, _: usize, _: &StrategyParams) -> Signal {
            self.1
        }
    }

    fn fixed(id: &'static str, signal: Signal) -> Box<dyn Strategy> {
        Box::new(Fixed(id, signal))
    }

    #[test]
    fn classify_by_id() {
        assert_eq!(MemberStyle::classify("ma_crossover"), MemberStyle::TrendFollowing);
        assert_eq!(MemberStyle::classify("macd"), MemberStyle::TrendFollowing);
        assert_eq!(MemberStyle::classify("breakout"), MemberStyle::TrendFollowing);
        assert_eq!(MemberStyle::classify("rsi"), MemberStyle::Oscillator);
        assert_eq!(MemberStyle::classify("bollinger_reversion"), MemberStyle::Oscillator);
        assert_eq!(MemberStyle::classify("custom"), MemberStyle::Neutral);
    }

    #[test]
    fn majority_vote() {
        let bars = make_series(&[100.0; 5]);
        let params = StrategyParams::new();
        let two_long = Composite::new(vec![
            fixed("a", Signal::Long),
            fixed("b", Signal::Long),
            fixed("c", Signal::Short),
        ]);
        // 1/3 + 1/3 - 1/3 = 1/3 → not above 0.5
        assert_eq!(two_long.execute(&bars, 4, &params), Signal::None);

        let all_short = Composite::new(vec![fixed("a", Signal::Short), fixed("b", Signal::Short)]);
        assert_eq!(all_short.execute(&bars, 4, &params), Signal::Short);

        let mostly_long = Composite::new(vec![
            fixed("a", Signal::Long),
            fixed("b", Signal::Long),
            fixed("c", Signal::None),
        ]);
        assert_eq!(mostly_long.execute(&bars, 4, &params), Signal::Long);
    }

    #[test]
    fn weights_are_uniform_before_lookback() {
        let composite = Composite::default();
        let bars = make_series(&[100.0, 101.0, 102.0]);
        let weights = composite.weights_at(&bars, 2, &StrategyParams::new());
        for w in weights {
            assert_approx(w, 1.0 / 3.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn trend_regime_favours_trend_followers() {
        // Straight line: trend strength 1, volatility ≈ 0 (constant step, shrinking return).
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = make_series(&closes);
        let composite = Composite::new(vec![fixed("trend", Signal::None), fixed("rsi", Signal::None)]);
        let params = StrategyParams::new()
            .with("rebalance_period", 10.0)
            .with("lookback", 5.0);
        let weights = composite.weights_at(&bars, 25, &params);
        // Rebalanced at 20: 0.5·2 vs 0.5·(1 + vol)
        assert!(weights[0] > weights[1]);
        assert_approx(weights.iter().sum::<f64>(), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn weights_hold_between_rebalances() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 7) % 11) as f64 - i as f64 * 0.3)
            .collect();
        let bars = make_series(&closes);
        let composite = Composite::default();
        let params = StrategyParams::new()
            .with("rebalance_period", 10.0)
            .with("lookback", 5.0);
        let at_20 = composite.weights_at(&bars, 20, &params);
        for i in 21..30 {
            assert_eq!(composite.weights_at(&bars, i, &params), at_20);
        }
    }

    #[test]
    fn empty_composite_is_none() {
        let bars = make_series(&[100.0; 3]);
        let composite = Composite::new(Vec::new());
        assert_eq!(composite.execute(&bars, 2, &StrategyParams::new()), Signal::None);
    }

    #[test]
    fn explicit_weights_are_normalised() {
        let composite = Composite::with_weights(
            vec![fixed("a", Signal::Long), fixed("b", Signal::Short)],
            vec![3.0, 1.0],
        );
        assert_approx(composite.base_weights()[0], 0.75, DEFAULT_EPSILON);
        let bars = make_series(&[100.0; 3]);
        // 0.75 - 0.25 = 0.5 → not strictly above the threshold
        assert_eq!(composite.execute(&bars, 2, &StrategyParams::new()), Signal::None);
    }
}
