//! Ordered threshold tables
//!
//! Every banded score in the verification core is expressed as a list of
//! `(condition, value)` rules evaluated top to bottom. The first rule whose
//! condition holds wins; if none holds the table's fallback applies.
//!
//! Rule order is part of the contract. Overlapping bands (for example
//! `[2.0, 4.0]` before `[1.5, 4.5]`) rely on it.

/// Predicate over a single measured value
///
/// Bounds may be scaled at evaluation time so a table can be written in
/// relative terms (e.g. "60% of the expected duration") while the comparison
/// is still made against the raw measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cond {
    /// `x < bound`
    Below(f64),
    /// `x > bound`
    Above(f64),
    /// `low <= x <= high`
    Within(f64, f64),
    /// `x < low || x > high`
    Outside(f64, f64),
}

impl Cond {
    /// Test `x` against this condition with every bound multiplied by `scale`
    pub fn holds(self, x: f64, scale: f64) -> bool {
        match self {
            Cond::Below(bound) => x < bound * scale,
            Cond::Above(bound) => x > bound * scale,
            Cond::Within(low, high) => x >= low * scale && x <= high * scale,
            Cond::Outside(low, high) => x < low * scale || x > high * scale,
        }
    }
}

/// One row of a rule table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub when: Cond,
    pub value: f64,
}

impl Rule {
    pub const fn new(when: Cond, value: f64) -> Self {
        Self { when, value }
    }
}

/// Ordered rules plus the value used when no rule matches
#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    pub rules: &'static [Rule],
    pub otherwise: f64,
}

impl RuleTable {
    pub const fn new(rules: &'static [Rule], otherwise: f64) -> Self {
        Self { rules, otherwise }
    }

    /// Value of the first rule matching `x`
    pub fn eval(&self, x: f64) -> f64 {
        self.eval_scaled(x, 1.0)
    }

    /// Value of the first rule matching `x`, with rule bounds scaled
    pub fn eval_scaled(&self, x: f64, scale: f64) -> f64 {
        self.rules
            .iter()
            .find(|rule| rule.when.holds(x, scale))
            .map_or(self.otherwise, |rule| rule.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LADDER: RuleTable = RuleTable::new(
        &[
            Rule::new(Cond::Within(2.0, 4.0), 3.0),
            Rule::new(Cond::Within(1.0, 5.0), 2.0),
            Rule::new(Cond::Below(0.5), -1.0),
        ],
        0.0,
    );

    #[test]
    fn test_first_match_wins() {
        // 3.0 satisfies both Within rules; the first one is taken
        assert_eq!(LADDER.eval(3.0), 3.0);
        assert_eq!(LADDER.eval(4.5), 2.0);
        assert_eq!(LADDER.eval(0.1), -1.0);
        assert_eq!(LADDER.eval(0.7), 0.0);
        assert_eq!(LADDER.eval(9.0), 0.0);
    }

    #[test]
    fn test_bounds_inclusive_and_strict() {
        assert!(Cond::Within(2.0, 4.0).holds(2.0, 1.0));
        assert!(Cond::Within(2.0, 4.0).holds(4.0, 1.0));
        assert!(!Cond::Below(2.0).holds(2.0, 1.0));
        assert!(!Cond::Above(2.0).holds(2.0, 1.0));
        assert!(!Cond::Outside(1.0, 2.0).holds(1.0, 1.0));
        assert!(Cond::Outside(1.0, 2.0).holds(2.5, 1.0));
    }

    #[test]
    fn test_scaled_bounds() {
        assert!(Cond::Below(0.6).holds(2.9, 5.0));
        assert!(!Cond::Below(0.6).holds(3.0, 5.0));
        assert!(Cond::Above(1.3).holds(6.6, 5.0));
    }

    #[test]
    fn test_nan_falls_through() {
        assert_eq!(LADDER.eval(f64::NAN), 0.0);
    }
}
