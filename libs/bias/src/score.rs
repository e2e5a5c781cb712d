use std::fmt;

use crate::counter::TermTally;

/// Sentiment bias of one document. Positive values mean the sentiment differential favors
/// group B over group A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BiasScore {
    Defined(f64),
    /// Neither group was mentioned.
    Undefined,
}

impl BiasScore {
    pub fn from_tallies(a: &TermTally, b: &TermTally) -> Self {
        compute_bias(a.positive, a.negative, b.positive, b.negative, a.total, b.total)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            BiasScore::Defined(v) => Some(*v),
            BiasScore::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, BiasScore::Undefined)
    }
}

impl fmt::Display for BiasScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiasScore::Defined(v) => write!(f, "{}", v),
            BiasScore::Undefined => write!(f, "undefined"),
        }
    }
}

/// `((pos_b - neg_b) - (pos_a - neg_a)) / (total_a + total_b)`, undefined when both totals are
/// zero. Swapping the groups negates the score.
pub fn compute_bias(
    pos_a: usize,
    neg_a: usize,
    pos_b: usize,
    neg_b: usize,
    total_a: usize,
    total_b: usize,
) -> BiasScore {
    let denominator = total_a + total_b;
    if denominator == 0 {
        return BiasScore::Undefined;
    }
    let numerator = (pos_b as f64 - neg_b as f64) - (pos_a as f64 - neg_a as f64);
    BiasScore::Defined(numerator / denominator as f64)
}
