use serde::{Serialize, Serializer};

/// Advisory tier attached to a family's final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
    ReduceDiscretionary,
    MaintainSavings,
    Healthy,
}

impl Recommendation {
    pub const MAINTAIN_THRESHOLD: f64 = 50.0;
    pub const HEALTHY_THRESHOLD: f64 = 70.0;

    /// Band lower bounds are inclusive: 50 maps to `MaintainSavings`, 70 to `Healthy`.
    pub fn for_score(score: f64) -> Self {
        if score < Self::MAINTAIN_THRESHOLD {
            Self::ReduceDiscretionary
        } else if score < Self::HEALTHY_THRESHOLD {
            Self::MaintainSavings
        } else {
            Self::Healthy
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::ReduceDiscretionary => {
                "Focus on reducing discretionary spending and increasing savings."
            }
            Self::MaintainSavings => "Maintain consistent savings; reduce high-interest loans.",
            Self::Healthy => "Good financial health! Continue current habits.",
        }
    }

    pub const fn tier(self) -> u8 {
        match self {
            Self::ReduceDiscretionary => 1,
            Self::MaintainSavings => 2,
            Self::Healthy => 3,
        }
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}
