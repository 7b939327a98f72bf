use serde::{Deserialize, Serialize};

/// Percentile bucket, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    ExtremeLow,
    Low,
    BelowAverage,
    Average,
    AboveAverage,
    High,
    ExtremeHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Low,
    Neutral,
    High,
}

impl Category {
    pub fn side(&self) -> Side {
        match self {
            Category::ExtremeLow | Category::Low | Category::BelowAverage => Side::Low,
            Category::Average => Side::Neutral,
            Category::AboveAverage | Category::High | Category::ExtremeHigh => Side::High,
        }
    }

    /// Distance from AVERAGE: 0 for AVERAGE up to 3 for the extremes
    pub fn depth(&self) -> u8 {
        match self {
            Category::Average => 0,
            Category::BelowAverage | Category::AboveAverage => 1,
            Category::Low | Category::High => 2,
            Category::ExtremeLow | Category::ExtremeHigh => 3,
        }
    }

    /// Categories where a low percentile is the notable result
    pub fn is_low_side(&self) -> bool {
        self.side() == Side::Low
    }

    /// Whether a player classified as `self` meets a `required` category.
    ///
    /// AVERAGE only matches itself. Other categories match anything at least
    /// as deep on the same side, so HIGH accepts HIGH and EXTREME_HIGH while
    /// the extremes need an exact match. `min_category` lowers the floor on
    /// the same side, e.g. HIGH with a minimum of ABOVE_AVERAGE.
    pub fn satisfies(&self, required: Category, min_category: Option<Category>) -> bool {
        if required == Category::Average {
            return *self == Category::Average;
        }
        if self.side() != required.side() {
            return false;
        }

        let floor = match min_category {
            Some(min) if min.side() == required.side() => min.depth().min(required.depth()),
            _ => required.depth(),
        };
        self.depth() >= floor
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::ExtremeLow => "EXTREME_LOW",
            Category::Low => "LOW",
            Category::BelowAverage => "BELOW_AVERAGE",
            Category::Average => "AVERAGE",
            Category::AboveAverage => "ABOVE_AVERAGE",
            Category::High => "HIGH",
            Category::ExtremeHigh => "EXTREME_HIGH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Category::*;
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ExtremeHigh, ExtremeHigh, None, true)]
    #[case(High, ExtremeHigh, None, false)]
    #[case(High, High, None, true)]
    #[case(ExtremeHigh, High, None, true)]
    #[case(AboveAverage, High, None, false)]
    #[case(AboveAverage, High, Some(AboveAverage), true)]
    #[case(BelowAverage, Low, Some(BelowAverage), true)]
    #[case(ExtremeLow, Low, None, true)]
    #[case(Average, Low, Some(BelowAverage), false)]
    #[case(High, Average, None, false)]
    #[case(Average, Average, None, true)]
    #[case(Low, High, Some(Low), false)]
    #[case(ExtremeLow, ExtremeLow, None, true)]
    #[case(Low, ExtremeLow, None, false)]
    fn test_satisfies(
        #[case] actual: Category,
        #[case] required: Category,
        #[case] min_category: Option<Category>,
        #[case] expected: bool,
    ) {
        assert_eq!(actual.satisfies(required, min_category), expected);
    }

    #[test]
    fn test_low_side_categories() {
        assert!(ExtremeLow.is_low_side());
        assert!(BelowAverage.is_low_side());
        assert!(!Average.is_low_side());
        assert!(!High.is_low_side());
    }
}
