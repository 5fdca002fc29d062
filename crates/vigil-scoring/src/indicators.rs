use vigil_core::constants::{MAX_RESPONSE, MIN_RESPONSE};

/// Whether a high answer means more stress or less.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// 5 = most stress.
    Risk,
    /// 5 = least stress. Inverted before aggregation.
    Protective,
}

/// One questionnaire item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub key: &'static str,
    pub polarity: Polarity,
}

impl Indicator {
    pub const fn risk(key: &'static str) -> Self {
        Self {
            key,
            polarity: Polarity::Risk,
        }
    }

    pub const fn protective(key: &'static str) -> Self {
        Self {
            key,
            polarity: Polarity::Protective,
        }
    }

    /// Map a 1–5 response onto 0.0–1.0, stress-oriented.
    ///
    /// Callers validate the range first.
    pub fn normalize(&self, response: u8) -> f64 {
        let span = f64::from(MAX_RESPONSE - MIN_RESPONSE);
        match self.polarity {
            Polarity::Risk => f64::from(response.saturating_sub(MIN_RESPONSE)) / span,
            Polarity::Protective => f64::from(MAX_RESPONSE.saturating_sub(response)) / span,
        }
    }
}

/// The caregiver burden questionnaire.
pub const BURNOUT_INDICATORS: [Indicator; 8] = [
    Indicator::risk("feel_overwhelmed"),
    Indicator::protective("time_for_self"),
    Indicator::risk("emotional_strain"),
    Indicator::risk("physical_exhaustion"),
    Indicator::protective("sleep_quality"),
    Indicator::risk("social_isolation"),
    Indicator::risk("financial_stress"),
    Indicator::risk("relationship_strain"),
];

/// The set of indicator keys an assessment may use.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    indicators: Vec<Indicator>,
}

impl IndicatorCatalog {
    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self { indicators }
    }

    /// The eight-item caregiver burnout questionnaire.
    pub fn burnout() -> Self {
        Self::new(BURNOUT_INDICATORS.to_vec())
    }

    pub fn get(&self, key: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.indicators.iter().map(|i| i.key)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::burnout()
    }
}
