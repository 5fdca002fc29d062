use std::collections::BTreeMap;

use vigil_core::constants::ELEVATED_INDICATOR_SCORE;
use vigil_core::models::{Recommendation, RecommendationCategory, RecommendationPriority, RiskTier};

/// Build the support suggestions for a scored result, most urgent first.
pub fn recommend(tier: RiskTier, sub_scores: &BTreeMap<String, f64>) -> Vec<Recommendation> {
    let elevated = |key: &str| {
        sub_scores
            .get(key)
            .is_some_and(|s| *s >= ELEVATED_INDICATOR_SCORE)
    };
    let mut out = Vec::new();

    if tier == RiskTier::Critical {
        out.push(item(
            RecommendationPriority::Urgent,
            RecommendationCategory::ProfessionalHelp,
            "Seek Professional Support",
            "Consider counseling or therapy for caregiver stress",
        ));
    }
    if elevated("time_for_self") {
        out.push(item(
            RecommendationPriority::High,
            RecommendationCategory::RespiteCare,
            "Arrange Respite Care",
            "Take regular breaks; even 2-3 hours per week can help",
        ));
    }
    if elevated("sleep_quality") {
        out.push(item(
            RecommendationPriority::High,
            RecommendationCategory::SleepHygiene,
            "Improve Sleep Quality",
            "Establish a bedtime routine and talk to a doctor about persistent sleep problems",
        ));
    }
    if elevated("social_isolation") {
        out.push(item(
            RecommendationPriority::Medium,
            RecommendationCategory::SocialSupport,
            "Join a Support Group",
            "Connect with other caregivers who understand your challenges",
        ));
    }
    out.push(item(
        RecommendationPriority::Medium,
        RecommendationCategory::SelfCare,
        "Practice Daily Self-Care",
        "Set aside 15-30 minutes a day for something you enjoy",
    ));
    out
}

fn item(
    priority: RecommendationPriority,
    category: RecommendationCategory,
    title: &str,
    description: &str,
) -> Recommendation {
    Recommendation {
        priority,
        category,
        title: title.to_string(),
        description: description.to_string(),
    }
}
