use super::common::*;
use crate::scoring::classify::{recommend, Classifier, ClassifierConfig};
use crate::scoring::domain::{ConfidenceLevel, NextBestAction, ValueTier};

fn classifier() -> Classifier {
    Classifier::new(ClassifierConfig::default())
}

fn three_factors() -> Vec<crate::scoring::domain::Factor> {
    vec![
        factor("reply_activity", 12.0),
        factor("email_engagement", 9.6),
        factor("staff_count", 4.0),
    ]
}

#[test]
fn value_tier_respects_the_default_thresholds() {
    let classifier = classifier();
    let factors = three_factors();

    assert_eq!(
        classifier.classify(70, 1.0, &factors).value_tier,
        ValueTier::High
    );
    assert_eq!(
        classifier.classify(69, 1.0, &factors).value_tier,
        ValueTier::Medium
    );
    assert_eq!(
        classifier.classify(50, 1.0, &factors).value_tier,
        ValueTier::Medium
    );
    assert_eq!(
        classifier.classify(49, 1.0, &factors).value_tier,
        ValueTier::Low
    );
}

#[test]
fn confidence_tracks_data_support_not_favorability() {
    let classifier = classifier();
    let factors = three_factors();

    // Same completeness and factors, wildly different probabilities.
    let favorable = classifier.classify(95, 0.9, &factors);
    let unfavorable = classifier.classify(5, 0.9, &factors);
    assert_eq!(favorable.confidence_level, ConfidenceLevel::High);
    assert_eq!(unfavorable.confidence_level, ConfidenceLevel::High);
}

#[test]
fn empty_factor_list_forces_low_confidence() {
    let assessment = classifier().classify(50, 1.0, &[]);

    assert_eq!(assessment.confidence_level, ConfidenceLevel::Low);
    assert_eq!(assessment.next_best_action, NextBestAction::NeedsMoreData);
}

#[test]
fn sparse_completeness_forces_low_confidence() {
    let assessment = classifier().classify(80, 0.2, &three_factors());

    assert_eq!(assessment.confidence_level, ConfidenceLevel::Low);
}

#[test]
fn mid_completeness_lands_on_medium_confidence() {
    let assessment = classifier().classify(60, 0.55, &three_factors());

    assert_eq!(assessment.confidence_level, ConfidenceLevel::Medium);
}

#[test]
fn zero_impact_factors_do_not_count_toward_high_confidence() {
    let muted = vec![
        factor("opt_out", 0.0),
        factor("touch_recency", 0.0),
        factor("reply_activity", 3.0),
    ];

    let assessment = classifier().classify(60, 0.9, &muted);

    assert_eq!(assessment.confidence_level, ConfidenceLevel::Medium);
}

#[test]
fn decision_table_covers_all_nine_combinations() {
    use ConfidenceLevel::{High, Low, Medium};

    let expectations = [
        (ValueTier::High, High, NextBestAction::CallImmediately),
        (ValueTier::High, Medium, NextBestAction::EnrichFirst),
        (ValueTier::High, Low, NextBestAction::EnrichFirst),
        (ValueTier::Medium, High, NextBestAction::EnrichFirst),
        (ValueTier::Medium, Medium, NextBestAction::EnrichFirst),
        (ValueTier::Medium, Low, NextBestAction::NeedsMoreData),
        (ValueTier::Low, High, NextBestAction::NeedsMoreData),
        (ValueTier::Low, Medium, NextBestAction::NeedsMoreData),
        (ValueTier::Low, Low, NextBestAction::NeedsMoreData),
    ];

    for (tier, confidence, expected) in expectations {
        assert_eq!(
            recommend(tier, confidence),
            expected,
            "({tier:?}, {confidence:?})"
        );
    }
}

#[test]
fn custom_thresholds_are_honored() {
    let classifier = Classifier::new(ClassifierConfig {
        high_value_threshold: 90,
        medium_value_threshold: 60,
        high_completeness: 0.5,
        low_completeness: 0.1,
        min_factors_for_high_confidence: 1,
    });

    let assessment = classifier.classify(85, 0.6, &[factor("reply_activity", 5.0)]);

    assert_eq!(assessment.value_tier, ValueTier::Medium);
    assert_eq!(assessment.confidence_level, ConfidenceLevel::High);
    assert_eq!(assessment.next_best_action, NextBestAction::EnrichFirst);
}
