use super::super::domain::{AnswerSet, Question, Section};
use super::weights::{OptionWeightTable, MAX_WEIGHT};

/// Raw points collected by one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SectionTally {
    pub points: i64,
    pub max_points: i64,
}

impl SectionTally {
    pub fn percentage(self) -> u8 {
        clamp_percentage(round_half_up(self.points * 100, self.max_points))
    }
}

/// Points for one question. Unanswered and out-of-range selections are worth 0.
pub(crate) fn question_points(
    question: &Question,
    answers: &AnswerSet,
    weights: &OptionWeightTable,
) -> i64 {
    answers
        .selected(&question.id)
        .filter(|index| *index < question.options.len())
        .and_then(|index| weights.weight(index))
        .map(i64::from)
        .unwrap_or(0)
}

/// `None` when the section has no enabled question.
///
/// Every enabled question adds the maximum weight to the denominator, answered or not.
pub(crate) fn tally_section(
    section: &Section,
    answers: &AnswerSet,
    weights: &OptionWeightTable,
) -> Option<SectionTally> {
    let mut enabled = 0_i64;
    let mut points = 0_i64;

    for question in section.enabled_questions() {
        enabled += 1;
        points += question_points(question, answers, weights);
    }

    (enabled > 0).then_some(SectionTally {
        points,
        max_points: enabled * i64::from(MAX_WEIGHT),
    })
}

/// Unweighted mean of section percentages, 0 when nothing was scored.
pub(crate) fn overall_percentage(section_scores: &[u8]) -> u8 {
    if section_scores.is_empty() {
        return 0;
    }

    let total: i64 = section_scores.iter().copied().map(i64::from).sum();
    clamp_percentage(round_half_up(total, section_scores.len() as i64))
}

/// `numerator / denominator` rounded to the nearest integer, halves rounded up.
pub(crate) fn round_half_up(numerator: i64, denominator: i64) -> i64 {
    debug_assert!(denominator > 0, "denominator must be positive");
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

fn clamp_percentage(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}
