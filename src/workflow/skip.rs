//! Skip rules: answers that make later identifications of the same image moot.

use std::ops::Range;

use crate::models::{Identification, FALSE_LABEL, TRUE_LABEL};

pub const IMAGE_CORRUPTED: &str = "image_corrupted";
pub const RAIN: &str = "rain";
pub const WATER_LEVEL: &str = "water_level";

/// Which following items a rule auto-answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependent {
    /// Any identification of the same image.
    SameImage,
    /// Identifications of the same image for one object type.
    SameImageObject(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipRule {
    pub object: &'static str,
    pub label: &'static str,
    pub dependent: Dependent,
}

/// Checked in order; the first match wins.
pub const SKIP_RULES: &[SkipRule] = &[
    // A corrupted image cannot be judged for anything else.
    SkipRule {
        object: IMAGE_CORRUPTED,
        label: TRUE_LABEL,
        dependent: Dependent::SameImage,
    },
    // No rain means no water level to assess.
    SkipRule {
        object: RAIN,
        label: FALSE_LABEL,
        dependent: Dependent::SameImageObject(WATER_LEVEL),
    },
];

impl SkipRule {
    fn triggers(&self, object: &str, label: &str) -> bool {
        self.object == object && self.label == label
    }

    fn covers(&self, answered: &Identification, candidate: &Identification) -> bool {
        if candidate.image_url() != answered.image_url() {
            return false;
        }
        match self.dependent {
            Dependent::SameImage => true,
            Dependent::SameImageObject(object) => candidate.object == object,
        }
    }
}

/// Indices of the items to auto-answer after labelling `queue[index]`.
///
/// The range covers the contiguous run right after `index` that the first
/// triggered rule applies to; it is empty when no rule triggers.
pub fn dependents(queue: &[Identification], index: usize, label: &str) -> Range<usize> {
    let start = index + 1;
    let Some(answered) = queue.get(index) else {
        return start..start;
    };
    let Some(rule) = SKIP_RULES
        .iter()
        .find(|rule| rule.triggers(&answered.object, label))
    else {
        return start..start;
    };

    let run = queue[start..]
        .iter()
        .take_while(|candidate| rule.covers(answered, candidate))
        .count();
    start..start + run
}
