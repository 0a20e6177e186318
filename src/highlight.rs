use crate::exercise::Line;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightTag {
    Active,
    Mistyped,
}

/// Character range within a rendered line (words joined by single spaces).
/// `end` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightRange {
    pub tag: HighlightTag,
    pub start: usize,
    pub end: usize,
}

/// Translates session state for one line into display ranges.
///
/// `finalized` holds the correctness of the words already finalized on this
/// line, in word order; `active_idx` is the word currently being typed and
/// `active_mismatch` its advisory running-comparison state. Pure: identical
/// inputs always yield the identical range list.
pub fn compute_highlights(
    line: &Line,
    finalized: &[bool],
    active_idx: usize,
    active_mismatch: bool,
) -> Vec<HighlightRange> {
    let mut ranges = Vec::new();
    let mut offset = 0;

    for (idx, word) in line.words().iter().enumerate() {
        let end = offset + word.chars().count();

        if idx == active_idx {
            ranges.push(HighlightRange {
                tag: HighlightTag::Active,
                start: offset,
                end,
            });
            if active_mismatch {
                ranges.push(HighlightRange {
                    tag: HighlightTag::Mistyped,
                    start: offset,
                    end,
                });
            }
        } else if matches!(finalized.get(idx), Some(false)) {
            ranges.push(HighlightRange {
                tag: HighlightTag::Mistyped,
                start: offset,
                end,
            });
        }

        offset = end + 1; // the separating space
    }

    ranges
}
