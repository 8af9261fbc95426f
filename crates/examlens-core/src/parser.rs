//! Free-text insight parsers.
//!
//! Stage text is scanned line by line with a small state machine. Zone text
//! comes in two flavors: student-level text uses `-` bullets, cohort-level
//! text is a list of bare lines. Callers pick the flavor by the record the
//! text came from, never by its shape.

use crate::model::StageInsight;

/// Maximum number of items kept from any bullet list.
pub const MAX_ITEMS: usize = 3;

const SCORE_LABEL: &str = "SUP Score (Score Uplift Potential): ";
const SCORE_MARKER: &str = "SUP Score";
const PREDICTIVE_HEADER: &str = "What will go wrong";
const PRESCRIPTIVE_HEADER: &str = "What exactly to fix";
const STAGE_BULLET: char = '*';
const ZONE_BULLET: char = '-';
const NONE_SENTINEL: &str = "None";
const NO_INCORRECT_SENTINEL: &str = "No incorrect answers";

/// An order-preserving list that silently drops items past [`MAX_ITEMS`].
#[derive(Debug, Default)]
struct Bullets {
    items: Vec<String>,
    seen: usize,
}

impl Bullets {
    fn push(&mut self, item: &str) {
        self.seen += 1;
        if self.items.len() < MAX_ITEMS {
            self.items.push(item.to_string());
        }
    }

    fn is_empty(&self) -> bool {
        self.seen == 0
    }

    fn into_items(self) -> Vec<String> {
        self.items
    }
}

/// Returns the bullet text if `line` is a bullet item for `delimiter`.
fn bullet_item(line: &str, delimiter: char) -> Option<&str> {
    line.trim().strip_prefix(delimiter).map(str::trim)
}

/// Extracts the first well-formed SUP score on the line.
///
/// `Some(0)` is returned for a score whose digits do not fit in a `u32`,
/// so the scan still stops at the first labelled score.
fn score_on_line(line: &str) -> Option<u32> {
    line.match_indices(SCORE_LABEL).find_map(|(idx, label)| {
        let rest = &line[idx + label.len()..];
        let digits_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_len == 0 {
            return None;
        }
        Some(rest[..digits_len].parse().unwrap_or(0))
    })
}

/// Progress through the predictive block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Predictive {
    /// "What will go wrong" not seen yet.
    Waiting,
    /// Collecting until a blank line followed by "What exactly to fix".
    Open,
    /// The block was closed and committed.
    Closed,
}

/// Progress through the prescriptive block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prescriptive {
    /// "What exactly to fix" not seen yet.
    Waiting,
    /// After the first fix header. `bounded` is set once a blank line
    /// followed by a SUP score line has closed an empty primary block.
    Open { bounded: bool },
    /// The primary block closed with at least one item.
    Done,
}

/// Single-pass line scanner behind [`parse_stage`].
///
/// The two blocks are tracked independently. A fix header that does not
/// follow a blank line is ordinary predictive content, but it still opens
/// the prescriptive block, which always starts at the first fix header.
///
/// The prescriptive block is collected twice: once up to the closing SUP
/// score line (primary rule) and once through the end of the text (the
/// fallback for texts without a trailing score). [`StageScanner::finish`]
/// picks the fallback only when the primary block is missing or empty.
#[derive(Debug)]
pub struct StageScanner {
    predictive_phase: Predictive,
    prescriptive_phase: Prescriptive,
    after_blank: bool,
    score: Option<u32>,
    predictive_pending: Bullets,
    predictive: Option<Vec<String>>,
    prescriptive_primary: Bullets,
    prescriptive_open: Bullets,
}

impl Default for StageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl StageScanner {
    pub fn new() -> Self {
        Self {
            predictive_phase: Predictive::Waiting,
            prescriptive_phase: Prescriptive::Waiting,
            after_blank: false,
            score: None,
            predictive_pending: Bullets::default(),
            predictive: None,
            prescriptive_primary: Bullets::default(),
            prescriptive_open: Bullets::default(),
        }
    }

    /// Feed one line of text (without its line terminator).
    pub fn feed(&mut self, line: &str) {
        if self.score.is_none() {
            self.score = score_on_line(line);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.after_blank = true;
            return;
        }
        let after_blank = std::mem::replace(&mut self.after_blank, false);

        self.feed_predictive(trimmed, after_blank);
        self.feed_prescriptive(trimmed, after_blank);
    }

    fn feed_predictive(&mut self, trimmed: &str, after_blank: bool) {
        self.predictive_phase = match self.predictive_phase {
            Predictive::Waiting if trimmed == PREDICTIVE_HEADER => Predictive::Open,
            Predictive::Open if after_blank && trimmed == PRESCRIPTIVE_HEADER => {
                let pending = std::mem::take(&mut self.predictive_pending);
                self.predictive = Some(pending.into_items());
                Predictive::Closed
            }
            Predictive::Open => {
                if let Some(item) = bullet_item(trimmed, STAGE_BULLET) {
                    self.predictive_pending.push(item);
                }
                Predictive::Open
            }
            phase => phase,
        };
    }

    fn feed_prescriptive(&mut self, trimmed: &str, after_blank: bool) {
        self.prescriptive_phase = match self.prescriptive_phase {
            Prescriptive::Waiting if trimmed == PRESCRIPTIVE_HEADER => {
                Prescriptive::Open { bounded: false }
            }
            Prescriptive::Open { bounded: false }
                if after_blank && trimmed.starts_with(SCORE_MARKER) =>
            {
                if self.prescriptive_primary.is_empty() {
                    Prescriptive::Open { bounded: true }
                } else {
                    Prescriptive::Done
                }
            }
            Prescriptive::Open { bounded } => {
                if let Some(item) = bullet_item(trimmed, STAGE_BULLET) {
                    if !bounded {
                        self.prescriptive_primary.push(item);
                    }
                    self.prescriptive_open.push(item);
                }
                Prescriptive::Open { bounded }
            }
            phase => phase,
        };
    }

    /// Finish the scan and build the stage insight.
    pub fn finish(self) -> StageInsight {
        let prescriptive = if self.prescriptive_phase == Prescriptive::Done {
            self.prescriptive_primary.into_items()
        } else {
            self.prescriptive_open.into_items()
        };

        StageInsight {
            uplift_potential: self.score.unwrap_or(0),
            predictive: self.predictive.unwrap_or_default(),
            prescriptive,
        }
    }
}

/// Parse one stage text field into a [`StageInsight`].
///
/// Absent or empty text yields a zeroed insight. Never fails.
pub fn parse_stage(text: Option<&str>) -> StageInsight {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return StageInsight::default();
    };

    let mut scanner = StageScanner::new();
    for line in text.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

/// Parse a student-level zone field (`-` bullets).
///
/// The sentinels `None` and "No incorrect answers" mean an empty zone.
pub fn parse_student_zone(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };
    if text.is_empty() || text == NONE_SENTINEL || text.contains(NO_INCORRECT_SENTINEL) {
        return Vec::new();
    }

    let mut items = Bullets::default();
    for item in text.lines().filter_map(|l| bullet_item(l, ZONE_BULLET)) {
        items.push(item);
    }
    items.into_items()
}

/// Parse a cohort-level zone field (one item per non-empty line).
pub fn parse_cohort_zone(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(MAX_ITEMS)
        .map(String::from)
        .collect()
}
