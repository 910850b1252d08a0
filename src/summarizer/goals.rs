//! Goal-sentence detection and forcing
//!
//! A goal sentence states a quantitative policy target: it has a digit, a
//! metric keyword and a goal verb. Centrality ranking tends to miss these
//! because targets are lexically isolated from the surrounding narrative,
//! so the top-ranked ones are force-included in the selection.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::nlp::keywords::KeywordText;
use crate::types::{Sentence, SummaryConfig};

/// Verb stems that express a target
pub const GOAL_VERBS: &[&str] = &[
    "reduc", "increas", "achiev", "eliminat", "improv", "expand", "ensur", "attain", "decreas",
    "lower", "rais", "halv", "double", "reach", "prevent", "accelerat", "cut",
];

/// Measurable quantities a target is stated in
pub const METRIC_KEYWORDS: &[&str] = &[
    "mortality",
    "coverage",
    "%",
    "percent",
    "gdp",
    "rate",
    "per",
    "prevalence",
    "incidence",
    "ratio",
    "death",
    "birth",
    "budget",
    "target",
    "proportion",
    "cases",
];

/// Whether a sentence states a quantitative goal
pub fn is_goal_sentence(text: &str) -> bool {
    let text = KeywordText::new(text);
    text.has_digit() && text.contains_any(METRIC_KEYWORDS) && text.contains_any(GOAL_VERBS)
}

/// Number of goal sentences to force for a given target
///
/// `min(max_forced_goals, round(forced_goal_fraction * target))`
pub fn forced_goal_count(target: usize, config: &SummaryConfig) -> usize {
    let share = (target as f64 * config.forced_goal_fraction).round();
    let share = if share.is_finite() && share > 0.0 {
        share as usize
    } else {
        0
    };
    share.min(config.max_forced_goals).min(target)
}

/// Selection after goal forcing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalForcing {
    /// Selected indices (not yet in document order)
    pub selection: Vec<usize>,
    /// Goal sentences that were forced, best-ranked first
    pub forced: Vec<usize>,
}

/// Force the best-ranked goal sentences into a selection.
///
/// Missing goals are appended; the selection is then trimmed back to
/// `target` by removing the lowest-scored non-goal picks first. Forced
/// goals are never removed. Only when no non-goal pick is left are
/// unforced goal picks trimmed, lowest score first.
pub fn force_goals(
    selection: Vec<usize>,
    sentences: &[Sentence],
    scores: &[f64],
    goal_flags: &[bool],
    forced_count: usize,
    target: usize,
) -> GoalForcing {
    let mut goals: Vec<usize> = (0..goal_flags.len()).filter(|&i| goal_flags[i]).collect();
    goals.sort_by(|&a, &b| score_of(scores, b).total_cmp(&score_of(scores, a)).then(a.cmp(&b)));
    goals.truncate(forced_count);

    if goals.is_empty() {
        return GoalForcing {
            selection,
            forced: Vec::new(),
        };
    }

    let mut selection = selection;
    let mut chosen: FxHashSet<usize> = selection.iter().copied().collect();
    for &goal in &goals {
        if chosen.insert(goal) {
            debug!(sentence = goal, "forcing goal sentence");
            selection.push(goal);
        }
    }

    let forced: FxHashSet<usize> = goals.iter().copied().collect();
    while selection.len() > target {
        let victim = lowest_scored(&selection, scores, |i| !is_goal(goal_flags, i))
            .or_else(|| lowest_scored(&selection, scores, |i| !forced.contains(&i)));
        let Some(pos) = victim else {
            break;
        };

        let removed = selection.remove(pos);
        if let Some(section) = sentences.get(removed).map(|s| s.section) {
            let still_covered = selection
                .iter()
                .any(|&i| sentences.get(i).is_some_and(|s| s.section == section));
            if !still_covered {
                debug!(
                    sentence = removed,
                    section, "goal forcing trimmed the only pick of a section"
                );
            }
        }
    }

    GoalForcing {
        selection,
        forced: goals,
    }
}

fn score_of(scores: &[f64], i: usize) -> f64 {
    scores.get(i).copied().unwrap_or(0.0)
}

fn is_goal(goal_flags: &[bool], i: usize) -> bool {
    goal_flags.get(i).copied().unwrap_or(false)
}

/// Position in `selection` of the lowest-scored index passing `keep`;
/// among equal scores the later sentence goes first.
fn lowest_scored(selection: &[usize], scores: &[f64], keep: impl Fn(usize) -> bool) -> Option<usize> {
    selection
        .iter()
        .enumerate()
        .filter(|&(_, &i)| keep(i))
        .min_by(|&(_, &a), &(_, &b)| score_of(scores, a).total_cmp(&score_of(scores, b)).then(b.cmp(&a)))
        .map(|(pos, _)| pos)
}
