//! Section-aware quota allocation
//!
//! The target count is spread across sections by importance so a long
//! background section cannot crowd out the rest of the document. Each
//! section then runs MMR over its own sentences, and a global top-up pass
//! fills whatever the per-section picks left short of the target.

use tracing::debug;

use super::selector::SentenceSelector;
use crate::similarity::SimilarityMatrix;
use crate::types::{Section, Sentence};

/// Importance of every section: the summed rank scores of its sentences,
/// times `goal_title_weight` for goal/objective/principle sections.
pub fn section_importance(
    sentences: &[Sentence],
    sections: &[Section],
    scores: &[f64],
    goal_title_weight: f64,
) -> Vec<f64> {
    let mut importance = vec![0.0; sections.len()];
    for sentence in sentences {
        if let Some(total) = importance.get_mut(sentence.section) {
            *total += scores.get(sentence.index).copied().unwrap_or(0.0);
        }
    }
    for (total, section) in importance.iter_mut().zip(sections) {
        if section.is_goal_section() {
            *total *= goal_title_weight;
        }
    }
    importance
}

/// Distribute `target` slots over sections.
///
/// Only sections with capacity (sentence count) above zero take part. They
/// are ranked by importance (ties by section order). With at least as many
/// slots as sections every section gets one and the rest go round-robin by
/// rank, skipping full sections; otherwise the top `target` sections get
/// one slot each.
pub fn allocate_quotas(importance: &[f64], capacity: &[usize], target: usize) -> Vec<usize> {
    let mut quotas = vec![0; importance.len()];
    let mut ranked: Vec<usize> = (0..importance.len())
        .filter(|&s| capacity.get(s).copied().unwrap_or(0) > 0)
        .collect();
    ranked.sort_by(|&a, &b| importance[b].total_cmp(&importance[a]).then(a.cmp(&b)));

    if ranked.is_empty() || target == 0 {
        return quotas;
    }

    if target < ranked.len() {
        for &s in ranked.iter().take(target) {
            quotas[s] = 1;
        }
        return quotas;
    }

    for &s in &ranked {
        quotas[s] = 1;
    }
    let mut remaining = target - ranked.len();
    while remaining > 0 {
        let mut placed = false;
        for &s in &ranked {
            if remaining == 0 {
                break;
            }
            if quotas[s] < capacity[s] {
                quotas[s] += 1;
                remaining -= 1;
                placed = true;
            }
        }
        if !placed {
            break;
        }
    }
    quotas
}

/// Outcome of quota-driven selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotaSelection {
    /// Selected indices in pick order
    pub selection: Vec<usize>,
    /// Slots granted per section
    pub quotas: Vec<usize>,
    /// Sentences added by the global top-up pass
    pub topped_up: usize,
}

/// Select `target` sentences honoring per-section quotas.
pub fn select_by_sections(
    selector: &SentenceSelector,
    sentences: &[Sentence],
    sections: &[Section],
    scores: &[f64],
    similarity: &SimilarityMatrix,
    target: usize,
    goal_title_weight: f64,
) -> QuotaSelection {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); sections.len()];
    for sentence in sentences {
        if let Some(list) = members.get_mut(sentence.section) {
            list.push(sentence.index);
        }
    }
    let capacity: Vec<usize> = members.iter().map(Vec::len).collect();

    let importance = section_importance(sentences, sections, scores, goal_title_weight);
    let quotas = allocate_quotas(&importance, &capacity, target);
    debug!(?quotas, target, "section quotas allocated");

    let mut selection = Vec::with_capacity(target);
    for (section, &quota) in quotas.iter().enumerate() {
        if quota > 0 {
            selection.extend(selector.select(&members[section], scores, similarity, quota));
        }
    }

    let mut topped_up = 0;
    if selection.len() < target {
        let all: Vec<usize> = sentences.iter().map(|s| s.index).collect();
        let extra = selector.select_seeded(&all, scores, similarity, target - selection.len(), &selection);
        topped_up = extra.len();
        debug!(
            shortfall = target - selection.len(),
            added = topped_up,
            "quota shortfall filled by global top-up"
        );
        selection.extend(extra);
    }

    QuotaSelection {
        selection,
        quotas,
        topped_up,
    }
}
