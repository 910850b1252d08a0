//! End-to-end tests through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use briefrank::pipeline::StageTimingObserver;
use briefrank::ranker::SentenceRanker;
use briefrank::similarity::TfIdfSimilarity;
use briefrank::summarizer::Category;
use briefrank::{
    nlp, summarize, Embedder, HashingEmbedder, LengthChoice, ModelProvider, Result, Sentence,
    SimilarityBuilder, SimilarityMatrix, SimilarityStrategy, Summarizer, SummaryConfig,
    SummaryKind, Tone,
};

const SUBJECTS: [&str; 8] = [
    "The district council",
    "Local farmers",
    "The health ministry",
    "Regional planners",
    "Community volunteers",
    "School teachers",
    "The water authority",
    "Private investors",
];

const VERBS: [&str; 5] = ["discussed", "reviewed", "questioned", "supported", "documented"];

const OBJECTS: [&str; 5] = [
    "the new irrigation scheme",
    "road maintenance schedules",
    "market access for small traders",
    "teacher housing in remote villages",
    "solar power for rural clinics",
];

/// `n` distinct digit-free sentences, one per line, with no goal sentences
fn filler(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                "{} {} {} during the meeting.",
                SUBJECTS[i % 8],
                VERBS[(i / 8) % 5],
                OBJECTS[(i + i / 8 + i / 40) % 5]
            )
        })
        .collect()
}

fn sectioned_brief() -> String {
    "\
Strengthening Rural Health Services
1. Background
Rural clinics across the region report chronic shortages of trained nurses and midwives.
Many rural clinics also lack reliable electricity and clean water for basic services.
Road access to the rural clinics is poor during the rainy season every year.
Patients often travel long distances to reach the nearest rural clinic.
2. Objectives
We aim to reduce maternal mortality by 30% by 2025.
The programme will also train more nurses and midwives in every district.
3. Financing
Funding will come from the national budget together with donor grants.
Private sector partners are invited to co-finance new equipment for clinics.
4. Monitoring
A monitoring dashboard will track clinic staffing and supply data each quarter.
District officers will report survey results to the health ministry.
"
    .to_string()
}

#[test]
fn test_trivial_document_is_returned_verbatim() {
    let text = "Clinics need more trained nurses now. Roads to the clinics flood every year. \
                Donors fund new equipment for rural clinics.";
    let summary = summarize(text, &SummaryConfig::default()).unwrap();

    assert_eq!(summary.kind, SummaryKind::Verbatim);
    assert_eq!(summary.indices(), vec![0, 1, 2]);
    assert_eq!(summary.stats.original_sentences, 3);
    assert!((summary.stats.compression_ratio - 100.0).abs() < 1e-9);
}

#[test]
fn test_medium_summary_of_forty_sentences() {
    let text = filler(40).join("\n");
    let summary = summarize(&text, &SummaryConfig::default()).unwrap();

    assert_eq!(summary.kind, SummaryKind::Ranked);
    assert_eq!(summary.stats.original_sentences, 40);
    assert_eq!(summary.sentences.len(), 8);
    assert!(summary.forced_goals.is_empty());
    assert!((summary.stats.compression_ratio - 20.0).abs() < 1e-9);
}

#[test]
fn test_goal_sentence_survives_short_summary() {
    let goal = "We aim to reduce maternal mortality by 30% by 2025.";
    let mut lines = filler(50);
    lines.insert(23, goal.to_string());
    let config = SummaryConfig::default().with_length(LengthChoice::Short);

    let summary = summarize(&lines.join("\n"), &config).unwrap();

    assert_eq!(summary.sentences.len(), 5);
    let picked = summary
        .sentences
        .iter()
        .find(|s| s.text == goal)
        .expect("goal sentence selected");
    assert!(picked.is_goal);
    assert_eq!(picked.category, Category::KeyGoals);
    assert_eq!(summary.forced_goals, vec![23]);
}

#[test]
fn test_empty_input() {
    for text in ["", "   \n\t\n", "Short.\nTiny line."] {
        let summary = summarize(text, &SummaryConfig::default()).unwrap();
        assert_eq!(summary.kind, SummaryKind::Empty);
        assert!(summary.sentences.is_empty());
        assert_eq!(summary.stats.original_sentences, 0);
        assert_eq!(summary.stats.summary_sentences, 0);
        assert_eq!(summary.stats.compression_ratio, 0.0);
    }
}

#[test]
fn test_token_limit_keeps_leading_paragraph() {
    let text = format!("Rural Health Brief\n{}", filler(40).join(" "));
    let config = SummaryConfig {
        max_tokens: 100,
        ..SummaryConfig::default()
    };
    let summary = summarize(&text, &config).unwrap();

    assert_eq!(summary.kind, SummaryKind::Ranked);
    assert!(summary.stats.original_sentences > 3);
    assert!(summary.stats.original_sentences < 40);
}

/// Sentences 0 and 1 are near-duplicates at the center of the graph.
struct NearDuplicates;

impl SimilarityBuilder for NearDuplicates {
    fn build(&self, sentences: &[Sentence]) -> Result<SimilarityMatrix> {
        Ok(SimilarityMatrix::from_fn(sentences.len(), |i, j| {
            match (i.min(j), i.max(j)) {
                (0, 1) => 0.97,
                (0, _) | (1, _) => 0.5,
                _ => 0.1,
            }
        }))
    }
}

#[test]
fn test_near_duplicates_not_both_selected() {
    let text = filler(6).join("\n");
    let config = SummaryConfig {
        ratio: Some(0.1),
        position_boost: false,
        ..SummaryConfig::default()
    };

    let summary = Summarizer::with_similarity(config, NearDuplicates)
        .summarize(&text)
        .unwrap();

    let indices = summary.indices();
    assert_eq!(indices.len(), 1);
    assert!(indices[0] == 0 || indices[0] == 1);
}

#[test]
fn test_summaries_are_deterministic() {
    let text = sectioned_brief();
    let summarizer = Summarizer::lexical(SummaryConfig::default().with_length(LengthChoice::Long));

    let first = summarizer.summarize(&text).unwrap();
    for _ in 0..5 {
        let again = summarizer.summarize(&text).unwrap();
        assert_eq!(again.indices(), first.indices());
        let categories: Vec<_> = again.sentences.iter().map(|s| s.category).collect();
        let expected: Vec<_> = first.sentences.iter().map(|s| s.category).collect();
        assert_eq!(categories, expected);
    }
}

#[test]
fn test_selection_is_ordered_unique_and_bounded() {
    for length in [LengthChoice::Short, LengthChoice::Medium, LengthChoice::Long] {
        let config = SummaryConfig::default().with_length(length);
        for text in [filler(37).join("\n"), sectioned_brief()] {
            let n = nlp::parse_document(&text, &config).len();
            let summary = summarize(&text, &config).unwrap();
            let indices = summary.indices();

            assert!(indices.windows(2).all(|w| w[0] < w[1]));
            assert!(indices.len() <= config.target_count(n).min(n));
        }
    }
}

#[test]
fn test_sectioned_document_keeps_title_and_goal() {
    let config = SummaryConfig::default().with_length(LengthChoice::Long);
    let summary = summarize(&sectioned_brief(), &config).unwrap();

    assert_eq!(
        summary.title.as_deref(),
        Some("Strengthening Rural Health Services")
    );
    // eleven sentences, long: target 3, one forced goal
    assert_eq!(summary.stats.original_sentences, 11);
    assert_eq!(summary.sentences.len(), 3);
    assert!(summary.sentences.iter().any(|s| s.is_goal && s.forced));
    assert!(summary
        .structured
        .groups
        .iter()
        .any(|g| g.category == Category::KeyGoals));
}

#[test]
fn test_lexical_similarity_is_symmetric() {
    let text = filler(12).join("\n");
    let document = nlp::parse_document(&text, &SummaryConfig::default());
    let matrix = TfIdfSimilarity::new().build(&document.sentences).unwrap();

    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 0.0);
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
            assert!((0.0..=1.0).contains(&matrix.get(i, j)));
        }
    }
}

#[test]
fn test_rank_scores_are_normalized() {
    let text = filler(20).join("\n");
    let document = nlp::parse_document(&text, &SummaryConfig::default());
    let matrix = TfIdfSimilarity::new().build(&document.sentences).unwrap();
    let rank = SentenceRanker::default().rank(&matrix);

    assert!(rank.scores.iter().all(|&s| s >= 0.0));
    let sum: f64 = rank.scores.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[test]
fn test_easy_tone_drops_short_asides() {
    let text = "\
Clinics (see annex) need more trained nurses in every district.
Roads to the rural clinics flood every single rainy season.
Donors fund new equipment for the rural clinics each year.
Volunteers run outreach sessions in distant farming villages.
";
    let config = SummaryConfig {
        tone: Tone::Easy,
        ratio: Some(1.0),
        length: LengthChoice::Long,
        ..SummaryConfig::default()
    };
    let summary = summarize(text, &config).unwrap();

    assert!(summary.texts().iter().all(|t| !t.contains("(see annex)")));
    assert!(summary
        .texts()
        .contains(&"Clinics need more trained nurses in every district."));
}

#[test]
fn test_highlight_marks_selected_sentences() {
    let text = filler(10).join("\n");
    let summary = summarize(&text, &SummaryConfig::default()).unwrap();
    let highlight = summary.highlight();

    assert_eq!(highlight.len(), 10);
    let marked: Vec<usize> = highlight
        .iter()
        .enumerate()
        .filter(|(_, (_, selected))| *selected)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(marked, summary.indices());
}

#[test]
fn test_semantic_strategy_loads_model_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let provider = Arc::new(ModelProvider::lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(HashingEmbedder::new(128)) as Arc<dyn Embedder>)
    }));
    let config = SummaryConfig::default().with_strategy(SimilarityStrategy::Semantic);
    let summarizer = Summarizer::from_config(config, Some(Arc::clone(&provider))).unwrap();

    assert!(!provider.is_initialized());
    let text = filler(15).join("\n");
    let first = summarizer.summarize(&text).unwrap();
    let second = summarizer.summarize(&text).unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(first.indices(), second.indices());
    assert_eq!(first.sentences.len(), 3);
}

#[test]
fn test_semantic_strategy_without_model_is_an_error() {
    let config = SummaryConfig::default().with_strategy(SimilarityStrategy::Semantic);
    assert!(summarize(&filler(10).join("\n"), &config).is_err());
}

#[test]
fn test_observer_reports_graph_metrics() {
    let mut observer = StageTimingObserver::new();
    <Summarizer>::default()
        .summarize_observed(&filler(20).join("\n"), &mut observer)
        .unwrap();

    let rank = observer.report("rank").unwrap();
    assert_eq!(rank.nodes(), Some(20));
    assert!(rank.edges().unwrap_or(0) > 0);
    assert_eq!(rank.converged(), Some(true));
    assert_eq!(observer.report("select").unwrap().items(), Some(4));
}

#[test]
fn test_summary_serializes_to_json() {
    let summary = summarize(&sectioned_brief(), &SummaryConfig::default()).unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["kind"], "ranked");
    assert!(json["structured"]["abstract"].is_string());
    assert_eq!(
        json["stats"]["original_sentences"].as_u64(),
        Some(summary.stats.original_sentences as u64)
    );
}

#[test]
fn test_highlight_survives_json_round_trip() {
    let summary = summarize(&filler(12).join("\n"), &SummaryConfig::default()).unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    let restored: briefrank::Summary = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.indices(), summary.indices());
    assert_eq!(restored.highlight().len(), 12);
    assert_eq!(restored.highlight(), summary.highlight());
}
