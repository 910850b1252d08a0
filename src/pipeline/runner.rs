//! Pipeline runner: orchestrates stage execution end to end.
//!
//! [`Summarizer`] holds the configuration and the similarity strategy.
//! Calling [`Summarizer::summarize`] parses the text and runs the stages in
//! order, notifying an optional [`PipelineObserver`] at each boundary:
//!
//! 1. Segment (normalize, detect title and sections, split sentences)
//! 2. Similarity (lexical TF-IDF or semantic embeddings)
//! 3. Rank (TextRank with degree fallback, positional boost)
//! 4. Select (section quotas or global MMR)
//! 5. Goals (force the best goal sentences into the selection)
//! 6. Assemble (document order, stats, categories, tone)
//!
//! # Static dispatch
//!
//! `Summarizer` is generic over its [`SimilarityBuilder`], so the default
//! lexical pipeline is a concrete type. [`Summarizer::from_config`] picks a
//! strategy at runtime and boxes it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::nlp;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder, STAGE_ASSEMBLE,
    STAGE_GOALS, STAGE_RANK, STAGE_SEGMENT, STAGE_SELECT, STAGE_SIMILARITY,
};
use crate::pipeline::traits::{DynSimilarity, SimilarityBuilder};
use crate::ranker::{PositionBoost, SentenceRanker};
use crate::similarity::{ModelProvider, SemanticSimilarity, TfIdfSimilarity};
use crate::summarizer::{
    force_goals, forced_goal_count, is_goal_sentence, select_by_sections, Assembler, Assembly,
    Categorizer, SentenceSelector, Summary, SummaryKind,
};
use crate::types::{Document, SimilarityStrategy, SummaryConfig};

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

/// End-to-end extractive summarizer.
///
/// Reusable and stateless across calls: every `summarize` call works on its
/// own document, so one instance may serve many requests concurrently
/// (when `S` is `Sync`).
#[derive(Debug, Clone)]
pub struct Summarizer<S = TfIdfSimilarity> {
    config: SummaryConfig,
    similarity: S,
    ranker: SentenceRanker,
    selector: SentenceSelector,
    categorizer: Categorizer,
}

impl Default for Summarizer<TfIdfSimilarity> {
    fn default() -> Self {
        Self::lexical(SummaryConfig::default())
    }
}

impl Summarizer<TfIdfSimilarity> {
    /// Summarizer with TF-IDF cosine similarity
    pub fn lexical(config: SummaryConfig) -> Self {
        Summarizer::with_similarity(config, TfIdfSimilarity::new())
    }
}

impl Summarizer<SemanticSimilarity> {
    /// Summarizer with embedding cosine similarity from `provider`
    pub fn semantic(config: SummaryConfig, provider: Arc<ModelProvider>) -> Self {
        Summarizer::with_similarity(config, SemanticSimilarity::new(provider))
    }
}

impl Summarizer<DynSimilarity> {
    /// Summarizer for the strategy named in `config`.
    ///
    /// The semantic strategy uses `provider` when given; otherwise it needs
    /// `model_dir` and the `candle` feature.
    pub fn from_config(config: SummaryConfig, provider: Option<Arc<ModelProvider>>) -> Result<Self> {
        let similarity: DynSimilarity = match config.strategy {
            SimilarityStrategy::Lexical => Box::new(TfIdfSimilarity::new()),
            SimilarityStrategy::Semantic => {
                let provider = provider.or_else(|| model_from_dir(&config)).ok_or_else(|| {
                    Error::Config(
                        "semantic similarity needs an embedding model: pass a provider, \
                         or set model_dir and build with the `candle` feature"
                            .to_string(),
                    )
                })?;
                Box::new(SemanticSimilarity::new(provider))
            }
        };
        Ok(Summarizer::with_similarity(config, similarity))
    }
}

#[cfg(feature = "candle")]
fn model_from_dir(config: &SummaryConfig) -> Option<Arc<ModelProvider>> {
    config
        .model_dir
        .as_ref()
        .map(|dir| Arc::new(ModelProvider::bert(dir.clone())))
}

#[cfg(not(feature = "candle"))]
fn model_from_dir(_config: &SummaryConfig) -> Option<Arc<ModelProvider>> {
    None
}

impl<S: SimilarityBuilder> Summarizer<S> {
    /// Summarizer over any similarity strategy; `config` is sanitized first.
    pub fn with_similarity(config: SummaryConfig, similarity: S) -> Self {
        let config = config.sanitized();
        Self {
            ranker: SentenceRanker::from_config(&config),
            selector: SentenceSelector::new().with_lambda(config.lambda),
            categorizer: Categorizer::new(),
            similarity,
            config,
        }
    }

    /// Replace the category rules
    pub fn with_categorizer(mut self, categorizer: Categorizer) -> Self {
        self.categorizer = categorizer;
        self
    }

    /// Effective (sanitized) configuration
    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// The similarity strategy
    pub fn similarity(&self) -> &S {
        &self.similarity
    }

    /// Summarize raw text.
    pub fn summarize(&self, text: &str) -> Result<Summary> {
        self.summarize_observed(text, &mut NoopObserver)
    }

    /// Summarize raw text, reporting every stage to `observer`.
    pub fn summarize_observed(
        &self,
        text: &str,
        observer: &mut impl PipelineObserver,
    ) -> Result<Summary> {
        let document = {
            trace_stage!(STAGE_SEGMENT);
            observer.on_stage_start(STAGE_SEGMENT);
            let clock = StageClock::start();
            let document = nlp::parse_document(text, &self.config);
            let report = StageReportBuilder::new(clock.elapsed())
                .items(document.len())
                .build();
            observer.on_stage_end(STAGE_SEGMENT, &report);
            document
        };
        observer.on_document(&document);

        self.run(&document, observer)
    }

    /// Summarize an already parsed document.
    pub fn summarize_document(&self, document: &Document) -> Result<Summary> {
        self.run(document, &mut NoopObserver)
    }

    fn run(&self, document: &Document, observer: &mut impl PipelineObserver) -> Result<Summary> {
        let n = document.len();
        if n == 0 {
            info!("no sentences survived segmentation, returning empty summary");
            return Ok(Summary::empty(document.title.clone()));
        }

        let goal_flags: Vec<bool> = document
            .sentences
            .iter()
            .map(|s| is_goal_sentence(&s.text))
            .collect();
        let assembler = Assembler::new(
            self.categorizer.clone(),
            self.config.tone,
            self.config.abstract_sentences,
        );

        if n <= self.config.trivial_threshold {
            debug!(sentences = n, "document below trivial threshold, returned verbatim");
            let scores = vec![1.0 / n as f64; n];
            let summary = assembler.assemble(Assembly {
                document,
                kind: SummaryKind::Verbatim,
                selection: (0..n).collect(),
                scores: &scores,
                goal_flags: &goal_flags,
                forced: Vec::new(),
                rank_method: None,
            });
            observer.on_selection(&summary.indices());
            return Ok(summary);
        }

        // Stage 2: Similarity
        let matrix = {
            trace_stage!(STAGE_SIMILARITY);
            observer.on_stage_start(STAGE_SIMILARITY);
            let clock = StageClock::start();
            let matrix = self.similarity.build(&document.sentences)?;
            let report = StageReportBuilder::new(clock.elapsed()).nodes(matrix.len()).build();
            observer.on_stage_end(STAGE_SIMILARITY, &report);
            debug!(strategy = self.similarity.name(), sentences = n, "similarity matrix built");
            matrix
        };
        observer.on_similarity(&matrix);

        // Stage 3: Rank
        let sections = document.layout.sections();
        let (scores, rank_method) = {
            trace_stage!(STAGE_RANK);
            observer.on_stage_start(STAGE_RANK);
            let clock = StageClock::start();
            let rank = self.ranker.rank(&matrix);
            let mut scores = rank.scores.clone();
            if self.config.position_boost {
                PositionBoost::from_config(&self.config).apply(
                    &mut scores,
                    &document.sentences,
                    sections,
                );
            }
            let report = StageReportBuilder::new(clock.elapsed())
                .nodes(rank.nodes)
                .edges(rank.edges)
                .iterations(rank.iterations)
                .converged(rank.converged)
                .residual(rank.residual)
                .build();
            observer.on_stage_end(STAGE_RANK, &report);
            observer.on_rank(&rank);
            (scores, rank.method)
        };

        // Stage 4: Select
        let target = self.config.target_count(n);
        let selection = {
            trace_stage!(STAGE_SELECT);
            observer.on_stage_start(STAGE_SELECT);
            let clock = StageClock::start();
            let selection = if self.uses_quotas(document) {
                select_by_sections(
                    &self.selector,
                    &document.sentences,
                    sections,
                    &scores,
                    &matrix,
                    target,
                    self.config.goal_title_weight,
                )
                .selection
            } else {
                let all: Vec<usize> = (0..n).collect();
                self.selector.select(&all, &scores, &matrix, target)
            };
            let report = StageReportBuilder::new(clock.elapsed())
                .items(selection.len())
                .build();
            observer.on_stage_end(STAGE_SELECT, &report);
            selection
        };

        // Stage 5: Goals
        let forcing = {
            trace_stage!(STAGE_GOALS);
            observer.on_stage_start(STAGE_GOALS);
            let clock = StageClock::start();
            let forcing = force_goals(
                selection,
                &document.sentences,
                &scores,
                &goal_flags,
                forced_goal_count(target, &self.config),
                target,
            );
            let report = StageReportBuilder::new(clock.elapsed())
                .items(forcing.forced.len())
                .build();
            observer.on_stage_end(STAGE_GOALS, &report);
            forcing
        };

        // Stage 6: Assemble
        let summary = {
            trace_stage!(STAGE_ASSEMBLE);
            observer.on_stage_start(STAGE_ASSEMBLE);
            let clock = StageClock::start();
            let summary = assembler.assemble(Assembly {
                document,
                kind: SummaryKind::Ranked,
                selection: forcing.selection,
                scores: &scores,
                goal_flags: &goal_flags,
                forced: forcing.forced,
                rank_method: Some(rank_method),
            });
            observer.on_stage_end(STAGE_ASSEMBLE, &StageReport::new(clock.elapsed()));
            summary
        };
        observer.on_selection(&summary.indices());

        debug!(
            sentences = n,
            selected = summary.sentences.len(),
            target,
            "summary assembled"
        );
        Ok(summary)
    }

    /// Quotas need real headings and at least two sections holding sentences.
    fn uses_quotas(&self, document: &Document) -> bool {
        if !self.config.section_quota || !document.layout.is_sectioned() {
            return false;
        }
        let mut populated: Vec<usize> = document.sentences.iter().map(|s| s.section).collect();
        populated.dedup();
        populated.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observer::StageTimingObserver;
    use crate::ranker::RankMethod;
    use crate::similarity::HashingEmbedder;
    use crate::types::LengthChoice;

    const BRIEF: &str = "\
1. Background
Rural clinics across the region report chronic shortages of trained nurses and midwives.
Many rural clinics also lack reliable electricity and clean water for basic services.
Road access to the rural clinics is poor during the rainy season every year.
2. Objectives
The programme aims to reduce maternal mortality by 50 percent by 2030.
It will also expand training places for nurses and midwives in every district.
3. Financing
Funding will come from the national budget together with donor grants.
Private sector partners are invited to co-finance new equipment for clinics.
";

    #[test]
    fn test_ranked_summary_in_document_order() {
        let summary = <Summarizer>::default().summarize(BRIEF).unwrap();

        assert_eq!(summary.kind, SummaryKind::Ranked);
        assert_eq!(summary.stats.original_sentences, 7);
        assert!(!summary.sentences.is_empty());
        let indices = summary.indices();
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(summary.rank_method, Some(RankMethod::PageRank));
    }

    #[test]
    fn test_goal_sentence_is_forced() {
        // long: target 2, one forced goal
        let config = SummaryConfig::default().with_length(LengthChoice::Long);
        let summary = Summarizer::lexical(config).summarize(BRIEF).unwrap();
        assert_eq!(summary.forced_goals, vec![3]);
        assert!(summary.indices().contains(&3));
        assert!(summary.sentences.iter().any(|s| s.is_goal));
    }

    #[test]
    fn test_empty_and_trivial_documents() {
        let summarizer = <Summarizer>::default();

        let empty = summarizer.summarize("   \n\n").unwrap();
        assert_eq!(empty.kind, SummaryKind::Empty);
        assert!(empty.is_empty());

        let text = "Clinics need more trained nurses now. Roads to clinics flood every year.";
        let trivial = summarizer.summarize(text).unwrap();
        assert_eq!(trivial.kind, SummaryKind::Verbatim);
        assert_eq!(trivial.sentences.len(), 2);
        assert!((trivial.stats.compression_ratio - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let mut observer = StageTimingObserver::new();
        <Summarizer>::default()
            .summarize_observed(BRIEF, &mut observer)
            .unwrap();

        let stages: Vec<&str> = observer.reports().iter().map(|(s, _)| *s).collect();
        assert_eq!(
            stages,
            vec![
                STAGE_SEGMENT,
                STAGE_SIMILARITY,
                STAGE_RANK,
                STAGE_SELECT,
                STAGE_GOALS,
                STAGE_ASSEMBLE
            ]
        );
        let rank = observer.report(STAGE_RANK).unwrap();
        assert_eq!(rank.nodes(), Some(7));
        assert!(rank.iterations().is_some());
    }

    #[test]
    fn test_semantic_summarizer_with_fake_embedder() {
        let provider = Arc::new(ModelProvider::ready(Arc::new(HashingEmbedder::new(64))));
        let summary = Summarizer::semantic(SummaryConfig::default(), provider)
            .summarize(BRIEF)
            .unwrap();
        assert_eq!(summary.kind, SummaryKind::Ranked);
        assert!(!summary.sentences.is_empty());
    }

    #[test]
    fn test_from_config_semantic_without_model_fails() {
        let config = SummaryConfig::default().with_strategy(SimilarityStrategy::Semantic);
        let result = Summarizer::from_config(config, None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_config_lexical_matches_default() {
        let dynamic = Summarizer::from_config(SummaryConfig::default(), None).unwrap();
        let direct = <Summarizer>::default();
        assert_eq!(
            dynamic.summarize(BRIEF).unwrap().indices(),
            direct.summarize(BRIEF).unwrap().indices()
        );
        assert_eq!(dynamic.similarity().name(), "tfidf");
    }

    #[test]
    fn test_config_is_sanitized() {
        let summarizer = Summarizer::lexical(SummaryConfig::default().with_lambda(7.0));
        assert!((summarizer.config().lambda - 1.0).abs() < 1e-12);
    }
}
