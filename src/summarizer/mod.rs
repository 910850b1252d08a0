//! Summarization components
//!
//! Selection (MMR, section quotas, goal forcing), categorization and
//! assembly of the final [`Summary`].

pub mod assemble;
pub mod categories;
pub mod goals;
pub mod quota;
pub mod selector;

pub use assemble::{
    Assembler, Assembly, CategoryGroup, SelectedSentence, StructuredSummary, Summary, SummaryKind,
    SummaryStats,
};
pub use categories::{Categorizer, Category, CategoryRule, Predicate};
pub use goals::{force_goals, forced_goal_count, is_goal_sentence, GoalForcing};
pub use quota::{allocate_quotas, section_importance, select_by_sections, QuotaSelection};
pub use selector::{SelectorConfig, SentenceSelector};
