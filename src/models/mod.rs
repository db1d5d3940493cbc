pub mod article;
pub mod epi;
pub mod quiz;
pub mod rewrite;
pub mod usage;

pub use article::ArticleInput;
pub use epi::{EpiComponents, EpiScore, EPI_COMPONENTS};
pub use quiz::{Quiz, QuizAnswer};
pub use rewrite::{BatchItemOutcome, ComposedResult, RewriteVariant, Style};
pub use usage::{GenerationUsage, TokensUsed, UsageTotals};
