pub mod eval;
pub mod search;

pub use eval::{Evaluator, PerfectEvaluator, PointTableEvaluator};
pub use search::{AlphaBetaAI, SearchConfig};
