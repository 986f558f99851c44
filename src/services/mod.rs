pub mod assembler;
pub mod candidates;
pub mod catalog;
pub mod duration;
pub mod oracle;
pub mod suggestion;

pub use catalog::{VideoCatalog, YouTubeCatalog};
pub use oracle::{OpenAiOracle, RankingOracle};
pub use suggestion::SuggestionService;
