pub mod context;
pub mod generator;
pub mod intent;
pub mod summarizer;
pub mod types;
pub mod validate;

pub use generator::ReplyGenerator;
pub use summarizer::PostSummarizer;
pub use types::{Language, ReplyRequest, ReplyResponse, SummarizeRequest, SummarizeResponse};
