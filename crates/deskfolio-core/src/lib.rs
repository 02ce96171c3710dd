pub mod answer;
pub mod config;
pub mod knowledge;
pub mod resolver;
pub mod session;
pub mod view;

// Re-export main types for convenience
pub use answer::{AnswerError, AnswerService, AnswerSource, AskClient, LocalAnswers};
pub use config::Config;
pub use knowledge::{KnowledgeBase, Topic};
pub use resolver::{KeywordRule, Resolver};
pub use session::{ChatMessage, ChatRole, ChatSession, MessageId};
pub use view::{AppId, Navigation, RenderMode, Stage, ViewState};
