pub mod document_import;
pub mod generation;
pub mod llm_service;
pub mod prompt_builder;
pub mod reply_parser;
pub mod session_store;

pub use document_import::import_student_data;
pub use generation::GenerationClient;
pub use llm_service::{CommentModel, LlmService};
pub use prompt_builder::{build_generation_prompt, build_regeneration_prompt, GenerationPrompt};
pub use reply_parser::{parse_reply, ParsedReply, RejectReason, RejectedRecord};
pub use session_store::{SessionStore, STORAGE_KEY};
