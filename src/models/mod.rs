pub mod comment;
pub mod form;
pub mod guidelines;
pub mod loaders;
pub mod session;
pub mod subject;

pub use comment::{
    CommentsView, GeneratedComments, GroupedByPerformance, NumberedComment, PerformanceLevel,
    StudentComment,
};
pub use form::{FormData, FormField, InputField, INPUT_FIELDS};
pub use loaders::load_form_from_toml;
pub use session::SavedSession;
pub use subject::{Subject, CUSTOM_SUBJECT};
