pub mod application_repository;
pub mod completion_repository;
pub mod gemini_completion_repository;
pub mod openai_completion_repository;
pub mod profile_repository;
pub mod usage_repository;
pub mod user_repository;

pub use application_repository::{ApplicationRecord, ApplicationRepository, NewApplication};
pub use completion_repository::{CompletionError, CompletionRepository, CompletionRequest};
pub use gemini_completion_repository::GeminiCompletionRepository;
pub use openai_completion_repository::OpenAiCompletionRepository;
pub use profile_repository::{MasterProfileRecord, ProfileRepository};
pub use usage_repository::UsageRepository;
pub use user_repository::{NewUser, UserRepository};
