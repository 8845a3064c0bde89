// Skill recommendation engine for the resume wizard's skills step.
// Identity -> dedup -> merge strategies -> session -> pool manager (SkillBoard).
// All generation-service calls go through the SkillGenerator trait.

pub mod classify;
pub mod dedup;
pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod identity;
pub mod merge;
pub mod models;
pub mod pool;
pub mod prompts;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod test_support;

pub use generator::{LlmSkillGenerator, SkillGenerator};
pub use pool::SkillBoard;
pub use store::{MemoryStore, PersistenceAdapter, RedisStore};
