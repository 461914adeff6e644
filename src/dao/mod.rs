/// Storage backends for users, teams, games, scores and chat.
pub mod golf_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
