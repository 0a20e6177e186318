// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod corpus;
pub mod exercise;
pub mod fetch;
pub mod highlight;
pub mod jsonpath;
pub mod score;
pub mod session;
pub mod ui;
