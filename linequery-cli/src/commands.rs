pub mod format;
pub mod query;
pub mod repl;
pub mod terms;
