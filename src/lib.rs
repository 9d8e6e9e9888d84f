pub mod ai;
pub mod api;
pub mod cli;
pub mod core;
pub mod evals;
pub mod openai;
pub mod rag;
