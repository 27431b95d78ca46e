//! Reg Assist — conversational registration intake service.

pub mod config;
pub mod error;
pub mod llm;
pub mod registration;
