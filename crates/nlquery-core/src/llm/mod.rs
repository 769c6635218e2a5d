//! LLM integration
//!
//! Provides the chat-completion client trait, its HTTP implementation, and
//! the query generator that turns model answers into search queries.

mod client;
mod query_generator;

pub use client::{ChatMessage, HttpLLMClient, LLMClient};
pub use query_generator::{parse_llm_response, GeneratedQuery, QueryGenerator, CLAUSE_KEYWORDS};
