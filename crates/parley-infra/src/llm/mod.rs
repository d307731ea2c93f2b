//! LLM completion gateway implementations.

pub mod gemini;
