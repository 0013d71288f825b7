// Resume screening core.
// Implements: keyword extraction, critique generation and parsing, hybrid scoring,
// project extraction, and the pipeline that chains them.
// All chat-model calls go through the CritiqueModel capability.

pub mod critique;
pub mod handlers;
pub mod keywords;
pub mod parser;
pub mod pipeline;
pub mod projects;
pub mod prompts;
pub mod scoring;
