//! Remote AI assistance: a chat-completions client and the wellness
//! prompts built on it. Every failure comes back as [`crate::error::AiError`].

mod client;
mod helpers;

pub use client::{
    extract_content, with_timeout, AiClient, ChatMessage, ContentPart, FileData, ImageUrl,
    MessageContent, Role,
};
pub use helpers::{
    journal_prompt, meditation_prompt, mentor_dialogue_prompt, recommendations_prompt,
    stress_patterns_prompt, Prompt, STRESS_LOG_WINDOW,
};
