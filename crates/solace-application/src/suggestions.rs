//! Suggested opening prompts.
//!
//! Shown when a conversation is empty; selecting one populates the input
//! draft (after creating a session if none exists yet) - it never
//! auto-submits.

/// Fixed catalog of suggested questions.
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "How can I manage my anxiety better?",
    "I've been feeling overwhelmed lately",
    "Can we talk about improving sleep?",
    "I need help with work-life balance",
];
