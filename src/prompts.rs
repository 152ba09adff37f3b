//! Prompt templates
//!
//! Text handed to the language models: the travel manager's system prompt,
//! the per-request task prompt and the rolling summary instruction.

use crate::orchestrator::OrchestratorInputs;

/// System prompt for the travel manager agent
pub const TRAVEL_MANAGER_PROMPT: &str = "\
You are a warm, professional travel manager coordinating a team of travel experts.

Your responsibilities:
1. Understand what the traveller really wants.
2. If the request is vague, ask clarifying questions first.
3. Answer specific questions about transport, accommodation, attractions and food directly.
4. For full trip planning, compile a final plan with a day-by-day schedule, a budget breakdown and practical tips.

Simple greetings get a short, friendly reply. Never invent bookings or prices you cannot justify.";

/// Builds the task prompt for one chat request
///
/// # Examples
///
/// ```
/// use wayfarer::orchestrator::OrchestratorInputs;
/// use wayfarer::prompts::build_task_prompt;
///
/// let inputs = OrchestratorInputs {
///     topic: "Two days in Porto".to_string(),
///     chat_history: "Summary of past conversation:\n\n\nRecent conversation:\nuser: Two days in Porto".to_string(),
///     current_date: "2025-06-01".to_string(),
/// };
/// let prompt = build_task_prompt(&inputs);
/// assert!(prompt.contains("2025-06-01"));
/// assert!(prompt.contains("Two days in Porto"));
/// ```
pub fn build_task_prompt(inputs: &OrchestratorInputs) -> String {
    format!(
        "Today's date is {date}.\n\n\
         Conversation so far:\n{history}\n\n\
         Latest request from the traveller:\n{topic}\n\n\
         Reply to the latest request, using the conversation for context.",
        date = inputs.current_date,
        history = inputs.chat_history,
        topic = inputs.topic,
    )
}

/// Builds the instruction that folds new transcript lines into a summary
pub fn build_summary_prompt(current_summary: &str, new_messages: &str) -> String {
    format!(
        "You are a helpful assistant summarizing a conversation.\n\n\
         Current Summary:\n{current_summary}\n\n\
         New Messages:\n{new_messages}\n\n\
         Update the summary to include the key points from the new messages. \
         Keep it concise but retain important details for context."
    )
}
