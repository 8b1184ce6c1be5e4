//! Conversation collapsing for tight-context families.
//!
//! Some families expose an input window small enough that forwarding full
//! conversation history risks immediate rejection. For those families only,
//! history is collapsed to the first system message plus the last user
//! message, and the user content is cut down to a fixed character budget
//! keeping the **trailing** slice — the most recent instructions are assumed
//! to be the most relevant ones. Every other family passes through untouched.

use crate::family::ProviderFamily;
use crate::types::{Message, Role};

/// Character budget applied to the surviving user message when collapsing
/// history for a tight-context family.
pub const TRUNCATION_BUDGET_CHARS: usize = 6000;

/// Bound conversation history for the given family.
///
/// Pure and deterministic; returns the input unchanged for families outside
/// the tight-context set.
pub fn collapse_for(messages: &[Message], family: ProviderFamily) -> Vec<Message> {
    if !family.is_tight_context() {
        return messages.to_vec();
    }

    let mut collapsed = Vec::with_capacity(2);

    // At most one system message is meaningful; the first wins.
    if let Some(system) = messages.iter().find(|m| m.role == Role::System) {
        collapsed.push(system.clone());
    }

    if let Some(user) = messages.iter().rev().find(|m| m.role == Role::User) {
        let mut user = user.clone();
        user.content = tail_chars(&user.content, TRUNCATION_BUDGET_CHARS);
        collapsed.push(user);
    }

    collapsed
}

/// Trailing `budget` characters of `content`, respecting char boundaries.
fn tail_chars(content: &str, budget: usize) -> String {
    let total = content.chars().count();
    if total <= budget {
        return content.to_string();
    }
    content.chars().skip(total - budget).collect()
}
