use serde::{Deserialize, Serialize};

/// Where this session stands in the one-time-to-recurring bulk reminder
/// upgrade flow. Persisted between turns by the session store; the hosting
/// request model is stateless per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationState {
    NotOffered,
    Offered,
    Accepted,
    Declined,
}

impl EscalationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationState::NotOffered => "not_offered",
            EscalationState::Offered => "offered",
            EscalationState::Accepted => "accepted",
            EscalationState::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "offered" => EscalationState::Offered,
            "accepted" => EscalationState::Accepted,
            "declined" => EscalationState::Declined,
            _ => EscalationState::NotOffered,
        }
    }

    /// Accepted and Declined are terminal for the rest of the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EscalationState::Accepted | EscalationState::Declined)
    }
}

/// Yes/no answer extracted from the user's utterance by the voice
/// platform's slot resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affirmation {
    Yes,
    No,
}
