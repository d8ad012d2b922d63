use crate::models::{Affirmation, EscalationState};

/// Result of one escalation turn: the state to persist, whether to ask
/// the upgrade question, and whether a recurring reminder should be
/// scheduled this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationOutcome {
    pub next: EscalationState,
    pub offer_upgrade: bool,
    pub schedule_recurring: bool,
}

/// One transition of the bulk-reminder upgrade state machine.
///
/// Pure state-in/state-out: the caller persists `next` in the session
/// store. `bulk_reminder_planned` means a monthly bulk one-time reminder
/// is being created this turn; `affirmation` is the user's yes/no when
/// this turn answers a pending offer. Concurrent turns racing on the same
/// session are left to the session store's own consistency guarantee.
pub fn transition(
    current: EscalationState,
    bulk_reminder_planned: bool,
    affirmation: Option<Affirmation>,
) -> EscalationOutcome {
    match (current, affirmation) {
        (EscalationState::NotOffered, _) if bulk_reminder_planned => EscalationOutcome {
            next: EscalationState::Offered,
            offer_upgrade: true,
            schedule_recurring: false,
        },
        (EscalationState::Offered, Some(Affirmation::Yes)) => EscalationOutcome {
            next: EscalationState::Accepted,
            offer_upgrade: false,
            schedule_recurring: true,
        },
        (EscalationState::Offered, Some(Affirmation::No)) => EscalationOutcome {
            next: EscalationState::Declined,
            offer_upgrade: false,
            schedule_recurring: false,
        },
        (state, _) => EscalationOutcome {
            next: state,
            offer_upgrade: false,
            schedule_recurring: false,
        },
    }
}
