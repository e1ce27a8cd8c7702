//! Bot behaviour finite state machine.
//!
//! `Idle -> Walking -> (Shooting | Dying)`, with `Dying` terminal.
//! Pure functions that compute transitions from a bot's situation.
//! No ECS dependency; the sim crate applies the results.

use lanebattle_core::enums::BotState;

/// Input to the bot FSM for a single bot.
#[derive(Debug, Clone, Copy)]
pub struct BotContext {
    pub state: BotState,
    /// A target was captured this tick (captures only happen in range).
    pub has_target: bool,
    /// The bot has reached the end of its path and its destination.
    pub path_complete: bool,
    /// Seconds of the dying sequence left. Only read in `Dying`.
    pub dying_remaining_secs: f32,
}

/// What the bot does this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Halt,
    Advance,
}

/// Output from the bot FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotUpdate {
    pub new_state: BotState,
    pub state_changed: bool,
    pub movement: Movement,
    /// The dying sequence has played out; the bot should be destroyed.
    pub remove: bool,
}

/// Evaluate the FSM for one bot.
pub fn evaluate(ctx: &BotContext) -> BotUpdate {
    if ctx.state == BotState::Dying {
        return BotUpdate {
            new_state: BotState::Dying,
            state_changed: false,
            movement: Movement::Halt,
            remove: ctx.dying_remaining_secs <= 0.0,
        };
    }

    let (new_state, movement) = if ctx.has_target {
        (BotState::Shooting, Movement::Halt)
    } else if ctx.path_complete {
        (BotState::Idle, Movement::Halt)
    } else {
        (BotState::Walking, Movement::Advance)
    };

    BotUpdate {
        new_state,
        state_changed: new_state != ctx.state,
        movement,
        remove: false,
    }
}

/// Transition on lethal damage. `None` if the bot is already dying:
/// the dying sequence is one-shot and never restarts.
pub fn on_lethal_damage(state: BotState) -> Option<BotState> {
    match state {
        BotState::Dying => None,
        BotState::Idle | BotState::Walking | BotState::Shooting => Some(BotState::Dying),
    }
}

/// Dying bots ignore further damage.
pub fn accepts_damage(state: BotState) -> bool {
    state != BotState::Dying
}

/// Bots only fire while halted in `Shooting`.
pub fn can_fire(state: BotState) -> bool {
    state == BotState::Shooting
}
