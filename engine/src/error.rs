// ═══════════════════════════════════════════════════════════════════════
// Engine errors — every reason `State::update` can reject an action
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{CardId, PlayerId, PromptType, Step};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("game is already over")]
    GameOver,
    #[error("player {0} is not the active player")]
    NotActivePlayer(PlayerId),
    #[error("a prompt is pending and must be resolved first")]
    PromptPending,
    #[error("no prompt to resolve")]
    NoPrompt,
    #[error("prompt belongs to player {expected}, not {got}")]
    WrongPromptPlayer { expected: PlayerId, got: PlayerId },
    #[error("card {0} not found")]
    CardNotFound(CardId),
    #[error("action not allowed in step {0}")]
    WrongStep(Step),
    #[error("not enough energy: need {need}, have {have}")]
    NotEnoughEnergy { need: u32, have: u32 },
    #[error("power {0} already used this turn")]
    PowerAlreadyUsed(String),
    #[error("card has no power named {0}")]
    UnknownPower(String),
    #[error("{0} has no attacks left this turn")]
    AttackLimitReached(CardId),
    #[error("illegal target {0}")]
    IllegalTarget(CardId),
    #[error("invalid resolution for {0}")]
    InvalidPromptResolution(PromptType),
    #[error("prompt {0} is not supported")]
    UnsupportedPrompt(PromptType),
    #[error("a relic named {0} is already in play")]
    DuplicateRelic(&'static str),
    #[error("card {0} cannot be played")]
    NotPlayable(CardId),
    #[error("player {0} has no active magi")]
    NoActiveMagi(PlayerId),
}
