use serde::{Deserialize, Serialize};

/// Where a fade resumes once the screen is dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FadeTarget {
    ActionSelect,
    PlayerBag,
    UsePokeBall,
    UseHealingItem,
    /// Battle over; no fade back in.
    Finished,
}

impl FadeTarget {
    pub fn phase(self) -> BattlePhase {
        match self {
            FadeTarget::ActionSelect => BattlePhase::PlayerActionSelect,
            FadeTarget::PlayerBag => BattlePhase::PlayerBag,
            FadeTarget::UsePokeBall => BattlePhase::UsePokeBall,
            FadeTarget::UseHealingItem => BattlePhase::UseHealingItem,
            FadeTarget::Finished => BattlePhase::Finished,
        }
    }
}

/// Every state a battle passes through, from the intro slide to `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    // Intro
    IntroSlideIn,
    WildAppeared,
    GoPokemon,
    AvatarSlideOut,
    ThrowPokemon,

    // Menus
    PlayerActionSelect,
    PlayerSelectMove,
    PlayerBag,
    BagSwitch,
    BagConfirmUseItem,
    PlayerChoosePokemon,

    // Capture
    UsePokeBall,
    ThrowPokeBall,
    BouncePokeBall,
    ShakePokeBall,
    PokemonBrokeFree,
    PokemonCaptured,
    AddToPokedex,

    // Items
    UseHealingItem,
    ItemNotUsable,

    // Run
    PlayerRun,
    PlayerRunText,
    CantEscape,

    // Moves
    BattlerTurn,
    MoveMissed,
    StatusMove,
    StatusEffect,
    SpecialMove,
    DamageMove,
    TakeDamage,

    // Fainting and experience
    BattlerFainted,
    FaintedText,
    GainXpText,
    GainXp,
    LevelGained,
    NewMoveText,

    NextBattlerTurn,
    FadeOut { then: FadeTarget },
    FadeIn { then: FadeTarget },
    Finished,
}

impl BattlePhase {
    pub fn is_finished(self) -> bool {
        self == BattlePhase::Finished
    }

    /// Phases that wait on a key press rather than a timer.
    pub fn reads_input(self) -> bool {
        matches!(
            self,
            BattlePhase::PlayerActionSelect
                | BattlePhase::PlayerSelectMove
                | BattlePhase::PlayerBag
                | BattlePhase::BagConfirmUseItem
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_targets_resume_into_their_phase() {
        assert_eq!(FadeTarget::PlayerBag.phase(), BattlePhase::PlayerBag);
        assert_eq!(FadeTarget::Finished.phase(), BattlePhase::Finished);
        assert!(FadeTarget::Finished.phase().is_finished());
    }

    #[test]
    fn test_only_menus_read_input() {
        assert!(BattlePhase::PlayerBag.reads_input());
        assert!(!BattlePhase::WildAppeared.reads_input());
        assert!(!BattlePhase::FadeOut { then: FadeTarget::PlayerBag }.reads_input());
    }
}
