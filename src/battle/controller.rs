//! Frame-driven battle state machine.
//!
//! The host calls [`BattleController::tick`] once per display frame. Each tick reads at most
//! one debounced key, advances the progress counter of the current phase and moves to the
//! next phase once that counter completes or the player makes a choice.
use crate::battle::animation::{Delay, Fade, Meter, TextWriter, Tween};
use crate::battle::catch::{
    ball_bonus, can_attempt_catch, capture_odds, shake_check, Ball, BallContext,
    CERTAIN_CAPTURE_ODDS, REQUIRED_SHAKES,
};
use crate::battle::damage::{calculate_damage, move_hits};
use crate::battle::escape::attempt_escape;
use crate::battle::input::{Debouncer, InputPort, Key};
use crate::battle::menu::{grid_step, ActionChoice, BagCursor, BagSelection, ConfirmChoice};
use crate::battle::phase::{BattlePhase, FadeTarget};
use crate::battle::presentation::{Frame, MenuView, PresentationPort};
use crate::battle::state::{BattleEvent, EventBus, TurnRng};
use crate::config::BattleConfig;
use crate::errors::{BattleResult, BattleStateError};
use crate::items::get_item_data;
use crate::move_data::{get_move_data, move_display_name};
use crate::player::PartyStore;
use crate::pokemon::Combatant;
use crate::progression::{apply_experience, experience_yield, finish_level_up, ExperienceGain, LearnedMove};
use crate::species::get_species_data;
use schema::{DamageClass, ItemCategory, MoveData};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Which side of the field acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Wild,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Wild,
            Side::Wild => Side::Player,
        }
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEnd {
    Captured,
    WildFainted,
    PlayerFainted,
    Escaped,
}

impl BattleEnd {
    pub fn is_win(self) -> bool {
        matches!(self, BattleEnd::Captured | BattleEnd::WildFainted)
    }
}

/// Result handed back once a battle reaches `Finished`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub won: bool,
    pub result: BattleEnd,
    /// The wild combatant as it left the battle.
    pub wild: Combatant,
    pub events: Vec<BattleEvent>,
}

/// Continuation state of the current phase.
#[derive(Debug, Clone)]
enum Progress {
    None,
    Text(TextWriter),
    Tween(Tween),
    Delay(Delay),
    Meter(Meter),
    Fade(Fade),
}

/// Move picked for the side that is acting.
#[derive(Debug, Clone)]
struct ChosenMove {
    move_id: String,
    data: MoveData,
}

impl ChosenMove {
    fn load(move_id: &str) -> BattleResult<Self> {
        Ok(Self {
            move_id: move_id.to_string(),
            data: get_move_data(move_id)?,
        })
    }
}

/// Order both combatants as (attacker, defender).
fn fighters<'c>(player: &'c Combatant, wild: &'c Combatant, attacker: Side) -> (&'c Combatant, &'c Combatant) {
    match attacker {
        Side::Player => (player, wild),
        Side::Wild => (wild, player),
    }
}

/// Only special moves carry a secondary stat change after their damage.
fn stat_change_follows_damage(data: &MoveData) -> bool {
    data.damage_class == DamageClass::Special && !data.stat_changes.is_empty()
}

/// Item picked in the bag, addressed by pocket and stack.
#[derive(Debug, Clone)]
struct SelectedItem {
    pocket: usize,
    stack: usize,
    item_id: String,
}

pub struct BattleController<'a, S: PartyStore> {
    config: BattleConfig,
    store: &'a mut S,
    player_index: usize,
    wild: Combatant,
    rng: TurnRng,
    phase: BattlePhase,
    progress: Progress,
    debouncer: Debouncer,
    events: EventBus,

    action_cursor: usize,
    move_cursor: usize,
    bag: BagCursor,
    confirm: ConfirmChoice,
    selected_item: Option<SelectedItem>,

    /// Side whose action is resolving.
    active: Side,
    current_move: Option<ChosenMove>,
    pending_damage: u16,
    fainted: Option<Side>,

    escape_attempts: u32,
    /// Turns handed back to the player, counting the first; starts at -1.
    turns_passed: i32,
    ball: Option<Ball>,
    capture_odds: f64,
    shakes: u8,

    xp_gain: Option<ExperienceGain>,
    xp_before: u32,
    learned: Option<LearnedMove>,
    end: Option<BattleEnd>,
}

impl<'a, S: PartyStore> BattleController<'a, S> {
    /// Start a battle between the store's first able combatant and `wild`.
    pub fn new(store: &'a mut S, mut wild: Combatant, config: BattleConfig, rng: TurnRng) -> BattleResult<Self> {
        let player_index = store.first_active()?;
        store.party_mut()[player_index].reset_stages();
        wild.reset_stages();

        let mut events = EventBus::new();
        events.push(BattleEvent::BattleStarted {
            wild: wild.name.clone(),
            level: wild.level,
        });
        info!(
            player = %store.party()[player_index].name,
            wild = %wild.name,
            level = wild.level,
            "battle started"
        );

        let mut controller = Self {
            config,
            store,
            player_index,
            wild,
            rng,
            phase: BattlePhase::IntroSlideIn,
            progress: Progress::None,
            debouncer: Debouncer::new(),
            events,
            action_cursor: 0,
            move_cursor: 0,
            bag: BagCursor::default(),
            confirm: ConfirmChoice::Yes,
            selected_item: None,
            active: Side::Player,
            current_move: None,
            pending_damage: 0,
            fainted: None,
            escape_attempts: 0,
            turns_passed: -1,
            ball: None,
            capture_odds: 0.0,
            shakes: 0,
            xp_gain: None,
            xp_before: 0,
            learned: None,
            end: None,
        };
        controller.enter(BattlePhase::IntroSlideIn)?;
        Ok(controller)
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn player(&self) -> &Combatant {
        &self.store.party()[self.player_index]
    }

    pub fn wild(&self) -> &Combatant {
        &self.wild
    }

    pub fn escape_attempts(&self) -> u32 {
        self.escape_attempts
    }

    pub fn turns_passed(&self) -> i32 {
        self.turns_passed
    }

    pub fn end(&self) -> Option<BattleEnd> {
        self.end
    }

    /// Consume a finished battle into its outcome.
    pub fn into_outcome(self) -> BattleResult<BattleOutcome> {
        match (self.phase, self.end) {
            (BattlePhase::Finished, Some(result)) => Ok(BattleOutcome {
                won: result.is_win(),
                result,
                wild: self.wild,
                events: self.events.events().to_vec(),
            }),
            _ => Err(BattleStateError::InconsistentState(format!(
                "battle still running in {:?}",
                self.phase
            ))
            .into()),
        }
    }

    /// Advance the battle by one frame.
    pub fn tick<I, P>(&mut self, delta: f32, input: &mut I, presentation: &mut P) -> BattleResult<()>
    where
        I: InputPort,
        P: PresentationPort,
    {
        let delta = self.config.clamp_delta(delta);
        let key = if self.phase.reads_input() {
            self.debouncer.pressed(&*input)
        } else {
            None
        };

        let consumed = self.update(delta, key)?;
        if consumed {
            self.debouncer.latch();
        }

        presentation.present(&self.frame());
        self.debouncer.release_if_idle(&*input);
        input.frame_finished(if consumed { key } else { None });
        Ok(())
    }

    /// Returns whether `key` was acted on.
    fn update(&mut self, delta: f32, key: Option<Key>) -> BattleResult<bool> {
        if self.phase.is_finished() {
            return Ok(false);
        }

        let done = self.advance_progress(delta);
        if self.phase.reads_input() {
            let Some(key) = key else {
                return Ok(false);
            };
            if let Some(next) = self.handle_key(key)? {
                self.enter(next)?;
            }
            return Ok(true);
        }

        if done {
            let next = self.complete_phase()?;
            self.enter(next)?;
        }
        Ok(false)
    }

    fn advance_progress(&mut self, delta: f32) -> bool {
        let config = &self.config;
        let done = match &mut self.progress {
            Progress::None => true,
            Progress::Text(text) => text.advance(delta, config.text_speed, config.text_hold_factor),
            Progress::Tween(tween) => tween.advance(delta),
            Progress::Delay(delay) => delay.advance(delta),
            Progress::Meter(meter) => meter.advance(delta),
            Progress::Fade(fade) => fade.advance(delta),
        };

        // The health bar drains the defender's actual health.
        let drained = match (&self.progress, self.phase) {
            (Progress::Meter(meter), BattlePhase::TakeDamage) => Some(meter.value),
            _ => None,
        };
        if let Some(health) = drained {
            let defender = self.active.other();
            self.combatant_mut(defender).set_health(health);
        }
        done
    }

    fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => self.player(),
            Side::Wild => &self.wild,
        }
    }

    fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.store.party_mut()[self.player_index],
            Side::Wild => &mut self.wild,
        }
    }

    /// Name used in battle text; the wild side is prefixed.
    fn battle_name(&self, side: Side) -> String {
        match side {
            Side::Player => self.player().name.clone(),
            Side::Wild => format!("Wild {}", self.wild.name),
        }
    }

    fn current_move(&self) -> BattleResult<ChosenMove> {
        self.current_move
            .clone()
            .ok_or_else(|| BattleStateError::InconsistentState("no move selected".to_string()).into())
    }

    fn say(&mut self, line1: impl Into<String>, line2: impl Into<String>, hold: f32) {
        self.progress = Progress::Text(TextWriter::new(line1, line2, hold));
    }

    fn end_battle(&mut self, end: BattleEnd) -> BattlePhase {
        self.end = Some(end);
        BattlePhase::FadeOut {
            then: FadeTarget::Finished,
        }
    }

    /// Switch to `phase` and run its entry work. Immediate branches recurse into their target.
    fn enter(&mut self, phase: BattlePhase) -> BattleResult<()> {
        debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
        self.progress = Progress::None;

        match phase {
            BattlePhase::IntroSlideIn => {
                self.progress = Progress::Tween(Tween::new(self.config.slide_in));
            }
            BattlePhase::WildAppeared => {
                let name = self.battle_name(Side::Wild);
                self.say(name, "appeared!", 1.0);
            }
            BattlePhase::GoPokemon => {
                let name = self.player().name.clone();
                self.say(format!("Go! {}!", name), "", 1.0);
            }
            BattlePhase::AvatarSlideOut => {
                self.progress = Progress::Tween(Tween::new(self.config.slide_out));
            }
            BattlePhase::ThrowPokemon => {
                self.progress = Progress::Tween(Tween::new(self.config.pokemon_throw));
            }

            BattlePhase::PlayerActionSelect => {
                self.active = Side::Player;
                let name = self.player().name.clone();
                self.say("What will", format!("{} do?", name), 0.0);
            }
            BattlePhase::PlayerSelectMove => {
                self.move_cursor = self.move_cursor.min(self.player().moves.len().saturating_sub(1));
            }
            BattlePhase::PlayerBag => {}
            BattlePhase::BagSwitch => {
                self.progress = Progress::Tween(Tween::new(self.config.bag_switch));
            }
            BattlePhase::BagConfirmUseItem => {
                self.confirm = ConfirmChoice::Yes;
                let name = match &self.selected_item {
                    Some(selected) => get_item_data(&selected.item_id)?.name,
                    None => String::new(),
                };
                self.say("Use", format!("{}?", name), 0.0);
            }
            BattlePhase::PlayerChoosePokemon => {
                self.say("You can't switch", "POKéMON now!", 1.0);
            }

            BattlePhase::UsePokeBall => self.use_poke_ball()?,
            BattlePhase::ThrowPokeBall => {
                self.progress = Progress::Tween(Tween::new(self.config.ball_throw));
            }
            BattlePhase::BouncePokeBall => {
                self.progress = Progress::Tween(Tween::new(self.config.ball_bounce));
            }
            BattlePhase::ShakePokeBall => {
                self.progress = Progress::Tween(Tween::new(self.config.ball_shake));
            }
            BattlePhase::PokemonBrokeFree => {
                self.events.push(BattleEvent::PokemonBrokeFree {
                    pokemon: self.wild.name.clone(),
                });
                self.say("Oh, no! The POKéMON", "broke free!", 1.0);
            }
            BattlePhase::PokemonCaptured => {
                info!(pokemon = %self.wild.name, ball = ?self.ball, "captured");
                self.events.push(BattleEvent::PokemonCaught {
                    pokemon: self.wild.name.clone(),
                });
                let name = self.wild.name.clone();
                self.say("Gotcha!", format!("{} was caught!", name), 1.0);
            }
            BattlePhase::AddToPokedex => {
                self.hand_off_capture();
                let name = self.wild.name.clone();
                self.say(format!("{}'s data was", name), "added to the POKéDEX.", 1.0);
            }

            BattlePhase::UseHealingItem => self.use_healing_item()?,
            BattlePhase::ItemNotUsable => {
                self.say("That can't be", "used here.", 1.0);
            }

            BattlePhase::PlayerRun => {
                self.escape_attempts += 1;
                let escaped = attempt_escape(
                    self.player().stats.speed,
                    self.wild.stats.speed,
                    self.escape_attempts,
                    &mut self.rng,
                );
                self.events.push(BattleEvent::EscapeAttempted {
                    attempts: self.escape_attempts,
                    success: escaped,
                });
                let next = if escaped {
                    BattlePhase::PlayerRunText
                } else {
                    BattlePhase::CantEscape
                };
                return self.enter(next);
            }
            BattlePhase::PlayerRunText => {
                self.end = Some(BattleEnd::Escaped);
                self.say("Got away safely!", "", 1.0);
            }
            BattlePhase::CantEscape => {
                self.say("Can't escape!", "", 1.0);
            }

            BattlePhase::BattlerTurn => {
                let chosen = self.current_move()?;
                let name = self.battle_name(self.active);
                self.events.push(BattleEvent::MoveUsed {
                    pokemon: name.clone(),
                    move_id: chosen.move_id.clone(),
                });
                self.say(format!("{} used", name), format!("{}!", move_display_name(&chosen.move_id)), 0.0);
            }
            BattlePhase::MoveMissed => {
                let name = self.battle_name(self.active);
                self.events.push(BattleEvent::MoveMissed { pokemon: name.clone() });
                self.say(format!("{}'s", name), "attack missed!", 1.0);
            }
            BattlePhase::StatusMove | BattlePhase::SpecialMove => {
                self.progress = Progress::Delay(Delay::new(self.config.move_effect_delay));
            }
            BattlePhase::StatusEffect => self.apply_stat_change()?,
            BattlePhase::DamageMove => {
                let chosen = self.current_move()?;
                let player = &self.store.party()[self.player_index];
                let (attacker, defender) = fighters(player, &self.wild, self.active);
                self.pending_damage = calculate_damage(&chosen.data, attacker, defender, &mut self.rng);
                self.progress = Progress::Delay(Delay::new(self.config.attack_animation));
            }
            BattlePhase::TakeDamage => {
                let defender_side = self.active.other();
                let target_name = self.battle_name(defender_side);
                let defender = self.combatant(defender_side);
                let start = defender.health;
                let target = (start - self.pending_damage as f32).max(0.0);
                let remaining_hp = target as u16;
                self.events.push(BattleEvent::DamageDealt {
                    target: target_name,
                    damage: self.pending_damage,
                    remaining_hp,
                });
                self.progress = Progress::Meter(Meter::new(start, target, self.config.health_drain_speed));
            }

            BattlePhase::BattlerFainted => {
                self.progress = Progress::Tween(Tween::new(self.config.faint));
            }
            BattlePhase::FaintedText => {
                let side = self.fainted.unwrap_or(self.active.other());
                let name = self.battle_name(side);
                self.events.push(BattleEvent::PokemonFainted { pokemon: name.clone() });
                self.say(name, "fainted!", 1.0);
            }
            BattlePhase::GainXpText => {
                self.end = Some(BattleEnd::WildFainted);
                let amount = experience_yield(&self.wild);
                let level_cap = self.config.level_cap;
                let player = &mut self.store.party_mut()[self.player_index];
                self.xp_before = player.xp;
                let gain = apply_experience(player, amount, level_cap);
                let name = player.name.clone();
                debug!(pokemon = %name, amount, new_level = gain.new_level, "experience gained");
                self.xp_gain = Some(gain);
                self.events.push(BattleEvent::ExperienceGained {
                    pokemon: name.clone(),
                    amount,
                });
                self.say(format!("{} gained", name), format!("{} EXP. Points!", amount), 1.0);
            }
            BattlePhase::GainXp => {
                let target = self.player().xp as f32;
                self.progress = Progress::Meter(Meter::new(self.xp_before as f32, target, self.config.xp_fill_speed));
            }
            BattlePhase::LevelGained => {
                let species = get_species_data(self.player().species_id)?;
                let player = &mut self.store.party_mut()[self.player_index];
                self.learned = finish_level_up(player, &species)?;
                let (name, level) = (player.name.clone(), player.level);
                self.events.push(BattleEvent::LevelUp {
                    pokemon: name.clone(),
                    new_level: level,
                });
                self.say(format!("{} grew to", name), format!("LV. {}!", level), 1.0);
            }
            BattlePhase::NewMoveText => {
                let name = self.player().name.clone();
                let learned = self.learned.clone().ok_or_else(|| {
                    BattleStateError::InconsistentState("no move learned".to_string())
                })?;
                self.events.push(BattleEvent::MoveLearned {
                    pokemon: name.clone(),
                    move_id: learned.move_id.clone(),
                    forgotten: learned.forgotten.map(|slot| slot.move_id),
                });
                self.say(format!("{} learned", name), format!("{}!", move_display_name(&learned.move_id)), 1.0);
            }

            BattlePhase::NextBattlerTurn => {
                let next = self.next_battler()?;
                return self.enter(next);
            }
            BattlePhase::FadeOut { .. } => {
                self.progress = Progress::Fade(Fade::out(self.config.fade_delay, self.config.fade_speed));
            }
            BattlePhase::FadeIn { .. } => {
                self.progress = Progress::Fade(Fade::into_view(self.config.fade_speed));
            }
            BattlePhase::Finished => {
                self.store.party_mut()[self.player_index].reset_stages();
                let won = self.end.is_some_and(BattleEnd::is_win);
                self.events.push(BattleEvent::BattleEnded { won });
                info!(result = ?self.end, won, "battle finished");
            }
        }
        Ok(())
    }

    /// Next phase once the current phase's progress has completed.
    fn complete_phase(&mut self) -> BattleResult<BattlePhase> {
        let next = match self.phase {
            BattlePhase::IntroSlideIn => BattlePhase::WildAppeared,
            BattlePhase::WildAppeared => BattlePhase::GoPokemon,
            BattlePhase::GoPokemon => BattlePhase::AvatarSlideOut,
            BattlePhase::AvatarSlideOut => BattlePhase::ThrowPokemon,
            BattlePhase::ThrowPokemon => self.start_turn(),

            BattlePhase::BagSwitch => BattlePhase::PlayerBag,
            BattlePhase::PlayerChoosePokemon => BattlePhase::PlayerActionSelect,

            BattlePhase::ThrowPokeBall => BattlePhase::BouncePokeBall,
            BattlePhase::BouncePokeBall => BattlePhase::ShakePokeBall,
            BattlePhase::ShakePokeBall => self.resolve_shake(),
            BattlePhase::PokemonBrokeFree => BattlePhase::NextBattlerTurn,
            BattlePhase::PokemonCaptured => BattlePhase::AddToPokedex,
            BattlePhase::AddToPokedex => BattlePhase::FadeOut {
                then: FadeTarget::Finished,
            },
            BattlePhase::UsePokeBall => BattlePhase::ThrowPokeBall,

            BattlePhase::UseHealingItem => BattlePhase::NextBattlerTurn,
            BattlePhase::ItemNotUsable => BattlePhase::PlayerBag,

            BattlePhase::PlayerRunText => BattlePhase::FadeOut {
                then: FadeTarget::Finished,
            },
            BattlePhase::CantEscape => BattlePhase::NextBattlerTurn,

            BattlePhase::BattlerTurn => self.resolve_hit()?,
            BattlePhase::MoveMissed => BattlePhase::NextBattlerTurn,
            BattlePhase::StatusMove => BattlePhase::StatusEffect,
            BattlePhase::StatusEffect => BattlePhase::NextBattlerTurn,
            BattlePhase::SpecialMove => BattlePhase::DamageMove,
            BattlePhase::DamageMove => BattlePhase::TakeDamage,
            BattlePhase::TakeDamage => self.after_damage()?,

            BattlePhase::BattlerFainted => BattlePhase::FaintedText,
            BattlePhase::FaintedText => match self.fainted {
                Some(Side::Wild) => BattlePhase::GainXpText,
                _ => self.end_battle(BattleEnd::PlayerFainted),
            },
            BattlePhase::GainXpText => BattlePhase::GainXp,
            BattlePhase::GainXp => match self.xp_gain {
                Some(gain) if gain.leveled_up() => BattlePhase::LevelGained,
                _ => BattlePhase::FadeOut {
                    then: FadeTarget::Finished,
                },
            },
            BattlePhase::LevelGained => match self.learned {
                Some(_) => BattlePhase::NewMoveText,
                None => BattlePhase::FadeOut {
                    then: FadeTarget::Finished,
                },
            },
            BattlePhase::NewMoveText => BattlePhase::FadeOut {
                then: FadeTarget::Finished,
            },

            BattlePhase::FadeOut { then } => match then {
                FadeTarget::Finished => BattlePhase::Finished,
                then => BattlePhase::FadeIn { then },
            },
            BattlePhase::FadeIn { then } => then.phase(),

            // Input-driven, immediate or terminal phases never complete on a timer.
            BattlePhase::PlayerActionSelect
            | BattlePhase::PlayerSelectMove
            | BattlePhase::PlayerBag
            | BattlePhase::BagConfirmUseItem
            | BattlePhase::PlayerRun
            | BattlePhase::NextBattlerTurn
            | BattlePhase::Finished => self.phase,
        };
        Ok(next)
    }

    /// React to a key in a menu phase. Returns the phase to switch to, if any.
    fn handle_key(&mut self, key: Key) -> BattleResult<Option<BattlePhase>> {
        let next = match self.phase {
            BattlePhase::PlayerActionSelect => {
                if key == Key::Enter {
                    Some(match ActionChoice::from_index(self.action_cursor) {
                        ActionChoice::Fight => BattlePhase::PlayerSelectMove,
                        ActionChoice::Bag => BattlePhase::FadeOut {
                            then: FadeTarget::PlayerBag,
                        },
                        ActionChoice::Party => BattlePhase::PlayerChoosePokemon,
                        ActionChoice::Run => BattlePhase::PlayerRun,
                    })
                } else {
                    if let Some(cursor) = grid_step(self.action_cursor, key, |_| true) {
                        self.action_cursor = cursor;
                    }
                    None
                }
            }
            BattlePhase::PlayerSelectMove => {
                if key == Key::Enter {
                    self.select_move()?
                } else {
                    let known = self.player().moves.len();
                    if let Some(cursor) = grid_step(self.move_cursor, key, |slot| slot < known) {
                        self.move_cursor = cursor;
                    }
                    None
                }
            }
            BattlePhase::PlayerBag => self.bag_key(key),
            BattlePhase::BagConfirmUseItem => {
                if key == Key::Enter {
                    Some(match self.confirm {
                        ConfirmChoice::Yes => self.choose_item_use()?,
                        ConfirmChoice::No => BattlePhase::PlayerBag,
                    })
                } else {
                    self.confirm = self.confirm.step(key);
                    None
                }
            }
            _ => None,
        };
        Ok(next)
    }

    fn select_move(&mut self) -> BattleResult<Option<BattlePhase>> {
        let cursor = self.move_cursor;
        let player = &mut self.store.party_mut()[self.player_index];
        let Some(slot) = player.moves.get_mut(cursor) else {
            return Ok(None);
        };
        if !slot.use_pp() {
            debug!(move_id = %slot.move_id, "no pp left");
            return Ok(None);
        }
        let move_id = slot.move_id.clone();
        self.current_move = Some(ChosenMove::load(&move_id)?);
        self.active = Side::Player;
        Ok(Some(BattlePhase::BattlerTurn))
    }

    fn bag_key(&mut self, key: Key) -> Option<BattlePhase> {
        let items = self.store.inventory().pocket_at(self.bag.pocket).len();
        match key {
            Key::Left | Key::Right => self.bag.switch_pocket(key).then_some(BattlePhase::BagSwitch),
            Key::Up | Key::Down => {
                self.bag.scroll(key, items);
                None
            }
            Key::Enter => match self.bag.selection(items) {
                BagSelection::CloseBag => Some(BattlePhase::FadeOut {
                    then: FadeTarget::ActionSelect,
                }),
                BagSelection::Item(stack) => {
                    let item_id = self.store.inventory().pocket_at(self.bag.pocket)[stack].item_id.clone();
                    self.selected_item = Some(SelectedItem {
                        pocket: self.bag.pocket,
                        stack,
                        item_id,
                    });
                    Some(BattlePhase::BagConfirmUseItem)
                }
            },
        }
    }

    /// Branch on the confirmed item's category.
    fn choose_item_use(&mut self) -> BattleResult<BattlePhase> {
        let Some(selected) = self.selected_item.clone() else {
            return Ok(BattlePhase::PlayerBag);
        };
        let item = get_item_data(&selected.item_id)?;
        let amount = self
            .store
            .inventory()
            .pocket_at(selected.pocket)
            .get(selected.stack)
            .map_or(0, |stack| stack.amount);

        let next = match item.category {
            ItemCategory::StandardBalls | ItemCategory::SpecialBalls => {
                match can_attempt_catch(&selected.item_id, &item, amount, &self.wild) {
                    Ok(ball) => {
                        self.ball = Some(ball);
                        BattlePhase::FadeOut {
                            then: FadeTarget::UsePokeBall,
                        }
                    }
                    Err(err) => {
                        warn!(%err, "ball cannot be thrown");
                        BattlePhase::ItemNotUsable
                    }
                }
            }
            ItemCategory::Healing => {
                let player = self.player();
                if amount == 0 || player.current_hp() >= player.max_hp() {
                    BattlePhase::ItemNotUsable
                } else {
                    BattlePhase::FadeOut {
                        then: FadeTarget::UseHealingItem,
                    }
                }
            }
            ItemCategory::Other => BattlePhase::ItemNotUsable,
        };
        Ok(next)
    }

    fn consume_selected_item(&mut self) -> BattleResult<SelectedItem> {
        let selected = self.selected_item.take().ok_or_else(|| {
            BattleStateError::InconsistentState("no item selected".to_string())
        })?;
        if !self.store.inventory_mut().consume(selected.pocket, selected.stack) {
            return Err(BattleStateError::InconsistentState(format!(
                "{} is no longer in the bag",
                selected.item_id
            ))
            .into());
        }
        let trainer = self.store.trainer_name().to_string();
        self.events.push(BattleEvent::ItemUsed {
            trainer,
            item: selected.item_id.clone(),
        });
        Ok(selected)
    }

    fn use_poke_ball(&mut self) -> BattleResult<()> {
        let selected = self.consume_selected_item()?;
        let ball = self.ball.ok_or_else(|| {
            BattleStateError::InconsistentState("no ball chosen".to_string())
        })?;
        let item = get_item_data(&selected.item_id)?;

        let context = BallContext {
            target: &self.wild,
            species_owned: self.store.owns_species(self.wild.species_id),
            turns_passed: self.turns_passed,
        };
        let bonus = ball_bonus(ball, &context);
        self.capture_odds = capture_odds(
            self.wild.max_hp(),
            self.wild.current_hp(),
            self.wild.capture_rate,
            bonus,
        );
        self.shakes = 0;
        self.active = Side::Player;
        debug!(?ball, bonus, odds = self.capture_odds, "ball thrown");

        let trainer = self.store.trainer_name().to_uppercase();
        self.say(format!("{} used", trainer), format!("{}!", item.name), 1.0);
        Ok(())
    }

    fn resolve_shake(&mut self) -> BattlePhase {
        if !shake_check(self.capture_odds, &mut self.rng) {
            return BattlePhase::PokemonBrokeFree;
        }
        self.shakes += 1;
        self.events.push(BattleEvent::BallShook { shake: self.shakes });
        if self.capture_odds >= CERTAIN_CAPTURE_ODDS || self.shakes >= REQUIRED_SHAKES {
            BattlePhase::PokemonCaptured
        } else {
            BattlePhase::ShakePokeBall
        }
    }

    /// Give the caught combatant to the party store.
    fn hand_off_capture(&mut self) {
        self.wild.caught_with = self.ball;
        if self.ball == Some(Ball::Luxury) {
            self.wild.base_happiness = self.wild.base_happiness.saturating_mul(2);
        }
        self.wild.reset_stages();
        self.store.add_caught_combatant(self.wild.clone());
        self.end = Some(BattleEnd::Captured);
    }

    fn use_healing_item(&mut self) -> BattleResult<()> {
        let selected = self.consume_selected_item()?;
        let item = get_item_data(&selected.item_id)?;
        let player = &mut self.store.party_mut()[self.player_index];
        let restored = player.heal(item.heal_amount);
        let name = player.name.clone();
        self.active = Side::Player;

        self.events.push(BattleEvent::PokemonHealed {
            target: name.clone(),
            amount: restored,
        });
        let unit = if restored == 1 { "point" } else { "points" };
        self.say(format!("{}'s HP was", name), format!("restored by {} {}.", restored, unit), 1.0);
        Ok(())
    }

    fn resolve_hit(&mut self) -> BattleResult<BattlePhase> {
        let chosen = self.current_move()?;
        let player = &self.store.party()[self.player_index];
        let (attacker, defender) = fighters(player, &self.wild, self.active);
        if !move_hits(&chosen.data, attacker, defender, &mut self.rng) {
            return Ok(BattlePhase::MoveMissed);
        }
        Ok(match chosen.data.damage_class {
            DamageClass::Status => BattlePhase::StatusMove,
            DamageClass::Special => BattlePhase::SpecialMove,
            DamageClass::Physical => BattlePhase::DamageMove,
        })
    }

    fn after_damage(&mut self) -> BattleResult<BattlePhase> {
        let defender_side = self.active.other();
        if self.combatant(defender_side).is_fainted() {
            self.fainted = Some(defender_side);
            return Ok(BattlePhase::BattlerFainted);
        }
        if stat_change_follows_damage(&self.current_move()?.data) {
            return Ok(BattlePhase::StatusEffect);
        }
        Ok(BattlePhase::NextBattlerTurn)
    }

    /// Apply the first stat change of the current move.
    fn apply_stat_change(&mut self) -> BattleResult<()> {
        let ChosenMove { move_id, data } = self.current_move()?;
        let Some(change) = data.stat_changes.first().copied() else {
            warn!(%move_id, "status move without a stat change");
            self.events.push(BattleEvent::NothingHappened);
            self.say("But nothing happened!", "", 1.0);
            return Ok(());
        };

        let target_side = if data.targets_user() {
            self.active
        } else {
            self.active.other()
        };
        let target_name = self.battle_name(target_side);
        let result = self.combatant_mut(target_side).stages.apply(change.stat, change.change);
        debug!(target = %target_name, stat = ?change.stat, applied = result.applied, "stat stage changed");

        self.events.push(BattleEvent::StatStageChanged {
            target: target_name.clone(),
            stat: change.stat,
            applied: result.applied,
            new_stage: result.new_stage,
        });
        self.say(format!("{}'s {}", target_name, change.stat), result.message(), 1.0);
        Ok(())
    }

    /// Give control back to the player for a new turn. Menus, the bag and the party
    /// notice return to the action menu without going through here.
    fn start_turn(&mut self) -> BattlePhase {
        self.turns_passed += 1;
        debug!(turns_passed = self.turns_passed, "turn started");
        BattlePhase::PlayerActionSelect
    }

    /// Hand the turn to the other side. The wild side picks a random move with pp left.
    fn next_battler(&mut self) -> BattleResult<BattlePhase> {
        self.active = self.active.other();
        if self.active == Side::Player {
            return Ok(self.start_turn());
        }
        if self.wild.is_fainted() {
            return Err(BattleStateError::InconsistentState("fainted combatant given a turn".to_string()).into());
        }

        let usable: Vec<usize> = self
            .wild
            .moves
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.pp > 0)
            .map(|(index, _)| index)
            .collect();
        if usable.is_empty() {
            warn!(pokemon = %self.wild.name, "no usable moves, turn skipped");
            self.active = Side::Player;
            return Ok(self.start_turn());
        }

        let pick = self.rng.next(0..=(usable.len() - 1) as u32, "enemy move choice") as usize;
        let slot = &mut self.wild.moves[usable[pick]];
        slot.use_pp();
        let move_id = slot.move_id.clone();
        self.current_move = Some(ChosenMove::load(&move_id)?);
        Ok(BattlePhase::BattlerTurn)
    }

    fn frame(&self) -> Frame<'_> {
        let (dialogue, dialogue_complete) = match &self.progress {
            Progress::Text(text) => (Some(text.visible()), text.is_typed()),
            _ => (None, false),
        };
        let menu = match self.phase {
            BattlePhase::PlayerActionSelect => MenuView::Actions {
                cursor: self.action_cursor,
            },
            BattlePhase::PlayerSelectMove => MenuView::Moves {
                cursor: self.move_cursor,
            },
            BattlePhase::PlayerBag | BattlePhase::BagSwitch | BattlePhase::ItemNotUsable => MenuView::Bag { cursor: self.bag },
            BattlePhase::BagConfirmUseItem => MenuView::Confirm {
                choice: self.confirm,
            },
            _ => MenuView::None,
        };
        let tween_position = match &self.progress {
            Progress::Tween(tween) => Some(tween.position),
            _ => None,
        };
        let xp_display = match (self.phase, &self.progress) {
            (BattlePhase::GainXp, Progress::Meter(meter)) => Some(meter.value),
            _ => None,
        };
        let fade_opacity = match &self.progress {
            Progress::Fade(fade) => fade.opacity,
            _ => 0.0,
        };

        Frame {
            phase: self.phase,
            player: self.player(),
            wild: &self.wild,
            dialogue,
            dialogue_complete,
            menu,
            tween_position,
            xp_display,
            fade_opacity,
        }
    }
}
