use crate::battle::catch::Ball;
use crate::pokemon::Combatant;
use schema::ItemData;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum CatchError {
    /// The item is not a ball
    #[error("{item} is not a ball")]
    NotABall { item: String },
    /// The bag holds none of this ball
    #[error("no {item} left")]
    NoneLeft { item: String },
    /// Target Pokemon is already fainted
    #[error("{pokemon} has already fainted")]
    TargetFainted { pokemon: String },
}

/// Validate a throw and return the ball to use.
pub fn can_attempt_catch(
    item_id: &str,
    item: &ItemData,
    amount: u32,
    target: &Combatant,
) -> Result<Ball, CatchError> {
    let ball = Ball::from_item_id(item_id)
        .filter(|_| item.category.is_ball())
        .ok_or_else(|| CatchError::NotABall {
            item: item_id.to_string(),
        })?;

    if amount == 0 {
        return Err(CatchError::NoneLeft {
            item: item_id.to_string(),
        });
    }

    if target.is_fainted() {
        return Err(CatchError::TargetFainted {
            pokemon: target.name.clone(),
        });
    }

    Ok(ball)
}
