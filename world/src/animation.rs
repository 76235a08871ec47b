//! Reducer mapping movement intents onto animation clips.

use zombie_survival_core::{AnimationIntent, AnimationState};

/// Returns the clip to switch to, or `None` when the current clip already fits.
///
/// `Dying` is absorbing: no intent leaves it.
#[must_use]
pub fn reduce(current: AnimationState, intent: AnimationIntent) -> Option<AnimationState> {
    if current == AnimationState::Dying {
        return None;
    }
    let next = match intent {
        AnimationIntent::Idle => AnimationState::Idle,
        AnimationIntent::Walk => AnimationState::Walking,
        AnimationIntent::Attack => AnimationState::Punching,
        AnimationIntent::Die => AnimationState::Dying,
    };
    (next != current).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_intent_is_not_a_change() {
        assert_eq!(reduce(AnimationState::Walking, AnimationIntent::Walk), None);
        assert_eq!(
            reduce(AnimationState::Idle, AnimationIntent::Walk),
            Some(AnimationState::Walking)
        );
    }

    #[test]
    fn dying_is_never_left() {
        for intent in [
            AnimationIntent::Idle,
            AnimationIntent::Walk,
            AnimationIntent::Attack,
            AnimationIntent::Die,
        ] {
            assert_eq!(reduce(AnimationState::Dying, intent), None);
        }
    }

    #[test]
    fn attack_interrupts_walking() {
        assert_eq!(
            reduce(AnimationState::Walking, AnimationIntent::Attack),
            Some(AnimationState::Punching)
        );
    }
}
