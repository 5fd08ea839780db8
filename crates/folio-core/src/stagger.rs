#![forbid(unsafe_code)]

//! Stagger utilities: coordinated delay offsets for cascading reveals.
//!
//! Skill bars fill one after another and hero elements fade in in sequence;
//! both are a list of items whose start times are spaced by a fixed step
//! after a common base delay.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` returns an empty vec.
//! 2. The first offset is always `base`.
//! 3. `offset[i] = base + i * step` (saturating).
//! 4. Offsets are monotonically non-decreasing.

use std::time::Duration;

/// Start offsets for `count` items: `base + i * step`.
#[must_use]
pub fn stagger_offsets(count: usize, base: Duration, step: Duration) -> Vec<Duration> {
    (0..count).map(|i| stagger_offset(i, base, step)).collect()
}

/// Start offset of item `index`.
#[inline]
#[must_use]
pub fn stagger_offset(index: usize, base: Duration, step: Duration) -> Duration {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    base.saturating_add(step.saturating_mul(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(stagger_offsets(0, ms(500), ms(100)).is_empty());
    }

    #[test]
    fn skill_bar_offsets() {
        assert_eq!(
            stagger_offsets(4, ms(500), ms(100)),
            vec![ms(500), ms(600), ms(700), ms(800)]
        );
    }

    #[test]
    fn zero_base_starts_immediately() {
        assert_eq!(stagger_offsets(3, Duration::ZERO, ms(200)), vec![ms(0), ms(200), ms(400)]);
    }

    #[test]
    fn huge_index_saturates() {
        assert_eq!(
            stagger_offset(usize::MAX, Duration::MAX, ms(1)),
            Duration::MAX
        );
    }
}
