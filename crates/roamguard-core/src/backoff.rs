// ── Exponential block backoff ──

/// Block duration for a given escalation streak.
///
/// `base_ms` at streak 0, then `base_ms * 2^min(streak, cap)` — doubling
/// with every repeat offense and flattening at the cap. Saturates instead
/// of overflowing for pathological configs.
pub fn block_duration_ms(base_ms: i64, streak: u32, exponent_cap: u32) -> i64 {
    if streak == 0 {
        return base_ms;
    }
    // 2^63 overflows i64; anything past 62 saturates anyway.
    let exponent = streak.min(exponent_cap).min(62);
    base_ms.saturating_mul(1_i64 << exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: i64 = 30_000;

    #[test]
    fn streak_zero_yields_base() {
        assert_eq!(block_duration_ms(BASE, 0, 5), BASE);
    }

    #[test]
    fn doubles_per_streak_step() {
        assert_eq!(block_duration_ms(BASE, 1, 5), 60_000);
        assert_eq!(block_duration_ms(BASE, 2, 5), 120_000);
        assert_eq!(block_duration_ms(BASE, 3, 5), 240_000);
    }

    #[test]
    fn flattens_at_the_cap() {
        let at_cap = block_duration_ms(BASE, 5, 5);
        assert_eq!(at_cap, BASE * 32);
        assert_eq!(block_duration_ms(BASE, 6, 5), at_cap);
        assert_eq!(block_duration_ms(BASE, 1_000, 5), at_cap);
    }

    #[test]
    fn cap_zero_pins_every_streak_to_base() {
        assert_eq!(block_duration_ms(BASE, 0, 0), BASE);
        assert_eq!(block_duration_ms(BASE, 1, 0), BASE);
        assert_eq!(block_duration_ms(BASE, 9, 0), BASE);
    }

    #[test]
    fn monotone_non_decreasing_in_streak() {
        let mut last = 0;
        for streak in 0..20 {
            let duration = block_duration_ms(BASE, streak, 7);
            assert!(duration >= last);
            last = duration;
        }
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let duration = block_duration_ms(i64::MAX / 2, 10, 80);
        assert_eq!(duration, i64::MAX);
    }
}
