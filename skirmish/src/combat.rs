//! Damage rolls.

use rand::{Rng, RngExt};

/// Dice rolled per shot; also the damage cap.
pub const DAMAGE_DICE: i32 = 3;

/// Chance in percent that one attack die hits, indexed by attack.
const HIT_CHANCE: [i32; 6] = [0, 45, 60, 72, 82, 90];
/// Chance in percent that armor stops one hit, indexed by armor.
const BLOCK_CHANCE: [i32; 4] = [0, 25, 40, 55];

/// Roll the damage of one shot.
///
/// 1. 5% of shots miss outright
/// 2. each of [`DAMAGE_DICE`] dice adds 1 with the attack's hit chance
/// 3. at most two hits may then be blocked by armor
pub fn roll_damage(rng: &mut impl Rng, attack: i32, armor: i32) -> i32 {
    if rng.random_range(0..100) < 5 {
        return 0;
    }

    let atk = (attack.max(0) as usize).min(HIT_CHANCE.len() - 1);
    let def = (armor.max(0) as usize).min(BLOCK_CHANCE.len() - 1);

    let mut dmg = 0;
    for _ in 0..DAMAGE_DICE {
        if rng.random_range(0..100) < HIT_CHANCE[atk] {
            dmg += 1;
        }
    }
    for _ in 0..dmg.min(2) {
        if rng.random_range(0..100) < BLOCK_CHANCE[def] {
            dmg -= 1;
        }
    }
    dmg.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn zero_attack_never_hurts() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            assert_eq!(roll_damage(&mut rng, 0, 0), 0);
        }
    }

    #[test]
    fn damage_within_dice() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut total = 0;
        for _ in 0..500 {
            let d = roll_damage(&mut rng, 9, 0);
            assert!((0..=DAMAGE_DICE).contains(&d));
            total += d;
        }
        assert!(total > 0);
    }

    #[test]
    fn armor_reduces_damage() {
        let mut a = SmallRng::seed_from_u64(8);
        let mut b = SmallRng::seed_from_u64(8);
        let bare: i32 = (0..500).map(|_| roll_damage(&mut a, 3, 0)).sum();
        let armored: i32 = (0..500).map(|_| roll_damage(&mut b, 3, 3)).sum();
        assert!(armored < bare);
    }
}
