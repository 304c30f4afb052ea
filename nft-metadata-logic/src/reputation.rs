/// Balance from which an owner is marked as a verified creator.
pub const VERIFIED_CREATOR_THRESHOLD: u64 = 3;
pub const MEDIUM_TIER_THRESHOLD: u64 = 2;
pub const HIGH_TIER_THRESHOLD: u64 = 5;
pub const MAX_SCORE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Tier {
    New,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reputation {
    pub verified: bool,
    pub tier: Tier,
    pub score: u64,
}

pub fn calculate(balance: u64) -> Reputation {
    let tier = match balance {
        b if b >= HIGH_TIER_THRESHOLD => Tier::High,
        b if b >= MEDIUM_TIER_THRESHOLD => Tier::Medium,
        _ => Tier::New,
    };
    Reputation {
        verified: balance >= VERIFIED_CREATOR_THRESHOLD,
        tier,
        score: balance.min(MAX_SCORE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, Tier::New)]
    #[case(1, Tier::New)]
    #[case(2, Tier::Medium)]
    #[case(4, Tier::Medium)]
    #[case(5, Tier::High)]
    #[case(6, Tier::High)]
    #[case(u64::MAX, Tier::High)]
    fn tier_thresholds(#[case] balance: u64, #[case] expected: Tier) {
        assert_eq!(calculate(balance).tier, expected);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(6, 6)]
    #[case(99, 99)]
    #[case(100, 100)]
    #[case(101, 100)]
    #[case(u64::MAX, 100)]
    fn score_is_capped(#[case] balance: u64, #[case] expected: u64) {
        assert_eq!(calculate(balance).score, expected);
    }

    #[test]
    fn verified_iff_balance_reaches_threshold() {
        for balance in 0..=10 {
            assert_eq!(calculate(balance).verified, balance >= 3, "balance {balance}");
        }
    }

    #[test]
    fn tiers_cover_every_balance_once() {
        let tiers: Vec<_> = (0..=6).map(|balance| calculate(balance).tier).collect();
        assert_eq!(
            tiers,
            vec![
                Tier::New,
                Tier::New,
                Tier::Medium,
                Tier::Medium,
                Tier::Medium,
                Tier::High,
                Tier::High
            ]
        );
        assert_eq!(Tier::Medium.to_string(), "Medium");
    }
}
