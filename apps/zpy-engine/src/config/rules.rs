use std::env;

use serde::de::DeserializeOwned;

use crate::domain::rules::{
    BidRule, KittyMultiplierRule, RankSkipRule, RedealRule, RenegeRule, RuleConfig,
};
use crate::errors::config::ConfigError;

pub const RENEGE_VAR: &str = "ZPY_RENEGE";
pub const RANK_SKIP_VAR: &str = "ZPY_RANK_SKIP";
pub const KITTY_VAR: &str = "ZPY_KITTY";
pub const BID_VAR: &str = "ZPY_BID";
pub const REDEAL_VAR: &str = "ZPY_REDEAL";
pub const SEED_VAR: &str = "ZPY_SEED";

/// Builds a `RuleConfig` from environment variables; unset variables keep
/// the default variant.
pub fn rules_from_env() -> Result<RuleConfig, ConfigError> {
    rules_from(|var| env::var(var).ok())
}

/// Fixed game seed from `ZPY_SEED`, if set.
pub fn seed_from_env() -> Result<Option<u64>, ConfigError> {
    seed_from(env::var(SEED_VAR).ok())
}

/// Same as [`rules_from_env`] over an arbitrary lookup.
pub fn rules_from<F>(lookup: F) -> Result<RuleConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = RuleConfig::default();
    Ok(RuleConfig {
        renege: variant::<RenegeRule>(RENEGE_VAR, lookup(RENEGE_VAR), "forbid|accuse")?
            .unwrap_or(defaults.renege),
        rank: variant::<RankSkipRule>(
            RANK_SKIP_VAR,
            lookup(RANK_SKIP_VAR),
            "host_once|no_skip|no_pass|no_rule",
        )?
        .unwrap_or(defaults.rank),
        kitty: variant::<KittyMultiplierRule>(KITTY_VAR, lookup(KITTY_VAR), "exp|mult")?
            .unwrap_or(defaults.kitty),
        bid: variant::<BidRule>(BID_VAR, lookup(BID_VAR), "count_only|count_then_joker")?
            .unwrap_or(defaults.bid),
        redeal: variant::<RedealRule>(REDEAL_VAR, lookup(REDEAL_VAR), "no_trumps|never")?
            .unwrap_or(defaults.redeal),
    })
}

pub fn seed_from(raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidSeed {
                var: SEED_VAR,
                value,
            }),
    }
}

/// Parse a snake_case variant name the same way the wire format spells it.
fn variant<T: DeserializeOwned>(
    var: &'static str,
    raw: Option<String>,
    allowed: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map(Some)
        .map_err(|_| ConfigError::UnknownVariant {
            var,
            value,
            allowed,
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn unset_variables_keep_defaults() {
        assert_eq!(rules_from(lookup(&[])).unwrap(), RuleConfig::default());
    }

    #[test]
    fn variants_parse_case_insensitively() {
        let rules = rules_from(lookup(&[
            (RENEGE_VAR, "Accuse"),
            (RANK_SKIP_VAR, "no-skip"),
            (KITTY_VAR, "mult"),
            (BID_VAR, "count_only"),
            (REDEAL_VAR, "NEVER"),
        ]))
        .unwrap();
        assert_eq!(rules.renege, RenegeRule::Accuse);
        assert_eq!(rules.rank, RankSkipRule::NoSkip);
        assert_eq!(rules.kitty, KittyMultiplierRule::Mult);
        assert_eq!(rules.bid, BidRule::CountOnly);
        assert_eq!(rules.redeal, RedealRule::Never);
    }

    #[test]
    fn unknown_variant_names_the_variable() {
        let err = rules_from(lookup(&[(KITTY_VAR, "triple")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownVariant {
                var: KITTY_VAR,
                value: "triple".into(),
                allowed: "exp|mult",
            }
        );
    }

    #[test]
    fn seed_parses_or_errors() {
        assert_eq!(seed_from(None).unwrap(), None);
        assert_eq!(seed_from(Some(" 42 ".into())).unwrap(), Some(42));
        assert!(matches!(
            seed_from(Some("x".into())),
            Err(ConfigError::InvalidSeed { .. })
        ));
    }
}
