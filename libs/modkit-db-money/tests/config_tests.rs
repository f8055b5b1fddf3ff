#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Layered configuration: defaults, YAML file, `MONEY_*` environment.

use std::io::Write;

use modkit_db_money::{MoneyConfig, RoundingPolicy, composite_money_with};
use tempfile::NamedTempFile;

const ENV_KEYS: [&str; 2] = ["MONEY_ROUNDING", "MONEY_AMOUNT_SUFFIX"];

fn yaml(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_without_sources() {
    temp_env::with_vars_unset(ENV_KEYS, || {
        let cfg = MoneyConfig::load(None).unwrap();
        assert_eq!(cfg, MoneyConfig::default());
        assert_eq!(cfg.rounding, RoundingPolicy::HalfUp);
    });
}

#[test]
fn yaml_file_overrides_defaults() {
    let file = yaml("rounding: half_even\ncurrency_suffix: _ccy\nrange_check: false\n");
    temp_env::with_vars_unset(ENV_KEYS, || {
        let cfg = MoneyConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.rounding, RoundingPolicy::HalfEven);
        assert_eq!(cfg.currency_suffix, "_ccy");
        assert_eq!(cfg.amount_suffix, "_amount");
        assert!(!cfg.range_check);

        let col = composite_money_with(&cfg, 8, 5, "price").unwrap();
        assert_eq!(col.currency_column(), "price_ccy");
        assert_eq!(col.rounding(), RoundingPolicy::HalfEven);
        assert!(!col.range_check());
    });
}

#[test]
fn environment_overrides_yaml() {
    let file = yaml("rounding: half_up\namount_suffix: _value\n");
    temp_env::with_vars(
        [
            ("MONEY_ROUNDING", Some("half_even")),
            ("MONEY_AMOUNT_SUFFIX", None),
        ],
        || {
            let cfg = MoneyConfig::load(Some(file.path())).unwrap();
            assert_eq!(cfg.rounding, RoundingPolicy::HalfEven);
            assert_eq!(cfg.amount_suffix, "_value");
        },
    );
}

#[test]
fn clashing_suffixes_are_rejected() {
    temp_env::with_vars(
        [
            ("MONEY_ROUNDING", None),
            ("MONEY_AMOUNT_SUFFIX", Some("_currency")),
        ],
        || {
            let err = MoneyConfig::load(None).unwrap_err();
            assert!(err.to_string().contains("must differ"), "{err}");
        },
    );
}

#[test]
fn malformed_yaml_is_a_config_error() {
    let file = yaml("rounding: [not, a, policy]\n");
    temp_env::with_vars_unset(ENV_KEYS, || {
        let err = MoneyConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, modkit_db_money::MoneyError::Config(_)));
    });
}
