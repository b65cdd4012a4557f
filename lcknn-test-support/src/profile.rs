//! Property-test run profile read from the environment.
//!
//! Every proptest suite in the workspace sizes itself through
//! [`ProptestRunProfile`] so CI can raise or lower the case count in one
//! place.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "LCKNN_PROPTEST_CASES";
/// Environment variable enabling forked proptest execution.
pub const FORK_ENV_KEY: &str = "LCKNN_PBT_FORK";

/// Case count and fork setting for property suites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads the profile from the environment, falling back to the defaults
    /// for unset or unparsable values.
    ///
    /// # Examples
    /// ```
    /// use lcknn_test_support::profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: read_or(CASES_ENV_KEY, default_cases, parse_cases),
            fork: read_or(FORK_ENV_KEY, default_fork, parse_flag),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub const fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    pub const fn fork(&self) -> bool {
        self.fork
    }
}

fn read_or<T>(key: &'static str, default: T, parse: fn(&str) -> Result<T, String>) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|reason| {
        tracing::warn!(env = key, raw = %raw, reason = %reason, "ignoring invalid override");
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("case count must be positive".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(error.to_string()),
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("`{other}` is not a boolean flag")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rstest::rstest;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets or clears a variable and restores its previous value on drop.
    struct EnvGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvGuard {
        fn new(key: &'static str, value: Option<&str>) -> Self {
            let original = env::var(key).ok();
            write(key, value);
            Self { key, original }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            write(self.key, self.original.as_deref());
        }
    }

    fn write(key: &str, value: Option<&str>) {
        // SAFETY: every test touching the environment holds ENV_LOCK.
        unsafe {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }

    fn load_with(cases: Option<&str>, fork: Option<&str>, default_fork: bool) -> ProptestRunProfile {
        let _lock = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let _cases = EnvGuard::new(CASES_ENV_KEY, cases);
        let _fork = EnvGuard::new(FORK_ENV_KEY, fork);
        ProptestRunProfile::load(48, default_fork)
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let profile = load_with(None, None, false);
        assert_eq!(profile.cases(), 48);
        assert!(!profile.fork());
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 300 ", 300)]
    #[case("10000", 10_000)]
    fn case_overrides_are_applied(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(load_with(Some(raw), None, false).cases(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-4")]
    #[case("many")]
    fn invalid_case_overrides_fall_back(#[case] raw: &str) {
        assert_eq!(load_with(Some(raw), None, false).cases(), 48);
    }

    #[rstest]
    #[case("on", true)]
    #[case("Yes", true)]
    #[case("1", true)]
    #[case("OFF", false)]
    #[case("no", false)]
    #[case("0", false)]
    fn fork_overrides_are_applied(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(load_with(None, Some(raw), !expected).fork(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("2")]
    #[case("sometimes")]
    fn invalid_fork_overrides_fall_back(#[case] raw: &str) {
        assert!(load_with(None, Some(raw), true).fork());
    }
}
