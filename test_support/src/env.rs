//! Mocked toolchain environments.

use mockable::MockEnv;
use std::collections::HashMap;
use std::env::VarError;

/// Build a [`MockEnv`] answering only the listed variables.
///
/// Every other lookup reports [`VarError::NotPresent`], so graph tests never
/// observe the host toolchain.
///
/// # Examples
///
/// ```
/// use mockable::Env;
/// use test_support::env::mock_env;
/// use toolchain_env::SRC_ENV;
///
/// let env = mock_env(&[(SRC_ENV, "util.c")]);
/// assert_eq!(env.raw(SRC_ENV).unwrap(), "util.c");
/// assert!(env.raw("FC").is_err());
/// ```
pub fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_raw()
        .returning(move |key| map.get(key).cloned().ok_or(VarError::NotPresent));
    env
}

/// Every toolchain variable, for clearing them on a child process.
pub fn toolchain_vars() -> impl Iterator<Item = &'static str> {
    toolchain_env::ALL.into_iter()
}
