//! Action input handling.
//!
//! Inputs reach the action as `INPUT_<NAME>` environment variables. Reading
//! them goes through [`InputProvider`] so that everything downstream can be
//! tested without touching the process environment.

use crate::parser::Expansion;
use std::collections::HashMap;
use std::env;

/// Source of named action inputs.
pub trait InputProvider {
    /// Returns the trimmed value of the input, or an empty string if unset.
    fn get_input(&self, name: &str) -> String;
}

/// Reads inputs from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvInputs;

/// Environment variable holding the value of input `name`.
///
/// # Examples
///
/// ```
/// use cmake_action::inputs::input_var;
///
/// assert_eq!(input_var("source-dir"), "INPUT_SOURCE-DIR");
/// ```
pub fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.to_uppercase())
}

impl InputProvider for EnvInputs {
    fn get_input(&self, name: &str) -> String {
        env::var(input_var(name))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

impl InputProvider for HashMap<String, String> {
    fn get_input(&self, name: &str) -> String {
        self.get(name)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

/// Resolves `$NAME` references against the process environment.
/// Variables that are unset or not valid unicode resolve to nothing.
pub fn env_lookup(name: &str) -> Option<Expansion> {
    env::var(name).ok().map(Expansion::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_var_keeps_dashes() {
        assert_eq!(input_var("run-build"), "INPUT_RUN-BUILD");
        assert_eq!(input_var("generator"), "INPUT_GENERATOR");
    }

    #[test]
    fn test_map_inputs_are_trimmed() {
        let inputs = HashMap::from([("generator".to_string(), "  Ninja\n".to_string())]);
        assert_eq!(inputs.get_input("generator"), "Ninja");
        assert_eq!(inputs.get_input("build-dir"), "");
    }

    #[test]
    fn test_env_inputs() {
        env::set_var("INPUT_CMAKE-ACTION-TEST-INPUT", " value ");
        assert_eq!(EnvInputs.get_input("cmake-action-test-input"), "value");
        assert_eq!(EnvInputs.get_input("cmake-action-test-unset"), "");
        env::remove_var("INPUT_CMAKE-ACTION-TEST-INPUT");
    }

    #[test]
    fn test_env_lookup() {
        env::set_var("CMAKE_ACTION_TEST_LOOKUP", "/opt/tools");
        assert_eq!(
            env_lookup("CMAKE_ACTION_TEST_LOOKUP"),
            Some(Expansion::Text("/opt/tools".to_string()))
        );
        assert_eq!(env_lookup("CMAKE_ACTION_TEST_MISSING"), None);
        env::remove_var("CMAKE_ACTION_TEST_LOOKUP");
    }
}
