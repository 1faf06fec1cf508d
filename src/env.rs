//! Environment lookups behind a seam.
//!
//! The binary reads the process environment through [`Env::real()`];
//! tests build an [`Env::mock()`] from a fixed set of pairs so that
//! config layering can be exercised without touching global state.

use std::collections::HashMap;

/// Environment variable reader.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Read from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Read only from the given pairs.
    #[cfg(test)]
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up a variable. Blank values count as unset.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        let value = match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent)?,
            None => std::env::var(name)?,
        };
        if value.trim().is_empty() {
            return Err(std::env::VarError::NotPresent);
        }
        Ok(value)
    }

    /// Interpret a variable as an on/off switch.
    ///
    /// `Err` carries the raw value when it is set but not recognised.
    pub fn flag(&self, name: &str) -> Option<Result<bool, String>> {
        let value = self.var(name).ok()?;
        Some(match value.to_lowercase().as_str() {
            "false" | "0" | "no" | "off" => Ok(false),
            "true" | "1" | "yes" | "on" => Ok(true),
            _ => Err(value),
        })
    }
}
