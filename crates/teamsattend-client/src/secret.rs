//! Secret reference resolver.
//!
//! Identity values in `config.toml` may point at secrets kept elsewhere:
//!
//! - `pass::path/in/store` - first line of `pass show path/in/store`
//! - `env::VAR_NAME` - the value of `$VAR_NAME`
//! - anything else - used as written

use std::process::Command;

/// A parsed configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretRef<'a> {
    /// An entry of the `pass` password store.
    Pass(&'a str),
    /// An environment variable.
    Env(&'a str),
    /// A literal value.
    Plain(&'a str),
}

impl<'a> SecretRef<'a> {
    /// Parses a configuration value.
    pub fn parse(value: &'a str) -> Self {
        if let Some(path) = value.strip_prefix("pass::") {
            Self::Pass(path)
        } else if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var)
        } else {
            Self::Plain(value)
        }
    }

    /// Returns the secret this reference points at.
    pub fn resolve(&self) -> Result<String, String> {
        match *self {
            Self::Pass(path) => resolve_pass(path),
            Self::Env(var) => resolve_env(var),
            Self::Plain(value) => Ok(value.to_string()),
        }
    }
}

/// Resolves a value that may be a secret reference.
pub fn resolve(value: &str) -> Result<String, String> {
    SecretRef::parse(value).resolve()
}

fn resolve_pass(path: &str) -> Result<String, String> {
    let output = Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {}` failed (exit {}): {}",
            path,
            output.status,
            stderr.trim()
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}

fn resolve_env(var: &str) -> Result<String, String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Ok(_) => Err(format!("environment variable `{}` is empty", var)),
        Err(_) => Err(format!("environment variable `{}` is not set", var)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefixes() {
        assert_eq!(SecretRef::parse("pass::work/azure"), SecretRef::Pass("work/azure"));
        assert_eq!(SecretRef::parse("env::AZ_TENANT"), SecretRef::Env("AZ_TENANT"));
        assert_eq!(
            SecretRef::parse("11111111-2222-3333-4444-555555555555"),
            SecretRef::Plain("11111111-2222-3333-4444-555555555555")
        );
    }

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(resolve("contoso.onmicrosoft.com").unwrap(), "contoso.onmicrosoft.com");
        assert_eq!(resolve("").unwrap(), "");
    }

    #[test]
    fn env_prefix_resolves() {
        unsafe {
            std::env::set_var("_TEAMSATTEND_TEST_SECRET", "tenant-from-env\n");
        }
        assert_eq!(resolve("env::_TEAMSATTEND_TEST_SECRET").unwrap(), "tenant-from-env");
        unsafe {
            std::env::remove_var("_TEAMSATTEND_TEST_SECRET");
        }
    }

    #[test]
    fn env_prefix_empty_var_errors() {
        unsafe {
            std::env::set_var("_TEAMSATTEND_TEST_EMPTY", "  ");
        }
        let err = resolve("env::_TEAMSATTEND_TEST_EMPTY").unwrap_err();
        assert!(err.contains("is empty"));
        unsafe {
            std::env::remove_var("_TEAMSATTEND_TEST_EMPTY");
        }
    }

    #[test]
    fn env_prefix_missing_var_errors() {
        let err = resolve("env::_TEAMSATTEND_NONEXISTENT_VAR_12345").unwrap_err();
        assert!(err.contains("not set"));
    }

    #[test]
    fn pass_prefix_unknown_entry_errors() {
        assert!(resolve("pass::nonexistent/entry/that/should/not/exist/12345").is_err());
    }
}
