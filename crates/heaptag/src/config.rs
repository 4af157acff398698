use anyhow::Result;
use heaptag_contracts::ENV_INTERNAL_TAGS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModelConfig {
    /// Append the internal tier so the collector can read headers of native
    /// structures the same way it reads language values.
    pub include_internal_tags: bool,
}

impl ModelConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_env_value(std::env::var(ENV_INTERNAL_TAGS).ok().as_deref())
    }

    pub fn from_env_value(raw: Option<&str>) -> Result<Self> {
        let include_internal_tags = match raw {
            None => false,
            Some(raw) => parse_bool_env(ENV_INTERNAL_TAGS, raw)?,
        };
        Ok(Self {
            include_internal_tags,
        })
    }
}

fn parse_bool_env(name: &str, raw: &str) -> Result<bool> {
    match raw.trim() {
        "" | "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        other => anyhow::bail!("invalid {name}={other:?} (expected 0/1/true/false/yes/no)"),
    }
}
