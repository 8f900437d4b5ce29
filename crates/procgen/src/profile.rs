//! Vocabulary profiles: the templates and category pools prompts are built from.
//!
//! A profile is validated once when it is loaded and is read-only afterwards.
//! Pool order is the order the categories appear in the source document, and
//! it is part of the generator's output contract: pool `n` hashes with slot `n + 1`.

use crate::error::ProfileError;
use serde_json::Value;
use std::path::Path;

const DEFAULT_PROFILE_JSON: &str = include_str!("../profiles/default.json");
const CLASSIC_PROFILE_JSON: &str = include_str!("../profiles/classic.json");

/// One named category of interchangeable phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub name: String,
    pub entries: Vec<String>,
}

impl Pool {
    /// The `{name}` marker templates use to reference this pool.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.name)
    }
}

/// Validated generation data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    templates: Vec<String>,
    pools: Vec<Pool>,
}

/// Display-only summary of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStats {
    pub name: String,
    pub templates: usize,
    pub pools: usize,
    pub combinations: u128,
}

impl Profile {
    /// Build a profile from already-parsed parts. Pools keep the given order.
    pub fn new<T, P, E>(templates: T, pools: P) -> Result<Self, ProfileError>
    where
        T: IntoIterator,
        T::Item: Into<String>,
        P: IntoIterator<Item = (String, E)>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let profile = Self {
            name: None,
            description: None,
            version: None,
            templates: templates.into_iter().map(Into::into).collect(),
            pools: pools
                .into_iter()
                .map(|(name, entries)| Pool {
                    name,
                    entries: entries.into_iter().map(Into::into).collect(),
                })
                .collect(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// The embedded full vocabulary (8 categories).
    pub fn builtin() -> Result<Self, ProfileError> {
        Self::from_json_str(DEFAULT_PROFILE_JSON)
    }

    /// The embedded compact vocabulary (5 categories).
    pub fn classic() -> Result<Self, ProfileError> {
        Self::from_json_str(CLASSIC_PROFILE_JSON)
    }

    /// Read and validate a JSON profile from disk.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let data = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_json_str(&data)?;
        log::info!(
            "Loaded profile {:?} from {:?} ({} templates, {} pools)",
            profile.display_name(),
            path,
            profile.templates.len(),
            profile.pools.len()
        );
        Ok(profile)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ProfileError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_json_value(&value)
    }

    /// Structural validation of an untyped document.
    pub fn from_json_value(value: &Value) -> Result<Self, ProfileError> {
        let templates = value
            .get("templates")
            .and_then(Value::as_array)
            .filter(|t| !t.is_empty())
            .ok_or(ProfileError::MissingTemplates)?
            .iter()
            .enumerate()
            .map(|(index, t)| {
                t.as_str()
                    .map(str::to_owned)
                    .ok_or(ProfileError::InvalidTemplate { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pool_map = value
            .get("pools")
            .and_then(Value::as_object)
            .ok_or(ProfileError::MissingPools)?;

        let mut pools = Vec::with_capacity(pool_map.len());
        for (name, entries) in pool_map {
            let entries = entries
                .as_array()
                .filter(|e| !e.is_empty())
                .ok_or_else(|| ProfileError::EmptyPool { name: name.clone() })?;
            let entries = entries
                .iter()
                .enumerate()
                .map(|(index, e)| {
                    e.as_str().map(str::to_owned).ok_or_else(|| ProfileError::InvalidEntry {
                        name: name.clone(),
                        index,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            pools.push(Pool {
                name: name.clone(),
                entries,
            });
        }

        let text_field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);
        let profile = Self {
            name: text_field("name"),
            description: text_field("description"),
            version: text_field("version"),
            templates,
            pools,
        };

        for missing in profile.unresolved_placeholders() {
            log::warn!(
                "Profile {:?} references {{{}}} but has no such pool; it will be left as-is",
                profile.display_name(),
                missing
            );
        }
        Ok(profile)
    }

    /// Check the invariants the generator relies on.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.templates.is_empty() {
            return Err(ProfileError::MissingTemplates);
        }
        if let Some(pool) = self.pools.iter().find(|p| p.entries.is_empty()) {
            return Err(ProfileError::EmptyPool {
                name: pool.name.clone(),
            });
        }
        Ok(())
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Pools in generation order.
    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn pool(&self, name: &str) -> Option<&Pool> {
        self.pools.iter().find(|p| p.name == name)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Number of distinct (template, pool entry...) selections.
    ///
    /// Saturates at `u128::MAX` instead of wrapping.
    pub fn combination_count(&self) -> u128 {
        self.pools
            .iter()
            .fold(self.templates.len() as u128, |total, pool| {
                total.saturating_mul(pool.entries.len() as u128)
            })
    }

    pub fn stats(&self) -> ProfileStats {
        ProfileStats {
            name: self.display_name().to_owned(),
            templates: self.templates.len(),
            pools: self.pools.len(),
            combinations: self.combination_count(),
        }
    }

    /// Placeholder names used by templates that no pool provides.
    pub fn unresolved_placeholders(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for template in &self.templates {
            for name in placeholders(template) {
                if self.pool(name).is_none() && !missing.iter().any(|m| m == name) {
                    missing.push(name.to_owned());
                }
            }
        }
        missing
    }
}

/// Iterate the `{name}` markers in a template.
fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    template.split('{').skip(1).filter_map(|rest| {
        let end = rest.find('}')?;
        let name = &rest[..end];
        (!name.is_empty()).then_some(name)
    })
}

/// Group digits in threes for display: `5597577216` → `5,597,577,216`.
pub fn format_count(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(name: &str, len: usize) -> (String, Vec<String>) {
        (name.to_owned(), (0..len).map(|i| format!("{name}{i}")).collect())
    }

    #[test]
    fn builtin_profile_shape() {
        let p = Profile::builtin().unwrap();
        assert_eq!(p.templates().len(), 8);
        let names: Vec<_> = p.pools().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["subject", "action", "environment", "style", "lighting", "camera", "details", "mood"]
        );
        assert_eq!(p.display_name(), "Default");
        assert_eq!(p.combination_count(), 188_274_509_660_160);
        assert!(p.unresolved_placeholders().is_empty());
    }

    #[test]
    fn classic_profile_shape() {
        let p = Profile::classic().unwrap();
        let sizes: Vec<_> = p.pools().iter().map(|p| p.entries.len()).collect();
        assert_eq!(sizes, [88, 51, 56, 58, 48]);
        assert_eq!(p.combination_count(), 5_597_577_216);
    }

    #[test]
    fn combination_count_is_exact_at_large_magnitude() {
        let pools = [("subject", 86), ("action", 50), ("environment", 56), ("style", 60), ("mood", 48)]
            .into_iter()
            .map(|(n, l)| pool(n, l));
        let p = Profile::new((0..8).map(|i| format!("t{i}")), pools).unwrap();
        assert_eq!(p.combination_count(), 8u128 * 86 * 50 * 56 * 60 * 48);
    }

    #[test]
    fn combination_count_does_not_wrap() {
        let pools = (0..12).map(|i| pool(&format!("c{i}"), 60));
        let p = Profile::new(["x"], pools).unwrap();
        assert_eq!(p.combination_count(), 60u128.pow(12));

        let huge = (0..30).map(|i| pool(&format!("c{i}"), 1000));
        let p = Profile::new(["x"], huge).unwrap();
        assert_eq!(p.combination_count(), u128::MAX);
    }

    #[test]
    fn pool_order_follows_document() {
        let p = Profile::from_json_str(
            r#"{"templates":["{z} {a}"],"pools":{"z":["1"],"m":["2"],"a":["3"]}}"#,
        )
        .unwrap();
        let names: Vec<_> = p.pools().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["z", "m", "a"]);
    }

    #[test]
    fn rejects_missing_or_empty_templates() {
        let err = Profile::from_json_str(r#"{"pools":{}}"#).unwrap_err();
        assert!(matches!(err, ProfileError::MissingTemplates));
        let err = Profile::from_json_str(r#"{"templates":[],"pools":{}}"#).unwrap_err();
        assert!(matches!(err, ProfileError::MissingTemplates));
        let err = Profile::from_json_str(r#"{"templates":"x","pools":{}}"#).unwrap_err();
        assert!(matches!(err, ProfileError::MissingTemplates));
    }

    #[test]
    fn rejects_missing_pools_and_empty_pool() {
        let err = Profile::from_json_str(r#"{"templates":["a"]}"#).unwrap_err();
        assert!(matches!(err, ProfileError::MissingPools));
        let err = Profile::from_json_str(r#"{"templates":["a"],"pools":{"s":[]}}"#).unwrap_err();
        assert!(matches!(err, ProfileError::EmptyPool { ref name } if name == "s"));
        assert_eq!(err.to_string(), "Pool 's' must be a non-empty array");
    }

    #[test]
    fn rejects_non_string_entries() {
        let err = Profile::from_json_str(r#"{"templates":["a"],"pools":{"s":["ok", 3]}}"#).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidEntry { index: 1, .. }));
        let err = Profile::from_json_str(r#"{"templates":["a", null],"pools":{}}"#).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidTemplate { index: 1 }));
    }

    #[test]
    fn rejects_bad_json() {
        let err = Profile::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ProfileError::Json(_)));
    }

    #[test]
    fn new_validates() {
        let empty: [&str; 0] = [];
        assert!(Profile::new(empty, [pool("a", 1)]).is_err());
        assert!(Profile::new(["t"], [pool("a", 0)]).is_err());
        assert!(Profile::new(["t"], Vec::<(String, Vec<String>)>::new()).is_ok());
    }

    #[test]
    fn unresolved_placeholders_are_reported_once() {
        let p = Profile::new(["{a} {b} {b} {}"], [pool("a", 2)]).unwrap();
        assert_eq!(p.unresolved_placeholders(), ["b"]);
    }

    #[test]
    fn stats_and_formatting() {
        let p = Profile::classic().unwrap();
        let stats = p.stats();
        assert_eq!(stats.name, "Classic");
        assert_eq!(stats.templates, 8);
        assert_eq!(stats.pools, 5);
        assert_eq!(format_count(stats.combinations), "5,597,577,216");
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
    }
}
