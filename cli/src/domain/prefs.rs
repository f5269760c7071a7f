//! Domain preferences: the typed attribute map applied with `qvm-prefs`.
//!
//! `PrefsBuilder` validates every value as it is set and never stores an
//! invalid one. The single cross-field rule, `maxmem > memory`, is checked
//! by `build()` so the two can be set in either order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;
use crate::domain::validate::{is_kernel_version, is_mac, is_meaningful_string};

pub const LABELS: &[&str] = &[
    "red", "orange", "yellow", "green", "gray", "blue", "purple", "black",
];
pub const VIRT_MODES: &[&str] = &["pvh", "hvm", "pv"];

/// Applied when `memory` is not set.
pub const DEFAULT_MEMORY: u32 = 400;
/// Applied when `maxmem` is not set.
pub const DEFAULT_MAXMEM: u32 = 1000;

static PREF_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid regex")
});

/// Rejects a label outside the fixed label set.
///
/// # Errors
///
/// Returns `ValidationFailed` for the `label` field.
pub fn validate_label(label: &str) -> Result<(), DomainError> {
    if LABELS.contains(&label) {
        Ok(())
    } else {
        Err(DomainError::invalid(
            "label",
            format!("'{label}' must be one of: {}", LABELS.join(", ")),
        ))
    }
}

/// A single preference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    Bool(bool),
    Int(u32),
    Str(String),
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // qvm-prefs parses booleans the way Python prints them
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for PrefValue {
    fn from(value: u32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// Key/value preferences with unique keys, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSet(BTreeMap<String, PrefValue>);

impl PreferenceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a preference.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` if the key is not a lowercase identifier,
    /// or a text value starts with `-`.
    pub fn insert(
        &mut self,
        key: &str,
        value: impl Into<PrefValue>,
    ) -> Result<Option<PrefValue>, DomainError> {
        if !PREF_KEY_RE.is_match(key) {
            return Err(DomainError::invalid(
                "preference",
                format!("'{key}' is not a valid preference name"),
            ));
        }
        let value = value.into();
        if let PrefValue::Str(text) = &value {
            reject_option_like(key, text)?;
        }
        Ok(self.0.insert(key.to_string(), value))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PrefValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PrefValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of `prefs` (or an empty set) with `label` set, overriding any
    /// label already present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` if the label is not in the label set.
    pub fn with_label(prefs: Option<&Self>, label: &str) -> Result<Self, DomainError> {
        validate_label(label)?;
        let mut merged = prefs.cloned().unwrap_or_default();
        merged.insert("label", label)?;
        Ok(merged)
    }
}

/// `qvm-prefs` would parse a leading dash as one of its own options.
fn reject_option_like(key: &str, value: &str) -> Result<(), DomainError> {
    if value.starts_with('-') {
        return Err(DomainError::invalid(key, "must not start with '-'"));
    }
    Ok(())
}

macro_rules! flag_setters {
    ($($name:ident),* $(,)?) => {
        $(
            #[must_use]
            pub fn $name(self, value: bool) -> Self {
                self.set(stringify!($name), PrefValue::Bool(value))
            }
        )*
    };
}

macro_rules! text_setters {
    ($($name:ident),* $(,)?) => {
        $(
            /// # Errors
            ///
            /// Returns `ValidationFailed` for an empty or blank value.
            pub fn $name(self, value: &str) -> Result<Self, DomainError> {
                self.text(stringify!($name), value)
            }
        )*
    };
}

macro_rules! positive_setters {
    ($($name:ident),* $(,)?) => {
        $(
            /// # Errors
            ///
            /// Returns `ValidationFailed` when the value is zero.
            pub fn $name(self, value: u32) -> Result<Self, DomainError> {
                self.positive(stringify!($name), value)
            }
        )*
    };
}

/// Chainable, fail-fast builder over the fixed preference schema.
///
/// ```
/// use qsm_cli::domain::prefs::PrefsBuilder;
///
/// let prefs = PrefsBuilder::new()
///     .label("purple")?
///     .memory(800)?
///     .maxmem(4000)?
///     .autostart(true)
///     .build()?;
/// assert_eq!(prefs.len(), 4);
/// # Ok::<(), qsm_cli::domain::DomainError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PrefsBuilder {
    prefs: BTreeMap<String, PrefValue>,
}

impl Default for PrefsBuilder {
    fn default() -> Self {
        let mut prefs = BTreeMap::new();
        prefs.insert("memory".to_string(), PrefValue::Int(DEFAULT_MEMORY));
        prefs.insert("maxmem".to_string(), PrefValue::Int(DEFAULT_MAXMEM));
        Self { prefs }
    }
}

impl PrefsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    flag_setters!(
        autostart,
        debug,
        include_in_backups,
        provides_network,
        template_for_dispvms,
    );

    text_setters!(
        default_dispvm,
        default_user,
        kernel_opts,
        management_dispvm,
        name,
        netvm,
        template,
    );

    positive_setters!(vcpus, shutdown_timeout, qrexec_timeout, memory, maxmem);

    /// # Errors
    ///
    /// Returns `ValidationFailed` unless the label is in [`LABELS`].
    pub fn label(self, value: &str) -> Result<Self, DomainError> {
        validate_label(value)?;
        Ok(self.set("label", PrefValue::from(value)))
    }

    /// # Errors
    ///
    /// Returns `ValidationFailed` unless the mode is in [`VIRT_MODES`].
    pub fn virt_mode(self, value: &str) -> Result<Self, DomainError> {
        if !VIRT_MODES.contains(&value) {
            return Err(DomainError::invalid(
                "virt_mode",
                format!("'{value}' must be one of: {}", VIRT_MODES.join(", ")),
            ));
        }
        Ok(self.set("virt_mode", PrefValue::from(value)))
    }

    /// # Errors
    ///
    /// Returns `ValidationFailed` unless the value is a colon-separated MAC.
    pub fn mac(self, value: &str) -> Result<Self, DomainError> {
        if !is_mac(value) {
            return Err(DomainError::invalid(
                "mac",
                format!("'{value}' is not a MAC address"),
            ));
        }
        Ok(self.set("mac", PrefValue::from(value)))
    }

    /// # Errors
    ///
    /// Returns `ValidationFailed` unless the value is numbers, dots and dashes.
    pub fn kernel(self, value: &str) -> Result<Self, DomainError> {
        if !is_kernel_version(value) {
            return Err(DomainError::invalid(
                "kernel",
                format!("'{value}' should be numbers, dots, and dashes"),
            ));
        }
        Ok(self.set("kernel", PrefValue::from(value)))
    }

    /// Finalize the preferences.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for `maxmem` unless `maxmem > memory`.
    pub fn build(self) -> Result<PreferenceSet, DomainError> {
        let memory = self.int("memory").unwrap_or(DEFAULT_MEMORY);
        let maxmem = self.int("maxmem").unwrap_or(DEFAULT_MAXMEM);
        if maxmem <= memory {
            return Err(DomainError::invalid(
                "maxmem",
                format!("must be greater than memory (maxmem: {maxmem}, memory: {memory})"),
            ));
        }
        Ok(PreferenceSet(self.prefs))
    }

    fn set(mut self, key: &str, value: PrefValue) -> Self {
        self.prefs.insert(key.to_string(), value);
        self
    }

    fn text(self, key: &str, value: &str) -> Result<Self, DomainError> {
        if !is_meaningful_string(value) {
            return Err(DomainError::invalid(key, "must be a non-empty string"));
        }
        reject_option_like(key, value)?;
        Ok(self.set(key, PrefValue::from(value)))
    }

    fn positive(self, key: &str, value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::invalid(key, "must be an integer > 0"));
        }
        Ok(self.set(key, PrefValue::Int(value)))
    }

    fn int(&self, key: &str) -> Option<u32> {
        match self.prefs.get(key) {
            Some(PrefValue::Int(n)) => Some(*n),
            _ => None,
        }
    }
}
