//! Pure input predicates — no I/O, no async.
//!
//! Everything that ends up as an argument of a control-plane command is
//! checked here first, so a rejected value never reaches a process.

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

/// Domain names accepted by the control plane. A leading letter also keeps
/// a name from being parsed as an option.
pub static DOMAIN_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]{0,30}$").expect("valid regex")
});

pub static MAC_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-9A-Fa-f]{2}(:[0-9A-Fa-f]{2}){5}$").expect("valid regex")
});

/// Kernel versions: numbers separated by dots or dashes, e.g. `5.4.190-1`.
pub static KERNEL_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-9]+([.-][0-9]+)*$").expect("valid regex")
});

pub static PACKAGE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+:~-]*$").expect("valid regex")
});

/// Qubes service names, e.g. `crond` or `network-manager`.
pub static SERVICE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid regex")
});

/// One word of extra `qvm-create` arguments, e.g. `--class` or
/// `StandaloneVM`.
pub static CREATE_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9_.,:=/+@-]+$").expect("valid regex")
});

/// Rejects any name the control plane would not accept as a domain name.
///
/// # Errors
///
/// Returns `ValidationFailed` for the `domain` field.
pub fn validate_domain_name(name: &str) -> Result<(), DomainError> {
    if DOMAIN_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(DomainError::invalid(
            "domain",
            format!("'{name}' must start with a letter and contain at most 31 of [A-Za-z0-9_.-]"),
        ))
    }
}

/// Checks a non-empty package list where every entry is a single package.
///
/// # Errors
///
/// Returns `ValidationFailed` for the `packages` field.
pub fn validate_packages(packages: &[&str]) -> Result<(), DomainError> {
    if packages.is_empty() {
        return Err(DomainError::invalid("packages", "at least one package is required"));
    }
    if let Some(bad) = packages.iter().find(|p| !PACKAGE_NAME_RE.is_match(p)) {
        return Err(DomainError::invalid(
            "packages",
            format!("'{bad}' is not a valid package name"),
        ));
    }
    Ok(())
}

/// # Errors
///
/// Returns `ValidationFailed` for the `service` field.
pub fn validate_service_name(name: &str) -> Result<(), DomainError> {
    if SERVICE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(DomainError::invalid(
            "service",
            format!("'{name}' is not a valid service name"),
        ))
    }
}

/// Checks extra `qvm-create` arguments. The list must open with an option
/// so a stray value cannot be taken for the domain name.
///
/// # Errors
///
/// Returns `ValidationFailed` for the `options` field.
pub fn validate_create_options(options: &[&str]) -> Result<(), DomainError> {
    if let Some(first) = options.first().filter(|o| !o.starts_with('-')) {
        return Err(DomainError::invalid(
            "options",
            format!("'{first}' must be an option starting with '-'"),
        ));
    }
    if let Some(bad) = options.iter().find(|o| !CREATE_OPTION_RE.is_match(o)) {
        return Err(DomainError::invalid(
            "options",
            format!("'{bad}' is not a valid qvm-create argument"),
        ));
    }
    Ok(())
}

/// `true` unless the string is empty or only whitespace.
pub fn is_meaningful_string(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_mac(value: &str) -> bool {
    MAC_ADDRESS_RE.is_match(value)
}

pub fn is_kernel_version(value: &str) -> bool {
    KERNEL_VERSION_RE.is_match(value)
}

/// `true` for an IPv4/IPv6 address, or a network in CIDR notation.
///
/// Host bits may be set in a network (`10.1.2.3/8` is accepted).
pub fn is_ip_network(value: &str) -> bool {
    let (addr, prefix) = match value.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (value, None),
    };
    let Ok(addr) = addr.parse::<IpAddr>() else {
        return false;
    };
    let Some(prefix) = prefix else {
        return true;
    };
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    // `/08` is not a canonical prefix length
    if prefix.len() > 1 && prefix.starts_with('0') {
        return false;
    }
    let max = if addr.is_ipv4() { 32 } else { 128 };
    prefix.parse::<u8>().is_ok_and(|p| p <= max)
}
