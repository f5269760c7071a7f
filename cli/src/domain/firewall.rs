//! Firewall rules for `qvm-firewall <domain> add`.
//!
//! A rule is validated as a whole when it is constructed; an instance of
//! [`FirewallRule`] is always safe to turn into command arguments.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;
use crate::domain::validate::is_ip_network;

/// Highest ICMP type the control plane accepts.
pub const MAX_ICMP_TYPE: i64 = 43;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirewallAction {
    Accept,
    Drop,
}

impl FromStr for FirewallAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "drop" => Ok(Self::Drop),
            other => Err(DomainError::invalid(
                "action",
                format!("'{other}' should be accept or drop"),
            )),
        }
    }
}

impl fmt::Display for FirewallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "accept",
            Self::Drop => "drop",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
}

impl FromStr for Protocol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            "icmp" => Ok(Self::Icmp),
            other => Err(DomainError::invalid(
                "proto",
                format!("'{other}' must be icmp, tcp, or udp"),
            )),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Icmp => "icmp",
        })
    }
}

/// An inclusive port range; a single port has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

/// Comma-separated ports or `low-high` ranges, every value in 1–65535.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortList(Vec<PortRange>);

impl PortList {
    #[must_use]
    pub fn ranges(&self) -> &[PortRange] {
        &self.0
    }
}

fn parse_port(raw: &str, list: &str) -> Result<u16, DomainError> {
    let invalid = || {
        DomainError::invalid(
            "dstports",
            format!("values must be integers between 1 - 65535: {list}"),
        )
    };
    let port: u32 = raw.parse().map_err(|_| invalid())?;
    match u16::try_from(port) {
        Ok(p) if p >= 1 => Ok(p),
        _ => Err(invalid()),
    }
}

impl FromStr for PortList {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit() || b == b'-' || b == b',') {
            return Err(DomainError::invalid(
                "dstports",
                format!("use '-' ',' or integers only: {s}"),
            ));
        }
        let mut ranges = Vec::new();
        for item in s.split(',') {
            let (start, end) = match item.split_once('-') {
                Some((lo, hi)) => (parse_port(lo, s)?, parse_port(hi, s)?),
                None => {
                    let port = parse_port(item, s)?;
                    (port, port)
                }
            };
            if start > end {
                return Err(DomainError::invalid(
                    "dstports",
                    format!("range {start}-{end} is reversed: {s}"),
                ));
            }
            ranges.push(PortRange { start, end });
        }
        Ok(Self(ranges))
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if r.start == r.end {
                write!(f, "{}", r.start)?;
            } else {
                write!(f, "{}-{}", r.start, r.end)?;
            }
        }
        Ok(())
    }
}

/// Unvalidated rule fields, as a caller supplies them.
#[derive(Debug, Clone, Copy)]
pub struct FirewallRequest<'a> {
    pub action: &'a str,
    /// IPv4/IPv6 address or CIDR network.
    pub dsthost: &'a str,
    pub proto: &'a str,
    pub dstports: &'a str,
    /// Only meaningful with `proto = "icmp"`.
    pub icmptype: Option<i64>,
}

/// A validated firewall rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallRule {
    pub action: FirewallAction,
    pub dsthost: String,
    pub proto: Protocol,
    pub dstports: PortList,
    pub icmptype: Option<u8>,
}

impl TryFrom<&FirewallRequest<'_>> for FirewallRule {
    type Error = DomainError;

    fn try_from(req: &FirewallRequest<'_>) -> Result<Self, Self::Error> {
        let action: FirewallAction = req.action.parse()?;
        let dstports: PortList = req.dstports.parse()?;
        if !is_ip_network(req.dsthost) {
            return Err(DomainError::invalid(
                "dsthost",
                format!("should be a valid ip address or network: {}", req.dsthost),
            ));
        }
        let proto: Protocol = req.proto.parse()?;

        let icmptype = match req.icmptype {
            None => None,
            Some(t) => {
                if !(0..=MAX_ICMP_TYPE).contains(&t) {
                    return Err(DomainError::invalid(
                        "icmptype",
                        format!("must be an integer, 0 <= n <= {MAX_ICMP_TYPE}: {t}"),
                    ));
                }
                if proto != Protocol::Icmp {
                    return Err(DomainError::invalid(
                        "icmptype",
                        format!("proto must be icmp if setting icmp type: {proto}"),
                    ));
                }
                u8::try_from(t).ok()
            }
        };

        Ok(Self {
            action,
            dsthost: req.dsthost.to_string(),
            proto,
            dstports,
            icmptype,
        })
    }
}

impl FirewallRule {
    /// `key=value` arguments following `qvm-firewall <domain> add`.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("action={}", self.action),
            format!("dsthost={}", self.dsthost),
            format!("proto={}", self.proto),
            format!("dstports={}", self.dstports),
        ];
        if let Some(t) = self.icmptype {
            args.push(format!("icmptype={t}"));
        }
        args
    }
}
