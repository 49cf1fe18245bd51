// ── Core identity types ──
//
// Bssid and Ssid form the identity of every tracked entry. Both are
// validating newtypes: events carrying a malformed BSSID, the wildcard
// BSSID, or the platform's unknown-SSID sentinel are rejected at the
// boundary instead of polluting the map.

use std::fmt;

/// Hardware identifier of one physical access point radio.
///
/// Normalized to lowercase colon-separated format (`aa:bb:cc:dd:ee:ff`).
/// Accepts colon-separated, dash-separated, or bare hex input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bssid(String);

/// The wildcard BSSID used by supplicants to mean "any access point".
const WILDCARD_BSSID: &str = "ff:ff:ff:ff:ff:ff";

impl Bssid {
    /// Parse and normalize. Returns `None` unless the input is exactly
    /// six hex octets in a common MAC format.
    pub fn parse(raw: &str) -> Option<Self> {
        let hex: String = raw
            .chars()
            .filter(|c| *c != ':' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        if hex.len() != 12 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let mut normalized = String::with_capacity(17);
        for (i, pair) in hex.as_bytes().chunks(2).enumerate() {
            if i > 0 {
                normalized.push(':');
            }
            normalized.push(char::from(pair[0]));
            normalized.push(char::from(pair[1]));
        }
        Some(Self(normalized))
    }

    /// True for the "any access point" wildcard, which never names a
    /// single physical radio and must not be tracked.
    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD_BSSID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable network name spanning one or more BSSIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ssid(String);

/// Sentinel reported by the platform when the SSID cannot be resolved.
const UNKNOWN_SSID: &str = "<unknown ssid>";

impl Ssid {
    /// Accept any non-empty name except the unknown-SSID sentinel.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw == UNKNOWN_SSID {
            return None;
        }
        Some(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bssid_normalizes_case_and_dashes() {
        let bssid = Bssid::parse("AA-BB-CC-DD-EE-FF").unwrap();
        assert_eq!(bssid.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn bssid_accepts_bare_hex() {
        let bssid = Bssid::parse("aabbccddeeff").unwrap();
        assert_eq!(bssid.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn bssid_rejects_malformed_input() {
        assert!(Bssid::parse("").is_none());
        assert!(Bssid::parse("not-a-mac").is_none());
        assert!(Bssid::parse("aa:bb:cc:dd:ee").is_none());
        assert!(Bssid::parse("aa:bb:cc:dd:ee:ff:00").is_none());
        assert!(Bssid::parse("gg:bb:cc:dd:ee:ff").is_none());
    }

    #[test]
    fn bssid_wildcard_is_flagged() {
        let any = Bssid::parse("FF:FF:FF:FF:FF:FF").unwrap();
        assert!(any.is_wildcard());
        let real = Bssid::parse("aa:bb:cc:dd:ee:ff").unwrap();
        assert!(!real.is_wildcard());
    }

    #[test]
    fn ssid_rejects_empty_and_unknown() {
        assert!(Ssid::parse("").is_none());
        assert!(Ssid::parse("<unknown ssid>").is_none());
        assert_eq!(Ssid::parse("home").unwrap().as_str(), "home");
    }
}
