//! Stream registry
//!
//! The closed set of PagerDuty streams this tap extracts. Stream names from a
//! catalog are resolved here once, before any sync task starts; unknown names
//! are configuration errors.

use crate::error::{Error, Result};
use crate::types::SyncMode;
use std::fmt;
use std::str::FromStr;

/// A PagerDuty record stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StreamKind {
    Incidents,
    Alerts,
    EscalationPolicies,
    Services,
    Teams,
    Users,
    Vendors,
}

impl StreamKind {
    /// Every stream, in discovery order
    pub const ALL: [StreamKind; 7] = [
        StreamKind::Incidents,
        StreamKind::Alerts,
        StreamKind::EscalationPolicies,
        StreamKind::Services,
        StreamKind::Teams,
        StreamKind::Users,
        StreamKind::Vendors,
    ];

    /// Stream identifier (`tap_stream_id`)
    pub fn name(self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::Alerts => "alerts",
            Self::EscalationPolicies => "escalation_policies",
            Self::Services => "services",
            Self::Teams => "teams",
            Self::Users => "users",
            Self::Vendors => "vendors",
        }
    }

    /// Key of the record array in list responses
    ///
    /// Matches the stream name for every PagerDuty collection.
    pub fn collection(self) -> &'static str {
        self.name()
    }

    /// Primary key fields
    pub fn key_properties(self) -> &'static [&'static str] {
        &["id"]
    }

    /// How the stream is synced
    pub fn sync_mode(self) -> SyncMode {
        match self {
            Self::Incidents => SyncMode::Incremental,
            _ => SyncMode::FullRefresh,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StreamKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StreamKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::unknown_stream(s))
    }
}

/// Path of the per-incident alerts collection
pub fn alerts_path(incident_id: &str) -> String {
    format!("incidents/{incident_id}/alerts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("incidents", StreamKind::Incidents)]
    #[test_case("alerts", StreamKind::Alerts)]
    #[test_case("escalation_policies", StreamKind::EscalationPolicies)]
    #[test_case("services", StreamKind::Services)]
    #[test_case("teams", StreamKind::Teams)]
    #[test_case("users", StreamKind::Users)]
    #[test_case("vendors", StreamKind::Vendors)]
    fn test_parse_round_trip(name: &str, kind: StreamKind) {
        assert_eq!(name.parse::<StreamKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), name);
        assert_eq!(kind.collection(), name);
    }

    #[test]
    fn test_unknown_stream() {
        let err = "oncalls".parse::<StreamKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownStream { ref stream } if stream == "oncalls"));

        assert!("Incidents".parse::<StreamKind>().is_err());
    }

    #[test]
    fn test_key_properties() {
        for kind in StreamKind::ALL {
            assert_eq!(kind.key_properties(), &["id"]);
        }
    }

    #[test]
    fn test_sync_modes() {
        assert_eq!(StreamKind::Incidents.sync_mode(), SyncMode::Incremental);
        assert_eq!(StreamKind::Alerts.sync_mode(), SyncMode::FullRefresh);
        assert_eq!(StreamKind::Users.sync_mode(), SyncMode::FullRefresh);
    }

    #[test]
    fn test_alerts_path() {
        assert_eq!(alerts_path("PT4KHLK"), "incidents/PT4KHLK/alerts");
    }
}
