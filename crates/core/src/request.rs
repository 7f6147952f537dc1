//! Relay request parameters and their validation.
//!
//! [`WorkflowQuery`] is the untyped query string as received. It is turned
//! into a [`WorkflowLookup`] in one step, which may then have its version
//! replaced by a resolved tag before [`WorkflowLookup::into_fetch`] checks
//! that both the workflow id and version are known.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbTarget;

/// Raw query parameters of `GET /get_wf_xml`.
///
/// Every field is optional and kept as a string; presence matters more
/// than content for most of them.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WorkflowQuery {
    pub host: Option<String>,
    pub db: Option<String>,
    pub port: Option<String>,
    /// Workflow (vistrail) id.
    pub vt: Option<String>,
    pub version: Option<String>,
    /// Symbolic version label, resolved remotely.
    pub tag: Option<String>,
    pub buildalways: Option<String>,
}

/// Collects raw `key=value` pairs. A repeated key keeps its last value and
/// unknown keys are ignored.
impl FromIterator<(String, String)> for WorkflowQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "host" => &mut query.host,
                "db" => &mut query.db,
                "port" => &mut query.port,
                "vt" => &mut query.vt,
                "version" => &mut query.version,
                "tag" => &mut query.tag,
                "buildalways" => &mut query.buildalways,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }
}

/// A validated lookup whose version may still be pending tag resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowLookup {
    pub target: DbTarget,
    /// Workflow id, empty when not supplied.
    pub vt: String,
    /// Explicit version, empty when not supplied.
    pub version: String,
    /// Tag to resolve. Only set when supplied and non-empty.
    pub tag: Option<String>,
    /// Accepted for compatibility; not acted upon.
    pub build_always: bool,
}

/// A lookup with both identifiers present, ready for `get_wf_xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFetch {
    pub target: DbTarget,
    pub vt: String,
    pub version: String,
}

impl WorkflowQuery {
    /// Apply the query on top of the configured defaults.
    ///
    /// Present `host` / `db` values override the defaults even when empty.
    /// A present `port` must be a valid port number.
    pub fn into_lookup(self, defaults: &DbTarget) -> Result<WorkflowLookup, CoreError> {
        let port = match self.port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| CoreError::Validation("port must be an integer".into()))?,
            None => defaults.port,
        };

        let target = DbTarget {
            host: self.host.unwrap_or_else(|| defaults.host.clone()),
            port,
            db: self.db.unwrap_or_else(|| defaults.db.clone()),
        };

        Ok(WorkflowLookup {
            target,
            vt: self.vt.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
            tag: self.tag.filter(|t| !t.is_empty()),
            build_always: self.buildalways.as_deref().is_some_and(parse_flag),
        })
    }
}

impl WorkflowLookup {
    /// Replace the version with one resolved from the tag.
    pub fn with_resolved_version(mut self, version: i64) -> Self {
        self.version = version.to_string();
        self
    }

    /// Require both the workflow id and version to be non-empty.
    pub fn into_fetch(self) -> Result<WorkflowFetch, CoreError> {
        if self.vt.is_empty() || self.version.is_empty() {
            return Err(CoreError::MissingWorkflowIdentity);
        }

        Ok(WorkflowFetch {
            target: self.target,
            vt: self.vt,
            version: self.version,
        })
    }
}

/// Loose boolean flag: empty and `"0"` are false, anything else is true.
fn parse_flag(raw: &str) -> bool {
    !(raw.is_empty() || raw == "0")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn defaults() -> DbTarget {
        DbTarget::new("vistrails.org", 3306, "vistrails")
    }

    fn pairs(raw: &[(&str, &str)]) -> WorkflowQuery {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let query = pairs(&[("vt", "1"), ("version", "598"), ("vt", "8")]);

        assert_eq!(query.vt.as_deref(), Some("8"));
        assert_eq!(query.version.as_deref(), Some("598"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let query = pairs(&[("vt", "8"), ("format", "png"), ("host", "")]);

        assert_eq!(query.vt.as_deref(), Some("8"));
        assert_eq!(query.host.as_deref(), Some(""));
        assert_eq!(query.db, None);
    }

    #[test]
    fn defaults_fill_missing_target_fields() {
        let query = WorkflowQuery {
            vt: Some("8".into()),
            version: Some("598".into()),
            ..Default::default()
        };

        let lookup = query.into_lookup(&defaults()).unwrap();
        assert_eq!(lookup.target, defaults());
        assert_eq!(lookup.vt, "8");
        assert_eq!(lookup.version, "598");
        assert_eq!(lookup.tag, None);
        assert!(!lookup.build_always);
    }

    #[test]
    fn query_overrides_each_target_field() {
        let query = WorkflowQuery {
            host: Some("db.example.org".into()),
            db: Some("wiki".into()),
            port: Some("3307".into()),
            ..Default::default()
        };

        let lookup = query.into_lookup(&defaults()).unwrap();
        assert_eq!(lookup.target, DbTarget::new("db.example.org", 3307, "wiki"));
    }

    #[test]
    fn present_but_empty_host_overrides_default() {
        let query = WorkflowQuery {
            host: Some(String::new()),
            ..Default::default()
        };

        let lookup = query.into_lookup(&defaults()).unwrap();
        assert_eq!(lookup.target.host, "");
        assert_eq!(lookup.target.db, "vistrails");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let query = WorkflowQuery {
            port: Some("mysql".into()),
            ..Default::default()
        };

        assert_matches!(
            query.into_lookup(&defaults()),
            Err(CoreError::Validation(msg)) if msg.contains("port")
        );
    }

    #[test]
    fn empty_tag_is_ignored() {
        let query = WorkflowQuery {
            tag: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(query.into_lookup(&defaults()).unwrap().tag, None);
    }

    #[test]
    fn buildalways_follows_loose_truthiness() {
        for (raw, expected) in [("", false), ("0", false), ("1", true), ("true", true), ("no", true)] {
            let query = WorkflowQuery {
                buildalways: Some(raw.into()),
                ..Default::default()
            };
            let lookup = query.into_lookup(&defaults()).unwrap();
            assert_eq!(lookup.build_always, expected, "buildalways={raw:?}");
        }
    }

    #[test]
    fn resolved_version_overrides_explicit_version() {
        let query = WorkflowQuery {
            vt: Some("8".into()),
            version: Some("1".into()),
            tag: Some("final".into()),
            ..Default::default()
        };

        let fetch = query
            .into_lookup(&defaults())
            .unwrap()
            .with_resolved_version(598)
            .into_fetch()
            .unwrap();
        assert_eq!(fetch.version, "598");
    }

    #[test]
    fn fetch_requires_workflow_id_and_version() {
        let missing_version = WorkflowQuery {
            vt: Some("8".into()),
            ..Default::default()
        };
        let missing_vt = WorkflowQuery {
            version: Some("598".into()),
            ..Default::default()
        };

        for query in [missing_version, missing_vt, WorkflowQuery::default()] {
            let lookup = query.into_lookup(&defaults()).unwrap();
            assert_matches!(lookup.into_fetch(), Err(CoreError::MissingWorkflowIdentity));
        }
    }
}
