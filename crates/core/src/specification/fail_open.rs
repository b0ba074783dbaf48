//! Shared fail-open policy.
//!
//! A rule accepts when its constraint is not configured or when the
//! candidate's data for the attribute is unknown. Every built-in calls one
//! of these helpers first so the policy is applied the same way everywhere.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::future::Future;

use crate::decision::Verdict;
use crate::release::format_set;

/// Accept if any required value is present.
///
/// Accepts when `required` is empty or `actual` is unknown. Otherwise
/// rejects with both sets listed when the intersection is empty.
pub fn require_any<T: Ord + Display>(
    attribute: &str,
    required: &BTreeSet<T>,
    actual: Option<&BTreeSet<T>>,
) -> Verdict {
    if required.is_empty() {
        return Verdict::Accept;
    }
    let Some(actual) = actual else {
        return Verdict::Accept;
    };

    if required.intersection(actual).next().is_some() {
        Verdict::Accept
    } else {
        Verdict::reject(format!(
            "None of the required {} {} were found. Found {}: {}",
            attribute,
            format_set(required),
            attribute,
            format_set(actual)
        ))
    }
}

/// Reject if any forbidden value is present.
///
/// Accepts when `forbidden` is empty or `actual` is unknown.
pub fn forbid_all<T: Ord + Display + Clone>(
    attribute: &str,
    forbidden: &BTreeSet<T>,
    actual: Option<&BTreeSet<T>>,
) -> Verdict {
    if forbidden.is_empty() {
        return Verdict::Accept;
    }
    let Some(actual) = actual else {
        return Verdict::Accept;
    };

    let present: BTreeSet<T> = forbidden.intersection(actual).cloned().collect();
    if present.is_empty() {
        Verdict::Accept
    } else {
        Verdict::reject(format!(
            "Found forbidden {} {}. Forbidden {}: {}",
            attribute,
            format_set(&present),
            attribute,
            format_set(forbidden)
        ))
    }
}

/// Run `check` only when both the constraint and the value are known.
pub fn require_known<C, V, F>(constraint: Option<C>, value: Option<V>, check: F) -> Verdict
where
    F: FnOnce(C, V) -> Verdict,
{
    match (constraint, value) {
        (Some(constraint), Some(value)) => check(constraint, value),
        _ => Verdict::Accept,
    }
}

/// Async form of [`require_known`] for rules that ask a collaborator.
///
/// `check` runs only when `value` is known.
pub async fn require_present<V, F, Fut, E>(value: Option<V>, check: F) -> Result<Verdict, E>
where
    F: FnOnce(V) -> Fut,
    Fut: Future<Output = Result<Verdict, E>>,
{
    match value {
        Some(value) => check(value).await,
        None => Ok(Verdict::Accept),
    }
}

/// `None` when a set-valued constraint is empty, i.e. not configured.
pub fn configured<T>(set: &BTreeSet<T>) -> Option<&BTreeSet<T>> {
    (!set.is_empty()).then_some(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::{tag_set, IndexerFlag};

    fn set(values: &[&str]) -> BTreeSet<IndexerFlag> {
        tag_set(values)
    }

    #[test]
    fn test_no_required_values_accepts_anything() {
        for actual in [None, Some(set(&[])), Some(set(&["internal"]))] {
            let verdict = require_any("indexer flags", &set(&[]), actual.as_ref());
            assert!(verdict.is_accept());
        }
    }

    #[test]
    fn test_unknown_actual_accepts() {
        let verdict = require_any("indexer flags", &set(&["freeleech"]), None);
        assert!(verdict.is_accept());
    }

    #[test]
    fn test_any_match_accepts() {
        let required = set(&["a", "b"]);
        let actual = set(&["b"]);
        assert!(require_any("indexer flags", &required, Some(&actual)).is_accept());
    }

    #[test]
    fn test_no_match_rejects_with_both_sets() {
        let required = set(&["a", "b"]);

        let verdict = require_any("indexer flags", &required, Some(&set(&["c"])));
        assert_eq!(
            verdict,
            Verdict::reject(
                "None of the required indexer flags [a, b] were found. Found indexer flags: [c]"
            )
        );

        let verdict = require_any("indexer flags", &required, Some(&set(&[])));
        match verdict {
            Verdict::Reject(message) => {
                assert!(message.contains("[a, b]"));
                assert!(message.contains("Found indexer flags: []"));
            }
            Verdict::Accept => panic!("Expected rejection"),
        }
    }

    #[test]
    fn test_forbid_all() {
        let forbidden = set(&["scene", "halfleech"]);
        assert!(forbid_all("indexer flags", &forbidden, None).is_accept());
        assert!(forbid_all("indexer flags", &set(&[]), Some(&set(&["scene"]))).is_accept());
        assert!(forbid_all("indexer flags", &forbidden, Some(&set(&["internal"]))).is_accept());

        let verdict = forbid_all("indexer flags", &forbidden, Some(&set(&["scene", "internal"])));
        assert_eq!(
            verdict,
            Verdict::reject(
                "Found forbidden indexer flags [scene]. Forbidden indexer flags: [halfleech, scene]"
            )
        );
    }

    #[test]
    fn test_configured() {
        assert!(configured(&set(&[])).is_none());
        assert!(configured(&set(&[" "])).is_none());
        assert_eq!(configured(&set(&["scene"])), Some(&set(&["scene"])));
    }

    #[tokio::test]
    async fn test_require_present() {
        let checked = |_: u32| async { Ok::<_, ()>(Verdict::reject("checked")) };
        assert!(require_present(None, checked).await.unwrap().is_accept());
        assert!(!require_present(Some(1u32), checked).await.unwrap().is_accept());
    }

    #[test]
    fn test_require_known() {
        let reject = |_: u32, _: u32| Verdict::reject("checked");
        assert!(require_known(None, Some(5u32), reject).is_accept());
        assert!(require_known(Some(5u32), None, reject).is_accept());
        assert!(!require_known(Some(5u32), Some(1u32), reject).is_accept());
    }
}
