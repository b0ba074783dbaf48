//! Required and ignored title terms.
//!
//! Plain terms match case-insensitively as substrings. Terms wrapped in
//! slashes (`/x26[45]/`) are case-insensitive regular expressions.

use async_trait::async_trait;
use regex_lite::Regex;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::decision::{RejectionType, Verdict};
use crate::release::{CandidateRelease, SearchCriteria};
use crate::specification::{fail_open, Specification, SpecificationError, SpecificationPriority};

#[derive(Debug)]
enum TermMatcher {
    Substring(String),
    Pattern(Regex, String),
}

impl TermMatcher {
    fn parse(term: &str) -> Result<Self, SpecificationError> {
        let trimmed = term.trim();
        if trimmed.len() > 2 && trimmed.starts_with('/') && trimmed.ends_with('/') {
            let pattern = &trimmed[1..trimmed.len() - 1];
            let regex = Regex::new(&format!("(?i){}", pattern)).map_err(|e| {
                SpecificationError::InvalidCriteria(format!(
                    "invalid term pattern {}: {}",
                    term, e
                ))
            })?;
            Ok(TermMatcher::Pattern(regex, term.to_string()))
        } else {
            Ok(TermMatcher::Substring(trimmed.to_lowercase()))
        }
    }

    fn matches(&self, title_lower: &str, title: &str) -> bool {
        match self {
            TermMatcher::Substring(term) => title_lower.contains(term.as_str()),
            TermMatcher::Pattern(regex, _) => regex.is_match(title),
        }
    }

    fn original(&self) -> &str {
        match self {
            TermMatcher::Substring(term) => term,
            TermMatcher::Pattern(_, term) => term,
        }
    }
}

/// Matchers built from one criteria's term lists.
#[derive(Debug)]
struct CompiledTerms {
    required_terms: Vec<String>,
    ignored_terms: Vec<String>,
    required: Vec<TermMatcher>,
    ignored: Vec<TermMatcher>,
}

impl CompiledTerms {
    fn compile(criteria: &SearchCriteria) -> Result<Self, SpecificationError> {
        Ok(Self {
            required_terms: criteria.required_terms.clone(),
            ignored_terms: criteria.ignored_terms.clone(),
            required: compile(&criteria.required_terms)?,
            ignored: compile(&criteria.ignored_terms)?,
        })
    }

    fn is_for(&self, criteria: &SearchCriteria) -> bool {
        self.required_terms == criteria.required_terms
            && self.ignored_terms == criteria.ignored_terms
    }

    /// `None` when neither list has a usable term.
    fn configured(&self) -> Option<&Self> {
        (!self.required.is_empty() || !self.ignored.is_empty()).then_some(self)
    }

    fn check(&self, title: &str) -> Verdict {
        let title_lower = title.to_lowercase();

        if !self.required.is_empty()
            && !self.required.iter().any(|m| m.matches(&title_lower, title))
        {
            let terms: Vec<&str> = self.required.iter().map(TermMatcher::original).collect();
            return Verdict::reject(format!(
                "Does not contain any of the required terms: {}",
                terms.join(", ")
            ));
        }

        let found: Vec<&str> = self
            .ignored
            .iter()
            .filter(|m| m.matches(&title_lower, title))
            .map(TermMatcher::original)
            .collect();
        if !found.is_empty() {
            return Verdict::reject(format!("Contains ignored terms: {}", found.join(", ")));
        }

        Verdict::Accept
    }
}

fn compile(terms: &[String]) -> Result<Vec<TermMatcher>, SpecificationError> {
    terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| TermMatcher::parse(t))
        .collect()
}

/// Rejects titles missing every required term or containing an ignored one.
///
/// Term lists are compiled once and reused while the criteria's terms stay
/// the same, so a search cycle compiles its patterns a single time.
#[derive(Debug, Default)]
pub struct ReleaseRestrictionsSpecification {
    compiled: RwLock<Option<Arc<CompiledTerms>>>,
}

impl ReleaseRestrictionsSpecification {
    pub const NAME: &'static str = "release_restrictions";

    pub fn new() -> Self {
        Self::default()
    }

    async fn terms_for(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Arc<CompiledTerms>, SpecificationError> {
        if let Some(compiled) = self.compiled.read().await.as_ref() {
            if compiled.is_for(criteria) {
                return Ok(Arc::clone(compiled));
            }
        }

        let mut cache = self.compiled.write().await;
        if let Some(compiled) = cache.as_ref() {
            if compiled.is_for(criteria) {
                return Ok(Arc::clone(compiled));
            }
        }
        let compiled = Arc::new(CompiledTerms::compile(criteria)?);
        *cache = Some(Arc::clone(&compiled));
        Ok(compiled)
    }
}

#[async_trait]
impl Specification for ReleaseRestrictionsSpecification {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Permanent
    }

    fn priority(&self) -> SpecificationPriority {
        SpecificationPriority::Computed
    }

    async fn is_satisfied_by(
        &self,
        candidate: &CandidateRelease,
        criteria: &SearchCriteria,
    ) -> Result<Verdict, SpecificationError> {
        let compiled = self.terms_for(criteria).await?;
        Ok(fail_open::require_known(
            compiled.configured(),
            Some(candidate.title.as_str()),
            CompiledTerms::check,
        ))
    }
}
