//! Ambiguity resolution.
//!
//! The [`Selector`] turns capability groups into a [`Mapping`] containing
//! exactly one endpoint per `(entity, action)` pair. Candidates are ranked by
//! score (highest first, ties keep discovery order). Ambiguous groups are
//! resolved either automatically (first ranked candidate) or by a
//! [`Chooser`] answering with a candidate index.
//!
//! # Examples
//!
//! Interactive resolution with a closure as chooser:
//!
//! ```
//! use toolkit_engine_core::{Action, Capability, EntityName, HttpMethod, ProductId};
//! use toolkit_engine_selection::{RankedGroup, Selector, group};
//!
//! let p = ProductId::new("p");
//! let contacts = EntityName::new("contacts");
//! let groups = group(vec![
//!     Capability::new(p.clone(), contacts.clone(), Action::List, HttpMethod::Get, "/a")
//!         .with_score(0.9),
//!     Capability::new(p.clone(), contacts.clone(), Action::List, HttpMethod::Get, "/b")
//!         .with_score(0.5),
//! ]);
//!
//! let mut chooser =
//!     |_: &RankedGroup| -> toolkit_engine_core::Result<String> { Ok("1".to_string()) };
//! let mapping = Selector::new().resolve(&p, groups, Some(&mut chooser)).unwrap();
//! assert_eq!(mapping.entry(&contacts, Action::List).unwrap().path, "/b");
//! ```

use crate::grouping::{CapabilityGroup, GroupKey};
use crate::mapping::{Mapping, MappingEntry};
use std::collections::HashSet;
use toolkit_engine_core::{Capability, Error, ProductId, Result};

/// Default number of answers accepted per ambiguous group.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A group whose candidates are ordered best first.
///
/// Candidate indices `0..len()` are what a [`Chooser`] answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedGroup {
    /// Group key
    pub key: GroupKey,
    /// Candidates, highest score first
    pub candidates: Vec<Capability>,
}

impl RankedGroup {
    /// Highest valid candidate index.
    #[must_use]
    pub fn max_index(&self) -> usize {
        self.candidates.len().saturating_sub(1)
    }

    /// Parses a chooser answer into a candidate index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelection`] for non-numeric or out-of-range
    /// answers.
    pub fn parse_choice(&self, answer: &str) -> Result<usize> {
        let invalid = || Error::InvalidSelection {
            input: answer.to_string(),
            max: self.max_index(),
        };
        let index: usize = answer.trim().parse().map_err(|_| invalid())?;
        if index < self.candidates.len() {
            Ok(index)
        } else {
            Err(invalid())
        }
    }
}

/// Ranks a group's members by score, highest first.
///
/// The sort is stable: equal scores keep discovery order. Missing scores
/// rank as `0.0`.
#[must_use]
pub fn rank(group: CapabilityGroup) -> RankedGroup {
    let mut candidates = group.members;
    candidates.sort_by(|a, b| {
        b.score
            .unwrap_or(0.0)
            .total_cmp(&a.score.unwrap_or(0.0))
    });
    RankedGroup {
        key: group.key,
        candidates,
    }
}

/// Source of choices for ambiguous groups.
///
/// Any `FnMut(&RankedGroup) -> Result<String>` closure is a chooser.
pub trait Chooser {
    /// Returns the raw answer (a candidate index) for `group`.
    ///
    /// # Errors
    ///
    /// An error aborts the whole resolution.
    fn choose(&mut self, group: &RankedGroup) -> Result<String>;

    /// Called when an answer was rejected, before asking again.
    fn rejected(&mut self, _group: &RankedGroup, _error: &Error) {}
}

impl<F> Chooser for F
where
    F: FnMut(&RankedGroup) -> Result<String>,
{
    fn choose(&mut self, group: &RankedGroup) -> Result<String> {
        self(group)
    }
}

/// Resolves capability groups into a [`Mapping`].
///
/// Stateless across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    max_attempts: u32,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Selector {
    /// Creates a selector with the default attempt limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many answers are accepted per ambiguous group (min 1).
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Attempt limit per ambiguous group.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Resolves every group automatically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selection`] for empty or duplicate groups.
    pub fn resolve_auto(
        &self,
        product_id: &ProductId,
        groups: Vec<CapabilityGroup>,
    ) -> Result<Mapping> {
        self.resolve(product_id, groups, None)
    }

    /// Resolves every group, asking `chooser` for ambiguous ones.
    ///
    /// Without a chooser the first ranked candidate wins. No partial mapping
    /// is ever returned.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSelection`] if the chooser keeps answering with
    ///   invalid indices until the attempt limit
    /// - any error returned by the chooser itself
    /// - [`Error::Selection`] for empty or duplicate groups
    pub fn resolve(
        &self,
        product_id: &ProductId,
        groups: Vec<CapabilityGroup>,
        mut chooser: Option<&mut dyn Chooser>,
    ) -> Result<Mapping> {
        let mut mapping = Mapping::new(product_id.clone());
        let mut expected: HashSet<GroupKey> = HashSet::with_capacity(groups.len());

        for group in groups {
            if group.is_empty() {
                return Err(Error::Selection {
                    message: format!("group {} has no candidates", group.key),
                });
            }
            if !expected.insert(group.key.clone()) {
                return Err(Error::Selection {
                    message: format!("group {} appears more than once", group.key),
                });
            }

            let ranked = rank(group);
            let index = match chooser.as_deref_mut() {
                Some(chooser) if ranked.candidates.len() > 1 => self.ask(chooser, &ranked)?,
                _ => 0,
            };

            let chosen = &ranked.candidates[index];
            tracing::debug!(
                "Selected {} {} for {}",
                chosen.http_method,
                chosen.path,
                ranked.key
            );
            mapping.insert(ranked.key.clone(), MappingEntry::from(chosen))?;
        }

        if mapping.len() != expected.len() || !expected.iter().all(|k| mapping.contains(k)) {
            return Err(Error::Selection {
                message: format!(
                    "mapping has {} entries for {} groups",
                    mapping.len(),
                    expected.len()
                ),
            });
        }

        tracing::info!("Resolved {} operations for {}", mapping.len(), product_id);
        Ok(mapping)
    }

    fn ask(&self, chooser: &mut dyn Chooser, group: &RankedGroup) -> Result<usize> {
        let mut attempt = 1;
        loop {
            let answer = chooser.choose(group)?;
            match group.parse_choice(&answer) {
                Ok(index) => return Ok(index),
                Err(err) if attempt < self.max_attempts => {
                    tracing::warn!(
                        "Rejected choice for {} (attempt {}/{}): {}",
                        group.key,
                        attempt,
                        self.max_attempts,
                        err
                    );
                    chooser.rejected(group, &err);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group;
    use toolkit_engine_core::{Action, EntityName, HttpMethod};

    fn cap(entity: &str, action: Action, path: &str, score: f64) -> Capability {
        Capability::new(
            ProductId::new("p"),
            EntityName::new(entity),
            action,
            HttpMethod::Get,
            path,
        )
        .with_score(score)
    }

    fn product() -> ProductId {
        ProductId::new("p")
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let ranked = rank(CapabilityGroup {
            key: GroupKey::new(EntityName::new("contacts"), Action::List),
            members: vec![
                cap("contacts", Action::List, "/first", 0.5),
                cap("contacts", Action::List, "/best", 0.9),
                cap("contacts", Action::List, "/second", 0.5),
            ],
        });
        let paths: Vec<&str> = ranked.candidates.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["/best", "/first", "/second"]);
    }

    #[test]
    fn test_rank_missing_score_is_zero() {
        let mut unscored = cap("contacts", Action::List, "/none", 0.0);
        unscored.score = None;
        let ranked = rank(CapabilityGroup {
            key: GroupKey::new(EntityName::new("contacts"), Action::List),
            members: vec![unscored, cap("contacts", Action::List, "/some", 0.1)],
        });
        assert_eq!(ranked.candidates[0].path, "/some");
    }

    #[test]
    fn test_auto_picks_highest() {
        let groups = group(vec![
            cap("contacts", Action::List, "/persons/collection", 0.82),
            cap("contacts", Action::List, "/persons", 0.95),
        ]);
        let mapping = Selector::new().resolve_auto(&product(), groups).unwrap();
        let entry = mapping
            .entry(&EntityName::new("contacts"), Action::List)
            .unwrap();
        assert_eq!(entry.path, "/persons");
        assert_eq!(entry.score, Some(0.95));
    }

    #[test]
    fn test_auto_is_order_independent_modulo_score() {
        let a = cap("contacts", Action::List, "/a", 0.3);
        let b = cap("contacts", Action::List, "/b", 0.7);
        let c = cap("deals", Action::Get, "/d/{id}", 0.4);

        let m1 = Selector::new()
            .resolve_auto(&product(), group(vec![a.clone(), b.clone(), c.clone()]))
            .unwrap();
        let m2 = Selector::new()
            .resolve_auto(&product(), group(vec![c, b, a]))
            .unwrap();
        let e1: Vec<_> = m1.entries().map(|(k, e)| (k, e.clone())).collect();
        let e2: Vec<_> = m2.entries().map(|(k, e)| (k, e.clone())).collect();
        assert_eq!(e1, e2);
    }

    #[test]
    fn test_chooser_not_asked_for_single_candidate() {
        let groups = group(vec![cap("deals", Action::Get, "/deals/{id}", 0.5)]);
        let mut asked = 0;
        let mut chooser = |_: &RankedGroup| -> Result<String> {
            asked += 1;
            Ok("0".to_string())
        };
        let mapping = Selector::new()
            .resolve(&product(), groups, Some(&mut chooser))
            .unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(asked, 0);
    }

    #[test]
    fn test_out_of_range_choice_fails_after_attempts() {
        let groups = group(vec![
            cap("contacts", Action::List, "/a", 0.9),
            cap("contacts", Action::List, "/b", 0.1),
        ]);
        let mut asked = 0;
        let mut chooser = |_: &RankedGroup| -> Result<String> {
            asked += 1;
            Ok("5".to_string())
        };
        let err = Selector::new()
            .resolve(&product(), groups, Some(&mut chooser))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSelection { ref input, max: 1 } if input == "5"));
        assert_eq!(asked, 3);
    }

    #[test]
    fn test_invalid_then_valid_choice() {
        struct Scripted {
            answers: Vec<&'static str>,
            rejections: usize,
        }
        impl Chooser for Scripted {
            fn choose(&mut self, _: &RankedGroup) -> Result<String> {
                Ok(self.answers.remove(0).to_string())
            }
            fn rejected(&mut self, _: &RankedGroup, err: &Error) {
                assert!(err.is_invalid_selection());
                self.rejections += 1;
            }
        }

        let groups = group(vec![
            cap("contacts", Action::List, "/a", 0.9),
            cap("contacts", Action::List, "/b", 0.1),
        ]);
        let mut chooser = Scripted {
            answers: vec!["abc", "1"],
            rejections: 0,
        };
        let mapping = Selector::new()
            .resolve(&product(), groups, Some(&mut chooser))
            .unwrap();
        assert_eq!(chooser.rejections, 1);
        assert_eq!(
            mapping
                .entry(&EntityName::new("contacts"), Action::List)
                .unwrap()
                .path,
            "/b"
        );
    }

    #[test]
    fn test_chooser_error_aborts() {
        let groups = group(vec![
            cap("contacts", Action::List, "/a", 0.9),
            cap("contacts", Action::List, "/b", 0.1),
        ]);
        let mut chooser = |_: &RankedGroup| -> Result<String> {
            Err(Error::Selection {
                message: "aborted".to_string(),
            })
        };
        let err = Selector::new()
            .resolve(&product(), groups, Some(&mut chooser))
            .unwrap_err();
        assert!(err.is_selection_error());
    }

    #[test]
    fn test_every_group_key_mapped() {
        let groups = group(vec![
            cap("contacts", Action::List, "/c", 0.9),
            cap("contacts", Action::Get, "/c/{id}", 0.9),
            cap("deals", Action::List, "/d", 0.5),
            cap("deals", Action::List, "/d/all", 0.4),
        ]);
        let keys: Vec<GroupKey> = groups.iter().map(|g| g.key.clone()).collect();
        let mapping = Selector::new().resolve_auto(&product(), groups).unwrap();
        assert_eq!(mapping.len(), keys.len());
        assert!(keys.iter().all(|k| mapping.contains(k)));
    }

    #[test]
    fn test_empty_group_is_selection_error() {
        let groups = vec![CapabilityGroup {
            key: GroupKey::new(EntityName::new("contacts"), Action::List),
            members: Vec::new(),
        }];
        let err = Selector::new().resolve_auto(&product(), groups).unwrap_err();
        assert!(matches!(err, Error::Selection { .. }));
    }

    #[test]
    fn test_duplicate_group_is_selection_error() {
        let g = CapabilityGroup {
            key: GroupKey::new(EntityName::new("contacts"), Action::List),
            members: vec![cap("contacts", Action::List, "/c", 0.5)],
        };
        let err = Selector::new()
            .resolve_auto(&product(), vec![g.clone(), g])
            .unwrap_err();
        assert!(matches!(err, Error::Selection { .. }));
    }

    #[test]
    fn test_parse_choice() {
        let ranked = rank(CapabilityGroup {
            key: GroupKey::new(EntityName::new("contacts"), Action::List),
            members: vec![
                cap("contacts", Action::List, "/a", 0.9),
                cap("contacts", Action::List, "/b", 0.1),
            ],
        });
        assert_eq!(ranked.parse_choice(" 1 ").unwrap(), 1);
        assert!(ranked.parse_choice("2").is_err());
        assert!(ranked.parse_choice("-1").is_err());
        assert!(ranked.parse_choice("").is_err());
    }

    #[test]
    fn test_max_attempts_floor() {
        assert_eq!(Selector::new().with_max_attempts(0).max_attempts(), 1);
    }
}
