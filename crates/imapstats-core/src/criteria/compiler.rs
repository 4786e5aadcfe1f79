//! Criterion to query compilation.
//!
//! IMAP's OR is binary, so an n-way alternative is folded to the right:
//! `b0 OR (b1 OR (b2 OR ...))`. Each intermediate node is a blank query
//! carrying nothing but the nested OR; in particular it adds no UNSEEN
//! restriction of its own.

use imapstats_imap::SearchCriteria;

use super::Criterion;
use crate::{Error, Result};

/// A compiled SEARCH query.
///
/// All restrictions on a node are conjunctive. `headers` may name the same
/// header more than once; every pair has to match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Restrict to messages without `\Seen`.
    pub unseen: bool,
    /// BODY substrings.
    pub body: Vec<String>,
    /// HEADER name/substring pairs.
    pub headers: Vec<(String, String)>,
    /// Binary alternative.
    pub or: Option<Box<(Query, Query)>>,
}

impl Query {
    /// Returns true if the query places no restriction at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.unseen && self.body.is_empty() && self.headers.is_empty() && self.or.is_none()
    }

    /// Lowers the query to IMAP search keys.
    ///
    /// An empty query becomes `ALL`; a single restriction is emitted bare.
    #[must_use]
    pub fn to_search_criteria(&self) -> SearchCriteria {
        let mut keys = Vec::new();
        if self.unseen {
            keys.push(SearchCriteria::Unseen);
        }
        keys.extend(self.body.iter().cloned().map(SearchCriteria::Body));
        keys.extend(
            self.headers
                .iter()
                .map(|(name, value)| SearchCriteria::Header(name.clone(), value.clone())),
        );
        if let Some(pair) = &self.or {
            keys.push(SearchCriteria::or(
                pair.0.to_search_criteria(),
                pair.1.to_search_criteria(),
            ));
        }

        match keys.len() {
            0 => SearchCriteria::All,
            1 => keys.swap_remove(0),
            _ => SearchCriteria::And(keys),
        }
    }
}

/// Compiles a criterion into a query.
///
/// # Errors
///
/// Returns [`Error::Config`] if any OR in the tree has exactly one branch.
pub fn compile(criterion: &Criterion) -> Result<Query> {
    Ok(Query {
        unseen: !criterion.seen,
        body: criterion.body.clone(),
        headers: criterion
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        or: fold_or(&criterion.or)?.map(Box::new),
    })
}

fn fold_or(branches: &[Criterion]) -> Result<Option<(Query, Query)>> {
    match branches {
        [] => Ok(None),
        [_] => Err(Error::Config(
            "OR criteria must have at least 2 clauses".to_string(),
        )),
        [left, right] => Ok(Some((compile(left)?, compile(right)?))),
        [first, rest @ ..] => {
            let wrap = Query {
                or: fold_or(rest)?.map(Box::new),
                ..Query::default()
            };
            Ok(Some((compile(first)?, wrap)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;

    fn subject(s: &str) -> Criterion {
        Criterion {
            headers: BTreeMap::from([("Subject".to_string(), s.to_string())]),
            ..Criterion::default()
        }
    }

    fn subject_query(s: &str) -> Query {
        Query {
            unseen: true,
            headers: vec![("Subject".to_string(), s.to_string())],
            ..Query::default()
        }
    }

    #[test]
    fn default_criterion_is_unseen_only() {
        let q = compile(&Criterion::default()).unwrap();
        assert_eq!(
            q,
            Query {
                unseen: true,
                ..Query::default()
            }
        );
        assert_eq!(q.to_search_criteria(), SearchCriteria::Unseen);
    }

    #[test]
    fn seen_lifts_the_unseen_restriction() {
        let q = compile(&Criterion {
            seen: true,
            ..Criterion::default()
        })
        .unwrap();
        assert!(q.is_empty());
        assert_eq!(q.to_search_criteria(), SearchCriteria::All);
    }

    #[test]
    fn body_and_headers() {
        let c = Criterion {
            body: vec!["foo".into(), "bar".into()],
            headers: BTreeMap::from([
                ("From".to_string(), "foo@bar.com".to_string()),
                ("Subject".to_string(), "hello".to_string()),
            ]),
            ..Criterion::default()
        };
        let q = compile(&c).unwrap();
        assert_eq!(
            q.to_search_criteria(),
            SearchCriteria::And(vec![
                SearchCriteria::Unseen,
                SearchCriteria::Body("foo".into()),
                SearchCriteria::Body("bar".into()),
                SearchCriteria::Header("From".into(), "foo@bar.com".into()),
                SearchCriteria::Header("Subject".into(), "hello".into()),
            ])
        );
    }

    #[test]
    fn single_branch_or_is_rejected() {
        let c = Criterion {
            or: vec![subject("foo")],
            ..Criterion::default()
        };
        assert!(matches!(compile(&c), Err(Error::Config(_))));
    }

    #[test]
    fn two_way_or() {
        let c = Criterion {
            or: vec![subject("foo"), subject("bar")],
            ..Criterion::default()
        };
        let q = compile(&c).unwrap();
        assert_eq!(
            q.or.as_deref(),
            Some(&(subject_query("foo"), subject_query("bar")))
        );
    }

    #[test]
    fn three_way_or_folds_right() {
        let c = Criterion {
            or: vec![subject("foo"), subject("bar"), subject("fuzz")],
            ..Criterion::default()
        };
        let q = compile(&c).unwrap();
        assert!(q.unseen);

        let expected_wrap = Query {
            or: Some(Box::new((subject_query("bar"), subject_query("fuzz")))),
            ..Query::default()
        };
        assert_eq!(
            q.or.as_deref(),
            Some(&(subject_query("foo"), expected_wrap))
        );

        let head = |s: &str| {
            SearchCriteria::And(vec![
                SearchCriteria::Unseen,
                SearchCriteria::Header("Subject".into(), s.into()),
            ])
        };
        assert_eq!(
            q.to_search_criteria(),
            SearchCriteria::And(vec![
                SearchCriteria::Unseen,
                SearchCriteria::or(
                    head("foo"),
                    SearchCriteria::or(head("bar"), head("fuzz"))
                ),
            ])
        );
    }

    #[test]
    fn single_branch_deep_inside_is_rejected() {
        let inner = Criterion {
            or: vec![subject("x")],
            ..Criterion::default()
        };
        let c = Criterion {
            or: vec![subject("a"), subject("b"), inner],
            ..Criterion::default()
        };
        assert!(compile(&c).is_err());
    }

    fn arb_criterion() -> impl Strategy<Value = Criterion> {
        let leaf = (
            any::<bool>(),
            prop::collection::vec("[a-z]{1,6}", 0..3),
            prop::collection::btree_map("[A-Z][a-z]{1,6}", "[a-z:@.]{1,8}", 0..3),
            any::<bool>(),
        )
            .prop_map(|(seen, body, headers, fetch_envelope)| Criterion {
                seen,
                body,
                headers,
                fetch_envelope,
                or: Vec::new(),
            });

        leaf.prop_recursive(3, 24, 5, |inner| {
            (inner.clone(), prop::collection::vec(inner, 2..5)).prop_map(|(mut node, or)| {
                node.or = or;
                node
            })
        })
    }

    /// Walks the right-folded chain, returning the alternatives in order.
    fn unfold(pair: &(Query, Query), out: &mut Vec<Query>) {
        out.push(pair.0.clone());
        let right = &pair.1;
        match &right.or {
            Some(next)
                if !right.unseen && right.body.is_empty() && right.headers.is_empty() =>
            {
                unfold(next, out);
            }
            _ => out.push(right.clone()),
        }
    }

    fn check_shape(c: &Criterion, q: &Query) {
        assert_eq!(q.unseen, !c.seen);
        assert_eq!(q.body, c.body);
        assert_eq!(q.headers.len(), c.headers.len());
        match (&c.or[..], &q.or) {
            ([], None) => {}
            (branches, Some(pair)) => {
                let mut alts = Vec::new();
                unfold(pair, &mut alts);
                // A genuine branch can itself look like a blank wrapper only
                // if it is seen:true with no filters but an OR of its own.
                if alts.len() == branches.len() {
                    for (b, alt) in branches.iter().zip(&alts) {
                        check_shape(b, alt);
                    }
                }
                assert!(alts.len() >= branches.len());
            }
            (branches, None) => panic!("{} branches compiled to no OR", branches.len()),
        }
    }

    proptest! {
        #[test]
        fn compile_is_idempotent(c in arb_criterion()) {
            prop_assert_eq!(compile(&c).unwrap(), compile(&c).unwrap());
        }

        #[test]
        fn compiled_shape_follows_the_tree(c in arb_criterion()) {
            let q = compile(&c).unwrap();
            check_shape(&c, &q);
        }

        #[test]
        fn n_way_or_yields_n_minus_one_binary_nodes(n in 2usize..8) {
            let branches: Vec<Criterion> =
                (0..n).map(|i| subject(&format!("s{i}"))).collect();
            let c = Criterion { or: branches, ..Criterion::default() };
            let q = compile(&c).unwrap();

            let mut alts = Vec::new();
            unfold(q.or.as_deref().unwrap(), &mut alts);
            prop_assert_eq!(alts.len(), n);
            for (i, alt) in alts.iter().enumerate() {
                prop_assert_eq!(alt, &subject_query(&format!("s{i}")));
            }
        }
    }
}
