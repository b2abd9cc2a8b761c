//! Decision tree over dispatch dimensions
//!
//! Built once from adapter capabilities, then evaluated per adaptable with
//! one array index per dimension. Each leaf holds exactly one adapter; more
//! than one candidate at a leaf is a configuration error.

use super::dimension::Dimension;
use crate::adaptable::Adaptable;
use crate::adapter::Capabilities;
use crate::error::ResolverError;
use std::fmt::Write;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DispatchNode {
    /// Index of the one adapter handling everything below
    Leaf(usize),
    Unmatched,
    /// Mandatory dimension; one child per ordinal
    Branch {
        dimension: Dimension,
        children: Vec<DispatchNode>,
    },
    /// Optional dimension; `absent` serves adaptables without a value.
    /// An empty `present` means no adapter declares any value.
    Optional {
        dimension: Dimension,
        present: Vec<DispatchNode>,
        absent: Box<DispatchNode>,
    },
}

static UNMATCHED: DispatchNode = DispatchNode::Unmatched;

/// Adapter view the tree is built from
pub(crate) struct Candidate<'a> {
    pub id: &'a str,
    pub capabilities: &'a Capabilities,
}

#[derive(Debug, Clone)]
pub(crate) struct DispatchTree {
    root: DispatchNode,
}

impl DispatchTree {
    pub(crate) fn build(candidates: &[Candidate<'_>]) -> Result<Self, ResolverError> {
        for candidate in candidates {
            for dimension in Dimension::ORDER.iter().filter(|d| !d.is_optional()) {
                if dimension.declared(candidate.capabilities).is_empty() {
                    return Err(ResolverError::EmptyMandatoryDimension {
                        adapter: candidate.id.to_string(),
                        dimension: dimension.name().to_string(),
                    });
                }
            }
        }

        let declared: Vec<Vec<Vec<usize>>> = candidates
            .iter()
            .map(|c| {
                Dimension::ORDER
                    .iter()
                    .map(|d| d.declared(c.capabilities))
                    .collect()
            })
            .collect();
        let builder = Builder {
            candidates,
            declared,
        };
        let all: Vec<usize> = (0..candidates.len()).collect();
        let root = builder.build(&all, 0, &mut Vec::new())?;
        Ok(Self { root })
    }

    /// Index of the adapter handling `adaptable`, if any.
    pub(crate) fn evaluate(&self, adaptable: &Adaptable) -> Option<usize> {
        let mut node = &self.root;
        loop {
            node = match node {
                DispatchNode::Leaf(index) => return Some(*index),
                DispatchNode::Unmatched => return None,
                DispatchNode::Branch {
                    dimension,
                    children,
                } => children.get(dimension.extract(adaptable)?)?,
                DispatchNode::Optional {
                    dimension,
                    present,
                    absent,
                } => match dimension.extract(adaptable) {
                    Some(ordinal) => present.get(ordinal).unwrap_or(&UNMATCHED),
                    None => &**absent,
                },
            };
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        fn count(node: &DispatchNode) -> usize {
            match node {
                DispatchNode::Leaf(_) | DispatchNode::Unmatched => 1,
                DispatchNode::Branch { children, .. } => 1 + children.iter().map(count).sum::<usize>(),
                DispatchNode::Optional {
                    present, absent, ..
                } => 1 + present.iter().map(count).sum::<usize>() + count(absent),
            }
        }
        count(&self.root)
    }

    /// Longest root-to-leaf path, counted in branch nodes
    pub(crate) fn depth(&self) -> usize {
        fn depth(node: &DispatchNode) -> usize {
            match node {
                DispatchNode::Leaf(_) | DispatchNode::Unmatched => 0,
                DispatchNode::Branch { children, .. } => {
                    1 + children.iter().map(depth).max().unwrap_or(0)
                }
                DispatchNode::Optional {
                    present, absent, ..
                } => 1 + present.iter().map(depth).max().unwrap_or(0).max(depth(absent)),
            }
        }
        depth(&self.root)
    }

    /// Indented text rendering; unmatched subtrees are omitted.
    pub(crate) fn describe(&self, adapter_ids: &[&str]) -> String {
        let mut out = String::new();
        describe_node(&self.root, adapter_ids, 0, &mut out);
        out
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &DispatchNode {
        &self.root
    }
}

fn describe_node(node: &DispatchNode, ids: &[&str], indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match node {
        DispatchNode::Leaf(index) => {
            let _ = writeln!(out, "{}-> {}", pad, ids.get(*index).copied().unwrap_or("?"));
        }
        DispatchNode::Unmatched => {
            let _ = writeln!(out, "{}-> (unmatched)", pad);
        }
        DispatchNode::Branch {
            dimension,
            children,
        } => {
            for (ordinal, child) in children.iter().enumerate() {
                if *child == DispatchNode::Unmatched {
                    continue;
                }
                let _ = writeln!(out, "{}{}={}", pad, dimension, dimension.label(ordinal));
                describe_node(child, ids, indent + 1, out);
            }
        }
        DispatchNode::Optional {
            dimension,
            present,
            absent,
        } => {
            for (ordinal, child) in present.iter().enumerate() {
                if *child == DispatchNode::Unmatched {
                    continue;
                }
                let _ = writeln!(out, "{}{}={}", pad, dimension, dimension.label(ordinal));
                describe_node(child, ids, indent + 1, out);
            }
            if **absent != DispatchNode::Unmatched {
                let _ = writeln!(out, "{}{}=(absent)", pad, dimension);
                describe_node(absent, ids, indent + 1, out);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

struct Builder<'a, 'b> {
    candidates: &'b [Candidate<'a>],
    /// declared[candidate][dimension position] = ordinals
    declared: Vec<Vec<Vec<usize>>>,
}

impl Builder<'_, '_> {
    fn declares(&self, candidate: usize, level: usize, ordinal: usize) -> bool {
        self.declared[candidate][level].contains(&ordinal)
    }

    fn is_agnostic(&self, candidate: usize, level: usize) -> bool {
        self.declared[candidate][level].is_empty()
    }

    fn build(
        &self,
        candidates: &[usize],
        level: usize,
        path: &mut Vec<String>,
    ) -> Result<DispatchNode, ResolverError> {
        if candidates.is_empty() {
            return Ok(DispatchNode::Unmatched);
        }
        let Some(&dimension) = Dimension::ORDER.get(level) else {
            return match candidates {
                [single] => Ok(DispatchNode::Leaf(*single)),
                _ => Err(ResolverError::Ambiguous {
                    adapters: candidates
                        .iter()
                        .map(|&c| self.candidates[c].id.to_string())
                        .collect(),
                    combination: path.join(", "),
                }),
            };
        };

        let buckets: Vec<Vec<usize>> = (0..dimension.cardinality())
            .map(|ordinal| {
                candidates
                    .iter()
                    .copied()
                    .filter(|&c| self.declares(c, level, ordinal))
                    .collect()
            })
            .collect();

        if dimension.is_optional() {
            let agnostic: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&c| self.is_agnostic(c, level))
                .collect();
            let present = if buckets.iter().all(Vec::is_empty) {
                Vec::new()
            } else {
                self.build_children(dimension, &buckets, level, path)?
            };
            path.push(format!("{}=(absent)", dimension));
            let absent = self.build(&agnostic, level + 1, path);
            path.pop();
            return Ok(DispatchNode::Optional {
                dimension,
                present,
                absent: Box::new(absent?),
            });
        }

        // every mandatory bucket identical: the dimension cannot discriminate
        if buckets.iter().all(|b| b.as_slice() == candidates) {
            debug!(
                dimension = dimension.name(),
                candidates = candidates.len(),
                "skipping non-discriminating dimension"
            );
            return self.build(candidates, level + 1, path);
        }

        let children = self.build_children(dimension, &buckets, level, path)?;
        Ok(DispatchNode::Branch {
            dimension,
            children,
        })
    }

    fn build_children(
        &self,
        dimension: Dimension,
        buckets: &[Vec<usize>],
        level: usize,
        path: &mut Vec<String>,
    ) -> Result<Vec<DispatchNode>, ResolverError> {
        let mut children = Vec::with_capacity(buckets.len());
        for (ordinal, bucket) in buckets.iter().enumerate() {
            path.push(format!("{}={}", dimension, dimension.label(ordinal)));
            let child = self.build(bucket, level + 1, path);
            path.pop();
            children.push(child?);
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptable::{Headers, Payload};
    use crate::topic::{Action, Channel, Criterion, Group, TopicPath};

    fn things_commands(actions: &[Action]) -> Capabilities {
        Capabilities::new()
            .groups([Group::Things])
            .channels([Channel::Twin, Channel::Live])
            .criteria([Criterion::Commands])
            .actions(actions.iter().copied())
    }

    fn tree(caps: &[(&'static str, Capabilities)]) -> Result<DispatchTree, ResolverError> {
        let candidates: Vec<Candidate<'_>> = caps
            .iter()
            .map(|(id, capabilities)| Candidate {
                id: *id,
                capabilities,
            })
            .collect();
        DispatchTree::build(&candidates)
    }

    fn adaptable(topic: &str) -> Adaptable {
        Adaptable::new(TopicPath::parse(topic).unwrap(), Payload::new("/"), Headers::new())
    }

    #[test]
    fn non_discriminating_dimension_is_skipped() {
        let caps = things_commands(&[Action::Retrieve]).wildcard_topics();
        let tree = tree(&[("query", caps)]).unwrap();
        let text = tree.describe(&["query"]);
        assert!(!text.contains("wildcard-topic"), "{text}");
        assert!(text.contains("for-responses=false"), "{text}");

        assert_eq!(tree.evaluate(&adaptable("_/_/things/twin/commands/retrieve")), Some(0));
        assert_eq!(tree.evaluate(&adaptable("ns/t/things/live/commands/retrieve")), Some(0));
        assert_eq!(tree.evaluate(&adaptable("ns/t/things/twin/commands/modify")), None);
        assert_eq!(tree.evaluate(&adaptable("ns/t/policies/commands/retrieve")), None);
    }

    #[test]
    fn single_candidate_still_branches_on_undeclared_values() {
        let tree = tree(&[("query", things_commands(&[Action::Retrieve]))]).unwrap();
        assert!(matches!(
            tree.root(),
            DispatchNode::Branch {
                dimension: Dimension::Group,
                ..
            }
        ));
    }

    #[test]
    fn actions_split_candidates() {
        let tree = tree(&[
            ("query", things_commands(&[Action::Retrieve])),
            ("modify", things_commands(&[Action::Modify, Action::Delete])),
        ])
        .unwrap();
        assert_eq!(tree.evaluate(&adaptable("ns/t/things/twin/commands/retrieve")), Some(0));
        assert_eq!(tree.evaluate(&adaptable("ns/t/things/twin/commands/delete")), Some(1));
        assert_eq!(tree.evaluate(&adaptable("ns/t/things/twin/commands/merge")), None);
    }

    #[test]
    fn overlapping_declarations_are_ambiguous() {
        let err = tree(&[
            ("a", things_commands(&[Action::Modify])),
            ("b", things_commands(&[Action::Modify, Action::Merge])),
        ])
        .unwrap_err();
        match err {
            ResolverError::Ambiguous {
                adapters,
                combination,
            } => {
                assert_eq!(adapters, ["a", "b"]);
                assert!(combination.contains("action=modify"), "{combination}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn agnostic_adapter_only_sees_absent_action() {
        let errors = Capabilities::new()
            .groups([Group::Things])
            .channels([Channel::Twin])
            .criteria([Criterion::Errors, Criterion::Commands]);
        let tree = tree(&[
            ("errors", errors),
            ("modify", things_commands(&[Action::Modify])),
        ])
        .unwrap();
        assert_eq!(tree.evaluate(&adaptable("ns/t/things/twin/errors")), Some(0));
        assert_eq!(tree.evaluate(&adaptable("ns/t/things/twin/commands/modify")), Some(1));
    }

    #[test]
    fn empty_mandatory_dimension_is_rejected() {
        let err = tree(&[("bad", Capabilities::new().groups([Group::Things]))]).unwrap_err();
        assert_eq!(
            err,
            ResolverError::EmptyMandatoryDimension {
                adapter: "bad".to_string(),
                dimension: "channel".to_string()
            }
        );
    }

    #[test]
    fn empty_registry_matches_nothing() {
        let tree = tree(&[]).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.evaluate(&adaptable("ns/t/things/twin/errors")), None);
    }

    #[test]
    fn describe_names_adapters() {
        let tree = tree(&[
            ("query", things_commands(&[Action::Retrieve])),
            ("modify", things_commands(&[Action::Modify])),
        ])
        .unwrap();
        let text = tree.describe(&["query", "modify"]);
        assert!(text.contains("action=retrieve"), "{text}");
        assert!(text.contains("-> modify"), "{text}");
        assert!(!text.contains("unmatched"), "{text}");
    }
}
