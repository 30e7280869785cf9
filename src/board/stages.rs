// Stage graph - the ordered workflow stages and the allow-list of transitions

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::errors::BoardError;

pub const TODO: &str = "To Do";
pub const IN_PROGRESS: &str = "In Progress";
pub const DONE: &str = "Done";

/// One adjacency entry as it appears in configuration files:
/// a source stage and the stages it may move to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
}

impl TransitionRule {
    pub fn new(from: &str, to: &[&str]) -> Self {
        Self {
            from: from.to_string(),
            to: to.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered list of stages plus the directed adjacency map.
///
/// Every stage named in `transitions` (as key or target) is a member of
/// `order`. Construct through [`StageGraph::new`] or check deserialized
/// graphs with [`StageGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageGraph {
    order: Vec<String>,
    transitions: BTreeMap<String, BTreeSet<String>>,
}

impl StageGraph {
    pub fn new(order: Vec<String>, rules: &[TransitionRule]) -> Result<Self, BoardError> {
        let mut transitions: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for rule in rules {
            transitions
                .entry(rule.from.clone())
                .or_default()
                .extend(rule.to.iter().cloned());
        }

        let graph = Self { order, transitions };
        graph.validate()?;
        Ok(graph)
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        if self.order.is_empty() {
            return Err(BoardError::InvalidStageGraph {
                reason: "stage list is empty".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for stage in &self.order {
            if stage.trim().is_empty() {
                return Err(BoardError::InvalidStageGraph {
                    reason: "stage names cannot be empty".to_string(),
                });
            }
            if !seen.insert(stage.as_str()) {
                return Err(BoardError::InvalidStageGraph {
                    reason: format!("stage '{stage}' is listed twice"),
                });
            }
        }

        for (from, targets) in &self.transitions {
            if !seen.contains(from.as_str()) {
                return Err(BoardError::InvalidStageGraph {
                    reason: format!("transition source '{from}' is not a known stage"),
                });
            }
            if let Some(unknown) = targets.iter().find(|t| !seen.contains(t.as_str())) {
                return Err(BoardError::InvalidStageGraph {
                    reason: format!("transition target '{unknown}' (from '{from}') is not a known stage"),
                });
            }
        }

        Ok(())
    }

    pub fn stages(&self) -> &[String] {
        &self.order
    }

    /// The stage new blocks start in.
    pub fn initial_stage(&self) -> &str {
        // validate() guarantees a non-empty order
        self.order.first().map(String::as_str).unwrap_or(TODO)
    }

    pub fn contains(&self, stage: &str) -> bool {
        self.order.iter().any(|s| s == stage)
    }

    pub fn position(&self, stage: &str) -> Option<usize> {
        self.order.iter().position(|s| s == stage)
    }

    pub fn can_transition(&self, from: &str, to: &str) -> bool {
        self.transitions
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    /// Stages reachable from `from`, in stage order.
    pub fn targets(&self, from: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter(|stage| self.can_transition(from, stage))
            .map(String::as_str)
            .collect()
    }

    /// The graph expressed as configuration rules, one per stage in order.
    pub fn rules(&self) -> Vec<TransitionRule> {
        self.order
            .iter()
            .map(|stage| TransitionRule {
                from: stage.clone(),
                to: self.targets(stage).into_iter().map(String::from).collect(),
            })
            .collect()
    }
}

impl Default for StageGraph {
    fn default() -> Self {
        let order = vec![TODO.to_string(), IN_PROGRESS.to_string(), DONE.to_string()];
        let mut transitions = BTreeMap::new();
        transitions.insert(TODO.to_string(), BTreeSet::from([IN_PROGRESS.to_string()]));
        transitions.insert(
            IN_PROGRESS.to_string(),
            BTreeSet::from([DONE.to_string(), TODO.to_string()]),
        );
        transitions.insert(DONE.to_string(), BTreeSet::new());
        Self { order, transitions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_graph_transitions() {
        let graph = StageGraph::default();
        assert!(graph.validate().is_ok());
        assert!(graph.can_transition(TODO, IN_PROGRESS));
        assert!(graph.can_transition(IN_PROGRESS, DONE));
        assert!(graph.can_transition(IN_PROGRESS, TODO));
        assert!(!graph.can_transition(TODO, DONE));
        assert!(!graph.can_transition(TODO, TODO));
        for stage in graph.stages() {
            assert!(!graph.can_transition(DONE, stage));
        }
    }

    #[test]
    fn test_targets_follow_stage_order() {
        let graph = StageGraph::default();
        assert_eq!(graph.targets(IN_PROGRESS), vec![TODO, DONE]);
        assert!(graph.targets(DONE).is_empty());
        assert!(graph.targets("Backlog").is_empty());
    }

    #[test]
    fn test_new_rejects_unknown_target() {
        let result = StageGraph::new(
            vec!["A".to_string(), "B".to_string()],
            &[TransitionRule::new("A", &["C"])],
        );
        assert!(matches!(result, Err(BoardError::InvalidStageGraph { .. })));
    }

    #[test]
    fn test_new_rejects_unknown_source_and_duplicates() {
        let unknown_source = StageGraph::new(
            vec!["A".to_string()],
            &[TransitionRule::new("Z", &["A"])],
        );
        assert!(unknown_source.is_err());

        let duplicate = StageGraph::new(vec!["A".to_string(), "A".to_string()], &[]);
        assert!(duplicate.is_err());

        let empty = StageGraph::new(vec![], &[]);
        assert!(empty.is_err());
    }

    #[test]
    fn test_rules_round_trip_through_new() {
        let graph = StageGraph::default();
        let rebuilt = StageGraph::new(graph.stages().to_vec(), &graph.rules()).unwrap();
        assert_eq!(graph, rebuilt);
    }
}
