//! Dependency graph over a validated batch.
//!
//! Edges point from a task to the tasks it depends on. Dependency ids that
//! match no task in the batch contribute no edge.
//!
//! Cycle detection is a depth-first traversal with three-state coloring,
//! driven by an explicit stack so batch size is not limited by call depth.
//! Roots are visited in sorted id order, which pins down which cycle is
//! reported for a given input.
//!
//! Guarantee: when the graph has a cycle, at least one is reported, one per
//! back-edge the traversal meets. This is not an enumeration of every cycle
//! in a strongly-connected component; callers must not rely on that.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::task::{TaskId, TaskRecord};

/// One detected loop. First and last element are the same id.
pub type Cycle = Vec<TaskId>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub has_cycles: bool,
    pub cycles: Vec<Cycle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Distinct ids, sorted. Node `i` is `ids[i]`.
    ids: Vec<TaskId>,
    index: HashMap<TaskId, usize>,
    /// In-batch edges per node, in declaration order (duplicates kept).
    edges: Vec<Vec<usize>>,
    /// Ids of tasks with at least one in-batch dependency.
    blocked: BTreeSet<TaskId>,
    /// How many tasks declare a dependency on each id.
    blocker_counts: HashMap<TaskId, usize>,
}

impl DependencyGraph {
    pub fn build(tasks: &[TaskRecord]) -> Self {
        let ids: Vec<TaskId> = tasks
            .iter()
            .map(|t| t.id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<TaskId, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        // With duplicate ids the last record wins.
        let latest: HashMap<&TaskId, &TaskRecord> = tasks.iter().map(|t| (&t.id, t)).collect();

        let mut edges = vec![Vec::new(); ids.len()];
        let mut blocked = BTreeSet::new();
        let mut blocker_counts: HashMap<TaskId, usize> = HashMap::new();

        for (&id, task) in &latest {
            let node = index[id];
            edges[node] = task
                .dependencies
                .iter()
                .filter_map(|dep| index.get(dep).copied())
                .collect();

            if !edges[node].is_empty() {
                blocked.insert(id.clone());
            }

            // Each task counts once per distinct dependency it declares.
            let distinct: BTreeSet<&TaskId> = task.dependencies.iter().collect();
            for dep in distinct {
                *blocker_counts.entry(dep.clone()).or_default() += 1;
            }
        }

        Self {
            ids,
            index,
            edges,
            blocked,
            blocker_counts,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.index.contains_key(id)
    }

    pub fn detect_cycles(&self) -> CycleReport {
        let mut color = vec![Color::Unvisited; self.ids.len()];
        let mut cycles = Vec::new();

        // (node, next edge to follow). The stack doubles as the current path.
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.ids.len() {
            if color[root] != Color::Unvisited {
                continue;
            }
            color[root] = Color::InProgress;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                let Some(&dep) = self.edges[node].get(next) else {
                    color[node] = Color::Done;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match color[dep] {
                    Color::Unvisited => {
                        color[dep] = Color::InProgress;
                        stack.push((dep, 0));
                    }
                    Color::InProgress => {
                        let start = stack
                            .iter()
                            .position(|(n, _)| *n == dep)
                            .unwrap_or_default();
                        let mut cycle: Cycle =
                            stack[start..].iter().map(|(n, _)| self.ids[*n].clone()).collect();
                        cycle.push(self.ids[dep].clone());
                        cycles.push(cycle);
                    }
                    Color::Done => {}
                }
            }
        }

        CycleReport {
            has_cycles: !cycles.is_empty(),
            cycles,
        }
    }

    /// Tasks declaring at least one dependency on another task in the batch.
    ///
    /// Purely structural: there is no completion state, so this does not mean
    /// "waiting on unfinished work".
    pub fn blocked_ids(&self) -> &BTreeSet<TaskId> {
        &self.blocked
    }

    pub fn is_blocked(&self, id: &TaskId) -> bool {
        self.blocked.contains(id)
    }

    /// Number of tasks in the batch that list `id` as a dependency.
    pub fn count_blockers(&self, id: &TaskId) -> usize {
        self.blocker_counts.get(id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(id: i64, deps: &[i64]) -> TaskRecord {
        TaskRecord::new(id, format!("task {id}")).with_dependencies(deps.iter().copied())
    }

    fn ids(v: &[i64]) -> Vec<TaskId> {
        v.iter().map(|&i| TaskId::Int(i)).collect()
    }

    #[test]
    fn test_mutual_dependency_reports_one_cycle() {
        let g = DependencyGraph::build(&[t(2, &[1]), t(1, &[2])]);
        let report = g.detect_cycles();
        assert!(report.has_cycles);
        assert_eq!(report.cycles, vec![ids(&[1, 2, 1])]);
    }

    #[test]
    fn test_three_cycle() {
        let g = DependencyGraph::build(&[t(1, &[2]), t(2, &[3]), t(3, &[1])]);
        let report = g.detect_cycles();
        assert_eq!(report.cycles, vec![ids(&[1, 2, 3, 1])]);
    }

    #[test]
    fn test_dag_has_no_cycles() {
        let g = DependencyGraph::build(&[t(1, &[]), t(2, &[1]), t(3, &[1, 2])]);
        let report = g.detect_cycles();
        assert!(!report.has_cycles);
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let g = DependencyGraph::build(&[t(1, &[1])]);
        assert_eq!(g.detect_cycles().cycles, vec![ids(&[1, 1])]);
        assert!(g.is_blocked(&TaskId::Int(1)));
        assert_eq!(g.count_blockers(&TaskId::Int(1)), 1);
    }

    #[test]
    fn test_cycle_behind_a_tail() {
        // 1 -> 2 -> 3 -> 2
        let g = DependencyGraph::build(&[t(1, &[2]), t(2, &[3]), t(3, &[2])]);
        assert_eq!(g.detect_cycles().cycles, vec![ids(&[2, 3, 2])]);
    }

    #[test]
    fn test_unknown_dependencies_are_inert() {
        let g = DependencyGraph::build(&[t(1, &[99]), t(2, &[98, 1])]);
        assert!(!g.detect_cycles().has_cycles);
        assert!(!g.is_blocked(&TaskId::Int(1)));
        assert!(g.is_blocked(&TaskId::Int(2)));
        assert_eq!(g.len(), 2);
        assert!(!g.contains(&TaskId::Int(99)));
    }

    #[test]
    fn test_blocker_counts() {
        let g = DependencyGraph::build(&[t(1, &[]), t(2, &[1, 1]), t(3, &[1]), t(4, &[2])]);
        assert_eq!(g.count_blockers(&TaskId::Int(1)), 2);
        assert_eq!(g.count_blockers(&TaskId::Int(2)), 1);
        assert_eq!(g.count_blockers(&TaskId::Int(4)), 0);
        let blocked: Vec<_> = g.blocked_ids().iter().cloned().collect();
        assert_eq!(blocked, ids(&[2, 3, 4]));
    }

    #[test]
    fn test_duplicate_id_last_record_wins() {
        let g = DependencyGraph::build(&[t(1, &[2]), t(2, &[]), t(1, &[])]);
        assert_eq!(g.len(), 2);
        assert!(!g.is_blocked(&TaskId::Int(1)));
        assert_eq!(g.count_blockers(&TaskId::Int(2)), 0);
        assert!(!g.detect_cycles().has_cycles);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        // Root 0 reaches every node in a single descent.
        let n = 200_000;
        let tasks: Vec<TaskRecord> = (0..n)
            .map(|i| if i == n - 1 { t(i, &[]) } else { t(i, &[i + 1]) })
            .collect();
        let g = DependencyGraph::build(&tasks);
        assert!(!g.detect_cycles().has_cycles);

        let mut looped = tasks;
        looped[n as usize - 1] = t(n - 1, &[0]);
        let report = DependencyGraph::build(&looped).detect_cycles();
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].len(), n as usize + 1);
    }
}
