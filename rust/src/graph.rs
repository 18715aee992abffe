//! Dependency graph over a task snapshot.
//!
//! A graph is derived from a task slice and never mutated afterwards. Callers
//! build a fresh one per computation; nothing here is cached between calls.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use crate::interner::{TaskIdx, TaskIndex};
use crate::models::{DependencyInfo, Task};

/// How many cycles `detect_cycles` reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// One cycle per back edge, across every DFS root.
    #[default]
    All,
    /// Stop at the first cycle found.
    FirstOnly,
}

impl CyclePolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::All),
            "first" => Some(Self::FirstOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::FirstOnly => "first",
        }
    }
}

/// Forward (task -> dependencies) and reverse (task -> dependents) adjacency.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    index: TaskIndex,
    forward: Vec<Vec<TaskIdx>>,
    reverse: Vec<Vec<TaskIdx>>,
    /// (task id, dependency id) pairs whose dependency is not in the snapshot.
    skipped: Vec<(String, String)>,
}

impl DependencyGraph {
    /// Build adjacency for `tasks`.
    ///
    /// Dependency ids that do not name a task in the snapshot are skipped
    /// rather than reported as errors; they are kept in `skipped_references`
    /// for diagnostics. Repeated edges are stored once.
    pub fn build(tasks: &[Task]) -> Self {
        let index = TaskIndex::from_tasks(tasks);
        let mut forward: Vec<Vec<TaskIdx>> = vec![Vec::new(); index.len()];
        let mut reverse: Vec<Vec<TaskIdx>> = vec![Vec::new(); index.len()];
        let mut skipped = Vec::new();

        for task in tasks {
            let Some(task_idx) = index.get(&task.id) else {
                continue;
            };
            for dep_id in &task.dependency_ids {
                let Some(dep_idx) = index.get(dep_id) else {
                    skipped.push((task.id.clone(), dep_id.clone()));
                    continue;
                };
                let deps = &mut forward[task_idx as usize];
                if !deps.contains(&dep_idx) {
                    deps.push(dep_idx);
                }
                let dependents = &mut reverse[dep_idx as usize];
                if !dependents.contains(&task_idx) {
                    dependents.push(task_idx);
                }
            }
        }

        Self {
            index,
            forward,
            reverse,
            skipped,
        }
    }

    /// Number of distinct tasks in the snapshot.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn skipped_references(&self) -> &[(String, String)] {
        &self.skipped
    }

    /// Direct dependencies of `task_id` (empty for unknown ids).
    pub fn dependencies(&self, task_id: &str) -> Vec<&str> {
        self.neighbors(&self.forward, task_id)
    }

    /// Direct dependents of `task_id` (empty for unknown ids).
    pub fn dependents(&self, task_id: &str) -> Vec<&str> {
        self.neighbors(&self.reverse, task_id)
    }

    pub fn dependency_count(&self, task_id: &str) -> usize {
        self.index
            .get(task_id)
            .map_or(0, |idx| self.forward[idx as usize].len())
    }

    pub fn dependent_count(&self, task_id: &str) -> usize {
        self.index
            .get(task_id)
            .map_or(0, |idx| self.reverse[idx as usize].len())
    }

    fn neighbors<'a>(&'a self, adjacency: &[Vec<TaskIdx>], task_id: &str) -> Vec<&'a str> {
        self.index.get(task_id).map_or_else(Vec::new, |idx| {
            adjacency[idx as usize]
                .iter()
                .map(|&n| self.index.id(n))
                .collect()
        })
    }

    /// Find dependency cycles with an iterative depth-first search.
    ///
    /// Roots are tried in snapshot order. When the search reaches a task that
    /// is still on the stack, the cycle is the stack slice from that task to
    /// the current one, closed by repeating the first id.
    pub fn detect_cycles(&self, policy: CyclePolicy) -> Vec<Vec<String>> {
        let n = self.index.len();
        let mut visited = vec![false; n];
        let mut on_stack = vec![false; n];
        // (task, index of the next forward edge to follow)
        let mut stack: Vec<(TaskIdx, usize)> = Vec::new();
        let mut cycles = Vec::new();

        for root in 0..n as TaskIdx {
            if visited[root as usize] {
                continue;
            }
            visited[root as usize] = true;
            on_stack[root as usize] = true;
            stack.push((root, 0));

            while let Some(&(node, cursor)) = stack.last() {
                let Some(&next) = self.forward[node as usize].get(cursor) else {
                    on_stack[node as usize] = false;
                    stack.pop();
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                if !visited[next as usize] {
                    visited[next as usize] = true;
                    on_stack[next as usize] = true;
                    stack.push((next, 0));
                } else if on_stack[next as usize] {
                    let start = stack
                        .iter()
                        .position(|&(member, _)| member == next)
                        .unwrap_or(0);
                    let mut cycle: Vec<String> = stack[start..]
                        .iter()
                        .map(|&(member, _)| self.index.id(member).to_string())
                        .collect();
                    cycle.push(self.index.id(next).to_string());
                    cycles.push(cycle);

                    if policy == CyclePolicy::FirstOnly {
                        return cycles;
                    }
                }
            }
        }

        cycles
    }

    /// Ids of every task that can reach itself through its dependencies.
    ///
    /// Unlike `detect_cycles`, this covers tasks whose cycle shares a back
    /// edge with another reported cycle. Members are the strongly connected
    /// components with more than one task, plus self-dependent tasks, found
    /// with an iterative Tarjan pass in O(n + e).
    pub fn cycle_members(&self) -> FxHashSet<String> {
        const UNVISITED: u32 = u32::MAX;
        let n = self.index.len();
        let mut order = vec![UNVISITED; n];
        let mut low = vec![0u32; n];
        let mut on_stack = vec![false; n];
        // Tasks whose component is not yet closed, in discovery order.
        let mut open: Vec<TaskIdx> = Vec::new();
        // (task, index of the next forward edge to follow)
        let mut stack: Vec<(TaskIdx, usize)> = Vec::new();
        let mut counter = 0u32;
        let mut members = FxHashSet::default();

        for root in 0..n as TaskIdx {
            if order[root as usize] != UNVISITED {
                continue;
            }
            order[root as usize] = counter;
            low[root as usize] = counter;
            counter += 1;
            on_stack[root as usize] = true;
            open.push(root);
            stack.push((root, 0));

            while let Some(&(node, cursor)) = stack.last() {
                if let Some(&next) = self.forward[node as usize].get(cursor) {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    if order[next as usize] == UNVISITED {
                        order[next as usize] = counter;
                        low[next as usize] = counter;
                        counter += 1;
                        on_stack[next as usize] = true;
                        open.push(next);
                        stack.push((next, 0));
                    } else if on_stack[next as usize] {
                        low[node as usize] = low[node as usize].min(order[next as usize]);
                    }
                    continue;
                }

                stack.pop();
                if let Some(&(parent, _)) = stack.last() {
                    low[parent as usize] = low[parent as usize].min(low[node as usize]);
                }
                if low[node as usize] != order[node as usize] {
                    continue;
                }

                let mut component = Vec::new();
                while let Some(member) = open.pop() {
                    on_stack[member as usize] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                if component.len() > 1 || self.forward[node as usize].contains(&node) {
                    members.extend(component.iter().map(|&m| self.index.id(m).to_string()));
                }
            }
        }

        members
    }

    /// Every task `task_id` waits on, directly or transitively, in BFS order.
    pub fn transitive_dependencies(&self, task_id: &str) -> Vec<String> {
        self.closure(&self.forward, task_id)
    }

    /// Every task waiting on `task_id`, directly or transitively, in BFS order.
    pub fn transitive_dependents(&self, task_id: &str) -> Vec<String> {
        self.closure(&self.reverse, task_id)
    }

    fn closure(&self, adjacency: &[Vec<TaskIdx>], task_id: &str) -> Vec<String> {
        let Some(start) = self.index.get(task_id) else {
            return Vec::new();
        };
        let mut seen = vec![false; self.index.len()];
        seen[start as usize] = true;
        let mut order = Vec::new();
        let mut queue: VecDeque<TaskIdx> = adjacency[start as usize].iter().copied().collect();

        while let Some(idx) = queue.pop_front() {
            if seen[idx as usize] {
                continue;
            }
            seen[idx as usize] = true;
            order.push(self.index.id(idx).to_string());
            queue.extend(adjacency[idx as usize].iter().copied());
        }

        order
    }

    /// Blocking relationships for every task in the snapshot.
    pub fn dependency_info(&self) -> FxHashMap<String, DependencyInfo> {
        (0..self.index.len() as TaskIdx)
            .map(|idx| {
                let id = self.index.id(idx);
                let blocked_by: Vec<String> =
                    self.dependencies(id).into_iter().map(String::from).collect();
                let blocks: Vec<String> =
                    self.dependents(id).into_iter().map(String::from).collect();
                let info = DependencyInfo {
                    blocked_count: blocked_by.len(),
                    blocking_count: blocks.len(),
                    blocked_by,
                    blocks,
                };
                (id.to_string(), info)
            })
            .collect()
    }
}

/// Build a graph over `tasks` and report its cycles.
pub fn detect_cycles(tasks: &[Task], policy: CyclePolicy) -> Vec<Vec<String>> {
    DependencyGraph::build(tasks).detect_cycles(policy)
}

/// Build a graph over `tasks` and report per-task blocking relationships.
pub fn dependency_info(tasks: &[Task]) -> FxHashMap<String, DependencyInfo> {
    DependencyGraph::build(tasks).dependency_info()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, deps: Vec<&str>) -> Task {
        Task::new(
            id.to_string(),
            format!("Task {}", id),
            None,
            1.0,
            5,
            deps.into_iter().map(String::from).collect(),
        )
    }

    fn as_set(cycle: &[String]) -> FxHashSet<&str> {
        cycle.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_build_forward_and_reverse() {
        let tasks = vec![
            make_task("a", vec![]),
            make_task("b", vec!["a"]),
            make_task("c", vec!["a", "b"]),
        ];
        let graph = DependencyGraph::build(&tasks);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependencies("c"), vec!["a", "b"]);
        assert_eq!(graph.dependents("a"), vec!["b", "c"]);
        assert!(graph.dependencies("a").is_empty());
        assert_eq!(graph.dependent_count("b"), 1);
        assert_eq!(graph.dependency_count("c"), 2);
    }

    #[test]
    fn test_build_deduplicates_edges() {
        let tasks = vec![make_task("a", vec![]), make_task("b", vec!["a", "a"])];
        let graph = DependencyGraph::build(&tasks);

        assert_eq!(graph.dependencies("b"), vec!["a"]);
        assert_eq!(graph.dependents("a"), vec!["b"]);
    }

    #[test]
    fn test_build_skips_unknown_references() {
        let tasks = vec![make_task("a", vec!["ghost"]), make_task("b", vec!["a"])];
        let graph = DependencyGraph::build(&tasks);

        assert!(graph.dependencies("a").is_empty());
        assert_eq!(graph.dependencies("b"), vec!["a"]);
        assert_eq!(
            graph.skipped_references(),
            &[("a".to_string(), "ghost".to_string())]
        );
        assert_eq!(graph.dependent_count("ghost"), 0);
    }

    #[test]
    fn test_three_cycle_detected() {
        let tasks = vec![
            make_task("a", vec!["b"]),
            make_task("b", vec!["c"]),
            make_task("c", vec!["a"]),
        ];
        let cycles = detect_cycles(&tasks, CyclePolicy::All);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a", "b", "c", "a"]);
        assert_eq!(as_set(&cycles[0]), FxHashSet::from_iter(["a", "b", "c"]));
    }

    #[test]
    fn test_acyclic_chain_has_no_cycles() {
        let tasks = vec![
            make_task("a", vec!["b"]),
            make_task("b", vec!["c"]),
            make_task("c", vec![]),
        ];
        assert!(detect_cycles(&tasks, CyclePolicy::All).is_empty());
        assert!(detect_cycles(&tasks, CyclePolicy::FirstOnly).is_empty());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let tasks = vec![
            make_task("a", vec![]),
            make_task("b", vec!["a"]),
            make_task("c", vec!["a"]),
            make_task("d", vec!["b", "c"]),
        ];
        assert!(detect_cycles(&tasks, CyclePolicy::All).is_empty());
        assert!(DependencyGraph::build(&tasks).cycle_members().is_empty());
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let tasks = vec![make_task("a", vec!["a"])];
        let cycles = detect_cycles(&tasks, CyclePolicy::All);

        assert_eq!(cycles, vec![vec!["a".to_string(), "a".to_string()]]);
    }

    #[test]
    fn test_disjoint_cycles_respect_policy() {
        let tasks = vec![
            make_task("a", vec!["b"]),
            make_task("b", vec!["a"]),
            make_task("c", vec!["d"]),
            make_task("d", vec!["c"]),
        ];

        let all = detect_cycles(&tasks, CyclePolicy::All);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], vec!["a", "b", "a"]);
        assert_eq!(all[1], vec!["c", "d", "c"]);

        let first = detect_cycles(&tasks, CyclePolicy::FirstOnly);
        assert_eq!(first, vec![all[0].clone()]);
    }

    #[test]
    fn test_cycle_entered_from_acyclic_prefix() {
        // x -> a -> b -> c -> a: x is not on the cycle
        let tasks = vec![
            make_task("x", vec!["a"]),
            make_task("a", vec!["b"]),
            make_task("b", vec!["c"]),
            make_task("c", vec!["a"]),
        ];
        let cycles = detect_cycles(&tasks, CyclePolicy::All);

        assert_eq!(cycles, vec![vec!["a", "b", "c", "a"]]);
        let members = DependencyGraph::build(&tasks).cycle_members();
        assert_eq!(members.len(), 3);
        assert!(!members.contains("x"));
    }

    #[test]
    fn test_cycle_members_include_shared_back_edge_paths() {
        // a -> b -> c -> a and a -> d -> c: d sits on a cycle through the same back edge
        let tasks = vec![
            make_task("a", vec!["b", "d"]),
            make_task("b", vec!["c"]),
            make_task("c", vec!["a"]),
            make_task("d", vec!["c"]),
        ];
        let graph = DependencyGraph::build(&tasks);

        assert_eq!(graph.detect_cycles(CyclePolicy::All).len(), 1);
        let members = graph.cycle_members();
        assert_eq!(members.len(), 4);
        assert!(members.contains("d"));
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let n = 50_000;
        let tasks: Vec<Task> = (0..n)
            .map(|i| {
                let deps = if i + 1 < n {
                    vec![format!("t{}", i + 1)]
                } else {
                    vec!["t0".to_string()]
                };
                Task::new(format!("t{}", i), format!("T{}", i), None, 1.0, 5, deps)
            })
            .collect();
        let cycles = detect_cycles(&tasks, CyclePolicy::All);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), n + 1);
    }

    #[test]
    fn test_cycle_members_on_long_ring() {
        let n = 50_000;
        let mut tasks: Vec<Task> = (0..n)
            .map(|i| {
                let dep = format!("t{}", (i + 1) % n);
                Task::new(format!("t{}", i), format!("T{}", i), None, 1.0, 5, vec![dep])
            })
            .collect();
        tasks.push(make_task("tail", vec!["t0"]));
        let members = DependencyGraph::build(&tasks).cycle_members();

        assert_eq!(members.len(), n);
        assert!(members.contains("t0"));
        assert!(members.contains(&format!("t{}", n - 1)));
        assert!(!members.contains("tail"));
    }

    #[test]
    fn test_cycle_members_self_loop_and_separate_components() {
        let tasks = vec![
            make_task("solo", vec!["solo"]),
            make_task("a", vec!["b"]),
            make_task("b", vec!["a", "c"]),
            make_task("c", vec![]),
            make_task("d", vec!["c"]),
        ];
        let members = DependencyGraph::build(&tasks).cycle_members();

        let mut ids: Vec<&str> = members.iter().map(String::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["a", "b", "solo"]);
    }

    #[test]
    fn test_transitive_closure() {
        let tasks = vec![
            make_task("a", vec![]),
            make_task("b", vec!["a"]),
            make_task("c", vec!["b"]),
            make_task("d", vec!["c", "a"]),
        ];
        let graph = DependencyGraph::build(&tasks);

        assert_eq!(graph.transitive_dependencies("d"), vec!["c", "a", "b"]);
        assert_eq!(graph.transitive_dependents("a"), vec!["b", "d", "c"]);
        assert!(graph.transitive_dependencies("missing").is_empty());
    }

    #[test]
    fn test_transitive_closure_in_cycle_excludes_self() {
        let tasks = vec![make_task("a", vec!["b"]), make_task("b", vec!["a"])];
        let graph = DependencyGraph::build(&tasks);

        assert_eq!(graph.transitive_dependencies("a"), vec!["b"]);
    }

    #[test]
    fn test_dependency_info_counts() {
        let tasks = vec![
            make_task("a", vec![]),
            make_task("b", vec!["a"]),
            make_task("c", vec!["a", "b"]),
        ];
        let info = dependency_info(&tasks);

        let a = &info["a"];
        assert!(a.blocked_by.is_empty());
        assert_eq!(a.blocks, vec!["b", "c"]);
        assert_eq!(a.blocked_count, 0);
        assert_eq!(a.blocking_count, 2);

        let c = &info["c"];
        assert_eq!(c.blocked_by, vec!["a", "b"]);
        assert_eq!(c.blocked_count, 2);
        assert_eq!(c.blocking_count, 0);
    }

    #[test]
    fn test_cycle_policy_names() {
        assert_eq!(CyclePolicy::from_name("all"), Some(CyclePolicy::All));
        assert_eq!(CyclePolicy::from_name("first"), Some(CyclePolicy::FirstOnly));
        assert_eq!(CyclePolicy::from_name("some"), None);
        assert_eq!(CyclePolicy::default().as_str(), "all");
    }
}
