//! Optimization Recorder (C5).
//!
//! Per-function CP/CSE tables, fed by hooks the evaluator and stepper fire
//! as they run. Kept as one struct exposing table accessors, holding
//! copy-propagation/common-subexpression facts.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::value::VarType;

/// What a variable was last assigned: a literal constant, another variable's
/// name, or neither (meaning the CPI is "dead" for propagation purposes).
#[derive(Debug, Clone, PartialEq)]
pub enum Rhs {
    Number(f64),
    Var(String),
}

impl std::fmt::Display for Rhs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rhs::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Rhs::Var(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Cpi {
    rhs: Option<Rhs>,
}

#[derive(Debug, Clone)]
struct Csi {
    used_vars: HashSet<String>,
    /// Line numbers where the expression has been seen unchanged; `None`
    /// models the source's `-1` "currently invalidated" sentinel.
    lines: Vec<Option<u32>>,
}

impl Csi {
    fn is_invalidated(&self) -> bool {
        matches!(self.lines.as_slice(), [None])
    }
}

/// Global CP result: `(line, variable_or_array_string) -> replacement rhs`.
pub type CpTable = HashMap<(u32, String), Rhs>;

/// Global CSE result: `expression_string -> [(value_type, {lines})]`.
pub type CsTable = HashMap<String, Vec<(VarType, BTreeSet<u32>)>>;

/// Per-function CP/CSE bookkeeping plus the two tables published globally
/// across all functions (the rewriter consumes these after a full run).
#[derive(Debug, Default)]
pub struct Optimizer {
    cp_stacks: HashMap<String, Vec<Cpi>>,
    cs_stacks: HashMap<String, Vec<Csi>>,
    cp_table: CpTable,
    cs_table: CsTable,
}

impl Optimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cp_table(&self) -> &CpTable {
        &self.cp_table
    }

    pub fn cs_table(&self) -> &CsTable {
        &self.cs_table
    }

    /// `declare v`: push a fresh CPI (rhs = none).
    pub fn declare_cp(&mut self, name: &str) {
        self.cp_stacks.entry(name.to_string()).or_default().push(Cpi::default());
    }

    /// `assign v := expr`: record what was assigned for CP purposes. `None`
    /// means the expression was not a plain number or plain identifier.
    ///
    /// Array-element keys (`"a[3]"`) are not separately declared, so this
    /// auto-vivifies a one-deep stack for them on first assignment.
    pub fn assign_cp(&mut self, name: &str, rhs: Option<Rhs>) {
        let stack = self.cp_stacks.entry(name.to_string()).or_default();
        if stack.is_empty() {
            stack.push(Cpi::default());
        }
        stack.last_mut().unwrap().rhs = rhs;
    }

    /// `increment v`: always kills the CPI (no longer a plain copy/constant).
    pub fn increment_cp(&mut self, name: &str) {
        self.assign_cp(name, None);
    }

    /// Reading `v` at line `L`: publish `(L, v) -> rhs` if live, else drop any
    /// stale record for this exact key.
    pub fn observe_cp(&mut self, key: &str, name: &str, line: u32) {
        let rhs = self.cp_stacks.get(name).and_then(|s| s.last()).and_then(|c| c.rhs.clone());
        match rhs {
            Some(rhs) => {
                self.cp_table.insert((line, key.to_string()), rhs);
            }
            None => {
                self.cp_table.remove(&(line, key.to_string()));
            }
        }
    }

    /// Scope exit: pop the CPIs declared inside.
    pub fn release_cp(&mut self, name: &str) {
        if let Some(stack) = self.cp_stacks.get_mut(name) {
            stack.pop();
            if stack.is_empty() {
                self.cp_stacks.remove(name);
            }
        }
    }

    /// A non-trivial subexpression was evaluated at `line`, with free
    /// variables `used_vars` and representative type `vtype` (the type of
    /// any one of its free variables, per source behavior).
    pub fn observe_cs(
        &mut self,
        expr_text: &str,
        used_vars: &HashSet<String>,
        vtype: VarType,
        line: u32,
    ) {
        let stack = self.cs_stacks.entry(expr_text.to_string()).or_default();
        if stack.is_empty() {
            stack.push(Csi { used_vars: used_vars.clone(), lines: vec![Some(line)] });
            return;
        }
        let top = stack.last_mut().unwrap();
        if top.is_invalidated() {
            top.lines = vec![Some(line)];
            return;
        }
        top.lines.push(Some(line));
        let live_lines: BTreeSet<u32> = top.lines.iter().filter_map(|l| *l).collect();
        if live_lines.len() >= 2 {
            publish_cs(&mut self.cs_table, expr_text, vtype, live_lines);
        }
    }

    /// `assign v`: invalidate every CSI that uses `v` (set to the `-1`
    /// sentinel).
    pub fn invalidate_cs_for(&mut self, name: &str) {
        for stack in self.cs_stacks.values_mut() {
            if let Some(top) = stack.last_mut() {
                if top.used_vars.contains(name) {
                    top.lines = vec![None];
                }
            }
        }
    }

    /// Declaring `v` shadows every live CSI that mentions it with a fresh,
    /// invalidated arm; released symmetrically in `release_cs_shadow`.
    pub fn declare_cs_shadow(&mut self, name: &str) {
        let keys: Vec<String> = self
            .cs_stacks
            .iter()
            .filter(|(_, stack)| stack.last().map_or(false, |c| c.used_vars.contains(name)))
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            let stack = self.cs_stacks.get_mut(&key).unwrap();
            let used_vars = stack.last().unwrap().used_vars.clone();
            stack.push(Csi { used_vars, lines: vec![None] });
        }
    }

    pub fn release_cs_shadow(&mut self, name: &str) {
        let keys: Vec<String> = self
            .cs_stacks
            .iter()
            .filter(|(_, stack)| stack.last().map_or(false, |c| c.used_vars.contains(name)))
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            if let Some(stack) = self.cs_stacks.get_mut(&key) {
                stack.pop();
                if stack.is_empty() {
                    self.cs_stacks.remove(&key);
                }
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Optimizer::default();
    }
}

/// Merge a freshly published `(vtype, lines)` entry into the per-expression
/// list: if an existing entry's line set is a subset of the new one, it is
/// overwritten; otherwise the new entry is appended. This is intentionally
/// not symmetric (a new subset of an existing superset is still appended) —
/// kept as observed in the source rather than "fixed".
fn publish_cs(table: &mut CsTable, expr_text: &str, vtype: VarType, lines: BTreeSet<u32>) {
    let entries = table.entry(expr_text.to_string()).or_default();
    if let Some(slot) = entries.iter_mut().find(|(_, existing)| existing.is_subset(&lines)) {
        *slot = (vtype, lines);
        return;
    }
    entries.push((vtype, lines));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_propagation_records_constant_assignment() {
        let mut opt = Optimizer::new();
        opt.declare_cp("a");
        opt.assign_cp("a", Some(Rhs::Number(5.0)));
        opt.observe_cp("b", "a", 3);
        assert_eq!(opt.cp_table().get(&(3, "b".to_string())), Some(&Rhs::Number(5.0)));
    }

    #[test]
    fn increment_kills_the_cpi() {
        let mut opt = Optimizer::new();
        opt.declare_cp("a");
        opt.assign_cp("a", Some(Rhs::Number(5.0)));
        opt.increment_cp("a");
        opt.observe_cp("b", "a", 3);
        assert!(opt.cp_table().get(&(3, "b".to_string())).is_none());
    }

    #[test]
    fn cse_publishes_after_two_live_observations() {
        let mut opt = Optimizer::new();
        let vars: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        opt.observe_cs("a*b", &vars, VarType::Int, 5);
        assert!(opt.cs_table().get("a*b").is_none());
        opt.observe_cs("a*b", &vars, VarType::Int, 6);
        let entries = opt.cs_table().get("a*b").unwrap();
        assert_eq!(entries[0].1, BTreeSet::from([5, 6]));
    }

    #[test]
    fn assigning_a_free_variable_invalidates_the_csi() {
        let mut opt = Optimizer::new();
        let vars: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        opt.observe_cs("a*b", &vars, VarType::Int, 5);
        opt.invalidate_cs_for("a");
        opt.observe_cs("a*b", &vars, VarType::Int, 9);
        // invalidated then re-armed with only one live line: not yet published
        // beyond the earlier publish (there was none since <2 before invalidation).
        assert!(opt.cs_table().get("a*b").is_none());
    }

    #[test]
    fn subset_merge_rule_overwrites_subset_not_superset() {
        let mut table = CsTable::new();
        publish_cs(&mut table, "a*b", VarType::Int, BTreeSet::from([1, 2]));
        publish_cs(&mut table, "a*b", VarType::Int, BTreeSet::from([1, 2, 3]));
        assert_eq!(table.get("a*b").unwrap().len(), 1);
        publish_cs(&mut table, "a*b", VarType::Int, BTreeSet::from([1]));
        assert_eq!(table.get("a*b").unwrap().len(), 2);
    }
}
