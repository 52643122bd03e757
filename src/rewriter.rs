//! Source Rewriter (C6).
//!
//! Consumes the CP/CSE facts recorded by the optimizer and a source line
//! table (index 0 is padding so line numbers index directly) to produce
//! rewritten source text. Matching on raw text via `regex` is the
//! intentional limitation noted for this toy language; a production
//! compiler would re-serialize the AST instead.

use std::collections::BTreeMap;

use regex::Regex;

use crate::optimizer::{CpTable, CsTable, Rhs};

/// Rewrites the right-hand side of each recorded `(line, target) -> rhs`
/// substitution. Multiple keys on the same line are applied in one pass per
/// line via cumulative offset bookkeeping so earlier substitutions don't
/// invalidate later match positions.
pub fn rewrite_cp(lines: &[String], table: &CpTable) -> Vec<String> {
    let mut by_line: BTreeMap<u32, Vec<(&String, &Rhs)>> = BTreeMap::new();
    for ((line, target), rhs) in table {
        by_line.entry(*line).or_default().push((target, rhs));
    }

    let mut out = lines.to_vec();
    for (line, subs) in by_line {
        let idx = line as usize;
        if idx >= out.len() {
            continue;
        }
        out[idx] = apply_cp_substitutions(&out[idx], &subs);
    }
    out
}

fn apply_cp_substitutions(line: &str, subs: &[(&String, &Rhs)]) -> String {
    let eq_pos = match line.find('=') {
        Some(p) => p,
        None => return line.to_string(),
    };
    let (head, tail) = line.split_at(eq_pos + 1);
    let mut rewritten = tail.to_string();
    for (target, rhs) in subs {
        rewritten = substitute_one(&rewritten, target, &rhs.to_string());
    }
    format!("{}{}", head, rewritten)
}

fn substitute_one(text: &str, target: &str, replacement: &str) -> String {
    let pattern = if target.contains('[') {
        regex::escape(target)
    } else {
        format!(r"\b{}\b", regex::escape(target))
    };
    let re = Regex::new(&pattern).expect("target-derived pattern is always valid");
    re.replace_all(text, regex::NoExpand(replacement)).into_owned()
}

/// Rewrites recorded common subexpressions: for each expression class
/// (longest text first, to prevent substring shadowing), inserts a
/// declaration and assignment just above the first affected line, then
/// substitutes the expression with the generated temporary on every
/// affected line. Arrays are never recorded by the optimizer, so no
/// exclusion is needed here beyond what it already omits.
pub fn rewrite_cse(lines: &[String], table: &CsTable) -> Vec<String> {
    let mut classes: Vec<(&String, &crate::value::VarType, &std::collections::BTreeSet<u32>)> = Vec::new();
    for (expr, entries) in table {
        for (vtype, line_set) in entries {
            classes.push((expr, vtype, line_set));
        }
    }
    classes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = lines.to_vec();
    let mut inserted_at: Vec<usize> = Vec::new();
    let delta = |inserted: &[usize], line: usize| -> usize {
        line + 2 * inserted.iter().filter(|&&i| i <= line).count()
    };

    for (counter, (expr, vtype, line_set)) in classes.into_iter().enumerate() {
        let mut affected: Vec<u32> = line_set.iter().copied().collect();
        affected.sort_unstable();
        let first = match affected.first() {
            Some(f) => *f as usize,
            None => continue,
        };
        let temp = format!("__optimized_variable{}", counter);
        let current_first = delta(&inserted_at, first);
        if current_first >= out.len() {
            continue;
        }
        let indent = leading_whitespace(&out[current_first]);
        let decl = format!("{}{} {};", indent, vtype.as_str(), temp);
        let assign = format!("{}{} = {};", indent, temp, expr);
        out.insert(current_first, assign);
        out.insert(current_first, decl);
        inserted_at.push(first);

        for line in &affected {
            let idx = delta(&inserted_at, *line as usize);
            if idx < out.len() {
                out[idx] = substitute_one(&out[idx], expr, &temp);
            }
        }
    }
    out
}

fn leading_whitespace(line: &str) -> String {
    line.chars().take_while(|c| c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::VarType;
    use std::collections::BTreeSet;

    #[test]
    fn cp_rewrite_replaces_identifier_on_rhs_only() {
        let lines = vec![String::new(), "b=a;".to_string()];
        let mut table = CpTable::new();
        table.insert((1, "b".to_string()), Rhs::Number(5.0));
        let out = rewrite_cp(&lines, &table);
        assert_eq!(out[1], "b=5;");
    }

    #[test]
    fn cp_rewrite_leaves_lhs_untouched() {
        let lines = vec![String::new(), "a=a+1;".to_string()];
        let mut table = CpTable::new();
        table.insert((1, "a".to_string()), Rhs::Number(2.0));
        let out = rewrite_cp(&lines, &table);
        assert_eq!(out[1], "a=2+1;");
    }

    #[test]
    fn cse_rewrite_inserts_two_lines_and_substitutes() {
        let lines = vec![String::new(), "c=a*b+i;".to_string(), "d=a*b+i;".to_string()];
        let mut table = CsTable::new();
        table.insert("a*b".to_string(), vec![(VarType::Int, BTreeSet::from([1, 2]))]);
        let out = rewrite_cse(&lines, &table);
        assert_eq!(out[1], "int __optimized_variable0;");
        assert_eq!(out[2], "__optimized_variable0 = a*b;");
        assert!(out[3].contains("__optimized_variable0"));
        assert!(out[4].contains("__optimized_variable0"));
    }
}
