//! Optimizer orchestrator (C8).
//!
//! Drives the full non-interactive pipeline: interactive-equivalent pass
//! (recording facts, printing output) → CP rewrite → silent re-interpretation
//! of the CP-rewritten source (fresh interpreter state) → CSE rewrite of the
//! CP-rewritten text → the combined result is written by the caller.

use crate::error::StepResult;
use crate::parser::parse;
use crate::rewriter::{rewrite_cp, rewrite_cse};
use crate::stepper::{Interpreter, StepStatus};

/// Outcome of a full orchestrator run: the two intermediate source texts
/// plus whatever the final (CP-rewritten) run printed, for the caller to
/// compare against the original run's output.
#[derive(Debug)]
pub struct OptimizationResult {
    pub cp_source: String,
    pub cse_source: String,
    pub original_output: Vec<String>,
    pub replayed_output: Vec<String>,
}

fn to_line_table(source: &str) -> Vec<String> {
    let mut lines = vec![String::new()];
    lines.extend(source.lines().map(|l| l.to_string()));
    lines
}

fn run_to_completion(interp: &mut Interpreter) -> StepResult<()> {
    loop {
        match interp.step_one_line()? {
            StepStatus::Stepped => continue,
            StepStatus::Finished => return Ok(()),
        }
    }
}

/// Runs the full pipeline over `source`: interactive pass, CP rewrite,
/// silent replay, CSE rewrite.
pub fn optimize(source: &str) -> StepResult<OptimizationResult> {
    let program = parse(source)?;
    let mut interp = Interpreter::new(program)?;
    run_to_completion(&mut interp)?;
    let original_output = interp.output.clone();

    let line_table = to_line_table(source);
    let cp_lines = rewrite_cp(&line_table, interp.optimizer().cp_table());
    let cp_source = cp_lines[1..].join("\n");

    let cp_program = parse(&cp_source)?;
    let mut replay = Interpreter::new(cp_program)?;
    replay.silent = true;
    run_to_completion(&mut replay)?;
    let replayed_output = replay.output.clone();

    let cse_lines = rewrite_cse(&cp_lines, replay.optimizer().cs_table());
    let cse_source = cse_lines[1..].join("\n");

    Ok(OptimizationResult { cp_source, cse_source, original_output, replayed_output })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_copy_propagation_round_trips_through_both_passes() {
        let src = "int main(){int a;int b;a=5;b=a;printf(\"%d\",b);}";
        let result = optimize(src).unwrap();
        assert_eq!(result.original_output, vec!["5".to_string()]);
        assert_eq!(result.replayed_output, result.original_output);
        assert!(result.cp_source.contains("b=5;") || result.cp_source.contains("b=a;"));
    }

    #[test]
    fn for_loop_sum_pipeline_preserves_output() {
        let src = "int main(){int i;int total;total=0;for(i=0;i<3;i=i+1){total=total+i;}printf(\"%d\",total);}";
        let result = optimize(src).unwrap();
        assert_eq!(result.original_output, vec!["3".to_string()]);
        assert_eq!(result.replayed_output, result.original_output);
    }
}
