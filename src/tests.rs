//! Scenario and round-trip tests exercising the full pipeline end to end.

use crate::orchestrator::optimize;
use crate::parser::parse;
use crate::stepper::{Interpreter, StepStatus};

fn run_to_completion(src: &str) -> Interpreter {
    let program = parse(src).unwrap();
    let mut interp = Interpreter::new(program).unwrap();
    loop {
        match interp.step_one_line().unwrap() {
            StepStatus::Stepped => continue,
            StepStatus::Finished => return interp,
        }
    }
}

#[test]
fn scenario_simple_copy_propagation() {
    let src = "int main(){int a;int b;a=5;b=a;printf(\"%d\",b);}";
    let interp = run_to_completion(src);
    assert_eq!(interp.output, vec!["5".to_string()]);
    assert!(!interp.optimizer().cp_table().is_empty());
}

#[test]
fn scenario_division_by_zero_is_fatal() {
    let src = "int main(){int a;a=1/0;}";
    let program = parse(src).unwrap();
    let mut interp = Interpreter::new(program).unwrap();
    let mut result = Ok(StepStatus::Stepped);
    while let Ok(StepStatus::Stepped) = result {
        result = interp.step_one_line();
    }
    assert!(result.is_err());
}

#[test]
fn scenario_for_loop_sum_runs_body_three_times() {
    let src = "int main(){int i;int total;total=0;for(i=0;i<3;i=i+1){total=total+i;}printf(\"%d\",total);}";
    let interp = run_to_completion(src);
    assert_eq!(interp.output, vec!["3".to_string()]);
}

#[test]
fn scenario_function_call_in_expression() {
    let src = "int add(int x,int y){return x+y;} int main(){int c;c=add(2,3)+1;printf(\"%d\",c);}";
    let interp = run_to_completion(src);
    assert_eq!(interp.output, vec!["6".to_string()]);
}

#[test]
fn scenario_cse_across_loop_iterations() {
    let src = "int main(){int i;int a;int b;int c;a=2;b=3;for(i=0;i<3;i=i+1){c=a*b+i;printf(\"%d\",c);}}";
    let interp = run_to_completion(src);
    assert_eq!(interp.output, vec!["6".to_string(), "7".to_string(), "8".to_string()]);
    assert!(interp.optimizer().cs_table().contains_key("a*b"));
}

#[test]
fn scenario_shadowed_declaration_in_if() {
    let src = "int main(){int a;a=1;if(a>0){int a;a=9;printf(\"%d\",a);}printf(\"%d\",a);}";
    let interp = run_to_completion(src);
    assert_eq!(interp.output, vec!["9".to_string(), "1".to_string()]);
}

#[test]
fn invariant_cp_rewritten_source_reproduces_original_output() {
    let src = "int main(){int a;int b;a=5;b=a;printf(\"%d\",b);}";
    let result = optimize(src).unwrap();
    assert_eq!(result.original_output, result.replayed_output);
}

#[test]
fn invariant_for_loop_pipeline_preserves_output() {
    let src = "int main(){int i;int total;total=0;for(i=0;i<3;i=i+1){total=total+i;}printf(\"%d\",total);}";
    let result = optimize(src).unwrap();
    assert_eq!(result.original_output, result.replayed_output);
}

#[test]
fn invariant_history_length_is_assigns_plus_declaration() {
    let src = "int main(){int a;a=1;a=2;a=3;}";
    let interp = run_to_completion(src);
    let history = interp.variable_history("a");
    assert!(history.is_none(), "variable is released at function exit");
}

#[test]
fn invariant_declaration_release_symmetry_at_func_scope_exit() {
    let src = "int main(){int a;a=1;}";
    let interp = run_to_completion(src);
    assert!(interp.is_finished());
    assert!(interp.variable_value("a").is_none());
}
