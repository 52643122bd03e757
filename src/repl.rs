//! Driver shell (C7).
//!
//! Interactive REPL binding the `next` / `print` / `trace` grammar to
//! [`Interpreter`] operations.

use std::io::{self, Write};

use crate::stepper::{Interpreter, StepStatus};
use crate::value::Snapshot;

/// REPL configuration.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub prompt: String,
    /// Safety bound on the total number of lines a session will execute,
    /// to keep a runaway loop from hanging an interactive session.
    pub max_steps: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "Input Command(next [number] / print [variable] / trace [variable]): ".to_string(),
            max_steps: 1_000_000,
        }
    }
}

/// Interactive shell driving one [`Interpreter`] instance.
pub struct Repl {
    config: ReplConfig,
    interp: Interpreter,
    steps_taken: usize,
}

impl Repl {
    pub fn new(interp: Interpreter) -> Self {
        Self::with_config(interp, ReplConfig::default())
    }

    pub fn with_config(interp: Interpreter, config: ReplConfig) -> Self {
        Self { config, interp, steps_taken: 0 }
    }

    /// Runs the interactive loop against stdin/stdout until EOF, program
    /// completion, or the configured step budget is exhausted.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut input = String::new();

        loop {
            print!("{}", self.config.prompt);
            stdout.flush()?;

            input.clear();
            if stdin.read_line(&mut input)? == 0 {
                break;
            }

            let line = input.trim();
            if line.is_empty() {
                continue;
            }

            if self.interp.is_finished() {
                println!("End of Program");
                continue;
            }

            if self.steps_taken >= self.config.max_steps {
                println!("step budget exhausted ({} lines)", self.config.max_steps);
                continue;
            }

            match self.dispatch(line) {
                Ok(true) => {
                    if self.interp.is_finished() {
                        println!("End of Program");
                    }
                }
                Ok(false) => println!("unrecognized command: {}", line),
                Err(e) => println!("{}", e),
            }
        }
        Ok(())
    }

    /// Parses and executes one REPL command. Returns `Ok(true)` if it was
    /// recognized (whether or not it advanced execution).
    fn dispatch(&mut self, line: &str) -> Result<bool, crate::error::StepError> {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("next") => {
                let n: u32 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1);
                self.run_next(n)?;
                Ok(true)
            }
            Some("print") => {
                if let Some(var) = parts.next() {
                    self.print_var(var);
                }
                Ok(true)
            }
            Some("trace") => {
                if let Some(var) = parts.next() {
                    self.trace_var(var);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn run_next(&mut self, n: u32) -> Result<(), crate::error::StepError> {
        for _ in 0..n {
            if self.interp.is_finished() || self.steps_taken >= self.config.max_steps {
                break;
            }
            self.steps_taken += 1;
            match self.interp.step_one_line()? {
                StepStatus::Stepped => continue,
                StepStatus::Finished => break,
            }
        }
        Ok(())
    }

    fn print_var(&self, name: &str) {
        match self.interp.variable_value(name) {
            Some(v) => println!("{} = {}", name, v),
            None => println!("Invisible variable"),
        }
    }

    fn trace_var(&self, name: &str) {
        match self.interp.variable_history(name) {
            Some(history) if !history.is_empty() => {
                for (line, snapshot) in history {
                    match snapshot {
                        Snapshot::Scalar(Some(v)) => println!("{} = {} at line {}", name, v, line),
                        Snapshot::Scalar(None) => println!("{} = (unassigned) at line {}", name, line),
                        Snapshot::Array(values) => {
                            let rendered: Vec<String> = values
                                .iter()
                                .map(|v| v.map(|x| x.to_string()).unwrap_or_else(|| "?".to_string()))
                                .collect();
                            println!("{} = [{}] at line {}", name, rendered.join(", "), line);
                        }
                    }
                }
            }
            _ => println!("Invisible variable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn interp_for(src: &str) -> Interpreter {
        Interpreter::new(parse(src).unwrap()).unwrap()
    }

    #[test]
    fn next_with_no_argument_advances_one_line() {
        let src = "int main(){int a;a=5;a=6;}";
        let mut repl = Repl::new(interp_for(src));
        repl.run_next(1).unwrap();
        assert_eq!(repl.interp.variable_value("a"), None);
    }

    #[test]
    fn print_reports_invisible_for_unknown_variable() {
        let src = "int main(){int a;a=5;}";
        let repl = Repl::new(interp_for(src));
        assert!(repl.interp.variable_value("nope").is_none());
    }
}
