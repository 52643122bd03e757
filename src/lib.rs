pub mod ast;
pub mod config;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod optimizer;
pub mod orchestrator;
pub mod parser;
pub mod repl;
pub mod rewriter;
pub mod scope;
pub mod stepper;
pub mod value;

pub use config::Config;
pub use error::{StepError, StepResult};
pub use orchestrator::{optimize, OptimizationResult};
pub use parser::parse;
pub use repl::{Repl, ReplConfig};
pub use stepper::{Interpreter, StepStatus};

#[cfg(test)]
mod tests;
