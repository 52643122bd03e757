//! Stepper (C4).
//!
//! Advances execution by one source line at a time, managing the call stack
//! and the per-frame scope stack. This is the component the other parts are
//! built around; it owns the `Interpreter` context so there are no
//! process-wide globals — `current_line`, the call stack, the program
//! reference, and the optimizer all live here, threaded by `&mut self`.

use crate::ast::{Cmp, Declarator, Expr, LValue, Lineno, Program, Stmt};
use crate::error::{StepError, StepResult};
use crate::eval::{cp_rhs_of, eval, EvalOutcome};
use crate::optimizer::Optimizer;
use crate::scope::{Scope, ScopeKind};
use crate::value::{Value, VarStore, VarType};

/// One source line's worth of progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Stepped,
    Finished,
}

/// A call-stack entry. Function activations carry their own scope stack;
/// popping one all the way back to empty completes that activation.
enum Frame {
    Function(FunctionFrame),
}

struct FunctionFrame {
    func_name: String,
    scopes: Vec<Scope>,
    /// Resolved results for `Call` nodes in the statement currently being
    /// (re)evaluated, indexed by their left-to-right ordinal position.
    call_cache: Vec<Option<Value>>,
    /// Which ordinal position this frame is waiting on, if any.
    awaiting_slot: Option<usize>,
}

enum ExecOutcome {
    Completed,
    Suspended,
}

/// Owns every piece of mutable state the interpreter needs: the program
/// being run, the global variable store, the optimization recorder, the
/// call stack, and the current line. A single instance is reused across an
/// interactive session or reset between orchestrator passes.
pub struct Interpreter {
    program: Program,
    vars: VarStore,
    optimizer: Optimizer,
    frames: Vec<Frame>,
    current_line: u32,
    /// Suppressed during the orchestrator's silent re-interpretation passes.
    pub silent: bool,
    pub output: Vec<String>,
}

impl Interpreter {
    pub fn new(program: Program) -> StepResult<Self> {
        let main = program
            .find("main")
            .ok_or_else(|| StepError::UnknownFunction { line: 0, name: "main".to_string() })?
            .clone();
        let mut interp = Interpreter {
            program,
            vars: VarStore::new(),
            optimizer: Optimizer::new(),
            frames: Vec::new(),
            current_line: 0,
            silent: false,
            output: Vec::new(),
        };
        let entry_line = main.stmts.first().map(|s| s.lineno().start()).unwrap_or(main.lineno.start());
        interp.current_line = entry_line;
        interp.frames.push(Frame::Function(FunctionFrame {
            func_name: "main".to_string(),
            scopes: vec![Scope::new(ScopeKind::Func, main.stmts.len(), main.lineno)],
            call_cache: Vec::new(),
            awaiting_slot: None,
        }));
        Ok(interp)
    }

    /// Resets all execution state but keeps the parsed program, for the
    /// orchestrator's silent re-interpretation pass.
    pub fn reset(&mut self) -> StepResult<()> {
        let main = self
            .program
            .find("main")
            .ok_or_else(|| StepError::UnknownFunction { line: 0, name: "main".to_string() })?
            .clone();
        self.vars = VarStore::new();
        self.optimizer.reset();
        self.frames.clear();
        self.output.clear();
        let entry_line = main.stmts.first().map(|s| s.lineno().start()).unwrap_or(main.lineno.start());
        self.current_line = entry_line;
        self.frames.push(Frame::Function(FunctionFrame {
            func_name: "main".to_string(),
            scopes: vec![Scope::new(ScopeKind::Func, main.stmts.len(), main.lineno)],
            call_cache: Vec::new(),
            awaiting_slot: None,
        }));
        Ok(())
    }

    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    pub fn variable_value(&self, name: &str) -> Option<Value> {
        self.vars.get(name, self.current_line).ok().and_then(|b| b.scalar_value())
    }

    pub fn variable_history(&self, name: &str) -> Option<&[(u32, crate::value::Snapshot)]> {
        self.vars.get(name, self.current_line).ok().map(|b| b.history.as_slice())
    }

    /// Advances by exactly one source line: runs statements while they share
    /// `current_line`, then stops at the boundary.
    pub fn step_one_line(&mut self) -> StepResult<StepStatus> {
        if self.frames.is_empty() {
            return Ok(StepStatus::Finished);
        }
        let target_line = self.current_line;
        loop {
            if self.frames.is_empty() {
                return Ok(StepStatus::Finished);
            }
            let stmt_line = self.peek_stmt_line();
            if stmt_line != target_line {
                break;
            }
            match self.execute_one_statement()? {
                ExecOutcome::Suspended => return Ok(StepStatus::Stepped),
                ExecOutcome::Completed => {
                    let looped_back = self.drain_scopes()?;
                    if self.frames.is_empty() {
                        return Ok(StepStatus::Finished);
                    }
                    if looped_back {
                        self.current_line = self.peek_stmt_line();
                        return Ok(StepStatus::Stepped);
                    }
                }
            }
        }
        self.current_line = stmt_line_or(self, target_line + 1);
        Ok(StepStatus::Stepped)
    }

    fn peek_stmt_line(&self) -> u32 {
        let Frame::Function(frame) = self.frames.last().unwrap();
        let function = self.program.find(&frame.func_name).unwrap();
        current_stmt(function, &frame.scopes).lineno().start()
    }

    fn execute_one_statement(&mut self) -> StepResult<ExecOutcome> {
        let frame_idx = self.frames.len() - 1;
        let stmt = {
            let Frame::Function(frame) = &self.frames[frame_idx];
            let function = self.program.find(&frame.func_name).unwrap();
            current_stmt(function, &frame.scopes).clone()
        };
        self.execute_stmt(frame_idx, &stmt)
    }

    fn frame_mut(&mut self, idx: usize) -> &mut FunctionFrame {
        let Frame::Function(f) = &mut self.frames[idx];
        f
    }

    fn execute_stmt(&mut self, frame_idx: usize, stmt: &Stmt) -> StepResult<ExecOutcome> {
        match stmt {
            Stmt::Declare { ty, vars, lineno } => self.exec_declare(frame_idx, *ty, vars, lineno.start()),
            Stmt::Assign { target, expr, lineno } => self.exec_assign(frame_idx, target, expr, lineno.start()),
            Stmt::Increment { target, lineno } => self.exec_increment(frame_idx, target, lineno.start()),
            Stmt::For { stmts, lineno, .. } => {
                self.push_child_scope(frame_idx, ScopeKind::For, 3 + stmts.len(), *lineno);
                Ok(ExecOutcome::Completed)
            }
            Stmt::If { stmts, lineno, .. } => {
                self.push_child_scope(frame_idx, ScopeKind::If, 1 + stmts.len(), *lineno);
                Ok(ExecOutcome::Completed)
            }
            Stmt::FuncCall { callee, args, lineno } => {
                self.exec_funccall(frame_idx, callee, args, lineno.start())
            }
            Stmt::Return { value, lineno } => self.exec_return(frame_idx, value.as_ref(), lineno.start()),
            Stmt::Condition { var, cmp, expr, lineno } => {
                self.exec_condition(frame_idx, var, *cmp, expr, lineno.start())
            }
        }
    }

    fn push_child_scope(&mut self, frame_idx: usize, kind: ScopeKind, stmt_count: usize, lineno: Lineno) {
        self.frame_mut(frame_idx).scopes.push(Scope::new(kind, stmt_count, lineno));
    }

    fn innermost_scope_mut(&mut self, frame_idx: usize) -> &mut Scope {
        self.frame_mut(frame_idx).scopes.last_mut().unwrap()
    }

    /// Advances the innermost scope and, if that just looped a FOR from its
    /// increment back to the condition, releases the body locals declared
    /// during the iteration that just ended (they redeclare next pass).
    fn advance_and_handle_loopback(&mut self, frame_idx: usize) {
        let looped = self.innermost_scope_mut(frame_idx).advance();
        if !looped {
            return;
        }
        let locals = {
            let scope = self.innermost_scope_mut(frame_idx);
            let locals = scope.locals().to_vec();
            scope.clear_locals();
            locals
        };
        for name in &locals {
            self.vars.release(name);
            self.optimizer.release_cp(name);
            self.optimizer.release_cs_shadow(name);
        }
    }

    fn clear_call_state(&mut self, frame_idx: usize) {
        let f = self.frame_mut(frame_idx);
        f.call_cache.clear();
        f.awaiting_slot = None;
    }

    fn exec_declare(
        &mut self,
        frame_idx: usize,
        ty: VarType,
        decls: &[Declarator],
        lineno: u32,
    ) -> StepResult<ExecOutcome> {
        for d in decls {
            if d.is_array {
                let size_expr = d.size.as_ref().expect("array declarator has a size expression");
                let size_val = self.eval_synchronous(frame_idx, size_expr, lineno)?;
                let size = match size_val {
                    Value::Int(i) if i >= 0 => i as usize,
                    Value::Float(f) if f >= 0.0 => f as usize,
                    _ => return Err(StepError::ArrayIndexUnresolved { line: lineno }),
                };
                self.vars.declare_array(&d.name, ty, lineno, size);
            } else {
                self.vars.declare_scalar(&d.name, ty, lineno, None);
            }
            self.optimizer.declare_cp(&d.name);
            self.optimizer.declare_cs_shadow(&d.name);
            self.innermost_scope_mut(frame_idx).declare_local(&d.name);
        }
        self.clear_call_state(frame_idx);
        self.advance_and_handle_loopback(frame_idx);
        Ok(ExecOutcome::Completed)
    }

    /// Evaluates an expression that is not allowed to suspend (array sizes,
    /// index expressions): this path is side-effect-free in practice, but
    /// the error exists for completeness.
    fn eval_synchronous(&mut self, frame_idx: usize, expr: &Expr, lineno: u32) -> StepResult<Value> {
        let frame = self.frame_mut(frame_idx);
        let cache = frame.call_cache.clone();
        match eval(expr, &self.vars, &mut self.optimizer, &cache, &mut 0)? {
            EvalOutcome::Ready(v) => Ok(v),
            EvalOutcome::Suspend { .. } => Err(StepError::ArrayIndexUnresolved { line: lineno }),
        }
    }

    fn exec_assign(
        &mut self,
        frame_idx: usize,
        target: &LValue,
        expr: &Expr,
        lineno: u32,
    ) -> StepResult<ExecOutcome> {
        let cache = self.frame_mut(frame_idx).call_cache.clone();
        let mut cursor = 0usize;
        match eval(expr, &self.vars, &mut self.optimizer, &cache, &mut cursor)? {
            EvalOutcome::Ready(value) => {
                match target {
                    LValue::Id { name, .. } => {
                        self.vars.assign_scalar(name, value, lineno)?;
                        self.optimizer.assign_cp(name, cp_rhs_of(expr));
                        self.optimizer.invalidate_cs_for(name);
                    }
                    LValue::Array { name, index, .. } => {
                        let idx_val = self.eval_synchronous(frame_idx, index, lineno)?;
                        let idx = as_index(idx_val, lineno)?;
                        self.vars.assign_array_slot(name, idx, value, lineno)?;
                        let key = format!("{}[{}]", name, idx);
                        self.optimizer.assign_cp(&key, cp_rhs_of(expr));
                        self.optimizer.invalidate_cs_for(name);
                    }
                }
                self.clear_call_state(frame_idx);
                self.advance_and_handle_loopback(frame_idx);
                Ok(ExecOutcome::Completed)
            }
            EvalOutcome::Suspend { callee, args, slot } => {
                self.suspend_on_call(frame_idx, callee, args, slot, lineno)
            }
        }
    }

    fn exec_increment(&mut self, frame_idx: usize, target: &LValue, lineno: u32) -> StepResult<ExecOutcome> {
        match target {
            LValue::Id { name, .. } => {
                self.vars.increment_scalar(name, lineno)?;
                self.optimizer.increment_cp(name);
                self.optimizer.invalidate_cs_for(name);
            }
            LValue::Array { name, index, .. } => {
                let idx_val = self.eval_synchronous(frame_idx, index, lineno)?;
                let idx = as_index(idx_val, lineno)?;
                self.vars.increment_array_slot(name, idx, lineno)?;
                let key = format!("{}[{}]", name, idx);
                self.optimizer.increment_cp(&key);
                self.optimizer.invalidate_cs_for(name);
            }
        }
        self.clear_call_state(frame_idx);
        self.advance_and_handle_loopback(frame_idx);
        Ok(ExecOutcome::Completed)
    }

    fn exec_condition(
        &mut self,
        frame_idx: usize,
        var: &str,
        cmp: Cmp,
        expr: &Expr,
        lineno: u32,
    ) -> StepResult<ExecOutcome> {
        if !matches!(cmp, Cmp::Lt | Cmp::Gt) {
            return Err(StepError::InvalidComparator { line: lineno, cmp: cmp.as_str().to_string() });
        }
        let rhs = self.eval_synchronous(frame_idx, expr, lineno)?;
        let lhs = self
            .vars
            .get(var, lineno)?
            .scalar_value()
            .ok_or(StepError::UnassignedRead { line: lineno, name: var.to_string() })?;
        self.optimizer.observe_cp(var, var, lineno);
        let holds = match cmp {
            Cmp::Lt => lhs.lt(rhs),
            Cmp::Gt => lhs.gt(rhs),
            _ => unreachable!(),
        };
        self.clear_call_state(frame_idx);
        if holds {
            self.innermost_scope_mut(frame_idx).advance();
        } else {
            self.innermost_scope_mut(frame_idx).set_done();
        }
        Ok(ExecOutcome::Completed)
    }

    fn exec_funccall(
        &mut self,
        frame_idx: usize,
        callee: &str,
        args: &[Expr],
        lineno: u32,
    ) -> StepResult<ExecOutcome> {
        if callee == "printf" {
            return self.exec_printf(frame_idx, args, lineno);
        }
        let cache = self.frame_mut(frame_idx).call_cache.clone();
        let call_expr = Expr::Call { callee: callee.to_string(), args: args.to_vec(), lineno: Lineno::Single(lineno) };
        match eval(&call_expr, &self.vars, &mut self.optimizer, &cache, &mut 0)? {
            EvalOutcome::Ready(_) => {
                self.clear_call_state(frame_idx);
                self.innermost_scope_mut(frame_idx).advance();
                Ok(ExecOutcome::Completed)
            }
            EvalOutcome::Suspend { callee, args, slot } => {
                self.suspend_on_call(frame_idx, callee, args, slot, lineno)
            }
        }
    }

    fn exec_printf(&mut self, frame_idx: usize, args: &[Expr], lineno: u32) -> StepResult<ExecOutcome> {
        if args.is_empty() {
            return Err(StepError::ArityMismatch { line: lineno, name: "printf".into(), expected: 1, found: 0 });
        }
        let format = match &args[0] {
            Expr::StringLit(s, _) => s.clone(),
            other => return Err(StepError::InvalidCast { line: lineno, ty: format!("{:?}", other) }),
        };
        let cache = self.frame_mut(frame_idx).call_cache.clone();
        let mut cursor = 0usize;
        let mut values = Vec::new();
        for arg in &args[1..] {
            match eval(arg, &self.vars, &mut self.optimizer, &cache, &mut cursor)? {
                EvalOutcome::Ready(v) => values.push(v),
                EvalOutcome::Suspend { callee, args, slot } => {
                    return self.suspend_on_call(frame_idx, callee, args, slot, lineno);
                }
            }
        }
        let rendered = render_printf(&format, &values);
        if !self.silent {
            print!("{}", rendered);
        }
        self.output.push(rendered);
        self.clear_call_state(frame_idx);
        self.innermost_scope_mut(frame_idx).advance();
        Ok(ExecOutcome::Completed)
    }

    fn exec_return(&mut self, frame_idx: usize, value: Option<&Expr>, lineno: u32) -> StepResult<ExecOutcome> {
        let ready = match value {
            None => Some(None),
            Some(expr) => {
                let cache = self.frame_mut(frame_idx).call_cache.clone();
                match eval(expr, &self.vars, &mut self.optimizer, &cache, &mut 0)? {
                    EvalOutcome::Ready(v) => Some(Some(v)),
                    EvalOutcome::Suspend { callee, args, slot } => {
                        return self.suspend_on_call(frame_idx, callee, args, slot, lineno);
                    }
                }
            }
        };
        let return_value = ready.unwrap();
        self.unwind_frame(frame_idx, return_value);
        Ok(ExecOutcome::Completed)
    }

    /// Releases every scope's locals (innermost first) and pops the frame,
    /// splicing `value` into the caller's pending call slot if one is
    /// waiting on it.
    fn unwind_frame(&mut self, frame_idx: usize, value: Option<Value>) {
        loop {
            let scope = {
                let Frame::Function(frame) = &mut self.frames[frame_idx];
                frame.scopes.pop()
            };
            match scope {
                Some(scope) => self.release_locals(&scope),
                None => break,
            }
        }
        self.frames.remove(frame_idx);
        if frame_idx > 0 {
            if let Frame::Function(caller) = &mut self.frames[frame_idx - 1] {
                if let Some(slot) = caller.awaiting_slot.take() {
                    if caller.call_cache.len() <= slot {
                        caller.call_cache.resize(slot + 1, None);
                    }
                    caller.call_cache[slot] = Some(value.unwrap_or(Value::Int(0)));
                }
            }
        }
    }

    fn release_locals(&mut self, scope: &Scope) {
        for name in scope.locals() {
            self.vars.release(name);
            self.optimizer.release_cp(name);
            self.optimizer.release_cs_shadow(name);
        }
    }

    fn suspend_on_call(
        &mut self,
        frame_idx: usize,
        callee: String,
        args: Vec<Value>,
        slot: usize,
        lineno: u32,
    ) -> StepResult<ExecOutcome> {
        let function = self
            .program
            .find(&callee)
            .ok_or_else(|| StepError::UnknownFunction { line: lineno, name: callee.clone() })?
            .clone();

        if function.params.iter().any(|p| p.is_void) {
            if function.params.len() != 1 {
                return Err(StepError::VoidParameterMisuse { line: lineno, name: callee });
            }
            if !args.is_empty() {
                return Err(StepError::ArityMismatch {
                    line: lineno,
                    name: callee,
                    expected: 0,
                    found: args.len(),
                });
            }
        } else if function.params.len() != args.len() {
            return Err(StepError::ArityMismatch {
                line: lineno,
                name: callee,
                expected: function.params.len(),
                found: args.len(),
            });
        }

        {
            let frame = self.frame_mut(frame_idx);
            if frame.call_cache.len() <= slot {
                frame.call_cache.resize(slot + 1, None);
            }
            frame.awaiting_slot = Some(slot);
        }

        let entry_line = function.stmts.first().map(|s| s.lineno().start()).unwrap_or(function.lineno.start());
        let mut scope = Scope::new(ScopeKind::Func, function.stmts.len(), function.lineno);
        for (param, value) in function.params.iter().zip(args.into_iter()) {
            self.vars.declare_scalar(&param.name, param.ty, entry_line, Some(value));
            self.optimizer.declare_cp(&param.name);
            scope.declare_local(&param.name);
        }
        self.frames.push(Frame::Function(FunctionFrame {
            func_name: callee,
            scopes: vec![scope],
            call_cache: Vec::new(),
            awaiting_slot: None,
        }));
        self.current_line = entry_line;
        Ok(ExecOutcome::Suspended)
    }

    /// Pops completed scopes (innermost first), releasing locals and
    /// advancing whatever scope is newly exposed on top. Returns whether a
    /// FOR scope just looped back to its condition (the special case where
    /// `current_line` jumps to the loop's start rather than +1).
    fn drain_scopes(&mut self) -> StepResult<bool> {
        loop {
            if self.frames.is_empty() {
                return Ok(false);
            }
            let frame_idx = self.frames.len() - 1;
            let scope_done = {
                let Frame::Function(f) = &self.frames[frame_idx];
                f.scopes.last().map(|s| s.is_done())
            };
            match scope_done {
                None => {
                    // This frame's scope stack is empty: an implicit (void)
                    // function end with no explicit `return`.
                    self.unwind_frame(frame_idx, None);
                    continue;
                }
                Some(false) => return Ok(false),
                Some(true) => {
                    let finished = {
                        let frame = self.frame_mut(frame_idx);
                        let scope = frame.scopes.pop().unwrap();
                        self.release_locals(&scope);
                        frame_idx
                    };
                    let frame = self.frame_mut(finished);
                    if let Some(top) = frame.scopes.last_mut() {
                        let looped = top.advance();
                        if top.is_done() {
                            continue;
                        }
                        return Ok(looped);
                    } else {
                        // Frame's scope stack is now empty: function ends
                        // without an explicit return.
                        self.unwind_frame(finished, None);
                        continue;
                    }
                }
            }
        }
    }
}

/// Follows the innermost scope's current index down through the AST to the
/// statement it selects, interpreting FOR/IF synthetic layouts along the way.
fn current_stmt<'a>(function: &'a crate::ast::Function, scopes: &[Scope]) -> &'a Stmt {
    let mut node = &function.stmts[scopes[0].idx];
    for scope in &scopes[1..] {
        node = synth_at(node, scope.idx);
    }
    node
}

fn synth_at(node: &Stmt, idx: usize) -> &Stmt {
    match node {
        Stmt::For { assign, increment, condition, stmts, .. } => match idx {
            0 => assign,
            1 => increment,
            2 => condition,
            n => &stmts[n - 3],
        },
        Stmt::If { condition, stmts, .. } => match idx {
            0 => condition,
            n => &stmts[n - 1],
        },
        _ => unreachable!("synth_at called on a non-compound statement"),
    }
}

fn as_index(v: Value, line: u32) -> StepResult<usize> {
    match v {
        Value::Int(i) if i >= 0 => Ok(i as usize),
        Value::Float(f) if f >= 0.0 => Ok(f as usize),
        _ => Err(StepError::ArrayIndexUnresolved { line }),
    }
}

fn render_printf(format: &str, values: &[Value]) -> String {
    let mut out = String::new();
    let mut chars = format.chars().peekable();
    let mut vi = 0usize;
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some('d') => {
                    if let Some(v) = values.get(vi) {
                        out.push_str(&format!("{}", v.as_f64() as i64));
                        vi += 1;
                    }
                }
                Some('f') => {
                    if let Some(v) = values.get(vi) {
                        out.push_str(&format!("{}", v.as_f64()));
                        vi += 1;
                    }
                }
                Some(other) => {
                    out.push('%');
                    out.push(other);
                }
                None => out.push('%'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn stmt_line_or(interp: &Interpreter, fallback: u32) -> u32 {
    if interp.frames.is_empty() {
        fallback
    } else {
        interp.peek_stmt_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run_to_completion(src: &str) -> StepResult<Interpreter> {
        let program = parse(src).unwrap();
        let mut interp = Interpreter::new(program)?;
        loop {
            match interp.step_one_line()? {
                StepStatus::Stepped => continue,
                StepStatus::Finished => return Ok(interp),
            }
        }
    }

    #[test]
    fn simple_copy_propagation_scenario_prints_five() {
        let src = "int main(){int a;int b;a=5;b=a;printf(\"%d\",b);}";
        let interp = run_to_completion(src).unwrap();
        assert_eq!(interp.output, vec!["5".to_string()]);
    }

    #[test]
    fn division_by_zero_is_fatal() {
        let src = "int main(){int a;a=1/0;}";
        let program = parse(src).unwrap();
        let mut interp = Interpreter::new(program).unwrap();
        let mut last = Ok(StepStatus::Stepped);
        while let Ok(StepStatus::Stepped) = last {
            last = interp.step_one_line();
            if last.is_err() {
                break;
            }
        }
        assert!(matches!(last, Err(StepError::DivisionByZero { .. })));
    }

    #[test]
    fn for_loop_sum_scenario() {
        let src = "int main(){int i;int total;total=0;for(i=0;i<3;i=i+1){total=total+i;}printf(\"%d\",total);}";
        let interp = run_to_completion(src).unwrap();
        assert_eq!(interp.output, vec!["3".to_string()]);
    }

    #[test]
    fn function_call_in_expression_scenario() {
        let src = "int add(int x,int y){return x+y;} int main(){int c;c=add(2,3)+1;printf(\"%d\",c);}";
        let interp = run_to_completion(src).unwrap();
        assert_eq!(interp.output, vec!["6".to_string()]);
    }

    #[test]
    fn shadowed_declaration_in_if_scenario() {
        let src = "int main(){int a;a=1;if(a>0){int a;a=9;printf(\"%d\",a);}printf(\"%d\",a);}";
        let interp = run_to_completion(src).unwrap();
        assert_eq!(interp.output, vec!["9".to_string(), "1".to_string()]);
    }
}
