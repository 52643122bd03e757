//! Recursive-descent parser producing the AST in `ast.rs`.
//!
//! Builds the for-loop's `[assign, increment, condition, body]` reordering
//! and the canonical text used as a common-subexpression key as it parses,
//! so the stepper and optimizer never need to re-derive either from the
//! surface syntax.

use crate::ast::*;
use crate::error::{StepError, StepResult};
use crate::lexer::{tokenize, Spanned, Token};
use crate::value::VarType;

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: &[Spanned]) -> Self {
        Parser { tokens: tokens.to_vec(), pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.line)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).map(|s| s.token.clone());
        self.pos += 1;
        t
    }

    fn expect(&mut self, expected: &Token) -> StepResult<()> {
        match self.advance() {
            Some(ref t) if t == expected => Ok(()),
            other => Err(StepError::Parse {
                line: self.line(),
                message: format!("expected {:?}, found {:?}", expected, other),
            }),
        }
    }

    fn expect_id(&mut self) -> StepResult<String> {
        match self.advance() {
            Some(Token::Id(name)) => Ok(name),
            other => Err(StepError::Parse {
                line: self.line(),
                message: format!("expected identifier, found {:?}", other),
            }),
        }
    }

    fn is_type_start(&self) -> bool {
        matches!(self.peek(), Some(Token::IntKw) | Some(Token::FloatKw))
            || (self.peek() == Some(&Token::Star)
                && matches!(
                    self.tokens.get(self.pos + 1).map(|s| &s.token),
                    Some(Token::IntKw) | Some(Token::FloatKw)
                ))
    }

    /// Parses `int`/`float`, accepting (and discarding) a leading `*` marker.
    fn parse_type(&mut self) -> StepResult<VarType> {
        if self.peek() == Some(&Token::Star) {
            self.advance();
        }
        match self.advance() {
            Some(Token::IntKw) => Ok(VarType::Int),
            Some(Token::FloatKw) => Ok(VarType::Float),
            other => Err(StepError::Parse {
                line: self.line(),
                message: format!("expected type, found {:?}", other),
            }),
        }
    }

    /// Parses a function's return type: `void`, `int`, or `float`. Unlike
    /// `parse_type`, `void` is accepted here since C procedures (no `return`
    /// value) are routine.
    fn parse_return_type(&mut self) -> StepResult<VarType> {
        if self.peek() == Some(&Token::Void) {
            self.advance();
            return Ok(VarType::Void);
        }
        self.parse_type()
    }

    pub fn parse_program(&mut self) -> StepResult<Program> {
        let mut functions = Vec::new();
        while self.peek().is_some() {
            functions.push(self.parse_function()?);
        }
        Ok(Program { functions })
    }

    fn parse_function(&mut self) -> StepResult<Function> {
        let start_line = self.line();
        let ty = self.parse_return_type()?;
        let name = self.expect_id()?;
        self.expect(&Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(&Token::RParen)?;
        self.expect(&Token::LBrace)?;
        let stmts = self.parse_stmt_list(&Token::RBrace)?;
        let end_line = self.line();
        self.expect(&Token::RBrace)?;
        Ok(Function {
            ty,
            name,
            params,
            stmts,
            lineno: Lineno::Range(start_line, end_line),
        })
    }

    fn parse_params(&mut self) -> StepResult<Vec<Param>> {
        let mut params = Vec::new();
        if self.peek() == Some(&Token::Void)
            && self.tokens.get(self.pos + 1).map(|s| &s.token) == Some(&Token::RParen)
        {
            self.advance();
            return Ok(params);
        }
        if self.peek() == Some(&Token::RParen) {
            return Ok(params);
        }
        loop {
            let ty = self.parse_type()?;
            let mut is_array = false;
            let name = self.expect_id()?;
            if self.peek() == Some(&Token::LBracket) {
                self.advance();
                self.expect(&Token::RBracket)?;
                is_array = true;
            }
            params.push(Param { ty, name, is_array, is_void: false });
            if self.peek() == Some(&Token::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        Ok(params)
    }

    fn parse_stmt_list(&mut self, terminator: &Token) -> StepResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while self.peek().is_some() && self.peek() != Some(terminator) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> StepResult<Stmt> {
        let lineno = Lineno::Single(self.line());
        if self.is_type_start() {
            return self.parse_declare(lineno);
        }
        match self.peek() {
            Some(Token::For) => self.parse_for(),
            Some(Token::If) => self.parse_if(),
            Some(Token::Return) => self.parse_return(lineno),
            Some(Token::Id(_)) => self.parse_id_led_stmt(lineno),
            other => Err(StepError::Parse {
                line: self.line(),
                message: format!("unexpected token {:?}", other),
            }),
        }
    }

    fn parse_declare(&mut self, lineno: Lineno) -> StepResult<Stmt> {
        let ty = self.parse_type()?;
        let mut vars = Vec::new();
        loop {
            let name = self.expect_id()?;
            let mut is_array = false;
            let mut size = None;
            if self.peek() == Some(&Token::LBracket) {
                self.advance();
                let size_expr = self.parse_expr()?;
                self.expect(&Token::RBracket)?;
                is_array = true;
                size = Some(size_expr);
            }
            vars.push(Declarator { name, is_array, size });
            if self.peek() == Some(&Token::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        self.expect(&Token::Semicolon)?;
        Ok(Stmt::Declare { ty, vars, lineno })
    }

    fn parse_lvalue(&mut self, lineno: Lineno) -> StepResult<LValue> {
        let name = self.expect_id()?;
        if self.peek() == Some(&Token::LBracket) {
            self.advance();
            let index = self.parse_expr()?;
            self.expect(&Token::RBracket)?;
            Ok(LValue::Array { name, index: Box::new(index), lineno })
        } else {
            Ok(LValue::Id { name, lineno })
        }
    }

    fn parse_id_led_stmt(&mut self, lineno: Lineno) -> StepResult<Stmt> {
        // Disambiguate `name(` (call) from `name`/`name[i]` (assign/increment).
        if let Token::Id(name) = self.peek().unwrap().clone() {
            if self.tokens.get(self.pos + 1).map(|s| &s.token) == Some(&Token::LParen) {
                self.advance();
                self.advance(); // '('
                let args = self.parse_arglist()?;
                self.expect(&Token::RParen)?;
                self.expect(&Token::Semicolon)?;
                return Ok(Stmt::FuncCall { callee: name, args, lineno });
            }
        }
        let target = self.parse_lvalue(lineno)?;
        if self.peek() == Some(&Token::Increment) {
            self.advance();
            self.expect(&Token::Semicolon)?;
            return Ok(Stmt::Increment { target, lineno });
        }
        self.expect(&Token::Assign)?;
        let expr = self.parse_expr()?;
        self.expect(&Token::Semicolon)?;
        Ok(Stmt::Assign { target, expr, lineno })
    }

    fn parse_arglist(&mut self) -> StepResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            return Ok(args);
        }
        loop {
            if let Some(Token::StringLit(s)) = self.peek().cloned() {
                self.advance();
                args.push(Expr::StringLit(s, Lineno::Single(self.line())));
            } else {
                args.push(self.parse_expr()?);
            }
            if self.peek() == Some(&Token::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        Ok(args)
    }

    fn parse_return(&mut self, lineno: Lineno) -> StepResult<Stmt> {
        self.advance(); // 'return'
        let value = if self.peek() == Some(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&Token::Semicolon)?;
        Ok(Stmt::Return { value, lineno })
    }

    fn parse_cmp(&mut self) -> StepResult<Cmp> {
        match self.advance() {
            Some(Token::Lt) => Ok(Cmp::Lt),
            Some(Token::Gt) => Ok(Cmp::Gt),
            Some(Token::Lte) => Ok(Cmp::Le),
            Some(Token::Gte) => Ok(Cmp::Ge),
            Some(Token::Eq) => Ok(Cmp::Eq),
            Some(Token::Neq) => Ok(Cmp::Ne),
            other => Err(StepError::Parse {
                line: self.line(),
                message: format!("expected comparator, found {:?}", other),
            }),
        }
    }

    /// Parses the clause between the for-loop's second and third semicolons
    /// (`i++` or `i=i+1`, both appear in practice) as either form.
    fn parse_for_increment(&mut self, lineno: Lineno) -> StepResult<Stmt> {
        let target = self.parse_lvalue(lineno)?;
        if self.peek() == Some(&Token::Increment) {
            self.advance();
            return Ok(Stmt::Increment { target, lineno });
        }
        self.expect(&Token::Assign)?;
        let expr = self.parse_expr()?;
        Ok(Stmt::Assign { target, expr, lineno })
    }

    /// Produces the `[assign, increment, condition, stmts...]` ordering the
    /// stepper expects, not the surface `for(assign;condition;increment)`
    /// order.
    fn parse_for(&mut self) -> StepResult<Stmt> {
        let start_line = self.line();
        self.advance(); // 'for'
        self.expect(&Token::LParen)?;
        let assign_lineno = Lineno::Single(self.line());
        let assign_target = self.parse_lvalue(assign_lineno)?;
        self.expect(&Token::Assign)?;
        let assign_expr = self.parse_expr()?;
        let assign = Stmt::Assign { target: assign_target, expr: assign_expr, lineno: assign_lineno };
        self.expect(&Token::Semicolon)?;

        let cond_line = Lineno::Single(self.line());
        let var = self.expect_id()?;
        let cmp = self.parse_cmp()?;
        let cond_expr = self.parse_expr()?;
        let condition = Stmt::Condition { var, cmp, expr: cond_expr, lineno: cond_line };
        self.expect(&Token::Semicolon)?;

        let inc_lineno = Lineno::Single(self.line());
        let increment = self.parse_for_increment(inc_lineno)?;
        self.expect(&Token::RParen)?;

        self.expect(&Token::LBrace)?;
        let stmts = self.parse_stmt_list(&Token::RBrace)?;
        let end_line = self.line();
        self.expect(&Token::RBrace)?;

        Ok(Stmt::For {
            assign: Box::new(assign),
            increment: Box::new(increment),
            condition: Box::new(condition),
            stmts,
            lineno: Lineno::Range(start_line, end_line),
        })
    }

    fn parse_if(&mut self) -> StepResult<Stmt> {
        let start_line = self.line();
        self.advance(); // 'if'
        self.expect(&Token::LParen)?;
        let cond_line = Lineno::Single(self.line());
        let var = self.expect_id()?;
        let cmp = self.parse_cmp()?;
        let expr = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        let condition = Stmt::Condition { var, cmp, expr, lineno: cond_line };

        self.expect(&Token::LBrace)?;
        let stmts = self.parse_stmt_list(&Token::RBrace)?;
        let end_line = self.line();
        self.expect(&Token::RBrace)?;

        Ok(Stmt::If {
            condition: Box::new(condition),
            stmts,
            lineno: Lineno::Range(start_line, end_line),
        })
    }

    // expr := term (('+'|'-') term)*
    fn parse_expr(&mut self) -> StepResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOpKind::Add,
                Some(Token::Minus) => BinOpKind::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = combine(op, lhs, rhs);
        }
        Ok(lhs)
    }

    // term := factor (('*'|'/') factor)*
    fn parse_term(&mut self) -> StepResult<Expr> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOpKind::Mul,
                Some(Token::Slash) => BinOpKind::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = combine(op, lhs, rhs);
        }
        Ok(lhs)
    }

    // factor := casting | '(' expr ')' | number | id | array | call
    fn parse_factor(&mut self) -> StepResult<Expr> {
        let lineno = Lineno::Single(self.line());
        if self.peek() == Some(&Token::LParen)
            && matches!(
                self.tokens.get(self.pos + 1).map(|s| &s.token),
                Some(Token::IntKw) | Some(Token::FloatKw)
            )
        {
            self.advance(); // '('
            let ty = self.parse_type()?;
            self.expect(&Token::RParen)?;
            let inner = self.parse_factor()?;
            return Ok(Expr::Casting { ty, inner: Box::new(inner), lineno });
        }
        if self.peek() == Some(&Token::LParen) {
            self.advance();
            let inner = self.parse_expr()?;
            self.expect(&Token::RParen)?;
            return Ok(inner);
        }
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n, lineno)),
            Some(Token::Id(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.advance();
                    let args = self.parse_arglist()?;
                    self.expect(&Token::RParen)?;
                    Ok(Expr::Call { callee: name, args, lineno })
                } else if self.peek() == Some(&Token::LBracket) {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&Token::RBracket)?;
                    Ok(Expr::Array { name, index: Box::new(index), lineno })
                } else {
                    Ok(Expr::Id { name, lineno })
                }
            }
            other => Err(StepError::Parse {
                line: self.line(),
                message: format!("unexpected token in expression: {:?}", other),
            }),
        }
    }
}

fn expr_text(e: &Expr) -> String {
    match e {
        Expr::Number(n, _) => {
            if n.fract() == 0.0 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Expr::StringLit(s, _) => s.clone(),
        Expr::Id { name, .. } => name.clone(),
        Expr::Array { name, index, .. } => format!("{}[{}]", name, expr_text(index)),
        Expr::Casting { ty, inner, .. } => format!("({}){}", ty.as_str(), expr_text(inner)),
        Expr::BinOp { text, .. } => text.clone(),
        Expr::Call { callee, args, .. } => {
            let parts: Vec<String> = args.iter().map(expr_text).collect();
            format!("{}({})", callee, parts.join(","))
        }
    }
}

fn combine(op: BinOpKind, lhs: Expr, rhs: Expr) -> Expr {
    let text = format!("{}{}{}", expr_text(&lhs), op.as_str(), expr_text(&rhs));
    let lineno = lhs.lineno();
    Expr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs), text, lineno }
}

/// Convenience: tokenize then parse in one call.
pub fn parse(source: &str) -> StepResult<crate::ast::Program> {
    let tokens = tokenize(source);
    Parser::new(&tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_main_with_assign_and_printf() {
        let src = "int main(){int a;int b;a=5;b=a;printf(\"%d\\n\",b);}";
        let program = parse(src).unwrap();
        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.functions[0].name, "main");
        assert_eq!(program.functions[0].stmts.len(), 5);
    }

    #[test]
    fn builds_canonical_text_for_binop() {
        let src = "int main(){int a;int b;int c;c=a*b+1;}";
        let program = parse(src).unwrap();
        if let Stmt::Assign { expr, .. } = &program.functions[0].stmts[3] {
            if let Expr::BinOp { text, .. } = expr {
                assert_eq!(text, "a*b+1");
            } else {
                panic!("expected binop");
            }
        } else {
            panic!("expected assign");
        }
    }

    #[test]
    fn reorders_for_loop_parts_for_the_stepper() {
        let src = "int main(){int i;int total;total=0;for(i=0;i<3;i=i+1){total=total+i;}}";
        let program = parse(src).unwrap();
        let for_stmt = &program.functions[0].stmts[3];
        match for_stmt {
            Stmt::For { assign, increment, condition, .. } => {
                assert!(matches!(**assign, Stmt::Assign { .. }));
                assert!(matches!(**increment, Stmt::Assign { .. }));
                assert!(matches!(**condition, Stmt::Condition { .. }));
            }
            _ => panic!("expected for"),
        }
    }

    #[test]
    fn void_must_be_lone_parameter() {
        let src = "void main(void){}";
        let program = parse(src).unwrap();
        assert!(program.functions[0].params.is_empty());
    }
}
