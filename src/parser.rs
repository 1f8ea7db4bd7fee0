//! Recursive-descent parser for MiniLang.
//!
//! One-token lookahead, with a second-token peek reserved for a handful of
//! statement forms. Rather than dispatch identifier-led statements by
//! scanning ahead through the four shapes spec.md §4.2 lists
//! (`ident = …`, `ident[…] = …`, `ident.field = …`, `ident.field[…] = …`),
//! this parser always parses a full expression first and then checks for a
//! trailing `=`: whatever expression shape comes back (`Identifier`,
//! `Index`, `FieldAccess`) tells us which assignment form it is. This is
//! behaviorally identical to the per-token dispatch table and reuses the
//! expression grammar instead of duplicating it.

use crate::ast::{
    ArrayAssignTarget, BinOp, Expr, FuncDef, Param, Program, Statement, StructDef, StructField,
};
use crate::lexer::{LexError, Token, TokenKind};
use crate::types::{StructType, Type, TypeNames};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            line: e.line,
            column: e.column,
            message: e.message,
        }
    }
}

/// Names recognized as builtins in call position, per spec.md §4.2.
pub const BUILTINS: &[&str] = &[
    "printf", "malloc", "free", "strlen", "strcpy", "strcat", "to_str", "array_to_str", "to_int",
    "to_float", "ord", "length",
];

pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = crate::lexer::tokenize(source)?;
    Parser::new(tokens).parse_program()
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    defined_structs: HashSet<String>,
    defined_functions: HashSet<String>,
    type_names: TypeNames,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            defined_structs: HashSet::new(),
            defined_functions: HashSet::new(),
            type_names: TypeNames::new(),
        }
    }

    // ------------------------------------------------------------------
    // Token stream primitives
    // ------------------------------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    fn pos_lc(&self) -> (usize, usize) {
        (self.current().line, self.current().column)
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        let (line, column) = self.pos_lc();
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.err(format!(
                "expected {:?}, found {:?}",
                kind,
                self.peek_kind()
            )))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.err(format!("expected identifier, found {:?}", other))),
        }
    }

    // ------------------------------------------------------------------
    // Program / statements
    // ------------------------------------------------------------------

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_block_until(&mut self, terminators: &[TokenKind]) -> Result<Vec<Statement>, ParseError> {
        let mut body = Vec::new();
        while !terminators.iter().any(|t| self.check(t)) && !self.check(&TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_decl(false),
            TokenKind::Global => self.parse_decl(true),
            TokenKind::Print => self.parse_print(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Func => self.parse_func(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Struct => self.parse_struct(),
            TokenKind::Break => {
                self.advance();
                Ok(Statement::Break)
            }
            _ => self.parse_assign_or_expr(),
        }
    }

    fn parse_decl(&mut self, is_global: bool) -> Result<Statement, ParseError> {
        self.advance(); // `let` / `global`
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        if is_global {
            Ok(Statement::Global { name, ty, value })
        } else {
            Ok(Statement::Let { name, ty, value })
        }
    }

    fn parse_print(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // print
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(Statement::Print(expr))
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // if
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Then)?;
        let then_branch = self.parse_block_until(&[TokenKind::Else, TokenKind::End])?;
        let else_branch = if self.check(&TokenKind::Else) {
            self.advance();
            Some(self.parse_block_until(&[TokenKind::End])?)
        } else {
            None
        };
        self.expect(TokenKind::End)?;
        Ok(Statement::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // while
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block_until(&[TokenKind::End])?;
        self.expect(TokenKind::End)?;
        Ok(Statement::While { cond, body })
    }

    fn parse_func(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // func
        let name = self.expect_identifier()?;
        self.defined_functions.insert(name.clone());
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let pname = self.expect_identifier()?;
                self.expect(TokenKind::Colon)?;
                let pty = self.parse_type()?;
                params.push(Param { name: pname, ty: pty });
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let return_type = if self.check(&TokenKind::Arrow) {
            self.advance();
            self.parse_type()?
        } else {
            Type::Void
        };
        let body = self.parse_block_until(&[TokenKind::End])?;
        self.expect(TokenKind::End)?;
        Ok(Statement::FuncDef(FuncDef {
            name,
            params,
            return_type,
            body,
        }))
    }

    fn parse_return(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // return
        if self.starts_expression() {
            let expr = self.parse_expr()?;
            Ok(Statement::Return(Some(expr)))
        } else {
            Ok(Statement::Return(None))
        }
    }

    /// Whether the current token could begin an expression. Used only to
    /// decide whether a bare `return` has a trailing operand, since
    /// MiniLang statements have no explicit terminator.
    fn starts_expression(&self) -> bool {
        !matches!(
            self.peek_kind(),
            TokenKind::End
                | TokenKind::Else
                | TokenKind::Eof
                | TokenKind::Let
                | TokenKind::Global
                | TokenKind::Print
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Func
                | TokenKind::Return
                | TokenKind::Struct
                | TokenKind::Break
        )
    }

    fn parse_struct(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // struct
        let name = self.expect_identifier()?;
        // Register the placeholder immediately so self- and mutually-
        // referential `ref Name` fields resolve while parsing the body.
        self.defined_structs.insert(name.clone());
        self.type_names
            .define_struct(StructType::placeholder(&name));

        let mut fields = Vec::new();
        if !self.check(&TokenKind::End) {
            loop {
                let fname = self.expect_identifier()?;
                self.expect(TokenKind::Colon)?;
                let fty = self.parse_type()?;
                fields.push(StructField { name: fname, ty: fty });
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::End)?;

        let struct_type = StructType {
            name: name.clone(),
            fields: fields
                .iter()
                .map(|f| (f.name.clone(), f.ty.clone()))
                .collect(),
        };
        self.type_names.define_struct(struct_type);

        Ok(Statement::StructDef(StructDef { name, fields }))
    }

    fn parse_assign_or_expr(&mut self) -> Result<Statement, ParseError> {
        let (line, column) = self.pos_lc();
        let expr = self.parse_expr()?;
        if self.check(&TokenKind::Assign) {
            self.advance();
            let value = self.parse_expr()?;
            return self.build_assignment(expr, value, line, column);
        }
        Ok(Statement::ExprStmt(expr))
    }

    fn build_assignment(
        &self,
        target: Expr,
        value: Expr,
        line: usize,
        column: usize,
    ) -> Result<Statement, ParseError> {
        match target {
            Expr::Identifier(name) => Ok(Statement::Assign { name, value }),
            Expr::Index { base, index } => {
                let target = match *base {
                    Expr::Identifier(name) => ArrayAssignTarget::Var(name),
                    Expr::FieldAccess { base, field } => match *base {
                        Expr::Identifier(name) => ArrayAssignTarget::Field {
                            base: name,
                            field,
                        },
                        _ => {
                            return Err(ParseError {
                                line,
                                column,
                                message: "invalid left-hand side of array assignment".into(),
                            });
                        }
                    },
                    _ => {
                        return Err(ParseError {
                            line,
                            column,
                            message: "invalid left-hand side of array assignment".into(),
                        });
                    }
                };
                Ok(Statement::ArrayAssign {
                    target,
                    index: *index,
                    value,
                })
            }
            Expr::FieldAccess { .. } => {
                let mut path = Vec::new();
                let mut cur = target;
                let base = loop {
                    match cur {
                        Expr::FieldAccess { base, field } => {
                            path.push(field);
                            cur = *base;
                        }
                        Expr::Identifier(name) => break name,
                        _ => {
                            return Err(ParseError {
                                line,
                                column,
                                message: "invalid left-hand side of field assignment".into(),
                            });
                        }
                    }
                };
                path.reverse();
                Ok(Statement::FieldAssign {
                    base,
                    path,
                    value,
                })
            }
            _ => Err(ParseError {
                line,
                column,
                message: "invalid left-hand side of assignment".into(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let mut ty = self.parse_base_type()?;
        while self.check(&TokenKind::LBracket) {
            self.advance();
            let size = if self.check(&TokenKind::RBracket) {
                None
            } else {
                match self.peek_kind().clone() {
                    TokenKind::Int(n) if n >= 0 => {
                        self.advance();
                        Some(n as u64)
                    }
                    other => {
                        return Err(self.err(format!(
                            "expected array size or ']', found {:?}",
                            other
                        )));
                    }
                }
            };
            self.expect(TokenKind::RBracket)?;
            ty = Type::Array(Box::new(ty), size);
        }
        Ok(ty)
    }

    fn parse_base_type(&mut self) -> Result<Type, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Ref => {
                self.advance();
                let inner = self.parse_type()?;
                Ok(Type::Reference(Box::new(inner)))
            }
            TokenKind::IntType => {
                self.advance();
                Ok(Type::Int)
            }
            TokenKind::FloatType => {
                self.advance();
                Ok(Type::Float)
            }
            TokenKind::StringType | TokenKind::StrType => {
                self.advance();
                Ok(Type::String)
            }
            TokenKind::VoidType => {
                self.advance();
                Ok(Type::Void)
            }
            TokenKind::BoolType => {
                self.advance();
                Ok(Type::Bool)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(self
                    .type_names
                    .lookup_struct(&name)
                    .cloned()
                    .map(Type::Struct)
                    .unwrap_or_else(|| Type::Struct(StructType::placeholder(&name))))
            }
            other => Err(self.err(format!("expected a type, found {:?}", other))),
        }
    }

    // ------------------------------------------------------------------
    // Expressions (lowest to highest precedence, spec.md §4.2)
    // ------------------------------------------------------------------

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::Pipe) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Binary {
                op: BinOp::Or,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_cmp()?;
        while self.check(&TokenKind::Amp) {
            self.advance();
            let right = self.parse_cmp()?;
            left = Expr::Binary {
                op: BinOp::And,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }
        Ok(left)
    }

    /// Non-chaining: at most one comparison operator per expression.
    fn parse_cmp(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_add()?;
        let op = match self.peek_kind() {
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Gte => BinOp::Ge,
            TokenKind::Lte => BinOp::Le,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::Neq => BinOp::Ne,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_add()?;
        Ok(Expr::Binary {
            op,
            lhs: Box::new(left),
            rhs: Box::new(right),
        })
    }

    fn parse_add(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_mul()?;
        loop {
            match self.peek_kind() {
                TokenKind::Plus => {
                    self.advance();
                    let right = self.parse_mul()?;
                    left = Expr::Binary {
                        op: BinOp::Add,
                        lhs: Box::new(left),
                        rhs: Box::new(right),
                    };
                }
                TokenKind::Minus => {
                    self.advance();
                    let right = self.parse_mul()?;
                    left = Expr::Binary {
                        op: BinOp::Sub,
                        lhs: Box::new(left),
                        rhs: Box::new(right),
                    };
                }
                TokenKind::Concat => {
                    self.advance();
                    let right = self.parse_mul()?;
                    left = Expr::Concat(Box::new(left), Box::new(right));
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_mul(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }
        Ok(left)
    }

    /// `-` desugars to `0 - expr` so that `--x` parses as unary minus of
    /// unary minus, matching spec.md §9's documented (non-)behavior.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::Binary {
                    op: BinOp::Sub,
                    lhs: Box::new(Expr::Int(0)),
                    rhs: Box::new(operand),
                })
            }
            TokenKind::Bang => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::Not(Box::new(operand)))
            }
            TokenKind::Ref => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::RefOf(Box::new(operand)))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect_identifier()?;
                    expr = Expr::FieldAccess {
                        base: Box::new(expr),
                        field,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_arg_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_cast(&mut self, ty: Type) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(Expr::Cast {
            ty,
            expr: Box::new(expr),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::Int(n))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(Expr::Float(f))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(s))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Null)
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elems = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    loop {
                        elems.push(self.parse_expr()?);
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::ArrayLiteral(elems))
            }
            TokenKind::Zeros => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let n = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Zeros(Box::new(n)))
            }
            // Primitive-type keywords used as a cast callee: `int(expr)`.
            TokenKind::IntType => {
                self.advance();
                self.parse_cast(Type::Int)
            }
            TokenKind::FloatType => {
                self.advance();
                self.parse_cast(Type::Float)
            }
            TokenKind::StringType | TokenKind::StrType => {
                self.advance();
                self.parse_cast(Type::String)
            }
            TokenKind::BoolType => {
                self.advance();
                self.parse_cast(Type::Bool)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    self.advance();
                    let args = self.parse_arg_list()?;
                    if self.defined_structs.contains(&name) {
                        Ok(Expr::StructConstructor { name, args })
                    } else {
                        // Recognized builtins, already-defined functions,
                        // and forward-declared functions all lower the
                        // same way: a call node. spec.md §4.2 treats an
                        // unknown, non-struct callee as a forward
                        // reference rather than an error at parse time.
                        Ok(Expr::Call { name, args })
                    }
                } else {
                    Ok(Expr::Identifier(name))
                }
            }
            other => Err(self.err(format!("unexpected token {:?}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Program {
        parse(src).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    #[test]
    fn let_and_print() {
        let prog = parse_ok("let x: int = 10 print(x + 2)");
        assert_eq!(prog.statements.len(), 2);
        assert!(matches!(prog.statements[0], Statement::Let { .. }));
        assert!(matches!(prog.statements[1], Statement::Print(_)));
    }

    #[test]
    fn array_decl_and_index_assign() {
        let prog = parse_ok("let a: int[3] = [1,2,3] a[0] = a[1]+a[2]");
        match &prog.statements[1] {
            Statement::ArrayAssign { target, .. } => {
                assert_eq!(*target, ArrayAssignTarget::Var("a".into()));
            }
            other => panic!("expected ArrayAssign, got {other:?}"),
        }
    }

    #[test]
    fn double_minus_is_nested_unary() {
        let prog = parse_ok("let x: int = --5");
        match &prog.statements[0] {
            Statement::Let { value, .. } => {
                assert_eq!(
                    *value,
                    Expr::Binary {
                        op: BinOp::Sub,
                        lhs: Box::new(Expr::Int(0)),
                        rhs: Box::new(Expr::Binary {
                            op: BinOp::Sub,
                            lhs: Box::new(Expr::Int(0)),
                            rhs: Box::new(Expr::Int(5)),
                        }),
                    }
                );
            }
            other => panic!("expected Let, got {other:?}"),
        }
    }

    #[test]
    fn struct_def_then_constructor_and_nested_field_assign() {
        let prog = parse_ok(
            "struct N v:int, next:ref N end \
             let a: N = N(1, null) \
             a.next = N(2, null) \
             a.next.next = N(3, null)",
        );
        assert!(matches!(prog.statements[0], Statement::StructDef(_)));
        match &prog.statements[2] {
            Statement::FieldAssign { base, path, .. } => {
                assert_eq!(base, "a");
                assert_eq!(path, &vec!["next".to_string()]);
            }
            other => panic!("expected FieldAssign, got {other:?}"),
        }
        match &prog.statements[3] {
            Statement::FieldAssign { base, path, .. } => {
                assert_eq!(base, "a");
                assert_eq!(path, &vec!["next".to_string(), "next".to_string()]);
            }
            other => panic!("expected nested FieldAssign, got {other:?}"),
        }
    }

    #[test]
    fn dotted_array_assignment() {
        let prog = parse_ok("a.items[0] = 5");
        match &prog.statements[0] {
            Statement::ArrayAssign { target, .. } => {
                assert_eq!(
                    *target,
                    ArrayAssignTarget::Field {
                        base: "a".into(),
                        field: "items".into(),
                    }
                );
            }
            other => panic!("expected ArrayAssign, got {other:?}"),
        }
    }

    #[test]
    fn if_while_break() {
        let prog = parse_ok(
            "let i: int = 0 \
             while i < 3 do \
               if i == 1 then break end \
               print(i) i = i + 1 \
             end",
        );
        assert!(matches!(prog.statements[1], Statement::While { .. }));
    }

    #[test]
    fn func_with_return_type_and_recursive_call() {
        let prog = parse_ok(
            "func fact(n: int) -> int \
               if n < 2 then return 1 end \
               return n * fact(n-1) \
             end",
        );
        match &prog.statements[0] {
            Statement::FuncDef(f) => {
                assert_eq!(f.name, "fact");
                assert_eq!(f.return_type, Type::Int);
                assert_eq!(f.params[0].ty, Type::Int);
            }
            other => panic!("expected FuncDef, got {other:?}"),
        }
    }

    #[test]
    fn cast_and_concat() {
        let prog = parse_ok(r#"let s: string = "hi" + to_str(42)"#);
        match &prog.statements[0] {
            Statement::Let { value, .. } => match value {
                Expr::Binary { op: BinOp::Add, .. } => {}
                other => panic!("expected Add, got {other:?}"),
            },
            other => panic!("expected Let, got {other:?}"),
        }
    }

    #[test]
    fn comparisons_do_not_chain() {
        // `1 < 2` parses as a single comparison; a second comparator
        // is simply not consumed by parse_cmp (left for the caller,
        // which in a top-level expression statement has nothing to do
        // with it and so is a parse error at the trailing token).
        let expr = Parser::new(crate::lexer::tokenize("1 < 2").unwrap())
            .parse_expr()
            .unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinOp::Lt,
                lhs: Box::new(Expr::Int(1)),
                rhs: Box::new(Expr::Int(2)),
            }
        );
    }

    #[test]
    fn ref_type_and_array_type_compose() {
        let prog = parse_ok("struct S a: ref int[3] end");
        match &prog.statements[0] {
            Statement::StructDef(s) => {
                assert_eq!(
                    s.fields[0].ty,
                    Type::Reference(Box::new(Type::Array(Box::new(Type::Int), Some(3))))
                );
            }
            other => panic!("expected StructDef, got {other:?}"),
        }
    }
}
