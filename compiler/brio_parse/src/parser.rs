//! Precedence-climbing parser.

use brio_ir::{
    BinaryOp, Expr, ExprArena, ExprId, ExprKind, Name, Span, StringInterner, UnaryOp,
};
use smallvec::SmallVec;
use tracing::trace;

use crate::{lex, ParseError, Token, TokenKind};

/// Nesting limit; guards against stack exhaustion on adversarial input.
const MAX_DEPTH: u32 = 256;

/// Result of a successful parse.
pub struct Parsed {
    pub arena: ExprArena,
    pub root: ExprId,
    pub interner: StringInterner,
}

/// Parse one expression program.
pub fn parse(source: &str) -> Result<Parsed, ParseError> {
    let mut interner = StringInterner::new();
    let tokens = lex(source, &mut interner)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        arena: ExprArena::with_capacity(source.len()),
        interner,
        depth: 0,
    };
    let root = parser.parse_expr()?;
    parser.expect_eof()?;
    trace!(exprs = parser.arena.expr_count(), "parsed program");
    Ok(Parsed {
        arena: parser.arena,
        root,
        interner: parser.interner,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    arena: ExprArena,
    interner: StringInterner,
    depth: u32,
}

impl Parser {
    // ===== Token stream =====

    fn current(&self) -> Token {
        self.tokens[self.pos]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.current_kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ParseError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof { span: token.span }
        } else {
            ParseError::UnexpectedToken {
                found: token.kind.describe().to_string(),
                span: token.span,
            }
        }
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.current_kind() == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    // ===== Grammar =====

    fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                span: self.current().span,
            });
        }
        let result = self.parse_conditional();
        self.depth -= 1;
        result
    }

    /// `cond ? then : otherwise`: lowest precedence, right-associative.
    fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let cond = self.parse_coalesce()?;
        if !self.eat(TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.parse_expr()?;
        let span = self.arena.span(cond).merge(self.arena.span(otherwise));
        Ok(self.alloc(
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            },
            span,
        ))
    }

    fn parse_coalesce(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_or()?;
        while self.eat(TokenKind::QuestionQuestion) {
            let right = self.parse_or()?;
            left = self.binary(BinaryOp::Coalesce, left, right);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_and()?;
        while matches!(self.current_kind(), TokenKind::Or | TokenKind::PipePipe) {
            self.advance();
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_equality()?;
        while matches!(self.current_kind(), TokenKind::And | TokenKind::AmpAmp) {
            self.advance();
            let right = self.parse_equality()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_comparison()?;
        while let Some(op) = self.match_equality_op() {
            self.advance();
            let right = self.parse_comparison()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_comparison_op() {
            self.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_additive_op() {
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_power()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.advance();
            let right = self.parse_power()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    /// Exponentiation is right-associative: `a ** b ** c` is `a ** (b ** c)`.
    fn parse_power(&mut self) -> Result<ExprId, ParseError> {
        let base = self.parse_unary()?;
        if matches!(self.current_kind(), TokenKind::StarStar | TokenKind::Caret) {
            self.advance();
            let exponent = self.parse_power()?;
            return Ok(self.binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let Some(op) = self.match_unary_op() else {
            return self.parse_postfix();
        };
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                span: self.current().span,
            });
        }
        let token = self.advance();
        let operand = self.parse_unary()?;
        self.depth -= 1;
        let span = token.span.merge(self.arena.span(operand));
        Ok(self.alloc(ExprKind::Unary { op, operand }, span))
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let (property, prop_span) = self.expect_ident()?;
                    let span = self.arena.span(expr).merge(prop_span);
                    expr = self.alloc(
                        ExprKind::Member {
                            object: expr,
                            property,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    let close = self.expect(TokenKind::RBracket)?;
                    let span = self.arena.span(expr).merge(close.span);
                    expr = self.alloc(
                        ExprKind::Index {
                            object: expr,
                            index,
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    self.advance();
                    let (args, close_span) = self.parse_args()?;
                    let span = self.arena.span(expr).merge(close_span);
                    expr = self.alloc(ExprKind::Call { func: expr, args }, span);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.current();
        match token.kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(self.alloc(ExprKind::Int(value), token.span))
            }
            TokenKind::Float(bits) => {
                self.advance();
                Ok(self.alloc(ExprKind::Float(bits), token.span))
            }
            TokenKind::Str(name) => {
                self.advance();
                Ok(self.alloc(ExprKind::Str(name), token.span))
            }
            TokenKind::True => {
                self.advance();
                Ok(self.alloc(ExprKind::Bool(true), token.span))
            }
            TokenKind::False => {
                self.advance();
                Ok(self.alloc(ExprKind::Bool(false), token.span))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(self.alloc(ExprKind::Nil, token.span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(self.alloc(ExprKind::Ident(name), token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements: SmallVec<[ExprId; 4]> = SmallVec::new();
                if self.current_kind() != TokenKind::RBracket {
                    elements.push(self.parse_expr()?);
                    while self.eat(TokenKind::Comma) {
                        elements.push(self.parse_expr()?);
                    }
                }
                let close = self.expect(TokenKind::RBracket)?;
                let range = self.arena.alloc_expr_list(elements);
                let span = token.span.merge(close.span);
                Ok(self.alloc(ExprKind::List(range), span))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parse a parenthesized argument list; the opening paren is consumed.
    fn parse_args(&mut self) -> Result<(brio_ir::ExprRange, Span), ParseError> {
        let mut args: SmallVec<[ExprId; 4]> = SmallVec::new();
        if self.current_kind() != TokenKind::RParen {
            args.push(self.parse_expr()?);
            while self.eat(TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        let close = self.expect(TokenKind::RParen)?;
        Ok((self.arena.alloc_expr_list(args), close.span))
    }

    fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let token = self.advance();
                Ok((name, token.span))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.arena.span(left).merge(self.arena.span(right));
        self.alloc(ExprKind::Binary { op, left, right }, span)
    }

    // ===== Operator matching =====

    fn match_equality_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            _ => None,
        }
    }

    fn match_comparison_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        }
    }

    fn match_additive_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    fn match_multiplicative_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        }
    }

    fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang | TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
