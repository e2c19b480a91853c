//! Recursive-descent parser for filters and order-by lists.
//!
//! Grammar (NOT binds tighter than AND, AND tighter than OR):
//!
//! ```text
//! filter   := or_expr? EOF
//! or_expr  := and_expr (OR and_expr)*
//! and_expr := not_expr (AND not_expr)*
//! not_expr := NOT not_expr | primary
//! primary  := '(' or_expr ')' | HAS '(' path ')' | path op literal
//! path     := IDENT ('.' IDENT)*
//! op       := '=' | '!=' | '<' | '<=' | '>' | '>='
//! literal  := STRING | INT | TRUE | FALSE | NULL | IDENT
//!
//! order_by := (IDENT (ASC | DESC)? (',' IDENT (ASC | DESC)?)*)? EOF
//! ```

use crate::{
    CompareOp, Filter, Lexer, Literal, LiteralKind, OrderTerm, ParseError, ParseResult, Path,
    Span, Token, TokenKind,
};

/// Deepest allowed nesting of parentheses and NOT.
pub const MAX_NESTING: usize = 64;

/// Parse a filter. Blank input yields `None`, which matches every row.
pub fn parse_filter(input: &str) -> ParseResult<Option<Filter>> {
    let mut parser = Parser::new(input)?;
    if parser.check(&TokenKind::Eof) {
        return Ok(None);
    }
    let filter = parser.parse_or()?;
    parser.expect_eof()?;
    Ok(Some(filter))
}

/// Parse a comma-separated `field [asc|desc]` list. Blank input yields no terms.
pub fn parse_order_by(input: &str) -> ParseResult<Vec<OrderTerm>> {
    let mut parser = Parser::new(input)?;
    let mut terms = Vec::new();
    if parser.check(&TokenKind::Eof) {
        return Ok(terms);
    }
    loop {
        terms.push(parser.parse_order_term()?);
        if parser.check(&TokenKind::Comma) {
            parser.advance();
        } else {
            break;
        }
    }
    parser.expect_eof()?;
    Ok(terms)
}

/// Parser state over a token buffer.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(input: &str) -> ParseResult<Self> {
        Ok(Self {
            tokens: Lexer::new(input).tokenize()?,
            pos: 0,
            depth: 0,
        })
    }

    // ==================== Token helpers ====================

    fn peek(&self) -> &Token {
        // tokenize() always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    fn expect_eof(&mut self) -> ParseResult<()> {
        if self.check(&TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.unexpected("AND, OR or end of filter"))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = match &token.kind {
            TokenKind::Ident(name) => format!("'{name}'"),
            other => other.name().to_string(),
        };
        ParseError::unexpected(expected, found, token.span)
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::NestingTooDeep {
                max: MAX_NESTING,
                span: self.peek().span,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ==================== Filter ====================

    fn parse_or(&mut self) -> ParseResult<Filter> {
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Filter::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Filter> {
        let mut left = self.parse_not()?;
        while self.check(&TokenKind::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Filter::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult<Filter> {
        if self.check(&TokenKind::Not) {
            let not = self.advance();
            self.enter()?;
            let inner = self.parse_not()?;
            self.leave();
            let span = not.span.to(inner.span());
            return Ok(Filter::Not(Box::new(inner), span));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Filter> {
        match &self.peek().kind {
            TokenKind::LParen => {
                self.advance();
                self.enter()?;
                let inner = self.parse_or()?;
                self.leave();
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Has => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let path = self.parse_path()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Filter::Has(path))
            }
            TokenKind::Ident(_) => {
                let path = self.parse_path()?;
                let op = self.parse_compare_op()?;
                let value = self.parse_literal()?;
                Ok(Filter::Compare { path, op, value })
            }
            _ => Err(self.unexpected("field path, has( or '('")),
        }
    }

    fn parse_path(&mut self) -> ParseResult<Path> {
        let (first, mut span) = self.expect_ident("field or edge name")?;
        let mut segments = vec![first];
        while self.check(&TokenKind::Dot) {
            self.advance();
            let (name, end) = self.expect_ident("field or edge name after '.'")?;
            segments.push(name);
            span = span.to(end);
        }
        Ok(Path { segments, span })
    }

    fn expect_ident(&mut self, expected: &str) -> ParseResult<(String, Span)> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                Ok((name, self.advance().span))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn parse_compare_op(&mut self) -> ParseResult<CompareOp> {
        let op = match self.peek().kind {
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::NotEq => CompareOp::NotEq,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::LtEq => CompareOp::LtEq,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::GtEq => CompareOp::GtEq,
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.advance();
        Ok(op)
    }

    fn parse_literal(&mut self) -> ParseResult<Literal> {
        let kind = match &self.peek().kind {
            TokenKind::Null => LiteralKind::Null,
            TokenKind::True => LiteralKind::Bool(true),
            TokenKind::False => LiteralKind::Bool(false),
            TokenKind::Int(i) => LiteralKind::Int(*i),
            TokenKind::String(s) => LiteralKind::String(s.clone()),
            TokenKind::Ident(s) => LiteralKind::Ident(s.clone()),
            _ => return Err(self.unexpected("literal")),
        };
        let span = self.advance().span;
        Ok(Literal { kind, span })
    }

    // ==================== Order by ====================

    fn parse_order_term(&mut self) -> ParseResult<OrderTerm> {
        let (field, mut span) = self.expect_ident("field name")?;
        let mut descending = false;
        if let TokenKind::Ident(dir) = &self.peek().kind {
            descending = match dir.to_ascii_lowercase().as_str() {
                "asc" => false,
                "desc" => true,
                _ => return Err(self.unexpected("asc, desc or ','")),
            };
            span = span.to(self.advance().span);
        }

        Ok(OrderTerm {
            field,
            descending,
            span,
        })
    }
}
