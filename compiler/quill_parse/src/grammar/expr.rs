//! Expressions, by precedence climbing.
//!
//! assignment → conditional / `??` → `||` → `&&` → equality → relational →
//! additive → multiplicative → `**` → unary → postfix → call/member →
//! primary.

use std::rc::Rc;

use quill_diagnostic::ErrorCode;
use quill_ir::{
    ArrayElement, BinaryOp, ExprId, ExprKind, FunctionFlags, Keyword, Literal, LogicalOp,
    MemberKey, Number, Op, Position, Property, Punct, TokenKind, UnaryOp, UpdateOp,
};
use quill_stack::ensure_sufficient_stack;

use super::Parser;
use crate::ParseError;

impl Parser {
    #[inline]
    pub(crate) fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        self.parse_assignment()
    }

    pub(crate) fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> Result<ExprId, ParseError> {
        if self.is_arrow_ahead() {
            return self.parse_arrow();
        }
        let position = self.cursor.position();
        let target = self.parse_conditional()?;
        let TokenKind::Operator(op) = self.cursor.current_kind() else {
            return Ok(target);
        };
        let op = match op {
            Op::Assign => None,
            Op::PlusAssign => Some(BinaryOp::Add),
            Op::MinusAssign => Some(BinaryOp::Sub),
            Op::StarAssign => Some(BinaryOp::Mul),
            Op::SlashAssign => Some(BinaryOp::Div),
            Op::PercentAssign => Some(BinaryOp::Mod),
            Op::StarStarAssign => Some(BinaryOp::Pow),
            _ => return Ok(target),
        };
        self.check_assignment_target(target)?;
        self.cursor.advance();
        let value = self.parse_assignment()?;
        if op.is_none() {
            if let ExprKind::Ident(var) = self.program.expr(target).kind {
                let name = self.program.var(var).name.clone();
                self.name_function(value, &name);
            }
        }
        Ok(self.expr(ExprKind::Assign { op, target, value }, position))
    }

    fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let test = self.parse_nullish()?;
        if !self.cursor.eat_punct(Punct::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.cursor.expect_punct(Punct::Colon)?;
        let alternate = self.parse_assignment()?;
        Ok(self.expr(
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            },
            position,
        ))
    }

    fn parse_nullish(&mut self) -> Result<ExprId, ParseError> {
        self.parse_logical(LogicalOp::Nullish, Op::Nullish, Self::parse_or)
    }

    fn parse_or(&mut self) -> Result<ExprId, ParseError> {
        self.parse_logical(LogicalOp::Or, Op::OrOr, Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<ExprId, ParseError> {
        self.parse_logical(LogicalOp::And, Op::AndAnd, Self::parse_equality)
    }

    fn parse_logical(
        &mut self,
        op: LogicalOp,
        token: Op,
        operand: fn(&mut Self) -> Result<ExprId, ParseError>,
    ) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let mut left = operand(self)?;
        while self.cursor.eat_op(token) {
            let right = operand(self)?;
            left = self.expr(ExprKind::Logical { op, left, right }, position);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Operator(Op::Eq) => BinaryOp::Eq,
                TokenKind::Operator(Op::NotEq) => BinaryOp::NotEq,
                TokenKind::Operator(Op::StrictEq) => BinaryOp::StrictEq,
                TokenKind::Operator(Op::StrictNotEq) => BinaryOp::StrictNotEq,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_relational()?;
            left = self.expr(ExprKind::Binary { op, left, right }, position);
        }
    }

    fn parse_relational(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Operator(Op::Lt) => BinaryOp::Lt,
                TokenKind::Operator(Op::LtEq) => BinaryOp::LtEq,
                TokenKind::Operator(Op::Gt) => BinaryOp::Gt,
                TokenKind::Operator(Op::GtEq) => BinaryOp::GtEq,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_additive()?;
            left = self.expr(ExprKind::Binary { op, left, right }, position);
        }
    }

    /// `+` and `-`, folding runs of `+` that involve a string operand into
    /// one concatenation node.
    ///
    /// Once the running value is known to be a string every later `+` is a
    /// concatenation; operands before the first string keep their numeric
    /// left-to-right addition as the first part.
    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let mut left = self.parse_multiplicative()?;
        let mut concat: Option<Vec<ExprId>> = None;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Operator(Op::Plus) => BinaryOp::Add,
                TokenKind::Operator(Op::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            if op == BinaryOp::Add {
                if let Some(parts) = concat.as_mut() {
                    parts.push(right);
                    continue;
                }
                if self.is_string_valued(left) || self.is_string_valued(right) {
                    concat = Some(vec![left, right]);
                    continue;
                }
            }
            if let Some(parts) = concat.take() {
                left = self.expr(ExprKind::Concat(parts), position);
            }
            left = self.expr(ExprKind::Binary { op, left, right }, position);
        }
        if let Some(parts) = concat {
            left = self.expr(ExprKind::Concat(parts), position);
        }
        Ok(left)
    }

    pub(crate) fn is_string_valued(&self, expr: ExprId) -> bool {
        matches!(
            self.program.expr(expr).kind,
            ExprKind::Literal(Literal::String(_)) | ExprKind::Concat(_)
        )
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let mut left = self.parse_exponent()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Operator(Op::Star) => BinaryOp::Mul,
                TokenKind::Operator(Op::Slash) => BinaryOp::Div,
                TokenKind::Operator(Op::Percent) => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_exponent()?;
            left = self.expr(ExprKind::Binary { op, left, right }, position);
        }
    }

    /// `**`, right-associative.
    fn parse_exponent(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let base = self.parse_unary()?;
        if !self.cursor.eat_op(Op::StarStar) {
            return Ok(base);
        }
        let exponent = self.parse_exponent()?;
        Ok(self.expr(
            ExprKind::Binary {
                op: BinaryOp::Pow,
                left: base,
                right: exponent,
            },
            position,
        ))
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let op = match self.cursor.current_kind() {
            TokenKind::Operator(Op::Bang) => UnaryOp::Not,
            TokenKind::Operator(Op::Minus) => UnaryOp::Neg,
            TokenKind::Operator(Op::Plus) => UnaryOp::Plus,
            TokenKind::Keyword(Keyword::Typeof) => UnaryOp::Typeof,
            TokenKind::Operator(token @ (Op::PlusPlus | Op::MinusMinus)) => {
                self.cursor.advance();
                let target = self.parse_unary()?;
                self.check_assignment_target(target)?;
                return Ok(self.expr(
                    ExprKind::Update {
                        op: update_op(token),
                        prefix: true,
                        target,
                    },
                    position,
                ));
            }
            _ => return self.parse_postfix(),
        };
        self.cursor.advance();
        let operand = self.parse_unary()?;
        Ok(self.expr(ExprKind::Unary { op, operand }, position))
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let expr = self.parse_call_member()?;
        let newline_before = self.cursor.current().newline_before;
        match self.cursor.current_kind() {
            TokenKind::Operator(op @ (Op::PlusPlus | Op::MinusMinus)) if !newline_before => {
                self.check_assignment_target(expr)?;
                self.cursor.advance();
                Ok(self.expr(
                    ExprKind::Update {
                        op: update_op(op),
                        prefix: false,
                        target: expr,
                    },
                    position,
                ))
            }
            _ => Ok(expr),
        }
    }

    /// Member accesses and calls. A chain containing `?.` is wrapped in an
    /// `OptionalChain` boundary, and each `?.` operand in an
    /// `OptionalGuard`.
    fn parse_call_member(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let mut expr = self.parse_primary()?;
        let mut optional = false;
        loop {
            match self.cursor.current_kind() {
                TokenKind::Punct(Punct::Dot) => {
                    self.cursor.advance();
                    let name = self.parse_property_name()?;
                    expr = self.member(expr, MemberKey::Static(name), position);
                }
                TokenKind::Operator(Op::OptionalDot) => {
                    self.cursor.advance();
                    optional = true;
                    let guarded = self.expr(ExprKind::OptionalGuard(expr), position);
                    expr = match self.cursor.current_kind() {
                        TokenKind::Punct(Punct::LParen) => {
                            let args = self.parse_arguments()?;
                            self.expr(
                                ExprKind::Call {
                                    callee: guarded,
                                    args,
                                },
                                position,
                            )
                        }
                        TokenKind::Punct(Punct::LBracket) => {
                            let key = self.parse_computed_key()?;
                            self.member(guarded, MemberKey::Computed(key), position)
                        }
                        _ => {
                            let name = self.parse_property_name()?;
                            self.member(guarded, MemberKey::Static(name), position)
                        }
                    };
                }
                TokenKind::Punct(Punct::LBracket) => {
                    let key = self.parse_computed_key()?;
                    expr = self.member(expr, MemberKey::Computed(key), position);
                }
                TokenKind::Punct(Punct::LParen) => {
                    let args = self.parse_arguments()?;
                    expr = self.expr(ExprKind::Call { callee: expr, args }, position);
                }
                _ => break,
            }
        }
        if optional {
            expr = self.expr(ExprKind::OptionalChain(expr), position);
        }
        Ok(expr)
    }

    fn member(&mut self, object: ExprId, property: MemberKey, position: Position) -> ExprId {
        self.expr(ExprKind::Member { object, property }, position)
    }

    /// Name after `.`: any identifier or keyword.
    fn parse_property_name(&mut self) -> Result<Rc<str>, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Ident | TokenKind::Keyword(_) => {
                Ok(self.cursor.advance().text.as_str().into())
            }
            found => Err(ParseError::new(
                ErrorCode::E1004,
                format!("Expected property name but found {}", found.describe()),
                self.cursor.position(),
            )),
        }
    }

    fn parse_computed_key(&mut self) -> Result<ExprId, ParseError> {
        self.cursor.expect_punct(Punct::LBracket)?;
        let key = self.parse_expression()?;
        self.cursor.expect_punct(Punct::RBracket)?;
        Ok(key)
    }

    fn parse_arguments(&mut self) -> Result<Vec<ArrayElement>, ParseError> {
        self.cursor.expect_punct(Punct::LParen)?;
        let mut args = Vec::new();
        while !self.cursor.eat_punct(Punct::RParen) {
            args.push(self.parse_element()?);
            if !self.cursor.eat_punct(Punct::Comma) {
                self.cursor.expect_punct(Punct::RParen)?;
                break;
            }
        }
        Ok(args)
    }

    /// Array element or call argument: an expression or `...name`.
    fn parse_element(&mut self) -> Result<ArrayElement, ParseError> {
        if self.cursor.check(TokenKind::RestIdent) {
            let token = self.cursor.advance();
            let value = self.reference(&token.text, token.position)?;
            return Ok(ArrayElement::Spread(value));
        }
        Ok(ArrayElement::Expr(self.parse_assignment()?))
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let literal = match self.cursor.current_kind() {
            TokenKind::Number => {
                let text = self.cursor.advance().text;
                Literal::Number(Number::parse_literal(&text).unwrap_or(Number::NAN))
            }
            TokenKind::String => Literal::String(self.cursor.advance().text.as_str().into()),
            TokenKind::Keyword(Keyword::True) => {
                self.cursor.advance();
                Literal::Bool(true)
            }
            TokenKind::Keyword(Keyword::False) => {
                self.cursor.advance();
                Literal::Bool(false)
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.cursor.advance();
                Literal::Null
            }
            TokenKind::Keyword(Keyword::Undefined) => {
                self.cursor.advance();
                Literal::Undefined
            }
            TokenKind::Template => {
                let token = self.cursor.advance();
                return self.parse_template(&token);
            }
            TokenKind::Keyword(Keyword::This) => {
                self.cursor.advance();
                return self.reference("this", position);
            }
            TokenKind::Keyword(Keyword::Function) => return self.parse_function_expression(),
            TokenKind::Ident => {
                let token = self.cursor.advance();
                return self.reference(&token.text, position);
            }
            TokenKind::Punct(Punct::LParen) => {
                self.cursor.advance();
                let inner = self.parse_expression()?;
                self.cursor.expect_punct(Punct::RParen)?;
                return Ok(inner);
            }
            TokenKind::Punct(Punct::LBracket) => return self.parse_array_literal(),
            TokenKind::Punct(Punct::LBrace) => return self.parse_object_literal(),
            TokenKind::Eof => return Err(self.cursor.unexpected()),
            found => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("Expected expression but found {}", found.describe()),
                    position,
                ))
            }
        };
        Ok(self.expr(ExprKind::Literal(literal), position))
    }

    /// `[a, , ...rest]`
    fn parse_array_literal(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.advance().position;
        let mut elements = Vec::new();
        loop {
            if self.cursor.eat_punct(Punct::RBracket) {
                break;
            }
            if self.cursor.eat_punct(Punct::Comma) {
                elements.push(ArrayElement::Hole);
                continue;
            }
            elements.push(self.parse_element()?);
            if !self.cursor.eat_punct(Punct::Comma) {
                self.cursor.expect_punct(Punct::RBracket)?;
                break;
            }
        }
        Ok(self.expr(ExprKind::Array(elements), position))
    }

    /// `{ a: 1, b, [k]: v, m() {}, ...rest }`
    fn parse_object_literal(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.advance().position;
        let mut properties = Vec::new();
        loop {
            if self.cursor.eat_punct(Punct::RBrace) {
                break;
            }
            properties.push(self.parse_property()?);
            if !self.cursor.eat_punct(Punct::Comma) {
                self.cursor.expect_punct(Punct::RBrace)?;
                break;
            }
        }
        Ok(self.expr(ExprKind::Object(properties), position))
    }

    fn parse_property(&mut self) -> Result<Property, ParseError> {
        if self.cursor.check(TokenKind::RestIdent) {
            let token = self.cursor.advance();
            let value = self.reference(&token.text, token.position)?;
            return Ok(Property::Spread(value));
        }

        let token = self.cursor.current().clone();
        let key = match token.kind {
            TokenKind::Punct(Punct::LBracket) => MemberKey::Computed(self.parse_computed_key()?),
            TokenKind::Ident | TokenKind::Keyword(_) | TokenKind::String => {
                self.cursor.advance();
                MemberKey::Static(token.text.as_str().into())
            }
            TokenKind::Number => {
                self.cursor.advance();
                let number = Number::parse_literal(&token.text).unwrap_or(Number::NAN);
                MemberKey::Static(number.to_string().into())
            }
            _ => return Err(self.cursor.expected("property name")),
        };

        if self.cursor.eat_punct(Punct::Colon) {
            let value = self.parse_assignment()?;
            if let MemberKey::Static(name) = &key {
                self.name_function(value, name);
            }
            return Ok(Property::Init { key, value });
        }

        if self.cursor.check_punct(Punct::LParen) {
            let name = match &key {
                MemberKey::Static(name) => Some(name.clone()),
                MemberKey::Computed(_) => None,
            };
            let func =
                self.parse_function_rest(name, FunctionFlags::METHOD, token.position, false)?;
            let value = self.expr(ExprKind::Function(func), token.position);
            return Ok(Property::Init { key, value });
        }

        if token.kind == TokenKind::Ident {
            let value = self.reference(&token.text, token.position)?;
            return Ok(Property::Init { key, value });
        }
        Err(self.cursor.expected("':'"))
    }
}

fn update_op(op: Op) -> UpdateOp {
    if op == Op::PlusPlus {
        UpdateOp::Increment
    } else {
        UpdateOp::Decrement
    }
}
