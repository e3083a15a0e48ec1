//! Binary and unary operators.
//!
//! Spelling pairs (`and`/`&&`, `or`/`||`, `**`/`^`) are unified here: the
//! lexer maps both spellings of a pair to the same variant, so operator
//! identity is semantic, not textual.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// Exponentiation; both `**` and `^` spellings.
    Pow,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical; both keyword and symbol spellings.
    And,
    Or,

    /// Nil-coalescing: `a ?? b`.
    Coalesce,
}

impl BinaryOp {
    /// Source-level symbol for this operator, used in diagnostics.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Coalesce => "??",
        }
    }

    /// Precedence level of this operator.
    ///
    /// Higher number = lower precedence (binds less tightly).
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Pow => 2,
            Self::Mul | Self::Div | Self::Mod => 3,
            Self::Add | Self::Sub => 4,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 7,
            Self::Eq | Self::NotEq => 8,
            Self::And => 12,
            Self::Or => 13,
            Self::Coalesce => 14,
        }
    }

    /// True if this operator binds less tightly than `other`.
    #[inline]
    pub const fn binds_weaker_than(self, other: BinaryOp) -> bool {
        self.precedence() > other.precedence()
    }

    /// Boolean-class operators (`and`, `or`).
    #[inline]
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Whether a child operand with this operator must be parenthesized
    /// under `parent` so the rendering re-parses to the same tree.
    ///
    /// Weaker-binding children always need parens. Equal-precedence
    /// children need them unless the position is covered by the parent's
    /// associativity: same-operator chains of the associative operators
    /// flatten, a left-associative parent absorbs its left side, `**`
    /// (right-associative) absorbs its right side. Operators whose
    /// operands may be reordered during canonicalization keep parens on
    /// both sides.
    pub fn needs_parens_under(self, parent: BinaryOp, right_side: bool) -> bool {
        if self.binds_weaker_than(parent) {
            return true;
        }
        if self.precedence() != parent.precedence() {
            return false;
        }
        if self == parent {
            match parent {
                Self::Add | Self::Mul | Self::And | Self::Or => false,
                Self::Pow => !right_side,
                Self::Eq | Self::NotEq | Self::Gt | Self::GtEq => true,
                _ => right_side,
            }
        } else {
            match parent {
                Self::Add | Self::Mul | Self::Eq | Self::NotEq | Self::Gt | Self::GtEq => true,
                _ => right_side,
            }
        }
    }

    /// Short-circuit operators: the right operand's evaluation is
    /// conditional on the left operand's value.
    #[inline]
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Coalesce)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Numeric identity: `+x`.
    Plus,
    /// Numeric negation: `-x`.
    Neg,
    /// Logical negation; both `!` and `not` spellings.
    Not,
}

impl UnaryOp {
    /// Source-level symbol for this operator, used in diagnostics.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}
