//! Operator kinds for `ClassAd` expressions.
//!
//! The enumeration is partitioned into contiguous ranges: comparison,
//! arithmetic, logical, bitwise and miscellaneous. The evaluator selects a
//! handler by range membership only, so the declaration order below is load
//! bearing. Reordering variants across a family boundary breaks dispatch.


use std::fmt;

/// Operator family, derived from the discriminant range of an [`OpKind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpCategory {
    /// `<`, `<=`, `!=`, `==`, `=?=`, `=!=`, `>=`, `>`
    Comparison,
    /// Unary `+`/`-` and binary `+ - * / %`
    Arithmetic,
    /// `!`, `||`, `&&`
    Logical,
    /// `~`, `|`, `^`, `&`, `<<`, `>>`, `>>>`
    Bitwise,
    /// No-op, parentheses, subscript, ternary, Elvis.
    Misc,
}

/// Operator kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpKind {
    /// Placeholder operator; yields its first operand unchanged.
    NoOp,

    // Comparison
    LessThan,
    LessOrEqual,
    NotEqual,
    Equal,
    MetaEqual,
    MetaNotEqual,
    GreaterOrEqual,
    GreaterThan,

    // Arithmetic
    UnaryPlus,
    UnaryMinus,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulus,

    // Logical
    LogicalNot,
    LogicalOr,
    LogicalAnd,

    // Bitwise
    BitwiseNot,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    LeftShift,
    RightShift,
    UnsignedRightShift,

    // Misc
    Parentheses,
    Subscript,
    Ternary,
    Elvis,
}

impl OpKind {
    pub const COMPARISON_START: OpKind = OpKind::LessThan;
    pub const COMPARISON_END: OpKind = OpKind::GreaterThan;
    pub const ARITHMETIC_START: OpKind = OpKind::UnaryPlus;
    pub const ARITHMETIC_END: OpKind = OpKind::Modulus;
    pub const LOGIC_START: OpKind = OpKind::LogicalNot;
    pub const LOGIC_END: OpKind = OpKind::LogicalAnd;
    pub const BITWISE_START: OpKind = OpKind::BitwiseNot;
    pub const BITWISE_END: OpKind = OpKind::UnsignedRightShift;
    pub const MISC_START: OpKind = OpKind::Parentheses;
    pub const MISC_END: OpKind = OpKind::Elvis;

    /// Every operator, in declaration order.
    pub const ALL: [OpKind; 30] = [
        OpKind::NoOp,
        OpKind::LessThan,
        OpKind::LessOrEqual,
        OpKind::NotEqual,
        OpKind::Equal,
        OpKind::MetaEqual,
        OpKind::MetaNotEqual,
        OpKind::GreaterOrEqual,
        OpKind::GreaterThan,
        OpKind::UnaryPlus,
        OpKind::UnaryMinus,
        OpKind::Addition,
        OpKind::Subtraction,
        OpKind::Multiplication,
        OpKind::Division,
        OpKind::Modulus,
        OpKind::LogicalNot,
        OpKind::LogicalOr,
        OpKind::LogicalAnd,
        OpKind::BitwiseNot,
        OpKind::BitwiseOr,
        OpKind::BitwiseXor,
        OpKind::BitwiseAnd,
        OpKind::LeftShift,
        OpKind::RightShift,
        OpKind::UnsignedRightShift,
        OpKind::Parentheses,
        OpKind::Subscript,
        OpKind::Ternary,
        OpKind::Elvis,
    ];

    #[inline]
    const fn in_range(self, start: OpKind, end: OpKind) -> bool {
        let tag = self as u8;
        tag >= start as u8 && tag <= end as u8
    }

    #[inline]
    pub const fn is_comparison(self) -> bool {
        self.in_range(Self::COMPARISON_START, Self::COMPARISON_END)
    }

    #[inline]
    pub const fn is_arithmetic(self) -> bool {
        self.in_range(Self::ARITHMETIC_START, Self::ARITHMETIC_END)
    }

    #[inline]
    pub const fn is_logical(self) -> bool {
        self.in_range(Self::LOGIC_START, Self::LOGIC_END)
    }

    #[inline]
    pub const fn is_bitwise(self) -> bool {
        self.in_range(Self::BITWISE_START, Self::BITWISE_END)
    }

    /// The family this operator belongs to.
    ///
    /// `NoOp` sits before the first range and is reported as `Misc`.
    pub const fn category(self) -> OpCategory {
        if self.is_comparison() {
            OpCategory::Comparison
        } else if self.is_arithmetic() {
            OpCategory::Arithmetic
        } else if self.is_logical() {
            OpCategory::Logical
        } else if self.is_bitwise() {
            OpCategory::Bitwise
        } else {
            OpCategory::Misc
        }
    }

    /// Number of operands the operator consumes.
    pub const fn arity(self) -> usize {
        match self {
            OpKind::NoOp
            | OpKind::Parentheses
            | OpKind::UnaryPlus
            | OpKind::UnaryMinus
            | OpKind::LogicalNot
            | OpKind::BitwiseNot => 1,
            OpKind::Ternary => 3,
            _ => 2,
        }
    }

    #[inline]
    pub const fn is_unary(self) -> bool {
        self.arity() == 1
    }

    /// Strict operators yield Error/Undefined as soon as any consumed operand
    /// is Error/Undefined. Meta-comparisons, `||`, `&&` and the ternary
    /// operator inspect exceptional operands themselves.
    pub const fn is_strict(self) -> bool {
        !matches!(
            self,
            OpKind::MetaEqual
                | OpKind::MetaNotEqual
                | OpKind::LogicalOr
                | OpKind::LogicalAnd
                | OpKind::Ternary
        )
    }

    /// Source-level symbol, used by the unparser.
    pub const fn symbol(self) -> &'static str {
        match self {
            OpKind::NoOp => "",
            OpKind::LessThan => "<",
            OpKind::LessOrEqual => "<=",
            OpKind::NotEqual => "!=",
            OpKind::Equal => "==",
            OpKind::MetaEqual => "=?=",
            OpKind::MetaNotEqual => "=!=",
            OpKind::GreaterOrEqual => ">=",
            OpKind::GreaterThan => ">",
            OpKind::UnaryPlus | OpKind::Addition => "+",
            OpKind::UnaryMinus | OpKind::Subtraction => "-",
            OpKind::Multiplication => "*",
            OpKind::Division => "/",
            OpKind::Modulus => "%",
            OpKind::LogicalNot => "!",
            OpKind::LogicalOr => "||",
            OpKind::LogicalAnd => "&&",
            OpKind::BitwiseNot => "~",
            OpKind::BitwiseOr => "|",
            OpKind::BitwiseXor => "^",
            OpKind::BitwiseAnd => "&",
            OpKind::LeftShift => "<<",
            OpKind::RightShift => ">>",
            OpKind::UnsignedRightShift => ">>>",
            OpKind::Parentheses => "()",
            OpKind::Subscript => "[]",
            OpKind::Ternary => "?:",
            OpKind::Elvis => "?:",
        }
    }

    /// Binding strength; higher binds tighter. Operators that never appear
    /// infix report -1.
    ///
    /// - 12: subscript
    /// - 11: unary `! ~ + -`
    /// - 10: `* / %`
    /// - 9: `+ -`
    /// - 8: `<< >> >>>`
    /// - 7: `< <= >= >`
    /// - 6: `== != =?= =!=`
    /// - 5: `&`
    /// - 4: `^`
    /// - 3: `|`
    /// - 2: `&&`
    /// - 1: `||`
    /// - 0: `?:` (ternary and Elvis)
    pub const fn precedence(self) -> i8 {
        match self {
            OpKind::Subscript => 12,
            OpKind::LogicalNot | OpKind::BitwiseNot | OpKind::UnaryPlus | OpKind::UnaryMinus => 11,
            OpKind::Multiplication | OpKind::Division | OpKind::Modulus => 10,
            OpKind::Addition | OpKind::Subtraction => 9,
            OpKind::LeftShift | OpKind::RightShift | OpKind::UnsignedRightShift => 8,
            OpKind::LessThan
            | OpKind::LessOrEqual
            | OpKind::GreaterOrEqual
            | OpKind::GreaterThan => 7,
            OpKind::NotEqual | OpKind::Equal | OpKind::MetaEqual | OpKind::MetaNotEqual => 6,
            OpKind::BitwiseAnd => 5,
            OpKind::BitwiseXor => 4,
            OpKind::BitwiseOr => 3,
            OpKind::LogicalAnd => 2,
            OpKind::LogicalOr => 1,
            OpKind::Ternary | OpKind::Elvis => 0,
            OpKind::NoOp | OpKind::Parentheses => -1,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
