/// Binary operators understood by the converter and the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Plus,
    Minus,
    Mult,
    /// `/`
    Div,
    /// `:`, division spelled the other way.
    Ratio,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Op {
    pub fn from_symbol(c: char) -> Option<Self> {
        use Op::*;

        match c {
            '+' => Some(Plus),
            '-' => Some(Minus),
            '*' => Some(Mult),
            '/' => Some(Div),
            ':' => Some(Ratio),
            '^' => Some(Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        use Op::*;

        match self {
            Plus => '+',
            Minus => '-',
            Mult => '*',
            Div => '/',
            Ratio => ':',
            Pow => '^',
        }
    }

    pub fn precedence(self) -> u8 {
        use Op::*;

        match self {
            Plus | Minus => 1,
            Mult | Div | Ratio => 2,
            Pow => 3,
        }
    }

    pub fn associativity(self) -> Associativity {
        match self {
            Op::Pow => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Applies the operator to `a` (left) and `b` (right) with plain IEEE-754 semantics.
    ///
    /// Division by zero is not an error: it yields an infinity or NaN.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        use Op::*;

        match self {
            Plus => a + b,
            Minus => a - b,
            Mult => a * b,
            Div | Ratio => a / b,
            Pow => a.powf(b),
        }
    }
}

/// Closed set of unary functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Ln,
    Cos,
    Sin,
    Sqrt,
}

impl Builtin {
    /// Looks up a function by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        use Builtin::*;

        [Ln, Cos, Sin, Sqrt]
            .into_iter()
            .find(|builtin| builtin.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Ln => "ln",
            Builtin::Cos => "cos",
            Builtin::Sin => "sin",
            Builtin::Sqrt => "sqrt",
        }
    }

    /// Domain errors (negative `sqrt`, non-positive `ln`) come out as NaN or -inf.
    pub fn apply(self, a: f64) -> f64 {
        match self {
            Builtin::Ln => a.ln(),
            Builtin::Cos => a.cos(),
            Builtin::Sin => a.sin(),
            Builtin::Sqrt => a.sqrt(),
        }
    }
}
