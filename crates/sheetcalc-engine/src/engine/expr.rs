//! Arithmetic and comparison expressions.
//!
//! A bounded grammar over numbers, `+ - * /`, parentheses and the comparisons
//! `< > <= >= = <>`. Cell references have already been replaced by numbers by
//! the time text reaches this module; anything else (names, strings, `:`)
//! is rejected.
//!
//! ```text
//! comparison := additive ( cmp-op additive )?
//! additive   := term ( ( "+" | "-" ) term )*
//! term       := unary ( ( "*" | "/" ) unary )*
//! unary      := ( "+" | "-" ) unary | primary
//! primary    := NUMBER | "(" comparison ")"
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use super::error::EvalError;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl Op {
    fn is_comparison(self) -> bool {
        matches!(self, Op::Lt | Op::Gt | Op::Le | Op::Ge | Op::Eq | Op::Ne)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(Op),
    OpenParen,
    CloseParen,
}

struct Tokenizer<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, EvalError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, EvalError> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some((pos, c)) = self.chars.next() else {
            return Ok(None);
        };
        let token = match c {
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '+' => Token::Op(Op::Add),
            '-' => Token::Op(Op::Sub),
            '*' => Token::Op(Op::Mul),
            '/' => Token::Op(Op::Div),
            '=' => Token::Op(Op::Eq),
            '<' => {
                if self.chars.next_if(|(_, c)| *c == '=').is_some() {
                    Token::Op(Op::Le)
                } else if self.chars.next_if(|(_, c)| *c == '>').is_some() {
                    Token::Op(Op::Ne)
                } else {
                    Token::Op(Op::Lt)
                }
            }
            '>' => {
                if self.chars.next_if(|(_, c)| *c == '=').is_some() {
                    Token::Op(Op::Ge)
                } else {
                    Token::Op(Op::Gt)
                }
            }
            c if c.is_ascii_digit() || c == '.' => self.read_number(pos)?,
            c => {
                return Err(EvalError::MalformedExpression(format!(
                    "unexpected character '{}' at {}",
                    c, pos
                )));
            }
        };
        Ok(Some(token))
    }

    /// Read a number (integer, decimal, or scientific notation) starting at `start`.
    fn read_number(&mut self, start: usize) -> Result<Token, EvalError> {
        let mut end = start + 1;
        while let Some((i, c)) = self.chars.next_if(|(_, c)| c.is_ascii_digit() || *c == '.') {
            end = i + c.len_utf8();
        }
        if let Some((i, c)) = self.chars.next_if(|(_, c)| *c == 'e' || *c == 'E') {
            end = i + c.len_utf8();
            if let Some((i, c)) = self.chars.next_if(|(_, c)| *c == '+' || *c == '-') {
                end = i + c.len_utf8();
            }
            while let Some((i, c)) = self.chars.next_if(|(_, c)| c.is_ascii_digit()) {
                end = i + c.len_utf8();
            }
        }

        let literal = &self.text[start..end];
        literal.parse::<f64>().map(Token::Number).map_err(|_| {
            EvalError::MalformedExpression(format!("invalid number '{}'", literal))
        })
    }
}

/// Intermediate result: comparisons yield booleans, which count as 1/0 when
/// they feed arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operand {
    Number(f64),
    Bool(bool),
}

impl Operand {
    fn number(self) -> f64 {
        match self {
            Operand::Number(n) => n,
            Operand::Bool(b) => f64::from(u8::from(b)),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn match_op(&mut self, ops: &[Op]) -> Option<Op> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(&op) => {
                self.position += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn comparison(&mut self) -> Result<Operand, EvalError> {
        let left = self.additive()?;
        let Some(op) = self.match_op(&[Op::Lt, Op::Gt, Op::Le, Op::Ge, Op::Eq, Op::Ne]) else {
            return Ok(left);
        };
        let right = self.additive()?;
        if let Some(Token::Op(next)) = self.peek()
            && next.is_comparison()
        {
            return Err(EvalError::MalformedExpression(
                "chained comparison".to_string(),
            ));
        }

        let (l, r) = (left.number(), right.number());
        Ok(Operand::Bool(match op {
            Op::Lt => l < r,
            Op::Gt => l > r,
            Op::Le => l <= r,
            Op::Ge => l >= r,
            Op::Eq => l == r,
            _ => l != r,
        }))
    }

    fn additive(&mut self) -> Result<Operand, EvalError> {
        let mut left = self.term()?;
        while let Some(op) = self.match_op(&[Op::Add, Op::Sub]) {
            let right = self.term()?;
            left = Operand::Number(match op {
                Op::Add => left.number() + right.number(),
                _ => left.number() - right.number(),
            });
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Operand, EvalError> {
        let mut left = self.unary()?;
        while let Some(op) = self.match_op(&[Op::Mul, Op::Div]) {
            let right = self.unary()?.number();
            left = Operand::Number(match op {
                Op::Mul => left.number() * right,
                _ if right == 0.0 => return Err(EvalError::DivisionByZero),
                _ => left.number() / right,
            });
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Operand, EvalError> {
        match self.match_op(&[Op::Add, Op::Sub]) {
            Some(Op::Sub) => Ok(Operand::Number(-self.unary()?.number())),
            Some(_) => Ok(Operand::Number(self.unary()?.number())),
            None => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Operand, EvalError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Operand::Number(n)),
            Some(Token::OpenParen) => {
                let inner = self.comparison()?;
                match self.advance() {
                    Some(Token::CloseParen) => Ok(inner),
                    _ => Err(EvalError::MalformedExpression("expected ')'".to_string())),
                }
            }
            Some(token) => Err(EvalError::MalformedExpression(format!(
                "unexpected token {:?}",
                token
            ))),
            None => Err(EvalError::MalformedExpression(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

/// Evaluate an arithmetic/comparison expression to a number or boolean.
pub(crate) fn evaluate(text: &str) -> Result<Value, EvalError> {
    let tokens = Tokenizer::new(text).tokenize()?;
    let mut parser = Parser {
        tokens,
        position: 0,
    };
    let result = parser.comparison()?;
    if let Some(token) = parser.peek() {
        return Err(EvalError::MalformedExpression(format!(
            "unexpected token {:?} after expression",
            token
        )));
    }
    Ok(match result {
        Operand::Number(n) => Value::Number(n),
        Operand::Bool(b) => Value::Bool(b),
    })
}
