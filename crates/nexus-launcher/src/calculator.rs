//! Calculator app state

/// Four-function calculator with a single display line.
///
/// Digits append to the display; after `=` the next digit starts over.
#[derive(Debug, Clone)]
pub struct Calculator {
    display: String,
    reset: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            reset: false,
        }
    }
}

impl Calculator {
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Press a button: a digit, an operator, `C` or `=`
    pub fn press(&mut self, key: char) {
        match key {
            'C' | 'c' => *self = Self::default(),
            '=' => {
                self.display = match evaluate(&self.display) {
                    Some(value) => format_number(value),
                    None => "Error".to_string(),
                };
                self.reset = true;
            }
            _ => {
                if self.display == "0" || self.reset {
                    self.display = key.to_string();
                    self.reset = false;
                } else {
                    self.display.push(key);
                }
            }
        }
    }
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        // No negative zero on the display
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Evaluate `+ - * / x` with the usual precedence. `None` on malformed
/// input or a non-finite result.
pub fn evaluate(expr: &str) -> Option<f64> {
    let tokens = tokenize(expr)?;
    let mut pos = 0;
    let value = parse_sum(&tokens, &mut pos)?;
    if pos != tokens.len() || !value.is_finite() {
        return None;
    }
    Some(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
}

fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut number = String::new();

    for c in expr.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            '+' | '-' | '*' | '/' | 'x' => {
                if !number.is_empty() {
                    tokens.push(Token::Number(number.parse().ok()?));
                    number.clear();
                }
                tokens.push(Token::Op(if c == 'x' { '*' } else { c }));
            }
            c if c.is_whitespace() => {}
            _ => return None,
        }
    }
    if !number.is_empty() {
        tokens.push(Token::Number(number.parse().ok()?));
    }
    Some(tokens)
}

fn parse_sum(tokens: &[Token], pos: &mut usize) -> Option<f64> {
    let mut value = parse_product(tokens, pos)?;
    while let Some(Token::Op(op @ ('+' | '-'))) = tokens.get(*pos) {
        *pos += 1;
        let rhs = parse_product(tokens, pos)?;
        value = if *op == '+' { value + rhs } else { value - rhs };
    }
    Some(value)
}

fn parse_product(tokens: &[Token], pos: &mut usize) -> Option<f64> {
    let mut value = parse_unary(tokens, pos)?;
    while let Some(Token::Op(op @ ('*' | '/'))) = tokens.get(*pos) {
        *pos += 1;
        let rhs = parse_unary(tokens, pos)?;
        value = if *op == '*' { value * rhs } else { value / rhs };
    }
    Some(value)
}

fn parse_unary(tokens: &[Token], pos: &mut usize) -> Option<f64> {
    match tokens.get(*pos)? {
        Token::Op('-') => {
            *pos += 1;
            Some(-parse_unary(tokens, pos)?)
        }
        Token::Op('+') => {
            *pos += 1;
            parse_unary(tokens, pos)
        }
        Token::Number(n) => {
            *pos += 1;
            Some(*n)
        }
        Token::Op(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(keys: &str) -> String {
        let mut calc = Calculator::default();
        for key in keys.chars() {
            calc.press(key);
        }
        calc.display().to_string()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2+3x4"), Some(14.0));
        assert_eq!(evaluate("8/2-1"), Some(3.0));
        assert_eq!(evaluate("-3+5"), Some(2.0));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(evaluate("2+"), None);
        assert_eq!(evaluate("x3"), None);
        assert_eq!(evaluate("1/0"), None);
        assert_eq!(evaluate("1..2"), None);
    }

    #[test]
    fn test_display_flow() {
        assert_eq!(run("12+30="), "42");
        assert_eq!(run("7/2="), "3.5");
        assert_eq!(run("9/0="), "Error");
        // A digit after a result starts a fresh entry
        assert_eq!(run("1+1=5"), "5");
        assert_eq!(run("123C"), "0");
        assert_eq!(run("05"), "5");
    }
}
