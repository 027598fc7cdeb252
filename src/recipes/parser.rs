//! Reader for `key = <literal>` recipe files
//!
//! Understands string literals (including triple-quoted and raw strings,
//! with implicit concatenation), integers, floats, booleans, `None`, lists,
//! tuples and dicts, `+` concatenation and `%` string interpolation. Bare
//! identifiers resolve to earlier assignments in the same file, then to the
//! known recipe constants; anything else is kept as the identifier itself.

use thiserror::Error;

use crate::schema::{try_resolve, ConstantRegistry, ParamValue, TemplateBindings};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct RecipeParseError {
    pub line: usize,
    pub message: String,
}

/// Parses recipe text into its assignments, in file order. A parameter
/// assigned twice keeps its first position and its last value.
pub fn parse_recipe(
    text: &str,
    constants: &ConstantRegistry,
) -> Result<Vec<(String, ParamValue)>, RecipeParseError> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
        constants,
        params: Vec::new(),
    };
    parser.parse_file()?;
    Ok(parser.params)
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    constants: &'a ConstantRegistry,
    params: Vec<(String, ParamValue)>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> RecipeParseError {
        let end = self.pos.min(self.chars.len());
        RecipeParseError {
            line: 1 + self.chars[..end].iter().filter(|c| **c == '\n').count(),
            message: message.into(),
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), RecipeParseError> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", wanted, c))),
            None => Err(self.error(format!("expected '{}', found end of file", wanted))),
        }
    }

    /// Skips blanks and comments; newlines too when inside brackets
    fn skip_trivia(&mut self, newlines: bool) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' => self.pos += 1,
                '\n' | '\r' if newlines => self.pos += 1,
                '\\' if matches!(self.peek_at(1), Some('\n')) => self.pos += 2,
                '#' => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn parse_file(&mut self) -> Result<(), RecipeParseError> {
        loop {
            self.skip_trivia(true);
            while self.peek() == Some(';') {
                self.pos += 1;
                self.skip_trivia(true);
            }
            if self.peek().is_none() {
                return Ok(());
            }

            let name = self.identifier()?;
            self.skip_trivia(false);
            self.expect('=')?;
            let value = self.expression(false)?;
            self.skip_trivia(false);
            match self.peek() {
                None | Some('\n') | Some('\r') | Some(';') => {}
                Some(c) => return Err(self.error(format!("unexpected '{}' after value of '{}'", c, name))),
            }

            match self.params.iter_mut().find(|(k, _)| *k == name) {
                Some((_, existing)) => *existing = value,
                None => self.params.push((name, value)),
            }
        }
    }

    fn identifier(&mut self) -> Result<String, RecipeParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || (c == '.' && self.pos > start) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start || self.chars[start].is_ascii_digit() {
            return Err(self.error("expected a parameter name"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn expression(&mut self, newlines: bool) -> Result<ParamValue, RecipeParseError> {
        let mut value = self.atom(newlines)?;
        loop {
            self.skip_trivia(newlines);
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    let rhs = self.atom(newlines)?;
                    value = self.concat(value, rhs)?;
                }
                Some('%') => {
                    self.pos += 1;
                    let rhs = self.atom(newlines)?;
                    value = interpolate(value, &rhs);
                }
                _ => return Ok(value),
            }
        }
    }

    fn concat(&self, lhs: ParamValue, rhs: ParamValue) -> Result<ParamValue, RecipeParseError> {
        match (lhs, rhs) {
            (ParamValue::Str(a), ParamValue::Str(b)) => Ok(ParamValue::Str(a + &b)),
            (ParamValue::Int(a), ParamValue::Int(b)) => Ok(ParamValue::Int(a + b)),
            (ParamValue::List(mut a), ParamValue::List(b)) => {
                a.extend(b);
                Ok(ParamValue::List(a))
            }
            (ParamValue::Tuple(mut a), ParamValue::Tuple(b)) => {
                a.extend(b);
                Ok(ParamValue::Tuple(a))
            }
            (a, b) => Err(self.error(format!(
                "cannot concatenate {} and {}",
                a.repr(),
                b.repr()
            ))),
        }
    }

    fn atom(&mut self, newlines: bool) -> Result<ParamValue, RecipeParseError> {
        self.skip_trivia(newlines);
        match self.peek() {
            Some('\'') | Some('"') => self.strings(false, newlines),
            Some('r') | Some('R') if matches!(self.peek_at(1), Some('\'') | Some('"')) => {
                self.pos += 1;
                self.strings(true, newlines)
            }
            Some('[') => {
                self.pos += 1;
                let (items, _) = self.sequence(']')?;
                Ok(ParamValue::List(items))
            }
            Some('(') => {
                self.pos += 1;
                let (mut items, trailing_comma) = self.sequence(')')?;
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(ParamValue::Tuple(items))
                }
            }
            Some('{') => {
                self.pos += 1;
                self.dict()
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => {
                let name = self.identifier()?;
                Ok(self.resolve_identifier(&name))
            }
            Some(c) => Err(self.error(format!("unexpected '{}'", c))),
            None => Err(self.error("unexpected end of file")),
        }
    }

    fn resolve_identifier(&self, name: &str) -> ParamValue {
        match name {
            "True" => return ParamValue::Bool(true),
            "False" => return ParamValue::Bool(false),
            "None" => return ParamValue::None,
            _ => {}
        }
        if let Some((_, value)) = self.params.iter().find(|(k, _)| k == name) {
            return value.clone();
        }
        match self.constants.get(name) {
            Some(constant) => constant.value.clone(),
            None => ParamValue::str(name),
        }
    }

    /// Items up to `close`; also reports whether the last item had a comma
    fn sequence(&mut self, close: char) -> Result<(Vec<ParamValue>, bool), RecipeParseError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_trivia(true);
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok((items, trailing_comma));
            }
            items.push(self.expression(true)?);
            self.skip_trivia(true);
            match self.bump() {
                Some(',') => trailing_comma = true,
                Some(c) if c == close => return Ok((items, false)),
                Some(c) => return Err(self.error(format!("expected ',' or '{}', found '{}'", close, c))),
                None => return Err(self.error(format!("unterminated sequence, expected '{}'", close))),
            }
        }
    }

    fn dict(&mut self) -> Result<ParamValue, RecipeParseError> {
        let mut entries: Vec<(String, ParamValue)> = Vec::new();
        loop {
            self.skip_trivia(true);
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(ParamValue::Dict(entries));
            }
            let key = self.expression(true)?.to_string();
            self.skip_trivia(true);
            self.expect(':')?;
            let value = self.expression(true)?;
            entries.retain(|(k, _)| *k != key);
            entries.push((key, value));
            self.skip_trivia(true);
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(ParamValue::Dict(entries)),
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{}'", c))),
                None => return Err(self.error("unterminated dict, expected '}'")),
            }
        }
    }

    fn number(&mut self) -> Result<ParamValue, RecipeParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => self.pos += 1,
                '.' | 'e' | 'E' => {
                    is_float = true;
                    self.pos += 1;
                }
                '+' | '-' if matches!(self.chars.get(self.pos - 1), Some('e') | Some('E')) => {
                    self.pos += 1
                }
                _ => break,
            }
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let parsed = if is_float {
            text.parse::<f64>().ok().map(ParamValue::Float)
        } else {
            text.parse::<i64>().ok().map(ParamValue::Int)
        };
        parsed.ok_or_else(|| self.error(format!("invalid number '{}'", text)))
    }

    /// One string literal followed by any adjacent ones
    fn strings(&mut self, raw: bool, newlines: bool) -> Result<ParamValue, RecipeParseError> {
        let mut out = self.string(raw)?;
        loop {
            let save = self.pos;
            self.skip_trivia(newlines);
            match self.peek() {
                Some('\'') | Some('"') => out.push_str(&self.string(false)?),
                Some('r') | Some('R') if matches!(self.peek_at(1), Some('\'') | Some('"')) => {
                    self.pos += 1;
                    out.push_str(&self.string(true)?);
                }
                _ => {
                    self.pos = save;
                    return Ok(ParamValue::Str(out));
                }
            }
        }
    }

    fn string(&mut self, raw: bool) -> Result<String, RecipeParseError> {
        let quote = self.bump().ok_or_else(|| self.error("expected a string"))?;
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let c = self
                .bump()
                .ok_or_else(|| self.error("unterminated string literal"))?;
            if c == quote {
                if !triple {
                    return Ok(out);
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    return Ok(out);
                }
                out.push(c);
            } else if c == '\n' && !triple {
                return Err(self.error("newline in string literal"));
            } else if c == '\\' {
                let escaped = self
                    .bump()
                    .ok_or_else(|| self.error("unterminated string literal"))?;
                if raw {
                    out.push('\\');
                    out.push(escaped);
                    continue;
                }
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    '\n' => {}
                    '\\' | '\'' | '"' => out.push(escaped),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            } else {
                out.push(c);
            }
        }
    }
}

/// `fmt % args` with `%s` positional or `%(name)s` named arguments; left
/// untouched when the arguments do not fit
fn interpolate(fmt: ParamValue, args: &ParamValue) -> ParamValue {
    let template = match &fmt {
        ParamValue::Str(s) => s,
        _ => return fmt,
    };

    if let ParamValue::Dict(entries) = args {
        let bindings: TemplateBindings = entries.iter().cloned().collect();
        return try_resolve(template, &bindings)
            .map(ParamValue::Str)
            .unwrap_or(fmt);
    }

    let positional: Vec<&ParamValue> = match args {
        ParamValue::Tuple(items) => items.iter().collect(),
        other => vec![other],
    };
    let mut out = String::with_capacity(template.len());
    let mut next = positional.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('s') | Some('d') => match next.next() {
                Some(value) => out.push_str(&value.to_string()),
                None => return fmt,
            },
            _ => return fmt,
        }
    }
    ParamValue::Str(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<(String, ParamValue)> {
        parse_recipe(text, &ConstantRegistry::with_defaults()).unwrap()
    }

    fn value(text: &str, key: &str) -> ParamValue {
        parse(text)
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .unwrap()
    }

    #[test]
    fn test_scalars() {
        let params = parse("name = 'Foo'\nversion = \"1.0\"\nparallel = 4\nfloat = 2.5\nflag = True\nnothing = None\n");
        assert_eq!(
            params,
            vec![
                ("name".to_string(), ParamValue::str("Foo")),
                ("version".to_string(), ParamValue::str("1.0")),
                ("parallel".to_string(), ParamValue::Int(4)),
                ("float".to_string(), ParamValue::Float(2.5)),
                ("flag".to_string(), ParamValue::Bool(true)),
                ("nothing".to_string(), ParamValue::None),
            ]
        );
    }

    #[test]
    fn test_multiline_containers_and_comments() {
        let text = "# a recipe\ndependencies = [\n    ('Python', '3.11.3'),  # runtime\n    ('zlib', '1.2.13', '', SYSTEM),\n]\n";
        let deps = value(text, "dependencies");
        assert_eq!(deps.items().len(), 2);
        assert_eq!(deps.items()[0].items()[0], ParamValue::str("Python"));
        assert_eq!(deps.items()[1].items()[3].get("name"), Some(&ParamValue::str("system")));
    }

    #[test]
    fn test_triple_quoted_description() {
        let text = "description = \"\"\"Line one\nline two\"\"\"\n";
        assert_eq!(value(text, "description"), ParamValue::str("Line one\nline two"));
    }

    #[test]
    fn test_dict_and_single_item_tuple() {
        let text = "toolchain = {'name': 'foss', 'version': '2023a'}\nsources = ('a.tar.gz',)\nparen = ('x')\n";
        let tc = value(text, "toolchain");
        assert_eq!(tc.get("version"), Some(&ParamValue::str("2023a")));
        assert_eq!(value(text, "sources"), ParamValue::Tuple(vec![ParamValue::str("a.tar.gz")]));
        assert_eq!(value(text, "paren"), ParamValue::str("x"));
    }

    #[test]
    fn test_identifiers_and_interpolation() {
        let text = "local_pyver = '3.11'\nversionsuffix = '-Python-%s' % local_pyver\nurls = [GITHUB_SOURCE]\nhomepage = 'https://x.org/' + 'foo'\n";
        assert_eq!(value(text, "versionsuffix"), ParamValue::str("-Python-3.11"));
        assert_eq!(value(text, "homepage"), ParamValue::str("https://x.org/foo"));
        assert_eq!(value(text, "urls"), ParamValue::List(vec![ParamValue::str("GITHUB_SOURCE")]));
    }

    #[test]
    fn test_implicit_string_concatenation() {
        let text = "description = (\n    \"first \"\n    'second'\n)\n";
        assert_eq!(value(text, "description"), ParamValue::str("first second"));
    }

    #[test]
    fn test_templates_stay_literal() {
        let text = "homepage = 'https://example.org/%(namelower)s'\n";
        assert_eq!(
            value(text, "homepage"),
            ParamValue::str("https://example.org/%(namelower)s")
        );
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse_recipe("name = 'Foo'\nversion = [1, 2\n", &ConstantRegistry::new()).unwrap_err();
        assert_eq!(err.line, 3);
        let err = parse_recipe("name 'Foo'\n", &ConstantRegistry::new()).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("'='"));
    }

    #[test]
    fn test_reassignment_keeps_last_value() {
        let params = parse("version = '1'\nname = 'x'\nversion = '2'\n");
        assert_eq!(params[0], ("version".to_string(), ParamValue::str("2")));
        assert_eq!(params.len(), 2);
    }
}
