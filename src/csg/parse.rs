//! The textual scene language.
//!
//! Statements, in any order, each terminated by a semicolon:
//!
//! ```text
//! material <ident>;            # introduce a material
//! object <ident> = <expr>;     # bind an identifier to a CSG subtree
//! build <object> <material>;   # mark an object as top-level
//! ```
//!
//! Expressions are primitives (`sphere(r)`, `cube(s)`), boolean operators
//! (`unite`, `intersect`, `subtract`), transforms (`scale`, `rotate`,
//! `translate` and their single-axis forms) or references to previously
//! bound objects. Angles are radians; vector arguments are written
//! `{x, y, z}`. `#` starts a comment running to the end of the line.

use std::collections::HashMap;
use std::fmt;

use nalgebra::Vector3;

use super::{NodeId, Scene};
use crate::spatial::Real;
use crate::voxel::{Material, VOID};

/// Errors produced while reading a scene description.
///
/// A parse error means no scene: nothing is built from partial input.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: unexpected character {found:?}")]
    UnexpectedCharacter { found: char, line: u32 },
    #[error("line {line}: malformed number {text:?}")]
    MalformedNumber { text: String, line: u32 },
    #[error("line {line}: unexpected `{found}`, expected {expected}")]
    UnexpectedToken {
        found: Token,
        expected: &'static str,
        line: u32,
    },
    #[error("line {line}: unknown identifier {name:?}")]
    UnknownIdentifier { name: String, line: u32 },
    #[error("line {line}: {name:?} is already defined")]
    DuplicateDefinition { name: String, line: u32 },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
}

/// A lexed token. Keywords are not distinguished from identifiers here; the
/// parser decides from context.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(Real),
    Identifier(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Equals,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Identifier(s) => f.write_str(s),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::Comma => f.write_str(","),
            Token::Semicolon => f.write_str(";"),
            Token::Equals => f.write_str("="),
        }
    }
}

struct Lexer<'src> {
    chars: std::iter::Peekable<std::str::Chars<'src>>,
    line: u32,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    /// Skip whitespace and `#` comments.
    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '#' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_trivia();

        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match c {
            '(' => {
                self.bump();
                Token::LParen
            }
            ')' => {
                self.bump();
                Token::RParen
            }
            '{' => {
                self.bump();
                Token::LBrace
            }
            '}' => {
                self.bump();
                Token::RBrace
            }
            ',' => {
                self.bump();
                Token::Comma
            }
            ';' => {
                self.bump();
                Token::Semicolon
            }
            '=' => {
                self.bump();
                Token::Equals
            }
            '-' | '.' | '0'..='9' => self.number()?,
            c if c == '_' || c.is_ascii_alphabetic() => self.identifier(),
            other => {
                return Err(ParseError::UnexpectedCharacter {
                    found: other,
                    line: self.line,
                })
            }
        };

        Ok(Some(token))
    }

    fn number(&mut self) -> Result<Token, ParseError> {
        let line = self.line;
        let mut text = String::new();

        if self.chars.peek() == Some(&'-') {
            text.push('-');
            self.bump();
        }
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.bump();
            } else if c == 'e' || c == 'E' {
                text.push(c);
                self.bump();
                if matches!(self.chars.peek(), Some('+' | '-')) {
                    if let Some(sign) = self.bump() {
                        text.push(sign);
                    }
                }
            } else {
                break;
            }
        }

        text.parse::<Real>()
            .map(Token::Number)
            .map_err(|_| ParseError::MalformedNumber { text, line })
    }

    fn identifier(&mut self) -> Token {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '_' || c.is_ascii_alphanumeric() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Token::Identifier(text)
    }
}

/// Parse a scene description into a [Scene].
pub fn parse(source: &str) -> Result<Scene, ParseError> {
    Parser::new(source)?.run()
}

struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Option<Token>,
    scene: Scene,
    objects: HashMap<String, NodeId>,
    materials: HashMap<String, Material>,
    next_material: Material,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            scene: Scene::new(),
            objects: HashMap::new(),
            materials: HashMap::new(),
            // material ids start right above the reserved sentinels
            next_material: VOID + 1,
        })
    }

    fn run(mut self) -> Result<Scene, ParseError> {
        while self.current.is_some() {
            self.statement()?;
        }
        Ok(self.scene)
    }

    fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Consume the current token, which must exist.
    fn expect(&mut self, expected: &'static str) -> Result<Token, ParseError> {
        match self.advance()? {
            Some(token) => Ok(token),
            None => Err(ParseError::UnexpectedEof { expected }),
        }
    }

    fn expect_exact(&mut self, want: Token, expected: &'static str) -> Result<(), ParseError> {
        let line = self.lexer.line;
        let found = self.expect(expected)?;
        if found == want {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                found,
                expected,
                line,
            })
        }
    }

    fn expect_identifier(&mut self, expected: &'static str) -> Result<String, ParseError> {
        let line = self.lexer.line;
        match self.expect(expected)? {
            Token::Identifier(name) => Ok(name),
            found => Err(ParseError::UnexpectedToken {
                found,
                expected,
                line,
            }),
        }
    }

    fn expect_number(&mut self) -> Result<Real, ParseError> {
        let line = self.lexer.line;
        match self.expect("a number")? {
            Token::Number(value) => Ok(value),
            found => Err(ParseError::UnexpectedToken {
                found,
                expected: "a number",
                line,
            }),
        }
    }

    fn statement(&mut self) -> Result<(), ParseError> {
        let line = self.lexer.line;
        let keyword = self.expect_identifier("`material`, `object` or `build`")?;
        match keyword.as_str() {
            "material" => self.material_statement(),
            "object" => self.object_statement(),
            "build" => self.build_statement(),
            _ => Err(ParseError::UnexpectedToken {
                found: Token::Identifier(keyword),
                expected: "`material`, `object` or `build`",
                line,
            }),
        }
    }

    /// `material <ident>;` with ids assigned in declaration order.
    fn material_statement(&mut self) -> Result<(), ParseError> {
        let line = self.lexer.line;
        let name = self.expect_identifier("a material name")?;
        if self.materials.contains_key(&name) {
            return Err(ParseError::DuplicateDefinition { name, line });
        }
        self.materials.insert(name, self.next_material);
        self.next_material += 1;
        self.expect_exact(Token::Semicolon, "`;`")
    }

    /// `object <ident> = <expr>;`
    fn object_statement(&mut self) -> Result<(), ParseError> {
        let line = self.lexer.line;
        let name = self.expect_identifier("an object name")?;
        if self.objects.contains_key(&name) {
            return Err(ParseError::DuplicateDefinition { name, line });
        }
        self.expect_exact(Token::Equals, "`=`")?;
        let node = self.expression()?;
        self.objects.insert(name, node);
        self.expect_exact(Token::Semicolon, "`;`")
    }

    /// `build <object> <material>;`
    fn build_statement(&mut self) -> Result<(), ParseError> {
        let line = self.lexer.line;
        let object = self.expect_identifier("an object name")?;
        let node = *self
            .objects
            .get(&object)
            .ok_or(ParseError::UnknownIdentifier { name: object, line })?;

        let line = self.lexer.line;
        let material = self.expect_identifier("a material name")?;
        let material = *self
            .materials
            .get(&material)
            .ok_or(ParseError::UnknownIdentifier { name: material, line })?;

        self.scene.toplevel(node, material);
        self.expect_exact(Token::Semicolon, "`;`")
    }

    fn expression(&mut self) -> Result<NodeId, ParseError> {
        let line = self.lexer.line;
        let name = self.expect_identifier("an expression")?;

        match name.as_str() {
            "sphere" => {
                let radius = self.unary_number()?;
                Ok(self.scene.sphere(radius))
            }
            "cube" => {
                let side = self.unary_number()?;
                Ok(self.scene.cube(side))
            }
            "unite" => {
                let (left, right) = self.binary_operands()?;
                Ok(self.scene.unite(left, right))
            }
            "intersect" => {
                let (left, right) = self.binary_operands()?;
                Ok(self.scene.intersect(left, right))
            }
            "subtract" => {
                let (left, right) = self.binary_operands()?;
                Ok(self.scene.subtract(left, right))
            }
            "scale" => {
                // scalar or {x, y, z} first argument
                self.expect_exact(Token::LParen, "`(`")?;
                let factors = if matches!(self.current, Some(Token::LBrace)) {
                    self.vector()?
                } else {
                    Vector3::repeat(self.expect_number()?)
                };
                self.expect_exact(Token::Comma, "`,`")?;
                let child = self.expression()?;
                self.expect_exact(Token::RParen, "`)`")?;
                Ok(self.scene.scale(factors, child))
            }
            "xscale" => self.axis_transform(Scene::xscale),
            "yscale" => self.axis_transform(Scene::yscale),
            "zscale" => self.axis_transform(Scene::zscale),
            "rotate" => {
                self.expect_exact(Token::LParen, "`(`")?;
                let angle = self.expect_number()?;
                self.expect_exact(Token::Comma, "`,`")?;
                let axis = self.vector()?;
                self.expect_exact(Token::Comma, "`,`")?;
                let child = self.expression()?;
                self.expect_exact(Token::RParen, "`)`")?;
                Ok(self.scene.rotate(angle, axis, child))
            }
            "xrotate" => self.axis_transform(Scene::xrotate),
            "yrotate" => self.axis_transform(Scene::yrotate),
            "zrotate" => self.axis_transform(Scene::zrotate),
            "translate" => {
                self.expect_exact(Token::LParen, "`(`")?;
                let offset = self.vector()?;
                self.expect_exact(Token::Comma, "`,`")?;
                let child = self.expression()?;
                self.expect_exact(Token::RParen, "`)`")?;
                Ok(self.scene.translate(offset, child))
            }
            "xtranslate" => self.axis_transform(Scene::xtranslate),
            "ytranslate" => self.axis_transform(Scene::ytranslate),
            "ztranslate" => self.axis_transform(Scene::ztranslate),
            _ => self
                .objects
                .get(&name)
                .copied()
                .ok_or(ParseError::UnknownIdentifier { name, line }),
        }
    }

    /// `( <number> )`
    fn unary_number(&mut self) -> Result<Real, ParseError> {
        self.expect_exact(Token::LParen, "`(`")?;
        let value = self.expect_number()?;
        self.expect_exact(Token::RParen, "`)`")?;
        Ok(value)
    }

    /// `( <expr> , <expr> )`
    fn binary_operands(&mut self) -> Result<(NodeId, NodeId), ParseError> {
        self.expect_exact(Token::LParen, "`(`")?;
        let left = self.expression()?;
        self.expect_exact(Token::Comma, "`,`")?;
        let right = self.expression()?;
        self.expect_exact(Token::RParen, "`)`")?;
        Ok((left, right))
    }

    /// `( <number> , <expr> )` applied through one of the single-axis
    /// transform factories.
    fn axis_transform(
        &mut self,
        apply: fn(&mut Scene, Real, NodeId) -> NodeId,
    ) -> Result<NodeId, ParseError> {
        self.expect_exact(Token::LParen, "`(`")?;
        let value = self.expect_number()?;
        self.expect_exact(Token::Comma, "`,`")?;
        let child = self.expression()?;
        self.expect_exact(Token::RParen, "`)`")?;
        Ok(apply(&mut self.scene, value, child))
    }

    /// `{ <number> , <number> , <number> }`
    fn vector(&mut self) -> Result<Vector3<Real>, ParseError> {
        self.expect_exact(Token::LBrace, "`{`")?;
        let x = self.expect_number()?;
        self.expect_exact(Token::Comma, "`,`")?;
        let y = self.expect_number()?;
        self.expect_exact(Token::Comma, "`,`")?;
        let z = self.expect_number()?;
        self.expect_exact(Token::RBrace, "`}`")?;
        Ok(Vector3::new(x, y, z))
    }
}
