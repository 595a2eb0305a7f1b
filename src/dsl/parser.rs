//! Parser for the netlist DSL.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::circuit::GridPoint;
use crate::error::{GridError, Result};

/// Parser for netlist DSL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    ///
    /// Fails if the very first token cannot be lexed.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<NetlistAst> {
        let mut ast = NetlistAst::new();

        while self.current.kind != TokenKind::Eof {
            // Skip empty lines
            if self.current.kind == TokenKind::Newline {
                self.advance()?;
                continue;
            }

            match self.current.kind {
                TokenKind::Directive => {
                    let wire = self.parse_directive()?;
                    ast.wires.push(wire);
                }
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(GridError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            self.end_of_line()?;
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(GridError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn end_of_line(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(GridError::parse(
                self.current.line,
                format!("trailing input: {:?}", self.current.text),
            )),
        }
    }

    fn parse_directive(&mut self) -> Result<WireDef> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".wire" => {
                let from = self.parse_point()?;
                let to = self.parse_point()?;
                Ok(WireDef { from, to, line })
            }
            _ => Err(GridError::parse(
                line,
                format!("unknown directive: {}", directive),
            )),
        }
    }

    /// `x,y` with integer coordinates.
    fn parse_point(&mut self) -> Result<GridPoint> {
        let x = self.parse_coordinate()?;
        self.expect(TokenKind::Comma)?;
        let y = self.parse_coordinate()?;
        Ok(GridPoint::new(x, y))
    }

    fn parse_coordinate(&mut self) -> Result<i32> {
        let tok = self.expect(TokenKind::Number)?;
        tok.text.parse::<i32>().map_err(|_| {
            GridError::parse(tok.line, format!("invalid coordinate: {}", tok.text))
        })
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let name = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let component_type = ComponentType::from_name(&name).ok_or_else(|| {
            GridError::invalid_component(&name, line, "unknown component type")
        })?;

        let terminals = [self.parse_point()?, self.parse_point()?];
        let mut value = None;
        let mut closed = None;

        match self.current.kind {
            TokenKind::Number if component_type.takes_value() => {
                let text = self.current.text.clone();
                self.advance()?;
                let v = parse_value(&text).ok_or_else(|| {
                    GridError::invalid_component(&name, line, format!("invalid number: {}", text))
                })?;
                value = Some(v);
            }
            TokenKind::Identifier if component_type == ComponentType::Switch => {
                let state = self.current.text.to_lowercase();
                closed = Some(match state.as_str() {
                    "closed" | "on" => true,
                    "open" | "off" => false,
                    _ => {
                        return Err(GridError::invalid_component(
                            &name,
                            line,
                            format!("unknown switch state: {}", self.current.text),
                        ));
                    }
                });
                self.advance()?;
            }
            _ => {}
        }

        Ok(ComponentDef {
            component_type,
            name,
            terminals,
            value,
            closed,
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    fn pt(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    #[test]
    fn test_parse_resistor() {
        let ast = parse("R1 0,0 0,4 10k").unwrap();
        assert_eq!(ast.components.len(), 1);
        let r = &ast.components[0];
        assert_eq!(r.component_type, ComponentType::Resistor);
        assert_eq!(r.name, "R1");
        assert_eq!(r.terminals, [pt(0, 0), pt(0, 4)]);
        assert_eq!(r.value, Some(10_000.0));
        assert_eq!(r.line, 1);
    }

    #[test]
    fn test_parse_wire_and_negative_points() {
        let ast = parse(".wire -2,0 3,-1\n.WIRE 0,0 0,1").unwrap();
        assert_eq!(ast.wires.len(), 2);
        assert_eq!(ast.wires[0].from, pt(-2, 0));
        assert_eq!(ast.wires[0].to, pt(3, -1));
        assert_eq!(ast.wires[1].line, 2);
    }

    #[test]
    fn test_parse_switch_states() {
        let ast = parse("SW1 0,0 1,0 open\nSW2 1,0 2,0 closed\nSW3 2,0 3,0").unwrap();
        let states: Vec<_> = ast.components.iter().map(|c| c.closed).collect();
        assert_eq!(states, vec![Some(false), Some(true), None]);
        assert!(ast.components.iter().all(|c| c.component_type == ComponentType::Switch));
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# battery loop\nB1 0,0 0,4 9 ; main supply\n\nL1 0,0 0,4\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.components.len(), 2);
        assert_eq!(ast.components[0].component_type, ComponentType::Battery);
        assert_eq!(ast.components[1].value, None);
        assert_eq!(ast.components[1].line, 4);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("R1 0,0 1"), Err(GridError::ParseError { line: 1, .. })));
        assert!(matches!(parse(".node a"), Err(GridError::ParseError { .. })));
        assert!(matches!(parse("R1 0,0 1,0 10 20"), Err(GridError::ParseError { .. })));
        assert!(matches!(parse("R1 0.5,0 1,0"), Err(GridError::ParseError { .. })));
        assert!(matches!(
            parse("Q1 0,0 1,0"),
            Err(GridError::InvalidComponent { line: 1, .. })
        ));
        assert!(matches!(
            parse("SW1 0,0 1,0 ajar"),
            Err(GridError::InvalidComponent { .. })
        ));
        assert!(matches!(parse("\n\nR1 @"), Err(GridError::LexerError { line: 3, .. })));
    }
}
