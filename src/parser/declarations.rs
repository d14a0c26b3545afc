//! Declaration parsing implementation
//!
//! - Function definitions: `type name(params) { ... }`
//! - Prototypes: `type name(params);` (accepted and dropped)
//! - Variable declarations with several declarators: `int a = 1, b, s[20];`
//! - Type specifiers: `unsigned long`, `const double`, `char` + `[N]`
//!
//! # Grammar
//!
//! ```text
//! top_level    ::= type identifier ( function_rest | declarator_rest )
//! function_rest ::= "(" params ")" ( ";" | "{" statements "}" )
//! declaration  ::= type declarator ( "," declarator )* ";"
//! declarator   ::= identifier ( "[" int? "]" )? ( "=" expression )?
//! type         ::= ( "const" | type_keyword )+
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse one top-level item into `program`.
    pub(crate) fn parse_top_level(&mut self, program: &mut Program) -> Result<(), ParseError> {
        let loc = self.current_location();
        if self.match_token(&Token::Semicolon(loc)) {
            return Ok(());
        }

        let base_type = self.parse_type()?;
        let name = self.expect_identifier()?;
        let name_loc = self.previous_location();

        if self.match_token(&Token::LParen(self.current_location())) {
            let params = self.parse_parameter_list()?;
            self.expect_rparen("参数列表之后")?;

            if self.match_token(&Token::Semicolon(self.current_location())) {
                return Ok(());
            }

            self.expect_lbrace("函数体之前")?;
            let body = self.parse_block_statements()?;
            program.functions.push(FunctionDef {
                name,
                return_type: base_type,
                params,
                body,
                location: name_loc,
            });
            return Ok(());
        }

        let declarators = self.parse_declarators(&base_type, name, name_loc)?;
        program.globals.push(Stmt::Declaration {
            declarators,
            location: loc,
        });
        Ok(())
    }

    /// Parse parameter list: (type name, type name, ...)
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        // (void) means no parameters
        if self.check(&Token::Void(self.current_location()))
            && matches!(self.peek_ahead(1), Some(Token::RParen(_)))
        {
            self.advance();
            return Ok(params);
        }

        loop {
            let mut param_type = self.parse_type()?;
            // Prototypes may leave parameters unnamed
            let name = if let Token::Ident(name, _) = self.peek_token() {
                self.advance();
                name
            } else {
                format!("arg{}", params.len())
            };
            if self.match_token(&Token::LBracket(self.current_location())) {
                self.expect_token(&Token::RBracket(self.current_location()), "数组参数应为 ']'")?;
                param_type = param_type.with_array(None);
            }
            params.push(Param { name, param_type });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse a type specifier sequence such as `const unsigned int`.
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        let loc = self.current_location();
        let mut is_const = false;
        let mut keywords = Vec::new();

        while self.is_type_keyword() {
            match self.advance() {
                Token::Const(_) => is_const = true,
                other => keywords.push(other.clone()),
            }
        }

        if keywords.is_empty() {
            return Err(ParseError::new(
                format!("应为类型说明符，实际为 {}", self.peek()),
                loc,
            ));
        }

        let has = |matches: fn(&Token) -> bool| keywords.iter().any(matches);
        let base = if has(|t| matches!(t, Token::Void(_))) {
            BaseType::Void
        } else if has(|t| matches!(t, Token::Char(_))) {
            BaseType::Char
        } else if has(|t| matches!(t, Token::Float(_))) {
            BaseType::Float
        } else if has(|t| matches!(t, Token::Double(_))) {
            BaseType::Double
        } else if has(|t| matches!(t, Token::Short(_))) {
            BaseType::Short
        } else if has(|t| matches!(t, Token::Long(_))) {
            BaseType::Long
        } else if has(|t| matches!(t, Token::Unsigned(_))) {
            BaseType::Unsigned
        } else {
            BaseType::Int
        };

        let var_type = Type::new(base);
        Ok(if is_const { var_type.with_const() } else { var_type })
    }

    /// Parse a local declaration statement; the type has not been consumed.
    pub(crate) fn parse_variable_declaration(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        let base_type = self.parse_type()?;
        let name = self.expect_identifier()?;
        let name_loc = self.previous_location();
        let declarators = self.parse_declarators(&base_type, name, name_loc)?;

        Ok(Stmt::Declaration {
            declarators,
            location: loc,
        })
    }

    /// Parse the rest of a declarator list after the first name, through `;`.
    fn parse_declarators(
        &mut self,
        base_type: &Type,
        first_name: String,
        first_loc: SourceLocation,
    ) -> Result<Vec<Declarator>, ParseError> {
        let mut declarators = vec![self.parse_declarator_rest(base_type, first_name, first_loc)?];

        while self.match_token(&Token::Comma(self.current_location())) {
            let name = self.expect_identifier()?;
            let loc = self.previous_location();
            declarators.push(self.parse_declarator_rest(base_type, name, loc)?);
        }

        self.expect_semicolon("声明之后")?;
        Ok(declarators)
    }

    fn parse_declarator_rest(
        &mut self,
        base_type: &Type,
        name: String,
        location: SourceLocation,
    ) -> Result<Declarator, ParseError> {
        let mut var_type = base_type.clone();

        if self.match_token(&Token::LBracket(self.current_location())) {
            let size = match self.peek_token() {
                Token::IntLiteral(n, loc) => {
                    self.advance();
                    Some(usize::try_from(n).map_err(|_| ParseError::new("数组长度不能为负数", loc))?)
                }
                _ => None,
            };
            self.expect_token(&Token::RBracket(self.current_location()), "数组长度之后应为 ']'")?;
            var_type = var_type.with_array(size);
        }

        let init = if self.match_token(&Token::Eq(self.current_location())) {
            Some(self.parse_assignment()?)
        } else {
            None
        };

        Ok(Declarator {
            name,
            var_type,
            init,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    fn main_body(source: &str) -> Vec<Stmt> {
        parse_source(source).unwrap().main().unwrap().body.clone()
    }

    #[test]
    fn test_multiple_declarators() {
        let body = main_body("int main() { int a = 1, b, c = a + 2; }");
        match &body[0] {
            Stmt::Declaration { declarators, .. } => {
                assert_eq!(declarators.len(), 3);
                assert_eq!(declarators[1].name, "b");
                assert!(declarators[1].init.is_none());
                assert!(declarators[2].init.is_some());
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_type_specifiers() {
        let body = main_body(
            "int main() { unsigned int u; long long l; const double pi = 3.14; char name[20]; }",
        );
        let types: Vec<Type> = body
            .iter()
            .map(|s| match s {
                Stmt::Declaration { declarators, .. } => declarators[0].var_type.clone(),
                other => panic!("Expected declaration, got {:?}", other),
            })
            .collect();

        assert_eq!(types[0].base, BaseType::Unsigned);
        assert_eq!(types[1].base, BaseType::Long);
        assert_eq!(types[2].base, BaseType::Double);
        assert!(types[2].is_const);
        assert!(types[3].is_string());
        assert_eq!(types[3].array, Some(Some(20)));
    }

    #[test]
    fn test_void_parameter_list() {
        let program = parse_source("void greet(void) { }\nint main(void) { greet(); }").unwrap();
        assert!(program.functions[0].params.is_empty());
        assert_eq!(program.functions[0].return_type.base, BaseType::Void);
    }
}
