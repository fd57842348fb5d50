//! Import and export declarations.

use super::parser::Parser;
use crate::{ParseError, Result};
use crate::ast::*;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    /// Parses `import ... from "m"` or `import "m"`.
    pub(super) fn parse_import_declaration(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Import)?;

        let mut specifiers = Vec::new();

        if !matches!(self.current.kind, TokenKind::String(_)) {
            let mut needs_more = true;

            if self.is_identifier() {
                let local = self.expect_identifier()?;
                specifiers.push(ImportSpecifier::Default { local });
                needs_more = self.eat(&TokenKind::Comma);
            }

            if needs_more {
                if self.eat(&TokenKind::Star) {
                    self.expect_contextual("as")?;
                    let local = self.expect_identifier()?;
                    specifiers.push(ImportSpecifier::Namespace { local });
                } else {
                    self.parse_named_imports(&mut specifiers)?;
                }
            }

            self.expect_contextual("from")?;
        }

        let source = self.parse_module_specifier()?;
        self.skip_import_attributes()?;
        self.consume_semicolon()?;

        Ok(Statement::Import(ImportDeclaration {
            specifiers,
            source,
            span: self.span_from(start),
        }))
    }

    fn parse_named_imports(&mut self, specifiers: &mut Vec<ImportSpecifier>) -> Result<()> {
        self.expect(&TokenKind::LeftBrace)?;

        while !self.check(&TokenKind::RightBrace) {
            let is_string = matches!(self.current.kind, TokenKind::String(_));
            let imported = self.parse_module_export_name()?;

            let local = if self.check_identifier("as") {
                self.advance();
                self.expect_identifier()?
            } else if is_string {
                return Err(self.error("A string import name must be aliased with 'as'"));
            } else {
                imported.clone()
            };

            specifiers.push(ImportSpecifier::Named { imported, local });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RightBrace)
    }

    /// Parses an export declaration of any form.
    pub(super) fn parse_export_declaration(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Export)?;

        match &self.current.kind {
            TokenKind::Star => {
                self.advance();
                let exported = if self.check_identifier("as") {
                    self.advance();
                    Some(self.parse_module_export_name()?)
                } else {
                    None
                };
                self.expect_contextual("from")?;
                let source = self.parse_module_specifier()?;
                self.skip_import_attributes()?;
                self.consume_semicolon()?;

                Ok(Statement::ExportAll(ExportAllDeclaration {
                    exported,
                    source,
                    span: self.span_from(start),
                }))
            }
            TokenKind::Default => {
                let default_keyword = self.current.span;
                self.advance();
                let declaration = self.parse_export_default_declaration()?;
                Ok(Statement::ExportDefault(ExportDefaultDeclaration {
                    declaration,
                    default_keyword,
                    span: self.span_from(start),
                }))
            }
            TokenKind::LeftBrace => {
                let specifiers = self.parse_export_specifiers()?;
                let source = if self.check_identifier("from") {
                    self.advance();
                    let source = self.parse_module_specifier()?;
                    self.skip_import_attributes()?;
                    Some(source)
                } else {
                    None
                };
                self.consume_semicolon()?;

                Ok(Statement::ExportNamed(ExportNamedDeclaration {
                    declaration: None,
                    specifiers,
                    source,
                    span: self.span_from(start),
                }))
            }
            _ => {
                let declaration = self.parse_statement()?;
                if !matches!(
                    declaration,
                    Statement::VariableDeclaration(_)
                        | Statement::FunctionDeclaration(_)
                        | Statement::ClassDeclaration(_)
                ) {
                    return Err(ParseError::new(
                        "Unexpected statement after 'export'",
                        declaration.span().start,
                        self.source,
                    ));
                }

                Ok(Statement::ExportNamed(ExportNamedDeclaration {
                    declaration: Some(Box::new(declaration)),
                    specifiers: Vec::new(),
                    source: None,
                    span: self.span_from(start),
                }))
            }
        }
    }

    fn parse_export_default_declaration(&mut self) -> Result<DefaultDeclaration> {
        let start = self.current.span.start;

        match &self.current.kind {
            TokenKind::Function => Ok(DefaultDeclaration::Function(
                self.parse_function(start, false, true)?,
            )),
            TokenKind::Async if self.is_async_function() => {
                self.advance(); // consume 'async'
                Ok(DefaultDeclaration::Function(
                    self.parse_function(start, true, true)?,
                ))
            }
            TokenKind::Class => Ok(DefaultDeclaration::Class(self.parse_class(false)?)),
            _ => {
                let expression = self.with_in(|parser| parser.parse_assignment())?;
                self.consume_semicolon()?;
                Ok(DefaultDeclaration::Expression(expression))
            }
        }
    }

    fn parse_export_specifiers(&mut self) -> Result<Vec<ExportSpecifier>> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut specifiers = Vec::new();

        while !self.check(&TokenKind::RightBrace) {
            let start = self.current.span.start;
            let local = self.parse_module_export_name()?;
            let exported = if self.check_identifier("as") {
                self.advance();
                self.parse_module_export_name()?
            } else {
                local.clone()
            };

            specifiers.push(ExportSpecifier {
                local,
                exported,
                span: self.span_from(start),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(specifiers)
    }

    /// An IdentifierName or a string literal naming an export.
    fn parse_module_export_name(&mut self) -> Result<Identifier> {
        if let TokenKind::String(value) = &self.current.kind {
            let id = Identifier::new(value.clone(), self.current.span);
            self.advance();
            return Ok(id);
        }
        self.expect_identifier_name()
    }

    fn parse_module_specifier(&mut self) -> Result<StringLiteral> {
        let TokenKind::String(value) = &self.current.kind else {
            return Err(self.error(format!(
                "Expected module specifier, found {:?}",
                self.current.kind
            )));
        };
        let literal = StringLiteral {
            value: value.clone(),
            span: self.current.span,
        };
        self.advance();
        Ok(literal)
    }

    /// Skips `with { type: "json" }` (or the older `assert { ... }`).
    fn skip_import_attributes(&mut self) -> Result<()> {
        let is_attributes = self.check(&TokenKind::With)
            || (self.check_identifier("assert") && !self.current.newline_before);
        if is_attributes {
            self.advance();
            self.parse_object_literal()?;
        }
        Ok(())
    }

    fn expect_contextual(&mut self, word: &str) -> Result<()> {
        if self.check_identifier(word) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!(
                "Expected '{word}', found {:?}",
                self.current.kind
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::Parser;

    fn parse_first(src: &str) -> Statement {
        let mut parser = Parser::new(src);
        let program = parser.parse_program().unwrap();
        program.body.into_iter().next().unwrap()
    }

    #[test]
    fn test_import_forms() {
        let Statement::Import(import) = parse_first("import a, { b as c, default as d, e } from 'm';")
        else {
            panic!("expected import");
        };
        assert_eq!(import.source.value, "m");
        let locals: Vec<&str> = import
            .specifiers
            .iter()
            .map(|specifier| specifier.local().name.as_str())
            .collect();
        assert_eq!(locals, vec!["a", "c", "d", "e"]);
        let imported: Vec<&str> = import
            .specifiers
            .iter()
            .map(ImportSpecifier::imported_name)
            .collect();
        assert_eq!(imported, vec!["default", "b", "default", "e"]);
    }

    #[test]
    fn test_import_namespace_and_bare() {
        let Statement::Import(import) = parse_first("import a, * as ns from \"m\"") else {
            panic!("expected import");
        };
        assert!(matches!(
            import.specifiers[1],
            ImportSpecifier::Namespace { .. }
        ));

        let Statement::Import(bare) = parse_first("import\"a\"") else {
            panic!("expected import");
        };
        assert!(bare.specifiers.is_empty());
        assert_eq!(bare.span.end, 9);
    }

    #[test]
    fn test_import_string_name_requires_alias() {
        let mut parser = Parser::new("import { 'a-b' } from 'm'");
        assert!(parser.parse_program().is_err());
        let mut parser = Parser::new("import { 'a-b' as ab } from 'm'");
        assert!(parser.parse_program().is_ok());
    }

    #[test]
    fn test_import_attributes_are_skipped() {
        let Statement::Import(import) = parse_first("import data from './d.json' with { type: 'json' };")
        else {
            panic!("expected import");
        };
        assert_eq!(import.source.value, "./d.json");
    }

    #[test]
    fn test_export_declarations() {
        let Statement::ExportNamed(export) = parse_first("export const a = 1, { b } = c;") else {
            panic!("expected export");
        };
        assert_eq!(export.declared_names(), vec!["a", "b"]);

        let Statement::ExportNamed(export) = parse_first("export class K {}") else {
            panic!("expected export");
        };
        assert_eq!(export.declared_names(), vec!["K"]);

        let Statement::ExportNamed(export) = parse_first("export async function f() {}") else {
            panic!("expected export");
        };
        assert_eq!(export.declared_names(), vec!["f"]);
    }

    #[test]
    fn test_export_specifiers_and_reexports() {
        let Statement::ExportNamed(export) = parse_first("export { a as b, c, d as default } from 'm'")
        else {
            panic!("expected export");
        };
        assert_eq!(export.specifiers.len(), 3);
        assert_eq!(export.specifiers[2].exported.name, "default");
        assert!(export.source.is_some());

        assert!(matches!(
            parse_first("export * from 'm'"),
            Statement::ExportAll(ExportAllDeclaration { exported: None, .. })
        ));
        assert!(matches!(
            parse_first("export * as ns from 'm'"),
            Statement::ExportAll(ExportAllDeclaration {
                exported: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn test_export_default_forms() {
        assert!(matches!(
            parse_first("export default function () {}"),
            Statement::ExportDefault(ExportDefaultDeclaration {
                declaration: DefaultDeclaration::Function(Function { id: None, .. }),
                ..
            })
        ));
        assert!(matches!(
            parse_first("export default async function named() {}"),
            Statement::ExportDefault(ExportDefaultDeclaration {
                declaration: DefaultDeclaration::Function(Function { is_async: true, .. }),
                ..
            })
        ));
        assert!(matches!(
            parse_first("export default class {}"),
            Statement::ExportDefault(ExportDefaultDeclaration {
                declaration: DefaultDeclaration::Class(_),
                ..
            })
        ));
        assert!(matches!(
            parse_first("export default a + b"),
            Statement::ExportDefault(ExportDefaultDeclaration {
                declaration: DefaultDeclaration::Expression(Expression::Binary(_)),
                ..
            })
        ));
    }

    #[test]
    fn test_export_requires_declaration() {
        let mut parser = Parser::new("export foo();");
        assert!(parser.parse_program().is_err());
    }

    #[test]
    fn test_import_call_statement_is_expression() {
        assert!(matches!(parse_first("import('a').then(f)"), Statement::Expression(_)));
        assert!(matches!(parse_first("import.meta.url"), Statement::Expression(_)));
    }
}
