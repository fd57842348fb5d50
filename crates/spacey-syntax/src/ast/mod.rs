//! Abstract Syntax Tree (AST) definitions for JavaScript.
//!
//! These structures are designed to be ESTree-compatible where possible.
//! Every node carries the byte [`Span`] it was parsed from so that tools
//! can edit the original text in place.

pub use crate::lexer::Span;

mod pattern;

pub use pattern::*;

/// A complete JavaScript program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Statement>,
    /// Span of a leading `#!` line
    pub shebang: Option<Span>,
    /// The whole source
    pub span: Span,
}

impl Program {
    /// The directive prologue, in source order.
    pub fn directives(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .map_while(|statement| match statement {
                Statement::Expression(ExpressionStatement {
                    directive: Some(directive),
                    ..
                }) => Some(directive.as_str()),
                _ => None,
            })
    }

    /// Whether the program contains an import or export declaration.
    pub fn has_module_syntax(&self) -> bool {
        self.body.iter().any(Statement::is_module_declaration)
    }

    /// The first statement after the directive prologue.
    pub fn first_non_directive(&self) -> Option<&Statement> {
        self.body.iter().find(|statement| {
            !matches!(
                statement,
                Statement::Expression(ExpressionStatement {
                    directive: Some(_),
                    ..
                })
            )
        })
    }
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A JavaScript statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(Function),
    ClassDeclaration(Class),
    Expression(ExpressionStatement),
    Block(BlockStatement),
    If(IfStatement),
    Switch(SwitchStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    ForOf(ForOfStatement),
    Return(ReturnStatement),
    Break(JumpStatement),
    Continue(JumpStatement),
    Throw(ThrowStatement),
    Try(TryStatement),
    With(WithStatement),
    Labeled(LabeledStatement),
    Debugger(Span),
    Empty(Span),
    /// `import ... from "m"`
    Import(ImportDeclaration),
    /// `export { ... }` or `export <declaration>`
    ExportNamed(ExportNamedDeclaration),
    /// `export default ...`
    ExportDefault(ExportDefaultDeclaration),
    /// `export * from "m"`
    ExportAll(ExportAllDeclaration),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::VariableDeclaration(node) => node.span,
            Statement::FunctionDeclaration(node) => node.span,
            Statement::ClassDeclaration(node) => node.span,
            Statement::Expression(node) => node.span,
            Statement::Block(node) => node.span,
            Statement::If(node) => node.span,
            Statement::Switch(node) => node.span,
            Statement::While(node) => node.span,
            Statement::DoWhile(node) => node.span,
            Statement::For(node) => node.span,
            Statement::ForIn(node) => node.span,
            Statement::ForOf(node) => node.span,
            Statement::Return(node) => node.span,
            Statement::Break(node) | Statement::Continue(node) => node.span,
            Statement::Throw(node) => node.span,
            Statement::Try(node) => node.span,
            Statement::With(node) => node.span,
            Statement::Labeled(node) => node.span,
            Statement::Debugger(span) | Statement::Empty(span) => *span,
            Statement::Import(node) => node.span,
            Statement::ExportNamed(node) => node.span,
            Statement::ExportDefault(node) => node.span,
            Statement::ExportAll(node) => node.span,
        }
    }

    /// Returns true for import and export declarations.
    pub fn is_module_declaration(&self) -> bool {
        matches!(
            self,
            Statement::Import(_)
                | Statement::ExportNamed(_)
                | Statement::ExportDefault(_)
                | Statement::ExportAll(_)
        )
    }
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

/// A variable declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

impl VariableDeclaration {
    /// Every name bound by the declarators, in source order.
    pub fn bound_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for declarator in &self.declarations {
            declarator.id.collect_bound_names(&mut names);
        }
        names
    }
}

/// A single variable declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// The binding target being declared
    pub id: Pattern,
    pub init: Option<Expression>,
    pub span: Span,
}

/// A function declaration, expression or method body.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub is_async: bool,
    pub is_generator: bool,
    /// Span of the parenthesized parameter list
    pub params_span: Span,
    pub span: Span,
}

/// A class declaration or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub id: Option<Identifier>,
    pub super_class: Option<Box<Expression>>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

/// A member of a class body.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Method(MethodDefinition),
    Property(ClassProperty),
    StaticBlock(BlockStatement),
}

/// The role of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// A class method, getter, setter or constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    pub key: PropertyKey,
    pub value: Function,
    pub kind: MethodKind,
    pub is_static: bool,
    pub span: Span,
}

/// A class field.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProperty {
    pub key: PropertyKey,
    pub value: Option<Expression>,
    pub is_static: bool,
    pub span: Span,
}

/// An expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    /// Raw directive text (without quotes) for prologue entries such as
    /// `"use strict"`
    pub directive: Option<String>,
    pub span: Span,
}

/// A block statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
    pub span: Span,
}

/// An if statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub test: Expression,
    /// The consequent
    pub consequent: Box<Statement>,
    /// The optional alternate
    pub alternate: Option<Box<Statement>>,
    pub span: Span,
}

/// A while statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub test: Expression,
    /// The body
    pub body: Box<Statement>,
    pub span: Span,
}

/// A for statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// Initialization
    pub init: Option<ForInit>,
    /// Test condition
    pub test: Option<Expression>,
    /// Update expression
    pub update: Option<Expression>,
    /// The body
    pub body: Box<Statement>,
    pub span: Span,
}

/// For loop initialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(VariableDeclaration),
    Expression(Expression),
}

/// A switch statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    /// The cases
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

/// A switch case.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
    pub span: Span,
}

/// A do-while statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    /// The body
    pub body: Box<Statement>,
    pub test: Expression,
    pub span: Span,
}

/// A for-in statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    /// The left side (variable declaration or assignment target)
    pub left: ForInLeft,
    /// The object to iterate
    pub right: Expression,
    /// The body
    pub body: Box<Statement>,
    pub span: Span,
}

/// A for-of statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStatement {
    /// The left side (variable declaration or assignment target)
    pub left: ForInLeft,
    pub right: Expression,
    /// The body
    pub body: Box<Statement>,
    /// `for await (...)`
    pub is_await: bool,
    pub span: Span,
}

/// Left side of for-in/for-of.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInLeft {
    Declaration(VariableDeclaration),
    /// Assignment target
    Pattern(Pattern),
}

/// A return statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// Optional return value
    pub argument: Option<Expression>,
    pub span: Span,
}

/// A break or continue statement.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpStatement {
    pub label: Option<Identifier>,
    pub span: Span,
}

/// A throw statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    /// The expression to throw
    pub argument: Expression,
    pub span: Span,
}

/// A try statement.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
    pub span: Span,
}

/// A catch clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// The catch parameter
    pub param: Option<Pattern>,
    pub body: BlockStatement,
    pub span: Span,
}

/// A with statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WithStatement {
    pub object: Expression,
    /// The body
    pub body: Box<Statement>,
    pub span: Span,
}

/// A labeled statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStatement {
    /// The label
    pub label: Identifier,
    /// The body
    pub body: Box<Statement>,
    pub span: Span,
}

// ==================== Module declarations ====================

/// `import a, {b as c} from "m"`, `import * as ns from "m"`, `import "m"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StringLiteral,
    pub span: Span,
}

/// One binding introduced by an import declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `import a from "m"`
    Default { local: Identifier },
    /// `import * as ns from "m"`
    Namespace { local: Identifier },
    /// `import {b as c} from "m"`
    Named {
        imported: Identifier,
        local: Identifier,
    },
}

impl ImportSpecifier {
    /// The local binding.
    pub fn local(&self) -> &Identifier {
        match self {
            ImportSpecifier::Default { local }
            | ImportSpecifier::Namespace { local }
            | ImportSpecifier::Named { local, .. } => local,
        }
    }

    /// The exported name being imported; `"*"` for namespaces.
    pub fn imported_name(&self) -> &str {
        match self {
            ImportSpecifier::Default { .. } => "default",
            ImportSpecifier::Namespace { .. } => "*",
            ImportSpecifier::Named { imported, .. } => &imported.name,
        }
    }
}

/// A string literal used as a module specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

/// `export {a as b}`, `export {a} from "m"`, or `export <declaration>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportNamedDeclaration {
    /// A variable, function or class declaration
    pub declaration: Option<Box<Statement>>,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<StringLiteral>,
    pub span: Span,
}

impl ExportNamedDeclaration {
    /// Local names bound by the exported declaration.
    pub fn declared_names(&self) -> Vec<String> {
        match self.declaration.as_deref() {
            Some(Statement::VariableDeclaration(declaration)) => declaration.bound_names(),
            Some(Statement::FunctionDeclaration(Function { id: Some(id), .. }))
            | Some(Statement::ClassDeclaration(Class { id: Some(id), .. })) => {
                vec![id.name.clone()]
            }
            _ => Vec::new(),
        }
    }
}

/// `local as exported` inside `export { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: Identifier,
    pub exported: Identifier,
    pub span: Span,
}

/// `export default ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDefaultDeclaration {
    pub declaration: DefaultDeclaration,
    /// Span of the `default` keyword
    pub default_keyword: Span,
    pub span: Span,
}

/// What follows `export default`.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultDeclaration {
    /// Hoistable function declaration, possibly anonymous
    Function(Function),
    /// Class declaration, possibly anonymous
    Class(Class),
    /// Any other assignment expression
    Expression(Expression),
}

impl DefaultDeclaration {
    pub fn span(&self) -> Span {
        match self {
            DefaultDeclaration::Function(function) => function.span,
            DefaultDeclaration::Class(class) => class.span,
            DefaultDeclaration::Expression(expression) => expression.span(),
        }
    }
}

/// `export * from "m"` or `export * as ns from "m"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportAllDeclaration {
    pub exported: Option<Identifier>,
    pub source: StringLiteral,
    pub span: Span,
}

// ==================== Expressions ====================

/// A JavaScript expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Identifier(Identifier),
    This(Span),
    /// super keyword
    Super(Span),
    Array(ArrayExpression),
    Object(ObjectExpression),
    /// Template literal
    Template(TemplateLiteral),
    /// Tagged template
    TaggedTemplate(TaggedTemplateExpression),
    Binary(BinaryExpression),
    /// Logical expression (&&, ||, ??)
    Logical(BinaryExpression),
    Unary(UnaryExpression),
    Assignment(AssignmentExpression),
    Call(CallExpression),
    Member(MemberExpression),
    Conditional(ConditionalExpression),
    Function(Function),
    Arrow(ArrowFunctionExpression),
    /// Class expression
    Class(Class),
    New(NewExpression),
    Update(UpdateExpression),
    Sequence(SequenceExpression),
    /// Spread element in calls and array literals
    Spread(SpreadElement),
    /// yield expression
    Yield(YieldExpression),
    /// await expression
    Await(AwaitExpression),
    /// Dynamic `import(source)`
    Import(ImportExpression),
    /// `new.target` or `import.meta`
    MetaProperty(MetaProperty),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(node) => node.span,
            Expression::Identifier(node) => node.span,
            Expression::This(span) | Expression::Super(span) => *span,
            Expression::Array(node) => node.span,
            Expression::Object(node) => node.span,
            Expression::Template(node) => node.span,
            Expression::TaggedTemplate(node) => node.span,
            Expression::Binary(node) | Expression::Logical(node) => node.span,
            Expression::Unary(node) => node.span,
            Expression::Assignment(node) => node.span,
            Expression::Call(node) => node.span,
            Expression::Member(node) => node.span,
            Expression::Conditional(node) => node.span,
            Expression::Function(node) => node.span,
            Expression::Arrow(node) => node.span,
            Expression::Class(node) => node.span,
            Expression::New(node) => node.span,
            Expression::Update(node) => node.span,
            Expression::Sequence(node) => node.span,
            Expression::Spread(node) => node.span,
            Expression::Yield(node) => node.span,
            Expression::Await(node) => node.span,
            Expression::Import(node) => node.span,
            Expression::MetaProperty(node) => node.span,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub span: Span,
}

/// The value of a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    BigInt(String),
    RegExp { pattern: String, flags: String },
}

/// An array expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    pub elements: Vec<Option<Expression>>,
    pub span: Span,
}

/// An object expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpression {
    pub properties: Vec<ObjectMember>,
    pub span: Span,
}

/// An entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    Property(Property),
    Spread(SpreadElement),
}

/// How an object property was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// An object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expression,
    pub kind: PropertyKind,
    /// Whether this is method syntax (`a() {}`)
    pub method: bool,
    /// Whether this is shorthand syntax (`{a}`)
    pub shorthand: bool,
    pub span: Span,
}

/// A property key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier key (any identifier name, keywords included)
    Identifier(Identifier),
    Computed(Box<Expression>),
    Literal(Literal),
    /// Private class member name (#x)
    Private(Identifier),
}

impl PropertyKey {
    pub fn span(&self) -> Span {
        match self {
            PropertyKey::Identifier(id) | PropertyKey::Private(id) => id.span,
            PropertyKey::Literal(literal) => literal.span,
            PropertyKey::Computed(expression) => expression.span(),
        }
    }

    /// The static name of the key, if it has one.
    pub fn static_name(&self) -> Option<&str> {
        match self {
            PropertyKey::Identifier(id) => Some(&id.name),
            PropertyKey::Literal(Literal {
                value: LiteralValue::String(value),
                ..
            }) => Some(value),
            _ => None,
        }
    }
}

/// A template literal.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

/// A cooked chunk of template text.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateElement {
    pub cooked: String,
    pub tail: bool,
    pub span: Span,
}

/// ``tag`text` ``
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTemplateExpression {
    pub tag: Box<Expression>,
    pub quasi: TemplateLiteral,
    pub span: Span,
}

/// A binary or logical expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    // Comparison
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    // Logical
    LogicalAnd,
    LogicalOr,
    NullishCoalescing,
    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    // Other
    In,
    InstanceOf,
}

/// A unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub argument: Box<Expression>,
    pub span: Span,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Plus,
    LogicalNot,
    BitwiseNot,
    Typeof,
    Void,
    Delete,
}

/// An assignment expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub operator: AssignmentOperator,
    /// The assignment target
    pub left: Box<Pattern>,
    pub right: Box<Expression>,
    pub span: Span,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    ExponentAssign,
    LeftShiftAssign,
    RightShiftAssign,
    UnsignedRightShiftAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
    LogicalAndAssign,
    LogicalOrAssign,
    NullishCoalescingAssign,
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    /// `callee?.(...)`
    pub optional: bool,
    pub span: Span,
}

/// A member access expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: MemberProperty,
    /// `object?.property`
    pub optional: bool,
    pub span: Span,
}

impl MemberExpression {
    pub fn computed(&self) -> bool {
        matches!(self.property, MemberProperty::Expression(_))
    }
}

/// Member property.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    Identifier(Identifier),
    Expression(Box<Expression>),
    /// Private name (#x)
    Private(Identifier),
}

/// A conditional (ternary) expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub span: Span,
}

/// An arrow function expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunctionExpression {
    pub params: Vec<Pattern>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub span: Span,
}

/// Arrow function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expression(Box<Expression>),
    Block(BlockStatement),
}

/// A new expression.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

/// An update expression (++/--)
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub operator: UpdateOperator,
    pub argument: Box<Expression>,
    pub prefix: bool,
    pub span: Span,
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

/// A sequence expression (comma operator).
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
    pub span: Span,
}

/// `...argument` in arrays, calls and object literals.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadElement {
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldExpression {
    pub argument: Option<Box<Expression>>,
    /// `yield*`
    pub delegate: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AwaitExpression {
    pub argument: Box<Expression>,
    pub span: Span,
}

/// Dynamic `import(source)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportExpression {
    pub source: Box<Expression>,
    /// Span of the `import` keyword
    pub keyword: Span,
    pub span: Span,
}

/// `new.target` or `import.meta`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaProperty {
    pub meta: Identifier,
    pub property: Identifier,
    pub span: Span,
}
