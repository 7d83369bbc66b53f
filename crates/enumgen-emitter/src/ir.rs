//! Structured IR for generated source.
//!
//! The synthesizer produces IR trees instead of strings; the printer walks
//! them and emits source text. This keeps synthesis testable by structural
//! comparison and confines formatting decisions to the printer.

use serde::{Deserialize, Serialize};

/// Expression or statement node of the generated language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrNode {
    // =========================================================================
    // Literals and identifiers
    // =========================================================================
    /// Numeric literal, pre-rendered with its width suffix: `3`, `7UL`
    NumericLiteral(String),

    /// String literal: `"Red"`
    StringLiteral(String),

    /// Identifier or type reference: `value`, `EnumDispatcher<T>`
    Identifier(String),

    /// Default value of a type: `default(T)`
    Default(String),

    /// Type identity: `typeof(T)`
    TypeOf(String),

    // =========================================================================
    // Expressions
    // =========================================================================
    /// Binary expression: `left op right`
    Binary {
        left: Box<Self>,
        operator: String,
        right: Box<Self>,
    },

    /// Prefix unary expression: `~x`, `-x`
    Unary { operator: String, operand: Box<Self> },

    /// Call expression: `callee(args)`
    Call {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },

    /// Property access: `object.member`
    MemberAccess { object: Box<Self>, member: String },

    /// Element access: `object[index]`
    IndexAccess { object: Box<Self>, index: Box<Self> },

    /// Explicit conversion: `(type)expr`
    Cast {
        type_name: String,
        operand: Box<Self>,
    },

    /// Object construction: `new Type(args)`
    New {
        type_name: String,
        arguments: Vec<Self>,
    },

    /// Array literal: `new T[] { a, b }`
    ArrayLiteral {
        element_type: String,
        elements: Vec<Self>,
    },

    /// Parenthesized expression: `(expr)`
    Parenthesized(Box<Self>),

    /// `out` argument at a call site: `out value`
    OutArg(Box<Self>),

    /// `ref` argument at a call site: `ref value`
    RefArg(Box<Self>),

    // =========================================================================
    // Statements
    // =========================================================================
    /// Local declaration: `var name = init;`
    VarDecl {
        type_name: String,
        name: String,
        initializer: Option<Box<Self>>,
    },

    /// Expression statement: `expr;`
    ExpressionStatement(Box<Self>),

    /// Return statement: `return expr;`
    Return(Option<Box<Self>>),

    /// Throw statement: `throw new Exception(args);`
    Throw {
        exception_type: String,
        arguments: Vec<Self>,
    },

    /// Switch statement over a scrutinee with literal-labelled arms.
    Switch {
        scrutinee: Box<Self>,
        arms: Vec<IrSwitchArm>,
        /// Statements of the `default:` arm.
        default_arm: Vec<Self>,
    },

    /// If statement: `if (cond) { then } else { else }`
    If {
        condition: Box<Self>,
        then_branch: Vec<Self>,
        else_branch: Option<Vec<Self>>,
    },

    /// For statement: `for (init; cond; step) { body }`
    For {
        initializer: Box<Self>,
        condition: Box<Self>,
        step: Box<Self>,
        body: Vec<Self>,
    },

    /// Raw source text (escape hatch for constructs the IR does not model)
    Raw(String),
}

/// One `case` arm of a switch statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrSwitchArm {
    pub label: IrNode,
    pub body: Vec<IrNode>,
}

/// Kind of an emitted type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrTypeKind {
    Class,
    StaticClass,
    Struct,
}

/// A generated type declaration: the dispatch base, the façade, a per-enum
/// dispatcher subclass, or the flags enumerator struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrTypeDecl {
    pub kind: IrTypeKind,
    pub modifiers: Vec<String>,
    pub name: String,
    pub type_params: Vec<String>,
    pub base: Option<String>,
    pub members: Vec<IrMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrMember {
    Field(IrField),
    Method(IrMethod),
    Constructor(IrConstructor),
    Property(IrProperty),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrField {
    pub modifiers: Vec<String>,
    pub type_name: String,
    pub name: String,
    pub initializer: Option<IrNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrMethod {
    pub modifiers: Vec<String>,
    pub return_type: String,
    pub name: String,
    pub type_params: Vec<String>,
    pub constraint: Option<String>,
    pub params: Vec<IrParam>,
    pub body: IrBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrConstructor {
    pub modifiers: Vec<String>,
    pub type_name: String,
    pub params: Vec<IrParam>,
    pub body: Vec<IrNode>,
}

/// Get-only property backed by a single return expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrProperty {
    pub modifiers: Vec<String>,
    pub type_name: String,
    pub name: String,
    pub getter: IrNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrBody {
    /// Declaration only: `;` (abstract members)
    Abstract,
    /// Expression body: `=> expr;`
    Expression(IrNode),
    /// Block body: `{ statements }`
    Block(Vec<IrNode>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrParam {
    /// `out` / `ref`, when present.
    pub modifier: Option<String>,
    pub type_name: String,
    pub name: String,
}

/// One compilation unit of generated source: a namespace with type decls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrUnit {
    pub namespace: String,
    pub types: Vec<IrTypeDecl>,
}

// =========================================================================
// Builder helpers for IR construction
// =========================================================================

impl IrNode {
    /// Create an identifier node
    pub fn id(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Create a string literal
    pub fn string(s: impl Into<String>) -> Self {
        Self::StringLiteral(s.into())
    }

    /// Create a numeric literal from pre-rendered text
    pub fn number(n: impl Into<String>) -> Self {
        Self::NumericLiteral(n.into())
    }

    /// Create a property access
    pub fn member(object: Self, member: impl Into<String>) -> Self {
        Self::MemberAccess {
            object: Box::new(object),
            member: member.into(),
        }
    }

    /// Create a call expression
    pub fn call(callee: Self, arguments: Vec<Self>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// Create a binary expression
    pub fn binary(left: Self, operator: impl Into<String>, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
        }
    }

    /// Create an assignment expression
    pub fn assign(target: Self, value: Self) -> Self {
        Self::binary(target, "=", value)
    }

    /// Create an explicit cast
    pub fn cast(type_name: impl Into<String>, operand: Self) -> Self {
        Self::Cast {
            type_name: type_name.into(),
            operand: Box::new(operand),
        }
    }

    /// Create an element access
    pub fn index(object: Self, index: Self) -> Self {
        Self::IndexAccess {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    /// Create a return statement
    pub fn ret(expr: Self) -> Self {
        Self::Return(Some(Box::new(expr)))
    }

    /// Create a throw statement
    pub fn throw(exception_type: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::Throw {
            exception_type: exception_type.into(),
            arguments,
        }
    }

    /// Create an expression statement
    pub fn stmt(expr: Self) -> Self {
        Self::ExpressionStatement(Box::new(expr))
    }

    /// Wrap in parentheses
    pub fn paren(self) -> Self {
        Self::Parenthesized(Box::new(self))
    }
}

impl IrParam {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            modifier: None,
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn out(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            modifier: Some("out".to_string()),
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn by_ref(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            modifier: Some("ref".to_string()),
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

impl IrMethod {
    pub fn new(
        modifiers: &[&str],
        return_type: impl Into<String>,
        name: impl Into<String>,
        params: Vec<IrParam>,
        body: IrBody,
    ) -> Self {
        Self {
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            return_type: return_type.into(),
            name: name.into(),
            type_params: Vec::new(),
            constraint: None,
            params,
            body,
        }
    }

    pub fn generic(mut self, type_param: impl Into<String>) -> Self {
        self.type_params.push(type_param.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

impl IrField {
    pub fn new(
        modifiers: &[&str],
        type_name: impl Into<String>,
        name: impl Into<String>,
        initializer: Option<IrNode>,
    ) -> Self {
        Self {
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            type_name: type_name.into(),
            name: name.into(),
            initializer,
        }
    }
}

impl IrTypeDecl {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            kind: IrTypeKind::Class,
            modifiers: Vec::new(),
            name: name.into(),
            type_params: Vec::new(),
            base: None,
            members: Vec::new(),
        }
    }

    pub fn static_class(name: impl Into<String>) -> Self {
        Self {
            kind: IrTypeKind::StaticClass,
            ..Self::class(name)
        }
    }

    pub fn r#struct(name: impl Into<String>) -> Self {
        Self {
            kind: IrTypeKind::Struct,
            ..Self::class(name)
        }
    }

    pub fn with_modifiers(mut self, modifiers: &[&str]) -> Self {
        self.modifiers = modifiers.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_type_param(mut self, param: impl Into<String>) -> Self {
        self.type_params.push(param.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn add(mut self, member: IrMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn add_method(self, method: IrMethod) -> Self {
        self.add(IrMember::Method(method))
    }

    pub fn add_field(self, field: IrField) -> Self {
        self.add(IrMember::Field(field))
    }

    /// Methods declared on this type, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &IrMethod> {
        self.members.iter().filter_map(|m| match m {
            IrMember::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn find_method(&self, name: &str) -> Option<&IrMethod> {
        self.methods().find(|m| m.name == name)
    }
}
