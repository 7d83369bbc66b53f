//! Pretty-printer for the emit IR.
//!
//! Walks IR trees and produces generated source text. Formatting decisions
//! live here and only here; the observable structure of the generated code
//! is fixed by the IR the synthesizer builds.

use crate::ir::{
    IrBody, IrConstructor, IrField, IrMember, IrMethod, IrNode, IrParam, IrProperty, IrSwitchArm,
    IrTypeDecl, IrTypeKind, IrUnit,
};

const INDENT: &str = "    ";

pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    /// Print a full compilation unit and return the generated text.
    pub fn print_unit(unit: &IrUnit) -> String {
        let mut printer = Printer::new();
        printer.emit_unit(unit);
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn write_line(&mut self) {
        self.out.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn increase_indent(&mut self) {
        self.indent += 1;
    }

    fn decrease_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    // =========================================================================
    // Units and type declarations
    // =========================================================================

    fn emit_unit(&mut self, unit: &IrUnit) {
        self.write("// <auto-generated>\n");
        self.write("//     This file was produced by the enum utility generator.\n");
        self.write("//     Manual edits will be overwritten on the next build.\n");
        self.write("// </auto-generated>\n");
        self.write(&format!("namespace {}\n", unit.namespace));
        self.write("{\n");
        self.increase_indent();
        for (i, decl) in unit.types.iter().enumerate() {
            if i > 0 {
                self.write_line();
            }
            self.emit_type_decl(decl);
        }
        self.decrease_indent();
        self.write("}\n");
    }

    fn emit_type_decl(&mut self, decl: &IrTypeDecl) {
        self.write_indent();
        for modifier in &decl.modifiers {
            self.write(modifier);
            self.write(" ");
        }
        match decl.kind {
            IrTypeKind::Class => self.write("class "),
            IrTypeKind::StaticClass => self.write("static class "),
            IrTypeKind::Struct => self.write("struct "),
        }
        self.write(&decl.name);
        if !decl.type_params.is_empty() {
            self.write("<");
            self.write(&decl.type_params.join(", "));
            self.write(">");
        }
        if let Some(base) = &decl.base {
            self.write(" : ");
            self.write(base);
        }
        self.write_line();
        self.write_indent();
        self.write("{\n");
        self.increase_indent();
        for (i, member) in decl.members.iter().enumerate() {
            if i > 0 {
                self.write_line();
            }
            self.emit_member(member);
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}\n");
    }

    fn emit_member(&mut self, member: &IrMember) {
        match member {
            IrMember::Field(field) => self.emit_field(field),
            IrMember::Method(method) => self.emit_method(method),
            IrMember::Constructor(ctor) => self.emit_constructor(ctor),
            IrMember::Property(property) => self.emit_property(property),
        }
    }

    fn emit_field(&mut self, field: &IrField) {
        self.write_indent();
        for modifier in &field.modifiers {
            self.write(modifier);
            self.write(" ");
        }
        self.write(&field.type_name);
        self.write(" ");
        self.write(&field.name);
        if let Some(init) = &field.initializer {
            self.write(" = ");
            self.emit_node(init);
        }
        self.write(";\n");
    }

    fn emit_method(&mut self, method: &IrMethod) {
        self.write_indent();
        for modifier in &method.modifiers {
            self.write(modifier);
            self.write(" ");
        }
        self.write(&method.return_type);
        self.write(" ");
        self.write(&method.name);
        if !method.type_params.is_empty() {
            self.write("<");
            self.write(&method.type_params.join(", "));
            self.write(">");
        }
        self.write("(");
        self.emit_params(&method.params);
        self.write(")");
        if let Some(constraint) = &method.constraint {
            self.write(" where ");
            self.write(constraint);
        }
        match &method.body {
            IrBody::Abstract => self.write(";\n"),
            IrBody::Expression(expr) => {
                self.write(" => ");
                self.emit_node(expr);
                self.write(";\n");
            }
            IrBody::Block(statements) => {
                self.write_line();
                self.emit_block(statements);
            }
        }
    }

    fn emit_constructor(&mut self, ctor: &IrConstructor) {
        self.write_indent();
        for modifier in &ctor.modifiers {
            self.write(modifier);
            self.write(" ");
        }
        self.write(&ctor.type_name);
        self.write("(");
        self.emit_params(&ctor.params);
        self.write(")");
        self.write_line();
        self.emit_block(&ctor.body);
    }

    fn emit_property(&mut self, property: &IrProperty) {
        self.write_indent();
        for modifier in &property.modifiers {
            self.write(modifier);
            self.write(" ");
        }
        self.write(&property.type_name);
        self.write(" ");
        self.write(&property.name);
        self.write(" { get { return ");
        self.emit_node(&property.getter);
        self.write("; } }\n");
    }

    fn emit_params(&mut self, params: &[IrParam]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if let Some(modifier) = &param.modifier {
                self.write(modifier);
                self.write(" ");
            }
            self.write(&param.type_name);
            self.write(" ");
            self.write(&param.name);
        }
    }

    fn emit_block(&mut self, statements: &[IrNode]) {
        self.write_indent();
        self.write("{\n");
        self.increase_indent();
        for statement in statements {
            self.write_indent();
            self.emit_node(statement);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}\n");
    }

    // =========================================================================
    // Expressions and statements
    // =========================================================================

    fn emit_node(&mut self, node: &IrNode) {
        match node {
            IrNode::NumericLiteral(text) => self.write(text),
            IrNode::StringLiteral(text) => {
                self.write("\"");
                self.write(&escape_string(text));
                self.write("\"");
            }
            IrNode::Identifier(name) => self.write(name),
            IrNode::Default(type_name) => {
                self.write("default(");
                self.write(type_name);
                self.write(")");
            }
            IrNode::TypeOf(type_name) => {
                self.write("typeof(");
                self.write(type_name);
                self.write(")");
            }
            IrNode::Binary {
                left,
                operator,
                right,
            } => {
                self.emit_node(left);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_node(right);
            }
            IrNode::Unary { operator, operand } => {
                self.write(operator);
                self.emit_node(operand);
            }
            IrNode::Call { callee, arguments } => {
                self.emit_node(callee);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            IrNode::MemberAccess { object, member } => {
                self.emit_node(object);
                self.write(".");
                self.write(member);
            }
            IrNode::IndexAccess { object, index } => {
                self.emit_node(object);
                self.write("[");
                self.emit_node(index);
                self.write("]");
            }
            IrNode::Cast { type_name, operand } => {
                self.write("(");
                self.write(type_name);
                self.write(")");
                self.emit_node(operand);
            }
            IrNode::New {
                type_name,
                arguments,
            } => {
                self.write("new ");
                self.write(type_name);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            IrNode::ArrayLiteral {
                element_type,
                elements,
            } => {
                self.write("new ");
                self.write(element_type);
                self.write("[] { ");
                self.emit_comma_separated(elements);
                self.write(" }");
            }
            IrNode::Parenthesized(inner) => {
                self.write("(");
                self.emit_node(inner);
                self.write(")");
            }
            IrNode::OutArg(inner) => {
                self.write("out ");
                self.emit_node(inner);
            }
            IrNode::RefArg(inner) => {
                self.write("ref ");
                self.emit_node(inner);
            }
            IrNode::VarDecl {
                type_name,
                name,
                initializer,
            } => {
                self.write(type_name);
                self.write(" ");
                self.write(name);
                if let Some(init) = initializer {
                    self.write(" = ");
                    self.emit_node(init);
                }
                self.write(";");
            }
            IrNode::ExpressionStatement(expr) => {
                self.emit_node(expr);
                self.write(";");
            }
            IrNode::Return(expr) => {
                self.write("return");
                if let Some(expr) = expr {
                    self.write(" ");
                    self.emit_node(expr);
                }
                self.write(";");
            }
            IrNode::Throw {
                exception_type,
                arguments,
            } => {
                self.write("throw new ");
                self.write(exception_type);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(");");
            }
            IrNode::Switch {
                scrutinee,
                arms,
                default_arm,
            } => self.emit_switch(scrutinee, arms, default_arm),
            IrNode::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if (");
                self.emit_node(condition);
                self.write(")\n");
                self.emit_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.write_indent();
                    self.write("else\n");
                    self.emit_block(else_branch);
                }
                // blocks terminate their own lines
                self.trim_trailing_newline();
            }
            IrNode::For {
                initializer,
                condition,
                step,
                body,
            } => {
                self.write("for (");
                self.emit_node(initializer);
                self.write(" ");
                self.emit_node(condition);
                self.write("; ");
                self.emit_node(step);
                self.write(")\n");
                self.emit_block(body);
                self.trim_trailing_newline();
            }
            IrNode::Raw(text) => self.write(text),
        }
    }

    fn emit_switch(&mut self, scrutinee: &IrNode, arms: &[IrSwitchArm], default_arm: &[IrNode]) {
        self.write("switch (");
        self.emit_node(scrutinee);
        self.write(")\n");
        self.write_indent();
        self.write("{\n");
        self.increase_indent();
        for arm in arms {
            self.write_indent();
            self.write("case ");
            self.emit_node(&arm.label);
            self.write(":");
            if arm.body.len() == 1 {
                self.write(" ");
                self.emit_node(&arm.body[0]);
                self.write_line();
            } else {
                self.write_line();
                self.increase_indent();
                for statement in &arm.body {
                    self.write_indent();
                    self.emit_node(statement);
                    self.write_line();
                }
                self.decrease_indent();
            }
        }
        if !default_arm.is_empty() {
            self.write_indent();
            self.write("default:");
            if default_arm.len() == 1 {
                self.write(" ");
                self.emit_node(&default_arm[0]);
                self.write_line();
            } else {
                self.write_line();
                self.increase_indent();
                for statement in default_arm {
                    self.write_indent();
                    self.emit_node(statement);
                    self.write_line();
                }
                self.decrease_indent();
            }
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_comma_separated(&mut self, nodes: &[IrNode]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_node(node);
        }
    }

    fn trim_trailing_newline(&mut self) {
        if self.out.ends_with('\n') {
            self.out.pop();
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
