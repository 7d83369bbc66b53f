//! Per-type code synthesizer.
//!
//! For each distinct `EnumTypeDescriptor` this stage validates the target,
//! then builds the dispatcher subclass implementing every enum utility
//! operation as emit IR: value/name tables, name/parse switches, the flag
//! test, and (for flags types) the decomposition step. Synthesis for
//! different types has no shared state and may run concurrently.
//!
//! All generated behavior avoids heap allocation and reflection in its
//! steady-state path: the value and name tables are materialized once into
//! static fields, and the buffer-accepting overload writes into
//! caller-supplied storage.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use enumgen_common::names;
use enumgen_common::{CancellationToken, Cancelled, Diagnostic};
use enumgen_emitter::dispatch::dispatcher_class_name;
use enumgen_emitter::{
    IrBody, IrField, IrMethod, IrNode, IrParam, IrSwitchArm, IrTypeDecl, SynthesizedEnum,
};
use enumgen_symbols::{EnumMember, EnumTypeDescriptor, UnderlyingKind};

/// Result of synthesizing one enumeration type.
///
/// `Skipped` is the recoverable per-type failure: the diagnostic is
/// reported and the pass continues for all other types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynthOutcome {
    Generated(SynthesizedEnum),
    Skipped(Diagnostic),
}

/// Validate and synthesize one enumeration type.
///
/// The cancellation token is observed at entry and before each generated
/// member is built.
pub fn synthesize_enum(
    descriptor: &EnumTypeDescriptor,
    cancel: &CancellationToken,
) -> Result<SynthOutcome, Cancelled> {
    cancel.check()?;

    if !descriptor.visibility.is_public() {
        debug!(ty = %descriptor.display_name, "skipping non-public enum");
        return Ok(SynthOutcome::Skipped(Diagnostic::non_public_enum(
            descriptor.decl_location.clone(),
            &descriptor.display_name,
        )));
    }

    trace!(ty = %descriptor.qualified_name, flags = descriptor.is_flags, "synthesizing dispatcher");
    let dispatcher_name = dispatcher_class_name(&descriptor.qualified_name);
    let mut decl = IrTypeDecl::class(&dispatcher_name)
        .with_modifiers(&["internal", "sealed"])
        .with_base(format!(
            "{}<{}>",
            names::DISPATCH_BASE_NAME,
            descriptor.qualified_name
        ))
        .add_field(values_table(descriptor))
        .add_field(names_table(descriptor));

    // Each builder walks the member list, so the token is observed before
    // every unit of real work.
    let method_builders: [fn(&EnumTypeDescriptor) -> IrMethod; 11] = [
        build_get_values,
        build_get_values_buffer,
        build_get_length,
        build_get_names,
        build_get_name,
        build_is_defined,
        build_parse,
        build_try_parse,
        build_to_string_fast,
        build_get_alias_value,
        build_has_bit_flag,
    ];
    for build in method_builders {
        cancel.check()?;
        decl = decl.add_method(build(descriptor));
    }
    if descriptor.is_flags {
        cancel.check()?;
        decl = decl.add_method(build_next_flag(descriptor));
    }

    Ok(SynthOutcome::Generated(SynthesizedEnum {
        type_id: descriptor.id,
        qualified_name: descriptor.qualified_name.clone(),
        dispatcher_name,
        decl,
    }))
}

/// `Q.Member` reference.
fn member_ref(descriptor: &EnumTypeDescriptor, member: &EnumMember) -> IrNode {
    IrNode::member(IrNode::id(&descriptor.qualified_name), &member.name)
}

/// Members with the first declaration winning for each duplicate value.
///
/// Enums may declare synonym members sharing one constant; switch labels
/// over the underlying value must stay unique.
fn distinct_by_value<'a>(descriptor: &'a EnumTypeDescriptor) -> Vec<&'a EnumMember> {
    let mut seen: FxHashSet<i128> = FxHashSet::default();
    descriptor
        .members
        .iter()
        .filter(|m| seen.insert(m.value))
        .collect()
}

fn values_table(descriptor: &EnumTypeDescriptor) -> IrField {
    IrField::new(
        &["private", "static", "readonly"],
        format!("{}[]", descriptor.qualified_name),
        "Values",
        Some(IrNode::ArrayLiteral {
            element_type: descriptor.qualified_name.clone(),
            elements: descriptor
                .members
                .iter()
                .map(|m| member_ref(descriptor, m))
                .collect(),
        }),
    )
}

fn names_table(descriptor: &EnumTypeDescriptor) -> IrField {
    IrField::new(
        &["private", "static", "readonly"],
        "string[]",
        "Names",
        Some(IrNode::ArrayLiteral {
            element_type: "string".to_string(),
            elements: descriptor
                .members
                .iter()
                .map(|m| IrNode::string(&m.name))
                .collect(),
        }),
    )
}

fn build_get_values(descriptor: &EnumTypeDescriptor) -> IrMethod {
    IrMethod::new(
        &["public", "override"],
        format!("{}[]", descriptor.qualified_name),
        "GetValues",
        vec![],
        IrBody::Expression(IrNode::id("Values")),
    )
}

/// Buffer-accepting overload: copies into caller-supplied storage and
/// fails with a capacity error instead of silently truncating.
fn build_get_values_buffer(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let count = descriptor.members.len();
    let body = vec![
        IrNode::If {
            condition: Box::new(IrNode::binary(
                IrNode::member(IrNode::id("buffer"), "Length"),
                "<",
                IrNode::number(count.to_string()),
            )),
            then_branch: vec![IrNode::throw(
                "System.ArgumentException",
                vec![IrNode::string(format!(
                    "Destination buffer is too small to hold {count} members."
                ))],
            )],
            else_branch: None,
        },
        IrNode::For {
            initializer: Box::new(IrNode::VarDecl {
                type_name: "int".to_string(),
                name: "i".to_string(),
                initializer: Some(Box::new(IrNode::number("0"))),
            }),
            condition: Box::new(IrNode::binary(
                IrNode::id("i"),
                "<",
                IrNode::number(count.to_string()),
            )),
            step: Box::new(IrNode::assign(
                IrNode::id("i"),
                IrNode::binary(IrNode::id("i"), "+", IrNode::number("1")),
            )),
            body: vec![IrNode::stmt(IrNode::assign(
                IrNode::index(IrNode::id("buffer"), IrNode::id("i")),
                IrNode::index(IrNode::id("Values"), IrNode::id("i")),
            ))],
        },
        IrNode::ret(IrNode::number(count.to_string())),
    ];
    IrMethod::new(
        &["public", "override"],
        "int",
        "GetValues",
        vec![IrParam::new(
            format!("{}[]", descriptor.qualified_name),
            "buffer",
        )],
        IrBody::Block(body),
    )
}

fn build_get_length(descriptor: &EnumTypeDescriptor) -> IrMethod {
    IrMethod::new(
        &["public", "override"],
        "int",
        "GetLength",
        vec![],
        IrBody::Expression(IrNode::number(descriptor.members.len().to_string())),
    )
}

fn build_get_names(_descriptor: &EnumTypeDescriptor) -> IrMethod {
    IrMethod::new(
        &["public", "override"],
        "string[]",
        "GetNames",
        vec![],
        IrBody::Expression(IrNode::id("Names")),
    )
}

/// Scrutinee of the underlying-value switches: the argument explicitly
/// widened/narrowed to the enum's declared integer kind.
fn underlying_scrutinee(descriptor: &EnumTypeDescriptor) -> IrNode {
    IrNode::cast(descriptor.underlying.keyword(), IrNode::id("value"))
}

fn value_label(kind: UnderlyingKind, value: i128) -> IrNode {
    IrNode::number(kind.render_literal(value))
}

/// Out-of-range error for a raw value that is not a declared member. Only
/// reachable when an invalid bit pattern is force-cast into the enum type.
fn out_of_range_throw(descriptor: &EnumTypeDescriptor) -> IrNode {
    IrNode::throw(
        "System.ArgumentOutOfRangeException",
        vec![
            IrNode::string("value"),
            underlying_scrutinee(descriptor),
            IrNode::string(format!(
                "Value is not a defined member of '{}'.",
                descriptor.qualified_name
            )),
        ],
    )
}

fn build_get_name(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let arms = distinct_by_value(descriptor)
        .into_iter()
        .map(|m| IrSwitchArm {
            label: value_label(descriptor.underlying, m.value),
            body: vec![IrNode::ret(IrNode::string(&m.name))],
        })
        .collect();
    IrMethod::new(
        &["public", "override"],
        "string",
        "GetName",
        vec![IrParam::new(&descriptor.qualified_name, "value")],
        IrBody::Block(vec![IrNode::Switch {
            scrutinee: Box::new(underlying_scrutinee(descriptor)),
            arms,
            default_arm: vec![out_of_range_throw(descriptor)],
        }]),
    )
}

/// Membership test: a disjunction over all declared values, accepting any
/// integer-like input widened to `long` by the caller.
fn build_is_defined(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let operand = |value: i128| {
        let left = if descriptor.underlying == UnderlyingKind::U64 {
            IrNode::cast("ulong", IrNode::id("value"))
        } else {
            IrNode::id("value")
        };
        IrNode::binary(left, "==", value_label(descriptor.underlying, value))
    };
    let mut values = distinct_by_value(descriptor).into_iter().map(|m| m.value);
    let expression = match values.next() {
        None => IrNode::id("false"),
        Some(first) => values.fold(operand(first), |acc, value| {
            IrNode::binary(acc, "||", operand(value))
        }),
    };
    IrMethod::new(
        &["public", "override"],
        "bool",
        "IsDefined",
        vec![IrParam::new("long", "value")],
        IrBody::Expression(expression),
    )
}

fn build_parse(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let arms = descriptor
        .members
        .iter()
        .map(|m| IrSwitchArm {
            label: IrNode::string(&m.name),
            body: vec![IrNode::ret(member_ref(descriptor, m))],
        })
        .collect();
    let no_match = IrNode::throw(
        "System.ArgumentException",
        vec![IrNode::binary(
            IrNode::binary(
                IrNode::string("Requested value '"),
                "+",
                IrNode::id("name"),
            ),
            "+",
            IrNode::string(format!(
                "' was not found in enum '{}'.",
                descriptor.qualified_name
            )),
        )],
    );
    IrMethod::new(
        &["public", "override"],
        descriptor.qualified_name.clone(),
        "Parse",
        vec![IrParam::new("string", "name")],
        IrBody::Block(vec![IrNode::Switch {
            scrutinee: Box::new(IrNode::id("name")),
            arms,
            default_arm: vec![no_match],
        }]),
    )
}

fn build_try_parse(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let arms = descriptor
        .members
        .iter()
        .map(|m| IrSwitchArm {
            label: IrNode::string(&m.name),
            body: vec![
                IrNode::stmt(IrNode::assign(IrNode::id("value"), member_ref(descriptor, m))),
                IrNode::ret(IrNode::id("true")),
            ],
        })
        .collect();
    IrMethod::new(
        &["public", "override"],
        "bool",
        "TryParse",
        vec![
            IrParam::new("string", "name"),
            IrParam::out(&descriptor.qualified_name, "value"),
        ],
        IrBody::Block(vec![IrNode::Switch {
            scrutinee: Box::new(IrNode::id("name")),
            arms,
            default_arm: vec![
                IrNode::stmt(IrNode::assign(
                    IrNode::id("value"),
                    IrNode::Default(descriptor.qualified_name.clone()),
                )),
                IrNode::ret(IrNode::id("false")),
            ],
        }]),
    )
}

fn build_to_string_fast(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let arms = distinct_by_value(descriptor)
        .into_iter()
        .map(|m| IrSwitchArm {
            label: value_label(descriptor.underlying, m.value),
            body: vec![IrNode::ret(IrNode::string(&m.name))],
        })
        .collect();
    // Undeclared bit patterns fall back to their numeric text.
    let fallback = IrNode::ret(IrNode::call(
        IrNode::member(underlying_scrutinee(descriptor).paren(), "ToString"),
        vec![],
    ));
    IrMethod::new(
        &["public", "override"],
        "string",
        "ToStringFast",
        vec![IrParam::new(&descriptor.qualified_name, "value")],
        IrBody::Block(vec![IrNode::Switch {
            scrutinee: Box::new(underlying_scrutinee(descriptor)),
            arms,
            default_arm: vec![fallback],
        }]),
    )
}

/// Alias lookup, built only from members carrying an alias payload. A type
/// with zero aliased members gets an unconditional unsupported-operation
/// error, independent of the value passed.
fn build_get_alias_value(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let body = if !descriptor.has_aliases() {
        IrBody::Block(vec![IrNode::throw(
            "System.NotSupportedException",
            vec![IrNode::string(format!(
                "Enum type '{}' declares no member aliases.",
                descriptor.qualified_name
            ))],
        )])
    } else {
        let mut seen: FxHashSet<i128> = FxHashSet::default();
        let arms = descriptor
            .aliased_members()
            .filter(|m| seen.insert(m.value))
            .map(|m| IrSwitchArm {
                label: value_label(descriptor.underlying, m.value),
                body: vec![IrNode::ret(IrNode::string(m.alias.as_deref().unwrap_or("")))],
            })
            .collect();
        // The default arm also catches defined members that simply carry
        // no alias, so it gets its own message rather than the
        // not-a-defined-member one.
        let no_alias = IrNode::throw(
            "System.ArgumentOutOfRangeException",
            vec![
                IrNode::string("value"),
                underlying_scrutinee(descriptor),
                IrNode::string(format!(
                    "Value is not an aliased member of '{}'.",
                    descriptor.qualified_name
                )),
            ],
        );
        IrBody::Block(vec![IrNode::Switch {
            scrutinee: Box::new(underlying_scrutinee(descriptor)),
            arms,
            default_arm: vec![no_alias],
        }])
    };
    IrMethod::new(
        &["public", "override"],
        "string",
        "GetAliasValue",
        vec![IrParam::new(&descriptor.qualified_name, "value")],
        body,
    )
}

/// Flag test. The flags/non-flags branch is taken here, at synthesis time,
/// from the descriptor; the generated code contains only the winning form.
fn build_has_bit_flag(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let keyword = descriptor.underlying.keyword();
    let expression = if descriptor.is_flags {
        IrNode::binary(
            IrNode::binary(
                IrNode::cast(keyword, IrNode::id("value")),
                "&",
                IrNode::cast(keyword, IrNode::id("flag")),
            )
            .paren(),
            "==",
            IrNode::cast(keyword, IrNode::id("flag")),
        )
    } else {
        IrNode::binary(IrNode::id("value"), "==", IrNode::id("flag"))
    };
    IrMethod::new(
        &["public", "override"],
        "bool",
        "HasBitFlag",
        vec![
            IrParam::new(&descriptor.qualified_name, "value"),
            IrParam::new(&descriptor.qualified_name, "flag"),
        ],
        IrBody::Expression(expression),
    )
}

/// Decomposition step for flags types: extract the lowest set bit as the
/// current flag, clear it from the working value, and report whether any
/// bits remain. Each step clears exactly one bit, so iteration terminates.
fn build_next_flag(descriptor: &EnumTypeDescriptor) -> IrMethod {
    let q = &descriptor.qualified_name;
    let body = vec![
        IrNode::VarDecl {
            type_name: "ulong".to_string(),
            name: "bits".to_string(),
            initializer: Some(Box::new(IrNode::cast("ulong", IrNode::id("value")))),
        },
        IrNode::If {
            condition: Box::new(IrNode::binary(IrNode::id("bits"), "==", IrNode::number("0UL"))),
            then_branch: vec![
                IrNode::stmt(IrNode::assign(IrNode::id("flag"), IrNode::Default(q.clone()))),
                IrNode::ret(IrNode::id("false")),
            ],
            else_branch: None,
        },
        // Two's-complement trick: bits & (0 - bits) isolates the lowest bit.
        IrNode::VarDecl {
            type_name: "ulong".to_string(),
            name: "lowest".to_string(),
            initializer: Some(Box::new(IrNode::binary(
                IrNode::id("bits"),
                "&",
                IrNode::binary(IrNode::number("0UL"), "-", IrNode::id("bits")).paren(),
            ))),
        },
        IrNode::stmt(IrNode::assign(
            IrNode::id("flag"),
            IrNode::cast(q, IrNode::id("lowest")),
        )),
        IrNode::stmt(IrNode::assign(
            IrNode::id("value"),
            IrNode::cast(
                q,
                IrNode::binary(
                    IrNode::id("bits"),
                    "&",
                    IrNode::Unary {
                        operator: "~".to_string(),
                        operand: Box::new(IrNode::id("lowest")),
                    },
                )
                .paren(),
            ),
        )),
        IrNode::ret(IrNode::id("true")),
    ];
    IrMethod::new(
        &["public", "override"],
        "bool",
        "NextFlag",
        vec![IrParam::by_ref(q, "value"), IrParam::out(q, "flag")],
        IrBody::Block(body),
    )
}
