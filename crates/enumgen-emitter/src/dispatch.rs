//! Dispatch root emitter.
//!
//! Assembles the generated surface around the per-type dispatchers:
//!
//! - A **stable artifact** (emitted unconditionally) holding the public
//!   generic façade, the abstract dispatch base, and the two-state flags
//!   enumerator struct.
//! - An **aggregated artifact** holding every per-type dispatcher subclass
//!   plus the static resolver: a linear chain of type-identity comparisons
//!   run once per closed instantiation, whose winner is cached in the
//!   base's static `Default` slot and read by all subsequent calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use enumgen_common::names;
use enumgen_symbols::TypeId;

use crate::artifact::GeneratedArtifact;
use crate::ir::{
    IrBody, IrConstructor, IrField, IrMember, IrMethod, IrNode, IrParam, IrProperty, IrTypeDecl,
    IrUnit,
};
use crate::printer::Printer;

/// Hint name of the stable façade/base artifact.
pub const ROOT_ARTIFACT_NAME: &str = "EnumUtility.g.cs";

/// Hint name of the aggregated per-type artifact.
pub const DISPATCHERS_ARTIFACT_NAME: &str = "EnumDispatchers.g.cs";

/// One fully synthesized per-type implementation, ready for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynthesizedEnum {
    pub type_id: TypeId,
    pub qualified_name: String,
    pub dispatcher_name: String,
    pub decl: IrTypeDecl,
}

/// Deterministic subclass name derived from the enum's qualified name.
pub fn dispatcher_class_name(qualified_name: &str) -> String {
    format!("Dispatcher_{}", qualified_name.replace('.', "_"))
}

/// Signature of one dispatch operation, instantiated for an enum type name.
pub struct OperationSig {
    pub name: &'static str,
    pub return_type: String,
    pub params: Vec<IrParam>,
    /// Flags-only operations get a throwing virtual default on the base
    /// instead of an abstract declaration.
    pub flags_only: bool,
}

/// The full dispatch surface over `enum_type` (usually `T` for the base,
/// or a concrete qualified enum name for subclasses).
pub fn dispatch_operations(enum_type: &str) -> Vec<OperationSig> {
    let t = enum_type.to_string();
    vec![
        OperationSig {
            name: "GetValues",
            return_type: format!("{t}[]"),
            params: vec![],
            flags_only: false,
        },
        OperationSig {
            name: "GetValues",
            return_type: "int".to_string(),
            params: vec![IrParam::new(format!("{t}[]"), "buffer")],
            flags_only: false,
        },
        OperationSig {
            name: "GetLength",
            return_type: "int".to_string(),
            params: vec![],
            flags_only: false,
        },
        OperationSig {
            name: "GetNames",
            return_type: "string[]".to_string(),
            params: vec![],
            flags_only: false,
        },
        OperationSig {
            name: "GetName",
            return_type: "string".to_string(),
            params: vec![IrParam::new(&t, "value")],
            flags_only: false,
        },
        OperationSig {
            name: "IsDefined",
            return_type: "bool".to_string(),
            params: vec![IrParam::new("long", "value")],
            flags_only: false,
        },
        OperationSig {
            name: "Parse",
            return_type: t.clone(),
            params: vec![IrParam::new("string", "name")],
            flags_only: false,
        },
        OperationSig {
            name: "TryParse",
            return_type: "bool".to_string(),
            params: vec![IrParam::new("string", "name"), IrParam::out(&t, "value")],
            flags_only: false,
        },
        OperationSig {
            name: "ToStringFast",
            return_type: "string".to_string(),
            params: vec![IrParam::new(&t, "value")],
            flags_only: false,
        },
        OperationSig {
            name: "GetAliasValue",
            return_type: "string".to_string(),
            params: vec![IrParam::new(&t, "value")],
            flags_only: false,
        },
        OperationSig {
            name: "HasBitFlag",
            return_type: "bool".to_string(),
            params: vec![IrParam::new(&t, "value"), IrParam::new(&t, "flag")],
            flags_only: false,
        },
        OperationSig {
            name: "NextFlag",
            return_type: "bool".to_string(),
            params: vec![IrParam::by_ref(&t, "value"), IrParam::out(&t, "flag")],
            flags_only: true,
        },
    ]
}

/// Emit the stable artifact: façade, abstract base, flags enumerator.
///
/// Identical for every program, so it participates unconditionally in the
/// host's incremental cache and never invalidates.
pub fn emit_dispatch_root() -> GeneratedArtifact {
    let unit = IrUnit {
        namespace: names::GENERATED_NAMESPACE.to_string(),
        types: vec![build_facade(), build_dispatch_base(), build_flags_enumerator()],
    };
    GeneratedArtifact::new(ROOT_ARTIFACT_NAME, Printer::print_unit(&unit))
}

/// Emit the aggregated artifact: one subclass per distinct synthesized
/// type, in first-discovery order, followed by the resolver chain in the
/// same order.
pub fn emit_dispatchers(synthesized: &[SynthesizedEnum]) -> GeneratedArtifact {
    debug!(count = synthesized.len(), "emitting dispatcher subclasses");
    let mut types: Vec<IrTypeDecl> = synthesized.iter().map(|s| s.decl.clone()).collect();
    types.push(build_resolver(synthesized));
    let unit = IrUnit {
        namespace: names::GENERATED_NAMESPACE.to_string(),
        types,
    };
    GeneratedArtifact::new(DISPATCHERS_ARTIFACT_NAME, Printer::print_unit(&unit))
}

fn dispatch_base_generic() -> String {
    format!("{}<T>", names::DISPATCH_BASE_NAME)
}

/// `EnumDispatcher<T>.Default.<op>(args)` forwarding expression.
fn forward_call(sig: &OperationSig) -> IrNode {
    let arguments = sig
        .params
        .iter()
        .map(|param| {
            let arg = IrNode::id(&param.name);
            match param.modifier.as_deref() {
                Some("out") => IrNode::OutArg(Box::new(arg)),
                Some("ref") => IrNode::RefArg(Box::new(arg)),
                _ => arg,
            }
        })
        .collect();
    IrNode::call(
        IrNode::member(
            IrNode::member(IrNode::id(dispatch_base_generic()), "Default"),
            sig.name,
        ),
        arguments,
    )
}

fn build_facade() -> IrTypeDecl {
    let mut facade = IrTypeDecl::static_class(names::FACADE_NAME).with_modifiers(&["public"]);
    for sig in dispatch_operations("T") {
        facade = facade.add_method(
            IrMethod::new(
                &["public", "static"],
                sig.return_type.clone(),
                sig.name,
                sig.params.clone(),
                IrBody::Expression(forward_call(&sig)),
            )
            .generic("T")
            .with_constraint("T : struct"),
        );
    }
    // Flag-decomposition construction is façade-only sugar over NextFlag.
    facade.add_method(
        IrMethod::new(
            &["public", "static"],
            format!("{}<T>", names::FLAGS_ENUMERATOR_NAME),
            "AsFlags",
            vec![IrParam::new("T", "value")],
            IrBody::Expression(IrNode::New {
                type_name: format!("{}<T>", names::FLAGS_ENUMERATOR_NAME),
                arguments: vec![IrNode::id("value")],
            }),
        )
        .generic("T")
        .with_constraint("T : struct"),
    )
}

fn build_dispatch_base() -> IrTypeDecl {
    let mut base = IrTypeDecl::class(names::DISPATCH_BASE_NAME)
        .with_modifiers(&["public", "abstract"])
        .with_type_param("T")
        .add_field(IrField::new(
            &["public", "static", "readonly"],
            dispatch_base_generic(),
            "Default",
            Some(IrNode::call(
                IrNode::member(IrNode::id(names::RESOLVER_NAME), "Resolve<T>"),
                vec![],
            )),
        ));
    for sig in dispatch_operations("T") {
        let body = if sig.flags_only {
            // Non-flags dispatchers fall through to this throwing default.
            IrBody::Block(vec![IrNode::throw(
                "System.NotSupportedException",
                vec![IrNode::string(
                    "Flag decomposition requires a [Flags] enum type.",
                )],
            )])
        } else {
            IrBody::Abstract
        };
        let modifiers: &[&str] = if sig.flags_only {
            &["public", "virtual"]
        } else {
            &["public", "abstract"]
        };
        base = base.add_method(IrMethod::new(
            modifiers,
            sig.return_type,
            sig.name,
            sig.params,
            body,
        ));
    }
    base
}

fn build_flags_enumerator() -> IrTypeDecl {
    IrTypeDecl::r#struct(names::FLAGS_ENUMERATOR_NAME)
        .with_modifiers(&["public"])
        .with_type_param("T")
        .add_field(IrField::new(&["private"], "T", "_remaining", None))
        .add_field(IrField::new(&["private"], "T", "_current", None))
        .add(IrMember::Constructor(IrConstructor {
            modifiers: vec!["public".to_string()],
            type_name: names::FLAGS_ENUMERATOR_NAME.to_string(),
            params: vec![IrParam::new("T", "value")],
            body: vec![
                IrNode::stmt(IrNode::assign(IrNode::id("_remaining"), IrNode::id("value"))),
                IrNode::stmt(IrNode::assign(
                    IrNode::id("_current"),
                    IrNode::Default("T".to_string()),
                )),
            ],
        }))
        .add(IrMember::Property(IrProperty {
            modifiers: vec!["public".to_string()],
            type_name: "T".to_string(),
            name: "Current".to_string(),
            getter: IrNode::id("_current"),
        }))
        .add_method(IrMethod::new(
            &["public"],
            "bool",
            "MoveNext",
            vec![],
            IrBody::Expression(IrNode::call(
                IrNode::member(
                    IrNode::member(IrNode::id(dispatch_base_generic()), "Default"),
                    "NextFlag",
                ),
                vec![
                    IrNode::RefArg(Box::new(IrNode::id("_remaining"))),
                    IrNode::OutArg(Box::new(IrNode::id("_current"))),
                ],
            )),
        ))
}

/// Linear type-identity comparison chain, first-discovery order.
///
/// The chain runs once per closed `EnumDispatcher<T>` instantiation (its
/// result lands in the static `Default` slot), so the comparison cost is
/// paid once per distinct enum type used in the whole program.
fn build_resolver(synthesized: &[SynthesizedEnum]) -> IrTypeDecl {
    let mut body: Vec<IrNode> = Vec::with_capacity(synthesized.len() + 1);
    for entry in synthesized {
        body.push(IrNode::If {
            condition: Box::new(IrNode::binary(
                IrNode::TypeOf("T".to_string()),
                "==",
                IrNode::TypeOf(entry.qualified_name.clone()),
            )),
            then_branch: vec![IrNode::ret(IrNode::cast(
                dispatch_base_generic(),
                IrNode::cast(
                    "object",
                    IrNode::New {
                        type_name: entry.dispatcher_name.clone(),
                        arguments: vec![],
                    },
                ),
            ))],
            else_branch: None,
        });
    }
    body.push(IrNode::throw(
        "System.NotSupportedException",
        vec![IrNode::binary(
            IrNode::string("No enum dispatcher was generated for type "),
            "+",
            IrNode::TypeOf("T".to_string()),
        )],
    ));

    // Resolve's type parameter must stay no more constrained than the
    // unconstrained base whose static Default slot instantiates it; the
    // struct constraint lives on the public façade only.
    IrTypeDecl::static_class(names::RESOLVER_NAME)
        .with_modifiers(&["internal"])
        .add_method(
            IrMethod::new(
                &["public", "static"],
                dispatch_base_generic(),
                "Resolve",
                vec![],
                IrBody::Block(body),
            )
            .generic("T"),
        )
}
