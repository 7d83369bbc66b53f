//! Structural tests for per-type synthesis.
//!
//! Synthesis produces IR, so these tests compare structure rather than
//! generated text: switch arms, table contents, and the flags/non-flags
//! branch selection.

use enumgen_common::CancellationToken;
use enumgen_common::diagnostics::diagnostic_codes;
use enumgen_emitter::{IrBody, IrMember, IrMethod, IrNode, IrSwitchArm, SynthesizedEnum};
use enumgen_symbols::{
    EnumDecl, EnumTypeDescriptor, ProgramSymbolsBuilder, UnderlyingKind, Visibility,
};
use enumgen_synth::{SynthOutcome, synthesize_enum};

fn descriptor_for(decl: EnumDecl) -> EnumTypeDescriptor {
    let mut builder = ProgramSymbolsBuilder::new();
    let id = builder.add_enum(decl);
    builder.finish().enum_descriptor(id).unwrap()
}

fn generated(decl: EnumDecl) -> SynthesizedEnum {
    let descriptor = descriptor_for(decl);
    match synthesize_enum(&descriptor, &CancellationToken::new()).unwrap() {
        SynthOutcome::Generated(synthesized) => synthesized,
        SynthOutcome::Skipped(diag) => panic!("unexpected skip: {diag:?}"),
    }
}

fn method<'a>(synthesized: &'a SynthesizedEnum, name: &str) -> &'a IrMethod {
    synthesized
        .decl
        .find_method(name)
        .unwrap_or_else(|| panic!("method {name} not generated"))
}

/// The switch statement of a block-bodied method.
fn switch_of(method: &IrMethod) -> (&IrNode, &Vec<IrSwitchArm>, &Vec<IrNode>) {
    let IrBody::Block(statements) = &method.body else {
        panic!("{} is not block-bodied", method.name);
    };
    let IrNode::Switch {
        scrutinee,
        arms,
        default_arm,
    } = &statements[0]
    else {
        panic!("{} does not start with a switch", method.name);
    };
    (scrutinee.as_ref(), arms, default_arm)
}

fn color() -> EnumDecl {
    EnumDecl::new("Color")
        .namespace("demo")
        .member("Red", 0)
        .member("Green", 1)
        .member("Blue", 2)
}

fn perm() -> EnumDecl {
    EnumDecl::new("Perm")
        .namespace("demo")
        .flags()
        .member("None", 0)
        .member("Read", 1)
        .member("Write", 2)
        .member("Exec", 4)
}

#[test]
fn values_table_preserves_declaration_order() {
    let synthesized = generated(color());
    let IrMember::Field(values) = &synthesized.decl.members[0] else {
        panic!("first member should be the values table");
    };
    assert_eq!(values.name, "Values");
    let Some(IrNode::ArrayLiteral { elements, .. }) = &values.initializer else {
        panic!("values table should be an array literal");
    };
    let expected: Vec<IrNode> = ["Red", "Green", "Blue"]
        .iter()
        .map(|name| IrNode::member(IrNode::id("demo.Color"), *name))
        .collect();
    assert_eq!(elements, &expected);
}

#[test]
fn get_name_switches_on_the_declared_underlying_kind() {
    let synthesized = generated(color().underlying(UnderlyingKind::U8));
    let (scrutinee, arms, default_arm) = switch_of(method(&synthesized, "GetName"));
    assert_eq!(scrutinee, &IrNode::cast("byte", IrNode::id("value")));
    assert_eq!(arms.len(), 3);
    assert_eq!(arms[0].label, IrNode::number("0"));
    assert_eq!(arms[0].body, vec![IrNode::ret(IrNode::string("Red"))]);
    // unmatched values raise an out-of-range error carrying the raw value
    let IrNode::Throw { exception_type, arguments } = &default_arm[0] else {
        panic!("default arm should throw");
    };
    assert_eq!(exception_type, "System.ArgumentOutOfRangeException");
    assert!(arguments.contains(&IrNode::cast("byte", IrNode::id("value"))));
}

#[test]
fn parse_and_get_name_arms_are_mutual_inverses() {
    let synthesized = generated(color());
    let (_, name_arms, _) = switch_of(method(&synthesized, "GetName"));
    let (_, parse_arms, _) = switch_of(method(&synthesized, "Parse"));

    // Round-trip property: for every member m, Parse(GetName(m)) == m.
    for (name_arm, parse_arm) in name_arms.iter().zip(parse_arms) {
        let IrNode::Return(Some(returned_name)) = &name_arm.body[0] else {
            panic!("GetName arm should return a literal name");
        };
        assert_eq!(&parse_arm.label, returned_name.as_ref());

        let IrNode::Return(Some(returned_member)) = &parse_arm.body[0] else {
            panic!("Parse arm should return a member");
        };
        let IrNode::MemberAccess { member, .. } = returned_member.as_ref() else {
            panic!("Parse arm should return a member reference");
        };
        let IrNode::StringLiteral(name_text) = returned_name.as_ref() else {
            panic!("GetName should return a string literal");
        };
        assert_eq!(member, name_text);
    }
}

#[test]
fn try_parse_mirrors_parse_without_throwing() {
    let synthesized = generated(color());
    let (scrutinee, arms, default_arm) = switch_of(method(&synthesized, "TryParse"));
    assert_eq!(scrutinee, &IrNode::id("name"));
    assert_eq!(
        arms[1].body,
        vec![
            IrNode::stmt(IrNode::assign(
                IrNode::id("value"),
                IrNode::member(IrNode::id("demo.Color"), "Green"),
            )),
            IrNode::ret(IrNode::id("true")),
        ]
    );
    assert_eq!(
        default_arm,
        &vec![
            IrNode::stmt(IrNode::assign(
                IrNode::id("value"),
                IrNode::Default("demo.Color".to_string()),
            )),
            IrNode::ret(IrNode::id("false")),
        ]
    );
}

#[test]
fn is_defined_is_a_disjunction_over_declared_values() {
    let synthesized = generated(color());
    let body = &method(&synthesized, "IsDefined").body;
    let IrBody::Expression(expression) = body else {
        panic!("IsDefined should be expression-bodied");
    };
    // ((value == 0 || value == 1) || value == 2)
    let IrNode::Binary { operator, right, .. } = expression else {
        panic!("IsDefined should be a disjunction");
    };
    assert_eq!(operator, "||");
    assert_eq!(
        right.as_ref(),
        &IrNode::binary(IrNode::id("value"), "==", IrNode::number("2"))
    );
}

#[test]
fn has_bit_flag_is_plain_equality_for_non_flags_types() {
    let synthesized = generated(color());
    let IrBody::Expression(expression) = &method(&synthesized, "HasBitFlag").body else {
        panic!("HasBitFlag should be expression-bodied");
    };
    assert_eq!(
        expression,
        &IrNode::binary(IrNode::id("value"), "==", IrNode::id("flag"))
    );
}

#[test]
fn has_bit_flag_masks_for_flags_types() {
    let synthesized = generated(perm());
    let IrBody::Expression(expression) = &method(&synthesized, "HasBitFlag").body else {
        panic!("HasBitFlag should be expression-bodied");
    };
    assert_eq!(
        expression,
        &IrNode::binary(
            IrNode::binary(
                IrNode::cast("int", IrNode::id("value")),
                "&",
                IrNode::cast("int", IrNode::id("flag")),
            )
            .paren(),
            "==",
            IrNode::cast("int", IrNode::id("flag")),
        )
    );
}

#[test]
fn flag_decomposition_order_matches_the_shared_bit_model() {
    // Read|Write|Exec must decompose lowest bit first, the order the
    // generated NextFlag loop produces.
    let flags: Vec<u128> = enumgen_common::bits::SetBits::new(1 | 2 | 4).collect();
    assert_eq!(flags, vec![1, 2, 4]);

    let descriptor = descriptor_for(perm());
    for flag in flags {
        assert!(descriptor.members.iter().any(|m| m.value == flag as i128));
    }
}

#[test]
fn next_flag_is_generated_only_for_flags_types() {
    let flags = generated(perm());
    assert!(flags.decl.find_method("NextFlag").is_some());

    let plain = generated(color());
    assert!(plain.decl.find_method("NextFlag").is_none());
}

#[test]
fn alias_free_types_get_an_unconditional_unsupported_error() {
    let synthesized = generated(color());
    let IrBody::Block(statements) = &method(&synthesized, "GetAliasValue").body else {
        panic!("GetAliasValue should be block-bodied");
    };
    assert_eq!(statements.len(), 1);
    let IrNode::Throw { exception_type, .. } = &statements[0] else {
        panic!("alias-free type should throw unconditionally");
    };
    assert_eq!(exception_type, "System.NotSupportedException");
}

#[test]
fn alias_lookup_covers_only_aliased_members() {
    let synthesized = generated(
        EnumDecl::new("Status")
            .member_aliased("Active", 0, "active")
            .member("Hidden", 1)
            .member_aliased("Closed", 2, "closed"),
    );
    let (_, arms, default_arm) = switch_of(method(&synthesized, "GetAliasValue"));
    assert_eq!(arms.len(), 2);
    assert_eq!(arms[0].body, vec![IrNode::ret(IrNode::string("active"))]);
    assert_eq!(arms[1].label, IrNode::number("2"));

    // "Hidden" is defined but unaliased and lands in the default arm, so
    // the message must not claim the value is undefined.
    let IrNode::Throw { arguments, .. } = &default_arm[0] else {
        panic!("default arm should throw");
    };
    assert!(
        arguments.contains(&IrNode::string("Value is not an aliased member of 'Status'."))
    );
}

#[test]
fn buffer_overload_checks_capacity_before_copying() {
    let synthesized = generated(color());
    let methods: Vec<&IrMethod> = synthesized
        .decl
        .methods()
        .filter(|m| m.name == "GetValues")
        .collect();
    assert_eq!(methods.len(), 2);
    let buffered = methods[1];
    let IrBody::Block(statements) = &buffered.body else {
        panic!("buffer overload should be block-bodied");
    };
    let IrNode::If { condition, then_branch, .. } = &statements[0] else {
        panic!("buffer overload should check capacity first");
    };
    assert_eq!(
        condition.as_ref(),
        &IrNode::binary(
            IrNode::member(IrNode::id("buffer"), "Length"),
            "<",
            IrNode::number("3"),
        )
    );
    assert!(matches!(&then_branch[0], IrNode::Throw { exception_type, .. }
        if exception_type == "System.ArgumentException"));
    assert_eq!(statements.last(), Some(&IrNode::ret(IrNode::number("3"))));
}

#[test]
fn duplicate_member_values_keep_the_first_declaration() {
    let synthesized = generated(
        EnumDecl::new("Mode")
            .member("Default", 0)
            .member("Fallback", 0)
            .member("Fast", 1),
    );
    let (_, arms, _) = switch_of(method(&synthesized, "GetName"));
    assert_eq!(arms.len(), 2);
    assert_eq!(arms[0].body, vec![IrNode::ret(IrNode::string("Default"))]);

    // the values table still lists every declared member
    let IrMember::Field(values) = &synthesized.decl.members[0] else {
        panic!("values table missing");
    };
    let Some(IrNode::ArrayLiteral { elements, .. }) = &values.initializer else {
        panic!("values table should be an array literal");
    };
    assert_eq!(elements.len(), 3);
}

#[test]
fn wide_unsigned_values_survive_exactly() {
    let synthesized = generated(
        EnumDecl::new("Mask")
            .underlying(UnderlyingKind::U64)
            .member("All", u64::MAX as i128),
    );
    let (scrutinee, arms, _) = switch_of(method(&synthesized, "GetName"));
    assert_eq!(scrutinee, &IrNode::cast("ulong", IrNode::id("value")));
    assert_eq!(arms[0].label, IrNode::number("18446744073709551615UL"));
}

#[test]
fn non_public_enum_yields_one_diagnostic_and_no_subclass() {
    let descriptor = descriptor_for(
        EnumDecl::new("Hidden")
            .namespace("demo")
            .visibility(Visibility::Internal)
            .member("A", 0),
    );
    let outcome = synthesize_enum(&descriptor, &CancellationToken::new()).unwrap();
    let SynthOutcome::Skipped(diag) = outcome else {
        panic!("non-public enum must be skipped");
    };
    assert_eq!(diag.code, diagnostic_codes::NON_PUBLIC_ENUM);
    assert!(diag.message_text.contains("demo.Hidden"));
}

#[test]
fn cancellation_aborts_synthesis() {
    let descriptor = descriptor_for(color());
    let token = CancellationToken::new();
    token.cancel();
    assert!(synthesize_enum(&descriptor, &token).is_err());
}

#[test]
fn dispatcher_subclasses_extend_the_dispatch_base() {
    let synthesized = generated(color());
    assert_eq!(synthesized.dispatcher_name, "Dispatcher_demo_Color");
    assert_eq!(synthesized.decl.name, "Dispatcher_demo_Color");
    assert_eq!(
        synthesized.decl.base.as_deref(),
        Some("EnumDispatcher<demo.Color>")
    );
}
