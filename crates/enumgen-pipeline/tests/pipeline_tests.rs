//! End-to-end pipeline tests over in-memory fixture programs.

use std::sync::Arc;

use enumgen_common::CancellationToken;
use enumgen_common::diagnostics::diagnostic_codes;
use enumgen_emitter::{DISPATCHERS_ARTIFACT_NAME, ROOT_ARTIFACT_NAME};
use enumgen_pipeline::db::{EnumGenDatabase, EnumGenDatabaseImpl};
use enumgen_pipeline::{GenerationOutput, run_pipeline, run_pipeline_parallel};
use enumgen_symbols::{EnumDecl, ProgramSymbols, ProgramSymbolsBuilder, Visibility};

fn fixture_program() -> ProgramSymbols {
    let mut builder = ProgramSymbolsBuilder::new();
    let color = builder.add_enum(
        EnumDecl::new("Color")
            .namespace("app")
            .member("Red", 0)
            .member("Green", 1)
            .member("Blue", 2),
    );
    let perm = builder.add_enum(
        EnumDecl::new("Perm")
            .namespace("app")
            .flags()
            .member("None", 0)
            .member("Read", 1)
            .member("Write", 2),
    );
    // Color is referenced twice; the pipeline must still generate it once.
    builder.add_call_site("GetValues", [color]);
    builder.add_call_site("GetName", [color]);
    builder.add_call_site("AsFlags", [perm]);
    builder.finish()
}

fn run(symbols: &ProgramSymbols) -> GenerationOutput {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("enumgen=debug")
        .with_test_writer()
        .try_init();
    run_pipeline(symbols, &CancellationToken::new()).unwrap()
}

#[test]
fn generates_one_dispatcher_per_distinct_type() {
    let output = run(&fixture_program());
    let dispatchers = output.artifact(DISPATCHERS_ARTIFACT_NAME).unwrap();

    assert_eq!(
        dispatchers
            .text
            .matches("class Dispatcher_app_Color").count(),
        1
    );
    assert_eq!(
        dispatchers.text.matches("class Dispatcher_app_Perm").count(),
        1
    );
    assert!(output.diagnostics.is_empty());
}

#[test]
fn root_artifact_is_emitted_even_without_discovered_types() {
    let symbols = ProgramSymbolsBuilder::new().finish();
    let output = run(&symbols);

    let root = output.artifact(ROOT_ARTIFACT_NAME).unwrap();
    assert!(root.text.contains("static class EnumUtility"));
    assert!(root.text.contains("abstract class EnumDispatcher<T>"));

    // the dispatchers artifact exists too, with an empty resolver
    let dispatchers = output.artifact(DISPATCHERS_ARTIFACT_NAME).unwrap();
    assert!(!dispatchers.text.contains("class Dispatcher_"));
}

#[test]
fn root_artifact_is_identical_regardless_of_program_content() {
    let empty = ProgramSymbolsBuilder::new().finish();
    let with_enums = fixture_program();

    let root_a = run(&empty).artifact(ROOT_ARTIFACT_NAME).unwrap().clone();
    let root_b = run(&with_enums)
        .artifact(ROOT_ARTIFACT_NAME)
        .unwrap()
        .clone();
    assert_eq!(root_a, root_b);
}

#[test]
fn marker_attribute_discovers_types_without_call_sites() {
    let mut builder = ProgramSymbolsBuilder::new();
    builder.add_enum(
        EnumDecl::new("Level")
            .namespace("app")
            .marked()
            .member("Low", 0)
            .member("High", 1),
    );
    let output = run(&builder.finish());

    let dispatchers = output.artifact(DISPATCHERS_ARTIFACT_NAME).unwrap();
    assert!(dispatchers.text.contains("class Dispatcher_app_Level"));
}

#[test]
fn non_public_enum_is_reported_and_skipped_without_stopping_the_run() {
    let mut builder = ProgramSymbolsBuilder::new();
    let hidden = builder.add_enum(
        EnumDecl::new("Hidden")
            .namespace("app")
            .visibility(Visibility::Internal)
            .member("A", 0),
    );
    let color = builder.add_enum(EnumDecl::new("Color").namespace("app").member("Red", 0));
    builder.add_call_site("Parse", [hidden]);
    builder.add_call_site("Parse", [color]);
    let output = run(&builder.finish());

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, diagnostic_codes::NON_PUBLIC_ENUM);
    assert!(output.diagnostics[0].message_text.contains("app.Hidden"));

    let dispatchers = output.artifact(DISPATCHERS_ARTIFACT_NAME).unwrap();
    assert!(!dispatchers.text.contains("Dispatcher_app_Hidden"));
    assert!(dispatchers.text.contains("Dispatcher_app_Color"));
}

#[test]
fn repeated_runs_produce_byte_identical_output() {
    let symbols = fixture_program();
    let first = run(&symbols);
    let second = run(&symbols);
    assert_eq!(first, second);
}

#[test]
fn parallel_driver_matches_sequential_output() {
    let mut builder = ProgramSymbolsBuilder::new();
    for i in 0..16 {
        let id = builder.add_enum(
            EnumDecl::new(format!("E{i}"))
                .namespace("bulk")
                .member("A", 0)
                .member("B", 1),
        );
        builder.add_call_site("ToStringFast", [id]);
    }
    let symbols = builder.finish();

    let sequential = run(&symbols);
    let parallel = run_pipeline_parallel(&symbols, &CancellationToken::new()).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn cancellation_aborts_both_drivers() {
    let symbols = fixture_program();
    let token = CancellationToken::new();
    token.cancel();

    assert!(run_pipeline(&symbols, &token).is_err());
    assert!(run_pipeline_parallel(&symbols, &token).is_err());
}

#[test]
fn salsa_database_matches_the_direct_driver() {
    let symbols = fixture_program();
    let expected = run(&symbols);

    let db = EnumGenDatabaseImpl::new(Arc::new(symbols));
    assert_eq!(db.generation_output().as_ref(), &expected);
}

#[test]
fn salsa_memoizes_the_generation_output() {
    let db = EnumGenDatabaseImpl::new(Arc::new(fixture_program()));

    let first = db.generation_output();
    let second = db.generation_output();
    // memoized queries hand back the same stored value
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn salsa_recomputes_after_a_snapshot_update() {
    let mut db = EnumGenDatabaseImpl::new(Arc::new(fixture_program()));
    let before = db.generation_output();
    assert!(
        !before
            .artifact(DISPATCHERS_ARTIFACT_NAME)
            .unwrap()
            .text
            .contains("Dispatcher_app_Late")
    );

    let mut builder = ProgramSymbolsBuilder::new();
    let late = builder.add_enum(EnumDecl::new("Late").namespace("app").member("A", 0));
    builder.add_call_site("IsDefined", [late]);
    db.update_symbols(Arc::new(builder.finish()));

    let after = db.generation_output();
    assert!(
        after
            .artifact(DISPATCHERS_ARTIFACT_NAME)
            .unwrap()
            .text
            .contains("Dispatcher_app_Late")
    );
}

#[test]
fn generation_output_round_trips_through_serde() {
    let output = run(&fixture_program());
    let json = serde_json::to_string(&output).unwrap();
    let back: GenerationOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(output, back);
}
