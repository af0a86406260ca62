// Metagen
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

mod common;

use common::{CancelOnRead, Fixture};
use metagen_common::{Snapshot, Symbol, SymbolTable, TypeDescriptor, TypeKind, TypedConstant};
use metagen_compiler::stages::{ApplicationPartStage, CompoundTypeAliasStage, SerializerStage, TypeAliasStage, WellKnownTypeIdStage};
use metagen_compiler::{
    AliasEntry, AnalysisStage, CancellationToken, CompoundAliasComponent, DeclaringModuleResolver, GeneratorError, GeneratorResult, InvokableImplementation, MarkerResolver,
    StageContext,
};

fn analyze<S: AnalysisStage>(stage: S, snapshot: &Snapshot) -> GeneratorResult<S::Output> {
    let table = snapshot.table();
    let markers = MarkerResolver::new(table);
    let cancel = CancellationToken::new();
    let modules = DeclaringModuleResolver::new(table, &markers, &cancel).resolve()?;
    let cx = StageContext::new(table, &modules, &markers, &cancel);
    stage.analyze(&cx)
}

#[test]
fn test_generic_type_alias_uses_open_descriptor() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let foo = fixture.generic_class(root, "App", "Foo", &["T"]);
    fixture.alias(foo, "foo-alias");

    let aliases = analyze(TypeAliasStage, &fixture.snapshot()).unwrap();
    assert_eq!(aliases, vec![AliasEntry::new(TypeDescriptor::new("App", "Foo").with_type_parameters(["T"]), "foo-alias")]);
    assert_eq!(aliases[0].type_descriptor.to_string(), "App.Foo<T>");
}

#[test]
fn test_aliases_follow_module_discovery_order() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let lib = fixture.builder.add_module("Lib");
    let lib_type = fixture.class(lib, "Lib", "Widget");
    let app_first = fixture.class(root, "App", "First");
    let app_second = fixture.class(root, "App", "Second");
    fixture.alias(lib_type, "widget");
    fixture.alias(app_second, "second");
    fixture.alias(app_first, "first");
    fixture.declare_through(root, lib_type);

    let aliases: Vec<_> = analyze(TypeAliasStage, &fixture.snapshot()).unwrap().into_iter().map(|entry| entry.alias).collect();
    assert_eq!(aliases, vec!["first", "second", "widget"]);
}

#[test]
fn test_undeclared_module_types_are_not_scanned() {
    let mut fixture = Fixture::new("App");
    let other = fixture.builder.add_module("Other");
    let hidden = fixture.class(other, "Other", "Hidden");
    fixture.alias(hidden, "hidden");

    assert!(analyze(TypeAliasStage, &fixture.snapshot()).unwrap().is_empty());
}

#[test]
fn test_empty_alias_is_invalid() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let foo = fixture.class(root, "App", "Foo");
    fixture.alias(foo, "");

    match analyze(TypeAliasStage, &fixture.snapshot()) {
        Err(GeneratorError::InvalidArgument { attribute, target, .. }) => {
            assert_eq!(attribute, "Alias");
            assert_eq!(target, "type App.Foo");
        }
        other => panic!("expected invalid argument, got {other:?}"),
    }
}

#[test]
fn test_alias_with_type_argument_is_malformed() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let foo = fixture.class(root, "App", "Foo");
    let marker = fixture.markers.alias;
    fixture.builder.add_type_attribute(foo, marker, vec![TypedConstant::Type(foo)]);

    assert!(matches!(
        analyze(TypeAliasStage, &fixture.snapshot()),
        Err(GeneratorError::UnexpectedArgument { expected: "string", .. })
    ));
}

#[test]
fn test_compound_alias_components() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let grain = fixture.class(root, "App", "Grain");
    let invoker = fixture.class(root, "App", "Invoker");
    let marker = fixture.markers.compound_alias;
    fixture.builder.add_type_attribute(
        invoker,
        marker,
        vec![TypedConstant::Array(vec![TypedConstant::string("inv"), TypedConstant::Type(grain), TypedConstant::string("Run")])],
    );

    let entries = analyze(CompoundTypeAliasStage, &fixture.snapshot()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].target, TypeDescriptor::new("App", "Invoker"));
    assert_eq!(
        entries[0].components,
        vec![
            CompoundAliasComponent::Text("inv".to_string()),
            CompoundAliasComponent::Type(TypeDescriptor::new("App", "Grain")),
            CompoundAliasComponent::Text("Run".to_string()),
        ]
    );
}

#[test]
fn test_compound_alias_rejects_empty_and_numeric_components() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let empty = fixture.class(root, "App", "Empty");
    let marker = fixture.markers.compound_alias;
    fixture.builder.add_type_attribute(empty, marker, vec![TypedConstant::Array(vec![])]);
    assert!(matches!(analyze(CompoundTypeAliasStage, &fixture.snapshot()), Err(GeneratorError::InvalidArgument { .. })));

    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let numeric = fixture.class(root, "App", "Numeric");
    let marker = fixture.markers.compound_alias;
    fixture.builder.add_type_attribute(numeric, marker, vec![TypedConstant::string("a"), TypedConstant::Int(1)]);
    assert!(matches!(
        analyze(CompoundTypeAliasStage, &fixture.snapshot()),
        Err(GeneratorError::UnexpectedArgument {
            expected: "string or type reference",
            ..
        })
    ));
}

#[test]
fn test_well_known_ids() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let point = fixture.class(root, "App", "Point");
    let marker = fixture.markers.id;
    fixture.builder.add_type_attribute(point, marker, vec![TypedConstant::Int(42)]);

    let entries = analyze(WellKnownTypeIdStage, &fixture.snapshot()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, 42);
    assert_eq!(entries[0].type_descriptor, TypeDescriptor::new("App", "Point"));
}

#[test]
fn test_well_known_id_out_of_range() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let point = fixture.class(root, "App", "Point");
    let marker = fixture.markers.id;
    fixture.builder.add_type_attribute(point, marker, vec![TypedConstant::Int(-1)]);

    match analyze(WellKnownTypeIdStage, &fixture.snapshot()) {
        Err(GeneratorError::InvalidArgument { details, .. }) => assert!(details.contains("-1")),
        other => panic!("expected invalid argument, got {other:?}"),
    }
}

#[test]
fn test_serializer_classification() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let markers = fixture.markers;

    let record = fixture.class(root, "App", "Record");
    fixture.tag(record, markers.generate_serializer);
    fixture.tag(record, markers.immutable);

    let activated_base = fixture.class(root, "App", "ActivatedBase");
    fixture.tag(activated_base, markers.use_activator);
    let derived = fixture.class(root, "App", "Derived");
    fixture.builder.set_base(derived, activated_base);

    let codec = fixture.class(root, "App", "Codec");
    fixture.tag(codec, markers.register_serializer);
    fixture.tag(codec, markers.register_copier);
    let factory = fixture.class(root, "App", "Factory");
    fixture.tag(factory, markers.register_activator);
    let surrogate = fixture.class(root, "App", "Surrogate");
    fixture.tag(surrogate, markers.register_converter);

    let grain_base = fixture.builder.add_interface(root, "App", "IGrainBase");
    fixture.tag(grain_base, markers.generate_method_serializers);
    let grain = fixture.builder.add_interface(root, "App", "IGrain");
    fixture.builder.implement(grain, grain_base);
    let grain_impl = fixture.class(root, "App", "GrainImpl");
    fixture.builder.implement(grain_impl, grain);

    let result = analyze(SerializerStage, &fixture.snapshot()).unwrap();
    let record = TypeDescriptor::new("App", "Record");
    assert_eq!(result.serializable_types, vec![record.clone()]);
    assert_eq!(result.default_copiers, vec![record]);
    assert_eq!(
        result.activatable_types,
        vec![TypeDescriptor::new("App", "ActivatedBase"), TypeDescriptor::new("App", "Derived")]
    );
    assert_eq!(result.detected_serializers, vec![TypeDescriptor::new("App", "Codec")]);
    assert_eq!(result.detected_copiers, vec![TypeDescriptor::new("App", "Codec")]);
    assert_eq!(result.detected_activators, vec![TypeDescriptor::new("App", "Factory")]);
    assert_eq!(result.detected_converters, vec![TypeDescriptor::new("App", "Surrogate")]);
    assert_eq!(
        result.invokable_interfaces,
        vec![TypeDescriptor::new("App", "IGrainBase"), TypeDescriptor::new("App", "IGrain")]
    );

    let implementation = TypeDescriptor::new("App", "GrainImpl");
    assert_eq!(
        result.invokable_interface_implementations,
        vec![
            InvokableImplementation {
                interface: TypeDescriptor::new("App", "IGrain"),
                implementation: implementation.clone(),
            },
            InvokableImplementation {
                interface: TypeDescriptor::new("App", "IGrainBase"),
                implementation,
            },
        ]
    );
}

#[test]
fn test_optional_markers_may_be_absent() {
    let mut builder = metagen_common::SymbolTableBuilder::new("Minimal");
    let root = builder.root();
    let generate = builder.add_class(root, "Metagen", "GenerateSerializerAttribute");
    builder.add_class(root, "Metagen", "GenerateCodeForDeclaringModuleAttribute");
    let dto = builder.add_type(root, TypeDescriptor::new("Minimal", "Dto"), TypeKind::Struct);
    builder.add_type_attribute(dto, generate, vec![]);

    let result = analyze(SerializerStage, &Snapshot::from_table(builder.build())).unwrap();
    assert_eq!(result.serializable_types, vec![TypeDescriptor::new("Minimal", "Dto")]);
    assert!(result.activatable_types.is_empty());
    assert!(result.invokable_interfaces.is_empty());
}

#[test]
fn test_application_parts_root_first_and_deduplicated() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let lib = fixture.builder.add_module("Lib");
    let widget = fixture.class(lib, "Lib", "Widget");
    fixture.declare_through(root, widget);
    let marker = fixture.markers.application_part;
    fixture.builder.add_module_attribute(root, marker, vec![TypedConstant::string("Shared")]);
    fixture.builder.add_module_attribute(lib, marker, vec![TypedConstant::string("Shared")]);
    fixture.builder.add_module_attribute(lib, marker, vec![TypedConstant::string("App")]);
    fixture.builder.add_module_attribute(lib, marker, vec![TypedConstant::string("Lib")]);

    let parts = analyze(ApplicationPartStage, &fixture.snapshot()).unwrap();
    assert_eq!(parts, vec!["App", "Shared", "Lib"]);
}

#[test]
fn test_missing_required_marker_fails_stage() {
    let mut builder = metagen_common::SymbolTableBuilder::new("Bare");
    let root = builder.root();
    builder.add_class(root, "Metagen", "GenerateCodeForDeclaringModuleAttribute");
    let snapshot = Snapshot::from_table(builder.build());

    assert_eq!(
        analyze(TypeAliasStage, &snapshot),
        Err(GeneratorError::MarkerNotFound {
            metadata_name: "Metagen.AliasAttribute".to_string()
        })
    );
}

#[test]
fn test_cancelled_stage_stops() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    fixture.class(root, "App", "Foo");
    let snapshot = fixture.snapshot();
    let table = snapshot.table();
    let markers = MarkerResolver::new(table);
    let cancel = CancellationToken::new();
    let modules = DeclaringModuleResolver::new(table, &markers, &cancel).resolve().unwrap();
    cancel.cancel();

    let cx = StageContext::new(table, &modules, &markers, &cancel);
    assert_eq!(TypeAliasStage.analyze(&cx), Err(GeneratorError::Cancelled));
}

#[test]
fn test_cancellation_between_declared_types() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let first = fixture.class(root, "App", "First");
    let second = fixture.class(root, "App", "Second");
    let third = fixture.class(root, "App", "Third");
    for ty in [first, second, third] {
        fixture.alias(ty, "alias");
    }
    let cancel = CancellationToken::new();
    let table = CancelOnRead {
        inner: fixture.build(),
        trigger: Symbol::Type(second),
        token: cancel.clone(),
    };

    let markers = MarkerResolver::new(&table);
    let modules = DeclaringModuleResolver::new(&table, &markers, &cancel).resolve().unwrap();
    assert!(!cancel.is_cancelled());

    let cx = StageContext::new(&table, &modules, &markers, &cancel);
    assert_eq!(TypeAliasStage.analyze(&cx), Err(GeneratorError::Cancelled));
    assert!(cancel.is_cancelled());
}

#[test]
fn test_cancellation_between_declaring_modules() {
    let mut fixture = Fixture::new("App");
    let root = fixture.root();
    let a = fixture.builder.add_module("A");
    let a_anchor = fixture.class(a, "A", "Anchor");
    let c = fixture.builder.add_module("C");
    let c_anchor = fixture.class(c, "C", "Anchor");
    fixture.declare_through(root, a_anchor);
    fixture.declare_through(a, c_anchor);

    let cancel = CancellationToken::new();
    let table = CancelOnRead {
        inner: fixture.build(),
        trigger: Symbol::Module(a),
        token: cancel.clone(),
    };
    let markers = MarkerResolver::new(&table);
    assert_eq!(DeclaringModuleResolver::new(&table, &markers, &cancel).resolve(), Err(GeneratorError::Cancelled));

    // Without the trigger the same graph expands fully
    let fresh = CancellationToken::new();
    let set = DeclaringModuleResolver::new(&table.inner, &MarkerResolver::new(&table.inner), &fresh).resolve().unwrap();
    assert_eq!(set.as_slice(), &[table.inner.root_module(), a, c]);
}
