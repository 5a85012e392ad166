use modelgen_schema::{
    ErrorClass, Loaded, RawBatch, ResolveConfig, ResolveError, error::FieldOwner, load,
    node::FieldSource, types::FieldType,
};
use serde_json::json;

fn resolve(batch: serde_json::Value) -> Loaded {
    let batch: RawBatch = serde_json::from_value(batch).expect("fixture should deserialize");

    load(&batch, &ResolveConfig::default())
}

#[test]
fn class_without_id_gets_synthesized_identity() {
    let loaded = resolve(json!({
        "documents": [{ "classes": [{ "name": "Post", "fields": [{ "name": "title", "type": "string" }] }] }]
    }));

    assert!(loaded.errors.is_empty(), "{}", loaded.errors);
    let post = loaded.registry.find("Post").expect("Post is registered");
    let id = post.get_property("id").expect("id is synthesized");
    assert_eq!(id.ty, FieldType::ObjectId);
    assert_eq!(id.source, FieldSource::Identity);
}

#[test]
fn belongs_to_adds_default_foreign_key_to_owner() {
    let loaded = resolve(json!({
        "documents": [{ "classes": [
            { "name": "Post" },
            { "name": "Comment", "belongsTo": [{ "target": "Post" }] }
        ] }]
    }));

    assert!(loaded.errors.is_empty(), "{}", loaded.errors);
    let comment = loaded.registry.find("Comment").expect("Comment is registered");
    let key = comment.get_own_property("post_id").expect("post_id is synthesized");
    assert_eq!(key.ty, FieldType::ObjectId);
    assert!(!key.collection);
}

#[test]
fn polymorphic_has_many_adds_parent_fields_to_target() {
    let loaded = resolve(json!({
        "documents": [{ "classes": [
            { "name": "Image", "hasMany": [{ "target": "Tag", "polymorphic": true }] },
            { "name": "Tag" }
        ] }]
    }));

    assert!(loaded.errors.is_empty(), "{}", loaded.errors);
    let tag = loaded.registry.find("Tag").expect("Tag is registered");
    assert_eq!(tag.get_property("parent_id").map(|f| f.ty), Some(FieldType::ObjectId));
    assert_eq!(tag.get_property("parent_type").map(|f| f.ty), Some(FieldType::String));
}

#[test]
fn single_table_siblings_share_parent_storage() {
    let loaded = resolve(json!({
        "documents": [
            { "classes": [{ "name": "Animal" }] },
            { "classes": [
                { "name": "Dog", "base": "Animal", "fields": [{ "name": "type", "type": "string" }] },
                { "name": "Cat", "base": "Animal", "fields": [{ "name": "type", "type": "string" }] }
            ] }
        ]
    }));

    assert!(loaded.errors.is_empty(), "{}", loaded.errors);
    let animal = loaded.registry.find("Animal").expect("Animal is registered");
    for name in ["Dog", "Cat"] {
        let class = loaded.registry.find(name).expect("class is registered");
        assert_eq!(class.storage_name(), animal.storage_name(), "{name}");
    }
    assert_eq!(
        loaded
            .registry
            .find_by_storage_name(animal.storage_name())
            .map(|c| c.name().to_string()),
        Some("Animal".to_string())
    );
}

#[test]
fn missing_base_is_the_only_error() {
    let loaded = resolve(json!({
        "documents": [{ "classes": [
            { "name": "X", "base": "Y", "fields": [{ "name": "label", "type": "string" }] },
            { "name": "Z", "belongsTo": [{ "target": "X" }] }
        ] }]
    }));

    assert_eq!(
        loaded.errors.to_vec(),
        vec![ResolveError::BaseNotFound {
            class: "X".into(),
            base: "Y".into(),
        }]
    );
    assert!(loaded.into_result().is_err());
}

#[test]
fn two_mixins_declaring_the_same_field_clash() {
    let loaded = resolve(json!({
        "documents": [{
            "mixins": [
                { "name": "audit", "fields": [{ "name": "notes", "type": "string" }] },
                { "name": "memo", "fields": [{ "name": "notes", "type": "string" }] }
            ],
            "classes": [{ "name": "Ticket", "includes": ["audit", "memo"] }]
        }]
    }));

    assert_eq!(
        loaded.errors.to_vec(),
        vec![ResolveError::DuplicateField {
            owner: FieldOwner::Class("Ticket".into()),
            field: "notes".into(),
            first: FieldSource::Mixin("audit".into()),
            second: FieldSource::Mixin("memo".into()),
        }]
    );
    assert_eq!(loaded.errors.count(ErrorClass::Duplication), 1);
}

#[test]
fn independent_problems_are_all_reported() {
    let loaded = resolve(json!({
        "documents": [{ "classes": [
            { "name": "A", "base": "B" },
            { "name": "B", "base": "A" },
            { "name": "C", "belongsTo": [{ "target": "Nowhere" }] },
            { "name": "D", "keyFieldNames": ["missing"] },
            { "name": "E", "table": "shared" },
            { "name": "F", "table": "shared" }
        ] }]
    }));

    let classes: Vec<ErrorClass> = loaded.errors.iter().map(ResolveError::class).collect();
    assert_eq!(
        classes,
        vec![
            ErrorClass::Reference,
            ErrorClass::Consistency,
            ErrorClass::Reference,
            ErrorClass::Consistency,
        ]
    );
    // the cycle was cut, so the registry is still walkable
    for class in loaded.registry.all() {
        assert!(class.ancestors().count() < loaded.registry.len());
    }
}

#[test]
fn mixin_shared_by_parent_and_child_resolves() {
    let loaded = resolve(json!({
        "documents": [{
            "mixins": [{ "name": "audit", "fields": [{ "name": "created_at", "type": "datetime" }] }],
            "classes": [
                { "name": "Node", "includes": ["audit"], "fields": [{ "name": "type", "type": "string" }] },
                { "name": "Leaf", "base": "Node", "includes": ["audit"], "fields": [{ "name": "type", "type": "string" }] }
            ]
        }]
    }));

    assert!(loaded.errors.is_empty(), "{}", loaded.errors);
    let node = loaded.registry.find("Node").expect("Node is registered");
    let leaf = loaded.registry.find("Leaf").expect("Leaf is registered");
    assert!(std::sync::Arc::ptr_eq(
        node.get_property("created_at").expect("mixin field"),
        leaf.get_property("created_at").expect("inherited mixin field"),
    ));
    assert!(leaf.is_sti());
    assert_eq!(leaf.storage_name(), "tpt_nodes");
}

#[test]
fn display_metadata_reaches_the_registry() {
    let loaded = resolve(json!({
        "documents": [{ "classes": [{
            "name": "Device",
            "label": "Device",
            "index_label": "All devices",
            "primaryKey": ["serial"],
            "fields": [
                { "name": "serial", "type": "string", "label": "Serial", "format": "upper" },
                { "name": "location", "type": "map", "embedded": true, "description": "Rack position" }
            ]
        }] }]
    }));

    assert!(loaded.errors.is_empty(), "{}", loaded.errors);
    let device = loaded.registry.find("Device").expect("Device is registered");
    assert_eq!(device.labels().label.as_deref(), Some("Device"));
    assert_eq!(device.labels().index.as_deref(), Some("All devices"));
    assert_eq!(device.labels().edit, None);

    let serial = device.get_property("serial").expect("serial is declared");
    assert_eq!(serial.label.as_deref(), Some("Serial"));
    assert_eq!(serial.format.as_deref(), Some("upper"));

    let location = device.get_property("location").expect("location is declared");
    assert!(location.is_embedded());
    assert_eq!(location.description.as_deref(), Some("Rack position"));

    let keys: Vec<_> = device.keys().iter().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["(serial)"]);
}
