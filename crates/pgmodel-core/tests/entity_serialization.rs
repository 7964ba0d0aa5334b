use pgmodel_core::{Column, Entity, NullStyle, TableRef, TypeRequest, resolve_type};

fn users() -> Entity {
    let mut entity = Entity::for_table(TableRef::new("public", "users"));
    let request = TypeRequest {
        source_type: "int4",
        nullable: false,
        is_array: false,
        dimensions: 0,
        is_enum: false,
    };
    let resolved = resolve_type(&request, NullStyle::Pointer).expect("resolve int4");
    let mut id = Column::new("id", "int4", resolved);
    id.is_primary_key = true;
    entity.add_column(id);
    entity
}

#[test]
fn serializes_entity_deterministically() {
    let first = serde_json::to_string_pretty(&users()).expect("serialize entity");
    let second = serde_json::to_string_pretty(&users()).expect("serialize entity");
    assert_eq!(first, second);

    let json: serde_json::Value = serde_json::from_str(&first).expect("parse entity json");
    assert_eq!(json["schema"], "public");
    assert_eq!(json["name"], "users");
    assert_eq!(json["generated_name"], "User");
    assert!(json.get("names").is_none(), "name index must not be serialized");

    let id = &json["columns"][0];
    assert_eq!(id["target_name"], "ID");
    assert_eq!(id["target_type"], "int");
    assert_eq!(id["resolved_type"]["kind"], "known");
    assert_eq!(id["resolved_type"]["descriptor"]["base"], "int");
    assert_eq!(
        id["resolved_type"]["descriptor"]["nullability"]["kind"],
        "not_null"
    );
}
