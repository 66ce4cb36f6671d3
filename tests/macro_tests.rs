use propstring::{impl_inspect, to_string, to_string_with_options, RenderOptions};
use std::collections::HashMap;

struct Address {
    city: String,
    zip: Option<u32>,
}

impl_inspect!(struct Address { city, zip });

struct Customer {
    id: u64,
    address: Address,
    tags: Vec<String>,
    status: Status,
    access: Access,
}

impl_inspect!(struct Customer {
    id,
    address,
    tags,
    status,
    access,
});

enum Status {
    Active,
    Suspended,
}

impl_inspect!(enum Status { Active, Suspended });

struct Access {
    bits: u8,
}

impl_inspect!(flags Access, |a| a.bits, [
    None = 0,
    Read = 1,
    Write = 2,
    Delete = 4,
    Admin = 7,
]);

fn customer() -> Customer {
    Customer {
        id: 42,
        address: Address {
            city: "Oslo".to_string(),
            zip: None,
        },
        tags: vec!["vip".to_string(), "eu".to_string()],
        status: Status::Active,
        access: Access { bits: 3 },
    }
}

#[test]
fn test_nested_struct() {
    assert_eq!(
        to_string(&customer()),
        r#"{ id: 42, address: { city: "Oslo", zip: null }, tags: ["vip", "eu"], status: Active, access: Read, Write }"#
    );
}

#[test]
fn test_enum_describe_when_complex_properties_disabled() {
    let options = RenderOptions::new().with_complex_properties(false);
    assert_eq!(
        to_string_with_options(&customer(), options),
        r#"{ id: 42, address: Address, tags: ["vip", "eu"], status: Active, access: Read, Write }"#
    );
}

#[test]
fn test_flags_prefer_composite_names() {
    assert_eq!(to_string(&Access { bits: 7 }), "Admin");
    assert_eq!(to_string(&Access { bits: 5 }), "Read, Delete");
    assert_eq!(to_string(&Access { bits: 0 }), "None");
    assert_eq!(to_string(&Access { bits: 8 }), "8");
}

#[test]
fn test_enum_in_collections() {
    let mut by_status = HashMap::new();
    by_status.insert("suspended", Status::Suspended);
    assert_eq!(to_string(&by_status), r#"["suspended" => Suspended]"#);
}

#[test]
fn test_member_types_for_macro_fields() {
    let address = Address {
        city: "Rome".to_string(),
        zip: Some(100),
    };
    let options = RenderOptions::new().with_member_type(true);
    assert_eq!(
        to_string_with_options(&address, options),
        r#"{ city (String): "Rome", zip (Option<u32>): 100 }"#
    );
}
