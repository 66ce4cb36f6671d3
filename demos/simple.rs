//! Rendering a small object graph.
//!
//! Run with: cargo run --example simple

use propstring::{impl_inspect, to_string, to_string_checked, RenderOptions};
use std::error::Error;

struct User {
    id: u32,
    name: String,
    email: Option<String>,
    roles: Vec<Role>,
}

impl_inspect!(struct User { id, name, email, roles });

enum Role {
    Admin,
    Viewer,
}

impl_inspect!(enum Role { Admin, Viewer });

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: Some("alice@example.com".to_string()),
            roles: vec![Role::Admin, Role::Viewer],
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: None,
            roles: vec![Role::Viewer],
        },
    ];

    println!("{}", to_string(&users));

    let nobody: Option<User> = None;
    println!("{}", to_string(&nobody));
    if let Err(e) = to_string_checked(&nobody, RenderOptions::default()) {
        println!("checked: {}", e);
    }

    Ok(())
}
