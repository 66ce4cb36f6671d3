//! Limits, annotations and cyclic graphs.
//!
//! Run with: cargo run --example custom_options

use propstring::{display, impl_inspect, to_string_with_options, RenderOptions};
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

struct Employee {
    name: String,
    manager: RefCell<Option<Rc<Employee>>>,
    reports: RefCell<Vec<Rc<Employee>>>,
}

impl_inspect!(struct Employee { name, manager, reports });

fn employee(name: &str) -> Rc<Employee> {
    Rc::new(Employee {
        name: name.to_string(),
        manager: RefCell::new(None),
        reports: RefCell::new(Vec::new()),
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let lead = employee("Grace");
    for name in ["Ada", "Linus", "Barbara", "Ken"] {
        let report = employee(name);
        *report.manager.borrow_mut() = Some(Rc::clone(&lead));
        lead.reports.borrow_mut().push(report);
    }

    // Cycles between manager and reports are cut with a marker
    println!("Default:");
    println!("{}\n", display(&lead));

    println!("At most two reports:");
    let options = RenderOptions::new().with_max_collection_item_count(2);
    println!("{}\n", to_string_with_options(&lead, options));

    println!("One level deep:");
    let options = RenderOptions::new().with_max_recursion_level(Some(1));
    println!("{}\n", to_string_with_options(&lead, options));

    println!("Nested objects as type names:");
    let options = RenderOptions::new().with_complex_properties(false);
    println!("{}\n", to_string_with_options(&lead, options));

    println!("Typed:");
    let options = RenderOptions::typed().with_max_collection_item_count(1);
    println!("{}\n", to_string_with_options(&lead, options));

    // Options can come from a config file
    let options: RenderOptions =
        serde_json::from_str(r#"{ "max_collection_item_count": 0, "render_root_actual_type": true }"#)?;
    println!("From JSON config:");
    println!("{}", to_string_with_options(&lead, options));

    lead.reports.borrow_mut().clear();
    Ok(())
}
