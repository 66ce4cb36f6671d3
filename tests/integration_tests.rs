use propstring::{
    display, impl_inspect, to_string, to_string_checked, to_string_with_options, to_writer, Error,
    Inspect, Object, RenderOptions, Sequence, Shape, CYCLE_MARKER, RECURSION_LIMIT_MARKER,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::{Arc, Mutex, RwLock};

struct Person {
    name: String,
    parent: RefCell<Option<Rc<Person>>>,
}

impl_inspect!(struct Person { name, parent });

fn person(name: &str) -> Rc<Person> {
    Rc::new(Person {
        name: name.to_string(),
        parent: RefCell::new(None),
    })
}

struct Node {
    value: i32,
    child: Option<Box<Node>>,
}

impl_inspect!(struct Node { value, child });

fn chain(length: i32) -> Node {
    (1..length).rev().fold(
        Node {
            value: length,
            child: None,
        },
        |child, value| Node {
            value,
            child: Some(Box::new(child)),
        },
    )
}

struct Account {
    owner: &'static str,
    balance: i64,
}

impl Inspect for Account {
    fn classify(&self) -> Shape<'_> {
        Shape::Object(
            Object::new()
                .field("Owner", &self.owner)
                .try_computed("Rate", || Err::<f64, _>("rate service unavailable"))
                .computed("Overdrawn", || -> bool { panic!("ledger locked") })
                .field("Balance", &self.balance),
        )
    }
}

#[test]
fn test_simple_object() {
    let node = Node {
        value: 7,
        child: None,
    };
    assert_eq!(to_string(&node), "{ value: 7, child: null }");
}

#[test]
fn test_two_node_cycle() {
    let a = person("A");
    let b = person("B");
    *a.parent.borrow_mut() = Some(Rc::clone(&b));
    *b.parent.borrow_mut() = Some(Rc::clone(&a));

    assert_eq!(
        to_string(&a),
        r#"{ name: "A", parent: { name: "B", parent: <Circular reference> } }"#
    );
    assert_eq!(
        to_string(&b),
        r#"{ name: "B", parent: { name: "A", parent: <Circular reference> } }"#
    );

    a.parent.borrow_mut().take();
}

#[test]
fn test_one_marker_per_back_edge() {
    let a = person("A");
    let b = person("B");
    *a.parent.borrow_mut() = Some(Rc::clone(&b));
    *b.parent.borrow_mut() = Some(Rc::clone(&a));

    let both = vec![Rc::clone(&a), Rc::clone(&b)];
    let output = to_string(&both);
    assert_eq!(output.matches(CYCLE_MARKER).count(), 2);

    a.parent.borrow_mut().take();
}

struct Locked {
    v: i32,
    back: Option<Arc<Mutex<Locked>>>,
}

impl_inspect!(struct Locked { v, back });

fn locked(v: i32) -> Arc<Mutex<Locked>> {
    Arc::new(Mutex::new(Locked { v, back: None }))
}

struct Shared {
    v: i32,
    back: Option<Arc<RwLock<Shared>>>,
}

impl_inspect!(struct Shared { v, back });

struct Folder {
    name: String,
    parent: RefCell<Weak<Folder>>,
    children: RefCell<Vec<Rc<Folder>>>,
}

impl_inspect!(struct Folder { name, parent, children });

fn folder(name: &str) -> Rc<Folder> {
    Rc::new(Folder {
        name: name.to_string(),
        parent: RefCell::new(Weak::new()),
        children: RefCell::new(Vec::new()),
    })
}

#[test]
fn test_self_cycle_through_mutex() {
    let shared = locked(1);
    shared.lock().unwrap().back = Some(Arc::clone(&shared));

    assert_eq!(to_string(&shared), "{ v: 1, back: <Circular reference> }");

    shared.lock().unwrap().back.take();
}

#[test]
fn test_two_node_cycle_through_mutex() {
    let a = locked(1);
    let b = locked(2);
    a.lock().unwrap().back = Some(Arc::clone(&b));
    b.lock().unwrap().back = Some(Arc::clone(&a));

    assert_eq!(
        to_string(&a),
        "{ v: 1, back: { v: 2, back: <Circular reference> } }"
    );
    let both = vec![Arc::clone(&a), Arc::clone(&b)];
    assert_eq!(to_string(&both).matches(CYCLE_MARKER).count(), 2);

    a.lock().unwrap().back.take();
}

#[test]
fn test_depth_limit_wins_over_cycle_through_mutex() {
    let shared = locked(1);
    shared.lock().unwrap().back = Some(Arc::clone(&shared));

    let options = RenderOptions::new().with_max_recursion_level(Some(0));
    assert_eq!(
        to_string_with_options(&shared, options),
        "{ v: 1, back: <Recursion limit reached> }"
    );

    shared.lock().unwrap().back.take();
}

#[test]
fn test_mutex_held_elsewhere_is_an_error() {
    let shared = locked(1);
    let outer = Locked {
        v: 0,
        back: Some(Arc::clone(&shared)),
    };
    let _guard = shared.lock().unwrap();

    assert_eq!(
        to_string(&outer),
        "{ v: 0, back: <Error: mutex is locked> }"
    );
}

#[test]
fn test_self_cycle_through_rwlock() {
    let shared = Arc::new(RwLock::new(Shared { v: 1, back: None }));
    shared.write().unwrap().back = Some(Arc::clone(&shared));

    assert_eq!(to_string(&shared), "{ v: 1, back: <Circular reference> }");

    shared.write().unwrap().back.take();
}

#[test]
fn test_weak_parent_back_pointer() {
    let root = folder("root");
    let docs = folder("docs");
    *docs.parent.borrow_mut() = Rc::downgrade(&root);
    root.children.borrow_mut().push(Rc::clone(&docs));

    assert_eq!(
        to_string(&root),
        r#"{ name: "root", parent: null, children: [{ name: "docs", parent: <Circular reference>, children: [] }] }"#
    );
    assert_eq!(
        to_string(&docs),
        r#"{ name: "docs", parent: { name: "root", parent: null, children: [<Circular reference>] }, children: [] }"#
    );
}

#[test]
fn test_zero_sized_children_are_bounded_by_depth() {
    struct Fractal;

    impl Inspect for Fractal {
        fn classify(&self) -> Shape<'_> {
            Shape::Object(Object::new().computed("child", || Fractal))
        }
    }

    let options = RenderOptions::new().with_max_recursion_level(Some(3));
    assert_eq!(
        to_string_with_options(&Fractal, options),
        "{ child: { child: { child: { child: <Recursion limit reached> } } } }"
    );
}

#[test]
fn test_depth_limit() {
    let options = RenderOptions::new().with_max_recursion_level(Some(1));
    assert_eq!(
        to_string_with_options(&chain(4), options),
        "{ value: 1, child: { value: 2, child: <Recursion limit reached> } }"
    );

    let options = RenderOptions::new().with_max_recursion_level(Some(0));
    assert_eq!(
        to_string_with_options(&chain(2), options),
        "{ value: 1, child: <Recursion limit reached> }"
    );
}

#[test]
fn test_depth_limit_wins_over_cycle() {
    let a = person("A");
    *a.parent.borrow_mut() = Some(Rc::clone(&a));

    let options = RenderOptions::new().with_max_recursion_level(Some(0));
    assert_eq!(
        to_string_with_options(&a, options),
        r#"{ name: "A", parent: <Recursion limit reached> }"#
    );

    a.parent.borrow_mut().take();
}

#[test]
fn test_default_depth_limit_stops_deep_chains() {
    let output = to_string(&chain(50));
    assert_eq!(output.matches(RECURSION_LIMIT_MARKER).count(), 1);
    assert_eq!(output.matches("value:").count(), 11);
}

#[test]
fn test_sequences_inside_objects_count_towards_depth() {
    let nested = vec![vec![vec![1]]];
    let options = RenderOptions::new().with_max_recursion_level(Some(1));
    assert_eq!(
        to_string_with_options(&nested, options),
        "[[<Recursion limit reached>]]"
    );
}

#[test]
fn test_collection_truncation() {
    let numbers: Vec<i32> = (1..=10).collect();
    let options = RenderOptions::new().with_max_collection_item_count(3);
    assert_eq!(
        to_string_with_options(&numbers, options),
        "[1, 2, 3, +7 more]"
    );

    let options = RenderOptions::new().with_max_collection_item_count(0);
    assert_eq!(to_string_with_options(&numbers, options), "[+10 more]");

    let options = RenderOptions::new().with_max_collection_item_count(10);
    assert_eq!(
        to_string_with_options(&numbers, options),
        "[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]"
    );
}

#[test]
fn test_failing_getters_do_not_abort_siblings() {
    let account = Account {
        owner: "Ann",
        balance: -5,
    };
    assert_eq!(
        to_string(&account),
        r#"{ Owner: "Ann", Rate: <Error: rate service unavailable>, Overdrawn: <Error: panicked: ledger locked>, Balance: -5 }"#
    );
}

#[test]
fn test_failing_sequence_items() {
    struct Flaky;

    impl Inspect for Flaky {
        fn classify(&self) -> Shape<'_> {
            Shape::Sequence(Sequence::fallible((0..5).map(|n| {
                if n == 1 {
                    Err(propstring::FieldError::failed("bad item"))
                } else if n == 3 {
                    Err(propstring::FieldError::broken("stream closed"))
                } else {
                    Ok(propstring::Member::owned(n))
                }
            })))
        }
    }

    assert_eq!(
        to_string(&Flaky),
        "[0, <Error: bad item>, 2, <Error: stream closed>]"
    );
}

#[test]
fn test_panicking_iterator_ends_sequence() {
    struct Exploding;

    impl Inspect for Exploding {
        fn classify(&self) -> Shape<'_> {
            Shape::Sequence(Sequence::owned((0..3).map(|n| {
                if n == 2 {
                    panic!("iterator blew up");
                }
                n
            })))
        }
    }

    assert_eq!(
        to_string(&Exploding),
        "[0, 1, <Error: panicked: iterator blew up>]"
    );
}

#[test]
fn test_panicking_classify_is_contained() {
    struct Broken;

    impl Inspect for Broken {
        fn classify(&self) -> Shape<'_> {
            panic!("no shape")
        }
    }

    assert_eq!(to_string(&vec![Broken]), "[<Error: panicked: no shape>]");
}

#[test]
fn test_null_marker_regardless_of_type() {
    assert_eq!(to_string(&None::<Node>), "null");
    assert_eq!(to_string(&None::<Vec<String>>), "null");
    assert_eq!(to_string(&None::<Rc<RefCell<i32>>>), "null");
}

#[test]
fn test_checked_rejects_null_root() {
    let missing: Option<Rc<Person>> = None;
    let err = to_string_checked(&missing, RenderOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(err.to_string().contains("root value is null"));
}

#[test]
fn test_type_annotations() {
    let options = RenderOptions::new().with_root_actual_type(true);
    assert_eq!(to_string_with_options(&15789632, options), "i32 :: 15789632");

    let node = Node {
        value: 3,
        child: None,
    };
    let options = RenderOptions::typed();
    assert_eq!(
        to_string_with_options(&node, options),
        "Node :: { value (i32): i32 :: 3, child (Option<Box<Node>>): null }"
    );

    let options = RenderOptions::new().with_actual_type(true);
    assert_eq!(
        to_string_with_options(&vec![1u8], options),
        "[u8 :: 1]"
    );
}

#[test]
fn test_complex_properties_disabled() {
    let node = chain(3);
    let options = RenderOptions::new().with_complex_properties(false);
    assert_eq!(
        to_string_with_options(&node, options),
        "{ value: 1, child: Node }"
    );
}

#[test]
fn test_maps_and_pairs() {
    let mut scores = BTreeMap::new();
    scores.insert("ann", vec![1, 2]);
    scores.insert("bob", vec![]);
    assert_eq!(
        to_string(&scores),
        r#"["ann" => [1, 2], "bob" => []]"#
    );
}

#[test]
fn test_shared_child_is_not_a_cycle() {
    let shared = Rc::new(chain(1));
    let siblings = (Rc::clone(&shared), Rc::clone(&shared));
    assert_eq!(
        to_string(&siblings),
        "({ value: 1, child: null }, { value: 1, child: null })"
    );
}

#[test]
fn test_determinism() {
    let a = person("A");
    let b = person("B");
    *a.parent.borrow_mut() = Some(Rc::clone(&b));

    let options = RenderOptions::typed().with_max_collection_item_count(2);
    let first = to_string_with_options(&a, options);
    let second = to_string_with_options(&a, options);
    assert_eq!(first, second);
}

#[test]
fn test_display_and_writer_agree() {
    let node = chain(2);
    let mut buffer = Vec::new();
    to_writer(&mut buffer, &node, RenderOptions::default()).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), display(&node).to_string());
}
