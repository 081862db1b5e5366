use std::cmp::Ordering;
use std::thread;

use doc_element::{
    compare, element_hash, fingerprint, parse, to_binary, ArrayValue, Document, ElementValue,
    Number, ObjectValue, TextNavigator,
};

fn numbers(values: &[f64]) -> ElementValue<'static> {
    ElementValue::Array(values.iter().map(|&v| ElementValue::from(v)).collect())
}

#[test]
fn lazy_text_array_matches_eager_array() {
    let nav = TextNavigator::parse("[1,2,3]").unwrap();
    let lazy = ElementValue::from_navigator(&nav);
    let eager = numbers(&[1.0, 2.0, 3.0]);
    assert!(lazy.is_lazy());
    assert_eq!(lazy, eager);
    assert_eq!(element_hash(&lazy), element_hash(&eager));
}

#[test]
fn object_lookup_by_key() {
    let doc = Document::parse(r#"{"a":1,"b":2}"#).unwrap();
    let object = doc.root_as::<ObjectValue>().unwrap();
    assert_eq!(object.get("a"), Some(ElementValue::Number(Number::Number64(1.0))));
    assert_eq!(object.get_as::<Number>("b"), Some(Number::Number64(2.0)));
    assert_eq!(object.get("c"), None);
    assert!(!object.contains_key("c"));
}

#[test]
fn independent_parses_share_a_fingerprint() {
    let text = r#"{"x":[true,null,"s"]}"#;
    let first = Document::parse(text).unwrap();
    let second = Document::from_buffer(text.as_bytes()).unwrap();
    assert_eq!(fingerprint(&first.root()), fingerprint(&second.root()));
    assert_eq!(compare(&first.root(), &second.root()), Ordering::Equal);

    let packed = to_binary(&first.root());
    let binary = Document::from_buffer(&packed).unwrap();
    assert_eq!(fingerprint(&binary.root()), fingerprint(&first.root()));
}

#[test]
fn invalid_text_is_a_failure_value() {
    let err = parse("{invalid").unwrap_err();
    assert!(err.is_malformed());
    assert!(Document::parse("{invalid").is_err());
}

#[test]
fn array_order_matters() {
    let a = numbers(&[1.0, 2.0]);
    let b = numbers(&[2.0, 1.0]);
    assert_eq!(a.as_array().map(ArrayValue::len), b.as_array().map(ArrayValue::len));
    assert_ne!(a.as_array().unwrap().item_at(0), b.as_array().unwrap().item_at(0));
    assert_ne!(a, b);
    assert_ne!(fingerprint(&a), fingerprint(&b));
    assert_ne!(compare(&a, &b), Ordering::Equal);
}

#[test]
fn typed_lookup_distinguishes_absent_and_mismatched() {
    let doc = Document::parse(r#"{"s": "text", "n": 4, "o": {"k": []}}"#).unwrap();
    let object = doc.root_as::<ObjectValue>().unwrap();
    assert_eq!(object.get_as::<String>("missing"), None);
    assert_eq!(object.get_as::<String>("n"), None);
    assert_eq!(object.get_as::<String>("s").as_deref(), Some("text"));
    assert_eq!(object.get_as::<bool>("s"), None);
    let inner = object.get_as::<ObjectValue>("o").unwrap();
    assert!(inner.get_as::<ArrayValue>("k").is_some_and(|k| k.is_empty()));
}

#[test]
fn lazy_values_are_shared_across_threads() {
    let text = r#"[{"id": 0}, {"id": 1}, {"id": 2}, {"id": 3}]"#;
    let text_doc = Document::parse(text).unwrap();
    let packed = to_binary(&text_doc.root());
    let binary_doc = Document::from_buffer(&packed).unwrap();

    for doc in [&text_doc, &binary_doc] {
        let root = doc.root_as::<ArrayValue>().unwrap();
        let sums: Vec<f64> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let root = &root;
                    scope.spawn(move || {
                        root.iter()
                            .skip(t)
                            .filter_map(|item| item.as_object()?.get_as::<Number>("id"))
                            .map(|n| n.as_f64())
                            .sum::<f64>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(sums, [6.0, 6.0, 5.0, 3.0]);
    }
}

#[test]
fn eager_copies_outlive_their_input() {
    let eager = {
        let text = String::from(r#"{"keep": ["me"]}"#);
        let doc = Document::parse(&text).unwrap();
        let root = doc.root().to_eager();
        root
    };
    assert!(!eager.is_lazy());
    assert_eq!(
        eager,
        ElementValue::Object(ObjectValue::new([(
            "keep",
            ElementValue::Array(ArrayValue::new([ElementValue::from("me")]))
        )]))
    );
}
