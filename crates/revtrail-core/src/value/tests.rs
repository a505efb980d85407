use super::*;

#[test]
fn refs_compare_by_id_only() {
    let a = Value::Ref(EntityRef::new("Customer", Value::Int(1)));
    let b = Value::Ref(EntityRef::new("Customer", Value::Int(1)));
    let c = Value::Ref(EntityRef::new("Customer", Value::Int(2)));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
}

#[test]
fn composites_compare_structurally() {
    let a = Value::composite([("city", Value::from("Kyiv")), ("zip", Value::from("01001"))]);
    let b = Value::composite([("zip", Value::from("01001")), ("city", Value::from("Kyiv"))]);
    assert_eq!(a, b);
}

#[test]
fn floats_are_usable_as_set_elements() {
    let mut set = std::collections::BTreeSet::new();
    set.insert(Value::Float(Float64::try_new(1.5).unwrap()));
    set.insert(Value::Float(Float64::try_new(1.5).unwrap()));
    set.insert(Value::Float(Float64::try_new(-0.5).unwrap()));
    assert_eq!(set.len(), 2);
}

#[test]
fn non_finite_floats_are_rejected() {
    assert!(Float64::try_new(f64::NAN).is_err());
    assert!(Float64::try_new(f64::INFINITY).is_err());
    assert!(Float64::try_new(0.0).is_ok());
}

#[test]
fn null_is_distinct_from_empty_collection() {
    let null = Value::Null;
    let empty = Value::Set(std::collections::BTreeSet::new());
    assert_ne!(null, empty);
}
