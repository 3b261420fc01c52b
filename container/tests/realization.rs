//! Realization scenarios: phase ordering, idempotence, cycles and views.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use tessel_container::{
    ActionError, ActionResult, CatalogBuilder, Container, ContainerError, RealizationState, TypeId,
};
use tessel_core::{Item, Value};

type Log = Rc<RefCell<Vec<String>>>;

struct Model {
    container: Container<Item>,
    widget: TypeId,
    fancy: TypeId,
    gadget: TypeId,
}

fn model() -> Model {
    let mut builder = CatalogBuilder::new();
    let component = builder.add_type("Component").abstract_type().done().unwrap();
    let widget = builder
        .add_type("Widget")
        .extends("Component")
        .factory(Item::factory)
        .done()
        .unwrap();
    let fancy = builder
        .add_type("FancyWidget")
        .extends("Widget")
        .factory(Item::factory)
        .done()
        .unwrap();
    let gadget = builder
        .add_type("Gadget")
        .extends("Component")
        .factory(Item::factory)
        .done()
        .unwrap();
    let container = Container::builder(Rc::new(builder.build()), component)
        .display_name("components")
        .default_type(widget)
        .build()
        .unwrap();
    Model {
        container,
        widget,
        fancy,
        gadget,
    }
}

fn record(log: &Log, label: &'static str) -> impl Fn(&mut Item) -> ActionResult + 'static {
    let log = Rc::clone(log);
    move |item: &mut Item| -> ActionResult {
        log.borrow_mut().push(format!("{}:{}", label, item.name));
        Ok(())
    }
}

fn set_color(color: &'static str) -> impl Fn(&mut Item) -> ActionResult + 'static {
    move |item: &mut Item| -> ActionResult {
        item.set_attr("color", color);
        Ok(())
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

// ========== TEST: phases apply in fixed order regardless of registration order ==========
#[test]
fn test_phase_order_independent_of_registration_order() {
    // GIVEN rules registered in reverse phase order, two per phase
    let m = model();
    let log: Log = Rc::default();
    m.container.after_each(record(&log, "after1"));
    m.container.all(record(&log, "all1"));
    m.container.create_with("a", record(&log, "create")).unwrap();
    m.container.named("a", record(&log, "named1")).unwrap();
    m.container.before_each(record(&log, "before1"));
    m.container.after_each(record(&log, "after2"));
    m.container.all_of(m.widget, record(&log, "all2"));
    m.container.named("a", record(&log, "named2")).unwrap();
    m.container.before_each_of(m.widget, record(&log, "before2"));

    // WHEN "a" is realized
    m.container.get("a").unwrap();

    // THEN phase order holds, and registration order within each phase
    assert_eq!(
        entries(&log),
        vec![
            "before1:a",
            "before2:a",
            "create:a",
            "named1:a",
            "named2:a",
            "all1:a",
            "all2:a",
            "after1:a",
            "after2:a",
        ]
    );
}

// ========== TEST: create overrides beforeEach, afterEach sees final state ==========
#[test]
fn test_create_action_overrides_before_each_default() {
    // GIVEN a red widget, a blue default and a color check
    let m = model();
    m.container
        .create_typed_with("a", m.widget, set_color("red"))
        .unwrap();
    m.container.before_each(set_color("blue"));
    m.container.after_each(|item| match item.get_attr("color") {
        Some(color) if !color.is_null() => Ok(()),
        _ => Err(ActionError::message("color not set")),
    });

    // WHEN "a" is realized
    let a = m.container.get("a").unwrap().expect("a is declared");

    // THEN the creation action wins and the check passed
    assert_eq!(a.type_id, m.widget);
    assert_eq!(a.get_attr("color"), Some(&Value::String("red".into())));
}

#[test]
fn test_after_each_validation_failure_is_reported() {
    let m = model();
    m.container.create("a").unwrap();
    m.container.after_each(|item| {
        if item.has_attr("color") {
            Ok(())
        } else {
            Err(ActionError::message("color not set"))
        }
    });

    let result = m.container.get("a");

    assert_eq!(
        result.unwrap_err().to_string(),
        "Configuration of 'a' failed during afterEach: color not set"
    );
    assert_eq!(m.container.state("a"), Some(RealizationState::Failed));
}

// ========== TEST: cyclic realization ==========
#[test]
fn test_self_query_during_realization_is_cyclic() {
    // GIVEN an all-rule that looks "a" up while "a" is being configured
    let m = model();
    m.container.create("a").unwrap();
    let handle = m.container.clone();
    m.container.all(move |_| {
        handle.get("a")?;
        Ok(())
    });

    // WHEN "a" is realized
    let result = m.container.get("a");

    // THEN the cycle is reported, and keeps being reported
    assert_eq!(result, Err(ContainerError::cyclic_realization("a")));
    assert_eq!(
        m.container.get("a"),
        Err(ContainerError::cyclic_realization("a"))
    );
}

#[test]
fn test_transitive_cycle_is_detected() {
    // GIVEN "a" needs "b" and "b" needs "a"
    let m = model();
    let a_handle = m.container.clone();
    let b_handle = m.container.clone();
    m.container
        .create_with("a", move |_| {
            a_handle.get("b")?;
            Ok(())
        })
        .unwrap();
    m.container
        .create_with("b", move |_| {
            b_handle.get("a")?;
            Ok(())
        })
        .unwrap();

    // WHEN "a" is realized
    let result = m.container.get("a");

    // THEN both entries fail with the cycle on "a"
    assert_eq!(result, Err(ContainerError::cyclic_realization("a")));
    assert_eq!(m.container.state("a"), Some(RealizationState::Failed));
    assert_eq!(m.container.state("b"), Some(RealizationState::Failed));
}

#[test]
fn test_action_may_realize_other_items() {
    // GIVEN "a" copies the color of "b"
    let m = model();
    let handle = m.container.clone();
    m.container
        .create_with("a", move |item| {
            let b = handle.get("b")?.ok_or_else(|| ActionError::message("b missing"))?;
            if let Some(color) = b.get_attr("color") {
                item.set_attr("color", color.clone());
            }
            Ok(())
        })
        .unwrap();
    m.container.create_with("b", set_color("green")).unwrap();

    // WHEN "a" is realized
    let a = m.container.get("a").unwrap().unwrap();

    // THEN "b" was realized on demand
    assert_eq!(a.get_attr("color"), Some(&Value::String("green".into())));
    assert_eq!(m.container.state("b"), Some(RealizationState::Realized));
}

// ========== TEST: type filters ==========
#[test]
fn test_type_filtered_rule_skips_unrelated_types() {
    let m = model();
    let log: Log = Rc::default();
    m.container.before_each_of(m.gadget, record(&log, "gadget"));
    m.container.after_each_of(m.widget, record(&log, "widget"));
    m.container.create("w").unwrap();
    m.container.create_typed("fw", m.fancy).unwrap();

    m.container.realize_all().unwrap();

    assert_eq!(entries(&log), vec!["widget:w", "widget:fw"]);
}

#[test]
fn test_with_type_keys_is_an_ordered_subset() {
    // GIVEN mixed declarations
    let m = model();
    m.container.create_typed("g1", m.gadget).unwrap();
    m.container.create("w1").unwrap();
    m.container.create_typed("fw", m.fancy).unwrap();
    m.container.create_typed("g2", m.gadget).unwrap();
    m.container.create("w2").unwrap();

    // WHEN projected onto Widget
    let widgets = m.container.with_type(m.widget).keys();

    // THEN exactly the widgets remain, in declaration order
    assert_eq!(widgets, vec!["w1", "fw", "w2"]);
    let all = m.container.keys();
    let expected: Vec<String> = all
        .into_iter()
        .filter(|name| widgets.contains(name))
        .collect();
    assert_eq!(widgets, expected);
}

#[test]
fn test_rules_registered_through_view_apply_everywhere() {
    // GIVEN a rule registered through a widget view with an extra type
    let m = model();
    let log: Log = Rc::default();
    let widgets = m.container.with_type(m.widget);
    widgets.all(record(&log, "widgets"));
    widgets.all_of(m.fancy, record(&log, "fancy"));
    widgets.all_of(m.gadget, record(&log, "never"));
    m.container.create("w").unwrap();
    m.container.create_typed("fw", m.fancy).unwrap();
    m.container.create_typed("g", m.gadget).unwrap();

    // WHEN realized through the container itself
    m.container.realize_all().unwrap();

    // THEN view rules applied with the narrowed filters
    assert_eq!(entries(&log), vec!["widgets:w", "widgets:fw", "fancy:fw"]);
}

// ========== TEST: late registration ==========
#[test]
fn test_rules_added_after_realization_are_not_retroactive() {
    let m = model();
    let log: Log = Rc::default();
    m.container.create("a").unwrap();
    m.container.create("b").unwrap();
    m.container.get("a").unwrap();

    m.container.after_each(record(&log, "late"));
    m.container.realize_all().unwrap();

    assert_eq!(entries(&log), vec!["late:b"]);
}

#[test]
fn test_rule_for_later_phase_added_during_realization_applies() {
    // GIVEN a beforeEach rule that registers an afterEach rule once
    let m = model();
    let log: Log = Rc::default();
    let handle = m.container.clone();
    let late_log = Rc::clone(&log);
    let registered = Rc::new(RefCell::new(false));
    m.container.before_each(move |_| {
        if !registered.replace(true) {
            handle.after_each(record(&late_log, "added"));
        }
        Ok(())
    });
    m.container.create("a").unwrap();

    // WHEN "a" is realized
    m.container.get("a").unwrap();

    // THEN the afterEach phase, which had not started yet, picked it up
    assert_eq!(entries(&log), vec!["added:a"]);
}

// ========== TEST: introspection does not realize ==========
#[test]
fn test_size_and_keys_before_any_get() {
    let m = model();
    let log: Log = Rc::default();
    m.container.before_each(record(&log, "before"));

    m.container.create("x").unwrap();
    m.container.create("y").unwrap();
    m.container.create_typed("z", m.gadget).unwrap();

    assert_eq!(m.container.len(), 3);
    assert_eq!(m.container.keys(), vec!["x", "y", "z"]);
    assert!(m.container.contains_key("z"));
    assert!(entries(&log).is_empty());
    for name in m.container.keys() {
        assert_eq!(m.container.state(&name), Some(RealizationState::Declared));
    }
}

#[test]
fn test_values_in_declaration_order() {
    let m = model();
    m.container.create("b").unwrap();
    m.container.create("a").unwrap();
    m.container.create("c").unwrap();

    let names: Vec<String> = m
        .container
        .values()
        .unwrap()
        .iter()
        .map(|item| item.name.clone())
        .collect();

    assert_eq!(names, vec!["b", "a", "c"]);
}
