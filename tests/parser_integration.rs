//! End-to-end scenarios: a parser wired to real file storage, change
//! handlers reacting the way a presentation layer would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use argform::{ArgKind, Argument, ArgumentBuilder, FileStorage, Parser, Storage, Value};

fn settings_parser(path: &std::path::Path) -> Parser {
    Parser::with_storage(Box::new(FileStorage::open(path).unwrap()))
}

#[test]
fn test_full_session() {
    let mut parser = Parser::new();

    parser.add("name", "Marcus").unwrap();
    parser.add("age", 33).unwrap();
    parser.add("height", 1.87).unwrap();
    parser.add("alive", true).unwrap();
    parser
        .add_with(
            Argument::enumeration("class")
                .items(["Ranger", "Warrior", "Sorcerer", "Monk"])
                .default(2)
                .help("Your class"),
        )
        .unwrap();
    parser.add_with(Argument::separator("details")).unwrap();
    parser
        .add_with(Argument::double3("offset").default((0.0, 0.0, 0.0)))
        .unwrap();
    parser.add_with(Argument::button("apply")).unwrap();

    assert_eq!(parser.len(), 8);
    assert_eq!(
        parser.find("class").unwrap().read().unwrap(),
        Value::Str("Sorcerer".into())
    );

    // A handler that toggles reset affordances is the common consumer.
    let changes = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&changes);
    parser
        .changed()
        .connect(move |arg| log.borrow_mut().push(arg.name().to_string()));

    parser.find("age").unwrap().write(41).unwrap();
    parser
        .find("offset")
        .unwrap()
        .write((1.5, -2.0, 3.25))
        .unwrap();
    parser.find("apply").unwrap().write(()).unwrap();

    assert_eq!(*changes.borrow(), vec!["age", "offset", "apply"]);
    assert!(parser.reset_visible("age").unwrap());
    assert_eq!(
        parser.find("offset").unwrap().read().unwrap(),
        Value::Float3([1.5, -2.0, 3.25])
    );
}

#[test]
fn test_persisted_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    // First session: the host saves edits on change.
    {
        let mut parser = settings_parser(&path);
        parser.add("name", "Marcus").unwrap();
        parser.add("age", 33).unwrap();

        let store = Rc::new(RefCell::new(FileStorage::open(&path).unwrap()));
        let sink = Rc::clone(&store);
        parser.changed().connect(move |arg| {
            sink.borrow_mut()
                .set_value(arg.name(), &arg.read().unwrap())
                .unwrap();
        });

        parser.find("name").unwrap().write("Lena").unwrap();
        parser.find("age").unwrap().write(41).unwrap();
    }

    // Second session: stored values override the declared defaults.
    {
        let mut parser = settings_parser(&path);
        let name = parser.add("name", "Marcus").unwrap();
        let age = parser.add("age", 33).unwrap();

        assert_eq!(name.read().unwrap(), Value::Str("Lena".into()));
        assert_eq!(age.read().unwrap(), Value::Int(41));
        // Overrides replace the default, so nothing counts as edited.
        assert!(!name.is_edited().unwrap());
        assert!(!age.is_edited().unwrap());
    }

    // Third session: clearing wipes the overrides.
    {
        let mut parser = settings_parser(&path);
        parser.clear().unwrap();
        let name = parser.add("name", "Marcus").unwrap();
        assert_eq!(name.read().unwrap(), Value::Str("Marcus".into()));
    }
}

#[test]
fn test_string_encoded_bool_from_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    {
        let mut store = FileStorage::open(&path).unwrap();
        store
            .set_value("alive", &Value::Str("true".into()))
            .unwrap();
    }

    let mut parser = settings_parser(&path);
    let alive = parser.add("alive", false).unwrap();
    assert_eq!(alive.read().unwrap(), Value::Bool(true));
}

#[test]
fn test_handler_mutating_other_arguments() {
    // A changed handler that writes other arguments re-enters the
    // notification chain synchronously; nothing may deadlock or skip.
    let mut parser = Parser::new();
    parser.add("mirrorSource", "").unwrap();
    let mirror = parser.add("mirrorTarget", "").unwrap();

    parser.changed().connect(move |arg| {
        if arg.name() == "mirrorSource" {
            mirror.write(arg.read().unwrap()).unwrap();
        }
    });

    let events = Rc::new(Cell::new(0));
    let counter = Rc::clone(&events);
    parser.changed().connect(move |_| counter.set(counter.get() + 1));

    parser
        .find("mirrorSource")
        .unwrap()
        .write("hello")
        .unwrap();

    assert_eq!(
        parser.find("mirrorTarget").unwrap().read().unwrap(),
        Value::Str("hello".into())
    );
    // Two aggregate events: the target (from inside the first handler),
    // then the source completing its own delivery.
    assert_eq!(events.get(), 2);
}

#[test]
fn test_pre_built_arguments_in_order() {
    let mut parser = Parser::new();
    parser
        .add_arguments([
            Argument::string("name").help("Your name").build(),
            Argument::integer("age").help("Your age").build(),
            Argument::float("height").help("Your height").build(),
            Argument::boolean("alive").help("Your state").build(),
        ])
        .unwrap();

    let labels: Vec<&str> = parser.iter().map(|arg| arg.label()).collect();
    assert_eq!(labels, vec!["Name", "Age", "Height", "Alive"]);

    // Equality against plain names, as consumers match signals.
    let first = parser.iter().next().unwrap().clone();
    assert_eq!(first, "name");
}

#[test]
fn test_tristate_round_trip_through_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    {
        let mut store = FileStorage::open(&path).unwrap();
        store.set_value("review", &Value::Str("2".into())).unwrap();
    }

    let mut parser = settings_parser(&path);
    let review = parser
        .add_with(ArgumentBuilder::new(ArgKind::Tristate, "review"))
        .unwrap();
    assert_eq!(review.read().unwrap(), Value::Int(2));
}
