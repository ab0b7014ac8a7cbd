//! Disposing Commands
//!
//! - Cascading disposal of subtrees
//! - Alias and shortcut cleanup
//! - Scope teardown

use crate::*;
use cmdtree::ShortcutOptions;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_dispose_commands() {
    let (app, scope) = setup();
    let foo = scope.command("foo").unwrap();
    let bar = scope.subcommand(&foo, "bar").unwrap();
    let test = scope.subcommand(&bar, "test").unwrap();
    bar.alias("baz")
        .unwrap()
        .shortcut("1", ShortcutOptions::default())
        .unwrap();
    test.alias("it")
        .unwrap()
        .shortcut("2", ShortcutOptions::default())
        .unwrap();

    assert_eq!(app.commands().len(), 3);
    assert_eq!(app.registry().alias_count(), 2);
    assert_eq!(app.registry().shortcuts().len(), 2);
    assert_eq!(foo.children().len(), 1);

    bar.dispose();

    assert_eq!(app.commands(), vec![foo.clone()]);
    assert_eq!(app.registry().alias_count(), 0);
    assert!(app.registry().shortcuts().is_empty());
    assert!(foo.children().is_empty());
    assert!(app.get("baz").is_none());
    assert!(app.get("it").is_none());
    assert!(bar.is_disposed() && test.is_disposed());
}

#[test]
fn test_dispose_cascades_through_dotted_children() {
    let (app, scope) = setup();
    let a = scope.command("a").unwrap();
    scope.command("a.b").unwrap();
    scope.command("a.b.c").unwrap();

    a.dispose();
    assert!(app.get("a").is_none());
    assert!(app.get("a.b").is_none());
    assert!(app.get("a.b.c").is_none());
    assert!(a.children().is_empty());
}

#[test]
fn test_dispose_is_idempotent() {
    let (app, scope) = setup();
    let a = scope.command("a").unwrap();
    let b = scope.command("b").unwrap();
    a.dispose();
    a.dispose();
    assert_eq!(app.commands(), vec![b]);
}

#[test]
fn test_disposed_name_can_be_reused() {
    let (app, scope) = setup();
    let a = scope.command("a").unwrap();
    a.alias("x").unwrap();
    a.dispose();

    let again = scope.command("a").unwrap();
    assert_ne!(again, a);
    assert!(!again.is_disposed());
    scope.command("b").unwrap().alias("x").unwrap();
    assert_eq!(app.get("x").unwrap().name(), "b");
}

#[test]
fn test_command_teardown_callbacks() {
    let (_app, scope) = setup();
    let a = scope.command("a").unwrap();
    let b = scope.command("a.b").unwrap();
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let o = order.clone();
    a.on_dispose(move || o.lock().push("a"));
    let o = order.clone();
    b.on_dispose(move || o.lock().push("b"));

    a.dispose();
    // children first, then the parent
    assert_eq!(*order.lock(), vec!["b", "a"]);
}

#[test]
fn test_scope_dispose_removes_its_commands() {
    let app = Commander::new();
    let plugin = app.scope("plugin");
    let other = app.scope("other");

    other.command("keep").unwrap();
    plugin.command("dice.roll <expr>").unwrap().alias("r").unwrap();
    plugin.command("dice.stats").unwrap();
    assert_eq!(app.commands().len(), 4);

    plugin.dispose();

    let names: Vec<_> = app.commands().iter().map(|c| c.name().to_string()).collect();
    assert_eq!(names, vec!["keep"]);
    assert!(app.get("r").is_none());
    assert_eq!(plugin.pending(), 0);
}

#[test]
fn test_scope_dispose_returns_grafted_commands() {
    let app = Commander::new();
    let base = app.scope("base");
    let plugin = app.scope("plugin");

    let x = base.command("x").unwrap();
    let p = plugin.command("p").unwrap();
    plugin.command("p/x").unwrap();
    assert_eq!(x.parent(), Some(p.clone()));

    plugin.dispose();
    assert!(p.is_disposed());
    assert!(!x.is_disposed());
    assert!(x.parent().is_none());
    assert_eq!(app.get("x"), Some(x));
}

#[test]
fn test_scope_dispose_cascades_over_later_subcommands() {
    let app = Commander::new();
    let base = app.scope("base");
    let plugin = app.scope("plugin");

    let a = base.command("a").unwrap();
    let b = plugin.command("a.b").unwrap();

    base.dispose();
    assert!(a.is_disposed());
    assert!(b.is_disposed());
    assert!(app.get("a.b").is_none());
    assert!(app.commands().is_empty());

    // nothing left for the plugin to undo
    plugin.dispose();
    assert!(app.commands().is_empty());
}

#[test]
fn test_scope_dispose_below_grafted_command() {
    let app = Commander::new();
    let base = app.scope("base");
    let plugin = app.scope("plugin");

    let a = base.command("a").unwrap();
    let b = base.command("b").unwrap();
    let y = plugin.command("a/x/b/y").unwrap();
    assert_eq!(y.parent(), Some(b.clone()));
    assert_eq!(b.parent().unwrap().name(), "x");

    plugin.dispose();

    assert!(y.is_disposed());
    assert!(app.get("x").is_none());
    assert!(app.get("y").is_none());
    assert!(!b.is_disposed());
    assert!(b.parent().is_none());
    assert!(b.children().is_empty());
    assert!(a.children().is_empty());
    assert_eq!(app.commands(), vec![a, b]);
}

#[test]
fn test_scope_callbacks_run_after_registrations_undone() {
    let (app, scope) = setup();
    let seen = Arc::new(AtomicUsize::new(usize::MAX));

    let s = seen.clone();
    let app_ref = app.clone();
    scope.on_dispose(move || s.store(app_ref.commands().len(), Ordering::SeqCst));
    scope.command("a").unwrap();

    scope.dispose();
    assert_eq!(seen.load(Ordering::SeqCst), 0);
}
