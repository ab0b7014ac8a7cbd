//! Lookup and Resolution
//!
//! - Exact lookup by name and alias
//! - Best-effort dotted resolution
//! - Alias listing and shortcut matching

use crate::*;
use cmdtree::ShortcutOptions;
use proptest::prelude::*;

#[test]
fn test_get_by_name_and_alias() {
    let (app, scope) = setup();
    let echo = scope.command("echo").unwrap();
    echo.alias("say").unwrap();

    assert_eq!(app.get("echo"), Some(echo.clone()));
    assert_eq!(app.get("say"), Some(echo));
    assert!(app.get("missing").is_none());
}

#[test]
fn test_resolve_deepest_match() {
    let (app, scope) = setup();
    let a = scope.command("a").unwrap();
    let ab = scope.command("a.b").unwrap();
    let abc = scope.command("a.b.c").unwrap();

    assert_eq!(app.resolve("a"), Some(a.clone()));
    assert_eq!(app.resolve("a.b"), Some(ab.clone()));
    assert_eq!(app.resolve("a.b.c"), Some(abc));
    assert_eq!(app.resolve("a.b.x"), Some(ab));
    assert_eq!(app.resolve("a.x.c"), Some(a));
    assert!(app.resolve("x.a").is_none());
    assert!(app.resolve("").is_none());
}

#[test]
fn test_resolve_through_alias() {
    let (app, scope) = setup();
    let dice = scope.command("dice").unwrap();
    dice.alias("d").unwrap();
    let roll = scope.command("dice.roll").unwrap();

    assert_eq!(app.resolve("d.roll"), Some(roll));
}

#[test]
fn test_available_aliases() {
    let (app, scope) = setup();
    scope.command("echo").unwrap().alias("say").unwrap();
    scope.command("dice").unwrap().alias("d").unwrap().alias("r").unwrap();
    scope.command("secret").unwrap().set_config("hidden", true);

    let visible = app.available_aliases(|c| c.config_value("hidden").is_none());
    assert_eq!(visible, vec!["echo", "say", "dice", "d", "r"]);

    let all = app.available_aliases(|_| true);
    assert_eq!(all.len(), 6);
}

#[test]
fn test_find_shortcut() {
    let (app, scope) = setup();
    let echo = scope.command("echo").unwrap();
    echo.shortcut("say", ShortcutOptions::default()).unwrap();
    echo.shortcut(
        "shout",
        ShortcutOptions {
            fuzzy: true,
            ..Default::default()
        },
    )
    .unwrap();

    let exact = app.find_shortcut("say").unwrap();
    assert_eq!(exact.shortcut.command, echo);
    assert_eq!(exact.rest, "");
    assert!(app.find_shortcut("say hello").is_none());

    let fuzzy = app.find_shortcut("shout  hello world").unwrap();
    assert_eq!(fuzzy.shortcut.name, "shout");
    assert_eq!(fuzzy.rest, "hello world");
    assert!(app.find_shortcut("whisper").is_none());
}

fn path_strategy() -> impl Strategy<Value = Vec<(bool, String)>> {
    prop::collection::vec((any::<bool>(), "[a-z][a-z0-9]{0,5}"), 1..5)
}

proptest! {
    #[test]
    fn prop_resolve_finds_every_registered_name(segments in path_strategy()) {
        let (app, scope) = setup();
        let mut def = String::new();
        for (index, (dotted, name)) in segments.iter().enumerate() {
            if index > 0 {
                def.push(if *dotted { '.' } else { '/' });
            }
            def.push_str(name);
        }

        // a path can legitimately collide with itself ("a/a")
        if let Ok(leaf) = scope.command(&def) {
            for command in app.commands() {
                prop_assert_eq!(app.resolve(command.name()), Some(command.clone()));
                prop_assert_eq!(app.get(command.name()), Some(command));
            }
            prop_assert_eq!(app.resolve(leaf.name()), Some(leaf));
        }
    }
}
