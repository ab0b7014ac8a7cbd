//! Patch Registrations
//!
//! - Overlay reads and writes
//! - Restoring the target on scope teardown
//! - Patching a command that does not exist

use crate::*;
use cmdtree::{CommandConfig, CommandHandle, CommandOptions, ShortcutOptions};
use serde_json::json;

fn patch_config() -> CommandConfig {
    CommandConfig::new().with_patch(true)
}

#[test]
fn test_patch_round_trip() {
    let app = Commander::new();
    let base = app.scope("base");
    let echo = base
        .register(
            "echo",
            Some("Repeat a message"),
            Some(CommandConfig::new().with("hidden", false)),
        )
        .unwrap()
        .into_command();
    let before = echo.config();

    let plugin = app.scope("plugin");
    let handle = plugin
        .register(
            "echo",
            Some("Echo, but louder"),
            Some(patch_config().with_authority(3)),
        )
        .unwrap();
    let patch = handle.as_patch().unwrap();

    patch.set_config("hidden", true);
    patch.alias("say").unwrap();
    patch.shortcut("!echo", ShortcutOptions::default()).unwrap();

    assert_eq!(patch.authority(), 3);
    assert_eq!(patch.config_value("hidden"), Some(json!(true)));
    assert!(!patch.overlay().contains_key("patch"));
    assert_eq!(echo.config(), before);
    assert_eq!(app.get("say"), Some(echo.clone()));
    assert!(app.find_shortcut("!echo").is_some());
    assert_eq!(app.description("echo").as_deref(), Some("Echo, but louder"));

    plugin.dispose();

    assert!(patch.is_disposed());
    assert_eq!(echo.config(), before);
    assert!(echo.aliases().is_empty());
    assert!(echo.shortcuts().is_empty());
    assert!(app.get("say").is_none());
    assert!(app.find_shortcut("!echo").is_none());
    assert_eq!(app.description("echo").as_deref(), Some("Repeat a message"));
    assert!(!echo.is_disposed());
}

#[test]
fn test_patch_description_removed_when_none_before() {
    let (app, scope) = setup();
    scope.command("echo").unwrap();

    let plugin = app.scope("plugin");
    plugin
        .register("echo", Some("patched"), Some(patch_config()))
        .unwrap();
    assert_eq!(app.description("echo").as_deref(), Some("patched"));

    plugin.dispose();
    assert!(app.description("echo").is_none());
}

#[test]
fn test_patch_handle_reports_target() {
    let (app, scope) = setup();
    let echo = scope.command("echo").unwrap();

    let handle = app
        .scope("plugin")
        .register("echo", None, Some(patch_config()))
        .unwrap();
    assert!(handle.is_patch());
    assert_eq!(handle.name(), "echo");
    assert_eq!(handle.command(), &echo);
    assert_eq!(format!("{:?}", handle.as_patch().unwrap()), "Patch <echo>");
}

#[test]
fn test_patch_of_missing_command_creates_nothing() {
    let (app, scope) = setup();
    let handle = scope
        .register("ghost.child", None, Some(patch_config()))
        .unwrap();

    assert!(app.get("ghost").is_none());
    assert!(app.get("ghost.child").is_none());
    assert!(handle.command().is_disposed());
}

#[test]
fn test_patch_does_not_regraft() {
    let (app, scope) = setup();
    scope.command("a").unwrap();
    let b = scope.command("b").unwrap();

    let plugin = app.scope("plugin");
    let handle = plugin
        .register("a/b", None, Some(patch_config()))
        .unwrap();
    assert_eq!(handle.command(), &b);
    assert!(b.parent().is_none());

    plugin.dispose();
    assert!(!b.is_disposed());
}

#[test]
fn test_patch_through_graft_creates_nothing() {
    let (app, scope) = setup();
    let a = scope.command("a").unwrap();
    let b = scope.command("b").unwrap();

    let plugin = app.scope("plugin");
    let handle = plugin
        .register("a/x/b/y", None, Some(patch_config()))
        .unwrap();
    assert!(handle.command().is_disposed());
    assert!(app.get("x").is_none());
    assert!(app.get("y").is_none());
    assert!(b.parent().is_none());

    plugin.dispose();
    assert_eq!(app.commands(), vec![a, b]);
}

#[test]
fn test_overlapping_patch_descriptions_unwind_in_any_order() {
    let (app, scope) = setup();
    scope
        .command_with("echo", CommandOptions::new().description("base"))
        .unwrap();

    let first = app.scope("first");
    let second = app.scope("second");
    first
        .register("echo", Some("one"), Some(patch_config()))
        .unwrap();
    second
        .register("echo", Some("two"), Some(patch_config()))
        .unwrap();
    assert_eq!(app.description("echo").as_deref(), Some("two"));

    first.dispose();
    assert_eq!(app.description("echo").as_deref(), Some("two"));

    second.dispose();
    assert_eq!(app.description("echo").as_deref(), Some("base"));
}

#[test]
fn test_description_changed_while_patched() {
    let (app, scope) = setup();
    scope
        .command_with("echo", CommandOptions::new().description("old"))
        .unwrap();

    let plugin = app.scope("plugin");
    plugin
        .register("echo", Some("patched"), Some(patch_config()))
        .unwrap();
    scope
        .command_with("echo", CommandOptions::new().description("new"))
        .unwrap();
    assert_eq!(app.description("echo").as_deref(), Some("patched"));

    plugin.dispose();
    assert_eq!(app.description("echo").as_deref(), Some("new"));
}

#[test]
fn test_two_patches_unwind_independently() {
    let (app, scope) = setup();
    let echo = scope.command("echo").unwrap();

    let first = app.scope("first");
    let second = app.scope("second");
    let p1 = first
        .register("echo", None, Some(patch_config()))
        .unwrap();
    let p2 = second
        .register("echo", None, Some(patch_config()))
        .unwrap();
    p1.alias("one").unwrap();
    p2.alias("two").unwrap();
    assert_eq!(echo.aliases(), vec!["one".to_string(), "two".to_string()]);

    first.dispose();
    assert_eq!(echo.aliases(), vec!["two".to_string()]);
    assert!(!p2.as_patch().unwrap().is_disposed());

    second.dispose();
    assert!(echo.aliases().is_empty());
}

#[test]
fn test_patch_does_not_remove_preexisting_alias() {
    let (app, scope) = setup();
    let echo = scope.command("echo").unwrap();
    echo.alias("say").unwrap();

    let plugin = app.scope("plugin");
    let handle = plugin
        .register("echo", None, Some(patch_config()))
        .unwrap();
    handle.alias("say").unwrap();

    plugin.dispose();
    assert_eq!(app.get("say"), Some(echo));
}

#[test]
fn test_plain_registration_is_a_command_handle() {
    let (_app, scope) = setup();
    let handle = scope.register("echo", None, None).unwrap();
    assert!(matches!(handle, CommandHandle::Command(_)));
    assert!(handle.as_patch().is_none());
}
