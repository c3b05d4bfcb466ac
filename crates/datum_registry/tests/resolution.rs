//! Resolution tests: take, try_take, scoped takes, take_super, the fallback
//! provider and in-flight introspection.

use datum_registry::prelude::*;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn text(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

fn sum_input(ctx: &mut Resolver<'_>) -> ResolveResult {
    let total: i64 = ctx
        .given("array")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_i64).sum())
        .unwrap_or(0);
    Ok(json!(total))
}

fn people() -> Container {
    let mut c = Container::new();
    c.provider_with("sum", ProviderOptions::new().requires("array"), sum_input)
        .provider("static", |_| Ok(json!("StaticValue")))
        .provider("billy", |ctx| ctx.take(["identification", "fullname"]))
        .provider(["identification", "firstname"], |_| Ok(json!("Billy")))
        .provider(["identification", "lastname"], |_| Ok(json!("Bragg")))
        .provider(["identification", "fullname"], |ctx| {
            let first = ctx.scoped_take("firstname")?;
            let last = ctx.scoped_take("lastname")?;
            Ok(json!(format!("{} {}", text(&first), text(&last))))
        })
        .provider(["identification", "identifier"], |ctx| ctx.take("firstname"))
        .provider("fullname", |_| Ok(json!("Stephen William Bragg")))
        .provider(["identification", "id"], |ctx| ctx.take("fullname"))
        .provider(["identification", "ID"], |ctx| ctx.take("id"));
    c
}

// ═══════════════════════════════════════════════════════════════════════════════
// TAKE TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn take_evaluates_providers() {
    let c = people();
    assert_eq!(c.give([("array", json!([6, 9, 2]))]).take("sum").unwrap(), json!(17));
    assert_eq!(c.take("static").unwrap(), json!("StaticValue"));
}

#[test]
fn take_sums_supplied_input() {
    let c = people();
    assert_eq!(c.give([("array", json!([1, 2, 4]))]).take("sum").unwrap(), json!(7));
    assert_eq!(c.take("sum").unwrap(), json!(0));
}

#[test]
fn take_unknown_provider_fails_with_identifier() {
    let c = people();

    let error = c.take("unknown").unwrap_err();
    assert!(matches!(&error, ResolveError::ProviderMissing(id) if *id == Identifier::from("unknown")));

    let error = c.take(["identification", "foo"]).unwrap_err();
    assert_eq!(error.provider_id(), Some(&Identifier::from(["identification", "foo"])));
}

#[test]
fn take_works_from_within_a_provider() {
    assert_eq!(people().take("billy").unwrap(), json!("Billy Bragg"));
}

#[test]
fn take_falls_back_to_scope_only_when_unscoped_is_missing() {
    let c = people();
    // `fullname` exists unscoped, so the unscoped provider wins.
    assert_eq!(c.take(["identification", "id"]).unwrap(), json!("Stephen William Bragg"));
    // `firstname` only exists under the scope.
    assert_eq!(c.take(["identification", "identifier"]).unwrap(), json!("Billy"));
}

#[test]
fn take_acts_as_scoped_take_recursively() {
    assert_eq!(
        people().take(["identification", "ID"]).unwrap(),
        json!("Stephen William Bragg")
    );
}

#[test]
fn scoped_take_uses_provider_scope() {
    assert_eq!(
        people().take(["identification", "fullname"]).unwrap(),
        json!("Billy Bragg")
    );
}

#[test]
fn scoped_take_outside_scope_is_plain_take() {
    let mut c = Container::new();
    c.provider("outer", |ctx| ctx.scoped_take("inner"))
        .provider(["inner"], |_| Ok(json!("path")))
        .provider("inner", |_| Ok(json!("atom")));

    // An atom's scope is empty, so `scope() ++ ["inner"]` is the path ["inner"].
    assert_eq!(c.take("outer").unwrap(), json!("path"));
}

#[test]
fn static_values_win_over_providers() {
    let mut c = Container::new();
    c.provider("name", |_| Ok(json!("provider")))
        .provides([("name", json!("static"))]);

    assert_eq!(c.take("name").unwrap(), json!("static"));
    assert_eq!(
        c.take_with("name", TakeOptions::new().with_skip(0)).unwrap(),
        json!("provider")
    );
}

#[test]
fn computed_static_values_are_invoked() {
    let mut c = Container::new();
    c.provides([("name", StaticValue::computed(|| json!("Patrick")))]);
    assert_eq!(c.take("name").unwrap(), json!("Patrick"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRY_TAKE TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn try_take_acts_like_take_when_present() {
    let c = people().give([("array", json!([1, 2, 4]))]);
    assert_eq!(c.try_take("sum").unwrap(), Some(json!(7)));
}

#[test]
fn try_take_returns_none_when_missing() {
    assert_eq!(people().try_take("square_root").unwrap(), None);
}

#[test]
fn try_take_propagates_errors_from_existing_providers() {
    let mut c = Container::new();
    c.provider("missing", |ctx| ctx.take("foo"))
        .provider("runtime", |_| Err(ResolveError::provider("Whoops")));

    let error = c.try_take("missing").unwrap_err();
    assert_eq!(error.provider_id(), Some(&Identifier::from("foo")));

    let error = c.try_take("runtime").unwrap_err();
    assert!(matches!(error, ResolveError::Provider(_)));
    assert_eq!(error.to_string(), "Whoops");
}

#[test]
fn try_take_inside_scoped_provider_checks_direct_identifier_only() {
    let mut c = Container::new();
    c.provider(["p", "a"], |_| Ok(json!("scoped")))
        .provider(["p", "probe"], |ctx| Ok(json!(ctx.try_take("a")?)));

    assert_eq!(c.take(["p", "probe"]).unwrap(), json!(null));
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR PROPAGATION TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn provider_errors_propagate_unmodified() {
    #[derive(Debug, thiserror::Error)]
    #[error("bad input: {0}")]
    struct BadInput(&'static str);

    let mut c = Container::new();
    c.provider("runtime", |_| Err(ResolveError::provider(BadInput("x"))))
        .provider("wrapper", |ctx| ctx.take("runtime"));

    let error = c.take("wrapper").unwrap_err();
    assert_eq!(error.to_string(), "bad input: x");
    let ResolveError::Provider(inner) = error else {
        panic!("expected a provider error");
    };
    assert!(inner.downcast_ref::<BadInput>().is_some());
}

#[test]
fn missing_provider_error_message() {
    let mut c = Container::new();
    c.provider("missing", |ctx| ctx.take("foo"));

    let error = c.take("missing").unwrap_err();
    assert_eq!(error.to_string(), "tried to take data from missing provider: foo");
}

#[test]
fn mutual_recursion_fails_with_cycle() {
    let mut c = Container::new();
    c.provider("a", |ctx| ctx.take("b"))
        .provider("b", |ctx| ctx.take("a"));

    let error = c.take("a").unwrap_err();
    let ResolveError::Cycle { identifier, path } = error else {
        panic!("expected a cycle error, got {error:?}");
    };
    assert_eq!(identifier, Identifier::from("a"));
    assert_eq!(
        path,
        vec![Identifier::from("a"), Identifier::from("b"), Identifier::from("a")]
    );
}

#[test]
fn fallback_resolving_its_own_missing_identifier_is_a_cycle() {
    let mut c = Container::new();
    c.provider_missing(|ctx| {
        let missing = ctx.missing_provider().cloned().unwrap_or(Identifier::Path(Vec::new()));
        ctx.take(missing)
    });

    assert!(matches!(c.take("ghost"), Err(ResolveError::Cycle { .. })));
}

// ═══════════════════════════════════════════════════════════════════════════════
// TAKE_SUPER TESTS
// ═══════════════════════════════════════════════════════════════════════════════

fn extension(suffix: &'static str) -> Container {
    let mut c = Container::new();
    c.provider("value", move |ctx| {
        let inner = ctx.take_super()?;
        Ok(json!(format!("{}{suffix}", text(&inner))))
    });
    c
}

#[test]
fn take_super_reaches_older_provider() {
    let mut original = Container::new();
    original.provider("value", |_| Ok(json!("original")));
    let mut replacement = Container::new();
    replacement.provider("value", |_| Ok(json!("new")));

    let mut c = original.add(&extension(" [extended]"));
    assert_eq!(c.take("value").unwrap(), json!("original [extended]"));

    c.add_in_place(&replacement);
    assert_eq!(c.take("value").unwrap(), json!("new"));

    c.add_in_place(&extension(" [extended]"));
    assert_eq!(c.take("value").unwrap(), json!("new [extended]"));

    c.add_in_place(&extension(" [extended]"));
    assert_eq!(c.take("value").unwrap(), json!("new [extended] [extended]"));
}

#[test]
fn take_super_without_older_provider_fails() {
    let mut c = Container::new();
    c.provider("whatever", |ctx| ctx.take_super());

    let error = c.take("whatever").unwrap_err();
    assert_eq!(error.provider_id(), Some(&Identifier::from("whatever")));
}

#[test]
fn take_super_follows_priority_order() {
    let mut c = Container::new();
    c.provider_with("v", ProviderOptions::new().with_priority(2), |ctx| {
        let inner = ctx.take_super()?;
        Ok(json!(format!("two({})", text(&inner))))
    })
    .provider_with("v", ProviderOptions::new().with_priority(1), |_| Ok(json!("one")));

    assert_eq!(c.take("v").unwrap(), json!("two(one)"));
}

#[test]
fn take_super_visits_equal_priority_providers_most_recent_first() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut c = Container::new();
    for name in ["first", "second", "third"] {
        let seen = Arc::clone(&seen);
        c.provider("v", move |ctx| {
            seen.lock().push((name, ctx.current_skip()));
            if name == "first" {
                Ok(json!(name))
            } else {
                ctx.take_super()
            }
        });
    }

    assert_eq!(c.take("v").unwrap(), json!("first"));
    assert_eq!(*seen.lock(), vec![("third", 0), ("second", 1), ("first", 2)]);
}

#[test]
fn take_super_in_fallback_is_outside_provider() {
    let mut c = Container::new();
    c.provider_missing(|ctx| ctx.take_super());
    assert!(matches!(c.take("x"), Err(ResolveError::OutsideProvider)));
}

/// A provider reached through the scoped retry delegates to the override of
/// its full path identifier.
#[test]
fn take_super_after_scoped_retry_uses_full_identifier() {
    let mut c = Container::new();
    c.provider(["p", "x"], |_| Ok(json!("base")))
        .provider(["p", "x"], |ctx| {
            assert_eq!(ctx.provider_id(), Some(&Identifier::from(["p", "x"])));
            let inner = ctx.take_super()?;
            Ok(json!(format!("{} [override]", text(&inner))))
        })
        .provider(["p", "caller"], |ctx| ctx.take("x"));

    assert!(!c.has_provider("x"));
    assert_eq!(c.take(["p", "caller"]).unwrap(), json!("base [override]"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// FALLBACK PROVIDER TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn fallback_handles_missing_identifiers() {
    let mut c = Container::new();
    c.provider_missing(|_| Ok(json!("This provider don't exist!")));

    assert!(!c.has_provider("message"));
    assert_eq!(c.take("message").unwrap(), json!("This provider don't exist!"));
}

#[test]
fn fallback_observes_missing_identifier() {
    let mut c = Container::new();
    c.provider_missing(|ctx| {
        let missing = ctx.missing_provider().map(ToString::to_string).unwrap_or_default();
        Ok(json!(format!("Missing {missing}")))
    });

    assert_eq!(c.take("something").unwrap(), json!("Missing something"));
    assert_eq!(c.try_take("cool").unwrap(), Some(json!("Missing cool")));
}

#[test]
fn missing_identifier_is_only_visible_in_fallback_frame() {
    let observed = Arc::new(Mutex::new(None));
    let inner = Arc::clone(&observed);

    let mut c = Container::new();
    c.provider("real", move |ctx| {
        *inner.lock() = Some(ctx.missing_provider().cloned());
        Ok(json!("real"))
    })
    .provider_missing(|ctx| ctx.take("real"));

    assert_eq!(c.take("ghost").unwrap(), json!("real"));
    assert_eq!(*observed.lock(), Some(None));
}

#[test]
fn fallback_provider_query() {
    let mut c = Container::new();
    assert!(!c.has_fallback_provider());
    c.provider_missing(|_| Ok(json!("New fallback!")));
    assert!(c.has_fallback_provider());
    assert!(c.fallback_provider().is_some_and(Provider::is_fallback));
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTROSPECTION TESTS
// ═══════════════════════════════════════════════════════════════════════════════

fn chain(last: impl Fn(&mut Resolver<'_>) -> ResolveResult + Send + Sync + 'static) -> Container {
    let mut c = Container::new();
    c.provider("a", |ctx| ctx.take("b"))
        .provider("b", |ctx| ctx.take(["prefix", "c"]))
        .provider(["prefix", "c"], |ctx| ctx.take("d"))
        .provider(["prefix", "d"], last);
    c
}

#[test]
fn provider_stack_lists_in_flight_providers() {
    let c = chain(|ctx| {
        let ids: Vec<_> = ctx.provider_stack().into_iter().map(Provider::identifier).collect();
        Ok(json!(ids))
    });

    assert_eq!(c.take("a").unwrap(), json!(["a", "b", ["prefix", "c"], ["prefix", "d"]]));
    assert_eq!(c.take("b").unwrap(), json!(["b", ["prefix", "c"], ["prefix", "d"]]));
}

#[test]
fn provider_id_is_the_executing_identifier() {
    let c = chain(|ctx| Ok(json!(ctx.provider_id())));

    assert_eq!(c.take("a").unwrap(), json!(["prefix", "d"]));
    assert_eq!(c.take(["prefix", "d"]).unwrap(), json!(["prefix", "d"]));
}

#[test]
fn scopes_follow_the_frame_stack() {
    let c = chain(|ctx| Ok(json!(ctx.scopes())));

    assert_eq!(c.take("a").unwrap(), json!([[], [], ["prefix"], ["prefix"]]));
    assert_eq!(c.take("b").unwrap(), json!([[], ["prefix"], ["prefix"]]));
}

#[test]
fn scope_can_address_the_parent_provider() {
    let mut c = Container::new();
    c.provider(["a", "b"], |_| Ok(json!("woeha!")))
        .provider(["a", "b", "c"], |ctx| Ok(json!(ctx.scope())))
        .provider(["a", "b", "eq"], |ctx| {
            let scope = ctx.scope();
            ctx.take(scope)
        });

    assert_eq!(c.take(["a", "b", "c"]).unwrap(), json!(["a", "b"]));
    assert_eq!(c.take(["a", "b", "eq"]).unwrap(), c.take(["a", "b"]).unwrap());
}

#[test]
fn fallback_frames_have_no_identifier_or_scope() {
    let mut c = Container::new();
    c.provider_missing(|ctx| {
        Ok(json!({
            "id": ctx.provider_id(),
            "scope": ctx.scope(),
            "current": ctx.current_provider().is_some_and(Provider::is_fallback),
        }))
    });

    assert_eq!(
        c.take(["deep", "missing"]).unwrap(),
        json!({ "id": null, "scope": [], "current": true })
    );
}
