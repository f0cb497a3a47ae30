use super::*;
use crate::runtime::CountingScheduler;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const ROOT: Key = 1;

type Log = Rc<RefCell<Vec<String>>>;

fn render<R>(composition: &mut Composition, content: impl FnOnce() -> R) -> R {
    composition.render(ROOT, content).expect("render succeeds")
}

fn push(log: &Log, entry: impl Into<String>) {
    log.borrow_mut().push(entry.into());
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

#[test]
#[should_panic(expected = "no composer installed")]
fn hooks_outside_composition_panic() {
    let _ = use_state(|| 0);
}

#[test]
fn is_composing_only_inside_render() {
    let mut composition = Composition::new();
    assert!(!is_composing());
    assert!(render(&mut composition, is_composing));
    assert!(!is_composing());
}

#[test]
fn use_state_returns_initial_then_set_value() {
    let mut composition = Composition::new();
    let (value, setter) = render(&mut composition, || use_state(|| 10));
    assert_eq!(value, 10);

    setter.set(11);
    let (value, second_setter) = render(&mut composition, || use_state(|| 10));
    assert_eq!(value, 11);
    assert_eq!(setter, second_setter);
}

#[test]
fn functional_updates_fold_in_order() {
    let mut composition = Composition::new();
    let (_, setter) = render(&mut composition, || use_state(|| 0));
    for _ in 0..3 {
        setter.update(|count| count + 1);
    }
    let (value, _) = render(&mut composition, || use_state(|| 0));
    assert_eq!(value, 3);
}

#[test]
fn mixed_updates_apply_in_dispatch_order() {
    let mut composition = Composition::new();
    let (_, setter) = render(&mut composition, || use_state(|| 1));
    setter.update(|value| value * 10);
    setter.set(4);
    setter.update(|value| value + 1);
    let (value, _) = render(&mut composition, || use_state(|| 1));
    assert_eq!(value, 5);
}

#[test]
fn lazy_initial_state_runs_once() {
    let mut composition = Composition::new();
    let calls = Cell::new(0);
    for _ in 0..3 {
        render(&mut composition, || {
            use_state(|| {
                calls.set(calls.get() + 1);
                "seed"
            })
        });
    }
    assert_eq!(calls.get(), 1);
}

#[test]
fn state_update_schedules_render() {
    let scheduler = Arc::new(CountingScheduler::default());
    let mut composition = Composition::with_runtime(Runtime::new(scheduler.clone()));
    let (_, setter) = render(&mut composition, || use_state(|| 0u8));
    assert!(!composition.should_render());

    setter.set(1);
    assert!(composition.should_render());
    assert_eq!(scheduler.frames.load(Ordering::SeqCst), 1);

    render(&mut composition, || use_state(|| 0u8));
    assert!(!composition.should_render());
}

#[test]
fn reducer_applies_actions_with_current_reducer() {
    #[derive(Debug)]
    enum Action {
        Add(i32),
        Reset,
    }

    fn counter(state: &i32, action: Action) -> i32 {
        match action {
            Action::Add(amount) => state + amount,
            Action::Reset => 0,
        }
    }

    let mut composition = Composition::new();
    let (state, dispatch) = render(&mut composition, || use_reducer(counter, || 5));
    assert_eq!(state, 5);

    dispatch.dispatch(Action::Add(3));
    let (state, second) = render(&mut composition, || use_reducer(counter, || 5));
    assert_eq!(state, 8);
    assert_eq!(dispatch, second);

    dispatch.dispatch(Action::Add(1));
    dispatch.dispatch(Action::Reset);
    dispatch.dispatch(Action::Add(2));
    let (state, _) = render(&mut composition, || use_reducer(counter, || 5));
    assert_eq!(state, 2);
}

#[test]
fn ref_identity_is_stable_and_mutation_never_schedules() {
    let mut composition = Composition::new();
    let mut cells = Vec::new();
    for pass in 0..3 {
        let cell = render(&mut composition, || use_ref(|| 0));
        cell.set(pass);
        assert!(!composition.should_render());
        cells.push(cell);
    }
    assert_eq!(cells[0], cells[1]);
    assert_eq!(cells[1], cells[2]);
    assert_eq!(cells[2].get(), 2);
}

#[test]
fn memo_factory_runs_once_for_stable_deps() {
    let mut composition = Composition::new();
    let calls = Cell::new(0);
    let mut values = Vec::new();
    for _ in 0..5 {
        values.push(render(&mut composition, || {
            use_memo(
                || {
                    calls.set(calls.get() + 1);
                    vec![1, 2, 3]
                },
                ("stable", 1),
            )
        }));
    }
    assert_eq!(calls.get(), 1);
    assert!(values.windows(2).all(|pair| Rc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn memo_factory_runs_every_pass_when_deps_change() {
    let mut composition = Composition::new();
    let calls = Cell::new(0);
    for pass in 0..5 {
        let value = render(&mut composition, || {
            use_memo(
                || {
                    calls.set(calls.get() + 1);
                    pass * 2
                },
                (pass,),
            )
        });
        assert_eq!(*value, pass * 2);
    }
    assert_eq!(calls.get(), 5);
}

#[test]
fn callback_identity_follows_deps() {
    let mut composition = Composition::new();
    let mut handles = Vec::new();
    for key in [1, 1, 2, 2] {
        handles.push(render(&mut composition, || {
            use_callback(move |x: i32| x + key, [key])
        }));
    }
    assert_eq!(handles[0], handles[1]);
    assert_ne!(handles[1], handles[2]);
    assert_eq!(handles[2], handles[3]);
    assert_eq!((*handles[3])(1), 3);
}

#[test]
fn empty_deps_effect_runs_once_and_cleans_up_on_dispose() {
    let mut composition = Composition::new();
    let log: Log = Rc::default();
    for _ in 0..5 {
        let log = Rc::clone(&log);
        render(&mut composition, move || {
            use_effect(Some(()), move |scope| {
                push(&log, "effect");
                scope.on_cleanup(move || push(&log, "cleanup"))
            })
        });
        composition.flush_effects();
    }
    assert_eq!(entries(&log), vec!["effect"]);

    composition.dispose();
    assert_eq!(entries(&log), vec!["effect", "cleanup"]);
}

#[test]
fn effect_without_deps_cleans_up_before_each_run() {
    let mut composition = Composition::new();
    let log: Log = Rc::default();
    for pass in 0..3 {
        let log = Rc::clone(&log);
        render(&mut composition, move || {
            use_effect(EVERY_RENDER, move |scope| {
                push(&log, format!("run {pass}"));
                scope.on_cleanup(move || push(&log, format!("cleanup {pass}")))
            })
        });
        composition.flush_effects();
    }
    assert_eq!(
        entries(&log),
        vec!["run 0", "cleanup 0", "run 1", "cleanup 1", "run 2"]
    );
}

#[test]
fn effect_reruns_only_when_a_dependency_changes() {
    let mut composition = Composition::new();
    let runs = Rc::new(Cell::new(0));
    for key in ["a", "a", "b", "b", "b", "a"] {
        let runs = Rc::clone(&runs);
        render(&mut composition, move || {
            use_effect(Some((key, 1)), move |scope| {
                runs.set(runs.get() + 1);
                scope.done()
            })
        });
        composition.flush_effects();
    }
    assert_eq!(runs.get(), 3);
}

#[test]
fn layout_effects_fire_during_commit_and_passive_effects_on_flush() {
    let mut composition = Composition::new();
    let log: Log = Rc::default();
    {
        let log = Rc::clone(&log);
        render(&mut composition, move || {
            let passive = Rc::clone(&log);
            use_effect(Some(()), move |scope| {
                push(&passive, "passive");
                scope.done()
            });
            let layout = Rc::clone(&log);
            use_layout_effect(Some(()), move |scope| {
                push(&layout, "layout");
                scope.done()
            });
        });
    }
    assert_eq!(entries(&log), vec!["layout"]);
    assert!(composition.has_pending_effects());

    assert_eq!(composition.flush_effects(), 1);
    assert_eq!(entries(&log), vec!["layout", "passive"]);
}

#[test]
fn pending_passive_effects_flush_before_next_pass() {
    let mut composition = Composition::new();
    let log: Log = Rc::default();
    for pass in 0..2 {
        let log = Rc::clone(&log);
        render(&mut composition, move || {
            push(&log, format!("compose {pass}"));
            let effect_log = Rc::clone(&log);
            use_effect(EVERY_RENDER, move |scope| {
                push(&effect_log, format!("effect {pass}"));
                scope.done()
            });
        });
    }
    assert_eq!(entries(&log), vec!["compose 0", "effect 0", "compose 1"]);
}

#[test]
fn effects_fire_in_call_site_order() {
    let mut composition = Composition::new();
    let log: Log = Rc::default();
    {
        let log = Rc::clone(&log);
        render(&mut composition, move || {
            for label in ["first", "second", "third"] {
                let log = Rc::clone(&log);
                with_group(location_key(file!(), line!(), column!()), move || {
                    use_effect(Some(()), move |scope| {
                        push(&log, label);
                        scope.done()
                    })
                });
            }
        });
    }
    composition.flush_effects();
    assert_eq!(entries(&log), vec!["first", "second", "third"]);
}

#[test]
fn unmounted_effect_cleans_up_on_flush() {
    let mut composition = Composition::new();
    let log: Log = Rc::default();
    for show in [true, true, false] {
        let log = Rc::clone(&log);
        render(&mut composition, move || {
            if show {
                with_group(location_key(file!(), line!(), column!()), move || {
                    use_effect(Some(()), move |scope| {
                        push(&log, "mount");
                        scope.on_cleanup(move || push(&log, "unmount"))
                    })
                });
            }
        });
        composition.flush_effects();
    }
    assert_eq!(entries(&log), vec!["mount", "unmount"]);
}

#[test]
fn unmounted_layout_effect_cleans_up_during_commit() {
    let mut composition = Composition::new();
    let log: Log = Rc::default();
    for show in [true, false] {
        let log = Rc::clone(&log);
        render(&mut composition, move || {
            if show {
                with_group(location_key(file!(), line!(), column!()), move || {
                    use_layout_effect(Some(()), move |scope| {
                        push(&log, "mount");
                        scope.on_cleanup(move || push(&log, "unmount"))
                    })
                });
            }
        });
    }
    assert_eq!(entries(&log), vec!["mount", "unmount"]);
}

#[test]
fn effect_unmounted_before_flush_never_runs() {
    let mut composition = Composition::new();
    let runs = Rc::new(Cell::new(0));
    {
        let runs = Rc::clone(&runs);
        render(&mut composition, move || {
            use_effect(Some(()), move |scope| {
                runs.set(runs.get() + 1);
                scope.done()
            })
        });
    }
    composition.dispose();
    assert_eq!(runs.get(), 0);
}

#[test]
fn dependency_arity_change_aborts_the_pass() {
    let mut composition = Composition::new();
    let runs = Rc::new(Cell::new(0));
    let body = |deps: Vec<i32>| {
        let runs = Rc::clone(&runs);
        move || {
            use_memo(|| (), deps);
            use_layout_effect(EVERY_RENDER, move |scope| {
                runs.set(runs.get() + 1);
                scope.done()
            });
        }
    };
    render(&mut composition, body(vec![1]));
    assert_eq!(runs.get(), 1);

    let result = composition.render(ROOT, body(vec![1, 2]));
    assert_eq!(
        result.err(),
        Some(ComposeError::DependencyArityChanged {
            slot: 1,
            previous: 1,
            current: 2,
        })
    );
    assert_eq!(runs.get(), 1);
}

#[test]
fn conditional_hook_is_an_integrity_fault() {
    let mut composition = Composition::new();
    render(&mut composition, || {
        let _ = use_state(|| 0);
    });
    let result = composition.render(ROOT, || {
        let _ = use_ref(|| 0);
        let _ = use_state(|| 0);
    });
    assert!(matches!(result, Err(ComposeError::HookMismatch { slot: 1, .. })));
}

#[test]
fn composition_locals_resolve_to_nearest_provider() {
    let theme = compositionLocalOf(|| "light");
    let mut composition = Composition::new();
    let seen = render(&mut composition, || {
        let outer = theme.current();
        let (inner, nested) = CompositionLocalProvider([theme.provides("dark")], || {
            let inner = theme.current();
            let nested =
                CompositionLocalProvider([theme.provides("contrast")], || theme.current());
            (inner, nested)
        });
        (outer, inner, nested, theme.current())
    });
    assert_eq!(seen, ("light", "dark", "contrast", "light"));
}

#[test]
fn dispose_is_idempotent() {
    let mut composition = Composition::new();
    let cleanups = Rc::new(Cell::new(0));
    {
        let cleanups = Rc::clone(&cleanups);
        render(&mut composition, move || {
            use_layout_effect(Some(()), move |scope| {
                scope.on_cleanup(move || cleanups.set(cleanups.get() + 1))
            })
        });
    }
    composition.dispose();
    composition.dispose();
    drop(composition);
    assert_eq!(cleanups.get(), 1);
}

#[test]
fn aborted_pass_does_not_commit_effect_deps() {
    let mut composition = Composition::new();
    let log: Log = Rc::default();
    let body = |deps: Vec<i32>, user: &'static str| {
        let log = Rc::clone(&log);
        move || {
            use_memo(|| (), deps);
            use_layout_effect(Some((user,)), move |scope| {
                push(&log, format!("subscribe {user}"));
                scope.on_cleanup(move || push(&log, format!("unsubscribe {user}")))
            });
        }
    };
    render(&mut composition, body(vec![1], "ann"));

    let result = composition.render(ROOT, body(vec![1, 2], "bob"));
    assert!(matches!(
        result,
        Err(ComposeError::DependencyArityChanged { .. })
    ));
    assert_eq!(entries(&log), vec!["subscribe ann"]);

    render(&mut composition, body(vec![1, 2], "bob"));
    render(&mut composition, body(vec![1, 2], "bob"));
    assert_eq!(
        entries(&log),
        vec!["subscribe ann", "unsubscribe ann", "subscribe bob"]
    );
}

#[test]
fn initializer_may_read_composition_locals() {
    let theme = compositionLocalOf(|| "light");
    let mut composition = Composition::new();
    let seen = render(&mut composition, || {
        CompositionLocalProvider([theme.provides("dark")], || {
            let (state, _) = use_state(|| theme.current());
            let cell = use_ref(|| theme.current());
            (state, cell.get())
        })
    });
    assert_eq!(seen, ("dark", "dark"));
}

#[test]
#[should_panic(expected = "composer already in use")]
fn nested_composer_borrow_panics() {
    let mut composition = Composition::new();
    let _ = composition.render(ROOT, || {
        with_current_composer(|_| with_current_composer(|composer| composer.slot_index()))
    });
}

#[test]
#[should_panic(expected = "composer already in use")]
fn hook_inside_borrowed_initializer_panics() {
    let mut composition = Composition::new();
    let _ = composition.render(ROOT, || {
        with_current_composer(|composer| {
            composer.remember(|| use_state(|| 0).0);
        })
    });
}

#[test]
fn slot_count_tracks_mounted_call_sites() {
    let mut composition = Composition::new();
    for (show, expected) in [(true, 4), (false, 2), (true, 4)] {
        render(&mut composition, || {
            let _ = use_ref(|| 0u8);
            if show {
                with_group(location_key(file!(), line!(), column!()), || {
                    let _ = use_ref(|| 1u8);
                });
            }
        });
        assert_eq!(composition.slot_count(), expected);
    }
    composition.dispose();
    assert_eq!(composition.slot_count(), 0);
}
