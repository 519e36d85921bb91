#![allow(dead_code)]

//! Execution supervisor: runs prepared unit code inside the sandbox,
//! resolves the component callable, drives render passes and effects, and
//! turns every failure into a plain error message. Nothing here throws
//! past the sandbox boundary; callers get `Result<Node, String>` and the
//! string goes verbatim into the diagnostic view.

use super::bridge::{self, BridgeState};
use super::tree;
use mlua::{Function, Lua, MultiValue, ThreadStatus, Value, VmState};
use protoloom_weave::Node;
use regex::Regex;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Wall-clock budget for any single supervised call into the sandbox.
/// Isolated contexts cannot be cooperatively interrupted, so the deadline
/// fires from the VM interrupt.
pub const CALL_BUDGET_MS: u64 = 200;

/// Cap on state-driven re-render passes within one attempt. A component
/// whose effects keep setting state settles for whatever the last pass
/// produced.
pub const MAX_RENDER_PASSES: usize = 8;

/// The conventional component name resolved first.
pub const UNIT_ENTRY_NAME: &str = "GeneratedComponent";

fn candidate_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:local\s+)?function\s+([A-Z]\w*)|^\s*local\s+([A-Z]\w*)\s*=")
            .unwrap()
    })
}

/// Run a prepared unit: evaluate it, resolve the component, render.
/// `raw_source` is the unmodified source text, used only for the
/// fallback scan for capitalized declarations.
pub fn run(lua: &Lua, executable: &str, raw_source: &str) -> Result<Node, String> {
    run_inner(lua, executable, raw_source).map_err(|err| err.to_string())
}

/// Replay a registered onClick handler, then re-render the tree.
pub fn click(lua: &Lua, handler_id: u64) -> Result<Node, String> {
    click_inner(lua, handler_id).map_err(|err| err.to_string())
}

/// Whether a handler id is currently registered (i.e. the last rendered
/// tree had a button carrying it).
pub fn has_handler(lua: &Lua, handler_id: u64) -> bool {
    bridge::bridge_state_ref(lua)
        .map(|state| state.handlers.contains_key(&handler_id))
        .unwrap_or(false)
}

fn run_inner(lua: &Lua, executable: &str, raw_source: &str) -> mlua::Result<Node> {
    let component = resolve_component(lua, executable, raw_source)?;
    bridge::bridge_state_mut(lua)?.component = Some(component.clone());
    render_passes(lua, &component)
}

fn click_inner(lua: &Lua, handler_id: u64) -> mlua::Result<Node> {
    let (handler, component) = {
        let state = bridge::bridge_state_ref(lua)?;
        let handler = state.handlers.get(&handler_id).cloned().ok_or_else(|| {
            mlua::Error::RuntimeError(format!(
                "no interactive element registered for handler {}",
                handler_id
            ))
        })?;
        let component = state
            .component
            .clone()
            .ok_or_else(|| mlua::Error::runtime("no component loaded in this sandbox"))?;
        (handler, component)
    };

    supervised_call(lua, &handler)?;
    render_passes(lua, &component)
}

/// Resolve the component callable.
///
/// The unit is evaluated wrapped so that the conventional name is
/// returned if it is in scope (global or chunk-local). When that yields
/// nothing callable, every capitalized `function X` / `local X =`
/// declaration in the source is tried in order; first callable wins.
fn resolve_component(lua: &Lua, executable: &str, raw_source: &str) -> mlua::Result<Function> {
    match eval_returning(lua, executable, UNIT_ENTRY_NAME)? {
        Value::Function(f) => return Ok(f),
        _ => {}
    }

    for name in candidate_names(raw_source) {
        if name == UNIT_ENTRY_NAME {
            continue;
        }
        if let Ok(Value::Function(f)) = eval_returning(lua, executable, &name) {
            return Ok(f);
        }
    }

    Err(mlua::Error::RuntimeError(format!(
        "no callable '{}' declaration (or any other capitalized component) was found",
        UNIT_ENTRY_NAME
    )))
}

/// Evaluate the unit followed by `return <name>` as one chunk, so both
/// global and chunk-local declarations resolve.
fn eval_returning(lua: &Lua, executable: &str, name: &str) -> mlua::Result<Value> {
    let wrapped = format!("{}\n\nreturn {}", executable, name);
    let chunk = lua.load(wrapped).set_name("generated-unit").into_function()?;
    supervised_call(lua, &chunk)
}

fn candidate_names(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for captures in candidate_decl().captures_iter(source) {
        if let Some(m) = captures.get(1).or_else(|| captures.get(2)) {
            let name = m.as_str().to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Call the component until state settles (or the pass cap is reached):
/// build the tree, run queued effects, re-render if a setter fired.
fn render_passes(lua: &Lua, component: &Function) -> mlua::Result<Node> {
    let mut root = None;
    for _ in 0..MAX_RENDER_PASSES {
        bridge::bridge_state_mut(lua)?.begin_pass();

        let value = supervised_call(lua, component)?;
        let node = tree::node_from_value(lua, &value, 1)?;
        protoloom_weave::validate_tree(&node)
            .map_err(|err| mlua::Error::RuntimeError(err.to_string()))?;

        let effects = std::mem::take(&mut bridge::bridge_state_mut(lua)?.effects);
        for effect in effects {
            supervised_call(lua, &effect)?;
        }

        let dirty = bridge::bridge_state_ref(lua)?.dirty;
        root = Some(node);
        if !dirty {
            break;
        }
    }
    root.ok_or_else(|| mlua::Error::runtime("component produced no tree"))
}

/// Run a sandbox function on a supervised thread: periodic interrupt
/// yields hand control back to this loop, and the wall-clock deadline
/// aborts runaway execution. Returns the function's first return value.
fn supervised_call(lua: &Lua, func: &Function) -> mlua::Result<Value> {
    arm_deadline(lua);
    let result = drive_thread(lua, func);
    lua.remove_interrupt();
    result
}

fn arm_deadline(lua: &Lua) {
    let deadline = Instant::now() + Duration::from_millis(CALL_BUDGET_MS);
    let count = AtomicU64::new(0);
    const MAX_STACK_LEVEL: usize = 64;
    lua.set_interrupt(move |lua| {
        if Instant::now() > deadline {
            return Err(mlua::Error::RuntimeError(format!(
                "execution exceeded the {} ms budget",
                CALL_BUDGET_MS
            )));
        }
        // Only yield when no C (Rust) frame is on the stack; avoids "yield across C-call boundary".
        for level in 0..=MAX_STACK_LEVEL {
            if let Some(what) = lua.inspect_stack(level, |debug| debug.source().what) {
                if what == "C" {
                    return Ok(VmState::Continue);
                }
            } else {
                break;
            }
        }
        if count.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
            return Ok(VmState::Yield);
        }
        Ok(VmState::Continue)
    });
}

fn drive_thread(lua: &Lua, func: &Function) -> mlua::Result<Value> {
    let thread = lua.create_thread(func.clone())?;
    let mut last = MultiValue::new();
    loop {
        match thread.status() {
            ThreadStatus::Resumable => {
                last = thread.resume::<MultiValue>(())?;
            }
            ThreadStatus::Finished => break,
            ThreadStatus::Error => {
                return Err(mlua::Error::runtime("sandbox thread failed"));
            }
            ThreadStatus::Running => break,
        }
    }
    Ok(last.into_iter().next().unwrap_or(Value::Nil))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::loader;
    use crate::sandbox::vm::UnitSandbox;
    use protoloom_weave::node::*;

    const COUNTER: &str = r#"function GeneratedComponent()
    local n, setN = useState(0)
    return h("div", { class = "flex flex-col gap-2" }, {
        h("text", { id = "count", text = "Count: " .. n }),
        h("button", { text = "Increment", onClick = function() setN(n + 1) end }),
    })
end"#;

    fn find_text(node: &Node, id: &str) -> Option<String> {
        if let Node::Text(t) = node {
            if t.id.as_deref() == Some(id) {
                return Some(t.text.clone());
            }
        }
        node.children().iter().find_map(|c| find_text(c, id))
    }

    #[test]
    fn renders_counter_and_click_increments() {
        let sandbox = UnitSandbox::create().unwrap();
        let executable = loader::prepare(COUNTER);

        let root = run(&sandbox.lua, &executable, COUNTER).expect("render should succeed");
        assert_eq!(find_text(&root, "count").as_deref(), Some("Count: 0"));
        assert!(has_handler(&sandbox.lua, 1));

        let root = click(&sandbox.lua, 1).expect("click should succeed");
        assert_eq!(find_text(&root, "count").as_deref(), Some("Count: 1"));

        let root = click(&sandbox.lua, 1).expect("second click should succeed");
        assert_eq!(find_text(&root, "count").as_deref(), Some("Count: 2"));
    }

    #[test]
    fn unresolvable_symbol_fails_with_the_name_in_the_message() {
        let sandbox = UnitSandbox::create().unwrap();
        let source = r#"function GeneratedComponent() return UnknownIcon({}) end"#;
        let err = run(&sandbox.lua, source, source).unwrap_err();
        assert!(err.contains("UnknownIcon"), "message was: {}", err);
    }

    #[test]
    fn syntax_error_is_reported_not_thrown() {
        let sandbox = UnitSandbox::create().unwrap();
        let source = "function GeneratedComponent( return end";
        assert!(run(&sandbox.lua, source, source).is_err());
    }

    #[test]
    fn no_callable_component_fails_with_entry_name() {
        let sandbox = UnitSandbox::create().unwrap();
        let source = "local lowercase = function() return h(\"div\", {}, {}) end";
        let err = run(&sandbox.lua, source, source).unwrap_err();
        assert!(err.contains(UNIT_ENTRY_NAME));
    }

    #[test]
    fn chunk_local_component_resolves() {
        let sandbox = UnitSandbox::create().unwrap();
        let source =
            "local GeneratedComponent = function() return h(\"text\", { text = \"local\" }) end";
        let root = run(&sandbox.lua, source, source).unwrap();
        assert!(matches!(root, Node::Text(t) if t.text == "local"));
    }

    #[test]
    fn capitalized_fallback_candidate_resolves() {
        let sandbox = UnitSandbox::create().unwrap();
        let source = "function FancyCard() return h(\"text\", { text = \"fancy\" }) end";
        let root = run(&sandbox.lua, source, source).unwrap();
        assert!(matches!(root, Node::Text(t) if t.text == "fancy"));
    }

    #[test]
    fn infinite_loop_hits_the_budget() {
        let sandbox = UnitSandbox::create().unwrap();
        let source = "function GeneratedComponent() while true do end end";
        let started = Instant::now();
        let err = run(&sandbox.lua, source, source).unwrap_err();
        assert!(err.contains("budget"), "message was: {}", err);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn effect_driven_state_settles_within_pass_cap() {
        let sandbox = UnitSandbox::create().unwrap();
        let source = r#"function GeneratedComponent()
    local ready, setReady = useState(false)
    useEffect(function()
        if not ready then setReady(true) end
    end)
    local label = "loading"
    if ready then label = "ready" end
    return h("text", { id = "status", text = label })
end"#;
        let root = run(&sandbox.lua, source, source).unwrap();
        assert!(matches!(root, Node::Text(t) if t.text == "ready"));
    }

    #[test]
    fn effect_errors_surface_as_failures() {
        let sandbox = UnitSandbox::create().unwrap();
        let source = r#"function GeneratedComponent()
    useEffect(function() error("effect exploded") end)
    return h("div", {}, {})
end"#;
        let err = run(&sandbox.lua, source, source).unwrap_err();
        assert!(err.contains("effect exploded"));
    }

    #[test]
    fn candidate_scan_orders_and_dedupes() {
        let names = candidate_names(
            "local Helper = 1\nfunction Widget() end\nlocal Widget = 2\nfunction lowercase() end",
        );
        assert_eq!(names, vec!["Helper".to_string(), "Widget".to_string()]);
    }
}
