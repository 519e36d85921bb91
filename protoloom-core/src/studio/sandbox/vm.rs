//! Sandbox construction. One isolated Luau state per render attempt;
//! teardown is dropping the whole state, never in-place cleanup.

use super::bridge::{self, BridgeState};
use mlua::{Lua, Value};

/// Lua heap limit per preview sandbox: 1 MB. Generated component trees
/// are tiny; anything that needs more is runaway allocation.
pub const SANDBOX_MEMORY_LIMIT_BYTES: usize = 1024 * 1024;

/// Globals untrusted generated code must not reach. Calling one raises a
/// runtime error naming it.
const BLOCKED_GLOBALS: &[&str] = &[
    "io",
    "os",
    "require",
    "loadfile",
    "dofile",
    "getfenv",
    "setfenv",
    "debug",
];

/// One isolated execution context. Dropping it discards every pending
/// closure and half-built table the unit created.
pub struct UnitSandbox {
    pub lua: Lua,
}

impl UnitSandbox {
    /// Builds a fresh sandboxed Luau state: Luau sandbox mode, poisoned
    /// globals, memory limit, bridge symbols. The supervisor arms the
    /// execution interrupt per call; a fresh sandbox has none.
    pub fn create() -> Result<UnitSandbox, mlua::Error> {
        let lua = Lua::new();
        let _ = lua.sandbox(true);

        for name in BLOCKED_GLOBALS {
            let message = format!("{} is not available in generated components", name);
            lua.globals().set(
                *name,
                lua.create_function(move |_, _: Value| {
                    Err::<(), _>(mlua::Error::RuntimeError(message.clone()))
                })?,
            )?;
        }

        // print goes nowhere; the preview surface is the only output
        lua.globals().set(
            "print",
            lua.create_function(|_, _: mlua::Variadic<Value>| Ok(()))?,
        )?;

        lua.set_memory_limit(SANDBOX_MEMORY_LIMIT_BYTES)?;

        lua.set_app_data(BridgeState::default());
        bridge::register_all(&lua)?;

        Ok(UnitSandbox { lua })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_creation_registers_bridge() {
        let sandbox = UnitSandbox::create().expect("sandbox should build");
        let globals = sandbox.lua.globals();
        assert!(globals.get::<mlua::Function>("h").is_ok());
        assert!(globals.get::<mlua::Function>("useState").is_ok());
        assert!(globals.get::<mlua::Function>("Heart").is_ok());
    }

    #[test]
    fn blocked_global_raises_with_its_name() {
        let sandbox = UnitSandbox::create().unwrap();
        let err = sandbox
            .lua
            .load("return require(\"socket\")")
            .exec()
            .unwrap_err();
        assert!(err.to_string().contains("require"));
    }

    #[test]
    fn memory_limit_is_enforced() {
        let sandbox = UnitSandbox::create().unwrap();
        let result = sandbox
            .lua
            .load("local t = {} for i = 1, 1e9 do t[i] = string.rep(\"x\", 100) end")
            .exec();
        assert!(result.is_err());
    }

    #[test]
    fn each_sandbox_is_independent() {
        let a = UnitSandbox::create().unwrap();
        let b = UnitSandbox::create().unwrap();
        a.lua.load("leak = 42").exec().ok();
        let leaked: Option<i64> = b.lua.globals().get("leak").unwrap_or(None);
        assert_eq!(leaked, None);
    }
}
