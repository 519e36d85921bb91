#![allow(dead_code)]

//! Runtime bridge: the fixed symbol table generated code sees as globals.
//! The generation prompt forbids imports, so everything a component is
//! allowed to reference must already be in scope before its code runs:
//! the `h` node constructor, the `useState`/`useEffect` hook pair, and
//! the icon vocabulary. Anything else is a normal execution failure.

use mlua::{Function, Lua, Result, Table, Value};
use std::collections::HashMap;

/// Per-attempt execution state, stored in the VM's app data. Hook slots
/// survive across render passes within one attempt (that is what makes
/// `useState` stateful); handlers re-register on every pass so their ids
/// stay stable for an unchanged tree shape.
#[derive(Default)]
pub struct BridgeState {
    /// Hook value slots, keyed by call order.
    pub slots: Vec<Value>,
    /// Next hook slot to hand out in the current render pass.
    pub cursor: usize,
    /// Set by any state setter; requests another render pass.
    pub dirty: bool,
    /// Effects queued by `useEffect` during the current pass.
    pub effects: Vec<Function>,
    /// onClick handlers registered while converting the current tree.
    pub handlers: HashMap<u64, Function>,
    pub next_handler_id: u64,
    /// The resolved component callable, kept for interaction replay.
    pub component: Option<Function>,
}

impl BridgeState {
    /// Begin a render pass: hook cursor rewinds, handlers re-register,
    /// slot values persist.
    pub fn begin_pass(&mut self) {
        self.cursor = 0;
        self.dirty = false;
        self.effects.clear();
        self.handlers.clear();
        self.next_handler_id = 0;
    }

    pub fn register_handler(&mut self, handler: Function) -> u64 {
        self.next_handler_id += 1;
        let id = self.next_handler_id;
        self.handlers.insert(id, handler);
        id
    }
}

/// Icon vocabulary the generation prompt advertises. Each name becomes a
/// callable global returning an icon node; names outside this table fail
/// at call time with the offending name in the error message.
pub const ICON_NAMES: &[&str] = &[
    "Heart",
    "Star",
    "ChevronDown",
    "ChevronUp",
    "ChevronLeft",
    "ChevronRight",
    "ArrowRight",
    "ArrowLeft",
    "User",
    "Mail",
    "Phone",
    "Calendar",
    "Search",
    "Menu",
    "X",
    "Plus",
    "Minus",
    "Edit",
    "Settings",
    "Home",
    "Bell",
    "Share",
    "Download",
    "Upload",
    "Eye",
    "Lock",
    "Check",
    "AlertCircle",
    "Info",
    "ShoppingCart",
    "Play",
    "Pause",
    "Sun",
    "Moon",
    "Camera",
    "File",
    "Link",
    "Copy",
    "Save",
    "Database",
    "Code",
    "Smartphone",
    "Coffee",
    "Book",
    "Award",
    "Globe",
    "Trash",
    "Filter",
];

/// Register the full bridge on a fresh sandbox state. Must run before any
/// unit code is loaded.
pub fn register_all(lua: &Lua) -> Result<()> {
    register_node_constructor(lua)?;
    register_hooks(lua)?;
    register_icons(lua)?;
    Ok(())
}

fn register_node_constructor(lua: &Lua) -> Result<()> {
    let h = lua.create_function(
        |lua, (tag, props, children): (String, Option<Table>, Option<Table>)| {
            let node = lua.create_table()?;
            node.set("tag", tag)?;
            node.set(
                "props",
                match props {
                    Some(p) => p,
                    None => lua.create_table()?,
                },
            )?;
            node.set(
                "children",
                match children {
                    Some(c) => c,
                    None => lua.create_table()?,
                },
            )?;
            Ok(node)
        },
    )?;
    lua.globals().set("h", h)?;
    Ok(())
}

fn register_hooks(lua: &Lua) -> Result<()> {
    let use_state = lua.create_function(|lua, default: Value| {
        let index = {
            let mut state = bridge_state_mut(lua)?;
            let index = state.cursor;
            state.cursor += 1;
            if index == state.slots.len() {
                state.slots.push(default);
            }
            index
        };

        let value = bridge_state_mut(lua)?.slots[index].clone();

        let setter = lua.create_function(move |lua, new_value: Value| {
            let mut state = bridge_state_mut(lua)?;
            if index < state.slots.len() {
                state.slots[index] = new_value;
                state.dirty = true;
            }
            Ok(())
        })?;

        Ok((value, setter))
    })?;
    lua.globals().set("useState", use_state)?;

    let use_effect = lua.create_function(|lua, (effect, _deps): (Function, Option<Table>)| {
        bridge_state_mut(lua)?.effects.push(effect);
        Ok(())
    })?;
    lua.globals().set("useEffect", use_effect)?;

    Ok(())
}

fn register_icons(lua: &Lua) -> Result<()> {
    for name in ICON_NAMES {
        let icon = lua.create_function(move |lua, props: Option<Table>| {
            let node = lua.create_table()?;
            node.set("tag", "icon")?;
            let props = match props {
                Some(p) => p,
                None => lua.create_table()?,
            };
            props.set("name", *name)?;
            node.set("props", props)?;
            node.set("children", lua.create_table()?)?;
            Ok(node)
        })?;
        lua.globals().set(*name, icon)?;
    }
    Ok(())
}

pub fn bridge_state_mut(lua: &Lua) -> Result<mlua::AppDataRefMut<'_, BridgeState>> {
    lua.app_data_mut::<BridgeState>()
        .ok_or_else(|| mlua::Error::runtime("bridge state missing from sandbox"))
}

pub fn bridge_state_ref(lua: &Lua) -> Result<mlua::AppDataRef<'_, BridgeState>> {
    lua.app_data_ref::<BridgeState>()
        .ok_or_else(|| mlua::Error::runtime("bridge state missing from sandbox"))
}
