//! Converts the Lua table a component returns into a weave node tree.
//! Unknown tags and malformed shapes become execution errors; onClick
//! functions are lifted out of the table into the handler registry and
//! replaced by numeric ids the preview surface can replay.

use super::bridge;
use mlua::{Function, Lua, Table, Value};
use protoloom_weave::node::*;
use protoloom_weave::{Node, MAX_NESTING_DEPTH};

pub fn node_from_value(lua: &Lua, value: &Value, depth: usize) -> mlua::Result<Node> {
    if depth > MAX_NESTING_DEPTH {
        return Err(mlua::Error::RuntimeError(format!(
            "component tree exceeds the maximum nesting depth ({})",
            MAX_NESTING_DEPTH
        )));
    }
    match value {
        // Bare strings inside children lists are shorthand for text nodes
        Value::String(s) => Ok(Node::Text(Text {
            id: None,
            class: None,
            text: s.to_str()?.to_string(),
        })),
        Value::Table(table) => node_from_table(lua, table, depth),
        other => Err(mlua::Error::RuntimeError(format!(
            "expected a node table, got {}",
            other.type_name()
        ))),
    }
}

fn node_from_table(lua: &Lua, table: &Table, depth: usize) -> mlua::Result<Node> {
    let tag: String = table
        .get::<Option<String>>("tag")?
        .ok_or_else(|| mlua::Error::runtime("node table has no 'tag' field"))?;
    let props: Table = match table.get::<Option<Table>>("props")? {
        Some(p) => p,
        None => lua.create_table()?,
    };
    let id: Option<String> = props.get("id")?;
    let class: Option<String> = props.get("class")?;

    match tag.as_str() {
        "div" | "container" | "section" | "card" => {
            let mut children = Vec::new();
            if let Some(list) = table.get::<Option<Table>>("children")? {
                for child in list.sequence_values::<Value>() {
                    let child = child?;
                    if matches!(child, Value::Nil) {
                        continue;
                    }
                    children.push(node_from_value(lua, &child, depth + 1)?);
                }
            }
            Ok(Node::Container(Container { id, class, children }))
        }
        "text" | "span" | "p" | "label" | "h1" | "h2" | "h3" => {
            let text = match props.get::<Option<String>>("text")? {
                Some(t) => t,
                None => joined_string_children(table)?,
            };
            Ok(Node::Text(Text { id, class, text }))
        }
        "button" => {
            let label = props
                .get::<Option<String>>("text")?
                .or(props.get::<Option<String>>("label")?)
                .unwrap_or_default();
            let disabled = props.get::<Option<bool>>("disabled")?.unwrap_or(false);
            let handler = match props.get::<Option<Function>>("onClick")? {
                Some(f) => Some(bridge::bridge_state_mut(lua)?.register_handler(f)),
                None => None,
            };
            Ok(Node::Button(Button {
                id,
                class,
                label,
                handler,
                disabled,
            }))
        }
        "input" => Ok(Node::Input(Input {
            id,
            class,
            name: props.get("name")?,
            placeholder: props.get("placeholder")?,
            value: props.get("value")?,
        })),
        "image" | "img" => Ok(Node::Image(Image {
            id,
            class,
            src: props.get::<Option<String>>("src")?.unwrap_or_default(),
            alt: props.get("alt")?,
        })),
        "icon" => Ok(Node::Icon(Icon {
            id,
            class,
            name: props.get::<Option<String>>("name")?.unwrap_or_default(),
            size: props.get("size")?,
        })),
        "badge" => Ok(Node::Badge(Badge {
            id,
            class,
            text: props.get::<Option<String>>("text")?.unwrap_or_default(),
        })),
        "divider" | "hr" => Ok(Node::Divider(Divider { id, class })),
        "spacer" => Ok(Node::Spacer(Spacer {
            id,
            class,
            size: props.get("size")?,
        })),
        other => Err(mlua::Error::RuntimeError(format!(
            "unknown node tag '{}'",
            other
        ))),
    }
}

fn joined_string_children(table: &Table) -> mlua::Result<String> {
    let mut text = String::new();
    if let Some(list) = table.get::<Option<Table>>("children")? {
        for child in list.sequence_values::<Value>() {
            if let Value::String(s) = child? {
                text.push_str(&s.to_str()?);
            }
        }
    }
    Ok(text)
}
