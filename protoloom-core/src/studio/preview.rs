#![allow(dead_code)]

//! Preview pane hub: one isolated sandbox per pane, replaced wholesale on
//! every render. The hub owns render sequencing; persistence and chat stay
//! elsewhere. Lua execution is CPU-bound, so callers run hub methods on a
//! blocking thread.

use crate::sandbox::{loader, supervisor, vm::UnitSandbox};
use crate::viewport::ViewportPreset;
use dashmap::DashMap;
use protoloom_weave::html;
use serde::Serialize;
use uuid::Uuid;

/// Immutable snapshot of the unit one render attempt works on. Cloned out
/// of the store at call time; later edits never mutate an in-flight
/// attempt.
#[derive(Debug, Clone)]
pub struct UnitSnapshot {
    pub id: Uuid,
    pub name: String,
    pub source_text: String,
    pub style_text: String,
}

/// Outcome of a pane's latest render attempt.
pub enum PaneOutcome {
    /// No unit has been rendered on this pane yet.
    Empty,
    Pending,
    Rendered {
        html: String,
    },
    /// The unit failed to execute; the diagnostic document is shown.
    Failed {
        message: String,
        html: String,
    },
    /// The sandbox itself could not be created. A host problem, shown
    /// distinctly from a code diagnostic.
    Unavailable {
        message: String,
        html: String,
    },
}

impl PaneOutcome {
    fn state(&self) -> &'static str {
        match self {
            PaneOutcome::Empty => "empty",
            PaneOutcome::Pending => "pending",
            PaneOutcome::Rendered { .. } => "rendered",
            PaneOutcome::Failed { .. } => "failed",
            PaneOutcome::Unavailable { .. } => "unavailable",
        }
    }
}

pub struct Pane {
    /// Monotonic render attempt counter. Bumped as the first step of
    /// every render, before the old sandbox is discarded.
    pub generation: u64,
    pub viewport: ViewportPreset,
    /// One-shot flag for UI feedback only.
    pub refreshing: bool,
    pub outcome: PaneOutcome,
    sandbox: Option<UnitSandbox>,
    unit: Option<UnitSnapshot>,
}

impl Default for Pane {
    fn default() -> Self {
        Self {
            generation: 0,
            viewport: ViewportPreset::default(),
            refreshing: false,
            outcome: PaneOutcome::Empty,
            sandbox: None,
            unit: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaneStatus {
    pub state: &'static str,
    pub message: Option<String>,
    pub refreshing: bool,
    pub viewport: ViewportPreset,
}

/// All live preview panes, keyed by session id.
#[derive(Default)]
pub struct PreviewHub {
    panes: DashMap<Uuid, Pane>,
}

impl PreviewHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `unit` on the pane, superseding whatever ran there before.
    /// The previous sandbox is dropped before the new one is built, so at
    /// no point do two contexts own the surface.
    pub fn render(&self, pane_id: Uuid, unit: UnitSnapshot) {
        let mut pane = self.panes.entry(pane_id).or_default();
        pane.generation += 1;
        pane.sandbox = None;
        pane.outcome = PaneOutcome::Pending;
        pane.unit = Some(unit.clone());
        let dimensions = pane.viewport.dimensions();

        let executable = loader::prepare(&unit.source_text);
        match UnitSandbox::create() {
            Err(err) => {
                let message = err.to_string();
                log::error!("preview sandbox creation failed: {}", message);
                pane.outcome = PaneOutcome::Unavailable {
                    html: html::unavailable_document(&message),
                    message,
                };
            }
            Ok(sandbox) => match supervisor::run(&sandbox.lua, &executable, &unit.source_text) {
                Ok(root) => {
                    let doc = html::render_preview_document(&root, dimensions, &unit.style_text);
                    pane.outcome = PaneOutcome::Rendered { html: doc };
                    pane.sandbox = Some(sandbox);
                }
                Err(message) => {
                    log::warn!("unit {} failed to render: {}", unit.id, message);
                    pane.outcome = PaneOutcome::Failed {
                        html: html::diagnostic_document(&message),
                        message,
                    };
                }
            },
        }
        pane.refreshing = false;
    }

    /// Replay the current unit with no other state change. Returns false
    /// when the pane has nothing to replay.
    pub fn refresh(&self, pane_id: Uuid) -> bool {
        let unit = {
            let mut pane = match self.panes.get_mut(&pane_id) {
                Some(p) => p,
                None => return false,
            };
            pane.refreshing = true;
            pane.unit.clone()
        };
        match unit {
            Some(unit) => {
                self.render(pane_id, unit);
                true
            }
            None => false,
        }
    }

    /// Change the device preset and replay the current unit under the new
    /// dimensions.
    pub fn set_preset(&self, pane_id: Uuid, preset: ViewportPreset) {
        let unit = {
            let mut pane = self.panes.entry(pane_id).or_default();
            pane.viewport = preset;
            pane.unit.clone()
        };
        if let Some(unit) = unit {
            self.render(pane_id, unit);
        }
    }

    /// Replay a button handler inside the pane's live sandbox and
    /// re-render. `Err` means the request itself was bad (no pane, no
    /// live render, unknown handler); execution failures surface through
    /// the pane outcome instead.
    pub fn click(&self, pane_id: Uuid, handler: u64) -> Result<(), String> {
        let mut pane = self
            .panes
            .get_mut(&pane_id)
            .ok_or_else(|| "no preview pane for this session".to_string())?;
        let Some(unit) = pane.unit.clone() else {
            return Err("no unit rendered on this pane".to_string());
        };
        let dimensions = pane.viewport.dimensions();
        let Some(sandbox) = pane.sandbox.take() else {
            return Err("no live rendered component".to_string());
        };
        if !supervisor::has_handler(&sandbox.lua, handler) {
            pane.sandbox = Some(sandbox);
            return Err(format!("no interactive element with handler {}", handler));
        }

        match supervisor::click(&sandbox.lua, handler) {
            Ok(root) => {
                let doc = html::render_preview_document(&root, dimensions, &unit.style_text);
                pane.outcome = PaneOutcome::Rendered { html: doc };
                pane.sandbox = Some(sandbox);
            }
            Err(message) => {
                log::warn!("handler {} on unit {} failed: {}", handler, unit.id, message);
                pane.outcome = PaneOutcome::Failed {
                    html: html::diagnostic_document(&message),
                    message,
                };
            }
        }
        Ok(())
    }

    /// The document currently owning the pane's surface.
    pub fn document(&self, pane_id: Uuid) -> String {
        match self.panes.get(&pane_id) {
            Some(pane) => match &pane.outcome {
                PaneOutcome::Empty | PaneOutcome::Pending => html::empty_document(),
                PaneOutcome::Rendered { html } => html.clone(),
                PaneOutcome::Failed { html, .. } => html.clone(),
                PaneOutcome::Unavailable { html, .. } => html.clone(),
            },
            None => html::empty_document(),
        }
    }

    pub fn status(&self, pane_id: Uuid) -> PaneStatus {
        match self.panes.get(&pane_id) {
            Some(pane) => PaneStatus {
                state: pane.outcome.state(),
                message: match &pane.outcome {
                    PaneOutcome::Failed { message, .. }
                    | PaneOutcome::Unavailable { message, .. } => Some(message.clone()),
                    _ => None,
                },
                refreshing: pane.refreshing,
                viewport: pane.viewport,
            },
            None => PaneStatus {
                state: "empty",
                message: None,
                refreshing: false,
                viewport: ViewportPreset::default(),
            },
        }
    }

    /// Whether the pane still needs its unit loaded from the store (fresh
    /// process, nothing rendered yet).
    pub fn needs_hydration(&self, pane_id: Uuid) -> bool {
        match self.panes.get(&pane_id) {
            Some(pane) => pane.unit.is_none(),
            None => true,
        }
    }

    /// Drop the pane and its sandbox (owning session deleted).
    pub fn dispose(&self, pane_id: Uuid) {
        self.panes.remove(&pane_id);
    }

    /// Number of panes currently holding a live sandbox.
    pub fn live_sandbox_count(&self) -> usize {
        self.panes
            .iter()
            .filter(|entry| entry.value().sandbox.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(source: &str) -> UnitSnapshot {
        UnitSnapshot {
            id: Uuid::new_v4(),
            name: "GeneratedComponent".to_string(),
            source_text: source.to_string(),
            style_text: String::new(),
        }
    }

    const UNIT_A: &str =
        "function GeneratedComponent() return h(\"text\", { text = \"unit alpha\" }) end";
    const UNIT_B: &str =
        "function GeneratedComponent() return h(\"text\", { text = \"unit beta\" }) end";

    #[test]
    fn second_render_fully_supersedes_the_first() {
        let hub = PreviewHub::new();
        let pane = Uuid::new_v4();

        hub.render(pane, snapshot(UNIT_A));
        hub.render(pane, snapshot(UNIT_B));

        let doc = hub.document(pane);
        assert!(doc.contains("unit beta"));
        assert!(!doc.contains("unit alpha"));
        assert_eq!(hub.live_sandbox_count(), 1);
    }

    #[test]
    fn failed_render_shows_diagnostic_and_drops_sandbox() {
        let hub = PreviewHub::new();
        let pane = Uuid::new_v4();

        hub.render(pane, snapshot("function GeneratedComponent() return Nope() end"));

        assert_eq!(hub.status(pane).state, "failed");
        assert!(hub.document(pane).contains("Component failed to render"));
        assert_eq!(hub.live_sandbox_count(), 0);
    }

    #[test]
    fn refresh_replays_current_unit() {
        let hub = PreviewHub::new();
        let pane = Uuid::new_v4();

        assert!(!hub.refresh(pane));

        hub.render(pane, snapshot(UNIT_A));
        let first_generation = hub.panes.get(&pane).unwrap().generation;
        assert!(hub.refresh(pane));

        assert!(hub.document(pane).contains("unit alpha"));
        assert!(hub.panes.get(&pane).unwrap().generation > first_generation);
        assert!(!hub.status(pane).refreshing);
    }

    #[test]
    fn preset_change_replays_under_new_dimensions() {
        let hub = PreviewHub::new();
        let pane = Uuid::new_v4();

        hub.render(pane, snapshot(UNIT_A));
        hub.set_preset(pane, ViewportPreset::Compact);

        let doc = hub.document(pane);
        assert!(doc.contains("width:375px;min-height:667px"));
    }

    #[test]
    fn click_replays_handler_and_rerenders() {
        let hub = PreviewHub::new();
        let pane = Uuid::new_v4();
        let counter = "function GeneratedComponent()\n    local n, setN = useState(0)\n    return h(\"div\", {}, {\n        h(\"text\", { text = \"n=\" .. n }),\n        h(\"button\", { text = \"+\", onClick = function() setN(n + 1) end }),\n    })\nend";

        hub.render(pane, snapshot(counter));
        assert!(hub.document(pane).contains("n=0"));

        hub.click(pane, 1).expect("click should be accepted");
        assert!(hub.document(pane).contains("n=1"));

        assert!(hub.click(pane, 99).is_err());
        // a bad handler id does not poison the rendered view
        assert!(hub.document(pane).contains("n=1"));
    }

    #[test]
    fn dispose_removes_pane_and_sandbox() {
        let hub = PreviewHub::new();
        let pane = Uuid::new_v4();
        hub.render(pane, snapshot(UNIT_A));
        assert_eq!(hub.live_sandbox_count(), 1);

        hub.dispose(pane);
        assert_eq!(hub.live_sandbox_count(), 0);
        assert_eq!(hub.status(pane).state, "empty");
    }
}
