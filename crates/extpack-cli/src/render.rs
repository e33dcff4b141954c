use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use extpack_core::{InstalledExtension, Namespace};
use extpack_planner::{ActionKind, PlanNode, Progress};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    if std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn target_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn section_line(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(colorize(section_style(), &format!("== {title} =="))),
    }
}

fn action_word(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Install => "install",
        ActionKind::Upgrade => "upgrade",
        ActionKind::Uninstall => "uninstall",
    }
}

fn namespace_suffix(namespace: &Namespace) -> String {
    match namespace {
        Namespace::Global => "(global)".to_string(),
        Namespace::Named(name) => format!("(namespace {name})"),
    }
}

pub(crate) fn plan_lines(plan: &[PlanNode], style: OutputStyle) -> Vec<String> {
    fn walk(node: &PlanNode, depth: usize, style: OutputStyle, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        let target = node.action.target.id.to_string();
        let target = match style {
            OutputStyle::Plain => target,
            OutputStyle::Rich => colorize(target_style(), &target),
        };
        lines.push(format!(
            "{indent}{} {target} {}",
            action_word(node.action.kind),
            namespace_suffix(&node.action.namespace)
        ));
        for child in &node.children {
            walk(child, depth + 1, style, lines);
        }
    }

    let mut lines = Vec::new();
    for node in plan {
        walk(node, 0, style, &mut lines);
    }
    lines
}

// Children before parents: the flattened post-order is the order an executor
// applies the plan.
pub(crate) fn removal_order_lines(plan: &[PlanNode]) -> Vec<String> {
    fn walk<'a>(node: &'a PlanNode, out: &mut Vec<&'a PlanNode>) {
        for child in &node.children {
            walk(child, out);
        }
        out.push(node);
    }

    let mut ordered = Vec::new();
    for node in plan {
        walk(node, &mut ordered);
    }

    ordered
        .iter()
        .enumerate()
        .map(|(index, node)| {
            format!(
                "{:>3}. {} {}",
                index + 1,
                node.action.target.id,
                namespace_suffix(&node.action.namespace)
            )
        })
        .collect()
}

pub(crate) fn installed_lines(installed: &[InstalledExtension]) -> Vec<String> {
    installed
        .iter()
        .map(|extension| {
            let scope = match &extension.namespaces {
                None => "(global)".to_string(),
                Some(namespaces) => {
                    let names: Vec<&str> = namespaces.iter().map(String::as_str).collect();
                    format!("[{}]", names.join(", "))
                }
            };
            format!(
                "{} {} {scope}",
                extension.id, extension.extension_type
            )
        })
        .collect()
}

// Drives one indicatif bar from the planner's progress callbacks. Only the
// top level (the requested targets) is surfaced; nested levels just track
// depth so steps from inner levels are not counted against the bar.
pub(crate) struct PlanProgress {
    state: Mutex<PlanProgressState>,
}

struct PlanProgressState {
    depth: usize,
    bar: Option<ProgressBar>,
    rich: bool,
}

impl PlanProgress {
    pub(crate) fn new(style: OutputStyle) -> Self {
        Self {
            state: Mutex::new(PlanProgressState {
                depth: 0,
                bar: None,
                rich: style == OutputStyle::Rich,
            }),
        }
    }
}

impl Progress for PlanProgress {
    fn push_level(&self, size: usize) {
        let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());
        if state.depth == 0 && state.rich {
            let bar = ProgressBar::new(size.max(1) as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.cyan.bold} {msg:<8} [{bar:20.cyan/blue}] {pos:>3}/{len:3}",
            ) {
                bar.set_style(style.tick_chars("\\|/- ").progress_chars("=>-"));
            }
            bar.set_message("plan");
            bar.enable_steady_tick(Duration::from_millis(80));
            state.bar = Some(bar);
        }
        state.depth += 1;
    }

    fn step(&self) {
        let state = self.state.lock().unwrap_or_else(|err| err.into_inner());
        if state.depth == 1 {
            if let Some(bar) = &state.bar {
                bar.inc(1);
            }
        }
    }

    fn pop_level(&self) {
        let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            if let Some(bar) = state.bar.take() {
                bar.finish_and_clear();
            }
        }
    }
}
