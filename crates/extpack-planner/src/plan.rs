use extpack_core::{InstalledExtension, Namespace};
use serde::Serialize;

// The plan tree is shared with install-side planning, so the kind set covers
// both directions even though this crate only ever emits Uninstall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Install,
    Upgrade,
    Uninstall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanAction {
    pub target: InstalledExtension,
    pub previous: Vec<InstalledExtension>,
    pub kind: ActionKind,
    pub namespace: Namespace,
    pub optional: bool,
}

impl PlanAction {
    pub fn uninstall(target: InstalledExtension, namespace: Namespace) -> Self {
        let previous = vec![target.clone()];
        Self {
            target,
            previous,
            kind: ActionKind::Uninstall,
            namespace,
            optional: false,
        }
    }
}

// Children are the backward dependents of the node's target and are fully
// built before the node itself is appended to its branch; a plan is executed
// depth-first post-order. The same (id, namespace) pair may appear in more
// than one branch when it is reachable through independent dependency chains;
// nodes are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanNode {
    pub action: PlanAction,
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    pub fn new(action: PlanAction, children: Vec<PlanNode>) -> Self {
        Self { action, children }
    }
}
