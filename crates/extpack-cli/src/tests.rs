use extpack_core::{ExtensionId, InstalledExtension, Namespace};
use extpack_planner::{ExtensionHandler, HandlerRegistry, PlanAction, PlanNode, UninstallError};
use semver::Version;

use crate::commands::build_request;
use crate::handlers::BuiltinHandlers;
use crate::render::{installed_lines, plan_lines, removal_order_lines, OutputStyle};

fn installed(id: &str, version: &str, extension_type: &str) -> InstalledExtension {
    InstalledExtension {
        id: ExtensionId::new(id, Version::parse(version).expect("version should parse")),
        extension_type: extension_type.to_string(),
        namespaces: None,
    }
}

fn uninstall_node(extension: InstalledExtension, namespace: Namespace) -> PlanNode {
    PlanNode::new(PlanAction::uninstall(extension, namespace), Vec::new())
}

#[test]
fn builds_request_from_specs_and_namespaces() {
    let request = build_request(
        &["blog-app@2.4.0".to_string(), "blog-lib".to_string()],
        &["tenant-a".to_string(), "tenant-a".to_string()],
        true,
    )
    .expect("request should build");

    assert_eq!(request.targets.len(), 2);
    assert_eq!(request.targets[0].to_string(), "blog-app@2.4.0");
    assert_eq!(request.targets[1].version, None);
    assert_eq!(
        request.namespaces.as_ref().map(|namespaces| namespaces.len()),
        Some(1),
        "namespace overrides are deduplicated"
    );
    assert!(request.verbose);
}

#[test]
fn empty_namespace_list_means_no_override() {
    let request =
        build_request(&["blog-app".to_string()], &[], false).expect("request should build");
    assert!(request.namespaces.is_none());
    assert!(!request.has_namespaces());
}

#[test]
fn rejects_invalid_spec() {
    let err = build_request(&["blog-app@bad".to_string()], &[], false)
        .expect_err("invalid spec must fail");
    assert!(err.to_string().contains("invalid extension spec"));
}

#[test]
fn renders_plan_tree_with_indented_children() {
    let child = uninstall_node(
        installed("addon", "1.1.0", "jar"),
        Namespace::named("tenant-a"),
    );
    let root = PlanNode::new(
        PlanAction::uninstall(installed("base", "2.0.0", "jar"), Namespace::Global),
        vec![child],
    );

    let lines = plan_lines(&[root], OutputStyle::Plain);
    assert_eq!(
        lines,
        vec![
            "uninstall base@2.0.0 (global)",
            "  uninstall addon@1.1.0 (namespace tenant-a)",
        ]
    );
}

#[test]
fn removal_order_is_post_order_and_numbered() {
    let leaf = uninstall_node(installed("leaf", "1.0.0", "jar"), Namespace::Global);
    let root = PlanNode::new(
        PlanAction::uninstall(installed("base", "1.0.0", "jar"), Namespace::Global),
        vec![leaf],
    );

    let lines = removal_order_lines(&[root]);
    assert_eq!(
        lines,
        vec![
            "  1. leaf@1.0.0 (global)",
            "  2. base@1.0.0 (global)",
        ]
    );
}

#[test]
fn lists_installed_extensions_with_scope() {
    let global = installed("platform", "5.0.0", "jar");
    let namespaced = InstalledExtension {
        namespaces: Some(
            ["tenant-a", "tenant-b"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        ),
        ..installed("blog-app", "2.4.0", "xar")
    };

    let lines = installed_lines(&[global, namespaced]);
    assert_eq!(
        lines,
        vec![
            "platform@5.0.0 jar (global)",
            "blog-app@2.4.0 xar [tenant-a, tenant-b]",
        ]
    );
}

#[test]
fn builtin_registry_vetoes_core_extensions() {
    let handlers = BuiltinHandlers::new();
    let handler = handlers.handler("core").expect("core handler is registered");
    let request = build_request(&["core-ui@1.0.0".to_string()], &[], false)
        .expect("request should build");

    let err = handler
        .check_uninstall(
            &installed("core-ui", "1.0.0", "core"),
            &Namespace::Global,
            &request,
        )
        .expect_err("core extensions must be vetoed");
    assert!(matches!(err, UninstallError::Vetoed { .. }));
}

#[test]
fn builtin_registry_rejects_unknown_types() {
    let handlers = BuiltinHandlers::new();
    let err = handlers
        .handler("apk")
        .err()
        .expect("unknown type has no handler");
    assert_eq!(err.extension_type, "apk");
}
