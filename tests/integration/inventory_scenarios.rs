//! End-to-end enumeration scenarios against a scripted provider: login,
//! then one listing pass, checked against the exact text an operator sees.

use pvelist::credentials::Principal;
use pvelist::error::ApiError;
use pvelist::inventory;
use pvelist::resource::{ListTarget, ResourceCategory};
use pvelist::session;
use serde_json::json;

use crate::integration::test_utils::{records, ScriptedProvider};

const NODES: ListTarget = ListTarget::Category(ResourceCategory::Node);
const STORAGE: ListTarget = ListTarget::Category(ResourceCategory::Storage);
const VMS: ListTarget = ListTarget::Category(ResourceCategory::VirtualMachine);

async fn login_and_list(
    provider: &mut ScriptedProvider,
    target: ListTarget,
) -> (Result<inventory::InventorySummary, ApiError>, String) {
    let principal = Principal::normalize("root", "pam");
    let mut out = Vec::new();
    let result = match session::establish(provider, &principal, "secret", "").await {
        Ok(()) => inventory::list(target, &*provider, &mut out).await,
        Err(e) => Err(e),
    };
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_two_nodes_render_in_server_order() {
    let mut provider = ScriptedProvider::new();
    provider.nodes = records(vec![
        json!({"node": "pve2", "status": "online", "maxcpu": 8}),
        json!({"node": "pve1", "status": "offline"}),
    ]);

    let (result, text) = login_and_list(&mut provider, NODES).await;

    assert_eq!(result.unwrap().rendered, 2);
    assert_eq!(
        text,
        "pve2\n\tmaxcpu: 8\n\tstatus: online\npve1\n\tstatus: offline\n"
    );
    assert_eq!(provider.calls(), vec!["login root@pam", "nodes"]);
}

#[tokio::test]
async fn test_failed_login_lists_nothing() {
    let mut provider = ScriptedProvider::new();
    provider.accepted_password = Some("other".to_string());
    provider.nodes = records(vec![json!({"node": "pve1"})]);

    let (result, text) = login_and_list(&mut provider, NODES).await;

    let err = result.unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(
        err.root_cause(),
        ApiError::AuthenticationFailed(_)
    ));
    assert!(text.is_empty());
    assert_eq!(provider.calls(), vec!["login root@pam"]);
}

#[tokio::test]
async fn test_storage_listing_aborts_at_first_failing_node() {
    let mut provider = ScriptedProvider::new();
    provider.nodes = records(vec![json!({"node": "a"}), json!({"node": "b"})]);
    provider.storages.insert(
        "a".to_string(),
        records(vec![json!({"storage": "local", "type": "dir", "active": 1})]),
    );
    provider.failures.push("storage b".to_string());

    let (result, text) = login_and_list(&mut provider, STORAGE).await;

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to fetch storages for node b: Request failed: storage b refused"
    );
    assert_eq!(text, "a\n\tlocal\n\t\tactive: 1\n\t\ttype: dir\nb\n");
}

#[tokio::test]
async fn test_vm_without_agent_still_renders_completely() {
    let mut provider = ScriptedProvider::new();
    provider.vms = records(vec![
        json!({"name": "web", "vmid": 100, "node": "a", "type": "qemu", "status": "running"}),
        json!({"name": "db", "vmid": 101, "node": "a", "type": "qemu", "status": "stopped"}),
    ]);
    provider
        .configs
        .insert(100, records(vec![json!({"cores": 2, "memory": "2048"})]).remove(0));
    provider
        .configs
        .insert(101, records(vec![json!({"cores": 4})]).remove(0));
    provider.interfaces.insert(
        100,
        records(vec![json!({"name": "lo"}), json!({"name": "eth0"})]),
    );
    provider.failures.push("agent 101".to_string());

    let (result, text) = login_and_list(&mut provider, VMS).await;

    assert_eq!(result.unwrap().rendered, 2);
    assert_eq!(
        text,
        "web\n Status:\n\tnode: a\n\tstatus: running\n\ttype: qemu\n\tvmid: 100\n \
         Config:\n\tcores: 2\n\tmemory: 2048\n \
         Agent network interfaces:\n\t{\"name\":\"lo\"}\n\t{\"name\":\"eth0\"}\n\
         db\n Status:\n\tnode: a\n\tstatus: stopped\n\ttype: qemu\n\tvmid: 101\n \
         Config:\n\tcores: 4\n \
         Agent network interfaces:\n\tNot available: Request failed: agent 101 refused\n"
    );
}

#[tokio::test]
async fn test_vm_config_failure_is_fatal() {
    let mut provider = ScriptedProvider::new();
    provider.vms = records(vec![json!({"name": "web", "vmid": 100, "node": "a"})]);
    provider.failures.push("config 100".to_string());

    let (result, text) = login_and_list(&mut provider, VMS).await;

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Failed to get VM config for web"));
    assert!(text.ends_with("\tvmid: 100\n"));
    assert!(!provider.calls().iter().any(|c| c.starts_with("agent")));
}

#[tokio::test]
async fn test_empty_vm_list_prints_nothing() {
    let mut provider = ScriptedProvider::new();

    let (result, text) = login_and_list(&mut provider, VMS).await;

    assert_eq!(result.unwrap(), inventory::InventorySummary::default());
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_cluster_is_rejected_without_listing_calls() {
    let mut provider = ScriptedProvider::new();

    let (result, text) = login_and_list(&mut provider, ListTarget::Cluster).await;

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to list clusters: Cluster operations are not yet supported"
    );
    assert!(text.is_empty());
    assert_eq!(provider.calls(), vec!["login root@pam"]);
}
