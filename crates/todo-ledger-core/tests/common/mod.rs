// todo-ledger-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Shared fixtures for todo ledger core integration tests.
// Purpose: Seed the reference scenario and capture audit events.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;
use serde_json::json;
use todo_ledger_core::InMemoryTodoStore;
use todo_ledger_core::NoopAuditSink;
use todo_ledger_core::TodoAuditEvent;
use todo_ledger_core::TodoAuditSink;
use todo_ledger_core::TodoDocument;
use todo_ledger_core::TodoId;
use todo_ledger_core::TodoService;
use todo_ledger_core::TodoServiceConfig;

/// Identifiers of the reference scenario records.
pub struct ScenarioIds {
    /// Vipul, homework, complete.
    pub vipul: TodoId,
    /// Danish, software-design, complete.
    pub danish: TodoId,
    /// `DesiBoyz`, no category, incomplete.
    pub desi_boyz: TodoId,
    /// Nic, teacher, complete.
    pub nic: TodoId,
}

/// Converts a JSON object literal into a stored document.
pub fn document(value: Value) -> TodoDocument {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Inserts the four-owner reference scenario; `DesiBoyz` has no category.
pub fn seed_scenario(store: &InMemoryTodoStore) -> ScenarioIds {
    let vipul = store
        .insert_document(document(json!({
            "owner": "Vipul", "status": true, "body": "finish the reading", "category": "homework"
        })))
        .expect("insert vipul");
    let danish = store
        .insert_document(document(json!({
            "owner": "Danish", "status": true, "body": "sketch the api", "category": "software-design"
        })))
        .expect("insert danish");
    let desi_boyz = store
        .insert_document(document(json!({
            "owner": "DesiBoyz", "status": false, "body": "plan the gig"
        })))
        .expect("insert desi boyz");
    let nic = store
        .insert_document(document(json!({
            "owner": "Nic", "status": true, "body": "grade the essays", "category": "teacher"
        })))
        .expect("insert nic");
    ScenarioIds {
        vipul,
        danish,
        desi_boyz,
        nic,
    }
}

/// Audit sink that keeps every event in memory.
#[derive(Clone, Default)]
pub struct RecordingAuditSink {
    /// Recorded events in emission order.
    events: Arc<Mutex<Vec<TodoAuditEvent>>>,
}

impl RecordingAuditSink {
    /// Returns a snapshot of recorded events.
    pub fn events(&self) -> Vec<TodoAuditEvent> {
        self.events.lock().expect("audit lock").clone()
    }
}

impl TodoAuditSink for RecordingAuditSink {
    fn record(&self, event: &TodoAuditEvent) {
        self.events.lock().expect("audit lock").push(event.clone());
    }
}

/// Builds a service over the store with default settings and no audit output.
pub fn quiet_service(store: InMemoryTodoStore) -> TodoService<InMemoryTodoStore, NoopAuditSink> {
    TodoService::new(store, NoopAuditSink, TodoServiceConfig::default())
}
