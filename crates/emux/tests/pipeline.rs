// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Creation stage shared across concurrent requests.

mod common;

use common::{User, registry};
use emux::prelude::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_use_separate_contexts() {
    let registry = Arc::new(registry(Arc::new(MemoryStore::new())).await);
    let stage = Arc::new(CreationStage::new(registry, "user").unwrap());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let stage = Arc::clone(&stage);
            tokio::spawn(async move {
                let ctx = RequestContext::new();
                let body = json!({ "name": format!("user-{i}"), "history": [{ "title": "t" }] });
                stage.process(body.to_string().as_bytes(), &ctx).unwrap();
                (i, ctx.take::<User>("user"))
            })
        })
        .collect();

    for handle in handles {
        let (i, user) = handle.await.unwrap();
        let user = user.unwrap();
        assert_eq!(user.name, format!("user-{i}"));
        assert_eq!(user.history.len(), 1);
    }
}

#[tokio::test]
async fn handler_reads_error_instead_of_value() {
    let registry = Arc::new(registry(Arc::new(MemoryStore::new())).await);
    let stage = CreationStage::new(registry, "user").unwrap();
    let ctx = RequestContext::new();

    stage.process(br#"{"history": {"title": "t"}}"#, &ctx).unwrap();
    assert!(ctx.take::<User>("user").is_none());
    let error = ctx.error().unwrap();
    assert!(error.to_string().contains("user.history"));
}

#[tokio::test]
async fn handler_may_store_its_own_payloads() {
    let ctx = RequestContext::new();
    ctx.set("trace", "abc".to_owned());
    assert_eq!(ctx.get::<String>("trace").as_deref(), Some("abc"));
    assert!(ctx.get::<i64>("trace").is_none());
    assert_eq!(ctx.take::<String>("trace").as_deref(), Some("abc"));
    assert!(!ctx.contains("trace"));
}
