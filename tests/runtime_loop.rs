// tests/runtime_loop.rs

mod common;
use crate::common::*;

use tokio::sync::mpsc;

use pugwatch::engine::{Runtime, RuntimeEvent};
use pugwatch::types::ChangeKind;

#[tokio::test]
async fn runtime_processes_events_in_order_until_shutdown() -> TestResult {
    init_tracing();

    let tree = TemplateTree::new()
        .file("a.pug", "include partials/b\n")
        .file("c.pug", "p c\n")
        .file("partials/b.pug", "p b\n");
    let compiler = FakeCompiler::new();
    let dispatcher = DispatcherBuilder::new()
        .wait_ms(0)
        .build(&tree, compiler.clone(), ManualClock::new());

    let (tx, rx) = mpsc::channel(16);
    let runtime = Runtime::new(dispatcher, rx);
    let handle = tokio::spawn(runtime.run());

    for (rel, kind) in [
        ("partials/b.pug", ChangeKind::Changed),
        ("c.pug", ChangeKind::Added),
    ] {
        tx.send(RuntimeEvent::FileChanged {
            path: tree.path(rel),
            kind,
        })
        .await?;
    }
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    // Sent after shutdown; never handled.
    let _ = tx
        .send(RuntimeEvent::FileChanged {
            path: tree.path("a.pug"),
            kind: ChangeKind::Changed,
        })
        .await;

    with_timeout(handle).await??;

    assert_eq!(
        compiler.compiled_paths(),
        vec![tree.path("a.pug"), tree.path("c.pug")]
    );
    Ok(())
}

#[tokio::test]
async fn runtime_exits_when_all_senders_drop() -> TestResult {
    let tree = TemplateTree::new().file("a.pug", "p a\n");
    let compiler = FakeCompiler::new();
    let dispatcher = DispatcherBuilder::new().build(&tree, compiler.clone(), ManualClock::new());

    let (tx, rx) = mpsc::channel(4);
    tx.send(RuntimeEvent::FileChanged {
        path: tree.path("a.pug"),
        kind: ChangeKind::Changed,
    })
    .await?;
    drop(tx);

    with_timeout(Runtime::new(dispatcher, rx).run()).await?;

    assert_eq!(compiler.compiled_paths(), vec![tree.path("a.pug")]);
    Ok(())
}

#[tokio::test]
async fn runtime_survives_missing_files_and_compile_failures() -> TestResult {
    let tree = TemplateTree::new()
        .file("bad.pug", "p\n")
        .file("good.pug", "p\n");
    let compiler = FakeCompiler::new();
    compiler.fail_on(tree.path("bad.pug"));
    let dispatcher = DispatcherBuilder::new().build(&tree, compiler.clone(), ManualClock::new());

    let (tx, rx) = mpsc::channel(8);
    for rel in ["ghost.pug", "bad.pug", "good.pug"] {
        tx.send(RuntimeEvent::FileChanged {
            path: tree.path(rel),
            kind: ChangeKind::Changed,
        })
        .await?;
    }
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    with_timeout(Runtime::new(dispatcher, rx).run()).await?;

    assert_eq!(
        compiler.compiled_paths(),
        vec![tree.path("bad.pug"), tree.path("good.pug")]
    );
    assert!(tree.fs().contents(format!("{MOCK_OUT}/good.js")).is_some());
    assert!(tree.fs().contents(format!("{MOCK_OUT}/bad.js")).is_none());
    Ok(())
}
