//! Async pipeline tests, including concurrent use of one Transpiler.

use futures::future::{join_all, BoxFuture};
use quill_babel::tree::hypertext::{Attribute, Node, Root};
use quill_babel::{
    hypertext_to_markup_string, markup_to_hypertext_string, FormatError, HypertextPass, Options,
    Transpiler,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Adds `rel="noopener"` to every link, suspending once per call.
#[derive(Default)]
struct NoOpener {
    calls: Arc<AtomicUsize>,
}

fn add_rel(nodes: &mut [Node]) {
    for node in nodes {
        if let Node::Element(el) = node {
            if el.tag == "a" {
                el.attributes.push(Attribute {
                    name: "rel".to_string(),
                    value: "noopener".to_string(),
                });
            }
            add_rel(&mut el.children);
        }
    }
}

impl HypertextPass for NoOpener {
    fn name(&self) -> &str {
        "no-opener"
    }

    fn run<'a>(&'a self, mut root: Root) -> BoxFuture<'a, Result<Root, FormatError>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.calls.fetch_add(1, Ordering::SeqCst);
            add_rel(&mut root.children);
            Ok(root)
        })
    }
}

#[tokio::test]
async fn test_round_trip_plain_paragraph() {
    let md = "A plain paragraph.\n";
    let html = markup_to_hypertext_string(md).await.unwrap();
    assert_eq!(html, "<p>A plain paragraph.</p>");
    assert_eq!(hypertext_to_markup_string(&html).await.unwrap(), md);
}

#[tokio::test]
async fn test_frontmatter_is_normalized_before_parsing() {
    let html = markup_to_hypertext_string("---\ntitle: x\n...\n\nBody\n")
        .await
        .unwrap();
    assert_eq!(html, "<p>Body</p>");
}

#[tokio::test]
async fn test_depth_limit_surfaces_as_parse_error() {
    let transpiler = Transpiler::new(Options::default().with_max_depth(8));
    let deep = "<div>".repeat(20) + "x";
    let err = transpiler.hypertext_to_markup(&deep).await.unwrap_err();
    assert!(matches!(err, FormatError::Parse(_)), "{err}");

    let nested = "> ".repeat(20) + "x\n";
    let err = transpiler.markup_to_hypertext(&nested).await.unwrap_err();
    assert!(matches!(err, FormatError::Parse(_)), "{err}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_transpiler_across_tasks() {
    let pass = NoOpener::default();
    let calls = Arc::clone(&pass.calls);
    let transpiler = Arc::new(Transpiler::default().with_pass(pass));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let transpiler = Arc::clone(&transpiler);
            tokio::spawn(async move {
                let source = format!("# Doc {i}\n\nSee [item {i}](/items/{i}).\n");
                transpiler.markup_to_hypertext(&source).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let html = handle.await.unwrap().unwrap();
        assert_eq!(
            html,
            format!(
                "<h1>Doc {i}</h1>\n<p>See <a href=\"/items/{i}\" rel=\"noopener\">item {i}</a>.</p>"
            )
        );
    }
    assert_eq!(calls.load(Ordering::SeqCst), 32);
}

#[tokio::test]
async fn test_concurrent_conversions_are_isolated() {
    let transpiler = Transpiler::default();
    let sources: Vec<String> = (0..16)
        .map(|i| format!("<h2>Section {i}</h2><p>Body {i}</p>"))
        .collect();
    let outputs = join_all(
        sources
            .iter()
            .map(|source| transpiler.hypertext_to_markup(source)),
    )
    .await;

    for (i, output) in outputs.into_iter().enumerate() {
        assert_eq!(output.unwrap(), format!("## Section {i}\n\nBody {i}\n"));
    }
}

#[tokio::test]
async fn test_dropped_conversion_has_no_effect() {
    let pass = NoOpener::default();
    let calls = Arc::clone(&pass.calls);
    let transpiler = Transpiler::default().with_pass(pass);
    drop(transpiler.markup_to_hypertext("[a](/b)\n"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
