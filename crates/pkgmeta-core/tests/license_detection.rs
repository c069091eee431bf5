mod support;

use std::sync::Arc;

use pkgmeta_core::error::ResolveError;
use support::{FakeGit, FakePlatform, FakeTransport, capture_logs, context, logged};

#[tokio::test]
async fn host_lookup_returns_license() {
    let transport = FakeTransport::new();
    transport.on_get("https://licenses.test/webjars/webjars", 200, "MIT");
    let ctx = context(transport.clone(), Arc::new(FakeGit::default()), FakePlatform::ignoring());

    let license = ctx
        .license_detector()
        .detect_from_host("webjars/webjars")
        .await
        .unwrap();

    assert_eq!(license, "MIT");
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn host_lookup_falls_back_to_gh_pages() {
    let transport = FakeTransport::new();
    transport.on_get("https://licenses.test/org/site/gh-pages", 200, "Apache-2.0");
    let ctx = context(transport.clone(), Arc::new(FakeGit::default()), FakePlatform::ignoring());

    let license = ctx
        .license_detector()
        .detect_from_host("org/site")
        .await
        .unwrap();

    assert_eq!(license, "Apache-2.0");
    assert_eq!(
        transport.calls(),
        vec![
            "https://licenses.test/org/site",
            "https://licenses.test/org/site/gh-pages"
        ]
    );
}

#[tokio::test]
async fn host_lookup_fails_after_single_fallback() {
    let transport = FakeTransport::new();
    transport.on_get("https://licenses.test/org/none/gh-pages", 500, "no license");
    let ctx = context(transport.clone(), Arc::new(FakeGit::default()), FakePlatform::ignoring());

    let err = ctx
        .license_detector()
        .detect_from_host("org/none")
        .await
        .unwrap_err();

    match err {
        ResolveError::UpstreamUnavailable { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "no license");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn classify_returns_detected_license() {
    let transport = FakeTransport::new();
    transport.on_post("https://classifier.test/detect", 200, "BSD-3-Clause");
    let ctx = context(transport.clone(), Arc::new(FakeGit::default()), FakePlatform::ignoring());

    let license = ctx
        .license_detector()
        .classify("Redistribution and use in source and binary forms...")
        .await
        .unwrap();

    assert_eq!(license, "BSD-3-Clause");
    assert_eq!(
        transport.posted(),
        vec!["Redistribution and use in source and binary forms..."]
    );
}

#[tokio::test]
async fn classify_failure_carries_body() {
    let transport = FakeTransport::new();
    transport.on_post("https://classifier.test/detect", 422, "unrecognized license");
    let ctx = context(transport, Arc::new(FakeGit::default()), FakePlatform::ignoring());

    let err = ctx
        .license_detector()
        .classify("some text")
        .await
        .unwrap_err();

    match err {
        ResolveError::UpstreamUnavailable { status, body, .. } => {
            assert_eq!(status, 422);
            assert_eq!(body, "unrecognized license");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn classify_failures_are_logged() {
    let transport = FakeTransport::new();
    transport.on_post("https://classifier.test/detect", 422, "unrecognized license");
    let ctx = context(transport, Arc::new(FakeGit::default()), FakePlatform::ignoring());
    let (logs, _guard) = capture_logs();

    assert!(ctx.license_detector().classify("some text").await.is_err());

    let output = logged(&logs);
    assert!(output.contains("ERROR"), "{output}");
    assert!(output.contains("unrecognized license"), "{output}");
}

#[tokio::test]
async fn classify_transport_errors_are_logged() {
    let transport = FakeTransport::new();
    transport.unreachable("https://classifier.test/detect");
    let ctx = context(transport, Arc::new(FakeGit::default()), FakePlatform::ignoring());
    let (logs, _guard) = capture_logs();

    let err = ctx
        .license_detector()
        .classify("some text")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("connection refused"));
    let output = logged(&logs);
    assert!(output.contains("ERROR"), "{output}");
    assert!(output.contains("connection refused"), "{output}");
}
