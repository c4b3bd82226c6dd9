//! Integration tests for the upload flow.

mod helpers;

use bytes::Bytes;

use mediahub_core::config::RetryConfig;
use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::types::AssetPath;
use mediahub_service::{AssetCategory, UploadError, UploadFile};

use helpers::{TestApp, png};

#[tokio::test]
async fn test_logo_upload_sets_owner_field() {
    let app = TestApp::new();
    let owner = app.create_owner("company_info", 42).await;

    let receipt = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("logo.png", "image/png", png(200 * 1024)),
            &owner,
            "logo_url",
        )
        .await
        .unwrap();

    let path = receipt.reference.path.as_str();
    assert!(path.starts_with("logos/"));
    assert!(path.ends_with(".png"));
    assert_eq!(receipt.reference.bucket, "company");
    assert_eq!(
        receipt.reference.public_url,
        format!("https://host/storage/v1/object/public/company/{path}")
    );
    assert_eq!(receipt.stored.size_bytes, 200 * 1024);

    assert_eq!(
        app.entities.field(&owner, "logo_url").await,
        Some(receipt.reference.public_url.clone())
    );
    assert_eq!(app.entities.write_count(), 1);
    assert_eq!(app.store.put_calls(), 1);
    assert!(
        app.gateway
            .exists("company", &receipt.reference.path)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_stored_reference_parses_back() {
    let app = TestApp::new();
    let owner = app.create_owner("products", 7).await;

    let receipt = app
        .uploads
        .upload(
            AssetCategory::ProductImages,
            UploadFile::new("Chair Front.JPG", "image/jpeg", Bytes::from_static(b"jpeg-data")),
            &owner,
            "image_url",
        )
        .await
        .unwrap();

    let stored = app.entities.field(&owner, "image_url").await.unwrap();
    let (bucket, path) = app.gateway.resolver().from_public_url(&stored).unwrap();
    assert_eq!(bucket, "product-images");
    assert_eq!(path, receipt.reference.path);
    assert!(path.as_str().ends_with(".jpg"));
}

#[tokio::test]
async fn test_repeated_uploads_never_collide() {
    let app = TestApp::new();
    let owner = app.create_owner("company_info", 1).await;

    let mut paths = Vec::new();
    for _ in 0..3 {
        let receipt = app
            .uploads
            .upload(
                AssetCategory::CompanyHero,
                UploadFile::new("hero.png", "image/png", png(64)),
                &owner,
                "hero_image_url",
            )
            .await
            .unwrap();
        paths.push(receipt.reference.path);
    }
    paths.dedup();
    assert_eq!(paths.len(), 3);
    assert_eq!(app.store.inner.object_count().await, 3);
}

#[tokio::test]
async fn test_oversized_upload_never_reaches_storage() {
    let app = TestApp::new();
    let owner = app.create_owner("company_info", 42).await;

    let err = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("huge.png", "image/png", png(12 * 1024 * 1024)),
            &owner,
            "logo_url",
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(app.store.put_calls(), 0);
    assert_eq!(app.entities.write_count(), 0);
    assert_eq!(app.entities.field(&owner, "logo_url").await, None);
}

#[tokio::test]
async fn test_missing_owner_reports_orphan() {
    let app = TestApp::new();
    let owner = mediahub_core::types::OwnerRef::new("company_info", 404);

    let err = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("logo.png", "image/png", png(1024)),
            &owner,
            "logo_url",
        )
        .await
        .unwrap_err();

    match err {
        UploadError::Orphaned { orphan, cause } => {
            assert_eq!(cause.kind, ErrorKind::RecordNotFound);
            assert_eq!(orphan.bucket, "company");
            assert!(orphan.path.as_str().starts_with("logos/"));
            assert_eq!(orphan.owner, owner);
            assert_eq!(orphan.field, "logo_url");
            assert_eq!(
                app.gateway.resolver().from_public_url(&orphan.public_url).unwrap(),
                ("company".to_string(), orphan.path.clone())
            );
            assert!(app.gateway.exists("company", &orphan.path).await.unwrap());
        }
        other => panic!("expected an orphaned upload, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let app = TestApp::new();
    let owner = app.create_owner("company_info", 42).await;
    app.store.fail_puts([
        AppError::transient("HTTP 503: upstream unavailable"),
        AppError::transient("connection reset"),
    ]);

    let receipt = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("logo.png", "image/png", png(2048)),
            &owner,
            "logo_url",
        )
        .await
        .unwrap();

    assert_eq!(app.store.put_calls(), 3);
    assert_eq!(app.entities.write_count(), 1);
    assert_eq!(
        app.entities.field(&owner, "logo_url").await,
        Some(receipt.reference.public_url)
    );
}

#[tokio::test(start_paused = true)]
async fn test_retries_stop_at_the_bound() {
    let app = TestApp::with_retry(RetryConfig {
        max_attempts: 3,
        base_delay_ms: 300,
    });
    let owner = app.create_owner("company_info", 42).await;
    app.store
        .fail_puts((0..5).map(|i| AppError::transient(format!("timeout #{i}"))));

    let err = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("logo.png", "image/png", png(2048)),
            &owner,
            "logo_url",
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transient);
    assert!(err.orphan().is_none());
    assert_eq!(app.store.put_calls(), 3);
    assert_eq!(app.store.inner.object_count().await, 0);
    assert_eq!(app.entities.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_policy_denied_is_attempted_once() {
    let app = TestApp::new();
    let owner = app.create_owner("company_info", 42).await;
    app.store.fail_puts([AppError::policy_denied(
        "company",
        "logos/x.png",
        "new row violates row-level security policy",
    )]);

    let err = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("logo.png", "image/png", png(2048)),
            &owner,
            "logo_url",
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PolicyDenied);
    assert!(err.to_string().contains("bucket 'company'"));
    assert_eq!(app.store.put_calls(), 1);
    assert_eq!(app.entities.write_count(), 0);
}

#[tokio::test]
async fn test_unknown_category_name_is_rejected() {
    let err = "avatars".parse::<AssetCategory>().unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownCategory);
}

#[tokio::test]
async fn test_gateway_rejects_traversal() {
    let app = TestApp::new();
    let err = app
        .gateway
        .put("company", "logos/../../etc/passwd", png(10), "image/png")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidPath);
    assert_eq!(app.store.put_calls(), 0);
    assert!(AssetPath::parse("a/../b").is_err());
}
