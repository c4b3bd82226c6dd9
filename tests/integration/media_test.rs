//! Integration tests for the media library and reference resolution.

mod helpers;

use chrono::{TimeZone, Utc};
use serde_json::json;

use mediahub_core::types::OwnerRef;
use mediahub_service::{AssetCategory, MediaSource, ReferenceRecord, UploadFile};

use helpers::{TestApp, png};

const FALLBACK: &str = "/images/placeholder-logo.png";

#[tokio::test]
async fn test_placeholder_entries_are_hidden() {
    let app = TestApp::new();
    let at = Utc.timestamp_opt(1_709_287_200, 0).unwrap();
    app.store
        .inner
        .insert("images", ".emptyFolderPlaceholder", Vec::<u8>::new(), at)
        .await;
    app.store
        .inner
        .insert("images", "banner.png", vec![7u8; 1234], at)
        .await;

    let views = app
        .index
        .list_assets(AssetCategory::GeneralImages, "")
        .await
        .unwrap();

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].name, "banner.png");
    assert_eq!(views[0].size_bytes, 1234);
    assert_eq!(
        views[0].public_url,
        "https://host/storage/v1/object/public/images/banner.png"
    );
}

#[tokio::test]
async fn test_listing_pages_through_large_folders() {
    let app = TestApp::new();
    let base = Utc.timestamp_opt(1_709_287_200, 0).unwrap();
    for i in 0..7 {
        app.store
            .inner
            .insert(
                "product-images",
                &format!("p{i}.png"),
                vec![1u8; 10],
                base + chrono::Duration::seconds(i),
            )
            .await;
    }

    let views = app
        .index
        .list_assets(AssetCategory::ProductImages, "/")
        .await
        .unwrap();
    assert_eq!(views.len(), 7);
    // Page size is 2: three full pages and one short page.
    assert_eq!(app.store.list_calls(), 4);
}

#[tokio::test]
async fn test_list_many_merges_newest_first() {
    let app = TestApp::new();
    let owner = app.create_owner("company_info", 1).await;
    let old = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    app.store
        .inner
        .insert("company", "hero-images/old.jpg", vec![1u8; 10], old)
        .await;

    let receipt = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("logo.png", "image/png", png(100)),
            &owner,
            "logo_url",
        )
        .await
        .unwrap();

    let views = app
        .index
        .list_many(&[
            MediaSource::category(AssetCategory::CompanyHero),
            MediaSource::category(AssetCategory::CompanyLogo),
        ])
        .await
        .unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].path, receipt.reference.path);
    assert_eq!(views[1].name, "old.jpg");
}

#[tokio::test]
async fn test_missing_reference_uses_fallback() {
    let app = TestApp::new();
    let company = json!({ "id": 1, "logo_url": null });
    assert_eq!(app.references.resolve(&company, "logo_url", FALLBACK), FALLBACK);

    let owner = app.create_owner("company_info", 1).await;
    assert_eq!(
        app.references
            .resolve_owner(app.entities.as_ref(), &owner, "logo_url", FALLBACK)
            .await,
        FALLBACK
    );
}

#[tokio::test]
async fn test_legacy_and_foreign_references() {
    let app = TestApp::new();
    let legacy =
        "https://old-project.example.co/storage/v1/object/public/company//logos/1700000000000-ab12cd34.png";
    let foreign = "https://images.unsplash.com/photo-123";
    let company = json!({ "logo_url": legacy, "hero_image_url": foreign });

    assert_eq!(app.references.resolve(&company, "logo_url", FALLBACK), legacy);
    assert_eq!(
        app.references.resolve(&company, "hero_image_url", FALLBACK),
        FALLBACK
    );

    let (bucket, path) = app.gateway.resolver().from_public_url(legacy).unwrap();
    assert_eq!(bucket, "company");
    assert_eq!(path.as_str(), "logos/1700000000000-ab12cd34.png");
}

#[tokio::test]
async fn test_audit_after_orphaned_upload() {
    let app = TestApp::new();
    let owner = app.create_owner("company_info", 1).await;
    let receipt = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("logo.png", "image/png", png(100)),
            &owner,
            "logo_url",
        )
        .await
        .unwrap();

    // Second upload targets a record that does not exist.
    let err = app
        .uploads
        .upload(
            AssetCategory::CompanyLogo,
            UploadFile::new("logo.png", "image/png", png(100)),
            &OwnerRef::new("company_info", 2),
            "logo_url",
        )
        .await
        .unwrap_err();
    let orphan = err.orphan().unwrap().clone();

    let references = vec![
        ReferenceRecord::read(app.entities.as_ref(), owner.clone(), "logo_url")
            .await
            .unwrap(),
        ReferenceRecord::read(app.entities.as_ref(), owner.clone(), "hero_image_url")
            .await
            .unwrap(),
    ];
    let report = app
        .index
        .audit(&references, &[MediaSource::category(AssetCategory::CompanyLogo)])
        .await
        .unwrap();

    assert_eq!(report.checked, 2);
    assert_eq!(report.orphans.len(), 1);
    assert_eq!(report.orphans[0].path, orphan.path);
    assert_ne!(report.orphans[0].path, receipt.reference.path);
    assert!(report.missing.is_empty());
    assert!(report.unrecognized.is_empty());
}
