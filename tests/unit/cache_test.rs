//! Unit tests for image selection and the base64 cache

use snapcloset_backend::images::{Base64Cache, ImageSelector};
use snapcloset_backend::response::base64;
use std::sync::Arc;

#[tokio::test]
async fn test_cache_miss_then_hit_without_source() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("boots.png"), b"boot bytes").unwrap();

    let cache_dir = dir.path().join("cache");
    let cache = Base64Cache::new(&cache_dir);
    let image = ImageSelector::new(&raw).select(&[0]).await.unwrap().remove(0);

    let first = cache.encode(&image).await.unwrap();
    assert_eq!(first, base64::encode(b"boot bytes"));

    let entry = cache_dir.join("boots.txt");
    assert_eq!(std::fs::read_to_string(&entry).unwrap(), first);

    // the second lookup must not touch the source image
    std::fs::remove_file(raw.join("boots.png")).unwrap();
    let second = cache.encode(&image).await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_concurrent_encodes_share_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("scarf.jpg"), vec![7u8; 4096]).unwrap();

    let cache_dir = dir.path().join("cache");
    let cache = Arc::new(Base64Cache::new(&cache_dir));
    let image = ImageSelector::new(&raw).select(&[0]).await.unwrap().remove(0);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        let image = image.clone();
        handles.push(tokio::spawn(async move { cache.encode(&image).await.unwrap() }));
    }

    let expected = base64::encode(&[7u8; 4096]);
    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }

    let files: Vec<_> = std::fs::read_dir(&cache_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_selector_keeps_requested_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.jpg", "b.png", "c.jpg", "d.gif"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }

    let selected = ImageSelector::new(dir.path())
        .select(&[2, 0, 3, 1, 10])
        .await
        .unwrap();
    let stems: Vec<&str> = selected.iter().map(|i| i.stem()).collect();

    assert_eq!(stems, vec!["c", "a", "b"]);
}
