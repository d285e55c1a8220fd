//! Unit tests for response parsing and artifact storage

use snapcloset_backend::backend::traits::{GenerationResponse, MessageContent, OutputBlock};
use snapcloset_backend::config::ArtifactNaming;
use snapcloset_backend::response::{base64, ArtifactStore, ResponseHandler};

const PNG_BYTES: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn text_block(text: &str) -> OutputBlock {
    OutputBlock::Message {
        content: vec![MessageContent::OutputText {
            text: text.to_string(),
        }],
    }
}

#[tokio::test]
async fn test_two_messages_and_one_image() {
    let dir = tempfile::tempdir().unwrap();
    let handler = ResponseHandler::new(ArtifactStore::new(dir.path(), ArtifactNaming::Overwrite));
    let response = GenerationResponse {
        id: Some("resp_1".to_string()),
        model: None,
        usage: None,
        output: vec![
            text_block("Layer a trench coat"),
            OutputBlock::ImageGenerationCall {
                result: Some(base64::encode(&PNG_BYTES)),
            },
            text_block("Add white sneakers"),
        ],
    };

    let processed = handler.process(&response, "casual").await.unwrap();

    assert_eq!(processed.texts, vec!["Layer a trench coat", "Add white sneakers"]);
    assert_eq!(processed.images, vec![dir.path().join("casual.png")]);
    assert_eq!(std::fs::read(&processed.images[0]).unwrap(), PNG_BYTES);
}

#[tokio::test]
async fn test_extra_images_get_numbered_names() {
    let dir = tempfile::tempdir().unwrap();
    let handler = ResponseHandler::new(ArtifactStore::new(dir.path(), ArtifactNaming::Overwrite));
    let image = OutputBlock::ImageGenerationCall {
        result: Some(base64::encode(&PNG_BYTES)),
    };
    let response = GenerationResponse {
        id: None,
        model: None,
        usage: None,
        output: vec![image.clone(), image],
    };

    let processed = handler.process(&response, "edgy").await.unwrap();

    assert_eq!(
        processed.images,
        vec![dir.path().join("edgy.png"), dir.path().join("edgy_2.png")]
    );
}

#[tokio::test]
async fn test_overwrite_policy_reuses_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("generated"), ArtifactNaming::Overwrite);

    let first = store.save(b"first run", "preppy").await.unwrap();
    let second = store.save(b"second run", "preppy").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, dir.path().join("generated").join("preppy.png"));
    assert_eq!(std::fs::read(&second).unwrap(), b"second run");
}

#[tokio::test]
async fn test_unique_policy_keeps_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path(), ArtifactNaming::Unique);

    let first = store.save(b"first run", "cute").await.unwrap();
    let second = store.save(b"second run", "cute").await.unwrap();

    assert_ne!(first, second);
    assert!(first.file_name().unwrap().to_string_lossy().starts_with("cute_"));
    assert_eq!(std::fs::read(&first).unwrap(), b"first run");
    assert_eq!(std::fs::read(&second).unwrap(), b"second run");
}

#[test]
fn test_base64_decode_data_url() {
    let data_url = "data:image/png;base64,SGVsbG8sIFdvcmxkIQ==";
    let decoded = base64::decode(data_url).unwrap();

    assert_eq!(b"Hello, World!", decoded.as_slice());
}
