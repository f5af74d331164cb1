use pdf_pageops::*;

#[test]
fn test_operation_kinds_and_selection() {
    let extract = Operation::Extract(ExtractOptions::default());
    assert_eq!(extract.kind(), OperationKind::Extract);
    assert_eq!(extract.page_spec(), Some(&PageSpec::All));

    let compress = Operation::Compress(CompressionOptions::default());
    assert_eq!(compress.page_spec(), None);
    assert_eq!(compress.resolve_selection(3).unwrap(), None);

    let rotate = Operation::Rotate(RotateOptions {
        pages: PageSpec::Parity(Parity::Even),
        angle_degrees: 180,
    });
    assert_eq!(rotate.resolve_selection(4).unwrap(), Some(vec![1, 3]));
}

#[test]
fn test_defaults_are_valid() {
    let operations = [
        Operation::Merge(MergeOptions::default()),
        Operation::Extract(ExtractOptions::default()),
        Operation::Rotate(RotateOptions::default()),
        Operation::Watermark(WatermarkOptions::default()),
        Operation::PageNumbers(PageNumberOptions::default()),
        Operation::Metadata(MetadataOptions::default()),
        Operation::Compress(CompressionOptions::default()),
        Operation::Delete(DeleteOptions::default()),
    ];
    for operation in operations {
        assert!(operation.validate().is_ok(), "{:?}", operation.kind());
    }
}

#[test]
fn test_validation_errors() {
    let zero_chunks = Operation::Extract(ExtractOptions {
        pages: PageSpec::All,
        mode: ExtractMode::Chunks { size: 0 },
    });
    assert!(matches!(zero_chunks.validate(), Err(PageOpsError::Config(_))));

    let opacity = Operation::Watermark(WatermarkOptions {
        opacity: 1.5,
        ..Default::default()
    });
    assert!(matches!(opacity.validate(), Err(PageOpsError::Config(_))));

    let font = Operation::PageNumbers(PageNumberOptions {
        font_size: 0.0,
        ..Default::default()
    });
    assert!(matches!(font.validate(), Err(PageOpsError::Config(_))));

    let color = Operation::PageNumbers(PageNumberOptions {
        color: Rgb::new(2.0, 0.0, 0.0),
        ..Default::default()
    });
    assert!(matches!(color.validate(), Err(PageOpsError::Config(_))));
}

#[test]
fn test_keyword_list() {
    let options = MetadataOptions {
        keywords: Some("a, b,,  c ".to_string()),
        ..Default::default()
    };
    assert_eq!(
        options.keyword_list(),
        Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
    assert_eq!(MetadataOptions::default().keyword_list(), None);
}

#[test]
fn test_rgb_from_hex() {
    let color = Rgb::from_hex("#ff8000").unwrap();
    assert_eq!(color.r, 1.0);
    assert!((color.g - 128.0 / 255.0).abs() < 1e-6);
    assert_eq!(color.b, 0.0);

    assert!(Rgb::from_hex("00ff00").is_ok());
    assert!(Rgb::from_hex("#fff").is_err());
    assert!(Rgb::from_hex("#gggggg").is_err());
}

#[test]
fn test_anchor_origin() {
    let page = PageBox::from_size(600.0, 800.0);
    assert_eq!(Anchor::TopLeft.origin(&page, 100.0, 20.0, 10.0), (10.0, 770.0));
    assert_eq!(Anchor::Center.origin(&page, 100.0, 20.0, 10.0), (250.0, 390.0));
    assert_eq!(
        Anchor::BottomRight.origin(&page, 100.0, 20.0, 10.0),
        (490.0, 10.0)
    );
    assert_eq!(Anchor::from(NumberPosition::TopCenter), Anchor::TopCenter);
}

#[test]
fn test_anchor_respects_box_offset() {
    let page = PageBox {
        x: 50.0,
        y: 100.0,
        width: 400.0,
        height: 400.0,
    };
    assert_eq!(Anchor::BottomLeft.origin(&page, 10.0, 10.0, 5.0), (55.0, 105.0));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_job() {
    use tempfile::NamedTempFile;

    let operation = Operation::Watermark(WatermarkOptions {
        content: WatermarkContent::Text {
            text: "INTERNAL".to_string(),
            font_size: 30.0,
            color: Rgb::new(0.2, 0.4, 0.6),
        },
        pages: PageSpec::Explicit("1-3".to_string()),
        position: Anchor::TopRight,
        ..Default::default()
    });

    let temp = NamedTempFile::new().unwrap();
    operation.save(temp.path()).await.unwrap();
    let loaded = Operation::load(temp.path()).await.unwrap();
    assert_eq!(loaded, operation);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_partial_job_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    tokio::fs::write(
        temp.path(),
        r#"{ "operation": "rotate", "angle_degrees": 180 }"#,
    )
    .await
    .unwrap();

    let loaded = Operation::load(temp.path()).await.unwrap();
    assert_eq!(
        loaded,
        Operation::Rotate(RotateOptions {
            pages: PageSpec::All,
            angle_degrees: 180,
        })
    );
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_invalid_job() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    tokio::fs::write(temp.path(), r#"{ "operation": "shred" }"#)
        .await
        .unwrap();
    let result = Operation::load(temp.path()).await;
    assert!(matches!(result, Err(PageOpsError::Config(_))));
}
