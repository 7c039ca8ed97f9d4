//! Engine selection across platform configurations.

use std::sync::Arc;

use rstest::rstest;
use stockscan_core::constants::{FORMAT_EAN_13, FORMAT_QR_CODE};
use stockscan_core::{EngineKind, PixelBuffer, Point};
use stockscan_engine::mock::MockPlatform;
use stockscan_engine::traits::{LinearSymbol, NativeDetection, ScannerEngine};
use stockscan_engine::{EngineError, EngineFactory, EngineState, FactoryConfig, PayloadState};

fn factory(platform: MockPlatform) -> EngineFactory {
    EngineFactory::new(Arc::new(platform), FactoryConfig::default())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("stockscan_engine=debug")
        .try_init();
}

fn gray_frame() -> PixelBuffer {
    PixelBuffer::from_luma(8, 8, &[0x7F; 64]).unwrap()
}

#[tokio::test]
async fn native_and_zbar_failing_falls_back_to_software_tier() {
    init_tracing();
    let platform = MockPlatform::builder()
        .native(&["qr_code", "ean_13"])
        .native_configure_failure("detector constructor threw")
        .zbar_load_failure("payload fetch failed")
        .build();
    let loads = platform.load_counter();
    let factory = factory(platform);

    let caps = factory.detect_capabilities().await;
    assert!(caps.native && caps.zbar && caps.jsqr);

    let engine = factory.create_engine(None).await.unwrap();
    assert_eq!(engine.name(), "jsqr-tier");
    assert_eq!(engine.state(), EngineState::Ready);
    assert_eq!(loads.get(), 1);
    assert_eq!(factory.payload_state(), PayloadState::Unloaded);
}

#[tokio::test]
async fn native_missing_selects_zbar_without_trying_software() {
    let factory = factory(MockPlatform::builder().zbar().build());

    let caps = factory.detect_capabilities().await;
    assert!(!caps.native);
    assert!(caps.zbar);
    assert_eq!(caps.recommended, EngineKind::Zbar);

    let engine = factory.create_engine(None).await.unwrap();
    assert_eq!(engine.name(), "zbar-tier");
}

#[rstest]
#[case(&["qr_code", "ean_13"], true, EngineKind::Native)]
#[case(&["qr_code"], true, EngineKind::Zbar)]
#[case(&["qr_code"], false, EngineKind::Jsqr)]
#[tokio::test]
async fn required_native_formats_gate_the_native_tier(
    #[case] formats: &[&str],
    #[case] zbar: bool,
    #[case] expected: EngineKind,
) {
    let mut builder = MockPlatform::builder().native(formats);
    if zbar {
        builder = builder.zbar();
    }
    let factory = factory(builder.build());

    assert_eq!(factory.recommended_engine().await, expected);
    let engine = factory.create_engine(None).await.unwrap();
    assert_eq!(engine.kind(), expected);
}

#[tokio::test]
async fn forced_zbar_failure_is_not_absorbed() {
    let factory = factory(
        MockPlatform::builder()
            .zbar_load_failure("payload fetch failed")
            .build(),
    );

    let result = factory.create_engine(Some(EngineKind::Zbar)).await;
    assert!(matches!(result, Err(EngineError::PayloadLoad { .. })));
}

#[tokio::test]
async fn every_tier_reports_canonical_formats() {
    let platform = MockPlatform::builder()
        .native(&["qr_code", "ean_13"])
        .zbar()
        .build();
    let native = platform.native_handle().unwrap();
    let zbar = platform.zbar_decoder().unwrap();
    let factory = factory(platform);

    native.push_detections(vec![NativeDetection {
        raw_value: "4006381333931".into(),
        format: "ean_13".into(),
        corner_points: vec![Point::new(0.0, 0.0), Point::new(4.0, 4.0)],
    }]);
    zbar.push_symbols(vec![LinearSymbol {
        type_name: "ZBAR_EAN13".into(),
        data: "4006381333931".into(),
        points: vec![Point::new(1.0, 3.0)],
    }]);

    let mut native_engine = factory.create_engine(Some(EngineKind::Native)).await.unwrap();
    let mut zbar_engine = factory.create_engine(Some(EngineKind::Zbar)).await.unwrap();

    let a = native_engine.detect(&gray_frame()).await.unwrap();
    let b = zbar_engine.detect(&gray_frame()).await.unwrap();

    assert_eq!(a[0].format, FORMAT_EAN_13);
    assert_eq!(b[0].format, FORMAT_EAN_13);
    assert_eq!(a[0].raw_value, b[0].raw_value);
    assert_eq!(native.configured_formats().unwrap(), vec!["qr_code", "ean_13"]);
}

#[tokio::test]
async fn engines_share_one_payload_load() {
    let platform = MockPlatform::builder().zbar().build();
    let loads = platform.load_counter();
    let factory = factory(platform);

    let (a, b) = tokio::join!(
        factory.create_engine(Some(EngineKind::Zbar)),
        factory.create_engine(Some(EngineKind::Zbar)),
    );
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(loads.get(), 1);
}

#[tokio::test]
async fn software_tier_supports_qr_only() {
    let factory = factory(MockPlatform::builder().build());
    let engine = factory.create_engine(None).await.unwrap();

    assert_eq!(engine.supported_formats(), vec![FORMAT_QR_CODE]);
    assert!(!engine.supports_1d());
}
