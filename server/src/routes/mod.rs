//! HTTP routes

pub mod health;
pub mod index;
pub mod predict;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

/// Build the application router
pub fn router(state: SharedState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    let mut app = Router::new()
        // Landing page
        .route("/", get(index::index))

        // Health check
        .route("/health", get(health::health_check))

        // Classification
        .route("/check_image", post(predict::check_image));

    if let Some(dir) = &state.config.static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use leafscan::{
        Classifier, ClassProfile, ImageTensor, LeafScanError, Pipeline, Preprocessor, Result,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::error::{INTERNAL_ERROR_PREFIX, INVALID_IMAGE_DETAIL};
    use crate::state::{AppState, ServerConfig};

    const BOUNDARY: &str = "leafscan-test-boundary";

    struct FixedClassifier {
        scores: Vec<f32>,
        calls: Arc<AtomicUsize>,
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, _tensor: &ImageTensor) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores.clone())
        }

        fn output_len(&self) -> Option<usize> {
            Some(self.scores.len())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenClassifier;

    impl Classifier for BrokenClassifier {
        fn predict(&self, _tensor: &ImageTensor) -> Result<Vec<f32>> {
            Err(LeafScanError::Inference("tensor rank mismatch".to_string()))
        }

        fn output_len(&self) -> Option<usize> {
            Some(38)
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn peaked(index: usize, peak: f32) -> Vec<f32> {
        let mut scores = vec![(1.0 - peak) / 37.0; 38];
        scores[index] = peak;
        scores
    }

    fn app_with(profile: ClassProfile, classifier: Arc<dyn Classifier>) -> Router {
        let pipeline = Pipeline::new(profile, Preprocessor::default(), classifier).unwrap();
        router(Arc::new(AppState::new(ServerConfig::default(), pipeline)))
    }

    fn fixed_app(profile: ClassProfile, scores: Vec<f32>) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = FixedClassifier {
            scores,
            calls: calls.clone(),
        };
        (app_with(profile, Arc::new(classifier)), calls)
    }

    fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    fn upload(field: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"leaf.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/check_image")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_check_image_with_stats() {
        let scores = peaked(3, 0.81);
        let (app, calls) = fixed_app(ClassProfile::plantvillage(), scores.clone());

        let (status, body) = send(app, upload("file", &solid_png(300, 200, [40, 160, 40]))).await;
        assert_eq!(status, StatusCode::OK);

        let body = json(&body);
        assert_eq!(body["predicted_index"], 3);
        assert_eq!(body["predicted_class"], "Apple___healthy");
        assert_eq!(body["result"], "Apple   healthy");
        assert_eq!(body["confidence"], "0.81");
        let raw: Vec<f32> = serde_json::from_value(body["raw_prediction"].clone()).unwrap();
        assert_eq!(raw, scores);
        assert_eq!(body["class_label_counts"]["Orange___Haunglongbing_(Citrus_greening)"], 5507);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_check_image_without_stats() {
        let (app, _) = fixed_app(ClassProfile::condensed(), peaked(7, 0.66));

        let (status, body) = send(app, upload("file", &solid_png(64, 64, [90, 90, 20]))).await;
        assert_eq!(status, StatusCode::OK);

        let body = json(&body);
        assert_eq!(body["predicted_class"], "Corn_gray_leaf_spot");
        assert_eq!(body["result"], "Corn gray leaf spot");
        assert!(body.get("class_label_counts").is_none());
    }

    #[tokio::test]
    async fn test_same_image_twice_gives_identical_responses() {
        let (app, _) = fixed_app(ClassProfile::plantvillage(), peaked(20, 0.42));
        let png = solid_png(128, 128, [255, 0, 255]);

        let (_, first) = send(app.clone(), upload("file", &png)).await;
        let (_, second) = send(app, upload("file", &png)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_zero_byte_upload_is_client_error() {
        let (app, calls) = fixed_app(ClassProfile::plantvillage(), peaked(0, 0.9));

        let (status, body) = send(app, upload("file", b"")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["detail"], INVALID_IMAGE_DETAIL);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_text_upload_is_client_error() {
        let (app, _) = fixed_app(ClassProfile::plantvillage(), peaked(0, 0.9));

        let (status, body) = send(app, upload("file", b"name,disease\nleaf,rust\n")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["detail"], "Invalid image format.");
    }

    #[tokio::test]
    async fn test_truncated_jpeg_is_client_error() {
        let (app, calls) = fixed_app(ClassProfile::plantvillage(), peaked(3, 0.81));
        let jpeg = gradient_jpeg(200, 150);

        let (status, body) = send(app.clone(), upload("file", &jpeg[..jpeg.len() / 2])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["detail"], INVALID_IMAGE_DETAIL);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let (status, _) = send(app, upload("file", &jpeg)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_classifier_failure_is_server_error() {
        let app = app_with(ClassProfile::plantvillage(), Arc::new(BrokenClassifier));

        let (status, body) = send(app, upload("file", &solid_png(10, 10, [0, 0, 0]))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let detail = json(&body)["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with(INTERNAL_ERROR_PREFIX));
        assert!(detail.contains("tensor rank mismatch"));
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let (app, _) = fixed_app(ClassProfile::plantvillage(), peaked(0, 0.9));

        let (status, _) = send(app, upload("picture", &solid_png(10, 10, [0, 0, 0]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = fixed_app(ClassProfile::condensed(), peaked(0, 0.9));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);

        let body = json(&body);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["profile"], "condensed");
        assert_eq!(body["num_classes"], 38);
        assert_eq!(body["class_label_counts"], false);
        assert_eq!(body["image_size"], 224);
    }

    #[tokio::test]
    async fn test_landing_page() {
        let (app, _) = fixed_app(ClassProfile::plantvillage(), peaked(0, 0.9));
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("/check_image"));
    }
}
