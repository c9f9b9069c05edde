//! Analysis session state
//!
//! Holds what a user currently sees: the selected image, the last palette and
//! a single message slot. Every completed step replaces state wholesale.
//!
//! - A successful upload clears the previous result and message.
//! - A failed upload records the message and keeps nothing from that file.
//! - A failed analysis records the message and keeps the selected image, so
//!   the same image can be analyzed again.

use std::path::Path;

use tracing::{info, warn};

use crate::color::ColorDeriver;
use crate::config::UploadConfig;
use crate::extraction::DominantColorExtractor;
use crate::upload::{read_upload, SelectedImage};
use crate::{AnalysisError, PaletteResult, Result};

/// Upload and analysis state for one user
#[derive(Debug)]
pub struct AnalysisSession<E> {
    extractor: E,
    deriver: ColorDeriver,
    upload_config: UploadConfig,
    selected: Option<SelectedImage>,
    result: Option<PaletteResult>,
    message: Option<String>,
}

impl<E: DominantColorExtractor> AnalysisSession<E> {
    pub fn new(extractor: E, upload_config: UploadConfig) -> Self {
        Self {
            extractor,
            deriver: ColorDeriver::new(),
            upload_config,
            selected: None,
            result: None,
            message: None,
        }
    }

    /// Validate and read a file from disk, making it the selected image
    pub fn upload(&mut self, path: &Path) -> Result<&SelectedImage> {
        let outcome = read_upload(path, &self.upload_config);
        self.accept_upload(outcome)
    }

    /// Validate an in-memory upload, making it the selected image
    pub fn upload_bytes(&mut self, name: &str, mime: &str, bytes: Vec<u8>) -> Result<&SelectedImage> {
        let outcome = SelectedImage::from_bytes(name, mime, bytes, &self.upload_config);
        self.accept_upload(outcome)
    }

    fn accept_upload(&mut self, outcome: Result<SelectedImage>) -> Result<&SelectedImage> {
        match outcome {
            Ok(image) => {
                info!(
                    path = %image.path().display(),
                    mime = image.format().mime_type(),
                    size = image.size(),
                    "image selected"
                );
                self.result = None;
                self.message = None;
                Ok(self.selected.insert(image))
            }
            Err(err) => {
                warn!(error = %err, "upload rejected");
                self.message = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Extract the dominant color of the selected image and derive its palette
    ///
    /// # Errors
    ///
    /// - `ProcessingError` when no image is selected
    /// - `DecodeError` / `ExtractionError` when the image cannot be analyzed;
    ///   the selected image is kept
    pub fn analyze(&mut self) -> Result<&PaletteResult> {
        let Some(selected) = self.selected.as_ref() else {
            let err = AnalysisError::ProcessingError {
                message: "no image selected".into(),
            };
            self.message = Some(err.user_message());
            return Err(err);
        };

        let outcome = selected
            .decode()
            .and_then(|image| self.extractor.extract_dominant_color(&image));

        match outcome {
            Ok(base) => {
                let palette = self.deriver.derive(base);
                info!(base = %palette.base, tone = %palette.tone, "palette derived");
                self.message = None;
                Ok(self.result.insert(palette))
            }
            Err(err) => {
                warn!(error = %err, path = %selected.path().display(), "analysis failed");
                self.message = Some(err.user_message());
                Err(err)
            }
        }
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    /// Last successful palette
    pub fn result(&self) -> Option<&PaletteResult> {
        self.result.as_ref()
    }

    /// User-facing message from the last failed step
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RgbColor;
    use image::DynamicImage;
    use std::cell::Cell;

    /// Returns a fixed color, or fails when `fail` is set
    struct FixedExtractor {
        color: RgbColor,
        fail: Cell<bool>,
    }

    impl FixedExtractor {
        fn new(color: RgbColor) -> Self {
            Self {
                color,
                fail: Cell::new(false),
            }
        }
    }

    impl DominantColorExtractor for FixedExtractor {
        fn extract_dominant_color(&self, _image: &DynamicImage) -> Result<RgbColor> {
            if self.fail.get() {
                Err(AnalysisError::ExtractionError {
                    reason: "forced failure".into(),
                })
            } else {
                Ok(self.color)
            }
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn session() -> AnalysisSession<FixedExtractor> {
        AnalysisSession::new(
            FixedExtractor::new(RgbColor::new(100, 150, 200)),
            UploadConfig::default(),
        )
    }

    #[test]
    fn test_analyze_without_image() {
        let mut session = session();
        let err = session.analyze().unwrap_err();

        assert!(matches!(err, AnalysisError::ProcessingError { .. }));
        assert!(session.message().is_some());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_upload_then_analyze() {
        let mut session = session();
        session.upload_bytes("photo.png", "image/png", png_bytes()).unwrap();
        assert!(session.message().is_none());

        let result = session.analyze().unwrap().clone();
        assert_eq!(result.base, RgbColor::new(100, 150, 200));
        assert_eq!(session.result(), Some(&result));
    }

    #[test]
    fn test_rejected_upload_sets_message_only() {
        let mut session = session();
        let err = session
            .upload_bytes("notes.txt", "text/plain", b"hello".to_vec())
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(session.message(), Some(err.user_message().as_str()));
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_oversized_upload_is_rejected() {
        let mut session = AnalysisSession::new(
            FixedExtractor::new(RgbColor::new(0, 0, 0)),
            UploadConfig {
                max_file_size: 8,
                ..UploadConfig::default()
            },
        );

        let err = session.upload_bytes("big.png", "image/png", png_bytes()).unwrap_err();
        assert!(matches!(err, AnalysisError::FileTooLarge { limit: 8, .. }));
    }

    #[test]
    fn test_failed_analysis_keeps_selected_image() {
        let mut session = session();
        session.upload_bytes("photo.png", "image/png", png_bytes()).unwrap();
        session.analyze().unwrap();

        session.extractor().fail.set(true);
        let err = session.analyze().unwrap_err();

        assert!(err.is_recoverable());
        assert!(session.selected().is_some());
        assert!(session.message().is_some());

        // retry with the same image
        session.extractor().fail.set(false);
        assert!(session.analyze().is_ok());
        assert!(session.message().is_none());
    }

    #[test]
    fn test_new_upload_discards_previous_result() {
        let mut session = session();
        session.upload_bytes("first.png", "image/png", png_bytes()).unwrap();
        session.analyze().unwrap();
        assert!(session.result().is_some());

        session.upload_bytes("second.png", "image/png", png_bytes()).unwrap();
        assert!(session.result().is_none());
        assert_eq!(session.selected().unwrap().path(), Path::new("second.png"));
    }

    #[test]
    fn test_undecodable_image_is_reported() {
        let mut session = session();
        session
            .upload_bytes("broken.png", "image/png", b"garbage".to_vec())
            .unwrap();

        let err = session.analyze().unwrap_err();
        assert!(matches!(err, AnalysisError::DecodeError { .. }));
        assert!(session.selected().is_some());
    }
}
