#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use std::fs;
    use std::path::Path;
    use webpbatch::{
        BatchResponse, CodecError, ConvertError, DirectoryScanner, OutcomeStatus, UploadForm,
        UploadService, UploadedFile, WebpCodec,
    };

    /// Output size is a fixed fraction of the input; inputs starting with
    /// "corrupt" fail like undecodable data would.
    #[derive(Clone)]
    struct QuarterCodec;

    impl WebpCodec for QuarterCodec {
        fn encode(&self, source: &[u8], _quality: u8) -> Result<Vec<u8>, CodecError> {
            if source.starts_with(b"corrupt") {
                return Err(CodecError::Decode("unsupported image format".to_string()));
            }
            Ok(vec![0u8; source.len() / 4])
        }
    }

    fn write_test_image(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let img = image::RgbImage::from_fn(32, 24, |x, y| {
            image::Rgb([(x * 8) as u8, (y * 10) as u8, 128])
        });
        img.save(path).unwrap();
    }

    fn form(files: Vec<UploadedFile>, skip_existing: bool, move_originals: bool) -> UploadForm {
        UploadForm {
            files,
            quality: Some("75".to_string()),
            move_originals: Some(move_originals.to_string()),
            skip_existing: Some(skip_existing.to_string()),
        }
    }

    fn quarter_service(temp: &TempDir) -> UploadService<QuarterCodec> {
        UploadService::with_codec(
            temp.path().join("outputs"),
            temp.path().join("temp"),
            QuarterCodec,
        )
    }

    fn two_uploads() -> Vec<UploadedFile> {
        vec![
            UploadedFile::in_memory("a.jpg", Some("image/jpeg"), vec![1u8; 500_000]),
            UploadedFile::in_memory("b.png", Some("image/png"), vec![2u8; 300_000]),
        ]
    }

    #[test]
    fn test_batch_converts_and_totals() {
        let temp = TempDir::new().unwrap();
        let service = quarter_service(&temp);

        let response = service.convert(form(two_uploads(), false, false));
        let report = response.report().expect("batch should complete");

        assert_eq!(report.converted(), 2);
        assert_eq!(report.skipped(), 0);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.total_original_size(), 800_000);
        assert_eq!(report.total_webp_size(), 200_000);
        assert_eq!(report.space_saved(), 600_000);
        assert!(report
            .files()
            .iter()
            .all(|f| f.status() == OutcomeStatus::Converted && f.original_size().is_some()));
        assert_eq!(file_len(temp.child("outputs/a.webp").path()), 125_000);
    }

    fn file_len(path: &Path) -> u64 {
        fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }

    #[test]
    fn test_second_run_skips_everything() {
        let temp = TempDir::new().unwrap();
        let service = quarter_service(&temp);

        let first = service.convert(form(two_uploads(), true, false));
        assert_eq!(first.report().unwrap().converted(), 2);

        let second = service.convert(form(two_uploads(), true, false));
        let report = second.report().unwrap();
        assert_eq!(report.converted(), 0);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.space_saved(), 0);
        assert!(report
            .files()
            .iter()
            .all(|f| f.message() == "WebP version already exists"));
    }

    #[test]
    fn test_corrupt_file_fails_alone() {
        let temp = TempDir::new().unwrap();
        let service = UploadService::new(temp.path().join("outputs"), temp.path().join("temp"));
        let good = temp.child("good.png");
        write_test_image(good.path());

        let files = vec![
            UploadedFile::in_memory("broken.jpg", Some("image/jpeg"), b"corrupt, not a jpeg".to_vec()),
            UploadedFile::from_local(good.path()),
        ];
        let report = service.try_convert(form(files, false, false)).unwrap();

        assert_eq!(report.processed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.converted(), 1);
        assert_eq!(report.files()[0].original_name(), "broken.jpg");
        assert_eq!(report.files()[0].status(), OutcomeStatus::Failed);
        assert!(!report.files()[0].message().is_empty());
        assert_eq!(report.total_original_size(), fs::metadata(good.path()).unwrap().len());

        let webp = fs::read(temp.child("outputs/good.webp").path()).unwrap();
        assert_eq!(image::guess_format(&webp).unwrap(), image::ImageFormat::WebP);
    }

    #[test]
    fn test_missing_staged_file_fails_alone() {
        let temp = TempDir::new().unwrap();
        let service = quarter_service(&temp);
        let files = vec![
            UploadedFile::in_memory("a.jpg", Some("image/jpeg"), vec![1u8; 4_000]),
            UploadedFile::staged("b.jpg", Some("image/jpeg"), temp.path().join("uploads/gone.jpg")),
        ];

        let response = service.convert(form(files, false, true));
        assert!(response.is_success());
        assert_eq!(response.status_code(), 200);

        let report = response.report().unwrap();
        assert_eq!(report.converted(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.files()[1].original_name(), "b.jpg");
        assert_eq!(report.files()[1].status(), OutcomeStatus::Failed);
        assert_eq!(report.total_original_size(), 4_000);
        assert_eq!(file_len(temp.child("outputs/a.webp").path()), 1_000);
        assert!(!temp.child("outputs/b.webp").path().exists());
    }

    #[test]
    fn test_move_originals_relocates_unchanged_bytes() {
        let temp = TempDir::new().unwrap();
        let staged = temp.child("uploads/1700000000-photo.jpg");
        write_test_image(staged.path());
        let original_bytes = fs::read(staged.path()).unwrap();

        let service = UploadService::new(temp.path().join("outputs"), temp.path().join("temp"));
        let files = vec![UploadedFile::staged("photo.jpg", Some("image/jpeg"), staged.path())];
        let report = service.try_convert(form(files, false, true)).unwrap();

        assert_eq!(report.converted(), 1);
        assert!(!staged.path().exists());
        assert_eq!(fs::read(temp.child("temp/photo.jpg").path()).unwrap(), original_bytes);
        assert!(temp.child("outputs/photo.webp").path().exists());
        assert_eq!(report.files()[0].webp_name(), Some("photo.webp"));
    }

    #[test]
    fn test_outcomes_follow_input_order() {
        let temp = TempDir::new().unwrap();
        let service = quarter_service(&temp).with_threads(3);
        let names = ["z.png", "m.jpg", "a.tiff", "q.bmp", "c.gif", "k.webp"];
        let files = names
            .iter()
            .map(|name| UploadedFile::in_memory(*name, None, vec![7u8; 64]))
            .collect();

        let report = service.try_convert(form(files, false, false)).unwrap();
        let got: Vec<&str> = report.files().iter().map(|f| f.original_name()).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn test_upload_rejections() {
        let temp = TempDir::new().unwrap();
        let service = quarter_service(&temp);

        let empty = service.convert(UploadForm::default());
        assert_eq!(empty.status_code(), 400);
        assert!(!empty.is_success());

        let pdf = vec![UploadedFile::in_memory("document.pdf", Some("image/png"), vec![1; 10])];
        let response = service.convert(form(pdf, false, false));
        assert_eq!(response.status_code(), 400);
        match response {
            BatchResponse::Failed { message, .. } => assert_eq!(message, "Only image files are allowed!"),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!temp.child("outputs").path().exists());
    }

    #[test]
    fn test_download_lookup() {
        let temp = TempDir::new().unwrap();
        let service = quarter_service(&temp);
        service
            .try_convert(form(two_uploads(), false, false))
            .unwrap();

        assert_eq!(service.download("a.webp").unwrap().len(), 125_000);
        assert!(matches!(service.download("missing.webp"), Err(ConvertError::NotFound(_))));
        assert!(matches!(service.download("../secret"), Err(ConvertError::InvalidName(_))));
        assert!(matches!(service.download_all(), Err(ConvertError::NotImplemented)));
    }

    #[test]
    fn test_directory_scan_converts_in_place() {
        let temp = TempDir::new().unwrap();
        let assets = temp.child("assets");
        write_test_image(assets.child("hero.jpg").path());
        write_test_image(assets.child("icons/logo.png").path());
        write_test_image(assets.child("Tempold/kept.png").path());

        let report = DirectoryScanner::new(assets.path()).run().unwrap();
        assert_eq!(report.converted(), 2);

        assert!(file_len(assets.child("hero.webp").path()) > 0);
        assert!(file_len(assets.child("icons/logo.webp").path()) > 0);
        assert!(!assets.child("hero.jpg").path().exists());
        assert!(temp.child("Tempassets/hero.jpg").path().exists());
        assert!(assets.child("Tempicons/logo.png").path().exists());
        // holding folders are never scanned
        assert!(assets.child("Tempold/kept.png").path().exists());
        assert!(!assets.child("Tempold/kept.webp").path().exists());

        let second = DirectoryScanner::new(assets.path()).run().unwrap();
        assert_eq!(second.processed(), 0);
    }

    #[test]
    fn test_scan_skips_existing_output_and_keeps_original() {
        let temp = TempDir::new().unwrap();
        let root = temp.child("site");
        write_test_image(root.child("a.png").path());
        root.child("a.webp").write_str("already here").unwrap();

        let report = DirectoryScanner::with_codec(root.path(), QuarterCodec).run().unwrap();
        assert_eq!(report.skipped(), 1);
        assert!(root.child("a.png").path().exists());
        root.child("a.webp").assert("already here");
    }
}
