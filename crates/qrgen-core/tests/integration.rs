//! Integration tests for the QR generator form

use image::GrayImage;
use qrgen_core::{
    validate, ErrorCorrection, Exporter, GeneratorError, InputMode, PixelSize, QrForm,
    QrGenerator, QrRenderer,
};

/// Decode a PNG produced by the exporter back to its payload.
///
/// The rendered code has no quiet zone, so it is pasted onto a white canvas first.
fn decode_png(bytes: &[u8]) -> (usize, String) {
    let img = image::load_from_memory(bytes).unwrap().to_luma8();
    let margin = 40;
    let mut canvas = GrayImage::from_pixel(
        img.width() + margin * 2,
        img.height() + margin * 2,
        image::Luma([255]),
    );
    image::imageops::overlay(&mut canvas, &img, margin as i64, margin as i64);

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        canvas.width() as usize,
        canvas.height() as usize,
        |x, y| canvas.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert!(!grids.is_empty(), "no QR grid found in exported PNG");

    let (meta, content) = grids[0].decode().unwrap();
    (meta.version.0, content)
}

#[test]
fn test_empty_input_closes_gate_in_every_mode() {
    for mode in InputMode::ALL {
        let mut form = QrForm::new();
        form.set_mode(mode);
        form.edit_input("");

        assert!(form.validation_error().is_some());
        assert!(!form.gate_open());
        assert!(!form.can_export());
        assert!(form.render_request().is_none());
    }
}

#[test]
fn test_mode_switch_clears_state() {
    for from in InputMode::ALL {
        for to in InputMode::ALL {
            let mut form = QrForm::new();
            form.set_mode(from);
            form.edit_input("garbage that may or may not be valid");
            form.set_mode(to);

            assert_eq!(form.raw_data(), "");
            assert_eq!(form.image_source(), "");
            assert_eq!(form.validation_error(), None);
        }
    }
}

#[test]
fn test_text_validation_matches_trim() {
    let samples = ["", " ", "a", " a ", "\n", "\u{3000}", "hello world", "\t x"];
    for s in samples {
        assert_eq!(validate(InputMode::Text, s), !s.trim().is_empty(), "{s:?}");
    }
}

#[test]
fn test_url_validation() {
    for mode in [InputMode::Url, InputMode::Image] {
        assert!(validate(mode, "https://example.com"));
        assert!(!validate(mode, "not a url"));
        assert!(!validate(mode, ""));
    }
}

#[test]
fn test_pixel_size_round_trip() {
    let mut form = QrForm::new();
    for px in [200, 300, 400, 500, 600] {
        form.set_pixel_size_px(px).unwrap();
        assert_eq!(form.style().size.px(), px);
    }
    assert!(matches!(
        form.set_pixel_size_px(700),
        Err(GeneratorError::InvalidSize(700))
    ));
    assert_eq!(form.style().size, PixelSize::Px600);
}

#[test]
fn test_image_overlay_quarter_size() {
    let mut form = QrForm::new();
    form.set_mode(InputMode::Image);
    form.set_pixel_size(PixelSize::Px400);
    form.edit_input("https://example.com/logo.png");

    let request = form.render_request().unwrap();
    let overlay = request.overlay.unwrap();
    assert_eq!(overlay.width, 100.0);
    assert_eq!(overlay.height, 100.0);
    assert_eq!(request.payload, "https://example.com/logo.png");
}

#[test]
fn test_text_end_to_end() {
    let mut form = QrForm::new();
    form.edit_input("hello");

    assert!(form.gate_open());
    let request = form.render_request().unwrap();
    assert_eq!(request.payload, "hello");
    assert_eq!(request.level, ErrorCorrection::High);
    assert!(request.overlay.is_none());

    let file = Exporter::new().export(&form).unwrap();
    let (_, content) = decode_png(&file.bytes);
    assert_eq!(content, "hello");
}

#[test]
fn test_high_error_correction_is_used() {
    // 8 bytes fit version 1 at levels L/M/Q, but need version 2 at H
    let mut form = QrForm::new();
    form.edit_input("hello qr");

    let svg = QrRenderer::new()
        .render(&form.render_request().unwrap())
        .unwrap();
    assert_eq!(svg.modules, 25);

    let file = Exporter::new().export(&form).unwrap();
    let (version, content) = decode_png(&file.bytes);
    assert_eq!(version, 2);
    assert_eq!(content, "hello qr");
}

#[test]
fn test_url_end_to_end() {
    let mut form = QrForm::new();
    form.set_mode(InputMode::Url);

    form.edit_input("ftp://x");
    assert!(form.gate_open());
    assert_eq!(form.render_request().unwrap().payload, "ftp://x");

    form.edit_input("example.com");
    assert_eq!(form.validation_error(), Some("Invalid url input"));
    assert!(!form.gate_open());
}

#[test]
fn test_export_dimensions_follow_size() {
    let mut generator = QrGenerator::new();
    generator.form_mut().edit_input("dimensions");

    for size in PixelSize::ALL {
        generator.form_mut().set_pixel_size(size);
        let svg = generator.render().unwrap().unwrap();
        let file = generator.export().unwrap();

        assert_eq!(file.file_name, "qr-code.png");
        assert_eq!((file.width, file.height), (svg.width, svg.height));
        assert_eq!(file.width, size.px());
    }
}

#[test]
fn test_colored_export_still_decodes() {
    let mut form = QrForm::new();
    form.set_foreground_hex("#1e3a8a").unwrap();
    form.set_background_hex("#fefce8").unwrap();
    form.set_mode(InputMode::Url);
    form.edit_input("https://example.com/path?q=1");

    let file = Exporter::new().export(&form).unwrap();
    let (_, content) = decode_png(&file.bytes);
    assert_eq!(content, "https://example.com/path?q=1");
}

#[test]
fn test_image_mode_export_stays_scannable() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .is_test(true)
        .try_init();

    let mut form = QrForm::new();
    form.set_mode(InputMode::Image);
    form.edit_input("https://example.com/logo.png");

    // Remote overlay is not fetched during export; the excavated area stays empty
    for size in PixelSize::ALL {
        form.set_pixel_size(size);
        let file = Exporter::new().export(&form).unwrap();
        assert_eq!((file.width, file.height), (size.px(), size.px()));

        let (_, content) = decode_png(&file.bytes);
        assert_eq!(content, "https://example.com/logo.png", "at {}px", size.px());
    }
}
