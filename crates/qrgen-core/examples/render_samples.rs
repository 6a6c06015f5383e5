//! Writes a sample PNG for every input mode
//!
//! Usage: cargo run -p qrgen-core --example render_samples

use std::fs;
use std::path::Path;

use anyhow::Context;
use qrgen_core::{GeneratorConfig, InputMode, QrGenerator};

fn main() -> anyhow::Result<()> {
    let output_dir = Path::new("generated_samples");
    fs::create_dir_all(output_dir)?;

    println!("Writing samples to {:?}", output_dir);

    let samples = [
        (InputMode::Text, "Hello from the QR generator", "#000000", "#ffffff"),
        (InputMode::Url, "https://example.com/docs", "#1e3a8a", "#f8fafc"),
        (InputMode::Image, "https://example.com/logo.png", "#7c3aed", "#ffffff"),
    ];

    let mut generator = QrGenerator::with_config(&GeneratorConfig::default());

    for (mode, input, fg, bg) in samples {
        let form = generator.form_mut();
        form.set_mode(mode);
        form.set_foreground_hex(fg)?;
        form.set_background_hex(bg)?;
        form.edit_input(input);

        for size in [200, 400, 600] {
            generator.form_mut().set_pixel_size_px(size)?;
            let file = generator
                .export()
                .with_context(|| format!("export failed for {} at {}px", mode, size))?;

            let name = format!("{}_{}.png", mode, size);
            fs::write(output_dir.join(&name), &file.bytes)?;
            println!("  Created {} ({}x{})", name, file.width, file.height);
        }
    }

    Ok(())
}
