//! Generator of sample styled QR codes over synthetic backgrounds
//!
//! Usage: cargo run -p qr-art-core --example gen_gallery

use std::fs;
use std::path::Path;

use anyhow::Result;
use image::{Rgba, RgbaImage};
use qr_art_core::{QRStylizer, StyleConfig};

fn main() -> Result<()> {
    let output_dir = Path::new("generated_gallery");
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    println!("Generating gallery in {:?}", output_dir);

    let backgrounds = [
        ("gradient", gradient(400)),
        ("checker", checker(400)),
        ("noise", noise(400)),
    ];
    let payloads = [
        ("url", "https://github.com/your-org/qr-art"),
        ("text", "Circular dots, colored by the picture underneath."),
    ];

    let stylizer = QRStylizer::with_config(StyleConfig {
        box_size: 12,
        border: 2,
        ..StyleConfig::default()
    });

    let mut count = 0;
    for (bg_name, bg) in &backgrounds {
        let bg_path = output_dir.join(format!("bg_{}.png", bg_name));
        bg.save(&bg_path)?;

        for (cat, content) in &payloads {
            let out = output_dir.join(format!("{}_{}.png", cat, bg_name));
            let report = stylizer.generate(content, &bg_path, &out)?;
            println!("  {:?}: version {}, {}px", out, report.version, report.canvas_size);
            count += 1;
        }
    }

    println!("Generated {} images.", count);
    Ok(())
}

fn gradient(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let r = (x as f32 / size as f32 * 200.0) as u8;
        let b = (y as f32 / size as f32 * 200.0) as u8;
        Rgba([r, 40, b, 255])
    })
}

fn checker(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if ((x / 40) + (y / 40)) % 2 == 0 {
            Rgba([30, 90, 160, 255])
        } else {
            Rgba([200, 60, 40, 255])
        }
    })
}

fn noise(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        // Simple pseudo-random noise
        let n = ((x * 17 + y * 31 + x * y) % 120) as u8;
        Rgba([n, 120 - n / 2, 60 + n, 255])
    })
}
