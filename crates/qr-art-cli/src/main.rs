//! Пример использования: `qr-art [DATA] [BACKGROUND] [OUTPUT] [BOX_SIZE] [BORDER]`
//!
//! Все аргументы позиционные и необязательные.

use anyhow::{Context, Result};
use qr_art_core::generate;

const DEFAULT_DATA: &str = "https://example.com";
const DEFAULT_BACKGROUND: &str = "f.png";
const DEFAULT_OUTPUT: &str = "ff.png";
const DEFAULT_BOX_SIZE: u32 = 20;
const DEFAULT_BORDER: u32 = 2;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let data = args.next().unwrap_or_else(|| DEFAULT_DATA.to_string());
    let background = args.next().unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let box_size = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid box size: {s}"))?,
        None => DEFAULT_BOX_SIZE,
    };
    let border = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid border: {s}"))?,
        None => DEFAULT_BORDER,
    };

    let report = generate(&data, &background, &output, box_size, border)
        .with_context(|| format!("failed to generate QR from background {background}"))?;
    log::debug!("{:?}", report);

    println!("QR Code Image generated");
    Ok(())
}
