//! Модуль подготовки фона
//!
//! Загрузка фонового изображения и точный ресайз под размер холста QR.

use std::path::Path;

use image::imageops::FilterType;
use image::{Rgba, Rgba32FImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::StyleError;

/// Фильтр ресемплинга при подгонке фона
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Загрузчик фона
pub struct BackgroundLoader {
    filter: ResampleFilter,
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        Self::new(ResampleFilter::Lanczos3)
    }
}

impl BackgroundLoader {
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    /// Чтение файла в RGBA. Формат определяется по содержимому/расширению.
    pub fn load(&self, path: &Path) -> Result<RgbaImage, StyleError> {
        let img = image::open(path).map_err(|source| StyleError::Background {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded background {:?}, size: {:?}", path, (img.width(), img.height()));
        Ok(img.to_rgba8())
    }

    /// Точный ресайз до `total_size x total_size` (пропорции не сохраняются).
    ///
    /// Ресемплинг идёт в предумноженной альфе, иначе цвет на границе
    /// прозрачных областей уходит в RGB прозрачных пикселей.
    pub fn fit(&self, img: &RgbaImage, total_size: u32) -> RgbaImage {
        if img.dimensions() == (total_size, total_size) {
            return img.clone();
        }

        log::debug!(
            "Resizing background {:?} -> {}x{} ({:?})",
            img.dimensions(),
            total_size,
            total_size,
            self.filter
        );
        let resized = image::imageops::resize(
            &premultiply(img),
            total_size,
            total_size,
            self.filter.into(),
        );
        unpremultiply(&resized)
    }
}

fn premultiply(img: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0.map(|c| f32::from(c) / 255.0);
        Rgba([r * a, g * a, b * a, a])
    })
}

fn unpremultiply(img: &Rgba32FImage) -> RgbaImage {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        if a <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), to_u8(a)])
    })
}
