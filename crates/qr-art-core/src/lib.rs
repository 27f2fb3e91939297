//! QR Art Core - Генерация QR-кодов с круглыми модулями
//!
//! Библиотека строит QR-код, тёмные модули которого рисуются кругами,
//! окрашенными по фоновому изображению:
//! - Построение матрицы через крейт `qrcode` (версия 6, коррекция H по умолчанию)
//! - Подгонка фона под размер холста (Lanczos3)
//! - Растеризация кругов с выборкой цвета из центра ячейки
//! - Альфа-композиция поверх фона и сохранение в файл

pub mod background;
pub mod composite;
pub mod geometry;
pub mod matrix;
pub mod raster;

pub use background::{BackgroundLoader, ResampleFilter};
pub use composite::{composite, save};
pub use geometry::{CellRect, Layout};
pub use matrix::{EncoderConfig, ErrorCorrectionLevel, MatrixEncoder, ModuleMatrix, VersionPolicy};
pub use raster::{Rasterizer, OPAQUE_WHITE};

use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Размер модуля по умолчанию, пикселей
pub const DEFAULT_BOX_SIZE: u32 = 20;
/// Рамка по умолчанию, модулей
pub const DEFAULT_BORDER: u32 = 4;

/// Основные ошибки модуля
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Data too long for QR version {version} at error correction level {ec_level}")]
    DataTooLong {
        version: u8,
        ec_level: ErrorCorrectionLevel,
    },

    #[error("QR encoding error: {0}")]
    Encode(qrcode::types::QrError),

    #[error("Failed to load background {path:?}: {source}")]
    Background {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported output format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to write {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Canvas size mismatch: expected {expected:?}, got {actual:?}")]
    CanvasMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Конфигурация стилизации
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Размер одного модуля в пикселях
    pub box_size: u32,
    /// Ширина рамки в модулях с каждой стороны
    pub border: u32,
    /// Версия QR-кода (1-40)
    pub version: u8,
    /// Уровень коррекции ошибок
    pub ec_level: ErrorCorrectionLevel,
    /// Политика выбора версии
    pub version_policy: VersionPolicy,
    /// Заливка светлых модулей (RGBA)
    pub light_color: [u8; 4],
    /// Фильтр ресайза фона
    pub resample: ResampleFilter,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let encoder = EncoderConfig::default();
        Self {
            box_size: DEFAULT_BOX_SIZE,
            border: DEFAULT_BORDER,
            version: encoder.version,
            ec_level: encoder.ec_level,
            version_policy: encoder.version_policy,
            light_color: OPAQUE_WHITE.0,
            resample: ResampleFilter::Lanczos3,
        }
    }
}

impl StyleConfig {
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            version: self.version,
            ec_level: self.ec_level,
            version_policy: self.version_policy,
        }
    }
}

/// Результат генерации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Куда записан результат
    pub output_path: PathBuf,
    /// Фактическая версия QR-кода
    pub version: u8,
    /// Сторона матрицы в модулях
    pub matrix_size: u32,
    /// Сторона итогового изображения в пикселях
    pub canvas_size: u32,
    /// Количество нарисованных кругов
    pub dark_modules: usize,
}

/// Главный генератор стилизованных QR-кодов
pub struct QRStylizer {
    config: StyleConfig,
    encoder: MatrixEncoder,
    loader: BackgroundLoader,
    rasterizer: Rasterizer,
}

impl Default for QRStylizer {
    fn default() -> Self {
        Self::new()
    }
}

impl QRStylizer {
    /// Создание генератора с настройками по умолчанию
    pub fn new() -> Self {
        Self::with_config(StyleConfig::default())
    }

    /// Создание генератора с пользовательскими настройками
    pub fn with_config(config: StyleConfig) -> Self {
        Self {
            encoder: MatrixEncoder::new(config.encoder_config()),
            loader: BackgroundLoader::new(config.resample),
            rasterizer: Rasterizer::new(Rgba(config.light_color)),
            config,
        }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Стилизация в памяти: матрица, ресайз фона, круги, композиция
    pub fn stylize(&self, data: &str, background: &DynamicImage) -> Result<RgbaImage, StyleError> {
        self.render(data, &background.to_rgba8())
            .map(|(image, _, _)| image)
    }

    /// Полный цикл: загрузка фона из файла и запись результата
    pub fn generate(
        &self,
        data: &str,
        bg_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<GenerationReport, StyleError> {
        let bg_path = bg_path.as_ref();
        let output_path = output_path.as_ref();
        log::info!("Generating QR for {} bytes, background {:?}", data.len(), bg_path);

        let background = self.loader.load(bg_path)?;
        let (image, matrix, layout) = self.render(data, &background)?;

        log::info!("Saving to {:?}", output_path);
        save(&image, output_path)?;
        log::debug!("QR Code Image generated: {:?}", output_path);

        Ok(GenerationReport {
            output_path: output_path.to_path_buf(),
            version: matrix.version(),
            matrix_size: matrix.size(),
            canvas_size: layout.total_size(),
            dark_modules: matrix.dark_count(),
        })
    }

    fn render(
        &self,
        data: &str,
        background: &RgbaImage,
    ) -> Result<(RgbaImage, ModuleMatrix, Layout), StyleError> {
        let matrix = self.encoder.encode(data)?;
        let layout = Layout::new(matrix.size(), self.config.border, self.config.box_size)?;
        log::info!(
            "Matrix {}x{} (version {}), canvas {}px",
            matrix.size(),
            matrix.size(),
            matrix.version(),
            layout.total_size()
        );

        let background = self.loader.fit(background, layout.total_size());
        let layer = self.rasterizer.render(&matrix, &layout, &background)?;
        let image = composite(&background, &layer)?;

        Ok((image, matrix, layout))
    }
}

/// Генерация с явными размерами; версия 6 и коррекция H фиксированы
pub fn generate(
    data: &str,
    bg_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    box_size: u32,
    border: u32,
) -> Result<GenerationReport, StyleError> {
    let config = StyleConfig {
        box_size,
        border,
        ..StyleConfig::default()
    };
    QRStylizer::with_config(config).generate(data, bg_path, output_path)
}

/// Генерация с размерами по умолчанию (модуль 20px, рамка 4)
pub fn generate_default(
    data: &str,
    bg_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<GenerationReport, StyleError> {
    generate(data, bg_path, output_path, DEFAULT_BOX_SIZE, DEFAULT_BORDER)
}
