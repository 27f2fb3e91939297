//! Модуль построения матрицы QR-кода
//!
//! Кодирование делегируется крейту `qrcode`; здесь только выбор версии
//! и уровня коррекции ошибок и перевод результата в булеву сетку.

use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};
use serde::{Deserialize, Serialize};

use crate::StyleError;

/// Максимальная версия обычного QR-кода
pub const MAX_VERSION: u8 = 40;

/// Уровень коррекции ошибок
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCorrectionLevel {
    L, // ~7%
    M, // ~15%
    Q, // ~25%
    H, // ~30%
}

impl ErrorCorrectionLevel {
    fn to_ec_level(self) -> EcLevel {
        match self {
            ErrorCorrectionLevel::L => EcLevel::L,
            ErrorCorrectionLevel::M => EcLevel::M,
            ErrorCorrectionLevel::Q => EcLevel::Q,
            ErrorCorrectionLevel::H => EcLevel::H,
        }
    }
}

impl std::fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCorrectionLevel::L => "L",
            ErrorCorrectionLevel::M => "M",
            ErrorCorrectionLevel::Q => "Q",
            ErrorCorrectionLevel::H => "H",
        };
        f.write_str(name)
    }
}

/// Политика выбора версии
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Строго заданная версия; данные, которые не помещаются, дают ошибку
    Exact,
    /// Заданная версия как минимальная; при нехватке ёмкости версия
    /// повышается по одной до 40
    AtLeast,
}

/// Конфигурация кодировщика
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Версия QR-кода (1-40)
    pub version: u8,
    /// Уровень коррекции ошибок
    pub ec_level: ErrorCorrectionLevel,
    /// Политика выбора версии
    pub version_policy: VersionPolicy,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            version: 6,
            ec_level: ErrorCorrectionLevel::H,
            version_policy: VersionPolicy::Exact,
        }
    }
}

/// Квадратная булева матрица модулей (true = тёмный модуль)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: u32,
    version: u8,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Сборка матрицы из строк; все строки должны иметь длину, равную их числу
    pub fn from_rows(rows: &[Vec<bool>], version: u8) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size: size as u32,
            version,
            modules: rows.iter().flatten().copied().collect(),
        })
    }

    /// Сторона матрицы в модулях (без рамки)
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Версия, с которой была закодирована матрица
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Значение модуля: `x` — столбец, `y` — строка
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.size && y < self.size && self.modules[(y * self.size + x) as usize]
    }

    /// Координаты всех тёмных модулей в порядке строк
    pub fn dark_modules(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let size = self.size;
        self.modules
            .iter()
            .enumerate()
            .filter(|&(_, &dark)| dark)
            .map(move |(i, _)| (i as u32 % size, i as u32 / size))
    }

    /// Количество тёмных модулей
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&dark| dark).count()
    }
}

/// Кодировщик данных в матрицу модулей
pub struct MatrixEncoder {
    config: EncoderConfig,
}

impl Default for MatrixEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

impl MatrixEncoder {
    /// Создание кодировщика с конфигурацией
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Кодирование текста в матрицу
    pub fn encode(&self, data: &str) -> Result<ModuleMatrix, StyleError> {
        let ec_level = self.config.ec_level;
        let first = self.config.version;
        let last = match self.config.version_policy {
            VersionPolicy::Exact => first,
            VersionPolicy::AtLeast => MAX_VERSION.max(first),
        };

        for version in first..=last {
            match QrCode::with_version(data, Version::Normal(i16::from(version)), ec_level.to_ec_level()) {
                Ok(code) => {
                    log::debug!(
                        "Encoded {} bytes at version {} (EC {}), width {}",
                        data.len(),
                        version,
                        ec_level,
                        code.width()
                    );
                    return Ok(Self::to_matrix(&code, version));
                }
                Err(QrError::DataTooLong) => {
                    log::debug!("Data does not fit version {} (EC {})", version, ec_level);
                }
                Err(e) => return Err(StyleError::Encode(e)),
            }
        }

        Err(StyleError::DataTooLong {
            version: last,
            ec_level,
        })
    }

    fn to_matrix(code: &QrCode, version: u8) -> ModuleMatrix {
        let size = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();

        ModuleMatrix {
            size: size as u32,
            version,
            modules,
        }
    }
}
