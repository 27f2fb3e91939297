//! Модуль растеризации
//!
//! Каждый тёмный модуль рисуется кругом, вписанным в свою ячейку.
//! Цвет круга — один пиксель фона в центре ячейки.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_ellipse_mut;

use crate::geometry::Layout;
use crate::matrix::ModuleMatrix;
use crate::StyleError;

/// Непрозрачный белый
pub const OPAQUE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Растеризатор QR-слоя
pub struct Rasterizer {
    /// Заливка светлых модулей и рамки
    light_color: Rgba<u8>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(OPAQUE_WHITE)
    }
}

impl Rasterizer {
    pub fn new(light_color: Rgba<u8>) -> Self {
        Self { light_color }
    }

    /// Построение QR-слоя размером `layout.total_size()`.
    ///
    /// `background` должен быть уже подогнан под тот же размер.
    pub fn render(
        &self,
        matrix: &ModuleMatrix,
        layout: &Layout,
        background: &RgbaImage,
    ) -> Result<RgbaImage, StyleError> {
        let total_size = layout.total_size();
        if background.dimensions() != (total_size, total_size) {
            return Err(StyleError::CanvasMismatch {
                expected: (total_size, total_size),
                actual: background.dimensions(),
            });
        }

        let mut layer = RgbaImage::from_pixel(total_size, total_size, self.light_color);
        let radius = layout.dot_radius() as i32;

        for (x, y) in matrix.dark_modules() {
            let (px, py) = layout.cell_center(x, y);
            let [r, g, b, _] = background.get_pixel(px, py).0;
            draw_filled_ellipse_mut(
                &mut layer,
                (px as i32, py as i32),
                radius,
                radius,
                Rgba([r, g, b, 255]),
            );
        }

        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_matrix(size: usize) -> ModuleMatrix {
        let rows: Vec<Vec<bool>> = (0..size)
            .map(|y| (0..size).map(|x| (x + y) % 2 == 0).collect())
            .collect();
        ModuleMatrix::from_rows(&rows, 1).unwrap()
    }

    fn gradient(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| Rgba([x as u8, y as u8, 128, 90]))
    }

    #[test]
    fn test_layer_size_and_default_fill() {
        let matrix = ModuleMatrix::from_rows(&[vec![false; 3], vec![false; 3], vec![false; 3]], 1).unwrap();
        let layout = Layout::new(3, 2, 6).unwrap();
        let bg = gradient(layout.total_size());

        let layer = Rasterizer::default().render(&matrix, &layout, &bg).unwrap();
        assert_eq!(layer.dimensions(), (42, 42));
        assert!(layer.pixels().all(|p| *p == OPAQUE_WHITE));
    }

    #[test]
    fn test_dot_center_takes_sampled_color() {
        let matrix = checker_matrix(5);
        let layout = Layout::new(5, 1, 9).unwrap();
        let bg = gradient(layout.total_size());

        let layer = Rasterizer::default().render(&matrix, &layout, &bg).unwrap();
        for (x, y) in matrix.dark_modules() {
            let (px, py) = layout.cell_center(x, y);
            let [r, g, b, _] = bg.get_pixel(px, py).0;
            assert_eq!(*layer.get_pixel(px, py), Rgba([r, g, b, 255]));
        }
    }

    #[test]
    fn test_dot_is_uniform_single_sample() {
        let matrix = checker_matrix(3);
        let layout = Layout::new(3, 0, 11).unwrap();
        let bg = gradient(layout.total_size());

        let layer = Rasterizer::default().render(&matrix, &layout, &bg).unwrap();
        let rect = layout.cell_rect(0, 0);
        let (cx, cy) = layout.cell_center(0, 0);
        let center = *layer.get_pixel(cx, cy);
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let p = *layer.get_pixel(x, y);
                assert!(p == center || p == OPAQUE_WHITE);
            }
        }
        // Углы ячейки остаются светлыми: круг не заполняет квадрат
        assert_eq!(*layer.get_pixel(rect.x0, rect.y0), OPAQUE_WHITE);
        assert_eq!(*layer.get_pixel(rect.x1 - 1, rect.y1 - 1), OPAQUE_WHITE);
    }

    #[test]
    fn test_light_cells_untouched() {
        let matrix = checker_matrix(4);
        let layout = Layout::new(4, 1, 10).unwrap();
        let bg = gradient(layout.total_size());

        let layer = Rasterizer::default().render(&matrix, &layout, &bg).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                if matrix.get(x, y) {
                    continue;
                }
                let rect = layout.cell_rect(x, y);
                for py in rect.y0..rect.y1 {
                    for px in rect.x0..rect.x1 {
                        assert_eq!(*layer.get_pixel(px, py), OPAQUE_WHITE);
                    }
                }
            }
        }
    }

    #[test]
    fn test_custom_light_color() {
        let matrix = checker_matrix(2);
        let layout = Layout::new(2, 1, 4).unwrap();
        let bg = gradient(layout.total_size());
        let clear = Rgba([0, 0, 0, 0]);

        let layer = Rasterizer::new(clear).render(&matrix, &layout, &bg).unwrap();
        assert_eq!(*layer.get_pixel(0, 0), clear);
    }

    #[test]
    fn test_background_size_mismatch() {
        let matrix = checker_matrix(3);
        let layout = Layout::new(3, 0, 4).unwrap();
        let bg = gradient(10);

        let result = Rasterizer::default().render(&matrix, &layout, &bg);
        assert!(matches!(
            result,
            Err(StyleError::CanvasMismatch { expected: (12, 12), actual: (10, 10) })
        ));
    }
}
