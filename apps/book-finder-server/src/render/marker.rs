//! Match markers
//!
//! Each rectangle is outlined twice: a wide outer stroke, then a narrower
//! inner stroke in a second color. Strokes are centred on the rectangle edges
//! and clipped to the canvas. Later rectangles are drawn over earlier ones.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::matching::Rectangle;

/// Stroke colors and widths for match markers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub outer_color: Rgb<u8>,
    pub outer_width: u32,
    pub inner_color: Rgb<u8>,
    pub inner_width: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            // #a1fd32
            outer_color: Rgb([0xa1, 0xfd, 0x32]),
            outer_width: 20,
            // #fd4a32
            inner_color: Rgb([0xfd, 0x4a, 0x32]),
            inner_width: 10,
        }
    }
}

/// Draw every rectangle onto `image`, in order
pub fn render(image: &mut RgbImage, rectangles: &[Rectangle], style: &MarkerStyle) {
    for rect in rectangles {
        draw_outline(image, rect, style.outer_color, style.outer_width);
        draw_outline(image, rect, style.inner_color, style.inner_width);
    }
}

/// Closed outline of `rect` with a stroke `width` pixels wide
fn draw_outline(image: &mut RgbImage, rect: &Rectangle, color: Rgb<u8>, width: u32) {
    if width == 0 {
        return;
    }

    let half = (width / 2) as i32;
    let (left, top) = (rect.x1 - half, rect.y1 - half);
    let horizontal = rect.width() + width;
    let vertical = rect.height() + width;

    let bands = [
        Rect::at(left, top).of_size(horizontal, width),
        Rect::at(left, rect.y2 - half).of_size(horizontal, width),
        Rect::at(left, top).of_size(width, vertical),
        Rect::at(rect.x2 - half, top).of_size(width, vertical),
    ];

    for band in bands {
        draw_filled_rect_mut(image, band, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn canvas() -> RgbImage {
        RgbImage::from_pixel(200, 200, WHITE)
    }

    #[test]
    fn test_outline_strokes() {
        let mut image = canvas();
        let style = MarkerStyle::default();
        let rect = Rectangle {
            x1: 50,
            y1: 50,
            x2: 150,
            y2: 150,
        };

        render(&mut image, &[rect], &style);

        // Inner stroke on the edge itself
        assert_eq!(*image.get_pixel(50, 100), style.inner_color);
        assert_eq!(*image.get_pixel(100, 150), style.inner_color);
        // Outer stroke beyond the inner one
        assert_eq!(*image.get_pixel(42, 100), style.outer_color);
        assert_eq!(*image.get_pixel(100, 58), style.outer_color);
        // Corners are closed
        assert_eq!(*image.get_pixel(41, 41), style.outer_color);
        // Interior and exterior untouched
        assert_eq!(*image.get_pixel(100, 100), WHITE);
        assert_eq!(*image.get_pixel(20, 20), WHITE);
    }

    #[test]
    fn test_rectangles_past_the_canvas_are_clipped() {
        let mut image = canvas();
        let style = MarkerStyle::default();
        let rects = [
            Rectangle {
                x1: -20,
                y1: -20,
                x2: 80,
                y2: 60,
            },
            Rectangle {
                x1: 500,
                y1: 500,
                x2: 600,
                y2: 600,
            },
        ];

        render(&mut image, &rects, &style);

        assert_eq!(*image.get_pixel(80, 30), style.inner_color);
        assert_eq!(*image.get_pixel(199, 199), WHITE);
    }

    #[test]
    fn test_later_rectangles_draw_on_top() {
        let mut image = canvas();
        let first = MarkerStyle::default();
        let rect = Rectangle {
            x1: 50,
            y1: 50,
            x2: 150,
            y2: 150,
        };
        render(&mut image, &[rect], &first);

        // Second rectangle's outer stroke covers the first one's left edge
        let shifted = Rectangle {
            x1: 46,
            y1: 50,
            x2: 150,
            y2: 150,
        };
        let second = MarkerStyle {
            inner_width: 0,
            ..first
        };
        render(&mut image, &[shifted], &second);

        assert_eq!(*image.get_pixel(50, 100), first.outer_color);
    }

    #[test]
    fn test_no_rectangles_leaves_image_unchanged() {
        let mut image = canvas();
        render(&mut image, &[], &MarkerStyle::default());
        assert!(image.pixels().all(|p| *p == WHITE));
    }
}
