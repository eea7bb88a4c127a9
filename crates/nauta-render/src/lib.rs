// Grayscale materialization and export of LTSA matrices.

pub mod image;

pub use image::{ResizeSpec, render_image, render_png, to_gray_image};
