/// File and memory I/O for pixmill images, on top of the `image` crate.

pub mod codec;

pub use codec::{OutputFormat, decode, encode, load_image, save_image};
