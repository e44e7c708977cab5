//! # image-doubles CLI
//!
//! Command-line interface for the duplicate image finder.
//!
//! ## Usage
//! ```bash
//! image-doubles scan ~/Photos --skip .thumbnails
//! image-doubles scan ~/Photos --dump --delete
//! ```

mod cli;

use image_doubles::Result;

fn main() -> Result<()> {
    image_doubles::init_tracing();
    cli::run()
}
