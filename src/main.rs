//! # img-scrub CLI
//!
//! Command-line interface for the image scrubber.
//!
//! ## Usage
//! ```bash
//! img-scrub ~/Camera/incoming ~/Camera/clean
//! img-scrub --verbose --report json
//! ```

mod cli;

use image_scrubber::Result;

fn main() -> Result<()> {
    image_scrubber::init_tracing();
    cli::run()
}
