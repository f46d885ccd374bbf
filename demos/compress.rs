//! This example compresses a local image, resizes it, and converts it to WebP.
//!
//! To run this example, you must have the `TINYPNG_API_KEY` environment variable set,
//! and an image file must exist at `assets/image.png`.
//!
//! Usage:
//! `cargo run --example compress`

use tinypng::{CompressChain, ConvertFormat, ResizeOperation, TinyPngClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file if it exists.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let client = TinyPngClient::from_env()?;

    let image_path = "assets/image.png";
    println!("Compressing '{}'", image_path);

    let compressed = client.compress(image_path).await?;
    println!(
        "{} bytes -> {} bytes ({}x{}, ratio {:.3}), compressions this month: {}",
        compressed.input.size,
        compressed.output.size,
        compressed.output.width,
        compressed.output.height,
        compressed.output.ratio,
        compressed.compression_count
    );

    compressed
        .resize(ResizeOperation::fit(150, 150))
        .await?
        .save_to_disk("image-150.png")
        .await?;
    println!("Saved thumbnail to image-150.png");

    // The same pipeline written against the pending compression.
    let webp = client
        .compress(image_path)
        .convert(ConvertFormat::WebP, None)
        .await?;
    println!("Converted to {:?}", webp.content_type());
    webp.save_to_disk("image.webp").await?;

    Ok(())
}
