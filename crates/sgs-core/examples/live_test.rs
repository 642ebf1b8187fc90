use sgs_core::{Language, SgsScraper};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let sgs = SgsScraper::new()?;

    println!("Searching for 'ouro'...\n");
    match sgs.search_by_text("ouro", Language::Pt).await? {
        Some(results) => {
            println!("Found {} series:", results.len());
            for (i, series) in results.iter().enumerate() {
                println!(
                    "  {}. [{}] {} ({}, {}) - {}",
                    i + 1,
                    series.code,
                    series.name,
                    series.unit,
                    series.frequency,
                    series.source
                );
            }
        }
        None => println!("No series found."),
    }

    println!("\nDownloading CDI (12) and Selic (11) for January 2021...\n");
    let frame = sgs.data_frame(&[12, 11], "01/01/2021", "31/01/2021", true).await?;

    println!("{:<12} {:>10} {:>10}", "date", "12", "11");
    for (row, date) in frame.dates().iter().enumerate() {
        let cell = |code: u32| {
            frame
                .column(code)
                .and_then(|column| column[row])
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| "-".to_string())
        };
        println!("{:<12} {:>10} {:>10}", date.format("%d/%m/%Y"), cell(12), cell(11));
    }

    println!("\nMetadata:");
    for meta in sgs.metadata_for_frame(&frame, Language::En).await?.into_iter().flatten() {
        println!("  {} - {} [{:?} .. {:?}]", meta.code, meta.name, meta.first_value, meta.last_value);
    }

    Ok(())
}
