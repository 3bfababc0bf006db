use data_loader::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("final_data.csv");

    println!("Loading movie catalog...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_file(path)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let signature_bytes: usize = catalog.iter().map(|m| m.signature.len()).sum();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("Distinct titles: {}", catalog.distinct_titles());
    println!("Signature bytes: {}", signature_bytes);
    println!("\nPerformance: {:.0} rows/second",
             catalog.len() as f64 / elapsed.as_secs_f64());
}
