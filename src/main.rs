// Passport data extraction from OCR output
// Runs the extraction engine over recorded regions or a local image

use chrono::NaiveDate;
use clap::Parser;
use passport_extract::{
    ExtractionConfig, ExtractionResult, ImageHandle, PassportError, PassportExtractor, RecordedRecognizer,
    TextRecognizer,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "passport-extract", version, about = "Extract passport fields from a photo, entirely on device")]
struct Args {
    /// JSON array of recognized text regions to replay
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Passport photo to recognize (requires the `tesseract` feature)
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON file overriding extraction thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Date treated as today, YYYY-MM-DD
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[cfg(feature = "tesseract")]
fn image_recognizer() -> Option<Arc<dyn TextRecognizer>> {
    Some(Arc::new(passport_extract::processing::TesseractRecognizer::new()))
}

#[cfg(not(feature = "tesseract"))]
fn image_recognizer() -> Option<Arc<dyn TextRecognizer>> {
    log::warn!("Built without the `tesseract` feature; text recognition is unavailable");
    None
}

fn build_recognizer(args: &Args) -> Result<Option<Arc<dyn TextRecognizer>>, PassportError> {
    if let Some(path) = &args.regions {
        return Ok(Some(Arc::new(RecordedRecognizer::from_json_file(path)?)));
    }
    if args.image.is_some() {
        return Ok(image_recognizer());
    }
    Ok(None)
}

fn presence(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

// Function to print a detailed extraction report
fn print_detailed_report(result: &ExtractionResult, config: &ExtractionConfig) {
    println!("\n===============================================");
    println!("      PASSPORT EXTRACTION REPORT");
    println!("===============================================\n");

    println!("METHOD: {}", result.method.as_str());

    println!("\nPASSPORT INFORMATION:");
    println!("  Passport Number: {}", presence(&result.fields.passport_number));
    println!("  Full Name: {}", presence(&result.fields.full_name));
    println!("  Nationality: {}", presence(&result.fields.nationality));
    println!("  Issuing Country: {}", presence(&result.fields.issuing_country));
    println!("  Gender: {}", presence(&result.fields.gender));
    println!("  Date of Birth: {}", presence(&result.fields.date_of_birth));
    println!("  Expiration Date: {}", presence(&result.fields.expiration_date));
    println!("  Personal Number: {}", presence(&result.fields.personal_number));

    println!("\nCONFIDENCE:");
    println!("  Overall: {:.2}", result.confidence.overall);
    println!("  OCR Quality: {:.2}", result.confidence.ocr_quality);
    for (field, score) in &result.confidence.fields {
        println!("  {}: {:.2}", field.key(), score);
    }
    println!("  Completeness: {}%", result.completeness);

    if !result.validation.errors.is_empty() {
        println!("\nERRORS:");
        for error in &result.validation.errors {
            println!("  - {}", error);
        }
    }

    if !result.validation.warnings.is_empty() {
        println!("\nWARNINGS:");
        for warning in &result.validation.warnings {
            println!("  - {}", warning);
        }
    }

    let suggestions = result.improvement_suggestions(config);
    if !suggestions.is_empty() {
        println!("\nSUGGESTIONS:");
        for suggestion in &suggestions {
            println!("  - {}", suggestion);
        }
    }

    println!(
        "\nExtraction result: {}",
        if result.success { "SUCCESS" } else { "NEEDS RETRY" }
    );
}

async fn run(args: Args) -> Result<(), PassportError> {
    let config = match &args.config {
        Some(path) => ExtractionConfig::from_json_file(path)?,
        None => ExtractionConfig::default(),
    };

    let mut extractor = match build_recognizer(&args)? {
        Some(recognizer) => PassportExtractor::new(recognizer),
        None => PassportExtractor::without_recognizer(),
    }
    .with_config(config.clone());
    if let Some(date) = args.reference_date {
        extractor = extractor.with_reference_date(date);
    }

    let image = match &args.image {
        Some(path) => ImageHandle::FilePath(path.clone()),
        None => ImageHandle::Bytes(Vec::new()),
    };

    let result = extractor.extract_passport_data(&image).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| PassportError::IoError(format!("Failed to serialize result: {}", e)))?;
        println!("{}", json);
    } else {
        print_detailed_report(&result, &config);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(args).await {
        eprintln!("Error extracting passport data: {}", err);
        std::process::exit(1);
    }
}
