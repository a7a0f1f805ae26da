use image::GenericImageView;
use std::env;
use thermal_printer::{threshold_luma, Bitmap, Printer, SerialSink, DEFAULT_BAUD, MAX_PRINT_WIDTH};
//
// cargo run --example print_image path/to/image.png [threshold]
//

fn print_usage() {
    println!("Usage: cargo run --example print_image <IMAGE> [THRESHOLD]");
    println!("Images wider than {} dots are scaled down first.", MAX_PRINT_WIDTH);
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }
    let threshold: u8 = args.get(2).and_then(|t| t.parse().ok()).unwrap_or(80);

    let img = match image::open(&args[1]) {
        Ok(img) => img,
        Err(err) => {
            eprintln!("Failed to open image: {}", err);
            return;
        }
    };
    let img = if img.width() > MAX_PRINT_WIDTH {
        let height = img.height() * MAX_PRINT_WIDTH / img.width();
        img.resize(MAX_PRINT_WIDTH, height, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };
    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();

    let data = threshold_luma(threshold, width, height, luma.as_raw()).unwrap();
    let bitmap = Bitmap::new(width, height, &data).unwrap();

    let port = env::var("THERMAL_PRINTER_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let baud = env::var("THERMAL_PRINTER_BAUD")
        .ok()
        .and_then(|b| b.parse().ok())
        .unwrap_or(DEFAULT_BAUD);

    match SerialSink::open(&port, baud).and_then(Printer::new) {
        Ok(mut printer) => {
            printer.print_bitmap(&bitmap).unwrap();
            printer.feed(3).unwrap();
        }
        Err(err) => println!("ERROR {:#?}", err),
    }
}
