use qrcode::QrCode;
use std::env;
use thermal_printer::{threshold_luma, Bitmap, MemorySink, Printer, UsbSink};
//
// cargo run --example print_qrcode <text> [vid pid]
//
// Without vid/pid the job is only encoded and its size printed.
//

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let text = args.get(1).cloned().unwrap_or_else(|| "12345".to_string());

    let code = QrCode::new(text.as_bytes()).unwrap();
    let img = code
        .render::<image::Luma<u8>>()
        .quiet_zone(true)
        .min_dimensions(200, 200)
        .max_dimensions(384, 384)
        .build();
    let (width, height) = img.dimensions();
    let data = threshold_luma(128, width, height, img.as_raw()).unwrap();
    let bitmap = Bitmap::new(width, height, &data).unwrap();

    let ids = match (args.get(2), args.get(3)) {
        (Some(vid), Some(pid)) => u16::from_str_radix(vid, 16)
            .ok()
            .zip(u16::from_str_radix(pid, 16).ok()),
        _ => None,
    };

    match ids {
        Some((vid, pid)) => match UsbSink::open(vid, pid, None).and_then(Printer::new) {
            Ok(mut printer) => {
                printer.print_bitmap(&bitmap).unwrap();
                printer.feed(3).unwrap();
            }
            Err(err) => panic!("could not open {:04x}:{:04x}: {}", vid, pid, err),
        },
        None => {
            let mut printer = Printer::new(MemorySink::new()).unwrap();
            printer.print_bitmap(&bitmap).unwrap();
            println!(
                "{}x{} qr code encodes to {} bytes",
                width,
                height,
                printer.sink().bytes().len()
            );
        }
    }
}
