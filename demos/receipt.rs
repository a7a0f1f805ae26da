use std::env;
use thermal_printer::{Justification, Printer, SerialSink, Size, DEFAULT_BAUD};
//
// cargo run --example receipt
//
// THERMAL_PRINTER_PORT and THERMAL_PRINTER_BAUD are read from the
// environment or a .env file.
//

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let port = env::var("THERMAL_PRINTER_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let baud = env::var("THERMAL_PRINTER_BAUD")
        .ok()
        .and_then(|b| b.parse().ok())
        .unwrap_or(DEFAULT_BAUD);

    let sink = match SerialSink::open(&port, baud) {
        Ok(sink) => sink,
        Err(err) => {
            eprintln!("Could not open {}: {}", port, err);
            eprintln!("Available ports: {:?}", SerialSink::list_ports());
            return;
        }
    };

    match Printer::new(sink).and_then(|mut printer| print_receipt(&mut printer)) {
        Ok(()) => println!("receipt sent"),
        Err(err) => println!("print failed {:?}", err),
    }
}

fn print_receipt(printer: &mut Printer<SerialSink>) -> thermal_printer::Result<()> {
    printer.justify(Justification::Center)?;
    printer.set_size(Size::Large)?;
    printer.bold_on()?;
    printer.println("CORNER CAFE")?;
    printer.bold_off()?;
    printer.set_size(Size::Small)?;
    printer.println("12 Harbour Street")?;
    printer.feed(1)?;

    printer.justify(Justification::Left)?;
    let items = [
        ("Espresso", "2.50"),
        ("Croissant", "3.10"),
        ("Orange juice", "4.00"),
    ];
    for (item, price) in items.iter() {
        printer.write_text(item)?;
        printer.tab()?;
        printer.println(price)?;
    }

    printer.underline_on()?;
    printer.write_text("TOTAL")?;
    printer.tab()?;
    printer.println("9.60")?;
    printer.underline_off()?;

    printer.inverse_on()?;
    printer.println(" Thank you! ")?;
    printer.inverse_off()?;

    printer.justify(Justification::Center)?;
    printer.print_barcode(b"000123456")?;
    printer.feed(3)?;
    printer.sleep()
}
