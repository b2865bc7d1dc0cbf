//! A command line front-end for the PPM coder.
//! Example invocations:
//! ppmc encode war_and_peace.txt war_and_peace.ppm
//! ppmc decode war_and_peace.ppm restored.txt 3
//!
//! Files are framed as a big-endian 32-bit byte count followed by the
//! packed bit stream. No order field is stored: both sides must agree on
//! the order out of band, and agreeing on the default is the easy way.

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::{env, fs, process};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use ppmc::ppm;

fn usage(exe: &str) -> ! {
    eprintln!("Usage:");
    eprintln!("\t{} <encode|decode> <input> <output> [order]", exe);
    eprintln!(
        "\torder defaults to {}, at most {}",
        ppm::DEFAULT_ORDER,
        ppm::MAX_ORDER
    );
    process::exit(1);
}

fn encode(input: &str, output: &str, order: usize) -> io::Result<()> {
    let data = fs::read(input)?;
    let mut stream = BufWriter::new(fs::File::create(output)?);
    stream.write_u32::<BigEndian>(data.len() as u32)?;
    let mut encoder = ppm::Encoder::new(stream, order);
    encoder.write_all(&data)?;
    let (mut stream, result) = encoder.finish();
    result?;
    stream.flush()
}

fn decode(input: &str, output: &str, order: usize) -> io::Result<()> {
    let mut stream = BufReader::new(fs::File::open(input)?);
    let length = stream.read_u32::<BigEndian>()? as usize;
    let mut decoder = ppm::Decoder::new(stream, order)?;
    let mut data = vec![0u8; length];
    decoder.read_exact(&mut data)?;
    fs::write(output, &data)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 || args.len() > 5 {
        usage(&args[0]);
    }
    let order = match args.get(4) {
        Some(text) => match text.parse() {
            Ok(order) if order <= ppm::MAX_ORDER => order,
            _ => {
                eprintln!("Invalid context order: {}", text);
                usage(&args[0]);
            }
        },
        None => ppm::DEFAULT_ORDER,
    };
    let result = match args[1].as_str() {
        "encode" => encode(&args[2], &args[3], order),
        "decode" => decode(&args[2], &args[3], order),
        _ => usage(&args[0]),
    };
    if let Err(e) = result {
        eprintln!("{}: {}", args[0], e);
        process::exit(1);
    }
}
