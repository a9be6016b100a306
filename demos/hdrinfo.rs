// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  hdrinfo.rs - Header and pixel statistics demo for Radiance HDR files.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::fs;
use std::io::prelude::*;

use clap::Parser;
use flate2::read::GzDecoder;

use radiancehdr::header::Header;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read. Gzip-compressed files are decompressed first.
    file: String,

    /// Only parse the header, don't decode the pixels.
    #[arg(long)]
    header_only: bool,
}

fn read_input(filename: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let data = fs::read(filename)?;
    if !data.starts_with(&[0x1f, 0x8b]) {
        return Ok(data);
    }

    let mut decoder = GzDecoder::new(data.as_slice());
    let mut buffer = Vec::new();
    decoder.read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn main() {
    let args = Args::parse();

    let data = match read_input(&args.file) {
        Ok(data) => data,
        Err(error) => {
            eprintln!("Error opening file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    if args.header_only {
        match Header::parse(&data) {
            Ok((header, offset)) => {
                println!("{:#?}", header);
                println!("Pixel data starts at byte {}", offset);
            }
            Err(error) => eprintln!("Error parsing header of {:?}: {}", &args.file, error),
        }
        return;
    }

    let image = match radiancehdr::decode(&data) {
        Ok(image) => image,
        Err(error) => {
            eprintln!("Error decoding file {:?}: {}", &args.file, error);
            return;
        }
    };

    let header = &image.header;
    println!("Program:  {}", header.program_type);
    println!("Format:   {}", header.format);
    println!("Size:     {}x{}", image.width, image.height);
    println!("Gamma:    {}", header.gamma);
    println!("Exposure: {}", header.exposure);
    for comment in header.comments.lines() {
        println!("Comment:  {}", comment);
    }

    let mut max = [0.0f32; 3];
    let mut sum = [0.0f64; 3];
    for pixel in &image.pixels {
        for c in 0..3 {
            max[c] = max[c].max(pixel[c]);
            sum[c] += f64::from(pixel[c]);
        }
    }
    let count = image.pixels.len() as f64;
    println!("Max:      ({}, {}, {})", max[0], max[1], max[2]);
    println!(
        "Mean:     ({}, {}, {})",
        sum[0] / count,
        sum[1] / count,
        sum[2] / count
    );
}
