// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  hdr2csv.rs - Pixel dump demo for Radiance HDR files.
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
use std::path::Path;

use clap::Parser;
use flate2::read::GzDecoder;

use radiancehdr::image::Image;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read. Gzip-compressed files are decompressed first.
    file: String,

    /// Where to write the CSV. Defaults to the input path with a `.csv`
    /// extension.
    #[arg(short, long)]
    output: Option<String>,

    /// Put row 0 at the top of the picture instead of the bottom.
    #[arg(long)]
    top_down: bool,
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

fn write_csv(image: &Image, path: &Path, top_down: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["x", "y", "r", "g", "b"])?;

    for y in 0..image.height {
        let source_row = if top_down { image.height - 1 - y } else { y };
        let row = image.row(source_row).ok_or("row out of range")?;
        for (x, [r, g, b]) in row.iter().enumerate() {
            writer.write_record(&[
                x.to_string(),
                y.to_string(),
                r.to_string(),
                g.to_string(),
                b.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
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

    let image = match radiancehdr::decode(&data) {
        Ok(image) => image,
        Err(error) => {
            eprintln!("Error decoding file {:?}: {}", &args.file, error);
            return;
        }
    };

    let output = match &args.output {
        Some(output) => Path::new(output).to_path_buf(),
        None => {
            let input = Path::new(&args.file);
            let base_name = input.file_stem().unwrap_or_default().to_string_lossy();
            let base_name = base_name.trim_end_matches(".hdr");
            input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{}.csv", base_name))
        }
    };

    if let Err(e) = write_csv(&image, &output, args.top_down) {
        eprintln!("Failed to write file {}: {}", output.display(), e);
        return;
    }

    println!(
        "Wrote {} pixels to {}",
        image.pixels.len(),
        output.display()
    );
}
