//! Scan-line selection for linear decoding
//!
//! Rows are taken from the middle of the frame outward. Each row is read
//! left to right and right to left; `try_harder` uses denser rows and adds
//! a pass over the transposed frame for vertical symbols.
//!
//! A read is only reported once it repeats on separate rows at least
//! `height / 16` apart, so one lucky row of texture is not taken for a
//! symbol.
use log::{debug, trace};

use super::RowReader;
use super::runs::row_runs;
use crate::config::{DecodeOptions, linear_confirmations, linear_rows};
use crate::error::{CodecError, Result};
use crate::models::{BitMatrix, DecodedSymbol};

/// Decode the first linear symbol found in a binarized frame
pub fn scan(binary: &BitMatrix, options: &DecodeOptions) -> Result<DecodedSymbol> {
    let readers: Vec<RowReader> = RowReader::ALL
        .into_iter()
        .filter(|r| r.enabled(options))
        .collect();
    if readers.is_empty() || binary.is_empty() {
        return Err(CodecError::NotFound);
    }

    let first = match scan_rows(binary, &readers, options) {
        Ok(found) => return Ok(found),
        Err(e) => e,
    };
    if !options.try_harder {
        return Err(first);
    }
    trace!("no horizontal linear symbol, scanning columns");
    match scan_rows(&binary.transpose(), &readers, options) {
        Ok(found) => Ok(found),
        Err(CodecError::Uncorrectable) => Err(CodecError::Uncorrectable),
        Err(_) => Err(first),
    }
}

fn scan_rows(matrix: &BitMatrix, readers: &[RowReader], options: &DecodeOptions) -> Result<DecodedSymbol> {
    let height = matrix.height();
    let middle = height / 2;
    let (step, max_lines) = if options.try_harder {
        ((height >> 8).max(1), height)
    } else {
        ((height >> 5).max(1), linear_rows())
    };

    let needed = linear_confirmations();
    let min_gap = (height / 16).max(1);
    // Each distinct read with the rows that confirmed it
    let mut sightings: Vec<(DecodedSymbol, Vec<usize>)> = Vec::new();

    let mut located = false;
    for x in 0..max_lines {
        let offset = step * x.div_ceil(2);
        let y = if x % 2 == 0 {
            middle + offset
        } else {
            match middle.checked_sub(offset) {
                Some(y) => y,
                None => break,
            }
        };
        if y >= height {
            break;
        }

        for reversed in [false, true] {
            let runs = row_runs(matrix, y, reversed);
            for &reader in readers {
                match reader.decode_row(&runs, options) {
                    Ok(symbol) => {
                        trace!(
                            "{} on row {y}{}",
                            symbol.symbology,
                            if reversed { " (reversed)" } else { "" }
                        );
                        if confirm(&mut sightings, symbol, y, min_gap) >= needed {
                            if let Some((symbol, rows)) = sightings.pop() {
                                debug!("{} confirmed on rows {rows:?}", symbol.symbology);
                                return Ok(symbol);
                            }
                        }
                    }
                    Err(CodecError::Uncorrectable) => located = true,
                    Err(_) => {}
                }
            }
        }
    }

    Err(if located {
        CodecError::Uncorrectable
    } else {
        CodecError::NotFound
    })
}

/// Record a read on row `y` and return how many separate rows now back it.
/// The read's entry is moved to the end of `sightings`.
fn confirm(
    sightings: &mut Vec<(DecodedSymbol, Vec<usize>)>,
    symbol: DecodedSymbol,
    y: usize,
    min_gap: usize,
) -> usize {
    let index = match sightings.iter().position(|(s, _)| *s == symbol) {
        Some(index) => index,
        None => {
            sightings.push((symbol, Vec::new()));
            sightings.len() - 1
        }
    };
    let last = sightings.len() - 1;
    sightings.swap(index, last);
    let rows = &mut sightings[last].1;
    if rows.iter().all(|&r| r.abs_diff(y) >= min_gap) {
        rows.push(y);
    }
    rows.len()
}
