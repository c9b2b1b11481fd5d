//! Main QR code decoder - wires detection, sampling and decoding together

use log::{debug, trace};

use super::bitstream::extract_codewords;
use super::format::FormatInfo;
use super::function_mask::FunctionMask;
use super::payload::{decode_payload, deinterleave_and_correct};
use super::unmask::unmask;
use super::version::VersionInfo;
use crate::config::{max_finder_candidates, max_triples};
use crate::detector::finder::FinderDetector;
use crate::detector::locator::{FinderTriple, candidate_triples, grid_transform};
use crate::detector::timing::timing_pattern_ok;
use crate::detector::transform::extract_sample_grid;
use crate::error::{CodecError, Result};
use crate::models::{BitMatrix, Version};

/// QR decoder entry point
pub struct QrDecoder;

impl QrDecoder {
    /// Locate and decode the first readable QR symbol in a binarized frame
    pub fn decode(binary: &BitMatrix, try_harder: bool) -> Result<String> {
        let mut patterns = FinderDetector::detect(binary, try_harder);
        debug!("{} finder candidates", patterns.len());
        if patterns.len() < 3 {
            return Err(CodecError::NotFound);
        }
        patterns.truncate(max_finder_candidates());

        let triples = candidate_triples(&patterns, max_triples());
        if triples.is_empty() {
            return Err(CodecError::NotFound);
        }

        let mut located = false;
        for triple in &triples {
            match Self::decode_triple(binary, triple) {
                Ok(text) => return Ok(text),
                Err(CodecError::Uncorrectable) => located = true,
                Err(_) => {}
            }
        }
        Err(if located {
            CodecError::Uncorrectable
        } else {
            CodecError::NotFound
        })
    }

    fn decode_triple(binary: &BitMatrix, triple: &FinderTriple) -> Result<String> {
        let estimate = triple.estimate_dimension().ok_or(CodecError::NotFound)?;
        let mut result = Err(CodecError::NotFound);

        // Perspective can push the estimate one version off either way
        for dimension in [estimate, estimate + 4, estimate.wrapping_sub(4)] {
            let Some(version) = Version::from_dimension(dimension) else {
                continue;
            };
            let Some(transform) = grid_transform(binary, triple, dimension) else {
                continue;
            };
            let module_size = triple.module_size();
            let Some(grid) = extract_sample_grid(binary, &transform, dimension, module_size)
            else {
                continue;
            };
            if !timing_pattern_ok(&grid) {
                trace!("timing check failed at version {}", version.number());
                continue;
            }
            match Self::decode_grid(&grid) {
                Ok(text) => return Ok(text),
                Err(e) => result = Err(e),
            }
        }
        result
    }

    /// Decode a sampled module grid, trying its mirror image on failure
    pub fn decode_grid(grid: &BitMatrix) -> Result<String> {
        Self::decode_oriented(grid)
            .or_else(|first| Self::decode_oriented(&grid.transpose()).map_err(|_| first))
    }

    fn decode_oriented(grid: &BitMatrix) -> Result<String> {
        let dimension = grid.width();
        let version = Version::from_dimension(dimension).ok_or(CodecError::NotFound)?;
        let format = FormatInfo::read(grid).ok_or(CodecError::Uncorrectable)?;

        if version.number() >= 7 {
            // The size is already fixed by sampling; version words only guard it
            if let Some(read) = VersionInfo::read(grid) {
                if read != version {
                    trace!(
                        "version info says {} but grid is version {}",
                        read.number(),
                        version.number()
                    );
                    return Err(CodecError::Uncorrectable);
                }
            }
        }

        let func = FunctionMask::new(version);
        let mut unmasked = grid.clone();
        unmask(&mut unmasked, format.mask_pattern, &func);
        let codewords = extract_codewords(&unmasked, &func);
        let (data, repaired) = deinterleave_and_correct(&codewords, version, format.ec_level)?;
        debug!(
            "QR version {} level {:?} mask {}: {} codewords repaired",
            version.number(),
            format.ec_level,
            format.mask_pattern.bits(),
            repaired
        );
        decode_payload(&data, version)
    }
}
