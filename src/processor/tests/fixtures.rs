//! SoFiA run directories for processor tests

pub use crate::container::json_store::{JsonStore, read_document};
use crate::fits::{BLOCK_SIZE, CARD_SIZE};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a big-endian float32 FITS image with the given FITS axis lengths
pub fn write_fits(path: &Path, axes: &[usize], extra_cards: &[&str]) {
    let mut cards = vec![
        "SIMPLE  =                    T".to_string(),
        "BITPIX  =                  -32".to_string(),
        format!("NAXIS   = {:>20}", axes.len()),
    ];
    for (index, length) in axes.iter().enumerate() {
        cards.push(format!("NAXIS{}  = {length:>20}", index + 1));
    }
    cards.extend(extra_cards.iter().map(|card| card.to_string()));
    cards.push("END".to_string());

    let mut bytes: Vec<u8> = cards
        .iter()
        .flat_map(|card| format!("{card:<CARD_SIZE$}").into_bytes())
        .collect();
    bytes.resize(bytes.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE, b' ');

    let samples = axes.iter().product::<usize>();
    bytes.extend((0..samples).flat_map(|i| (i as f32 * 0.5).to_be_bytes()));
    bytes.resize(bytes.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE, 0);

    fs::write(path, bytes).unwrap();
}

/// A SoFiA output directory with a cube called `galaxy.fits`
pub struct SofiaRun {
    pub dir: TempDir,
}

impl SofiaRun {
    pub fn new() -> Self {
        let run = Self {
            dir: TempDir::new().unwrap(),
        };
        write_fits(
            &run.path("galaxy.fits"),
            &[4, 3, 2],
            &["BUNIT   = 'Jy/beam '", "HISTORY created for a test"],
        );
        run
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `sofia.par` with the cube input plus extra parameter lines
    pub fn parameters(&self, lines: &[&str]) -> PathBuf {
        let mut text = String::from("input.data = galaxy.fits\n");
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        let path = self.path("sofia.par");
        fs::write(&path, text).unwrap();
        path
    }

    pub fn catalog(&self, name: &str, text: &str) {
        fs::write(self.path(name), text).unwrap();
    }

    pub fn mask(&self, name: &str) {
        write_fits(&self.path(name), &[4, 3, 2], &[]);
    }
}

pub const CATALOGUE: &str = "\
# SoFiA 2.6.0 source catalogue
#
#      name       v_app       f_sum
#
 \"SoFiA J1\"     1402.25        12.5
";
