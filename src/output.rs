//! Plain-text trajectory sink.
//!
//! One header line naming the columns, then one line per snapshot:
//!
//! ```text
//! # t x0 y0 vx0 vy0 x1 y1 vx1 vy1 ...
//! 0 1.5 2 0.31 -0.7 ...
//! ```
//!
//! Values are space separated and written with `f64`'s `Display` formatting.

use crate::core::Particle;
use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ordered, append-only snapshot writer over any `Write`.
///
/// The header is emitted lazily with the particle count of the first snapshot.
#[derive(Debug)]
pub struct Trajectory<W: Write> {
    out: W,
    header_written: bool,
    lines: u64,
}

impl Trajectory<BufWriter<File>> {
    /// Open (truncate) a trajectory file.
    ///
    /// Errors: `Error::Io` if the file cannot be created. No simulation work
    /// should start before this succeeds.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Trajectory<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
            lines: 0,
        }
    }

    /// Number of snapshot lines written so far (header excluded).
    pub fn snapshots_written(&self) -> u64 {
        self.lines
    }

    /// Append the state of every particle at time `t`.
    pub fn write_snapshot(&mut self, t: f64, particles: &[Particle]) -> Result<()> {
        if !self.header_written {
            self.write_header(particles.len())?;
        }
        let mut line = String::with_capacity(16 + particles.len() * 64);
        line.push_str(&t.to_string());
        for p in particles {
            for value in [p.x(), p.y(), p.vx(), p.vy()] {
                line.push(' ');
                line.push_str(&value.to_string());
            }
        }
        line.push('\n');
        self.out.write_all(line.as_bytes())?;
        self.lines += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_header(&mut self, n: usize) -> Result<()> {
        let mut header = String::from("# t");
        for i in 0..n {
            header.push_str(&format!(" x{i} y{i} vx{i} vy{i}"));
        }
        header.push('\n');
        self.out.write_all(header.as_bytes())?;
        self.header_written = true;
        Ok(())
    }
}
